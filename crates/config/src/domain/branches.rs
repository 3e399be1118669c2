//! Branch Configuration
//!
//! Branch names offered as quick replies, the fixed wait-time table used by
//! the wait-time flow, and the mock active queues shown in the queue view.

use serde::Serialize;

/// Branches offered whenever the assistant asks for a location
pub const BRANCH_OPTIONS: [&str; 4] = [
    "Downtown Branch",
    "Westside Branch",
    "Northgate Branch",
    "Eastside Branch",
];

/// How busy a branch currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchLoad {
    Light,
    Moderate,
    Busy,
}

impl BranchLoad {
    pub fn as_str(&self) -> &'static str {
        match self {
            BranchLoad::Light => "light",
            BranchLoad::Moderate => "moderate",
            BranchLoad::Busy => "busy",
        }
    }
}

impl std::fmt::Display for BranchLoad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current wait at one branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BranchWaitTime {
    /// Display name of the branch
    pub branch: &'static str,
    /// Keyword that identifies the branch inside free text
    #[serde(skip)]
    pub keyword: &'static str,
    /// Wait range, e.g. "15-20 minutes"
    pub wait: &'static str,
    pub load: BranchLoad,
}

/// Fixed wait-time table. The first entry doubles as the default.
pub static BRANCH_WAIT_TIMES: [BranchWaitTime; 4] = [
    BranchWaitTime {
        branch: "Downtown Branch",
        keyword: "downtown",
        wait: "15-20 minutes",
        load: BranchLoad::Moderate,
    },
    BranchWaitTime {
        branch: "Westside Branch",
        keyword: "westside",
        wait: "30-45 minutes",
        load: BranchLoad::Busy,
    },
    BranchWaitTime {
        branch: "Northgate Branch",
        keyword: "northgate",
        wait: "5-10 minutes",
        load: BranchLoad::Light,
    },
    BranchWaitTime {
        branch: "Eastside Branch",
        keyword: "eastside",
        wait: "20-25 minutes",
        load: BranchLoad::Moderate,
    },
];

/// Look up the wait for the branch named in `text`.
///
/// Unknown branches get the Downtown values.
pub fn wait_time_for(text: &str) -> &'static BranchWaitTime {
    let lower = text.to_lowercase();
    BRANCH_WAIT_TIMES
        .iter()
        .find(|entry| lower.contains(entry.keyword))
        .unwrap_or(&BRANCH_WAIT_TIMES[0])
}

/// A queue the customer is (mock) waiting in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActiveQueue {
    pub service: &'static str,
    pub branch: &'static str,
    pub position: u32,
    pub length: u32,
    pub wait_minutes: u32,
}

/// Fixed queues reported by the "view my queue position" flow
pub static ACTIVE_QUEUES: [ActiveQueue; 2] = [
    ActiveQueue {
        service: "Account Services",
        branch: "Downtown Branch",
        position: 3,
        length: 12,
        wait_minutes: 12,
    },
    ActiveQueue {
        service: "Loan Inquiry",
        branch: "Westside Branch",
        position: 7,
        length: 15,
        wait_minutes: 25,
    },
];
