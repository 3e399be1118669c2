//! Banking domain catalogue
//!
//! Static data the dialogue engine offers to customers:
//! - `menus` - quick-reply option lists
//! - `branches` - branch names, wait-time table, mock active queues

pub mod branches;
pub mod menus;

pub use branches::{
    wait_time_for, ActiveQueue, BranchLoad, BranchWaitTime, ACTIVE_QUEUES, BRANCH_OPTIONS,
    BRANCH_WAIT_TIMES,
};
pub use menus::*;
