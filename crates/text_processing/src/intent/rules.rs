//! Ordered keyword rules
//!
//! A [`RuleSet`] is an ordered list of (predicate, outcome) pairs evaluated
//! top to bottom; the first rule whose predicate holds wins. Order is a
//! tie-break policy, not a quality ranking.

/// A single keyword predicate over case-folded text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// Any keyword occurs as a substring
    Any(&'static [&'static str]),
    /// Every keyword occurs as a substring
    All(&'static [&'static str]),
    /// The whole text equals one of the keywords
    Exact(&'static [&'static str]),
}

impl Matcher {
    fn matches(&self, folded: &str) -> bool {
        match self {
            Matcher::Any(keywords) => keywords.iter().any(|k| folded.contains(k)),
            Matcher::All(keywords) => {
                !keywords.is_empty() && keywords.iter().all(|k| folded.contains(k))
            },
            Matcher::Exact(keywords) => keywords.iter().any(|k| folded == *k),
        }
    }
}

/// Keyword rule: fires when any of its matchers holds and none of its
/// exclusion keywords occurs.
#[derive(Debug, Clone)]
pub struct KeywordRule<T> {
    name: &'static str,
    matchers: Vec<Matcher>,
    excludes: &'static [&'static str],
    outcome: T,
}

impl<T: Copy> KeywordRule<T> {
    pub fn new(name: &'static str, outcome: T) -> Self {
        Self {
            name,
            matchers: Vec::new(),
            excludes: &[],
            outcome,
        }
    }

    /// Fire when any keyword is present
    pub fn any(mut self, keywords: &'static [&'static str]) -> Self {
        self.matchers.push(Matcher::Any(keywords));
        self
    }

    /// Fire when all keywords are present
    pub fn all(mut self, keywords: &'static [&'static str]) -> Self {
        self.matchers.push(Matcher::All(keywords));
        self
    }

    /// Fire when the whole input equals a keyword
    pub fn exact(mut self, keywords: &'static [&'static str]) -> Self {
        self.matchers.push(Matcher::Exact(keywords));
        self
    }

    /// Never fire when any of these keywords is present
    pub fn unless(mut self, keywords: &'static [&'static str]) -> Self {
        self.excludes = keywords;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn outcome(&self) -> T {
        self.outcome
    }

    /// Evaluate against already case-folded text
    pub fn matches_folded(&self, folded: &str) -> bool {
        if self.excludes.iter().any(|k| folded.contains(k)) {
            return false;
        }
        self.matchers.iter().any(|m| m.matches(folded))
    }

    /// Evaluate against raw text
    pub fn matches(&self, text: &str) -> bool {
        self.matches_folded(&fold(text))
    }
}

/// Ordered rule list, first match wins
#[derive(Debug, Clone)]
pub struct RuleSet<T> {
    name: &'static str,
    rules: Vec<KeywordRule<T>>,
}

impl<T: Copy> RuleSet<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rules: Vec::new(),
        }
    }

    /// Append a rule at the lowest priority
    pub fn rule(mut self, rule: KeywordRule<T>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rules(&self) -> &[KeywordRule<T>] {
        &self.rules
    }

    /// First matching rule, if any
    pub fn first_match(&self, text: &str) -> Option<&KeywordRule<T>> {
        let folded = fold(text);
        self.rules.iter().find(|rule| rule.matches_folded(&folded))
    }

    /// Outcome of the first matching rule
    pub fn classify(&self, text: &str) -> Option<T> {
        self.first_match(text).map(KeywordRule::outcome)
    }
}

/// Case folding applied before matching
pub fn fold(text: &str) -> String {
    text.to_lowercase()
}
