//! Ordered keyword rules, first match wins.

/// A set of keywords paired with the outcome chosen when any of them appears.
#[derive(Clone, Copy, Debug)]
pub struct KeywordRule<T: 'static> {
    /// Lower-case keywords, matched as substrings.
    pub keywords: &'static [&'static str],
    /// What this rule resolves to.
    pub outcome: T,
}

impl<T> KeywordRule<T> {
    /// Whether any keyword occurs in the already lower-cased text.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| lowered.contains(keyword))
    }
}

/// Lower-cases `description` and returns the outcome of the first matching rule.
///
/// Substring containment, not whole words: "documentation" matches "doc",
/// "workout" matches "work".
pub fn first_match<'a, T>(rules: &'a [KeywordRule<T>], description: &str) -> Option<&'a T> {
    let lowered = description.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| &rule.outcome)
}
