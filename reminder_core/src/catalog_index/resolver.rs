//! Tiered name matching.
//!
//! A [`NameMatcher`] runs an ordered list of [`MatchStrategy`] tiers. The
//! first tier that produces any candidate decides the outcome: one candidate
//! is a match, several are ambiguous. Later tiers are not consulted once a
//! tier has produced candidates, so appending a tier (fuzzy matching, say)
//! never changes what the earlier tiers resolve.

/// One matching tier. Both arguments arrive lower-cased.
pub trait MatchStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn matches(&self, query: &str, candidate: &str) -> bool;
}

/// Full-name equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatch;

impl MatchStrategy for ExactMatch {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn matches(&self, query: &str, candidate: &str) -> bool {
        query == candidate
    }
}

/// The candidate contains the query.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatch;

impl MatchStrategy for SubstringMatch {
    fn name(&self) -> &'static str {
        "substring"
    }

    fn matches(&self, query: &str, candidate: &str) -> bool {
        candidate.contains(query)
    }
}

/// The query contains the candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseSubstringMatch;

impl MatchStrategy for ReverseSubstringMatch {
    fn name(&self) -> &'static str {
        "reverse-substring"
    }

    fn matches(&self, query: &str, candidate: &str) -> bool {
        !candidate.is_empty() && query.contains(candidate)
    }
}

/// Outcome of running a [`NameMatcher`] over a pool.
#[derive(Debug)]
pub enum NameMatch<'a, T> {
    Found { item: &'a T, strategy: &'static str },
    Ambiguous(Vec<&'a T>),
    NoMatch,
}

impl<'a, T> NameMatch<'a, T> {
    pub fn found(&self) -> Option<&'a T> {
        match self {
            NameMatch::Found { item, .. } => Some(*item),
            _ => None,
        }
    }
}

/// Ordered list of matching tiers.
pub struct NameMatcher {
    strategies: Vec<Box<dyn MatchStrategy>>,
}

impl Default for NameMatcher {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for NameMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.strategy_names()).finish()
    }
}

impl NameMatcher {
    /// A matcher with no tiers; add them with [`NameMatcher::then`].
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Exact, then substring, then reverse substring.
    pub fn standard() -> Self {
        Self::empty()
            .then(ExactMatch)
            .then(SubstringMatch)
            .then(ReverseSubstringMatch)
    }

    /// Append a tier after the existing ones.
    pub fn then(mut self, strategy: impl MatchStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Match `query` against a pool of `(lower-cased key, item)` pairs.
    ///
    /// A blank query never matches.
    pub fn find<'k, 'a, T>(&self, query: &str, pool: &[(&'k str, &'a T)]) -> NameMatch<'a, T> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return NameMatch::NoMatch;
        }

        for strategy in &self.strategies {
            let hits: Vec<&'a T> = pool
                .iter()
                .filter(|(key, _)| strategy.matches(&query, key))
                .map(|(_, item)| *item)
                .collect();

            match hits.len() {
                0 => continue,
                1 => {
                    return NameMatch::Found {
                        item: hits[0],
                        strategy: strategy.name(),
                    }
                }
                _ => return NameMatch::Ambiguous(hits),
            }
        }

        NameMatch::NoMatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool<'a>(names: &'a [&'a str]) -> Vec<(&'a str, &'a &'a str)> {
        names.iter().map(|n| (*n, n)).collect()
    }

    #[test]
    fn test_exact_beats_substring() {
        let names = ["captain", "captain in gravis armour"];
        let pool = pool(&names);
        let result = NameMatcher::standard().find("Captain", &pool);
        assert!(matches!(result, NameMatch::Found { item, strategy: "exact" } if *item == "captain"));
    }

    #[test]
    fn test_single_substring() {
        let names = ["intercessor squad", "captain"];
        let pool = pool(&names);
        let result = NameMatcher::standard().find("intercessor", &pool);
        assert!(matches!(result, NameMatch::Found { strategy: "substring", .. }));
    }

    #[test]
    fn test_reverse_substring() {
        let names = ["intercessor squad", "captain"];
        let pool = pool(&names);
        let result = NameMatcher::standard().find("Veteran Intercessor Squad Alpha", &pool);
        assert!(
            matches!(result, NameMatch::Found { item, strategy: "reverse-substring" } if *item == "intercessor squad")
        );
    }

    #[test]
    fn test_ambiguous_stops_at_tier() {
        let names = ["assault intercessor squad", "intercessor squad with jump packs", "squad"];
        let pool = pool(&names);
        match NameMatcher::standard().find("intercessor", &pool) {
            NameMatch::Ambiguous(hits) => assert_eq!(hits.len(), 2),
            other => panic!("expected ambiguous, got {:?}", other),
        }
    }

    #[test]
    fn test_no_match_and_blank_query() {
        let names = ["captain"];
        let pool = pool(&names);
        assert!(matches!(NameMatcher::standard().find("librarian", &pool), NameMatch::NoMatch));
        assert!(matches!(NameMatcher::standard().find("   ", &pool), NameMatch::NoMatch));
    }

    #[test]
    fn test_appended_tier_runs_last() {
        struct Initials;
        impl MatchStrategy for Initials {
            fn name(&self) -> &'static str {
                "initials"
            }
            fn matches(&self, query: &str, candidate: &str) -> bool {
                let initials: String = candidate.split_whitespace().filter_map(|w| w.chars().next()).collect();
                initials == query
            }
        }

        let matcher = NameMatcher::standard().then(Initials);
        assert_eq!(
            matcher.strategy_names(),
            vec!["exact", "substring", "reverse-substring", "initials"]
        );

        let names = ["captain in gravis armour", "intercessor squad"];
        let pool = pool(&names);
        assert!(matches!(matcher.find("is", &pool), NameMatch::Found { strategy: "substring", .. }));
        assert!(matches!(matcher.find("ciga", &pool), NameMatch::Found { strategy: "initials", .. }));
    }
}
