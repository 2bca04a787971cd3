//! Substring rule tables.
//!
//! Both reference sheets (union → workdays, state → daily rate) are lists
//! of `key → value` rules where a rule applies when its key occurs
//! anywhere in the looked-up text. Overlapping keys are common ("PR"
//! inside "SINDPD PR - ..." and inside "PROCESSAMENTO"), so the table
//! applies an explicit [`MatchPolicy`] and reports every candidate so
//! callers can flag ambiguous lookups.

use crate::config::{MatchOptions, MatchPolicy};
use crate::normalize::fold;

/// One rule: a key fragment and the value it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedRule<V> {
    /// Key text as written in the source sheet.
    pub key: String,
    /// Resolved value.
    pub value: V,
    /// 0-based position in the source sheet.
    pub position: usize,
    match_key: String,
}

/// A successful lookup: the winning rule plus every rule that matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<'a, V> {
    /// The rule selected by the table's policy.
    pub rule: &'a KeyedRule<V>,
    /// All matching rules in source order, the winner included.
    pub candidates: Vec<&'a KeyedRule<V>>,
}

impl<V> RuleMatch<'_, V> {
    /// True when more than one rule matched.
    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }

    /// Keys of the matching rules, in source order.
    pub fn candidate_keys(&self) -> Vec<&str> {
        self.candidates.iter().map(|rule| rule.key.as_str()).collect()
    }
}

/// An ordered, read-only list of substring rules.
///
/// # Examples
///
/// ```
/// use meal_voucher_engine::calculation::RuleTable;
/// use meal_voucher_engine::config::{MatchOptions, MatchPolicy};
///
/// let mut table = RuleTable::new(MatchOptions::default());
/// table.push("SINDPD", 21u32);
/// table.push("SINDPD SP", 22u32);
///
/// let found = table.find("SINDPD SP - SIND.TRAB.EM PROC DADOS").unwrap();
/// assert_eq!(found.rule.value, 22);
/// assert!(found.is_ambiguous());
///
/// let mut first_wins = RuleTable::new(MatchOptions {
///     policy: MatchPolicy::SourceOrder,
///     case_sensitive: false,
/// });
/// first_wins.push("SINDPD", 21u32);
/// first_wins.push("SINDPD SP", 22u32);
/// assert_eq!(first_wins.find("SINDPD SP").unwrap().rule.value, 21);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable<V> {
    rules: Vec<KeyedRule<V>>,
    options: MatchOptions,
}

impl<V> RuleTable<V> {
    /// Creates an empty table.
    pub fn new(options: MatchOptions) -> Self {
        Self {
            rules: Vec::new(),
            options,
        }
    }

    /// Appends a rule after every existing rule. Keys that are blank after
    /// trimming are kept for position bookkeeping but never match.
    pub fn push(&mut self, key: impl Into<String>, value: V) {
        let key = key.into().trim().to_string();
        let match_key = self.comparable(&key);
        self.rules.push(KeyedRule {
            position: self.rules.len(),
            key,
            value,
            match_key,
        });
    }

    /// The rules in source order.
    pub fn rules(&self) -> &[KeyedRule<V>] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The options this table matches with.
    pub fn options(&self) -> MatchOptions {
        self.options
    }

    fn comparable(&self, text: &str) -> String {
        if self.options.case_sensitive {
            text.to_string()
        } else {
            fold(text)
        }
    }

    /// Every rule whose key occurs in `text`, in source order.
    pub fn candidates(&self, text: &str) -> Vec<&KeyedRule<V>> {
        let text = self.comparable(text);
        self.rules
            .iter()
            .filter(|rule| !rule.match_key.is_empty() && text.contains(&rule.match_key))
            .collect()
    }

    /// Looks up `text`, returning the winning rule under the table's policy.
    pub fn find(&self, text: &str) -> Option<RuleMatch<'_, V>> {
        let candidates = self.candidates(text);
        let rule = match self.options.policy {
            MatchPolicy::SourceOrder => candidates.first().copied(),
            // max_by_key keeps the last maximum; compare on (len, reverse position)
            MatchPolicy::LongestKey => candidates
                .iter()
                .copied()
                .max_by_key(|rule| (rule.match_key.chars().count(), std::cmp::Reverse(rule.position))),
        }?;
        Some(RuleMatch { rule, candidates })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(policy: MatchPolicy, case_sensitive: bool) -> RuleTable<u32> {
        let mut table = RuleTable::new(MatchOptions {
            policy,
            case_sensitive,
        });
        table.push("SINDPD", 20);
        table.push("SINDPD SP", 22);
        table.push("SINDPD RJ", 21);
        table
    }

    #[test]
    fn test_longest_key_wins() {
        let table = table(MatchPolicy::LongestKey, false);
        let found = table.find("SINDPD RJ - SIND PROF PROC DADOS").unwrap();
        assert_eq!(found.rule.value, 21);
        assert_eq!(found.candidate_keys(), vec!["SINDPD", "SINDPD RJ"]);
    }

    #[test]
    fn test_source_order_takes_first_match() {
        let table = table(MatchPolicy::SourceOrder, false);
        let found = table.find("SINDPD RJ - SIND PROF PROC DADOS").unwrap();
        assert_eq!(found.rule.value, 20);
        assert_eq!(found.rule.position, 0);
    }

    #[test]
    fn test_equal_length_ties_go_to_earlier_rule() {
        let mut table = RuleTable::new(MatchOptions::default());
        table.push("ABC", 1u32);
        table.push("XYZ", 2u32);
        assert_eq!(table.find("XYZ ABC").unwrap().rule.value, 1);
    }

    #[test]
    fn test_folding_ignores_case_and_accents() {
        let mut table = RuleTable::new(MatchOptions::default());
        table.push("Paraná", 35u32);
        assert_eq!(table.find("SINDICATO DO PARANA").unwrap().rule.value, 35);
    }

    #[test]
    fn test_case_sensitive_containment() {
        let table = table(MatchPolicy::LongestKey, true);
        assert!(table.find("sindpd sp").is_none());
        assert_eq!(table.find("SINDPD SP").unwrap().rule.value, 22);
    }

    #[test]
    fn test_no_match_and_blank_keys() {
        let mut table = RuleTable::new(MatchOptions::default());
        table.push("   ", 1u32);
        table.push("SITEPD", 2u32);
        assert!(table.find("SINDPD SP").is_none());
        assert!(table.candidates("").is_empty());
        assert_eq!(table.len(), 2);
        assert_eq!(table.rules()[1].position, 1);
    }
}
