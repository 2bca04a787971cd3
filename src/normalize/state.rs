//! State derivation from union text.
//!
//! Rosters rarely carry a state column; the state is encoded in the union
//! description ("SINDPD SP - ...", "... DE CURITIBA ..."). The alias table
//! is an explicit, ordered priority list: the first alias with a pattern
//! present as whole words in the union text wins.

use serde::{Deserialize, Serialize};

use super::text::contains_words;

/// One state and the union-text patterns that identify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateAlias {
    /// State name as used by the rate sheet and fallback tiers.
    pub state: String,
    /// Word patterns; matched case- and accent-insensitively.
    pub patterns: Vec<String>,
}

impl StateAlias {
    /// Creates an alias from string slices.
    pub fn new(state: &str, patterns: &[&str]) -> Self {
        Self {
            state: state.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// The built-in alias list.
pub fn default_state_aliases() -> Vec<StateAlias> {
    vec![
        StateAlias::new("São Paulo", &["SAO PAULO", "SP"]),
        StateAlias::new("Rio de Janeiro", &["RIO DE JANEIRO", "RJ"]),
        StateAlias::new("Rio Grande do Sul", &["RIO GRANDE DO SUL", "RS"]),
        StateAlias::new("Paraná", &["PARANA", "PR", "CURITIBA"]),
    ]
}

/// Returns the state for a union text, if any alias matches.
///
/// # Examples
///
/// ```
/// use meal_voucher_engine::normalize::{default_state_aliases, derive_state};
///
/// let aliases = default_state_aliases();
/// assert_eq!(
///     derive_state("SINDPD SP - SIND.TRAB.EM PROC DADOS", &aliases).as_deref(),
///     Some("São Paulo"),
/// );
/// assert_eq!(derive_state("SINDICATO MINEIRO", &aliases), None);
/// ```
pub fn derive_state(union_text: &str, aliases: &[StateAlias]) -> Option<String> {
    aliases
        .iter()
        .find(|alias| {
            alias
                .patterns
                .iter()
                .any(|pattern| contains_words(union_text, pattern))
        })
        .map(|alias| alias.state.clone())
}
