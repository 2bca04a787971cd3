//! Text folding for case- and accent-insensitive matching.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Lowercases `text` and strips diacritics ("São Paulo" → "sao paulo").
///
/// # Examples
///
/// ```
/// use meal_voucher_engine::normalize::fold;
///
/// assert_eq!(fold("DIAS DE FÉRIAS"), "dias de ferias");
/// assert_eq!(fold("Paraná"), "parana");
/// ```
pub fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Splits folded text into alphanumeric words.
pub fn words(text: &str) -> Vec<String> {
    fold(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// Returns true if the words of `pattern` occur contiguously, as whole
/// words, in `text`. Folding applies to both sides.
///
/// ```
/// use meal_voucher_engine::normalize::contains_words;
///
/// assert!(contains_words("SINDPD SP - SIND. TRAB. PROC. DADOS", "SP"));
/// assert!(!contains_words("SINDICATO ESPECIAL", "SP"));
/// assert!(contains_words("SIND. DO RIO GRANDE DO SUL", "Rio Grande do Sul"));
/// ```
pub fn contains_words(text: &str, pattern: &str) -> bool {
    let needle = words(pattern);
    if needle.is_empty() {
        return false;
    }
    let haystack = words(text);
    haystack
        .windows(needle.len())
        .any(|window| window == needle.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_strips_accents_and_case() {
        assert_eq!(fold("SÃO PAULO"), "sao paulo");
        assert_eq!(fold("Admissão"), "admissao");
        assert_eq!(fold("Competência"), "competencia");
    }

    #[test]
    fn test_words_split_on_punctuation() {
        assert_eq!(
            words("SINDPD-RJ/SIND.PROF"),
            vec!["sindpd", "rj", "sind", "prof"]
        );
    }

    #[test]
    fn test_contains_words_requires_whole_words() {
        assert!(contains_words("SITEPD PR - CURITIBA", "pr"));
        assert!(!contains_words("SINDICATO PROCESSAMENTO", "pr"));
    }

    #[test]
    fn test_contains_words_empty_pattern_never_matches() {
        assert!(!contains_words("anything", ""));
        assert!(!contains_words("anything", " - "));
    }

    #[test]
    fn test_contains_words_ignores_accents() {
        assert!(contains_words("SINDICATO DO PARANA", "Paraná"));
        assert!(contains_words("SIND SÃO PAULO", "SAO PAULO"));
    }
}
