//! Text helpers shared by the command parsers and the renderers

use regex::Regex;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Lower-case the command, strip diacritics and collapse whitespace runs.
///
/// Every keyword table in this module is written against this form, so
/// "Categoría", "CATEGORIA" and "categoria" all match the same entry.
pub fn normalize_command(text: &str) -> String {
    let folded = fold_accents(&text.to_lowercase());
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip diacritics: decompose, then drop the combining marks.
/// Precomposed ("categoría") and decomposed ("categori\u{301}a") input fold alike.
pub fn fold_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Compile a whole-word alternation over a keyword table.
/// Multi-word entries are allowed ("hoja de calculo").
pub fn keyword_regex(words: &[&str]) -> Regex {
    let alternation = words
        .iter()
        .map(|w| regex::escape(w).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{})\b", alternation)).unwrap()
}

/// Capitalize the first letter of a word ("septiembre" -> "Septiembre")
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_command() {
        assert_eq!(normalize_command("  Ventas por   CATEGORÍA "), "ventas por categoria");
        assert_eq!(normalize_command("Últimos 7 días"), "ultimos 7 dias");
        assert_eq!(normalize_command(""), "");
    }

    #[test]
    fn test_fold_accents_keeps_other_chars() {
        assert_eq!(fold_accents("Año 2026: ¿más?"), "Ano 2026: ¿mas?");
    }

    #[test]
    fn test_decomposed_input_folds() {
        assert_eq!(fold_accents("categori\u{301}a"), "categoria");
        assert_eq!(normalize_command("Categori\u{301}a  A\u{303}o"), "categoria ano");
    }

    #[test]
    fn test_keyword_regex_whole_words() {
        let re = keyword_regex(&["venta", "hoja de calculo"]);
        assert!(re.is_match("una venta"));
        assert!(re.is_match("en hoja  de calculo"));
        assert!(!re.is_match("ventanas"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("octubre"), "Octubre");
        assert_eq!(capitalize(""), "");
    }
}
