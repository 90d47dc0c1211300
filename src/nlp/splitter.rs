//! Multi-request splitting
//!
//! One command may ask for several reports ("ventas por categoría y también
//! productos más vendidos"). The heuristics below run in a fixed order and the
//! first one that produces a split wins:
//!
//! 1. explicit separators ("y también", "and also", ";", ":")
//! 2. month-range guard ("octubre y noviembre" is one request)
//! 3. "tabla ... y otra tabla ..." phrasing
//! 4. a grouped report followed by a ranking ("... por categoría y los más vendidos")
//! 5. an explicit count ("dos reportes", "tablas") plus a plain "y"/"and"
//!
//! The guard sits before rules 3 to 5 because they all split on a bare
//! conjunction, which would otherwise cut a month range in two.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use super::extractor::detect_grouping;
use super::temporal::TemporalResolver;
use super::text::{keyword_regex, normalize_command};

// === Rule 1: Explicit Separators ===
static EXPLICIT_SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s*(?:\by\s+tambi[eé]n\b|\by\s+adem[aá]s\b|\btambi[eé]n\s+quiero\b|\by\s+otr[oa]\b|\by\s+(?:un\s+|una\s+)?(?:segund|tercer)[oa]?\b|\band\s+also\b|\band\s+additionally\b|\balso\s+i\s+want\b|\band\s+another\b|\band\s+(?:a\s+)?(?:second|third)\b|[;:])\s*",
    )
    .unwrap()
});

// === Rule 3: Dual Table ===
// Captures: 1 = first table, 2 = conjunction, 3 = second table
static DUAL_TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)^(.*?\b(?:tabla|table)\b.*?)\s+(y|and)\s+((?:(?:otra|una|la|another|a|the)\s+)?(?:tabla|table)\b.*)$",
    )
    .unwrap()
});

// === Rules 4 and 5: Plain Conjunctions ===
static CONJUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s+(y|and)\s+").unwrap());

// Applied to normalized text
static RANKING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:mas\s+vendid[oa]s?|menos\s+vendid[oa]s?|top(?:\s+\d+)?|mejores|peores|mayor(?:es)?\s+ingresos?|best[\s-]selling|most\s+sold|least\s+sold|ranking)\b",
    )
    .unwrap()
});

static COUNT_PHRASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:(?:\d+|dos|tres|cuatro|two|three|four)\s+(?:reportes|informes|tablas|reports|tables)|tablas|tables)\b",
    )
    .unwrap()
});

static REPORT_INDICATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    keyword_regex(&[
        "reporte",
        "reportes",
        "informe",
        "informes",
        "mostrar",
        "muestra",
        "ventas",
        "productos",
        "clientes",
        "ingresos",
        "quiero",
        "ver",
        "report",
        "reports",
        "show",
        "sales",
        "products",
        "customers",
        "revenue",
        "want",
        "see",
    ])
});

pub(crate) fn has_report_indicator(segment: &str) -> bool {
    REPORT_INDICATOR_RE.is_match(&normalize_command(segment))
}

/// A piece made only of report words and counts ("Reporte", "dos reportes")
/// labels what follows rather than asking for a report of its own.
fn is_label(segment: &str) -> bool {
    let normalized = normalize_command(segment);
    let stripped = COUNT_PHRASE_RE.replace_all(&normalized, " ");
    let stripped = REPORT_INDICATOR_RE.replace_all(&stripped, " ");
    stripped
        .split_whitespace()
        .all(|word| word.chars().all(|c| c.is_ascii_digit()))
}

fn stands_alone(segment: &str) -> bool {
    has_report_indicator(segment) && !is_label(segment)
}

fn clean(segment: &str) -> String {
    segment
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '.' | ';' | ':'))
        .to_string()
}

/// Prefix a generic verb when the segment would otherwise read as a fragment
fn with_verb(segment: &str, english: bool) -> String {
    let segment = clean(segment);
    if has_report_indicator(&segment) {
        segment
    } else if english {
        format!("show {}", segment)
    } else {
        format!("mostrar {}", segment)
    }
}

/// Splits one command into independent report requests
pub struct RequestSplitter;

impl RequestSplitter {
    /// Always returns at least one segment
    pub fn split(text: &str) -> Vec<String> {
        // separators are matched on the raw text, so compose decomposed accents first
        let composed: String = text.trim().nfc().collect();
        let text = composed.as_str();

        if let Some(segments) = Self::split_on_separators(text) {
            debug!(rule = "separator", count = segments.len(), "split request");
            return segments;
        }

        if TemporalResolver::has_month_range(text) {
            debug!(rule = "month_range", "kept request whole");
            return vec![text.to_string()];
        }

        if let Some(segments) = Self::split_tables(text) {
            debug!(rule = "tables", count = segments.len(), "split request");
            return segments;
        }

        if let Some(segments) = Self::split_grouped_and_ranking(text) {
            debug!(rule = "grouped_ranking", count = segments.len(), "split request");
            return segments;
        }

        if let Some(segments) = Self::split_counted(text) {
            debug!(rule = "count", count = segments.len(), "split request");
            return segments;
        }

        vec![text.to_string()]
    }

    /// Split at explicit separators. Fragments without a report keyword ("en pdf")
    /// and bare labels are folded into their neighbour; only a split into two or
    /// more report-bearing pieces counts.
    fn split_on_separators(text: &str) -> Option<Vec<String>> {
        if !EXPLICIT_SEPARATOR_RE.is_match(text) {
            return None;
        }

        let mut segments: Vec<String> = Vec::new();
        let mut leading = String::new();

        for piece in EXPLICIT_SEPARATOR_RE.split(text) {
            let piece = clean(piece);
            if piece.is_empty() {
                continue;
            }

            if stands_alone(&piece) {
                if leading.is_empty() {
                    segments.push(piece);
                } else {
                    segments.push(format!("{} {}", leading, piece));
                    leading.clear();
                }
            } else if let Some(last) = segments.last_mut() {
                last.push(' ');
                last.push_str(&piece);
            } else {
                if !leading.is_empty() {
                    leading.push(' ');
                }
                leading.push_str(&piece);
            }
        }

        (segments.len() >= 2).then_some(segments)
    }

    fn split_tables(text: &str) -> Option<Vec<String>> {
        let mut segments = Vec::new();
        let mut rest = text.to_string();

        loop {
            let Some((first, second)) = DUAL_TABLE_RE.captures(&rest).map(|caps| {
                let english = caps[2].eq_ignore_ascii_case("and");
                (with_verb(&caps[1], english), with_verb(&caps[3], english))
            }) else {
                break;
            };
            segments.push(first);
            rest = second;
        }

        if segments.is_empty() {
            return None;
        }
        segments.push(rest);
        Some(segments)
    }

    fn split_grouped_and_ranking(text: &str) -> Option<Vec<String>> {
        CONJUNCTION_RE.captures_iter(text).find_map(|caps| {
            let whole = caps.get(0)?;
            let (left, right) = (&text[..whole.start()], &text[whole.end()..]);

            let grouped = detect_grouping(&normalize_command(left)).is_some();
            let ranking = RANKING_RE.is_match(&normalize_command(right));
            if !(grouped && ranking) {
                return None;
            }

            let english = caps[1].eq_ignore_ascii_case("and");
            Some(vec![clean(left), with_verb(right, english)])
        })
    }

    fn split_counted(text: &str) -> Option<Vec<String>> {
        let normalized = normalize_command(text);
        if !COUNT_PHRASE_RE.is_match(&normalized) || !CONJUNCTION_RE.is_match(text) {
            return None;
        }

        let segments: Vec<String> = CONJUNCTION_RE
            .split(text)
            .map(clean)
            .filter(|segment| has_report_indicator(segment))
            .collect();

        (segments.len() >= 2).then_some(segments)
    }
}
