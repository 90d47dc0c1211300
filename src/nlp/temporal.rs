//! Temporal phrase resolution
//!
//! Turns phrases such as "del mes de septiembre", "octubre y noviembre",
//! "01/09/2026 al 15/09/2026" or "últimos 7 días" into a concrete date range.
//! Rules are tried in a fixed priority order and the first one that produces a
//! valid range wins. Text without a recognizable phrase is not an error: the
//! caller either keeps the period unresolved or falls back to the previous
//! calendar month.

use chrono::{Datelike, Days, Months, NaiveDate};
use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::text::{capitalize, normalize_command};
use super::types::Period;

/// Month names recognized in commands, in normalized (accent-free) form
const MONTHS: &[(&str, u32)] = &[
    ("enero", 1),
    ("febrero", 2),
    ("marzo", 3),
    ("abril", 4),
    ("mayo", 5),
    ("junio", 6),
    ("julio", 7),
    ("agosto", 8),
    ("septiembre", 9),
    ("setiembre", 9),
    ("octubre", 10),
    ("noviembre", 11),
    ("diciembre", 12),
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
];

/// Display names used in period descriptions
const MONTH_LABELS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

fn month_alternation() -> String {
    MONTHS.iter().map(|(name, _)| *name).collect::<Vec<_>>().join("|")
}

// === Month Range ===
// "octubre y noviembre", "de enero a marzo" is not a range here, only the
// conjunction form: "october and november 2025"
static MONTH_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let months = month_alternation();
    Regex::new(&format!(
        r"\b({months})\s+(?:y|e|and)\s+(?:(?:de|del|mes\s+de|month\s+of)\s+)?({months})\b(?:\s+(?:de\s+|del\s+|of\s+)?(\d{{4}}))?"
    ))
    .unwrap()
});

// === Single Month ===
// "mes de septiembre", "month of march 2025"
static MONTH_OF_RE: LazyLock<Regex> = LazyLock::new(|| {
    let months = month_alternation();
    Regex::new(&format!(
        r"\b(?:mes\s+de|month\s+of)\s+({months})\b(?:\s+(?:de\s+|del\s+|of\s+)?(\d{{4}}))?"
    ))
    .unwrap()
});

// Short form, lowest priority: "ventas de septiembre", "sales in march"
static MONTH_SHORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    let months = month_alternation();
    Regex::new(&format!(
        r"\b(?:de|del|en|in|for|during|durante)\s+({months})\b(?:\s+(?:de\s+|del\s+|of\s+)?(\d{{4}}))?"
    ))
    .unwrap()
});

// === Explicit Ranges ===
// "periodo 01/09/2026 al 15/09/2026", "del 1-9-26 hasta el 15-9-26"
static NUMERIC_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{2,4})\s+(?:al|hasta|a|to|until|through)\s+(?:el\s+)?(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{2,4})",
    )
    .unwrap()
});

// "del 5 de septiembre al 20 de octubre", "from 5 september to 20 october"
static TEXTUAL_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let months = month_alternation();
    Regex::new(&format!(
        r"\b(?:del|desde|from)\s+(\d{{1,2}})\s+(?:de\s+)?({months})\s+(?:al|hasta|to|until)\s+(?:el\s+)?(\d{{1,2}})\s+(?:de\s+)?({months})\b(?:\s+(?:de\s+|del\s+)?(\d{{4}}))?"
    ))
    .unwrap()
});

// === Relative Phrases ===
static LAST_N_DAYS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:ultimos?|last|past|pasados)\s+(\d{1,4})\s+(?:dias?|days?)\b").unwrap()
});

static LAST_N_MONTHS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:ultimos?|last|past|pasados)\s+(\d{1,3})\s+(?:meses|mes|months?)\b").unwrap()
});

static LAST_WEEK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:ultim[ao]\s+semana|semana\s+pasada|last\s+week|past\s+week)\b").unwrap()
});

static THIS_WEEK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:esta\s+semana|semana\s+actual|this\s+week|current\s+week)\b").unwrap()
});

static THIS_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:este\s+mes|mes\s+actual|this\s+month|current\s+month)\b").unwrap()
});

static LAST_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:ultimo\s+mes|mes\s+pasado|mes\s+anterior|last\s+month|previous\s+month)\b")
        .unwrap()
});

static TODAY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:hoy|today)\b").unwrap());

fn month_number(name: &str) -> Option<u32> {
    MONTHS.iter().find(|(m, _)| *m == name).map(|(_, n)| *n)
}

fn month_label(month: u32) -> String {
    capitalize(MONTH_LABELS[(month as usize - 1) % 12])
}

/// First and last day of a calendar month
fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = start.checked_add_months(Months::new(1))?.checked_sub_days(Days::new(1))?;
    Some((start, end))
}

fn parse_year(raw: &str) -> Option<i32> {
    let year: i32 = raw.parse().ok()?;
    Some(if year < 100 { year + 2000 } else { year })
}

fn captured_year(caps: &Captures, index: usize) -> Option<i32> {
    caps.get(index).and_then(|m| m.as_str().parse().ok())
}

/// Resolves temporal phrases relative to a fixed "today"
#[derive(Debug, Clone, Copy)]
pub struct TemporalResolver {
    today: NaiveDate,
}

impl TemporalResolver {
    /// Resolver anchored at a specific date
    pub fn with_today(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Resolve the first recognizable temporal phrase, falling back to the
    /// previous calendar month.
    pub fn resolve(&self, text: &str) -> Period {
        self.find(text).unwrap_or_else(|| self.default_period())
    }

    /// The previous calendar month, labelled as a default
    pub fn default_period(&self) -> Period {
        let (start, end) = self.previous_month();
        Period::new(start, end, "Último mes (por defecto)")
    }

    /// Whether the text names two distinct months joined by a conjunction.
    /// The multi-request splitter consults this before any "and" splitting.
    pub fn has_month_range(text: &str) -> bool {
        let normalized = normalize_command(text);
        MONTH_RANGE_RE.captures_iter(&normalized).any(|caps| {
            month_number(&caps[1]) != month_number(&caps[2])
        })
    }

    /// Resolve the first recognizable temporal phrase, if any
    pub fn find(&self, text: &str) -> Option<Period> {
        let text = normalize_command(text);

        self.month_range(&text)
            .or_else(|| self.single_month(&MONTH_OF_RE, &text))
            .or_else(|| self.numeric_range(&text))
            .or_else(|| self.textual_range(&text))
            .or_else(|| self.relative(&text))
            .or_else(|| self.single_month(&MONTH_SHORT_RE, &text))
    }

    // === Rule 1: month range ===
    fn month_range(&self, text: &str) -> Option<Period> {
        for caps in MONTH_RANGE_RE.captures_iter(text) {
            let first = month_number(&caps[1])?;
            let second = month_number(&caps[2])?;
            if first == second {
                continue;
            }

            let explicit_year = captured_year(&caps, 3);
            let end_year = explicit_year.unwrap_or(self.today.year());
            let mut start_year = if first > second { end_year - 1 } else { end_year };
            let mut end_year = end_year;

            let (mut start, _) = month_bounds(start_year, first)?;
            if explicit_year.is_none() && start > self.today {
                start_year -= 1;
                end_year -= 1;
                start = month_bounds(start_year, first)?.0;
            }
            let (_, end) = month_bounds(end_year, second)?;

            let description = format!("{} a {} {}", month_label(first), month_label(second), end_year);
            return Some(Period::new(start, end, description));
        }
        None
    }

    // === Rule 2 and short form: one named month ===
    fn single_month(&self, re: &Regex, text: &str) -> Option<Period> {
        let caps = re.captures(text)?;
        let month = month_number(&caps[1])?;
        let year = match captured_year(&caps, 2) {
            Some(year) => year,
            None if month > self.today.month() => self.today.year() - 1,
            None => self.today.year(),
        };
        let (start, end) = month_bounds(year, month)?;
        Some(Period::new(start, end, format!("Mes de {} {}", month_label(month), year)))
    }

    // === Rule 3: explicit day-first ranges ===
    fn numeric_range(&self, text: &str) -> Option<Period> {
        for caps in NUMERIC_RANGE_RE.captures_iter(text) {
            let date = |d: usize, m: usize, y: usize| -> Option<NaiveDate> {
                NaiveDate::from_ymd_opt(parse_year(&caps[y])?, caps[m].parse().ok()?, caps[d].parse().ok()?)
            };
            let (Some(a), Some(b)) = (date(1, 2, 3), date(4, 5, 6)) else {
                continue;
            };
            let (start, end) = if a <= b { (a, b) } else { (b, a) };
            let description = format!("Del {} al {}", start.format("%d/%m/%Y"), end.format("%d/%m/%Y"));
            return Some(Period::new(start, end, description));
        }
        None
    }

    fn textual_range(&self, text: &str) -> Option<Period> {
        let caps = TEXTUAL_RANGE_RE.captures(text)?;
        let first_day: u32 = caps[1].parse().ok()?;
        let first_month = month_number(&caps[2])?;
        let last_day: u32 = caps[3].parse().ok()?;
        let last_month = month_number(&caps[4])?;

        let explicit_year = captured_year(&caps, 5);
        let mut end_year = explicit_year.unwrap_or(self.today.year());
        let mut start_year = if first_month > last_month { end_year - 1 } else { end_year };

        let mut start = NaiveDate::from_ymd_opt(start_year, first_month, first_day)?;
        if explicit_year.is_none() && start > self.today {
            start_year -= 1;
            end_year -= 1;
            start = NaiveDate::from_ymd_opt(start_year, first_month, first_day)?;
        }
        let end = NaiveDate::from_ymd_opt(end_year, last_month, last_day)?;
        if end < start {
            return None;
        }

        let description = format!(
            "Del {} de {} al {} de {} {}",
            first_day,
            month_label(first_month),
            last_day,
            month_label(last_month),
            end_year
        );
        Some(Period::new(start, end, description))
    }

    // === Rule 4: relative phrases ===
    fn relative(&self, text: &str) -> Option<Period> {
        let today = self.today;

        if let Some(caps) = LAST_N_DAYS_RE.captures(text) {
            let days: u64 = caps[1].parse().ok()?;
            let start = today.checked_sub_days(Days::new(days))?;
            return Some(Period::new(start, today, format!("Últimos {} días", days)));
        }

        if let Some(caps) = LAST_N_MONTHS_RE.captures(text) {
            let months: u32 = caps[1].parse().ok()?;
            let start = today.checked_sub_months(Months::new(months))?;
            return Some(Period::new(start, today, format!("Últimos {} meses", months)));
        }

        if LAST_WEEK_RE.is_match(text) {
            let start = today.checked_sub_days(Days::new(7))?;
            return Some(Period::new(start, today, "Última semana"));
        }

        if THIS_WEEK_RE.is_match(text) {
            let since_monday = u64::from(today.weekday().num_days_from_monday());
            let start = today.checked_sub_days(Days::new(since_monday))?;
            return Some(Period::new(start, today, "Esta semana"));
        }

        if THIS_MONTH_RE.is_match(text) {
            let start = today.with_day(1)?;
            let description = format!("Este mes ({} {})", month_label(today.month()), today.year());
            return Some(Period::new(start, today, description));
        }

        if LAST_MONTH_RE.is_match(text) {
            let (start, end) = self.previous_month();
            let description = format!("Último mes ({} {})", month_label(start.month()), start.year());
            return Some(Period::new(start, end, description));
        }

        if TODAY_RE.is_match(text) {
            return Some(Period::new(today, today, "Hoy"));
        }

        None
    }

    fn previous_month(&self) -> (NaiveDate, NaiveDate) {
        // Day 1 and the day before it always exist for a valid date
        let first_of_month = self.today.with_day(1).unwrap_or(self.today);
        let end = first_of_month.pred_opt().unwrap_or(first_of_month);
        let start = end.with_day(1).unwrap_or(end);
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn resolver() -> TemporalResolver {
        TemporalResolver::with_today(date(2026, 10, 19))
    }

    #[test]
    fn test_month_range_current_year() {
        let period = resolver().find("ventas de octubre y noviembre").unwrap();
        assert_eq!(period.start, Some(date(2026, 10, 1)));
        assert_eq!(period.end, Some(date(2026, 11, 30)));
        assert_eq!(period.description, "Octubre a Noviembre 2026");
    }

    #[test]
    fn test_month_range_in_future_moves_back_a_year() {
        let period = resolver().find("ventas de noviembre y diciembre").unwrap();
        assert_eq!(period.start, Some(date(2025, 11, 1)));
        assert_eq!(period.end, Some(date(2025, 12, 31)));
    }

    #[test]
    fn test_month_range_crossing_new_year() {
        let period = resolver().find("sales for december and january").unwrap();
        assert_eq!(period.start, Some(date(2025, 12, 1)));
        assert_eq!(period.end, Some(date(2026, 1, 31)));
    }

    #[test]
    fn test_same_month_twice_is_not_a_range() {
        assert!(!TemporalResolver::has_month_range("mayo y mayo"));
        assert!(TemporalResolver::has_month_range("Octubre y Noviembre"));
        assert!(!TemporalResolver::has_month_range("ventas y productos"));
    }

    #[test]
    fn test_month_of() {
        let period = resolver().find("Reporte del mes de Septiembre").unwrap();
        assert_eq!(period.start, Some(date(2026, 9, 1)));
        assert_eq!(period.end, Some(date(2026, 9, 30)));
        assert_eq!(period.description, "Mes de Septiembre 2026");

        // Later than the current month means last year
        let period = resolver().find("mes de diciembre").unwrap();
        assert_eq!(period.start, Some(date(2025, 12, 1)));

        let period = resolver().find("month of february 2024").unwrap();
        assert_eq!(period.start, Some(date(2024, 2, 1)));
        assert_eq!(period.end, Some(date(2024, 2, 29)));
    }

    #[test]
    fn test_numeric_range_day_first() {
        let period = resolver().find("periodo 01/09/2026 al 15/09/2026").unwrap();
        assert_eq!(period.start, Some(date(2026, 9, 1)));
        assert_eq!(period.end, Some(date(2026, 9, 15)));

        let period = resolver().find("del 5-3-26 hasta el 2-3-26").unwrap();
        assert_eq!(period.start, Some(date(2026, 3, 2)));
        assert_eq!(period.end, Some(date(2026, 3, 5)));
    }

    #[test]
    fn test_invalid_numeric_range_is_skipped() {
        let period = resolver().find("31/02/2026 al 15/03/2026 hoy").unwrap();
        assert_eq!(period.description, "Hoy");
    }

    #[test]
    fn test_textual_range() {
        let period = resolver().find("del 5 de septiembre al 20 de octubre").unwrap();
        assert_eq!(period.start, Some(date(2026, 9, 5)));
        assert_eq!(period.end, Some(date(2026, 10, 20)));
        assert_eq!(period.description, "Del 5 de Septiembre al 20 de Octubre 2026");
    }

    #[test]
    fn test_relative_phrases() {
        let r = resolver();
        let today = date(2026, 10, 19);

        let p = r.find("ventas de hoy").unwrap();
        assert_eq!((p.start, p.end), (Some(today), Some(today)));

        // 2026-10-19 is a Monday
        let p = r.find("esta semana").unwrap();
        assert_eq!(p.start, Some(today));

        let p = r.find("este mes").unwrap();
        assert_eq!(p.start, Some(date(2026, 10, 1)));
        assert_eq!(p.description, "Este mes (Octubre 2026)");

        let p = r.find("la última semana").unwrap();
        assert_eq!(p.start, Some(date(2026, 10, 12)));

        let p = r.find("últimos 30 días").unwrap();
        assert_eq!(p.start, Some(date(2026, 9, 19)));
        assert_eq!(p.description, "Últimos 30 días");

        let p = r.find("last 3 months").unwrap();
        assert_eq!(p.start, Some(date(2026, 7, 19)));

        let p = r.find("el mes pasado").unwrap();
        assert_eq!(p.start, Some(date(2026, 9, 1)));
        assert_eq!(p.end, Some(date(2026, 9, 30)));
        assert_eq!(p.description, "Último mes (Septiembre 2026)");
    }

    #[test]
    fn test_short_month_form() {
        let p = resolver().find("ventas de septiembre").unwrap();
        assert_eq!(p.start, Some(date(2026, 9, 1)));
        assert_eq!(p.end, Some(date(2026, 9, 30)));
    }

    #[test]
    fn test_fallback_is_previous_month() {
        let r = resolver();
        assert!(r.find("ventas por producto").is_none());

        let p = r.resolve("ventas por producto");
        assert_eq!(p.start, Some(date(2026, 9, 1)));
        assert_eq!(p.end, Some(date(2026, 9, 30)));
        assert_eq!(p.description, "Último mes (por defecto)");
    }

    #[test]
    fn test_previous_month_across_year() {
        let r = TemporalResolver::with_today(date(2026, 1, 15));
        let p = r.default_period();
        assert_eq!(p.start, Some(date(2025, 12, 1)));
        assert_eq!(p.end, Some(date(2025, 12, 31)));
    }
}
