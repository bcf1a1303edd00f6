//! Date normalization and payment due date extraction.

use chrono::{Datelike, Local, NaiveDate};
use regex::{Captures, Regex};

use super::cascade::{group, Cascade};
use super::patterns::{
    DATE_DAY_FIRST, DATE_ISO, DATE_MONTH_DAY, DATE_MONTH_FIRST, DATE_US, DUE_DATE_FALLBACK_RULES,
    DUE_DATE_RULES,
};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::statement::{Field, Issuer};

/// Permissive date parser.
///
/// Dates without a year take `default_year`, fixed when the normalizer is
/// built so repeated parses agree.
#[derive(Debug, Clone, Copy)]
pub struct DateNormalizer {
    default_year: i32,
}

impl DateNormalizer {
    /// Normalizer filling missing years with `default_year`.
    pub fn new(default_year: i32) -> Self {
        Self { default_year }
    }

    /// Normalizer filling missing years with the current calendar year.
    pub fn current() -> Self {
        Self::new(Local::now().year())
    }

    /// Use `default_year` when set, the current year otherwise.
    pub fn resolve(default_year: Option<i32>) -> Self {
        default_year.map(Self::new).unwrap_or_else(Self::current)
    }

    pub fn default_year(&self) -> i32 {
        self.default_year
    }

    /// Parse the earliest date found in `s`.
    ///
    /// When two forms start at the same offset the one listed first wins:
    /// ISO, US numeric, month name first, day first, then month/day.
    pub fn parse(&self, s: &str) -> Option<NaiveDate> {
        let candidates = [
            earliest(&DATE_ISO, s, |c| {
                ymd(c[1].parse().ok()?, num(c, 2)?, num(c, 3)?)
            }),
            earliest(&DATE_US, s, |c| {
                let (month, day) = month_day(num(c, 1)?, num(c, 2)?);
                ymd(parse_year(c.get(3)?.as_str()), month, day)
            }),
            earliest(&DATE_MONTH_FIRST, s, |c| {
                ymd(self.year(c, 3), month_from_name(&c[1])?, num(c, 2)?)
            }),
            earliest(&DATE_DAY_FIRST, s, |c| {
                ymd(self.year(c, 3), month_from_name(&c[2])?, num(c, 1)?)
            }),
            earliest(&DATE_MONTH_DAY, s, |c| {
                let (month, day) = month_day(num(c, 1)?, num(c, 2)?);
                ymd(self.default_year, month, day)
            }),
        ];

        candidates
            .into_iter()
            .flatten()
            .min_by_key(|(start, _)| *start)
            .map(|(_, date)| date)
    }

    /// Parse and format as `YYYY-MM-DD`.
    pub fn normalize(&self, s: &str) -> Option<String> {
        self.parse(s).map(|date| date.format("%Y-%m-%d").to_string())
    }

    fn year(&self, caps: &Captures<'_>, index: usize) -> i32 {
        caps.get(index)
            .map(|m| parse_year(m.as_str()))
            .unwrap_or(self.default_year)
    }
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self::current()
    }
}

/// Normalize a date string to `YYYY-MM-DD`, using the current year when the
/// text carries none.
pub fn normalize_date(s: &str) -> Option<String> {
    DateNormalizer::current().normalize(s)
}

/// First occurrence of `pattern` that forms a valid calendar date.
fn earliest(
    pattern: &Regex,
    s: &str,
    build: impl Fn(&Captures<'_>) -> Option<NaiveDate>,
) -> Option<(usize, NaiveDate)> {
    pattern.captures_iter(s).find_map(|caps| {
        let start = caps.get(0)?.start();
        build(&caps).map(|date| (start, date))
    })
}

fn num(caps: &Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index)?.as_str().parse().ok()
}

fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Month first unless the first number cannot be a month.
fn month_day(first: u32, second: u32) -> (u32, u32) {
    if first > 12 {
        (second, first)
    } else {
        (first, second)
    }
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        if year <= 50 {
            2000 + year
        } else {
            1900 + year
        }
    } else {
        year
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    let prefix = name.get(..3)?.to_ascii_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Payment due date extractor. Values are ISO dates.
pub struct DueDateExtractor {
    normalizer: DateNormalizer,
}

impl DueDateExtractor {
    pub fn new() -> Self {
        Self::with_normalizer(DateNormalizer::current())
    }

    pub fn with_normalizer(normalizer: DateNormalizer) -> Self {
        Self { normalizer }
    }
}

impl Default for DueDateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DueDateExtractor {
    type Output = String;

    fn field(&self) -> Field {
        Field::PaymentDueDate
    }

    fn extract(&self, text: &str, issuer: Option<Issuer>) -> Option<ExtractionMatch<String>> {
        Cascade::for_field(
            Field::PaymentDueDate,
            issuer,
            DUE_DATE_RULES.as_slice(),
            DUE_DATE_FALLBACK_RULES.as_slice(),
        )
        .run(text, |caps| group(caps, 1).and_then(|raw| self.normalizer.normalize(raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::rules::Tier;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_parse_forms() {
        let normalizer = DateNormalizer::new(2025);

        assert_eq!(normalizer.parse("2025-03-03"), date(2025, 3, 3));
        assert_eq!(normalizer.parse("03/03/2025"), date(2025, 3, 3));
        assert_eq!(normalizer.parse("Mar 3, 2025"), date(2025, 3, 3));
        assert_eq!(normalizer.parse("March 3rd"), date(2025, 3, 3));
        assert_eq!(normalizer.parse("3 March 2025"), date(2025, 3, 3));
        assert_eq!(normalizer.parse("Sept. 21, 2024"), date(2024, 9, 21));
        assert_eq!(normalizer.parse("12/5"), date(2025, 12, 5));
    }

    #[test]
    fn test_day_month_swap() {
        let normalizer = DateNormalizer::new(2025);
        assert_eq!(normalizer.parse("25/12/2024"), date(2024, 12, 25));
        assert_eq!(normalizer.parse("01/02/2024"), date(2024, 1, 2));
    }

    #[test]
    fn test_two_digit_year() {
        let normalizer = DateNormalizer::new(2025);
        assert_eq!(normalizer.parse("04/01/25"), date(2025, 4, 1));
        assert_eq!(normalizer.parse("04/01/99"), date(1999, 4, 1));
    }

    #[test]
    fn test_earliest_occurrence_wins() {
        let normalizer = DateNormalizer::new(2025);
        assert_eq!(normalizer.parse("Jan 5, 2025 or 2025-02-01"), date(2025, 1, 5));
    }

    #[test]
    fn test_invalid_dates() {
        let normalizer = DateNormalizer::new(2025);
        assert_eq!(normalizer.parse("13/13/2025"), None);
        assert_eq!(normalizer.parse("February 30, 2025"), None);
        assert_eq!(normalizer.parse("see reverse side"), None);
        assert_eq!(normalizer.parse("15"), None);
        assert_eq!(normalizer.parse(""), None);
    }

    #[test]
    fn test_resolve_default_year() {
        assert_eq!(DateNormalizer::resolve(Some(2020)).default_year(), 2020);
        assert_eq!(DateNormalizer::resolve(None).default_year(), Local::now().year());
    }

    #[test]
    fn test_due_date_labeled() {
        let found = DueDateExtractor::new()
            .extract("Payment due date: March 3, 2025\n", None)
            .unwrap();
        assert_eq!(found.value, "2025-03-03");
        assert_eq!(found.provenance.tier, Tier::Generic);
    }

    #[test]
    fn test_iso_dates() {
        let normalizer = DateNormalizer::new(2025);
        assert_eq!(normalizer.parse("Due 2024-11-30"), date(2024, 11, 30));
        assert_eq!(normalizer.parse("2024/2/9"), date(2024, 2, 9));
        assert_eq!(normalizer.parse("2024-13-01"), None);
    }

    #[test]
    fn test_due_date_rejection_moves_to_next_rule() {
        let text = "Payment due date: see below\nPay by: 04/15/2025\n";
        let found = DueDateExtractor::new().extract(text, None).unwrap();
        assert_eq!(found.value, "2025-04-15");
        assert_eq!(found.provenance.rule, "Pay by");
    }

    #[test]
    fn test_due_date_only_first_occurrence_counts() {
        let text = "Payment due date: TBD\nDue date: March 3, 2025\n";
        assert!(DueDateExtractor::new().extract(text, None).is_none());
    }

    #[test]
    fn test_chase_due_by_override() {
        let text = "CHASE\nDue by: 04/15/2025\n";
        let found = DueDateExtractor::new().extract(text, Some(Issuer::Chase)).unwrap();
        assert_eq!(found.value, "2025-04-15");
        assert_eq!(found.provenance.tier, Tier::Override);
        assert_eq!(found.provenance.rule, "Chase Due by");
    }

    #[test]
    fn test_amex_received_by_override() {
        let text = "American Express\nPayment must be received by: May 2, 2025\n";
        let found = DueDateExtractor::new()
            .extract(text, Some(Issuer::AmericanExpress))
            .unwrap();
        assert_eq!(found.value, "2025-05-02");
        assert_eq!(found.provenance.tier, Tier::Override);
        assert!(DueDateExtractor::new().extract(text, None).is_none());
    }

    #[test]
    fn test_due_date_fallback() {
        let found = DueDateExtractor::new().extract("Due 04/01/25\n", None).unwrap();
        assert_eq!(found.value, "2025-04-01");
        assert_eq!(found.provenance.tier, Tier::Fallback);
    }

    #[test]
    fn test_due_date_uses_default_year() {
        let extractor = DueDateExtractor::with_normalizer(DateNormalizer::new(2024));
        let found = extractor.extract("Pay by: March 3rd\n", None).unwrap();
        assert_eq!(found.value, "2024-03-03");
    }
}
