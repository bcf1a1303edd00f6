//! Balance extraction and amount parsing.

use super::cascade::{group, Cascade};
use super::patterns::{AMOUNT_TOKEN, NEW_BALANCE_FALLBACK_RULES, NEW_BALANCE_RULES};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::statement::{Field, Issuer};

/// Parse the first signed decimal in `s`, ignoring thousands separators.
pub fn parse_amount(s: &str) -> Option<f64> {
    let cleaned = s.replace(',', "");
    AMOUNT_TOKEN.find(&cleaned)?.as_str().parse().ok()
}

/// New balance extractor.
///
/// Values keep the matched digits as `$<digits>.<cents>`; the parsed float
/// only validates the capture.
pub struct BalanceExtractor;

impl BalanceExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BalanceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for BalanceExtractor {
    type Output = String;

    fn field(&self) -> Field {
        Field::NewBalance
    }

    fn extract(&self, text: &str, issuer: Option<Issuer>) -> Option<ExtractionMatch<String>> {
        Cascade::for_field(
            Field::NewBalance,
            issuer,
            NEW_BALANCE_RULES.as_slice(),
            NEW_BALANCE_FALLBACK_RULES.as_slice(),
        )
        .run(text, |caps| {
            let raw = group(caps, 1)?;
            parse_amount(raw)?;
            Some(format!("${}", raw.replace(',', "")))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::rules::Tier;

    fn balance(text: &str, issuer: Option<Issuer>) -> Option<String> {
        BalanceExtractor::new().extract(text, issuer).map(|m| m.value)
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,234.56"), Some(1234.56));
        assert_eq!(parse_amount("-12.5"), Some(-12.5));
        assert_eq!(parse_amount("Total 40"), Some(40.0));
        assert_eq!(parse_amount("no digits"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_balance_strips_separators() {
        assert_eq!(balance("New Balance: $1,234.56\n", None), Some("$1234.56".into()));
        assert_eq!(balance("Current balance 0.00", None), Some("$0.00".into()));
    }

    #[test]
    fn test_balance_needs_two_fraction_digits() {
        assert_eq!(balance("New balance: $1,234.5", None), None);
    }

    #[test]
    fn test_generic_label_order() {
        let text = "Current balance: $50.00\nNew balance: $75.25\n";
        assert_eq!(balance(text, None), Some("$75.25".into()));
    }

    #[test]
    fn test_chase_total_due_preferred() {
        let text = "New balance: $100.00\nTotal due: $150.00\n";

        let found = BalanceExtractor::new().extract(text, Some(Issuer::Chase)).unwrap();
        assert_eq!(found.value, "$150.00");
        assert_eq!(found.provenance.tier, Tier::Override);

        assert_eq!(balance(text, None), Some("$100.00".into()));
    }

    #[test]
    fn test_citi_override_tier() {
        let found = BalanceExtractor::new()
            .extract("New balance: $7.00", Some(Issuer::Citi))
            .unwrap();
        assert_eq!(found.value, "$7.00");
        assert_eq!(found.provenance.tier, Tier::Override);
    }

    #[test]
    fn test_balance_fallback() {
        let found = BalanceExtractor::new().extract("New Balance $: 12.00", None).unwrap();
        assert_eq!(found.value, "$12.00");
        assert_eq!(found.provenance.tier, Tier::Fallback);
    }
}
