//! Card last-4 digits extraction.

use super::cascade::{group, Cascade};
use super::patterns::CARD_LAST4_RULES;
use super::{ExtractionMatch, FieldExtractor};
use crate::models::statement::{Field, Issuer};

/// Card last-4 field extractor.
pub struct CardLast4Extractor;

impl CardLast4Extractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CardLast4Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CardLast4Extractor {
    type Output = String;

    fn field(&self) -> Field {
        Field::CardLast4
    }

    fn extract(&self, text: &str, issuer: Option<Issuer>) -> Option<ExtractionMatch<String>> {
        Cascade::for_field(Field::CardLast4, issuer, CARD_LAST4_RULES.as_slice(), &[]).run(text, |caps| {
            group(caps, 1)
                .filter(|digits| digits.len() == 4 && digits.bytes().all(|b| b.is_ascii_digit()))
                .map(str::to_string)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::rules::Tier;

    fn last4(text: &str, issuer: Option<Issuer>) -> Option<String> {
        CardLast4Extractor::new().extract(text, issuer).map(|m| m.value)
    }

    #[test]
    fn test_generic_variants() {
        assert_eq!(last4("Visa card ending in 1234", None), Some("1234".into()));
        assert_eq!(last4("Card ending: 5678", None), Some("5678".into()));
        assert_eq!(last4("Card number **** **** **** 9012", None), Some("9012".into()));
        assert_eq!(last4("Rewards card (3456)", None), Some("3456".into()));
        assert_eq!(last4("Account ****7890", None), Some("7890".into()));
        assert_eq!(last4("Card no. XXXX XXXX XXXX 0042", None), Some("0042".into()));
    }

    #[test]
    fn test_leading_zeros_preserved() {
        assert_eq!(last4("ending in 0007", None), Some("0007".into()));
    }

    #[test]
    fn test_five_digit_group_rejected() {
        assert_eq!(last4("Account ending in 12345", None), None);
    }

    #[test]
    fn test_amex_override_when_generic_misses() {
        let text = "American Express\nAccount Ending in: 4321";
        let found = CardLast4Extractor::new()
            .extract(text, Some(Issuer::AmericanExpress))
            .unwrap();

        assert_eq!(found.value, "4321");
        assert_eq!(found.provenance.tier, Tier::Override);
        assert_eq!(last4(text, None), None);
    }

    #[test]
    fn test_boa_account_number_override() {
        let text = "Bank of America\nAccount number ending in: 2468";
        assert_eq!(last4(text, Some(Issuer::BankOfAmerica)), Some("2468".into()));
        assert_eq!(last4(text, Some(Issuer::Citi)), None);
    }

    #[test]
    fn test_capital_one_override() {
        let text = "Capital One Quicksilver\nAccount ending in: 7788\n";
        let found = CardLast4Extractor::new()
            .extract(text, Some(Issuer::CapitalOne))
            .unwrap();

        assert_eq!(found.value, "7788");
        assert_eq!(found.provenance.rule, "Capital One Account ending in");
        assert_eq!(last4(text, None), None);
    }

    #[test]
    fn test_generic_wins_over_fill_override() {
        let text = "Account ending in: 1111\nCard ending in 2222";
        let found = CardLast4Extractor::new()
            .extract(text, Some(Issuer::CapitalOne))
            .unwrap();
        assert_eq!(found.value, "2222");
        assert_eq!(found.provenance.tier, Tier::Generic);
    }
}
