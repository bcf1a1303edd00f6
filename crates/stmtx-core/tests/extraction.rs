//! End-to-end extraction over statement-shaped text.

use pretty_assertions::assert_eq;
use stmtx_core::{
    detect_issuer, extract_fields, CascadeParser, Field, FieldRecord, Issuer, StatementParser, Tier,
};

const CITI_STATEMENT: &str = "\
Citi Double Cash Card
Member Name: Alex Rivera
Account number XXXX XXXX XXXX 8830
Billing Period: 01/04/2025 - 02/03/2025
Minimum payment due
Payment Due Date: February 28, 2025
Current balance: $412.10
New balance: $1,004.55
";

const AMEX_STATEMENT: &str = "\
AMERICAN EXPRESS
PLATINUM CARD
ACCOUNT ENDING IN: 4321
CLOSING DATE 03/12/25
PAYMENT DUE: APRIL 6, 2025
NEW BALANCE $: 3,210.00
";

const BOA_STATEMENT: &str = "\
Priya Natarajan
1 Elm Street
Bank of America Customized Cash Rewards
Account number ending in: 2468
Activity 01/01/2025 - 01/31/2025
Due 02/25/2025
Total balance $88.40
";

fn record(issuer: Option<Issuer>, fields: [Option<&str>; 5]) -> FieldRecord {
    let [name, last4, period, due, balance] = fields.map(|f| f.map(str::to_string));
    FieldRecord {
        issuer,
        cardholder_name: name,
        card_last4: last4,
        statement_period: period,
        payment_due_date: due,
        new_balance: balance,
    }
}

#[test]
fn citi_statement() {
    assert_eq!(
        extract_fields(CITI_STATEMENT),
        record(
            Some(Issuer::Citi),
            [
                Some("Alex Rivera"),
                Some("8830"),
                Some("01/04/2025 - 02/03/2025"),
                Some("2025-02-28"),
                Some("$1004.55"),
            ]
        )
    );
}

#[test]
fn amex_statement_uses_overrides_and_fallbacks() {
    let result = CascadeParser::new().parse(AMEX_STATEMENT);

    assert_eq!(
        result.record,
        record(
            Some(Issuer::AmericanExpress),
            [None, Some("4321"), None, Some("2025-04-06"), Some("$3210.00")]
        )
    );
    assert_eq!(result.provenance[&Field::CardLast4].tier, Tier::Override);
    assert_eq!(result.provenance[&Field::NewBalance].tier, Tier::Fallback);
    assert_eq!(result.missing, vec![Field::CardholderName, Field::StatementPeriod]);
}

#[test]
fn boa_statement_with_unlabeled_fields() {
    let result = CascadeParser::new().with_default_year(Some(2025)).parse(BOA_STATEMENT);

    assert_eq!(
        result.record,
        record(
            Some(Issuer::BankOfAmerica),
            [
                Some("Priya Natarajan"),
                Some("2468"),
                Some("01/01/2025 to 01/31/2025"),
                Some("2025-02-25"),
                Some("$88.40"),
            ]
        )
    );
    assert_eq!(result.provenance[&Field::CardholderName].tier, Tier::Fallback);
    assert_eq!(result.provenance[&Field::StatementPeriod].tier, Tier::Fallback);
}

#[test]
fn every_key_is_always_present() {
    for text in ["", "nothing to see here", CITI_STATEMENT] {
        let json = serde_json::to_value(extract_fields(text)).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 6);
        for field in Field::ALL {
            assert!(obj.contains_key(field.key()), "missing key {}", field);
        }
    }
}

#[test]
fn no_recognizable_content_yields_empty_record() {
    let result = CascadeParser::new().parse("Lorem ipsum dolor sit amet\n42\n");
    assert_eq!(result.record, FieldRecord::default());
    assert_eq!(result.missing, Field::ALL.to_vec());
}

#[test]
fn extraction_is_idempotent() {
    assert_eq!(extract_fields(CITI_STATEMENT), extract_fields(CITI_STATEMENT));
    assert_eq!(extract_fields(AMEX_STATEMENT), extract_fields(AMEX_STATEMENT));
}

#[test]
fn issuer_priority_prefers_chase() {
    assert_eq!(detect_issuer("Citi card. Transfer balances from Chase."), Some(Issuer::Chase));
}

#[test]
fn five_digit_account_suffix_is_absent() {
    let fields = extract_fields("Card ending in 12345\n");
    assert_eq!(fields.card_last4, None);
}

#[test]
fn balance_needs_cents() {
    assert_eq!(extract_fields("New balance: $1,234.5").new_balance, None);
    assert_eq!(
        extract_fields("New balance: $1,234.56").new_balance.as_deref(),
        Some("$1234.56")
    );
}

#[test]
fn due_date_in_words() {
    assert_eq!(
        extract_fields("Payment due date: March 3, 2025").payment_due_date.as_deref(),
        Some("2025-03-03")
    );
}

#[test]
fn bare_date_range_becomes_period() {
    assert_eq!(
        extract_fields("01/01/2025 - 01/31/2025").statement_period.as_deref(),
        Some("01/01/2025 to 01/31/2025")
    );
}
