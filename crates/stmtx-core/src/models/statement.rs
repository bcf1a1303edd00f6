//! Statement field record and issuer enumeration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Card issuers the extraction rules know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Issuer {
    Chase,
    BankOfAmerica,
    Citi,
    AmericanExpress,
    CapitalOne,
}

impl Issuer {
    /// All issuers in detection priority order.
    pub const ALL: [Issuer; 5] = [
        Issuer::Chase,
        Issuer::BankOfAmerica,
        Issuer::Citi,
        Issuer::AmericanExpress,
        Issuer::CapitalOne,
    ];

    /// Stable machine key, as serialized in a [`FieldRecord`].
    pub fn key(&self) -> &'static str {
        match self {
            Issuer::Chase => "chase",
            Issuer::BankOfAmerica => "bank_of_america",
            Issuer::Citi => "citi",
            Issuer::AmericanExpress => "american_express",
            Issuer::CapitalOne => "capital_one",
        }
    }

    /// Lower-case name as it appears in statement text.
    pub fn marker(&self) -> &'static str {
        match self {
            Issuer::Chase => "chase",
            Issuer::BankOfAmerica => "bank of america",
            Issuer::Citi => "citi",
            Issuer::AmericanExpress => "american express",
            Issuer::CapitalOne => "capital one",
        }
    }

    /// Human-readable institution name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Issuer::Chase => "Chase",
            Issuer::BankOfAmerica => "Bank of America",
            Issuer::Citi => "Citi",
            Issuer::AmericanExpress => "American Express",
            Issuer::CapitalOne => "Capital One",
        }
    }

    /// Parse an issuer from its key or its display name (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|issuer| {
            issuer.key() == s || issuer.marker() == s || (s == "amex" && *issuer == Issuer::AmericanExpress)
        })
    }
}

impl fmt::Display for Issuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The six fields of a statement record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Issuer,
    CardholderName,
    CardLast4,
    StatementPeriod,
    PaymentDueDate,
    NewBalance,
}

impl Field {
    /// All fields in canonical output order.
    pub const ALL: [Field; 6] = [
        Field::Issuer,
        Field::CardholderName,
        Field::CardLast4,
        Field::StatementPeriod,
        Field::PaymentDueDate,
        Field::NewBalance,
    ];

    /// Output key of this field.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Issuer => "issuer",
            Field::CardholderName => "cardholder_name",
            Field::CardLast4 => "card_last4",
            Field::StatementPeriod => "statement_period",
            Field::PaymentDueDate => "payment_due_date",
            Field::NewBalance => "new_balance",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Fields extracted from one statement.
///
/// Every field is independently optional. Serialization always emits all six
/// keys; absent values are written as `null`, never omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    /// Detected card issuer.
    pub issuer: Option<Issuer>,

    /// Primary cardholder, at most 50 characters.
    pub cardholder_name: Option<String>,

    /// Last four digits of the card number.
    pub card_last4: Option<String>,

    /// Billing cycle, as captured or as `"<start> to <end>"`.
    pub statement_period: Option<String>,

    /// Payment due date in `YYYY-MM-DD` form.
    pub payment_due_date: Option<String>,

    /// Statement balance in `$1234.56` form.
    pub new_balance: Option<String>,
}

impl FieldRecord {
    /// Get the value of a field as text.
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Issuer => self.issuer.as_ref().map(Issuer::key),
            Field::CardholderName => self.cardholder_name.as_deref(),
            Field::CardLast4 => self.card_last4.as_deref(),
            Field::StatementPeriod => self.statement_period.as_deref(),
            Field::PaymentDueDate => self.payment_due_date.as_deref(),
            Field::NewBalance => self.new_balance.as_deref(),
        }
    }

    /// All six `(key, value)` pairs in canonical order.
    pub fn entries(&self) -> [(&'static str, Option<&str>); 6] {
        Field::ALL.map(|field| (field.key(), self.get(field)))
    }

    /// Fields that were not populated.
    pub fn missing(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_none())
            .collect()
    }

    /// Number of populated fields.
    pub fn populated_count(&self) -> usize {
        Field::ALL.len() - self.missing().len()
    }

    /// Check if no field was populated.
    pub fn is_empty(&self) -> bool {
        self.populated_count() == 0
    }
}
