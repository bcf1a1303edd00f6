//! Issuer-specific rule overrides.
//!
//! Each issuer has a profile listing extra rules per field. Overrides add to
//! the generic rules; they never prevent other fields from being extracted.

use lazy_static::lazy_static;
use serde::Serialize;

use super::cascade::Rule;
use crate::models::statement::{Field, Issuer};

/// Where an override tier sits relative to the generic tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Precedence {
    /// Tried before the generic rules.
    Prefer,
    /// Tried only when the generic rules found nothing.
    Fill,
}

/// Extra rules an issuer adds for one field.
#[derive(Debug)]
pub struct FieldOverride {
    pub field: Field,
    pub precedence: Precedence,
    pub rules: Vec<Rule>,
}

/// All overrides of one issuer.
#[derive(Debug)]
pub struct IssuerProfile {
    pub issuer: Issuer,
    pub overrides: Vec<FieldOverride>,
}

impl IssuerProfile {
    /// Rules for `field` at the given precedence (empty if none).
    pub fn rules(&self, field: Field, precedence: Precedence) -> &[Rule] {
        self.overrides
            .iter()
            .find(|o| o.field == field && o.precedence == precedence)
            .map(|o| o.rules.as_slice())
            .unwrap_or(&[])
    }

    /// Fields this issuer overrides.
    pub fn fields(&self) -> Vec<Field> {
        self.overrides.iter().map(|o| o.field).collect()
    }
}

fn fill(field: Field, rules: Vec<Rule>) -> FieldOverride {
    FieldOverride {
        field,
        precedence: Precedence::Fill,
        rules,
    }
}

fn prefer(field: Field, rules: Vec<Rule>) -> FieldOverride {
    FieldOverride {
        field,
        precedence: Precedence::Prefer,
        rules,
    }
}

lazy_static! {
    static ref PROFILES: Vec<IssuerProfile> = vec![
        IssuerProfile {
            issuer: Issuer::Chase,
            overrides: vec![
                prefer(Field::NewBalance, vec![
                    Rule::new("Chase Total due", r"Total due[\s:]*\$?\s*(\d[\d,]*\.\d{2})\b"),
                    Rule::new("Chase Amount due", r"Amount due[\s:]*\$?\s*(\d[\d,]*\.\d{2})\b"),
                ]),
                fill(Field::StatementPeriod, vec![
                    Rule::new("Chase Opening/Closing Date", r"Opening/Closing Date[\s:]*([0-9 /\-]+)"),
                ]),
                fill(Field::PaymentDueDate, vec![
                    Rule::new("Chase Due by", r"\bDue by[\s:]*([A-Za-z0-9 ,/\-]+)"),
                ]),
            ],
        },
        IssuerProfile {
            issuer: Issuer::BankOfAmerica,
            overrides: vec![
                fill(Field::CardLast4, vec![
                    Rule::new("BoA Account number ending in", r"Account number ending in[\s:]*(\d{4})\b"),
                ]),
            ],
        },
        IssuerProfile {
            issuer: Issuer::Citi,
            overrides: vec![
                prefer(Field::NewBalance, vec![
                    Rule::new("Citi New balance", r"New balance[\s:]*\$?\s*(\d[\d,]*\.\d{2})\b"),
                ]),
            ],
        },
        IssuerProfile {
            issuer: Issuer::AmericanExpress,
            overrides: vec![
                fill(Field::CardLast4, vec![
                    Rule::new("Amex Account ending in", r"Account ending in[\s:]*(\d{4})\b"),
                ]),
                fill(Field::PaymentDueDate, vec![
                    Rule::new("Amex Payment must be received by", r"Payment must be received by[\s:]*([A-Za-z0-9 ,/\-]+)"),
                ]),
            ],
        },
        IssuerProfile {
            issuer: Issuer::CapitalOne,
            overrides: vec![
                fill(Field::CardLast4, vec![
                    Rule::new("Capital One Account ending in", r"Account ending in[\s:]*(\d{4})\b"),
                ]),
            ],
        },
    ];
}

/// Profile of an issuer.
pub fn profile(issuer: Issuer) -> Option<&'static IssuerProfile> {
    PROFILES.iter().find(|p| p.issuer == issuer)
}

/// Override rules for `field`, or an empty slice when the issuer is unknown
/// or has none.
pub fn override_rules(issuer: Option<Issuer>, field: Field, precedence: Precedence) -> &'static [Rule] {
    issuer
        .and_then(profile)
        .map(|p| p.rules(field, precedence))
        .unwrap_or(&[])
}
