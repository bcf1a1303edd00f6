//! Common regex patterns for credit-card statement extraction.
//!
//! Labeled rules are compiled case-insensitive with `.` matching newlines;
//! `[\s:]*` after a label lets the value sit on the following line.

use lazy_static::lazy_static;
use regex::Regex;

use super::cascade::Rule;

lazy_static! {
    // Card last 4 digits. Trailing `\b` keeps 5+ digit runs out.
    pub static ref CARD_LAST4_RULES: Vec<Rule> = vec![
        Rule::new("ending in", r"ending in\s*(\d{4})\b"),
        Rule::new("ending:", r"ending:\s*(\d{4})\b"),
        Rule::new("masked **", r"\*{2,}\s*(\d{4})\b"),
        Rule::new("digits before )", r"\b(\d{4})\s*\)"),
        Rule::new("Account ***", r"Account\s+\*{3,}(\d{4})\b"),
        Rule::new("card ending in", r"card\s+ending\s+in\s+(\d{4})\b"),
        Rule::new("masked x", r"x+\s*(\d{4})\b"),
    ];

    // Cardholder name
    pub static ref CARDHOLDER_NAME_RULES: Vec<Rule> = vec![
        Rule::new("Account holder", r"Account holder[\s:]*([A-Z][A-Za-z\- ,\.]+)"),
        Rule::new("Account summary for", r"Account summary for[\s:]*([A-Z][A-Za-z\- ,\.]+)"),
        Rule::new("Statement for", r"Statement for[\s:]*([A-Z][A-Za-z\- ,\.]+)"),
        Rule::new("Cardholder", r"Cardholder[\s:]*([A-Z][A-Za-z\- ,\.]+)"),
        Rule::new("Member Name", r"Member Name[\s:]*([A-Z][A-Za-z\- ,\.]+)"),
    ];

    /// Unlabeled name line: two capitalized words. Case-sensitive.
    pub static ref NAME_LINE: Regex = Regex::new(
        r"^[A-Z][a-z]+\s+[A-Z][a-z]+"
    ).expect("invalid name line pattern");

    pub static ref CORPORATE_SUFFIX: Regex = Regex::new(
        r"(?i)\s+(?:LLC|INC|CORP|LTD)\b.*$"
    ).expect("invalid corporate suffix pattern");

    // Statement period
    pub static ref STATEMENT_PERIOD_RULES: Vec<Rule> = vec![
        Rule::new("Statement period", r"Statement period[\s:]*([A-Za-z0-9 ,\-/]+)"),
        Rule::new("Billing period", r"Billing period[\s:]*([A-Za-z0-9 ,\-/]+)"),
        Rule::new("Statement closing date", r"Statement closing date[\s:]*([A-Za-z0-9 ,\-/]+)"),
        Rule::new("Billing cycle", r"Billing cycle[\s:]*([A-Za-z0-9 ,\-/]+)"),
    ];

    pub static ref STATEMENT_PERIOD_FALLBACK_RULES: Vec<Rule> = vec![
        Rule::new("From .. to ..", r"\bFrom[ \t]+([A-Za-z0-9, ]+?)[ \t]+to[ \t]+([A-Za-z0-9, ]+)"),
        Rule::new("date range", r"(\d{1,2}/\d{1,2}/\d{2,4})\s*-\s*(\d{1,2}/\d{1,2}/\d{2,4})"),
    ];

    // Payment due date
    pub static ref DUE_DATE_RULES: Vec<Rule> = vec![
        Rule::new("Payment due date", r"Payment due date[\s:]*([A-Za-z0-9 ,/\-]+)"),
        Rule::new("Due date", r"Due date[\s:]*([A-Za-z0-9 ,/\-]+)"),
        Rule::new("Payment due", r"Payment due[\s:]*([A-Za-z0-9 ,/\-]+)"),
        Rule::new("Pay by", r"Pay by[\s:]*([A-Za-z0-9 ,/\-]+)"),
    ];

    pub static ref DUE_DATE_FALLBACK_RULES: Vec<Rule> = vec![
        Rule::new("Due", r"Due[\s:]*([A-Za-z0-9,\-/]+)"),
    ];

    // New balance. Amounts need exactly two fraction digits.
    pub static ref NEW_BALANCE_RULES: Vec<Rule> = vec![
        Rule::new("New balance", r"New balance[\s:]*\$?\s*(\d[\d,]*\.\d{2})\b"),
        Rule::new("New account balance", r"New account balance[\s:]*\$?\s*(\d[\d,]*\.\d{2})\b"),
        Rule::new("Current balance", r"Current balance[\s:]*\$?\s*(\d[\d,]*\.\d{2})\b"),
        Rule::new("Total balance", r"Total balance[\s:]*\$?\s*(\d[\d,]*\.\d{2})\b"),
        Rule::new("Amount due", r"Amount due[\s:]*\$?\s*(\d[\d,]*\.\d{2})\b"),
        Rule::new("Total due", r"Total due[\s:]*\$?\s*(\d[\d,]*\.\d{2})\b"),
    ];

    pub static ref NEW_BALANCE_FALLBACK_RULES: Vec<Rule> = vec![
        Rule::new(
            "balance keyword",
            r"(?:New balance|Current balance|Total balance|Amount due|New account balance)[\s:\$]*(\d[\d,]*\.\d{2})\b",
        ),
    ];

    // Amount normalization: first signed decimal token.
    pub static ref AMOUNT_TOKEN: Regex = Regex::new(
        r"[-+]?\d+(?:\.\d{1,2})?"
    ).expect("invalid amount token pattern");

    // Date normalization
    pub static ref DATE_ISO: Regex = Regex::new(
        r"\b(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})\b"
    ).expect("invalid ISO date pattern");

    pub static ref DATE_US: Regex = Regex::new(
        r"\b(\d{1,2})[-/.](\d{1,2})[-/.](\d{4}|\d{2})\b"
    ).expect("invalid US date pattern");

    pub static ref DATE_MONTH_FIRST: Regex = Regex::new(concat!(
        r"(?i)\b(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?",
        r"|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\b\.?\s+",
        r"(\d{1,2})(?:st|nd|rd|th)?\b(?:,?\s*(\d{4})\b)?"
    )).expect("invalid month-first date pattern");

    pub static ref DATE_DAY_FIRST: Regex = Regex::new(concat!(
        r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+(?:of\s+)?",
        r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?",
        r"|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\b\.?(?:,?\s*(\d{4})\b)?"
    )).expect("invalid day-first date pattern");

    pub static ref DATE_MONTH_DAY: Regex = Regex::new(
        r"\b(\d{1,2})/(\d{1,2})\b"
    ).expect("invalid month/day pattern");
}
