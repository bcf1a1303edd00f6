//! Issuer detection.
//!
//! First hit in [`Issuer::ALL`] order wins. There is no scoring: a statement
//! that names a second issuer in passing (a balance-transfer offer, or a word
//! such as "purchases" that contains "chase") can be misclassified.

use super::{ExtractionMatch, Provenance, Tier};
use crate::models::statement::Issuer;

const AMEX_ABBREVIATION: &str = "amex";

/// Detect the card issuer named in the statement text.
pub fn detect_issuer(text: &str) -> Option<Issuer> {
    detect_issuer_match(text).map(|m| m.value)
}

/// Detect the card issuer, reporting which marker matched and where.
pub fn detect_issuer_match(text: &str) -> Option<ExtractionMatch<Issuer>> {
    let lowered = text.to_ascii_lowercase();

    let hit = Issuer::ALL
        .into_iter()
        .find_map(|issuer| {
            lowered
                .find(issuer.marker())
                .map(|pos| (issuer, issuer.marker(), pos, Tier::Generic))
        })
        .or_else(|| {
            lowered.find(AMEX_ABBREVIATION).map(|pos| {
                (Issuer::AmericanExpress, AMEX_ABBREVIATION, pos, Tier::Fallback)
            })
        });

    hit.map(|(issuer, marker, pos, tier)| {
        let source = text.get(pos..pos + marker.len()).unwrap_or(marker);
        ExtractionMatch::new(issuer, Provenance::new(tier, marker), source)
            .with_position(pos, pos + marker.len())
    })
}
