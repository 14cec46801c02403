//! Currency codes served by the exchange-rate provider.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Currencies every historical snapshot includes.
pub const BASIC_CURRENCIES: [Currency; 2] = [Currency::EUR, Currency::USD];

/// Set of supported currency codes.
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
)]
#[clap(rename_all = "UPPER")]
#[strum(ascii_case_insensitive)]
pub enum Currency {
    AUD,
    AZN,
    BYN,
    CAD,
    CHF,
    CNY,
    CZK,
    DKK,
    EUR,
    GBP,
    GEL,
    HUF,
    ILS,
    JPY,
    KZT,
    MDL,
    NOK,
    PLN,
    SEK,
    SGD,
    TMT,
    TRY,
    USD,
    UZS,
    XAU,
}

/// Build the currency selection for a snapshot: the basic currencies first,
/// then each extra code once. Returns the selection and the extras that were
/// dropped as duplicates.
pub fn with_basic(extra: &[Currency]) -> (Vec<Currency>, Vec<Currency>) {
    let mut selected = BASIC_CURRENCIES.to_vec();
    let mut skipped = Vec::new();
    for currency in extra {
        if selected.contains(currency) {
            skipped.push(*currency);
        } else {
            selected.push(*currency);
        }
    }
    (selected, skipped)
}
