// Currency conversion of fetched fares into the report currency
use crate::error::ScoutError;
use crate::fares::{Currency, Fare};
use serde::{Deserialize, Serialize};

// Data structures for the exchange rate JSON response
#[derive(Debug, Deserialize, Serialize)]
pub struct ExchangeRates {
    #[serde(default)]
    pub table: String,
    #[serde(default)]
    pub currency: String,
    pub code: String,
    pub rates: Vec<RateEntry>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateEntry {
    #[serde(default)]
    pub no: String,
    #[serde(default)]
    pub effective_date: String,
    pub mid: f64,
}

/// Rounds half away from zero to two decimal places.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn validate_rate(rate: f64) -> Result<f64, ScoutError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(ScoutError::InvalidRate(rate))
    }
}

/// Converts every fare with `rate` and relabels it in `local`.
///
/// Each price becomes `round_to_cents(value * rate)`. The rate must be finite
/// and positive; nothing is converted otherwise.
pub fn normalize_fares(fares: Vec<Fare>, rate: f64, local: &Currency) -> Result<Vec<Fare>, ScoutError> {
    let rate = validate_rate(rate)?;

    Ok(fares
        .into_iter()
        .map(|mut fare| {
            fare.price.value = round_to_cents(fare.price.value * rate);
            fare.price.currency_code = local.code.clone();
            fare.price.currency_symbol = local.symbol.clone();
            fare
        })
        .collect())
}

/// Brings a mixed collection into `local`, converting only fares priced in
/// `foreign`. Any other currency cannot be summed and is rejected.
pub fn localize_fares(
    fares: Vec<Fare>,
    rate: f64,
    foreign: &Currency,
    local: &Currency,
) -> Result<Vec<Fare>, ScoutError> {
    let rate = validate_rate(rate)?;

    let mut localized = Vec::with_capacity(fares.len());
    for fare in fares {
        if fare.price.currency_code == local.code {
            localized.push(fare);
        } else if fare.price.currency_code == foreign.code {
            localized.extend(normalize_fares(vec![fare], rate, local)?);
        } else {
            return Err(ScoutError::CurrencyMismatch {
                flight: fare.label(),
                expected: format!("{} or {}", local.code, foreign.code),
                found: fare.price.currency_code,
            });
        }
    }

    Ok(localized)
}
