//! One-shot printout of archived exchange rates.
use log::{info, warn};
use relay_common::Result;
use relay_common::currency::{Currency, with_basic};
use relay_common::exchange::ExchangeService;

/// Fetch `days` archived days for EUR, USD and `extra`, rendered as pretty JSON.
pub fn render_history(service: &ExchangeService, days: u8, extra: &[Currency]) -> Result<String> {
    let (currencies, skipped) = with_basic(extra);
    for currency in skipped {
        warn!("'{}' is already in the list", currency);
    }
    info!("Fetching {} days of {:?}", days, currencies);

    let snapshots = service.historical_rates(days, &currencies)?;
    Ok(serde_json::to_string_pretty(&snapshots)?)
}
