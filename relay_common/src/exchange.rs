//! Exchange snapshots built from the provider API.
//!
//! Two flavours are produced:
//! - the live snapshot, which forwards the provider payload unfiltered;
//! - the historical snapshot, one entry per day before today (most recent
//!   first), each restricted to the requested currencies.
//!
//! Days are counted back from the wall-clock time of the request, not from
//! midnight. A historical request is all-or-nothing: the first failing day
//! aborts it.
use std::collections::BTreeMap;

use chrono::{Local, NaiveDateTime, TimeDelta};
use log::{debug, error};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Number, Value};

use crate::currency::{BASIC_CURRENCIES, Currency};
use crate::error::RelayError;
use crate::http::FetchJson;
use crate::net::{ARCHIVE_RATES_URL, LIVE_RATES_URL};

/// Date label format used by the provider archive.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Sale and purchase price of one currency, kept exactly as the provider wrote them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rate {
    /// Price the bank sells at.
    pub sale: Number,
    /// Price the bank buys at.
    pub purchase: Number,
}

/// Rates of one archived day. Serializes as `{"DD.MM.YYYY": {"EUR": {...}, ...}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySnapshot {
    /// Day in `DD.MM.YYYY` format.
    pub date: String,
    /// Selected currencies found in the provider answer.
    pub rates: BTreeMap<Currency, Rate>,
}

impl Serialize for DaySnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.date, &self.rates)?;
        map.end()
    }
}

/// Provider endpoints.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Full URL of the current rates.
    pub live_url: String,
    /// Archive URL without query; the day is passed as `?date=`.
    pub archive_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            live_url: LIVE_RATES_URL.to_string(),
            archive_url: ARCHIVE_RATES_URL.to_string(),
        }
    }
}

impl ProviderConfig {
    /// URL of the archived rates for `date` (`DD.MM.YYYY`).
    pub fn archive_day_url(&self, date: &str) -> String {
        format!("{}?date={}", self.archive_url, date)
    }
}

#[derive(Deserialize)]
struct ArchiveResponse {
    #[serde(rename = "exchangeRate")]
    exchange_rate: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArchiveRate {
    sale_rate: Number,
    purchase_rate: Number,
}

/// Builds live and historical snapshots on top of a [`FetchJson`] source.
pub struct ExchangeService {
    fetcher: Box<dyn FetchJson>,
    provider: ProviderConfig,
}

impl ExchangeService {
    /// Create a service reading `provider` endpoints through `fetcher`.
    pub fn new(fetcher: impl FetchJson + 'static, provider: ProviderConfig) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            provider,
        }
    }

    /// Current provider payload as decoded JSON.
    pub fn live_rates(&self) -> Result<Value, RelayError> {
        self.fetcher.fetch_json(&self.provider.live_url)
    }

    /// Current provider payload re-serialized as text, or `None` if the
    /// provider could not be read. The failure is logged.
    pub fn live_snapshot(&self) -> Option<String> {
        match self.live_rates().and_then(|value| Ok(serde_json::to_string(&value)?)) {
            Ok(text) => Some(text),
            Err(e) => {
                error!("Live exchange request failed: {}", e);
                None
            }
        }
    }

    /// EUR/USD rates for each of the `days_back` days before now, as JSON
    /// text, or `None` if any day failed. The failure is logged.
    pub fn historical_snapshot(&self, days_back: u8) -> Option<String> {
        let result = self
            .historical_rates(days_back, &BASIC_CURRENCIES)
            .and_then(|days| Ok(serde_json::to_string(&days)?));
        match result {
            Ok(text) => Some(text),
            Err(e) => {
                error!("Historical exchange request failed: {}", e);
                None
            }
        }
    }

    /// Rates of `currencies` for each of the `days_back` days before now.
    pub fn historical_rates(
        &self,
        days_back: u8,
        currencies: &[Currency],
    ) -> Result<Vec<DaySnapshot>, RelayError> {
        self.historical_rates_at(Local::now().naive_local(), days_back, currencies)
    }

    /// Same as [`Self::historical_rates`] with an explicit local wall-clock time.
    pub fn historical_rates_at(
        &self,
        now: NaiveDateTime,
        days_back: u8,
        currencies: &[Currency],
    ) -> Result<Vec<DaySnapshot>, RelayError> {
        let mut days = Vec::with_capacity(usize::from(days_back));
        for date in day_labels(now, days_back) {
            let response = self
                .fetcher
                .fetch_json(&self.provider.archive_day_url(&date))?;
            let rates = extract_rates(response, currencies)?;
            debug!("{}: {} of {} currencies found", date, rates.len(), currencies.len());
            days.push(DaySnapshot { date, rates });
        }
        Ok(days)
    }
}

/// Archive labels of the `days_back` days before `now`, most recent first.
///
/// Days are counted on the wall clock, so a DST switch inside the window
/// neither skips nor repeats a date.
pub fn day_labels(now: NaiveDateTime, days_back: u8) -> Vec<String> {
    (1..=i64::from(days_back))
        .map(|offset| (now - TimeDelta::days(offset)).format(DATE_FORMAT).to_string())
        .collect()
}

/// Pick `currencies` out of an archive answer.
///
/// Entries for other currencies are skipped whatever their shape; a selected
/// currency without numeric `saleRate`/`purchaseRate` is an error.
pub fn extract_rates(
    response: Value,
    currencies: &[Currency],
) -> Result<BTreeMap<Currency, Rate>, RelayError> {
    let archive: ArchiveResponse = serde_json::from_value(response)
        .map_err(|e| RelayError::MalformedResponse(format!("no exchangeRate list: {}", e)))?;

    let mut rates = BTreeMap::new();
    for entry in archive.exchange_rate {
        let Some(currency) = entry
            .get("currency")
            .and_then(Value::as_str)
            .and_then(|code| code.parse::<Currency>().ok())
        else {
            continue;
        };
        if !currencies.contains(&currency) {
            continue;
        }
        let rate: ArchiveRate = serde_json::from_value(entry)
            .map_err(|e| RelayError::MalformedResponse(format!("{}: {}", currency, e)))?;
        rates.insert(
            currency,
            Rate {
                sale: rate.sale_rate,
                purchase: rate.purchase_rate,
            },
        );
    }
    Ok(rates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Serves canned documents by URL and records every request.
    #[derive(Default)]
    struct FakeProvider {
        documents: HashMap<String, Value>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl FakeProvider {
        fn with(mut self, url: &str, document: Value) -> Self {
            self.documents.insert(url.to_string(), document);
            self
        }
    }

    impl FetchJson for FakeProvider {
        fn fetch_json(&self, url: &str) -> Result<Value, RelayError> {
            self.calls.lock().unwrap().push(url.to_string());
            self.documents
                .get(url)
                .cloned()
                .ok_or_else(|| RelayError::RemoteStatus {
                    status: 404,
                    url: url.to_string(),
                })
        }
    }

    fn provider() -> ProviderConfig {
        ProviderConfig {
            live_url: "http://rates.test/pubinfo?exchange&coursid=5".to_string(),
            archive_url: "http://rates.test/exchange_rates".to_string(),
        }
    }

    fn archive_day(eur: f64, usd: f64) -> Value {
        json!({
            "date": "ignored",
            "exchangeRate": [
                {"baseCurrency": "UAH", "saleRateNB": 1.0},
                {"currency": "EUR", "saleRate": eur, "purchaseRate": eur - 1.0},
                {"currency": "GBP", "saleRate": 50.0, "purchaseRate": 49.0},
                {"currency": "USD", "saleRate": usd, "purchaseRate": usd - 0.5},
                {"currency": "XAU", "saleRateNB": "n/a"}
            ]
        })
    }

    fn at(year: i32, month: u32, day: u32, hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn noon_3_dec() -> NaiveDateTime {
        at(2024, 12, 3, 12, 0)
    }

    /// Answers the first request only; every later one fails.
    struct FirstDayOnly {
        calls: Mutex<usize>,
    }

    impl FetchJson for FirstDayOnly {
        fn fetch_json(&self, url: &str) -> Result<Value, RelayError> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if *calls == 1 {
                Ok(archive_day(42.0, 41.0))
            } else {
                Err(RelayError::RemoteStatus {
                    status: 500,
                    url: url.to_string(),
                })
            }
        }
    }

    #[test]
    fn live_snapshot_forwards_payload_unfiltered() {
        let payload = json!({"exchangeRate": [{"currency": "USD", "saleRate": 27, "purchaseRate": 26.5}]});
        let fake = FakeProvider::default().with(&provider().live_url, payload);
        let service = ExchangeService::new(fake, provider());

        let text = service.live_snapshot().unwrap();

        for fragment in [r#""currency":"USD""#, r#""saleRate":27"#, r#""purchaseRate":26.5"#] {
            assert!(text.contains(fragment), "{fragment} missing in {text}");
        }
        let round: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            round,
            json!({"exchangeRate": [{"currency": "USD", "saleRate": 27, "purchaseRate": 26.5}]})
        );
    }

    #[test]
    fn live_snapshot_failure_yields_none() {
        let service = ExchangeService::new(FakeProvider::default(), provider());

        assert_eq!(service.live_snapshot(), None);
    }

    #[test]
    fn historical_rates_go_back_from_yesterday() {
        let fake = FakeProvider::default()
            .with(&provider().archive_day_url("02.12.2024"), archive_day(42.0, 41.0))
            .with(&provider().archive_day_url("01.12.2024"), archive_day(43.0, 40.0));
        let calls = Arc::clone(&fake.calls);
        let service = ExchangeService::new(fake, provider());

        let days = service
            .historical_rates_at(noon_3_dec(), 2, &BASIC_CURRENCIES)
            .unwrap();

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "02.12.2024");
        assert_eq!(days[1].date, "01.12.2024");
        assert_eq!(
            days[0].rates.keys().copied().collect::<Vec<_>>(),
            vec![Currency::EUR, Currency::USD]
        );
        let usd = &days[1].rates[&Currency::USD];
        assert_eq!(usd.sale.as_f64(), Some(40.0));
        assert_eq!(usd.purchase.as_f64(), Some(39.5));
        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                "http://rates.test/exchange_rates?date=02.12.2024".to_string(),
                "http://rates.test/exchange_rates?date=01.12.2024".to_string(),
            ]
        );
    }

    #[test]
    fn historical_rates_cross_month_boundary() {
        let fake = FakeProvider::default()
            .with(&provider().archive_day_url("29.02.2024"), archive_day(1.0, 1.0));
        let service = ExchangeService::new(fake, provider());

        let days = service
            .historical_rates_at(at(2024, 3, 1, 12, 0), 1, &BASIC_CURRENCIES)
            .unwrap();

        assert_eq!(days[0].date, "29.02.2024");
    }

    #[test]
    fn day_labels_follow_the_wall_clock_across_dst_switch() {
        // Clocks in Kyiv jumped forward at 03:00 on 31.03.2024.
        assert_eq!(
            day_labels(at(2024, 4, 1, 0, 30), 2),
            vec!["31.03.2024".to_string(), "30.03.2024".to_string()]
        );
        // ...and back at 04:00 on 27.10.2024.
        assert_eq!(
            day_labels(at(2024, 10, 28, 23, 30), 3),
            vec![
                "27.10.2024".to_string(),
                "26.10.2024".to_string(),
                "25.10.2024".to_string(),
            ]
        );
        assert!(day_labels(noon_3_dec(), 0).is_empty());
    }

    #[test]
    fn day_labels_are_consecutive_days_for_every_start_hour() {
        for hour in 0..24 {
            let now = at(2024, 3, 31, hour, 15);
            let expected: Vec<String> = (1..=9)
                .map(|back| {
                    (now.date() - TimeDelta::days(back))
                        .format(DATE_FORMAT)
                        .to_string()
                })
                .collect();

            assert_eq!(day_labels(now, 9), expected, "start hour {hour}");
        }
    }

    #[test]
    fn historical_rates_stop_at_first_failure() {
        let fake = FakeProvider::default()
            .with(&provider().archive_day_url("02.12.2024"), archive_day(42.0, 41.0));
        let calls = Arc::clone(&fake.calls);
        let service = ExchangeService::new(fake, provider());

        let err = service
            .historical_rates_at(noon_3_dec(), 3, &BASIC_CURRENCIES)
            .unwrap_err();

        assert!(matches!(err, RelayError::RemoteStatus { status: 404, .. }));
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn historical_rates_honour_extra_currencies() {
        let fake = FakeProvider::default()
            .with(&provider().archive_day_url("02.12.2024"), archive_day(42.0, 41.0));
        let service = ExchangeService::new(fake, provider());

        let days = service
            .historical_rates_at(noon_3_dec(), 1, &[Currency::GBP, Currency::PLN])
            .unwrap();

        assert_eq!(days[0].rates.len(), 1);
        assert_eq!(days[0].rates[&Currency::GBP].sale.as_f64(), Some(50.0));
    }

    #[test]
    fn historical_snapshot_of_zero_days_is_empty_list() {
        let service = ExchangeService::new(FakeProvider::default(), provider());

        assert_eq!(service.historical_snapshot(0).as_deref(), Some("[]"));
    }

    #[test]
    fn historical_snapshot_with_failing_older_day_is_none() {
        let service = ExchangeService::new(
            FirstDayOnly {
                calls: Mutex::new(0),
            },
            provider(),
        );

        assert!(service.historical_snapshot(1).is_some());
        let service = ExchangeService::new(
            FirstDayOnly {
                calls: Mutex::new(0),
            },
            provider(),
        );
        assert_eq!(service.historical_snapshot(2), None);
    }

    #[test]
    fn day_snapshot_serializes_as_single_key_object() {
        let mut rates = BTreeMap::new();
        rates.insert(
            Currency::USD,
            Rate {
                sale: Number::from_f64(41.5).unwrap(),
                purchase: Number::from_f64(41.0).unwrap(),
            },
        );
        rates.insert(
            Currency::EUR,
            Rate {
                sale: Number::from(44),
                purchase: Number::from(43),
            },
        );
        let day = DaySnapshot {
            date: "02.12.2024".to_string(),
            rates,
        };

        assert_eq!(
            serde_json::to_string(&vec![day]).unwrap(),
            r#"[{"02.12.2024":{"EUR":{"sale":44,"purchase":43},"USD":{"sale":41.5,"purchase":41.0}}}]"#
        );
    }

    #[test]
    fn provider_numbers_are_kept_verbatim() {
        let response = json!({"exchangeRate": [
            {"currency": "USD", "saleRate": 27, "purchaseRate": 26.5}
        ]});

        let rates = extract_rates(response, &BASIC_CURRENCIES).unwrap();

        assert_eq!(
            serde_json::to_string(&rates).unwrap(),
            r#"{"USD":{"sale":27,"purchase":26.5}}"#
        );
    }

    #[test]
    fn selected_currency_without_rates_is_malformed() {
        let response = json!({"exchangeRate": [{"currency": "USD", "saleRateNB": 41.0}]});

        let err = extract_rates(response, &BASIC_CURRENCIES).unwrap_err();

        assert!(matches!(err, RelayError::MalformedResponse(_)));
    }

    #[test]
    fn body_without_rate_list_is_malformed() {
        let err = extract_rates(json!({"error": "limit"}), &BASIC_CURRENCIES).unwrap_err();

        assert!(matches!(err, RelayError::MalformedResponse(_)));
    }
}
