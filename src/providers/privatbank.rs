use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use chrono::NaiveDate;

use crate::core::currency::CurrencySelection;
use crate::core::dates::DATE_FORMAT;
use crate::core::rates::{DailyOutcome, QuoteMap, RateQuote, RateSource};

/// Production endpoint of the PrivatBank public exchange rates archive.
pub const DEFAULT_BASE_URL: &str = "https://api.privatbank.ua";

const USER_AGENT: &str = "pbfx/1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// What took a single date down: the transport or the payload.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed exchange rate response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Exchange rate source backed by the PrivatBank `p24api` archive. One HTTP
/// client serves all concurrent per-date requests.
pub struct PrivatBankProvider {
    base_url: String,
    client: reqwest::Client,
}

impl PrivatBankProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(PrivatBankProvider {
            base_url: base_url.to_string(),
            client,
        })
    }

    async fn fetch_day(
        &self,
        date: NaiveDate,
        selection: &CurrencySelection,
    ) -> Result<QuoteMap, FetchError> {
        let url = format!(
            "{}/p24api/exchange_rates?json&date={}",
            self.base_url,
            date.format(DATE_FORMAT)
        );
        debug!("Requesting exchange rates from {}", url);

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body = response.text().await?;
        let payload: ExchangeRatesResponse = serde_json::from_str(&body)?;

        // Every selected currency gets a slot up front, so a currency the
        // payload never mentions still shows up as absent.
        let mut quotes: QuoteMap = selection
            .codes()
            .iter()
            .map(|code| (code.clone(), None))
            .collect();

        for entry in payload.exchange_rate {
            let Some(code) = entry.currency else {
                continue;
            };
            if !quotes.contains_key(&code) {
                continue;
            }
            if let (Some(sale), Some(purchase)) = (entry.sale_rate, entry.purchase_rate) {
                quotes.insert(code, Some(RateQuote { sale, purchase }));
            }
        }

        Ok(quotes)
    }
}

#[async_trait]
impl RateSource for PrivatBankProvider {
    #[instrument(name = "PrivatBankFetch", skip(self, selection), fields(date = %date))]
    async fn daily_rates(&self, date: NaiveDate, selection: &CurrencySelection) -> DailyOutcome {
        match self.fetch_day(date, selection).await {
            Ok(quotes) => DailyOutcome::Rates(quotes),
            Err(err) => {
                warn!(
                    "Rate fetch failed for {}: {}",
                    date.format(DATE_FORMAT),
                    err
                );
                DailyOutcome::Failed(format!("Failed to retrieve data: {err}"))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExchangeRatesResponse {
    #[serde(rename = "exchangeRate")]
    exchange_rate: Vec<ExchangeRateEntry>,
}

#[derive(Debug, Deserialize)]
struct ExchangeRateEntry {
    currency: Option<String>,
    #[serde(rename = "saleRate", default, deserialize_with = "flexible_rate")]
    sale_rate: Option<f64>,
    #[serde(rename = "purchaseRate", default, deserialize_with = "flexible_rate")]
    purchase_rate: Option<f64>,
}

/// Rates arrive as JSON numbers on most dates and as numeric strings on
/// some archive dates. Unparseable strings count as absent.
fn flexible_rate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRate {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<RawRate>::deserialize(deserializer)? {
        Some(RawRate::Number(value)) => Some(value),
        Some(RawRate::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::CurrencyCatalog;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RATES_BODY: &str = r#"{
        "date": "10.01.2024",
        "bank": "PB",
        "baseCurrency": 980,
        "baseCurrencyLit": "UAH",
        "exchangeRate": [
            {
                "baseCurrency": "UAH",
                "currency": "USD",
                "saleRateNB": 37.04,
                "purchaseRateNB": 37.04,
                "saleRate": 37.75,
                "purchaseRate": 37.25
            },
            {
                "baseCurrency": "UAH",
                "currency": "EUR",
                "saleRateNB": 40.52,
                "purchaseRateNB": 40.52,
                "saleRate": 41.4,
                "purchaseRate": 40.6
            },
            {
                "baseCurrency": "UAH",
                "currency": "PLN",
                "saleRateNB": 9.28,
                "purchaseRateNB": 9.28
            },
            {
                "baseCurrency": "UAH",
                "currency": "CHF",
                "saleRateNB": 43.47,
                "purchaseRateNB": 43.47,
                "saleRate": "44.1",
                "purchaseRate": "43.2"
            }
        ]
    }"#;

    async fn create_mock_server(body: &str, status: u16) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/p24api/exchange_rates"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn selection(extras: &[&str]) -> CurrencySelection {
        CurrencyCatalog::privatbank().select(extras).0
    }

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    #[tokio::test]
    async fn quotes_every_selected_currency() {
        let server = create_mock_server(RATES_BODY, 200).await;
        let provider = PrivatBankProvider::new(&server.uri()).unwrap();
        let selection = selection(&["chf", "pln", "jpy"]);

        let outcome = provider.daily_rates(test_date(), &selection).await;

        let DailyOutcome::Rates(quotes) = outcome else {
            panic!("expected rates, got {outcome:?}");
        };
        assert_eq!(quotes.len(), selection.len());
        assert!(selection.codes().iter().all(|code| quotes.contains_key(code)));
        assert_eq!(
            quotes["USD"],
            Some(RateQuote {
                sale: 37.75,
                purchase: 37.25
            })
        );
        assert_eq!(
            quotes["EUR"],
            Some(RateQuote {
                sale: 41.4,
                purchase: 40.6
            })
        );
    }

    #[tokio::test]
    async fn string_rates_are_parsed_as_numbers() {
        let server = create_mock_server(RATES_BODY, 200).await;
        let provider = PrivatBankProvider::new(&server.uri()).unwrap();

        let outcome = provider.daily_rates(test_date(), &selection(&["chf"])).await;

        let DailyOutcome::Rates(quotes) = outcome else {
            panic!("expected rates, got {outcome:?}");
        };
        assert_eq!(
            quotes["CHF"],
            Some(RateQuote {
                sale: 44.1,
                purchase: 43.2
            })
        );
    }

    #[tokio::test]
    async fn entry_without_cash_rates_is_reported_absent() {
        let server = create_mock_server(RATES_BODY, 200).await;
        let provider = PrivatBankProvider::new(&server.uri()).unwrap();

        let outcome = provider.daily_rates(test_date(), &selection(&["pln"])).await;

        let DailyOutcome::Rates(quotes) = outcome else {
            panic!("expected rates, got {outcome:?}");
        };
        // PLN only carries National Bank reference rates in the payload.
        assert_eq!(quotes["PLN"], None);
    }

    #[tokio::test]
    async fn currency_missing_from_payload_is_reported_absent() {
        let server = create_mock_server(RATES_BODY, 200).await;
        let provider = PrivatBankProvider::new(&server.uri()).unwrap();

        let outcome = provider.daily_rates(test_date(), &selection(&["jpy"])).await;

        let DailyOutcome::Rates(quotes) = outcome else {
            panic!("expected rates, got {outcome:?}");
        };
        assert_eq!(quotes["JPY"], None);
    }

    #[tokio::test]
    async fn unselected_payload_currencies_are_ignored() {
        let server = create_mock_server(RATES_BODY, 200).await;
        let provider = PrivatBankProvider::new(&server.uri()).unwrap();

        let outcome = provider.daily_rates(test_date(), &selection(&[])).await;

        let DailyOutcome::Rates(quotes) = outcome else {
            panic!("expected rates, got {outcome:?}");
        };
        let keys: Vec<_> = quotes.keys().cloned().collect();
        assert_eq!(keys, ["EUR", "USD"]);
    }

    #[tokio::test]
    async fn requests_carry_the_wire_formatted_date() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/p24api/exchange_rates"))
            .and(query_param("date", "05.03.2024"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RATES_BODY))
            .expect(1)
            .mount(&server)
            .await;
        let provider = PrivatBankProvider::new(&server.uri()).unwrap();

        let outcome = provider
            .daily_rates(
                NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
                &selection(&[]),
            )
            .await;

        assert!(matches!(outcome, DailyOutcome::Rates(_)));
    }

    #[tokio::test]
    async fn server_error_becomes_a_failed_outcome() {
        let server = create_mock_server("oops", 500).await;
        let provider = PrivatBankProvider::new(&server.uri()).unwrap();

        let outcome = provider.daily_rates(test_date(), &selection(&[])).await;

        let DailyOutcome::Failed(reason) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert!(reason.starts_with("Failed to retrieve data: request failed:"));
        assert!(reason.contains("500"));
    }

    #[tokio::test]
    async fn unreachable_server_becomes_a_failed_outcome() {
        let provider = PrivatBankProvider::new("http://127.0.0.1:9").unwrap();

        let outcome = provider.daily_rates(test_date(), &selection(&[])).await;

        let DailyOutcome::Failed(reason) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert!(reason.starts_with("Failed to retrieve data: request failed:"));
    }

    #[tokio::test]
    async fn malformed_body_becomes_a_failed_outcome() {
        let server = create_mock_server("this is not json", 200).await;
        let provider = PrivatBankProvider::new(&server.uri()).unwrap();

        let outcome = provider.daily_rates(test_date(), &selection(&[])).await;

        let DailyOutcome::Failed(reason) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert!(reason.contains("malformed exchange rate response"));
    }

    #[tokio::test]
    async fn body_without_exchange_rate_list_is_a_parse_failure() {
        let server = create_mock_server(r#"{"date": "10.01.2024", "bank": "PB"}"#, 200).await;
        let provider = PrivatBankProvider::new(&server.uri()).unwrap();

        let outcome = provider.daily_rates(test_date(), &selection(&[])).await;

        let DailyOutcome::Failed(reason) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert!(reason.contains("malformed exchange rate response"));
    }

    #[tokio::test]
    async fn entry_without_currency_code_is_skipped() {
        let body = r#"{
            "exchangeRate": [
                {"saleRate": 1.0, "purchaseRate": 2.0},
                {"currency": "USD", "saleRate": 37.75, "purchaseRate": 37.25}
            ]
        }"#;
        let server = create_mock_server(body, 200).await;
        let provider = PrivatBankProvider::new(&server.uri()).unwrap();

        let outcome = provider.daily_rates(test_date(), &selection(&[])).await;

        let DailyOutcome::Rates(quotes) = outcome else {
            panic!("expected rates, got {outcome:?}");
        };
        assert_eq!(
            quotes["USD"],
            Some(RateQuote {
                sale: 37.75,
                purchase: 37.25
            })
        );
        assert_eq!(quotes["EUR"], None);
    }
}
