// HTTP collaborators: fare search, exchange rates and message delivery
use crate::currency::ExchangeRates;
use crate::error::ApiError;
use crate::fares::{Fare, FareSearchResponse};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_FARE_SEARCH_URL: &str = "https://www.ryanair.com";
pub const DEFAULT_EXCHANGE_RATE_URL: &str = "https://api.nbp.pl";
pub const DEFAULT_MESSAGING_URL: &str = "https://api.telegram.org";
pub const DEFAULT_TIMEOUT_MS: u64 = 20_000;

// The rate API rejects requests without a browser-like agent
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_7_5) AppleWebKit/537.11 (KHTML, like Gecko) Chrome/23.0.1271.64 Safari/537.11";

const ALL_WEEKDAYS: &str = "MONDAY,TUESDAY,WEDNESDAY,THURSDAY,FRIDAY,SATURDAY,SUNDAY";

// Client configuration shared by all collaborators
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub fare_search_url: String,
    pub exchange_rate_url: String,
    pub messaging_url: String,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            fare_search_url: DEFAULT_FARE_SEARCH_URL.to_string(),
            exchange_rate_url: DEFAULT_EXCHANGE_RATE_URL.to_string(),
            messaging_url: DEFAULT_MESSAGING_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    fn http_client(&self) -> Result<reqwest::Client, ApiError> {
        reqwest::Client::builder()
            .timeout(Duration::from_millis(self.timeout_ms))
            .user_agent(self.user_agent.clone())
            .build()
            .map_err(|e| ApiError::NetworkError(e.to_string()))
    }

    fn map_transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.timeout_ms)
        } else {
            // without_url keeps credentials embedded in the path out of the message
            ApiError::NetworkError(err.without_url().to_string())
        }
    }
}

// One leg of a search: departure airport, arrival airport, inclusive date range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FareQuery {
    pub departure: String,
    pub arrival: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

impl fmt::Display for FareQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}->{} {}..{}",
            self.departure, self.arrival, self.date_from, self.date_to
        )
    }
}

#[async_trait]
pub trait FareSearch: Send + Sync {
    async fn one_way_fares(&self, query: &FareQuery) -> Result<Vec<Fare>, ApiError>;
}

#[async_trait]
pub trait RateSource: Send + Sync {
    // Today's mid rate of `currency_code` in local currency units
    async fn exchange_rate(&self, currency_code: &str) -> Result<f64, ApiError>;
}

#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, recipient: &str, text: &str) -> Result<(), ApiError>;
}

pub fn parse_fares(body: &str) -> Result<Vec<Fare>, ApiError> {
    let response: FareSearchResponse =
        serde_json::from_str(body).map_err(|e| ApiError::MalformedBody(e.to_string()))?;
    Ok(response.into())
}

pub fn parse_rate(body: &str) -> Result<f64, ApiError> {
    let rates: ExchangeRates =
        serde_json::from_str(body).map_err(|e| ApiError::MalformedBody(e.to_string()))?;

    rates
        .rates
        .first()
        .map(|rate| rate.mid)
        .ok_or_else(|| ApiError::MalformedBody(format!("no rates listed for {}", rates.code)))
}

// Reads the body of a successful response, or turns the status into an error
async fn read_body(config: &ClientConfig, response: reqwest::Response) -> Result<String, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ApiError::ApiResponseError {
            status_code: status.as_u16(),
            message: if message.is_empty() {
                status.canonical_reason().unwrap_or("Unknown").to_string()
            } else {
                message
            },
        });
    }

    response
        .text()
        .await
        .map_err(|e| config.map_transport_error(e))
}

pub struct RyanairClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl RyanairClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = config.http_client()?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl FareSearch for RyanairClient {
    async fn one_way_fares(&self, query: &FareQuery) -> Result<Vec<Fare>, ApiError> {
        let url = format!("{}/api/farfnd/v4/oneWayFares", self.config.fare_search_url);
        let date_from = query.date_from.format("%Y-%m-%d").to_string();
        let date_to = query.date_to.format("%Y-%m-%d").to_string();

        debug!(%query, "requesting one-way fares");
        let response = self
            .http
            .get(&url)
            .query(&[
                ("departureAirportIataCode", query.departure.as_str()),
                ("arrivalAirportIataCode", query.arrival.as_str()),
                ("outboundDepartureDateFrom", date_from.as_str()),
                ("outboundDepartureDateTo", date_to.as_str()),
                ("market", "pl-pl"),
                ("adultPaxCount", "1"),
                ("searchMode", "ALL"),
                ("outboundDepartureDaysOfWeek", ALL_WEEKDAYS),
                ("outboundDepartureTimeFrom", "00:00"),
                ("outboundDepartureTimeTo", "23:59"),
            ])
            .send()
            .await
            .map_err(|e| self.config.map_transport_error(e))?;

        let body = read_body(&self.config, response).await?;
        parse_fares(&body)
    }
}

pub struct NbpRateClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl NbpRateClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = config.http_client()?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl RateSource for NbpRateClient {
    async fn exchange_rate(&self, currency_code: &str) -> Result<f64, ApiError> {
        let url = format!(
            "{}/api/exchangerates/rates/a/{}/last/1/?format=json",
            self.config.exchange_rate_url,
            currency_code.to_lowercase()
        );

        debug!(currency = currency_code, "requesting exchange rate");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.config.map_transport_error(e))?;

        let body = read_body(&self.config, response).await?;
        parse_rate(&body)
    }
}

pub struct TelegramClient {
    config: ClientConfig,
    http: reqwest::Client,
    bot_token: String,
}

impl TelegramClient {
    pub fn new(config: ClientConfig, bot_token: &str) -> Result<Self, ApiError> {
        let http = config.http_client()?;
        Ok(Self {
            config,
            http,
            bot_token: bot_token.to_string(),
        })
    }
}

#[async_trait]
impl MessageSender for TelegramClient {
    async fn send(&self, recipient: &str, text: &str) -> Result<(), ApiError> {
        let url = format!("{}/bot{}/sendMessage", self.config.messaging_url, self.bot_token);

        debug!(recipient, length = text.len(), "sending message");
        let response = self
            .http
            .post(&url)
            .form(&[("chat_id", recipient), ("text", text)])
            .send()
            .await
            .map_err(|e| self.config.map_transport_error(e))?;

        read_body(&self.config, response).await.map(|_| ())
    }
}
