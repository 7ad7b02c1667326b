// Linear pipeline: fetch fares, fetch rate, convert, pair, rank, format, deliver
use crate::api::{FareQuery, FareSearch, MessageSender, RateSource};
use crate::config::RunConfig;
use crate::currency::localize_fares;
use crate::error::ScoutError;
use crate::fares::Fare;
use crate::pairing::pair_trips;
use crate::ranking::rank_by_month;
use crate::report::build_message;
use chrono::{Datelike, Months, NaiveDate};
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Idle,
    FetchingOutbound,
    FetchingReturn,
    FetchingRate,
    Normalizing,
    Pairing,
    Ranking,
    Formatting,
    Delivering,
    Done,
    Failed,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub message: String,
    pub outbound_fares: usize,
    pub return_fares: usize,
    pub exchange_rate: f64,
    pub trips: usize,
}

/// First day of the month of `today` through the day before the same day
/// `months` months later, both inclusive.
pub fn search_window(today: NaiveDate, months: u32) -> Result<(NaiveDate, NaiveDate), ScoutError> {
    let start = today
        .with_day(1)
        .ok_or_else(|| ScoutError::Config(format!("no first day for {}", today)))?;
    let end = start
        .checked_add_months(Months::new(months))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| ScoutError::Config(format!("{} months after {} is out of range", months, start)))?;
    Ok((start, end))
}

pub struct Orchestrator<'a> {
    config: &'a RunConfig,
    fare_search: &'a dyn FareSearch,
    rate_source: &'a dyn RateSource,
    messenger: &'a dyn MessageSender,
    stage: RunStage,
    failed_during: Option<RunStage>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        config: &'a RunConfig,
        fare_search: &'a dyn FareSearch,
        rate_source: &'a dyn RateSource,
        messenger: &'a dyn MessageSender,
    ) -> Self {
        Self {
            config,
            fare_search,
            rate_source,
            messenger,
            stage: RunStage::Idle,
            failed_during: None,
        }
    }

    pub fn stage(&self) -> RunStage {
        self.stage
    }

    // Stage that was active when the last run failed
    pub fn failed_during(&self) -> Option<RunStage> {
        self.failed_during
    }

    fn advance(&mut self, stage: RunStage) {
        debug!(from = ?self.stage, to = ?stage, "stage transition");
        self.stage = stage;
    }

    /// Runs the whole pipeline once, anchored at `today`. Stops at the first
    /// error; nothing is delivered unless every earlier stage succeeded.
    pub async fn run(&mut self, today: NaiveDate) -> Result<RunSummary, ScoutError> {
        self.stage = RunStage::Idle;
        self.failed_during = None;

        match self.execute(today).await {
            Ok(summary) => {
                self.advance(RunStage::Done);
                info!(trips = summary.trips, "report delivered");
                Ok(summary)
            }
            Err(err) => {
                error!(stage = ?self.stage, error = %err, "run failed");
                self.failed_during = Some(self.stage);
                self.stage = RunStage::Failed;
                Err(err)
            }
        }
    }

    async fn execute(&mut self, today: NaiveDate) -> Result<RunSummary, ScoutError> {
        let config = self.config;
        let (date_from, date_to) = search_window(today, config.lookahead_months)?;
        let destination = config.destination.as_str();

        self.advance(RunStage::FetchingOutbound);
        let mut outbound = Vec::new();
        for home in &config.home_airports {
            outbound.extend(self.fetch_fares(home, destination, date_from, date_to).await?);
        }

        self.advance(RunStage::FetchingReturn);
        let mut inbound = Vec::new();
        for home in &config.home_airports {
            inbound.extend(self.fetch_fares(destination, home, date_from, date_to).await?);
        }

        self.advance(RunStage::FetchingRate);
        let foreign = &config.foreign_currency;
        let rate = self
            .rate_source
            .exchange_rate(&foreign.code)
            .await
            .map_err(|e| ScoutError::from_fetch("exchange rates", foreign.code.clone(), e))?;
        info!(currency = %foreign.code, rate, "fetched exchange rate");

        self.advance(RunStage::Normalizing);
        let local = &config.local_currency;
        let outbound = localize_fares(outbound, rate, foreign, local)?;
        let inbound = localize_fares(inbound, rate, foreign, local)?;

        self.advance(RunStage::Pairing);
        let trips = pair_trips(&outbound, &inbound, config.window)?;
        info!(
            outbound = outbound.len(),
            inbound = inbound.len(),
            trips = trips.len(),
            "paired fares into trips"
        );

        self.advance(RunStage::Ranking);
        let buckets = rank_by_month(
            &trips,
            today,
            config.lookahead_months,
            config.offers_per_month,
        );

        self.advance(RunStage::Formatting);
        let message = build_message(&buckets);

        self.advance(RunStage::Delivering);
        self.messenger
            .send(&config.recipient, &message)
            .await
            .map_err(|source| ScoutError::Delivery { source })?;

        Ok(RunSummary {
            message,
            outbound_fares: outbound.len(),
            return_fares: inbound.len(),
            exchange_rate: rate,
            trips: trips.len(),
        })
    }

    async fn fetch_fares(
        &self,
        departure: &str,
        arrival: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Vec<Fare>, ScoutError> {
        let query = FareQuery {
            departure: departure.to_string(),
            arrival: arrival.to_string(),
            date_from,
            date_to,
        };

        let fares = self
            .fare_search
            .one_way_fares(&query)
            .await
            .map_err(|e| ScoutError::from_fetch("fare search", query.to_string(), e))?;
        info!(%query, count = fares.len(), "fetched fares");
        Ok(fares)
    }
}
