// Round-trip fare scout: finds the cheapest trips per month and reports them

// Export modules for each pipeline stage
pub mod api;
pub mod config;
pub mod currency;
pub mod error;
pub mod fares;
pub mod orchestrator;
pub mod pairing;
pub mod ranking;
pub mod report;

// Re-export key types for convenience
pub use api::{
    ClientConfig, FareQuery, FareSearch, MessageSender, NbpRateClient, RateSource, RyanairClient,
    TelegramClient,
};
pub use config::{Args, RunConfig};
pub use currency::{localize_fares, normalize_fares};
pub use error::{ApiError, ScoutError};
pub use fares::{Airport, Currency, Fare, Price};
pub use orchestrator::{Orchestrator, RunStage, RunSummary};
pub use pairing::{pair_trips, DurationWindow, TripCandidate};
pub use ranking::{rank_by_month, MonthBucket};
pub use report::build_message;
