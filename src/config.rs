// Command-line arguments and the immutable run configuration built from them
use crate::api::ClientConfig;
use crate::error::ScoutError;
use crate::fares::Currency;
use crate::pairing::DurationWindow;
use crate::ranking::{DEFAULT_LOOKAHEAD_MONTHS, DEFAULT_OFFERS_PER_MONTH, MAX_LOOKAHEAD_MONTHS};
use clap::Parser;

pub const DEFAULT_MIN_TRIP_DAYS: u32 = 3;
pub const DEFAULT_MAX_TRIP_DAYS: u32 = 15;
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

// Parsed command-line arguments
#[derive(Debug, Parser)]
#[command(version, about = "Finds the cheapest round trips per month and sends them to a chat", long_about = None)]
pub struct Args {
    /// Chat that receives the report. Group chat ids are negative.
    #[arg(allow_negative_numbers = true)]
    pub recipient: String,

    /// Bot token used to deliver the report.
    pub bot_token: String,

    /// Trips must last longer than this many days. Requires MAX_DAYS.
    #[arg(requires = "max_days")]
    pub min_days: Option<u32>,

    /// Trips must last shorter than this many days.
    #[arg(requires = "min_days")]
    pub max_days: Option<u32>,

    /// Home airport IATA code; repeat for every airport serving the home city.
    #[arg(long = "home-airport", default_values_t = ["WMI".to_string(), "WAW".to_string()])]
    pub home_airports: Vec<String>,

    /// Destination airport IATA code.
    #[arg(long, default_value = "ALC")]
    pub destination: String,

    /// Number of months covered by the report, starting with the current one.
    #[arg(long, default_value_t = DEFAULT_LOOKAHEAD_MONTHS)]
    pub months: u32,

    /// Cheapest trips listed per month.
    #[arg(long, default_value_t = DEFAULT_OFFERS_PER_MONTH)]
    pub offers_per_month: usize,

    /// Timeout for each HTTP request, in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

#[derive(Clone)]
pub struct RunConfig {
    pub recipient: String,
    pub bot_token: String,
    pub window: DurationWindow,
    pub home_airports: Vec<String>,
    pub destination: String,
    pub lookahead_months: u32,
    pub offers_per_month: usize,
    pub local_currency: Currency,
    pub foreign_currency: Currency,
    pub client: ClientConfig,
}

// Keeps the bot token out of logs
impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("recipient", &self.recipient)
            .field("window", &self.window)
            .field("home_airports", &self.home_airports)
            .field("destination", &self.destination)
            .field("lookahead_months", &self.lookahead_months)
            .field("offers_per_month", &self.offers_per_month)
            .field("local_currency", &self.local_currency)
            .field("foreign_currency", &self.foreign_currency)
            .finish_non_exhaustive()
    }
}

fn airport_code(code: &str) -> Result<String, ScoutError> {
    let code = code.trim().to_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ScoutError::Config(format!(
            "'{}' is not a three-letter airport code",
            code
        )));
    }
    Ok(code)
}

impl TryFrom<Args> for RunConfig {
    type Error = ScoutError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        if args.recipient.trim().is_empty() {
            return Err(ScoutError::Config("recipient must not be empty".to_string()));
        }
        if args.bot_token.trim().is_empty() {
            return Err(ScoutError::Config("bot token must not be empty".to_string()));
        }

        let window = match (args.min_days, args.max_days) {
            (Some(min_days), Some(max_days)) => DurationWindow::new(min_days, max_days)?,
            (None, None) => DurationWindow::new(DEFAULT_MIN_TRIP_DAYS, DEFAULT_MAX_TRIP_DAYS)?,
            _ => {
                return Err(ScoutError::Config(
                    "minimum and maximum trip length must be given together".to_string(),
                ))
            }
        };

        if args.home_airports.is_empty() {
            return Err(ScoutError::Config("at least one home airport is required".to_string()));
        }
        let home_airports = args
            .home_airports
            .iter()
            .map(|code| airport_code(code))
            .collect::<Result<Vec<_>, _>>()?;
        let destination = airport_code(&args.destination)?;

        if args.months == 0 {
            return Err(ScoutError::Config("months must be greater than 0".to_string()));
        }
        // Buckets are keyed by month name, so a longer window would repeat months
        if args.months > MAX_LOOKAHEAD_MONTHS {
            return Err(ScoutError::Config(format!(
                "months must be at most {}, got {}",
                MAX_LOOKAHEAD_MONTHS, args.months
            )));
        }
        if args.offers_per_month == 0 {
            return Err(ScoutError::Config("offers per month must be greater than 0".to_string()));
        }
        if args.timeout_secs == 0 {
            return Err(ScoutError::Config("timeout must be greater than 0 seconds".to_string()));
        }

        Ok(RunConfig {
            recipient: args.recipient,
            bot_token: args.bot_token,
            window,
            home_airports,
            destination,
            lookahead_months: args.months,
            offers_per_month: args.offers_per_month,
            local_currency: Currency::new("PLN", "zł"),
            foreign_currency: Currency::new("EUR", "€"),
            client: ClientConfig {
                timeout_ms: args.timeout_secs * 1000,
                ..ClientConfig::default()
            },
        })
    }
}
