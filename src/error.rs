// Error types for the collaborators and the pipeline
use thiserror::Error;

// Errors reported by the HTTP collaborators
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("API error: {status_code} - {message}")]
    ApiResponseError { status_code: u16, message: String },

    #[error("Malformed response body: {0}")]
    MalformedBody(String),
}

// Errors that abort a run. Every variant is fatal.
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fetch from {collaborator} failed ({request}): {source}")]
    Fetch {
        collaborator: &'static str,
        request: String,
        #[source]
        source: ApiError,
    },

    #[error("Could not parse {collaborator} response ({request}): {message}")]
    Parse {
        collaborator: &'static str,
        request: String,
        message: String,
    },

    #[error("Could not parse {field} '{value}' of fare {flight}")]
    DateParse {
        flight: String,
        field: &'static str,
        value: String,
    },

    #[error("Invalid exchange rate: {0}")]
    InvalidRate(f64),

    #[error("Fare {flight} is priced in {found}, expected {expected}")]
    CurrencyMismatch {
        flight: String,
        expected: String,
        found: String,
    },

    #[error("Failed to deliver report: {source}")]
    Delivery {
        #[source]
        source: ApiError,
    },
}

impl ScoutError {
    // Splits a collaborator failure into a fetch or a parse error
    pub fn from_fetch(collaborator: &'static str, request: String, err: ApiError) -> Self {
        match err {
            ApiError::MalformedBody(message) => ScoutError::Parse {
                collaborator,
                request,
                message,
            },
            source => ScoutError::Fetch {
                collaborator,
                request,
                source,
            },
        }
    }
}
