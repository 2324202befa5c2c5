use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("unknown scraper '{name}' (available: {available})")]
    UnknownScraper { name: String, available: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Key-value store failures. These are never isolated.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store connection error: {0}")]
    Connection(String),

    #[error("store query error: {0}")]
    Query(String),
}

/// Failures raised while scraping a third-party site.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("{site}: request failed: {source}")]
    Request {
        site: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{site}: unexpected response: {reason}")]
    UnexpectedResponse { site: &'static str, reason: String },

    #[error("{site}: {reason}")]
    Other { site: &'static str, reason: String },
}

impl AdapterError {
    /// Shorthand for a response that did not have the expected shape.
    pub fn unexpected(site: &'static str, reason: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            site,
            reason: reason.into(),
        }
    }
}

/// Notification delivery failures.
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("{channel}: request failed: {reason}")]
    Request {
        channel: &'static str,
        reason: String,
    },

    #[error("{channel}: rejected by remote: {reason}")]
    Rejected {
        channel: &'static str,
        reason: String,
    },

    #[error("{channel}: {failed} of {total} messages failed")]
    Partial {
        channel: &'static str,
        failed: usize,
        total: usize,
        /// Storage keys of the clinics whose every message went out.
        delivered: Vec<String>,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error invalidates the whole decision model.
    ///
    /// Store failures mean no count or post time can be trusted, so the
    /// process must stop rather than keep polling.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Store(_) | Self::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
