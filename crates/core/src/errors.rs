use thiserror::Error;

/// Unified error type for the entire patrimoine-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Spreadsheet store ───────────────────────────────────────────
    #[error("Store error: {0}")]
    Store(String),

    #[error("Row {row} could not be read: {message}")]
    RowParse { row: usize, message: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Invalid credentials: {0}")]
    Credentials(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── File I/O ────────────────────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No provider available for {0}")]
    NoProvider(String),

    #[error("Price not available for {symbol}")]
    PriceNotAvailable { symbol: String },

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl CoreError {
    /// `true` for failures caused by bad user input rather than a remote collaborator.
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Strip query parameters: request URLs may carry tokens.
        CoreError::Network(redact_query(&e.to_string()))
    }
}

impl From<jsonwebtoken::errors::Error> for CoreError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        CoreError::Auth(format!("Failed to sign service-account assertion: {e}"))
    }
}

/// Replace everything after the first `?` with a placeholder.
pub(crate) fn redact_query(msg: &str) -> String {
    match msg.find('?') {
        Some(idx) => format!("{}?<query redacted>", &msg[..idx]),
        None => msg.to_string(),
    }
}
