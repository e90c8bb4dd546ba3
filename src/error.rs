//! Error types for the peg bot

use thiserror::Error;

/// Kind of ledger-mutating transaction the bot submits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    /// `AMMCreate` seeding a new pool
    Create,
    /// `AMMDeposit` adding XRP to the pool
    Deposit,
    /// `AMMWithdraw` removing XRP from the pool
    Withdraw,
}

impl std::fmt::Display for TxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxKind::Create => write!(f, "AMMCreate"),
            TxKind::Deposit => write!(f, "AMMDeposit"),
            TxKind::Withdraw => write!(f, "AMMWithdraw"),
        }
    }
}

/// Peg bot errors
#[derive(Error, Debug, Clone)]
pub enum Error {
    // Configuration errors
    /// A configuration field failed validation
    ///
    /// **Triggered by:** Out-of-range overrides (negative premium, threshold
    /// above 1.0, malformed endpoint URL)
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfig {
        /// Configuration field name
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// A required configuration value is absent
    #[error("Missing configuration: {name}")]
    MissingConfig {
        /// Environment variable name
        name: &'static str,
    },

    // Oracle errors
    /// The oracle record lacks a required quote pair
    ///
    /// **Triggered by:** The data provider dropping a pair from the
    /// price-data series; fatal for the cycle, not retried
    #[error("Oracle quote not found: {base}/{quote}")]
    QuoteMissing {
        /// Base asset symbol
        base: String,
        /// Quote asset symbol
        quote: String,
    },

    /// The oracle record exists but cannot be interpreted
    #[error("Malformed oracle record: {reason}")]
    MalformedOracle {
        /// What failed to parse
        reason: String,
    },

    // Pool errors
    /// The pool holds no pegged-asset reserve, so it has no implied price
    #[error("Pool has no {currency} reserve to price against")]
    PoolDrained {
        /// Pegged-asset currency code
        currency: String,
    },

    // External errors
    /// An RPC query failed (transport, envelope, or ledger-side error code)
    #[error("RPC error in {method}: {message}")]
    Rpc {
        /// JSON-RPC method name
        method: &'static str,
        /// Error description or ledger error code
        message: String,
    },

    /// A signed transaction was rejected or never validated
    #[error("Transaction failed: {kind}: {message}")]
    Transaction {
        /// Which transaction kind failed
        kind: TxKind,
        /// Failure reason from signing or submission
        message: String,
    },
}

/// Whether a failed cycle is worth retrying on the next tick without
/// operator attention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Likely to clear on its own (network hiccup, stale oracle update)
    Transient,
    /// Needs an operator or code change (bad config, malformed record)
    Persistent,
}

impl Error {
    /// Classify an error for the scheduler's per-cycle report
    pub fn classify(&self) -> ErrorClass {
        match self {
            Error::InvalidConfig { .. } => ErrorClass::Persistent,
            Error::MissingConfig { .. } => ErrorClass::Persistent,
            Error::MalformedOracle { .. } => ErrorClass::Persistent,

            Error::QuoteMissing { .. } => ErrorClass::Transient,
            Error::PoolDrained { .. } => ErrorClass::Transient,
            Error::Rpc { .. } => ErrorClass::Transient,
            Error::Transaction { .. } => ErrorClass::Transient,
        }
    }

    /// Create a malformed-oracle error with a message
    pub fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedOracle {
            reason: reason.into(),
        }
    }
}

/// Result type for peg bot operations
pub type Result<T> = std::result::Result<T, Error>;
