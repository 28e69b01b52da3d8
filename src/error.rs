//! Unified error types for the Hydra Ladder library.
//!
//! All fallible operations across the crate return `AmmError` as their
//! error type, ensuring a consistent error handling experience for consumers.
//!
//! Every error is an atomic abort: an operation that returns `Err` leaves
//! the exchange, its levels, and the token ledger exactly as they were
//! before the call.

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, AmmError>;

/// Every failure mode of the exchange, its ladder levels, and the ledger
/// settlement layer.
///
/// Variants that carry a `&'static str` use it as a short, stable context
/// message describing which computation failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmmError {
    // -- arithmetic ---------------------------------------------------------
    /// An intermediate or final value exceeded the representable range.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// A subtraction would have produced a negative value.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    // -- input validation ---------------------------------------------------
    /// A quantity argument was zero or otherwise unusable.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(&'static str),

    /// A price argument was zero or outside the supported range.
    #[error("invalid price: {0}")]
    InvalidPrice(&'static str),

    /// A fee tier is outside the supported range.
    #[error("invalid fee: {0}")]
    InvalidFee(&'static str),

    /// A configuration value violated its invariant.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    // -- timing & slippage --------------------------------------------------
    /// The call was included after its deadline.
    #[error("deadline exceeded: now {now} > deadline {deadline}")]
    DeadlineExceeded {
        /// Time at which the call was executed.
        now: u64,
        /// Latest acceptable execution time.
        deadline: u64,
    },

    /// The combined ladder + AMM result violated the caller's bound.
    #[error("slippage exceeded: {0}")]
    SlippageExceeded(&'static str),

    // -- pool lifecycle -----------------------------------------------------
    /// A trade or liquidity call was made before the pool was seeded.
    #[error("pool is not initialized")]
    PoolNotInitialized,

    /// `initialize` was called on a pool that was already seeded.
    #[error("pool is already initialized")]
    AlreadyInitialized,

    /// One or both AMM reserves are zero.
    #[error("pool reserve is zero")]
    ZeroReserve,

    /// The requested output cannot be produced from available liquidity.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// The caller tried to burn or move more LP shares than they own.
    #[error("insufficient shares: requested {requested}, available {available}")]
    InsufficientShares {
        /// Shares the caller asked for.
        requested: u128,
        /// Shares the caller holds.
        available: u128,
    },

    // -- ladder -------------------------------------------------------------
    /// A rung was requested that is not the next step from the active rung.
    #[error("non-contiguous ladder: {0}")]
    NonContiguousLevel(&'static str),

    /// A level already exists at the requested price.
    #[error("level already exists at price {0}")]
    LevelExists(u128),

    /// No level exists at the requested price.
    #[error("no level at price {0}")]
    LevelNotFound(u128),

    // -- level positions ----------------------------------------------------
    /// `approved_withdraw` was called by an account that is not the delegate.
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    /// Withdrawal amount exceeds the accrued entitlement.
    #[error("insufficient entitlement: requested {requested}, available {available}")]
    InsufficientEntitlement {
        /// Amount the caller asked for.
        requested: u128,
        /// Entitlement currently accrued.
        available: u128,
    },

    // -- ledger -------------------------------------------------------------
    /// A transfer source does not hold enough funds.
    #[error("insufficient balance: {0}")]
    InsufficientBalance(&'static str),

    /// A pull exceeds the allowance granted to the spender.
    #[error("insufficient allowance: {0}")]
    InsufficientAllowance(&'static str),
}
