//! Player wallet and append-only coin ledger for the pond simulation.
//!
//! Harvest rewards and (outside the simulation core) market purchases move
//! coins in and out of a player's balance. Every movement is recorded as a
//! [`LedgerEntry`] with the balance it produced, so the balance can always be
//! recomputed from the log.
//!
//! # Modules
//!
//! - [`ledger`] -- The [`CoinLedger`]: append-only log with balance tracking.
//! - [`wallet`] -- The [`Wallet`] interface and the ledger-backed
//!   [`PlayerWallet`].
//!
//! # Usage
//!
//! ```
//! use pond_ledger::{PlayerWallet, Wallet};
//!
//! let mut wallet = PlayerWallet::new();
//! wallet.credit(100, "harvest slot 3").ok();
//! wallet.debit(30, "bought Elodea").ok();
//! assert_eq!(wallet.balance(), 70);
//! assert!(wallet.debit(500, "too expensive").is_err());
//! ```

pub mod ledger;
pub mod wallet;

pub use ledger::{CoinLedger, LedgerEntry};
pub use wallet::{PlayerWallet, Wallet};

/// Errors that can occur when moving coins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Amounts must be strictly positive.
    #[error("ledger amount must be non-zero")]
    ZeroAmount,

    /// A debit would take the balance below zero.
    #[error("insufficient balance: wanted {requested} but only have {available}")]
    InsufficientBalance {
        /// The amount the caller attempted to debit.
        requested: u64,
        /// The balance available.
        available: u64,
    },

    /// An entry could not be read back after being appended.
    #[error("internal ledger error: {0}")]
    Internal(&'static str),

    /// A credit would overflow the balance.
    #[error("balance overflow crediting {amount}")]
    BalanceOverflow {
        /// The amount the caller attempted to credit.
        amount: u64,
    },
}
