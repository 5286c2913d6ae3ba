//! Wallet interface consumed by the harvest flow.

use tracing::info;

use crate::LedgerError;
use crate::ledger::{CoinLedger, LedgerEntry};

/// The player's coin balance as seen by the simulation.
///
/// Harvest credits through this interface; purchase flows outside the
/// simulation core debit through it.
pub trait Wallet {
    /// Add coins and return the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the amount is zero or the balance would
    /// overflow.
    fn credit(&mut self, amount: u64, memo: &str) -> Result<u64, LedgerError>;

    /// Remove coins and return the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the amount is zero or exceeds the balance.
    fn debit(&mut self, amount: u64, memo: &str) -> Result<u64, LedgerError>;

    /// Current balance.
    fn balance(&self) -> u64;
}

/// A wallet backed by a local [`CoinLedger`].
#[derive(Debug, Default, Clone)]
pub struct PlayerWallet {
    ledger: CoinLedger,
}

impl PlayerWallet {
    /// Create a wallet with a zero balance.
    pub const fn new() -> Self {
        Self {
            ledger: CoinLedger::new(),
        }
    }

    /// Create a wallet seeded with a starting balance.
    ///
    /// # Errors
    ///
    /// Propagates [`LedgerError`] from recording the opening credit.
    pub fn with_opening_balance(amount: u64) -> Result<Self, LedgerError> {
        let mut wallet = Self::new();
        if amount > 0 {
            wallet.ledger.record_credit(amount, "opening balance")?;
        }
        Ok(wallet)
    }

    /// Every recorded entry.
    pub fn history(&self) -> &[LedgerEntry] {
        self.ledger.entries()
    }
}

impl Wallet for PlayerWallet {
    fn credit(&mut self, amount: u64, memo: &str) -> Result<u64, LedgerError> {
        let balance = self.ledger.record_credit(amount, memo)?.balance_after;
        info!(amount, balance, memo, "Wallet credited");
        Ok(balance)
    }

    fn debit(&mut self, amount: u64, memo: &str) -> Result<u64, LedgerError> {
        let balance = self.ledger.record_debit(amount, memo)?.balance_after;
        info!(amount, balance, memo, "Wallet debited");
        Ok(balance)
    }

    fn balance(&self) -> u64 {
        self.ledger.balance()
    }
}
