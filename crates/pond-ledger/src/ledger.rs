//! Append-only coin ledger.
//!
//! Entries are never edited or removed. The running balance is cached and
//! also stored on each entry as `balance_after`, so [`CoinLedger::verify`]
//! can replay the log and detect drift.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use pond_types::{LedgerEntryId, LedgerEntryType};

use crate::LedgerError;

/// One recorded coin movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique entry identifier.
    pub id: LedgerEntryId,
    /// Credit or debit.
    pub entry_type: LedgerEntryType,
    /// Coins moved (always > 0).
    pub amount: u64,
    /// Balance after this entry was applied.
    pub balance_after: u64,
    /// Human-readable reason.
    pub memo: String,
    /// Wall-clock time of the entry.
    pub recorded_at: DateTime<Utc>,
}

/// The append-only log of a player's coin movements.
#[derive(Debug, Default, Clone)]
pub struct CoinLedger {
    /// All entries, in insertion order.
    entries: Vec<LedgerEntry>,
    /// Cached running balance.
    balance: u64,
}

impl CoinLedger {
    /// Create an empty ledger with a zero balance.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            balance: 0,
        }
    }

    /// Return the current balance.
    pub const fn balance(&self) -> u64 {
        self.balance
    }

    /// Return the number of entries.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether no entry has been recorded.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return every entry in insertion order.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Record a credit.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ZeroAmount`] for a zero amount, or
    /// [`LedgerError::BalanceOverflow`] if the balance would overflow.
    pub fn record_credit(&mut self, amount: u64, memo: &str) -> Result<&LedgerEntry, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let balance_after = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow { amount })?;
        self.push(LedgerEntryType::Credit, amount, balance_after, memo)
    }

    /// Record a debit.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ZeroAmount`] for a zero amount, or
    /// [`LedgerError::InsufficientBalance`] if the balance is too low.
    pub fn record_debit(&mut self, amount: u64, memo: &str) -> Result<&LedgerEntry, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let balance_after =
            self.balance
                .checked_sub(amount)
                .ok_or(LedgerError::InsufficientBalance {
                    requested: amount,
                    available: self.balance,
                })?;
        self.push(LedgerEntryType::Debit, amount, balance_after, memo)
    }

    /// Replay the log and check that every `balance_after` and the cached
    /// balance agree with the recorded amounts.
    pub fn verify(&self) -> bool {
        let mut running: u64 = 0;
        for entry in &self.entries {
            let next = match entry.entry_type {
                LedgerEntryType::Credit => running.checked_add(entry.amount),
                LedgerEntryType::Debit => running.checked_sub(entry.amount),
            };
            match next {
                Some(value) if value == entry.balance_after => running = value,
                _ => return false,
            }
        }
        running == self.balance
    }

    fn push(
        &mut self,
        entry_type: LedgerEntryType,
        amount: u64,
        balance_after: u64,
        memo: &str,
    ) -> Result<&LedgerEntry, LedgerError> {
        self.entries.push(LedgerEntry {
            id: LedgerEntryId::new(),
            entry_type,
            amount,
            balance_after,
            memo: memo.to_owned(),
            recorded_at: Utc::now(),
        });
        self.balance = balance_after;
        debug!(?entry_type, amount, balance = balance_after, memo, "Ledger entry recorded");
        self.entries
            .last()
            .ok_or(LedgerError::Internal("failed to retrieve entry after append"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn credits_and_debits_track_balance() {
        let mut ledger = CoinLedger::new();
        ledger.record_credit(50, "harvest").unwrap();
        ledger.record_credit(25, "harvest").unwrap();
        let entry = ledger.record_debit(30, "purchase").unwrap();
        assert_eq!(entry.balance_after, 45);
        assert_eq!(ledger.balance(), 45);
        assert_eq!(ledger.len(), 3);
        assert!(ledger.verify());
    }

    #[test]
    fn zero_amount_rejected() {
        let mut ledger = CoinLedger::new();
        assert_eq!(ledger.record_credit(0, "nothing").unwrap_err(), LedgerError::ZeroAmount);
        assert!(ledger.is_empty());
    }

    #[test]
    fn overdraw_rejected_without_entry() {
        let mut ledger = CoinLedger::new();
        ledger.record_credit(10, "harvest").unwrap();
        let err = ledger.record_debit(11, "purchase").unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                requested: 11,
                available: 10
            }
        );
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.balance(), 10);
    }

    #[test]
    fn overflow_rejected() {
        let mut ledger = CoinLedger::new();
        ledger.record_credit(u64::MAX, "jackpot").unwrap();
        assert!(matches!(
            ledger.record_credit(1, "more"),
            Err(LedgerError::BalanceOverflow { amount: 1 })
        ));
    }

    #[test]
    fn entries_serialize() {
        let mut ledger = CoinLedger::new();
        ledger.record_credit(5, "harvest").unwrap();
        let json = serde_json::to_string(ledger.entries()).unwrap();
        assert!(json.contains("\"Credit\"") || json.contains("\"credit\""));
    }
}
