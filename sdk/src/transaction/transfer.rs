//! Native currency transfers.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::ids::AccountId;
use crate::proto::{AccountAmount, CryptoTransferBody, TransactionData};

use super::builder::Transaction;
use super::kind::{KindTag, TransactionKind};

/// A balanced set of debits and credits, in tinybars.
///
/// Repeated entries for the same account are summed, and the body lists
/// accounts in ascending order, so the encoding does not depend on the
/// order transfers were added in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transfer {
    transfers: BTreeMap<AccountId, i64>,
}

/// A draft transfer.
pub type TransferTransaction = Transaction<Transfer>;

impl Transfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to `account_id`'s leg. Negative amounts debit.
    pub fn hbar_transfer(mut self, account_id: AccountId, amount: i64) -> Self {
        let entry = self.transfers.entry(account_id).or_insert(0);
        *entry = entry.saturating_add(amount);
        self
    }

    /// Net amount per account.
    pub fn transfers(&self) -> impl Iterator<Item = (AccountId, i64)> + '_ {
        self.transfers.iter().map(|(a, v)| (*a, *v))
    }
}

impl TransactionKind for Transfer {
    const TAG: KindTag = KindTag::CryptoTransfer;

    fn validate(&self) -> Result<()> {
        if self.transfers.is_empty() {
            return Err(Error::Validation(
                "transfer: at least one leg is required".to_string(),
            ));
        }
        let total = self
            .transfers
            .values()
            .try_fold(0i64, |acc, v| acc.checked_add(*v))
            .ok_or_else(|| Error::Validation("transfer: amounts overflow".to_string()))?;
        if total != 0 {
            return Err(Error::Validation(format!(
                "transfer: amounts must sum to zero, got {}",
                total
            )));
        }
        Ok(())
    }

    fn build_data(&self) -> TransactionData {
        TransactionData::CryptoTransfer(CryptoTransferBody {
            transfers: self
                .transfers
                .iter()
                .map(|(account_id, amount)| AccountAmount {
                    account_id: *account_id,
                    amount: *amount,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> AccountId {
        AccountId::new(0, 0, 1001)
    }

    fn bob() -> AccountId {
        AccountId::new(0, 0, 1002)
    }

    #[test]
    fn balanced_transfer_validates() {
        let t = Transfer::new().hbar_transfer(alice(), -10).hbar_transfer(bob(), 10);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn unbalanced_transfer_is_rejected() {
        let t = Transfer::new().hbar_transfer(alice(), -10).hbar_transfer(bob(), 9);
        assert!(matches!(t.validate(), Err(Error::Validation(_))));
        assert!(Transfer::new().validate().is_err());
    }

    #[test]
    fn encoding_ignores_insertion_order() {
        let a = Transfer::new().hbar_transfer(bob(), 5).hbar_transfer(alice(), -5);
        let b = Transfer::new().hbar_transfer(alice(), -5).hbar_transfer(bob(), 5);
        assert_eq!(a.build_data(), b.build_data());
    }

    #[test]
    fn repeated_legs_are_summed() {
        let t = Transfer::new()
            .hbar_transfer(alice(), -3)
            .hbar_transfer(alice(), -2)
            .hbar_transfer(bob(), 5);
        let legs: Vec<_> = t.transfers().collect();
        assert_eq!(legs, vec![(alice(), -5), (bob(), 5)]);
    }
}
