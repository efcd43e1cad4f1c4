//! Token association and dissociation.
//!
//! An account must be associated with a token before it can hold it.
//! Both kinds carry the same payload: one account and the tokens to
//! (dis)associate.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::ids::{AccountId, TokenId};
use crate::proto::{TokenAssociateBody, TokenDissociateBody, TransactionData};

use super::builder::Transaction;
use super::kind::{KindTag, TransactionKind};

fn validate_token_list(
    what: &str,
    account_id: Option<AccountId>,
    token_ids: &[TokenId],
) -> Result<AccountId> {
    let account_id = account_id
        .ok_or_else(|| Error::Validation(format!("{}: account id is required", what)))?;
    if token_ids.is_empty() {
        return Err(Error::Validation(format!(
            "{}: at least one token id is required",
            what
        )));
    }
    let mut seen = HashSet::with_capacity(token_ids.len());
    for token in token_ids {
        if !seen.insert(token) {
            return Err(Error::Validation(format!(
                "{}: token {} listed twice",
                what, token
            )));
        }
    }
    Ok(account_id)
}

// ---------------------------------------------------------------------------
// TokenAssociate
// ---------------------------------------------------------------------------

/// Associates `account_id` with each of `token_ids`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenAssociate {
    account_id: Option<AccountId>,
    token_ids: Vec<TokenId>,
}

/// A draft token association.
pub type TokenAssociateTransaction = Transaction<TokenAssociate>;

impl TokenAssociate {
    pub fn new() -> Self {
        Self::default()
    }

    /// The account to associate. It must sign the transaction.
    pub fn account_id(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Replaces the token list.
    pub fn token_ids(mut self, token_ids: impl IntoIterator<Item = TokenId>) -> Self {
        self.token_ids = token_ids.into_iter().collect();
        self
    }

    /// Appends one token.
    pub fn add_token_id(mut self, token_id: TokenId) -> Self {
        self.token_ids.push(token_id);
        self
    }

    pub fn get_account_id(&self) -> Option<AccountId> {
        self.account_id
    }

    pub fn get_token_ids(&self) -> &[TokenId] {
        &self.token_ids
    }
}

impl TransactionKind for TokenAssociate {
    const TAG: KindTag = KindTag::TokenAssociate;

    fn validate(&self) -> Result<()> {
        validate_token_list("token associate", self.account_id, &self.token_ids).map(|_| ())
    }

    fn build_data(&self) -> TransactionData {
        TransactionData::TokenAssociate(TokenAssociateBody {
            account_id: self.account_id.unwrap_or_default(),
            token_ids: self.token_ids.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// TokenDissociate
// ---------------------------------------------------------------------------

/// Removes the association between `account_id` and each of `token_ids`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenDissociate {
    account_id: Option<AccountId>,
    token_ids: Vec<TokenId>,
}

/// A draft token dissociation.
pub type TokenDissociateTransaction = Transaction<TokenDissociate>;

impl TokenDissociate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_id(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn token_ids(mut self, token_ids: impl IntoIterator<Item = TokenId>) -> Self {
        self.token_ids = token_ids.into_iter().collect();
        self
    }

    pub fn get_account_id(&self) -> Option<AccountId> {
        self.account_id
    }

    pub fn get_token_ids(&self) -> &[TokenId] {
        &self.token_ids
    }
}

impl TransactionKind for TokenDissociate {
    const TAG: KindTag = KindTag::TokenDissociate;

    fn validate(&self) -> Result<()> {
        validate_token_list("token dissociate", self.account_id, &self.token_ids).map(|_| ())
    }

    fn build_data(&self) -> TransactionData {
        TransactionData::TokenDissociate(TokenDissociateBody {
            account_id: self.account_id.unwrap_or_default(),
            token_ids: self.token_ids.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn associate_requires_account_and_tokens() {
        assert!(TokenAssociate::new().validate().is_err());
        assert!(TokenAssociate::new()
            .account_id(AccountId::new(0, 0, 9))
            .validate()
            .is_err());
        assert!(TokenAssociate::new()
            .account_id(AccountId::new(0, 0, 9))
            .add_token_id(TokenId::new(0, 0, 1))
            .validate()
            .is_ok());
    }

    #[test]
    fn duplicate_tokens_are_rejected() {
        let err = TokenDissociate::new()
            .account_id(AccountId::new(0, 0, 9))
            .token_ids([TokenId::new(0, 0, 1), TokenId::new(0, 0, 1)])
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("listed twice"));
    }

    #[test]
    fn data_preserves_token_order() {
        let kind = TokenAssociate::new()
            .account_id(AccountId::new(0, 0, 9))
            .token_ids([TokenId::new(0, 0, 2), TokenId::new(0, 0, 1)]);
        match kind.build_data() {
            TransactionData::TokenAssociate(body) => {
                assert_eq!(body.token_ids, vec![TokenId::new(0, 0, 2), TokenId::new(0, 0, 1)]);
            }
            other => panic!("unexpected data {:?}", other),
        }
    }

    #[test]
    fn both_kinds_are_schedulable() {
        let kind = TokenDissociate::new()
            .account_id(AccountId::new(0, 0, 9))
            .token_ids([TokenId::new(0, 0, 1)]);
        assert!(kind.build_scheduled_data().is_ok());
    }
}
