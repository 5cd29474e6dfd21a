//! In-memory fakes for the network seams.

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use solana_program::pubkey::Pubkey;

use crate::error::MarketError;
use crate::gateway::{MetadataSource, NftMetadata};
use crate::rpc::{RpcError, RpcTransport};
use crate::signer::WalletSigner;
use crate::transaction::{self, Signature, Transaction};

/// Answers each method with a canned result and records every call.
#[derive(Default)]
pub(crate) struct FakeRpc {
    answers: HashMap<String, Result<Value, RpcError>>,
    calls: RefCell<Vec<(String, Value)>>,
}

impl FakeRpc {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, method: &str, result: Value) -> Self {
        self.answers.insert(method.to_owned(), Ok(result));
        self
    }

    pub(crate) fn failing(mut self, method: &str, err: RpcError) -> Self {
        self.answers.insert(method.to_owned(), Err(err));
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, Value)> {
        self.calls.borrow().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub(crate) fn methods(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(m, _)| m.clone()).collect()
    }
}

#[async_trait(?Send)]
impl RpcTransport for FakeRpc {
    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        self.calls.borrow_mut().push((method.to_owned(), params));
        self.answers
            .get(method)
            .cloned()
            .unwrap_or_else(|| Err(RpcError::Transport(format!("no fake answer for {method}"))))
    }
}

/// Signs with a fixed byte pattern.
pub(crate) struct FakeSigner {
    pub(crate) key: Pubkey,
    pub(crate) refuse: bool,
}

impl FakeSigner {
    pub(crate) fn new(seed: u8) -> Self {
        Self { key: Pubkey::new_from_array([seed; 32]), refuse: false }
    }
}

#[async_trait(?Send)]
impl WalletSigner for FakeSigner {
    fn pubkey(&self) -> Pubkey {
        self.key
    }

    async fn sign_transaction(&self, mut tx: Transaction) -> Result<Transaction, MarketError> {
        if self.refuse {
            return Err(MarketError::Signer("user rejected the request".to_owned()));
        }
        transaction::set_signature(&mut tx, &self.key, Signature::from([0xAB; 64]))?;
        Ok(tx)
    }
}

/// Serves metadata documents by URL; unknown URLs fail.
#[derive(Default)]
pub(crate) struct FakeMetadata {
    docs: HashMap<String, NftMetadata>,
    requested: RefCell<Vec<String>>,
}

impl FakeMetadata {
    pub(crate) fn with(mut self, url: &str, doc: NftMetadata) -> Self {
        self.docs.insert(url.to_owned(), doc);
        self
    }

    pub(crate) fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

#[async_trait(?Send)]
impl MetadataSource for FakeMetadata {
    async fn fetch_metadata(&self, url: &str) -> Result<NftMetadata, MarketError> {
        self.requested.borrow_mut().push(url.to_owned());
        self.docs.get(url).cloned().ok_or_else(|| MarketError::Gateway(format!("404 for {url}")))
    }
}
