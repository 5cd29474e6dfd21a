//! JSON-RPC envelope and typed calls against a cluster endpoint.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every read and write in the marketplace goes through one JSON-RPC 2.0
//! endpoint. The actual HTTP hop is behind [`RpcTransport`] so the browser
//! (`gloo-net`) and the native front ends (`reqwest`) share the envelope,
//! the error mapping, and the response decoding here.
//!
//! ERROR HANDLING
//! ==============
//! A JSON-RPC `error` object becomes [`RpcError::Remote`]. For failed
//! preflight simulations the node attaches the program logs and the raw
//! instruction error under `error.data`; both are kept in `logs` so the
//! program error code can be recovered later.

#[cfg(test)]
#[path = "rpc_test.rs"]
mod rpc_test;

use std::str::FromStr;

use async_trait::async_trait;
use base64::Engine as _;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use solana_program::hash::Hash;
use solana_program::pubkey::Pubkey;

use crate::error::MarketError;
use crate::pda::TOKEN_PROGRAM_ID;
use crate::transaction::{self, Transaction};

/// Commitment used for reads and as the preflight commitment for sends.
pub const COMMITMENT: &str = "confirmed";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("rpc error {code}: {message}")]
    Remote { code: i64, message: String, logs: Vec<String> },
    #[error("malformed rpc response: {0}")]
    Malformed(String),
}

/// One HTTP round trip carrying a JSON-RPC request.
#[async_trait(?Send)]
pub trait RpcTransport {
    /// Send `method(params)` and return the `result` member.
    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError>;
}

/// Server-side account filter for `getProgramAccounts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcFilter {
    Memcmp { offset: usize, bytes: Vec<u8> },
    DataSize(u64),
}

impl RpcFilter {
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Memcmp { offset, bytes } => json!({
                "memcmp": { "offset": offset, "bytes": bs58::encode(bytes).into_string() }
            }),
            Self::DataSize(size) => json!({ "dataSize": size }),
        }
    }
}

/// Build a JSON-RPC 2.0 request object.
#[must_use]
pub fn request_body(id: u64, method: &str, params: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params })
}

/// Unwrap a JSON-RPC response object into its `result`.
///
/// # Errors
///
/// Returns [`RpcError::Remote`] when the response carries an `error` member and
/// [`RpcError::Malformed`] when it carries neither `error` nor `result`.
pub fn parse_response(mut body: Value) -> Result<Value, RpcError> {
    if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
        let message = error.get("message").and_then(Value::as_str).unwrap_or_default().to_owned();
        let mut logs: Vec<String> = error
            .pointer("/data/logs")
            .and_then(Value::as_array)
            .map(|lines| lines.iter().filter_map(Value::as_str).map(str::to_owned).collect())
            .unwrap_or_default();
        if let Some(err) = error.pointer("/data/err").filter(|e| !e.is_null()) {
            logs.push(err.to_string());
        }
        return Err(RpcError::Remote { code, message, logs });
    }
    match body.get_mut("result") {
        Some(result) => Ok(result.take()),
        None => Err(RpcError::Malformed("response has neither result nor error".to_owned())),
    }
}

async fn call_typed<T, R>(transport: &T, method: &str, params: Value) -> Result<R, RpcError>
where
    T: RpcTransport + ?Sized,
    R: DeserializeOwned,
{
    tracing::debug!(method, "rpc call");
    let result = transport.call(method, params).await?;
    serde_json::from_value(result).map_err(|e| RpcError::Malformed(format!("{method}: {e}")))
}

fn parse_pubkey(text: &str) -> Result<Pubkey, RpcError> {
    Pubkey::from_str(text).map_err(|e| RpcError::Malformed(format!("bad pubkey {text}: {e}")))
}

fn decode_base64(data: &EncodedData) -> Result<Vec<u8>, RpcError> {
    base64::engine::general_purpose::STANDARD
        .decode(&data.0)
        .map_err(|e| RpcError::Malformed(format!("bad account data: {e}")))
}

#[derive(Deserialize)]
struct EncodedData(String, #[allow(dead_code)] String);

#[derive(Deserialize)]
struct UiAccount {
    data: EncodedData,
    lamports: u64,
}

#[derive(Deserialize)]
struct UiKeyedAccount {
    pubkey: String,
    account: UiAccount,
}

#[derive(Deserialize)]
struct WithContext<T> {
    value: T,
}

/// An account returned by `getProgramAccounts`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyedAccount {
    pub pubkey: Pubkey,
    pub lamports: u64,
    pub data: Vec<u8>,
}

/// All accounts owned by `program_id` that pass every filter.
///
/// # Errors
///
/// Propagates transport and remote errors; returns [`RpcError::Malformed`]
/// for undecodable keys or account data.
pub async fn get_program_accounts<T: RpcTransport + ?Sized>(
    transport: &T,
    program_id: &Pubkey,
    filters: &[RpcFilter],
) -> Result<Vec<KeyedAccount>, RpcError> {
    let filters: Vec<Value> = filters.iter().map(RpcFilter::to_json).collect();
    let params = json!([
        program_id.to_string(),
        { "encoding": "base64", "commitment": COMMITMENT, "filters": filters }
    ]);
    let raw: Vec<UiKeyedAccount> = call_typed(transport, "getProgramAccounts", params).await?;
    raw.iter()
        .map(|item| {
            Ok(KeyedAccount {
                pubkey: parse_pubkey(&item.pubkey)?,
                lamports: item.account.lamports,
                data: decode_base64(&item.account.data)?,
            })
        })
        .collect()
}

/// Raw data of each requested account, `None` where the account does not exist.
///
/// # Errors
///
/// Propagates transport and remote errors; returns [`RpcError::Malformed`]
/// for undecodable account data.
pub async fn get_multiple_accounts<T: RpcTransport + ?Sized>(
    transport: &T,
    keys: &[Pubkey],
) -> Result<Vec<Option<Vec<u8>>>, RpcError> {
    if keys.is_empty() {
        return Ok(Vec::new());
    }
    let keys: Vec<String> = keys.iter().map(ToString::to_string).collect();
    let params = json!([keys, { "encoding": "base64", "commitment": COMMITMENT }]);
    let raw: WithContext<Vec<Option<UiAccount>>> = call_typed(transport, "getMultipleAccounts", params).await?;
    raw.value
        .iter()
        .map(|slot| slot.as_ref().map(|account| decode_base64(&account.data)).transpose())
        .collect()
}

/// Raw data of a single account, `None` if it does not exist.
///
/// # Errors
///
/// See [`get_multiple_accounts`].
pub async fn get_account<T: RpcTransport + ?Sized>(transport: &T, key: &Pubkey) -> Result<Option<Vec<u8>>, RpcError> {
    Ok(get_multiple_accounts(transport, std::slice::from_ref(key)).await?.into_iter().next().flatten())
}

#[derive(Deserialize)]
struct BlockhashValue {
    blockhash: String,
}

/// # Errors
///
/// Propagates transport and remote errors; returns [`RpcError::Malformed`]
/// for an unparseable hash.
pub async fn get_latest_blockhash<T: RpcTransport + ?Sized>(transport: &T) -> Result<Hash, RpcError> {
    let params = json!([{ "commitment": COMMITMENT }]);
    let raw: WithContext<BlockhashValue> = call_typed(transport, "getLatestBlockhash", params).await?;
    Hash::from_str(&raw.value.blockhash).map_err(|e| RpcError::Malformed(format!("bad blockhash: {e}")))
}

/// Submit a signed transaction; returns its base58 signature.
///
/// # Errors
///
/// Preflight rejections come back as [`RpcError::Remote`] with simulation
/// logs. A transaction that cannot be encoded never reaches the transport.
pub async fn send_transaction<T: RpcTransport + ?Sized>(transport: &T, tx: &Transaction) -> Result<String, MarketError> {
    let encoded = transaction::to_base64(tx)?;
    let params = json!([
        encoded,
        { "encoding": "base64", "preflightCommitment": COMMITMENT }
    ]);
    Ok(call_typed(transport, "sendTransaction", params).await?)
}

/// Observed state of a submitted transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignatureStatus {
    /// Not yet seen, or seen only at `processed`.
    Pending,
    Confirmed,
    Finalized,
    /// Landed but the program rejected it; holds the raw error JSON.
    Failed(String),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UiSignatureStatus {
    err: Option<Value>,
    confirmation_status: Option<String>,
}

/// # Errors
///
/// Propagates transport and remote errors.
pub async fn get_signature_status<T: RpcTransport + ?Sized>(
    transport: &T,
    signature: &str,
) -> Result<SignatureStatus, RpcError> {
    let params = json!([[signature], { "searchTransactionHistory": true }]);
    let raw: WithContext<Vec<Option<UiSignatureStatus>>> =
        call_typed(transport, "getSignatureStatuses", params).await?;
    let Some(Some(status)) = raw.value.into_iter().next() else {
        return Ok(SignatureStatus::Pending);
    };
    if let Some(err) = status.err.filter(|e| !e.is_null()) {
        return Ok(SignatureStatus::Failed(err.to_string()));
    }
    Ok(match status.confirmation_status.as_deref() {
        Some("finalized") => SignatureStatus::Finalized,
        Some("confirmed") => SignatureStatus::Confirmed,
        _ => SignatureStatus::Pending,
    })
}

/// One SPL token balance held by an owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenBalance {
    pub account: Pubkey,
    pub mint: Pubkey,
    /// Raw integer amount as the node reports it (a decimal string).
    pub amount: String,
    pub decimals: u8,
}

impl TokenBalance {
    /// A non-fungible holding: exactly one indivisible unit.
    #[must_use]
    pub fn is_nft(&self) -> bool {
        self.decimals == 0 && self.amount == "1"
    }
}

#[derive(Deserialize)]
struct ParsedTokenAmount {
    amount: String,
    decimals: u8,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParsedTokenInfo {
    mint: String,
    token_amount: ParsedTokenAmount,
}

#[derive(Deserialize)]
struct ParsedTokenData {
    info: ParsedTokenInfo,
}

#[derive(Deserialize)]
struct ParsedAccountData {
    parsed: ParsedTokenData,
}

#[derive(Deserialize)]
struct ParsedAccount {
    data: ParsedAccountData,
}

#[derive(Deserialize)]
struct ParsedKeyedAccount {
    pubkey: String,
    account: ParsedAccount,
}

/// Every token account `owner` holds under the token program.
///
/// # Errors
///
/// Propagates transport and remote errors; returns [`RpcError::Malformed`]
/// for unexpected `jsonParsed` shapes.
pub async fn get_token_accounts_by_owner<T: RpcTransport + ?Sized>(
    transport: &T,
    owner: &Pubkey,
) -> Result<Vec<TokenBalance>, RpcError> {
    let params = json!([
        owner.to_string(),
        { "programId": TOKEN_PROGRAM_ID.to_string() },
        { "encoding": "jsonParsed", "commitment": COMMITMENT }
    ]);
    let raw: WithContext<Vec<ParsedKeyedAccount>> =
        call_typed(transport, "getTokenAccountsByOwner", params).await?;
    raw.value
        .into_iter()
        .map(|item| {
            let info = item.account.data.parsed.info;
            Ok(TokenBalance {
                account: parse_pubkey(&item.pubkey)?,
                mint: parse_pubkey(&info.mint)?,
                amount: info.token_amount.amount,
                decimals: info.token_amount.decimals,
            })
        })
        .collect()
}
