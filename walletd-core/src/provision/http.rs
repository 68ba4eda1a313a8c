//! Network account creators for each supported chain
//!
//! Hedera accounts are created through the Hedera SDK. The other chains have
//! no creation step, so their creators make one HTTP exchange to confirm the
//! address against the endpoint. The `interpret_*` functions turn a raw
//! response into a result and carry no I/O.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::chain::Chain;
use crate::credentials::{HEDERA_OPERATOR_ID_VAR, HEDERA_OPERATOR_KEY_VAR};
use crate::wallet::Balance;
use super::client::{AccountCreator, AccountRequest, CreateAccountError, CreatedAccount};

/// Initial funding requested for a new Hedera account, 2 HBAR
pub const DEFAULT_HEDERA_INITIAL_BALANCE: u64 = 200_000_000;

type CreateResult = std::result::Result<CreatedAccount, CreateAccountError>;

/// Thin wrapper over a shared reqwest client
#[derive(Debug, Clone, Default)]
struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// POST a JSON body and return the status code and raw body
    async fn post_json<T: Serialize + ?Sized>(
        &self,
        request: &AccountRequest,
        url: &str,
        body: &T,
    ) -> Result<(u16, String), CreateAccountError> {
        let response = self
            .client
            .post(url)
            .timeout(request.endpoint.timeout)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(transport_error)?;
        Ok((status, text))
    }

    async fn get(&self, request: &AccountRequest, url: &str) -> Result<(u16, String), CreateAccountError> {
        let response = self
            .client
            .get(url)
            .timeout(request.endpoint.timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(transport_error)?;
        Ok((status, text))
    }

    /// Send a JSON-RPC 2.0 call and return its `result`
    async fn send_request(
        &self,
        request: &AccountRequest,
        url: &str,
        method: &str,
        params: Value,
    ) -> Result<Value, CreateAccountError> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        debug!(chain = %request.chain, %url, method, "sending JSON-RPC request");
        let (status, text) = self.post_json(request, url, &body).await?;
        rpc_result(status, &text)
    }
}

fn transport_error(e: reqwest::Error) -> CreateAccountError {
    if e.is_timeout() {
        CreateAccountError::Other(format!("request timed out: {}", e))
    } else {
        CreateAccountError::Other(format!("request failed: {}", e))
    }
}

fn is_auth_rejection(status: u16) -> bool {
    status == 401 || status == 403
}

fn http_failure(status: u16, body: &str) -> CreateAccountError {
    let body = body.trim();
    if body.is_empty() {
        CreateAccountError::Other(format!("HTTP {}", status))
    } else {
        CreateAccountError::Other(format!("HTTP {}: {}", status, body))
    }
}

/// Extract the `result` member of a JSON-RPC response
pub fn rpc_result(status: u16, body: &str) -> Result<Value, CreateAccountError> {
    if is_auth_rejection(status) {
        return Err(CreateAccountError::InvalidSignature(format!("endpoint rejected credentials (HTTP {})", status)));
    }
    if !(200..300).contains(&status) {
        return Err(http_failure(status, body));
    }

    let json: Value = serde_json::from_str(body)
        .map_err(|e| CreateAccountError::Other(format!("Failed to parse response: {}", e)))?;

    if let Some(error) = json.get("error").filter(|e| !e.is_null()) {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(CreateAccountError::Other(format!("JSON-RPC error: {}", message)));
    }

    json.get("result")
        .cloned()
        .ok_or_else(|| CreateAccountError::Other("No result in response".to_string()))
}

// ---------------------------------------------------------------------------
// Hedera
// ---------------------------------------------------------------------------

/// Creates Hedera accounts with an `AccountCreateTransaction` paid for by the
/// operator account.
///
/// The consensus network is picked by name. After the receipt arrives the
/// mirror node is asked for the new balance; when it has not caught up yet the
/// requested initial balance is reported instead.
#[derive(Debug, Clone)]
pub struct HederaAccountCreator {
    http: HttpClient,
    initial_balance: u64,
}

impl HederaAccountCreator {
    pub fn new() -> Self {
        Self::with_initial_balance(DEFAULT_HEDERA_INITIAL_BALANCE)
    }

    /// Initial funding in tinybars
    pub fn with_initial_balance(initial_balance: u64) -> Self {
        Self {
            http: HttpClient::default(),
            initial_balance,
        }
    }

    async fn mirror_balance(&self, request: &AccountRequest, account_id: &str) -> Option<u64> {
        let url = format!("{}/api/v1/accounts/{}", request.endpoint.url, account_id);
        match self.http.get(request, &url).await {
            Ok((status, body)) => interpret_mirror_balance(status, &body),
            Err(e) => {
                debug!(%url, error = %e, "mirror node lookup failed");
                None
            }
        }
    }
}

impl Default for HederaAccountCreator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountCreator for HederaAccountCreator {
    async fn create_account(&self, request: &AccountRequest) -> CreateResult {
        let credentials = request.credentials.as_ref().ok_or_else(|| {
            CreateAccountError::CredentialMissing(format!(
                "{} or {}",
                HEDERA_OPERATOR_ID_VAR, HEDERA_OPERATOR_KEY_VAR
            ))
        })?;

        let operator_id = parse_operator_id(&credentials.operator_id)?;
        let operator_key = parse_operator_key(&credentials.operator_key)?;
        let new_key = hedera::PublicKey::from_bytes_ed25519(&request.public_key)
            .map_err(|e| CreateAccountError::Other(format!("invalid account key: {}", e)))?;
        let initial_balance = i64::try_from(self.initial_balance)
            .map(hedera::Hbar::from_tinybars)
            .map_err(|_| CreateAccountError::Other(format!("initial balance too large: {}", self.initial_balance)))?;

        let client = consensus_client(&request.endpoint.network)?;
        client.set_operator(operator_id, operator_key);

        debug!(network = %request.endpoint.network, operator = %credentials.operator_id, "submitting AccountCreateTransaction");
        let mut transaction = hedera::AccountCreateTransaction::new();
        transaction.key(new_key).initial_balance(initial_balance);

        let response = transaction.execute(&client).await.map_err(sdk_error)?;
        let receipt = response.get_receipt(&client).await.map_err(sdk_error)?;
        let account_id = receipt
            .account_id
            .ok_or_else(|| CreateAccountError::Other("receipt carried no account id".to_string()))?
            .to_string();

        let tinybars = match self.mirror_balance(request, &account_id).await {
            Some(tinybars) => tinybars,
            None => self.initial_balance,
        };

        Ok(CreatedAccount {
            account_id,
            balance: Some(Balance::new(Chain::Hedera, u128::from(tinybars))),
        })
    }
}

fn consensus_client(network: &str) -> Result<hedera::Client, CreateAccountError> {
    match network {
        "mainnet" => Ok(hedera::Client::for_mainnet()),
        "testnet" => Ok(hedera::Client::for_testnet()),
        "previewnet" => Ok(hedera::Client::for_previewnet()),
        other => Err(CreateAccountError::Other(format!("no Hedera consensus network named {}", other))),
    }
}

/// Parse the operator account id, `shard.realm.num`
pub fn parse_operator_id(encoded: &str) -> Result<hedera::AccountId, CreateAccountError> {
    encoded
        .trim()
        .parse()
        .map_err(|e| CreateAccountError::InvalidSignature(format!("operator id {}: {}", encoded.trim(), e)))
}

/// Parse an operator key as the portal hands it out: raw or DER hex, ed25519
/// or ECDSA
pub fn parse_operator_key(encoded: &str) -> Result<hedera::PrivateKey, CreateAccountError> {
    let trimmed = encoded.trim();
    trimmed
        .strip_prefix("0x")
        .unwrap_or(trimmed)
        .parse()
        .map_err(|e| CreateAccountError::InvalidSignature(format!("operator key: {}", e)))
}

fn sdk_error(error: hedera::Error) -> CreateAccountError {
    let status = match &error {
        hedera::Error::TransactionPreCheckStatus { status, .. }
        | hedera::Error::ReceiptStatus { status, .. } => Some(*status),
        _ => None,
    };
    classify_status(status, error.to_string())
}

/// Map a network status to a creation error; only a signature rejection
/// points at the credentials
pub fn classify_status(status: Option<hedera::Status>, detail: String) -> CreateAccountError {
    match status {
        Some(hedera::Status::InvalidSignature) => CreateAccountError::InvalidSignature(detail),
        _ => CreateAccountError::Other(detail),
    }
}

/// Tinybar balance from a mirror node `/api/v1/accounts/{id}` response
pub fn interpret_mirror_balance(status: u16, body: &str) -> Option<u64> {
    if !(200..300).contains(&status) {
        return None;
    }
    let account: MirrorAccount = serde_json::from_str(body).ok()?;
    Some(account.balance.balance)
}

#[derive(Debug, Deserialize)]
struct MirrorAccount {
    balance: MirrorBalance,
}

#[derive(Debug, Deserialize)]
struct MirrorBalance {
    balance: u64,
}

// ---------------------------------------------------------------------------
// Ethereum
// ---------------------------------------------------------------------------

/// Confirms an Ethereum address against a JSON-RPC node
#[derive(Debug, Clone, Default)]
pub struct EthereumAccountCreator {
    http: HttpClient,
}

impl EthereumAccountCreator {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountCreator for EthereumAccountCreator {
    async fn create_account(&self, request: &AccountRequest) -> CreateResult {
        let result = self
            .http
            .send_request(
                request,
                &request.endpoint.url,
                "eth_getBalance",
                serde_json::json!([request.address, "latest"]),
            )
            .await?;
        interpret_ethereum_balance(&request.address, &result)
    }
}

/// Build the account from an `eth_getBalance` result
pub fn interpret_ethereum_balance(address: &str, result: &Value) -> CreateResult {
    let quantity = result
        .as_str()
        .ok_or_else(|| CreateAccountError::Other(format!("unexpected balance value: {}", result)))?;
    let digits = quantity.strip_prefix("0x").unwrap_or(quantity);
    let wei = if digits.is_empty() {
        0
    } else {
        u128::from_str_radix(digits, 16)
            .map_err(|e| CreateAccountError::Other(format!("invalid balance {}: {}", quantity, e)))?
    };

    Ok(CreatedAccount {
        account_id: address.to_string(),
        balance: Some(Balance::new(Chain::Ethereum, wei)),
    })
}

// ---------------------------------------------------------------------------
// Solana
// ---------------------------------------------------------------------------

/// Confirms a Solana address against a cluster RPC node
#[derive(Debug, Clone, Default)]
pub struct SolanaAccountCreator {
    http: HttpClient,
}

impl SolanaAccountCreator {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountCreator for SolanaAccountCreator {
    async fn create_account(&self, request: &AccountRequest) -> CreateResult {
        let result = self
            .http
            .send_request(request, &request.endpoint.url, "getBalance", serde_json::json!([request.address]))
            .await?;
        interpret_solana_balance(&request.address, &result)
    }
}

/// Build the account from a `getBalance` result
pub fn interpret_solana_balance(address: &str, result: &Value) -> CreateResult {
    let lamports = result
        .get("value")
        .and_then(Value::as_u64)
        .ok_or_else(|| CreateAccountError::Other(format!("unexpected balance value: {}", result)))?;

    Ok(CreatedAccount {
        account_id: address.to_string(),
        balance: Some(Balance::new(Chain::Solana, u128::from(lamports))),
    })
}

// ---------------------------------------------------------------------------
// Bitcoin
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct EsploraAddress {
    chain_stats: EsploraStats,
}

#[derive(Debug, Deserialize)]
struct EsploraStats {
    funded_txo_sum: u64,
    spent_txo_sum: u64,
}

/// Confirms a Bitcoin address against an Esplora REST server
#[derive(Debug, Clone, Default)]
pub struct BitcoinAccountCreator {
    http: HttpClient,
}

impl BitcoinAccountCreator {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountCreator for BitcoinAccountCreator {
    async fn create_account(&self, request: &AccountRequest) -> CreateResult {
        let url = format!("{}/address/{}", request.endpoint.url, request.address);
        debug!(%url, "querying Esplora address");
        let (status, text) = self.http.get(request, &url).await?;
        interpret_esplora_address(&request.address, status, &text)
    }
}

/// Build the account from an Esplora `/address` response
pub fn interpret_esplora_address(address: &str, status: u16, body: &str) -> CreateResult {
    if is_auth_rejection(status) {
        return Err(CreateAccountError::InvalidSignature(format!("endpoint rejected credentials (HTTP {})", status)));
    }
    if !(200..300).contains(&status) {
        return Err(http_failure(status, body));
    }

    let parsed: EsploraAddress = serde_json::from_str(body)
        .map_err(|e| CreateAccountError::Other(format!("Failed to parse response: {}", e)))?;
    let stats = parsed.chain_stats;
    let satoshis = stats.funded_txo_sum.saturating_sub(stats.spent_txo_sum);

    Ok(CreatedAccount {
        account_id: address.to_string(),
        balance: Some(Balance::new(Chain::Bitcoin, u128::from(satoshis))),
    })
}

// ---------------------------------------------------------------------------
// Monero
// ---------------------------------------------------------------------------

/// Checks that a Monero daemon is reachable and on the expected network.
///
/// Balances need the view key on a wallet RPC, so none is reported.
#[derive(Debug, Clone, Default)]
pub struct MoneroAccountCreator {
    http: HttpClient,
}

impl MoneroAccountCreator {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountCreator for MoneroAccountCreator {
    async fn create_account(&self, request: &AccountRequest) -> CreateResult {
        let url = format!("{}/json_rpc", request.endpoint.url);
        let result = self.http.send_request(request, &url, "get_info", serde_json::json!({})).await?;
        interpret_monero_info(&request.address, &request.endpoint.network, &result)
    }
}

/// Build the account from a daemon `get_info` result
pub fn interpret_monero_info(address: &str, expected_network: &str, result: &Value) -> CreateResult {
    if let Some(status) = result.get("status").and_then(Value::as_str) {
        if status != "OK" {
            return Err(CreateAccountError::Other(format!("daemon status {}", status)));
        }
    }

    if let Some(nettype) = result.get("nettype").and_then(Value::as_str) {
        if nettype != expected_network {
            return Err(CreateAccountError::Other(format!(
                "daemon is on {}, expected {}",
                nettype, expected_network
            )));
        }
    }

    Ok(CreatedAccount {
        account_id: address.to_string(),
        balance: None,
    })
}

// ---------------------------------------------------------------------------
// ICP
// ---------------------------------------------------------------------------

/// Checks that an ICP replica answers its status endpoint
#[derive(Debug, Clone, Default)]
pub struct IcpAccountCreator {
    http: HttpClient,
}

impl IcpAccountCreator {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountCreator for IcpAccountCreator {
    async fn create_account(&self, request: &AccountRequest) -> CreateResult {
        let url = format!("{}/api/v2/status", request.endpoint.url);
        let (status, text) = self.http.get(request, &url).await?;
        interpret_icp_status(&request.address, status, &text)
    }
}

/// The replica status body is CBOR; only the HTTP status matters here
pub fn interpret_icp_status(principal: &str, status: u16, body: &str) -> CreateResult {
    if is_auth_rejection(status) {
        return Err(CreateAccountError::InvalidSignature(format!("endpoint rejected credentials (HTTP {})", status)));
    }
    if !(200..300).contains(&status) {
        return Err(http_failure(status, body));
    }

    Ok(CreatedAccount {
        account_id: principal.to_string(),
        balance: None,
    })
}

/// One HTTP creator per chain
pub fn default_creators() -> HashMap<Chain, Arc<dyn AccountCreator>> {
    let mut creators: HashMap<Chain, Arc<dyn AccountCreator>> = HashMap::new();
    creators.insert(Chain::Bitcoin, Arc::new(BitcoinAccountCreator::new()));
    creators.insert(Chain::Ethereum, Arc::new(EthereumAccountCreator::new()));
    creators.insert(Chain::Solana, Arc::new(SolanaAccountCreator::new()));
    creators.insert(Chain::Monero, Arc::new(MoneroAccountCreator::new()));
    creators.insert(Chain::Hedera, Arc::new(HederaAccountCreator::new()));
    creators.insert(Chain::Icp, Arc::new(IcpAccountCreator::new()));
    creators
}
