//! Post-connect action panels.
//!
//! Each operation follows the same shape: require a provider, build the
//! request, submit it, then store either the opaque result or the error text.
//! The `loading` flag is raised before the provider is called, so a second
//! submission while one is in flight is rejected with [`DappError::Busy`].
//! The flag drops again if the caller abandons the operation.

use std::sync::{Arc, Mutex};

use chain_eth::erc20::{decode_balance_of, encode_balance_of, encode_transfer};
use chain_eth::units::{from_base_units, parse_ether, to_base_units, to_hex_quantity};
use chain_eth::U256;
use chain_sol::{
    address_to_bytes, build_sol_transfer, format_sol, wire_signatures, SolTransaction,
    SolanaRpcClient, SIGNATURE_LEN,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::busy::{lock, BusyGuard, InFlight};
use crate::error::DappError;
use crate::provider::{CallRequest, EthereumProvider, SolanaProvider, SolanaRpc, TransactionRequest};

/// Notice stored after a sign-only Solana transfer.
pub const SIGNED_NOT_SENT: &str = "transaction signed (not sent)";

const SOLANA_EXPLORER_TX_URL: &str = "https://explorer.solana.com/tx";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EthereumActionConfig {
    pub recipient: String,
    /// Decimal ether amount for the native transfer.
    pub native_amount: String,
    pub native_gas: u64,
    pub token_contract: String,
    pub token_decimals: u8,
    pub token_symbol: String,
    /// Decimal token amount for the ERC-20 transfer.
    pub token_amount: String,
    pub contract_gas: u64,
}

impl Default for EthereumActionConfig {
    fn default() -> Self {
        Self {
            recipient: "0x742d35Cc6634C0532925a3b844Bc454e4438f44e".to_string(),
            native_amount: "0.001".to_string(),
            native_gas: 21_000,
            token_contract: "0xdac17f958d2ee523a2206206994597c13d831ec7".to_string(),
            token_decimals: 6,
            token_symbol: "USDT".to_string(),
            token_amount: "1".to_string(),
            contract_gas: 100_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolanaActionConfig {
    pub rpc_url: String,
    pub commitment: String,
    pub recipient: String,
    pub lamports: u64,
    /// Cluster name appended to explorer links.
    pub cluster: String,
}

impl Default for SolanaActionConfig {
    fn default() -> Self {
        Self {
            rpc_url: chain_sol::DEVNET_URL.to_string(),
            commitment: "confirmed".to_string(),
            recipient: "9B5XszUGdMaxCZ7uSQhPzdks5ZQSmWxrmzCSvtJ6Ns6g".to_string(),
            lamports: 1_000_000,
            cluster: "devnet".to_string(),
        }
    }
}

impl SolanaActionConfig {
    pub fn explorer_url(&self, signature: &str) -> String {
        format!("{SOLANA_EXPLORER_TX_URL}/{signature}?cluster={}", self.cluster)
    }

    /// RPC client settings matching this panel.
    pub fn rpc_client_config(&self) -> chain_sol::RpcClientConfig {
        chain_sol::RpcClientConfig {
            url: self.rpc_url.clone(),
            commitment: self.commitment.clone(),
            ..chain_sol::RpcClientConfig::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Ethereum
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EthereumPanelState {
    pub loading: bool,
    pub tx_hash: Option<String>,
    /// `"<amount> <symbol>"` from the last balance read.
    pub token_balance: Option<String>,
    pub error: Option<String>,
}

impl InFlight for EthereumPanelState {
    fn in_flight(&mut self) -> &mut bool {
        &mut self.loading
    }
}

pub struct EthereumActions {
    provider: Option<Arc<dyn EthereumProvider>>,
    address: String,
    config: EthereumActionConfig,
    state: Mutex<EthereumPanelState>,
}

impl EthereumActions {
    pub fn new(
        provider: Option<Arc<dyn EthereumProvider>>,
        address: impl Into<String>,
        config: EthereumActionConfig,
    ) -> Self {
        Self {
            provider,
            address: address.into(),
            config,
            state: Mutex::new(EthereumPanelState::default()),
        }
    }

    pub fn config(&self) -> &EthereumActionConfig {
        &self.config
    }

    pub fn state(&self) -> EthereumPanelState {
        lock(&self.state).clone()
    }

    /// Native ETH transfer to the configured recipient.
    pub async fn send_native(&self) -> Result<String, DappError> {
        let guard = self.begin(true)?;
        let result = self.submit_native().await;
        Self::finish_tx(guard, "native transfer", result)
    }

    /// ERC-20 `transfer` of the configured token amount.
    pub async fn transfer_token(&self) -> Result<String, DappError> {
        let guard = self.begin(true)?;
        let result = self.submit_token_transfer().await;
        Self::finish_tx(guard, "token transfer", result)
    }

    /// ERC-20 `balanceOf` for the connected address, formatted with the
    /// token's decimals and symbol.
    pub async fn read_token_balance(&self) -> Result<String, DappError> {
        let guard = self.begin(false)?;
        let result = self.query_token_balance().await;

        guard.finish(|state| match result {
            Ok(text) => {
                info!(address = %self.address, balance = %text, "token balance read");
                state.token_balance = Some(text.clone());
                Ok(text)
            }
            Err(err) => {
                warn!(error = %err, "token balance read failed");
                state.error = Some(err.to_string());
                Err(err)
            }
        })
    }

    fn begin(&self, clears_tx: bool) -> Result<BusyGuard<'_, EthereumPanelState>, DappError> {
        BusyGuard::acquire(&self.state, |state| {
            state.error = None;
            if clears_tx {
                state.tx_hash = None;
            }
        })
    }

    fn finish_tx(
        guard: BusyGuard<'_, EthereumPanelState>,
        what: &str,
        result: Result<String, DappError>,
    ) -> Result<String, DappError> {
        guard.finish(|state| match result {
            Ok(hash) => {
                info!(tx_hash = %hash, "{what} submitted");
                state.tx_hash = Some(hash.clone());
                Ok(hash)
            }
            Err(err) => {
                warn!(error = %err, "{what} failed");
                state.error = Some(err.to_string());
                Err(err)
            }
        })
    }

    fn provider(&self) -> Result<&Arc<dyn EthereumProvider>, DappError> {
        self.provider.as_ref().ok_or(DappError::WalletNotDetected)
    }

    async fn submit_native(&self) -> Result<String, DappError> {
        let provider = self.provider()?;
        let tx = TransactionRequest {
            from: self.address.clone(),
            to: self.config.recipient.clone(),
            value: Some(to_hex_quantity(parse_ether(&self.config.native_amount)?)),
            data: None,
            gas: Some(to_hex_quantity(U256::from(self.config.native_gas))),
        };
        Ok(provider.send_transaction(&tx).await?)
    }

    async fn submit_token_transfer(&self) -> Result<String, DappError> {
        let provider = self.provider()?;
        let amount = to_base_units(&self.config.token_amount, self.config.token_decimals)?;
        let calldata = encode_transfer(&self.config.recipient, amount)?;

        let tx = TransactionRequest {
            from: self.address.clone(),
            to: self.config.token_contract.clone(),
            value: None,
            data: Some(format!("0x{}", hex::encode(calldata))),
            gas: Some(to_hex_quantity(U256::from(self.config.contract_gas))),
        };
        Ok(provider.send_transaction(&tx).await?)
    }

    async fn query_token_balance(&self) -> Result<String, DappError> {
        let provider = self.provider()?;
        let call = CallRequest {
            to: self.config.token_contract.clone(),
            data: format!("0x{}", hex::encode(encode_balance_of(&self.address)?)),
        };

        let raw = provider.call(&call, "latest").await?;
        let balance = decode_balance_of(&raw)?;
        let amount = from_base_units(balance, self.config.token_decimals)?;
        Ok(format!("{amount} {}", self.config.token_symbol))
    }
}

// ---------------------------------------------------------------------------
// Solana
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolanaPanelState {
    pub loading: bool,
    /// SOL balance with four decimals.
    pub balance: Option<String>,
    pub signature: Option<String>,
    pub explorer_url: Option<String>,
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl InFlight for SolanaPanelState {
    fn in_flight(&mut self) -> &mut bool {
        &mut self.loading
    }
}

pub struct SolanaActions {
    provider: Option<Arc<dyn SolanaProvider>>,
    rpc: Arc<dyn SolanaRpc>,
    address: String,
    config: SolanaActionConfig,
    state: Mutex<SolanaPanelState>,
}

impl SolanaActions {
    pub fn new(
        provider: Option<Arc<dyn SolanaProvider>>,
        rpc: Arc<dyn SolanaRpc>,
        address: impl Into<String>,
        config: SolanaActionConfig,
    ) -> Self {
        Self {
            provider,
            rpc,
            address: address.into(),
            config,
            state: Mutex::new(SolanaPanelState::default()),
        }
    }

    /// Panel talking to the RPC endpoint named in `config`.
    pub fn from_config(
        provider: Option<Arc<dyn SolanaProvider>>,
        address: impl Into<String>,
        config: SolanaActionConfig,
    ) -> Result<Self, DappError> {
        let rpc = SolanaRpcClient::with_config(config.rpc_client_config())?;
        info!(url = %config.rpc_url, commitment = %config.commitment, "solana rpc configured");
        Ok(Self::new(provider, Arc::new(rpc), address, config))
    }

    pub fn config(&self) -> &SolanaActionConfig {
        &self.config
    }

    pub fn state(&self) -> SolanaPanelState {
        lock(&self.state).clone()
    }

    /// Balance of the connected address, e.g. `"1.5000"`.
    pub async fn query_balance(&self) -> Result<String, DappError> {
        let guard = self.begin(|_| {})?;
        let result = self.fetch_balance().await;

        guard.finish(|state| match result {
            Ok(balance) => {
                info!(address = %self.address, sol = %balance, "balance queried");
                state.balance = Some(balance.clone());
                Ok(balance)
            }
            Err(err) => Err(Self::record_error(state, "balance query", err)),
        })
    }

    /// Build, sign and broadcast the configured transfer. Returns the
    /// transaction signature.
    pub async fn send_transfer(&self) -> Result<String, DappError> {
        let guard = self.begin(|state| {
            state.signature = None;
            state.explorer_url = None;
        })?;
        let result = self.submit_transfer().await;

        guard.finish(|state| match result {
            Ok(signature) => {
                let link = self.config.explorer_url(&signature);
                info!(%signature, explorer = %link, "transfer sent");
                state.signature = Some(signature.clone());
                state.explorer_url = Some(link);
                Ok(signature)
            }
            Err(err) => Err(Self::record_error(state, "transfer", err)),
        })
    }

    /// Build and sign the configured transfer without broadcasting it.
    /// Returns the signed wire transaction.
    pub async fn sign_transfer(&self) -> Result<Vec<u8>, DappError> {
        let guard = self.begin(|state| state.notice = None)?;
        let result = self.sign_only().await;

        guard.finish(|state| match result {
            Ok(wire) => {
                info!(bytes = wire.len(), "transfer signed, not broadcast");
                state.notice = Some(SIGNED_NOT_SENT.to_string());
                Ok(wire)
            }
            Err(err) => Err(Self::record_error(state, "sign transfer", err)),
        })
    }

    fn begin(
        &self,
        reset: impl FnOnce(&mut SolanaPanelState),
    ) -> Result<BusyGuard<'_, SolanaPanelState>, DappError> {
        BusyGuard::acquire(&self.state, |state| {
            state.error = None;
            reset(state);
        })
    }

    fn record_error(state: &mut SolanaPanelState, what: &str, err: DappError) -> DappError {
        warn!(error = %err, "{what} failed");
        state.error = Some(err.to_string());
        err
    }

    fn provider(&self) -> Result<&Arc<dyn SolanaProvider>, DappError> {
        self.provider.as_ref().ok_or(DappError::WalletNotDetected)
    }

    async fn fetch_balance(&self) -> Result<String, DappError> {
        self.provider()?;
        address_to_bytes(&self.address)?;
        let lamports = self.rpc.get_balance(&self.address).await?;
        Ok(format_sol(lamports))
    }

    async fn build_transfer(&self) -> Result<SolTransaction, DappError> {
        let from = address_to_bytes(&self.address)?;
        let to = address_to_bytes(&self.config.recipient)?;
        let blockhash = self.rpc.get_latest_blockhash().await?;
        Ok(build_sol_transfer(&from, &to, self.config.lamports, &blockhash)?)
    }

    async fn submit_transfer(&self) -> Result<String, DappError> {
        let provider = self.provider()?;
        let tx = self.build_transfer().await?;
        Ok(provider.sign_and_send_transaction(&tx).await?)
    }

    async fn sign_only(&self) -> Result<Vec<u8>, DappError> {
        let provider = self.provider()?;
        let tx = self.build_transfer().await?;
        let wire = provider.sign_transaction(&tx).await?;

        let signed = wire_signatures(&wire)?
            .first()
            .is_some_and(|sig| sig != &[0u8; SIGNATURE_LEN]);
        if !signed {
            return Err(DappError::Provider(
                "wallet returned an unsigned transaction".into(),
            ));
        }
        Ok(wire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;
    use async_trait::async_trait;
    use chain_sol::RpcError;
    use serde_json::json;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;
    use tokio::sync::Notify;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const OWNER: &str = "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf";

    #[derive(Default)]
    struct RecordingEth {
        sent: StdMutex<Vec<TransactionRequest>>,
        calls: StdMutex<Vec<CallRequest>>,
        call_result: String,
    }

    #[async_trait]
    impl EthereumProvider for RecordingEth {
        async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
            Ok(vec![OWNER.into()])
        }

        async fn personal_sign(&self, _: &str, _: &str) -> Result<String, ProviderError> {
            Err(ProviderError::new("unsupported"))
        }

        async fn send_transaction(&self, tx: &TransactionRequest) -> Result<String, ProviderError> {
            self.sent.lock().unwrap().push(tx.clone());
            Ok("0xfeed".into())
        }

        async fn call(&self, call: &CallRequest, block: &str) -> Result<String, ProviderError> {
            assert_eq!(block, "latest");
            self.calls.lock().unwrap().push(call.clone());
            Ok(self.call_result.clone())
        }
    }

    struct FixedRpc {
        lamports: u64,
    }

    #[async_trait]
    impl SolanaRpc for FixedRpc {
        async fn get_balance(&self, _: &str) -> Result<u64, RpcError> {
            Ok(self.lamports)
        }

        async fn get_latest_blockhash(&self) -> Result<[u8; 32], RpcError> {
            Ok([9u8; 32])
        }
    }

    struct EchoSol;

    #[async_trait]
    impl SolanaProvider for EchoSol {
        async fn connect(&self) -> Result<[u8; 32], ProviderError> {
            Ok([1u8; 32])
        }

        async fn sign_message(&self, _: &[u8]) -> Result<Vec<u8>, ProviderError> {
            Ok(vec![2u8; 64])
        }

        async fn sign_transaction(&self, tx: &SolTransaction) -> Result<Vec<u8>, ProviderError> {
            tx.to_wire(&[[3u8; 64]])
                .map_err(|e| ProviderError::new(e.to_string()))
        }

        async fn sign_and_send_transaction(
            &self,
            _: &SolTransaction,
        ) -> Result<String, ProviderError> {
            Ok("5sig".into())
        }
    }

    /// Holds every wallet or node request until released.
    #[derive(Default)]
    struct Gate {
        entered: Notify,
        release: Notify,
    }

    impl Gate {
        async fn pass(&self) {
            self.entered.notify_one();
            self.release.notified().await;
        }
    }

    #[async_trait]
    impl EthereumProvider for Gate {
        async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
            Ok(vec![OWNER.into()])
        }

        async fn personal_sign(&self, _: &str, _: &str) -> Result<String, ProviderError> {
            Err(ProviderError::new("unsupported"))
        }

        async fn send_transaction(&self, _: &TransactionRequest) -> Result<String, ProviderError> {
            self.pass().await;
            Ok("0xslow".into())
        }

        async fn call(&self, _: &CallRequest, _: &str) -> Result<String, ProviderError> {
            self.pass().await;
            Ok(format!("0x{:064x}", 0))
        }
    }

    #[async_trait]
    impl SolanaRpc for Gate {
        async fn get_balance(&self, _: &str) -> Result<u64, RpcError> {
            self.pass().await;
            Ok(1)
        }

        async fn get_latest_blockhash(&self) -> Result<[u8; 32], RpcError> {
            self.pass().await;
            Ok([9u8; 32])
        }
    }

    fn eth_actions(provider: Arc<RecordingEth>) -> EthereumActions {
        EthereumActions::new(Some(provider), OWNER, EthereumActionConfig::default())
    }

    #[tokio::test]
    async fn native_transfer_request_shape() {
        let provider = Arc::new(RecordingEth::default());
        let actions = eth_actions(provider.clone());

        assert_eq!(actions.send_native().await.unwrap(), "0xfeed");

        let sent = provider.sent.lock().unwrap()[0].clone();
        assert_eq!(sent.from, OWNER);
        assert_eq!(sent.to, "0x742d35Cc6634C0532925a3b844Bc454e4438f44e");
        assert_eq!(sent.value.as_deref(), Some("0x38d7ea4c68000"));
        assert_eq!(sent.gas.as_deref(), Some("0x5208"));
        assert!(sent.data.is_none());

        let state = actions.state();
        assert_eq!(state.tx_hash.as_deref(), Some("0xfeed"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn token_transfer_targets_contract() {
        let provider = Arc::new(RecordingEth::default());
        let actions = eth_actions(provider.clone());

        actions.transfer_token().await.unwrap();

        let sent = provider.sent.lock().unwrap()[0].clone();
        assert_eq!(sent.to, "0xdac17f958d2ee523a2206206994597c13d831ec7");
        assert_eq!(sent.gas.as_deref(), Some("0x186a0"));
        let data = sent.data.unwrap();
        assert!(data.starts_with("0xa9059cbb"));
        assert!(data.ends_with("f4240"));
        assert_eq!(data.len(), 2 + 68 * 2);
    }

    #[tokio::test]
    async fn token_balance_is_formatted_with_symbol() {
        let provider = Arc::new(RecordingEth {
            call_result: format!("0x{:064x}", 2_500_000u64),
            ..RecordingEth::default()
        });
        let actions = eth_actions(provider.clone());

        let text = actions.read_token_balance().await.unwrap();
        assert_eq!(text, "2.500000 USDT");
        assert_eq!(actions.state().token_balance.as_deref(), Some("2.500000 USDT"));
        assert!(provider.calls.lock().unwrap()[0].data.starts_with("0x70a08231"));
    }

    #[tokio::test]
    async fn missing_provider_is_stored_as_error() {
        let actions = EthereumActions::new(None, OWNER, EthereumActionConfig::default());
        assert!(matches!(
            actions.send_native().await,
            Err(DappError::WalletNotDetected)
        ));
        let state = actions.state();
        assert!(state.error.unwrap().contains("no wallet detected"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn malformed_call_result_is_reported() {
        let provider = Arc::new(RecordingEth {
            call_result: "0x1234".into(),
            ..RecordingEth::default()
        });
        let actions = eth_actions(provider);
        assert!(actions.read_token_balance().await.is_err());
        assert!(actions.state().error.is_some());
    }

    fn sol_actions(provider: Option<Arc<dyn SolanaProvider>>, lamports: u64) -> SolanaActions {
        SolanaActions::new(
            provider,
            Arc::new(FixedRpc { lamports }),
            chain_sol::pubkey_to_address(&[1u8; 32]),
            SolanaActionConfig::default(),
        )
    }

    #[tokio::test]
    async fn balance_has_four_decimals() {
        let actions = sol_actions(Some(Arc::new(EchoSol)), 1_500_000_000);
        assert_eq!(actions.query_balance().await.unwrap(), "1.5000");
        assert_eq!(actions.state().balance.as_deref(), Some("1.5000"));
    }

    #[tokio::test]
    async fn balance_requires_wallet() {
        let actions = sol_actions(None, 1);
        assert!(matches!(
            actions.query_balance().await,
            Err(DappError::WalletNotDetected)
        ));
    }

    #[tokio::test]
    async fn send_stores_explorer_link() {
        let actions = sol_actions(Some(Arc::new(EchoSol)), 0);
        assert_eq!(actions.send_transfer().await.unwrap(), "5sig");
        let state = actions.state();
        assert_eq!(
            state.explorer_url.as_deref(),
            Some("https://explorer.solana.com/tx/5sig?cluster=devnet")
        );
    }

    #[tokio::test]
    async fn sign_only_stores_notice() {
        let actions = sol_actions(Some(Arc::new(EchoSol)), 0);
        let wire = actions.sign_transfer().await.unwrap();
        assert_eq!(wire_signatures(&wire).unwrap(), vec![[3u8; 64]]);
        let state = actions.state();
        assert_eq!(state.notice.as_deref(), Some(SIGNED_NOT_SENT));
        assert!(state.signature.is_none());
    }

    #[tokio::test]
    async fn overlapping_ethereum_actions_are_busy() {
        let gate = Arc::new(Gate::default());
        let actions = Arc::new(EthereumActions::new(
            Some(gate.clone()),
            OWNER,
            EthereumActionConfig::default(),
        ));

        let first = tokio::spawn({
            let actions = actions.clone();
            async move { actions.send_native().await }
        });
        gate.entered.notified().await;

        assert!(actions.state().loading);
        assert!(matches!(actions.send_native().await, Err(DappError::Busy)));
        assert!(matches!(actions.transfer_token().await, Err(DappError::Busy)));
        assert!(matches!(actions.read_token_balance().await, Err(DappError::Busy)));

        gate.release.notify_one();
        assert_eq!(first.await.unwrap().unwrap(), "0xslow");

        let state = actions.state();
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert_eq!(state.tx_hash.as_deref(), Some("0xslow"));
    }

    #[tokio::test]
    async fn overlapping_solana_actions_are_busy() {
        let gate = Arc::new(Gate::default());
        let actions = Arc::new(SolanaActions::new(
            Some(Arc::new(EchoSol)),
            gate.clone(),
            chain_sol::pubkey_to_address(&[1u8; 32]),
            SolanaActionConfig::default(),
        ));

        let first = tokio::spawn({
            let actions = actions.clone();
            async move { actions.query_balance().await }
        });
        gate.entered.notified().await;

        assert!(matches!(actions.query_balance().await, Err(DappError::Busy)));
        assert!(matches!(actions.send_transfer().await, Err(DappError::Busy)));
        assert!(matches!(actions.sign_transfer().await, Err(DappError::Busy)));

        gate.release.notify_one();
        assert_eq!(first.await.unwrap().unwrap(), "0.0000");
        assert!(!actions.state().loading);
    }

    #[tokio::test]
    async fn abandoned_action_releases_the_panel() {
        let gate = Arc::new(Gate::default());
        let actions = EthereumActions::new(Some(gate.clone()), OWNER, EthereumActionConfig::default());

        let attempt = tokio::time::timeout(Duration::from_millis(20), actions.send_native()).await;
        assert!(attempt.is_err());
        assert!(!actions.state().loading);

        let sol = SolanaActions::new(
            Some(Arc::new(EchoSol)),
            gate.clone(),
            chain_sol::pubkey_to_address(&[1u8; 32]),
            SolanaActionConfig::default(),
        );
        let attempt = tokio::time::timeout(Duration::from_millis(20), sol.query_balance()).await;
        assert!(attempt.is_err());
        assert!(!sol.state().loading);

        // The next request reaches the wallet instead of failing with `Busy`.
        let retry = tokio::spawn({
            let gate = gate.clone();
            async move {
                gate.entered.notified().await;
                gate.release.notify_one();
            }
        });
        assert_eq!(actions.read_token_balance().await.unwrap(), "0.000000 USDT");
        retry.await.unwrap();
    }

    #[tokio::test]
    async fn rpc_endpoint_comes_from_config() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "getBalance",
                "params": [chain_sol::pubkey_to_address(&[1u8; 32]), { "commitment": "finalized" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": { "context": { "slot": 1 }, "value": 250_000_000u64 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = SolanaActionConfig {
            rpc_url: server.uri(),
            commitment: "finalized".into(),
            ..SolanaActionConfig::default()
        };
        let actions = SolanaActions::from_config(
            Some(Arc::new(EchoSol)),
            chain_sol::pubkey_to_address(&[1u8; 32]),
            config,
        )
        .unwrap();

        assert_eq!(actions.query_balance().await.unwrap(), "0.2500");
    }

    #[test]
    fn bad_rpc_url_is_rejected_up_front() {
        let config = SolanaActionConfig {
            rpc_url: "not a url".into(),
            ..SolanaActionConfig::default()
        };
        assert!(matches!(
            SolanaActions::from_config(None, "x", config),
            Err(DappError::Rpc(RpcError::Url(_)))
        ));
    }

    #[test]
    fn configs_deserialize_with_defaults() {
        let eth: EthereumActionConfig =
            serde_json::from_str(r#"{ "token_symbol": "USDC" }"#).unwrap();
        assert_eq!(eth.token_symbol, "USDC");
        assert_eq!(eth.native_gas, 21_000);

        let sol: SolanaActionConfig = serde_json::from_str(r#"{ "cluster": "testnet" }"#).unwrap();
        assert_eq!(sol.explorer_url("x"), "https://explorer.solana.com/tx/x?cluster=testnet");
        assert_eq!(sol.lamports, 1_000_000);
    }
}
