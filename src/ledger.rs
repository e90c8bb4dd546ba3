//! XRP Ledger access
//!
//! [`Ledger`] is the seam between the cycle logic and the network: queries
//! (`ledger_entry`, `amm_info`) go over plain JSON-RPC, mutating operations
//! are autofilled, signed locally, and submitted with validation-wait
//! semantics through the `xrpl` crate. Tests swap in a mock implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use url::Url;
use xrpl::asynch::clients::AsyncJsonRpcClient;
use xrpl::asynch::transaction::submit_and_wait;
use xrpl::models::amount::{Amount, IssuedCurrencyAmount, XRPAmount};
use xrpl::models::currency::{Currency, IssuedCurrency, XRP};
use xrpl::models::transactions::amm_create::AMMCreate;
use xrpl::models::transactions::amm_deposit::{AMMDeposit, AMMDepositFlag};
use xrpl::models::transactions::amm_withdraw::{AMMWithdraw, AMMWithdrawFlag};
use xrpl::wallet::Wallet;

use crate::config::Config;
use crate::error::{Error, Result, TxKind};
use crate::oracle::OracleRecord;
use crate::pool::{xrp_to_drops, PoolState};

/// Ledger error codes that mean "the AMM does not exist yet".
///
/// Only these trigger pool creation; every other lookup failure is a genuine
/// error and fails the cycle.
const NOT_FOUND_CODES: &[&str] = &["ammNotFound", "actNotFound", "entryNotFound"];

/// Operations the adjustment cycle needs from the ledger
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Fetch the oracle's current validated-ledger price record
    async fn oracle_record(&self, account: &str, document_id: u32) -> Result<OracleRecord>;

    /// Look up the XRP/XAG pool; `None` means it does not exist yet
    async fn amm_pool(&self) -> Result<Option<PoolState>>;

    /// Create the pool with seed XRP liquidity and zero XAG
    async fn create_pool(&self) -> Result<()>;

    /// Deposit XRP into the pool, XAG side held at zero
    async fn deposit(&self, xrp: f64) -> Result<()>;

    /// Withdraw XRP from the pool, XAG side held at zero
    async fn withdraw(&self, xrp: f64) -> Result<()>;
}

/// Production [`Ledger`] backed by a rippled JSON-RPC endpoint
pub struct XrplLedger {
    http: reqwest::Client,
    endpoint: Url,
    rpc: AsyncJsonRpcClient,
    wallet: Wallet,
    currency: String,
    issuer: String,
    seed_liquidity_xrp: f64,
    trading_fee: u16,
}

impl XrplLedger {
    /// Derive the operator wallet from `seed` and set up clients for
    /// the configured endpoint
    pub fn new(seed: &str, config: &Config) -> Result<Self> {
        let wallet = Wallet::new(seed, 0).map_err(|e| Error::InvalidConfig {
            field: "seed",
            reason: format!("cannot derive wallet: {}", e),
        })?;
        // The operator doubles as token issuer unless configured otherwise
        let issuer = config
            .issuer
            .clone()
            .unwrap_or_else(|| wallet.classic_address.clone());

        let endpoint = Url::parse(&config.rpc_url).map_err(|e| Error::InvalidConfig {
            field: "rpc_url",
            reason: format!("{}", e),
        })?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::Rpc {
                method: "client",
                message: format!("cannot build HTTP client: {}", e),
            })?;
        let rpc = AsyncJsonRpcClient::connect(endpoint.clone());

        Ok(XrplLedger {
            http,
            endpoint,
            rpc,
            wallet,
            currency: config.currency.clone(),
            issuer,
            seed_liquidity_xrp: config.seed_liquidity_xrp,
            trading_fee: config.trading_fee,
        })
    }

    /// The operator's classic address
    pub fn address(&self) -> &str {
        &self.wallet.classic_address
    }

    /// POST one JSON-RPC request and unwrap the `result` envelope.
    ///
    /// Ledger-side errors are left inside the returned value; callers decide
    /// whether an error code is fatal (see [`rpc_error_code`]).
    async fn post(&self, method: &'static str, params: Value) -> Result<Value> {
        let request_body = json!({
            "method": method,
            "params": [params],
        });

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Rpc {
                method,
                message: format!("request failed: {}", e),
            })?;

        let payload: Value = response.json().await.map_err(|e| Error::Rpc {
            method,
            message: format!("failed to read response: {}", e),
        })?;

        payload.get("result").cloned().ok_or_else(|| Error::Rpc {
            method,
            message: "response missing 'result' field".to_string(),
        })
    }

    /// Fail on any ledger-side error code in `result`
    fn expect_success(method: &'static str, result: Value) -> Result<Value> {
        if let Some(code) = rpc_error_code(&result) {
            return Err(Error::Rpc {
                method,
                message: code.to_string(),
            });
        }
        Ok(result)
    }

    fn xag_currency(&self) -> Currency<'static> {
        Currency::IssuedCurrency(IssuedCurrency::new(
            self.currency.clone().into(),
            self.issuer.clone().into(),
        ))
    }

    fn zero_xag(&self) -> Amount<'static> {
        Amount::IssuedCurrencyAmount(IssuedCurrencyAmount::new(
            self.currency.clone().into(),
            self.issuer.clone().into(),
            "0".into(),
        ))
    }
}

/// Extract the error code from a JSON-RPC `result`, if it reports one
fn rpc_error_code(result: &Value) -> Option<&str> {
    if result.get("status").and_then(Value::as_str) == Some("error") {
        return Some(
            result
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown"),
        );
    }
    None
}

#[async_trait]
impl Ledger for XrplLedger {
    async fn oracle_record(&self, account: &str, document_id: u32) -> Result<OracleRecord> {
        let result = self
            .post(
                "ledger_entry",
                json!({
                    "oracle": {
                        "account": account,
                        "oracle_document_id": document_id,
                    },
                    "ledger_index": "validated",
                }),
            )
            .await?;
        let result = Self::expect_success("ledger_entry", result)?;

        let node = result.get("node").cloned().ok_or_else(|| Error::Rpc {
            method: "ledger_entry",
            message: "response missing 'node'".to_string(),
        })?;
        serde_json::from_value(node)
            .map_err(|e| Error::malformed(format!("cannot decode price-data series: {}", e)))
    }

    async fn amm_pool(&self) -> Result<Option<PoolState>> {
        let result = self
            .post(
                "amm_info",
                json!({
                    "asset": { "currency": "XRP" },
                    "asset2": { "currency": &self.currency, "issuer": &self.issuer },
                }),
            )
            .await?;

        if let Some(code) = rpc_error_code(&result) {
            if NOT_FOUND_CODES.contains(&code) {
                return Ok(None);
            }
            return Err(Error::Rpc {
                method: "amm_info",
                message: code.to_string(),
            });
        }

        PoolState::from_amm_info(&result).map(Some)
    }

    async fn create_pool(&self) -> Result<()> {
        let mut tx = AMMCreate::new(
            self.wallet.classic_address.clone().into(),
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            Amount::XRPAmount(XRPAmount::from(xrp_to_drops(self.seed_liquidity_xrp))),
            self.zero_xag(),
            self.trading_fee,
        );
        submit_and_wait(&mut tx, &self.rpc, Some(&self.wallet), Some(true), Some(true))
            .await
            .map_err(|e| Error::Transaction {
                kind: TxKind::Create,
                message: format!("{}", e),
            })?;
        Ok(())
    }

    async fn deposit(&self, xrp: f64) -> Result<()> {
        let mut tx = AMMDeposit::new(
            self.wallet.classic_address.clone().into(),
            None,
            None,
            Some(vec![AMMDepositFlag::TfSingleAsset].into()),
            None,
            None,
            None,
            None,
            None,
            None,
            Currency::XRP(XRP::new()),
            self.xag_currency(),
            Some(Amount::XRPAmount(XRPAmount::from(xrp_to_drops(xrp)))),
            None,
            None,
            None,
        );
        submit_and_wait(&mut tx, &self.rpc, Some(&self.wallet), Some(true), Some(true))
            .await
            .map_err(|e| Error::Transaction {
                kind: TxKind::Deposit,
                message: format!("{}", e),
            })?;
        Ok(())
    }

    async fn withdraw(&self, xrp: f64) -> Result<()> {
        let mut tx = AMMWithdraw::new(
            self.wallet.classic_address.clone().into(),
            None,
            None,
            Some(vec![AMMWithdrawFlag::TfSingleAsset].into()),
            None,
            None,
            None,
            None,
            None,
            None,
            Currency::XRP(XRP::new()),
            self.xag_currency(),
            Some(Amount::XRPAmount(XRPAmount::from(xrp_to_drops(xrp)))),
            None,
            None,
            None,
        );
        submit_and_wait(&mut tx, &self.rpc, Some(&self.wallet), Some(true), Some(true))
            .await
            .map_err(|e| Error::Transaction {
                kind: TxKind::Withdraw,
                message: format!("{}", e),
            })?;
        Ok(())
    }
}
