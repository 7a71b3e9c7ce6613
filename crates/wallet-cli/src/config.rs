//! Environment configuration.
//!
//! | Variable               | Required | Meaning                                   |
//! |------------------------|----------|-------------------------------------------|
//! | `PRIVATE_KEY`          | yes      | JSON array of the 64 keypair bytes        |
//! | `SOLANA_CLUSTER`       | no       | `devnet` (default), `testnet`, `mainnet-beta`, `localnet` |
//! | `SOLANA_RPC_URL`       | no       | explicit endpoint, overrides the cluster  |
//! | `RECIPIENT`            | no       | Base58 address to send SOL to             |
//! | `TRANSFER_AMOUNT_SOL`  | no       | decimal SOL amount (needs `RECIPIENT`)    |
//! | `CONFIRM_TIMEOUT_SECS` | no       | confirmation wait bound, default 60       |
//! | `RPC_TIMEOUT_SECS`     | no       | per-request HTTP timeout, default 30      |
//!
//! A `.env` file in the working directory is read first if present.
//!
//! Only the identity is validated up front. The transfer variables are kept
//! as text and parsed when the transfer stage runs, so a bad recipient or
//! amount fails that stage alone.

use std::str::FromStr;
use std::time::Duration;

use chain_sol::{Address, Keypair, SolError};
use rust_decimal::Decimal;
use sol_rpc::{ClientError, ClientResult, Cluster, DEFAULT_CONFIRM_TIMEOUT, DEFAULT_RPC_TIMEOUT};

use crate::error::ConfigError;

pub const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";
const CLUSTER_ENV_VAR: &str = "SOLANA_CLUSTER";
const RPC_URL_ENV_VAR: &str = "SOLANA_RPC_URL";
const RECIPIENT_ENV_VAR: &str = "RECIPIENT";
const AMOUNT_ENV_VAR: &str = "TRANSFER_AMOUNT_SOL";
const CONFIRM_TIMEOUT_ENV_VAR: &str = "CONFIRM_TIMEOUT_SECS";
const RPC_TIMEOUT_ENV_VAR: &str = "RPC_TIMEOUT_SECS";

/// Load `.env` into the process environment, ignoring a missing file.
pub fn load_dotenv() {
    dotenv::dotenv().ok();
}

/// A validated transfer to run after the read-only stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    pub recipient: Address,
    pub amount_sol: Decimal,
}

/// Transfer variables as found in the environment, at least one of them set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub recipient: Option<String>,
    pub amount_sol: Option<String>,
}

impl TransferRequest {
    /// Parse into a [`TransferPlan`]. A missing or malformed recipient is an
    /// address error, a missing or malformed amount an `InvalidAmount`.
    pub fn plan(&self) -> ClientResult<TransferPlan> {
        let recipient = self
            .recipient
            .as_deref()
            .ok_or_else(|| SolError::InvalidAddress(format!("{RECIPIENT_ENV_VAR} is not set")))?
            .trim()
            .parse::<Address>()?;

        let amount_sol = self
            .amount_sol
            .as_deref()
            .ok_or_else(|| ClientError::InvalidAmount(format!("{AMOUNT_ENV_VAR} is not set")))?
            .trim()
            .parse::<Decimal>()
            .map_err(|e| ClientError::InvalidAmount(format!("{AMOUNT_ENV_VAR}: {e}")))?;

        Ok(TransferPlan {
            recipient,
            amount_sol,
        })
    }
}

#[derive(Debug)]
pub struct AppConfig {
    pub keypair: Keypair,
    pub cluster: Cluster,
    pub transfer: Option<TransferRequest>,
    pub confirm_timeout: Duration,
    pub rpc_timeout: Duration,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, so callers can supply values
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_key = get(PRIVATE_KEY_ENV_VAR).ok_or(ConfigError::Missing(PRIVATE_KEY_ENV_VAR))?;
        let keypair = parse_private_key(&raw_key)?;

        let cluster = match (get(RPC_URL_ENV_VAR), get(CLUSTER_ENV_VAR)) {
            (Some(url), _) => parse_var(RPC_URL_ENV_VAR, &url)?,
            (None, Some(name)) => parse_var(CLUSTER_ENV_VAR, &name)?,
            (None, None) => Cluster::default(),
        };

        let transfer = match (get(RECIPIENT_ENV_VAR), get(AMOUNT_ENV_VAR)) {
            (None, None) => None,
            (recipient, amount_sol) => Some(TransferRequest {
                recipient,
                amount_sol,
            }),
        };

        let confirm_timeout = get(CONFIRM_TIMEOUT_ENV_VAR)
            .map(|v| parse_var::<u64>(CONFIRM_TIMEOUT_ENV_VAR, &v).map(Duration::from_secs))
            .transpose()?
            .unwrap_or(DEFAULT_CONFIRM_TIMEOUT);

        let rpc_timeout = get(RPC_TIMEOUT_ENV_VAR)
            .map(|v| parse_var::<u64>(RPC_TIMEOUT_ENV_VAR, &v).map(Duration::from_secs))
            .transpose()?
            .unwrap_or(DEFAULT_RPC_TIMEOUT);

        tracing::info!(
            pubkey = %keypair.pubkey(),
            cluster = %cluster,
            transfer = transfer.is_some(),
            "Configuration loaded"
        );

        Ok(Self {
            keypair,
            cluster,
            transfer,
            confirm_timeout,
            rpc_timeout,
        })
    }
}

/// Parse the `PRIVATE_KEY` JSON array (e.g. `[12,34,...]`) into a keypair.
pub fn parse_private_key(raw: &str) -> Result<Keypair, ConfigError> {
    let bytes: Vec<u8> = serde_json::from_str(raw.trim()).map_err(|e| ConfigError::Malformed {
        var: PRIVATE_KEY_ENV_VAR,
        reason: format!("expected a JSON array of bytes: {e}"),
    })?;

    Ok(Keypair::from_bytes(&bytes)?)
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Malformed {
        var,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn key_json(seed: u8) -> String {
        let bytes = Keypair::from_seed(&[seed; 32]).to_bytes();
        serde_json::to_string(&bytes.to_vec()).unwrap()
    }

    fn load(vars: &[(&str, String)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = load(&[("PRIVATE_KEY", key_json(1))]).unwrap();
        assert_eq!(config.keypair.pubkey(), Keypair::from_seed(&[1; 32]).pubkey());
        assert_eq!(config.cluster, Cluster::Devnet);
        assert!(config.transfer.is_none());
        assert_eq!(config.confirm_timeout, Duration::from_secs(60));
        assert_eq!(config.rpc_timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_private_key() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("PRIVATE_KEY")));
    }

    #[test]
    fn private_key_not_json() {
        let err = load(&[("PRIVATE_KEY", "not json".into())]).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { var: "PRIVATE_KEY", .. }));
    }

    #[test]
    fn private_key_wrong_length() {
        let err = load(&[("PRIVATE_KEY", "[1,2,3]".into())]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidKeypair(_)));
    }

    #[test]
    fn private_key_out_of_byte_range() {
        let mut values = vec![0u16; 64];
        values[0] = 256;
        let raw = serde_json::to_string(&values).unwrap();
        assert!(load(&[("PRIVATE_KEY", raw)]).is_err());
    }

    #[test]
    fn explicit_rpc_url_wins() {
        let config = load(&[
            ("PRIVATE_KEY", key_json(1)),
            ("SOLANA_CLUSTER", "testnet".into()),
            ("SOLANA_RPC_URL", "http://127.0.0.1:9999".into()),
        ])
        .unwrap();
        assert_eq!(config.cluster.url(), "http://127.0.0.1:9999");
    }

    #[test]
    fn transfer_plan_parsed() {
        let recipient = Keypair::from_seed(&[2; 32]).pubkey();
        let config = load(&[
            ("PRIVATE_KEY", key_json(1)),
            ("RECIPIENT", recipient.to_string()),
            ("TRANSFER_AMOUNT_SOL", "0.1".into()),
            ("CONFIRM_TIMEOUT_SECS", "15".into()),
        ])
        .unwrap();

        let plan = config.transfer.expect("transfer configured").plan().unwrap();
        assert_eq!(
            plan,
            TransferPlan {
                recipient,
                amount_sol: dec!(0.1),
            }
        );
        assert_eq!(config.confirm_timeout, Duration::from_secs(15));
    }

    fn transfer_error(vars: &[(&str, String)]) -> ClientError {
        let mut all = vec![("PRIVATE_KEY", key_json(1))];
        all.extend_from_slice(vars);
        let config = load(&all).expect("transfer variables never fail loading");
        config.transfer.expect("transfer configured").plan().unwrap_err()
    }

    #[test]
    fn half_a_transfer_plan_fails_at_plan_time() {
        let err = transfer_error(&[("TRANSFER_AMOUNT_SOL", "1".into())]);
        assert!(matches!(err, ClientError::Sol(SolError::InvalidAddress(_))));

        let recipient = Keypair::from_seed(&[2; 32]).pubkey();
        let err = transfer_error(&[("RECIPIENT", recipient.to_string())]);
        assert!(matches!(err, ClientError::InvalidAmount(_)));
    }

    #[test]
    fn bad_recipient_fails_at_plan_time() {
        let err = transfer_error(&[
            ("RECIPIENT", "not-base58!".into()),
            ("TRANSFER_AMOUNT_SOL", "1".into()),
        ]);
        assert!(matches!(err, ClientError::Sol(SolError::InvalidAddress(_))));
    }

    #[test]
    fn non_numeric_amount_fails_at_plan_time() {
        let recipient = Keypair::from_seed(&[2; 32]).pubkey();
        let err = transfer_error(&[
            ("RECIPIENT", recipient.to_string()),
            ("TRANSFER_AMOUNT_SOL", "abc".into()),
        ]);
        match err {
            ClientError::InvalidAmount(reason) => assert!(reason.starts_with("TRANSFER_AMOUNT_SOL")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
