//! Named Solana clusters and their public RPC endpoints.

use std::fmt;
use std::str::FromStr;

use chain_sol::Signature;

use crate::error::ClientError;

/// A cluster the client talks to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cluster {
    #[default]
    Devnet,
    Testnet,
    MainnetBeta,
    Localnet,
    /// Any compatible JSON-RPC endpoint.
    Custom(String),
}

impl Cluster {
    /// JSON-RPC URL of the cluster.
    pub fn url(&self) -> &str {
        match self {
            Cluster::Devnet => "https://api.devnet.solana.com",
            Cluster::Testnet => "https://api.testnet.solana.com",
            Cluster::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Cluster::Localnet => "http://127.0.0.1:8899",
            Cluster::Custom(url) => url,
        }
    }

    /// The `cluster` query parameter understood by the block explorer.
    fn explorer_param(&self) -> Option<&'static str> {
        match self {
            Cluster::Devnet => Some("devnet"),
            Cluster::Testnet => Some("testnet"),
            Cluster::MainnetBeta => None,
            Cluster::Localnet | Cluster::Custom(_) => Some("custom"),
        }
    }

    /// Block explorer link for a transaction signature. Custom clusters also
    /// carry their RPC URL so the explorer knows where to look.
    pub fn explorer_tx_url(&self, signature: &Signature) -> String {
        let base = format!("https://explorer.solana.com/tx/{signature}");
        match self.explorer_param() {
            Some("custom") => {
                let rpc: String =
                    url::form_urlencoded::byte_serialize(self.url().as_bytes()).collect();
                format!("{base}?cluster=custom&customUrl={rpc}")
            }
            Some(cluster) => format!("{base}?cluster={cluster}"),
            None => base,
        }
    }
}

impl FromStr for Cluster {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "devnet" => Ok(Cluster::Devnet),
            "testnet" => Ok(Cluster::Testnet),
            "mainnet" | "mainnet-beta" => Ok(Cluster::MainnetBeta),
            "localnet" | "localhost" => Ok(Cluster::Localnet),
            other => {
                let url = url::Url::parse(other).map_err(|e| {
                    ClientError::Transport(format!("invalid cluster '{other}': {e}"))
                })?;
                match url.scheme() {
                    "http" | "https" => Ok(Cluster::Custom(other.to_string())),
                    scheme => Err(ClientError::Transport(format!(
                        "unsupported RPC scheme '{scheme}'"
                    ))),
                }
            }
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cluster::Devnet => f.write_str("devnet"),
            Cluster::Testnet => f.write_str("testnet"),
            Cluster::MainnetBeta => f.write_str("mainnet-beta"),
            Cluster::Localnet => f.write_str("localnet"),
            Cluster::Custom(url) => f.write_str(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn devnet_is_default() {
        assert_eq!(Cluster::default().url(), "https://api.devnet.solana.com");
    }

    #[test]
    fn parse_named_clusters() {
        assert_eq!("devnet".parse::<Cluster>().unwrap(), Cluster::Devnet);
        assert_eq!("mainnet-beta".parse::<Cluster>().unwrap(), Cluster::MainnetBeta);
        assert_eq!("localhost".parse::<Cluster>().unwrap(), Cluster::Localnet);
    }

    #[test]
    fn parse_custom_url() {
        let cluster: Cluster = "http://10.0.0.5:8899".parse().unwrap();
        assert_eq!(cluster.url(), "http://10.0.0.5:8899");
    }

    #[test]
    fn reject_unknown_name() {
        assert!("moonnet".parse::<Cluster>().is_err());
        assert!("ftp://example.com".parse::<Cluster>().is_err());
    }

    #[test]
    fn devnet_explorer_link() {
        let sig = Signature::new([1u8; 64]);
        let url = Cluster::Devnet.explorer_tx_url(&sig);
        assert_eq!(
            url,
            format!("https://explorer.solana.com/tx/{sig}?cluster=devnet")
        );
    }

    #[test]
    fn custom_explorer_link_carries_rpc_url() {
        let sig = Signature::new([1u8; 64]);
        assert_eq!(
            Cluster::Localnet.explorer_tx_url(&sig),
            format!(
                "https://explorer.solana.com/tx/{sig}?cluster=custom&customUrl=http%3A%2F%2F127.0.0.1%3A8899"
            )
        );

        let custom: Cluster = "https://rpc.example.com/solana".parse().unwrap();
        assert!(custom
            .explorer_tx_url(&sig)
            .ends_with("?cluster=custom&customUrl=https%3A%2F%2Frpc.example.com%2Fsolana"));
    }

    #[test]
    fn mainnet_explorer_link_has_no_cluster() {
        let sig = Signature::new([1u8; 64]);
        assert!(!Cluster::MainnetBeta.explorer_tx_url(&sig).contains('?'));
    }
}
