use std::sync::Arc;

use chain_sol::Address;

use crate::account::AccountInfo;
use crate::client::RpcClient;
use crate::error::ClientResult;

/// Reads account metadata. A missing account is `Ok(None)`; only transport
/// and protocol failures are errors.
#[derive(Debug, Clone)]
pub struct AccountInspector {
    client: Arc<RpcClient>,
}

impl AccountInspector {
    pub fn new(client: Arc<RpcClient>) -> Self {
        Self { client }
    }

    pub async fn get_account_info(&self, address: &Address) -> ClientResult<Option<AccountInfo>> {
        let info = self.client.get_account_info(address).await?;
        match &info {
            Some(account) => tracing::debug!(
                %address,
                owner = %account.owner,
                lamports = account.lamports,
                data_len = account.data.len(),
                "Account found"
            ),
            None => tracing::debug!(%address, "Account does not exist"),
        }
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::mock::{with_context, MockReply, MockTransport};
    use serde_json::{json, Value};

    fn inspector(reply: MockReply) -> AccountInspector {
        let mock = MockTransport::new(move |_, _| reply.clone());
        AccountInspector::new(Arc::new(RpcClient::new(Arc::new(mock))))
    }

    #[tokio::test]
    async fn nonexistent_account_is_absent() {
        let inspector = inspector(MockReply::Result(with_context(Value::Null)));
        let info = inspector
            .get_account_info(&Address::new([3u8; 32]))
            .await
            .unwrap();
        assert!(info.is_none());
    }

    #[tokio::test]
    async fn existing_account_passes_through() {
        let inspector = inspector(MockReply::Result(with_context(json!({
            "data": ["", "base64"],
            "executable": false,
            "lamports": 990_000_000u64,
            "owner": "11111111111111111111111111111111",
            "rentEpoch": 18446744073709551615u64,
            "space": 0
        }))));
        let info = inspector
            .get_account_info(&Address::new([3u8; 32]))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(info.lamports, 990_000_000);
        assert_eq!(info.owner, chain_sol::SYSTEM_PROGRAM_ID);
        assert!(info.data.is_empty());
        assert!(!info.executable);
        assert_eq!(info.rent_epoch, u64::MAX);
    }

    #[tokio::test]
    async fn transport_failure_is_raised() {
        let inspector = inspector(MockReply::TransportFailure("connection reset".into()));
        let err = inspector
            .get_account_info(&Address::new([3u8; 32]))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
