use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use chain_sol::Address;

use crate::error::ClientError;
use crate::wire::UiAccount;

/// On-chain account metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    /// Program that owns the account.
    pub owner: Address,
    pub lamports: u64,
    pub data: Vec<u8>,
    pub executable: bool,
    pub rent_epoch: u64,
}

impl TryFrom<UiAccount> for AccountInfo {
    type Error = ClientError;

    fn try_from(ui: UiAccount) -> Result<Self, Self::Error> {
        let (payload, encoding) = ui.data;
        if encoding != "base64" {
            return Err(ClientError::Transport(format!(
                "unexpected account data encoding '{encoding}'"
            )));
        }
        let data = B64
            .decode(payload.as_bytes())
            .map_err(|e| ClientError::Transport(format!("malformed account data: {e}")))?;
        let owner = ui
            .owner
            .parse()
            .map_err(|e| ClientError::Transport(format!("malformed account owner: {e}")))?;

        Ok(Self {
            owner,
            lamports: ui.lamports,
            data,
            executable: ui.executable,
            rent_epoch: ui.rent_epoch,
        })
    }
}
