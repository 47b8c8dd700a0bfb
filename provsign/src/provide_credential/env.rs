use async_trait::async_trait;
use provsign_core::{Context, ProvideCredential, Result};

use crate::constants::*;
use crate::credential::Credential;

/// Loads a shared key credential from environment variables.
#[derive(Clone, Debug, Default)]
pub struct EnvCredentialProvider {}

impl EnvCredentialProvider {
    /// Create a new env credential provider.
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let envs = ctx.env_vars();

        let account_name = envs
            .get(AZURE_STORAGE_ACCOUNT_NAME)
            .or_else(|| envs.get(AZBLOB_ACCOUNT_NAME));

        let account_key = envs
            .get(AZURE_STORAGE_ACCOUNT_KEY)
            .or_else(|| envs.get(AZBLOB_ACCOUNT_KEY));

        if let (Some(account_name), Some(account_key)) = (account_name, account_key) {
            return Ok(Some(Credential::with_shared_key(account_name, account_key)));
        }

        Ok(None)
    }
}
