use async_trait::async_trait;
use provsign_core::{Context, ProvideCredential, ProvideCredentialChain, Result};

use crate::provide_credential::{ClientSecretCredentialProvider, EnvCredentialProvider};
use crate::Credential;

/// Default provider that tries multiple credential sources in order.
///
/// The default provider attempts to load credentials from the following
/// sources in order:
/// 1. Client secret (service principal; yields a management-plane bearer token)
/// 2. Environment (storage account shared key)
#[derive(Debug)]
pub struct DefaultCredentialProvider {
    chain: ProvideCredentialChain<Credential>,
}

impl Default for DefaultCredentialProvider {
    fn default() -> Self {
        let chain = ProvideCredentialChain::new()
            .push(ClientSecretCredentialProvider::new())
            .push(EnvCredentialProvider::new());

        Self { chain }
    }
}

impl DefaultCredentialProvider {
    /// Create a new default provider.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.chain.provide_credential(ctx).await
    }
}
