use async_trait::async_trait;
use provsign_core::{Context, ProvideCredential, Result};

use crate::credential::Credential;

/// A provider that always returns the same credential.
///
/// This is useful for examples and tests, or when the credential is sourced
/// out of band.
#[derive(Clone, Debug)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    /// Create a provider holding a shared key credential.
    pub fn new_shared_key(account_name: &str, account_key: &str) -> Self {
        Self {
            credential: Credential::with_shared_key(account_name, account_key),
        }
    }

    /// Create a provider holding a bearer token credential.
    pub fn new_bearer_token(token: &str) -> Self {
        Self {
            credential: Credential::with_bearer_token(token, None),
        }
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(self.credential.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provider_returns_credential() {
        let provider = StaticCredentialProvider::new_bearer_token("token");
        let cred = provider
            .provide_credential(&Context::new())
            .await
            .unwrap()
            .unwrap();

        match cred {
            Credential::BearerToken { token, .. } => assert_eq!(token, "token"),
            _ => panic!("Expected BearerToken credential"),
        }
    }
}
