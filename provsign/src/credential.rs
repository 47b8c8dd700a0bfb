use provsign_core::time::{now, DateTime, Duration};
use provsign_core::utils::Redact;
use provsign_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// Credential enum for the supported authentication methods.
#[derive(Clone)]
pub enum Credential {
    /// Shared Key authentication with account name and key.
    ///
    /// Only usable for local SAS computation; the management plane rejects
    /// shared key auth.
    SharedKey {
        /// Azure storage account name.
        account_name: String,
        /// Azure storage account key.
        account_key: String,
    },
    /// Bearer token for OAuth authentication against the management plane.
    BearerToken {
        /// Bearer token.
        token: String,
        /// Expiration time for this credential.
        expires_at: Option<DateTime>,
    },
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::SharedKey {
                account_name,
                account_key,
            } => f
                .debug_struct("Credential::SharedKey")
                .field("account_name", &Redact::from(account_name))
                .field("account_key", &Redact::from(account_key))
                .finish(),
            Credential::BearerToken { token, expires_at } => f
                .debug_struct("Credential::BearerToken")
                .field("token", &Redact::from(token))
                .field("expires_at", expires_at)
                .finish(),
        }
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        match self {
            Credential::SharedKey {
                account_name,
                account_key,
            } => !account_name.is_empty() && !account_key.is_empty(),
            Credential::BearerToken { token, expires_at } => {
                if token.is_empty() {
                    return false;
                }
                // Check expiration for bearer tokens (take 20s as buffer to avoid edge cases)
                if let Some(expires) = expires_at {
                    *expires > now() + Duration::try_seconds(20).expect("in bounds")
                } else {
                    true
                }
            }
        }
    }
}

impl Credential {
    /// Create a new credential with shared key authentication.
    pub fn with_shared_key(account_name: &str, account_key: &str) -> Self {
        Self::SharedKey {
            account_name: account_name.to_string(),
            account_key: account_key.to_string(),
        }
    }

    /// Create a new credential with bearer token authentication.
    pub fn with_bearer_token(bearer_token: &str, expires_at: Option<DateTime>) -> Self {
        Self::BearerToken {
            token: bearer_token.to_string(),
            expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_key_validity() {
        assert!(Credential::with_shared_key("account", "a2V5").is_valid());
        assert!(!Credential::with_shared_key("", "a2V5").is_valid());
        assert!(!Credential::with_shared_key("account", "").is_valid());
    }

    #[test]
    fn test_bearer_token_expiry() {
        assert!(Credential::with_bearer_token("token", None).is_valid());
        assert!(!Credential::with_bearer_token("", None).is_valid());

        let expired = now() - Duration::try_minutes(5).unwrap();
        assert!(!Credential::with_bearer_token("token", Some(expired)).is_valid());

        let live = now() + Duration::try_hours(1).unwrap();
        assert!(Credential::with_bearer_token("token", Some(live)).is_valid());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let cred = Credential::with_shared_key("account", "super-secret-account-key");
        let repr = format!("{cred:?}");
        assert!(!repr.contains("super-secret-account-key"));
    }
}
