use crate::constants::*;
use provsign_core::{Context, Error, Result};
use rand::Rng;

/// Config carries all the configuration for provisioning and signing.
///
/// Every knob is an explicit field on this struct; nothing is read from
/// ambient process state after [`Config::from_env`] returns.
#[derive(Clone, Default)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Config {
    /// `subscription_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_SUBSCRIPTION_ID`]
    pub subscription_id: Option<String>,
    /// `resource_group` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_RESOURCE_GROUP`]
    /// - defaults to `rust-azure-sdk`
    pub resource_group: Option<String>,
    /// `account_name` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_STORAGE_ACCOUNT_NAME`] (alias [`AZBLOB_ACCOUNT_NAME`])
    /// - defaults to `rustazure`
    pub account_name: Option<String>,
    /// `account_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_STORAGE_ACCOUNT_KEY`] (alias [`AZBLOB_ACCOUNT_KEY`])
    pub account_key: Option<String>,
    /// Pins the container name. When unset, a randomized name is generated
    /// per run, so repeated invocations do not collide.
    pub container_name: Option<String>,
    /// Region used when the storage account has to be addressed by location.
    pub location: Option<String>,
    /// Base endpoint of the resource management API.
    ///
    /// Override for sovereign clouds or tests; defaults to the public cloud.
    pub management_endpoint: Option<String>,
    /// `tenant_id` value will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_TENANT_ID`]
    pub tenant_id: Option<String>,
    /// `client_id` value will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_CLIENT_ID`]
    pub client_id: Option<String>,
    /// `client_secret` value will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_CLIENT_SECRET`]
    pub client_secret: Option<String>,
    /// `authority_host` value will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_AUTHORITY_HOST`]
    pub authority_host: Option<String>,
}

impl Config {
    /// Load config from the environment exposed by the context.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let envs = ctx.env_vars();

        if let Some(v) = envs.get(AZURE_SUBSCRIPTION_ID) {
            self.subscription_id = Some(v.to_string());
        }

        if let Some(v) = envs.get(AZURE_RESOURCE_GROUP) {
            self.resource_group = Some(v.to_string());
        }

        if let Some(v) = envs
            .get(AZURE_STORAGE_ACCOUNT_NAME)
            .or_else(|| envs.get(AZBLOB_ACCOUNT_NAME))
        {
            self.account_name = Some(v.to_string());
        }

        if let Some(v) = envs
            .get(AZURE_STORAGE_ACCOUNT_KEY)
            .or_else(|| envs.get(AZBLOB_ACCOUNT_KEY))
        {
            self.account_key = Some(v.to_string());
        }

        if let Some(v) = envs.get(AZURE_STORAGE_CONTAINER) {
            self.container_name = Some(v.to_string());
        }

        if let Some(v) = envs.get(AZURE_LOCATION) {
            self.location = Some(v.to_string());
        }

        if let Some(v) = envs.get(AZURE_MANAGEMENT_ENDPOINT) {
            self.management_endpoint = Some(v.to_string());
        }

        if let Some(v) = envs.get(AZURE_TENANT_ID) {
            self.tenant_id = Some(v.to_string());
        }

        if let Some(v) = envs.get(AZURE_CLIENT_ID) {
            self.client_id = Some(v.to_string());
        }

        if let Some(v) = envs.get(AZURE_CLIENT_SECRET) {
            self.client_secret = Some(v.to_string());
        }

        if let Some(v) = envs.get(AZURE_AUTHORITY_HOST) {
            self.authority_host = Some(v.to_string());
        } else {
            self.authority_host = Some(DEFAULT_AUTHORITY_HOST.to_string());
        }

        self
    }

    /// Check that every required value is present.
    ///
    /// The subscription id and the account access key have no workable
    /// default; a run without them is aborted before any network call.
    pub fn validate(&self) -> Result<()> {
        if self.subscription_id.as_deref().unwrap_or("").is_empty() {
            return Err(Error::config_invalid(format!(
                "{AZURE_SUBSCRIPTION_ID} is not set"
            )));
        }

        if self.account_key.as_deref().unwrap_or("").is_empty() {
            return Err(Error::config_invalid(format!(
                "{AZURE_STORAGE_ACCOUNT_KEY} is not set"
            )));
        }

        Ok(())
    }

    /// Resource group the storage account lives in.
    pub fn resource_group(&self) -> &str {
        self.resource_group.as_deref().unwrap_or(DEFAULT_RESOURCE_GROUP)
    }

    /// Storage account name.
    pub fn account_name(&self) -> &str {
        self.account_name.as_deref().unwrap_or(DEFAULT_STORAGE_ACCOUNT)
    }

    /// Region for the storage account.
    pub fn location(&self) -> &str {
        self.location.as_deref().unwrap_or(DEFAULT_LOCATION)
    }

    /// Base endpoint of the resource management API.
    pub fn management_endpoint(&self) -> &str {
        self.management_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_MANAGEMENT_ENDPOINT)
    }

    /// The container name to provision.
    ///
    /// Returns the pinned name when configured. Otherwise a fresh
    /// `rust-container-xxxx` name with a randomized four letter suffix is
    /// generated, so repeated runs create distinct containers unless the
    /// caller pins the name.
    pub fn container_name(&self) -> String {
        match &self.container_name {
            Some(name) => name.clone(),
            None => format!("rust-container-{}", random_suffix(4)),
        }
    }
}

fn random_suffix(n: usize) -> String {
    const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

    let mut rng = rand::thread_rng();
    (0..n)
        .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use provsign_core::StaticEnv;
    use std::collections::HashMap;

    #[test]
    fn test_config_from_env() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                (
                    AZURE_SUBSCRIPTION_ID.to_string(),
                    "00000000-0000-0000-0000-000000000000".to_string(),
                ),
                (AZURE_STORAGE_ACCOUNT_NAME.to_string(), "myaccount".to_string()),
                (AZURE_STORAGE_ACCOUNT_KEY.to_string(), "bXlrZXk=".to_string()),
                (AZURE_STORAGE_CONTAINER.to_string(), "pinned".to_string()),
            ]),
        });

        let config = Config::default().from_env(&ctx);

        assert_eq!(
            config.subscription_id.as_deref(),
            Some("00000000-0000-0000-0000-000000000000")
        );
        assert_eq!(config.account_name(), "myaccount");
        assert_eq!(config.account_key.as_deref(), Some("bXlrZXk="));
        assert_eq!(config.container_name(), "pinned");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_azblob_aliases() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                (AZBLOB_ACCOUNT_NAME.to_string(), "aliased".to_string()),
                (AZBLOB_ACCOUNT_KEY.to_string(), "YWxpYXM=".to_string()),
            ]),
        });

        let config = Config::default().from_env(&ctx);

        assert_eq!(config.account_name(), "aliased");
        assert_eq!(config.account_key.as_deref(), Some("YWxpYXM="));
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();

        assert_eq!(config.resource_group(), DEFAULT_RESOURCE_GROUP);
        assert_eq!(config.account_name(), DEFAULT_STORAGE_ACCOUNT);
        assert_eq!(config.location(), DEFAULT_LOCATION);
        assert_eq!(config.management_endpoint(), DEFAULT_MANAGEMENT_ENDPOINT);
    }

    #[test]
    fn test_validate_requires_subscription() {
        let config = Config {
            account_key: Some("bXlrZXk=".to_string()),
            ..Default::default()
        };

        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "AZURE_SUBSCRIPTION_ID is not set");
    }

    #[test]
    fn test_validate_requires_account_key() {
        let config = Config {
            subscription_id: Some("sub".to_string()),
            ..Default::default()
        };

        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "AZURE_STORAGE_ACCOUNT_KEY is not set");
    }

    #[test]
    fn test_random_container_name_shape() {
        let config = Config::default();

        let name = config.container_name();
        assert!(name.starts_with("rust-container-"));

        let suffix = name.strip_prefix("rust-container-").unwrap();
        assert_eq!(suffix.len(), 4);
        assert!(suffix.chars().all(|c| c.is_ascii_lowercase()));
    }
}
