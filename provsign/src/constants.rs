// Environment variables used by the config and credential loaders.
pub const AZURE_SUBSCRIPTION_ID: &str = "AZURE_SUBSCRIPTION_ID";
pub const AZURE_RESOURCE_GROUP: &str = "AZURE_RESOURCE_GROUP";
pub const AZURE_LOCATION: &str = "AZURE_LOCATION";
pub const AZURE_STORAGE_ACCOUNT_NAME: &str = "AZURE_STORAGE_ACCOUNT_NAME";
pub const AZURE_STORAGE_ACCOUNT_KEY: &str = "AZURE_STORAGE_ACCOUNT_KEY";
pub const AZURE_STORAGE_CONTAINER: &str = "AZURE_STORAGE_CONTAINER";
pub const AZURE_MANAGEMENT_ENDPOINT: &str = "AZURE_MANAGEMENT_ENDPOINT";
pub const AZURE_TENANT_ID: &str = "AZURE_TENANT_ID";
pub const AZURE_CLIENT_ID: &str = "AZURE_CLIENT_ID";
pub const AZURE_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
pub const AZURE_AUTHORITY_HOST: &str = "AZURE_AUTHORITY_HOST";

// Aliases kept for compatibility with azblob tooling.
pub const AZBLOB_ACCOUNT_NAME: &str = "AZBLOB_ACCOUNT_NAME";
pub const AZBLOB_ACCOUNT_KEY: &str = "AZBLOB_ACCOUNT_KEY";

// Defaults applied when the environment leaves a knob unset.
pub const DEFAULT_RESOURCE_GROUP: &str = "rust-azure-sdk";
pub const DEFAULT_STORAGE_ACCOUNT: &str = "rustazure";
pub const DEFAULT_LOCATION: &str = "westeurope";
pub const DEFAULT_MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Management API version used for all resource manager calls.
pub const MANAGEMENT_API_VERSION: &str = "2023-01-01";

/// OAuth2 scope requested for management-plane bearer tokens.
pub const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";
