use bytes::Bytes;
use log::debug;
use provsign_core::{Context, Error, Result};
use serde::Deserialize;

use crate::constants::MANAGEMENT_API_VERSION;
use crate::sas::AccountSasParameters;
use crate::{Config, Credential};

/// Client for the storage resource management API.
///
/// Covers the three management-plane operations this tool needs: look up a
/// blob container, create one, and ask the account to sign a SAS token.
/// Every call is a single shot; a failed call is returned to the caller
/// unchanged, there is no retry.
#[derive(Clone, Debug)]
pub struct StorageManagementClient {
    ctx: Context,
    endpoint: String,
    subscription_id: String,
    resource_group: String,
    account_name: String,
}

/// A blob container as reported by the management API.
#[derive(Clone, Debug, Deserialize)]
pub struct BlobContainer {
    /// Fully qualified resource id.
    pub id: String,
    /// Container name.
    pub name: String,
    /// Resource etag, absent on some API versions.
    #[serde(default)]
    pub etag: Option<String>,
}

#[derive(Deserialize)]
struct ManagementErrorResponse {
    #[serde(default)]
    error: Option<ManagementErrorDetail>,
}

#[derive(Deserialize)]
struct ManagementErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct ListAccountSasResponse {
    #[serde(rename = "accountSasToken")]
    account_sas_token: String,
}

impl StorageManagementClient {
    /// Create a client addressing one storage account.
    pub fn new(ctx: Context, config: &Config) -> Result<Self> {
        let Some(subscription_id) = config.subscription_id.clone() else {
            return Err(Error::config_invalid("subscription id is required"));
        };

        Ok(Self {
            ctx,
            endpoint: config.management_endpoint().trim_end_matches('/').to_string(),
            subscription_id,
            resource_group: config.resource_group().to_string(),
            account_name: config.account_name().to_string(),
        })
    }

    /// Storage account this client addresses.
    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    /// Look up a blob container by name.
    ///
    /// A missing container surfaces as `ErrorKind::ResourceNotFound` so the
    /// caller can branch into creation; every other failure is terminal.
    pub async fn get_blob_container(
        &self,
        cred: &Credential,
        container: &str,
    ) -> Result<BlobContainer> {
        let url = self.container_url(container);
        debug!("looking up blob container {container}");

        let req = http::Request::builder()
            .method(http::Method::GET)
            .uri(&url)
            .header(http::header::AUTHORIZATION, self.bearer_header(cred)?)
            .body(Bytes::new())?;

        let resp = self.ctx.http_send(req).await?;
        self.parse_container_response(resp, container)
    }

    /// Create a blob container with no public access.
    pub async fn create_blob_container(
        &self,
        cred: &Credential,
        container: &str,
    ) -> Result<BlobContainer> {
        let url = self.container_url(container);
        debug!("creating blob container {container}");

        let body = serde_json::json!({
            "properties": {
                "publicAccess": "None",
            }
        });

        let req = http::Request::builder()
            .method(http::Method::PUT)
            .uri(&url)
            .header(http::header::AUTHORIZATION, self.bearer_header(cred)?)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Bytes::from(body.to_string()))?;

        let resp = self.ctx.http_send(req).await?;
        self.parse_container_response(resp, container)
    }

    /// Ask the account to sign an account SAS token with the given parameters.
    pub async fn list_account_sas(
        &self,
        cred: &Credential,
        params: &AccountSasParameters,
    ) -> Result<String> {
        let url = format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Storage/storageAccounts/{}/ListAccountSas?api-version={}",
            self.endpoint,
            self.subscription_id,
            self.resource_group,
            self.account_name,
            MANAGEMENT_API_VERSION,
        );
        debug!("requesting account SAS for {}", self.account_name);

        let body = serde_json::to_vec(params)
            .map_err(|e| Error::unexpected("failed to serialize SAS parameters").with_source(e))?;

        let req = http::Request::builder()
            .method(http::Method::POST)
            .uri(&url)
            .header(http::header::AUTHORIZATION, self.bearer_header(cred)?)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Bytes::from(body))?;

        let resp = self.ctx.http_send(req).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(self.error_from_response(status, resp.body(), "ListAccountSas"));
        }

        let parsed: ListAccountSasResponse = serde_json::from_slice(resp.body())
            .map_err(|e| Error::unexpected("failed to parse ListAccountSas response").with_source(e))?;
        Ok(parsed.account_sas_token)
    }

    fn container_url(&self, container: &str) -> String {
        format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Storage/storageAccounts/{}/blobServices/default/containers/{}?api-version={}",
            self.endpoint,
            self.subscription_id,
            self.resource_group,
            self.account_name,
            container,
            MANAGEMENT_API_VERSION,
        )
    }

    fn bearer_header(&self, cred: &Credential) -> Result<String> {
        match cred {
            Credential::BearerToken { token, .. } => Ok(format!("Bearer {token}")),
            Credential::SharedKey { .. } => Err(Error::credential_invalid(
                "management operations require a bearer token credential",
            )),
        }
    }

    fn parse_container_response(
        &self,
        resp: http::Response<Bytes>,
        container: &str,
    ) -> Result<BlobContainer> {
        let status = resp.status();

        if status == http::StatusCode::NOT_FOUND {
            return Err(Error::resource_not_found(format!(
                "blob container {container} could not be found"
            )));
        }

        if !status.is_success() {
            return Err(self.error_from_response(status, resp.body(), container));
        }

        serde_json::from_slice(resp.body())
            .map_err(|e| Error::unexpected("failed to parse blob container response").with_source(e))
    }

    fn error_from_response(
        &self,
        status: http::StatusCode,
        body: &Bytes,
        subject: &str,
    ) -> Error {
        let detail = serde_json::from_slice::<ManagementErrorResponse>(body)
            .ok()
            .and_then(|r| r.error)
            .map(|e| {
                format!(
                    "{}: {}",
                    e.code.unwrap_or_default(),
                    e.message.unwrap_or_default()
                )
            })
            .unwrap_or_else(|| String::from_utf8_lossy(body).to_string());

        let message = format!("management request for {subject} failed with status {status}: {detail}");

        if status == http::StatusCode::UNAUTHORIZED || status == http::StatusCode::FORBIDDEN {
            Error::credential_invalid(message)
        } else {
            Error::unexpected(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> StorageManagementClient {
        let config = Config {
            subscription_id: Some("sub-id".to_string()),
            resource_group: Some("my-rg".to_string()),
            account_name: Some("myaccount".to_string()),
            ..Default::default()
        };
        StorageManagementClient::new(Context::new(), &config).unwrap()
    }

    #[test]
    fn test_container_url() {
        let client = test_client();

        assert_eq!(
            client.container_url("data"),
            "https://management.azure.com/subscriptions/sub-id/resourceGroups/my-rg/providers/Microsoft.Storage/storageAccounts/myaccount/blobServices/default/containers/data?api-version=2023-01-01"
        );
    }

    #[test]
    fn test_new_requires_subscription() {
        let config = Config::default();
        assert!(StorageManagementClient::new(Context::new(), &config).is_err());
    }

    #[test]
    fn test_shared_key_rejected_for_management() {
        let client = test_client();
        let cred = Credential::with_shared_key("myaccount", "a2V5");

        let err = client.bearer_header(&cred).unwrap_err();
        assert_eq!(err.kind(), provsign_core::ErrorKind::CredentialInvalid);
    }

    #[test]
    fn test_not_found_maps_to_resource_not_found() {
        let client = test_client();
        let resp = http::Response::builder()
            .status(http::StatusCode::NOT_FOUND)
            .body(Bytes::from_static(
                br#"{"error":{"code":"ContainerNotFound","message":"The specified container does not exist."}}"#,
            ))
            .unwrap();

        let err = client.parse_container_response(resp, "data").unwrap_err();
        assert!(err.is_resource_not_found());
    }

    #[test]
    fn test_forbidden_maps_to_credential_invalid() {
        let client = test_client();
        let resp = http::Response::builder()
            .status(http::StatusCode::FORBIDDEN)
            .body(Bytes::from_static(
                br#"{"error":{"code":"AuthorizationFailed","message":"The client does not have authorization."}}"#,
            ))
            .unwrap();

        let err = client.parse_container_response(resp, "data").unwrap_err();
        assert_eq!(err.kind(), provsign_core::ErrorKind::CredentialInvalid);
        assert!(err.to_string().contains("AuthorizationFailed"));
    }

    #[test]
    fn test_parse_container_success() {
        let client = test_client();
        let resp = http::Response::builder()
            .status(http::StatusCode::OK)
            .body(Bytes::from_static(
                br#"{"id":"/subscriptions/sub-id/resourceGroups/my-rg/providers/Microsoft.Storage/storageAccounts/myaccount/blobServices/default/containers/data","name":"data"}"#,
            ))
            .unwrap();

        let container = client.parse_container_response(resp, "data").unwrap();
        assert_eq!(container.name, "data");
        assert!(container.id.ends_with("/containers/data"));
        assert!(container.etag.is_none());
    }
}
