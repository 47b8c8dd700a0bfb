use log::debug;
use provsign_core::hash;
use provsign_core::time::{self, DateTime, Duration};
use provsign_core::{Error, Result};
use serde::Serialize;

use crate::management::StorageManagementClient;
use crate::Credential;

/// The default parameters that make up an account SAS token
/// https://learn.microsoft.com/en-us/rest/api/storageservices/create-account-sas#specify-the-account-sas-parameters
const ACCOUNT_SAS_VERSION: &str = "2018-11-09";
const ACCOUNT_SAS_SERVICES: &str = "b";
const ACCOUNT_SAS_RESOURCE_TYPES: &str = "s";
const ACCOUNT_SAS_PERMISSIONS: &str = "r";
const ACCOUNT_SAS_PROTOCOL: &str = "https,http";
const ACCOUNT_SAS_KEY_TO_SIGN: &str = "key1";

/// The validity window of an access token.
///
/// A window can only be constructed with the expiry strictly after the start,
/// so a zero or negative validity token can never be issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessWindow {
    start: DateTime,
    expiry: DateTime,
}

impl AccessWindow {
    /// Create a window from explicit instants.
    pub fn new(start: DateTime, expiry: DateTime) -> Result<Self> {
        if expiry <= start {
            return Err(Error::request_invalid(format!(
                "access window expiry {} must be later than start {}",
                time::format_rfc3339(expiry),
                time::format_rfc3339(start),
            )));
        }

        Ok(Self { start, expiry })
    }

    /// Create a window starting at the current instant.
    ///
    /// The start is captured once; it is never recomputed or round-tripped
    /// through a formatted string.
    pub fn starting_now(validity: Duration) -> Result<Self> {
        let start = time::now();
        Self::new(start, start + validity)
    }

    /// Window start instant.
    pub fn start(&self) -> DateTime {
        self.start
    }

    /// Window expiry instant.
    pub fn expiry(&self) -> DateTime {
        self.expiry
    }
}

/// Parameters submitted to the remote signer.
///
/// Field names follow the management API wire format.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSasParameters {
    signed_services: String,
    signed_resource_types: String,
    signed_permission: String,
    signed_protocol: String,
    signed_start: String,
    signed_expiry: String,
    key_to_sign: String,
}

impl AccountSasParameters {
    /// Read-only parameters over the blob service for the given window.
    pub fn read_only(window: &AccessWindow) -> Self {
        Self {
            signed_services: ACCOUNT_SAS_SERVICES.to_string(),
            signed_resource_types: ACCOUNT_SAS_RESOURCE_TYPES.to_string(),
            signed_permission: ACCOUNT_SAS_PERMISSIONS.to_string(),
            signed_protocol: ACCOUNT_SAS_PROTOCOL.to_string(),
            signed_start: time::format_rfc3339(window.start()),
            signed_expiry: time::format_rfc3339(window.expiry()),
            key_to_sign: ACCOUNT_SAS_KEY_TO_SIGN.to_string(),
        }
    }
}

/// Issue a read-scoped account SAS token valid for the given window.
///
/// Bearer credentials are sent to the remote signer through the management
/// API; a shared key credential signs the same parameters locally. Either
/// way the caller gets back an opaque query-string token, and any signer
/// failure is returned as is.
pub async fn issue_read_token(
    client: &StorageManagementClient,
    cred: &Credential,
    window: &AccessWindow,
) -> Result<String> {
    match cred {
        Credential::BearerToken { .. } => {
            debug!("issuing read token through the remote signer");
            client
                .list_account_sas(cred, &AccountSasParameters::read_only(window))
                .await
        }
        Credential::SharedKey {
            account_name,
            account_key,
        } => {
            debug!("issuing read token from the account key");
            let signature = AccountSharedAccessSignature::new(
                account_name.clone(),
                account_key.clone(),
                *window,
            );
            let token = signature.token()?;
            Ok(token
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<String>>()
                .join("&"))
        }
    }
}

/// Account SAS computed locally from the account key.
///
/// Produces the same shape of token the remote signer returns, scoped to the
/// read-only parameters this tool issues.
struct AccountSharedAccessSignature {
    account: String,
    key: String,
    version: String,
    services: String,
    resource_types: String,
    permissions: String,
    protocol: String,
    window: AccessWindow,
}

impl AccountSharedAccessSignature {
    fn new(account: String, key: String, window: AccessWindow) -> Self {
        Self {
            account,
            key,
            window,
            version: ACCOUNT_SAS_VERSION.to_string(),
            services: ACCOUNT_SAS_SERVICES.to_string(),
            resource_types: ACCOUNT_SAS_RESOURCE_TYPES.to_string(),
            permissions: ACCOUNT_SAS_PERMISSIONS.to_string(),
            protocol: ACCOUNT_SAS_PROTOCOL.to_string(),
        }
    }

    // Azure documentation: https://learn.microsoft.com/en-us/rest/api/storageservices/create-account-sas#construct-the-signature-string
    fn signature(&self) -> Result<String> {
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n",
            self.account,
            self.permissions,
            self.services,
            self.resource_types,
            time::format_rfc3339(self.window.start()),
            time::format_rfc3339(self.window.expiry()),
            // signed ip is left empty
            "",
            self.protocol,
            self.version,
        );

        let decode_content = hash::base64_decode(self.key.as_str())?;

        Ok(hash::base64_hmac_sha256(
            &decode_content,
            string_to_sign.as_bytes(),
        ))
    }

    fn token(&self) -> Result<Vec<(String, String)>> {
        let mut elements: Vec<(String, String)> = vec![
            ("sv".to_string(), self.version.to_string()),
            ("ss".to_string(), self.services.to_string()),
            ("srt".to_string(), self.resource_types.to_string()),
            ("sp".to_string(), self.permissions.to_string()),
            (
                "st".to_string(),
                urlencoded(time::format_rfc3339(self.window.start())),
            ),
            (
                "se".to_string(),
                urlencoded(time::format_rfc3339(self.window.expiry())),
            ),
            ("spr".to_string(), self.protocol.to_string()),
        ];

        let sig = self.signature()?;
        elements.push(("sig".to_string(), urlencoded(sig)));

        Ok(elements)
    }
}

fn urlencoded(s: String) -> String {
    form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_window() -> AccessWindow {
        AccessWindow::new(
            time::parse_rfc3339("2022-03-01T08:12:34Z").unwrap(),
            time::parse_rfc3339("2022-03-02T08:12:34Z").unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_window_rejects_inverted_bounds() {
        let start = time::parse_rfc3339("2022-03-01T08:12:34Z").unwrap();

        let err = AccessWindow::new(start, start).unwrap_err();
        assert_eq!(err.kind(), provsign_core::ErrorKind::RequestInvalid);

        let earlier = time::parse_rfc3339("2022-02-01T08:12:34Z").unwrap();
        assert!(AccessWindow::new(start, earlier).is_err());
    }

    #[test]
    fn test_window_starting_now_spans_validity() {
        let window = AccessWindow::starting_now(Duration::try_hours(24).unwrap()).unwrap();
        assert_eq!(window.expiry() - window.start(), Duration::try_hours(24).unwrap());
    }

    #[test]
    fn test_read_only_parameters() {
        let params = AccountSasParameters::read_only(&test_window());
        let body = serde_json::to_value(&params).unwrap();

        assert_eq!(body["signedServices"], "b");
        assert_eq!(body["signedResourceTypes"], "s");
        assert_eq!(body["signedPermission"], "r");
        assert_eq!(body["signedProtocol"], "https,http");
        assert_eq!(body["signedStart"], "2022-03-01T08:12:34Z");
        assert_eq!(body["signedExpiry"], "2022-03-02T08:12:34Z");
        assert_eq!(body["keyToSign"], "key1");
    }

    #[test]
    fn test_can_generate_sas_token() {
        let key = hash::base64_encode("key".as_bytes());
        let sign = AccountSharedAccessSignature::new("account".to_string(), key, test_window());
        let token_content = sign.token().expect("token decode failed");
        let token = token_content
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<String>>()
            .join("&");

        assert!(token.starts_with(
            "sv=2018-11-09&ss=b&srt=s&sp=r&st=2022-03-01T08%3A12%3A34Z&se=2022-03-02T08%3A12%3A34Z&spr=https,http&sig="
        ));
    }

    #[test]
    fn test_signature_is_deterministic() {
        let key = hash::base64_encode("key".as_bytes());
        let a = AccountSharedAccessSignature::new("account".to_string(), key.clone(), test_window());
        let b = AccountSharedAccessSignature::new("account".to_string(), key, test_window());

        assert_eq!(a.signature().unwrap(), b.signature().unwrap());
    }

    #[test]
    fn test_signature_rejects_invalid_key() {
        let sign = AccountSharedAccessSignature::new(
            "account".to_string(),
            "not base64!!!".to_string(),
            test_window(),
        );
        assert!(sign.signature().is_err());
    }
}
