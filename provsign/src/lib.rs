//! Azure Storage container provisioning and SAS token issuing.
//!
//! This crate drives two operations against an Azure subscription:
//!
//! - **Container provisioning**: look up a blob container through the Azure
//!   Resource Manager API, create it when absent, and re-verify after
//!   creation.
//! - **Access token issuing**: produce a time-limited, read-scoped shared
//!   access signature for the storage account, either remotely through the
//!   management API or locally from the account key.
//!
//! # Example
//!
//! ```rust,no_run
//! use provsign::{ensure_container, AccessWindow, Config, DefaultCredentialProvider};
//! use provsign::{issue_read_token, StorageManagementClient};
//! use provsign_core::{time::Duration, Context, Error, OsEnv, ProvideCredential};
//! use provsign_http_send_reqwest::ReqwestHttpSend;
//!
//! #[tokio::main]
//! async fn main() -> provsign_core::Result<()> {
//!     let ctx = Context::new()
//!         .with_env(OsEnv)
//!         .with_http_send(ReqwestHttpSend::default());
//!
//!     let config = Config::default().from_env(&ctx);
//!     config.validate()?;
//!
//!     let cred = DefaultCredentialProvider::new()
//!         .provide_credential(&ctx)
//!         .await?
//!         .ok_or_else(|| Error::credential_invalid("no credential source configured"))?;
//!
//!     let client = StorageManagementClient::new(ctx, &config)?;
//!     let outcome = ensure_container(&client, &cred, "my-container").await?;
//!     println!("container: {}", outcome.id);
//!
//!     let window = AccessWindow::starting_now(Duration::hours(24))?;
//!     let token = issue_read_token(&client, &cred, &window).await?;
//!     println!("token: {token}");
//!
//!     Ok(())
//! }
//! ```

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::*;

mod management;
pub use management::{BlobContainer, StorageManagementClient};

mod provision;
pub use provision::{ensure_container, EnsureOutcome};

mod sas;
pub use sas::{issue_read_token, AccessWindow, AccountSasParameters};
