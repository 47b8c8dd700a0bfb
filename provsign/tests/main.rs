use std::env;

use anyhow::Result;
use log::warn;
use provsign::{
    ensure_container, issue_read_token, AccessWindow, Config, DefaultCredentialProvider,
    StorageManagementClient,
};
use provsign_core::time::Duration;
use provsign_core::{Context, OsEnv, ProvideCredential};
use provsign_http_send_reqwest::ReqwestHttpSend;

fn init_context() -> Option<Context> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("PROVSIGN_TEST").unwrap_or_default() != "on" {
        return None;
    }

    Some(
        Context::new()
            .with_env(OsEnv)
            .with_http_send(ReqwestHttpSend::default()),
    )
}

/// Runs the whole provisioning flow against a real subscription.
///
/// Requires `PROVSIGN_TEST=on` plus the usual `AZURE_*` variables; skipped
/// otherwise.
#[tokio::test]
async fn test_provision_and_issue_token() -> Result<()> {
    let Some(ctx) = init_context() else {
        warn!("PROVSIGN_TEST is not set, skipped");
        return Ok(());
    };

    let config = Config::default().from_env(&ctx);
    config.validate()?;

    let cred = DefaultCredentialProvider::new()
        .provide_credential(&ctx)
        .await?
        .expect("a credential source must be configured");

    let client = StorageManagementClient::new(ctx, &config)?;
    let container = config.container_name();

    let outcome = ensure_container(&client, &cred, &container).await?;
    assert!(outcome.exists);

    let window = AccessWindow::starting_now(Duration::try_hours(24).expect("in bounds"))?;
    let token = issue_read_token(&client, &cred, &window).await?;
    assert!(!token.is_empty());

    Ok(())
}
