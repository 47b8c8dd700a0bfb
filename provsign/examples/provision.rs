use anyhow::Result;
use provsign::{
    ensure_container, issue_read_token, AccessWindow, Config, DefaultCredentialProvider,
    StorageManagementClient,
};
use provsign_core::time::Duration;
use provsign_core::{Context, OsEnv, ProvideCredential};
use provsign_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let _ = env_logger::builder().is_test(true).try_init();

    // Create context
    let ctx = Context::new()
        .with_env(OsEnv)
        .with_http_send(ReqwestHttpSend::default());

    // Configuration comes entirely from the environment:
    // - AZURE_SUBSCRIPTION_ID and AZURE_STORAGE_ACCOUNT_KEY are required
    // - AZURE_TENANT_ID / AZURE_CLIENT_ID / AZURE_CLIENT_SECRET select the
    //   service principal flow for management-plane calls
    let config = Config::default().from_env(&ctx);

    if config.validate().is_err() {
        println!("No Azure configuration found, running in demo mode");
        println!("To provision a real container, set AZURE_SUBSCRIPTION_ID and AZURE_STORAGE_ACCOUNT_KEY");
        println!();
        println!("The flow this example would run:");
        println!("  1. look up the blob container through the management API");
        println!("  2. create it when absent, then confirm with a fresh lookup");
        println!("  3. issue a 24h read-only account SAS token");
        return Ok(());
    }

    let cred = DefaultCredentialProvider::new()
        .provide_credential(&ctx)
        .await?
        .expect("a credential source must be configured");

    let client = StorageManagementClient::new(ctx, &config)?;
    let container = config.container_name();
    println!("Ensuring blob container {container}");

    let outcome = ensure_container(&client, &cred, &container).await?;
    println!("Container id: {}", outcome.id);
    println!("Created by this run: {}", outcome.created);

    let window = AccessWindow::starting_now(Duration::try_hours(24).expect("in bounds"))?;
    let token = issue_read_token(&client, &cred, &window).await?;
    println!("Read-only SAS token valid until {}:", window.expiry());
    println!("{token}");

    Ok(())
}
