use log::{error, info};
use provsign::{
    ensure_container, issue_read_token, AccessWindow, Config, DefaultCredentialProvider,
    StorageManagementClient,
};
use provsign_core::time::Duration;
use provsign_core::{Context, Error, OsEnv, ProvideCredential, Result};
use provsign_http_send_reqwest::ReqwestHttpSend;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("fatal: {e:?}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let ctx = Context::new()
        .with_env(OsEnv)
        .with_http_send(ReqwestHttpSend::default());

    let config = Config::default().from_env(&ctx);
    config.validate()?;

    let container = config.container_name();
    let client = StorageManagementClient::new(ctx.clone(), &config)?;

    let cred = DefaultCredentialProvider::new()
        .provide_credential(&ctx)
        .await?
        .ok_or_else(|| Error::credential_invalid("no credential source is configured"))?;

    let outcome = ensure_container(&client, &cred, &container).await?;

    if !outcome.created {
        info!("blob container already exists");
        println!("{}", outcome.id);
        return Ok(());
    }

    info!("provisioned blob container: {}", outcome.id);

    let window = AccessWindow::starting_now(Duration::try_hours(24).expect("in bounds"))?;
    let token = issue_read_token(&client, &cred, &window).await?;
    println!("{token}");

    Ok(())
}
