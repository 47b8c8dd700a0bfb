use log::{debug, info};
use provsign_core::{Error, Result};

use crate::management::StorageManagementClient;
use crate::Credential;

/// Result of [`ensure_container`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnsureOutcome {
    /// The container exists remotely after the call.
    pub exists: bool,
    /// The container was created by this call.
    pub created: bool,
    /// Fully qualified resource id of the container.
    pub id: String,
}

/// Make sure the named blob container exists.
///
/// Looks the container up first; a found container is reported as is and no
/// create is attempted. A missing container is created and then looked up
/// again, so the returned id always comes from a confirmed lookup. Any
/// failure other than "not found" on the initial lookup is fatal and
/// propagates unchanged, as do create and confirmation failures; there is no
/// compensation for a create whose confirmation fails.
pub async fn ensure_container(
    client: &StorageManagementClient,
    cred: &Credential,
    container: &str,
) -> Result<EnsureOutcome> {
    if container.is_empty() {
        return Err(Error::request_invalid("container name must not be empty"));
    }

    match client.get_blob_container(cred, container).await {
        Ok(found) => {
            debug!("blob container {container} already exists: {}", found.id);
            Ok(EnsureOutcome {
                exists: true,
                created: false,
                id: found.id,
            })
        }
        Err(e) if e.is_resource_not_found() => {
            info!("blob container {container} not found, creating it");

            let created = client.create_blob_container(cred, container).await?;
            info!("created blob container: {}", created.id);

            // Confirm the create with a fresh lookup.
            let confirmed = client.get_blob_container(cred, container).await?;
            debug!("confirmed blob container: {}", confirmed.id);

            Ok(EnsureOutcome {
                exists: true,
                created: true,
                id: confirmed.id,
            })
        }
        Err(e) => Err(e),
    }
}
