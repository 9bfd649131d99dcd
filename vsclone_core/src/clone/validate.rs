use super::validate_clone_snapshots;
use crate::connection::Connection;
use crate::declaration::{CloneBlock, Known, VmDeclaration};

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

// Error Handling
use log::{debug, info};
use vsclone_error::{InvariantError, VscloneError};

/// What plan time validation learned about the source.
#[skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
pub struct ValidationAnnotations {
    /// OVF environment transports of the source vApp configuration.
    pub vapp_transport: Option<Vec<String>>,
}

impl VmDeclaration {
    /*
     * Check that the clone source fits the declaration.
     *
     * Read only. A template uuid that is not known yet defers
     * every source check to apply time.
     * A customization block is still checked against the os family
     * of the declared guest id, deferred source or not.
     */
    pub async fn validate_clone(
        &self,
        conn: &Connection,
    ) -> Result<ValidationAnnotations, VscloneError> {
        let clone = self.clone_block()?;

        let annotations = match &clone.template_uuid {
            Known::Unknown => {
                debug!("template_uuid is not known yet, skipping source validation");
                ValidationAnnotations::default()
            }
            _ => {
                let id = clone.template_uuid.require("clone.template_uuid")?;
                self.validate_source(conn, clone, id).await?
            }
        };

        if let Some(customize) = &clone.customize {
            match self.resource_pool_id.as_known() {
                Some(pool_id) => {
                    let pool = conn.resource_pool(pool_id).await?;
                    let family = conn.os_family(&pool, &self.guest_id).await?;
                    customize.validate(family)?;
                }
                None => debug!("resource_pool_id is not known yet, skipping os family check"),
            }
        }
        Ok(annotations)
    }

    async fn validate_source(
        &self,
        conn: &Connection,
        clone: &CloneBlock,
        id: &str,
    ) -> Result<ValidationAnnotations, VscloneError> {
        debug!("validating fitness of clone source {}", id);
        let (_, source) = conn.source(id).await?;

        if source.config.guest_id != self.guest_id {
            return Err(InvariantError::GuestIdMismatch {
                expected: source.config.guest_id.to_owned(),
                actual: self.guest_id.to_owned(),
            }
            .into());
        }
        if clone.linked_clone {
            debug!("checking snapshots on {} for linked clone eligibility", id);
            validate_clone_snapshots(source.uuid(), source.snapshot.as_ref())
                .map_err(InvariantError::from)?;
        }
        conn.reconciler
            .validate_disks(conn, self, source.devices(), clone.linked_clone)
            .await?;

        let annotations = ValidationAnnotations {
            vapp_transport: source
                .config
                .vapp_config
                .as_ref()
                .map(|e| e.ovf_environment_transport.to_owned()),
        };
        info!("clone source {} is suitable for {}", id, self.name);
        Ok(annotations)
    }
}
