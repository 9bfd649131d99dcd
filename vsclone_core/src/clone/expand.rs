use super::{validate_clone_snapshots, CloneSpec, DiskMoveType};
use crate::connection::Connection;
use crate::declaration::VmDeclaration;
use crate::inventory::ManagedObjectReference;

// Error Handling
use log::{debug, info};
use vsclone_error::{InvariantError, VscloneError};

impl VmDeclaration {
    /*
     * Build the traditional clone request.
     *
     * The request carries the target placement, the source snapshot
     * on linked clones, and where each source disk lands.
     * Returns the request along with the source to clone from.
     */
    pub async fn expand_clone_spec(
        &self,
        conn: &Connection,
    ) -> Result<(CloneSpec, ManagedObjectReference), VscloneError> {
        let clone = self.clone_block()?;
        let mut spec = CloneSpec::default();

        if let Some(id) = self.datastore_id.as_known() {
            spec.location.datastore = Some(conn.datastore(id).await?);
        }

        let id = clone.template_uuid.require("clone.template_uuid")?;
        debug!("cloning from {}", id);
        let (vm, source) = conn.source(id).await?;

        // Checked again: the source may have changed since plan.
        if clone.linked_clone {
            let current = validate_clone_snapshots(source.uuid(), source.snapshot.as_ref())
                .map_err(InvariantError::from)?;
            debug!("linked clone from snapshot {}", current.value);
            spec.snapshot = Some(current.to_owned());
            spec.location.disk_move_type = Some(DiskMoveType::CreateNewChildDiskBacking);
        }

        let pool_id = self.resource_pool_id.require("resource_pool_id")?;
        let pool = conn.resource_pool(pool_id).await?;
        if let Some(host_id) = self.host_system_id.as_known() {
            let host = conn.host_system(host_id).await?;
            let hosts = conn.resource_pool_hosts(&pool).await?;
            if !hosts.contains(&host) {
                return Err(InvariantError::HostNotInPool {
                    host: host.value,
                    pool: pool.value,
                }
                .into());
            }
            spec.location.host = Some(host);
        }
        spec.location.pool = Some(pool);

        spec.location.disk = conn
            .reconciler
            .relocate_disks(conn, self, source.devices())
            .await?;

        info!("clone spec for {} ready", self.name);
        Ok((spec, vm))
    }
}
