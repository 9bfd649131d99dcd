/*
* A connection to the management plane, as seen by the clone workflow.
*
* Bundles an inventory accessor and a device reconciler.
* It holds no mutable state and can be shared across
* concurrent operations behind an Arc.
*/
use crate::customize::OsFamily;
use crate::device::{DeviceReconciler, DiskReconciler, EthernetCardBacking};
use crate::inventory::{Inventory, ManagedObjectReference, SourceProperties, SourceRef};

use std::sync::Arc;
use std::time::Duration;

// Error Handling
use log::{debug, trace};
use miette::Report;
use vsclone_error::{ObjectKind, PropertiesError, ResolutionError, VscloneError};

/// Upper bound on a single call to the management api.
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(5 * 60);

#[derive(Clone)]
pub struct Connection {
    pub inventory: Arc<dyn Inventory>,
    pub reconciler: Arc<dyn DeviceReconciler>,
    pub api_timeout: Duration,
}

impl Connection {
    pub fn new(inventory: Arc<dyn Inventory>) -> Self {
        Self {
            inventory,
            reconciler: Arc::new(DiskReconciler),
            api_timeout: DEFAULT_API_TIMEOUT,
        }
    }
    pub fn with_reconciler(mut self, reconciler: Arc<dyn DeviceReconciler>) -> Self {
        self.reconciler = reconciler;
        self
    }
    pub fn with_api_timeout(mut self, timeout: Duration) -> Self {
        self.api_timeout = timeout;
        self
    }

    /*
     * Resolve a clone source and read its properties.
     * The id is either an instance uuid or an inventory path.
     */
    pub async fn source(
        &self,
        id: &str,
    ) -> Result<(ManagedObjectReference, SourceProperties), VscloneError> {
        let source_ref = SourceRef::from(id);
        let res = match &source_ref {
            SourceRef::Uuid(uuid) => self.inventory.vm_from_uuid(uuid).await,
            SourceRef::Path(path) => self.inventory.vm_from_path(path).await,
        };
        let vm = res.map_err(|e| resolution_error(ObjectKind::VirtualMachine, id, e))?;
        debug!("resolved clone source {} to {}", source_ref, vm);

        let properties = match self.inventory.vm_properties(&vm).await {
            Ok(v) => v,
            Err(e) => return Err(PropertiesError::new(id, &e.to_string()).into()),
        };
        let properties = SourceProperties::check(id, properties)?;
        trace!("{:#?}", properties);
        Ok((vm, properties))
    }

    pub async fn datastore(&self, id: &str) -> Result<ManagedObjectReference, VscloneError> {
        self.inventory
            .datastore_from_id(id)
            .await
            .map_err(|e| resolution_error(ObjectKind::Datastore, id, e))
    }
    pub async fn resource_pool(&self, id: &str) -> Result<ManagedObjectReference, VscloneError> {
        self.inventory
            .resource_pool_from_id(id)
            .await
            .map_err(|e| resolution_error(ObjectKind::ResourcePool, id, e))
    }
    pub async fn host_system(&self, id: &str) -> Result<ManagedObjectReference, VscloneError> {
        self.inventory
            .host_system_from_id(id)
            .await
            .map_err(|e| resolution_error(ObjectKind::HostSystem, id, e))
    }
    pub async fn network(&self, id: &str) -> Result<ManagedObjectReference, VscloneError> {
        self.inventory
            .network_from_id(id)
            .await
            .map_err(|e| resolution_error(ObjectKind::Network, id, e))
    }

    /// Fetch the backing of a network, bounded by the api timeout.
    pub async fn ethernet_card_backing(
        &self,
        network: &ManagedObjectReference,
    ) -> Result<EthernetCardBacking, VscloneError> {
        let call = self.inventory.ethernet_card_backing(network);
        match tokio::time::timeout(self.api_timeout, call).await {
            Ok(res) => res,
            Err(_) => Err(VscloneError::TimeoutError(self.api_timeout)),
        }
    }

    pub async fn resource_pool_hosts(
        &self,
        pool: &ManagedObjectReference,
    ) -> Result<Vec<ManagedObjectReference>, VscloneError> {
        self.inventory.resource_pool_hosts(pool).await
    }
    pub async fn os_family(
        &self,
        pool: &ManagedObjectReference,
        guest_id: &str,
    ) -> Result<OsFamily, VscloneError> {
        self.inventory.os_family(pool, guest_id).await
    }
}

fn resolution_error(kind: ObjectKind, id: &str, origin: VscloneError) -> VscloneError {
    ResolutionError::new(kind, id, Report::new(origin)).into()
}
