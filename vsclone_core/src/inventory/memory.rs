use super::{Inventory, ManagedObjectReference, VmProperties};
use crate::customize::OsFamily;
use crate::device::EthernetCardBacking;

use async_trait::async_trait;
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use uuid::Uuid;

// Error Handling
use log::{debug, trace};
use vsclone_error::{LibError, ObjectKind, VscloneError};

/*
* An inventory read from a json snapshot of the management plane.
*
* Serves the command line and the test suites.
* Lookups are plain scans: snapshots are small.
*/
#[derive(Default, Debug, Clone, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticInventory {
    #[builder(default)]
    pub vm: Vec<VmRecord>,
    #[builder(default)]
    pub datastore: Vec<String>,
    #[builder(default)]
    pub host: Vec<String>,
    #[builder(default)]
    pub resource_pool: Vec<ResourcePoolRecord>,
    #[builder(default)]
    pub network: Vec<NetworkRecord>,
}

#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct VmRecord {
    #[builder(into)]
    pub moid: String,
    pub uuid: Uuid,
    /// Inventory path, like /dc1/vm/templates/ubuntu.
    #[builder(into)]
    pub path: String,
    #[builder(default)]
    #[serde(default)]
    pub properties: VmProperties,
}

#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct ResourcePoolRecord {
    #[builder(into)]
    pub moid: String,
    /// Hosts of the owning cluster or standalone host.
    #[builder(default)]
    #[serde(default)]
    pub hosts: Vec<String>,
    /// Guest ids supported by the owning compute resource.
    #[builder(default)]
    #[serde(default)]
    pub guest_families: BTreeMap<String, OsFamily>,
}

#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct NetworkRecord {
    #[builder(into)]
    pub moid: String,
    #[builder(into)]
    pub name: String,
    pub kind: NetworkKind,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NetworkKind {
    Standard,
    DistributedPortgroup {
        switch_uuid: String,
        portgroup_key: String,
    },
    Opaque {
        network_id: String,
        network_type: String,
    },
}
impl NetworkRecord {
    fn object_kind(&self) -> ObjectKind {
        match self.kind {
            NetworkKind::Standard => ObjectKind::Network,
            NetworkKind::DistributedPortgroup { .. } => ObjectKind::DistributedVirtualPortgroup,
            NetworkKind::Opaque { .. } => ObjectKind::OpaqueNetwork,
        }
    }
}

impl StaticInventory {
    pub fn from_file(path: &str) -> Result<Self, VscloneError> {
        debug!("reading inventory snapshot {:#?}", path);
        let string = fs::read_to_string(path)?;
        Self::from_json(&string)
    }
    pub fn from_json(string: &str) -> Result<Self, VscloneError> {
        let item = serde_json::from_str::<Self>(string)?;
        trace!(
            "inventory snapshot with {} virtual machines and {} networks",
            item.vm.len(),
            item.network.len()
        );
        Ok(item)
    }

    fn vm_record(&self, moid: &str) -> Result<&VmRecord, VscloneError> {
        self.vm
            .iter()
            .find(|e| e.moid == moid)
            .ok_or_else(|| not_found(ObjectKind::VirtualMachine, moid))
    }
    fn pool_record(&self, moid: &str) -> Result<&ResourcePoolRecord, VscloneError> {
        self.resource_pool
            .iter()
            .find(|e| e.moid == moid)
            .ok_or_else(|| not_found(ObjectKind::ResourcePool, moid))
    }
    fn network_record(&self, moid: &str) -> Result<&NetworkRecord, VscloneError> {
        self.network
            .iter()
            .find(|e| e.moid == moid)
            .ok_or_else(|| not_found(ObjectKind::Network, moid))
    }
    fn lookup(
        &self,
        list: &[String],
        kind: ObjectKind,
        id: &str,
    ) -> Result<ManagedObjectReference, VscloneError> {
        match list.iter().any(|e| e == id) {
            true => Ok(ManagedObjectReference::new(kind, id)),
            false => Err(not_found(kind, id)),
        }
    }
}

fn not_found(kind: ObjectKind, id: &str) -> VscloneError {
    let message = format!("no {kind} {id:?} in inventory snapshot");
    LibError::builder()
        .msg(&message)
        .help("The snapshot may be outdated.")
        .build()
        .into()
}

#[async_trait]
impl Inventory for StaticInventory {
    async fn vm_from_uuid(&self, uuid: &Uuid) -> Result<ManagedObjectReference, VscloneError> {
        self.vm
            .iter()
            .find(|e| &e.uuid == uuid)
            .map(|e| ManagedObjectReference::new(ObjectKind::VirtualMachine, &e.moid))
            .ok_or_else(|| not_found(ObjectKind::VirtualMachine, &uuid.to_string()))
    }
    async fn vm_from_path(&self, path: &str) -> Result<ManagedObjectReference, VscloneError> {
        self.vm
            .iter()
            .find(|e| e.path == path)
            .map(|e| ManagedObjectReference::new(ObjectKind::VirtualMachine, &e.moid))
            .ok_or_else(|| not_found(ObjectKind::VirtualMachine, path))
    }
    async fn vm_properties(
        &self,
        vm: &ManagedObjectReference,
    ) -> Result<VmProperties, VscloneError> {
        Ok(self.vm_record(&vm.value)?.properties.to_owned())
    }

    async fn datastore_from_id(&self, id: &str) -> Result<ManagedObjectReference, VscloneError> {
        self.lookup(&self.datastore, ObjectKind::Datastore, id)
    }
    async fn resource_pool_from_id(
        &self,
        id: &str,
    ) -> Result<ManagedObjectReference, VscloneError> {
        let record = self.pool_record(id)?;
        Ok(ManagedObjectReference::new(
            ObjectKind::ResourcePool,
            &record.moid,
        ))
    }
    async fn host_system_from_id(
        &self,
        id: &str,
    ) -> Result<ManagedObjectReference, VscloneError> {
        self.lookup(&self.host, ObjectKind::HostSystem, id)
    }
    async fn network_from_id(&self, id: &str) -> Result<ManagedObjectReference, VscloneError> {
        let record = self.network_record(id)?;
        Ok(ManagedObjectReference::new(record.object_kind(), &record.moid))
    }

    async fn ethernet_card_backing(
        &self,
        network: &ManagedObjectReference,
    ) -> Result<EthernetCardBacking, VscloneError> {
        let record = self.network_record(&network.value)?;
        let backing = match &record.kind {
            NetworkKind::Standard => EthernetCardBacking::Network {
                device_name: record.name.to_owned(),
                network: network.to_owned(),
            },
            NetworkKind::DistributedPortgroup {
                switch_uuid,
                portgroup_key,
            } => EthernetCardBacking::DistributedPort {
                switch_uuid: switch_uuid.to_owned(),
                portgroup_key: portgroup_key.to_owned(),
            },
            NetworkKind::Opaque {
                network_id,
                network_type,
            } => EthernetCardBacking::OpaqueNetwork {
                opaque_network_id: network_id.to_owned(),
                opaque_network_type: network_type.to_owned(),
            },
        };
        Ok(backing)
    }
    async fn resource_pool_hosts(
        &self,
        pool: &ManagedObjectReference,
    ) -> Result<Vec<ManagedObjectReference>, VscloneError> {
        let record = self.pool_record(&pool.value)?;
        Ok(record
            .hosts
            .iter()
            .map(|e| ManagedObjectReference::new(ObjectKind::HostSystem, e))
            .collect())
    }
    async fn os_family(
        &self,
        pool: &ManagedObjectReference,
        guest_id: &str,
    ) -> Result<OsFamily, VscloneError> {
        let record = self.pool_record(&pool.value)?;
        match record.guest_families.get(guest_id) {
            Some(family) => Ok(*family),
            None => {
                let message = format!(
                    "guest ID {guest_id:?} is not supported by the compute resource of {}",
                    pool.value
                );
                Err(LibError::builder()
                    .msg(&message)
                    .help("Check the guest_id against the guest operating systems the cluster supports.")
                    .build()
                    .into())
            }
        }
    }
}
