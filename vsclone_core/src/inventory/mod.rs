/*
* Inventory accessor.
*
* Resolves the opaque identifiers found in a declaration
* (instance uuids, inventory paths, managed object ids)
* to managed object references, and fetches property snapshots.
*
* Nothing is cached: every clone operation resolves what it needs
* and reads fresh properties.
*/
mod memory;
mod types;

// Reexports
pub use memory::{NetworkKind, NetworkRecord, ResourcePoolRecord, StaticInventory, VmRecord};
pub use types::{
    SnapshotInfo, SnapshotTree, SourceProperties, VAppConfigInfo, VirtualHardware, VmConfigInfo,
    VmProperties,
};

use crate::customize::OsFamily;
use crate::device::EthernetCardBacking;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// Error Handling
use vsclone_error::{ObjectKind, VscloneError};

/// A handle on a live object of the management plane.
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq, Hash)]
pub struct ManagedObjectReference {
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    pub value: String,
}
impl ManagedObjectReference {
    pub fn new(kind: ObjectKind, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}
impl fmt::Display for ManagedObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.value)
    }
}

/*
* How a clone source is designated.
* An identifier that parses as a uuid is an instance uuid,
* anything else is an inventory path.
*/
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SourceRef {
    Uuid(Uuid),
    Path(String),
}
impl From<&str> for SourceRef {
    fn from(s: &str) -> Self {
        match Uuid::parse_str(s) {
            Ok(uuid) => SourceRef::Uuid(uuid),
            Err(_) => SourceRef::Path(s.to_owned()),
        }
    }
}
impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SourceRef::Uuid(uuid) => write!(f, "{uuid}"),
            SourceRef::Path(path) => write!(f, "{path}"),
        }
    }
}

#[async_trait]
pub trait Inventory: Send + Sync {
    async fn vm_from_uuid(&self, uuid: &Uuid) -> Result<ManagedObjectReference, VscloneError>;
    async fn vm_from_path(&self, path: &str) -> Result<ManagedObjectReference, VscloneError>;
    async fn vm_properties(
        &self,
        vm: &ManagedObjectReference,
    ) -> Result<VmProperties, VscloneError>;

    async fn datastore_from_id(&self, id: &str) -> Result<ManagedObjectReference, VscloneError>;
    async fn resource_pool_from_id(
        &self,
        id: &str,
    ) -> Result<ManagedObjectReference, VscloneError>;
    async fn host_system_from_id(&self, id: &str)
        -> Result<ManagedObjectReference, VscloneError>;
    /// Standard networks, distributed port groups and opaque networks alike.
    async fn network_from_id(&self, id: &str) -> Result<ManagedObjectReference, VscloneError>;

    /// The backing an adapter needs to be plugged into a network.
    async fn ethernet_card_backing(
        &self,
        network: &ManagedObjectReference,
    ) -> Result<EthernetCardBacking, VscloneError>;
    /// Hosts of the compute resource owning a resource pool.
    async fn resource_pool_hosts(
        &self,
        pool: &ManagedObjectReference,
    ) -> Result<Vec<ManagedObjectReference>, VscloneError>;
    /// Family of a guest id, as supported by the compute resource of a pool.
    async fn os_family(
        &self,
        pool: &ManagedObjectReference,
        guest_id: &str,
    ) -> Result<OsFamily, VscloneError>;
}

#[cfg(test)]
mod test {
    use super::*;
    use miette::Result;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_source_ref() -> Result<()> {
        let item = SourceRef::from("4218d4a1-7b8c-0f6d-8e4c-3b1a2f6c9d10");
        assert!(matches!(item, SourceRef::Uuid(_)));

        let item = SourceRef::from("/dc1/vm/templates/ubuntu");
        assert_eq!(item, SourceRef::Path("/dc1/vm/templates/ubuntu".to_owned()));
        Ok(())
    }

    #[test]
    fn serialize_managed_object_reference() -> Result<()> {
        let item = ManagedObjectReference::new(ObjectKind::ResourcePool, "resgroup-8");
        let json = serde_json::to_string(&item).map_err(VscloneError::from)?;
        assert_eq!(json, r#"{"type":"ResourcePool","value":"resgroup-8"}"#);
        assert_eq!(item.to_string(), "resource pool:resgroup-8");
        Ok(())
    }
}
