/*
* The declared configuration of a virtual machine resource.
*
* The host orchestration tool hands over a configuration tree.
* It is parsed once, here, into typed blocks
* so that the clone workflow never reads values by key.
*/
mod known;
mod load;

// Reexports
pub use known::Known;

use crate::customize::CustomizeBlock;
use crate::device::SharesLevel;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_CLONE_TIMEOUT: i64 = 30;
pub const MIN_CLONE_TIMEOUT: i64 = 10;

#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
pub struct VmDeclaration {
    pub name: String,
    pub guest_id: String,

    #[serde(default, skip_serializing_if = "Known::is_absent")]
    pub resource_pool_id: Known<String>,
    #[serde(default, skip_serializing_if = "Known::is_absent")]
    pub datastore_id: Known<String>,
    #[serde(default, skip_serializing_if = "Known::is_absent")]
    pub host_system_id: Known<String>,

    /// Advanced parameters, sorted by key.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_config: BTreeMap<String, String>,

    pub clone: Option<CloneBlock>,
    pub instant_clone: Option<InstantCloneBlock>,

    #[serde(default)]
    pub disk: Vec<DiskDeclaration>,
    #[serde(default)]
    pub network_interface: Vec<NetworkInterfaceDeclaration>,
}

impl VmDeclaration {
    pub fn linked_clone(&self) -> bool {
        self.clone.as_ref().map(|e| e.linked_clone).unwrap_or(false)
    }
}

/*
* Create the virtual machine by cloning a template or a powered off vm.
*/
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
pub struct CloneBlock {
    #[serde(default, skip_serializing_if = "Known::is_absent")]
    pub template_uuid: Known<String>,
    /// Chain the new disks to the single snapshot of the source.
    #[serde(default)]
    pub linked_clone: bool,
    /// Minutes to wait for the clone to complete.
    #[serde(default = "default_timeout")]
    pub timeout: i64,
    pub customize: Option<CustomizeBlock>,
}

/*
* Create the virtual machine from the memory and disk state
* of a running virtual machine.
*/
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
pub struct InstantCloneBlock {
    #[serde(default, skip_serializing_if = "Known::is_absent")]
    pub source_uuid: Known<String>,
    #[serde(default = "default_timeout")]
    pub timeout: i64,
}

fn default_timeout() -> i64 {
    DEFAULT_CLONE_TIMEOUT
}

#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
pub struct DiskDeclaration {
    pub label: String,
    /// Size in GiB.
    pub size: i64,
    #[serde(default)]
    pub unit_number: i32,
    pub datastore_id: Option<String>,
    pub thin_provisioned: Option<bool>,
    pub eagerly_scrub: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
pub struct NetworkInterfaceDeclaration {
    pub network_id: String,
    /// Mbits/sec, -1 for unlimited.
    #[serde(default = "default_bandwidth_limit")]
    pub bandwidth_limit: i64,
    /// Mbits/sec.
    #[serde(default)]
    pub bandwidth_reservation: i64,
    #[serde(default)]
    pub bandwidth_share_level: SharesLevel,
    /// Only honored with the custom share level.
    #[serde(default)]
    pub bandwidth_share_count: i32,
    #[serde(default)]
    pub use_static_mac: bool,
    #[serde(default)]
    pub mac_address: String,
}

fn default_bandwidth_limit() -> i64 {
    -1
}
