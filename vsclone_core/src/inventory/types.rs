use super::ManagedObjectReference;
use crate::device::DeviceList;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

// Error Handling
use vsclone_error::{PropertiesError, VscloneError};

/*
* Property snapshot of a virtual machine or template,
* as returned by the management api.
* Both blocks may be missing on a partially visible object.
*/
#[skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VmProperties {
    pub config: Option<VmConfigInfo>,
    pub snapshot: Option<SnapshotInfo>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VmConfigInfo {
    pub uuid: String,
    pub guest_id: String,
    #[serde(default)]
    pub hardware: VirtualHardware,
    #[serde(rename = "vAppConfig")]
    pub vapp_config: Option<VAppConfigInfo>,
}

#[derive(Default, Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualHardware {
    #[serde(rename = "numCPU", default)]
    pub num_cpu: i32,
    #[serde(rename = "memoryMB", default)]
    pub memory_mb: i64,
    #[serde(default)]
    pub device: DeviceList,
}

#[derive(Default, Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VAppConfigInfo {
    #[serde(default)]
    pub ovf_environment_transport: Vec<String>,
}

#[skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotInfo {
    pub current_snapshot: Option<ManagedObjectReference>,
    #[serde(default)]
    pub root_snapshot_list: Vec<SnapshotTree>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotTree {
    pub snapshot: ManagedObjectReference,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub child_snapshot_list: Vec<SnapshotTree>,
}

/*
* Properties of a clone source once checked for completeness.
* The config block is guaranteed here.
*/
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SourceProperties {
    pub config: VmConfigInfo,
    pub snapshot: Option<SnapshotInfo>,
}

impl SourceProperties {
    /// Fails with the designated source id when the snapshot is incomplete.
    pub fn check(id: &str, properties: VmProperties) -> Result<Self, VscloneError> {
        let config = match properties.config {
            Some(config) => config,
            None => {
                return Err(PropertiesError::new(id, "missing virtual machine configuration").into())
            }
        };
        if config.uuid.is_empty() {
            return Err(PropertiesError::new(id, "virtual machine configuration has no uuid").into());
        }
        Ok(Self {
            config,
            snapshot: properties.snapshot,
        })
    }
    pub fn uuid(&self) -> &str {
        &self.config.uuid
    }
    pub fn devices(&self) -> &DeviceList {
        &self.config.hardware.device
    }
}
