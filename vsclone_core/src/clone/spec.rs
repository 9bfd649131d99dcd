/*
* Clone requests, as sent to the management api.
* Field names follow the api, unset fields are left out.
*/
use crate::device::DeviceConfigSpec;
use crate::inventory::ManagedObjectReference;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use strum::{Display, EnumString};

#[skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CloneSpec {
    pub location: RelocateSpec,
    /// Snapshot the new disks are chained to, on linked clones.
    pub snapshot: Option<ManagedObjectReference>,
    pub template: bool,
    pub power_on: bool,
}

#[derive(Default, Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstantCloneSpec {
    pub name: String,
    pub location: RelocateSpec,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub config: Vec<OptionValue>,
}

#[skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RelocateSpec {
    pub folder: Option<ManagedObjectReference>,
    pub datastore: Option<ManagedObjectReference>,
    pub pool: Option<ManagedObjectReference>,
    pub host: Option<ManagedObjectReference>,
    pub disk_move_type: Option<DiskMoveType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disk: Vec<DiskLocator>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub device_change: Vec<DeviceConfigSpec>,
}

#[derive(Debug, Display, EnumString, Serialize, Deserialize, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum DiskMoveType {
    MoveAllDiskBackingsAndAllowSharing,
    MoveAllDiskBackingsAndDisallowSharing,
    MoveChildMostDiskBacking,
    CreateNewChildDiskBacking,
}

/// Where one source disk lands.
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiskLocator {
    pub disk_id: i32,
    pub datastore: Option<ManagedObjectReference>,
    pub disk_backing_info: Option<DiskBackingInfo>,
}

#[skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiskBackingInfo {
    pub thin_provisioned: Option<bool>,
    pub eagerly_scrub: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
pub struct OptionValue {
    pub key: String,
    pub value: String,
}
