/*
* A loose mapping to the management api virtual device types.
*
* Only the parts of the device tree the clone workflow reads or rewrites
* are modeled here: disks, ethernet cards and their controllers.
* Anything else is carried as an opaque device so that indexes and keys
* of the source hardware list are preserved.
*/
mod disk;
mod net;

// Reexports
pub use disk::{DeviceReconciler, DiskReconciler};
pub use net::{pair_network_interfaces, rewrite_ethernet_card};

use crate::inventory::ManagedObjectReference;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use strum::{Display, EnumString};

#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(tag = "_typeName")]
pub enum VirtualDevice {
    #[serde(rename = "VirtualDisk")]
    Disk(VirtualDisk),
    #[serde(rename = "VirtualEthernetCard")]
    EthernetCard(VirtualEthernetCard),
    #[serde(rename = "VirtualController")]
    Controller(VirtualController),
    #[serde(rename = "VirtualDevice")]
    Other(OtherDevice),
}
impl VirtualDevice {
    pub fn key(&self) -> i32 {
        match self {
            VirtualDevice::Disk(e) => e.key,
            VirtualDevice::EthernetCard(e) => e.key,
            VirtualDevice::Controller(e) => e.key,
            VirtualDevice::Other(e) => e.key,
        }
    }
}

// Disk
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualDisk {
    pub key: i32,
    #[serde(default)]
    pub label: String,
    pub controller_key: i32,
    pub unit_number: i32,
    #[serde(rename = "capacityInKB")]
    pub capacity_in_kb: i64,
    pub backing: DiskBacking,
}
impl VirtualDisk {
    /// Disk capacity in GiB, the unit disk declarations use.
    pub fn size_gib(&self) -> i64 {
        self.capacity_in_kb / 1024 / 1024
    }
}

#[skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiskBacking {
    #[serde(default)]
    pub file_name: String,
    pub datastore: Option<ManagedObjectReference>,
    pub thin_provisioned: Option<bool>,
    pub eagerly_scrub: Option<bool>,
}

// Controller
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualController {
    pub key: i32,
    pub bus_number: i32,
    #[serde(default)]
    pub kind: ControllerKind,
    /// Keys of the devices attached to this controller.
    #[serde(default)]
    pub device: Vec<i32>,
}

#[derive(Default, Debug, Display, EnumString, Serialize, Deserialize, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ControllerKind {
    #[default]
    Scsi,
    Ide,
    Sata,
    Nvme,
}

#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OtherDevice {
    pub key: i32,
    #[serde(default)]
    pub label: String,
}

// Network
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualEthernetCard {
    pub key: i32,
    #[serde(default)]
    pub adapter_type: AdapterType,
    pub backing: Option<EthernetCardBacking>,
    pub address_type: Option<MacType>,
    pub mac_address: Option<String>,
    pub resource_allocation: Option<ResourceAllocation>,
}

#[derive(Default, Debug, Display, EnumString, Serialize, Deserialize, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AdapterType {
    #[default]
    Vmxnet3,
    Vmxnet2,
    E1000,
    E1000e,
    Pcnet32,
    Sriov,
}

/*
* What a network adapter is plugged into.
* The variant depends on the kind of network the adapter is wired to.
*/
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(tag = "_typeName")]
pub enum EthernetCardBacking {
    #[serde(rename = "VirtualEthernetCardNetworkBackingInfo", rename_all = "camelCase")]
    Network {
        device_name: String,
        network: ManagedObjectReference,
    },
    #[serde(
        rename = "VirtualEthernetCardDistributedVirtualPortBackingInfo",
        rename_all = "camelCase"
    )]
    DistributedPort {
        switch_uuid: String,
        portgroup_key: String,
    },
    #[serde(
        rename = "VirtualEthernetCardOpaqueNetworkBackingInfo",
        rename_all = "camelCase"
    )]
    OpaqueNetwork {
        opaque_network_id: String,
        opaque_network_type: String,
    },
}

#[derive(Debug, Display, EnumString, Serialize, Deserialize, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MacType {
    Manual,
    Generated,
    Assigned,
}

#[skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAllocation {
    pub limit: Option<i64>,
    pub reservation: Option<i64>,
    #[serde(default)]
    pub share: SharesInfo,
}

#[derive(Default, Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SharesInfo {
    pub level: SharesLevel,
    #[serde(default)]
    pub shares: i32,
}

/// Relative priority under contention.
/// Only `Custom` honors an explicit share count.
#[derive(Default, Debug, Display, EnumString, Serialize, Deserialize, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SharesLevel {
    Low,
    #[default]
    Normal,
    High,
    Custom,
}

// Device change
#[derive(Debug, Display, Serialize, Deserialize, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeviceConfigOperation {
    Add,
    Remove,
    Edit,
}

#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceConfigSpec {
    pub operation: DeviceConfigOperation,
    pub device: VirtualDevice,
}

/*
* The ordered hardware device list of a virtual machine.
*/
#[derive(Default, Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(transparent)]
pub struct DeviceList(pub Vec<VirtualDevice>);

impl From<Vec<VirtualDevice>> for DeviceList {
    fn from(e: Vec<VirtualDevice>) -> Self {
        Self(e)
    }
}
impl DeviceList {
    /// Network adapters, in device list order.
    pub fn ethernet_cards(&self) -> Vec<VirtualEthernetCard> {
        self.0
            .iter()
            .filter_map(|e| match e {
                VirtualDevice::EthernetCard(card) => Some(card.to_owned()),
                _ => None,
            })
            .collect()
    }
    /// Disks ordered by controller bus number then unit number.
    pub fn disks(&self) -> Vec<&VirtualDisk> {
        let mut disks: Vec<&VirtualDisk> = self
            .0
            .iter()
            .filter_map(|e| match e {
                VirtualDevice::Disk(disk) => Some(disk),
                _ => None,
            })
            .collect();
        disks.sort_by_key(|e| (self.bus_number(e.controller_key), e.unit_number));
        disks
    }
    pub fn controller(&self, key: i32) -> Option<&VirtualController> {
        self.0.iter().find_map(|e| match e {
            VirtualDevice::Controller(controller) if controller.key == key => Some(controller),
            _ => None,
        })
    }
    // Disks on an unknown controller are sorted last.
    fn bus_number(&self, controller_key: i32) -> i32 {
        self.controller(controller_key)
            .map(|e| e.bus_number)
            .unwrap_or(i32::MAX)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use vsclone_error::ObjectKind;

    pub fn scsi_controller(key: i32, bus_number: i32) -> VirtualDevice {
        VirtualDevice::Controller(VirtualController {
            key,
            bus_number,
            kind: ControllerKind::Scsi,
            device: vec![],
        })
    }
    pub fn disk(key: i32, controller_key: i32, unit_number: i32, size_gib: i64) -> VirtualDevice {
        VirtualDevice::Disk(VirtualDisk {
            key,
            label: format!("Hard disk {}", unit_number + 1),
            controller_key,
            unit_number,
            capacity_in_kb: size_gib * 1024 * 1024,
            backing: DiskBacking {
                file_name: format!("[datastore1] tpl/tpl_{unit_number}.vmdk"),
                datastore: Some(ManagedObjectReference::new(
                    ObjectKind::Datastore,
                    "datastore-1",
                )),
                thin_provisioned: Some(true),
                eagerly_scrub: Some(false),
            },
        })
    }
    pub fn ethernet_card(key: i32, mac: Option<&str>) -> VirtualDevice {
        VirtualDevice::EthernetCard(VirtualEthernetCard {
            key,
            adapter_type: AdapterType::Vmxnet3,
            backing: Some(EthernetCardBacking::Network {
                device_name: "VM Network".to_owned(),
                network: ManagedObjectReference::new(ObjectKind::Network, "network-1"),
            }),
            address_type: mac.map(|_| MacType::Manual),
            mac_address: mac.map(|e| e.to_owned()),
            resource_allocation: None,
        })
    }
}
