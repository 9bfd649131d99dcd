use bon::bon;
use miette::{Diagnostic, Report};
pub use pipelight_error::{CastError, TomlError};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum VscloneError {
    ////////////////////////////////
    // Lib native errors
    #[error(transparent)]
    #[diagnostic(transparent)]
    LibError(#[from] LibError),

    ////////////////////////////////
    // Clone workflow
    #[error(transparent)]
    #[diagnostic(transparent)]
    ResolutionError(#[from] ResolutionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    PropertiesError(#[from] PropertiesError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    InvariantError(#[from] InvariantError),

    #[error("timed out after {0:?} waiting on the management api")]
    #[diagnostic(code(vsclone::timeout::error))]
    TimeoutError(std::time::Duration),

    ////////////////////////////////
    // Type convertion
    #[error(transparent)]
    #[diagnostic(code(serde::error))]
    SerdeError(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    CastError(#[from] CastError),

    #[error(transparent)]
    #[diagnostic(code(vsclone::io::error))]
    IoError(#[from] std::io::Error),
}

/**
A root cause error with no inner origin
*/
#[derive(Debug, Error, Diagnostic)]
#[error("{}", message)]
#[diagnostic(code(vsclone::lib::error))]
pub struct LibError {
    pub message: String,
    #[help]
    pub help: String,
}

#[bon]
impl LibError {
    #[builder]
    pub fn new(msg: &str, help: &str) -> Self {
        Self {
            message: msg.to_owned(),
            help: help.to_owned(),
        }
    }
}

/*
* Kinds of managed objects the clone workflow resolves.
* Serialized with the management api type names,
* displayed with human readable names.
*/
#[derive(Debug, Display, EnumString, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub enum ObjectKind {
    #[serde(rename = "VirtualMachine")]
    #[strum(serialize = "virtual machine or template")]
    VirtualMachine,
    #[serde(rename = "VirtualMachineSnapshot")]
    #[strum(serialize = "snapshot")]
    Snapshot,
    #[serde(rename = "Datastore")]
    #[strum(serialize = "datastore")]
    Datastore,
    #[serde(rename = "ResourcePool")]
    #[strum(serialize = "resource pool")]
    ResourcePool,
    #[serde(rename = "HostSystem")]
    #[strum(serialize = "host system")]
    HostSystem,
    #[serde(rename = "Network")]
    #[strum(serialize = "network")]
    Network,
    #[serde(rename = "DistributedVirtualPortgroup")]
    #[strum(serialize = "distributed port group")]
    DistributedVirtualPortgroup,
    #[serde(rename = "OpaqueNetwork")]
    #[strum(serialize = "opaque network")]
    OpaqueNetwork,
    #[serde(rename = "Folder")]
    #[strum(serialize = "folder")]
    Folder,
}

/**
An identifier that did not resolve to a live object.
*/
#[derive(Debug, Error, Diagnostic)]
#[error("cannot locate {kind} with id {id:?}")]
#[diagnostic(
    code(vsclone::resolution::error),
    help("Check that the id exists in the inventory and is visible to this connection.")
)]
pub struct ResolutionError {
    pub kind: ObjectKind,
    pub id: String,
    #[diagnostic_source]
    pub origin: Report,
}
impl ResolutionError {
    pub fn new(kind: ObjectKind, id: &str, origin: Report) -> Self {
        Self {
            kind,
            id: id.to_owned(),
            origin,
        }
    }
}

/**
A resolved object whose properties could not be fetched,
or came back without the blocks the workflow relies on.
*/
#[derive(Debug, Error, Diagnostic)]
#[error("error fetching virtual machine or template properties for {id:?}: {reason}")]
#[diagnostic(code(vsclone::properties::error))]
pub struct PropertiesError {
    pub id: String,
    pub reason: String,
}
impl PropertiesError {
    pub fn new(id: &str, reason: &str) -> Self {
        Self {
            id: id.to_owned(),
            reason: reason.to_owned(),
        }
    }
}

/**
The source or the placement breaks a structural rule of cloning.
Every variant carries what is needed to fix the declaration.
*/
#[derive(Debug, Error, Diagnostic)]
pub enum InvariantError {
    #[error("invalid guest ID {actual:?} for clone. Please set it to {expected:?}")]
    #[diagnostic(
        code(vsclone::invariant::guest_id),
        help("The declared guest_id must match the guest_id of the source.")
    )]
    GuestIdMismatch { expected: String, actual: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(
        "not enough disks in configuration - you need at least {expected} to use this template (current: {actual})"
    )]
    #[diagnostic(code(vsclone::invariant::disk_count))]
    NotEnoughDisks { expected: usize, actual: usize },

    #[error("disk {label}: {reason}")]
    #[diagnostic(code(vsclone::invariant::disk))]
    DiskIncompatible { label: String, reason: String },

    #[error("host {host:?} is not a member of the compute resource of resource pool {pool:?}")]
    #[diagnostic(
        code(vsclone::invariant::host),
        help("Pick a host_system_id that belongs to the cluster or standalone host backing the pool.")
    )]
    HostNotInPool { host: String, pool: String },
}

/**
Linked clone eligibility failures, one per clause.
*/
#[derive(Debug, Error, Diagnostic, Eq, PartialEq)]
pub enum SnapshotError {
    #[error("virtual machine or template {uuid} must have a snapshot to be used as a linked clone")]
    #[diagnostic(code(vsclone::invariant::snapshot))]
    Missing { uuid: String },

    #[error("virtual machine or template {uuid} must have exactly one root snapshot (has: {count})")]
    #[diagnostic(
        code(vsclone::invariant::snapshot),
        help("Remove the extra snapshots or use a full clone.")
    )]
    RootCount { uuid: String, count: usize },

    #[error("virtual machine or template {uuid}'s root snapshot must not have children")]
    #[diagnostic(
        code(vsclone::invariant::snapshot),
        help("Consolidate the snapshot chain or use a full clone.")
    )]
    RootHasChildren { uuid: String },

    #[error("virtual machine or template {uuid}'s current snapshot must match root snapshot")]
    #[diagnostic(code(vsclone::invariant::snapshot))]
    CurrentMismatch { uuid: String },
}
