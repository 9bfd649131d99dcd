/*
* Cloning a virtual machine from an existing one.
*
* - validate: plan time checks of a clone source, read only.
* - expand: the traditional clone request, from a template
*   or a powered off virtual machine.
* - instant: the instant clone request, from a running virtual machine.
*/
mod expand;
mod instant;
mod snapshot;
mod spec;
mod validate;

// Reexports
pub use snapshot::validate_clone_snapshots;
pub use spec::{
    CloneSpec, DiskBackingInfo, DiskLocator, DiskMoveType, InstantCloneSpec, OptionValue,
    RelocateSpec,
};
pub use validate::ValidationAnnotations;

use crate::declaration::{CloneBlock, InstantCloneBlock, VmDeclaration};

// Error Handling
use vsclone_error::{LibError, VscloneError};

impl VmDeclaration {
    fn clone_block(&self) -> Result<&CloneBlock, VscloneError> {
        match &self.clone {
            Some(v) => Ok(v),
            None => Err(LibError::builder()
                .msg("declaration has no clone block")
                .help("Add a [clone] block with the template_uuid to clone from.")
                .build()
                .into()),
        }
    }
    fn instant_clone_block(&self) -> Result<&InstantCloneBlock, VscloneError> {
        match &self.instant_clone {
            Some(v) => Ok(v),
            None => Err(LibError::builder()
                .msg("declaration has no instant_clone block")
                .help("Add an [instant_clone] block with the source_uuid to clone from.")
                .build()
                .into()),
        }
    }
}
