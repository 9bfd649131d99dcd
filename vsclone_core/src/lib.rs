/*
* Clone and instant clone requests for vSphere-like virtual machines.
*
* A declaration is validated against its clone source at plan time,
* then expanded into the request the management api expects on apply.
*/
pub mod cli;
pub mod clone;
pub mod config;
pub mod connection;
pub mod customize;
pub mod declaration;
pub mod device;
pub mod inventory;

// Reexports
pub use clone::{CloneSpec, InstantCloneSpec, ValidationAnnotations};
pub use connection::Connection;
pub use declaration::VmDeclaration;
