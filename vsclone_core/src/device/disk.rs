use super::{DeviceList, VirtualDisk};
use crate::clone::{DiskBackingInfo, DiskLocator};
use crate::connection::Connection;
use crate::declaration::{DiskDeclaration, VmDeclaration};
use crate::inventory::ManagedObjectReference;

use async_trait::async_trait;

// Error Handling
use log::{debug, trace};
use vsclone_error::{InvariantError, VscloneError};

/*
* Disk layout reconciliation between a source and a declaration.
*
* The clone workflow only asks two things:
* whether the declared disks can be built from the source disks,
* and where each source disk lands on the new virtual machine.
*/
#[async_trait]
pub trait DeviceReconciler: Send + Sync {
    async fn validate_disks(
        &self,
        conn: &Connection,
        declaration: &VmDeclaration,
        devices: &DeviceList,
        linked: bool,
    ) -> Result<(), VscloneError>;

    async fn relocate_disks(
        &self,
        conn: &Connection,
        declaration: &VmDeclaration,
        devices: &DeviceList,
    ) -> Result<Vec<DiskLocator>, VscloneError>;
}

/// Pairs source disks and declared disks by position.
#[derive(Default, Debug, Clone, Copy)]
pub struct DiskReconciler;

impl DiskReconciler {
    fn pair<'a>(
        devices: &'a DeviceList,
        declaration: &'a VmDeclaration,
    ) -> Vec<(&'a VirtualDisk, &'a DiskDeclaration)> {
        let mut declared: Vec<&DiskDeclaration> = declaration.disk.iter().collect();
        declared.sort_by_key(|e| e.unit_number);
        devices.disks().into_iter().zip(declared).collect()
    }
}

#[async_trait]
impl DeviceReconciler for DiskReconciler {
    async fn validate_disks(
        &self,
        _conn: &Connection,
        declaration: &VmDeclaration,
        devices: &DeviceList,
        linked: bool,
    ) -> Result<(), VscloneError> {
        let source = devices.disks();
        if declaration.disk.len() < source.len() {
            return Err(InvariantError::NotEnoughDisks {
                expected: source.len(),
                actual: declaration.disk.len(),
            }
            .into());
        }
        for (disk, declared) in Self::pair(devices, declaration) {
            trace!("checking disk {:#?} against source disk {}", declared.label, disk.key);
            check_disk(disk, declared, linked)?;
        }
        debug!("{} declared disks are compatible with the source", declaration.disk.len());
        Ok(())
    }

    async fn relocate_disks(
        &self,
        conn: &Connection,
        declaration: &VmDeclaration,
        devices: &DeviceList,
    ) -> Result<Vec<DiskLocator>, VscloneError> {
        let linked = declaration.linked_clone();
        let default_datastore = match declaration.datastore_id.as_known() {
            Some(id) => Some(conn.datastore(id).await?),
            None => None,
        };

        let mut locators = vec![];
        for (disk, declared) in Self::pair(devices, declaration) {
            let own = declared.datastore_id.as_deref().filter(|e| !e.is_empty());
            let datastore: Option<ManagedObjectReference> = match own {
                Some(id) => Some(conn.datastore(id).await?),
                None => default_datastore
                    .clone()
                    .or_else(|| disk.backing.datastore.clone()),
            };
            let disk_backing_info = match linked {
                true => None,
                false => Some(DiskBackingInfo {
                    thin_provisioned: declared.thin_provisioned,
                    eagerly_scrub: declared.eagerly_scrub,
                }),
            };
            locators.push(DiskLocator {
                disk_id: disk.key,
                datastore,
                disk_backing_info,
            });
        }
        Ok(locators)
    }
}

fn check_disk(
    disk: &VirtualDisk,
    declared: &DiskDeclaration,
    linked: bool,
) -> Result<(), VscloneError> {
    let incompatible = |reason: String| -> VscloneError {
        InvariantError::DiskIncompatible {
            label: declared.label.to_owned(),
            reason,
        }
        .into()
    };
    let source_size = disk.size_gib();
    if linked {
        if declared.size != source_size {
            return Err(incompatible(format!(
                "size must be equal to the source disk size for linked clones ({source_size} GiB, got {} GiB)",
                declared.size
            )));
        }
        if let Some(thin) = declared.thin_provisioned {
            if Some(thin) != disk.backing.thin_provisioned {
                return Err(incompatible(
                    "thin_provisioned must match the source disk for linked clones".to_owned(),
                ));
            }
        }
        if let Some(eager) = declared.eagerly_scrub {
            if Some(eager) != disk.backing.eagerly_scrub {
                return Err(incompatible(
                    "eagerly_scrub must match the source disk for linked clones".to_owned(),
                ));
            }
        }
    } else if declared.size < source_size {
        return Err(incompatible(format!(
            "size must be at least the source disk size ({source_size} GiB, got {} GiB)",
            declared.size
        )));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::device::fixtures::{disk, scsi_controller};
    use crate::inventory::StaticInventory;
    use miette::Result;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use vsclone_error::ObjectKind;

    fn connection() -> Connection {
        let inventory = StaticInventory::builder()
            .datastore(vec!["datastore-1".to_owned(), "datastore-2".to_owned()])
            .build();
        Connection::new(Arc::new(inventory))
    }
    fn devices() -> DeviceList {
        DeviceList(vec![
            scsi_controller(1000, 0),
            disk(2001, 1000, 1, 40),
            disk(2000, 1000, 0, 20),
        ])
    }
    fn declaration(toml: &str) -> Result<VmDeclaration> {
        let header = r#"
            name = "web-01"
            guest_id = "ubuntu64Guest"
            resource_pool_id = "resgroup-8"
        "#;
        Ok(VmDeclaration::from_toml(&format!("{header}\n{toml}"))?)
    }

    #[tokio::test]
    async fn not_enough_disks() -> Result<()> {
        let item = declaration(
            r#"
            [[disk]]
            label = "disk0"
            size = 20
        "#,
        )?;
        let err = DiskReconciler
            .validate_disks(&connection(), &item, &devices(), false)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "not enough disks in configuration - you need at least 2 to use this template (current: 1)"
        );
        Ok(())
    }

    #[tokio::test]
    async fn grow_disks_unless_linked() -> Result<()> {
        let item = declaration(
            r#"
            [[disk]]
            label = "disk1"
            size = 50
            unit_number = 1

            [[disk]]
            label = "disk0"
            size = 20
        "#,
        )?;
        DiskReconciler
            .validate_disks(&connection(), &item, &devices(), false)
            .await?;

        let err = DiskReconciler
            .validate_disks(&connection(), &item, &devices(), true)
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("disk disk1: size must be equal"));
        Ok(())
    }

    #[tokio::test]
    async fn shrink_is_rejected() -> Result<()> {
        let item = declaration(
            r#"
            [[disk]]
            label = "disk0"
            size = 10

            [[disk]]
            label = "disk1"
            size = 40
            unit_number = 1
        "#,
        )?;
        let err = DiskReconciler
            .validate_disks(&connection(), &item, &devices(), false)
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("disk disk0: size must be at least"));
        Ok(())
    }

    #[tokio::test]
    async fn linked_disks_keep_provisioning() -> Result<()> {
        let item = declaration(
            r#"
            [[disk]]
            label = "disk0"
            size = 20
            thin_provisioned = false

            [[disk]]
            label = "disk1"
            size = 40
            unit_number = 1
        "#,
        )?;
        let err = DiskReconciler
            .validate_disks(&connection(), &item, &devices(), true)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "disk disk0: thin_provisioned must match the source disk for linked clones"
        );
        Ok(())
    }

    #[tokio::test]
    async fn relocate_to_declared_datastores() -> Result<()> {
        let item = declaration(
            r#"
            datastore_id = "datastore-2"

            [[disk]]
            label = "disk0"
            size = 20
            datastore_id = "datastore-1"
            thin_provisioned = true

            [[disk]]
            label = "disk1"
            size = 40
            unit_number = 1
        "#,
        )?;
        let locators = DiskReconciler
            .relocate_disks(&connection(), &item, &devices())
            .await?;
        assert_eq!(
            locators,
            vec![
                DiskLocator {
                    disk_id: 2000,
                    datastore: Some(ManagedObjectReference::new(
                        ObjectKind::Datastore,
                        "datastore-1"
                    )),
                    disk_backing_info: Some(DiskBackingInfo {
                        thin_provisioned: Some(true),
                        eagerly_scrub: None,
                    }),
                },
                DiskLocator {
                    disk_id: 2001,
                    datastore: Some(ManagedObjectReference::new(
                        ObjectKind::Datastore,
                        "datastore-2"
                    )),
                    disk_backing_info: Some(DiskBackingInfo::default()),
                },
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn relocate_unknown_datastore_fails() -> Result<()> {
        let item = declaration(
            r#"
            [[disk]]
            label = "disk0"
            size = 20
            datastore_id = "datastore-404"
        "#,
        )?;
        let err = DiskReconciler
            .relocate_disks(&connection(), &item, &devices())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot locate datastore with id \"datastore-404\""
        );
        Ok(())
    }
}
