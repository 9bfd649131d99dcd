use super::{NetworkInterfaceDeclaration, VmDeclaration, MIN_CLONE_TIMEOUT};
use std::fs;
use std::str::FromStr;

use macaddr::MacAddr;

// Error Handling
use log::{debug, trace};
use vsclone_error::{CastError, LibError, TomlError, VscloneError};

impl VmDeclaration {
    pub fn from_file(file_path: &str) -> Result<Self, VscloneError> {
        let string = fs::read_to_string(file_path)?;
        Self::from_toml(&string)
    }
    pub fn from_toml(string: &str) -> Result<Self, VscloneError> {
        let res = toml::from_str::<Self>(string);
        let item = match res {
            Ok(res) => res,
            Err(e) => {
                let err = CastError::TomlError(TomlError::new(e, string));
                return Err(err.into());
            }
        };
        item.check()?;
        trace!("{:#?}", item);
        Ok(item)
    }

    /*
     * Schema level checks.
     * Everything the orchestration tool would reject before
     * handing the configuration over.
     */
    pub fn check(&self) -> Result<(), VscloneError> {
        if self.clone.is_some() && self.instant_clone.is_some() {
            return Err(schema_error(
                "clone and instant_clone can't be declared together",
                "Keep the block matching the kind of source you clone from.",
            ));
        }
        if self.resource_pool_id.is_absent() {
            return Err(schema_error("resource_pool_id is required", ""));
        }
        if let Some(clone) = &self.clone {
            if clone.template_uuid.is_absent() {
                return Err(schema_error("clone.template_uuid is required", ""));
            }
            check_timeout("clone.timeout", clone.timeout)?;
        }
        if let Some(instant_clone) = &self.instant_clone {
            if instant_clone.source_uuid.is_absent() {
                return Err(schema_error("instant_clone.source_uuid is required", ""));
            }
            check_timeout("instant_clone.timeout", instant_clone.timeout)?;
        }
        for disk in &self.disk {
            if disk.size < 1 {
                let message = format!("disk {}: size must be at least 1 (got {})", disk.label, disk.size);
                return Err(schema_error(&message, "Disk sizes are expressed in GiB."));
            }
        }
        for (index, nic) in self.network_interface.iter().enumerate() {
            nic.check(index)?;
        }
        debug!("declaration for {:#?} passed schema checks", self.name);
        Ok(())
    }
}

impl NetworkInterfaceDeclaration {
    fn check(&self, index: usize) -> Result<(), VscloneError> {
        let prefix = format!("network_interface.{index}");
        if self.bandwidth_limit < -1 {
            let message = format!(
                "{prefix}.bandwidth_limit must be at least -1 (got {})",
                self.bandwidth_limit
            );
            return Err(schema_error(&message, "Use -1 for an unlimited bandwidth."));
        }
        if self.bandwidth_reservation < 0 {
            let message = format!(
                "{prefix}.bandwidth_reservation must be at least 0 (got {})",
                self.bandwidth_reservation
            );
            return Err(schema_error(&message, ""));
        }
        if self.bandwidth_share_count < 0 {
            let message = format!(
                "{prefix}.bandwidth_share_count must be at least 0 (got {})",
                self.bandwidth_share_count
            );
            return Err(schema_error(&message, ""));
        }
        if self.use_static_mac && MacAddr::from_str(&self.mac_address).is_err() {
            let message = format!(
                "{prefix}.mac_address {:#?} is not a valid mac address",
                self.mac_address
            );
            return Err(schema_error(
                &message,
                "A static mac address looks like 00:50:56:aa:bb:cc",
            ));
        }
        Ok(())
    }
}

fn check_timeout(key: &str, timeout: i64) -> Result<(), VscloneError> {
    if timeout < MIN_CLONE_TIMEOUT {
        let message = format!("{key} must be at least {MIN_CLONE_TIMEOUT} (got {timeout})");
        return Err(schema_error(&message, "The timeout is expressed in minutes."));
    }
    Ok(())
}

fn schema_error(message: &str, help: &str) -> VscloneError {
    LibError::builder().msg(message).help(help).build().into()
}
