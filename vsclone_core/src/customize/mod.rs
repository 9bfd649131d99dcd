/*
* Guest customization applied by the platform after a clone.
*
* Only the shape of the block is checked here, against the OS family
* the target guest id resolves to on the destination compute resource.
*/
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// Error Handling
use log::debug;
use vsclone_error::{LibError, VscloneError};

pub const DEFAULT_CUSTOMIZE_TIMEOUT: i64 = 10;

#[derive(Debug, Display, EnumString, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum OsFamily {
    LinuxGuest,
    WindowsGuest,
    NetwareGuest,
    SolarisGuest,
    DarwinGuestFamily,
    OtherGuestFamily,
}

#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
pub struct CustomizeBlock {
    pub linux_options: Option<LinuxOptions>,
    pub windows_options: Option<WindowsOptions>,
    /// Raw sysprep answer file, alternative to windows_options.
    pub windows_sysprep_text: Option<String>,
    /// Minutes to wait for customization to complete.
    #[serde(default = "default_timeout")]
    pub timeout: i64,
}

fn default_timeout() -> i64 {
    DEFAULT_CUSTOMIZE_TIMEOUT
}

#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
pub struct LinuxOptions {
    pub host_name: String,
    pub domain: String,
    #[serde(default = "default_true")]
    pub hw_clock_utc: bool,
    pub time_zone: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
pub struct WindowsOptions {
    pub computer_name: String,
    pub admin_password: Option<String>,
    pub workgroup: Option<String>,
    pub join_domain: Option<String>,
    #[serde(default)]
    pub auto_logon: bool,
    /// Windows time zone index, 85 is GMT.
    #[serde(default = "default_windows_time_zone")]
    pub time_zone: i64,
}

fn default_windows_time_zone() -> i64 {
    85
}

impl CustomizeBlock {
    /// Check that the options needed by the guest OS family are present.
    pub fn validate(&self, family: OsFamily) -> Result<(), VscloneError> {
        debug!("validating customization block for os family {}", family);
        if self.windows_options.is_some() && self.windows_sysprep_text.is_some() {
            let message = "windows_options and windows_sysprep_text are mutually exclusive";
            return Err(LibError::builder()
                .msg(message)
                .help("Keep only one of them.")
                .build()
                .into());
        }
        match family {
            OsFamily::LinuxGuest if self.linux_options.is_none() => {
                let message = "linux_options must exist in VM customization options for Linux operating systems";
                Err(LibError::builder()
                    .msg(message)
                    .help("Add a [clone.customize.linux_options] block.")
                    .build()
                    .into())
            }
            OsFamily::WindowsGuest
                if self.windows_options.is_none() && self.windows_sysprep_text.is_none() =>
            {
                let message = "one of windows_options or windows_sysprep_text must exist in VM customization options for Windows operating systems";
                Err(LibError::builder()
                    .msg(message)
                    .help("Add a [clone.customize.windows_options] block.")
                    .build()
                    .into())
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use miette::{IntoDiagnostic, Result};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn block(toml: &str) -> Result<CustomizeBlock> {
        toml::from_str(toml).into_diagnostic()
    }

    #[test]
    fn linux_needs_linux_options() -> Result<()> {
        let item = block("")?;
        assert!(item.validate(OsFamily::LinuxGuest).is_err());

        let item = block(
            r#"
            [linux_options]
            host_name = "web-01"
            domain = "example.internal"
        "#,
        )?;
        item.validate(OsFamily::LinuxGuest)?;
        assert!(item.linux_options.unwrap().hw_clock_utc);
        Ok(())
    }

    #[test]
    fn windows_accepts_sysprep_text() -> Result<()> {
        let item = block(r#"windows_sysprep_text = "<unattend/>""#)?;
        item.validate(OsFamily::WindowsGuest)?;

        let item = block("")?;
        let err = item.validate(OsFamily::WindowsGuest).unwrap_err();
        assert!(err.to_string().starts_with("one of windows_options"));
        Ok(())
    }

    #[test]
    fn other_families_pass() -> Result<()> {
        let item = block("")?;
        item.validate(OsFamily::OtherGuestFamily)?;
        assert_eq!(item.timeout, DEFAULT_CUSTOMIZE_TIMEOUT);
        Ok(())
    }

    #[test]
    fn parse_os_family() -> Result<()> {
        let family = OsFamily::from_str("windowsGuest").into_diagnostic()?;
        assert_eq!(family, OsFamily::WindowsGuest);
        assert_eq!(OsFamily::DarwinGuestFamily.to_string(), "darwinGuestFamily");
        Ok(())
    }
}
