mod types;
pub use types::*;

use crate::config::VscloneConfig;
use crate::connection::Connection;
use crate::declaration::VmDeclaration;
use crate::inventory::{ManagedObjectReference, StaticInventory};

use clap::Parser;
use serde::Serialize;
use std::sync::Arc;

use owo_colors::OwoColorize;

// Logger
use env_logger::Builder;

// Error Handling
use log::{debug, info};
use miette::Result;
use vsclone_error::{ObjectKind, VscloneError};

/// A clone request and the source it clones from.
#[derive(Debug, Serialize)]
struct CloneOutput<T: Serialize> {
    spec: T,
    source: ManagedObjectReference,
}

impl Cli {
    pub async fn run() -> Result<()> {
        let cli = Cli::parse();
        Self::switch(cli).await?;
        Ok(())
    }
    pub async fn switch(cli: Cli) -> Result<()> {
        // Set verbosity
        let verbosity = cli.verbose.log_level_filter();
        std::env::set_var("VSCLONE_LOG", verbosity.to_string().to_lowercase());
        // A logger is already set when switch runs more than once in a process.
        if let Err(e) = Builder::from_env("VSCLONE_LOG").try_init() {
            debug!("logger already initialized: {}", e);
        }

        let conn = Self::connect(cli.inventory)?;
        let json = Self::execute(&cli.commands, &conn).await?;
        println!("{}", json);
        Ok(())
    }

    /*
     * Open the inventory snapshot given on the command line,
     * or the one set in configuration.
     */
    pub fn connect(inventory: Option<String>) -> Result<Connection, VscloneError> {
        let config = VscloneConfig::get()?;
        let path = inventory.unwrap_or(config.inventory.to_owned());
        let inventory = StaticInventory::from_file(&path)?;

        let mut conn = Connection::new(Arc::new(inventory));
        if let Some(timeout) = config.api_timeout() {
            conn = conn.with_api_timeout(timeout);
        }
        Ok(conn)
    }

    /// Run a command and return its json output.
    pub async fn execute(commands: &Commands, conn: &Connection) -> Result<String, VscloneError> {
        let json = match commands {
            Commands::Validate(args) => {
                let declaration = VmDeclaration::from_file(&args.file)?;
                let annotations = declaration.validate_clone(conn).await?;
                eprintln!(
                    "{} clone source fits {}",
                    "[validate]".green(),
                    declaration.name.bold()
                );
                serde_json::to_string_pretty(&annotations)?
            }
            Commands::Clone(args) => {
                let declaration = VmDeclaration::from_file(&args.file)?;
                let (spec, source) = declaration.expand_clone_spec(conn).await?;
                info!("{} built clone spec from {}", "[clone]".green(), source);
                serde_json::to_string_pretty(&CloneOutput { spec, source })?
            }
            Commands::InstantClone(args) => {
                let declaration = VmDeclaration::from_file(&args.declaration.file)?;
                let folder = ManagedObjectReference::new(ObjectKind::Folder, &args.folder);
                let (spec, source) = declaration.expand_instant_clone_spec(conn, &folder).await?;
                info!("{} built instant clone spec from {}", "[instant-clone]".green(), source);
                serde_json::to_string_pretty(&CloneOutput { spec, source })?
            }
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn demo(file: &str) -> String {
        format!("{}/../demos/{}", env!("CARGO_MANIFEST_DIR"), file)
    }
    fn parse(line: &str) -> Cli {
        let os_str: Vec<&str> = line.split(' ').collect();
        Cli::parse_from(os_str)
    }

    #[test]
    fn parse_command_line() -> Result<()> {
        let cli = parse("vsclone -v --inventory inventory.json instant-clone --file vm.toml --folder group-v3");
        assert_eq!(cli.inventory, Some("inventory.json".to_owned()));
        assert_eq!(
            cli.commands,
            Commands::InstantClone(InstantCloneArgs {
                declaration: DeclarationArgs {
                    file: "vm.toml".to_owned()
                },
                folder: "group-v3".to_owned(),
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn switch_twice_in_one_process() -> Result<()> {
        let line = format!(
            "vsclone --inventory {} validate --file {}",
            demo("inventory.json"),
            demo("clone.toml")
        );
        Cli::switch(parse(&line)).await?;
        Cli::switch(parse(&line)).await?;
        Ok(())
    }

    #[tokio::test]
    async fn validate_demo_declaration() -> Result<()> {
        let conn = Cli::connect(Some(demo("inventory.json")))?;
        let commands = Commands::Validate(DeclarationArgs {
            file: demo("clone.toml"),
        });
        let json = Cli::execute(&commands, &conn).await?;
        assert!(json.contains("com.vmware.guestInfo"));
        Ok(())
    }

    #[tokio::test]
    async fn expand_demo_declarations() -> Result<()> {
        let conn = Cli::connect(Some(demo("inventory.json")))?;

        let commands = Commands::Clone(DeclarationArgs {
            file: demo("clone.toml"),
        });
        let json = Cli::execute(&commands, &conn).await?;
        assert!(json.contains("createNewChildDiskBacking"));

        let commands = Commands::InstantClone(InstantCloneArgs {
            declaration: DeclarationArgs {
                file: demo("instant_clone.toml"),
            },
            folder: "group-v3".to_owned(),
        });
        let json = Cli::execute(&commands, &conn).await?;
        assert!(json.contains("deviceChange"));
        Ok(())
    }
}
