use vsclone_core::cli::Cli;

// Error Handling
use log::trace;
use miette::Result;

/// Parse the command line and run the requested vsclone command.
#[tokio::main]
async fn main() -> Result<()> {
    make_handler()?;
    Cli::run().await?;
    trace!("Process clean exit.");
    Ok(())
}

/// Report panics through miette, like every other error.
pub fn make_handler() -> Result<()> {
    miette::set_panic_hook();
    Ok(())
}
