//! Entry point for the parkscout command-line interface.
#![forbid(unsafe_code)]

fn main() -> eyre::Result<()> {
    pretty_env_logger::init();
    parkscout_cli::run()?;
    Ok(())
}
