use clap::Parser;
use iszcloud_poller::{init_logging, run, Cli};
use log::error;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _handle = init_logging(cli.log_level.into())?;
    // Failures are reported through the log only, the exit status stays 0
    if let Err(e) = run(cli) {
        error!("{e:?}");
    }
    Ok(())
}
