use clap::Parser;
use routepat::cli::{run_cli, Cli};
use routepat::config::RuntimeConfig;
use routepat::logging::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&RuntimeConfig::from_env())?;
    run_cli(cli)
}
