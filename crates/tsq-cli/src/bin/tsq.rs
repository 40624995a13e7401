use anyhow::Result;
use clap::Parser;

use tsq_cli::args::CliArgs;
use tsq_cli::tracing_config::init_tracing;

fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    tsq_cli::run(args, &mut out)
}
