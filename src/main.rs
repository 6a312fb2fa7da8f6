use anyhow::Context;
use blink::{
    blink,
    cli::{self, Args, Session},
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let ops = cli::parse_ops(args.ops)?;
    let session = Session::new(blink(), cli::parse_value(&args.default));

    for value in session.run(ops) {
        println!("{}", value);
    }

    Ok(())
}
