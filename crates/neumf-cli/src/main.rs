//! NeuMF CLI entry point.

use anyhow::Result;
use clap::Parser;
use neumf_cli::{run, TrainArgs};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("neumf_cli=info".parse()?)
                .add_directive("neumf_data=info".parse()?)
                .add_directive("neumf_training=info".parse()?),
        )
        .init();

    let args = TrainArgs::parse();
    run(&args)
}
