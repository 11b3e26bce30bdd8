//! The `omni health` command.

use clap::Args;
use omni_core::Config;

use super::{build_service, print_response, EngineArgs};

/// Arguments for the `health` command.
#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Pretty-print the response
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Execute the health command.
pub async fn execute(args: HealthArgs, config: Config) -> anyhow::Result<()> {
    let pretty = args.pretty || config.output.pretty;
    let service = build_service(&args.engine, config);

    let status = service.engine().status();
    tracing::info!(
        "Engine mode: {}, model loaded: {}",
        status.mode,
        status.model_loaded
    );
    print_response(&service.health(), pretty)
}
