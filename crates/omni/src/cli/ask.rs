//! The `omni ask` command.

use clap::Args;
use omni_core::{AskRequest, Config, Label};
use std::path::PathBuf;

use super::{build_service, engine_failure, parse_label, print_response, read_request, EngineArgs};

/// Arguments for the `ask` command.
#[derive(Args, Debug)]
pub struct AskArgs {
    /// Classifier label as NAME=PROBABILITY (repeatable)
    #[arg(short, long = "label", value_name = "NAME=PROBABILITY", value_parser = parse_label)]
    pub labels: Vec<Label>,

    /// Question about the image
    #[arg(short, long)]
    pub question: Option<String>,

    /// JSON request file ({"predictions": [...], "question": "..."})
    #[arg(short, long, conflicts_with_all = ["labels", "question"])]
    pub input: Option<PathBuf>,

    /// Pretty-print the response
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub engine: EngineArgs,
}

impl AskArgs {
    fn request(&self) -> anyhow::Result<AskRequest> {
        if let Some(path) = &self.input {
            return read_request(path);
        }
        let Some(question) = &self.question else {
            anyhow::bail!("No question given.\n\n  Hint: pass --question TEXT or --input FILE.");
        };
        if self.labels.is_empty() {
            anyhow::bail!("No labels given.\n\n  Hint: pass --label NAME=PROBABILITY or --input FILE.");
        }
        Ok(AskRequest {
            predictions: self.labels.clone(),
            question: question.clone(),
        })
    }
}

/// Execute the ask command.
pub async fn execute(args: AskArgs, config: Config) -> anyhow::Result<()> {
    let request = args.request()?;
    let pretty = args.pretty || config.output.pretty;
    let service = build_service(&args.engine, config);

    let response = service.ask(request).await.map_err(engine_failure)?;
    print_response(&response, pretty)
}
