//! The `omni describe` command.

use clap::Args;
use omni_core::{Config, DescribeRequest, Label};
use std::path::PathBuf;

use super::{build_service, engine_failure, parse_label, print_response, read_request, EngineArgs};

/// Arguments for the `describe` command.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Classifier label as NAME=PROBABILITY (repeatable)
    #[arg(short, long = "label", value_name = "NAME=PROBABILITY", value_parser = parse_label)]
    pub labels: Vec<Label>,

    /// JSON request file ({"predictions": [...]}) instead of --label
    #[arg(short, long, conflicts_with = "labels")]
    pub input: Option<PathBuf>,

    /// Pretty-print the response
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub engine: EngineArgs,
}

impl DescribeArgs {
    fn request(&self) -> anyhow::Result<DescribeRequest> {
        match &self.input {
            Some(path) => read_request(path),
            None if self.labels.is_empty() => {
                anyhow::bail!("No labels given.\n\n  Hint: pass --label NAME=PROBABILITY or --input FILE.")
            }
            None => Ok(DescribeRequest {
                predictions: self.labels.clone(),
            }),
        }
    }
}

/// Execute the describe command.
pub async fn execute(args: DescribeArgs, config: Config) -> anyhow::Result<()> {
    let request = args.request()?;
    let pretty = args.pretty || config.output.pretty;
    let service = build_service(&args.engine, config);

    let response = service.describe(request).await.map_err(engine_failure)?;
    tracing::debug!(
        "Described from {:?} in {:.3}ms",
        response.used_predictions,
        response.processing_time * 1000.0
    );
    print_response(&response, pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(labels: Vec<Label>, input: Option<PathBuf>) -> DescribeArgs {
        DescribeArgs {
            labels,
            input,
            pretty: false,
            engine: EngineArgs::default(),
        }
    }

    #[test]
    fn test_request_from_labels() {
        let request = args(vec![Label::new("cat", 0.9)], None).request().unwrap();
        assert_eq!(request.predictions.len(), 1);
    }

    #[test]
    fn test_request_requires_labels() {
        let err = args(vec![], None).request().unwrap_err();
        assert!(err.to_string().contains("No labels"));
    }

    #[test]
    fn test_request_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"predictions":[{{"className":"laptop","probability":0.9}},{{"className":"desk","probability":0.3}}]}}"#
        )
        .unwrap();

        let request = args(vec![], Some(file.path().to_path_buf()))
            .request()
            .unwrap();
        assert_eq!(request.predictions[0].class_name, "laptop");
        assert_eq!(request.predictions[1].class_name, "desk");
    }

    #[test]
    fn test_request_from_bad_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = args(vec![], Some(file.path().to_path_buf()))
            .request()
            .unwrap_err();
        assert!(err.to_string().contains("Invalid request"));
    }
}
