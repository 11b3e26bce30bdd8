//! The `omni batch` command: many requests against one shared engine.
//!
//! Each non-empty input line is a tagged `describe` or `ask` request. Lines
//! run concurrently, bounded by a semaphore, and share the engine's answer
//! cache. Output keeps input order; a bad line yields an `error` record
//! instead of aborting the batch.

use clap::{Args, ValueEnum};
use omni_core::{BatchRequest, BatchResponse, Config, OutputFormat, OutputWriter, Service};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;

use super::{build_service, EngineArgs};

/// Batch output formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum BatchFormat {
    /// One JSON array
    Json,
    /// One JSON object per line
    Jsonl,
}

impl From<BatchFormat> for OutputFormat {
    fn from(format: BatchFormat) -> Self {
        match format {
            BatchFormat::Json => OutputFormat::Json,
            BatchFormat::Jsonl => OutputFormat::JsonLines,
        }
    }
}

/// Arguments for the `batch` command.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// JSONL file of requests
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (defaults to output.format from config)
    #[arg(short, long, value_enum)]
    pub format: Option<BatchFormat>,

    /// Maximum requests in flight (defaults to batch.parallel from config)
    #[arg(short, long)]
    pub parallel: Option<usize>,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Execute the batch command.
pub async fn execute(args: BatchArgs, config: Config) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(&args.input).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to read batch file {}: {e}\n\n  Hint: Check the file path and try again.",
            args.input.display()
        )
    })?;

    let parallel = args.parallel.unwrap_or(config.batch.parallel).max(1);
    let format = match args.format {
        Some(format) => format.into(),
        None => OutputFormat::parse(&config.output.format).unwrap_or(OutputFormat::JsonLines),
    };
    let pretty = config.output.pretty;
    let service = build_service(&args.engine, config);

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = OutputWriter::new(sink, format, pretty);

    let start = std::time::Instant::now();
    let summary = match format {
        OutputFormat::JsonLines => {
            run_batch(&service, &content, parallel, |response| {
                writer.write(&response)?;
                writer.flush()
            })
            .await?
        }
        // A JSON array can only be written once every line is in.
        OutputFormat::Json => {
            let mut responses = Vec::new();
            let summary = run_batch(&service, &content, parallel, |response| {
                responses.push(response);
                Ok(())
            })
            .await?;
            writer.write_all(&responses)?;
            summary
        }
    };
    writer.flush()?;

    tracing::info!(
        "Batch complete: {} succeeded, {} failed in {:.2}s ({} cached answers)",
        summary.succeeded,
        summary.failed,
        start.elapsed().as_secs_f64(),
        service.engine().cached_answers()
    );
    Ok(())
}

/// Per-batch outcome counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, response: &BatchResponse) {
        match response {
            BatchResponse::Error { .. } => self.failed += 1,
            _ => self.succeeded += 1,
        }
    }
}

enum BatchTask {
    Done(BatchResponse),
    Running(usize, JoinHandle<BatchResponse>),
}

/// Run every request line through `service`, handing each response to `emit`
/// in input order as soon as it and all earlier lines are done.
///
/// An `emit` failure stops the batch and is returned.
pub async fn run_batch<F>(
    service: &Service,
    content: &str,
    parallel: usize,
    mut emit: F,
) -> io::Result<BatchSummary>
where
    F: FnMut(BatchResponse) -> io::Result<()>,
{
    let requests: Vec<(usize, Result<BatchRequest, String>)> = content
        .lines()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(line, text)| {
            let parsed = serde_json::from_str(text).map_err(|e| {
                tracing::warn!("Skipping malformed batch line {line}: {e}");
                format!("Invalid request: {e}")
            });
            (line, parsed)
        })
        .collect();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let producer = {
        let service = service.clone();
        tokio::spawn(async move {
            let semaphore = Arc::new(Semaphore::new(parallel));
            for (line, parsed) in requests {
                let task = match parsed {
                    Err(message) => BatchTask::Done(BatchResponse::Error { line, message }),
                    Ok(request) => {
                        let Ok(permit) = semaphore.clone().acquire_owned().await else {
                            tracing::warn!("Batch semaphore closed unexpectedly, stopping batch");
                            break;
                        };
                        let service = service.clone();
                        BatchTask::Running(
                            line,
                            tokio::spawn(async move {
                                let response = service.handle(line, request).await;
                                drop(permit);
                                response
                            }),
                        )
                    }
                };
                if tx.send(task).is_err() {
                    break;
                }
            }
        })
    };

    let mut summary = BatchSummary::default();
    while let Some(task) = rx.recv().await {
        let response = match task {
            BatchTask::Done(response) => response,
            BatchTask::Running(line, handle) => match handle.await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!("Batch task for line {line} panicked: {e}");
                    BatchResponse::Error {
                        line,
                        message: format!("task failed: {e}"),
                    }
                }
            },
        };
        summary.record(&response);
        if let Err(e) = emit(response) {
            producer.abort();
            return Err(e);
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use omni_core::Engine;

    fn service() -> Service {
        let config = Config::default();
        Service::new(Arc::new(Engine::new(&config)), config.limits)
    }

    async fn collect(service: &Service, content: &str, parallel: usize) -> Vec<BatchResponse> {
        let mut responses = Vec::new();
        run_batch(service, content, parallel, |response| {
            responses.push(response);
            Ok(())
        })
        .await
        .unwrap();
        responses
    }

    const CAT_ASK: &str = r#"{"type":"ask","predictions":[{"className":"cat","probability":0.95},{"className":"furniture","probability":0.3}],"question":"What animal is in the image?"}"#;
    const LAPTOP_DESCRIBE: &str = r#"{"type":"describe","predictions":[{"className":"laptop","probability":0.9},{"className":"desk","probability":0.3}]}"#;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_batch_mixed_requests_keep_order() {
        let content = format!("{CAT_ASK}\n\n{LAPTOP_DESCRIBE}\nnot json\n{CAT_ASK}\n");
        let service = service();
        let responses = collect(&service, &content, 2).await;

        assert_eq!(responses.len(), 4);
        match &responses[0] {
            BatchResponse::Ask(r) => {
                assert_eq!(r.text, "The animal appears to be a cat.");
                assert!((r.confidence - 0.855).abs() < 1e-6);
            }
            other => panic!("Expected ask response, got {other:?}"),
        }
        match &responses[1] {
            BatchResponse::Describe(r) => {
                assert_eq!(r.used_predictions, vec!["laptop", "desk"]);
                assert!((r.confidence - 0.81).abs() < 1e-6);
            }
            other => panic!("Expected describe response, got {other:?}"),
        }
        match &responses[2] {
            BatchResponse::Error { line, message } => {
                assert_eq!(*line, 3);
                assert!(message.contains("Invalid request"));
            }
            other => panic!("Expected error record, got {other:?}"),
        }
        assert!(matches!(&responses[3], BatchResponse::Ask(_)));

        // Two identical asks share one cache entry.
        assert_eq!(service.engine().cached_answers(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_batch_validation_error_is_reported() {
        let content = r#"{"type":"ask","predictions":[{"className":"cat","probability":0.9}],"question":"?"}"#;
        let responses = collect(&service(), content, 4).await;

        assert_eq!(responses.len(), 1);
        match &responses[0] {
            BatchResponse::Error { line, message } => {
                assert_eq!(*line, 0);
                assert!(message.contains("at least 3 characters"));
            }
            other => panic!("Expected error record, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_batch_empty_input() {
        let responses = collect(&service(), "\n\n", 4).await;
        assert!(responses.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_batch_streams_jsonl_in_input_order() {
        let content = format!("{LAPTOP_DESCRIBE}\n{CAT_ASK}\nnot json\n{LAPTOP_DESCRIBE}\n");
        let mut writer = OutputWriter::new(Vec::new(), OutputFormat::JsonLines, false);
        let mut kinds = Vec::new();
        let mut seen = 0;

        let summary = run_batch(&service(), &content, 3, |response| {
            writer.write(&response)?;
            let value = serde_json::to_value(&response).map_err(io::Error::other)?;
            kinds.push(value["type"].as_str().unwrap_or_default().to_string());
            seen += 1;
            // Each response reaches the writer before the next one is emitted.
            assert_eq!(writer.items_written(), seen);
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(
            summary,
            BatchSummary {
                succeeded: 3,
                failed: 1
            }
        );
        assert_eq!(writer.items_written(), 4);
        assert_eq!(kinds, vec!["describe", "ask", "error", "describe"]);
    }

    #[tokio::test]
    async fn test_batch_stops_on_emit_failure() {
        let content = format!("{CAT_ASK}\n{CAT_ASK}\n{CAT_ASK}\n");
        let mut calls = 0;

        let err = run_batch(&service(), &content, 1, |_| {
            calls += 1;
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        })
        .await
        .unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(calls, 1);
    }
}
