mod trace;

use std::fmt;
use std::sync::Arc;

use scorm_bridge::{
    BridgeConfig, ContentSource, HostCallbacks, HttpProgressSink, InMemoryRegistry, ScormPlayer,
    TrackingConfig,
};
use scorm_core::model::ContentId;
use tracking::{InMemoryProgressSink, ProgressSink};

use crate::trace::TraceStep;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingTrace,
    UnknownArg(String),
    InvalidContentId { raw: String },
    NoTrackingService,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingTrace => write!(f, "--trace is required"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidContentId { raw } => write!(f, "invalid --content-id value: {raw}"),
            ArgsError::NoTrackingService => write!(
                f,
                "SCORM_TRACKING_BASE_URL is not set to a valid URL (pass --dry-run to skip syncing)"
            ),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  scorm-player --trace <file> [--url <content_url>] [--content-id <id>] [--dry-run]");
    eprintln!();
    eprintln!("Replays a SCORM call trace against a mounted runtime bridge.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SCORM_CONTENT_URL, SCORM_CONTENT_ID");
    eprintln!("  SCORM_TRACKING_BASE_URL, SCORM_TRACKING_TOKEN");
    eprintln!("  SCORM_SYNC_DEBOUNCE_MS, SCORM_PROXY_PREFIX, RUST_LOG");
}

struct Args {
    trace: String,
    content_url: String,
    content_id: ContentId,
    dry_run: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut content_url = std::env::var("SCORM_CONTENT_URL").unwrap_or_default();
        let mut content_id = std::env::var("SCORM_CONTENT_ID")
            .ok()
            .and_then(|value| value.parse::<ContentId>().ok())
            .unwrap_or_else(|| ContentId::new(1));
        let mut trace = None;
        let mut dry_run = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--trace" => trace = Some(require_value(args, "--trace")?),
                "--url" => content_url = require_value(args, "--url")?,
                "--content-id" => {
                    let value = require_value(args, "--content-id")?;
                    content_id = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidContentId { raw: value.clone() })?;
                }
                "--dry-run" => dry_run = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            trace: trace.ok_or(ArgsError::MissingTrace)?,
            content_url,
            content_id,
            dry_run,
        })
    }
}

/// Host that reports bridge notifications to the log.
struct LoggingHost;

impl HostCallbacks for LoggingHost {
    fn on_progress(&self, percent: u8) {
        tracing::info!(percent, "progress");
    }

    fn on_complete(&self) {
        tracing::info!("content complete");
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let steps = trace::parse(&std::fs::read_to_string(&args.trace)?)?;

    let recorder = InMemoryProgressSink::new();
    let sink: Arc<dyn ProgressSink> = if args.dry_run {
        Arc::new(recorder.clone())
    } else {
        let config = TrackingConfig::from_env().ok_or(ArgsError::NoTrackingService)?;
        Arc::new(HttpProgressSink::new(config))
    };

    let registry = InMemoryRegistry::new();
    let player = ScormPlayer::mount(
        &BridgeConfig::from_env(),
        ContentSource::scorm(args.content_id, args.content_url),
        Arc::new(LoggingHost),
        Arc::new(registry.clone()),
        sink,
    );
    if let Some(error) = player.error() {
        return Err(error.into());
    }
    println!("player url: {}", player.player_url().unwrap_or_default());

    for step in steps {
        match step {
            TraceStep::Wait(duration) => tokio::time::sleep(duration).await,
            TraceStep::Call { method, args } => {
                let target = TraceStep::target(&method);
                let result = match registry.lookup(target) {
                    Some(api) => {
                        let args: Vec<&str> = args.iter().map(String::as_str).collect();
                        api.invoke(&method, &args)
                    }
                    None => "false".to_string(),
                };
                println!("{method} -> {result:?}");
            }
        }
    }

    player.unmount().await;

    if args.dry_run {
        println!("progress writes: {}", recorder.write_count());
        if let Some(last) = recorder.last() {
            println!("{}", serde_json::to_string_pretty(&last.payload)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
