// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use tracing_subscriber::EnvFilter;

use dvlcodec::{DecodeStrategy, Decoded, DecoderBuilder, DecoderConfig};

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `warn`, or `debug` with `--verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Format a duration to a human-readable string.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs >= 3600 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{secs}.{millis:03}s")
    } else {
        format!("{millis}ms")
    }
}

/// Format epoch seconds as a UTC timestamp with hundredths.
pub fn format_timestamp(epoch: f64) -> String {
    if !epoch.is_finite() {
        return "-".to_string();
    }
    let secs = epoch.floor();
    let hundredths = ((epoch - secs) * 100.0).round().min(99.0) as u32;
    match chrono::DateTime::<chrono::Utc>::from_timestamp(secs as i64, 0) {
        Some(dt) => format!("{}.{hundredths:02} UTC", dt.format("%Y-%m-%d %H:%M:%S")),
        None => format!("{epoch} s"),
    }
}

/// Spinner shown on stderr while a decode runs, hidden when not a terminal.
pub struct Spinner {
    inner: Option<indicatif::ProgressBar>,
}

impl Spinner {
    pub fn new(message: impl Into<String>) -> Self {
        let inner = std::io::stderr().is_terminal().then(|| {
            let pb = indicatif::ProgressBar::new_spinner();
            if let Ok(style) =
                indicatif::ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            {
                pb.set_style(style);
            }
            pb.set_message(message.into());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        Self { inner }
    }

    /// Clear the spinner and leave a final message.
    pub fn finish_with_message(&self, msg: String) {
        if let Some(pb) = &self.inner {
            pb.finish_with_message(msg);
        }
    }
}

/// Decoder options shared by the commands that decode a file.
#[derive(Args, Clone, Debug, Default)]
pub struct DecodeArgs {
    /// Decoder config file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Decode strategy: auto, sequential or parallel
    #[arg(long)]
    pub strategy: Option<DecodeStrategy>,

    /// Worker threads for parallel decoding
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Accept fixed leaders with unsupported constant fields
    #[arg(long)]
    pub lenient: bool,
}

impl DecodeArgs {
    /// Merge the config file with command-line overrides.
    pub fn builder(&self) -> Result<DecoderBuilder> {
        let config = match &self.config {
            Some(path) => DecoderConfig::from_file(path)?,
            None => DecoderConfig::default(),
        };
        let mut builder = DecoderBuilder::from_config(config);
        if let Some(strategy) = self.strategy {
            builder = builder.strategy(strategy);
        }
        if let Some(threads) = self.threads {
            builder = builder.num_threads(threads);
        }
        if self.lenient {
            builder = builder.strict_constants(false);
        }
        Ok(builder)
    }
}

/// Decode a file behind a spinner.
pub fn decode_file(path: &Path, args: &DecodeArgs) -> Result<Decoded> {
    let reader = args.builder()?.build()?;
    let spinner = Spinner::new(format!("decoding {}", path.display()));
    let decoded = reader.decode_file(path)?;
    spinner.finish_with_message(format!(
        "{} ensembles in {}",
        decoded.report.accepted,
        format_duration(decoded.report.elapsed)
    ));
    Ok(decoded)
}
