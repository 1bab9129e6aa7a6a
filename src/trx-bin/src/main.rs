// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn, Level as TracingLevel};
use tracing_subscriber::FmtSubscriber;

mod demo;

use trx_core::DynResult;
use trx_decoder_util::{
    BitBuffer, DataSink, DecoderConfig, DeviceRegistry, JsonLinesSink, Level, LogSink,
    TracingLogSink,
};

const PKG_DESCRIPTION: &str = concat!(env!("CARGO_PKG_NAME"), " - ", env!("CARGO_PKG_DESCRIPTION"));

#[derive(Debug, Parser)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = PKG_DESCRIPTION
)]
struct Cli {
    /// Config file with a [trx-decoder] section
    /// (default: ./trx-rs.toml, then XDG config, then /etc/trx-rs)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,
    /// Default decoder verbosity (fatal, critical, error, warning, notice,
    /// info, debug, trace or 1-8)
    #[arg(short = 'v', long = "verbosity")]
    verbosity: Option<Level>,
    /// Write decoder log events as JSON lines next to the decoded records
    #[arg(long = "json-log")]
    json_log: bool,
    /// Bit row codes, e.g. "{24}2a5a84" or "{8}ff/{4}a"
    #[arg(value_name = "CODE", required = true)]
    codes: Vec<String>,
}

/// Initialize logging with optional level from config.
/// Falls back to INFO if level is None or invalid.
fn init_logging(log_level: Option<&str>) {
    let level = log_level
        .and_then(|s| s.parse::<TracingLevel>().ok())
        .unwrap_or(TracingLevel::INFO);

    FmtSubscriber::builder()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn load_config(cli: &Cli) -> DynResult<(DecoderConfig, Option<PathBuf>)> {
    let (mut config, path) = match &cli.config {
        Some(path) => (DecoderConfig::load_from_file(path)?, Some(path.clone())),
        None => DecoderConfig::load_from_default_paths()?,
    };
    if let Some(verbosity) = cli.verbosity {
        config.verbosity = verbosity;
    }
    if cli.json_log {
        config.json_output = true;
    }
    Ok((config, path))
}

fn main() -> DynResult<()> {
    let cli = Cli::parse();
    let (config, config_path) = load_config(&cli)?;
    init_logging(config.log_level.as_deref());

    match &config_path {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    let json = Arc::new(JsonLinesSink::new(std::io::stdout()));
    let data_sink: Arc<dyn DataSink> = json.clone();
    let log_sink: Arc<dyn LogSink> = if config.json_output {
        json
    } else {
        Arc::new(TracingLogSink)
    };

    let mut registry = DeviceRegistry::new(config, data_sink, log_sink);
    let mut decoders = Vec::new();
    for (template, decode) in demo::protocols() {
        let device = registry.register(&template)?;
        decoders.push((device.protocol_num(), decode));
    }

    let mut total = 0;
    for code in &cli.codes {
        let bitbuffer = match BitBuffer::parse(code) {
            Ok(bitbuffer) => bitbuffer,
            Err(e) => {
                warn!("Skipping code '{}': {}", code, e);
                continue;
            }
        };
        for (protocol_num, decode) in &decoders {
            let Some(device) = registry.get(*protocol_num) else {
                continue;
            };
            if device.is_disabled() {
                continue;
            }
            total += decode(device, &bitbuffer);
        }
    }

    info!("Decoded {} record(s) from {} code(s)", total, cli.codes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_codes_and_levels() {
        let cli = Cli::try_parse_from(["trx-decode", "-v", "debug", "--json-log", "{24}2a5a84", "ff"])
            .unwrap();
        assert_eq!(cli.verbosity, Some(Level::Debug));
        assert!(cli.json_log);
        assert_eq!(cli.codes, ["{24}2a5a84", "ff"]);
    }

    #[test]
    fn cli_rejects_unknown_level() {
        assert!(Cli::try_parse_from(["trx-decode", "-v", "loud", "ff"]).is_err());
    }

    #[test]
    fn cli_requires_a_code() {
        assert!(Cli::try_parse_from(["trx-decode"]).is_err());
    }

    #[test]
    fn cli_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trx-rs.toml");
        std::fs::write(&path, "[trx-decoder]\nverbosity = \"error\"\n").unwrap();
        let cli = Cli::try_parse_from([
            "trx-decode",
            "-c",
            path.to_str().unwrap(),
            "-v",
            "trace",
            "ff",
        ])
        .unwrap();
        let (config, found) = load_config(&cli).unwrap();
        assert_eq!(config.verbosity, Level::Trace);
        assert_eq!(found.as_deref(), Some(path.as_path()));
    }
}
