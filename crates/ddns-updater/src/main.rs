// # ddns-updater - one-shot DDNS updater
//
// Points Cloudflare A records at the machine's current public IPv4 address.
// Each invocation makes a single pass over the records listed in a JSON file
// and exits; run it from cron or a systemd timer for periodic updates.
//
// This binary is a THIN integration layer: it parses the command line,
// builds the logger, IP source and provider, and hands the records to
// `ddns_core::Reconciler`.
//
// ## Usage
//
// ```bash
// ddns-updater \
//     --auth_email you@example.com \
//     --auth_key 0123456789abcdef \
//     --zone_identifier 023e105f4ecef8ad9ca31a8372d0c353 \
//     --json_file records.json
// ```
//
// with `records.json`:
//
// ```json
// [{ "record": "home.example.com", "proxy": true }]
// ```

use anyhow::{Context, Result};
use clap::Parser;
use ddns_core::config::DEFAULT_AUTH_METHOD;
use ddns_core::{Credentials, RecordSpec, ReconcileOutcome, Reconciler};
use ddns_ip_http::{DEFAULT_FALLBACK_URL, DEFAULT_PRIMARY_URL, HttpIpSource};
use ddns_provider_cloudflare::CloudflareProvider;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, debug, error};
use tracing_subscriber::fmt::MakeWriter;

/// Exit codes for different termination scenarios
///
/// - 0: Run completed (per-record failures are only logged)
/// - 1: Configuration or input error, no request was sent
/// - 2: Run aborted (IP lookup exhausted, runtime failure)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    Completed = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Update Cloudflare DNS A records to the current public IP
#[derive(Parser)]
#[command(name = "ddns-updater", version, about)]
struct Args {
    /// Authentication email
    #[arg(long = "auth_email", visible_alias = "auth-email")]
    auth_email: String,

    /// Authentication key (global API key)
    #[arg(long = "auth_key", visible_alias = "auth-key")]
    auth_key: String,

    /// Zone identifier
    #[arg(long = "zone_identifier", visible_alias = "zone-identifier")]
    zone_identifier: String,

    /// Authentication method; accepted for compatibility, has no effect
    #[arg(long = "auth_method", visible_alias = "auth-method", default_value = DEFAULT_AUTH_METHOD)]
    auth_method: String,

    /// Path to JSON file listing the records to manage
    #[arg(long = "json_file", visible_alias = "json-file")]
    json_file: PathBuf,

    /// Look up records but do not update them
    #[arg(long = "dry_run", visible_alias = "dry-run")]
    dry_run: bool,

    /// Per-request HTTP timeout in seconds (default: none)
    #[arg(
        long = "timeout_secs",
        visible_alias = "timeout-secs",
        value_parser = clap::value_parser!(u64).range(1..=3600)
    )]
    timeout_secs: Option<u64>,

    /// Log level: trace, debug, info, warn or error
    #[arg(
        long = "log_level",
        visible_alias = "log-level",
        default_value = "info",
        value_parser = parse_level
    )]
    log_level: Level,
}

impl Args {
    fn credentials(&self) -> Credentials {
        Credentials::new(&self.auth_email, &self.auth_key, &self.zone_identifier)
            .with_auth_method(&self.auth_method)
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn parse_level(s: &str) -> std::result::Result<Level, String> {
    match s.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(format!(
            "'{}' is not valid. Valid levels: trace, debug, info, warn, error",
            s
        )),
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                DdnsExitCode::ConfigError.into()
            } else {
                DdnsExitCode::Completed.into()
            };
        }
    };

    // Logger is scoped to this thread for the lifetime of main; nothing is
    // installed process-wide
    let subscriber = build_subscriber(
        args.log_level,
        std::io::stdout().is_terminal(),
        std::io::stdout,
    );
    let _log_guard = tracing::subscriber::set_default(subscriber);

    let credentials = args.credentials();
    if let Err(e) = credentials.validate() {
        error!("{}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let records = match load_or_exit(&args.json_file) {
        Ok(records) => records,
        Err(code) => return code.into(),
    };

    match run(&args, credentials, &records) {
        Ok(outcomes) => {
            let failed = outcomes.iter().filter(|o| o.is_failure()).count();
            let updated = outcomes.iter().filter(|o| o.issued_update()).count();
            debug!(
                "Run finished: {} record(s), {} update request(s), {} failure(s)",
                outcomes.len(),
                updated,
                failed
            );
            DdnsExitCode::Completed.into()
        }
        Err(e) => {
            error!("DDNS Updater: Run aborted: {:#}", e);
            DdnsExitCode::RuntimeError.into()
        }
    }
}

/// Plain-text log lines: level and message only
///
/// Colour is only worth emitting when a person is watching; under cron or a
/// timer the output ends up in a mail or the journal.
fn build_subscriber<W>(
    level: Level,
    ansi: bool,
    writer: W,
) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_ansi(ansi)
        .with_writer(writer)
        .finish()
}

/// Load the record list, mapping any failure to the config exit code
///
/// Runs before any HTTP client exists, so a bad file never causes a request.
fn load_or_exit(path: &Path) -> std::result::Result<Vec<RecordSpec>, DdnsExitCode> {
    ddns_core::load_records(path).map_err(|e| {
        error!("Error on decoding the file provided.");
        error!("{}", e);
        DdnsExitCode::ConfigError
    })
}

/// Build the components and reconcile every record on a single thread
fn run(
    args: &Args,
    credentials: Credentials,
    records: &[RecordSpec],
) -> Result<Vec<ReconcileOutcome>> {
    let reconciler = build_reconciler(args, credentials)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let outcomes = rt.block_on(reconciler.run(records))?;
    Ok(outcomes)
}

fn build_reconciler(args: &Args, credentials: Credentials) -> Result<Reconciler> {
    debug!("Configuration loaded: {:?}", credentials);

    let ip_source = HttpIpSource::with_urls(DEFAULT_PRIMARY_URL, DEFAULT_FALLBACK_URL, args.timeout())
        .context("Failed to set up the IP source")?;
    let provider = CloudflareProvider::new(credentials, args.timeout())
        .context("Failed to set up the Cloudflare provider")?;

    Ok(Reconciler::new(Box::new(ip_source), Box::new(provider)).with_dry_run(args.dry_run))
}
