use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use tokio::signal;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{Level, event};
use tracing_appender::rolling;
use uuid::Uuid;

use crate::core::common::{LoggingOptions, LookupOptions, OutputFormat, ResolverKind};
use crate::core::config::Config;
use crate::core::konst::{APP_NAME, CLI_HEADER_MSG, CONFIG_FILE, LOG_ENV_VAR, RANDOM_IP_COUNT};
use crate::lookup::dispatch::Dispatcher;
use crate::lookup::resolver::build_resolver;
use crate::lookup::{BatchReport, run_batch};
use crate::util::handler::{outcome_handler, status_handler, unsupported_handler};
use crate::util::input::{random_ips, read_tokens};
use crate::util::message::{batch_header_msg, outcome_table_msg, result_map_json, summary_msg};
use crate::util::time::{format_elapsed, time_now_utc};

#[derive(Debug, Subcommand, PartialEq, Clone)]
pub enum ConfigCommand {
    /// Create configuration
    Create {
        /// Config filename.
        /// Search Path: $CWD/rdns.toml
        #[clap(short, long, default_value = CONFIG_FILE)]
        file: String,

        /// Warning: Overwrites existing file if found in path.
        #[clap(long, default_value_t = false)]
        force: bool,
    },
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum Command {
    /// Generate a configuration
    Config {
        #[clap(subcommand)]
        command: ConfigCommand,
    },

    /// Reverse DNS lookups for a batch of IP addresses
    #[command(after_help = format_examples(&[
        "rdns lookup 8.8.8.8 1.1.1.1        # Lookup addresses",
        "rdns lookup -f inventory.txt -w 8  # One address per line, 8 workers",
        "rdns lookup -r 100 -o table        # 100 random addresses",
    ]))]
    Lookup {
        /// Addresses to lookup
        #[clap(display_order = 1)]
        addresses: Vec<String>,

        /// Input file, one address per line
        #[clap(short, long, display_order = 2)]
        file: Option<String>,

        /// Lookup this many random addresses.
        /// Used when no addresses or file are given.
        #[clap(short, long, display_order = 3)]
        random: Option<usize>,

        /// Output format
        #[clap(short, long, default_value_t = OutputFormat::default(), display_order = 50)]
        output: OutputFormat,

        #[clap(flatten)]
        shared_options: SharedOptions,
    },
}

#[derive(Clone, Debug, Args, PartialEq)]
pub struct SharedOptions {
    /// Concurrent lookups (0 == available processing units) [default: 0]
    #[clap(short = 'w', long, display_order = 120)]
    pub parallelism: Option<usize>,

    /// Lookup timeout (in milliseconds) [default: 3000]
    #[clap(short, long, display_order = 121)]
    pub timeout: Option<u64>,

    /// Resolver backend [default: system]
    #[clap(short = 'R', long, display_order = 122)]
    pub resolver: Option<ResolverKind>,

    /// Nameserver for the hickory resolver (ip or ip:port)
    #[clap(short, long, display_order = 123)]
    pub nameserver: Option<String>,

    /// Config filename.
    /// Search Path: $CWD/rdns.toml
    #[clap(short, long, default_value = CONFIG_FILE, display_order = 129)]
    pub config: String,

    // Logging options
    // --------------
    /// Logging directory [default: .]
    #[clap(long, display_order = 320)]
    pub dir: Option<String>,

    /// Logging filename [default: rdns.log]
    #[clap(long, display_order = 321)]
    pub logfile: Option<String>,

    /// Log to file in JSON format
    #[clap(long, default_value_t = false, display_order = 322)]
    pub json: bool,

    /// Silence terminal output other than the result
    #[clap(long, default_value_t = false, display_order = 324)]
    pub quiet: bool,
}
impl Default for SharedOptions {
    fn default() -> Self {
        Self {
            parallelism: None,
            timeout: None,
            resolver: None,
            nameserver: None,
            config: CONFIG_FILE.to_owned(),
            dir: None,
            logfile: None,
            json: false,
            quiet: false,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "rdns")]
#[command(bin_name = "rdns")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "rdns - Concurrent batch reverse DNS lookups", long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    command: Command,
}

impl Cli {
    pub fn init() -> Cli {
        Cli::parse()
    }

    pub async fn run(self) -> Result<()> {
        let (addresses, file, random, output, shared_options) = match self.command {
            Command::Config { command } => {
                match command {
                    ConfigCommand::Create { file, force } => {
                        Config::generate(&file, force)?;
                    }
                }
                return Ok(());
            }
            Command::Lookup {
                addresses,
                file,
                random,
                output,
                shared_options,
            } => (addresses, file, random, output, shared_options),
        };

        // A malformed config file is an error, only a missing one falls back to defaults.
        let (config, config_msg) = match Config::load_if_present(&shared_options.config)? {
            Some(config) => (config, format!("Using configuration file `{}`.\n", shared_options.config)),
            None => (
                Config::default(),
                format!(
                    "Configuration file `{}` not found. Using default configuration.\n",
                    shared_options.config
                ),
            ),
        };

        let (lookup_options, logging_options) = merge_options(&shared_options, config);

        let mut stderr = std::io::stderr();
        status_handler(&mut stderr, CLI_HEADER_MSG, &logging_options)?;
        status_handler(&mut stderr, &config_msg, &logging_options)?;

        let file_appender = rolling::never(&logging_options.dir, &logging_options.file);
        let (logfile, _guard) = tracing_appender::non_blocking(file_appender);

        let tracer = tracing_subscriber::fmt()
            .with_env_filter(std::env::var(LOG_ENV_VAR).unwrap_or_else(|_| format!("{APP_NAME}=info")))
            .with_writer(logfile)
            .with_ansi(false)
            .with_target(true);

        if logging_options.json {
            tracer.json().init()
        } else {
            tracer.init()
        }

        // region:    ===== validators ===== //

        if lookup_options.timeout == 0 {
            bail!("Lookup timeout must be greater than 0 milliseconds");
        }

        // endregion: ===== validators ===== //

        let tokens = match (file, random) {
            (Some(_), Some(_)) => bail!("`--file` and `--random` can not be used together"),
            (Some(file), None) => [addresses, read_tokens(&file)?].concat(),
            (None, Some(count)) => [addresses, random_ips(count)].concat(),
            (None, None) if addresses.is_empty() => random_ips(RANDOM_IP_COUNT),
            (None, None) => addresses,
        };

        let resolver = build_resolver(&lookup_options)?;
        let timeout = Duration::from_millis(lookup_options.timeout);

        // Ctrl-C cancels the remaining lookups. The batch still completes
        // and reports what resolved so far.
        let cancel = CancellationToken::new();
        let c = cancel.clone();
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                c.cancel();
            }
        });

        let dispatcher = Dispatcher::new(resolver, lookup_options.workers(), timeout).with_cancellation(cancel);

        let batch_id = Uuid::new_v4();
        event!(
            target: APP_NAME,
            Level::INFO,
            batch_id = %batch_id,
            started = %time_now_utc(),
            "starting batch of {} tokens",
            tokens.len()
        );
        let resolver_name = lookup_options.resolver.to_string();
        let header = batch_header_msg(tokens.len(), dispatcher.parallelism(), lookup_options.timeout, &resolver_name);
        status_handler(&mut stderr, &format!("{header}\n"), &logging_options)?;

        let start = Instant::now();
        let report = run_batch(tokens, &dispatcher).await;
        let elapsed = format_elapsed(start.elapsed());

        print_report(&report, output, &logging_options)?;

        let resolved = report.map.len();
        let failed = report.outcomes.iter().filter(|o| !o.is_resolved()).count();
        event!(
            target: APP_NAME,
            Level::INFO,
            batch_id = %batch_id,
            resolved,
            failed,
            unsupported = report.unsupported.len(),
            "batch finished in {elapsed} seconds"
        );
        let summary = summary_msg(resolved, failed, report.unsupported.len(), &elapsed);
        status_handler(&mut stderr, &format!("\n{summary}"), &logging_options)?;

        Ok(())
    }
}

/// CLI options override config file options.
/// An option given on the command line wins, even when it matches the
/// default. Otherwise the config file option is used.
fn merge_options(shared_options: &SharedOptions, config: Config) -> (LookupOptions, LoggingOptions) {
    let SharedOptions {
        parallelism,
        timeout,
        resolver,
        nameserver,
        dir,
        logfile,
        json,
        quiet,
        ..
    } = shared_options.clone();

    let lookup_options = LookupOptions {
        parallelism: parallelism.unwrap_or(config.lookup_options.parallelism),
        timeout: timeout.unwrap_or(config.lookup_options.timeout),
        resolver: resolver.unwrap_or(config.lookup_options.resolver),
        nameserver: nameserver.or(config.lookup_options.nameserver),
    };

    // Flags can only switch these on.
    let logging_options = LoggingOptions {
        dir: dir.unwrap_or(config.logging_options.dir),
        file: logfile.unwrap_or(config.logging_options.file),
        json: json || config.logging_options.json,
        quiet: quiet || config.logging_options.quiet,
    };

    (lookup_options, logging_options)
}

fn print_report(report: &BatchReport, output: OutputFormat, logging_options: &LoggingOptions) -> Result<()> {
    for token in &report.unsupported {
        unsupported_handler(token, logging_options);
    }

    match output {
        OutputFormat::Json => {
            for outcome in &report.outcomes {
                outcome_handler(outcome, logging_options);
            }
            println!("{}", result_map_json(&report.map)?);
        }
        OutputFormat::Table => println!("{}", outcome_table_msg(&report.outcomes)),
    }

    Ok(())
}

/// Format example commands
fn format_examples(examples: &[&str]) -> String {
    let mut result = String::from("\x1B[1;4mExamples:\x1B[0m\n");
    for example in examples {
        result.push_str(&format!("  {}\n", example));
    }
    // Forces visible blank new line.
    // Otherwise, clap strips out raw trailing whitespace.
    result.push_str("\x1B[0m\n");
    result
}
