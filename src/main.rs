use anyhow::Result;
use clap::Parser;
use podium::{DeviceLoop, PodiumConfig, ShutdownReason};
use std::path::Path;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Parser, Debug)]
#[command(name = "podium")]
#[command(about = "Presentation coach that drives feedback indicators from remote classifiers")]
#[command(version)]
#[command(long_about = "Polls the presentation status service and, while a session is \
recording, captures the speaker, uploads the frame, queries the expression, eye-contact and \
gesture classifiers, lights the matching feedback indicators and submits a report row per cycle.")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "podium.toml", help = "Path to TOML configuration file")]
    config: String,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit without starting the loop")]
    validate_config: bool,

    /// Print effective configuration and exit
    #[arg(long, help = "Print the effective configuration in TOML format and exit")]
    print_config: bool,

    /// Run a single poll cycle and exit
    #[arg(long, help = "Run one poll cycle, clear the indicators and exit")]
    once: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,

    /// Also write logs to a daily-rotated file
    #[arg(long, value_name = "PATH", help = "Append logs to PATH, rotated daily")]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = PodiumConfig::load_from_file(&args.config)?;

    if args.print_config {
        println!("# Podium configuration ({})", args.config);
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    let _log_guard = init_logging(&args)?;

    info!("Starting podium v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        if args.validate_config {
            eprintln!("✗ Configuration validation failed: {}", e);
            std::process::exit(1);
        }
        return Err(e.into());
    }

    if args.validate_config {
        info!("Configuration validation successful");
        println!("✓ Configuration is valid");
        return Ok(());
    }

    let mut device = DeviceLoop::from_config(&config).map_err(|e| {
        error!("Failed to initialize device loop: {}", e);
        e
    })?;

    let reason = if args.once {
        device.run_once().await
    } else {
        device.run_until_signal().await
    };

    match reason {
        ShutdownReason::Signal(signal) => info!("Podium stopped by {}", signal),
        other => info!("Podium stopped: {:?}", other),
    }

    Ok(())
}

fn init_logging(args: &Args) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("podium={}", log_level)));

    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(args.debug)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer()
                .with_target(true)
                .with_thread_ids(args.debug)
                .with_file(args.debug)
                .with_line_number(args.debug)
                .boxed()
        }
    };

    let (file_layer, guard) = match args.log_file.as_deref() {
        Some(path) => {
            let path = Path::new(path);
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("Log file path has no file name: {}", path.display()))?;

            let appender = tracing_appender::rolling::daily(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(file_layer)
        .with(env_filter)
        .init();

    Ok(guard)
}
