use anyhow::Result;
use clap::Parser;
use motion_vision::config::DisplayMode;
use motion_vision::{MotionLoop, MotionVisionConfig, StopReason};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "motion-vision")]
#[command(about = "Motion-gated camera feed analysis with a rate-limited vision API")]
#[command(version)]
#[command(long_about = "Watches a camera feed or stream, detects motion by frame differencing, \
saves a snapshot for each motion event and sends it to a vision API, respecting separate \
motion and API cooldowns.")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "motion-vision.toml", help = "Path to TOML configuration file")]
    config: String,

    /// Override the configured source
    #[arg(short, long, value_name = "URL", help = "Stream URL or device index to read from")]
    source: Option<String>,

    /// Run without the terminal view
    #[arg(long, help = "Disable raw-mode terminal input; stop with Ctrl-C or SIGTERM")]
    headless: bool,

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
    #[arg(long, help = "Validate configuration file and exit without opening the source")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in TOML format and exit")]
    print_config: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print_default_config()?;
        return Ok(());
    }

    init_logging(&args);

    info!("Starting motion-vision v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    let mut config = match MotionVisionConfig::load_from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Some(source) = args.source {
        config.source.url = source;
    }
    if args.headless {
        config.display.mode = DisplayMode::Headless;
    }

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        eprintln!("✗ Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    if args.validate_config {
        info!("Configuration validation successful");
        println!("✓ Configuration is valid");
        return Ok(());
    }

    let mut motion_loop = MotionLoop::from_config(&config).await.map_err(|e| {
        error!("Failed to start: {}", e);
        e
    })?;

    let reason = motion_loop.run().await;
    match &reason {
        StopReason::CaptureFailure(details) => error!("Loop stopped on capture failure: {}", details),
        other => info!("Loop stopped: {}", other),
    }

    Ok(())
}

fn init_logging(args: &Args) {
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
        .unwrap_or_else(|_| EnvFilter::new(format!("motion_vision={}", log_level)));

    // stdout belongs to the console report
    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .boxed()
        }
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();
}

/// Print default configuration in TOML format
fn print_default_config() -> Result<()> {
    println!("# motion-vision configuration file");
    println!("# Every key may also be set from the environment, e.g.");
    println!("# MOTION_VISION_ANALYSIS__API_KEY=... or MOTION_VISION_TIMING__SAMPLE_RATE=3");
    println!();
    println!("{}", toml::to_string_pretty(&MotionVisionConfig::default())?);
    Ok(())
}
