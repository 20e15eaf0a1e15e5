mod platform;

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use engine_logging::LogDestination;
use log::LevelFilter;

use platform::settings::DEFAULT_SETTINGS_FILE;
use platform::Settings;

const LOG_FILE: &str = "qrforge.log";

/// Turn a URL, free text or a contact card into a QR code.
#[derive(Debug, Parser)]
#[command(name = "qrforge", version)]
struct Cli {
    /// Settings file (RON). Missing means defaults.
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,

    /// Directory downloads are written to; overrides the settings file.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    log: LogTarget,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    engine_logging::initialize(cli.log.into(), level, Path::new(LOG_FILE));

    let mut settings = Settings::load(&cli.config);
    if let Some(dir) = cli.output_dir {
        settings.output_dir = dir;
    }
    platform::run_app(settings)
}
