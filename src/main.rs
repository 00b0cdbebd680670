use std::fs::{self, File};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, error, info, warn};
use simplelog::{ConfigBuilder, WriteLogger};

use schat::core::config::{self, ConfigError, ResolvedConfig};
use schat::core::state::App;
use schat::inference::{Provider, ProviderRegistry};
use schat::theme::Palette;
use schat::tui;

#[derive(Parser)]
#[command(name = "schat", version, about = "Chat with command-line AI tools from your terminal")]
struct Args {
    /// Provider to send prompts to (e.g. opencode-cli, cursor)
    #[arg(short, long)]
    provider: Option<String>,

    /// Color theme for rendered replies: dark, light or notty
    #[arg(short, long)]
    theme: Option<String>,

    /// Print the available providers and exit
    #[arg(long)]
    list_providers: bool,

    /// Write the log here instead of ~/.schat/schat.log
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    init_logging(&args);

    let resolved = match load_settings(&args) {
        Ok(resolved) => resolved,
        Err(e) => return startup_failed(e),
    };
    log::set_max_level(resolved.log_level);

    if args.list_providers {
        return match config::build_registry(&resolved.providers) {
            Ok(registry) => {
                print_providers(&registry);
                ExitCode::SUCCESS
            }
            Err(e) => startup_failed(e),
        };
    }

    let (chat, registry) = match config::build_session(&resolved) {
        Ok(session) => session,
        Err(e) => return startup_failed(e),
    };

    if Palette::for_theme(&chat.theme).is_none() {
        warn!(
            "Unknown theme '{}'; replies will show a render error (expected one of: {})",
            chat.theme,
            Palette::names().join(", ")
        );
    }
    info!(
        "schat starting up with provider '{}' and theme '{}'",
        chat.provider, chat.theme
    );

    match tui::run(App::new(chat), registry) {
        Ok(()) => {
            info!("schat exited normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Terminal error: {}", e);
            eprintln!("schat: terminal error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Config problems are fatal and reported before the terminal is touched.
fn startup_failed(e: ConfigError) -> ExitCode {
    error!("Startup failed: {}", e);
    eprintln!("{e}");
    ExitCode::from(1)
}

fn load_settings(args: &Args) -> Result<ResolvedConfig, ConfigError> {
    let file = config::load_config()?;
    Ok(config::resolve(
        &file,
        args.provider.as_deref(),
        args.theme.as_deref(),
    ))
}

/// Logs go to a file: the terminal belongs to the TUI.
///
/// Starts before config is read so config loading can log too. The writer
/// accepts everything; `log::set_max_level` narrows it once the configured
/// level is known.
fn init_logging(args: &Args) {
    let path = match args.log_file.clone() {
        Some(path) => path,
        None => match config::schat_dir() {
            Some(dir) => {
                if let Err(e) = fs::create_dir_all(&dir) {
                    eprintln!("schat: cannot create {}: {e}", dir.display());
                    return;
                }
                dir.join("schat.log")
            }
            None => return,
        },
    };

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    match File::create(&path) {
        Ok(file) => {
            if WriteLogger::init(LevelFilter::Trace, log_config, file).is_ok() {
                log::set_max_level(config::DEFAULT_LOG_LEVEL);
            }
        }
        Err(e) => eprintln!("schat: cannot open log file {}: {e}", path.display()),
    }
}

fn print_providers(registry: &ProviderRegistry) {
    for provider in registry.iter() {
        println!("{:<14} {}", provider.name(), provider.describe());
    }
}
