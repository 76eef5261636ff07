use clap::Parser;
use parley::LogLevel;
use parley::core::config;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "parley", about = "Tabbed instant-messaging window for the terminal")]
struct Args {
    /// Display name for the local user (overrides config and PARLEY_NICKNAME)
    #[arg(short, long)]
    nickname: Option<String>,

    /// Config file to read instead of ~/.parley/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbosity of parley.log
    #[arg(long, default_value_t, value_enum)]
    log_level: LogLevel,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Log to parley.log in the current directory; the terminal belongs to the UI
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("parley.log") {
        let _ = WriteLogger::init(args.log_level.into(), log_config, log_file);
    }

    log::info!("Parley starting up");

    let file_config = config::load_config(args.config.as_deref())
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let resolved = config::resolve(&file_config, args.nickname.as_deref());
    log::info!(
        "Signed in as {} ({})",
        resolved.me.display_name,
        resolved.me.account
    );

    parley::tui::run(resolved)
}
