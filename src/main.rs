mod cli;
use cli::{parse_cli, run, USAGE};

fn main() -> anyhow::Result<()> {
    setup_logging();

    let cli_mode = match parse_cli() {
        Ok(mode) => mode,
        Err(err) => {
            eprintln!("Error: {}", err);
            println!("{USAGE}");
            return Ok(());
        }
    };

    run(cli_mode)
}

fn setup_logging() {
    let log_dir = dirs::config_dir()
        .map(|d| d.join("schoolcal"))
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, "schoolcal.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    std::mem::forget(_guard);

    tracing::info!("schoolcal started");
}
