use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{error, info};

use output_form::{
    cli::Cli,
    config::Config,
    errors::FormError,
    form::FormState,
    models::{FieldValues, OutputSubmission},
    submit::LogSubmitter,
    tui::App,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "output_form=info");
    }

    let config = Config::from_env()?;
    config.validate()?;
    init_logging(&config, !cli.cli);

    info!(
        mode = config.validation_mode.as_str(),
        log_file = config.log_file_str(),
        "Starting output form"
    );

    let values = cli.field_values();
    if cli.cli {
        return run_headless(values, &config).await;
    }

    // Setup terminal for TUI mode
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, Box::new(LogSubmitter::new())).with_defaults(values);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match result {
        Ok(_) => {
            info!("Output form exited successfully");
            if let Some(record) = app.submitted {
                print_record(&record)?;
            }
        }
        Err(e) => {
            error!("Output form encountered an error: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

/// TUI mode logs to the file only so the display is not disturbed; CLI mode
/// also logs to stderr.
fn init_logging(config: &Config, tui_mode: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let (dir, file) = config.log_file_parts();
    let file_appender = tracing_appender::rolling::never(dir, file);

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_filter(EnvFilter::from_default_env());

    let stderr_layer = (!tui_mode).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(EnvFilter::from_default_env())
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();
}

/// Validate the command-line values and submit them without a terminal UI
async fn run_headless(values: FieldValues, config: &Config) -> Result<()> {
    let mut form = FormState::new(config.validation_mode).with_defaults(values);

    match form.submit(&LogSubmitter::new()).await {
        Ok(record) => print_record(&record),
        Err(FormError::Invalid(errors)) => {
            for err in errors.iter() {
                eprintln!("{}: {}", err.field(), err);
            }
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

fn print_record(record: &OutputSubmission) -> Result<()> {
    let json = serde_json::to_string_pretty(record).context("Failed to serialize submission")?;
    println!("{}", json);
    Ok(())
}
