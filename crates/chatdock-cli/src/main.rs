//! chatdock CLI: Ask an assistant endpoint from the terminal

use chatdock_engine::{
    save_png, AssistantClient, ChatController, ChatSurface, Config, HttpAssistant, Output,
    Payload, CONFIG_DIR,
};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "chatdock.log";

/// Exit code of `ask` when the request failed.
const EXIT_REQUEST_FAILED: i32 = 2;

/// Minimal chat widget for an assistant endpoint
#[derive(Parser)]
#[command(name = "chatdock")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Base URL of the assistant server
    #[arg(long, global = true, env = "CHATDOCK_BASE_URL")]
    base_url: Option<String>,

    /// Config file (default: .chatdock/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Directory to save chart images into
    #[arg(long, global = true)]
    image_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat widget (default when no command specified)
    Tui,

    /// Send one question and print the answer
    Ask {
        /// Question to send
        text: String,

        /// Print the output markup instead of plain text
        #[arg(long)]
        html: bool,
    },

    /// Print the effective configuration as JSON
    Config,
}

fn main() {
    let cli = Cli::parse();

    let result = load_config(&cli).and_then(|config| match cli.command {
        None | Some(Commands::Tui) => cmd_tui(config),
        Some(Commands::Ask { text, html }) => cmd_ask(config, &text, html),
        Some(Commands::Config) => cmd_config(&config),
    });

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Load the config file and apply command-line overrides.
fn load_config(cli: &Cli) -> Result<Config, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(&Config::default_path(&std::env::current_dir()?))?,
    };

    if let Some(base_url) = &cli.base_url {
        config.base_url.clone_from(base_url);
    }
    if let Some(timeout) = cli.timeout {
        config.request_timeout_secs = Some(timeout);
    }
    if let Some(dir) = &cli.image_dir {
        config.image_dir = Some(dir.clone());
    }

    // Fail on a bad base URL before anything touches the terminal.
    config.endpoint_url("")?;
    Ok(config)
}

/// `RUST_LOG` if set, otherwise `default`.
fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to a file so output does not tear through the alternate screen.
fn init_file_logging(dir: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter("info"))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| e.to_string())?;
    Ok(())
}

fn log_effective_config(config: &Config) {
    let endpoint = format!(
        "{}{}",
        config.base_url.trim_end_matches('/'),
        config.endpoint_path
    );
    info!(
        endpoint = %endpoint,
        query_param = %config.query_param,
        timeout_secs = ?config.request_timeout_secs,
        image_dir = ?config.image_dir,
        "configuration loaded"
    );
}

fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn"))
        .with_writer(std::io::stderr)
        .try_init();
}

fn cmd_tui(config: Config) -> Result<i32, Box<dyn Error>> {
    init_file_logging(&std::env::current_dir()?.join(CONFIG_DIR))?;
    log_effective_config(&config);

    let client: Arc<dyn AssistantClient> = Arc::new(HttpAssistant::new(config.clone()));
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(chatdock_tui::run_widget(config, client))?;
    Ok(0)
}

fn cmd_ask(config: Config, text: &str, html: bool) -> Result<i32, Box<dyn Error>> {
    init_stderr_logging();
    log_effective_config(&config);

    let client = HttpAssistant::new(config.clone());
    let mut surface = StdoutSurface::new(html, config.image_dir);
    let mut controller = ChatController::new();

    let rt = tokio::runtime::Runtime::new()?;
    let sent = rt.block_on(controller.submit(&client, &mut surface, text));
    if !sent {
        return Err("nothing to ask: input is blank".into());
    }
    // The error text is already on stdout; signal failure through the exit code.
    Ok(if surface.failed { EXIT_REQUEST_FAILED } else { 0 })
}

fn cmd_config(config: &Config) -> Result<i32, Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(0)
}

/// Surface printing output to stdout.
struct StdoutSurface {
    html: bool,
    image_dir: Option<PathBuf>,
    failed: bool,
}

impl StdoutSurface {
    fn new(html: bool, image_dir: Option<PathBuf>) -> Self {
        Self {
            html,
            image_dir,
            failed: false,
        }
    }
}

impl ChatSurface for StdoutSurface {
    fn clear_input(&mut self) {}

    fn hide_welcome(&mut self) {}

    fn show_loading(&mut self) {}

    fn show_output(&mut self, output: &Output) {
        self.failed = output.is_error();

        if self.html {
            println!("{}", output.markup());
        } else {
            for line in output.plain_lines() {
                println!("{line}");
            }
        }

        if let (Output::Payload(Payload::Image(uri)), Some(dir)) = (output, &self.image_dir) {
            match save_png(dir, uri) {
                Ok(path) => eprintln!("saved chart to {}", path.display()),
                Err(e) => eprintln!("could not save chart: {e}"),
            }
        }
    }

    fn show_result(&mut self) {}
}
