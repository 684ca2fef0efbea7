//! guidechat - ask questions about a body of guidelines from the terminal

mod commands;
mod config;
mod plain;
mod ui;

use clap::Parser;
use commands::LangCommand;
use guidechat_api::{Gateway, HttpGateway};
use std::sync::Arc;

/// guidechat - guideline question-answering client
#[derive(Parser, Debug)]
#[command(name = "guidechat")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Backend base URL (default: http://127.0.0.1:5000)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Language to ask in, by code (default: en)
    #[arg(short, long)]
    language: Option<String>,

    /// Ask a single question and exit
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Disable TUI mode (use simple stdin/stdout)
    #[arg(long)]
    no_tui: bool,

    /// List available languages and exit
    #[arg(long)]
    languages: bool,

    /// Initialize config file
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup tracing
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("guidechat=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    // Initialize config and exit
    if args.init_config {
        match config::Config::init() {
            Ok(path) => {
                println!("Config file created at: {}", path.display());
                println!("\nExample config:\n{}", config::example_config());
            }
            Err(e) => {
                eprintln!("Error creating config: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    // Load config file
    let cfg = config::Config::load();

    let controller_config = match cfg.controller_config(args.language.as_deref()) {
        Ok(controller_config) => controller_config,
        Err(code) => {
            eprintln!("Error: unknown language '{}'", code);
            eprintln!();
            eprintln!("{}", LangCommand::list_languages_text(&code, &cfg.catalog()));
            std::process::exit(1);
        }
    };

    if args.languages {
        println!(
            "{}",
            LangCommand::list_languages_text(&controller_config.language, &controller_config.languages)
        );
        return Ok(());
    }

    // CLI takes precedence over config
    let base_url = args.base_url.as_deref().unwrap_or(cfg.base_url());
    let gateway: Arc<dyn Gateway> = Arc::new(HttpGateway::with_timeout(base_url, cfg.timeout())?);
    tracing::debug!(base_url, language = %controller_config.language, "starting");

    // Non-interactive mode
    if let Some(question) = args.command {
        return plain::run_once(controller_config, gateway.as_ref(), &question).await;
    }

    let use_tui = !args.no_tui && cfg.tui.unwrap_or(true);
    if use_tui {
        return ui::run_tui(controller_config, gateway).await;
    }

    // Interactive mode (simple stdin/stdout)
    if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        eprintln!("guidechat ({}) - type /help for commands", base_url);
        eprintln!();
    }
    plain::run_interactive(controller_config, gateway.as_ref()).await
}
