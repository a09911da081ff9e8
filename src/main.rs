use nutrition_estimator::api;
use nutrition_estimator::commands::food_cmd::format_estimate;
use nutrition_estimator::commands::{CommandHandler, CommandOptions};
use nutrition_estimator::config::AppConfig;
use nutrition_estimator::food::{estimate_locally, NutritionEstimator};
use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use dotenv::dotenv;
use log::info;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tokio::net::TcpListener;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Free-text calorie and macro estimation", long_about = None)]
struct Args {
    /// Run the HTTP API instead of the interactive prompt
    #[arg(long)]
    api: bool,

    /// Overrides PORT
    #[arg(long)]
    port: Option<u16>,

    /// Use only the built-in table; no network requests
    #[arg(long)]
    offline: bool,

    /// Print estimates as JSON (one-shot and interactive)
    #[arg(long)]
    json: bool,

    /// One-shot lookup, e.g. `nutrition-estimator 2 bananas`
    query: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = AppConfig::from_env();
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let estimator = NutritionEstimator::from_config(&config.food)
        .context("Failed to initialise nutrition providers")?;

    if args.api {
        run_api_server(&config, estimator).await
    } else if !args.query.is_empty() {
        run_single_query(&args, &estimator).await
    } else {
        run_cli_mode(&args, estimator).await
    }
}

async fn run_single_query(args: &Args, estimator: &NutritionEstimator) -> Result<()> {
    let query = args.query.join(" ");
    let estimate = if args.offline {
        estimate_locally(&query)
    } else {
        estimator.estimate_with_local_fallback(&query).await
    };

    let output = format_estimate(&estimate, args.json).map_err(anyhow::Error::msg)?;
    println!("{}", output);
    Ok(())
}

async fn run_cli_mode(args: &Args, estimator: NutritionEstimator) -> Result<()> {
    let options = CommandOptions {
        offline: args.offline,
        json: args.json,
    };
    let command_handler = CommandHandler::new(estimator, options);

    if let Ok(help) = command_handler.handle_command("help").await {
        println!("{}", help);
    }

    let mut rl = Editor::<(), DefaultHistory>::new()?;

    loop {
        match rl.readline("🍎 ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                if input == "exit" || input == "quit" {
                    break;
                }
                let _ = rl.add_history_entry(input);

                match command_handler.handle_command(input).await {
                    Ok(output) => println!("{}\n", output),
                    Err(e) => println!("{}\n", e.red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}

async fn run_api_server(config: &AppConfig, estimator: NutritionEstimator) -> Result<()> {
    let addr = config
        .server
        .socket_addr()
        .with_context(|| format!("Invalid bind address {}:{}", config.server.host, config.server.port))?;

    let app = api::create_api(estimator, config.server.max_concurrent_requests);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Nutrition API listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
