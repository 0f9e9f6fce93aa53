use anyhow::{Context, Result};
use issue_import::cli::{self, CliArgs, Command};
use issue_import::color_utils;
use issue_import::config::Config;
use issue_import::context::{AppContext, StandardContext};
use issue_import::controller::ImportController;
use issue_import::model::parse;
use issue_import::storage::LocalStorage;
use issue_import::store::{MemoryStore, StoreOp, TaskStore};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::path::Path;
use std::sync::Arc;

const BINARY_NAME: &str = "issue-import";

#[tokio::main]
async fn main() -> Result<()> {
    let args = match cli::parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            eprintln!("Run '{} --help' for usage.", BINARY_NAME);
            std::process::exit(2);
        }
    };

    if args.command == Command::Help {
        cli::print_help(BINARY_NAME);
        return Ok(());
    }

    let ctx = StandardContext::new(args.root.clone());
    let config = Config::load(&ctx)?;
    init_logging(&config, &args);

    run(&args, &ctx, &config).await
}

fn init_logging(config: &Config, args: &CliArgs) {
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        config.log_level_filter()
    };
    // A logger may already be installed when embedded; that is not fatal.
    let _ = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn read_csv(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read '{}'", path.display()))
}

async fn run(args: &CliArgs, ctx: &dyn AppContext, config: &Config) -> Result<()> {
    match &args.command {
        Command::Help => cli::print_help(BINARY_NAME),
        Command::Stats { file } => {
            let bytes = read_csv(file)?;
            let records = parse(&decode(&bytes)?)?;
            let stats = ImportController::stats(&records);
            println!("Tasks:    {}", stats.total_tasks);
            println!("Projects: {}", stats.project_count);
            println!("Tags:     {}", stats.tag_count);
        }
        Command::Preview { file } => {
            let bytes = read_csv(file)?;
            let records = parse(&decode(&bytes)?)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Tags => {
            let storage = LocalStorage::new(config.store_path(ctx)?);
            for tag in storage.list_tags().await? {
                let text = color_utils::contrast_text(&tag.color).unwrap_or("?");
                println!("{:<30} {} (text: {})", tag.title, tag.color, text);
            }
        }
        Command::Import { file, dry_run } => {
            let bytes = read_csv(file)?;
            let storage = LocalStorage::new(config.store_path(ctx)?);

            if *dry_run {
                let sandbox = Arc::new(MemoryStore::from_snapshot(storage.snapshot()?));
                let controller = ImportController::from_config(sandbox.clone(), config);
                let outcome = controller.import_bytes(&bytes).await?;
                print_plan(&sandbox.ops().await);
                println!("Dry run: {} task(s) would be imported.", outcome.count());
            } else {
                log::info!("Using store {}", storage.path().display());
                let controller = ImportController::from_config(Arc::new(storage), config);
                let outcome = controller.import_bytes(&bytes).await?;
                if outcome.is_empty() {
                    println!("No tasks found in {}.", file.display());
                } else {
                    println!(
                        "Imported {} task(s) across {} project(s).",
                        outcome.count(),
                        outcome.stats.project_count
                    );
                }
            }
        }
    }
    Ok(())
}

fn decode(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).context("CSV file is not valid UTF-8")
}

fn print_plan(ops: &[StoreOp]) {
    for op in ops {
        match op {
            StoreOp::CreateProject { title, .. } => println!("+ project  {}", title),
            StoreOp::CreateTag { title, .. } => println!("+ tag      {}", title),
            StoreOp::CreateTask { title, .. } => println!("+ task     {}", title),
            StoreOp::UpdateTask { id, tag_ids } => {
                println!("~ tag      {} with {} tag(s)", id, tag_ids.len())
            }
        }
    }
}
