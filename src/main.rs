use anyhow::{Context, Result};
use clap::Parser;
use just_nutrition::config::AppConfig;
use just_nutrition::errors::error_logging;
use just_nutrition::normalization_tables::load_normalization_tables_from;
use just_nutrition::normalizer::IngredientNormalizer;
use just_nutrition::observability;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

/// Normalize recipe ingredient lines into a nutrition lookup request
#[derive(Parser, Debug)]
#[command(name = "just-nutrition", version, about)]
struct Args {
    /// File with one ingredient per line; reads stdin when omitted
    file: Option<PathBuf>,

    /// Number of servings the recipe makes
    #[arg(long)]
    servings: Option<u32>,

    /// Normalization tables JSON file (overrides NORMALIZATION_TABLES_PATH)
    #[arg(long)]
    tables: Option<PathBuf>,
}

/// Load and validate configuration, honouring an explicit tables file
fn load_configuration(args: &Args) -> Result<AppConfig> {
    let mut config = AppConfig::from_env()?;

    if let Some(path) = &args.tables {
        config.tables = load_normalization_tables_from(path).map_err(|e| {
            error_logging::log_config_error(&e, "tables", "load_normalization_tables_from");
            e
        })?;
    }

    config.validate().map_err(|e| {
        anyhow::anyhow!(
            "Configuration validation failed: {}. Please check your environment and config/normalization_tables.json.",
            e
        )
    })?;

    Ok(config)
}

/// Read raw ingredient text from the given file or stdin
fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| {
                error_logging::log_filesystem_error(
                    &e,
                    "read_ingredient_file",
                    path.to_str(),
                );
                e
            })
            .with_context(|| format!("Failed to read ingredient file {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read ingredients from stdin")?;
            Ok(buffer)
        }
    }
}

fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = load_configuration(&args)?;

    observability::init_tracing_with_config(&config.observability)?;
    info!("{}", config.summary());

    let normalizer = IngredientNormalizer::new(&config.tables, config.normalizer.clone())?
        .with_metrics(config.observability.enable_metrics);

    let input = read_input(args.file.as_ref())?;
    let lines: Vec<&str> = input.lines().filter(|l| !l.trim().is_empty()).collect();

    let report = normalizer.normalize_recipe(&lines, args.servings)?;
    info!(
        servings = report.request.servings,
        ingredients = report.request.ingredients.len(),
        diagnostics = report.diagnostics.len(),
        "Recipe normalized"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
