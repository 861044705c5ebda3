//! Lookup command - estimate calories for a dish

use super::{banner, print_json};
use crate::OutputFormat;
use anyhow::{Result, bail};
use calorie_core::cache::CacheStats;
use calorie_core::config::Config;
use calorie_estimator::{CalorieRequest, CalorieResponse, CalorieService};
use owo_colors::OwoColorize;

/// Rate-limit key and token subject for lookups made from this CLI
const CLI_CALLER: &str = "cli";

/// Run a lookup through the service boundary
pub async fn run(
    config: &Config,
    dish: &str,
    servings: u32,
    token: Option<&str>,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let request = CalorieRequest::new(dish, servings);
    // Reject bad input before any client is built
    request.validate()?;

    let service = CalorieService::from_config(config)?;
    let token = match token {
        Some(token) => token.to_string(),
        None => service.issuer().issue(CLI_CALLER)?,
    };
    let header = format!("Bearer {token}");

    let outcome = service
        .get_calories(CLI_CALLER, Some(&header), &request)
        .await;

    if verbose {
        let report = usage_report(&service.resolver().source().cache_stats());
        eprintln!("{}", serde_json::to_string_pretty(&report)?);
    }

    let response = match outcome {
        Ok(response) => response,
        Err(e) => bail!("{e} (status {})", e.status()),
    };

    match format {
        OutputFormat::Json => print_json(&response),
        OutputFormat::Text => {
            print_text(&response);
            Ok(())
        }
    }
}

/// Process-wide lookup counters and timings, plus this run's cache usage
fn usage_report(cache: &CacheStats) -> serde_json::Value {
    let mut report = calorie_telemetry::metrics().export_json();
    report["cache"] = serde_json::json!(cache);
    report
}

fn print_text(response: &CalorieResponse) {
    banner("🍽  Calorie Estimate");

    println!("  {:<18} {}", "Match:".dimmed(), response.dish_name.bold());
    if let Some(id) = response.fdc_id {
        println!("  {:<18} {}", "FDC id:".dimmed(), id);
    }
    println!("  {:<18} {}", "Servings:".dimmed(), response.servings);
    println!(
        "  {:<18} {} kcal",
        "Per serving:".dimmed(),
        response.calories_per_serving
    );
    println!(
        "  {:<18} {}",
        "Total:".dimmed(),
        format!("{} kcal", response.total_calories).green().bold()
    );
    println!("  {:<18} {}", "Source:".dimmed(), response.source);

    if let Some(breakdown) = &response.ingredient_breakdown {
        println!();
        println!("  {}", "Ingredients".bold());
        println!("  {}", breakdown.ingredients.dimmed());
    }
    println!();
}
