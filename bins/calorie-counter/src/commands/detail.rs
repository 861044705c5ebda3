//! Detail command - show extracted nutrition for one record

use super::{banner, print_json};
use crate::OutputFormat;
use anyhow::Result;
use calorie_core::config::Config;
use calorie_estimator::{ExtractedNutrition, extract, resolve::reconcile};
use fooddata_client::{ClientConfig, FoodDataClient, FoodRecord};
use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct JsonDetailOutput<'a> {
    fdc_id: Option<i64>,
    description: &'a str,
    data_type: String,
    nutrition: &'a ExtractedNutrition,
    calories_per_serving: Option<f64>,
}

/// Fetch a record by id and print what the extractor sees in it
pub async fn run(config: &Config, fdc_id: i64, format: OutputFormat) -> Result<()> {
    config.require_api_key()?;
    let client = FoodDataClient::with_config(ClientConfig::from(&config.schema.fooddata))?;
    let record = client.foods().get(fdc_id).await?;
    let nutrition = extract(&record);

    match format {
        OutputFormat::Json => print_json(&JsonDetailOutput {
            fdc_id: record.fdc_id,
            description: record.description(),
            data_type: record.data_type().to_string(),
            nutrition: &nutrition,
            calories_per_serving: reconcile(&nutrition),
        }),
        OutputFormat::Text => {
            print_text(&record, &nutrition);
            Ok(())
        }
    }
}

fn print_text(record: &FoodRecord, nutrition: &ExtractedNutrition) {
    banner("🔎 Food Detail");

    let number = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |v| v.to_string());

    println!("  {:<22} {}", "Description:".dimmed(), record.description().bold());
    println!("  {:<22} {}", "Data type:".dimmed(), record.data_type());
    println!(
        "  {:<22} {}",
        "Label kcal/serving:".dimmed(),
        number(nutrition.calories_per_serving)
    );
    println!(
        "  {:<22} {}",
        "Energy per 100 g:".dimmed(),
        number(nutrition.calories_per_100g)
    );
    println!(
        "  {:<22} {} {}",
        "Serving:".dimmed(),
        number(nutrition.serving_size),
        nutrition.serving_unit.as_deref().unwrap_or_default()
    );

    match reconcile(nutrition) {
        Some(kcal) => println!(
            "  {:<22} {}",
            "Calories/serving:".dimmed(),
            format!("{kcal} kcal").green().bold()
        ),
        None => println!("  {}", "No usable calorie data".yellow()),
    }
    println!();
}
