//! Calorie and serving data from heterogeneous food records.

use fooddata_client::{FoodRecord, NutrientEntry};
use serde::Serialize;

/// Canonical nutrition snapshot of one record
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedNutrition {
    /// Label calories per serving
    pub calories_per_serving: Option<f64>,
    /// Generic energy value, per 100 g for non-branded records
    pub calories_per_100g: Option<f64>,
    /// Serving size, never zero
    pub serving_size: Option<f64>,
    /// Serving size unit as given upstream
    pub serving_unit: Option<String>,
    /// Ingredient text, verbatim
    pub ingredients: Option<String>,
}

/// Field naming used for serving size and unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServingSchema {
    /// `servingSize` / `servingSizeUnit`
    CamelCase,
    /// `serving_size` / `serving_size_unit`
    SnakeCase,
}

impl ServingSchema {
    /// Schemas in order of preference
    pub const PREFERENCE: [Self; 2] = [Self::CamelCase, Self::SnakeCase];

    /// Serving size and unit under this schema; absent or zero sizes yield `None`
    #[must_use]
    pub fn read(self, record: &FoodRecord) -> Option<(f64, Option<&str>)> {
        let (size, unit) = match self {
            Self::CamelCase => (record.serving_size, &record.serving_size_unit),
            Self::SnakeCase => (record.serving_size_snake, &record.serving_size_unit_snake),
        };
        let size = size.filter(|s| *s > 0.0)?;
        Some((size, unit.as_deref()))
    }
}

/// Shape of one nutrient list entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NutrientSchema {
    /// `{nutrientName, value}` as in search results
    Search,
    /// `{name, amount}` as in abridged detail
    Abridged,
    /// `{nutrient: {name}, amount}` as in full detail
    Detail,
}

impl NutrientSchema {
    /// Identify the entry shape by where its name lives
    #[must_use]
    pub fn detect(entry: &NutrientEntry) -> Option<Self> {
        if non_empty(entry.nutrient_name.as_deref()).is_some() {
            Some(Self::Search)
        } else if non_empty(entry.name.as_deref()).is_some() {
            Some(Self::Abridged)
        } else if non_empty(entry.nutrient.as_ref().and_then(|n| n.name.as_deref())).is_some() {
            Some(Self::Detail)
        } else {
            None
        }
    }

    /// Nutrient name under this schema
    #[must_use]
    pub fn name(self, entry: &NutrientEntry) -> Option<&str> {
        let name = match self {
            Self::Search => entry.nutrient_name.as_deref(),
            Self::Abridged => entry.name.as_deref(),
            Self::Detail => entry.nutrient.as_ref().and_then(|n| n.name.as_deref()),
        };
        non_empty(name)
    }

}

/// Amount of an entry: `value`, or `amount` when `value` is missing or zero
///
/// A zero `amount` is kept; a zero `value` alone counts as no amount.
#[must_use]
pub fn entry_amount(entry: &NutrientEntry) -> Option<f64> {
    entry.value.filter(|v| *v != 0.0).or(entry.amount)
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

fn is_energy(name: &str) -> bool {
    let name = name.to_lowercase();
    name.contains("energy") || name.contains("calories")
}

/// First energy amount in the generic nutrient list
///
/// Entries named like energy but carrying no amount are skipped.
fn energy_from_nutrients(nutrients: &[NutrientEntry]) -> Option<f64> {
    nutrients.iter().find_map(|entry| {
        let name = NutrientSchema::detect(entry)?.name(entry)?;
        if is_energy(name) {
            entry_amount(entry)
        } else {
            None
        }
    })
}

/// Normalize a record into an [`ExtractedNutrition`]
///
/// Label calories take precedence; the nutrient list is only scanned when
/// the label has none.
#[must_use]
pub fn extract(record: &FoodRecord) -> ExtractedNutrition {
    let calories_per_serving = record
        .label_nutrients
        .as_ref()
        .and_then(|label| label.calories.as_ref())
        .and_then(|calories| calories.value);

    let calories_per_100g = if calories_per_serving.is_none() {
        energy_from_nutrients(&record.food_nutrients)
    } else {
        None
    };

    let serving = ServingSchema::PREFERENCE
        .iter()
        .find_map(|schema| schema.read(record));

    ExtractedNutrition {
        calories_per_serving,
        calories_per_100g,
        serving_size: serving.map(|(size, _)| size),
        serving_unit: serving.and_then(|(_, unit)| unit.map(str::to_string)),
        ingredients: record.ingredients.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn food(value: Value) -> FoodRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_label_takes_precedence() {
        let record = food(json!({
            "labelNutrients": {"calories": {"value": 150}},
            "foodNutrients": [{"nutrientName": "Energy", "value": 400}]
        }));

        let nutrition = extract(&record);
        assert_eq!(nutrition.calories_per_serving, Some(150.0));
        assert_eq!(nutrition.calories_per_100g, None);
    }

    #[test]
    fn test_energy_from_search_entries() {
        let record = food(json!({
            "foodNutrients": [
                {"nutrientName": "Protein", "value": 3.1},
                {"nutrientName": "Energy", "unitName": "KCAL", "value": 52}
            ]
        }));
        assert_eq!(extract(&record).calories_per_100g, Some(52.0));
    }

    #[test]
    fn test_energy_from_detail_entries() {
        let record = food(json!({
            "foodNutrients": [
                {"nutrient": {"name": "Water"}, "amount": 85.6},
                {"nutrient": {"name": "Energy"}, "amount": 89}
            ]
        }));
        assert_eq!(extract(&record).calories_per_100g, Some(89.0));
    }

    #[test]
    fn test_energy_from_abridged_entries() {
        let record = food(json!({
            "foodNutrients": [{"name": "Calories", "amount": 120}]
        }));
        assert_eq!(extract(&record).calories_per_100g, Some(120.0));
    }

    #[test]
    fn test_energy_name_is_case_insensitive() {
        let record = food(json!({
            "foodNutrients": [{"nutrientName": "ENERGY (Atwater General Factors)", "value": 61}]
        }));
        assert_eq!(extract(&record).calories_per_100g, Some(61.0));
    }

    #[test]
    fn test_energy_without_amount_keeps_scanning() {
        let record = food(json!({
            "foodNutrients": [
                {"nutrientName": "Energy"},
                {"nutrientName": "Energy", "value": "not a number"},
                {"nutrientName": "Energy", "value": 210}
            ]
        }));
        assert_eq!(extract(&record).calories_per_100g, Some(210.0));
    }

    #[test]
    fn test_zero_value_falls_back_to_amount() {
        let record = food(json!({
            "foodNutrients": [
                {"nutrientName": "Energy", "value": 0, "amount": 5},
                {"nutrientName": "Energy (Atwater)", "value": 42}
            ]
        }));
        assert_eq!(extract(&record).calories_per_100g, Some(5.0));
    }

    #[test]
    fn test_zero_value_alone_keeps_scanning() {
        let record = food(json!({
            "foodNutrients": [
                {"nutrientName": "Energy", "value": 0},
                {"nutrientName": "Energy (Atwater)", "value": 42}
            ]
        }));
        assert_eq!(extract(&record).calories_per_100g, Some(42.0));
    }

    #[test]
    fn test_zero_amount_is_present() {
        let record = food(json!({
            "foodNutrients": [
                {"name": "Energy", "amount": 0},
                {"name": "Energy", "amount": 5}
            ]
        }));
        assert_eq!(extract(&record).calories_per_100g, Some(0.0));
    }

    #[test]
    fn test_value_preferred_over_amount() {
        let entry: NutrientEntry =
            serde_json::from_value(json!({"name": "Energy", "value": 12, "amount": 30})).unwrap();
        assert_eq!(entry_amount(&entry), Some(12.0));
    }

    #[test]
    fn test_serving_camel_case_preferred() {
        let record = food(json!({
            "servingSize": 50,
            "servingSizeUnit": "g",
            "serving_size": 30,
            "serving_size_unit": "oz"
        }));

        let nutrition = extract(&record);
        assert_eq!(nutrition.serving_size, Some(50.0));
        assert_eq!(nutrition.serving_unit.as_deref(), Some("g"));
    }

    #[test]
    fn test_serving_snake_case_fallback() {
        let record = food(json!({
            "servingSize": 0,
            "servingSizeUnit": "g",
            "serving_size": 30,
            "serving_size_unit": "oz"
        }));

        let nutrition = extract(&record);
        assert_eq!(nutrition.serving_size, Some(30.0));
        assert_eq!(nutrition.serving_unit.as_deref(), Some("oz"));
    }

    #[test]
    fn test_serving_without_unit() {
        let nutrition = extract(&food(json!({"servingSize": 28})));
        assert_eq!(nutrition.serving_size, Some(28.0));
        assert_eq!(nutrition.serving_unit, None);
    }

    #[test]
    fn test_ingredients_verbatim() {
        let nutrition = extract(&food(json!({"ingredients": ""})));
        assert_eq!(nutrition.ingredients.as_deref(), Some(""));

        let nutrition = extract(&food(json!({"ingredients": "OATS, SALT"})));
        assert_eq!(nutrition.ingredients.as_deref(), Some("OATS, SALT"));

        assert_eq!(extract(&FoodRecord::default()).ingredients, None);
    }

    #[test]
    fn test_empty_record() {
        assert_eq!(extract(&FoodRecord::default()), ExtractedNutrition::default());
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let record = food(json!({
            "labelNutrients": {"calories": {"value": 90}},
            "servingSize": 40,
            "servingSizeUnit": "g",
            "ingredients": "WHOLE GRAIN OATS"
        }));
        assert_eq!(extract(&record), extract(&record));
    }

    #[test]
    fn test_schema_detection() {
        let entry = |v: Value| -> NutrientEntry { serde_json::from_value(v).unwrap() };

        assert_eq!(
            NutrientSchema::detect(&entry(json!({"nutrientName": "Energy", "value": 1}))),
            Some(NutrientSchema::Search)
        );
        assert_eq!(
            NutrientSchema::detect(&entry(json!({"name": "Energy", "amount": 1}))),
            Some(NutrientSchema::Abridged)
        );
        assert_eq!(
            NutrientSchema::detect(&entry(json!({"nutrient": {"name": "Energy"}, "amount": 1}))),
            Some(NutrientSchema::Detail)
        );
        assert_eq!(NutrientSchema::detect(&entry(json!({"amount": 1}))), None);
    }
}
