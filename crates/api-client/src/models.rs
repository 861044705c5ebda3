//! FoodData Central record model
//!
//! Upstream payloads vary by data type and endpoint, and individual fields are
//! sometimes null or of an unexpected type. Every field here deserializes
//! leniently: a value that does not fit becomes absent instead of failing the
//! whole record.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Upstream curation tier of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Analytically derived reference foods
    Foundation,
    /// Legacy Standard Reference
    SrLegacy,
    /// Food and Nutrient Database for Dietary Studies
    Survey,
    /// Branded products, or any label the client does not know
    Branded,
}

impl DataType {
    /// Data types requested from the search endpoint
    pub const SEARCHED: [Self; 3] = [Self::Foundation, Self::SrLegacy, Self::Survey];

    /// Parse the upstream label; unknown labels rank as branded
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "Foundation" => Self::Foundation,
            "SR Legacy" => Self::SrLegacy,
            "Survey (FNDDS)" => Self::Survey,
            _ => Self::Branded,
        }
    }

    /// The label the upstream API uses
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Foundation => "Foundation",
            Self::SrLegacy => "SR Legacy",
            Self::Survey => "Survey (FNDDS)",
            Self::Branded => "Branded",
        }
    }

    /// Quality rank, higher is better curated
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::Foundation => 4,
            Self::SrLegacy => 3,
            Self::Survey => 2,
            Self::Branded => 1,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Search endpoint response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Matching records; a missing or null list is empty
    #[serde(default, deserialize_with = "lenient_list")]
    pub foods: Vec<FoodRecord>,
    /// Total hits reported upstream
    #[serde(default, deserialize_with = "lenient")]
    pub total_hits: Option<u64>,
}

/// One food record from search or detail
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRecord {
    /// FoodData Central id
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub fdc_id: Option<i64>,

    /// Human-readable description
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Upstream data type label
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,

    /// Per-serving label values (branded foods)
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub label_nutrients: Option<LabelNutrients>,

    /// Generic nutrient list, in upstream order
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Vec::is_empty")]
    pub food_nutrients: Vec<NutrientEntry>,

    /// Serving size, camelCase form
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<f64>,

    /// Serving size unit, camelCase form
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub serving_size_unit: Option<String>,

    /// Serving size, snake_case form
    #[serde(
        rename = "serving_size",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub serving_size_snake: Option<f64>,

    /// Serving size unit, snake_case form
    #[serde(
        rename = "serving_size_unit",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub serving_size_unit_snake: Option<String>,

    /// Ingredient list as printed on the label
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,
}

impl FoodRecord {
    /// Parsed data type; a missing label ranks as branded
    #[must_use]
    pub fn data_type(&self) -> DataType {
        self.data_type
            .as_deref()
            .map_or(DataType::Branded, DataType::from_label)
    }

    /// Description, or the empty string
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

/// Label nutrient block; only calories are read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelNutrients {
    /// Calories per serving
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub calories: Option<LabelValue>,
}

/// One label nutrient value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelValue {
    /// Amount per serving
    #[serde(default, deserialize_with = "lenient_number")]
    pub value: Option<f64>,
}

/// One generic nutrient entry
///
/// Search results, abridged detail and full detail each name the nutrient and
/// its amount differently, so every known field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientEntry {
    /// Nutrient name in search results
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub nutrient_name: Option<String>,

    /// Nutrient name in abridged detail
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Nested nutrient description in full detail
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub nutrient: Option<NutrientRef>,

    /// Amount in search results
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,

    /// Amount in detail responses
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,

    /// Unit of the amount
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
}

/// Nested nutrient description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientRef {
    /// Nutrient name
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,

    /// Unit of the amount
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Numbers, or strings holding a number
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Arrays keep the elements that parse; anything else is empty
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}
