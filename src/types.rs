use serde::{Deserialize, Serialize};

/// Body of `POST /calculate-nutrition`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NutritionCalculationRequest {
    pub food_name: String,
    pub weight_grams: f64,
}

impl NutritionCalculationRequest {
    pub fn new(food_name: impl Into<String>, weight_grams: f64) -> Self {
        Self {
            food_name: food_name.into(),
            weight_grams,
        }
    }
}

/// Nutrition computed by the server for one request.
///
/// Every nutrient is optional: a missing field means the backend had no value for it,
/// which is rendered as absent rather than as zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculatedNutrition {
    pub food_name: String,
    pub weight_grams: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbohydrate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_fiber: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calcium: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iron: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potassium: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vitamin_a: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vitamin_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition_details: Option<Vec<CompositionDetail>>,
}

/// One ingredient's share of a calculated dish, scaled to its weight in the request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositionDetail {
    pub ingredient_name: String,
    pub weight: f64,
    #[serde(default)]
    pub energy: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub fat: Option<f64>,
    #[serde(default)]
    pub carbohydrate: Option<f64>,
    #[serde(default)]
    pub sugar: Option<f64>,
    #[serde(default)]
    pub dietary_fiber: Option<f64>,
    #[serde(default)]
    pub calcium: Option<f64>,
    #[serde(default)]
    pub iron: Option<f64>,
    #[serde(default)]
    pub sodium: Option<f64>,
    #[serde(default)]
    pub potassium: Option<f64>,
    #[serde(default)]
    pub vitamin_a: Option<f64>,
    #[serde(default)]
    pub vitamin_c: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoodComposition {
    pub ingredient_name: String,
    /// Share of the dish's total weight, 0-100. Not validated client-side.
    pub percentage: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_unit() -> String {
    "g".to_string()
}

/// How a named dish decomposes into ingredients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComplexFood {
    pub food_name: String,
    pub compositions: Vec<FoodComposition>,
    pub total_weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Server envelope for both calculate endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NutritionResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<CalculatedNutrition>,
}

/// Per-100g record for a single raw ingredient as the backend reports it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionInfo {
    #[serde(default)]
    pub food_code: String,
    pub food_name: String,
    #[serde(default)]
    pub nutrition_base_amount: Option<String>,
    #[serde(default)]
    pub energy: Option<f64>,
    #[serde(default)]
    pub water: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub fat: Option<f64>,
    #[serde(default)]
    pub carbohydrate: Option<f64>,
    #[serde(default)]
    pub sugar: Option<f64>,
    #[serde(default)]
    pub dietary_fiber: Option<f64>,
    #[serde(default)]
    pub calcium: Option<f64>,
    #[serde(default)]
    pub iron: Option<f64>,
    #[serde(default)]
    pub sodium: Option<f64>,
    #[serde(default)]
    pub potassium: Option<f64>,
    #[serde(default)]
    pub vitamin_a: Option<f64>,
    #[serde(default)]
    pub vitamin_c: Option<f64>,
    #[serde(default)]
    pub source_name: Option<String>,
}

/// Envelope returned by `GET /ingredients/{name}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IngredientResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<NutritionInfo>,
}

impl IngredientResponse {
    /// Interpret a raw ingredient payload, if it has the usual envelope shape.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

/// A calculation kept in local history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedNutrition {
    pub id: String,
    pub timestamp: String,
    pub data: CalculatedNutrition,
}
