//! Backend operations, one HTTP call each.

use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::types::{ComplexFood, NutritionCalculationRequest, NutritionResponse};

pub const HEALTH_PATH: &str = "/health";
pub const FOODS_PATH: &str = "/foods";
pub const CALCULATE_PATH: &str = "/calculate-nutrition";
pub const INGREDIENTS_PATH: &str = "/ingredients";

/// The nutrition backend as seen by the client. [`ApiClient`] talks to the real service;
/// tests substitute a scripted implementation.
#[allow(async_fn_in_trait)]
pub trait NutritionBackend {
    /// Server-defined liveness payload.
    async fn health_check(&self) -> ApiResult<Value>;

    async fn list_foods(&self) -> ApiResult<Vec<String>>;

    /// Fails with `ApiError::NotFound` for foods that have no composition entry.
    async fn food_composition(&self, food_name: &str) -> ApiResult<ComplexFood>;

    async fn calculate_nutrition(
        &self,
        request: &NutritionCalculationRequest,
    ) -> ApiResult<NutritionResponse>;

    /// Same computation as [`NutritionBackend::calculate_nutrition`], with the request
    /// carried in the path instead of a body.
    async fn calculate_nutrition_by_path(
        &self,
        food_name: &str,
        weight_grams: f64,
    ) -> ApiResult<NutritionResponse>;

    /// Raw payload for a single ingredient.
    async fn ingredient_nutrition(&self, ingredient_name: &str) -> ApiResult<Value>;
}

pub fn food_path(food_name: &str) -> String {
    format!("{FOODS_PATH}/{}", urlencoding::encode(food_name))
}

pub fn calculate_by_path(food_name: &str, weight_grams: f64) -> String {
    let weight = weight_grams.to_string();
    format!(
        "{CALCULATE_PATH}/{}/{}",
        urlencoding::encode(food_name),
        urlencoding::encode(&weight)
    )
}

pub fn ingredient_path(ingredient_name: &str) -> String {
    format!("{INGREDIENTS_PATH}/{}", urlencoding::encode(ingredient_name))
}

impl NutritionBackend for ApiClient {
    async fn health_check(&self) -> ApiResult<Value> {
        self.get(HEALTH_PATH.to_string()).await
    }

    async fn list_foods(&self) -> ApiResult<Vec<String>> {
        self.get(FOODS_PATH.to_string()).await
    }

    async fn food_composition(&self, food_name: &str) -> ApiResult<ComplexFood> {
        self.get(food_path(food_name)).await
    }

    async fn calculate_nutrition(
        &self,
        request: &NutritionCalculationRequest,
    ) -> ApiResult<NutritionResponse> {
        self.post(CALCULATE_PATH.to_string(), request).await
    }

    async fn calculate_nutrition_by_path(
        &self,
        food_name: &str,
        weight_grams: f64,
    ) -> ApiResult<NutritionResponse> {
        self.get(calculate_by_path(food_name, weight_grams)).await
    }

    async fn ingredient_nutrition(&self, ingredient_name: &str) -> ApiResult<Value> {
        self.get(ingredient_path(ingredient_name)).await
    }
}
