//! The calculator screen as a state machine.
//!
//! `Idle -> Calculating -> Idle`, with the outcome of each run left in `result`,
//! `composition` and `error` (empty when there is none). Every run is tagged with a
//! [`Ticket`]; a run that has been superseded by a newer one is discarded when it
//! completes instead of overwriting the newer state.

use crate::api::NutritionBackend;
use crate::error::{ApiError, CalculatorError};
use crate::history::History;
use crate::messages;
use crate::types::{
    CalculatedNutrition, ComplexFood, NutritionCalculationRequest, NutritionResponse,
    SavedNutrition,
};

pub const DEFAULT_WEIGHT_GRAMS: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Calculating,
}

/// Which calculate endpoint a run goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    #[default]
    Post,
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The server answered `success: false`.
    Rejected { message: String },
    /// `success: true` without a payload. Nothing to show or record.
    Acknowledged { message: String },
    Calculated {
        nutrition: CalculatedNutrition,
        composition: Option<ComplexFood>,
    },
    Failed { message: String },
}

pub struct Calculator<B> {
    backend: B,
    history: History,
    transport: Transport,
    food_name: String,
    weight_grams: f64,
    phase: Phase,
    result: Option<CalculatedNutrition>,
    composition: Option<ComplexFood>,
    error: String,
    available_foods: Vec<String>,
    show_ingredient_details: bool,
    show_history: bool,
    saved: Vec<SavedNutrition>,
    generation: u64,
}

impl<B: NutritionBackend> Calculator<B> {
    pub fn new(backend: B, history: History) -> Self {
        Self {
            backend,
            history,
            transport: Transport::default(),
            food_name: String::new(),
            weight_grams: DEFAULT_WEIGHT_GRAMS,
            phase: Phase::Idle,
            result: None,
            composition: None,
            error: String::new(),
            available_foods: Vec::new(),
            show_ingredient_details: false,
            show_history: false,
            saved: Vec::new(),
            generation: 0,
        }
    }

    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Load the food catalogue and saved history. A failed catalogue load is only logged.
    pub async fn mount(&mut self) {
        match self.backend.list_foods().await {
            Ok(foods) => self.available_foods = foods,
            Err(e) => tracing::warn!(error = %e, "could not load the food list"),
        }
        self.saved = self.history.load();
    }

    pub fn set_food_name(&mut self, food_name: impl Into<String>) {
        self.food_name = food_name.into();
    }

    pub fn set_weight(&mut self, weight_grams: f64) {
        self.weight_grams = weight_grams;
    }

    /// Parse a typed weight. On failure the weight is kept and the error is shown.
    pub fn set_weight_input(&mut self, input: &str) -> Result<(), CalculatorError> {
        match input.trim().parse::<f64>() {
            Ok(weight) => {
                self.weight_grams = weight;
                Ok(())
            }
            Err(_) => {
                let err = CalculatorError::InvalidWeight(input.to_string());
                self.error = err.to_string();
                Err(err)
            }
        }
    }

    /// Use the `index`-th catalogue entry as the food name.
    pub fn select_food(&mut self, index: usize) -> bool {
        match self.available_foods.get(index) {
            Some(food) => {
                self.food_name = food.clone();
                true
            }
            None => false,
        }
    }

    pub fn validate(&self) -> Result<NutritionCalculationRequest, CalculatorError> {
        let food_name = self.food_name.trim();
        if food_name.is_empty() {
            return Err(CalculatorError::EmptyFoodName);
        }
        if !(self.weight_grams > 0.0) {
            return Err(CalculatorError::NonPositiveWeight);
        }
        if !self.weight_grams.is_finite() {
            return Err(CalculatorError::InvalidWeight(self.weight_grams.to_string()));
        }
        Ok(NutritionCalculationRequest::new(food_name, self.weight_grams))
    }

    /// Validate, run one calculation, and apply its outcome.
    ///
    /// Invalid input sets the error and returns without touching the network.
    pub async fn calculate(&mut self) {
        let request = match self.validate() {
            Ok(request) => request,
            Err(e) => {
                self.error = e.to_string();
                return;
            }
        };
        let ticket = self.begin();
        let outcome = Self::run(&self.backend, self.transport, &request).await;
        self.apply(ticket, outcome);
    }

    /// Enter `Calculating` and supersede any run still in flight.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.phase = Phase::Calculating;
        self.error.clear();
        Ticket {
            generation: self.generation,
        }
    }

    /// Primary calculation, then a best-effort composition lookup.
    pub async fn run(
        backend: &B,
        transport: Transport,
        request: &NutritionCalculationRequest,
    ) -> Outcome {
        let response = match transport {
            Transport::Post => backend.calculate_nutrition(request).await,
            Transport::Path => {
                backend
                    .calculate_nutrition_by_path(&request.food_name, request.weight_grams)
                    .await
            }
        };

        let nutrition = match response {
            Ok(NutritionResponse {
                success: true,
                data: Some(nutrition),
                ..
            }) => nutrition,
            Ok(NutritionResponse {
                success: true,
                message,
                ..
            }) => return Outcome::Acknowledged { message },
            Ok(NutritionResponse { message, .. }) => return Outcome::Rejected { message },
            Err(e) => {
                tracing::error!(
                    error = %e,
                    status = ?e.status(),
                    food = %request.food_name,
                    "nutrition calculation failed"
                );
                return Outcome::Failed {
                    message: failure_message(&e, &request.food_name),
                };
            }
        };

        let composition = fetch_composition(backend, &request.food_name).await;
        Outcome::Calculated {
            nutrition,
            composition,
        }
    }

    /// Apply a finished run. Returns `false` if the ticket was superseded and the
    /// outcome was dropped.
    pub fn apply(&mut self, ticket: Ticket, outcome: Outcome) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                stale = ticket.generation,
                current = self.generation,
                "dropping superseded calculation"
            );
            return false;
        }

        match outcome {
            Outcome::Rejected { message } | Outcome::Failed { message } => {
                self.error = message;
            }
            Outcome::Acknowledged { message } => {
                tracing::warn!(%message, "calculation succeeded without nutrition data");
            }
            Outcome::Calculated {
                nutrition,
                composition,
            } => {
                self.result = Some(nutrition.clone());
                self.composition = composition;
                match self.history.record(nutrition) {
                    Ok(saved) => self.saved = saved,
                    Err(e) => {
                        tracing::warn!(error = %e, "could not save calculation history");
                        self.saved = self.history.load();
                    }
                }
            }
        }
        self.phase = Phase::Idle;
        true
    }

    pub fn toggle_ingredient_details(&mut self) {
        self.show_ingredient_details = !self.show_ingredient_details;
    }

    /// Flip the history panel, re-reading saved history each time.
    pub fn toggle_history(&mut self) {
        self.saved = self.history.load();
        self.show_history = !self.show_history;
    }

    pub fn can_submit(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn food_name(&self) -> &str {
        &self.food_name
    }

    pub fn weight_grams(&self) -> f64 {
        self.weight_grams
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Calculating
    }

    pub fn result(&self) -> Option<&CalculatedNutrition> {
        self.result.as_ref()
    }

    pub fn composition(&self) -> Option<&ComplexFood> {
        self.composition.as_ref()
    }

    /// Empty when there is no error.
    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn available_foods(&self) -> &[String] {
        &self.available_foods
    }

    pub fn show_ingredient_details(&self) -> bool {
        self.show_ingredient_details
    }

    pub fn show_history(&self) -> bool {
        self.show_history
    }

    pub fn saved(&self) -> &[SavedNutrition] {
        &self.saved
    }
}

async fn fetch_composition<B: NutritionBackend>(backend: &B, food_name: &str) -> Option<ComplexFood> {
    match backend.food_composition(food_name).await {
        Ok(composition) => Some(composition),
        Err(e) => {
            // Single-ingredient foods have no composition entry.
            tracing::debug!(error = %e, food = %food_name, "no composition breakdown");
            None
        }
    }
}

fn failure_message(err: &ApiError, food_name: &str) -> String {
    if err.is_not_found() {
        messages::food_not_found(food_name)
    } else {
        messages::CALCULATION_FAILED.to_string()
    }
}
