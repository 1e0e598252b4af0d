//! Test doubles: a scripted backend and a one-shot HTTP server.

use std::collections::{HashMap, VecDeque};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Mutex;
use std::sync::mpsc;
use std::time::Duration;

use serde_json::{Value, json};

use crate::api::NutritionBackend;
use crate::error::{ApiError, ApiResult};
use crate::types::{
    CalculatedNutrition, ComplexFood, FoodComposition, NutritionCalculationRequest,
    NutritionResponse,
};

#[derive(Clone, Debug)]
pub enum Scripted<T> {
    Ok(T),
    NotFound,
    ServerError,
    Timeout,
}

impl<T: Clone> Scripted<T> {
    fn produce(&self) -> ApiResult<T> {
        match self {
            Scripted::Ok(value) => Ok(value.clone()),
            Scripted::NotFound => Err(ApiError::NotFound),
            Scripted::ServerError => Err(ApiError::Server { status: 500 }),
            Scripted::Timeout => Err(ApiError::Timeout),
        }
    }
}

pub fn sample_nutrition(food_name: &str, weight_grams: f64) -> CalculatedNutrition {
    CalculatedNutrition {
        food_name: food_name.to_string(),
        weight_grams,
        energy: Some(weight_grams * 1.234),
        protein: Some(weight_grams * 0.051),
        fat: Some(weight_grams * 0.026),
        carbohydrate: Some(weight_grams * 0.149),
        ..Default::default()
    }
}

pub fn sample_composition(food_name: &str) -> ComplexFood {
    ComplexFood {
        food_name: food_name.to_string(),
        compositions: vec![
            FoodComposition {
                ingredient_name: "감자".to_string(),
                percentage: 60.0,
                unit: "g".to_string(),
            },
            FoodComposition {
                ingredient_name: "마요네즈".to_string(),
                percentage: 40.0,
                unit: "g".to_string(),
            },
        ],
        total_weight: 100.0,
        description: None,
    }
}

/// In-memory backend. Calculations succeed with [`sample_nutrition`] unless scripted.
#[derive(Default)]
pub struct FakeBackend {
    foods: Option<Scripted<Vec<String>>>,
    compositions: HashMap<String, ComplexFood>,
    calculate: Option<Scripted<NutritionResponse>>,
    health: Mutex<VecDeque<Scripted<Value>>>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_foods(mut self, foods: Scripted<Vec<String>>) -> Self {
        self.foods = Some(foods);
        self
    }

    pub fn with_composition(mut self, composition: ComplexFood) -> Self {
        self.compositions
            .insert(composition.food_name.clone(), composition);
        self
    }

    pub fn with_calculate(mut self, response: Scripted<NutritionResponse>) -> Self {
        self.calculate = Some(response);
        self
    }

    /// Queue health results; once drained, health checks succeed.
    pub fn with_health(self, results: Vec<Scripted<Value>>) -> Self {
        *self.health.lock().unwrap() = results.into();
        self
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    fn record(&self, operation: &'static str) {
        *self.calls.lock().unwrap().entry(operation).or_default() += 1;
    }

    fn calculate_for(&self, food_name: &str, weight_grams: f64) -> ApiResult<NutritionResponse> {
        match &self.calculate {
            Some(script) => script.produce(),
            None => Ok(NutritionResponse {
                success: true,
                message: "ok".to_string(),
                data: Some(sample_nutrition(food_name, weight_grams)),
            }),
        }
    }
}

impl NutritionBackend for FakeBackend {
    async fn health_check(&self) -> ApiResult<Value> {
        self.record("health_check");
        match self.health.lock().unwrap().pop_front() {
            Some(script) => script.produce(),
            None => Ok(json!({ "status": "healthy" })),
        }
    }

    async fn list_foods(&self) -> ApiResult<Vec<String>> {
        self.record("list_foods");
        match &self.foods {
            Some(script) => script.produce(),
            None => Ok(self.compositions.keys().cloned().collect()),
        }
    }

    async fn food_composition(&self, food_name: &str) -> ApiResult<ComplexFood> {
        self.record("food_composition");
        self.compositions
            .get(food_name)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn calculate_nutrition(
        &self,
        request: &NutritionCalculationRequest,
    ) -> ApiResult<NutritionResponse> {
        self.record("calculate_nutrition");
        self.calculate_for(&request.food_name, request.weight_grams)
    }

    async fn calculate_nutrition_by_path(
        &self,
        food_name: &str,
        weight_grams: f64,
    ) -> ApiResult<NutritionResponse> {
        self.record("calculate_nutrition_by_path");
        self.calculate_for(food_name, weight_grams)
    }

    async fn ingredient_nutrition(&self, ingredient_name: &str) -> ApiResult<Value> {
        self.record("ingredient_nutrition");
        Ok(json!({
            "success": true,
            "message": "ok",
            "data": { "food_code": "R0001", "food_name": ingredient_name, "energy": 66.0 }
        }))
    }
}

/// Serves exactly one connection on 127.0.0.1, then exits.
pub struct CannedServer {
    addr: SocketAddr,
    captured: mpsc::Receiver<String>,
}

impl CannedServer {
    pub fn respond(status: u16, body: &str) -> Self {
        let body = body.to_string();
        Self::spawn(move |mut stream, captured| {
            let request = read_request(&mut stream);
            let _ = captured.send(request);
            let response = format!(
                "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        })
    }

    /// Accepts the connection and never answers.
    pub fn stall(hold_for: Duration) -> Self {
        Self::spawn(move |stream, _| {
            std::thread::sleep(hold_for);
            drop(stream);
        })
    }

    fn spawn<F>(handler: F) -> Self
    where
        F: FnOnce(TcpStream, mpsc::Sender<String>) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                handler(stream, tx);
            }
        });
        Self { addr, captured: rx }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// The raw request the server received.
    pub fn request(&self) -> String {
        self.captured
            .recv_timeout(Duration::from_secs(5))
            .unwrap_or_default()
    }
}

fn read_request(stream: &mut TcpStream) -> String {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let mut data = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        if let Some(header_end) = find_header_end(&data) {
            let head = String::from_utf8_lossy(&data[..header_end]).to_ascii_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if data.len() >= header_end + 4 + body_len {
                break;
            }
        }
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => data.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&data).into_owned()
}

fn find_header_end(data: &[u8]) -> Option<usize> {
    data.windows(4).position(|w| w == b"\r\n\r\n")
}
