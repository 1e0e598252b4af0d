//! Terminal rendering. Everything returns a `String`; printing is the caller's job.

use std::fmt::Write as _;

use colored::Colorize;
use serde_json::Value;

use crate::api::NutritionBackend;
use crate::calculator::Calculator;
use crate::messages;
use crate::types::{
    CalculatedNutrition, ComplexFood, CompositionDetail, IngredientResponse, SavedNutrition,
};

/// One decimal place; unknown values render as `-`, never as zero.
pub fn value(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.1}"),
        None => "-".to_string(),
    }
}

fn line(label: &str, v: Option<f64>, unit: &str) -> String {
    let shown = match v {
        Some(_) => format!("{} {unit}", value(v)),
        None => value(v),
    };
    format!("  {label:<10} {:>12}\n", shown.bold())
}

pub fn nutrition(n: &CalculatedNutrition) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        format!("영양성분 정보 ({} {}g)", n.food_name, n.weight_grams).bold()
    );

    let _ = writeln!(
        out,
        "  {} 칼로리 (kcal)   {} 단백질 (g)   {} 탄수화물 (g)   {} 지방 (g)",
        value(n.energy).red().bold(),
        value(n.protein).blue().bold(),
        value(n.carbohydrate).yellow().bold(),
        value(n.fat).green().bold(),
    );

    out.push_str("\n미네랄\n");
    out.push_str(&line("칼슘", n.calcium, "mg"));
    out.push_str(&line("철분", n.iron, "mg"));
    out.push_str(&line("나트륨", n.sodium, "mg"));
    out.push_str(&line("칼륨", n.potassium, "mg"));

    out.push_str("\n비타민 & 기타\n");
    out.push_str(&line("비타민 A", n.vitamin_a, "μg"));
    out.push_str(&line("비타민 C", n.vitamin_c, "mg"));
    out.push_str(&line("당류", n.sugar, "g"));
    out.push_str(&line("식이섬유", n.dietary_fiber, "g"));
    out
}

/// Ingredient shares, each with the grams it contributes to `weight_grams`.
pub fn composition(food: &ComplexFood, weight_grams: f64) -> String {
    let mut out = format!("{}\n", "원재료 구성".bold());
    for part in &food.compositions {
        let grams = weight_grams * part.percentage / 100.0;
        let _ = writeln!(
            out,
            "  {:<12} {:>6}%  {:>8}g",
            part.ingredient_name,
            part.percentage.to_string().cyan().bold(),
            format!("{grams:.1}")
        );
    }
    out
}

pub fn ingredient_table(details: &[CompositionDetail]) -> String {
    let mut out = format!("{}\n", "재료별 영양성분".bold());
    let _ = writeln!(
        out,
        "  {:<12} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "재료", "중량(g)", "칼로리", "단백질", "탄수화물", "지방"
    );
    for d in details {
        let _ = writeln!(
            out,
            "  {:<12} {:>8} {:>8} {:>8} {:>8} {:>8}",
            d.ingredient_name,
            format!("{:.1}", d.weight),
            value(d.energy),
            grams(d.protein),
            grams(d.carbohydrate),
            grams(d.fat),
        );
    }
    out
}

fn grams(v: Option<f64>) -> String {
    match v {
        Some(_) => format!("{}g", value(v)),
        None => value(v),
    }
}

pub fn history(saved: &[SavedNutrition]) -> String {
    if saved.is_empty() {
        return format!("{}\n", messages::NO_HISTORY.dimmed());
    }
    let mut out = String::new();
    for entry in saved {
        let data = &entry.data;
        let _ = writeln!(
            out,
            "  {} ({}g)  {}",
            data.food_name.bold(),
            data.weight_grams,
            entry.timestamp.dimmed()
        );
        let _ = writeln!(
            out,
            "    {} kcal  P:{}g C:{}g F:{}g",
            value(data.energy).red().bold(),
            value(data.protein),
            value(data.carbohydrate),
            value(data.fat)
        );
    }
    out
}

pub fn foods(foods: &[String]) -> String {
    let mut out = format!("{}\n", "사용 가능한 음식:".blue().bold());
    for (i, food) in foods.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {food}", i + 1);
    }
    out
}

/// Single-ingredient payload. Falls back to pretty JSON for unexpected shapes.
pub fn ingredient(payload: &Value) -> String {
    match IngredientResponse::from_value(payload) {
        Some(IngredientResponse {
            data: Some(info), ..
        }) => {
            let mut out = format!(
                "{}\n",
                format!("{} ({})", info.food_name, info.food_code).bold()
            );
            if let Some(base) = &info.nutrition_base_amount {
                let _ = writeln!(out, "  기준량 {base}");
            }
            out.push_str(&line("칼로리", info.energy, "kcal"));
            out.push_str(&line("단백질", info.protein, "g"));
            out.push_str(&line("탄수화물", info.carbohydrate, "g"));
            out.push_str(&line("지방", info.fat, "g"));
            out.push_str(&line("당류", info.sugar, "g"));
            out.push_str(&line("식이섬유", info.dietary_fiber, "g"));
            out.push_str(&line("칼슘", info.calcium, "mg"));
            out.push_str(&line("철분", info.iron, "mg"));
            out.push_str(&line("나트륨", info.sodium, "mg"));
            out.push_str(&line("칼륨", info.potassium, "mg"));
            out.push_str(&line("비타민 A", info.vitamin_a, "μg"));
            out.push_str(&line("비타민 C", info.vitamin_c, "mg"));
            if let Some(source) = &info.source_name {
                let _ = writeln!(out, "  출처 {}", source.dimmed());
            }
            out
        }
        Some(IngredientResponse { message, .. }) => format!("{message}\n"),
        None => pretty(payload),
    }
}

pub fn pretty(payload: &Value) -> String {
    let mut out = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    out.push('\n');
    out
}

pub fn error(message: &str) -> String {
    format!("{}\n", message.red())
}

/// The whole calculator screen for its current state.
pub fn screen<B: NutritionBackend>(calc: &Calculator<B>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "음식: {}  중량: {}g  {}",
        if calc.food_name().is_empty() {
            "-".dimmed().to_string()
        } else {
            calc.food_name().bold().to_string()
        },
        calc.weight_grams(),
        if calc.is_loading() { "계산 중..." } else { "" }
    );

    if !calc.error().is_empty() {
        out.push_str(&error(calc.error()));
    }

    if let Some(result) = calc.result() {
        out.push('\n');
        out.push_str(&nutrition(result));

        if let Some(food) = calc.composition() {
            out.push('\n');
            out.push_str(&composition(food, result.weight_grams));
            if calc.show_ingredient_details() {
                if let Some(details) = &result.composition_details {
                    out.push('\n');
                    out.push_str(&ingredient_table(details));
                }
            }
        }
    }

    if calc.show_history() {
        out.push('\n');
        out.push_str(&format!("{}\n", "계산 기록".bold()));
        out.push_str(&history(calc.saved()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::History;
    use crate::storage::LocalStorage;
    use crate::testing::{FakeBackend, Scripted, sample_composition};
    use crate::types::NutritionResponse;
    use serde_json::json;

    fn plain() {
        colored::control::set_override(false);
    }

    fn result_with(energy: f64, protein: f64, fat: f64, carbohydrate: f64) -> CalculatedNutrition {
        CalculatedNutrition {
            food_name: "감자샐러드".to_string(),
            weight_grams: 200.0,
            energy: Some(energy),
            protein: Some(protein),
            fat: Some(fat),
            carbohydrate: Some(carbohydrate),
            ..Default::default()
        }
    }

    #[test]
    fn headline_values_have_one_decimal() {
        plain();
        let out = nutrition(&result_with(250.46, 5.04, 12.96, 30.0));
        assert!(out.contains("영양성분 정보 (감자샐러드 200g)"));
        assert!(out.contains("250.5 칼로리"));
        assert!(out.contains("5.0 단백질"));
        assert!(out.contains("30.0 탄수화물"));
        assert!(out.contains("13.0 지방"));
    }

    #[test]
    fn unknown_nutrients_are_not_zero() {
        plain();
        let out = nutrition(&result_with(1.0, 1.0, 1.0, 1.0));
        assert!(!out.contains("0.0 mg"));
        assert!(out.contains("칼슘"));
        assert_eq!(value(None), "-");
        assert_eq!(value(Some(0.0)), "0.0");
    }

    #[test]
    fn composition_shows_share_and_grams() {
        plain();
        let out = composition(&sample_composition("감자샐러드"), 250.0);
        assert!(out.contains("감자"));
        assert!(out.contains("60%"));
        assert!(out.contains("150.0g"));
        assert!(out.contains("100.0g"));
    }

    #[test]
    fn ingredient_table_lists_each_detail() {
        plain();
        let out = ingredient_table(&[CompositionDetail {
            ingredient_name: "감자".to_string(),
            weight: 120.0,
            energy: Some(79.2),
            protein: Some(2.4),
            fat: None,
            carbohydrate: Some(18.0),
            ..Default::default()
        }]);
        assert!(out.contains("120.0"));
        assert!(out.contains("79.2"));
        assert!(out.contains("2.4g"));
        assert!(out.contains("18.0g"));
    }

    #[test]
    fn empty_history_has_placeholder() {
        plain();
        assert!(history(&[]).contains(messages::NO_HISTORY));
    }

    #[test]
    fn history_line_summarises_macros() {
        plain();
        let out = history(&[SavedNutrition {
            id: "1".to_string(),
            timestamp: "2025. 1. 1. 오전 9:00:00".to_string(),
            data: result_with(100.0, 1.26, 2.0, 3.0),
        }]);
        assert!(out.contains("감자샐러드 (200g)"));
        assert!(out.contains("100.0 kcal"));
        assert!(out.contains("P:1.3g C:3.0g F:2.0g"));
    }

    #[test]
    fn ingredient_payload_is_rendered() {
        plain();
        let out = ingredient(&json!({
            "success": true,
            "message": "ok",
            "data": { "food_code": "R0001", "food_name": "감자", "energy": 66.0 }
        }));
        assert!(out.contains("감자 (R0001)"));
        assert!(out.contains("66.0 kcal"));

        let odd = ingredient(&json!({ "anything": 1 }));
        assert!(odd.contains("\"anything\": 1"));
    }

    #[tokio::test]
    async fn rejected_calculation_renders_message_without_cards() {
        plain();
        let dir = tempfile::tempdir().unwrap();
        let backend = FakeBackend::new().with_calculate(Scripted::Ok(NutritionResponse {
            success: false,
            message: "M".to_string(),
            data: None,
        }));
        let mut calc = Calculator::new(
            backend,
            History::new(LocalStorage::new(dir.path().join("store.json"))),
        );
        calc.set_food_name("rice");
        calc.calculate().await;

        let out = screen(&calc);
        assert!(out.contains("M\n"));
        assert!(!out.contains("칼로리"));
    }

    #[tokio::test]
    async fn details_table_follows_toggle() {
        plain();
        let dir = tempfile::tempdir().unwrap();
        let mut nutrition = result_with(10.0, 1.0, 1.0, 1.0);
        nutrition.composition_details = Some(vec![CompositionDetail {
            ingredient_name: "감자".to_string(),
            weight: 120.0,
            ..Default::default()
        }]);
        let backend = FakeBackend::new()
            .with_composition(sample_composition("감자샐러드"))
            .with_calculate(Scripted::Ok(NutritionResponse {
                success: true,
                message: "ok".to_string(),
                data: Some(nutrition),
            }));
        let mut calc = Calculator::new(
            backend,
            History::new(LocalStorage::new(dir.path().join("store.json"))),
        );
        calc.set_food_name("감자샐러드");
        calc.calculate().await;

        assert!(screen(&calc).contains("원재료 구성"));
        assert!(!screen(&calc).contains("재료별 영양성분"));
        calc.toggle_ingredient_details();
        assert!(screen(&calc).contains("재료별 영양성분"));
    }
}
