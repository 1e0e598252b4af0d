//! Prompt-driven calculator session over [`Calculator`].

use dialoguer::{FuzzySelect, Input, Select, theme::ColorfulTheme};

use crate::api::NutritionBackend;
use crate::calculator::Calculator;
use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    EnterFood,
    PickFood,
    EnterWeight,
    Calculate,
    ToggleDetails,
    ToggleHistory,
    Quit,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::EnterFood,
        Action::PickFood,
        Action::EnterWeight,
        Action::Calculate,
        Action::ToggleDetails,
        Action::ToggleHistory,
        Action::Quit,
    ];

    pub fn label(self, show_details: bool, show_history: bool) -> &'static str {
        match self {
            Action::EnterFood => "음식 이름 입력",
            Action::PickFood => "목록에서 음식 선택",
            Action::EnterWeight => "중량 (g) 입력",
            Action::Calculate => "계산하기",
            Action::ToggleDetails if show_details => "재료별 영양성분 숨기기",
            Action::ToggleDetails => "재료별 영양성분 보기",
            Action::ToggleHistory if show_history => "계산 기록 숨기기",
            Action::ToggleHistory => "계산 기록 보기",
            Action::Quit => "종료",
        }
    }
}

/// Mount the calculator, then loop until the user quits or input is closed.
pub async fn run<B: NutritionBackend>(calc: &mut Calculator<B>) -> dialoguer::Result<()> {
    let theme = ColorfulTheme::default();
    calc.mount().await;
    if !calc.available_foods().is_empty() {
        print!("{}", render::foods(calc.available_foods()));
    }

    loop {
        let labels: Vec<&str> = Action::ALL
            .iter()
            .map(|a| a.label(calc.show_ingredient_details(), calc.show_history()))
            .collect();
        let Some(choice) = Select::with_theme(&theme)
            .with_prompt("영양성분 계산기")
            .items(&labels)
            .default(3)
            .interact_opt()?
        else {
            break;
        };

        match Action::ALL[choice] {
            Action::EnterFood => {
                let name: String = Input::with_theme(&theme)
                    .with_prompt("음식 이름")
                    .with_initial_text(calc.food_name())
                    .allow_empty(true)
                    .interact_text()?;
                calc.set_food_name(name);
            }
            Action::PickFood => {
                if calc.available_foods().is_empty() {
                    println!("사용 가능한 음식 목록이 없습니다.");
                    continue;
                }
                let picked = FuzzySelect::with_theme(&theme)
                    .with_prompt("사용 가능한 음식")
                    .items(calc.available_foods())
                    .interact_opt()?;
                if let Some(index) = picked {
                    calc.select_food(index);
                }
            }
            Action::EnterWeight => {
                let input: String = Input::with_theme(&theme)
                    .with_prompt("중량 (g)")
                    .with_initial_text(calc.weight_grams().to_string())
                    .interact_text()?;
                // An unparseable weight leaves the error on screen.
                let _ = calc.set_weight_input(&input);
            }
            Action::Calculate => {
                if calc.can_submit() {
                    println!("계산 중...");
                    calc.calculate().await;
                }
            }
            Action::ToggleDetails => calc.toggle_ingredient_details(),
            Action::ToggleHistory => calc.toggle_history(),
            Action::Quit => break,
        }

        println!();
        print!("{}", render::screen(calc));
    }
    Ok(())
}
