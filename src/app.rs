use std::process::ExitCode;

use crate::api::NutritionBackend;
use crate::calculator::{Calculator, Transport};
use crate::cli::{CalcArgs, Cli, Command, HealthArgs};
use crate::client::ApiClient;
use crate::history::History;
use crate::interactive;
use crate::messages;
use crate::metadata::{PKG_NAME, PKG_VERSION};
use crate::query::QueryClient;
use crate::render;

pub type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Build the shared client and history once, then run one command against them.
pub async fn run(cli: Cli) -> AppResult<ExitCode> {
    cli.global.validate()?;

    let client = ApiClient::new(cli.global.client_config());
    let history = History::new(cli.global.local_storage());
    tracing::debug!(base_url = client.base_url(), storage = %history.storage().path().display(), "client ready");

    let code = match cli.command {
        Command::Calc(args) => calc(client, history, args).await,
        Command::Foods => {
            let query = QueryClient::new(client);
            match query.foods().await {
                Ok(foods) => success(render::foods(&foods)),
                Err(e) => failure(&e.to_string()),
            }
        }
        Command::Composition { food_name } => {
            let query = QueryClient::new(client);
            match query.food_composition(&food_name).await {
                Ok(Some(food)) => success(render::composition(&food, food.total_weight)),
                Ok(None) => failure(messages::EMPTY_FOOD_NAME),
                Err(e) => failure(&e.to_string()),
            }
        }
        Command::Ingredient { ingredient_name } => {
            match client.ingredient_nutrition(&ingredient_name).await {
                Ok(payload) => success(render::ingredient(&payload)),
                Err(e) => failure(&e.to_string()),
            }
        }
        Command::Health(args) => health(client, args).await,
        Command::History { clear } => {
            if clear {
                history.clear()?;
            }
            success(render::history(&history.load()))
        }
        Command::Interactive => {
            let mut calc = Calculator::new(client, history);
            interactive::run(&mut calc).await?;
            ExitCode::SUCCESS
        }
        Command::Version => success(format!("{PKG_NAME} {PKG_VERSION}\n")),
    };
    Ok(code)
}

async fn calc(client: ApiClient, history: History, args: CalcArgs) -> ExitCode {
    let transport = if args.get {
        Transport::Path
    } else {
        Transport::Post
    };
    let mut calc = Calculator::new(client, history).with_transport(transport);
    calc.set_food_name(args.food_name);
    calc.set_weight(args.weight);
    if args.details {
        calc.toggle_ingredient_details();
    }

    calc.calculate().await;
    print!("{}", render::screen(&calc));

    if calc.error().is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn health(client: ApiClient, args: HealthArgs) -> ExitCode {
    let query = QueryClient::new(client);
    if !args.watch {
        return match query.health().await {
            Ok(status) => success(render::pretty(&status)),
            Err(e) => failure(&e.to_string()),
        };
    }

    let mut failed = false;
    query
        .watch_health(args.interval(), args.count, |result| match result {
            Ok(status) => {
                failed = false;
                print!("{}", render::pretty(status));
            }
            Err(e) => {
                failed = true;
                eprint!("{}", render::error(&e.to_string()));
            }
        })
        .await;

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn success(output: String) -> ExitCode {
    print!("{output}");
    ExitCode::SUCCESS
}

fn failure(message: &str) -> ExitCode {
    eprint!("{}", render::error(message));
    ExitCode::FAILURE
}
