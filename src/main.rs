use std::env;

use config::Config;
use dotenvy::dotenv;

use enquiry_desk::models::config::ClientConfig;
use enquiry_desk::repository::HttpRepository;
use enquiry_desk::services::enquiry_table::EnquiryTableController;
use enquiry_desk::shell::{Route, render_table};

#[tokio::main]
async fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        // Add `./config/default.yaml`
        .add_source(config::File::with_name("config/default").required(false))
        // Add environment-specific overrides
        .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
        // Add settings from the environment (with a prefix of APP)
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {}", err);
            std::process::exit(1);
        }
    };

    let client_config = match settings.try_deserialize::<ClientConfig>() {
        Ok(client_config) => client_config,
        Err(err) => {
            log::error!("Error loading client config: {}", err);
            std::process::exit(1);
        }
    };

    let route = match env::args().nth(1).unwrap_or_default().parse::<Route>() {
        Ok(route) => route,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(2);
        }
    };

    println!("== {} ==", route.title());
    if let Some(body) = route.placeholder() {
        println!("{body}");
        return;
    }

    let repo = match HttpRepository::new(&client_config) {
        Ok(repo) => repo,
        Err(err) => {
            log::error!("Failed to build HTTP client: {err}");
            std::process::exit(1);
        }
    };

    let mut table = match EnquiryTableController::from_config(&client_config) {
        Ok(table) => table,
        Err(err) => {
            log::error!("Invalid table settings: {err}");
            std::process::exit(1);
        }
    };

    log::info!("Loading enquiries from {}", repo.base_url());
    if let Err(err) = table.load(&repo).await {
        log::error!("Failed to load enquiries: {err}");
    }

    print!("{}", render_table(&table.page()));
    table.teardown();
}
