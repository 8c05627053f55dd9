use anyhow::{Ok, Result};
use domain::value_objects::{
    entitlements::TrialWindow, enums::trial_window_units::TrialWindowUnit,
};

use super::config_model::DotEnvyConfig;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = super::config_model::BackendServer {
        port: std::env::var("SERVER_PORT_BACKEND")
            .expect("SERVER_PORT_BACKEND is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = super::config_model::Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let supabase = super::config_model::Supabase {
        jwt_secret: std::env::var("SUPABASE_JWT_SECRET").expect("SUPABASE_JWT_SECRET is invalid"),
    };

    let trial = super::config_model::Trial {
        window_length: std::env::var("TRIAL_WINDOW_LENGTH")
            .unwrap_or_else(|_| TrialWindow::DEFAULT_LENGTH_DAYS.to_string())
            .parse()?,
        window_unit: TrialWindowUnit::from_str(
            &std::env::var("TRIAL_WINDOW_UNIT").unwrap_or_else(|_| "days".to_string()),
        )
        .expect("TRIAL_WINDOW_UNIT is invalid"),
        disabled: std::env::var("DISABLE_GATING")
            .map(|value| value.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false),
    };

    let paypal = super::config_model::PayPal {
        client_id: std::env::var("PAYPAL_CLIENT_ID").expect("PAYPAL_CLIENT_ID is invalid"),
        secret: std::env::var("PAYPAL_SECRET").expect("PAYPAL_SECRET is invalid"),
        api_base: std::env::var("PAYPAL_API_BASE")
            .unwrap_or_else(|_| "https://api-m.sandbox.paypal.com".to_string()),
    };

    let groq = super::config_model::Groq {
        api_key: std::env::var("GROQ_API_KEY").expect("GROQ_API_KEY is invalid"),
        api_base: std::env::var("GROQ_API_BASE")
            .unwrap_or_else(|_| "https://api.groq.com/openai/v1".to_string()),
        model: std::env::var("GROQ_MODEL")
            .unwrap_or_else(|_| "meta-llama/llama-4-scout-17b-16e-instruct".to_string()),
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        supabase,
        trial,
        paypal,
        groq,
    })
}

pub fn get_jwt_secret() -> Result<String> {
    dotenvy::dotenv().ok();

    Ok(std::env::var("SUPABASE_JWT_SECRET").expect("SUPABASE_JWT_SECRET is invalid"))
}
