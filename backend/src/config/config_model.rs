use domain::value_objects::enums::trial_window_units::TrialWindowUnit;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Database,
    pub supabase: Supabase,
    pub trial: Trial,
    pub paypal: PayPal,
    pub groq: Groq,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Supabase {
    pub jwt_secret: String,
}

/// Trial gating knobs. `disabled` is the operational kill-switch that grants
/// everyone full access without consulting the store.
#[derive(Debug, Clone)]
pub struct Trial {
    pub window_length: i64,
    pub window_unit: TrialWindowUnit,
    pub disabled: bool,
}

#[derive(Debug, Clone)]
pub struct PayPal {
    pub client_id: String,
    pub secret: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct Groq {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
}
