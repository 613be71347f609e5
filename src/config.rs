// Application configuration, loaded with the 'config' crate and 'dotenv'

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server_address: String,
    /// Base URL of the hosted Supabase project, e.g. https://xyz.supabase.co
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// Needed to verify session tokens; pages that take no session work
    /// without it.
    pub supabase_jwt_secret: Option<String>,
    pub storage_bucket: String,
}

impl Settings {
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let builder = Config::builder()
            // Add default values
            .set_default("server_address", "127.0.0.1:3000")?
            .set_default("storage_bucket", "listing-images")?
            // Load from a configuration file (e.g., config.toml)
            .add_source(File::with_name("config").required(false))
            // Load from environment variables (e.g., APP_SUPABASE_URL)
            .add_source(Environment::with_prefix("APP"));

        let settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }
}
