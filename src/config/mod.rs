/// Database connection and schema creation
pub mod database;

/// Application settings from defaults, inventory.toml and the environment
pub mod settings;

pub use settings::{AppConfig, load_app_configuration};
