use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Deserialize, Debug)]
pub struct Config {
    /// Path of the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// The acting user; single-user installs keep the nil default.
    #[serde(default = "default_user_id")]
    pub user_id: Uuid,
}

fn default_database_path() -> String {
    "jour.db".to_string()
}

fn default_user_id() -> Uuid {
    Uuid::nil()
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("jour.toml"))
            .merge(Env::prefixed("JOUR_"))
            .extract()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            user_id: default_user_id(),
        }
    }
}
