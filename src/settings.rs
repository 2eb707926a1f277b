use config::{Config, ConfigError, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    // env vars always come in as strings
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub questions_per_page: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_per_page: i64,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 8080,
            questions_per_page: 10,
            max_per_page: 100,
        }
    }
}

#[derive(Deserialize)]
pub struct DatabaseSettings {
    pub url: SecretString,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_connections: u32,
}

/// Reads settings from defaults, an optional `trivia.{toml,yaml,json}` file and
/// `TRIVIA_`-prefixed environment variables, in that order of precedence.
pub fn get_settings() -> Result<Settings, ConfigError> {
    dotenv::dotenv().ok();
    let defaults = ApplicationSettings::default();

    Config::builder()
        .set_default("application.host", defaults.host)?
        .set_default("application.port", i64::from(defaults.port))?
        .set_default("application.questions_per_page", defaults.questions_per_page)?
        .set_default("application.max_per_page", defaults.max_per_page)?
        .set_default("database.url", "sqlite:trivia.db")?
        .set_default("database.max_connections", 5)?
        .add_source(File::with_name("trivia").required(false))
        .add_source(
            Environment::with_prefix("TRIVIA")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn defaults_are_used_without_overrides() {
        let settings = get_settings().unwrap();
        assert!(!settings.database.url.expose_secret().is_empty());
        assert!(settings.application.questions_per_page > 0);
        assert!(settings.application.max_per_page >= settings.application.questions_per_page);
    }

    #[test]
    fn address_joins_host_and_port() {
        let app = ApplicationSettings {
            host: "127.0.0.1".to_owned(),
            port: 3000,
            ..Default::default()
        };
        assert_eq!(app.address(), "127.0.0.1:3000");
    }
}
