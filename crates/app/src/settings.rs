//! Application settings, read from `settings.toml` (or the file named by
//! `DIVVY_CONFIG`) and overridden by `DIVVY__`-prefixed environment
//! variables, e.g. `DIVVY__SERVER__PORT=8080`.
use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Option<Server>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let path = std::env::var("DIVVY_CONFIG").unwrap_or_else(|_| "settings".to_string());
        Self::from_config(
            Config::builder()
                .add_source(File::with_name(&path).required(false))
                .add_source(
                    Environment::with_prefix("DIVVY")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    fn from_config(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .set_default("app.level", "info")?
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Settings {
        Settings::from_config(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
            .unwrap()
    }

    #[test]
    fn defaults_to_info_without_server() {
        let settings = parse("");
        assert_eq!(settings.app.level, "info");
        assert!(settings.server.is_none());
    }

    #[test]
    fn reads_sqlite_server() {
        let settings = parse(
            r#"
            [app]
            level = "debug"

            [server]
            port = 3000
            database = { sqlite = "divvy.db" }
            "#,
        );
        assert_eq!(settings.app.level, "debug");
        let server = settings.server.unwrap();
        assert_eq!(server.port, 3000);
        assert!(server.bind.is_none());
        assert!(matches!(server.database, Database::Sqlite(ref path) if path == "divvy.db"));
    }

    #[test]
    fn reads_memory_database() {
        let settings = parse(
            r#"
            [server]
            bind = "0.0.0.0"
            port = 8080
            database = "memory"
            "#,
        );
        let server = settings.server.unwrap();
        assert_eq!(server.bind.as_deref(), Some("0.0.0.0"));
        assert!(matches!(server.database, Database::Memory));
    }
}
