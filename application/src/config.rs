//! [`Config`]-related definitions.

use std::time;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use service::infra::postgres;
use smart_default::SmartDefault;

/// Settings of the whole server.
///
/// Every field may be omitted, so an empty file (or no file at all) yields
/// a server listening on `0.0.0.0:8080` against a local Postgres.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listener settings.
    pub server: Server,

    /// Business [`service`] settings.
    pub service: Service,

    /// Database settings.
    pub postgres: Postgres,

    /// Logging settings.
    pub log: Log,
}

impl Config {
    /// Reads the [`Config`] from the TOML file at `path`, then overrides it
    /// with `CONF.`-prefixed environment variables, e.g.
    /// `CONF.POSTGRES.HOST=db`.
    ///
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// If the file or some variable holds a value of a wrong type.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        let file = config::File::with_name(path.as_ref()).required(false);
        let env = config::Environment::with_prefix("CONF").separator(".");
        ConfigBuilder::<DefaultState>::default()
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}

/// HTTP listener settings.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Address to listen on.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to listen on.
    #[default(8080)]
    pub port: u16,

    /// Origins allowed to call the API from a browser, `*` meaning any.
    #[default(vec!["*".to_owned()])]
    pub cors_origins: Vec<String>,

    /// Time given to in-flight requests to finish once a shutdown signal is
    /// received.
    #[default(time::Duration::from_secs(10))]
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: time::Duration,
}

/// Business [`service`] settings.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Service {
    /// Secret signing customer session tokens.
    #[default("secret".to_owned())]
    pub jwt_secret: String,

    /// Lifetime of a customer session.
    #[default(time::Duration::from_secs(30 * 60))]
    #[serde(with = "humantime_serde")]
    pub session_ttl: time::Duration,
}

impl From<Service> for service::Config {
    fn from(conf: Service) -> Self {
        let secret = conf.jwt_secret.as_bytes();
        Self {
            jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(secret),
            jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(secret),
            session_ttl: conf.session_ttl,
        }
    }
}

/// Database settings.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Postgres {
    /// Database server host.
    #[default("127.0.0.1".to_owned())]
    pub host: String,

    /// Database server port.
    #[default(5432)]
    pub port: u16,

    /// Role to log in as.
    #[default("postgres".to_owned())]
    pub user: String,

    /// Password of the [`Postgres::user`].
    #[default("postgres".to_owned())]
    pub password: String,

    /// Database holding the hotel data.
    #[default("postgres".to_owned())]
    pub dbname: String,

    /// Maximum number of pooled connections.
    #[default(16)]
    pub pool_size: usize,
}

impl From<Postgres> for postgres::Config {
    fn from(conf: Postgres) -> Self {
        Self {
            host: Some(conf.host),
            port: Some(conf.port),
            user: Some(conf.user),
            password: Some(conf.password),
            dbname: Some(conf.dbname),
            pool: Some(postgres::PoolConfig::new(conf.pool_size)),
            ..Self::default()
        }
    }
}

/// Logging settings.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Log {
    /// Most verbose level to print.
    pub level: LogLevel,

    /// Whether to colorize the output.
    #[default(true)]
    pub ansi: bool,
}

/// Verbosity of the log output, from the most to the least verbose.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Every span and event.
    Trace,

    /// Diagnostics useful while developing.
    Debug,

    /// Served requests and lifecycle events.
    #[default]
    Info,

    /// Failed requests and recoverable problems.
    Warn,

    /// Failures only.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use config::{File, FileFormat};

    use super::{Config, LogLevel};

    fn parse(toml: &str) -> Config {
        config::Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn fills_missing_fields_with_defaults() {
        let conf = parse("[service]\nsession_ttl = \"1h 30m\"\n");

        assert_eq!(conf.service.session_ttl, Duration::from_secs(90 * 60));
        assert_eq!(conf.service.jwt_secret, "secret");
        assert_eq!(conf.server.port, 8080);
        assert_eq!(conf.server.cors_origins, ["*"]);
        assert_eq!(conf.postgres.port, 5432);
        assert_eq!(conf.postgres.pool_size, 16);
        assert!(conf.log.ansi);
    }

    #[test]
    fn defaults_session_ttl_to_half_an_hour() {
        assert_eq!(
            Config::default().service.session_ttl,
            Duration::from_secs(30 * 60),
        );
    }

    #[test]
    fn parses_log_level() {
        let conf = parse("[log]\nlevel = \"WARN\"\nansi = false\n");

        assert!(matches!(conf.log.level, LogLevel::Warn));
        assert_eq!(tracing::Level::from(conf.log.level), tracing::Level::WARN);
        assert!(!conf.log.ansi);
    }

    #[test]
    fn maps_pool_size() {
        let conf = parse("[postgres]\nhost = \"db\"\npool_size = 4\n");
        let pg = service::infra::postgres::Config::from(conf.postgres);

        assert_eq!(pg.host.as_deref(), Some("db"));
        assert_eq!(pg.pool.map(|p| p.max_size), Some(4));
    }
}
