use core_config::{AppInfo, FromEnv, app_info, env_flag, server::ServerConfig};
use database::postgres::PostgresConfig;
use database::redis::RedisConfig;
use domain_catalog::{CatalogConfig, ElasticsearchConfig};

pub use core_config::Environment;

/// Application configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub redis: RedisConfig,
    pub elasticsearch: ElasticsearchConfig,
    pub catalog: CatalogConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Apply pending migrations at startup (`RUN_MIGRATIONS`, default true)
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - will fail if not set
        let redis = RedisConfig::from_env()?; // Required - will fail if not set
        let elasticsearch = ElasticsearchConfig::from_env()?; // Required - will fail if not set
        let catalog = CatalogConfig::from_env()?;
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080

        Ok(Self {
            app: app_info!(),
            database,
            redis,
            elasticsearch,
            catalog,
            server,
            environment,
            run_migrations: env_flag("RUN_MIGRATIONS", true)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [(&str, Option<&str>); 3] = [
        ("DATABASE_URL", Some("postgres://catalog:secret@db:5432/catalog")),
        ("REDIS_URL", Some("redis://cache:6379")),
        ("ELASTICSEARCH_URL", Some("http://search:9200")),
    ];

    #[test]
    fn test_config_from_env_defaults() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("CACHE_TTL_SECONDS", None),
            ("RUN_MIGRATIONS", None),
            ("PORT", None),
            ("ELASTICSEARCH_INDEX", None),
        ]);

        temp_env::with_vars(vars, || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.app.name, "catalog_api");
            assert_eq!(config.catalog.cache_ttl_seconds, 60);
            assert_eq!(config.elasticsearch.index, "product_variants");
            assert_eq!(config.server.port, 8080);
            assert!(config.run_migrations);
        });
    }

    #[test]
    fn test_config_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("CACHE_TTL_SECONDS", Some("120")),
            ("RUN_MIGRATIONS", Some("false")),
            ("PORT", Some("9000")),
        ]);

        temp_env::with_vars(vars, || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.catalog.cache_ttl_seconds, 120);
            assert_eq!(config.server.port, 9000);
            assert!(!config.run_migrations);
        });
    }

    #[test]
    fn test_config_requires_search_engine_url() {
        let mut vars = REQUIRED.to_vec();
        vars[2].1 = None;

        temp_env::with_vars(vars, || {
            assert!(Config::from_env().is_err());
        });
    }
}
