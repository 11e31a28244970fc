use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app_env: String,
    pub listen_addr: String,
    pub mongo_uri: String,
    pub mongo_database: String,
    pub jwt_secret: String,
    /// `username:password` guarding `/metrics`.
    pub metrics_auth: String,
    pub object_storage: ObjectStorageSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectStorageSettings {
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key: String,
    pub secret_key: String,
    /// Base that object URLs are published under. Defaults to `<endpoint>/<bucket>`.
    pub public_base_url: Option<String>,
    /// Tenant segment of archived answer keys (`focused/<account_id>/...`).
    pub account_id: String,
    pub timeout_secs: u64,
    /// Reject plain-HTTP endpoints.
    pub require_https: bool,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Try root .env first, then fallback to local .env
        let skip_root_env = env::var("SKIP_ROOT_ENV").is_ok();
        if skip_root_env {
            dotenvy::dotenv().ok();
        } else if dotenvy::from_path("../../.env").is_err() {
            dotenvy::dotenv().ok();
        }

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // config/*.toml, then APP__SECTION__KEY overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let listen_addr = settings
            .get_string("server.listen_addr")
            .or_else(|_| env::var("LISTEN_ADDR"))
            .unwrap_or_else(|_| "0.0.0.0:8081".to_string());

        let mongo_uri = settings
            .get_string("database.mongo_uri")
            .or_else(|_| env::var("MONGO_URI"))
            .map_err(|_| config::ConfigError::NotFound("database.mongo_uri".into()))?;

        let mongo_database = settings
            .get_string("database.mongo_database")
            .or_else(|_| env::var("MONGO_DATABASE"))
            .unwrap_or_else(|_| "focused".to_string());

        let jwt_secret = match settings
            .get_string("auth.jwt_secret")
            .or_else(|_| env::var("JWT_SECRET"))
        {
            Ok(secret) => secret,
            Err(_) if app_env == "prod" => {
                return Err(config::ConfigError::Message(
                    "JWT_SECRET must be set in production".into(),
                ))
            }
            Err(_) => {
                eprintln!("WARNING: Using default JWT_SECRET (dev mode only!)");
                "dev-secret-only-for-local-testing".to_string()
            }
        };

        let metrics_auth = match settings
            .get_string("metrics.auth")
            .or_else(|_| env::var("METRICS_AUTH"))
        {
            Ok(credentials) => credentials,
            Err(_) if app_env == "prod" => {
                return Err(config::ConfigError::Message(
                    "METRICS_AUTH must be set in production".into(),
                ))
            }
            Err(_) => {
                eprintln!("WARNING: Using default METRICS_AUTH (dev mode only!)");
                "admin:changeme".to_string()
            }
        };

        let object_storage = ObjectStorageSettings::from_settings(&settings, &app_env)?;

        Ok(Config {
            app_env,
            listen_addr,
            mongo_uri,
            mongo_database,
            jwt_secret,
            metrics_auth,
            object_storage,
        })
    }
}

impl ObjectStorageSettings {
    fn from_settings(
        settings: &config::Config,
        app_env: &str,
    ) -> Result<Self, config::ConfigError> {
        let required = |key: &str, var: &str| {
            settings
                .get_string(&format!("object_storage.{}", key))
                .or_else(|_| env::var(var))
                .map_err(|_| config::ConfigError::NotFound(format!("object_storage.{}", key)))
        };
        let optional = |key: &str, var: &str| {
            settings
                .get_string(&format!("object_storage.{}", key))
                .or_else(|_| env::var(var))
                .ok()
        };

        let timeout_secs = settings
            .get_int("object_storage.timeout_secs")
            .ok()
            .and_then(|value| u64::try_from(value).ok())
            .unwrap_or(10);

        Ok(Self {
            bucket: required("bucket", "S3_BUCKET")?,
            region: optional("region", "S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            endpoint: optional("endpoint", "S3_ENDPOINT"),
            access_key: required("access_key", "S3_ACCESS_KEY")?,
            secret_key: required("secret_key", "S3_SECRET_KEY")?,
            public_base_url: optional("public_base_url", "S3_PUBLIC_BASE_URL"),
            account_id: required("account_id", "FOCUSED_ACCOUNT_ID")?,
            timeout_secs,
            require_https: settings
                .get_bool("object_storage.require_https")
                .unwrap_or(app_env == "prod"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 9] = [
        "MONGO_URI",
        "S3_BUCKET",
        "S3_ACCESS_KEY",
        "S3_SECRET_KEY",
        "FOCUSED_ACCOUNT_ID",
        "JWT_SECRET",
        "METRICS_AUTH",
        "APP_ENV",
        "SKIP_ROOT_ENV",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn set_required_env() {
        env::set_var("SKIP_ROOT_ENV", "1");
        env::set_var("MONGO_URI", "mongodb://localhost:27017");
        env::set_var("S3_BUCKET", "focused-content");
        env::set_var("S3_ACCESS_KEY", "key");
        env::set_var("S3_SECRET_KEY", "secret");
        env::set_var("FOCUSED_ACCOUNT_ID", "acct-1");
    }

    #[test]
    #[serial_test::serial]
    fn loads_from_plain_env_vars() {
        clear_env();
        set_required_env();

        let config = Config::load().expect("config should load");
        assert_eq!(config.app_env, "dev");
        assert_eq!(config.mongo_database, "focused");
        assert_eq!(config.listen_addr, "0.0.0.0:8081");
        assert_eq!(config.object_storage.bucket, "focused-content");
        assert_eq!(config.object_storage.account_id, "acct-1");
        assert_eq!(config.object_storage.timeout_secs, 10);
        assert!(!config.object_storage.require_https);
        assert_eq!(config.metrics_auth, "admin:changeme");

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn missing_account_id_is_an_error() {
        clear_env();
        set_required_env();
        env::remove_var("FOCUSED_ACCOUNT_ID");

        let err = Config::load().unwrap_err();
        assert!(err.to_string().contains("account_id"));

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn production_requires_jwt_secret() {
        clear_env();
        set_required_env();
        env::set_var("APP_ENV", "prod");

        assert!(Config::load().is_err());

        env::set_var("JWT_SECRET", "prod-secret");
        let err = Config::load().unwrap_err();
        assert!(err.to_string().contains("METRICS_AUTH"));

        env::set_var("METRICS_AUTH", "ops:s3cret");
        let config = Config::load().expect("config should load");
        assert!(config.object_storage.require_https);
        assert_eq!(config.metrics_auth, "ops:s3cret");

        clear_env();
    }
}
