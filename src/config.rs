use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Which `CacheStore` backs list responses.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Memory,
    None,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub cache: CacheConfig,
    pub google_client_id: Option<String>,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "lifeos".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "lifeos-users".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: env_parse("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };
        let backend = match std::env::var("CACHE_BACKEND").as_deref() {
            Ok("none") | Ok("dummy") => CacheBackend::None,
            Ok("memory") | Err(_) => CacheBackend::Memory,
            Ok(other) => anyhow::bail!("unknown CACHE_BACKEND {other:?}"),
        };
        let cache = CacheConfig {
            backend,
            ttl_seconds: env_parse("CACHE_TTL_SECONDS", 300),
        };
        let google_client_id = std::env::var("GOOGLE_CLIENT_ID")
            .ok()
            .filter(|v| !v.trim().is_empty());
        Ok(Self {
            database_url,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", 10),
            jwt,
            cache,
            google_client_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_parse_falls_back_on_garbage() {
        std::env::set_var("LIFEOS_TEST_PARSE_GARBAGE", "not-a-number");
        assert_eq!(env_parse("LIFEOS_TEST_PARSE_GARBAGE", 42u64), 42);
        assert_eq!(env_parse("LIFEOS_TEST_PARSE_MISSING", 7i64), 7);
    }

    #[test]
    fn env_parse_reads_value() {
        std::env::set_var("LIFEOS_TEST_PARSE_VALUE", "15");
        assert_eq!(env_parse("LIFEOS_TEST_PARSE_VALUE", 0u32), 15);
    }
}
