use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_acquire_timeout() -> u64 { 30 }

/// CORS allow-list. Single source of truth for every route; per-handler
/// overrides are deliberately not supported.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CorsConfig {
    /// Comma-separated origins, e.g. "http://localhost:3000,https://admin.mobicomm.in"
    #[serde(default)]
    pub allowed_origins: String,
}

impl CorsConfig {
    pub fn origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Horizon (in days) for the expiring-subscribers query.
    #[serde(default = "default_expiring_window_days")]
    pub expiring_window_days: u32,
}

fn default_expiring_window_days() -> u32 { 7 }

impl Default for AdminConfig {
    fn default() -> Self {
        Self { expiring_window_days: default_expiring_window_days() }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct MailConfig {
    #[serde(default)]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub from: String,
}

fn default_smtp_port() -> u16 { 587 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.cors.normalize_from_env();
        self.admin.normalize_from_env();
        self.mail.normalize_from_env();
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        // TOML may omit the URL; fall back to the environment
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!(
                "database.url is empty; set it in config.toml or via DATABASE_URL"
            ));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl CorsConfig {
    pub fn normalize_from_env(&mut self) {
        if self.allowed_origins.trim().is_empty() {
            if let Ok(origins) = std::env::var("ALLOWED_ORIGINS") {
                self.allowed_origins = origins;
            }
        }
    }
}

impl AdminConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(days) = std::env::var("EXPIRING_WINDOW_DAYS") {
            if let Ok(days) = days.parse::<u32>() {
                if days > 0 {
                    self.expiring_window_days = days;
                }
            }
        }
    }
}

impl MailConfig {
    pub fn normalize_from_env(&mut self) {
        if self.smtp_host.trim().is_empty() {
            if let Ok(host) = std::env::var("SMTP_HOST") {
                self.smtp_host = host;
            }
        }
        if let Ok(port) = std::env::var("SMTP_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.smtp_port = port;
            }
        }
        if self.username.trim().is_empty() {
            if let Ok(user) = std::env::var("SMTP_USERNAME") {
                self.username = user;
            }
        }
        if self.password.trim().is_empty() {
            if let Ok(pass) = std::env::var("SMTP_PASSWORD") {
                self.password = pass;
            }
        }
        if self.from.trim().is_empty() {
            if let Ok(from) = std::env::var("MAIL_FROM") {
                self.from = from;
            }
        }
    }
}
