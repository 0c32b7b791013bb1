use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::error;

const DEFAULT_PORT: u16 = 4310;
const DEFAULT_MODEL_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_STORAGE_FILE: &str = "tasks.json";

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

// ─── ModelConfig ──────────────────────────────────────────────────────────────

/// Model API configuration (`[model]` in config.toml).
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Base URL of an OpenAI-compatible API (default: https://api.openai.com/v1).
    pub api_base_url: String,
    /// API key (OPENAI_API_KEY env var or `api_key` in `[model]`).
    /// None means extraction runs degraded — every note yields zero tasks.
    pub api_key: Option<String>,
    /// Model id used for both extraction and summarization (default: gpt-4o-mini).
    pub model: String,
    /// Hard timeout for one model request in seconds (default: 30).
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_MODEL_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_MODEL_TIMEOUT_SECS,
        }
    }
}

// ─── TOML config file ─────────────────────────────────────────────────────────

/// `[model]` section — all fields optional overrides.
#[derive(Deserialize, Default)]
struct ModelTomlConfig {
    api_base_url: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
}

/// `{data_dir}/config.toml` — all fields are optional overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// REST server port (default: 4310).
    port: Option<u16>,
    /// Bind address (default: "127.0.0.1"; use "0.0.0.0" for LAN access).
    bind_address: Option<String>,
    /// Log level filter string, e.g. "debug", "info,minuted=trace" (default: "info").
    log: Option<String>,
    /// Log output format: "pretty" (default, human-readable) | "json" (structured for log aggregators).
    log_format: Option<String>,
    /// Task storage file; relative paths resolve against the data dir (default: "tasks.json").
    storage_file: Option<PathBuf>,
    /// Bearer token for the REST API. None = auth disabled (local, trusted loopback use).
    api_token: Option<String>,
    /// Deployment environment label reported by the health endpoint (default: "production").
    environment: Option<String>,
    /// Model API configuration (`[model]`).
    model: Option<ModelTomlConfig>,
}

fn load_toml(data_dir: &Path) -> Option<TomlConfig> {
    let path = data_dir.join("config.toml");
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse config.toml — using defaults");
            None
        }
    }
}

// ─── ServerConfig ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub log: String,
    /// Bind address for the REST server (MINUTED_BIND env var, default: "127.0.0.1").
    pub bind_address: String,
    /// Log output format: "pretty" (default) | "json".
    pub log_format: String,
    /// Absolute path of the task storage file.
    pub storage_file: PathBuf,
    /// Bearer token required on every API call except health/status.
    /// Set via `MINUTED_API_TOKEN` env var or `api_token` in config.toml.
    /// None = authentication disabled.
    pub api_token: Option<String>,
    /// Deployment environment label ("production", "staging", ...).
    pub environment: String,
    /// Model API settings for the extractor.
    pub model: ModelConfig,
}

impl ServerConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `{data_dir}/config.toml`
    ///   3. Built-in defaults
    pub fn new(
        port: Option<u16>,
        data_dir: Option<PathBuf>,
        log: Option<String>,
        bind_address: Option<String>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);

        let toml = load_toml(&data_dir).unwrap_or_default();

        let port = port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());

        let bind_address = bind_address
            .or(std::env::var("MINUTED_BIND").ok().filter(|s| !s.is_empty()))
            .or(toml.bind_address)
            .unwrap_or_else(default_bind_address);

        let log_format = std::env::var("MINUTED_LOG_FORMAT")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.log_format)
            .unwrap_or_else(|| "pretty".to_string());

        let storage_file = {
            let file = toml.storage_file.unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_FILE));
            if file.is_absolute() {
                file
            } else {
                data_dir.join(file)
            }
        };

        let api_token = std::env::var("MINUTED_API_TOKEN")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.api_token);

        let environment = toml.environment.unwrap_or_else(|| "production".to_string());

        let model_toml = toml.model.unwrap_or_default();
        let model = ModelConfig {
            api_base_url: model_toml
                .api_base_url
                .unwrap_or_else(|| DEFAULT_MODEL_BASE_URL.to_string()),
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|s| !s.is_empty())
                .or(model_toml.api_key),
            model: model_toml.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout_secs: model_toml.timeout_secs.unwrap_or(DEFAULT_MODEL_TIMEOUT_SECS),
        };

        Self {
            port,
            data_dir,
            log,
            bind_address,
            log_format,
            storage_file,
            api_token,
            environment,
            model,
        }
    }
}

fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/minuted
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("minuted");
        }
    }
    #[cfg(target_os = "linux")]
    {
        // $XDG_DATA_HOME/minuted or ~/.local/share/minuted
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("minuted");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("minuted");
        }
    }
    #[cfg(target_os = "windows")]
    {
        // %APPDATA%\minuted
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("minuted");
        }
    }
    // Fallback
    PathBuf::from(".minuted")
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_a_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ServerConfig::new(None, Some(dir.path().to_path_buf()), None, None);
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.log, "info");
        assert_eq!(cfg.environment, "production");
        assert_eq!(cfg.storage_file, dir.path().join("tasks.json"));
        assert_eq!(cfg.model.model, DEFAULT_MODEL);
    }

    #[test]
    fn cli_values_override_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "port = 9999\nlog = \"debug\"\n").unwrap();
        let cfg = ServerConfig::new(
            Some(5000),
            Some(dir.path().to_path_buf()),
            None,
            None,
        );
        assert_eq!(cfg.port, 5000, "CLI beats TOML");
        assert_eq!(cfg.log, "debug", "TOML beats the default");
    }

    #[test]
    fn toml_model_section_is_merged() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "[model]\nmodel = \"gpt-4o\"\ntimeout_secs = 5\n",
        )
        .unwrap();
        let cfg = ServerConfig::new(None, Some(dir.path().to_path_buf()), None, None);
        assert_eq!(cfg.model.model, "gpt-4o");
        assert_eq!(cfg.model.timeout_secs, 5);
        assert_eq!(cfg.model.api_base_url, DEFAULT_MODEL_BASE_URL);
    }

    #[test]
    fn relative_storage_file_resolves_against_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "storage_file = \"store/all.json\"\n")
            .unwrap();
        let cfg = ServerConfig::new(None, Some(dir.path().to_path_buf()), None, None);
        assert_eq!(cfg.storage_file, dir.path().join("store/all.json"));
    }

    #[test]
    fn invalid_toml_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "port = {{{{").unwrap();
        let cfg = ServerConfig::new(None, Some(dir.path().to_path_buf()), None, None);
        assert_eq!(cfg.port, DEFAULT_PORT);
    }
}
