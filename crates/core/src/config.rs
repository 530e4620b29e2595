use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Value used when no API key is found anywhere. Never a usable key.
pub const API_KEY_PLACEHOLDER: &str = "your-api-key";

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u32(profile: &str, key: &str, default: u32) -> u32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub llm: LlmConfig,
    pub storage: StorageConfig,
    pub ocr: OcrConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `TENDERLENS_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("TENDERLENS_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        let secrets_path = profiled_env_opt(p, "TENDERLENS_SECRETS")
            .map(PathBuf::from)
            .or_else(Secrets::default_path);
        let secrets = secrets_path
            .map(|path| Secrets::load_or_default(&path))
            .unwrap_or_default();
        Self {
            profile: p.to_string(),
            llm: LlmConfig::from_env_profiled(p, &secrets),
            storage: StorageConfig::from_env_profiled(p),
            ocr: OcrConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  llm:         model={}, base_url={}, configured={}",
            self.llm.model,
            self.llm.base_url,
            self.llm.is_configured()
        );
        tracing::info!("  storage:     constraints={}", self.storage.constraints_path.display());
        tracing::info!("  ocr:         languages={}, dpi={}", self.ocr.languages, self.ocr.dpi);
        if !self.llm.is_configured() {
            tracing::warn!("OPENAI_API_KEY is missing or still the placeholder; analysis will fail");
        }
    }
}

// ── Secrets file ──────────────────────────────────────────────

/// Optional TOML secrets file, e.g. `openai_api_key = "sk-..."`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub openai_api_key: Option<String>,
}

impl Secrets {
    /// `{config_dir}/tenderlens/secrets.toml`, when a config dir exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tenderlens").join("secrets.toml"))
    }

    /// Load the secrets file. A missing file is an empty set of secrets.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map_err(|reason| ConfigError::Secrets {
            path: path.display().to_string(),
            reason,
        })
    }

    /// Like `load`, but an unreadable or malformed file only logs a warning.
    /// Commands that never call the model keep working; analysis then fails
    /// with the usual "not configured" error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(secrets) => secrets,
            Err(e) => {
                tracing::warn!("Ignoring secrets file: {}", e);
                Self::default()
            }
        }
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}

// ── LLM (OpenAI-compatible) ───────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Key from env, then the secrets file, else `API_KEY_PLACEHOLDER`.
    #[serde(skip_serializing)]
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmConfig {
    fn from_env_profiled(p: &str, secrets: &Secrets) -> Self {
        let api_key = profiled_env_opt(p, "OPENAI_API_KEY")
            .or_else(|| secrets.openai_api_key.clone().filter(|k| !k.is_empty()))
            .unwrap_or_else(|| API_KEY_PLACEHOLDER.to_string());
        Self {
            api_key,
            model: profiled_env_or(p, "OPENAI_MODEL", "gpt-4-turbo"),
            base_url: profiled_env_or(p, "OPENAI_BASE_URL", "https://api.openai.com"),
            temperature: profiled_env_or(p, "LLM_TEMPERATURE", "0.2")
                .parse()
                .unwrap_or(0.2),
            max_tokens: profiled_env_u32(p, "LLM_MAX_TOKENS", 2048),
        }
    }

    /// False while the key is empty or still the placeholder.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty() && self.api_key != API_KEY_PLACEHOLDER
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: API_KEY_PLACEHOLDER.to_string(),
            model: "gpt-4-turbo".to_string(),
            base_url: "https://api.openai.com".to_string(),
            temperature: 0.2,
            max_tokens: 2048,
        }
    }
}

// ── Constraint storage ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub constraints_path: PathBuf,
}

impl StorageConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            constraints_path: PathBuf::from(profiled_env_or(
                p,
                "CONSTRAINTS_PATH",
                "data/constraints.txt",
            )),
        }
    }
}

// ── OCR (pdftoppm + tesseract) ────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Tesseract language spec, `+`-joined.
    pub languages: String,
    pub dpi: u32,
    pub pdftoppm_bin: String,
    pub tesseract_bin: String,
}

impl OcrConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            languages: profiled_env_or(p, "OCR_LANGUAGES", "ara+eng"),
            dpi: profiled_env_u32(p, "OCR_DPI", 300),
            pdftoppm_bin: profiled_env_or(p, "PDFTOPPM_BIN", "pdftoppm"),
            tesseract_bin: profiled_env_or(p, "TESSERACT_BIN", "tesseract"),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: "ara+eng".to_string(),
            dpi: 300,
            pdftoppm_bin: "pdftoppm".to_string(),
            tesseract_bin: "tesseract".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_key_is_not_configured() {
        let llm = LlmConfig::default();
        assert_eq!(llm.api_key, API_KEY_PLACEHOLDER);
        assert!(!llm.is_configured());

        let blank = LlmConfig {
            api_key: "  ".into(),
            ..LlmConfig::default()
        };
        assert!(!blank.is_configured());

        let real = LlmConfig {
            api_key: "sk-live".into(),
            ..LlmConfig::default()
        };
        assert!(real.is_configured());
    }

    #[test]
    fn secrets_key_used_when_env_missing() {
        let secrets = Secrets::parse("openai_api_key = \"sk-from-secrets\"\n").unwrap();
        let llm = LlmConfig::from_env_profiled("", &secrets);
        // The environment wins when set, so only assert on a clean env.
        if env_opt("OPENAI_API_KEY").is_none() {
            assert_eq!(llm.api_key, "sk-from-secrets");
        }
    }

    #[test]
    fn secrets_file_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let secrets = Secrets::load(&dir.path().join("absent.toml")).unwrap();
        assert!(secrets.openai_api_key.is_none());
    }

    #[test]
    fn secrets_file_malformed_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        std::fs::write(&path, "openai_api_key = ").unwrap();
        assert!(matches!(
            Secrets::load(&path),
            Err(ConfigError::Secrets { .. })
        ));
        assert!(Secrets::load_or_default(&path).openai_api_key.is_none());
    }

    #[test]
    fn malformed_secrets_file_does_not_block_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        std::fs::write(&path, "openai_api_key = ").unwrap();

        let secrets = Secrets::load_or_default(&path);
        let llm = LlmConfig::from_env_profiled("", &secrets);
        if env_opt("OPENAI_API_KEY").is_none() {
            assert!(!llm.is_configured());
        }
        let storage = StorageConfig::from_env_profiled("");
        assert!(!storage.constraints_path.as_os_str().is_empty());
    }

    #[test]
    fn ocr_defaults_to_arabic_and_english() {
        let ocr = OcrConfig::default();
        assert_eq!(ocr.languages, "ara+eng");
        assert_eq!(ocr.dpi, 300);
    }
}
