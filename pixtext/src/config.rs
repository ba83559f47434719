use serde::Deserialize;
use std::env;
use std::path::PathBuf;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// `tesseract-cli` spawns the executable, `tesseract-lib` links libtesseract.
    pub engine: String,
    pub executable_path: String,
    pub tessdata_dir: Option<String>,
    pub languages: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub file_name: String,
    /// Fallback filter directive when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine: "tesseract-cli".to_string(),
            executable_path: "tesseract".to_string(),
            tessdata_dir: None,
            languages: "eng".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("PIXTEXT_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("PIXTEXT_PORT", 8000),
                max_body_bytes: parse_env_or("MAX_BODY_BYTES", 20 * 1024 * 1024),
            },
            ocr: OcrConfig {
                engine: env::var("OCR_ENGINE").unwrap_or_else(|_| "tesseract-cli".to_string()),
                executable_path: env::var("OCR_EXECUTABLE_PATH")
                    .unwrap_or_else(|_| "tesseract".to_string()),
                tessdata_dir: env::var("OCR_TESSDATA_DIR").ok().filter(|s| !s.is_empty()),
                languages: env::var("OCR_LANGUAGES").unwrap_or_else(|_| "eng".to_string()),
                timeout_secs: parse_env_or("OCR_TIMEOUT", 60),
            },
            logging: LoggingConfig {
                directory: env::var("LOG_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("logs")),
                file_name: env::var("LOG_FILE").unwrap_or_else(|_| "app.log".to_string()),
                level: env::var("LOG_LEVEL")
                    .unwrap_or_else(|_| "pixtext=info,tower_http=debug".to_string()),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
