use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

#[cfg(feature = "embedded-tesseract")]
use std::sync::Arc;

#[cfg(feature = "embedded-tesseract")]
use leptess::LepTess;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
#[cfg(feature = "embedded-tesseract")]
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::OcrConfig;
use crate::error::{PixtextError, Result};
use crate::imaging::BinaryImage;

pub const ENGINE_CLI: &str = "tesseract-cli";
pub const ENGINE_LIB: &str = "tesseract-lib";

#[derive(Clone)]
enum OcrBackend {
    Command {
        executable: String,
        languages: String,
        tessdata_dir: Option<String>,
    },
    #[cfg(feature = "embedded-tesseract")]
    Library { tesseract: Arc<Mutex<LepTess>> },
    Unavailable { reason: String },
}

/// Handle to the external OCR engine. Cheap to clone; holds no per-request state.
#[derive(Clone)]
pub struct OcrEngine {
    backend: OcrBackend,
    config: OcrConfig,
}

#[cfg(feature = "embedded-tesseract")]
fn create_tesseract(config: &OcrConfig) -> std::result::Result<LepTess, String> {
    LepTess::new(config.tessdata_dir.as_deref(), &config.languages).map_err(|e| e.to_string())
}

impl OcrEngine {
    pub fn new(config: &OcrConfig) -> Self {
        let engine = config.engine.to_lowercase();

        let backend = match engine.as_str() {
            ENGINE_CLI => {
                info!(
                    executable = %config.executable_path,
                    languages = %config.languages,
                    "Tesseract CLI engine configured"
                );
                OcrBackend::Command {
                    executable: config.executable_path.clone(),
                    languages: config.languages.clone(),
                    tessdata_dir: config.tessdata_dir.clone(),
                }
            }
            #[cfg(feature = "embedded-tesseract")]
            ENGINE_LIB => match create_tesseract(config) {
                Ok(lt) => {
                    info!(languages = %config.languages, "Embedded Tesseract initialized");
                    OcrBackend::Library {
                        tesseract: Arc::new(Mutex::new(lt)),
                    }
                }
                Err(e) => {
                    let reason = format!("Tesseract library not available: {e}");
                    warn!("{}", reason);
                    OcrBackend::Unavailable { reason }
                }
            },
            #[cfg(not(feature = "embedded-tesseract"))]
            ENGINE_LIB => {
                let reason =
                    "pixtext was built without the `embedded-tesseract` feature".to_string();
                warn!("{}", reason);
                OcrBackend::Unavailable { reason }
            }
            other => {
                let reason = format!(
                    "Unknown OCR engine '{other}', expected '{ENGINE_CLI}' or '{ENGINE_LIB}'"
                );
                warn!("{}", reason);
                OcrBackend::Unavailable { reason }
            }
        };

        Self {
            backend,
            config: config.clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match &self.backend {
            OcrBackend::Command { .. } => ENGINE_CLI,
            #[cfg(feature = "embedded-tesseract")]
            OcrBackend::Library { .. } => ENGINE_LIB,
            OcrBackend::Unavailable { .. } => "unavailable",
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, OcrBackend::Unavailable { .. })
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    /// Ask the engine for its version, confirming it can actually be started.
    pub async fn probe(&self) -> Result<String> {
        match &self.backend {
            OcrBackend::Command { executable, .. } => {
                let output = tokio::time::timeout(
                    self.timeout(),
                    Command::new(executable)
                        .arg("--version")
                        .stdin(Stdio::null())
                        .kill_on_drop(true)
                        .output(),
                )
                .await
                .map_err(|_| {
                    PixtextError::Engine(format!(
                        "OCR engine version check timed out after {} seconds",
                        self.config.timeout_secs
                    ))
                })?
                .map_err(|e| spawn_error(executable, e))?;

                if !output.status.success() {
                    return Err(PixtextError::Engine(format!(
                        "OCR engine version check exited with {}",
                        output.status
                    )));
                }

                // Tesseract 3 prints its banner on stderr, later versions on stdout.
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                let version = stdout
                    .lines()
                    .chain(stderr.lines())
                    .map(str::trim)
                    .find(|line| !line.is_empty())
                    .unwrap_or("unknown")
                    .to_string();
                Ok(version)
            }
            #[cfg(feature = "embedded-tesseract")]
            OcrBackend::Library { .. } => Ok("libtesseract (embedded)".to_string()),
            OcrBackend::Unavailable { reason } => Err(PixtextError::Engine(reason.clone())),
        }
    }

    /// Run OCR on a preprocessed image and return the trimmed text.
    ///
    /// An image without text yields an empty string, not an error.
    pub async fn recognize(&self, image: BinaryImage) -> Result<String> {
        let png = image.to_png()?;

        let text = tokio::time::timeout(self.timeout(), self.recognize_internal(png))
            .await
            .map_err(|_| {
                PixtextError::Engine(format!(
                    "OCR operation timed out after {} seconds",
                    self.config.timeout_secs
                ))
            })??;

        let text = text.trim().to_string();
        debug!(chars = text.len(), "Text extracted from image");
        Ok(text)
    }

    async fn recognize_internal(&self, png: Vec<u8>) -> Result<String> {
        match &self.backend {
            OcrBackend::Command {
                executable,
                languages,
                tessdata_dir,
            } => run_command(executable, languages, tessdata_dir.as_deref(), png).await,
            #[cfg(feature = "embedded-tesseract")]
            OcrBackend::Library { tesseract } => {
                let tesseract = Arc::clone(tesseract);

                tokio::task::spawn_blocking(move || {
                    let mut lt = tesseract.blocking_lock();
                    lt.set_image_from_mem(&png)
                        .map_err(|e| PixtextError::Engine(format!("Failed to set image: {e}")))?;
                    lt.get_utf8_text()
                        .map_err(|e| PixtextError::Engine(format!("Failed to extract text: {e}")))
                })
                .await
                .map_err(|e| PixtextError::Engine(format!("OCR task panicked: {e}")))?
            }
            OcrBackend::Unavailable { reason } => Err(PixtextError::Engine(reason.clone())),
        }
    }
}

fn spawn_error(executable: &str, err: std::io::Error) -> PixtextError {
    match err.kind() {
        ErrorKind::NotFound => {
            PixtextError::Engine(format!("OCR engine not found at '{executable}'"))
        }
        ErrorKind::PermissionDenied => {
            PixtextError::Engine(format!("OCR engine at '{executable}' is not executable"))
        }
        _ => PixtextError::Engine(format!("Failed to start OCR engine '{executable}': {err}")),
    }
}

/// `tesseract stdin stdout -l <langs>`: PNG in on stdin, text out on stdout.
async fn run_command(
    executable: &str,
    languages: &str,
    tessdata_dir: Option<&str>,
    png: Vec<u8>,
) -> Result<String> {
    let mut command = Command::new(executable);
    command.arg("stdin").arg("stdout").arg("-l").arg(languages);
    if let Some(dir) = tessdata_dir {
        command.arg("--tessdata-dir").arg(dir);
    }

    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| spawn_error(executable, e))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| PixtextError::Engine("OCR engine stdin was not captured".to_string()))?;

    // Feed and drain concurrently so a large image cannot deadlock on full pipes.
    let feed = async move {
        stdin.write_all(&png).await?;
        stdin.shutdown().await
    };
    let (fed, output) = tokio::join!(feed, child.wait_with_output());

    let output =
        output.map_err(|e| PixtextError::Engine(format!("OCR engine did not finish: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PixtextError::Engine(format!(
            "OCR engine exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    if let Err(e) = fed {
        if e.kind() != ErrorKind::BrokenPipe {
            return Err(PixtextError::Engine(format!(
                "Failed to send image to OCR engine: {e}"
            )));
        }
    }

    String::from_utf8(output.stdout)
        .map_err(|e| PixtextError::Engine(format!("OCR engine returned invalid UTF-8: {e}")))
}
