//! qrstamp runtime configuration handling
//!
//! Configuration is resolved once at startup: built-in defaults, then an
//! optional TOML/YAML file, then `QR_*` environment variables. The binary
//! applies command-line flags on top and hands the result to the generator.

use crate::error::{Error, Result};
use crate::qr::Color;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Content encoded when nothing else is configured
pub const DEFAULT_CONTENT: &str = "https://github.com/kaw393939";

/// Directory receiving generated images when nothing else is configured
pub const DEFAULT_OUTPUT_DIR: &str = "qr_codes";

/// Top-level configuration structure persisted to disk or environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QrstampConfig {
    /// What to encode and how to draw it
    pub qr: QrOptions,
    /// Where generated images go
    pub output: OutputOptions,
    /// Logging configuration
    pub logging: LoggingOptions,
    /// File the configuration was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl QrstampConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults,
    /// then apply overrides from the process environment.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        Self::load_with(explicit_path, |key| env::var(key).ok())
    }

    /// Same as [`QrstampConfig::load`], reading overrides through `lookup`.
    pub fn load_with<F>(explicit_path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = match explicit_path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover_file()?,
        };

        let mut config = match source {
            Some(ref path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.source = source;

        config.apply_overrides(&lookup);
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["qrstamp.toml", "qrstamp.yaml", "qrstamp.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("qrstamp");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            }),
            other => Err(Error::Config(format!(
                "Unsupported config format '{}', expected toml/yaml",
                other
            ))),
        }
    }

    /// Apply `QR_*` overrides after file/default loading.
    pub fn apply_overrides<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.qr.apply_overrides(lookup);
        self.output.apply_overrides(lookup);
        self.logging.apply_overrides(lookup);
    }
}

/// Content and rendering options for the QR symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QrOptions {
    /// Text or URL to encode
    pub content: String,
    /// Reject content that is not an absolute http(s) URL
    pub require_url: bool,
    /// Dark module color (name or `#RRGGBB`)
    pub fill_color: String,
    /// Light module / quiet zone color (name or `#RRGGBB`)
    pub back_color: String,
    /// Pixels per module side
    pub scale: u32,
    /// Quiet zone width in modules
    pub border: u32,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            content: DEFAULT_CONTENT.to_string(),
            require_url: false,
            fill_color: "black".to_string(),
            back_color: "white".to_string(),
            scale: 10,
            border: 4,
        }
    }
}

impl QrOptions {
    pub(crate) fn apply_overrides<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(content) = lookup("QR_CONTENT") {
            if !content.is_empty() {
                self.content = content;
            }
        }
        if let Some(flag) = lookup("QR_REQUIRE_URL") {
            if let Some(parsed) = parse_flag(&flag) {
                self.require_url = parsed;
            }
        }
        if let Some(color) = lookup("QR_FILL_COLOR") {
            self.fill_color = color;
        }
        if let Some(color) = lookup("QR_BACK_COLOR") {
            self.back_color = color;
        }
        if let Some(scale) = lookup("QR_SCALE") {
            if let Ok(parsed) = scale.parse::<u32>() {
                self.scale = parsed.max(1);
            }
        }
        if let Some(border) = lookup("QR_BORDER") {
            if let Ok(parsed) = border.parse::<u32>() {
                self.border = parsed;
            }
        }
    }

    /// Resolve and validate the configured fill/background colors.
    pub fn palette(&self) -> Result<(Color, Color)> {
        let fill = self.fill_color.parse::<Color>().map_err(Error::Config)?;
        let back = self.back_color.parse::<Color>().map_err(Error::Config)?;

        if fill == back {
            return Err(Error::Config(format!(
                "Fill color '{}' and back color '{}' are identical; the code would be unreadable",
                self.fill_color, self.back_color
            )));
        }

        Ok((fill, back))
    }
}

/// Output destination options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Directory receiving `QRCode_<timestamp>.png` files; created if absent
    pub directory: PathBuf,
    /// Decode the written file and compare it against the input
    pub verify: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_OUTPUT_DIR),
            verify: cfg!(feature = "verify"),
        }
    }
}

impl OutputOptions {
    pub(crate) fn apply_overrides<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("QR_OUTPUT_DIR") {
            if !dir.trim().is_empty() {
                self.directory = PathBuf::from(dir);
            }
        }
        if let Some(flag) = lookup("QR_VERIFY") {
            if let Some(parsed) = parse_flag(&flag) {
                self.verify = parsed;
            }
        }
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `QR_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in stdout logging
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            color: true,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    pub(crate) fn apply_overrides<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("QR_LOG_LEVEL") {
            self.level = level;
        }
        if let Some(file) = lookup("QR_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Some(color) = lookup("QR_LOG_COLOR") {
            if let Some(parsed) = parse_flag(&color) {
                self.color = parsed;
            }
        }
        if let Some(rotation) = lookup("QR_LOG_ROTATION") {
            if let Some(parsed) = LogRotation::from_str(&rotation) {
                self.rotation = Some(parsed);
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl LogRotation {
    fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
