//! Configuration for the mdx-video markdown extension.
//!
//! Four string-valued options control the rendered size of embedded players:
//!
//! | Option         | Default | Description             |
//! |----------------|---------|-------------------------|
//! | `youku_width`  | `480`   | Width for Youku videos  |
//! | `youku_height` | `400`   | Height for Youku videos |
//! | `tudou_width`  | `480`   | Width for Tudou videos  |
//! | `tudou_height` | `400`   | Height for Tudou videos |
//!
//! A [`VideoConfig`] is built once, either from an override list
//! ([`VideoConfig::with_overrides`]) or from a TOML file
//! ([`VideoConfig::load`]), and is read-only afterwards. Unknown option names
//! are rejected at construction.
//!
//! Values are passed through to the markup verbatim. No numeric validation is
//! performed.
//!
//! # Example
//!
//! ```
//! use mdx_video_config::VideoConfig;
//!
//! let config = VideoConfig::with_overrides([("youku_width", "640")]).unwrap();
//! assert_eq!(config.youku.width, "640");
//! assert_eq!(config.youku.height, "400");
//!
//! assert!(VideoConfig::with_overrides([("vimeo_width", "640")]).is_err());
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Option name for the Youku player width.
pub const YOUKU_WIDTH: &str = "youku_width";
/// Option name for the Youku player height.
pub const YOUKU_HEIGHT: &str = "youku_height";
/// Option name for the Tudou player width.
pub const TUDOU_WIDTH: &str = "tudou_width";
/// Option name for the Tudou player height.
pub const TUDOU_HEIGHT: &str = "tudou_height";

/// A recognized option with its default value and description.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfigOption {
    /// Option name as used in override lists and TOML files.
    pub name: &'static str,
    /// Default value.
    pub default: &'static str,
    /// Human-readable description.
    pub description: &'static str,
}

/// All recognized options, in declaration order.
pub const OPTIONS: [ConfigOption; 4] = [
    ConfigOption {
        name: YOUKU_WIDTH,
        default: "480",
        description: "Width for Youku videos",
    },
    ConfigOption {
        name: YOUKU_HEIGHT,
        default: "400",
        description: "Height for Youku videos",
    },
    ConfigOption {
        name: TUDOU_WIDTH,
        default: "480",
        description: "Width for Tudou videos",
    },
    ConfigOption {
        name: TUDOU_HEIGHT,
        default: "400",
        description: "Height for Tudou videos",
    },
];

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Option name is not one of [`OPTIONS`].
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Player dimensions for one video site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Player width, emitted verbatim.
    pub width: String,
    /// Player height, emitted verbatim.
    pub height: String,
}

impl Dimensions {
    fn new(width: &str, height: &str) -> Self {
        Self {
            width: width.to_owned(),
            height: height.to_owned(),
        }
    }
}

/// Resolved extension configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoConfig {
    /// Youku player dimensions.
    pub youku: Dimensions,
    /// Tudou player dimensions.
    pub tudou: Dimensions,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            youku: Dimensions::new(OPTIONS[0].default, OPTIONS[1].default),
            tudou: Dimensions::new(OPTIONS[2].default, OPTIONS[3].default),
        }
    }
}

/// Raw configuration as parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigRaw {
    youku_width: Option<RawValue>,
    youku_height: Option<RawValue>,
    tudou_width: Option<RawValue>,
    tudou_height: Option<RawValue>,
}

/// Option value as written in TOML: `width = "640"` or `width = 640`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    Number(u64),
}

impl RawValue {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

impl VideoConfig {
    /// Build configuration from defaults plus `(name, value)` overrides.
    ///
    /// Overrides are applied in order, so a repeated name keeps the last value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownKey`] for the first unrecognized name.
    pub fn with_overrides<I, K, V>(overrides: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::default();
        for (key, value) in overrides {
            config.set(key.as_ref(), value.into())?;
        }
        Ok(config)
    }

    /// Parse configuration from a flat TOML table.
    ///
    /// ```toml
    /// youku_width = 640
    /// tudou_height = "360"
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid TOML, unknown keys, or values
    /// that are neither strings nor non-negative integers.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: ConfigRaw = toml::from_str(content)?;
        let overrides = [
            (YOUKU_WIDTH, raw.youku_width),
            (YOUKU_HEIGHT, raw.youku_height),
            (TUDOU_WIDTH, raw.tudou_width),
            (TUDOU_HEIGHT, raw.tudou_height),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v.into_string())));
        Self::with_overrides(overrides)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the file doesn't exist, otherwise
    /// any error from reading or [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Get an option value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            YOUKU_WIDTH => &self.youku.width,
            YOUKU_HEIGHT => &self.youku.height,
            TUDOU_WIDTH => &self.tudou.width,
            TUDOU_HEIGHT => &self.tudou.height,
            _ => return None,
        };
        Some(value)
    }

    /// Iterate over `(name, current value, description)` for every option.
    pub fn describe(&self) -> impl Iterator<Item = (&'static str, &str, &'static str)> {
        OPTIONS.iter().map(|option| {
            let value = self.get(option.name).unwrap_or(option.default);
            (option.name, value, option.description)
        })
    }

    fn set(&mut self, name: &str, value: String) -> Result<(), ConfigError> {
        let slot = match name {
            YOUKU_WIDTH => &mut self.youku.width,
            YOUKU_HEIGHT => &mut self.youku.height,
            TUDOU_WIDTH => &mut self.tudou.width,
            TUDOU_HEIGHT => &mut self.tudou.height,
            _ => return Err(ConfigError::UnknownKey(name.to_owned())),
        };
        tracing::debug!(option = name, value = %value, "Applying config override");
        *slot = value;
        Ok(())
    }
}
