//! Per-directory processing configuration.
//!
//! Handles loading, validating, and resolving `config.json` files. Unlike a
//! layered site config, resolution here is **total override**: a directory's
//! own `config.json` replaces whatever it inherited from its parent, field for
//! field. Nothing is merged.
//!
//! ## Config File Location
//!
//! Place `config.json` in the source root and/or any subdirectory:
//!
//! ```text
//! photos/
//! ├── config.json              # Applies to photos/ and every subdirectory without its own
//! ├── a.png
//! ├── sub/                     # No config.json: inherits photos/config.json
//! │   └── b.jpg
//! └── sub2/
//!     ├── config.json          # Replaces photos/config.json for sub2/ and below
//!     └── c.webp
//! ```
//!
//! ## File Format
//!
//! ```json
//! {
//!   "target_sizes": { "small": 128, "banner": -1920, "full": null },
//!   "target_extensions": ["webp", "png"]
//! }
//! ```
//!
//! Both keys are required. Each size directive is one of:
//!
//! - `null` → keep the original resolution
//! - `n > 0` → scale so the **shorter** edge is `n` pixels
//! - `n < 0` → scale so the **longer** edge is `|n|` pixels
//!
//! `0` is rejected. Size labels keep the order they have in the file, which
//! is also the order outputs are produced in. Unknown keys are rejected to
//! catch typos early.

use crate::imaging::OutputFormat;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

/// File name looked up in every source directory.
pub const CONFIG_FILENAME: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid configuration in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Config validation error in {}: {message}", .path.display())]
    Validation { path: PathBuf, message: String },
    #[error("No configuration found for {} (no config.json there or in any parent)", .0.display())]
    NotFound(PathBuf),
}

/// How one size label rescales an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Option<i64>")]
pub enum SizeDirective {
    /// Keep the original resolution (`null` in JSON).
    Original,
    /// Scale so the shorter edge equals this many pixels (positive in JSON).
    ShortEdge(u32),
    /// Scale so the longer edge equals this many pixels (negative in JSON).
    LongEdge(u32),
}

impl TryFrom<Option<i64>> for SizeDirective {
    type Error = String;

    fn try_from(value: Option<i64>) -> Result<Self, Self::Error> {
        let Some(n) = value else {
            return Ok(Self::Original);
        };
        let edge = u32::try_from(n.unsigned_abs())
            .map_err(|_| format!("size directive {n} is out of range"))?;
        match n {
            0 => Err("size directive must be non-zero (use null to keep the original size)".into()),
            n if n > 0 => Ok(Self::ShortEdge(edge)),
            _ => Ok(Self::LongEdge(edge)),
        }
    }
}

impl fmt::Display for SizeDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original => write!(f, "original"),
            Self::ShortEdge(n) => write!(f, "short edge {n}px"),
            Self::LongEdge(n) => write!(f, "long edge {n}px"),
        }
    }
}

/// Size labels and their directives, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSizes(Vec<(String, SizeDirective)>);

impl TargetSizes {
    pub fn iter(&self) -> impl Iterator<Item = (&str, SizeDirective)> {
        self.0.iter().map(|(label, directive)| (label.as_str(), *directive))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<SizeDirective> {
        self.0
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, directive)| *directive)
    }
}

impl<S: Into<String>> FromIterator<(S, SizeDirective)> for TargetSizes {
    fn from_iter<I: IntoIterator<Item = (S, SizeDirective)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(label, directive)| (label.into(), directive))
                .collect(),
        )
    }
}

impl<'de> Deserialize<'de> for TargetSizes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedSizes;

        impl<'de> Visitor<'de> for OrderedSizes {
            type Value = TargetSizes;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of size labels to integers or null")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, SizeDirective)> = Vec::new();
                while let Some((label, directive)) = map.next_entry::<String, SizeDirective>()? {
                    if entries.iter().any(|(l, _)| *l == label) {
                        return Err(de::Error::custom(format!(
                            "duplicate size label `{label}`"
                        )));
                    }
                    entries.push((label, directive));
                }
                Ok(TargetSizes(entries))
            }
        }

        deserializer.deserialize_map(OrderedSizes)
    }
}

/// Processing policy for one directory subtree.
///
/// Immutable once constructed. Directories without their own `config.json`
/// share their parent's value through an [`Rc`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Size label → directive. Every label gets its own output per extension.
    pub target_sizes: TargetSizes,
    /// Output formats to encode for every size label.
    pub target_extensions: Vec<OutputFormat>,
}

impl Config {
    pub fn new(target_sizes: TargetSizes, target_extensions: Vec<OutputFormat>) -> Self {
        Self {
            target_sizes,
            target_extensions,
        }
    }

    /// Number of files one source image fans out into.
    pub fn outputs_per_image(&self) -> usize {
        self.target_sizes.len() * self.target_extensions.len()
    }

    /// Validate values serde cannot check on its own.
    ///
    /// Size labels become file or directory names in the output tree, so they
    /// must be a single, ordinary path component.
    pub fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        for (label, _) in self.target_sizes.iter() {
            let bad = label.is_empty()
                || label == "."
                || label == ".."
                || label.contains(['/', '\\', '\0']);
            if bad {
                return Err(ConfigError::Validation {
                    path: path.to_path_buf(),
                    message: format!("size label `{label}` is not a valid file name"),
                });
            }
        }
        Ok(())
    }
}

/// Where a directory's effective configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// The directory has its own `config.json`.
    Local,
    /// Passed down unchanged from an ancestor (or the caller's default).
    Inherited,
}

/// The configuration that applies to one directory.
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub config: Rc<Config>,
    pub origin: ConfigOrigin,
}

/// Parse and validate the contents of a config file.
///
/// `path` is only used for error reporting.
pub fn parse_config(content: &str, path: &Path) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate(path)?;
    Ok(config)
}

/// Load `config.json` from a directory.
///
/// Returns `Ok(None)` if the directory has no `config.json`.
/// Returns `Err` if the file exists but cannot be read or parsed.
pub fn load_config(dir: &Path) -> Result<Option<Config>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    let content = match fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Io {
                path: config_path,
                source,
            });
        }
    };
    parse_config(&content, &config_path).map(Some)
}

/// Resolve the effective configuration for `dir`.
///
/// A local `config.json` entirely replaces `inherited`. Without one,
/// `inherited` passes through unchanged. Without either, the directory
/// cannot be processed.
pub fn resolve(dir: &Path, inherited: Option<&Rc<Config>>) -> Result<EffectiveConfig, ConfigError> {
    match (load_config(dir)?, inherited) {
        (Some(local), _) => Ok(EffectiveConfig {
            config: Rc::new(local),
            origin: ConfigOrigin::Local,
        }),
        (None, Some(parent)) => Ok(EffectiveConfig {
            config: Rc::clone(parent),
            origin: ConfigOrigin::Inherited,
        }),
        (None, None) => Err(ConfigError::NotFound(dir.to_path_buf())),
    }
}
