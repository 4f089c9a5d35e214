// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Run settings.
//!
//! Settings are layered, each layer overriding the one before:
//!  1. the built-in [`Settings::default`],
//!  2. a TOML settings file (`ringmul.toml` when present, or the file given
//!     with `--settings`),
//!  3. environment variables prefixed with `RINGMUL_`, e.g.
//!     `RINGMUL_RING_SIZE=4`,
//!  4. a legacy four-token settings file, when one is given,
//!  5. options given explicitly on the command line.
//!
//! The legacy file holds whitespace-separated tokens: the element type
//! (exactly `real` selects reals, anything else integers) followed by the paths of
//! `A`, `B` and `C`.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use ringmul_engine::config_error;
use ringmul_engine::types::{RingError, RingResult};
use ringmul_models::element::ElementType;
use ringmul_models::partition::{Dims, Partition};
use serde::{Deserialize, Serialize};

/// Settings file read when no `--settings` option is given, if it exists.
pub const DEFAULT_SETTINGS_FILE: &str = "ringmul.toml";

/// Prefix of the environment variables that override settings.
pub const ENV_PREFIX: &str = "RINGMUL_";

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// A single participant multiplies the full matrices.
    Synchronous,

    /// A ring of participants rotates the column-panels of `B`.
    #[default]
    Pipelined,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Settings {
    pub element_type: ElementType,
    pub mode: Mode,
    pub ring_size: usize,
    pub root: usize,
    pub n1: usize,
    pub n2: usize,
    pub n3: usize,
    pub path_a: PathBuf,
    pub path_b: PathBuf,
    pub path_c: PathBuf,

    /// Also run the baseline and check that the products agree.
    pub verify: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            element_type: ElementType::Integer,
            mode: Mode::Pipelined,
            ring_size: 8,
            root: 0,
            n1: 960,
            n2: 768,
            n3: 160,
            path_a: PathBuf::from("MatrixA.txt"),
            path_b: PathBuf::from("MatrixB.txt"),
            path_c: PathBuf::from("MatrixC.txt"),
            verify: false,
        }
    }
}

/// Values given explicitly on the command line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SettingsOverrides {
    pub element_type: Option<ElementType>,
    pub mode: Option<Mode>,
    pub ring_size: Option<usize>,
    pub root: Option<usize>,
    pub n1: Option<usize>,
    pub n2: Option<usize>,
    pub n3: Option<usize>,
    pub path_a: Option<PathBuf>,
    pub path_b: Option<PathBuf>,
    pub path_c: Option<PathBuf>,
    pub verify: Option<bool>,
}

/// Where the settings layers come from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SettingsFiles {
    /// A TOML file which must exist. When `None` the
    /// [`DEFAULT_SETTINGS_FILE`] is used if it exists.
    pub settings: Option<PathBuf>,

    /// A legacy four-token settings file.
    pub legacy: Option<PathBuf>,
}

/// The contents of a legacy settings file.
#[derive(Clone, Debug, PartialEq)]
pub struct LegacySettings {
    pub element_type: ElementType,
    pub path_a: PathBuf,
    pub path_b: PathBuf,
    pub path_c: PathBuf,
}

impl LegacySettings {
    pub fn load(path: &Path) -> RingResult<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => return config_error!("unable to read {}: {e}", path.display()),
        };
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let [element_type, path_a, path_b, path_c] = tokens[..] else {
            return config_error!(
                "{}: expected 4 settings (type, A, B, C) but found {}",
                path.display(),
                tokens.len()
            );
        };

        let element_type = if element_type == "real" {
            ElementType::Real
        } else {
            ElementType::Integer
        };
        Ok(Self {
            element_type,
            path_a: PathBuf::from(path_a),
            path_b: PathBuf::from(path_b),
            path_c: PathBuf::from(path_c),
        })
    }
}

impl Settings {
    /// Load and validate the settings from every layer.
    pub fn load(files: &SettingsFiles, overrides: &SettingsOverrides) -> RingResult<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Settings::default()));

        match &files.settings {
            Some(path) => {
                if !path.is_file() {
                    return config_error!("settings file {} not found", path.display());
                }
                figment = figment.merge(Toml::file(path));
            }
            None => {
                if Path::new(DEFAULT_SETTINGS_FILE).is_file() {
                    figment = figment.merge(Toml::file(DEFAULT_SETTINGS_FILE));
                }
            }
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        let mut settings: Settings = figment
            .extract()
            .map_err(|e| RingError::Config(format!("invalid settings: {e}")))?;

        if let Some(path) = &files.legacy {
            settings.apply_legacy(LegacySettings::load(path)?);
        }
        settings.apply_overrides(overrides);
        settings.validate()?;
        Ok(settings)
    }

    pub fn apply_legacy(&mut self, legacy: LegacySettings) {
        self.element_type = legacy.element_type;
        self.path_a = legacy.path_a;
        self.path_b = legacy.path_b;
        self.path_c = legacy.path_c;
    }

    pub fn apply_overrides(&mut self, overrides: &SettingsOverrides) {
        if let Some(element_type) = overrides.element_type {
            self.element_type = element_type;
        }
        if let Some(mode) = overrides.mode {
            self.mode = mode;
        }
        if let Some(ring_size) = overrides.ring_size {
            self.ring_size = ring_size;
        }
        if let Some(root) = overrides.root {
            self.root = root;
        }
        if let Some(n1) = overrides.n1 {
            self.n1 = n1;
        }
        if let Some(n2) = overrides.n2 {
            self.n2 = n2;
        }
        if let Some(n3) = overrides.n3 {
            self.n3 = n3;
        }
        if let Some(path_a) = &overrides.path_a {
            self.path_a.clone_from(path_a);
        }
        if let Some(path_b) = &overrides.path_b {
            self.path_b.clone_from(path_b);
        }
        if let Some(path_c) = &overrides.path_c {
            self.path_c.clone_from(path_c);
        }
        if let Some(verify) = overrides.verify {
            self.verify = verify;
        }
    }

    /// Check the settings can be run.
    ///
    /// The ring partition is only checked when the ring is used.
    pub fn validate(&self) -> RingResult {
        for (name, path) in [("A", &self.path_a), ("B", &self.path_b), ("C", &self.path_c)] {
            if path.as_os_str().is_empty() {
                return config_error!("no path given for matrix {name}");
            }
        }
        if self.mode == Mode::Pipelined || self.verify {
            Partition::new(self.dims(), self.ring_size)?;
            if self.root >= self.ring_size {
                return config_error!(
                    "root rank {} is outside a ring of size {}",
                    self.root,
                    self.ring_size
                );
            }
        } else if self.n1 == 0 || self.n2 == 0 || self.n3 == 0 {
            return config_error!("matrix dimensions {} must all be non-zero", self.dims());
        }
        Ok(())
    }

    #[must_use]
    pub fn dims(&self) -> Dims {
        Dims::new(self.n1, self.n2, self.n3)
    }
}
