// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Command-line arguments of the `ringmul` binary.

use std::path::PathBuf;

use clap::Parser;
use ringmul_models::element::ElementType;
use ringmul_track::builder::{TrackerConfig, TrackersConfig};

use crate::settings::{Mode, SettingsFiles, SettingsOverrides};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(about = "Multiply two matrices on a ring of pipelined participants")]
pub struct Cli {
    /// Enable logging to the console.
    #[arg(long, default_value = "false")]
    pub stdout: bool,

    /// Level of log message to display.
    #[arg(long, default_value = "Info")]
    pub stdout_level: log::Level,

    /// Set a regular expression for which entites should have logging level set
    /// to `--stdout-level`. Others will have level set to `Error`.
    #[arg(long, default_value = "")]
    pub stdout_filter_regex: String,

    /// Enable logging to the given text file.
    #[arg(long)]
    pub log_file: Option<String>,

    /// Level of log message to write to the log file.
    #[arg(long, default_value = "Trace")]
    pub log_file_level: log::Level,

    /// Set a regular expression for which entites should have log file level
    /// set to `--log-file-level`. Others will have level set to `Error`.
    #[arg(long, default_value = "")]
    pub log_file_filter_regex: String,

    /// TOML settings file [default: ringmul.toml, when present].
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Legacy settings file holding the element type and the paths of A, B
    /// and C.
    #[arg(long)]
    pub legacy_settings: Option<PathBuf>,

    /// Element type of the matrices.
    #[arg(long, value_enum)]
    pub element_type: Option<ElementType>,

    /// Multiply on the ring or with the synchronous baseline.
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,

    /// The number of participants in the ring.
    #[arg(long)]
    pub ring_size: Option<usize>,

    /// The rank that assembles the product.
    #[arg(long)]
    pub root: Option<usize>,

    /// Rows of A.
    #[arg(long)]
    pub n1: Option<usize>,

    /// Columns of A and rows of B.
    #[arg(long)]
    pub n2: Option<usize>,

    /// Columns of B.
    #[arg(long)]
    pub n3: Option<usize>,

    /// Path of the input matrix A.
    #[arg(long)]
    pub matrix_a: Option<PathBuf>,

    /// Path of the input matrix B.
    #[arg(long)]
    pub matrix_b: Option<PathBuf>,

    /// Path the product C is written to.
    #[arg(long)]
    pub matrix_c: Option<PathBuf>,

    /// Also run the synchronous baseline and check the products agree.
    #[arg(long)]
    pub verify: bool,
}

impl Cli {
    #[must_use]
    pub fn trackers_config(&self) -> TrackersConfig<'_> {
        TrackersConfig {
            stdout: TrackerConfig {
                enable: self.stdout,
                level: self.stdout_level,
                filter_regex: &self.stdout_filter_regex,
                file: None,
            },
            log_file: TrackerConfig {
                enable: self.log_file.is_some(),
                level: self.log_file_level,
                filter_regex: &self.log_file_filter_regex,
                file: self.log_file.as_deref(),
            },
        }
    }

    #[must_use]
    pub fn settings_files(&self) -> SettingsFiles {
        SettingsFiles {
            settings: self.settings.clone(),
            legacy: self.legacy_settings.clone(),
        }
    }

    #[must_use]
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            element_type: self.element_type,
            mode: self.mode,
            ring_size: self.ring_size,
            root: self.root,
            n1: self.n1,
            n2: self.n2,
            n3: self.n3,
            path_a: self.matrix_a.clone(),
            path_b: self.matrix_b.clone(),
            path_c: self.matrix_c.clone(),
            verify: self.verify.then_some(true),
        }
    }
}
