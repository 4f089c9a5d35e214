// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Build the [`Tracker`] requested on the command line.

use std::fs;
use std::io::{self, BufWriter};
use std::rc::Rc;

use crate::tracker::multi_tracker::MultiTracker;
use crate::tracker::{EntityManager, TextTracker, TrackConfigError};
use crate::{Tracker, Writer};

/// Where and how verbosely one text tracker writes.
pub struct TrackerConfig<'a> {
    /// Whether the tracker is created at all.
    pub enable: bool,

    /// Level of the entities selected by `filter_regex`.
    pub level: log::Level,

    /// Selects the entities that log at `level`. Empty selects all of them.
    pub filter_regex: &'a str,

    /// Output file, for trackers that write to one.
    pub file: Option<&'a str>,
}

impl Default for TrackerConfig<'_> {
    fn default() -> Self {
        Self {
            enable: true,
            level: log::Level::Warn,
            filter_regex: "",
            file: None,
        }
    }
}

impl TrackerConfig<'_> {
    /// Entities outside the filter only report errors.
    fn entity_manager(&self) -> Result<EntityManager, TrackConfigError> {
        if self.filter_regex.is_empty() {
            return Ok(EntityManager::new(self.level));
        }
        let mut manager = EntityManager::new(log::Level::Error);
        manager.add_entity_level_filter(self.filter_regex, self.level)?;
        Ok(manager)
    }

    fn text_tracker(&self, writer: Writer) -> Result<Tracker, TrackConfigError> {
        Ok(Rc::new(TextTracker::new(self.entity_manager()?, writer)))
    }

    fn stdout(&self) -> Result<Tracker, TrackConfigError> {
        self.text_tracker(Box::new(BufWriter::new(io::stdout())))
    }

    fn log_file(&self) -> Result<Tracker, TrackConfigError> {
        let path = self
            .file
            .ok_or_else(|| TrackConfigError("no log file name given".to_owned()))?;
        let file = fs::File::create(path)
            .map_err(|e| TrackConfigError(format!("cannot create log file {path}: {e}")))?;
        self.text_tracker(Box::new(BufWriter::new(file)))
    }
}

/// The text trackers a run can write to.
pub struct TrackersConfig<'a> {
    /// Console output.
    pub stdout: TrackerConfig<'a>,

    /// Log file output.
    pub log_file: TrackerConfig<'a>,
}

/// Create the enabled trackers, combined if there is more than one.
///
/// With none enabled, `stdout` at `Warn` is used.
pub fn setup_trackers(config: &TrackersConfig) -> Result<Tracker, TrackConfigError> {
    let mut trackers = Vec::new();
    if config.stdout.enable {
        trackers.push(config.stdout.stdout()?);
    }
    if config.log_file.enable {
        trackers.push(config.log_file.log_file()?);
    }

    match trackers.len() {
        0 => TrackerConfig::default().stdout(),
        1 => Ok(trackers.remove(0)),
        _ => {
            let mut multi = MultiTracker::default();
            for tracker in trackers {
                multi.add_tracker(tracker);
            }
            Ok(Rc::new(multi))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Track;

    #[test]
    fn missing_log_file_name() {
        let config = TrackerConfig::default();
        let err = config.log_file().err().map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("Track config error: no log file name given"));
    }

    #[test]
    fn filter_restricts_level() {
        let config = TrackerConfig {
            level: log::Level::Debug,
            filter_regex: "participant2",
            ..TrackerConfig::default()
        };
        let tracker = config.text_tracker(Box::new(io::sink())).unwrap();
        let quiet = tracker.unique_id();
        tracker.add_entity(quiet, "top::ring::participant1");
        let chatty = tracker.unique_id();
        tracker.add_entity(chatty, "top::ring::participant2");

        assert!(!tracker.is_entity_enabled(quiet, log::Level::Warn));
        assert!(tracker.is_entity_enabled(quiet, log::Level::Error));
        assert!(tracker.is_entity_enabled(chatty, log::Level::Debug));
    }
}
