// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Helper functions for creating trackers in tests.

use std::fs;
use std::io::BufWriter;
use std::path::Path;
use std::rc::Rc;

use crate::tracker::{EntityManager, InMemoryTracker, TextTracker};
use crate::{Tracker, Writer};

/// Create a tracker that writes every event to `traces/<test name>.log`.
///
/// The test name is taken from the file stem of `full_filepath`, so tests
/// should pass `file!()`.
#[must_use]
pub fn create_tracker(full_filepath: &str) -> Tracker {
    // Place all trace files in one folder
    const FOLDER: &str = "traces";
    fs::create_dir_all(FOLDER).expect("should be able to create the traces folder");

    let filename_only = Path::new(full_filepath)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("test");

    let log_writer: Writer = Box::new(BufWriter::new(
        fs::File::create(format!("{FOLDER}/{filename_only}.log"))
            .expect("should be able to create the trace file"),
    ));

    let entity_manager = EntityManager::new(log::Level::Trace);
    let tracker: Tracker = Rc::new(TextTracker::new(entity_manager, log_writer));
    tracker
}

/// Create a tracker that keeps all events in memory at the given level.
///
/// The concrete tracker is returned alongside the shared [`Tracker`] so that
/// tests can inspect the events afterwards.
#[must_use]
pub fn create_in_memory_tracker(level: log::Level) -> (Rc<InMemoryTracker>, Tracker) {
    let in_memory = Rc::new(InMemoryTracker::new(EntityManager::new(level)));
    let tracker: Tracker = in_memory.clone();
    (in_memory, tracker)
}
