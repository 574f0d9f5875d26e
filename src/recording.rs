//! Per-trial response rows and per-tick head traces, flushed to flat text files.

use std::path::PathBuf;

use crate::kinematics::{Pose, Quat, Vec3};

mod records;
mod writer;

pub use records::{
    LinearBackwardRecord, LinearForwardRecord, RotationRecord, TrialRecord, TriangleRecord,
};
pub use writer::{write_log_file, FileWriter};

/// A fully formatted file waiting to be written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogFile {
    pub path: PathBuf,
    pub lines: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ResponseLog<R> {
    records: Vec<R>,
}

impl<R> Default for ResponseLog<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R: TrialRecord> ResponseLog<R> {
    pub fn push(&mut self, record: R) {
        log::debug!("response {}", record.line());
        self.records.push(record);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Header line followed by one line per record. Empties the log.
    pub fn dump(&mut self, path: PathBuf, header: &str) -> LogFile {
        let mut lines = Vec::with_capacity(self.records.len() + 1);
        lines.push(header.to_owned());
        lines.extend(self.records.drain(..).map(|record| record.line()));
        LogFile { path, lines }
    }
}

/// Pose of a body reported by the tracking hardware.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrackedPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl From<Pose> for TrackedPose {
    fn from(pose: Pose) -> Self {
        Self {
            position: pose.position,
            rotation: pose.orientation.to_quat(),
        }
    }
}

/// One trace row: observer rig then head, both in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceSample {
    pub time_s: f64,
    pub rig: TrackedPose,
    pub head: TrackedPose,
}

impl TraceSample {
    pub fn line(&self) -> String {
        let body = |p: &TrackedPose| {
            format!(
                "{}, {}, {}, {}, {}, {}, {}",
                p.position.x,
                p.position.y,
                p.position.z,
                p.rotation.x,
                p.rotation.y,
                p.rotation.z,
                p.rotation.w
            )
        };
        format!("{}, {}, {}", self.time_s, body(&self.rig), body(&self.head))
    }
}

#[derive(Clone, Debug, Default)]
pub struct HeadTrackerLog {
    lines: Vec<String>,
    recording: bool,
}

impl HeadTrackerLog {
    pub fn start_recording(&mut self) {
        self.lines.clear();
        self.recording = true;
    }

    pub fn record(&mut self, sample: &TraceSample) {
        if self.recording {
            self.lines.push(sample.line());
        }
    }

    #[inline]
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Ends the window and hands back its rows, without a header.
    pub fn stop_recording_and_save(&mut self, path: PathBuf) -> LogFile {
        self.recording = false;
        LogFile {
            path,
            lines: core::mem::take(&mut self.lines),
        }
    }
}
