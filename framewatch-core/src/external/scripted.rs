// ============================================================================
// framewatch-core/src/external/scripted.rs
// ============================================================================
//
// SCRIPTED FRAME SOURCES: In-Memory Decoding for Tests
//
// Stand-ins for the ffmpeg-backed source. A ScriptedSource replays a fixed
// list of frames (optionally failing at a given position), and a
// ScriptedOpener maps file names to scripts so the batch runner and pipeline
// can be exercised without a decoder or real video files.

use crate::error::{CoreError, CoreResult, unreadable_video};
use crate::external::frame_source::{FrameSource, SourceOpener};
use crate::frame::Frame;

use std::collections::{HashMap, VecDeque};
use std::path::Path;

/// One scripted step of a source.
#[derive(Debug, Clone)]
pub enum ScriptedStep {
    Frame(Frame),
    /// Fail the decode call with `UnreadableVideo` carrying this reason.
    Fail(String),
}

/// Replays a scripted sequence of frames.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    frame_rate: f64,
    steps: VecDeque<ScriptedStep>,
}

impl ScriptedSource {
    /// A source yielding `frames` in order at `frame_rate`.
    pub fn new(frame_rate: f64, frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            frame_rate,
            steps: frames.into_iter().map(ScriptedStep::Frame).collect(),
        }
    }

    /// A source replaying arbitrary steps, including decode failures.
    pub fn from_steps(frame_rate: f64, steps: impl IntoIterator<Item = ScriptedStep>) -> Self {
        Self {
            frame_rate,
            steps: steps.into_iter().collect(),
        }
    }

    /// A source of `count` copies of the same frame.
    pub fn repeating(frame_rate: f64, frame: &Frame, count: usize) -> Self {
        Self::new(frame_rate, std::iter::repeat_n(frame.clone(), count))
    }

    /// Frames not yet handed out.
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl FrameSource for ScriptedSource {
    fn reported_frame_rate(&self) -> f64 {
        self.frame_rate
    }

    fn next_frame(&mut self) -> CoreResult<Option<Frame>> {
        match self.steps.pop_front() {
            Some(ScriptedStep::Frame(frame)) => Ok(Some(frame)),
            Some(ScriptedStep::Fail(reason)) => {
                self.steps.clear();
                Err(unreadable_video(Path::new("<scripted>"), reason))
            }
            None => Ok(None),
        }
    }
}

/// Opens scripted sources by file name. Unknown names are unreadable.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOpener {
    sources: HashMap<String, ScriptedSource>,
}

impl ScriptedOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the source returned when a path with this file name is opened.
    pub fn with_source(mut self, file_name: impl Into<String>, source: ScriptedSource) -> Self {
        self.sources.insert(file_name.into(), source);
        self
    }
}

impl SourceOpener for ScriptedOpener {
    type Source = ScriptedSource;

    fn open(&self, path: &Path) -> CoreResult<Self::Source> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| CoreError::PathError(format!("No file name in {}", path.display())))?;
        self.sources
            .get(&name)
            .cloned()
            .ok_or_else(|| unreadable_video(path, "no scripted source registered"))
    }
}
