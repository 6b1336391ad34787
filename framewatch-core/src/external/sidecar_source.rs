// ============================================================================
// framewatch-core/src/external/sidecar_source.rs
// ============================================================================
//
// FFMPEG FRAME SOURCE: Decoding Through ffmpeg-sidecar
//
// Probes a video with ffprobe for its frame rate, then spawns ffmpeg to
// decode the first video stream to raw RGB24 on stdout. ffmpeg-sidecar parses
// that stream into OutputFrame events, which are handed out one per call.
//
// A decoder failure before the first frame makes the video unreadable. A
// failure after frames were produced ends the stream early with a warning,
// the same way a failed read simply ends a sequential read loop.

use crate::error::{CoreResult, command_start_error, unreadable_video};
use crate::external::frame_source::{FrameSource, SourceOpener, parse_frame_rate};
use crate::frame::Frame;

use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use ffmpeg_sidecar::iter::FfmpegIterator;
use log::{debug, trace, warn};

use std::path::{Path, PathBuf};

/// Opens videos by probing them with ffprobe and decoding them with ffmpeg.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarOpener;

impl SourceOpener for SidecarOpener {
    type Source = SidecarFrameSource;

    fn open(&self, path: &Path) -> CoreResult<Self::Source> {
        if !path.is_file() {
            return Err(unreadable_video(path, "file does not exist"));
        }

        let frame_rate = probe_frame_rate(path)?;

        let mut cmd = build_decode_command(path);
        debug!("Starting ffmpeg rawvideo decode of {}", path.display());

        let mut child = cmd
            .spawn()
            .map_err(|e| command_start_error("ffmpeg (frame decode)", e))?;
        let events = match child.iter() {
            Ok(events) => events,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(unreadable_video(path, format!("failed to read ffmpeg output: {e}")));
            }
        };

        Ok(SidecarFrameSource {
            path: path.to_path_buf(),
            frame_rate,
            child,
            events,
            decoded: 0,
            last_error: None,
            finished: false,
        })
    }
}

/// Output options placed ahead of the rawvideo muxer. Every decoded frame
/// is emitted exactly once: no duplication or dropping to a constant rate.
const DECODE_ARGS: [&str; 6] = ["-map", "0:v:0", "-an", "-sn", "-fps_mode", "passthrough"];

/// Builds the ffmpeg invocation decoding the first video stream to RGB24.
fn build_decode_command(path: &Path) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.input(path.to_string_lossy().into_owned());
    cmd.args(DECODE_ARGS);
    cmd.rawvideo();
    cmd
}

/// Reads the first video stream's frame rate, preferring the average rate.
///
/// A stream that reports no usable rate yields 0.0, which the pipeline
/// rejects as an invalid frame rate.
fn probe_frame_rate(path: &Path) -> CoreResult<f64> {
    let probe = ffprobe::ffprobe(path)
        .map_err(|e| unreadable_video(path, format!("ffprobe failed: {e:?}")))?;

    let stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| unreadable_video(path, "no video stream found"))?;

    let rate = parse_frame_rate(&stream.avg_frame_rate)
        .filter(|rate| *rate > 0.0)
        .or_else(|| parse_frame_rate(&stream.r_frame_rate))
        .unwrap_or(0.0);

    debug!(
        "Probed {}: avg_frame_rate={} r_frame_rate={} -> {:.3} fps",
        path.display(),
        stream.avg_frame_rate,
        stream.r_frame_rate,
        rate
    );
    Ok(rate)
}

/// A running ffmpeg decode of one video.
pub struct SidecarFrameSource {
    path: PathBuf,
    frame_rate: f64,
    child: FfmpegChild,
    events: FfmpegIterator,
    decoded: u64,
    last_error: Option<String>,
    finished: bool,
}

impl SidecarFrameSource {
    /// Waits for ffmpeg to exit and decides between end-of-stream and failure.
    fn finish(&mut self) -> CoreResult<Option<Frame>> {
        self.finished = true;
        let status = self.child.wait()?;
        let reason = self
            .last_error
            .take()
            .unwrap_or_else(|| format!("ffmpeg exited with {status}"));
        classify_exit(&self.path, status.success(), self.decoded, reason)
    }
}

/// Maps the decoder's exit to the end of the frame stream.
///
/// A clean exit is end-of-stream. A failed exit before any frame makes the
/// video unreadable; after some frames it only cuts the stream short.
fn classify_exit(
    path: &Path,
    success: bool,
    decoded: u64,
    reason: String,
) -> CoreResult<Option<Frame>> {
    if success {
        debug!("Decoder finished {} after {} frames", path.display(), decoded);
        return Ok(None);
    }

    if decoded == 0 {
        return Err(unreadable_video(path, reason));
    }

    warn!(
        "Decoding of {} stopped after {} frames: {}",
        path.display(),
        decoded,
        reason
    );
    Ok(None)
}

impl FrameSource for SidecarFrameSource {
    fn reported_frame_rate(&self) -> f64 {
        self.frame_rate
    }

    fn next_frame(&mut self) -> CoreResult<Option<Frame>> {
        if self.finished {
            return Ok(None);
        }

        for event in self.events.by_ref() {
            match event {
                FfmpegEvent::OutputFrame(frame) => {
                    let (width, height) = (frame.width, frame.height);
                    let image = Frame::from_raw(width, height, frame.data).ok_or_else(|| {
                        unreadable_video(
                            &self.path,
                            format!("decoder produced a truncated {width}x{height} frame"),
                        )
                    })?;
                    self.decoded += 1;
                    return Ok(Some(image));
                }
                FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line)
                | FfmpegEvent::Error(line) => {
                    trace!("ffmpeg [{}]: {}", self.path.display(), line);
                    self.last_error = Some(line);
                }
                _ => {}
            }
        }

        self.finish()
    }
}

impl Drop for SidecarFrameSource {
    fn drop(&mut self) {
        if !self.finished {
            // Closed before end-of-stream: stop the decoder instead of draining it.
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_clean_exit_ends_stream() {
        let result = classify_exit(Path::new("yard.mp4"), true, 0, String::new());
        assert!(matches!(result, Ok(None)));

        let result = classify_exit(Path::new("yard.mp4"), true, 120, String::new());
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_failure_before_first_frame_is_unreadable() {
        let result = classify_exit(
            Path::new("yard.mp4"),
            false,
            0,
            "moov atom not found".to_string(),
        );
        match result {
            Err(CoreError::UnreadableVideo { path, reason }) => {
                assert_eq!(path, PathBuf::from("yard.mp4"));
                assert_eq!(reason, "moov atom not found");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_failure_after_frames_ends_stream() {
        let result = classify_exit(
            Path::new("yard.mp4"),
            false,
            37,
            "Invalid NAL unit size".to_string(),
        );
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_decode_passes_frames_through_unchanged() {
        let mode = DECODE_ARGS
            .iter()
            .position(|arg| *arg == "-fps_mode")
            .expect("frame rate mode is set");
        assert_eq!(DECODE_ARGS[mode + 1], "passthrough");
        assert_eq!(&DECODE_ARGS[..2], &["-map", "0:v:0"]);

        // Builds without spawning; the input path is passed as an owned string.
        let _cmd = build_decode_command(Path::new("clips/back yard.mp4"));
    }
}
