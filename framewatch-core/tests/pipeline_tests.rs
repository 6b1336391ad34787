// framewatch-core/tests/pipeline_tests.rs

use framewatch_core::error::CoreError;
use framewatch_core::processing::{FrameNormalizer, RegionOfInterest, score};
use framewatch_core::*;
use image::Rgb;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

// --- Test Helpers ---

#[derive(Default)]
struct CollectingSink {
    events: Mutex<Vec<DetectionEvent>>,
}

impl CollectingSink {
    fn events(&self) -> Vec<DetectionEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl DetectionSink for CollectingSink {
    fn emit(&self, event: DetectionEvent) -> CoreResult<()> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

fn black_frame() -> Frame {
    Frame::new(320, 240)
}

/// A 320x240 frame with a white 100x100 patch inside the bottom half.
fn patch_frame() -> Frame {
    let mut frame = black_frame();
    for y in 130..230 {
        for x in 100..200 {
            frame.put_pixel(x, y, Rgb([255, 255, 255]));
        }
    }
    frame
}

fn config(interval_secs: u32, threshold: u64) -> DetectionConfig {
    DetectionConfigBuilder::new()
        .interval_secs(interval_secs)
        .threshold(threshold)
        .build()
}

fn full_mask() -> Arc<Mask> {
    Arc::new(Mask::filled(320, 120))
}

fn run(
    source: ScriptedSource,
    mask: Arc<Mask>,
    config: &DetectionConfig,
    sink: &dyn DetectionSink,
) -> CoreResult<VideoSummary> {
    let opener = ScriptedOpener::new().with_source("clip.mp4", source);
    let pipeline = DetectionPipeline::new(&opener, mask, config);
    pipeline.process_video(Path::new("videos/clip.mp4"), sink)
}

// --- Cadence ---

#[test]
fn test_scores_one_pair_per_stride() {
    // 2 fps x 2 s interval -> stride 4
    for (frames, expected_pairs) in [(20, 5), (19, 4), (23, 5), (3, 0), (4, 1)] {
        let source = ScriptedSource::repeating(2.0, &black_frame(), frames);
        let sink = CollectingSink::default();
        let summary = run(source, full_mask(), &config(2, 50_000), &sink).unwrap();

        assert_eq!(summary.stride, 4);
        assert_eq!(summary.frames_decoded, frames as u64);
        assert_eq!(
            summary.pairs_scored, expected_pairs,
            "{frames} frames should give {expected_pairs} scored pairs"
        );
    }
}

#[test]
fn test_fractional_frame_rate_is_truncated() {
    let source = ScriptedSource::repeating(29.97, &black_frame(), 120);
    let sink = CollectingSink::default();
    let summary = run(source, full_mask(), &config(2, 50_000), &sink).unwrap();

    assert_eq!(summary.frame_rate, 29);
    assert_eq!(summary.stride, 58);
    assert_eq!(summary.pairs_scored, 2);
}

// --- End-to-end scenario ---

#[test]
fn test_patch_between_pair_is_detected_at_index_two() {
    let source = ScriptedSource::new(1.0, [black_frame(), patch_frame()]);
    let sink = CollectingSink::default();
    let summary = run(source, full_mask(), &config(1, 50_000), &sink).unwrap();

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].frame_index, 2);
    assert!(events[0].score.exceeds(50_000));
    // The pre-motion frame is emitted, cropped to the region of interest.
    assert_eq!(events[0].frame.dimensions(), (320, 120));
    assert!(events[0].frame.pixels().all(|p| p.0 == [0, 0, 0]));

    assert_eq!(summary.detections, 1);
    assert_eq!(summary.peak_score, Some(events[0].score));
}

#[test]
fn test_identical_pair_is_not_detected() {
    let source = ScriptedSource::new(1.0, [patch_frame(), patch_frame()]);
    let sink = CollectingSink::default();
    let summary = run(source, full_mask(), &config(1, 50_000), &sink).unwrap();

    assert!(sink.events().is_empty());
    assert_eq!(summary.pairs_scored, 1);
    assert_eq!(summary.peak_score, Some(MotionScore(0)));
}

#[test]
fn test_motion_above_region_is_ignored() {
    let mut top_patch = black_frame();
    for y in 10..110 {
        for x in 100..200 {
            top_patch.put_pixel(x, y, Rgb([255, 255, 255]));
        }
    }
    let source = ScriptedSource::new(1.0, [black_frame(), top_patch]);
    let sink = CollectingSink::default();
    run(source, full_mask(), &config(1, 0), &sink).unwrap();

    assert!(sink.events().is_empty());
}

#[test]
fn test_masked_out_motion_is_ignored() {
    let source = ScriptedSource::new(1.0, [black_frame(), patch_frame()]);
    let mask = Arc::new(Mask::from_image(&Intensity::new(320, 120)));
    let sink = CollectingSink::default();
    let summary = run(source, mask, &config(1, 0), &sink).unwrap();

    assert!(sink.events().is_empty());
    assert_eq!(summary.peak_score, Some(MotionScore(0)));
}

#[test]
fn test_full_frame_output() {
    let source = ScriptedSource::new(1.0, [black_frame(), patch_frame()]);
    let sink = CollectingSink::default();
    let config = DetectionConfigBuilder::from_config(config(1, 50_000))
        .save_full_frame(true)
        .build();
    run(source, full_mask(), &config, &sink).unwrap();

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].frame.dimensions(), (320, 240));
}

// --- Threshold boundary ---

#[test]
fn test_threshold_is_strict() {
    let first = Frame::from_fn(16, 16, |x, y| Rgb([(x * 7 + y * 3) as u8, 40, 90]));
    let second = Frame::from_fn(16, 16, |x, y| Rgb([(x * 5 + y * 11) as u8, 60, 10]));
    let mask = Arc::new(Mask::filled(16, 8));

    let region = RegionOfInterest::new(0.5);
    let normalizer = FrameNormalizer::new(Arc::clone(&mask), 5);
    let pair_score = score(
        &normalizer.normalize(&region.crop(&first)).unwrap(),
        &normalizer.normalize(&region.crop(&second)).unwrap(),
    )
    .unwrap();
    assert!(pair_score.value() > 0);

    let at_threshold = CollectingSink::default();
    let source = ScriptedSource::new(1.0, [first.clone(), second.clone()]);
    run(source, Arc::clone(&mask), &config(1, pair_score.value()), &at_threshold).unwrap();
    assert!(at_threshold.events().is_empty());

    let below_threshold = CollectingSink::default();
    let source = ScriptedSource::new(1.0, [first, second]);
    run(source, mask, &config(1, pair_score.value() - 1), &below_threshold).unwrap();
    let events = below_threshold.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].score, pair_score);
}

// --- Failures ---

#[test]
fn test_invalid_frame_rate() {
    for rate in [0.0, 0.5, -30.0] {
        let source = ScriptedSource::repeating(rate, &black_frame(), 4);
        let result = run(source, full_mask(), &config(1, 50_000), &CollectingSink::default());
        assert!(
            matches!(result, Err(CoreError::InvalidFrameRate { .. })),
            "rate {rate} should be rejected"
        );
    }
}

#[test]
fn test_mask_resolution_mismatch_is_reported() {
    let source = ScriptedSource::new(1.0, [black_frame(), patch_frame()]);
    let mask = Arc::new(Mask::filled(320, 240));
    let result = run(source, mask, &config(1, 50_000), &CollectingSink::default());

    match result {
        Err(CoreError::DimensionMismatch {
            expected_width,
            expected_height,
            actual_width,
            actual_height,
            ..
        }) => {
            assert_eq!((expected_width, expected_height), (320, 240));
            assert_eq!((actual_width, actual_height), (320, 120));
        }
        other => panic!("Unexpected result: {:?}", other),
    }
}

#[test]
fn test_resolution_change_mid_stream_fails_video() {
    let source = ScriptedSource::new(
        1.0,
        [black_frame(), black_frame(), Frame::new(640, 480), Frame::new(640, 480)],
    );
    let sink = CollectingSink::default();
    let result = run(source, full_mask(), &config(1, 50_000), &sink);

    assert!(matches!(result, Err(CoreError::DimensionMismatch { .. })));
}

#[test]
fn test_unknown_video_is_unreadable() {
    let opener = ScriptedOpener::new();
    let config = config(1, 50_000);
    let pipeline = DetectionPipeline::new(&opener, full_mask(), &config);
    let result = pipeline.process_video(Path::new("videos/absent.mp4"), &CollectingSink::default());

    assert!(matches!(result, Err(CoreError::UnreadableVideo { .. })));
}

#[test]
fn test_unwritable_output_fails_video() {
    let dir = tempdir().unwrap();
    let sink = ImageDirectorySink::new(dir.path().join("missing"), "jpg").unwrap();
    let source = ScriptedSource::new(1.0, [black_frame(), patch_frame()]);
    let result = run(source, full_mask(), &config(1, 50_000), &sink);

    assert!(matches!(result, Err(CoreError::OutputWriteFailure { .. })));
}

#[test]
fn test_detection_written_to_directory() {
    let dir = tempdir().unwrap();
    let sink = ImageDirectorySink::new(dir.path(), "png").unwrap();
    let source = ScriptedSource::new(1.0, [black_frame(), patch_frame()]);
    run(source, full_mask(), &config(1, 50_000), &sink).unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names.len(), 1, "unexpected files: {names:?}");
    assert!(names[0].starts_with("clip.mp4_2_"));
    assert!(names[0].ends_with(".png"));

    let written = image::open(dir.path().join(&names[0])).unwrap();
    assert_eq!((written.width(), written.height()), (320, 120));
}
