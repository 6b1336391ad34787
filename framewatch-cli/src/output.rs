// ============================================================================
// framewatch-cli/src/output.rs
// ============================================================================
//
// TERMINAL OUTPUT: Run header, batch summary and error display
//
// Everything the user reads on stdout goes through here. Diagnostic output
// goes through the `log` macros instead.

// ---- External crate imports ----
use console::style;
use framewatch_core::{BatchSummary, CoreError, DetectionConfig, format_duration};

// ---- Standard library imports ----
use std::path::Path;

const RULE: &str = "========================================";

fn label_value(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label:<18}")).bold(), value);
}

/// Prints the effective settings before a scan starts.
pub fn print_scan_header(config: &DetectionConfig, input: &Path, files: usize, workers: usize) {
    println!("{}", style(RULE).cyan().bold());
    println!("{}", style("Framewatch Scan").bold());
    println!("{}", style(RULE).cyan().bold());
    label_value("Input:", input.display());
    label_value("Output directory:", config.output_dir.display());
    label_value("Mask:", config.mask_path.display());
    label_value("Videos:", files);
    label_value("Interval:", format!("{}s", config.interval_secs));
    label_value("Threshold:", config.threshold);
    label_value("Blur:", config.blur_size);
    label_value("Crop fraction:", config.crop_fraction);
    label_value("Workers:", workers);
}

/// Prints the message shown when discovery found nothing to scan.
pub fn print_no_files(input: &Path, extension: &str) {
    println!(
        "{}",
        style(format!(
            "No processable .{} files found in {}",
            extension,
            input.display()
        ))
        .yellow()
    );
}

/// Prints per-video results and the batch totals.
pub fn print_summary(summary: &BatchSummary) {
    println!("{}", style(RULE).cyan().bold());
    println!("{}", style("Scan Summary").bold());
    println!("{}", style(RULE).cyan().bold());

    for outcome in &summary.outcomes {
        let name = outcome
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| outcome.path.display().to_string());
        match &outcome.result {
            Ok(video) => {
                let peak = video
                    .peak_score
                    .map_or_else(|| "-".to_string(), |score| score.to_string());
                println!(
                    "{} {}  {} frames, {} pairs @ stride {}, peak {}, {} detection(s)",
                    style("[OK]").green(),
                    style(name).bold(),
                    video.frames_decoded,
                    video.pairs_scored,
                    video.stride,
                    peak,
                    video.detections
                );
            }
            Err(e) => {
                println!(
                    "{} {}  {}: {}",
                    style("[FAIL]").red().bold(),
                    style(name).bold(),
                    e.kind(),
                    e
                );
            }
        }
    }

    println!("{}", style("----------------------------------------").cyan());
    label_value("Attempted:", summary.attempted());
    label_value("Succeeded:", style(summary.succeeded()).green());
    let failed = if summary.has_failures() {
        style(summary.failed()).red().bold()
    } else {
        style(summary.failed())
    };
    label_value("Failed:", failed);
    label_value("Detections:", style(summary.total_detections()).bold());
    label_value("Elapsed:", format_duration(summary.elapsed.as_secs_f64()));
}

/// Prints a fatal error to stderr.
pub fn print_error(error: &CoreError) {
    eprintln!("{} {}", style("Error:").red().bold(), error);
}
