//! Console front end shared by the `fix-unknown-cities` and
//! `fill-unknown-addresses` binaries.

pub mod cli;

use geofill_core::{JobSummary, RecordOutcome, RecordProgress};

/// Client label the city job sends to Nominatim
pub const CITY_USER_AGENT: &str = "Battery-Recycling-Map (github.com/Zeevmala/solelot)";

/// Client label the address job sends to Nominatim
pub const ADDRESS_USER_AGENT: &str = "battery-recycling-israel-data-cleanup";

/// Initialize env_logger, defaulting to info (or debug when verbose)
pub fn init_logging(verbose: bool) {
    if std::env::var("RUST_LOG").is_err() {
        if verbose {
            std::env::set_var("RUST_LOG", "debug");
        } else {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();
}

/// `[i/total] label -> result` line for the city job
pub fn city_progress_line(progress: &RecordProgress<'_>) -> String {
    let label = progress.name.unwrap_or("N/A");
    let result = match progress.outcome {
        RecordOutcome::NotFound => "No city found".to_string(),
        other => other.to_string(),
    };
    format!("[{}/{}] {} -> {}", progress.index, progress.total, label, result)
}

/// `[i/total] id=.. STATUS` line for the address job
pub fn address_progress_line(progress: &RecordProgress<'_>) -> String {
    let status = match progress.outcome {
        RecordOutcome::Resolved(address) => format!("OK -> {}", address),
        RecordOutcome::NotFound => "NO RESULT".to_string(),
        RecordOutcome::MissingCoordinates => "ERROR: missing lat/lng".to_string(),
        RecordOutcome::Failed(e) if e.is_transient() => format!("ERROR: {}", e),
        RecordOutcome::Failed(e) => format!("UNEXPECTED: {}", e),
    };
    format!(
        "[{}/{}] id={} {}",
        progress.index, progress.total, progress.id, status
    )
}

/// Closing summary for the city job
pub fn city_summary(summary: &JobSummary) -> Vec<String> {
    let report = &summary.report;
    let mut lines = vec![
        "Done!".to_string(),
        format!("  Fixed: {} cities", report.fixed),
        format!("  Failed: {} cities", report.failed),
    ];
    if summary.still_unresolved > 0 {
        lines.push(format!(
            "  {} locations still have Unknown city - may need manual review",
            summary.still_unresolved
        ));
    }
    lines
}

/// Closing summary for the address job
pub fn address_summary(summary: &JobSummary) -> Vec<String> {
    let report = &summary.report;
    let mut lines = vec![
        "--- Done ---".to_string(),
        format!("Success: {}", report.fixed),
        format!("Failed:  {}", report.failed),
    ];
    if !report.failed_ids.is_empty() {
        lines.push(format!("Failed IDs: [{}]", report.failed_ids.join(", ")));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use geofill_core::{EnrichReport, GeocodeError};
    use std::time::Duration;

    fn progress<'a>(outcome: &'a RecordOutcome, name: Option<&'a str>) -> RecordProgress<'a> {
        RecordProgress {
            index: 3,
            total: 10,
            id: "42",
            name,
            outcome,
        }
    }

    fn summary(fixed: usize, failed_ids: &[&str], still_unresolved: usize) -> JobSummary {
        JobSummary {
            report: EnrichReport {
                selected: fixed + failed_ids.len(),
                fixed,
                failed: failed_ids.len(),
                failed_ids: failed_ids.iter().map(|s| s.to_string()).collect(),
            },
            total_locations: 100,
            still_unresolved,
            saved: true,
            waited: Duration::ZERO,
        }
    }

    #[test]
    fn test_city_progress_line() {
        let outcome = RecordOutcome::Resolved("חיפה".to_string());
        assert_eq!(
            city_progress_line(&progress(&outcome, Some("Collection Point"))),
            "[3/10] Collection Point -> חיפה"
        );

        let outcome = RecordOutcome::NotFound;
        assert_eq!(
            city_progress_line(&progress(&outcome, None)),
            "[3/10] N/A -> No city found"
        );
    }

    #[test]
    fn test_address_progress_line() {
        let outcome = RecordOutcome::Resolved("הרצל 12, חיפה".to_string());
        assert_eq!(
            address_progress_line(&progress(&outcome, None)),
            "[3/10] id=42 OK -> הרצל 12, חיפה"
        );

        let outcome = RecordOutcome::Failed(GeocodeError::Timeout);
        assert_eq!(
            address_progress_line(&progress(&outcome, None)),
            "[3/10] id=42 ERROR: geocoding request timed out"
        );

        let outcome = RecordOutcome::Failed(GeocodeError::Unexpected("boom".to_string()));
        assert!(address_progress_line(&progress(&outcome, None)).contains("UNEXPECTED"));
    }

    #[test]
    fn test_summaries() {
        let lines = city_summary(&summary(5, &["7"], 1));
        assert_eq!(lines[1], "  Fixed: 5 cities");
        assert_eq!(lines[2], "  Failed: 1 cities");
        assert!(lines[3].contains("1 locations still have Unknown city"));

        assert_eq!(city_summary(&summary(5, &[], 0)).len(), 3);

        let lines = address_summary(&summary(2, &["3", "9"], 2));
        assert_eq!(lines.last().unwrap(), "Failed IDs: [3, 9]");
    }
}
