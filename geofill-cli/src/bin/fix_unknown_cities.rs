//! Fill in `city: "Unknown"` entries of locations.json by reverse geocoding
//! their coordinates with Nominatim (1 request/second).

use anyhow::Result;
use geofill_cli::{cli, city_progress_line, city_summary, init_logging, CITY_USER_AGENT};
use geofill_core::{JobConfig, NominatimClient, RecordProgress};

fn main() -> Result<()> {
    let args = cli::parse_args();
    init_logging(args.verbose);

    let config = args.job_config(JobConfig::city());
    let geocoder = NominatimClient::new(&args.geocoder_config(CITY_USER_AGENT))?;

    if config.dry_run {
        log::info!(
            "Running in DRY-RUN mode - {} will not be modified",
            config.dataset_path.display()
        );
    }

    let print_progress =
        |progress: &RecordProgress<'_>| println!("{}", city_progress_line(progress));
    let summary = geofill_core::run_city_job(&config, &geocoder, Some(&print_progress))?;

    if summary.report.selected == 0 {
        println!("No Unknown cities to fix!");
        return Ok(());
    }

    println!();
    for line in city_summary(&summary) {
        println!("{}", line);
    }

    Ok(())
}
