//! Fill in `address: "Unknown"` entries of locations.json with a street
//! address from Nominatim, combined with the entry's known city.

use anyhow::Result;
use geofill_cli::{address_progress_line, address_summary, cli, init_logging, ADDRESS_USER_AGENT};
use geofill_core::{JobConfig, NominatimClient, RecordProgress};

fn main() -> Result<()> {
    let args = cli::parse_args();
    init_logging(args.verbose);

    let config = args.job_config(JobConfig::address());
    let geocoder = NominatimClient::new(&args.geocoder_config(ADDRESS_USER_AGENT))?;

    if config.dry_run {
        log::info!(
            "Running in DRY-RUN mode - {} will not be modified",
            config.dataset_path.display()
        );
    }

    let print_progress =
        |progress: &RecordProgress<'_>| println!("{}", address_progress_line(progress));
    let summary = geofill_core::run_address_job(&config, &geocoder, Some(&print_progress))?;

    if summary.report.selected == 0 {
        println!("Nothing to do!");
        return Ok(());
    }

    println!();
    for line in address_summary(&summary) {
        println!("{}", line);
    }

    Ok(())
}
