//! Cucumber runner for the suite.
//!
//! Runs every feature under `features/`, prints a run summary and writes
//! the JSON/HTML reports to `target/suite-reports/`. Scenarios execute one
//! at a time; within a scenario every action is sequential and blocking.

mod steps;
mod world;

use std::time::Instant;

use cucumber::World as _;

use world::SuiteWorld;

#[tokio::main]
async fn main() {
    env_logger::init();

    println!("Starting suite...");
    let started = Instant::now();

    let _ = SuiteWorld::cucumber()
        .max_concurrent_scenarios(1)
        .fail_on_skipped()
        .run("features")
        .await;

    let (runs, failures) = match horizons_e2e::report::write_reports() {
        Ok(counts) => counts,
        Err(e) => {
            eprintln!("failed to write reports: {}", e);
            std::process::exit(2);
        }
    };

    println!("Tests completed. Run count: {}", runs);
    println!("Failure count: {}", failures);
    println!("Run time: {:?}", started.elapsed());
    println!(
        "Reports generated under {}/report.html and report.json",
        horizons_e2e::report::REPORT_DIR
    );

    if failures > 0 {
        std::process::exit(1);
    }
}
