//! NER Simulator - Entry point
//!
//! CLI Usage:
//!   cargo run                          # Wire the published model and run one step
//!   cargo run -- --diagnose            # Run and print pathway diagnostics
//!   cargo run -- --diagnose -n 10000   # Custom step count

use std::time::Instant;

use anyhow::Result;
use ner_simulator::{build_pathway, config::RepairParameters, Pathway, PathwayConfig};

const PARAMETERS_PATH: &str = "data/parameters/repair.json";

/// Run the pathway with progress reports and a final summary
fn run_diagnostics(pathway: &mut Pathway, steps: usize) {
    println!("=== NER Simulator - Pathway Diagnostics ===\n");
    println!("dt: {:e}", pathway.config.dt_sec);
    println!("Routing: {:?}", pathway.config.delta_routing);

    let initial = pathway.diagnostics();
    println!("Initial intermediate mass: {:.9}", initial.total_intermediate_mass());
    println!("\n--- Running {} steps ---\n", steps);

    let start_time = Instant::now();
    for step in 0..steps {
        pathway.step();

        // Report progress every 10%
        if steps >= 10 && step % (steps / 10) == 0 {
            let progress = (step as f32 / steps as f32) * 100.0;
            let diag = pathway.diagnostics();
            println!(
                "  {:3.0}%: step={}, mass={:.9}, non-finite={}",
                progress,
                step,
                diag.total_intermediate_mass(),
                diag.non_finite_count
            );
        }
    }
    let elapsed = start_time.elapsed();

    println!("\n=== Results ===");
    println!("Elapsed time: {:.2?}", elapsed);
    println!("Simulated time: {:e}", steps as f64 * pathway.config.dt_sec);
    println!();
    pathway.diagnostics().print_summary();
}

/// Parse CLI arguments
fn parse_args() -> (bool, usize) {
    let args: Vec<String> = std::env::args().collect();
    let mut diagnose = false;
    let mut steps = 1;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--diagnose" | "-d" => diagnose = true,
            "-n" | "--steps" => {
                i += 1;
                if i < args.len() {
                    steps = args[i].parse().unwrap_or(1);
                }
            }
            other => log::warn!("Ignoring unknown argument {:?}", other),
        }
        i += 1;
    }

    (diagnose, steps)
}

fn main() -> Result<()> {
    env_logger::init();

    let (diagnose, steps) = parse_args();

    let params = RepairParameters::load_or_default(PARAMETERS_PATH);
    let mut pathway = build_pathway(&params, PathwayConfig::default())?;

    if diagnose {
        run_diagnostics(&mut pathway, steps);
        return Ok(());
    }

    pathway.run(steps);
    log::info!(
        "Completed {} steps, total intermediate mass {:.9}",
        steps,
        pathway.diagnostics().total_intermediate_mass()
    );

    Ok(())
}
