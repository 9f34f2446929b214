//! Ten interacting slits started close together, printed as CSV.
//!
//! Columns: `slit,step,t,re,im`. Pipe into any plotting tool.
//!
//! ```text
//! RUST_LOG=info cargo run --release --example multiple_chordal_sle > trace.csv
//! ```

use multiple_sle::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = SleConfig {
        steps: 5_000,
        t_end: 5.0,
        ..SleConfig::ten_slits()
    };
    let run = run_multiple_sle(&config)?;
    eprintln!("starting points: {:?}", run.starting_points);

    println!("slit,step,t,re,im");
    for (slit, row) in run.trace.rows().enumerate() {
        for (step, z) in row.iter().enumerate() {
            println!("{},{},{},{},{}", slit, step, run.grid[step], z.re, z.im);
        }
    }

    for (slit, s) in run.summary().slits.iter().enumerate() {
        eprintln!(
            "slit {:>2}: tip {:>9.4}{:+.4}i  height {:.4}  extent [{:.4}, {:.4}]",
            slit, s.tip.re, s.tip.im, s.height, s.extent.0, s.extent.1
        );
    }
    Ok(())
}
