//! Terminal points of complex Burgers characteristics, printed as CSV.
//!
//! ```text
//! cargo run --release --example burgers > burgers.csv
//! ```

use multiple_sle::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let t = TimeGrid::linspace(0.0, 1.0, 1000)?;
    let endpoints = burgers(&t, 1000, &EulerMaruyama)?;

    println!("j,re,im");
    for (j, x) in endpoints.iter().enumerate() {
        println!("{},{},{}", j, x.re, x.im);
    }
    Ok(())
}
