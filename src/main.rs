//! # logtable
//!
//! Command-line front end for extracting numeric tables from simulation
//! logs.
//!
//! ## Usage
//!
//! ```bash
//! # List the thermo tables in a LAMMPS log
//! logtable scan log.lammps --columns Step PotEng TotEng
//!
//! # Export the last one with a derived column
//! logtable extract log.lammps --columns Step PotEng TotEng --instance last \
//!     --operations "KinEng = TotEng - PotEng" --outfile thermo.parquet
//!
//! # Inspect the exported file
//! logtable info thermo.parquet
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
