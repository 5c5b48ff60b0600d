//! Gatepath - Gate-Level Netlist Analyzer
//!
//! Reports fanout, logic depths and the critical path of a combinational
//! structural Verilog netlist.
//!
//! # Usage
//!
//! ```bash
//! gatepath c17.v --strategy exhaustive --all-paths --fanout
//! RUST_LOG=gatepath_core=debug gatepath c17.v
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gatepath_core::{
    circuit::{validate_circuit, Circuit},
    error::Result,
    netlist, render_report, AnalysisOptions, Strategy,
};
use tracing_subscriber::EnvFilter;

/// Gate-level netlist critical-path analyzer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the structural Verilog netlist
    #[arg(value_name = "NETLIST")]
    netlist: PathBuf,

    /// Longest-path algorithm
    #[arg(short, long, value_enum, default_value_t = Strategy::default())]
    strategy: Strategy,

    /// List every path of maximal length
    #[arg(long)]
    all_paths: bool,

    /// Print the fanout of every gate
    #[arg(long)]
    fanout: bool,

    /// Print the logic depth of every node and primary output
    #[arg(long)]
    depths: bool,

    /// Print circuit statistics
    #[arg(long)]
    stats: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn options(&self) -> AnalysisOptions {
        AnalysisOptions {
            strategy: self.strategy,
            all_paths: self.all_paths,
            fanout: self.fanout,
            depths: self.depths,
            stats: self.stats,
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<String> {
    // Parse the netlist file
    let ast = netlist::parse_file(&args.netlist)?;

    // Build the circuit
    let circuit = Circuit::from_ast(ast)?;

    // Validate
    validate_circuit(&circuit)?;

    render_report(&circuit, &args.options())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
