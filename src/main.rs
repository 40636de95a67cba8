// Copyright (c) 2024 Mudit Bhargava
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.
//

// main.rs
//
// Command-line entry point for the Tomasulo simulation core. Only this
// binary initializes the `log` backend (`env_logger`) — library code
// below it only ever calls the `log` macros, never `env_logger::init`.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tomasulo_core::core::validator;
use tomasulo_core::core::{TomasuloConfig, TomasuloCore};
use tomasulo_core::output::{self, OutputFormat};
use tomasulo_core::trace_io::load_trace;

#[derive(Parser)]
#[command(name = "tomasulo-core")]
#[command(about = "Cycle-accurate Tomasulo scheduler simulator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a decoded instruction trace and report per-instruction cycle stamps.
    Run {
        /// Path to a JSON trace file (see trace_io::TraceFile).
        trace: PathBuf,

        /// Output format for the run summary.
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Check the finished run against its testable properties (P1-P7)
        /// before printing a summary.
        #[arg(long)]
        validate: bool,

        #[command(flatten)]
        config: ConfigArgs,
    },
}

#[derive(clap::Args)]
struct ConfigArgs {
    /// Instruction fetch queue capacity.
    #[arg(long, default_value = "10")]
    c_ifq: usize,
    /// Integer reservation station count.
    #[arg(long, default_value = "4")]
    rs_int: usize,
    /// Floating-point reservation station count.
    #[arg(long, default_value = "2")]
    rs_fp: usize,
    /// Integer functional unit count.
    #[arg(long, default_value = "2")]
    fu_int: usize,
    /// Floating-point functional unit count.
    #[arg(long, default_value = "1")]
    fu_fp: usize,
    /// Integer functional unit latency in cycles.
    #[arg(long, default_value = "4")]
    l_int: u64,
    /// Floating-point functional unit latency in cycles.
    #[arg(long, default_value = "9")]
    l_fp: u64,
    /// Architectural register file size.
    #[arg(long, default_value = "32")]
    r_total: usize,
}

impl From<ConfigArgs> for TomasuloConfig {
    fn from(args: ConfigArgs) -> Self {
        TomasuloConfig::new(
            args.c_ifq,
            args.rs_int,
            args.rs_fp,
            args.fu_int,
            args.fu_fp,
            args.l_int,
            args.l_fp,
            args.r_total,
        )
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { trace, format, validate, config } => run(trace, &format, validate, config.into()),
    }
}

fn run(trace_path: PathBuf, format: &str, do_validate: bool, config: TomasuloConfig) -> ExitCode {
    let format: OutputFormat = match format.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            return ExitCode::FAILURE;
        },
    };

    let mut trace = match load_trace(&trace_path) {
        Ok(t) => t,
        Err(e) => {
            log::error!("failed to load trace {}: {e}", trace_path.display());
            eprintln!("{}: {e}", "error".red().bold());
            return ExitCode::FAILURE;
        },
    };

    let mut core = TomasuloCore::new(config);
    let total_cycles = core.run(&mut trace);
    log::info!("simulation finished after {total_cycles} cycles");

    if do_validate {
        if let Err(e) = validator::validate(&trace, &config, total_cycles) {
            eprintln!("{}: {e}", "validation failed".red().bold());
            return ExitCode::FAILURE;
        }
        println!("{}", "all properties hold".green());
    }

    println!("{}", output::render(&trace, total_cycles, format));
    ExitCode::SUCCESS
}
