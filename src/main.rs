use std::io::{self, BufRead, Write};

use chrono::prelude::*;
use clap::Parser;
use color_eyre::eyre::Result;
use itertools::Itertools;

use oxchess::perft::{group_thousands, run_all_tests, PerftResult};

/// Interactive perft shell for the move generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Deepest table rows to run with `perft`; 0 runs every row
    #[arg(short, long, default_value_t = 0)]
    max_depth: u32,

    /// Stop a `perft` run at the first failing test
    #[arg(short, long, default_value_t = false)]
    stop_on_first_failure: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("oxchess> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            // stdin closed under us
            std::process::exit(1);
        };
        let command = line?;

        match command.trim() {
            "exit" => break,
            "perft" => run_perft_report(&args),
            "" => {}
            other => println!("Unknown command '{other}'"),
        }
    }

    Ok(())
}

fn run_perft_report(args: &Args) {
    println!("Run started {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

    let results = run_all_tests(args.max_depth, args.stop_on_first_failure);
    println!("Result Count: {}\n", results.len());

    let mut passed = 0;
    let mut failed = 0;
    for result in &results {
        print_result(result);
        if result.passed() {
            passed += 1;
        } else {
            failed += 1;
        }
    }

    println!("Passed: {passed}");
    println!("Failed: {failed}");
    println!("Total: {}", results.len());
    if failed == 0 {
        println!(" *** PASSED ***");
    } else {
        let failing = results
            .iter()
            .filter(|r| !r.passed())
            .map(|r| r.name)
            .unique()
            .join(", ");
        println!(" *** FAILED *** ({failing})");
    }
}

fn print_result(result: &PerftResult) {
    println!("Test: {}, Depth: {}", result.name, result.depth);
    println!("   Result: {}", pass_fail(result.passed()));
    println!("   FEN: {}", result.fen);
    println!("   Setup: {}", pass_fail(result.setup_passed));
    if result.setup_passed {
        println!("   Integrity: {}", pass_fail(result.integrity_passed));
        println!(
            "   Nodes: {}",
            pass_fail(result.expected_nodes == result.actual_nodes)
        );
        println!("      Expected: {}", group_thousands(result.expected_nodes));
        println!("      Actual: {}", group_thousands(result.actual_nodes));
        println!("Total Time: {}", result.time_taken());
        println!("Rate: {}", result.nodes_per_second());
        println!("Node Time: {}", result.time_per_node());
    }
    println!();
}

fn pass_fail(passed: bool) -> &'static str {
    if passed {
        "PASSED"
    } else {
        "FAILED"
    }
}
