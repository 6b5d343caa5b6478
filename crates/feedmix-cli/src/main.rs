mod blend;
mod trace;

use clap::{Args, Parser, Subcommand};
use feedmix_solver::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, LinearProgram, Penalty, SimplexSolver, Solution,
    SolutionStatus,
};
use log::LevelFilter;
use std::path::PathBuf;

use crate::blend::FeedBlend;
use crate::trace::Narrator;

#[derive(Parser)]
#[command(name = "feedmix")]
#[command(about = "Big-M simplex solver for least-cost feed blending", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a linear program read from a JSON file
    Solve {
        /// The JSON file holding the program
        file: PathBuf,
        #[command(flatten)]
        options: SolveOptions,
    },
    /// Solve the built-in six-ingredient ration and print its report
    Blend {
        #[command(flatten)]
        options: SolveOptions,
    },
}

#[derive(Args)]
struct SolveOptions {
    /// Maximum pivots before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,
    /// Fixed Big-M penalty (default scales with the objective)
    #[arg(long)]
    penalty: Option<f64>,
    /// Print every pivot
    #[arg(short, long)]
    trace: bool,
    /// Output format (json, pretty)
    #[arg(short, long, default_value = "pretty")]
    format: String,
}

fn fail(message: String) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(program: &LinearProgram, options: &SolveOptions) -> Solution {
    let penalty = options.penalty.map_or(Penalty::Scaled, Penalty::Fixed);
    let solver = match SimplexSolver::with_penalty(program, penalty) {
        Ok(s) => s,
        Err(e) => fail(format!("Invalid problem: {}", e)),
    };
    let mut solver = solver
        .with_max_iterations(options.max_iterations)
        .with_tolerance(options.tolerance);

    if options.trace {
        solver.solve_observed(&mut Narrator)
    } else {
        solver.solve()
    }
}

fn print_json(solution: &Solution) {
    match serde_json::to_string_pretty(solution) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(format!("Error serializing solution: {}", e)),
    }
}

fn print_status(status: SolutionStatus) {
    match status {
        SolutionStatus::Optimal => println!("Status: OPTIMAL"),
        SolutionStatus::Infeasible => {
            println!("Status: INFEASIBLE");
            println!("No solution exists that satisfies all constraints.");
        }
        SolutionStatus::Unbounded => {
            println!("Status: UNBOUNDED");
            println!("The problem has no finite optimal solution.");
        }
        SolutionStatus::MaxIterations => {
            println!("Status: MAX_ITERATIONS");
            println!("The iteration limit was reached before convergence.");
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Commands::Solve { file, options } => {
            let source = match std::fs::read_to_string(&file) {
                Ok(s) => s,
                Err(e) => fail(format!("Error reading file: {}", e)),
            };
            let program: LinearProgram = match serde_json::from_str(&source) {
                Ok(p) => p,
                Err(e) => fail(format!("Parse error: {}", e)),
            };

            let solution = run(&program, &options);

            if options.format == "json" {
                print_json(&solution);
            } else {
                print_status(solution.status);
                if let (Some(values), Some(objective)) = (&solution.values, solution.objective_value) {
                    println!("Objective: {:.6}", objective);
                    println!("Iterations: {}", solution.iterations);
                    println!();
                    println!("Variables:");
                    for (i, value) in values.iter().enumerate() {
                        println!("  x{:<4} {:14.6}", i + 1, value);
                    }

                    let violations = program.violations(values, options.tolerance.max(1e-6));
                    if !violations.is_empty() {
                        println!();
                        println!("Constraint check failed:");
                        for v in &violations {
                            println!("  - {}", v.description);
                        }
                    }
                }
            }

            if !solution.is_optimal() {
                std::process::exit(1);
            }
        }
        Commands::Blend { options } => {
            let blend = FeedBlend::standard_ration();
            let program = blend.to_program();
            let solution = run(&program, &options);

            if options.format == "json" {
                print_json(&solution);
            } else {
                print_status(solution.status);
                if let Some(values) = &solution.values {
                    println!("Iterations: {}", solution.iterations);
                    println!();
                    print!("{}", blend.report(values));
                }
            }

            if !solution.is_optimal() {
                std::process::exit(1);
            }
        }
    }
}
