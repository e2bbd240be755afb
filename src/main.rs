use std::path::PathBuf;
use std::process;

use clap::Parser;

use air_cargo_planner::pddl::astar::{self, Strategy};
use air_cargo_planner::pddl::{instances, Heuristic};
use air_cargo_planner::settings::Settings;

#[derive(Parser, Debug)]
#[command(version, about = "Solves the air cargo planning problems")]
struct Args {
    /// Problem to solve: p1, p2 or p3
    #[arg(default_value = "p1")]
    problem: String,

    #[arg(long, value_enum)]
    heuristic: Option<Heuristic>,

    #[arg(long, value_enum)]
    strategy: Option<Strategy>,

    /// Settings file, planner.toml by default
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the domain and problem in PDDL before solving
    #[arg(long)]
    pddl: bool,
}

fn main() {
    let args = Args::parse();
    let settings = match Settings::load(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => { eprintln!("{}", e); process::exit(2) },
    };
    match settings.logging.env_filter() {
        Ok(filter) => tracing_subscriber::fmt().with_env_filter(filter).init(),
        Err(e) => { eprintln!("Invalid logging settings: {}", e); process::exit(2) },
    }

    let problem = match instances::by_name(&args.problem, settings.cache.capacity) {
        Some(Ok(problem)) => problem,
        Some(Err(e)) => { eprintln!("{}", e); process::exit(1) },
        None => { eprintln!("Unknown problem {}, expected p1, p2 or p3", args.problem); process::exit(2) },
    };
    if args.pddl {
        println!("{}\n{}", problem.domain(), problem);
    }

    let heuristic = args.heuristic.unwrap_or(settings.search.heuristic);
    let strategy = args.strategy.unwrap_or(settings.search.strategy);
    tracing::info!("Solving {} with {:?} and {}", args.problem, strategy, heuristic);
    match astar::search(&problem, strategy, heuristic, settings.search.max_expansions) {
        Ok(Some(solution)) => print!("{}", solution),
        Ok(None) => println!("Planner was not able to find a solution"),
        Err(e) => { eprintln!("{}", e); process::exit(1) },
    }
}
