use batch_cut_optimizer::render;
use batch_cut_optimizer::rod::{compare_strategies, solve_rod_cutting};
use batch_cut_optimizer::scheduler::Scheduler;
use batch_cut_optimizer::types::{Constraints, CutPlan, CutStrategy, Job, PriceTable};
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "batch_cut_optimizer",
    about = "Print queue batching and rod cutting optimizer"
)]
struct Cli {
    /// Log solver decisions to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Group a job queue into capacity-bounded batches
    Queue {
        /// Jobs as ID:VOLUME:PRIORITY:TIME (e.g. M1:100:1:120 M2:150:1:90)
        #[arg(long = "job", num_args = 1.., conflicts_with = "jobs_file")]
        jobs: Vec<String>,

        /// JSON file holding an array of {id, volume, priority, print_time}
        #[arg(long)]
        jobs_file: Option<std::path::PathBuf>,

        /// Volume ceiling per batch
        #[arg(long)]
        max_volume: f64,

        /// Job count ceiling per batch
        #[arg(long)]
        max_items: usize,

        /// Show each batch
        #[arg(long)]
        layout: bool,
    },
    /// Find the most valuable way to cut a rod
    Rod {
        /// Rod length
        #[arg(long)]
        length: usize,

        /// Price of a piece of length 1, 2, 3, ... (e.g. 2 5 7 8 10)
        #[arg(long, num_args = 1..)]
        prices: Vec<u64>,

        /// Solver: memo or table
        #[arg(long, default_value = "memo", value_parser = parse_strategy)]
        strategy: CutStrategy,

        /// Run both solvers and check they agree
        #[arg(long)]
        compare: bool,

        /// Show an ASCII bar of the cut rod
        #[arg(long)]
        layout: bool,
    },
}

fn parse_strategy(s: &str) -> Result<CutStrategy, String> {
    match s {
        "memo" => Ok(CutStrategy::Memo),
        "table" => Ok(CutStrategy::Table),
        _ => Err(format!("invalid strategy '{}', expected: memo or table", s)),
    }
}

fn parse_job(s: &str) -> Result<Job, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 4 {
        return Err(format!("invalid job '{}', expected ID:VOLUME:PRIORITY:TIME", s));
    }
    if parts[0].is_empty() {
        return Err(format!("missing id in '{}'", s));
    }
    let volume = parts[1]
        .parse::<f64>()
        .map_err(|_| format!("invalid volume in '{}'", s))?;
    let priority = parts[2]
        .parse::<i64>()
        .map_err(|_| format!("invalid priority in '{}'", s))?;
    let print_time = parts[3]
        .parse::<u64>()
        .map_err(|_| format!("invalid time in '{}'", s))?;
    Ok(Job::new(parts[0], volume, priority, print_time))
}

fn read_jobs_file(path: &std::path::Path) -> Result<Vec<Job>, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&raw).map_err(|e| format!("{}: {}", path.display(), e))
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

fn print_plan(label: &str, plan: &CutPlan, layout: bool) {
    println!("{label}:");
    println!("  Maximum profit: {}", plan.max_profit);
    println!("  Cuts: {:?}", plan.cuts);
    println!("  Number of cuts: {}", plan.number_of_cuts);
    if layout {
        print!("{}", render::render_rod(plan));
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    match cli.command {
        Command::Queue {
            jobs,
            jobs_file,
            max_volume,
            max_items,
            layout,
        } => {
            let jobs: Vec<Job> = match jobs_file {
                Some(path) => read_jobs_file(&path).unwrap_or_else(|e| fail(e)),
                None => jobs
                    .iter()
                    .map(|j| parse_job(j))
                    .collect::<Result<Vec<_>, _>>()
                    .unwrap_or_else(|e| fail(e)),
            };

            let scheduler = Scheduler::new(Constraints::new(max_volume, max_items))
                .unwrap_or_else(|e| fail(e));
            let schedule = scheduler.schedule(jobs).unwrap_or_else(|e| fail(e));

            if layout {
                print!("{}", render::render_schedule(&schedule));
                println!();
            }

            let result = schedule.result().unwrap_or_else(|e| fail(e));
            println!("Print order: {}", result.print_order.join(", "));
            println!(
                "Total time: {} minutes ({} batch{})",
                result.total_time,
                schedule.batch_count(),
                if schedule.batch_count() == 1 { "" } else { "es" },
            );
        }
        Command::Rod {
            length,
            prices,
            strategy,
            compare,
            layout,
        } => {
            let prices = PriceTable::new(prices);
            if compare {
                let cmp = compare_strategies(length, &prices).unwrap_or_else(|e| fail(e));
                print_plan("Memoization", &cmp.memo, layout);
                print_plan("Tabulation", &cmp.table, layout);
                println!("Strategies agree on profit {}", cmp.memo.max_profit);
            } else {
                let plan =
                    solve_rod_cutting(length, &prices, strategy).unwrap_or_else(|e| fail(e));
                print_plan(&format!("Strategy {strategy}"), &plan, layout);
            }
        }
    }
}
