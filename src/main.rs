use std::io::Write;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, Command};
use env_logger::Builder;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use diskdes::report;
use diskdes::scheduler::Policy;
use diskdes::simulation::{self, SimParams};
use diskdes::stats::Summary;

fn cli() -> Command {
    Command::new("diskdes")
        .about("Compares FIFO and FSCAN disk scheduling on a random workload")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("JSON file with simulation parameters"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(u64))
                .help("Seed for the workload generator"),
        )
        .arg(
            Arg::new("trials")
                .long("trials")
                .short('n')
                .value_parser(value_parser!(usize))
                .help("Number of trials"),
        )
        .arg(
            Arg::new("max-gap")
                .long("max-gap")
                .value_name("MS")
                .value_parser(value_parser!(f64))
                .help("Largest interarrival gap of the first trial"),
        )
        .arg(
            Arg::new("policy")
                .long("policy")
                .short('s')
                .value_parser(["fifo", "fscan", "both"])
                .default_value("both")
                .action(ArgAction::Set)
                .help("Scheduling policy to simulate"),
        )
}

fn main() -> anyhow::Result<()> {
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();

    let matches = cli().get_matches();

    let mut sys = match matches.get_one::<String>("config") {
        Some(path) => SimParams::from_json_file(path)?,
        None => SimParams::default(),
    };
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        sys.seed = Some(seed);
    }
    if let Some(&trials) = matches.get_one::<usize>("trials") {
        sys.trials = trials;
    }
    if let Some(&max_gap) = matches.get_one::<f64>("max-gap") {
        sys.max_gap = max_gap;
    }
    sys.validate().context("invalid simulation parameters")?;

    let policies: Vec<Policy> = match matches.get_one::<String>("policy").map(String::as_str) {
        Some("both") | None => Policy::ALL.to_vec(),
        Some(name) => vec![name.parse::<Policy>().map_err(anyhow::Error::msg)?],
    };

    let seed = sys.seed.unwrap_or_else(rand::random);
    info!("seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    for trial in simulation::run(&sys, &policies, &mut rng) {
        for (policy, result) in &trial.results {
            let summary = Summary::from_result(result, trial.workload_len);
            let title = format!("\n{} max gap = {} ms", policy, trial.max_gap);
            print!("{}", report::render(&title, &summary, trial.workload_len));
        }
        println!();
    }
    Ok(())
}
