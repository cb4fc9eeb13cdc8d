use listbench::report::{self, Format};
use listbench::*;
use log::info;
use log::LevelFilter;
use std::path::PathBuf;
use std::process::exit;
use structopt::StructOpt;

const DEFAULT_OUTPUT: &str = "results/serial_results.txt";

#[derive(StructOpt, Debug)]
#[structopt(name = "serial")]
struct Opt {
    #[structopt(name = "MEMBER", help = "Fraction of member operations")]
    member: f64,
    #[structopt(name = "INSERT", help = "Fraction of insert operations")]
    insert: f64,
    #[structopt(name = "DELETE", help = "Fraction of delete operations")]
    delete: f64,
    #[structopt(
        long = "initial-size",
        help = "Number of unique values in the list before each trial",
        value_name = "N",
        default_value = "1000"
    )]
    initial_size: usize,
    #[structopt(
        long,
        help = "Number of operations per trial",
        value_name = "M",
        default_value = "10000"
    )]
    operations: usize,
    #[structopt(
        long = "value-range",
        help = "Random values are drawn from [0, RANGE)",
        value_name = "RANGE",
        default_value = "65535"
    )]
    value_range: i32,
    #[structopt(long, help = "Seed for the random number generator", value_name = "SEED")]
    seed: Option<u64>,
    #[structopt(
        long = "max-samples",
        help = "Upper bound on the number of trials",
        value_name = "K"
    )]
    max_samples: Option<usize>,
    #[structopt(
        long,
        help = "Results log to append to",
        value_name = "PATH",
        raw(default_value = "DEFAULT_OUTPUT"),
        parse(from_os_str)
    )]
    output: PathBuf,
    #[structopt(long, help = "Prints the report as JSON")]
    json: bool,
}

fn main() {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .init();
    let opt = Opt::from_args();
    if let Err(e) = run(opt) {
        eprintln!("{}", e);
        exit(1);
    }
}

fn run(opt: Opt) -> Result<()> {
    let fractions = Fractions::new(opt.member, opt.insert, opt.delete)?;
    let config = BenchConfig {
        initial_size: opt.initial_size,
        operations: opt.operations,
        value_range: opt.value_range,
        seed: opt.seed,
        max_samples: opt.max_samples,
    };
    config.validate()?;

    let trial = SerialTrial::new(&config, fractions);
    info!("listbench serial {}", env!("CARGO_PKG_VERSION"));
    info!("Workload plan: {:?}", trial.plan());

    let mut settings = BenchSettings::serial();
    settings.max_samples = config.max_samples;
    let format = if opt.json { Format::Json } else { Format::Text };
    report::run_and_record(
        trial,
        settings,
        &config,
        &fractions,
        &ResultLog::new(opt.output),
        format,
    )?;
    Ok(())
}
