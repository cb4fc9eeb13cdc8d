use clap::arg_enum;
use listbench::report::{self, Format};
use listbench::*;
use log::info;
use log::LevelFilter;
use std::path::PathBuf;
use std::process::exit;
use structopt::StructOpt;

const DEFAULT_LOCK: Lock = Lock::rwlock;

#[derive(StructOpt, Debug)]
#[structopt(name = "concurrent")]
struct Opt {
    #[structopt(name = "THREADS", help = "Number of worker threads")]
    threads: usize,
    #[structopt(name = "MEMBER", help = "Fraction of member operations")]
    member: f64,
    #[structopt(name = "INSERT", help = "Fraction of insert operations")]
    insert: f64,
    #[structopt(name = "DELETE", help = "Fraction of delete operations")]
    delete: f64,
    #[structopt(
        long,
        help = "Sets the lock guarding the list",
        value_name = "LOCK-NAME",
        raw(possible_values = "&Lock::variants()")
    )]
    lock: Option<Lock>,
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
        help = "Results log to append to [default: results/<LOCK-NAME>_results.txt]",
        value_name = "PATH",
        parse(from_os_str)
    )]
    output: Option<PathBuf>,
    #[structopt(long, help = "Prints the report as JSON")]
    json: bool,
}

arg_enum! {
    #[allow(non_camel_case_types)]
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    enum Lock {
        rwlock,
        mutex
    }
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

    let lock = opt.lock.unwrap_or(DEFAULT_LOCK);
    info!("listbench concurrent {}", env!("CARGO_PKG_VERSION"));
    info!("Lock: {}, threads: {}", lock, opt.threads);
    let format = if opt.json { Format::Json } else { Format::Text };

    match lock {
        Lock::rwlock => {
            run_with::<RwLockList>(&config, &fractions, opt.threads, opt.output, format)
        }
        Lock::mutex => {
            run_with::<MutexList>(&config, &fractions, opt.threads, opt.output, format)
        }
    }
}

fn run_with<L: LockedList>(
    config: &BenchConfig,
    fractions: &Fractions,
    threads: usize,
    output: Option<PathBuf>,
    format: Format,
) -> Result<()> {
    let trial = ConcurrentTrial::<L>::new(config, *fractions, threads)?;
    let output =
        output.unwrap_or_else(|| PathBuf::from(format!("results/{}_results.txt", L::NAME)));

    let mut settings = BenchSettings::concurrent();
    settings.max_samples = config.max_samples;
    report::run_and_record(
        trial,
        settings,
        config,
        fractions,
        &ResultLog::new(output),
        format,
    )?;
    Ok(())
}
