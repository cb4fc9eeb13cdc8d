use listbench::results::{latest, ResultLog};
use listbench::Result;
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::process::exit;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "bench-results",
    about = "Shows the most recent result of every case in the given results logs"
)]
struct Opt {
    #[structopt(
        name = "FILE",
        help = "Results logs, e.g. results/serial_results.txt",
        parse(from_os_str),
        raw(required = "true")
    )]
    files: Vec<PathBuf>,
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
    println!(
        "{:<10} {:>9} {:>9} {:>9} {:>7} {:>16} {:>16}",
        "method", "member", "insert", "delete", "threads", "mean (us)", "stdDev (us)"
    );
    for path in &opt.files {
        let method = method_name(path);
        for record in latest(ResultLog::new(path).read()?) {
            println!(
                "{:<10} {:>9.4} {:>9.4} {:>9.4} {:>7} {:>16.3} {:>16.3}",
                method,
                record.member,
                record.insert,
                record.delete,
                record.threads,
                record.mean,
                record.std_dev
            );
        }
    }
    Ok(())
}

// results/rw_lock_results.txt -> rw_lock
fn method_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match stem.rfind("_results") {
        Some(idx) => stem[..idx].to_owned(),
        None => stem,
    }
}
