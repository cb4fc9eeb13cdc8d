use listbench::stats::{SampleSizeEstimator, Variance};
use listbench::*;

fn small_config() -> BenchConfig {
    BenchConfig {
        initial_size: 100,
        operations: 1000,
        seed: Some(2024),
        ..BenchConfig::default()
    }
}

#[test]
fn default_config_is_valid() {
    let config = BenchConfig::default();
    assert_eq!(config.initial_size, 1000);
    assert_eq!(config.operations, 10_000);
    assert_eq!(config.value_range, 65535);
    assert!(config.validate().is_ok());
}

#[test]
fn config_rejects_impossible_population() {
    let config = BenchConfig {
        initial_size: 11,
        value_range: 10,
        ..BenchConfig::default()
    };
    assert!(config.validate().is_err());

    let config = BenchConfig {
        operations: 0,
        ..BenchConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn serial_trial_issues_planned_counts() {
    let config = small_config();
    let fractions = Fractions::new(0.8, 0.1, 0.1).unwrap();
    let mut trial = SerialTrial::new(&config, fractions);
    let plan = trial.plan();
    for _ in 0..3 {
        let outcome = trial.run().unwrap();
        assert!(outcome.elapsed_us >= 0.0);
        assert_eq!(outcome.counts.member, plan.member);
        assert_eq!(outcome.counts.insert, plan.insert);
        assert_eq!(outcome.counts.delete, plan.delete);
    }
    assert_eq!(trial.threads(), 1);
}

#[test]
fn concurrent_trial_issues_all_operations() {
    let config = small_config();
    let fractions = Fractions::new(0.5, 0.25, 0.25).unwrap();
    let mut trial = ConcurrentTrial::<RwLockList>::new(&config, fractions, 4).unwrap();
    assert_eq!(trial.threads(), 4);
    let outcome = trial.run().unwrap();
    assert_eq!(outcome.counts.total(), config.operations);
    assert!(outcome.counts.insert > 0);
    assert!(outcome.counts.delete > 0);
}

#[test]
fn concurrent_trial_rejects_zero_threads() {
    let fractions = Fractions::new(0.8, 0.1, 0.1).unwrap();
    assert!(ConcurrentTrial::<MutexList>::new(&small_config(), fractions, 0).is_err());
}

// 纯读负载下 8 个线程同时持有读锁，不能死锁
#[test]
fn read_only_workload_with_many_threads_completes() {
    let config = small_config();
    let fractions = Fractions::new(1.0, 0.0, 0.0).unwrap();
    let mut trial = ConcurrentTrial::<RwLockList>::new(&config, fractions, 8).unwrap();
    for _ in 0..5 {
        let outcome = trial.run().unwrap();
        assert_eq!(outcome.counts.member, config.operations);
        assert_eq!(outcome.counts.insert + outcome.counts.delete, 0);
    }
}

#[test]
fn write_heavy_workload_with_mutex_completes() {
    let config = small_config();
    let fractions = Fractions::new(0.0, 0.5, 0.5).unwrap();
    let mut trial = ConcurrentTrial::<MutexList>::new(&config, fractions, 8).unwrap();
    let outcome = trial.run().unwrap();
    assert_eq!(outcome.counts.member, 0);
    assert_eq!(outcome.counts.total(), config.operations);
}

#[test]
fn locked_list_keeps_order_under_contention() {
    use crossbeam::thread;

    let mut list = SortedList::new();
    for v in (0..200).step_by(2) {
        list.insert(v);
    }
    let shared = RwLockList::new(list);
    thread::scope(|s| {
        for t in 0..4 {
            let shared = &shared;
            s.spawn(move |_| {
                for v in 0..200 {
                    if (v + t) % 3 == 0 {
                        shared.delete(v);
                    } else if (v + t) % 3 == 1 {
                        shared.insert(v);
                    } else {
                        shared.member(v);
                    }
                }
            });
        }
    })
    .unwrap();

    let values: Vec<i32> = shared.into_inner().iter().collect();
    assert!(values.windows(2).all(|w| w[0] < w[1]));
}

// 固定耗时的假试验，用于检查调度逻辑
struct FixedTrial {
    times: Vec<f64>,
    next: usize,
}

impl Trial for FixedTrial {
    fn threads(&self) -> usize {
        2
    }

    fn run(&mut self) -> Result<TrialOutcome> {
        let elapsed_us = self.times[self.next % self.times.len()];
        self.next += 1;
        Ok(TrialOutcome {
            elapsed_us,
            counts: Default::default(),
        })
    }
}

#[test]
fn no_additional_runs_when_estimate_is_small() {
    let trial = FixedTrial {
        times: vec![100.0],
        next: 0,
    };
    let mut bench = Benchmark::new(trial, BenchSettings::serial());
    let report = bench.run().unwrap();
    assert_eq!(report.required, 0);
    assert_eq!(report.statistics.samples, 100);
    assert_eq!(report.statistics, report.initial);
    assert_eq!(report.threads, 2);
    assert_eq!(bench.samples().len(), 100);
}

#[test]
fn concurrent_settings_run_at_least_thirty() {
    let trial = FixedTrial {
        times: vec![100.0],
        next: 0,
    };
    let report = Benchmark::new(trial, BenchSettings::concurrent())
        .run()
        .unwrap();
    assert_eq!(report.initial.samples, 10);
    assert_eq!(report.required, 30);
    assert_eq!(report.statistics.samples, 30);
    assert!((report.statistics.mean - 100.0).abs() < 1e-9);
}

#[test]
fn additional_runs_reach_required_size() {
    // 均值 100，总体标准差 50 => ceil((1.96 * 50 / 5)^2) = 385
    let trial = FixedTrial {
        times: vec![50.0, 150.0],
        next: 0,
    };
    let mut bench = Benchmark::new(trial, BenchSettings::serial());
    let report = bench.run().unwrap();
    assert_eq!(report.initial.samples, 100);
    assert!((report.initial.std_dev - 50.0).abs() < 1e-9);
    assert_eq!(report.required, 385);
    assert_eq!(report.statistics.samples, 385);
    assert_eq!(bench.samples().len(), 385);
}

#[test]
fn max_samples_caps_runs() {
    let trial = FixedTrial {
        times: vec![50.0, 150.0],
        next: 0,
    };
    let mut settings = BenchSettings::concurrent();
    settings.max_samples = Some(40);
    let report = Benchmark::new(trial, settings).run().unwrap();
    assert!(report.required > 40);
    assert_eq!(report.statistics.samples, 40);
}

#[test]
fn custom_estimator_and_variance() {
    let trial = FixedTrial {
        times: vec![90.0, 110.0],
        next: 0,
    };
    let settings = BenchSettings {
        initial_runs: 4,
        variance: Variance::Sample,
        estimator: SampleSizeEstimator {
            z: 1.96,
            relative_error: 0.01,
            min_samples: 0,
        },
        max_samples: None,
    };
    let report = Benchmark::new(trial, settings).run().unwrap();
    assert_eq!(report.initial.samples, 4);
    assert!(report.required > 4);
    assert_eq!(report.statistics.samples, report.required);
}

#[test]
fn end_to_end_serial_run() {
    let config = BenchConfig {
        max_samples: Some(150),
        ..small_config()
    };
    let fractions = Fractions::new(0.8, 0.1, 0.1).unwrap();
    let mut settings = BenchSettings::serial();
    settings.max_samples = config.max_samples;
    let report = Benchmark::new(SerialTrial::new(&config, fractions), settings)
        .run()
        .unwrap();
    assert!(report.statistics.mean > 0.0);
    assert!(report.statistics.std_dev >= 0.0);
    assert!(report.statistics.samples >= 100);
    assert!(report.statistics.samples <= 150);
}

#[test]
fn repeated_run_starts_from_fresh_samples() {
    let trial = FixedTrial {
        times: vec![100.0],
        next: 0,
    };
    let mut bench = Benchmark::new(trial, BenchSettings::serial());
    let first = bench.run().unwrap();
    let second = bench.run().unwrap();
    assert_eq!(first.initial.samples, 100);
    assert_eq!(second.initial.samples, 100);
    assert_eq!(second.statistics.samples, 100);
    assert_eq!(bench.samples().len(), 100);
}

// 并发设置用样本方差（除以 n - 1）
#[test]
fn concurrent_settings_use_sample_variance() {
    let trial = FixedTrial {
        times: vec![90.0, 110.0],
        next: 0,
    };
    let mut settings = BenchSettings::concurrent();
    settings.max_samples = Some(10);
    let report = Benchmark::new(trial, settings).run().unwrap();
    assert_eq!(report.initial.samples, 10);
    assert!((report.initial.mean - 100.0).abs() < 1e-9);
    assert!((report.initial.std_dev - (1000.0f64 / 9.0).sqrt()).abs() < 1e-9);
    assert!(report.required > 10);
    assert_eq!(report.statistics.samples, 10);
}

#[test]
fn serial_run_at_default_size_appends_one_record() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("serial_results.txt");
    let log = ResultLog::new(&path);

    let config = BenchConfig {
        seed: Some(7),
        max_samples: Some(100),
        ..BenchConfig::default()
    };
    let fractions = Fractions::new(0.8, 0.1, 0.1).unwrap();
    let mut settings = BenchSettings::serial();
    settings.max_samples = config.max_samples;
    let report = report::run_and_record(
        SerialTrial::new(&config, fractions),
        settings,
        &config,
        &fractions,
        &log,
        report::Format::Text,
    )
    .unwrap();

    assert!(report.statistics.mean > 0.0);
    assert!(report.statistics.std_dev >= 0.0);
    assert_eq!(report.last_counts.total(), 10_000);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 1);
    let records = log.read().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].n, 1000);
    assert_eq!(records[0].m, 10_000);
    assert_eq!(records[0].threads, 1);
}
