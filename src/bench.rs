//! 调度器：初始批次、样本量估计、补跑。

use serde::Serialize;

use crate::stats::{RunStatistics, SampleSizeEstimator, Variance};
use crate::trial::Trial;
use crate::workload::OpCounts;
use crate::Result;

/// 串行基准的初始试验次数
pub const SERIAL_INITIAL_RUNS: usize = 100;
/// 并发基准的初始试验次数
pub const CONCURRENT_INITIAL_RUNS: usize = 10;

/// 决定样本量的参数。
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct BenchSettings {
    /// 初始批次的试验次数
    pub initial_runs: usize,
    /// 方差的分母取法
    pub variance: Variance,
    /// 样本量估计器
    pub estimator: SampleSizeEstimator,
    /// 样本总数上限
    pub max_samples: Option<usize>,
}

impl BenchSettings {
    /// 串行基准：100 次初始试验、总体方差、不设最小样本量。
    pub fn serial() -> BenchSettings {
        BenchSettings {
            initial_runs: SERIAL_INITIAL_RUNS,
            variance: Variance::Population,
            estimator: SampleSizeEstimator::serial(),
            max_samples: None,
        }
    }

    /// 并发基准：10 次初始试验、样本方差、至少 30 个样本。
    pub fn concurrent() -> BenchSettings {
        BenchSettings {
            initial_runs: CONCURRENT_INITIAL_RUNS,
            variance: Variance::Sample,
            estimator: SampleSizeEstimator::concurrent(),
            max_samples: None,
        }
    }
}

/// 一次基准测试运行的最终结果。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchReport {
    /// 执行操作的线程数
    pub threads: usize,
    /// 初始批次的统计量
    pub initial: RunStatistics,
    /// 估计出的所需样本量（未与已有样本数比较之前）
    pub required: usize,
    /// 全部样本的统计量
    pub statistics: RunStatistics,
    /// 最后一次试验的操作计数
    pub last_counts: OpCounts,
}

/// 基准测试的调度器：先跑一批初始试验，据此估计所需样本量，
/// 不够时补跑剩余的试验，最后重新计算统计量。
pub struct Benchmark<T: Trial> {
    trial: T,
    settings: BenchSettings,
    samples: Vec<f64>,
    last_counts: OpCounts,
}

impl<T: Trial> Benchmark<T> {
    /// 用给定的试验方式创建调度器。
    pub fn new(trial: T, settings: BenchSettings) -> Self {
        Benchmark {
            trial,
            settings,
            samples: Vec::new(),
            last_counts: OpCounts::default(),
        }
    }

    /// 目前为止收集到的所有耗时样本（微秒），按试验顺序排列。
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// 执行完整的基准测试流程。
    ///
    /// 重复调用时，每次都重新收集样本，不会沿用上一次运行的样本。
    ///
    /// # Errors
    ///
    /// 任何一次试验失败都会立即中止，不返回部分结果。
    pub fn run(&mut self) -> Result<BenchReport> {
        // 每次运行都从空的样本序列开始
        self.samples.clear();
        self.last_counts = OpCounts::default();

        let initial_runs = self.initial_runs();
        info!(
            "Running {} initial runs to estimate mean and standard deviation to calculate required sample size",
            initial_runs
        );
        self.run_trials(initial_runs)?;

        let initial = RunStatistics::compute(&self.samples, self.settings.variance);
        info!(
            "Initial Mean Execution Time: {:.6} microseconds | Initial Standard Deviation: {:.6} microseconds",
            initial.mean, initial.std_dev
        );

        let required = self
            .settings
            .estimator
            .estimate(initial.std_dev, initial.mean);
        info!("Required Sample Size: {}", required);

        let target = match self.settings.max_samples {
            Some(max) if required > max => {
                warn!("Required sample size {} capped at {}", required, max);
                max
            }
            _ => required,
        };

        let statistics = if target > self.samples.len() {
            let additional = target - self.samples.len();
            info!("Running {} additional runs", additional);
            self.run_trials(additional)?;
            RunStatistics::compute(&self.samples, self.settings.variance)
        } else {
            initial
        };

        Ok(BenchReport {
            threads: self.trial.threads(),
            initial,
            required,
            statistics,
            last_counts: self.last_counts,
        })
    }

    fn initial_runs(&self) -> usize {
        match self.settings.max_samples {
            Some(max) => self.settings.initial_runs.min(max),
            None => self.settings.initial_runs,
        }
    }

    fn run_trials(&mut self, count: usize) -> Result<()> {
        self.samples.reserve(count);
        for _ in 0..count {
            let outcome = self.trial.run()?;
            debug!(
                "Trial {}: {:.3} us, {:?}",
                self.samples.len(),
                outcome.elapsed_us,
                outcome.counts
            );
            self.samples.push(outcome.elapsed_us);
            self.last_counts = outcome.counts;
        }
        Ok(())
    }
}
