//! 单次试验：填充链表，然后计时执行一批随机操作。

use std::marker::PhantomData;
use std::ops::Range;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crossbeam::thread;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::lock::LockedList;
use crate::workload::{partition, Fractions, OpBudget, OpCounts, Operation, WorkloadPlan};
use crate::{BenchConfig, BenchError, Result, SortedList};

/// 一次试验的结果。
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TrialOutcome {
    /// 操作阶段的耗时（微秒），不含填充阶段
    pub elapsed_us: f64,
    /// 实际执行的操作计数
    pub counts: OpCounts,
}

/// 所有试验方式都应实现的 trait。
pub trait Trial {
    /// 执行操作的线程数，串行为 1
    fn threads(&self) -> usize;

    /// 在一个新填充的链表上执行一次完整试验并返回耗时。
    fn run(&mut self) -> Result<TrialOutcome>;
}

/// 单线程试验，严格按照 `WorkloadPlan` 的计数执行各类操作。
pub struct SerialTrial {
    initial_size: usize,
    value_range: i32,
    fractions: Fractions,
    plan: WorkloadPlan,
    rng: StdRng,
}

impl SerialTrial {
    /// 创建串行试验，`config.seed` 为空时用当前时间作为种子。
    pub fn new(config: &BenchConfig, fractions: Fractions) -> SerialTrial {
        SerialTrial {
            initial_size: config.initial_size,
            value_range: config.value_range,
            fractions,
            plan: WorkloadPlan::derive(&fractions, config.operations),
            rng: seeded_rng(config.seed),
        }
    }

    /// 本次运行的操作计划
    pub fn plan(&self) -> WorkloadPlan {
        self.plan
    }
}

impl Trial for SerialTrial {
    fn threads(&self) -> usize {
        1
    }

    fn run(&mut self) -> Result<TrialOutcome> {
        let mut list = SortedList::new();
        list.populate(self.initial_size, self.value_range, &mut self.rng);

        let mut budget = OpBudget::new(self.fractions, self.plan);
        let mut counts = OpCounts::default();
        let start = Instant::now();
        for _ in 0..self.plan.total() {
            let prob: f64 = self.rng.gen();
            let value = self.rng.gen_range(0, self.value_range);
            let op = match budget.next(prob) {
                Some(op) => op,
                None => break,
            };
            let hit = apply(&mut list, op, value);
            counts.record(op, hit);
        }
        let elapsed_us = micros(start);

        Ok(TrialOutcome { elapsed_us, counts })
    }
}

fn apply(list: &mut SortedList, op: Operation, value: i32) -> bool {
    match op {
        Operation::Member => list.contains(value),
        Operation::Insert => list.insert(value),
        Operation::Delete => list.delete(value),
    }
}

/// 多线程试验：所有线程共享一个由 `L` 保护的链表。
///
/// 每个线程负责 `partition` 划分出的一段连续操作，只按全局比例随机选择操作类型，
/// 不像串行试验那样强制各类操作的精确次数。
pub struct ConcurrentTrial<L> {
    initial_size: usize,
    value_range: i32,
    fractions: Fractions,
    ranges: Vec<Range<usize>>,
    rng: StdRng,
    _lock: PhantomData<L>,
}

impl<L: LockedList> ConcurrentTrial<L> {
    /// 创建使用 `threads` 个工作线程的并发试验。
    ///
    /// # Errors
    ///
    /// `threads` 为 0 时返回 `BenchError::InvalidArgument`。
    pub fn new(config: &BenchConfig, fractions: Fractions, threads: usize) -> Result<Self> {
        let plan = WorkloadPlan::derive(&fractions, config.operations);
        Ok(ConcurrentTrial {
            initial_size: config.initial_size,
            value_range: config.value_range,
            fractions,
            ranges: partition(plan.total(), threads)?,
            rng: seeded_rng(config.seed),
            _lock: PhantomData,
        })
    }
}

impl<L: LockedList> Trial for ConcurrentTrial<L> {
    fn threads(&self) -> usize {
        self.ranges.len()
    }

    fn run(&mut self) -> Result<TrialOutcome> {
        let mut list = SortedList::new();
        list.populate(self.initial_size, self.value_range, &mut self.rng);
        let shared = L::new(list);

        // 每个线程的种子 = 本次试验的基础种子 ^ 线程编号
        let base_seed: u64 = self.rng.gen();
        let fractions = self.fractions;
        let value_range = self.value_range;
        let ranges = &self.ranges;

        let start = Instant::now();
        let joined = thread::scope(|s| -> Result<OpCounts> {
            let mut handles = Vec::with_capacity(ranges.len());
            for (rank, range) in ranges.iter().cloned().enumerate() {
                let shared = &shared;
                let seed = base_seed ^ rank as u64;
                let handle = s
                    .builder()
                    .name(format!("{}-worker-{}", L::NAME, rank))
                    .spawn(move |_| run_worker(shared, fractions, range, seed, value_range))?;
                handles.push(handle);
            }
            let mut counts = OpCounts::default();
            for handle in handles {
                let worker = handle.join().map_err(|_| BenchError::WorkerPanicked)?;
                counts.merge(&worker);
            }
            Ok(counts)
        });
        let elapsed_us = micros(start);
        let counts = joined.map_err(|_| BenchError::WorkerPanicked)??;

        Ok(TrialOutcome { elapsed_us, counts })
    }
}

fn run_worker<L: LockedList>(
    list: &L,
    fractions: Fractions,
    range: Range<usize>,
    seed: u64,
    value_range: i32,
) -> OpCounts {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut counts = OpCounts::default();
    for _ in range {
        let prob: f64 = rng.gen();
        let value = rng.gen_range(0, value_range);
        let op = fractions.select(prob);
        let hit = list.apply(op, value);
        counts.record(op, hit);
    }
    counts
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    StdRng::seed_from_u64(seed.unwrap_or_else(clock_seed))
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() ^ u64::from(d.subsec_nanos()) << 32)
        .unwrap_or(0)
}

fn micros(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1_000_000.0
}
