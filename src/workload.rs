//! 工作负载：操作比例、按类型的操作计数以及在线程间的划分。

use std::ops::Range;

use serde::Serialize;

use crate::{BenchError, Result};

/// 三个比例之和与 1.0 之间允许的误差。
pub const FRACTION_TOLERANCE: f64 = 0.0001;

/// 对链表的一次操作。
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation {
    /// 成员查询，只需读锁
    Member,
    /// 插入，需要写锁
    Insert,
    /// 删除，需要写锁
    Delete,
}

/// 成员查询、插入、删除三类操作各自所占的比例。
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Fractions {
    member: f64,
    insert: f64,
    delete: f64,
}

impl Fractions {
    /// 校验并创建比例。
    ///
    /// # Errors
    ///
    /// 任一比例为负数或非有限值，或者三者之和偏离 1.0 超过 `FRACTION_TOLERANCE` 时，
    /// 返回 `BenchError::InvalidArgument`。
    pub fn new(member: f64, insert: f64, delete: f64) -> Result<Fractions> {
        for &fraction in &[member, insert, delete] {
            if !fraction.is_finite() || fraction < 0.0 {
                return Err(BenchError::InvalidArgument(format!(
                    "Invalid fraction {}: fractions must be non-negative numbers",
                    fraction
                )));
            }
        }
        if (member + insert + delete - 1.0).abs() > FRACTION_TOLERANCE {
            return Err(BenchError::InvalidArgument(
                "Probabilities do not add up to 1.0".to_owned(),
            ));
        }
        Ok(Fractions {
            member,
            insert,
            delete,
        })
    }

    /// 成员查询比例
    pub fn member(&self) -> f64 {
        self.member
    }

    /// 插入比例
    pub fn insert(&self) -> f64 {
        self.insert
    }

    /// 删除比例
    pub fn delete(&self) -> f64 {
        self.delete
    }

    /// 按累积概率边界把 `[0, 1)` 内的 `prob` 映射为操作类型。
    pub fn select(&self, prob: f64) -> Operation {
        if prob < self.member {
            Operation::Member
        } else if prob < self.member + self.insert {
            Operation::Insert
        } else {
            Operation::Delete
        }
    }
}

/// 由比例和总操作数推导出的各类操作次数，三者之和恰好等于总操作数。
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct WorkloadPlan {
    /// 成员查询次数
    pub member: usize,
    /// 插入次数
    pub insert: usize,
    /// 删除次数
    pub delete: usize,
}

impl WorkloadPlan {
    /// 比例乘以 `total` 后截断取整，截断造成的差额全部记到成员查询上。
    ///
    /// 比例之和允许略大于 1，此时多出来的部分优先从成员查询中扣除，
    /// 以保证总数仍然等于 `total`。
    pub fn derive(fractions: &Fractions, total: usize) -> WorkloadPlan {
        let insert = truncate(fractions.insert, total).min(total);
        let delete = truncate(fractions.delete, total).min(total - insert);
        WorkloadPlan {
            member: total - insert - delete,
            insert,
            delete,
        }
    }

    /// 计划中的总操作数
    pub fn total(&self) -> usize {
        self.member + self.insert + self.delete
    }
}

fn truncate(fraction: f64, total: usize) -> usize {
    (fraction * total as f64) as usize
}

/// 把 `[0, total)` 划分成 `workers` 段连续区间。
///
/// 除最后一段外每段长度为 `total / workers`，最后一段吸收余数。
///
/// # Errors
///
/// `workers` 为 0 时返回 `BenchError::InvalidArgument`。
pub fn partition(total: usize, workers: usize) -> Result<Vec<Range<usize>>> {
    if workers == 0 {
        return Err(BenchError::InvalidArgument(
            "Thread count must be at least 1".to_owned(),
        ));
    }
    let chunk = total / workers;
    Ok((0..workers)
        .map(|rank| {
            let start = rank * chunk;
            let end = if rank == workers - 1 {
                total
            } else {
                start + chunk
            };
            start..end
        })
        .collect())
}

/// 串行模式下每类操作的剩余额度。
///
/// 随机选中的类型额度用完时，按 删除、成员查询、插入 的固定顺序
/// 找一个仍有额度的类型，从而保证各类操作的总次数与计划完全一致。
#[derive(Debug, Clone)]
pub struct OpBudget {
    fractions: Fractions,
    remaining: WorkloadPlan,
}

impl OpBudget {
    /// 以 `plan` 作为初始额度。
    pub fn new(fractions: Fractions, plan: WorkloadPlan) -> OpBudget {
        OpBudget {
            fractions,
            remaining: plan,
        }
    }

    /// 根据 `prob` 选出下一次操作并扣减额度；所有额度都用完时返回 `None`。
    pub fn next(&mut self, prob: f64) -> Option<Operation> {
        let selected = self.fractions.select(prob);
        let op = if self.left(selected) > 0 {
            selected
        } else {
            *[Operation::Delete, Operation::Member, Operation::Insert]
                .iter()
                .find(|&&op| self.left(op) > 0)?
        };
        *self.left_mut(op) -= 1;
        Some(op)
    }

    /// 尚未用完的额度
    pub fn remaining(&self) -> WorkloadPlan {
        self.remaining
    }

    fn left(&self, op: Operation) -> usize {
        match op {
            Operation::Member => self.remaining.member,
            Operation::Insert => self.remaining.insert,
            Operation::Delete => self.remaining.delete,
        }
    }

    fn left_mut(&mut self, op: Operation) -> &mut usize {
        match op {
            Operation::Member => &mut self.remaining.member,
            Operation::Insert => &mut self.remaining.insert,
            Operation::Delete => &mut self.remaining.delete,
        }
    }
}

/// 一次试验中实际执行的各类操作次数，仅用于调试输出。
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct OpCounts {
    /// 成员查询次数
    pub member: usize,
    /// 插入次数
    pub insert: usize,
    /// 删除次数
    pub delete: usize,
    /// 返回 `true` 的操作次数（命中的查询、成功的插入与删除）
    pub hits: usize,
}

impl OpCounts {
    /// 记录一次操作及其返回值
    pub fn record(&mut self, op: Operation, hit: bool) {
        match op {
            Operation::Member => self.member += 1,
            Operation::Insert => self.insert += 1,
            Operation::Delete => self.delete += 1,
        }
        if hit {
            self.hits += 1;
        }
    }

    /// 合并另一个线程的计数
    pub fn merge(&mut self, other: &OpCounts) {
        self.member += other.member;
        self.insert += other.insert;
        self.delete += other.delete;
        self.hits += other.hits;
    }

    /// 总操作数
    pub fn total(&self) -> usize {
        self.member + self.insert + self.delete
    }
}
