//! 基准测试的运行参数。

use serde::Serialize;

use crate::{BenchError, Result};

/// 链表初始元素个数的默认值 (n)
pub const DEFAULT_INITIAL_SIZE: usize = 1000;
/// 每次试验操作总数的默认值 (m)
pub const DEFAULT_OPERATIONS: usize = 10_000;
/// 随机值取自 `[0, DEFAULT_VALUE_RANGE)`
pub const DEFAULT_VALUE_RANGE: i32 = 65535;

/// 一次基准测试运行的固定参数。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchConfig {
    /// 每次试验前链表填充到的元素个数 (n)
    pub initial_size: usize,
    /// 每次试验执行的操作总数 (m)
    pub operations: usize,
    /// 随机值的上界（不含）
    pub value_range: i32,
    /// 随机数种子；为空时使用当前时间
    pub seed: Option<u64>,
    /// 样本数上限；为空时不设上限
    pub max_samples: Option<usize>,
}

impl Default for BenchConfig {
    fn default() -> BenchConfig {
        BenchConfig {
            initial_size: DEFAULT_INITIAL_SIZE,
            operations: DEFAULT_OPERATIONS,
            value_range: DEFAULT_VALUE_RANGE,
            seed: None,
            max_samples: None,
        }
    }
}

impl BenchConfig {
    /// 检查参数组合是否可以运行。
    ///
    /// # Errors
    ///
    /// 值域为空、操作数为 0、链表无法填充到 `initial_size` 个互不相同的值，
    /// 或样本上限为 0 时返回 `BenchError::InvalidArgument`。
    pub fn validate(&self) -> Result<()> {
        if self.value_range <= 0 {
            return Err(invalid("Value range must be positive"));
        }
        if self.operations == 0 {
            return Err(invalid("Operation count must be at least 1"));
        }
        if self.initial_size > self.value_range as usize {
            return Err(BenchError::InvalidArgument(format!(
                "Cannot populate {} unique values from a range of {}",
                self.initial_size, self.value_range
            )));
        }
        if self.max_samples == Some(0) {
            return Err(invalid("Sample limit must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> BenchError {
    BenchError::InvalidArgument(msg.to_owned())
}
