//! 样本统计量与所需样本量的估计。

use serde::Serialize;

/// 95% 置信水平对应的 z 值
pub const Z_95: f64 = 1.96;
/// 目标相对误差：置信区间半宽为均值的 5%
pub const RELATIVE_ERROR: f64 = 0.05;
/// 并发基准测试要求的最小样本量
pub const MIN_CONCURRENT_SAMPLES: usize = 30;

/// 方差的分母取法。
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Variance {
    /// 总体方差，除以 n（串行基准）
    Population,
    /// 样本方差，除以 n - 1（并发基准）
    Sample,
}

/// 一组耗时样本的均值、标准差与样本数，单位为微秒。
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct RunStatistics {
    /// 均值
    pub mean: f64,
    /// 标准差
    pub std_dev: f64,
    /// 样本数
    pub samples: usize,
}

impl RunStatistics {
    /// 计算 `samples` 的统计量。
    ///
    /// 样本为空时全部为 0；样本方差在只有一个样本时取 0。
    pub fn compute(samples: &[f64], variance: Variance) -> RunStatistics {
        let count = samples.len();
        if count == 0 {
            return RunStatistics::default();
        }
        let mean = samples.iter().sum::<f64>() / count as f64;
        let squares: f64 = samples.iter().map(|x| (x - mean) * (x - mean)).sum();
        let divisor = match variance {
            Variance::Population => count,
            Variance::Sample => count - 1,
        };
        let std_dev = if divisor == 0 {
            0.0
        } else {
            (squares / divisor as f64).sqrt()
        };
        RunStatistics {
            mean,
            std_dev,
            samples: count,
        }
    }
}

/// 估计使均值的置信区间半宽不超过 `relative_error * mean` 所需的样本量。
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct SampleSizeEstimator {
    /// 置信水平对应的 z 值
    pub z: f64,
    /// 相对误差
    pub relative_error: f64,
    /// 结果的下限
    pub min_samples: usize,
}

impl SampleSizeEstimator {
    /// 串行基准使用的估计器，不设下限。
    pub fn serial() -> SampleSizeEstimator {
        SampleSizeEstimator {
            z: Z_95,
            relative_error: RELATIVE_ERROR,
            min_samples: 0,
        }
    }

    /// 并发基准使用的估计器，结果至少为 30，以便正态近似成立。
    pub fn concurrent() -> SampleSizeEstimator {
        SampleSizeEstimator {
            min_samples: MIN_CONCURRENT_SAMPLES,
            ..SampleSizeEstimator::serial()
        }
    }

    /// n = ceil((z·σ / (relative_error·mean))²)，再与下限取最大值。
    ///
    /// 均值或标准差不为正、或结果不是有限值时视为不需要额外样本。
    pub fn estimate(&self, std_dev: f64, mean: f64) -> usize {
        let required = if mean > 0.0 && std_dev > 0.0 {
            let ratio = self.z * std_dev / (self.relative_error * mean);
            let n = (ratio * ratio).ceil();
            if n.is_finite() {
                n as usize
            } else {
                0
            }
        } else {
            0
        };
        required.max(self.min_samples)
    }
}
