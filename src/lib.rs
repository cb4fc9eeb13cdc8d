#![deny(missing_docs)]
//! 在一把全局锁下对有序单链表进行并发访问的基准测试。

#[macro_use]
extern crate log;

// 重新导出核心组件，方便外部使用
pub use bench::{BenchReport, BenchSettings, Benchmark};
pub use config::BenchConfig;
pub use error::{BenchError, Result};
pub use list::SortedList;
pub use lock::{LockedList, MutexList, RwLockList};
pub use results::{ResultLog, ResultRecord};
pub use trial::{ConcurrentTrial, SerialTrial, Trial, TrialOutcome};
pub use workload::{Fractions, Operation, WorkloadPlan};

mod bench;
pub mod config;
mod error;
pub mod list;
pub mod lock;
pub mod report;
pub mod results;
pub mod stats;
pub mod trial;
pub mod workload;
