//! 运行结束后的输出：标准输出上的报告和结果日志。

use std::io::{self, Write};

use crate::{
    BenchConfig, BenchReport, BenchSettings, Benchmark, Fractions, Result, ResultLog, ResultRecord,
    Trial,
};

/// 报告在标准输出上的格式。
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Format {
    /// 两行可读文本
    Text,
    /// `BenchReport` 的 JSON 表示
    Json,
}

/// 跑完整个基准测试，输出报告并把结果追加到 `log`。
pub fn run_and_record<T: Trial>(
    trial: T,
    settings: BenchSettings,
    config: &BenchConfig,
    fractions: &Fractions,
    log: &ResultLog,
    format: Format,
) -> Result<BenchReport> {
    let report = Benchmark::new(trial, settings).run()?;
    print_report(&report, format)?;
    record(log, &ResultRecord::new(config, fractions, &report));
    Ok(report)
}

/// 把最终统计量写到标准输出。
pub fn print_report(report: &BenchReport, format: Format) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        Format::Text => {
            writeln!(
                out,
                "Final Mean Execution Time: {:.6} microseconds | Final Standard Deviation: {:.6} microseconds",
                report.statistics.mean, report.statistics.std_dev
            )?;
            writeln!(out, "Total Samples: {}", report.statistics.samples)?;
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// 追加结果；写入失败不影响本次运行，只记录错误。
pub fn record(log: &ResultLog, record: &ResultRecord) {
    match log.append(record) {
        Ok(()) => info!("Results appended to {}", log.path().display()),
        Err(e) => error!(
            "Failed to open file {} for writing: {}",
            log.path().display(),
            e
        ),
    }
}
