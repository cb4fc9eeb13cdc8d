//! 只追加的结果日志，每次运行一行。

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use crate::{BenchConfig, BenchError, BenchReport, Fractions, Result};

/// 结果日志中的一行。
///
/// 格式为 `n: <int> | m: <int> | mMember: <float>% | mInsert: <float>% | mDelete: <float>% |
/// threadCount: <int> | mean: <float> | stdDev: <float>`。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    /// 初始元素个数
    pub n: usize,
    /// 每次试验的操作数
    pub m: usize,
    /// 成员查询比例
    pub member: f64,
    /// 插入比例
    pub insert: f64,
    /// 删除比例
    pub delete: f64,
    /// 线程数
    pub threads: usize,
    /// 平均耗时（微秒）
    pub mean: f64,
    /// 耗时标准差（微秒）
    pub std_dev: f64,
}

impl ResultRecord {
    /// 由运行参数和最终报告组装一条记录。
    pub fn new(config: &BenchConfig, fractions: &Fractions, report: &BenchReport) -> ResultRecord {
        ResultRecord {
            n: config.initial_size,
            m: config.operations,
            member: fractions.member(),
            insert: fractions.insert(),
            delete: fractions.delete(),
            threads: report.threads,
            mean: report.statistics.mean,
            std_dev: report.statistics.std_dev,
        }
    }

    fn case_key(&self) -> String {
        format!("{:.6}/{:.6}/{:.6}", self.member, self.insert, self.delete)
    }
}

impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n: {} | m: {} | mMember: {:.6}% | mInsert: {:.6}% | mDelete: {:.6}% | threadCount: {} | mean: {:.6} | stdDev: {:.6}",
            self.n, self.m, self.member, self.insert, self.delete, self.threads, self.mean, self.std_dev
        )
    }
}

impl FromStr for ResultRecord {
    type Err = BenchError;

    fn from_str(line: &str) -> Result<ResultRecord> {
        let mut fields = BTreeMap::new();
        for part in line.split('|') {
            let mut kv = part.splitn(2, ':');
            if let (Some(key), Some(value)) = (kv.next(), kv.next()) {
                fields.insert(key.trim(), value.trim().trim_end_matches('%'));
            }
        }

        fn field<T: FromStr>(fields: &BTreeMap<&str, &str>, key: &str, line: &str) -> Result<T> {
            fields
                .get(key)
                .and_then(|value| value.parse().ok())
                .ok_or_else(|| BenchError::Parse(format!("missing or invalid `{}` in `{}`", key, line)))
        }

        Ok(ResultRecord {
            n: field(&fields, "n", line)?,
            m: field(&fields, "m", line)?,
            member: field(&fields, "mMember", line)?,
            insert: field(&fields, "mInsert", line)?,
            delete: field(&fields, "mDelete", line)?,
            threads: field(&fields, "threadCount", line)?,
            mean: field(&fields, "mean", line)?,
            std_dev: field(&fields, "stdDev", line)?,
        })
    }
}

/// 结果日志文件。
pub struct ResultLog {
    path: PathBuf,
}

impl ResultLog {
    /// 指向 `path` 的日志，文件在第一次追加时才创建。
    pub fn new(path: impl Into<PathBuf>) -> ResultLog {
        ResultLog { path: path.into() }
    }

    /// 日志路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 追加一行记录，必要时创建父目录。
    pub fn append(&self, record: &ResultRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", record)?;
        Ok(())
    }

    /// 读出全部记录，跳过空行和无法解析的行。
    pub fn read(&self) -> Result<Vec<ResultRecord>> {
        let reader = BufReader::new(File::open(&self.path)?);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match line.parse() {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping line in {}: {}", self.path.display(), e),
            }
        }
        Ok(records)
    }
}

/// 对同一组比例和线程数只保留最后出现的记录，按比例、线程数排序返回。
pub fn latest(records: Vec<ResultRecord>) -> Vec<ResultRecord> {
    let mut latest = BTreeMap::new();
    for record in records {
        latest.insert((record.case_key(), record.threads), record);
    }
    latest.into_iter().map(|(_, record)| record).collect()
}
