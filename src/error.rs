use failure::Fail;
use std::io;

/// listbench 的错误类型
#[derive(Fail, Debug)]
pub enum BenchError {
    /// IO 错误（结果日志、线程创建）
    #[fail(display = "IO error: {}", _0)]
    Io(#[cause] io::Error),
    /// 报告序列化错误 (serde_json)
    #[fail(display = "serde_json error: {}", _0)]
    Serde(#[cause] serde_json::Error),
    /// 参数个数不对、比例之和不为 1 等非法输入
    #[fail(display = "{}", _0)]
    InvalidArgument(String),
    /// 某个工作线程在试验中发生 panic
    #[fail(display = "Worker thread panicked")]
    WorkerPanicked,
    /// 结果日志中无法解析的行
    #[fail(display = "Malformed result line: {}", _0)]
    Parse(String),
}

impl From<io::Error> for BenchError {
    fn from(err: io::Error) -> BenchError {
        BenchError::Io(err)
    }
}

impl From<serde_json::Error> for BenchError {
    fn from(err: serde_json::Error) -> BenchError {
        BenchError::Serde(err)
    }
}

/// listbench 的 Result 别名类型，默认错误为 BenchError
pub type Result<T> = std::result::Result<T, BenchError>;
