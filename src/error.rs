use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// 摘要流水线的错误类型
///
/// 每次调用最多返回一个错误：第一个读取错误优先，其次是遍历的终止错误。
#[derive(Error, Debug)]
pub enum TreeError {
    /// 目录无法读取、权限不足等遍历错误
    #[error("遍历 {} 时出错: {source}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// 单个文件读取失败
    #[error("读取 {} 失败: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 流水线在完成前被取消
    #[error("遍历已取消")]
    Cancelled,

    /// 后台任务异常退出
    #[error("后台任务失败: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl TreeError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TreeError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, TreeError>;
