use std::path::{Path, PathBuf};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

use crate::error::{Result, TreeError};

/// 目录遍历器 - 从根目录出发产生所有普通文件的路径
///
/// 遍历按文件名排序、深度优先，对同一棵目录树的输出顺序是确定的。
/// 目录、符号链接、设备文件等都不会被产生。
#[derive(Debug, Clone)]
pub struct TreeWalker {
    root: PathBuf,
    recursive: bool,
}

/// 正在运行的遍历任务
///
/// 遍历的终止信号：成功为交付的文件数，否则是唯一的遍历错误或取消错误。
#[derive(Debug)]
pub struct WalkHandle {
    task: JoinHandle<Result<usize>>,
}

impl TreeWalker {
    /// 创建新的遍历器
    ///
    /// `recursive` 为 false 时只访问根目录的直接子项，子目录整棵剪掉，
    /// 不会读取任何孙级目录。
    pub fn new(root: impl Into<PathBuf>, recursive: bool) -> Self {
        Self {
            root: root.into(),
            recursive,
        }
    }

    /// 在阻塞线程池中启动遍历，返回路径流和终止句柄
    ///
    /// 每次交付路径前都会检查取消信号；交付本身也会在取消时立即放弃。
    pub fn spawn(
        self,
        queue_size: usize,
        cancel: CancellationToken,
    ) -> (mpsc::Receiver<PathBuf>, WalkHandle) {
        let (tx, rx) = mpsc::channel(queue_size.max(1));
        let handle = Handle::current();

        let task = tokio::task::spawn_blocking(move || self.walk_blocking(&handle, tx, &cancel));

        (rx, WalkHandle { task })
    }

    /// 同步遍历实现，返回交付的文件数量
    fn walk_blocking(
        &self,
        handle: &Handle,
        tx: mpsc::Sender<PathBuf>,
        cancel: &CancellationToken,
    ) -> Result<usize> {
        let mut walker = WalkDir::new(&self.root)
            .follow_links(false)
            .follow_root_links(false)
            .sort_by_file_name();

        if !self.recursive {
            walker = walker.max_depth(1);
        }

        let mut sent = 0usize;
        for entry in walker {
            let entry = entry.map_err(|source| TreeError::Traversal {
                path: source
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.root.clone()),
                source,
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            if cancel.is_cancelled() {
                return Err(TreeError::Cancelled);
            }

            let path = entry.into_path();
            let delivered = handle.block_on(async {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => false,
                    res = tx.send(path) => res.is_ok(),
                }
            });

            // 接收端已全部关闭也视为取消
            if !delivered {
                return Err(TreeError::Cancelled);
            }
            sent += 1;
        }

        tracing::debug!("遍历完成: {} ({} 个文件)", self.root.display(), sent);
        Ok(sent)
    }
}

impl WalkHandle {
    /// 等待遍历结束，取得终止信号
    pub async fn wait(self) -> Result<usize> {
        self.task.await?
    }
}
