use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::DigestSettings;
use crate::error::{Result, TreeError};
use crate::models::{DigestMap, FileResult};
use crate::scanner::{DigestPool, FileReader, FsReader, TreeWalker};

/// 目录摘要器 - 串起遍历器、工作池和收集器
///
/// 每次调用都是独立的一次流水线：有自己的取消信号，返回完整的映射或唯一的错误，
/// 返回前所有后台任务都已退出。
#[derive(Clone)]
pub struct TreeDigester {
    recursive: bool,
    workers: usize,
    queue_size: usize,
    reader: Arc<dyn FileReader>,
}

impl TreeDigester {
    /// 使用配置创建摘要器，默认直接读取文件系统
    pub fn new(settings: &DigestSettings) -> Self {
        Self {
            recursive: settings.recursive,
            workers: settings.workers,
            queue_size: settings.queue_size,
            reader: Arc::new(FsReader),
        }
    }

    /// 替换文件读取实现
    pub fn with_reader(mut self, reader: Arc<dyn FileReader>) -> Self {
        self.reader = reader;
        self
    }

    /// 计算 `root` 下所有普通文件的摘要
    pub async fn digest_all(&self, root: &Path) -> Result<DigestMap> {
        self.digest_all_with_token(root, &CancellationToken::new())
            .await
    }

    /// 同 [`digest_all`](Self::digest_all)，但调用方可以通过 `parent` 从外部取消
    ///
    /// 外部取消时返回 [`TreeError::Cancelled`]，不会返回部分结果。
    /// 流水线内部的取消不会传播回 `parent`。
    pub async fn digest_all_with_token(
        &self,
        root: &Path,
        parent: &CancellationToken,
    ) -> Result<DigestMap> {
        let cancel = parent.child_token();

        tracing::debug!(
            "开始计算摘要: {} (递归: {}, 并发: {})",
            root.display(),
            self.recursive,
            self.workers
        );

        let (paths, walk) =
            TreeWalker::new(root, self.recursive).spawn(self.queue_size, cancel.clone());
        let (results, pool) =
            DigestPool::new(self.workers, self.reader.clone()).spawn(paths, cancel.clone());

        let collected = collect(results, &cancel).await;
        let cancelled_outside = parent.is_cancelled();

        // 任何出口都要取消，并等所有任务退出
        cancel.cancel();
        let pool_done = pool.wait().await;
        let walk_done = walk.wait().await;

        let map = collected?;
        walk_done?;
        pool_done?;
        if cancelled_outside {
            return Err(TreeError::Cancelled);
        }

        tracing::info!("摘要完成: {} 个文件", map.len());
        Ok(map)
    }
}

impl Default for TreeDigester {
    fn default() -> Self {
        Self::new(&DigestSettings::default())
    }
}

/// 收集结果，第一个读取错误立即取消整条流水线并返回
async fn collect(
    mut results: mpsc::Receiver<FileResult>,
    cancel: &CancellationToken,
) -> Result<DigestMap> {
    let mut map = DigestMap::new();

    while let Some(FileResult { path, outcome }) = results.recv().await {
        match outcome {
            Ok(digest) => {
                map.insert(path, digest);
            }
            Err(err) => {
                tracing::warn!("摘要失败，取消剩余任务: {}", err);
                cancel.cancel();
                return Err(err);
            }
        }
    }

    Ok(map)
}

/// 一次性计算 `root` 下文件的 MD5 摘要，使用默认并发数
pub async fn md5_all(root: impl AsRef<Path>, recursive: bool) -> Result<DigestMap> {
    let settings = DigestSettings {
        recursive,
        ..DigestSettings::default()
    };
    TreeDigester::new(&settings).digest_all(root.as_ref()).await
}
