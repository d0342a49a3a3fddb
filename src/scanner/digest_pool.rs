use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{Result, TreeError};
use crate::models::{Digest, FileResult};
use crate::scanner::FileReader;

/// 摘要工作池 - 固定数量的任务并发读取文件并计算摘要
///
/// 所有任务共享同一个路径接收端，每条路径只会交给一个任务。
pub struct DigestPool {
    workers: usize,
    reader: Arc<dyn FileReader>,
}

/// 正在运行的工作池
pub struct PoolHandle {
    supervisor: JoinHandle<Result<()>>,
}

impl DigestPool {
    /// 创建工作池，`workers` 至少为 1
    pub fn new(workers: usize, reader: Arc<dyn FileReader>) -> Self {
        Self {
            workers: workers.max(1),
            reader,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// 启动所有工作任务，返回结果流
    ///
    /// 结果流只会在全部任务结束之后关闭：监督任务先等待所有任务退出，
    /// 再释放最后一个发送端。
    pub fn spawn(
        self,
        paths: mpsc::Receiver<PathBuf>,
        cancel: CancellationToken,
    ) -> (mpsc::Receiver<FileResult>, PoolHandle) {
        let (tx, rx) = mpsc::channel(self.workers);
        let paths = Arc::new(Mutex::new(paths));

        let tasks: Vec<_> = (0..self.workers)
            .map(|id| {
                let paths = paths.clone();
                let tx = tx.clone();
                let reader = self.reader.clone();
                let cancel = cancel.clone();

                tokio::spawn(async move { digester(id, paths, tx, reader, cancel).await })
            })
            .collect();

        let supervisor = tokio::spawn(async move {
            let joined = futures::future::join_all(tasks).await;
            drop(tx);

            for outcome in joined {
                outcome?;
            }
            Ok::<(), TreeError>(())
        });

        (rx, PoolHandle { supervisor })
    }
}

impl PoolHandle {
    /// 等待所有工作任务退出
    pub async fn wait(self) -> Result<()> {
        self.supervisor.await?
    }
}

/// 单个工作任务的主循环
async fn digester(
    id: usize,
    paths: Arc<Mutex<mpsc::Receiver<PathBuf>>>,
    results: mpsc::Sender<FileResult>,
    reader: Arc<dyn FileReader>,
    cancel: CancellationToken,
) {
    let mut processed = 0usize;

    loop {
        let next = {
            let mut paths = paths.lock().await;
            tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                path = paths.recv() => path,
            }
        };

        let Some(path) = next else { break };

        let result = digest_file(path, reader.clone()).await;

        if cancel.is_cancelled() {
            break;
        }

        let delivered = tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            res = results.send(result) => res.is_ok(),
        };
        if !delivered {
            break;
        }
        processed += 1;
    }

    tracing::debug!("摘要任务 {} 退出，处理了 {} 个文件", id, processed);
}

/// 在阻塞线程池中读取文件并计算摘要
async fn digest_file(path: PathBuf, reader: Arc<dyn FileReader>) -> FileResult {
    let read_path = path.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        reader
            .read(&read_path)
            .map(|data| Digest::of(&data))
            .map_err(|source| TreeError::Read {
                path: read_path,
                source,
            })
    })
    .await
    .unwrap_or_else(|join_err| Err(TreeError::Task(join_err)));

    FileResult { path, outcome }
}
