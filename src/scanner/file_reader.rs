use std::io;
use std::path::Path;

/// 读取文件完整内容的原语
///
/// 由工作任务在阻塞线程池中调用，实现必须可以跨线程共享。
pub trait FileReader: Send + Sync + 'static {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// 直接读取本地文件系统
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl FileReader for FsReader {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}
