use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::error::TreeError;

/// MD5 摘要的字节长度
pub const DIGEST_SIZE: usize = 16;

/// 文件内容的定长摘要
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; DIGEST_SIZE]);

impl Digest {
    /// 计算一段字节内容的 MD5 摘要
    pub fn of(data: &[u8]) -> Self {
        Self(md5::compute(data).0)
    }

    /// 从原始字节构造摘要
    pub fn from_bytes(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// 小写十六进制表示
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// 单个文件的摘要结果
///
/// 由工作任务产生，交给收集器消费。`outcome` 为错误时不携带摘要。
#[derive(Debug)]
pub struct FileResult {
    /// 文件路径（遍历器产生的原始路径）
    pub path: PathBuf,

    /// 摘要或读取错误
    pub outcome: Result<Digest, TreeError>,
}

/// 路径到摘要的映射，不保证顺序
pub type DigestMap = HashMap<PathBuf, Digest>;
