pub mod config;
pub mod error;
pub mod models;
pub mod scanner;
pub mod utils;

// 重新导出常用模块
pub use error::TreeError;
pub use models::{Digest, DigestMap};
pub use scanner::{md5_all, FileReader, TreeDigester};
