pub mod collector;
pub mod digest_pool;
pub mod file_reader;
pub mod tree_walker;

pub use collector::{md5_all, TreeDigester};
pub use digest_pool::{DigestPool, PoolHandle};
pub use file_reader::{FileReader, FsReader};
pub use tree_walker::{TreeWalker, WalkHandle};
