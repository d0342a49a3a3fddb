pub mod digest;

pub use digest::{Digest, DigestMap, FileResult, DIGEST_SIZE};
