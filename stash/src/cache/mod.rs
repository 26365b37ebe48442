mod cache_aside;
mod cacheable;
pub mod codec;
mod key;

pub use cache_aside::{CacheAside, CacheAsideError};
pub use cacheable::Cacheable;
pub use codec::DecodeError;
pub use key::KeyTemplate;
