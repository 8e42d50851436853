pub use crate::builder::LruCacheBuilder;
pub use crate::ds::{RecencyList, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError};
pub use crate::policy::lru::{Displaced, LruCache, LruCore};
pub use crate::traits::{Cache, ConcurrentCache};
