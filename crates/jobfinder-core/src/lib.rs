pub mod cache;
pub mod clock;
pub mod error;
pub mod models;
pub mod normalize;
pub mod query;
pub mod traits;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use cache::{MemoryCacheStore, NullCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::AppError;
pub use models::{CacheEntry, JobRecord, QueryResult, cache_key};
pub use normalize::{matches_term, normalize};
pub use query::{QueryConfig, QueryService};
pub use traits::{CacheStore, Extractor, Renderer};
