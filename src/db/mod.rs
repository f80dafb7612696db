pub mod catalog;
pub mod redis;
pub mod similarity;

pub use self::redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};
pub use catalog::Catalog;
pub use similarity::SimilarityIndex;
