/// Read-through caching over an optional [`Cache`](crate::db::Cache).
///
/// Returns the cached value when present. Otherwise awaits `$block`, queues
/// the computed value for a background write and returns it. With no cache
/// configured (`None`) the block always runs. Cache failures count as misses.
///
/// # Arguments
/// * `$cache`: an `Option<Cache>`
/// * `$key`: the `CacheKey` to read and write
/// * `$ttl`: time-to-live of the written value in seconds
/// * `$block`: future producing `AppResult<T>` on a miss
///
/// # Example
/// ```rust,ignore
/// let details: serde_json::Value = cached!(self.cache, CacheKey::MovieDetails(id), TTL, async move {
///     fetch_from_api(id).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        let hit = match $cache.as_ref() {
            Some(cache) => cache.lookup(&key).await,
            None => None,
        };

        if let Some(cached) = hit {
            Ok(cached)
        } else {
            let value = $block.await?;
            if let Some(cache) = $cache.as_ref() {
                cache.set_in_background(&key, &value, $ttl);
            }
            Ok(value)
        }
    }};
}
