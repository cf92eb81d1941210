//! Memoizing adapter that exposes a one-argument function as a lookup.

use crate::errors::HubError;
use dashmap::DashMap;
use std::fmt;
use std::hash::Hash;

type ProxyFn<K, R> = Box<dyn Fn(&K) -> Result<R, HubError> + Send + Sync>;
type Normalizer<A, K> = Box<dyn Fn(&A) -> K + Send + Sync>;

/// A memoizing, mapping-like view of a parameterized function.
///
/// Arguments are normalized into a hashable key first; the wrapped function
/// runs at most once per distinct key. Failures are not cached.
///
/// ```
/// use infohubs::hubs::CallableProxy;
///
/// let lengths = CallableProxy::by_key(|s: &String| Ok(s.len()));
/// assert_eq!(lengths.get("four").unwrap(), 4);
/// assert!(lengths.contains("four"));
/// ```
pub struct CallableProxy<A: ?Sized, K, R> {
    func: ProxyFn<K, R>,
    normalize: Normalizer<A, K>,
    cache: DashMap<K, R>,
}

impl<K, R> CallableProxy<K, K, R>
where
    K: Clone + Eq + Hash + 'static,
    R: Clone,
{
    /// Wraps `func`, using arguments as keys unchanged.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&K) -> Result<R, HubError> + Send + Sync + 'static,
    {
        Self::with_normalizer(func, K::clone)
    }
}

impl<R: Clone> CallableProxy<str, String, R> {
    /// Wraps `func` for string keys, accepting borrowed arguments.
    pub fn by_key<F>(func: F) -> Self
    where
        F: Fn(&String) -> Result<R, HubError> + Send + Sync + 'static,
    {
        Self::with_normalizer(func, str::to_owned)
    }
}

impl<A, K, R> CallableProxy<A, K, R>
where
    A: ?Sized,
    K: Eq + Hash,
    R: Clone,
{
    /// Wraps `func`, reducing every argument with `normalize` first.
    pub fn with_normalizer<F, N>(func: F, normalize: N) -> Self
    where
        F: Fn(&K) -> Result<R, HubError> + Send + Sync + 'static,
        N: Fn(&A) -> K + Send + Sync + 'static,
    {
        Self {
            func: Box::new(func),
            normalize: Box::new(normalize),
            cache: DashMap::new(),
        }
    }

    /// Returns the result for `arg`, computing it on first access.
    pub fn get(&self, arg: &A) -> Result<R, HubError> {
        let key = (self.normalize)(arg);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit.value().clone());
        }

        // No shard lock is held while `func` runs; it may use other proxies.
        let result = (self.func)(&key)?;
        Ok(self.cache.entry(key).or_insert(result).value().clone())
    }

    /// Returns the cached result for `arg` without computing it.
    pub fn cached(&self, arg: &A) -> Option<R> {
        let key = (self.normalize)(arg);
        self.cache.get(&key).map(|hit| hit.value().clone())
    }

    /// Returns true if a result for `arg` is cached.
    pub fn contains(&self, arg: &A) -> bool {
        self.cache.contains_key(&(self.normalize)(arg))
    }

    /// Returns the number of cached results.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns true if nothing is cached yet.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl<A: ?Sized, K, R> fmt::Debug for CallableProxy<A, K, R>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallableProxy")
            .field("cached", &self.cache.len())
            .finish()
    }
}
