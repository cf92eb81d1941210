//! Per-request flags, counters and development helpers.

use crate::core::Value;
use crate::hubs::FactoryRegistry;
use crate::utils::Timestamper;
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Flags that templates set once a page part has been rendered.
const RENDER_FLAGS: &[&str] = &[
    "skip_desktop_crumbs",
    "personal_desktop_done",
    "group_desktop_done",
    "management_center_done",
    "view_template_done",
    "context_printed",
];

pub(super) fn register(registry: FactoryRegistry) -> FactoryRegistry {
    let registry = RENDER_FLAGS
        .iter()
        .fold(registry, |registry, flag| registry.register(*flag, |_| Ok(Value::Bool(false))));

    registry
        .register("nesting_depth", |_| Ok(Value::Int(0)))
        .register("devmode", |hub| Ok(Value::Bool(hub.config().dev_mode)))
        .register("thread_ident", |_| {
            Ok(Value::Text(format!("{:?}", std::thread::current().id())))
        })
        // Constant for the whole request, suitable for file names.
        .register("timestamp_fn", |hub| {
            Ok(Value::Text(Timestamper::new(hub.config().timestamp_format.as_str()).now()))
        })
        .register("counter", |_| Ok(Value::handle(Counter::new())))
        .register("counters", |_| Ok(Value::handle(Counters::new())))
}

/// Mutable name to count map living as long as the hub pair.
#[derive(Debug, Default)]
pub struct Counter {
    counts: Mutex<BTreeMap<String, i64>>,
}

impl Counter {
    /// Creates an empty counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one to `name` and returns the new count.
    pub fn increment(&self, name: &str) -> i64 {
        self.add(name, 1)
    }

    /// Adds `delta` to `name` and returns the new count.
    pub fn add(&self, name: &str, delta: i64) -> i64 {
        let mut counts = self.counts.lock();
        let count = counts.entry(name.to_string()).or_insert(0);
        *count += delta;
        *count
    }

    /// Returns the count of `name`, zero if never counted.
    #[must_use]
    pub fn get(&self, name: &str) -> i64 {
        self.counts.lock().get(name).copied().unwrap_or(0)
    }

    /// Returns all counts.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, i64> {
        self.counts.lock().clone()
    }
}

/// Counters grouped by category.
#[derive(Debug, Default)]
pub struct Counters {
    categories: Mutex<BTreeMap<String, BTreeMap<String, i64>>>,
}

impl Counters {
    /// Creates an empty set of counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one to `name` in `category` and returns the new count.
    pub fn increment(&self, category: &str, name: &str) -> i64 {
        let mut categories = self.categories.lock();
        let count = categories
            .entry(category.to_string())
            .or_default()
            .entry(name.to_string())
            .or_insert(0);
        *count += 1;
        *count
    }

    /// Returns the count of `name` in `category`.
    #[must_use]
    pub fn get(&self, category: &str, name: &str) -> i64 {
        self.categories
            .lock()
            .get(category)
            .and_then(|counts| counts.get(name))
            .copied()
            .unwrap_or(0)
    }

    /// Returns the counts of one category.
    #[must_use]
    pub fn category(&self, category: &str) -> BTreeMap<String, i64> {
        self.categories
            .lock()
            .get(category)
            .cloned()
            .unwrap_or_default()
    }
}
