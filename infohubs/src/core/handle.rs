//! Opaque, type-erased handles stored in hub entries.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// A shared, type-erased handle to a resource, capability or proxy.
///
/// Handles are cheap to clone and compare by identity: two handles are equal
/// only when they point at the same allocation.
///
/// Trait-object capabilities are stored as `Arc<dyn Trait>` values and read
/// back with [`Handle::capability`]:
///
/// ```
/// use infohubs::core::Handle;
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
/// struct Hello;
/// impl Greeter for Hello {
///     fn greet(&self) -> String { "hello".into() }
/// }
///
/// let handle = Handle::new(Arc::new(Hello) as Arc<dyn Greeter>);
/// let greeter = handle.capability::<dyn Greeter>().unwrap();
/// assert_eq!(greeter.greet(), "hello");
/// ```
#[derive(Clone)]
pub struct Handle {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Handle {
    /// Wraps a value in a new handle.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// Wraps an already shared value without another allocation.
    #[must_use]
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            inner: value,
            type_name: type_name::<T>(),
        }
    }

    /// Returns a reference to the wrapped value if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Returns a shared pointer to the wrapped value if it is a `T`.
    #[must_use]
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }

    /// Returns the capability stored as `Arc<T>` (usually `Arc<dyn Trait>`).
    #[must_use]
    pub fn capability<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.downcast_ref::<Arc<T>>().cloned()
    }

    /// Returns the type name recorded when the handle was created.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns true if both handles point at the same value.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("type", &self.type_name)
            .finish()
    }
}
