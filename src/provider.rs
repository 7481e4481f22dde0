//! Provider model: how a token's value is produced
//!
//! A [`Provider`] is a closed tagged union over the three binding shapes:
//! a precomputed value, a factory closure, or a class constructed from
//! resolved dependencies. Matching on the enum keeps every production path
//! visible to the optimizer and leaves no room for an unknown shape.

use crate::{Constructor, Container, Result};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Type-erased shared value produced by the container.
///
/// Every resolution returns an `Instance`; typed access is by checked
/// downcast (see [`Container::resolve_as`](crate::Container::resolve_as)).
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Marker trait for values the container can produce and cache.
///
/// Automatically implemented for all `Send + Sync + 'static` types; you
/// never implement it manually.
pub trait Injectable: Send + Sync + 'static {
    /// Returns the type name for diagnostics
    #[inline]
    fn type_name_of() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }
}

// Blanket implementation - everything that's Send + Sync + 'static is Injectable
impl<T: Send + Sync + 'static> Injectable for T {}

/// Caching policy for a provider's output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifetime {
    /// First produced value is cached and shared by every later resolution
    #[default]
    Singleton,

    /// Fresh value produced on every resolution, never cached
    Transient,
}

/// Type-erased factory function, invoked with the container as resolver
type FactoryFn = Arc<dyn Fn(&Container) -> Result<Instance> + Send + Sync>;

/// A precomputed value returned as-is on every resolution.
///
/// The provider itself is the stable source; the singleton cache is never
/// involved.
#[derive(Clone)]
pub struct ValueProvider {
    value: Instance,
}

impl ValueProvider {
    #[inline]
    pub(crate) fn get(&self) -> Instance {
        Arc::clone(&self.value)
    }
}

/// A closure producing the value, with a caching policy.
#[derive(Clone)]
pub struct FactoryProvider {
    produce: FactoryFn,
    pub(crate) lifetime: Lifetime,
}

impl FactoryProvider {
    #[inline]
    pub(crate) fn call(&self, resolver: &Container) -> Result<Instance> {
        (self.produce)(resolver)
    }
}

/// A constructor invoked with resolved dependencies, with a caching policy.
#[derive(Clone)]
pub struct ClassProvider {
    pub(crate) constructor: Constructor,
    pub(crate) lifetime: Lifetime,
}

/// How to produce a value for a token
#[derive(Clone)]
pub enum Provider {
    /// Return a stored value
    Value(ValueProvider),
    /// Invoke a factory closure
    Factory(FactoryProvider),
    /// Construct a class instance
    Class(ClassProvider),
}

impl Provider {
    /// A provider that returns `value` on every resolution.
    ///
    /// The value is type-erased once, here; resolutions just clone the
    /// shared handle.
    #[inline]
    pub fn value<T: Injectable>(value: T) -> Self {
        Self::value_arc(Arc::new(value))
    }

    /// Same as [`Provider::value`], from an existing `Arc`.
    #[inline]
    pub fn value_arc<T: Injectable>(value: Arc<T>) -> Self {
        Provider::Value(ValueProvider {
            value: value as Instance,
        })
    }

    /// A singleton factory provider.
    ///
    /// The closure receives the container as a pure resolver and is invoked
    /// at most once; the produced value is cached.
    #[inline]
    pub fn factory<T, F>(produce: F) -> Self
    where
        T: Injectable,
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        Self::factory_with(produce, Lifetime::Singleton)
    }

    /// A factory provider with an explicit lifetime.
    #[inline]
    pub fn factory_with<T, F>(produce: F, lifetime: Lifetime) -> Self
    where
        T: Injectable,
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        Provider::Factory(FactoryProvider {
            produce: Arc::new(move |resolver: &Container| {
                produce(resolver).map(|value| Arc::new(value) as Instance)
            }),
            lifetime,
        })
    }

    /// A singleton class provider for `constructor`.
    #[inline]
    pub fn class(constructor: Constructor) -> Self {
        Self::class_with(constructor, Lifetime::Singleton)
    }

    /// A class provider with an explicit lifetime.
    #[inline]
    pub fn class_with(constructor: Constructor, lifetime: Lifetime) -> Self {
        Provider::Class(ClassProvider {
            constructor,
            lifetime,
        })
    }

    /// Tag name for logging.
    #[inline]
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Provider::Value(_) => "value",
            Provider::Factory(_) => "factory",
            Provider::Class(_) => "class",
        }
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Value(_) => f.debug_struct("Provider::Value").finish(),
            Provider::Factory(p) => f
                .debug_struct("Provider::Factory")
                .field("lifetime", &p.lifetime)
                .finish(),
            Provider::Class(p) => f
                .debug_struct("Provider::Class")
                .field("constructor", &p.constructor)
                .field("lifetime", &p.lifetime)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_provider_is_pre_erased() {
        let original = Arc::new(vec![1_u8, 2, 3]);
        let provider = Provider::value_arc(Arc::clone(&original));

        let Provider::Value(value) = &provider else {
            panic!("expected value provider");
        };

        let resolved = value.get().downcast::<Vec<u8>>().unwrap();
        assert!(Arc::ptr_eq(&resolved, &original));
    }

    #[test]
    fn test_default_lifetimes() {
        let factory = Provider::factory(|_| Ok(0_u32));
        let class = Provider::class(Constructor::new("Unit", |_| Ok(())));

        let Provider::Factory(f) = &factory else {
            panic!("expected factory provider");
        };
        let Provider::Class(c) = &class else {
            panic!("expected class provider");
        };

        assert_eq!(f.lifetime, Lifetime::Singleton);
        assert_eq!(c.lifetime, Lifetime::Singleton);
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(Provider::value(1_u8).kind(), "value");
        assert_eq!(Provider::factory(|_| Ok(1_u8)).kind(), "factory");
        assert_eq!(
            Provider::class(Constructor::new("Unit", |_| Ok(()))).kind(),
            "class"
        );
    }
}
