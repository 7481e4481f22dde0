//! Constructor handles and resolved-argument access
//!
//! A [`Constructor`] is the runtime stand-in for a class constructor: a
//! positional instantiation function paired with a process-unique identity.
//! Identity is what makes a constructor usable as a token — two constructors
//! producing the same type remain distinct.

use crate::{DiError, Injectable, Instance, Result};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Type-erased instantiation function
type BuildFn = Box<dyn Fn(Arguments) -> Result<Instance> + Send + Sync>;

struct ConstructorInner {
    id: u64,
    name: &'static str,
    build: BuildFn,
}

/// A cheaply-cloneable handle to a class constructor.
///
/// The build closure receives the dependencies the container resolved for
/// it, in declaration order, and assembles the instance:
///
/// ```rust
/// use autowire::{Arguments, Constructor};
/// use std::sync::Arc;
///
/// struct Logger;
/// struct Service { logger: Arc<Logger> }
///
/// let service = Constructor::new("Service", |args: Arguments| {
///     Ok(Service { logger: args.get(0)? })
/// });
/// assert_eq!(service.name(), "Service");
/// ```
#[derive(Clone)]
pub struct Constructor {
    inner: Arc<ConstructorInner>,
}

impl Constructor {
    /// Create a constructor with a fresh identity.
    pub fn new<T, F>(name: &'static str, build: F) -> Self
    where
        T: Injectable,
        F: Fn(Arguments) -> Result<T> + Send + Sync + 'static,
    {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self {
            inner: Arc::new(ConstructorInner {
                id: COUNTER.fetch_add(1, Ordering::Relaxed),
                name,
                build: Box::new(move |args| build(args).map(|value| Arc::new(value) as Instance)),
            }),
        }
    }

    /// The constructor's display name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    /// This constructor as a resolution token.
    #[inline]
    pub fn token(&self) -> crate::Token {
        crate::Token::Class(self.clone())
    }

    /// Identity key for metadata tables.
    #[inline]
    pub(crate) fn id(&self) -> u64 {
        self.inner.id
    }

    /// Invoke the build closure with resolved positional values.
    #[inline]
    pub(crate) fn instantiate(&self, values: Vec<Instance>) -> Result<Instance> {
        (self.inner.build)(Arguments {
            constructor: self.inner.name,
            values,
        })
    }
}

impl PartialEq for Constructor {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Constructor {}

impl std::hash::Hash for Constructor {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("name", &self.inner.name)
            .field("id", &self.inner.id)
            .finish()
    }
}

impl fmt::Display for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}", self.inner.name)
    }
}

/// Resolved positional arguments handed to a build closure.
pub struct Arguments {
    constructor: &'static str,
    values: Vec<Instance>,
}

impl Arguments {
    /// Number of resolved arguments.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the constructor received no arguments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Typed access to the argument at `position`.
    ///
    /// Fails with [`DiError::CreationFailed`] if the position is out of
    /// range or the resolved value is not a `T`.
    pub fn get<T: Injectable>(&self, position: usize) -> Result<Arc<T>> {
        let value = self.values.get(position).ok_or_else(|| {
            DiError::creation_failed(
                self.constructor,
                format!("no resolved argument at position {position}"),
            )
        })?;

        Arc::clone(value).downcast::<T>().map_err(|_| {
            DiError::creation_failed(
                self.constructor,
                format!(
                    "argument {position} is not a {}",
                    std::any::type_name::<T>()
                ),
            )
        })
    }

    /// The type-erased argument at `position`, if present.
    #[inline]
    pub fn raw(&self, position: usize) -> Option<&Instance> {
        self.values.get(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Greeting {
        text: String,
    }

    #[test]
    fn test_instantiate_passes_positional_values() {
        let ctor = Constructor::new("Greeting", |args: Arguments| {
            let name = args.get::<String>(0)?;
            Ok(Greeting {
                text: format!("hello {name}"),
            })
        });

        let instance = ctor
            .instantiate(vec![Arc::new(String::from("world")) as Instance])
            .unwrap();
        let greeting = instance.downcast::<Greeting>().unwrap();
        assert_eq!(greeting.text, "hello world");
    }

    #[test]
    fn test_missing_argument_position() {
        let ctor = Constructor::new("Greeting", |args: Arguments| {
            let name = args.get::<String>(1)?;
            Ok(Greeting {
                text: name.to_string(),
            })
        });

        let err = ctor.instantiate(Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            DiError::CreationFailed {
                constructor: "Greeting",
                ..
            }
        ));
    }

    #[test]
    fn test_wrong_argument_type() {
        let ctor = Constructor::new("Greeting", |args: Arguments| {
            let name = args.get::<String>(0)?;
            Ok(Greeting {
                text: name.to_string(),
            })
        });

        let err = ctor
            .instantiate(vec![Arc::new(42_u32) as Instance])
            .unwrap_err();
        assert!(matches!(err, DiError::CreationFailed { .. }));
    }

    #[test]
    fn test_zero_argument_build() {
        let ctor = Constructor::new("Unit", |args: Arguments| {
            assert!(args.is_empty());
            Ok(())
        });

        assert!(ctor.instantiate(Vec::new()).is_ok());
    }
}
