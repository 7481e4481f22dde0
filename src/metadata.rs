//! Constructor metadata: the collaborator contract for argument inference
//!
//! The container does not know how per-parameter tokens are produced; it
//! only consumes the [`Metadata`] contract. [`MetadataRegistry`] is the
//! shipped implementation: sidecar tables keyed by constructor identity,
//! filled by explicit builder calls.

use crate::{Constructor, Token};
use ahash::RandomState;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;

/// A constructor parameter's declared type, as reported by a metadata
/// source.
#[derive(Debug, Clone)]
pub enum ParamType {
    /// A declaration that can serve as a resolution token
    Token(Token),
    /// A primitive declaration that cannot identify a dependency; carries
    /// the declared type name for diagnostics
    Primitive(&'static str),
}

/// Static type information about constructors, supplied by the surrounding
/// system.
///
/// Both sequences are indexed by parameter position. The explicit sequence
/// may be sparse and may be shorter or longer than the implicit one; the
/// container merges them per position, explicit entries winning.
pub trait Metadata: Send + Sync {
    /// Whether the class may be constructed without a registered provider.
    fn is_injectable(&self, constructor: &Constructor) -> bool;

    /// Per-parameter explicit token overrides.
    fn explicit_tokens(&self, constructor: &Constructor) -> Vec<Option<Token>>;

    /// Per-parameter declared types.
    fn implicit_tokens(&self, constructor: &Constructor) -> Vec<ParamType>;
}

/// Sidecar metadata tables keyed by constructor identity.
///
/// The chainable mutators mirror declarative annotation:
/// [`mark_injectable`](MetadataRegistry::mark_injectable) flags a class for
/// registration-free autowiring, [`inject`](MetadataRegistry::inject) pins a
/// token to one parameter position, and
/// [`param_types`](MetadataRegistry::param_types) records the declared
/// parameter types.
///
/// # Examples
///
/// ```rust
/// use autowire::{Arguments, Constructor, MetadataRegistry, ParamType};
/// use std::sync::Arc;
///
/// struct Logger;
/// struct Service { logger: Arc<Logger> }
///
/// let logger = Constructor::new("Logger", |_| Ok(Logger));
/// let service = Constructor::new("Service", |args: Arguments| {
///     Ok(Service { logger: args.get(0)? })
/// });
///
/// let registry = MetadataRegistry::new();
/// registry
///     .mark_injectable(&logger)
///     .mark_injectable(&service)
///     .param_types(&service, vec![ParamType::Token(logger.token())]);
/// ```
pub struct MetadataRegistry {
    injectable: DashMap<u64, (), RandomState>,
    explicit: DashMap<u64, Vec<Option<Token>>, RandomState>,
    implicit: DashMap<u64, Vec<ParamType>, RandomState>,
}

impl MetadataRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            injectable: DashMap::with_hasher(RandomState::new()),
            explicit: DashMap::with_hasher(RandomState::new()),
            implicit: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// The shared process-global registry, consulted by
    /// [`Container::new`](crate::Container::new).
    pub fn global() -> Arc<MetadataRegistry> {
        static GLOBAL: Lazy<Arc<MetadataRegistry>> = Lazy::new(|| Arc::new(MetadataRegistry::new()));
        Arc::clone(&GLOBAL)
    }

    /// Flag a class as eligible for registration-free autowiring.
    pub fn mark_injectable(&self, constructor: &Constructor) -> &Self {
        self.injectable.insert(constructor.id(), ());
        self
    }

    /// Pin an explicit token to one parameter position.
    ///
    /// Positions not written stay unset, so the explicit sequence may be
    /// sparse.
    pub fn inject(&self, constructor: &Constructor, position: usize, token: impl Into<Token>) -> &Self {
        let mut entry = self.explicit.entry(constructor.id()).or_default();
        if entry.len() <= position {
            entry.resize(position + 1, None);
        }
        entry[position] = Some(token.into());
        self
    }

    /// Record the declared parameter types, replacing any previous
    /// declaration.
    pub fn param_types(&self, constructor: &Constructor, params: Vec<ParamType>) -> &Self {
        self.implicit.insert(constructor.id(), params);
        self
    }
}

impl Metadata for MetadataRegistry {
    fn is_injectable(&self, constructor: &Constructor) -> bool {
        self.injectable.contains_key(&constructor.id())
    }

    fn explicit_tokens(&self, constructor: &Constructor) -> Vec<Option<Token>> {
        self.explicit
            .get(&constructor.id())
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    fn implicit_tokens(&self, constructor: &Constructor) -> Vec<ParamType> {
        self.implicit
            .get(&constructor.id())
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }
}

impl Default for MetadataRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MetadataRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataRegistry")
            .field("injectable", &self.injectable.len())
            .field("annotated", &self.explicit.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Symbol;

    fn unit_ctor(name: &'static str) -> Constructor {
        Constructor::new(name, |_| Ok(()))
    }

    #[test]
    fn test_injectable_flag_defaults_off() {
        let registry = MetadataRegistry::new();
        let ctor = unit_ctor("Plain");

        assert!(!registry.is_injectable(&ctor));

        registry.mark_injectable(&ctor);
        assert!(registry.is_injectable(&ctor));
    }

    #[test]
    fn test_inject_builds_sparse_sequence() {
        let registry = MetadataRegistry::new();
        let ctor = unit_ctor("Sparse");
        let token = Token::from(Symbol::new("CONFIG"));

        registry.inject(&ctor, 2, token.clone());

        let explicit = registry.explicit_tokens(&ctor);
        assert_eq!(explicit.len(), 3);
        assert_eq!(explicit[0], None);
        assert_eq!(explicit[1], None);
        assert_eq!(explicit[2], Some(token));
    }

    #[test]
    fn test_metadata_is_per_constructor_identity() {
        let registry = MetadataRegistry::new();
        let a = unit_ctor("Twin");
        let b = unit_ctor("Twin");

        registry.mark_injectable(&a);
        registry.param_types(&a, vec![ParamType::Primitive("usize")]);

        assert!(!registry.is_injectable(&b));
        assert!(registry.implicit_tokens(&b).is_empty());
        assert_eq!(registry.implicit_tokens(&a).len(), 1);
    }

    #[test]
    fn test_global_registry_is_shared() {
        let a = MetadataRegistry::global();
        let b = MetadataRegistry::global();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
