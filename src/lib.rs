//! # Autowire - Token-Based Dependency Injection for Rust
//!
//! A small, synchronous dependency-injection container: register how to
//! produce each dependency once, then request fully-assembled object graphs
//! by token.
//!
//! ## Features
//!
//! - 🎫 **Token-based** - resolve by symbol, string name, or class identity
//! - 🏭 **Three provider shapes** - precomputed values, factory closures,
//!   and class constructors with dependency inference
//! - ♻️ **Lifetimes** - singleton caching by default, transient on request
//! - 🔗 **Autowiring** - classes flagged injectable resolve without any
//!   registration
//! - 🌀 **Cycle detection** - circular graphs fail with the full traversal
//!   path instead of overflowing the stack
//! - 📊 **Observable** - optional tracing integration with JSON or pretty
//!   output
//!
//! ## Quick Start
//!
//! ```rust
//! use autowire::{Arguments, Constructor, Container, MetadataRegistry, ParamType};
//! use std::sync::Arc;
//!
//! struct Logger;
//! struct Service { logger: Arc<Logger> }
//!
//! // Describe each constructor once.
//! let logger = Constructor::new("Logger", |_| Ok(Logger));
//! let service = Constructor::new("Service", |args: Arguments| {
//!     Ok(Service { logger: args.get(0)? })
//! });
//!
//! // Declare constructor metadata (the decorator equivalent).
//! let registry = MetadataRegistry::global();
//! registry
//!     .mark_injectable(&logger)
//!     .mark_injectable(&service)
//!     .param_types(&service, vec![ParamType::Token(logger.token())]);
//!
//! // Resolve - no registration needed for injectable classes.
//! let container = Container::new();
//! let service = container.resolve_as::<Service>(&service.token()).unwrap();
//! let again = container.resolve_as::<Logger>(&logger.token()).unwrap();
//! assert!(Arc::ptr_eq(&service.logger, &again));
//! ```
//!
//! ## Providers and Lifetimes
//!
//! ```rust
//! use autowire::{Container, Lifetime, Provider, Symbol, Token};
//!
//! let container = Container::new();
//!
//! // Value provider - returns the stored value as-is
//! let config = Token::from(Symbol::new("CONFIG"));
//! container.register(config.clone(), Provider::value(String::from("prod")));
//!
//! // Factory provider - singleton by default, invoked at most once
//! let pool = Token::from(Symbol::new("POOL"));
//! container.register(pool.clone(), Provider::factory(|_| Ok(vec![0_u8; 16])));
//!
//! // Transient factory - fresh value on every resolution
//! let request_id = Token::from(Symbol::new("REQUEST_ID"));
//! container.register(
//!     request_id.clone(),
//!     Provider::factory_with(|_| Ok(7_u64), Lifetime::Transient),
//! );
//!
//! assert_eq!(*container.resolve_as::<String>(&config).unwrap(), "prod");
//! ```
//!
//! ## Scope
//!
//! Resolution is direct, synchronous, and single-container: no child
//! scopes, no interceptors, no async providers. Concurrent resolution of
//! one container must be serialized by the caller.

mod constructor;
mod container;
mod error;
#[cfg(feature = "logging")]
pub mod logging;
mod metadata;
mod provider;
mod token;

pub use constructor::*;
pub use container::*;
pub use error::*;
pub use metadata::*;
pub use provider::*;
pub use token::*;

// Re-export tracing macros for convenience when logging feature is enabled
#[cfg(feature = "logging")]
pub use tracing::{debug, error, info, trace, warn};

// Re-export for convenience
pub use std::sync::Arc;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Arguments, Constructor, Container, DiError, Injectable, Instance, Lifetime, Metadata,
        MetadataRegistry, ParamType, Provider, Result, Symbol, Token,
    };
    pub use std::sync::Arc;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Logger;

    struct Service {
        logger: Arc<Logger>,
    }

    #[test]
    fn test_injectable_class_resolves_without_registration() {
        struct Config {
            value: u32,
        }

        let ctor = Constructor::new("Config", |_| Ok(Config { value: 123 }));
        MetadataRegistry::global().mark_injectable(&ctor);

        let container = Container::new();
        let config = container.resolve_as::<Config>(&ctor.token()).unwrap();
        assert_eq!(config.value, 123);
    }

    #[test]
    fn test_singleton_binding_returns_same_instance() {
        let ctor = Constructor::new("Logger", |_| Ok(Logger));

        let container = Container::new();
        container.bind(&ctor);

        let a = container.resolve_as::<Logger>(&ctor.token()).unwrap();
        let b = container.resolve_as::<Logger>(&ctor.token()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_transient_binding_returns_distinct_instances() {
        let ctor = Constructor::new("Logger", |_| Ok(Logger));

        let container = Container::new();
        container.bind_with(&ctor, Lifetime::Transient);

        let a = container.resolve_as::<Logger>(&ctor.token()).unwrap();
        let b = container.resolve_as::<Logger>(&ctor.token()).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_injects_dependency_by_declared_type() {
        let logger = Constructor::new("Logger", |_| Ok(Logger));
        let service = Constructor::new("Service", |args: Arguments| {
            Ok(Service {
                logger: args.get(0)?,
            })
        });

        let registry = MetadataRegistry::global();
        registry
            .mark_injectable(&logger)
            .mark_injectable(&service)
            .param_types(&service, vec![ParamType::Token(logger.token())]);

        let container = Container::new();
        let resolved = container.resolve_as::<Service>(&service.token()).unwrap();
        let logger = container.resolve_as::<Logger>(&logger.token()).unwrap();
        assert!(Arc::ptr_eq(&resolved.logger, &logger));
    }

    #[test]
    fn test_injects_value_by_explicit_token() {
        struct Env {
            name: &'static str,
        }

        struct App {
            env: Arc<Env>,
        }

        let config = Token::from(Symbol::new("CONFIG"));
        let app = Constructor::new("App", |args: Arguments| {
            Ok(App { env: args.get(0)? })
        });

        let registry = MetadataRegistry::global();
        registry.mark_injectable(&app).inject(&app, 0, config.clone());

        let container = Container::new();
        container.register(config, Provider::value(Env { name: "test" }));

        let resolved = container.resolve_as::<App>(&app.token()).unwrap();
        assert_eq!(resolved.env.name, "test");
    }

    #[test]
    fn test_factory_provider_singleton_by_default() {
        static CALLS: AtomicU32 = AtomicU32::new(0);

        let now = Token::from(Symbol::new("NOW"));
        let container = Container::new();
        container.register(
            now.clone(),
            Provider::factory(|_| Ok(CALLS.fetch_add(1, Ordering::SeqCst))),
        );

        let a = container.resolve_as::<u32>(&now).unwrap();
        let b = container.resolve_as::<u32>(&now).unwrap();
        assert_eq!(*a, *b);
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_factory_transient_produces_fresh_values() {
        static CALLS: AtomicU32 = AtomicU32::new(0);

        let now = Token::from(Symbol::new("NOW"));
        let container = Container::new();
        container.register(
            now.clone(),
            Provider::factory_with(
                |_| Ok(CALLS.fetch_add(1, Ordering::SeqCst)),
                Lifetime::Transient,
            ),
        );

        let a = container.resolve_as::<u32>(&now).unwrap();
        let b = container.resolve_as::<u32>(&now).unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn test_circular_registration_fails_with_cycle_error() {
        let a = Token::from(Symbol::new("A"));
        let b = Token::from(Symbol::new("B"));

        let ctor_a = Constructor::new("A", |args: Arguments| args.get::<()>(0).map(|_| ()));
        let ctor_b = Constructor::new("B", |args: Arguments| args.get::<()>(0).map(|_| ()));

        let registry = MetadataRegistry::global();
        registry.inject(&ctor_a, 0, b.clone());
        registry.inject(&ctor_b, 0, a.clone());

        let container = Container::new();
        container.register(a.clone(), Provider::class(ctor_a));
        container.register(b, Provider::class(ctor_b));

        let err = container.resolve(&a).unwrap_err();
        assert!(err.to_string().contains("Circular dependency"));
    }

    #[test]
    fn test_chained_registration() {
        let container = Container::new();
        container
            .register(Token::from("one"), Provider::value(1_u8))
            .register(Token::from("two"), Provider::value(2_u8));

        assert_eq!(container.len(), 2);
    }
}
