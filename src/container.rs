//! Token registry and resolution engine
//!
//! The `Container` owns the provider bindings, the singleton cache, and the
//! active resolution stack, and constructs object graphs by recursively
//! resolving constructor dependencies.

use crate::metadata::{Metadata, MetadataRegistry, ParamType};
use crate::{Constructor, DiError, Injectable, Instance, Lifetime, Provider, Result, Token};
use ahash::RandomState;
use dashmap::DashMap;
use std::sync::{Arc, Mutex, PoisonError};

#[cfg(feature = "logging")]
use tracing::{debug, trace};

/// Dependency injection container: token registry plus resolver.
///
/// Callers register how to produce each dependency once, then request
/// fully-assembled values by token. Cloning a `Container` yields a second
/// handle to the same registry.
///
/// Resolution is synchronous and recursive; a single container must not be
/// resolved from two threads at once (serialize externally if needed).
///
/// # Examples
///
/// ```rust
/// use autowire::{Container, Provider, Symbol, Token};
///
/// let container = Container::new();
/// let config = Token::from(Symbol::new("CONFIG"));
///
/// container.register(config.clone(), Provider::value(String::from("production")));
///
/// let value = container.resolve_as::<String>(&config).unwrap();
/// assert_eq!(*value, "production");
/// ```
#[derive(Clone)]
pub struct Container {
    /// Token -> provider bindings; last registration wins
    providers: Arc<DashMap<Token, Provider, RandomState>>,
    /// Lazily populated singleton cache
    singletons: Arc<DashMap<Token, Instance, RandomState>>,
    /// Tokens currently being resolved on the active call chain
    resolving: Arc<Mutex<Vec<Token>>>,
    /// Collaborator answering injectable/explicit/implicit queries
    metadata: Arc<dyn Metadata>,
}

impl Container {
    /// Create a container backed by the process-global
    /// [`MetadataRegistry`].
    #[inline]
    pub fn new() -> Self {
        Self::with_metadata(MetadataRegistry::global())
    }

    /// Create a container with a custom metadata source.
    pub fn with_metadata(metadata: Arc<dyn Metadata>) -> Self {
        #[cfg(feature = "logging")]
        debug!(target: "autowire", "Creating new DI container");

        Self {
            providers: Arc::new(DashMap::with_hasher(RandomState::new())),
            singletons: Arc::new(DashMap::with_hasher(RandomState::new())),
            resolving: Arc::new(Mutex::new(Vec::new())),
            metadata,
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Store or overwrite the binding for `token`.
    ///
    /// Never touches the singleton cache: a value already produced under a
    /// previous binding stays cached.
    ///
    /// Chainable:
    ///
    /// ```rust
    /// use autowire::{Container, Provider, Token};
    ///
    /// let container = Container::new();
    /// container
    ///     .register(Token::from("host"), Provider::value(String::from("localhost")))
    ///     .register(Token::from("port"), Provider::value(5432_u16));
    /// ```
    pub fn register(&self, token: impl Into<Token>, provider: Provider) -> &Self {
        let token = token.into();

        #[cfg(feature = "logging")]
        debug!(
            target: "autowire",
            token = %token,
            provider = provider.kind(),
            "Registering provider"
        );

        self.providers.insert(token, provider);
        self
    }

    /// Register a class as its own token, with Singleton lifetime.
    ///
    /// Sugar for `register(Token::Class(constructor), Provider::class(constructor))`.
    #[inline]
    pub fn bind(&self, constructor: &Constructor) -> &Self {
        self.bind_with(constructor, Lifetime::Singleton)
    }

    /// Register a class as its own token, with an explicit lifetime.
    #[inline]
    pub fn bind_with(&self, constructor: &Constructor, lifetime: Lifetime) -> &Self {
        self.register(
            Token::Class(constructor.clone()),
            Provider::class_with(constructor.clone(), lifetime),
        )
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolve a token to its value.
    ///
    /// Decision order: singleton cache, cycle check, provider table, then
    /// the autowire fallback for injectable class tokens. Fails per
    /// [`DiError`]; the resolution stack is restored on every exit path.
    pub fn resolve(&self, token: &Token) -> Result<Instance> {
        // A token that finished resolving once is never reconsidered,
        // not even by the cycle check.
        if let Some(cached) = self.singletons.get(token) {
            #[cfg(feature = "logging")]
            trace!(target: "autowire", token = %token, "Singleton cache hit");
            return Ok(Arc::clone(cached.value()));
        }

        let _frame = self.enter(token)?;

        // Clone the binding out so no map guard is held across recursion.
        let provider = self.providers.get(token).map(|entry| entry.value().clone());

        match provider {
            Some(provider) => self.produce(token, &provider),
            None => match token {
                // Fallback: an unregistered class flagged injectable is
                // constructed directly and always cached as a singleton.
                Token::Class(constructor) if self.metadata.is_injectable(constructor) => {
                    #[cfg(feature = "logging")]
                    debug!(
                        target: "autowire",
                        token = %token,
                        "No provider registered, autowiring injectable class"
                    );

                    let instance = self.construct(constructor)?;
                    self.singletons.insert(token.clone(), Arc::clone(&instance));
                    Ok(instance)
                }
                _ => {
                    #[cfg(feature = "logging")]
                    debug!(target: "autowire", token = %token, "No provider found");
                    Err(DiError::provider_not_found(token))
                }
            },
        }
    }

    /// Typed resolution: [`resolve`](Container::resolve) plus a checked
    /// downcast to `T`.
    pub fn resolve_as<T: Injectable>(&self, token: &Token) -> Result<Arc<T>> {
        self.resolve(token)?
            .downcast::<T>()
            .map_err(|_| DiError::type_mismatch::<T>(token))
    }

    /// Cycle check plus stack push. The returned frame pops the token when
    /// dropped, so the stack is restored on normal return and on error
    /// propagation alike.
    fn enter(&self, token: &Token) -> Result<ResolveFrame<'_>> {
        let mut stack = lock_stack(&self.resolving);

        if stack.contains(token) {
            let mut path = stack.clone();
            path.push(token.clone());

            #[cfg(feature = "logging")]
            debug!(
                target: "autowire",
                token = %token,
                depth = stack.len(),
                "Circular dependency detected"
            );

            return Err(DiError::circular(path));
        }

        stack.push(token.clone());
        Ok(ResolveFrame {
            stack: &self.resolving,
        })
    }

    /// Produce a value from a found provider, honoring its lifetime.
    fn produce(&self, token: &Token, provider: &Provider) -> Result<Instance> {
        match provider {
            // The provider itself is the stable source; the singleton
            // cache is never involved.
            Provider::Value(value) => {
                #[cfg(feature = "logging")]
                trace!(target: "autowire", token = %token, "Returning registered value");
                Ok(value.get())
            }
            Provider::Factory(factory) => {
                if factory.lifetime == Lifetime::Singleton {
                    if let Some(cached) = self.singletons.get(token) {
                        return Ok(Arc::clone(cached.value()));
                    }

                    #[cfg(feature = "logging")]
                    trace!(target: "autowire", token = %token, "Invoking singleton factory");

                    let instance = factory.call(self)?;
                    self.singletons.insert(token.clone(), Arc::clone(&instance));
                    return Ok(instance);
                }

                #[cfg(feature = "logging")]
                trace!(target: "autowire", token = %token, "Invoking transient factory");

                factory.call(self)
            }
            Provider::Class(class) => {
                if class.lifetime == Lifetime::Singleton {
                    if let Some(cached) = self.singletons.get(token) {
                        return Ok(Arc::clone(cached.value()));
                    }

                    let instance = self.construct(&class.constructor)?;
                    self.singletons.insert(token.clone(), Arc::clone(&instance));
                    return Ok(instance);
                }

                self.construct(&class.constructor)
            }
        }
    }

    /// Build a class instance by inferring a token per constructor
    /// parameter.
    ///
    /// The argument count is the longer of the explicit and implicit
    /// sequences, so a trailing parameter with only a declared type is
    /// still included. An explicit token wins at its position; otherwise
    /// the declared type is used when it is a usable token.
    fn construct(&self, constructor: &Constructor) -> Result<Instance> {
        let explicit = self.metadata.explicit_tokens(constructor);
        let implicit = self.metadata.implicit_tokens(constructor);

        let count = explicit.len().max(implicit.len());
        let mut values = Vec::with_capacity(count);

        for position in 0..count {
            let token = match explicit.get(position) {
                Some(Some(token)) => token.clone(),
                _ => match implicit.get(position) {
                    Some(ParamType::Token(token)) => token.clone(),
                    _ => return Err(DiError::token_inference(constructor, position)),
                },
            };

            values.push(self.resolve(&token)?);
        }

        #[cfg(feature = "logging")]
        trace!(
            target: "autowire",
            constructor = constructor.name(),
            arguments = count,
            "Instantiating class"
        );

        constructor.instantiate(values)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Check whether a provider is registered for `token`.
    #[inline]
    pub fn contains(&self, token: &Token) -> bool {
        self.providers.contains_key(token)
    }

    /// Number of registered providers.
    #[inline]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no providers are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// All registered tokens, in no particular order.
    pub fn registered_tokens(&self) -> Vec<Token> {
        self.providers.iter().map(|entry| entry.key().clone()).collect()
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("providers", &self.providers.len())
            .field("singletons", &self.singletons.len())
            .finish()
    }
}

/// Recovers the stack guard even if a previous holder panicked; the stack
/// itself is only mutated by push/pop, so its contents stay coherent.
fn lock_stack(stack: &Mutex<Vec<Token>>) -> std::sync::MutexGuard<'_, Vec<Token>> {
    stack.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drop guard for one in-progress resolution: pops the token on every exit
/// path, normal or unwinding.
struct ResolveFrame<'a> {
    stack: &'a Mutex<Vec<Token>>,
}

impl Drop for ResolveFrame<'_> {
    fn drop(&mut self) {
        lock_stack(self.stack).pop();
    }
}
