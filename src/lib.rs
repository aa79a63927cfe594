//! # cobalt-di
//!
//! A thread-safe dependency injection container with three service
//! lifetimes, race-free lazy construction, and deterministic teardown.
//!
//! ## Features
//!
//! - **Three lifetimes**: Singleton, Scoped, and Transient services
//! - **Trait support**: Single and multi-binding trait resolution
//! - **Thread-safe**: concurrent first-time lookups run each factory exactly once
//! - **Scoped isolation**: per-scope instances with independent teardown
//! - **Ordered teardown**: instances released in reverse completion order
//!
//! ## Quick Start
//!
//! ```rust
//! use cobalt_di::{ServiceCollection, Resolver};
//! use std::sync::Arc;
//!
//! struct Database {
//!     connection_string: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! let mut services = ServiceCollection::new();
//!
//! services.add_singleton(Database {
//!     connection_string: "postgres://localhost".to_string(),
//! });
//! services.add_transient_factory::<UserService, _>(|resolver| UserService {
//!     db: resolver.get_required::<Database>().unwrap(),
//! });
//!
//! let provider = services.build();
//! let user_service = provider.get_required::<UserService>().unwrap();
//! assert_eq!(user_service.db.connection_string, "postgres://localhost");
//! ```
//!
//! ## Lifetimes
//!
//! - **Singleton**: one instance per provider, built on first request and
//!   shared by every consumer, including all scopes.
//! - **Scoped**: one instance per [`Scope`]; different scopes get different
//!   instances. Requested directly on the root provider, the instance is
//!   cached in the provider's own table instead.
//! - **Transient**: a fresh instance on every request, never cached.
//!
//! ```rust
//! use cobalt_di::{ServiceCollection, Resolver};
//! use std::sync::Arc;
//!
//! struct RequestContext(u64);
//!
//! let mut services = ServiceCollection::new();
//! services.add_scoped_factory::<RequestContext, _>(|_| RequestContext(42));
//!
//! let provider = services.build();
//! let scope_a = provider.create_scope();
//! let scope_b = provider.create_scope();
//!
//! let a1 = scope_a.get_required::<RequestContext>().unwrap();
//! let a2 = scope_a.get_required::<RequestContext>().unwrap();
//! let b = scope_b.get_required::<RequestContext>().unwrap();
//!
//! assert!(Arc::ptr_eq(&a1, &a2));
//! assert!(!Arc::ptr_eq(&a1, &b));
//! ```
//!
//! ## Trait Resolution
//!
//! Traits are registered under their own keys and resolved as `Arc<dyn T>`:
//!
//! ```rust
//! use cobalt_di::{ServiceCollection, Resolver};
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, message: &str) -> String;
//! }
//!
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {
//!     fn log(&self, message: &str) -> String {
//!         format!("console: {message}")
//!     }
//! }
//!
//! let mut services = ServiceCollection::new();
//! services.add_singleton_trait::<dyn Logger>(Arc::new(ConsoleLogger));
//!
//! let provider = services.build();
//! let logger = provider.get_required_trait::<dyn Logger>().unwrap();
//! assert_eq!(logger.log("up"), "console: up");
//! ```
//!
//! ## Concurrency
//!
//! Providers and scopes are `Send + Sync`. When several threads race to
//! resolve the same cached registration, exactly one factory invocation
//! runs; the losers block until it finishes and then observe the same
//! instance. Factories execute with no container lock held, so they can
//! resolve further dependencies freely.
//!
//! ## Teardown
//!
//! Each provider and each scope logs the order in which its cached
//! instances finished construction. On drop, instances are released in
//! exact reverse completion order, so a service is always torn down before
//! the dependencies it was built from.

pub mod collection;
pub mod error;
mod internal;
pub mod key;
pub mod lifetime;
pub mod provider;
pub mod registration;
pub mod traits;

pub use collection::{BindingResolver, BoundFactory, ServiceCollection};
pub use error::{DiError, DiResult};
pub use key::{key_of_trait, key_of_type, Key};
pub use lifetime::Lifetime;
pub use provider::{ResolverContext, Scope, ServiceProvider};
pub use registration::{OpaqueInstance, Registry, ServiceDescriptor};
pub use traits::{Resolver, ResolverCore};
