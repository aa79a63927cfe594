//! Scope isolation and lifetime routing.

use cobalt_di::{Resolver, ServiceCollection};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Connection {
    id: usize,
}

struct Handler {
    conn: Arc<Connection>,
}

struct AppState {
    started: bool,
}

fn counting_scoped_collection() -> (ServiceCollection, Arc<AtomicUsize>) {
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_in_factory = counter.clone();

    let mut services = ServiceCollection::new();
    services.add_scoped_factory::<Connection, _>(move |_| Connection {
        id: counter_in_factory.fetch_add(1, Ordering::SeqCst),
    });
    (services, counter)
}

#[test]
fn scoped_service_is_cached_within_a_scope() {
    let (services, counter) = counting_scoped_collection();
    let provider = services.build();
    let scope = provider.create_scope();

    let first = scope.get_required::<Connection>().unwrap();
    let second = scope.get_required::<Connection>().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn different_scopes_get_different_instances() {
    let (services, counter) = counting_scoped_collection();
    let provider = services.build();

    let scope_a = provider.create_scope();
    let scope_b = provider.create_scope();

    let a = scope_a.get_required::<Connection>().unwrap();
    let b = scope_b.get_required::<Connection>().unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert_ne!(a.id, b.id);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn singleton_is_shared_across_scopes() {
    let mut services = ServiceCollection::new();
    services.add_singleton(AppState { started: true });

    let provider = services.build();
    let scope_a = provider.create_scope();
    let scope_b = provider.create_scope();

    let root = provider.get_required::<AppState>().unwrap();
    let a = scope_a.get_required::<AppState>().unwrap();
    let b = scope_b.get_required::<AppState>().unwrap();

    assert!(root.started);
    assert!(Arc::ptr_eq(&root, &a));
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn scoped_on_root_provider_caches_like_singleton() {
    let (services, counter) = counting_scoped_collection();
    let provider = services.build();

    // No scope involved: the root provider's table does the caching.
    let first = provider.get_required::<Connection>().unwrap();
    let second = provider.get_required::<Connection>().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    // A scope still gets its own instance independent of the root's.
    let scope = provider.create_scope();
    let scoped = scope.get_required::<Connection>().unwrap();
    assert!(!Arc::ptr_eq(&first, &scoped));
}

#[test]
fn transient_built_in_scope_binds_scoped_dependencies_there() {
    let (mut services, _counter) = counting_scoped_collection();
    services.add_transient_factory::<Handler, _>(|resolver| Handler {
        conn: resolver.get_required::<Connection>().unwrap(),
    });

    let provider = services.build();
    let scope = provider.create_scope();

    let handler_a = scope.get_required::<Handler>().unwrap();
    let handler_b = scope.get_required::<Handler>().unwrap();
    let direct = scope.get_required::<Connection>().unwrap();

    // Fresh handlers every time, all wired to the scope's one connection.
    assert!(!Arc::ptr_eq(&handler_a, &handler_b));
    assert!(Arc::ptr_eq(&handler_a.conn, &handler_b.conn));
    assert!(Arc::ptr_eq(&handler_a.conn, &direct));
}

#[test]
fn singleton_built_inside_scope_captures_that_scopes_dependencies() {
    struct Holder {
        conn: Arc<Connection>,
    }

    let (mut services, counter) = counting_scoped_collection();
    services.add_singleton_factory::<Holder, _>(|resolver| Holder {
        conn: resolver.get_required::<Connection>().unwrap(),
    });

    let provider = services.build();
    let scope_one = provider.create_scope();
    let scope_two = provider.create_scope();

    let one_conn = scope_one.get_required::<Connection>().unwrap();
    let holder = scope_one.get_required::<Holder>().unwrap();

    // The singleton's factory ran with scope one as resolution context, so
    // its scoped dependency is scope one's connection.
    assert!(Arc::ptr_eq(&holder.conn, &one_conn));

    // Scope two reads the already-published singleton, first scope's
    // dependency and all; its factory does not run again.
    let holder_again = scope_two.get_required::<Holder>().unwrap();
    assert!(Arc::ptr_eq(&holder, &holder_again));
    assert!(Arc::ptr_eq(&holder_again.conn, &one_conn));

    // Scope two's own scoped lookup is still its own instance.
    let two_conn = scope_two.get_required::<Connection>().unwrap();
    assert!(!Arc::ptr_eq(&two_conn, &one_conn));
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn transient_with_scoped_dependency_differs_across_scopes() {
    struct Worker {
        conn: Arc<Connection>,
        state: Arc<AppState>,
    }

    let (mut services, _counter) = counting_scoped_collection();
    services.add_singleton(AppState { started: true });
    services.add_transient_factory::<Worker, _>(|resolver| Worker {
        conn: resolver.get_required::<Connection>().unwrap(),
        state: resolver.get_required::<AppState>().unwrap(),
    });

    let provider = services.build();
    let scope_one = provider.create_scope();
    let scope_two = provider.create_scope();

    let worker_one = scope_one.get_required::<Worker>().unwrap();
    let worker_two = scope_two.get_required::<Worker>().unwrap();

    // Each scope's worker carries that scope's connection.
    assert!(!Arc::ptr_eq(&worker_one.conn, &worker_two.conn));
    assert!(Arc::ptr_eq(
        &worker_one.conn,
        &scope_one.get_required::<Connection>().unwrap()
    ));
    assert!(Arc::ptr_eq(
        &worker_two.conn,
        &scope_two.get_required::<Connection>().unwrap()
    ));

    // Both ultimately depend on the one shared singleton.
    assert!(Arc::ptr_eq(&worker_one.state, &worker_two.state));
}

#[test]
fn singleton_requested_from_scope_lands_in_root_table() {
    struct Shared;

    let mut services = ServiceCollection::new();
    services.add_singleton_factory::<Shared, _>(|_| Shared);

    let provider = services.build();
    let from_scope = {
        let scope = provider.create_scope();
        scope.get_required::<Shared>().unwrap()
    };
    // The scope is gone; the instance survives at the root.
    let from_root = provider.get_required::<Shared>().unwrap();
    assert!(Arc::ptr_eq(&from_scope, &from_root));
}

#[test]
fn scope_keeps_its_provider_reachable() {
    let (services, _counter) = counting_scoped_collection();
    let provider = services.build();
    let scope = provider.create_scope();
    drop(provider);

    // The scope's handle keeps the registry and root table alive.
    let conn = scope.get_required::<Connection>().unwrap();
    assert_eq!(conn.id, 0);
    assert!(scope.provider().registry().len() == 1);
}
