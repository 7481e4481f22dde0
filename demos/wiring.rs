//! Demo of the registration and resolution surface
//!
//! ```bash
//! cargo run --example wiring
//! ```

use autowire::{Arguments, Constructor, Container, Lifetime, MetadataRegistry, Provider, Symbol, Token};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

struct Config {
    env: &'static str,
}

struct Logger {
    env: Arc<Config>,
}

struct RequestId(u64);

fn main() {
    let registry = Arc::new(MetadataRegistry::new());
    let container = Container::with_metadata(registry.clone());

    // A value provider: the container hands back this exact value.
    let config = Token::from(Symbol::new("CONFIG"));
    container.register(config.clone(), Provider::value(Config { env: "demo" }));

    // A class wired by explicit annotation, registered as its own token.
    let logger = Constructor::new("Logger", |args: Arguments| {
        Ok(Logger { env: args.get(0)? })
    });
    registry.inject(&logger, 0, config);
    container.bind(&logger);

    // A transient factory: fresh value per resolution.
    static NEXT: AtomicU64 = AtomicU64::new(1);
    let request_id = Token::from("request.id");
    container.register(
        request_id.clone(),
        Provider::factory_with(
            |_| Ok(RequestId(NEXT.fetch_add(1, Ordering::Relaxed))),
            Lifetime::Transient,
        ),
    );

    let log = container.resolve_as::<Logger>(&logger.token()).unwrap();
    println!("logger wired for env {}", log.env.env);

    let first = container.resolve_as::<RequestId>(&request_id).unwrap();
    let second = container.resolve_as::<RequestId>(&request_id).unwrap();
    println!("transient request ids: {} then {}", first.0, second.0);

    // Injectable classes need no registration at all.
    let audit = Constructor::new("Audit", |_| Ok(Vec::<String>::new()));
    registry.mark_injectable(&audit);
    let trail = container.resolve_as::<Vec<String>>(&audit.token()).unwrap();
    println!("autowired audit trail with {} entries", trail.len());

    // Cycles are reported, not overflowed.
    let a = Token::from(Symbol::new("A"));
    let b = Token::from(Symbol::new("B"));
    let ctor_a = Constructor::new("A", |args: Arguments| args.get::<()>(0).map(|_| ()));
    let ctor_b = Constructor::new("B", |args: Arguments| args.get::<()>(0).map(|_| ()));
    registry.inject(&ctor_a, 0, b.clone());
    registry.inject(&ctor_b, 0, a.clone());
    container.register(a.clone(), Provider::class(ctor_a));
    container.register(b, Provider::class(ctor_b));

    match container.resolve(&a) {
        Err(err) => println!("cycle rejected: {err}"),
        Ok(_) => unreachable!(),
    }
}
