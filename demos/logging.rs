//! Demo of container activity logging
//!
//! Run with JSON logging (production):
//! ```bash
//! cargo run --example logging --features logging-json
//! ```
//!
//! Run with pretty logging (development):
//! ```bash
//! cargo run --example logging --features logging-pretty
//! ```

use autowire::{Arguments, Constructor, Container, MetadataRegistry, ParamType, Provider, Symbol, Token};
use std::sync::Arc;

#[allow(dead_code)]
struct Database {
    url: Arc<String>,
}

#[allow(dead_code)]
struct UserService {
    db: Arc<Database>,
}

fn main() {
    // Uses JSON if logging-json is enabled, pretty otherwise
    #[cfg(feature = "logging")]
    autowire::logging::init();

    println!("=== Autowire Logging Demo ===\n");

    let url = Token::from(Symbol::new("DATABASE_URL"));

    let database = Constructor::new("Database", |args: Arguments| {
        Ok(Database { url: args.get(0)? })
    });
    let users = Constructor::new("UserService", |args: Arguments| {
        Ok(UserService { db: args.get(0)? })
    });

    let registry = MetadataRegistry::global();
    registry
        .inject(&database, 0, url.clone())
        .param_types(&users, vec![ParamType::Token(database.token())]);

    // Registration logs at debug
    let container = Container::new();
    container
        .register(url, Provider::value(String::from("postgres://localhost/app")))
        .bind(&database)
        .bind(&users);

    // First resolution logs the whole construction chain at trace;
    // the second is a singleton cache hit
    let service = container.resolve_as::<UserService>(&users.token()).unwrap();
    let _again = container.resolve_as::<UserService>(&users.token()).unwrap();

    println!("resolved UserService against {}", service.db.url);

    // A missing token logs before the error returns
    let missing = Token::from("not-registered");
    if let Err(err) = container.resolve(&missing) {
        println!("expected failure: {err}");
    }
}
