//! # User Actor
//!
//! The reference backend for the user collection. Users have no relations, so
//! the actor runs with an empty context:
//!
//! ```rust
//! use admin_console::user_actor;
//! use console_framework::CollectionService;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = user_actor::new(8);
//!     tokio::spawn(actor.run(()));
//!
//!     let users = client.get_all().await.unwrap();
//!     assert_eq!(users[0].username, "ana");
//! }
//! ```

pub mod entity;

use crate::model::User;
use console_framework::{ResourceActor, ResourceClient};

/// Creates a user actor seeded with [`seed`] and its client.
pub fn new(capacity: usize) -> (ResourceActor<User>, ResourceClient<User>) {
    ResourceActor::seeded(capacity, seed())
}

pub fn seed() -> Vec<User> {
    vec![
        User::new(1, "Ana Lima", "ana", "ana@example.com")
            .with_contact("555-0101", "ana.example.com"),
        User::new(2, "Bo Stern", "bo", "bo@example.com")
            .with_contact("555-0102", "bo.example.com"),
        User::new(3, "Cy Okafor", "cy", "cy@example.com")
            .with_contact("555-0103", "cy.example.com"),
    ]
}
