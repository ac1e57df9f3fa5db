//! # Post Actor
//!
//! The reference backend for posts. Its context is the
//! [`ResourceClient<User>`](console_framework::ResourceClient) used to join
//! each post's author, so the user actor must be running first.

pub mod entity;

use crate::model::Post;
use console_framework::{ResourceActor, ResourceClient};

pub fn new(capacity: usize) -> (ResourceActor<Post>, ResourceClient<Post>) {
    ResourceActor::seeded(capacity, seed())
}

pub fn seed() -> Vec<Post> {
    vec![
        Post::new(1, 1, "Welcome", "First post on the new console."),
        Post::new(2, 2, "Release notes", "Everything that shipped this week."),
        Post::new(3, 1, "Roadmap", "What comes next."),
    ]
}
