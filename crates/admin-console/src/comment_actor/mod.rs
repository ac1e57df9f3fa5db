//! # Comment Actor
//!
//! Reference backend for comments, joined to their post through a
//! [`ResourceClient<Post>`](console_framework::ResourceClient) context.

pub mod entity;

use crate::model::Comment;
use console_framework::{ResourceActor, ResourceClient};

pub fn new(capacity: usize) -> (ResourceActor<Comment>, ResourceClient<Comment>) {
    ResourceActor::seeded(capacity, seed())
}

pub fn seed() -> Vec<Comment> {
    vec![
        Comment::new(1, 1, "Bo Stern", "bo@example.com", "Looks great."),
        Comment::new(2, 1, "Cy Okafor", "cy@example.com", "Congrats on the launch."),
        Comment::new(3, 2, "Ana Lima", "ana@example.com", "Thanks for the summary."),
    ]
}
