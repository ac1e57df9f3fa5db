//! # Admin Console
//!
//! The post, user and comment collections of the admin console, wired onto
//! [`console_framework`].
//!
//! - [`model`]: wire records and text form input
//! - [`user_actor`], [`post_actor`], [`comment_actor`]: entity schemas, GraphQL
//!   names and the seeded reference backends
//! - [`lifecycle`]: [`ConsoleSystem`](lifecycle::ConsoleSystem), which picks a
//!   backend and mounts list controllers
//! - [`config`], [`cli`], [`shell`]: the `admin-console` binary

pub mod cli;
pub mod comment_actor;
pub mod config;
pub mod lifecycle;
pub mod model;
pub mod post_actor;
pub mod shell;
pub mod user_actor;
