//! # System Lifecycle & Orchestration
//!
//! Wiring of the three collections into one running console.
//!
//! ## Backends
//!
//! [`ConsoleSystem`] owns one [`SharedService`](console_framework::SharedService)
//! per collection. Where those services come from is decided once, at startup:
//!
//! - **Reference**: three seeded [`ResourceActor`](console_framework::ResourceActor)s
//!   in this process. Joins are wired through actor contexts ("late binding"):
//!
//!   ```text
//!   user actor      run(())
//!   post actor      run(user client)     joins user { id name email }
//!   comment actor   run(post client)     joins post { id title }
//!   ```
//!
//! - **Remote**: one [`GraphqlService`](console_framework::GraphqlService) per
//!   collection, sharing a single HTTP connection pool.
//!
//! ## Mounting
//!
//! Each list page is an [`EntityListController`](console_framework::EntityListController)
//! task, mounted with [`ConsoleSystem::mount`] and driven through the returned
//! handle. Dropping every handle unmounts the page.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all controller handles** - controllers exit when their command
//!    channel closes
//! 2. **Drop the services** - actor channels close once the last client is gone
//! 3. **Await completion** - the dependency graph is acyclic (comments hold a
//!    post client, posts hold a user client), so every actor terminates

pub mod console_system;

pub use console_system::*;
