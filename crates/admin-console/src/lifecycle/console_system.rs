use crate::config::Settings;
use crate::model::{Comment, Post, User};
use crate::{comment_actor, post_actor, user_actor};
use console_framework::{
    ConsoleEntity, ControllerHandle, CreateIdPolicy, EntityListController, GraphqlService,
    SharedService,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("{failed} task(s) failed during shutdown")]
    Shutdown { failed: usize },
}

/// The running console: one service per collection plus the tasks behind them.
///
/// # Example
///
/// ```rust
/// use admin_console::lifecycle::ConsoleSystem;
///
/// #[tokio::main]
/// async fn main() {
///     let mut system = ConsoleSystem::reference(16);
///     let posts = system.mount_posts();
///
///     let state = posts.settled().await.unwrap();
///     assert_eq!(state.items()[0].user.as_ref().unwrap().name, "Ana Lima");
///
///     drop(posts);
///     system.shutdown().await.unwrap();
/// }
/// ```
pub struct ConsoleSystem {
    pub posts: SharedService<Post>,
    pub users: SharedService<User>,
    pub comments: SharedService<Comment>,

    capacity: usize,

    /// Actor and controller tasks, awaited on shutdown.
    handles: Vec<JoinHandle<()>>,
}

impl ConsoleSystem {
    /// Starts the seeded in-process backend.
    pub fn reference(capacity: usize) -> Self {
        // 1. Create actors (no dependencies yet)
        let (user_actor, user_client) = user_actor::new(capacity);
        let (post_actor, post_client) = post_actor::new(capacity);
        let (comment_actor, comment_client) = comment_actor::new(capacity);

        // 2. Start actors with their join context injected
        let handles = vec![
            tokio::spawn(user_actor.run(())),
            tokio::spawn(post_actor.run(user_client.clone())),
            tokio::spawn(comment_actor.run(post_client.clone())),
        ];
        info!(capacity, "Reference backend started");

        Self {
            posts: Arc::new(post_client),
            users: Arc::new(user_client),
            comments: Arc::new(comment_client),
            capacity,
            handles,
        }
    }

    /// Connects every collection to the GraphQL endpoint at `endpoint`.
    pub fn remote(endpoint: &str, create_ids: CreateIdPolicy, capacity: usize) -> Self {
        let http = reqwest::Client::new();
        info!(endpoint, ?create_ids, "Using GraphQL endpoint");

        Self {
            posts: Arc::new(
                GraphqlService::<Post>::with_client(http.clone(), endpoint)
                    .with_create_ids(create_ids),
            ),
            users: Arc::new(
                GraphqlService::<User>::with_client(http.clone(), endpoint)
                    .with_create_ids(create_ids),
            ),
            comments: Arc::new(
                GraphqlService::<Comment>::with_client(http, endpoint).with_create_ids(create_ids),
            ),
            capacity,
            handles: Vec::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        match settings.endpoint.as_deref() {
            Some(endpoint) => {
                Self::remote(endpoint, settings.create_ids, settings.channel_capacity)
            }
            None => Self::reference(settings.channel_capacity),
        }
    }

    /// Mounts a list controller on `service` and returns its handle.
    pub fn mount<T: ConsoleEntity>(&mut self, service: SharedService<T>) -> ControllerHandle<T> {
        let (controller, handle) = EntityListController::new(service, self.capacity);
        self.handles.push(tokio::spawn(controller.run()));
        handle
    }

    pub fn mount_posts(&mut self) -> ControllerHandle<Post> {
        self.mount(self.posts.clone())
    }

    pub fn mount_users(&mut self) -> ControllerHandle<User> {
        self.mount(self.users.clone())
    }

    pub fn mount_comments(&mut self) -> ControllerHandle<Comment> {
        self.mount(self.comments.clone())
    }

    /// Drops the services and waits for every task to finish.
    ///
    /// All controller handles must be dropped first, or this waits for them.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down console...");
        drop(self.posts);
        drop(self.users);
        drop(self.comments);

        let mut failed = 0;
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Task failed during shutdown");
                failed += 1;
            }
        }

        if failed > 0 {
            return Err(SystemError::Shutdown { failed });
        }
        info!("Console shut down");
        Ok(())
    }
}
