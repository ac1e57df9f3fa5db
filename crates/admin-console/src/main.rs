//! # Admin Console
//!
//! Entry point of the `admin-console` binary.
//!
//! Settings are resolved once (defaults, `console.toml`, `CONSOLE_*` variables,
//! flags), tracing is installed, and the selected subcommand runs against a
//! freshly mounted list controller.
//!
//! ```bash
//! admin-console list posts
//! admin-console create users --set name=Dee --set username=dee --set email=dee@example.com \
//!     --set phone=555-0104 --set website=dee.dev
//! admin-console --endpoint http://localhost:4000/graphql delete comments 2 --yes
//! RUST_LOG=debug admin-console demo
//! ```

use admin_console::cli::{Cli, Collection, Command};
use admin_console::config::Settings;
use admin_console::lifecycle::ConsoleSystem;
use admin_console::model::FormFields;
use admin_console::shell::{self, Row};
use anyhow::Context;
use clap::Parser;
use console_framework::tracing::setup_tracing;
use console_framework::{CollectionService, ControllerHandle, SharedService};
use std::io::{self, BufRead, Write};
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    cli.apply_to(&mut settings);

    setup_tracing(settings.log_filter.as_deref());

    let result = match cli.command.collection() {
        None => {
            let mut system = ConsoleSystem::reference(settings.channel_capacity);
            let result = demo(&mut system).await;
            finish(system, result).await
        }
        Some(collection) => {
            let mut system = ConsoleSystem::from_settings(&settings);
            let result = match collection {
                Collection::Posts => {
                    let handle = system.mount_posts();
                    run(handle, system.posts.clone(), cli.command).await
                }
                Collection::Users => {
                    let handle = system.mount_users();
                    run(handle, system.users.clone(), cli.command).await
                }
                Collection::Comments => {
                    let handle = system.mount_comments();
                    run(handle, system.comments.clone(), cli.command).await
                }
            };
            finish(system, result).await
        }
    };
    if let Err(e) = &result {
        error!(error = %e, "Command failed");
    }
    result
}

async fn finish(system: ConsoleSystem, result: anyhow::Result<()>) -> anyhow::Result<()> {
    if let Err(e) = system.shutdown().await {
        error!(error = %e, "Shutdown incomplete");
    }
    result
}

/// Runs one collection subcommand. The handle is consumed so the page is
/// unmounted when this returns.
async fn run<T>(
    handle: ControllerHandle<T>,
    service: SharedService<T>,
    command: Command,
) -> anyhow::Result<()>
where
    T: Row,
    T::Create: FormFields,
    T::Patch: FormFields,
{
    let span = tracing::info_span!("page", entity_type = T::NAME);
    execute(&handle, service.as_ref(), command)
        .instrument(span)
        .await
}

async fn execute<T>(
    handle: &ControllerHandle<T>,
    service: &dyn CollectionService<T>,
    command: Command,
) -> anyhow::Result<()>
where
    T: Row,
    T::Create: FormFields,
    T::Patch: FormFields,
{
    match command {
        Command::List { .. } => {
            let items = shell::list(handle).await?;
            print!("{}", shell::render_list(&items));
        }
        Command::Show { id, .. } => {
            let item = shell::show(service, &id).await?;
            print!("{}", shell::render_detail(&item));
        }
        Command::Create { fields, .. } => {
            let created = shell::create(handle, &fields).await?;
            println!("Created:");
            print!("{}", shell::render_detail(&created));
        }
        Command::Update { id, fields, .. } => {
            let updated = shell::update(handle, &id, &fields).await?;
            println!("Updated:");
            print!("{}", shell::render_detail(&updated));
        }
        Command::Delete { id, yes, .. } => {
            shell::delete(handle, &id, |prompt| yes || confirm(prompt)).await?;
            println!("Deleted {} {id}.", T::NAME.to_lowercase());
        }
        // Not a collection command; main runs it.
        Command::Demo => {}
    }
    Ok(())
}

/// Asks on the terminal; anything but `y`/`yes` declines.
fn confirm(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Create, edit and delete a post, then look at a comment's joined post.
async fn demo(system: &mut ConsoleSystem) -> anyhow::Result<()> {
    info!("Starting scripted console session");

    let posts = system.mount_posts();
    print_page("Posts", &posts).await?;

    let fields = ["userId=2", "title=Hello from the demo", "body=Created by the shell"]
        .map(String::from);
    let created = shell::create(&posts, &fields)
        .instrument(tracing::info_span!("create_post"))
        .await?;
    info!(id = %created.id, "Post created");

    let id = created.id.to_string();
    let edit = ["title=Hello again".to_string()];
    let updated = shell::update(&posts, &id, &edit)
        .instrument(tracing::info_span!("edit_post"))
        .await?;
    info!(id = %updated.id, title = %updated.title, "Post edited");

    shell::delete(&posts, &id, |prompt| {
        println!("{prompt} yes");
        true
    })
    .instrument(tracing::info_span!("delete_post"))
    .await?;
    print_page("Posts after the session", &posts).await?;
    drop(posts);

    let comment = shell::show(system.comments.as_ref(), "1").await?;
    println!("Comment 1 is on: {}", comment.post.map(|p| p.title).unwrap_or_default());

    let users = system.mount_users();
    print_page("Users", &users).await?;
    Ok(())
}

async fn print_page<T: Row>(title: &str, handle: &ControllerHandle<T>) -> anyhow::Result<()> {
    let items = shell::list(handle).await?;
    println!("== {title} ==");
    print!("{}", shell::render_list(&items));
    Ok(())
}
