//! Command-line arguments.

use crate::config::Settings;
use clap::{Parser, Subcommand, ValueEnum};
use console_framework::CreateIdPolicy;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "admin-console", version, about = "CRUD console for posts, users and comments")]
pub struct Cli {
    /// Settings file (defaults to ./console.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// GraphQL endpoint; the seeded in-process backend is used when absent
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Who assigns ids to created entities: server-assigned or client-generated
    #[arg(long, global = true, value_name = "POLICY")]
    pub create_ids: Option<CreateIdPolicy>,

    /// Log filter directive, e.g. "debug" or "admin_console=debug,info"
    #[arg(long, global = true, value_name = "FILTER")]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Collection {
    Posts,
    Users,
    Comments,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scripted create/edit/delete session against the seeded backend
    Demo,
    /// List a collection in server order
    List { collection: Collection },
    /// Show one entity
    Show { collection: Collection, id: String },
    /// Create an entity from FIELD=VALUE pairs
    Create {
        collection: Collection,
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        fields: Vec<String>,
    },
    /// Edit an entity; unset fields keep their values
    Update {
        collection: Collection,
        id: String,
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        fields: Vec<String>,
    },
    /// Delete an entity after confirmation
    Delete {
        collection: Collection,
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

impl Command {
    /// The collection a subcommand works on; `None` for the demo.
    pub fn collection(&self) -> Option<Collection> {
        match self {
            Command::Demo => None,
            Command::List { collection }
            | Command::Show { collection, .. }
            | Command::Create { collection, .. }
            | Command::Update { collection, .. }
            | Command::Delete { collection, .. } => Some(*collection),
        }
    }
}

impl Cli {
    /// Flags take precedence over every other settings source.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(endpoint) = &self.endpoint {
            settings.endpoint = Some(endpoint.clone());
        }
        if let Some(policy) = self.create_ids {
            settings.create_ids = policy;
        }
        if let Some(filter) = &self.log {
            settings.log_filter = Some(filter.clone());
        }
    }
}
