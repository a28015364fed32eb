use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "camara")]
#[command(version, about = "Back office for a municipal legislative chamber portal")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to ./camara.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the manageable resources and their admin routes
    Resources {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List records of a resource in its display order
    List {
        /// Resource (noticias, vereadores, legislaturas, ... or English names)
        resource: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one record
    Get {
        resource: String,

        /// Record ID (full UUID or unique prefix)
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a record from a JSON document
    Create {
        resource: String,

        /// Read the JSON document from a file
        #[arg(long, conflicts_with = "stdin", value_name = "PATH")]
        file: Option<PathBuf>,

        /// Read the JSON document from stdin
        #[arg(long)]
        stdin: bool,
    },

    /// Change fields of a record
    Update {
        resource: String,

        /// Record ID (full UUID or unique prefix)
        id: String,

        /// Column assignment "column=value" (can be specified multiple times)
        #[arg(long = "set", short = 's', required = true, value_name = "COLUMN=VALUE")]
        sets: Vec<String>,
    },

    /// Switch a record's publish/active flag on (or off with --off)
    Toggle {
        resource: String,

        /// Record ID (full UUID or unique prefix)
        id: String,

        /// Switch the flag off
        #[arg(long)]
        off: bool,
    },

    /// Delete a record
    Delete {
        resource: String,

        /// Record ID (full UUID or unique prefix)
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Make a legislative term the only active one (or deactivate it with --off)
    ActivateTerm {
        /// Term ID (full UUID or unique prefix)
        id: String,

        #[arg(long)]
        off: bool,
    },

    /// Answer an ombudsman message
    Respond {
        /// Message ID (full UUID or unique prefix)
        id: String,

        /// Response text
        text: String,
    },

    /// List the submissions received by a form, newest first
    Responses {
        /// Form ID (full UUID or unique prefix)
        form: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the dashboard counts
    Dashboard {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a portal path to its route
    Route { path: String },

    /// Print the slug derived from a title
    Slug { title: String },
}
