//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Composable component trees with type-directed visitors
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Settings file layered over the global config
    #[arg(short = 'c', long = "config", global = true, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a tree expression and print its composite result
    Render {
        /// Tree expression, e.g. "Branch(Leaf Leaf)"
        expr: String,
    },

    /// Show a tree expression as a tree
    Tree {
        /// Tree expression
        expr: String,
    },

    /// Count leaves and containers of a tree expression
    Stats {
        /// Tree expression
        expr: String,
    },

    /// Run tagged visitors over the top-level components of a tree
    Visit {
        /// Tree expression
        expr: String,
        /// Visitor tag, one visitor per tag
        #[arg(short, long = "tag", default_values = ["ConcreteVisitor1", "ConcreteVisitor2"])]
        tags: Vec<String>,
    },

    /// Run the built-in client scenarios
    Demo,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,
}
