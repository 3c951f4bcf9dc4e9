//! CLI module - Command-line interface for Recetario
//!
//! The terminal is the presentation layer: it renders recipe cards, the
//! detail view, the filter sidebar and the chat transcript.

mod commands;
pub mod render;

use clap::{Parser, Subcommand};

use crate::services::MaxTime;

/// Recetario - Recipe browser
/// Search recipes by text, ingredient, cuisine, course, difficulty and time
#[derive(Parser)]
#[command(name = "recetario")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search recipes once and print the results
    #[command(alias = "s")]
    Search(SearchArgs),

    /// Show the full recipe
    #[command(alias = "i")]
    Show {
        /// Recipe ID
        id: String,
    },

    /// List the ingredient catalog by category
    #[command(alias = "ls")]
    Ingredients,

    /// Ask the recipe assistant
    Chat {
        /// Message to send; starts an interactive chat when omitted
        message: Vec<String>,
    },

    /// Interactive browser with live filters
    #[command(alias = "b")]
    Browse,

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

#[derive(clap::Args, Debug, Default)]
pub struct SearchArgs {
    /// Free-text query
    pub query: Vec<String>,

    /// Ingredient ID to require (repeatable)
    #[arg(long = "ingredient", short = 'i')]
    pub ingredients: Vec<String>,

    /// Cuisine filter (repeatable; the backend honours the first)
    #[arg(long = "cuisine", short = 'c')]
    pub cuisines: Vec<String>,

    /// Course filter (repeatable; the backend honours the first)
    #[arg(long = "course")]
    pub courses: Vec<String>,

    /// easy, medium or hard (repeatable)
    #[arg(long = "difficulty", short = 'd')]
    pub difficulties: Vec<String>,

    /// 15, 30, 45 or 60 minutes
    #[arg(long = "max-time", short = 't')]
    pub max_time: Option<MaxTime>,

    /// Also print the filter sidebar with counts
    #[arg(long)]
    pub facets: bool,
}

pub use commands::*;
