//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - member: register, search, edit and remove patrons
//! - title: catalogue, search, edit and remove books
//! - loan: issue, return and list loans

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Libris - a library record keeper for members, titles and loans
#[derive(Parser, Debug)]
#[command(name = "libris")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory, overriding the configured one
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Member management
    Member {
        #[command(subcommand)]
        command: MemberCommands,
    },

    /// Title management
    Title {
        #[command(subcommand)]
        command: TitleCommands,
    },

    /// Loan management
    Loan {
        #[command(subcommand)]
        command: LoanCommands,
    },
}

/// Member subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum MemberCommands {
    /// Register a new member
    Add {
        name: String,
        email: String,
        #[arg(short, long, default_value = "")]
        phone: String,
    },

    /// Search members by name, email, phone or id
    Find { query: String },

    /// Show one member
    Show { id: u64 },

    /// Edit a member's details
    Edit {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },

    /// Remove a member (their loans are kept)
    Delete { id: u64 },

    /// List all members
    List,
}

/// Title subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum TitleCommands {
    /// Catalogue a new title
    Add {
        title: String,
        author: String,
        #[arg(short, long, default_value = "")]
        isbn: String,
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Search titles by title, author, ISBN or id
    Find { query: String },

    /// Show one title
    Show { id: u64 },

    /// Edit a title's details
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        isbn: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Remove a title (its loans are kept)
    Delete { id: u64 },

    /// List all titles
    List,
}

/// Loan subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum LoanCommands {
    /// Lend a title to a member
    Issue {
        member_id: u64,
        title_id: u64,
        /// Loan date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Return an outstanding loan
    Return { id: u64 },

    /// Search loans by member name, title or loan id
    Find { query: String },

    /// Show one loan
    Show { id: u64 },

    /// List outstanding loans
    Active,

    /// List every loan, returned ones included
    List,
}
