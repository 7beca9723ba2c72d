use clap::{Parser, Subcommand};

use crate::bookmarks::{Category, ColorTag};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch and analyze a page without storing it
    Analyze {
        /// a url
        url: String,
    },

    /// Check whether a url duplicates one of the owner's bookmarks
    Check {
        /// a url
        url: String,

        #[clap(short, long)]
        owner: String,
    },

    /// Create new bookmark
    Add {
        /// a url
        url: String,

        /// Bookmark name
        #[clap(short, long)]
        name: String,

        #[clap(short, long)]
        owner: String,

        /// Bookmark description
        #[clap(short, long)]
        description: Option<String>,

        #[clap(long, value_enum)]
        category: Option<Category>,

        #[clap(long, value_enum)]
        color: Option<ColorTag>,

        /// Comma or space separated tags
        #[clap(short, long)]
        tags: Option<String>,

        #[clap(long, default_value = "false")]
        favorite: bool,

        /// Add even if it looks like a duplicate
        #[clap(short, long, default_value = "false")]
        force: bool,

        /// Print the bookmark while it is still pending.
        /// The analysis still finishes before exit.
        #[clap(long, default_value = "false")]
        no_wait: bool,
    },

    /// Update bookmark. Changing the url reanalyzes it.
    Update {
        id: u64,

        /// a url
        #[clap(short, long)]
        url: Option<String>,

        /// Bookmark name
        #[clap(short, long)]
        name: Option<String>,

        /// Bookmark description
        #[clap(short, long)]
        description: Option<String>,

        /// Replace tags
        #[clap(long)]
        tags: Option<String>,
    },

    /// Analyze bookmark again
    Reanalyze { id: u64 },

    /// Print bookmark
    Show { id: u64 },

    /// List owner's bookmarks
    List {
        #[clap(short, long)]
        owner: String,
    },

    /// Toggle favorite flag
    Favorite { id: u64 },
}
