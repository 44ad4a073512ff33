use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "labfeeds")]
#[command(about = "Social-media and document aggregation for a laboratory website")]
#[command(version)]
pub struct Cli {
    /// Read settings from this file instead of the process environment
    #[arg(long, global = true, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the context of one page and print it as JSON
    Page {
        /// Page name (home, news, twitter, wikipedia, calendar, lab-rules,
        /// publication-policy, data-sharing-policy)
        page: String,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List the available pages and the slots they fetch
    Pages,

    /// Fetch one feed and print the result as JSON
    Feed {
        /// Source name (twitter, wikipedia, facebook_posts, facebook_links,
        /// facebook_milestones, facebook_photos)
        source: String,

        /// Number of items to request (bounded by the source's maximum)
        #[arg(short, long)]
        count: Option<u32>,
    },

    /// Fetch a remote text document and print it verbatim
    Document {
        /// Document URL
        url: String,

        /// Resource name used in the fallback message
        #[arg(short, long, default_value = "Document")]
        name: String,
    },
}
