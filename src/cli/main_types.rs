use crate::display::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "visearch")]
#[command(about = "Command line client for the ViSearch image search API")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    #[arg(long, global = true, env = "VISEARCH_ACCESS_KEY", hide_env_values = true)]
    pub access_key: Option<String>,

    #[arg(long, global = true, env = "VISEARCH_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// API endpoint, overrides the config file
    #[arg(long, global = true, env = "VISEARCH_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Index images
    Insert {
        /// Images as im_name=im_url
        #[arg(required = true)]
        images: Vec<String>,
        /// Metadata applied to every image, key=value
        #[arg(long, action = clap::ArgAction::Append)]
        meta: Vec<String>,
        /// Extra request parameters, key=value
        #[arg(long, action = clap::ArgAction::Append)]
        param: Vec<String>,
    },
    /// Show the progress of an insert transaction
    InsertStatus {
        trans_id: String,
        #[arg(long)]
        error_page: Option<u32>,
        #[arg(long)]
        error_limit: Option<u32>,
    },
    /// Remove images from the index
    Remove {
        #[arg(required = true)]
        im_names: Vec<String>,
    },
    /// Search by an indexed image
    Search {
        im_name: String,
        #[command(flatten)]
        options: SearchArgs,
    },
    /// Recommendations for an indexed image
    Recommend {
        im_name: String,
        #[command(flatten)]
        options: SearchArgs,
    },
    /// Search by color
    ColorSearch {
        /// Hex color, e.g. ff0000
        color: String,
        #[command(flatten)]
        options: SearchArgs,
    },
    /// Search by an uploaded image
    UploadSearch {
        #[command(flatten)]
        upload: UploadArgs,
        #[command(flatten)]
        region: RegionArgs,
        #[command(flatten)]
        options: SearchArgs,
    },
    /// Detect products in an uploaded image and search each of them
    SimilarProducts {
        #[command(flatten)]
        upload: UploadArgs,
        #[command(flatten)]
        region: RegionArgs,
        #[command(flatten)]
        options: SearchArgs,
    },
    /// Send a tracking event
    Track {
        #[arg(long)]
        action: String,
        #[arg(long)]
        reqid: Option<String>,
        /// Extra event fields, key=value
        #[arg(long, action = clap::ArgAction::Append)]
        param: Vec<String>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}

/// Options shared by every search command
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub limit: Option<u32>,
    /// Metadata field to return (repeatable)
    #[arg(long, action = clap::ArgAction::Append)]
    pub fl: Vec<String>,
    /// Metadata filter, key=value (repeatable)
    #[arg(long, action = clap::ArgAction::Append)]
    pub fq: Vec<String>,
    /// Return similarity scores
    #[arg(long)]
    pub score: bool,
    #[arg(long)]
    pub score_min: Option<f32>,
    #[arg(long)]
    pub score_max: Option<f32>,
    /// Return all metadata fields
    #[arg(long)]
    pub get_all_fl: bool,
    /// Facet field (repeatable)
    #[arg(long, action = clap::ArgAction::Append)]
    pub facets: Vec<String>,
    #[arg(long)]
    pub facets_limit: Option<u32>,
    #[arg(long)]
    pub facets_show_count: bool,
    #[arg(long)]
    pub dedup: Option<bool>,
    /// Extra request parameters, key=value
    #[arg(long, action = clap::ArgAction::Append)]
    pub param: Vec<String>,
}

/// Query image of an upload search; exactly one source is required
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false, id = "source")]
pub struct UploadArgs {
    /// Local image file
    #[arg(long)]
    pub image: Option<PathBuf>,
    /// Image URL
    #[arg(long)]
    pub url: Option<String>,
    /// Id of a previously uploaded image
    #[arg(long)]
    pub im_id: Option<String>,
}

/// Region and detection options of an upload search
#[derive(Args, Debug, Clone, Default)]
pub struct RegionArgs {
    /// Search region x1,y1,x2,y2
    #[arg(long = "box")]
    pub bounding_box: Option<String>,
    /// Object detection type
    #[arg(long)]
    pub detection: Option<String>,
}
