use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Override the converter option string ('-i' is always removed)
    #[arg(required = false, short, long, global = true)]
    pub options: Option<String>,

    /// Override the scratch root used for downloads and conversions
    #[arg(required = false, short, long, global = true)]
    pub temp: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sync remote repository metadata into the local index
    #[clap(name = "sync", visible_alias = "S")]
    Sync {
        /// Providers to sync (all when omitted)
        #[arg(required = false)]
        providers: Vec<String>,
    },

    /// List the providers available in the remote manifest
    #[clap(name = "repositories", visible_alias = "repos")]
    Repositories,

    /// Search the local index for a package
    #[command(arg_required_else_help = true)]
    #[clap(name = "search", visible_alias = "s")]
    Search {
        /// Name to search for (prefix match by default)
        #[arg(required = true)]
        name: String,

        /// Only return exact name matches
        #[arg(required = false, short, long)]
        exact: bool,

        /// Restrict the search to one provider
        #[arg(required = false, short, long)]
        provider: Option<String>,

        /// Restrict the search to one distribution
        #[arg(required = false, short, long, alias = "dist")]
        distribution: Option<String>,
    },

    /// Install a package resolved from the local index
    #[command(arg_required_else_help = true)]
    #[clap(name = "install", visible_alias = "i", visible_alias = "repository")]
    Install {
        /// Package name to install
        #[arg(required = true)]
        name: String,

        /// Restrict resolution to one provider
        #[arg(required = false, short, long)]
        provider: Option<String>,

        /// Restrict resolution to one distribution
        #[arg(required = false, short, long, alias = "dist")]
        distribution: Option<String>,
    },

    /// Install a package from a URL directly
    #[command(arg_required_else_help = true)]
    #[clap(name = "url", visible_alias = "u")]
    Url {
        /// URL of the DEB artifact
        #[arg(required = true)]
        url: String,
    },

    /// Install a package from a local DEB file
    #[command(arg_required_else_help = true)]
    #[clap(name = "file", visible_alias = "f")]
    File {
        /// Path to the DEB artifact
        #[arg(required = true)]
        path: String,
    },

    /// Remove scratch state, and optionally the local index
    #[clap(name = "clean")]
    Clean {
        /// Also remove the synced package index
        #[arg(required = false, long)]
        index: bool,
    },
}
