use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "next-upgrade",
    about = "Upgrade a Next.js project: pin compatible React versions, install, and apply codemods",
    version,
    author
)]
pub struct Cli {
    /// Path to the project directory (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    pub path: String,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upgrade Next.js to a release and apply the codemods it needs
    Upgrade {
        /// Dist-tag (latest, canary, rc), exact version, or npm range
        #[arg(value_name = "REVISION", default_value = "latest")]
        revision: String,
    },

    /// List codemods, optionally only those between two versions
    Codemods {
        /// Exclusive lower bound (the installed version)
        #[arg(long, value_name = "VERSION")]
        from: Option<String>,

        /// Inclusive upper bound (the target version)
        #[arg(long, value_name = "VERSION")]
        to: Option<String>,
    },
}
