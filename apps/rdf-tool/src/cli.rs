use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log layout decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the computed layout of a schema file
    Describe {
        /// JSON schema file
        schema: PathBuf,

        /// List fields by physical offset instead of declaration order
        #[arg(long)]
        by_offset: bool,
    },

    /// Print the layout fingerprint of a schema file
    Fingerprint {
        /// JSON schema file
        schema: PathBuf,
    },

    /// Print the records stored in a binary data file
    Dump {
        /// JSON schema file
        schema: PathBuf,

        /// File of consecutive records
        data: PathBuf,

        /// Stop after this many records
        #[arg(short, long)]
        limit: Option<usize>,
    },
}
