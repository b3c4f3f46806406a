use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to a yaml config file
    #[clap(short, long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a youku link into ranked redirection endpoints
    Resolve {
        /// Video page url
        url: String,

        /// Skip the liveness probe; only extract and build candidates
        #[clap(long)]
        no_probe: bool,

        /// Print the raw result as json
        #[clap(long)]
        json: bool,
    },

    /// Probe every catalog endpoint with a full GET and report availability
    Test {
        /// Video page url
        url: String,

        /// Print the raw results as json
        #[clap(long)]
        json: bool,
    },

    /// List the catalog endpoints
    Endpoints {
        /// Print the catalog as json
        #[clap(long)]
        json: bool,
    },
}
