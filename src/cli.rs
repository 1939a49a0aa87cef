use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "readmegen")]
#[command(
    about = "Generate README files for GitHub repositories with a tool-calling Gemini model",
    long_about = None
)]
pub struct Args {
    #[arg(short = 'v', long = "verbose", global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(long = "model", global = true, help = "Model name (e.g. gemini-2.0-flash)")]
    pub model: Option<String>,

    #[arg(
        long = "api-endpoint",
        global = true,
        help = "Custom model API base URL (e.g. https://generativelanguage.googleapis.com/v1beta)"
    )]
    pub api_endpoint: Option<String>,

    #[arg(
        long = "max-round-trips",
        global = true,
        help = "Maximum model calls per README before giving up"
    )]
    pub max_round_trips: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(long = "bind", help = "Address to bind (default 0.0.0.0)")]
        bind: Option<String>,

        #[arg(short = 'p', long = "port", help = "Port to listen on (default 3000)")]
        port: Option<u16>,
    },

    /// Generate a README once and print it
    Generate {
        #[arg(help = "GitHub repository URL, e.g. https://github.com/octocat/Hello-World")]
        url: String,

        #[arg(long = "token", help = "GitHub access token for private repositories")]
        token: Option<String>,
    },
}
