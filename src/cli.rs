//! Command-line surface of the root command.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "skyferry",
    version,
    about = "Cloud data transfer tool",
    long_about = None
)]
pub struct Cli {
    /// Caps the transfer rate, in megabits per second. Moment-by-moment
    /// throughput might vary slightly from the cap. Zero or omitted means
    /// the throughput is not capped.
    #[arg(long = "cap-mbps", default_value_t = 0)]
    pub cap_mbps: u32,

    /// Format of the command's output. The choices include: text, json.
    #[arg(long = "output-type", default_value = "text")]
    pub output_type: String,

    /// Reserved for partner tools that send `cancel` through stdin instead
    /// of OS signals.
    #[arg(long = "cancel-from-stdin", hide = true, default_value_t = false)]
    pub cancel_from_stdin: bool,

    /// Overrides the automatically tuned file/socket handle pool size.
    #[arg(long = "cap-file-handles", hide = true)]
    pub cap_file_handles: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the environment variables the tool honors
    Env,
}
