use anyhow::Result;
use chanlink_cli::{build_channel, commands};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "chanlink")]
#[command(about = "Chanlink - [7,4] block coding over a simulated noisy channel", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Probability P that a frame gets one bit flipped
    #[arg(long, global = true, default_value = "0.0")]
    error_prob: f64,

    /// Probability R that a whole frame is lost
    #[arg(long, global = true, default_value = "0.0")]
    loss_prob: f64,

    /// Seed the channel's random source for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a JSON code request through the channel
    Code {
        /// Input JSON request file ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Output file for the transfer request (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Measure loss and error rates over many random segments
    Simulate {
        /// Number of segments to send
        #[arg(short = 'n', long, default_value = "100000")]
        trials: u64,

        /// Output JSON file for the statistics
        #[arg(short, long)]
        output: Option<String>,

        /// Show a progress bar
        #[arg(long)]
        progress: bool,
    },

    /// Show the encoded frame of a payload
    Inspect {
        /// Payload text (at most 140 bytes)
        #[arg(short, long)]
        payload: String,

        /// Flip this bit of the encoded frame before decoding
        #[arg(long)]
        flip: Option<usize>,

        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Execute command
    match cli.command {
        Commands::Code { input, output } => {
            let channel = build_channel(cli.error_prob, cli.loss_prob, cli.seed)?;
            commands::code::execute(&channel, &input, output.as_deref())
        }

        Commands::Simulate {
            trials,
            output,
            progress,
        } => {
            let channel = build_channel(cli.error_prob, cli.loss_prob, cli.seed)?;
            commands::simulate::execute(&channel, trials, cli.seed, output.as_deref(), progress)
        }

        Commands::Inspect { payload, flip, json } => {
            commands::inspect::execute(&payload, flip, json)
        }
    }
}
