//! rconkit CLI Client
//!
//! Runs a single console command against an RCON server.

use std::time::Duration;

use clap::Parser;
use rconkit::config::{ClientConfig, DEFAULT_PORT};
use rconkit::Session;
use tracing_subscriber::{fmt, EnvFilter};

/// rconkit CLI
#[derive(Parser, Debug)]
#[command(name = "rcon-cli")]
#[command(about = "Send a console command to a Minecraft/Source server over RCON")]
#[command(version)]
struct Args {
    /// A minecraft server hostname / ip address
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// A minecraft server RCON port <rcon.port>
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// A minecraft RCON password <rcon.password>
    #[arg(short = 'P', long, env = "RCON_PASSWORD", default_value = "", hide_env_values = true)]
    pass: String,

    /// Give up waiting for a response after this many milliseconds
    #[arg(long)]
    read_timeout_ms: Option<u64>,

    /// Command to run; words are joined with single spaces
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

fn main() {
    // Logs go to stderr so stdout only carries the server's response
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let args = Args::parse();
    let command = args.command.join(" ");

    let config = ClientConfig::builder()
        .host(&args.host)
        .port(args.port)
        .password(&args.pass)
        .read_timeout(args.read_timeout_ms.map(Duration::from_millis))
        .build();

    tracing::debug!("rcon-cli v{} -> {}", rconkit::VERSION, config.address());

    let mut session = match Session::connect_with(config) {
        Ok(s) => s,
        Err(e) => fail(e),
    };

    match session.send_command(&command) {
        Ok(response) => {
            if !response.is_empty() {
                println!("{}", response);
            }
        }
        Err(e) => fail(e),
    }
}

/// Print the error and exit non-zero
fn fail(err: rconkit::RconError) -> ! {
    eprintln!("{}", err);
    std::process::exit(1);
}
