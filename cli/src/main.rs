mod commands;
mod terminal;

use commands::{CommandLine, Commands, config, scan, services};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init();
    print::banner(commands.quiet);

    match commands.command {
        Commands::Scan {
            host,
            ports,
            timeout,
            concurrency,
        } => {
            print::header("starting scanner", commands.quiet);
            scan::scan(host, ports, timeout, concurrency, commands.quiet).await
        }
        Commands::Services => {
            print::header("well-known services", commands.quiet);
            services::services()
        }
        Commands::Config {
            timeout,
            concurrency,
        } => {
            print::header("settings", commands.quiet);
            config::config(timeout, concurrency)
        }
    }
}
