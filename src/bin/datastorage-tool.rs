use std::{fs, path::PathBuf, process::exit};

use clap::{Parser, Subcommand};
use colored::*;
use datastorage::{client::DEFAULT_SERVER_URL, logger::setup_logger, DataStorageClient, ServerReply};

#[derive(Parser)]
#[command(name = "datastorage-tool", version, about = "CLI for the datastorage server")]
struct Cli {
    /// Base URL of the datastorage server
    #[arg(long, env = "DATASTORAGE_URL", default_value = DEFAULT_SERVER_URL)]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the health status of the server
    Health,
    /// Datastorage operations
    Data {
        #[command(subcommand)]
        command: DataCommands,
    },
}

#[derive(Subcommand)]
enum DataCommands {
    /// Retrieve the data stored under a name
    Retrieve {
        /// Name of the data
        name: String,
    },
    /// Upload data under a name, either inline or from a file
    Upload {
        /// Name of the data
        name: String,
        /// Data value (string)
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        value: Option<String>,
        /// Read the data from this file instead
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Delete the data stored under a name
    Delete {
        /// Name of the data
        name: String,
    },
}

fn main() {
    dotenvy::dotenv().ok();
    setup_logger("warn");
    let cli = Cli::parse();

    let client = DataStorageClient::new(cli.url).unwrap_or_else(|e| {
        eprintln!("failed to build client: {}", e);
        exit(1);
    });

    match cli.command {
        Commands::Health => match client.health() {
            Ok(status) if status.is_success() => println!("{}", "server is healthy".green()),
            Ok(status) => println!("{} {}", "server is unhealthy :'(".red(), status),
            Err(e) => {
                eprintln!("failed to GET /health from {}: {}", client.base_url(), e);
                exit(1);
            }
        },
        Commands::Data { command } => {
            let reply = match command {
                DataCommands::Retrieve { name } => client.retrieve(&name),
                DataCommands::Upload { name, value, file } => {
                    let data = match (value, file) {
                        (_, Some(path)) => fs::read(&path).unwrap_or_else(|e| {
                            eprintln!("failed to read {}: {}", path.display(), e);
                            exit(1);
                        }),
                        (Some(value), None) => value.into_bytes(),
                        (None, None) => unreachable!("clap requires a value or --file"),
                    };
                    client.upload(&name, data)
                }
                DataCommands::Delete { name } => client.delete(&name),
            };
            match reply {
                Ok(reply) => print_reply(&reply),
                Err(e) => {
                    eprintln!("datastorage request failed: {}", e);
                    exit(1);
                }
            }
        }
    }
}

fn print_reply(reply: &ServerReply) {
    let status = if reply.status.is_success() {
        reply.status.to_string().green()
    } else {
        reply.status.to_string().red()
    };
    let body = serde_json::to_string_pretty(&reply.body).unwrap_or_else(|_| reply.body.to_string());
    println!("server response ({}):\n{}", status, body);
}
