//! ringkv CLI Client
//!
//! Command-line interface for interacting with a ringkv server.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use ringkv::protocol::{read_response, write_command, Command, Status};
use ringkv::Result;

/// ringkv CLI
#[derive(Parser, Debug)]
#[command(name = "ringkv-cli")]
#[command(about = "CLI for the ringkv key-value router")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:7070")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Show which node owns a key
    Resolve {
        /// The key to resolve
        key: String,
    },

    /// Ping the server
    Ping,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let command = match args.command {
        Commands::Get { key } => Command::Get {
            key: key.into_bytes(),
        },
        Commands::Set { key, value } => Command::Put {
            key: key.into_bytes(),
            value: value.into_bytes(),
        },
        Commands::Resolve { key } => Command::Resolve {
            key: key.into_bytes(),
        },
        Commands::Ping => Command::Ping,
    };

    match roundtrip(&args.server, &command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Send one command and print the server's answer.
fn roundtrip(server: &str, command: &Command) -> Result<ExitCode> {
    let stream = TcpStream::connect(server)?;
    let mut writer = BufWriter::new(stream.try_clone()?);
    let mut reader = BufReader::new(stream);

    write_command(&mut writer, command)?;
    let response = read_response(&mut reader)?;

    let payload = response
        .payload
        .map(|p| String::from_utf8_lossy(&p).into_owned());

    match response.status {
        Status::Ok => {
            if let Some(text) = payload {
                println!("{text}");
            } else {
                println!("OK");
            }
            Ok(ExitCode::SUCCESS)
        }
        Status::NotFound => {
            eprintln!("(not found)");
            Ok(ExitCode::FAILURE)
        }
        Status::Unavailable => {
            eprintln!("no node available");
            Ok(ExitCode::FAILURE)
        }
        Status::Error => {
            eprintln!("server error: {}", payload.unwrap_or_default());
            Ok(ExitCode::FAILURE)
        }
    }
}
