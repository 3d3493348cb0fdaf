// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interactive LED controller.
//!
//! Reads one instruction per line from stdin, hands it to the agent with the
//! current LED state, and prints the reply. Logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ledstate::{
    DEFAULT_SNAPSHOT_PATH, Device, DeviceRegistry, Dispatcher, KeywordAgent, Session, StoreConfig,
    ToolRegistry,
};

const PROMPT: &str = "Enter your query: ";

/// Controls LEDs and keeps their state across restarts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path of the JSON state snapshot
    #[arg(short, long, env = "LEDSTATE_SNAPSHOT", default_value = DEFAULT_SNAPSHOT_PATH)]
    snapshot: PathBuf,

    /// LED wiring as <id>=<pin>; repeat for each LED. Defaults to 1=17 2=27 3=22 4=23
    #[arg(long = "led", value_name = "ID=PIN")]
    leds: Vec<Device>,

    /// Log level used when RUST_LOG is not set
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Print the tool descriptions as JSON and exit
    #[arg(long)]
    list_tools: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level)?;

    let registry = if args.leds.is_empty() {
        DeviceRegistry::default()
    } else {
        args.leds
            .into_iter()
            .fold(DeviceRegistry::builder(), ledstate::DeviceRegistryBuilder::entry)
            .build()?
    };

    let store = Arc::new(
        StoreConfig::new(&args.snapshot)
            .with_registry(registry)
            .open(),
    );
    let dispatcher = Dispatcher::new(store);

    if args.list_tools {
        let specs = ToolRegistry::for_dispatcher(&dispatcher).specs();
        println!("{}", serde_json::to_string_pretty(&specs)?);
        return Ok(());
    }

    let session = Session::new(KeywordAgent::new(), dispatcher);
    run_repl(session).await?;

    info!("LED controller stopped");
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

async fn run_repl(mut session: Session<KeywordAgent>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(PROMPT.as_bytes()).await?;
        stdout.flush().await?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        let instruction = line.trim();
        if instruction.is_empty() {
            continue;
        }
        if matches!(instruction, "exit" | "quit") {
            break;
        }

        // Handling writes the snapshot file synchronously.
        let reply = tokio::task::block_in_place(|| session.handle(instruction));
        let reply = reply.unwrap_or_else(|e| format!("Sorry, something went wrong: {e}"));
        stdout.write_all(format!("{reply}\n").as_bytes()).await?;
    }

    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}
