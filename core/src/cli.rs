use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::demo::{self, SimRadio};
use crate::engine::{ManualClock, SystemClock};
use crate::message::{self, Message};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence - resumable step functions for cooperative devices", long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default search)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode readings into a hex payload
    Encode {
        /// Readings as name=value, e.g. tmp=25.5
        #[arg(required = true)]
        fields: Vec<String>,

        /// Text fields as name=abc (first three letters kept)
        #[arg(long = "text")]
        text: Vec<String>,
    },

    /// Decode a hex payload into JSON
    Decode {
        /// Encoded payload
        payload: String,
    },

    /// Simulate sending readings over a radio with the step engine
    Demo {
        /// Readings as name=value
        #[arg(default_value = "tmp=25.5")]
        fields: Vec<String>,

        /// Number of transmissions the radio refuses first
        #[arg(long, default_value = "0")]
        reject: u8,

        /// Acknowledgement latency in ms
        #[arg(long, default_value = "300")]
        ack_ms: u64,

        /// Never acknowledge (the sequence times out)
        #[arg(long)]
        no_ack: bool,

        /// Wait in real time instead of fast-forwarding a simulated clock
        #[arg(long)]
        realtime: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::builder()
        .config_path(cli.config.clone())
        .build()
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Encode { fields, text } => {
            let message = build_message(&config, &fields, &text)?;
            println!("{}", message.payload()?);
        }

        Commands::Decode { payload } => {
            let json = message::decode_to_json(&payload)
                .with_context(|| format!("Failed to decode '{}'", payload))?;
            println!("{}", json);
        }

        Commands::Demo {
            fields,
            reject,
            ack_ms,
            no_ack,
            realtime,
        } => {
            let message = build_message(&config, &fields, &[])?;
            let radio = SimRadio::new((!no_ack).then_some(ack_ms)).rejecting(reject);

            let report = if realtime {
                demo::run_demo(&config, radio, &message, SystemClock::new())?
            } else {
                demo::run_demo(&config, radio, &message, ManualClock::new(0))?
            };

            println!("Outcome:       {:?}", report.outcome);
            println!("Passes:        {}", report.passes);
            println!("Elapsed:       {} ms", report.elapsed_ms);
            println!("Refused:       {}", report.rejected);
            for payload in &report.transmissions {
                println!("Transmitted:   {}", payload);
            }
        }

        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

fn build_message(config: &Config, fields: &[String], text: &[String]) -> Result<Message> {
    let mut message = Message::with_capacity(config.message.max_bytes);

    for field in fields {
        let (name, value) = split_field(field)?;
        let value: f64 = value
            .parse()
            .with_context(|| format!("Invalid number in field '{}'", field))?;
        message.add_field(name, value)?;
    }
    for field in text {
        let (name, value) = split_field(field)?;
        message.add_text_field(name, value)?;
    }

    Ok(message)
}

fn split_field(field: &str) -> Result<(&str, &str)> {
    field
        .split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| anyhow!("Invalid field '{}'. Use name=value", field))
}
