//! teleprox CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use serde_json::Value;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use teleprox_client::cli::{Cli, Command};
use teleprox_client::config::ClientConfig;
use teleprox_client::error::ClientResult;
use teleprox_client::session::ControlClient;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.debug {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Level::WARN.to_string()))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> ClientResult<()> {
    let config = match &cli.config {
        Some(path) => ClientConfig::load_from(path)?,
        None => ClientConfig::default(),
    };
    let config = cli.effective_config(config);

    let client = ControlClient::connect_with(&config)?;

    match cli.command {
        Command::Objects => {
            for name in client.get_object_collection("")?.keys() {
                println!("{name}");
            }
            Ok(())
        }
        Command::Api { object } => {
            let proxy = client.get_object(&object)?;
            println!("class: {}", proxy.class_name());
            for method in proxy.method_names() {
                println!("  method    {method}");
            }
            for (name, access) in proxy.properties() {
                println!("  property  {name} ({access})");
            }
            Ok(())
        }
        Command::Call {
            object,
            method,
            args,
        } => {
            let proxy = client.get_object(&object)?;
            let args = args.iter().map(|raw| parse_value(raw)).collect();
            print_value(&proxy.call(&method, args)?);
            Ok(())
        }
        Command::Get { object, property } => {
            print_value(&client.get_object(&object)?.get(&property)?);
            Ok(())
        }
        Command::Set {
            object,
            property,
            value,
        } => client
            .get_object(&object)?
            .set(&property, parse_value(&value)),
    }
}

/// Parses an argument as JSON, falling back to a plain string so bare
/// words don't need quoting on the shell.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn print_value(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{rendered}"),
        Err(_) => println!("{value}"),
    }
}
