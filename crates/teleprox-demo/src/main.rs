//! Demo control server exposing a simulated chopper device.
//!
//! Run it, then drive the device with the `teleprox` CLI:
//!
//! ```text
//! teleprox objects
//! teleprox api chopper
//! teleprox set chopper power_switch true
//! teleprox get chopper state
//! teleprox call chopper speed_command 100
//! ```

mod chopper;

use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use clap::Parser;
use serde_json::{Value, json};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use teleprox_server::{
    ControlServer, ExposedObject, Fault, ObjectRegistry, ServerConfig, ServerResult,
};

use chopper::SimpleChopper;

#[derive(Debug, Parser)]
#[command(name = "teleprox-demo")]
#[command(author, version, about = "Serve a simulated chopper device")]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:10000", env = "TELEPROX_DEMO_BIND")]
    bind: String,

    /// Simulation tick interval in milliseconds
    #[arg(long, default_value = "100")]
    tick_ms: u64,

    /// Enable debug output
    #[arg(long, short = 'v')]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.debug {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()))
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

fn run(cli: Cli) -> ServerResult<()> {
    let device = Arc::new(Mutex::new(SimpleChopper::new()));

    let mut registry = ObjectRegistry::new();
    registry.register("chopper", exposed_chopper(&device));

    let tick = Duration::from_millis(cli.tick_ms.max(1));
    let sim = Arc::clone(&device);
    thread::spawn(move || {
        let dt = tick.as_secs_f64();
        loop {
            thread::sleep(tick);
            sim.lock().unwrap_or_else(|e| e.into_inner()).process(dt);
        }
    });

    info!(bind = %cli.bind, tick_ms = cli.tick_ms, "starting demo device");
    let server = ControlServer::bind(ServerConfig::new(cli.bind), registry)?;
    server.run()
}

/// Wires the device into an exposed object: every member locks the
/// shared simulation state for the duration of one call.
fn exposed_chopper(device: &Arc<Mutex<SimpleChopper>>) -> ExposedObject {
    let unlock = Arc::clone(device);
    let command = Arc::clone(device);
    let power_get = Arc::clone(device);
    let power_set = Arc::clone(device);
    let bearings = Arc::clone(device);
    let speed = Arc::clone(device);
    let locked = Arc::clone(device);
    let state = Arc::clone(device);

    ExposedObject::new("SimpleChopper")
        .method("unlock", move |_args| {
            lock(&unlock).unlock();
            Ok(Value::Null)
        })
        .method("speed_command", move |args| {
            let target = args
                .first()
                .and_then(Value::as_f64)
                .ok_or_else(|| Fault::type_error("speed_command takes one numeric argument"))?;
            if !target.is_finite() || target < 0.0 {
                return Err(Fault::value_error("target speed must be finite and non-negative"));
            }
            lock(&command).speed_command(target);
            Ok(Value::Null)
        })
        .property(
            "power_switch",
            move || Ok(json!(lock(&power_get).power_switch())),
            move |value| {
                let on = value
                    .as_bool()
                    .ok_or_else(|| Fault::type_error("power_switch takes a boolean"))?;
                lock(&power_set).set_power_switch(on);
                Ok(())
            },
        )
        .read_only("bearings_ready", move || {
            Ok(json!(lock(&bearings).bearings_ready()))
        })
        .read_only("speed", move || Ok(json!(lock(&speed).speed())))
        .read_only("speed_locked", move || {
            Ok(json!(lock(&locked).speed_locked()))
        })
        .read_only("state", move || Ok(json!(lock(&state).state().as_str())))
}

fn lock(device: &Arc<Mutex<SimpleChopper>>) -> std::sync::MutexGuard<'_, SimpleChopper> {
    device.lock().unwrap_or_else(|e| e.into_inner())
}
