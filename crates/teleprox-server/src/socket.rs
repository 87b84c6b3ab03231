//! TCP listener for the control server.
//!
//! The listener accepts connections and serves each on its own thread.
//! A connection is a strict sequence of request/reply exchanges: read
//! one framed request, dispatch it against the shared registry, write
//! one framed response, repeat until the peer disconnects.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use teleprox_protocol::{ErrorObject, FrameReader, FrameWriter, ProtocolError, Request, Response};

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::handler::handle_request;
use crate::registry::ObjectRegistry;

/// Control server bound to a TCP address.
pub struct ControlServer {
    listener: TcpListener,
    registry: Arc<Mutex<ObjectRegistry>>,
    config: ServerConfig,
}

impl ControlServer {
    /// Binds to the configured address.
    pub fn bind(config: ServerConfig, registry: ObjectRegistry) -> ServerResult<Self> {
        let listener = TcpListener::bind(&config.bind_addr)?;
        info!(addr = %listener.local_addr()?, "control server listening");

        Ok(Self {
            listener,
            registry: Arc::new(Mutex::new(registry)),
            config,
        })
    }

    /// The address the server is listening on (useful with port 0).
    pub fn local_addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Runs the accept loop, one thread per connection.
    pub fn run(&self) -> ServerResult<()> {
        loop {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    debug!(%peer, "accepted connection");
                    let registry = Arc::clone(&self.registry);
                    let timeout = self.config.read_timeout;
                    thread::spawn(move || {
                        if let Err(e) = serve_connection(stream, timeout, registry) {
                            warn!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "failed to accept connection");
                    // Keep accepting despite errors
                }
            }
        }
    }
}

/// Serves one connection until the peer disconnects.
fn serve_connection(
    stream: TcpStream,
    timeout: Option<Duration>,
    registry: Arc<Mutex<ObjectRegistry>>,
) -> ServerResult<()> {
    stream.set_read_timeout(timeout)?;
    let mut reader = FrameReader::new(stream.try_clone()?);
    let mut writer = FrameWriter::new(stream);

    loop {
        let request: Request = match reader.read_message() {
            Ok(Some(request)) => request,
            Ok(None) => {
                debug!("peer disconnected");
                return Ok(());
            }
            Err(ProtocolError::Serialization(e)) => {
                // The frame was consumed, so the exchange can still be
                // answered; without a parsed id the reply carries an
                // empty one.
                warn!(error = %e, "received undecodable request");
                let response =
                    Response::failure("", ErrorObject::protocol(format!("invalid request: {e}")));
                writer.write_message(&response)?;
                writer.flush()?;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let response = {
            let mut registry = registry.lock().unwrap_or_else(|e| e.into_inner());
            handle_request(&mut registry, &request)
        };

        writer.write_message(&response)?;
        writer.flush()?;
    }
}
