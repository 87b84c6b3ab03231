//! Blocking message channels.
//!
//! The session is transport-agnostic: it only needs a channel that can
//! send one JSON document and block until exactly one document comes
//! back. [`TcpChannel`] is the stock implementation, framing messages
//! over a TCP stream.

use std::io::{self, BufReader, BufWriter, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use teleprox_protocol::{ProtocolError, ProtocolResult, read_frame, write_frame};

/// One bidirectional connection supporting a single blocking
/// request-reply exchange at a time. No pipelining: callers must pair
/// every [`send`](Self::send) with one [`recv`](Self::recv) before the
/// next send.
pub trait MessageChannel: Send {
    /// Sends one message.
    fn send(&mut self, message: &[u8]) -> ProtocolResult<()>;

    /// Blocks until one message arrives.
    fn recv(&mut self) -> ProtocolResult<Vec<u8>>;
}

/// Message channel over a TCP stream, length-prefix framed.
pub struct TcpChannel {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl TcpChannel {
    /// Connects to the given server address.
    pub fn connect(addr: impl ToSocketAddrs) -> io::Result<Self> {
        let stream = TcpStream::connect(addr)?;
        debug!(peer = %stream.peer_addr()?, "connected");

        let reader = BufReader::new(stream.try_clone()?);
        Ok(Self {
            reader,
            writer: BufWriter::new(stream),
        })
    }

    /// Applies a socket-level deadline to each subsequent read and write,
    /// or removes it with `None`. The request/reply contract is
    /// unchanged; an expired deadline surfaces as an IO error from the
    /// exchange in progress.
    pub fn set_deadline(&self, deadline: Option<Duration>) -> io::Result<()> {
        let stream = self.writer.get_ref();
        stream.set_read_timeout(deadline)?;
        stream.set_write_timeout(deadline)
    }
}

impl MessageChannel for TcpChannel {
    fn send(&mut self, message: &[u8]) -> ProtocolResult<()> {
        write_frame(&mut self.writer, message)?;
        self.writer.flush()?;
        Ok(())
    }

    fn recv(&mut self) -> ProtocolResult<Vec<u8>> {
        match read_frame(&mut self.reader)? {
            Some(payload) => Ok(payload),
            None => Err(ProtocolError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed while waiting for a reply",
            ))),
        }
    }
}
