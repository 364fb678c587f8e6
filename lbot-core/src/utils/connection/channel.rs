//! Command Channel Module
//!
//! Plain TCP on a fixed port with no framing: a message is whatever a single
//! read returns, up to the configured buffer size. The listener never blocks
//! so a control loop can poll it between ticks; an established
//! [`Connection`] reads and writes blocking.
//!
//! "No connection" is `None`: [`send_message`] and [`get_message`] are no-ops
//! on it. A `Connection` closes its socket when dropped.

use std::{
    fmt,
    io::{self, Read, Write},
    net::{IpAddr, Ipv4Addr, Shutdown, SocketAddr, TcpListener, TcpStream},
};

use socket2::{Domain, Protocol, Socket, Type};

use crate::utils::config::ChannelConfig;

/// Errors raised by the command channel.
#[derive(Debug)]
pub enum ChannelError {
    /// Transport failure: bind, refused connect, accept or read/write.
    Io(io::Error),
    /// Received bytes were not valid UTF-8.
    InvalidUtf8,
}

impl fmt::Display for ChannelError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            ChannelError::Io(e) => write!(f, "channel i/o error: {e}"),
            ChannelError::InvalidUtf8 => f.write_str("received message is not valid UTF-8"),
        }
    }
}

impl std::error::Error for ChannelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChannelError::Io(e) => Some(e),
            ChannelError::InvalidUtf8 => None,
        }
    }
}

impl From<io::Error> for ChannelError {
    fn from(e: io::Error) -> Self {
        ChannelError::Io(e)
    }
}

/// Non-blocking listener for incoming command connections.
pub struct CommandServer {
    listener: TcpListener,
    recv_buffer: usize,
}

/// An established, blocking command connection.
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    recv_buffer: usize,
}

/// Bind the listener on all interfaces at the configured port.
pub fn create_server(config: &ChannelConfig) -> Result<CommandServer, ChannelError> {
    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), config.port);
    let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(config.backlog)?;
    socket.set_nonblocking(true)?;

    let listener: TcpListener = socket.into();
    let local = listener.local_addr()?;
    tracing::info!(addr = %local, backlog = config.backlog, "command server listening");
    Ok(CommandServer {
        listener,
        recv_buffer: config.recv_buffer,
    })
}

/// Open an outbound connection to `ip` at the configured port.
pub fn connect_with(
    ip: IpAddr,
    config: &ChannelConfig,
) -> Result<Connection, ChannelError> {
    let addr = SocketAddr::new(ip, config.port);
    let stream = TcpStream::connect(addr).inspect_err(|error| {
        tracing::error!(%addr, ?error, "connect failed");
    })?;
    tracing::info!(%addr, "connected");
    Ok(Connection {
        stream,
        peer: addr,
        recv_buffer: config.recv_buffer,
    })
}

impl CommandServer {
    /// Try one accept; `Ok(None)` when nobody is waiting. Never blocks.
    pub fn accept_connection(&self) -> Result<Option<Connection>, ChannelError> {
        match self.listener.accept() {
            Ok((stream, peer)) => {
                stream.set_nonblocking(false)?;
                tracing::info!(%peer, "connection accepted");
                Ok(Some(Connection {
                    stream,
                    peer,
                    recv_buffer: self.recv_buffer,
                }))
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => {
                tracing::error!(error = ?e, "accept failed");
                Err(e.into())
            }
        }
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ChannelError> {
        Ok(self.listener.local_addr()?)
    }
}

impl Connection {
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    fn send(
        &mut self,
        text: &str,
    ) -> Result<(), ChannelError> {
        self.stream.write_all(text.as_bytes())?;
        tracing::debug!(peer = %self.peer, bytes = text.len(), "message sent");
        Ok(())
    }

    fn receive(&mut self) -> Result<String, ChannelError> {
        let mut buffer = vec![0u8; self.recv_buffer];
        let n = self.stream.read(&mut buffer)?;
        buffer.truncate(n);
        tracing::debug!(peer = %self.peer, bytes = n, "message received");
        String::from_utf8(buffer).map_err(|_| ChannelError::InvalidUtf8)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        // NotConnected is expected once the peer already closed.
        let _ = self.stream.shutdown(Shutdown::Both);
        tracing::debug!(peer = %self.peer, "connection closed");
    }
}

/// Write `text` as raw bytes; does nothing without a connection.
pub fn send_message(
    conn: Option<&mut Connection>,
    text: &str,
) -> Result<(), ChannelError> {
    match conn {
        Some(conn) => conn.send(text),
        None => Ok(()),
    }
}

/// One blocking read of up to the buffer size; `None` without a connection.
///
/// A peer that closed yields `Some("")`.
pub fn get_message(conn: Option<&mut Connection>) -> Result<Option<String>, ChannelError> {
    match conn {
        Some(conn) => conn.receive().map(Some),
        None => Ok(None),
    }
}
