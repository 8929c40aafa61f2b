//! This module provides a blocking TCP/IP interface.
//!
//! Most LAN enabled oscilloscopes accept raw SCPI lines on a dedicated socket, e.g., port 5555
//! for Rigol instruments.

use std::{
    net::{TcpStream, ToSocketAddrs},
    time::Duration,
};

use crate::{Instrument, LinkError};

/// A blocking TCP/IP implementation using the [`std::net::TcpStream`] struct.
#[derive(Debug)]
pub struct TcpIpInterface {}

impl TcpIpInterface {
    /// Try to connect to an instrument with a default timeout of three seconds.
    ///
    /// The terminator is by default set to `"\n"`. The timeout is applied to reads and writes of
    /// the socket, so that a vanished instrument never blocks the caller forever.
    ///
    /// # Arguments
    /// * `sock_addr` - Socket address, e.g., `"192.168.1.20:5555"`.
    pub fn try_new<A: ToSocketAddrs>(
        sock_addr: A,
    ) -> Result<Instrument<TcpStream>, LinkError> {
        Self::with_timeout(sock_addr, Duration::from_secs(3))
    }

    /// Try to connect to an instrument with a given read/write timeout.
    ///
    /// # Arguments
    /// * `sock_addr` - Socket address.
    /// * `timeout` - Read and write timeout of the socket.
    pub fn with_timeout<A: ToSocketAddrs>(
        sock_addr: A,
        timeout: Duration,
    ) -> Result<Instrument<TcpStream>, LinkError> {
        let stream = TcpStream::connect(sock_addr)?;
        stream.set_write_timeout(Some(timeout))?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_nodelay(true)?;
        log::debug!("connected to {:?}", stream.peer_addr().ok());
        Ok(Instrument::new(stream, timeout))
    }
}
