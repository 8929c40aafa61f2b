//! scpi-link: Talk SCPI to your bench instruments from Rust
//!
//! This crate provides the transport layer that instrument drivers build upon. It knows how to
//! write a command line to an instrument and how to read exactly one reply back, but it does not
//! know anything about the meaning of the commands. To do so, it provides an
//! [`InstrumentInterface`] trait and its implementations, as well as a [`LinkError`] error type
//! that all interfaces return.
//!
//! # Currently implemented interfaces are:
//! - TCP/IP (blocking) using [`std::net::TcpStream`], see [`TcpIpInterface`].
//! - Any other stream that implements [`std::io::Read`] and [`std::io::Write`], see
//!   [`Instrument`].
//! - A [`LoopbackInterface`] that scripts a whole conversation for testing drivers without
//!   hardware.
//!
//! # Replies
//!
//! SCPI replies are mostly text lines that end with a terminator. Waveforms and screenshots
//! however are sent as IEEE 488.2 definite length blocks, `#<n><len><payload>`, where the payload
//! may contain any byte value, including the terminator. [`InstrumentInterface::read_reply`]
//! frames both kinds of replies: for a block it reads the length field and then exactly that many
//! payload bytes without looking at them. Validating the block grammar is left to the driver.
//!
//! # License
//!
//! Licensed under either of
//!
//! - Apache License, Version 2.0 ([LICENSE-APACHE](http://www.apache.org/licenses/LICENSE-2.0))
//! - MIT license ([LICENSE-MIT](http://opensource.org/licenses/MIT))
//!
//! at your option.

#![warn(missing_docs)]

mod instrument;
mod loopback;
mod tcp_ip;

pub use instrument::Instrument;
pub use loopback::LoopbackInterface;
pub use tcp_ip::TcpIpInterface;

use std::time::{Duration, Instant};

use thiserror::Error;

/// Largest block payload [`InstrumentInterface::read_reply`] reads by length, in bytes.
///
/// Longer length fields are taken as a desynchronized stream and the reply is read up to the
/// terminator instead.
pub const MAX_BLOCK_LEN: usize = 128 * 1024 * 1024;

/// The error enum for all interfaces.
///
/// Every write and read on an interface either succeeds or returns one of these errors. Drivers
/// are expected to wrap it into their own error type, as a link failure usually means that the
/// instrument cannot be reached anymore.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LinkError {
    /// The called command is not supported by this interface.
    #[error("This command is not supported by this interface.")]
    InterfaceCommandNotSupported,
    /// Error when reading from/writing to an interface. See [`std::io::Error`] for more details.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Timeout occurred while waiting for a reply from the instrument. The error contains the
    /// timeout that was exceeded.
    #[error(
        "Timeout occured while waiting for a response from the instrument. Timeout was set to {0:?}."
    )]
    Timeout(Duration),
    /// Timeout occurred while waiting for a reply to a query. The error contains the query that
    /// was sent and the timeout that was exceeded.
    #[error(
        "Timeout occured while waiting for a response to query: {query}. Timeout was set to {timeout:?}."
    )]
    TimeoutQuery {
        /// The query that timed out.
        query: String,
        /// The timeout that was set.
        timeout: Duration,
    },
}

impl LinkError {
    /// Returns `true` if the error was caused by the instrument not answering in time.
    pub fn is_timeout(&self) -> bool {
        match self {
            LinkError::Timeout(_) | LinkError::TimeoutQuery { .. } => true,
            LinkError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }
}

/// The `InstrumentInterface` trait defines how bytes get to and from an instrument.
///
/// Implementors only need to provide [`InstrumentInterface::read_exact`] and
/// [`InstrumentInterface::write_raw`]. Sending command lines, framing replies and handling the
/// terminator are provided on top of these two functions.
///
/// The protocol is strictly request/reply: a caller must read the reply of a query before it
/// sends the next command.
pub trait InstrumentInterface {
    /// Read exactly `buf.len()` bytes from the instrument.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), LinkError>;

    /// Write all bytes to the instrument and flush the interface.
    fn write_raw(&mut self, data: &[u8]) -> Result<(), LinkError>;

    /// Get the terminator of the interface. Defaults to `"\n"`.
    fn get_terminator(&self) -> &str {
        "\n"
    }

    /// Set the terminator of an interface from a `&str`.
    ///
    /// Interfaces that cannot change their terminator ignore this call.
    fn set_terminator(&mut self, _terminator: &str) {}

    /// Get the read timeout of the interface. Defaults to three seconds.
    fn get_timeout(&self) -> Duration {
        Duration::from_secs(3)
    }

    /// Send a command line to the instrument.
    ///
    /// The terminator is appended to the command before it is written.
    ///
    /// # Arguments
    /// * `cmd` - The command to send, without terminator.
    fn send(&mut self, cmd: &str) -> Result<(), LinkError> {
        log::trace!("link <- {cmd:?}");
        let line = format!("{cmd}{}", self.get_terminator());
        self.write_raw(line.as_bytes())
    }

    /// Read bytes until the terminator is found and return them without the terminator.
    ///
    /// If no terminator is seen before the timeout of the interface elapses,
    /// [`LinkError::Timeout`] is returned.
    fn read_until_terminator(&mut self) -> Result<Vec<u8>, LinkError> {
        read_delimited(self, Vec::new())
    }

    /// Read exactly one reply from the instrument.
    ///
    /// A reply starting with `#` and a non-zero digit is read as a definite length block: the
    /// length field is read, then exactly that many payload bytes, and finally everything up to
    /// the terminator. The returned bytes contain the block header and payload. Any other reply
    /// is read up to the terminator.
    fn read_reply(&mut self) -> Result<Vec<u8>, LinkError> {
        let mut byte = [0u8];
        self.read_exact(&mut byte)?;
        let mut reply = vec![byte[0]];
        if byte[0] != b'#' {
            return read_delimited(self, reply);
        }

        self.read_exact(&mut byte)?;
        reply.push(byte[0]);
        let nof_digits = match byte[0] {
            b'1'..=b'9' => usize::from(byte[0] - b'0'),
            _ => return read_delimited(self, reply),
        };

        let mut len_field = vec![0u8; nof_digits];
        self.read_exact(&mut len_field)?;
        reply.extend_from_slice(&len_field);
        let payload_len = match std::str::from_utf8(&len_field)
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
        {
            Some(len) if len <= MAX_BLOCK_LEN => len,
            Some(len) => {
                log::warn!("Block length {len} exceeds {MAX_BLOCK_LEN} bytes, reading as text");
                return read_delimited(self, reply);
            }
            None => return read_delimited(self, reply),
        };

        let mut payload = vec![0u8; payload_len];
        self.read_exact(&mut payload)?;
        reply.extend_from_slice(&payload);
        log::trace!("link -> block with {payload_len} payload bytes");

        // whatever follows the payload belongs to this reply, usually only the terminator
        let trailer = read_delimited(self, Vec::new())?;
        reply.extend_from_slice(&trailer);
        Ok(reply)
    }

    /// Send a query to the instrument and return its reply.
    ///
    /// # Arguments
    /// * `cmd` - The query to send to the instrument for which we expect a reply.
    fn request(&mut self, cmd: &str) -> Result<Vec<u8>, LinkError> {
        self.send(cmd)?;
        match self.read_reply() {
            Err(LinkError::Timeout(timeout)) => Err(LinkError::TimeoutQuery {
                query: cmd.to_string(),
                timeout,
            }),
            other => other,
        }
    }
}

/// Read from the interface until the terminator is found, appending to `response`.
///
/// The terminator is stripped from the returned bytes.
fn read_delimited<I: InstrumentInterface + ?Sized>(
    intf: &mut I,
    mut response: Vec<u8>,
) -> Result<Vec<u8>, LinkError> {
    let terminator = intf.get_terminator().as_bytes().to_vec();
    if !terminator.is_empty() && response.ends_with(&terminator) {
        response.truncate(response.len() - terminator.len());
        return Ok(response);
    }

    let timeout = intf.get_timeout();
    let tic = Instant::now();
    let mut single_buf = [0u8];

    while tic.elapsed() < timeout {
        intf.read_exact(&mut single_buf)?;
        response.push(single_buf[0]);
        if !terminator.is_empty() && response.ends_with(&terminator) {
            response.truncate(response.len() - terminator.len());
            log::trace!("link -> {:?}", String::from_utf8_lossy(&response));
            return Ok(response);
        }
    }

    Err(LinkError::Timeout(timeout))
}
