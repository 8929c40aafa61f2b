//! A general interface for any stream that implements [`std::io::Read`] and [`std::io::Write`].
//!
//! It can be used with [`std::net::TcpStream`], an in-memory buffer, or any other stream type
//! that is not directly supported by this crate.

use std::time::Duration;

use crate::{InstrumentInterface, LinkError};

/// A general instrument interface that can be built with any stream that implements
/// [`std::io::Read`] and [`std::io::Write`].
///
/// # Example
///
/// The following shows how to wrap your own stream. To just talk to an instrument over a
/// [`std::net::TcpStream`], you can also use the [`crate::TcpIpInterface`] shortcut.
///
/// ```no_run
/// use std::{net::TcpStream, time::Duration};
///
/// use scpi_link::Instrument;
///
/// let stream = TcpStream::connect("192.168.10.1:5555").unwrap();
/// let interface = Instrument::new(stream, Duration::from_secs(3));
/// ```
#[derive(Debug)]
pub struct Instrument<P: std::io::Read + std::io::Write> {
    port: P,
    terminator: String,
    timeout: Duration,
}

impl<P: std::io::Read + std::io::Write> Instrument<P> {
    /// Create a new [`Instrument`] from a stream and a read timeout.
    ///
    /// The terminator defaults to `"\n"` and can be changed with
    /// [`InstrumentInterface::set_terminator`].
    pub fn new(port: P, timeout: Duration) -> Self {
        Self {
            port,
            terminator: "\n".to_string(),
            timeout,
        }
    }

    /// Consume the interface and return the underlying stream.
    pub fn into_inner(self) -> P {
        self.port
    }
}

impl<P: std::io::Read + std::io::Write> InstrumentInterface for Instrument<P> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), LinkError> {
        self.port.read_exact(buf)?;
        Ok(())
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<(), LinkError> {
        self.port.write_all(data)?;
        self.port.flush()?;
        Ok(())
    }

    fn get_terminator(&self) -> &str {
        self.terminator.as_str()
    }

    fn set_terminator(&mut self, terminator: &str) {
        self.terminator = terminator.to_string();
    }

    fn get_timeout(&self) -> Duration {
        self.timeout
    }
}
