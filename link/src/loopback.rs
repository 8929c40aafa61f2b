//! The loopback module provides an instrument simulator for testing purposes.
//!
//! The [`LoopbackInterface`] replays a scripted conversation: it knows which command lines the
//! host is expected to send and which replies the instrument sends back. Replies are raw bytes,
//! so binary blocks can be scripted just like text replies.

use std::collections::VecDeque;

use crate::{InstrumentInterface, LinkError};

/// A self-incrementing index structure that by default starts at 0 and increments whenever `next`
/// is called.
#[derive(Debug, Default)]
struct IncrIndex {
    index: usize,
}

impl IncrIndex {
    fn next(&mut self) -> usize {
        let current = self.index;
        self.index += 1;
        current
    }
}

/// An interface that allows you to simply write tests for your instrument driver.
///
/// Whenever the driver sends something that is not the next expected command, the interface
/// panics. When it is dropped, it panics if not all scripted commands and replies were used.
///
/// # Example
///
/// ```
/// use scpi_link::{InstrumentInterface, LoopbackInterface};
///
/// let mut lbk = LoopbackInterface::new(vec!["*IDN?"], vec!["RIGOL TECHNOLOGIES,DS2102A,DS2A1,00.03.05"], "\n");
/// let reply = lbk.request("*IDN?").unwrap();
/// assert_eq!(reply, b"RIGOL TECHNOLOGIES,DS2102A,DS2A1,00.03.05");
/// ```
#[derive(Debug)]
pub struct LoopbackInterface {
    from_host: Vec<String>,
    from_inst: Vec<Vec<u8>>,
    terminator_exp: String,
    from_host_index: IncrIndex,
    from_inst_index: IncrIndex,
    curr_bytes: VecDeque<u8>,
    terminator: String,
}

impl LoopbackInterface {
    /// Create a new loopback instrument with given commands to and from the instrument.
    ///
    /// The expected terminator is appended to every command from the host and to every reply
    /// from the instrument. Pass `""` if the scripted items already contain their terminators.
    ///
    /// # Arguments:
    /// * `from_host` - Commands from host to instrument.
    /// * `from_inst` - Replies from instrument to host, as text or raw bytes.
    /// * `terminator_exp` - The terminator that the driver is expected to use.
    pub fn new<H, I>(from_host: Vec<H>, from_inst: Vec<I>, terminator_exp: &str) -> Self
    where
        H: Into<String>,
        I: Into<Vec<u8>>,
    {
        LoopbackInterface {
            from_host: from_host.into_iter().map(Into::into).collect(),
            from_inst: from_inst.into_iter().map(Into::into).collect(),
            terminator_exp: terminator_exp.to_string(),
            from_host_index: IncrIndex::default(),
            from_inst_index: IncrIndex::default(),
            curr_bytes: VecDeque::new(),
            terminator: "\n".to_string(), // default terminator, as for all interfaces
        }
    }

    /// This command panics if not all commands in the [`LoopbackInterface`] have been used.
    ///
    /// It is automatically called when the [`LoopbackInterface`] is dropped, but you can also
    /// call it manually to ensure that all commands have been used.
    pub fn finalize(&mut self) {
        let from_host_leftover = self.from_host.get(self.from_host_index.next());
        let from_inst_leftover = self.from_inst.get(self.from_inst_index.next());
        if let Some(fil) = from_host_leftover {
            panic!("Leftover expected commands found from host to instrument: {fil}");
        }
        if let Some(fil) = from_inst_leftover {
            panic!(
                "Leftover expected replies found from instrument to host: {:?}",
                String::from_utf8_lossy(fil)
            );
        }
        if !self.curr_bytes.is_empty() {
            panic!(
                "Reply from instrument to host was not read completely: {:?}",
                self.curr_bytes
            );
        }
    }

    /// Test the interfaces terminator and ensure the right one is set.
    pub fn test_terminator(&self, expected_terminator: &str) {
        assert_eq!(
            expected_terminator, self.terminator,
            "Expected terminator '{expected_terminator:?}', got '{:?}'",
            self.terminator
        );
    }

    /// Get the next command from host to instrument including the terminator, or panic.
    fn get_next_from_host_with_terminator(&mut self) -> String {
        let cmd = self
            .from_host
            .get(self.from_host_index.next())
            .expect("No more commands were expected from host to instrument.");
        format!("{cmd}{}", self.terminator_exp)
    }

    /// Get the next reply from instrument to host including the terminator, or panic.
    fn get_next_from_inst_with_terminator(&mut self) -> Vec<u8> {
        let mut reply = self
            .from_inst
            .get(self.from_inst_index.next())
            .expect("No more replies were expected from instrument to host.")
            .clone();
        reply.extend_from_slice(self.terminator_exp.as_bytes());
        reply
    }

    /// Function to read exactly one byte from the next reply of the instrument.
    ///
    /// This just panics if there are no more replies. If there are no more replies but one is
    /// required, the panic is justified as this is a test interface.
    fn read_one_byte(&mut self) -> u8 {
        match self.curr_bytes.pop_front() {
            Some(byte) => byte,
            None => {
                self.curr_bytes = self.get_next_from_inst_with_terminator().into();
                self.read_one_byte()
            }
        }
    }
}

impl InstrumentInterface for LoopbackInterface {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), LinkError> {
        for byte in buf.iter_mut() {
            *byte = self.read_one_byte();
        }
        Ok(())
    }

    fn write_raw(&mut self, cmd: &[u8]) -> Result<(), LinkError> {
        let exp = self.get_next_from_host_with_terminator();
        assert_eq!(
            exp.as_bytes(),
            cmd,
            "Expected command {exp:?}, got {:?}",
            String::from_utf8_lossy(cmd)
        );
        Ok(())
    }

    fn get_terminator(&self) -> &str {
        self.terminator.as_str()
    }

    fn set_terminator(&mut self, terminator: &str) {
        self.terminator = terminator.to_string();
    }
}

impl Drop for LoopbackInterface {
    fn drop(&mut self) {
        // a second panic while unwinding would abort the test binary
        if !std::thread::panicking() {
            self.finalize();
        }
    }
}

// Tests of internal functionality
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incrementing_index() {
        let mut idx = IncrIndex::default();
        assert_eq!(0, idx.next());
        assert_eq!(1, idx.next());
        assert_eq!(2, idx.next());
    }
}
