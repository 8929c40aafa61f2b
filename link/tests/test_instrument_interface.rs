//! Tests for the default implementation of the [`InstrumentInterface`] trait.

use std::time::Duration;

use rstest::*;

use scpi_link::{InstrumentInterface, LinkError};

/// An interface that only implements the required methods and records what is written.
struct TestInterface {
    written: Vec<u8>,
}

impl InstrumentInterface for TestInterface {
    fn read_exact(&mut self, _buf: &mut [u8]) -> Result<(), LinkError> {
        Err(LinkError::InterfaceCommandNotSupported)
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<(), LinkError> {
        self.written.extend_from_slice(data);
        Ok(())
    }
}

#[fixture]
fn intf() -> TestInterface {
    TestInterface { written: vec![] }
}

#[rstest]
fn test_default_get_terminator(intf: TestInterface) {
    assert_eq!(intf.get_terminator(), "\n");
}

#[rstest]
fn test_default_get_timeout(intf: TestInterface) {
    assert_eq!(intf.get_timeout(), Duration::from_secs(3));
}

/// The default terminator cannot be changed and is appended to every command.
#[rstest]
fn test_default_send(mut intf: TestInterface) {
    intf.set_terminator("\r\n");
    intf.send("*RST").unwrap();
    assert_eq!(intf.written, b"*RST\n");
}

#[rstest]
fn test_default_read_error_propagates(mut intf: TestInterface) {
    assert!(matches!(
        intf.request("*IDN?"),
        Err(LinkError::InterfaceCommandNotSupported)
    ));
}
