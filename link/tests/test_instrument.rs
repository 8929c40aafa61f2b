//! Tests for the [`Instrument`] interface itself.
//!
//! Note that most of the functionality of the [`InstrumentInterface`] trait is tested in the
//! [`scpi_link::LoopbackInterface`] tests.

use std::{collections::VecDeque, time::Duration};

use rstest::*;

use scpi_link::{Instrument, InstrumentInterface, LinkError};

/// Set up a empty instrument with default 3 second timeout.
#[fixture]
fn empt_inst() -> Instrument<VecDeque<u8>> {
    Instrument::new(VecDeque::new(), Duration::from_secs(3))
}

/// Set up a instrument with no terminator and no timeout duration.
#[fixture]
fn no_term_inst() -> Instrument<VecDeque<u8>> {
    Instrument::new(
        VecDeque::from(vec![b'r', b'e', b's', b'p']),
        Duration::from_secs(0),
    )
}

#[rstest]
fn test_instrument_terminator(mut empt_inst: Instrument<VecDeque<u8>>) {
    assert_eq!(empt_inst.get_terminator(), "\n");

    empt_inst.set_terminator("\r\n");
    assert_eq!(empt_inst.get_terminator(), "\r\n");
}

#[rstest]
fn test_instrument_timeout(empt_inst: Instrument<VecDeque<u8>>) {
    assert_eq!(empt_inst.get_timeout(), Duration::from_secs(3));
}

/// Writing to a `VecDeque` and reading back gives a simple echo instrument.
#[rstest]
fn test_instrument_echo(mut empt_inst: Instrument<VecDeque<u8>>) {
    empt_inst.send(":ACQUIRE:TYPE?").unwrap();
    assert_eq!(empt_inst.read_reply().unwrap(), b":ACQUIRE:TYPE?");
    assert!(empt_inst.into_inner().is_empty());
}

#[rstest]
fn test_instrument_echo_block(mut empt_inst: Instrument<VecDeque<u8>>) {
    empt_inst.write_raw(b"#203\n\n\n\n").unwrap();
    assert_eq!(empt_inst.read_reply().unwrap(), b"#203\n\n\n");
}

#[rstest]
fn test_instrument_read_until_terminator_timeout(mut no_term_inst: Instrument<VecDeque<u8>>) {
    match no_term_inst.read_until_terminator() {
        Err(LinkError::Timeout(timeout)) => assert_eq!(Duration::from_secs(0), timeout),
        _ => panic!("Expected timeout error, but got a different result."),
    }
}

#[rstest]
fn test_instrument_request_timeout(mut no_term_inst: Instrument<VecDeque<u8>>) {
    let query_exp = "QUERY?";

    match no_term_inst.request(query_exp) {
        Err(err @ LinkError::TimeoutQuery { .. }) => {
            assert!(err.is_timeout());
            if let LinkError::TimeoutQuery { query, timeout } = err {
                assert_eq!(query_exp, query);
                assert_eq!(Duration::from_secs(0), timeout);
            }
        }
        _ => panic!("Expected timeout error, but got a different result."),
    }
}

/// Running out of bytes is an I/O error, not a timeout.
#[rstest]
fn test_instrument_eof(mut empt_inst: Instrument<VecDeque<u8>>) {
    let err = empt_inst.read_reply().unwrap_err();
    assert!(matches!(err, LinkError::Io(_)));
    assert!(!err.is_timeout());
}
