//! Test cases for the LoopbackInterface.

use rstest::*;

use scpi_link::{InstrumentInterface, LoopbackInterface};

/// A function that creates a new `LoopbackInterface` with the default terminator.
fn crt_lbk(input: Vec<&str>, output: Vec<&str>) -> LoopbackInterface {
    LoopbackInterface::new(input, output, "\n")
}

/// Create a loopback interface that contains no commands.
#[fixture]
fn emp_lbk() -> LoopbackInterface {
    crt_lbk(vec![], vec![])
}

/// Ensure `finalize` method passes if an empty loopback interface is used.
#[rstest]
fn finalize_test(mut emp_lbk: LoopbackInterface) {
    emp_lbk.finalize();
}

/// Ensure `finalize` method panics if commands are left in the loopback interface.
#[rstest]
#[case(vec!["cmd"], vec![])]
#[case(vec![], vec!["resp"])]
#[case(vec!["cmd"], vec!["resp"])]
#[should_panic]
fn finalize_test_panic(#[case] from_host: Vec<&str>, #[case] from_inst: Vec<&str>) {
    let _ = crt_lbk(from_host, from_inst);
}

#[rstest]
fn send() {
    let mut lbk = crt_lbk(vec!["cmd1", "cmd2"], vec![]);
    lbk.send("cmd1").unwrap();
    lbk.send("cmd2").unwrap();
}

#[rstest]
#[should_panic]
fn send_mismatch() {
    let mut lbk = crt_lbk(vec!["cmd1"], vec![]);
    let _ = lbk.send("cmd3");
}

#[rstest]
fn terminator(mut emp_lbk: LoopbackInterface) {
    emp_lbk.test_terminator("\n");
    emp_lbk.set_terminator("\r\n");
    emp_lbk.test_terminator("\r\n");
}

#[rstest]
#[should_panic]
fn terminator_wrong(emp_lbk: LoopbackInterface) {
    emp_lbk.test_terminator("\r\n");
}

#[rstest]
fn request() {
    let mut lbk = crt_lbk(vec!["cmd1?", "cmd2?"], vec!["resp1", "resp2"]);
    assert_eq!(lbk.request("cmd1?").unwrap(), b"resp1");
    assert_eq!(lbk.request("cmd2?").unwrap(), b"resp2");
}

/// An empty reply consists of the terminator only.
#[rstest]
fn request_empty_reply() {
    let mut lbk = crt_lbk(vec!["cmd?"], vec![""]);
    assert!(lbk.request("cmd?").unwrap().is_empty());
}

/// Binary blocks are read by their length, even if the payload contains the terminator.
#[rstest]
fn request_block_with_terminator_in_payload() {
    let block = b"#15a\nb\nc".to_vec();
    let mut lbk = LoopbackInterface::new(vec![":WAVEFORM:DATA?"], vec![block.clone()], "\n");
    assert_eq!(lbk.request(":WAVEFORM:DATA?").unwrap(), block);
}

/// A payload whose last byte equals the terminator still needs the real terminator.
#[rstest]
fn request_block_ending_in_terminator() {
    let block = b"#12\x01\n".to_vec();
    let mut lbk = LoopbackInterface::new(vec!["DATA?", "NEXT?"], vec![block.clone(), b"1".to_vec()], "\n");
    assert_eq!(lbk.request("DATA?").unwrap(), block);
    assert_eq!(lbk.request("NEXT?").unwrap(), b"1");
}

/// A block with a broken header is returned as is, up to the terminator.
#[rstest]
#[case(b"#X12".to_vec())]
#[case(b"#0abc".to_vec())]
#[case(b"#2x1".to_vec())]
#[case(b"#9999999999".to_vec())]
fn request_block_broken_header(#[case] reply: Vec<u8>) {
    let mut lbk = LoopbackInterface::new(vec!["DATA?"], vec![reply.clone()], "\n");
    assert_eq!(lbk.request("DATA?").unwrap(), reply);
}

#[rstest]
fn multi_character_terminator() {
    let mut lbk = LoopbackInterface::new(vec!["cmd?"], vec!["a\rb"], "\r\n");
    lbk.set_terminator("\r\n");
    assert_eq!(lbk.request("cmd?").unwrap(), b"a\rb");
}
