//! Encoding of command lines and decoding of replies.
//!
//! All functions in here are pure: they only look at the bytes they are given. Replies are
//! expected without terminator, as returned by [`scpi_link::InstrumentInterface::read_reply`].
//! Decoding errors carry an empty command, which the caller fills in.

use crate::{
    command::{Argument, Operation},
    error::Ds2000Error,
};

/// Serialize a command into the line that is written to the instrument.
///
/// Tokens are joined by `:` and prefixed by a leading `:`, except for IEEE 488.2 common commands
/// that start with `*`. Queries end with `?`. The argument, if any, follows after a single space.
///
/// ```
/// use rigol_ds2000::{codec, Argument, Operation};
///
/// let line = codec::encode(&["CHANNEL1", "SCALE"], Operation::Set, Some(&Argument::Number(0.5)));
/// assert_eq!(line, ":CHANNEL1:SCALE 5.000000e-01");
/// assert_eq!(codec::encode(&["*IDN"], Operation::Query, None), "*IDN?");
/// ```
pub fn encode<S: AsRef<str>>(
    path: &[S],
    operation: Operation,
    argument: Option<&Argument>,
) -> String {
    let mut line = String::new();
    for (it, token) in path.iter().enumerate() {
        let token = token.as_ref();
        if !(it == 0 && token.starts_with('*')) {
            line.push(':');
        }
        line.push_str(token);
    }
    if operation == Operation::Query {
        line.push('?');
    }
    if let Some(argument) = argument {
        line.push(' ');
        line.push_str(&argument.encode());
    }
    line
}

/// Format a real number in scientific notation with seven significant digits and a signed,
/// two digit exponent, e.g., `1.000000e+00` or `-2.500000e-07`.
///
/// Non-finite values are written as they are and will be rejected by the instrument.
pub fn encode_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let formatted = format!("{value:.6e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or_default();
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exponent.abs())
        }
        None => formatted,
    }
}

fn malformed(raw: &[u8]) -> Ds2000Error {
    Ds2000Error::MalformedReply {
        command: String::new(),
        reply: String::from_utf8_lossy(raw).to_string(),
    }
}

/// Decode a reply as text with surrounding whitespace removed.
pub fn decode_text(raw: &[u8]) -> Result<&str, Ds2000Error> {
    std::str::from_utf8(raw.trim_ascii()).map_err(|_| malformed(raw))
}

/// Decode a reply as a real number, e.g., `1.000000e+00`.
pub fn decode_scalar(raw: &[u8]) -> Result<f64, Ds2000Error> {
    decode_text(raw)?.parse::<f64>().map_err(|_| malformed(raw))
}

/// Decode a reply as an integer.
///
/// Some integer settings are returned in scientific notation, e.g., `1.400000e+07` for a memory
/// depth. These are accepted as long as they denote a whole number.
pub fn decode_integer(raw: &[u8]) -> Result<i64, Ds2000Error> {
    let text = decode_text(raw)?;
    if let Ok(value) = text.parse::<i64>() {
        return Ok(value);
    }
    match text.parse::<f64>() {
        Ok(value) if value.fract() == 0.0 && value.abs() < 9.0e18 => Ok(value as i64),
        _ => Err(malformed(raw)),
    }
}

/// Decode a boolean reply. The instrument answers `1`/`0`, `ON`/`OFF` is accepted as well.
pub fn decode_bool(raw: &[u8]) -> Result<bool, Ds2000Error> {
    let text = decode_text(raw)?;
    match text.to_ascii_uppercase().as_str() {
        "1" | "ON" => Ok(true),
        "0" | "OFF" => Ok(false),
        _ => Err(Ds2000Error::UnexpectedValue {
            value: text.to_string(),
            allowed: ["1", "0", "ON", "OFF"].iter().map(|s| s.to_string()).collect(),
        }),
    }
}

/// Decode a mnemonic reply and check that it is one of the allowed values.
///
/// The comparison ignores ASCII case. The matching entry of `allowed` is returned.
pub fn decode_enum<'a>(raw: &[u8], allowed: &[&'a str]) -> Result<&'a str, Ds2000Error> {
    let text = decode_text(raw)?;
    allowed
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(text))
        .copied()
        .ok_or_else(|| Ds2000Error::UnexpectedValue {
            value: text.to_string(),
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        })
}

/// Decode an IEEE 488.2 definite length block `#<n><len><payload>` and return the payload.
///
/// `n` is a single digit from 1 to 9 giving the number of digits of `len`. Exactly `len` bytes
/// after the header are returned, anything after them is ignored.
///
/// ```
/// use rigol_ds2000::codec::decode_block;
///
/// assert_eq!(decode_block(b"#15hello").unwrap(), b"hello");
/// assert!(decode_block(b"#0hello").is_err());
/// ```
pub fn decode_block(raw: &[u8]) -> Result<&[u8], Ds2000Error> {
    let header = |msg: &str| Ds2000Error::MalformedBlockHeader(msg.to_string());

    let raw = match raw.iter().position(|b| !b.is_ascii_whitespace()) {
        Some(start) => &raw[start..],
        None => return Err(header("empty reply")),
    };
    if raw[0] != b'#' {
        return Err(header("block does not start with '#'"));
    }
    let nof_digits = match raw.get(1) {
        Some(digit @ b'1'..=b'9') => usize::from(digit - b'0'),
        Some(_) => return Err(header("length digit count must be between 1 and 9")),
        None => return Err(header("block ends after '#'")),
    };
    let len_field = raw
        .get(2..2 + nof_digits)
        .ok_or_else(|| header("block ends within the length field"))?;
    let payload_len = std::str::from_utf8(len_field)
        .ok()
        .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| header("length field is not a decimal number"))?;

    let start = 2 + nof_digits;
    raw.get(start..start + payload_len).ok_or_else(|| {
        Ds2000Error::MalformedBlockHeader(format!(
            "header announces {payload_len} payload bytes, but only {} were received",
            raw.len() - start
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::BoolStyle;

    use rstest::*;

    #[rstest]
    #[case(1.0, "1.000000e+00")]
    #[case(0.5, "5.000000e-01")]
    #[case(-2.5e-7, "-2.500000e-07")]
    #[case(1.0e-10, "1.000000e-10")]
    #[case(2.0e9, "2.000000e+09")]
    #[case(0.0, "0.000000e+00")]
    #[case(123.456789, "1.234568e+02")]
    fn test_encode_number(#[case] value: f64, #[case] exp: &str) {
        assert_eq!(encode_number(value), exp);
    }

    #[rstest]
    #[case(1.0)]
    #[case(-3.3e-9)]
    #[case(0.123456789)]
    #[case(987654.321)]
    fn test_encoded_number_reads_back(#[case] value: f64) {
        let back = decode_scalar(encode_number(value).as_bytes()).unwrap();
        assert!(((back - value) / value).abs() <= 5e-7);
    }

    #[rstest]
    #[case(&["ACQUIRE", "TYPE"], Operation::Set, Some(Argument::Mnemonic("AVERAGES")), ":ACQUIRE:TYPE AVERAGES")]
    #[case(&["ACQUIRE", "TYPE"], Operation::Query, None, ":ACQUIRE:TYPE?")]
    #[case(&["RUN"], Operation::Set, None, ":RUN")]
    #[case(&["*RST"], Operation::Set, None, "*RST")]
    #[case(&["*ESE"], Operation::Set, Some(Argument::Integer(16)), "*ESE 16")]
    #[case(&["CHANNEL2", "DISPLAY"], Operation::Set, Some(Argument::Bool(true, BoolStyle::OnOff)), ":CHANNEL2:DISPLAY ON")]
    #[case(&["CHANNEL2", "INVERT"], Operation::Set, Some(Argument::Bool(false, BoolStyle::Numeric)), ":CHANNEL2:INVERT 0")]
    #[case(
        &["TRIGGER", "PATTERN", "LEVEL"],
        Operation::Set,
        Some(Argument::List(vec![Argument::Mnemonic("CHANNEL1"), Argument::Number(1.5)])),
        ":TRIGGER:PATTERN:LEVEL CHANNEL1,1.500000e+00"
    )]
    fn test_encode(
        #[case] path: &[&str],
        #[case] operation: Operation,
        #[case] argument: Option<Argument>,
        #[case] exp: &str,
    ) {
        assert_eq!(encode(path, operation, argument.as_ref()), exp);
    }

    #[rstest]
    #[case(b"1.000000e+00", 1.0)]
    #[case(b" -2.5e-3 ", -2.5e-3)]
    #[case(b"42", 42.0)]
    fn test_decode_scalar(#[case] raw: &[u8], #[case] exp: f64) {
        assert_eq!(decode_scalar(raw).unwrap(), exp);
    }

    #[rstest]
    #[case(b"")]
    #[case(b"abc")]
    #[case(b"1.0,2.0")]
    fn test_decode_scalar_malformed(#[case] raw: &[u8]) {
        let err = decode_scalar(raw).unwrap_err();
        assert!(matches!(err, Ds2000Error::MalformedReply { .. }));
    }

    #[rstest]
    #[case(b"16", 16)]
    #[case(b"-3", -3)]
    #[case(b"1.400000e+07", 14_000_000)]
    fn test_decode_integer(#[case] raw: &[u8], #[case] exp: i64) {
        assert_eq!(decode_integer(raw).unwrap(), exp);
    }

    #[test]
    fn test_decode_integer_fraction() {
        assert!(matches!(
            decode_integer(b"1.5"),
            Err(Ds2000Error::MalformedReply { .. })
        ));
    }

    #[rstest]
    #[case(b"1", true)]
    #[case(b"0", false)]
    #[case(b"ON", true)]
    #[case(b"off", false)]
    fn test_decode_bool(#[case] raw: &[u8], #[case] exp: bool) {
        assert_eq!(decode_bool(raw).unwrap(), exp);
    }

    #[test]
    fn test_decode_bool_unexpected() {
        let err = decode_bool(b"2").unwrap_err();
        assert!(matches!(err, Ds2000Error::UnexpectedValue { value, .. } if value == "2"));
    }

    #[test]
    fn test_decode_enum() {
        let allowed = ["NORMAL", "NORM", "AVERAGES", "AVER"];
        assert_eq!(decode_enum(b"AVER", &allowed).unwrap(), "AVER");
        assert_eq!(decode_enum(b"norm", &allowed).unwrap(), "NORM");

        let err = decode_enum(b"PEAK", &allowed).unwrap_err();
        match err {
            Ds2000Error::UnexpectedValue { value, allowed } => {
                assert_eq!(value, "PEAK");
                assert_eq!(allowed.len(), 4);
            }
            other => panic!("Unexpected error {other:?}"),
        }
    }

    #[rstest]
    #[case(b"#15hello", b"hello")]
    #[case(b"#15hello\n", b"hello")]
    #[case(b"#203\n\n\nrest", b"\n\n\n")]
    #[case(b"#10", b"")]
    #[case(b"#900000000412345678", b"1234")]
    fn test_decode_block(#[case] raw: &[u8], #[case] exp: &[u8]) {
        assert_eq!(decode_block(raw).unwrap(), exp);
    }

    #[rstest]
    #[case(b"")]
    #[case(b"15hello")]
    #[case(b"#")]
    #[case(b"#0hello")]
    #[case(b"#Xhello")]
    #[case(b"#3")]
    #[case(b"#2a5hello")]
    #[case(b"#210hello")]
    fn test_decode_block_malformed(#[case] raw: &[u8]) {
        assert!(matches!(
            decode_block(raw),
            Err(Ds2000Error::MalformedBlockHeader(_))
        ));
    }
}
