//! Typed accessors for instrument settings.
//!
//! Most settings of the DS2000 are plain `:PATH value` / `:PATH?` pairs. A [`Setting`] describes
//! such a pair once, together with the Rust type of its value, so that the subsystems only need
//! to name their settings instead of writing the same query/decode code over and over.

use std::{marker::PhantomData, time::Duration};

use measurements::{Frequency, Voltage};
use scpi_link::InstrumentInterface;

use crate::{
    client::ProtocolClient,
    codec,
    command::{Argument, BoolStyle, Command},
    error::Ds2000Error,
};

/// A value that can be sent as an argument and decoded from a reply.
pub trait SettingValue: Sized {
    /// Convert the value into a command argument.
    fn to_argument(&self) -> Argument;

    /// Decode the value from a raw reply, without terminator.
    fn from_reply(raw: &[u8]) -> Result<Self, Ds2000Error>;
}

impl SettingValue for f64 {
    fn to_argument(&self) -> Argument {
        Argument::Number(*self)
    }

    fn from_reply(raw: &[u8]) -> Result<Self, Ds2000Error> {
        codec::decode_scalar(raw)
    }
}

impl SettingValue for i64 {
    fn to_argument(&self) -> Argument {
        Argument::Integer(*self)
    }

    fn from_reply(raw: &[u8]) -> Result<Self, Ds2000Error> {
        codec::decode_integer(raw)
    }
}

impl SettingValue for u32 {
    fn to_argument(&self) -> Argument {
        Argument::Integer(i64::from(*self))
    }

    fn from_reply(raw: &[u8]) -> Result<Self, Ds2000Error> {
        let value = codec::decode_integer(raw)?;
        u32::try_from(value).map_err(|_| Ds2000Error::MalformedReply {
            command: String::new(),
            reply: value.to_string(),
        })
    }
}

/// Booleans are sent as `1`/`0`.
impl SettingValue for bool {
    fn to_argument(&self) -> Argument {
        Argument::Bool(*self, BoolStyle::Numeric)
    }

    fn from_reply(raw: &[u8]) -> Result<Self, Ds2000Error> {
        codec::decode_bool(raw)
    }
}

/// A boolean that is sent as `ON`/`OFF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnOff(pub bool);

impl From<bool> for OnOff {
    fn from(value: bool) -> Self {
        OnOff(value)
    }
}

impl From<OnOff> for bool {
    fn from(value: OnOff) -> Self {
        value.0
    }
}

impl SettingValue for OnOff {
    fn to_argument(&self) -> Argument {
        Argument::Bool(self.0, BoolStyle::OnOff)
    }

    fn from_reply(raw: &[u8]) -> Result<Self, Ds2000Error> {
        codec::decode_bool(raw).map(OnOff)
    }
}

impl SettingValue for Voltage {
    fn to_argument(&self) -> Argument {
        Argument::Number(self.as_volts())
    }

    fn from_reply(raw: &[u8]) -> Result<Self, Ds2000Error> {
        codec::decode_scalar(raw).map(Voltage::from_volts)
    }
}

impl SettingValue for Frequency {
    fn to_argument(&self) -> Argument {
        Argument::Number(self.as_hertz())
    }

    fn from_reply(raw: &[u8]) -> Result<Self, Ds2000Error> {
        codec::decode_scalar(raw).map(Frequency::from_hertz)
    }
}

/// Durations are sent in seconds. Negative replies cannot be represented and are malformed.
impl SettingValue for Duration {
    fn to_argument(&self) -> Argument {
        Argument::Number(self.as_secs_f64())
    }

    fn from_reply(raw: &[u8]) -> Result<Self, Ds2000Error> {
        let secs = codec::decode_scalar(raw)?;
        Duration::try_from_secs_f64(secs).map_err(|_| Ds2000Error::MalformedReply {
            command: String::new(),
            reply: String::from_utf8_lossy(raw).to_string(),
        })
    }
}

/// A setting at a fixed mnemonic path with a value of type `V`.
///
/// The path is relative to a scope that is given when the setting is accessed, e.g., the
/// `CHANNEL1` node for channel settings. Settings of the root tree use an empty scope.
#[derive(Debug)]
pub struct Setting<V> {
    path: &'static [&'static str],
    value: PhantomData<fn() -> V>,
}

impl<V> Clone for Setting<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Setting<V> {}

impl<V: SettingValue> Setting<V> {
    /// Define a setting at the given path.
    pub const fn new(path: &'static [&'static str]) -> Self {
        Self {
            path,
            value: PhantomData,
        }
    }

    /// The path of the setting relative to its scope.
    pub fn path(&self) -> &'static [&'static str] {
        self.path
    }

    fn full_path(&self, scope: &[&str]) -> Vec<String> {
        scope
            .iter()
            .chain(self.path.iter())
            .map(|token| token.to_string())
            .collect()
    }

    /// The command that queries the setting.
    pub fn query_command(&self, scope: &[&str]) -> Command {
        Command::query(self.full_path(scope))
    }

    /// The command that sets the setting to `value`.
    pub fn set_command(&self, scope: &[&str], value: &V) -> Command {
        Command::set(self.full_path(scope), value.to_argument())
    }

    /// Query the setting from the instrument.
    pub fn get<T: InstrumentInterface>(
        &self,
        client: &ProtocolClient<T>,
        scope: &[&str],
    ) -> Result<V, Ds2000Error> {
        client.query_value(&self.query_command(scope))
    }

    /// Set the setting on the instrument.
    pub fn set<T: InstrumentInterface>(
        &self,
        client: &ProtocolClient<T>,
        scope: &[&str],
        value: V,
    ) -> Result<(), Ds2000Error> {
        client.set(&self.set_command(scope, &value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use measurements::test_utils::assert_almost_eq;
    use rstest::*;

    const SCALE: Setting<f64> = Setting::new(&["SCALE"]);

    #[test]
    fn test_commands_in_scope() {
        assert_eq!(
            SCALE.query_command(&["CHANNEL1"]).encode(),
            ":CHANNEL1:SCALE?"
        );
        assert_eq!(
            SCALE.set_command(&["CHANNEL2"], &0.2).encode(),
            ":CHANNEL2:SCALE 2.000000e-01"
        );
        assert_eq!(SCALE.query_command(&[]).encode(), ":SCALE?");
    }

    #[rstest]
    #[case(true, "ON")]
    #[case(false, "OFF")]
    fn test_on_off(#[case] value: bool, #[case] exp: &str) {
        assert_eq!(OnOff(value).to_argument().encode(), exp);
        assert_eq!(OnOff::from_reply(exp.as_bytes()).unwrap(), OnOff(value));
    }

    #[test]
    fn test_bool_numeric() {
        assert_eq!(true.to_argument().encode(), "1");
        assert!(!bool::from_reply(b"0").unwrap());
    }

    #[test]
    fn test_voltage() {
        let volt = Voltage::from_reply(b"8.000000e-02").unwrap();
        assert_almost_eq(volt.as_volts(), 0.08);
        assert_eq!(
            Voltage::from_millivolts(500.0).to_argument().encode(),
            "5.000000e-01"
        );
    }

    #[test]
    fn test_duration() {
        let dur = Duration::from_reply(b"1.000000e-06").unwrap();
        assert!((dur.as_secs_f64() - 1.0e-6).abs() < 1.0e-12);
        assert!(matches!(
            Duration::from_reply(b"-1.0e-06"),
            Err(Ds2000Error::MalformedReply { .. })
        ));
    }

    #[test]
    fn test_u32_negative() {
        assert!(u32::from_reply(b"-1").is_err());
        assert_eq!(u32::from_reply(b"1400").unwrap(), 1400);
    }
}
