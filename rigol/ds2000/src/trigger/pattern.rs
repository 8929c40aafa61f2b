//! Pattern trigger.

use measurements::Voltage;
use scpi_link::InstrumentInterface;

use super::{ChannelSource, ModeScope, TriggerMode, mode_selection};
use crate::{
    client::ProtocolClient,
    codec,
    command::{Argument, Command},
    error::Ds2000Error,
    mnemonic::mnemonic_enum,
    setting::SettingValue,
};

mnemonic_enum! {
    /// State of one channel in a trigger pattern.
    pub enum PatternValue {
        /// Above the channel level.
        High => "H",
        /// Below the channel level.
        Low => "L",
        /// Any state.
        DontCare => "X",
        /// Rising edge.
        Rising => "R",
        /// Falling edge.
        Falling => "F",
    }
}

const PATTERN: [&str; 3] = ["TRIGGER", "PATTERN", "PATTERN"];
const LEVEL: [&str; 3] = ["TRIGGER", "PATTERN", "LEVEL"];

/// Split a comma separated pattern reply such as `H,L` into its values.
pub(crate) fn decode_pattern(raw: &[u8]) -> Result<Vec<PatternValue>, Ds2000Error> {
    codec::decode_text(raw)?
        .split(',')
        .map(|value| PatternValue::from_reply(value.as_bytes()))
        .collect()
}

/// Turn a pattern into a comma separated argument.
pub(crate) fn pattern_argument(pattern: &[PatternValue]) -> Argument {
    Argument::List(pattern.iter().map(SettingValue::to_argument).collect())
}

/// Settings of the pattern trigger, `:TRIGGER:PATTERN`.
#[derive(Debug)]
pub struct PatternTrigger<T: InstrumentInterface> {
    scope: ModeScope<T>,
}

impl<T: InstrumentInterface> PatternTrigger<T> {
    pub(crate) fn new(client: ProtocolClient<T>) -> Self {
        Self {
            scope: ModeScope::new(client, TriggerMode::Pattern),
        }
    }

    /// Get the pattern of channel 1, channel 2 and, if present, the external input.
    pub fn get_pattern(&self) -> Result<Vec<PatternValue>, Ds2000Error> {
        let command = Command::query(PATTERN);
        let reply = self.scope.query_raw(&command)?;
        decode_pattern(&reply).map_err(|e| e.in_reply_to(&command.encode()))
    }

    /// Set the pattern of channel 1 and channel 2. Only one of them may be an edge.
    pub fn set_pattern(&self, ch1: PatternValue, ch2: PatternValue) -> Result<(), Ds2000Error> {
        let is_edge = |value: PatternValue| {
            matches!(value, PatternValue::Rising | PatternValue::Falling)
        };
        if is_edge(ch1) && is_edge(ch2) {
            return Err(Ds2000Error::InvalidArgument(
                "Only one channel of a trigger pattern can be an edge.".to_string(),
            ));
        }
        self.scope
            .send(&Command::set(PATTERN, pattern_argument(&[ch1, ch2])))
    }

    /// Get the trigger level of the given channel.
    pub fn get_level(&self, channel: ChannelSource) -> Result<Voltage, Ds2000Error> {
        self.scope
            .query(&Command::query_with(LEVEL, channel.to_argument()))
    }

    /// Set the trigger level of the given channel.
    pub fn set_level(&self, channel: ChannelSource, level: Voltage) -> Result<(), Ds2000Error> {
        let argument = Argument::List(vec![channel.to_argument(), level.to_argument()]);
        self.scope.send(&Command::set(LEVEL, argument))
    }
}

mode_selection!(PatternTrigger);
