//! Duration trigger.

use std::time::Duration;

use scpi_link::InstrumentInterface;

use super::{
    ChannelSource, ModeScope, TimeCondition, TriggerMode, check_time, mode_selection,
    pattern::{PatternValue, decode_pattern, pattern_argument},
};
use crate::{
    client::ProtocolClient,
    command::Command,
    error::Ds2000Error,
    setting::Setting,
};

const SOURCE: Setting<ChannelSource> = Setting::new(&["TRIGGER", "DURATION", "SOURCE"]);
const TYPE: [&str; 3] = ["TRIGGER", "DURATION", "TYPE"];
const WHEN: Setting<TimeCondition> = Setting::new(&["TRIGGER", "DURATION", "WHEN"]);
const UPPER_TIME: Setting<Duration> = Setting::new(&["TRIGGER", "DURATION", "TUPPER"]);
const LOWER_TIME: Setting<Duration> = Setting::new(&["TRIGGER", "DURATION", "TLOWER"]);

/// Settings of the duration trigger, `:TRIGGER:DURATION`.
///
/// Triggers when a channel pattern lasts for a duration that matches the condition.
#[derive(Debug)]
pub struct DurationTrigger<T: InstrumentInterface> {
    scope: ModeScope<T>,
}

impl<T: InstrumentInterface> DurationTrigger<T> {
    pub(crate) fn new(client: ProtocolClient<T>) -> Self {
        Self {
            scope: ModeScope::new(client, TriggerMode::Duration),
        }
    }

    /// Get the trigger source.
    pub fn get_source(&self) -> Result<ChannelSource, Ds2000Error> {
        self.scope.get(&SOURCE)
    }

    /// Set the trigger source.
    pub fn set_source(&self, source: ChannelSource) -> Result<(), Ds2000Error> {
        self.scope.set(&SOURCE, source)
    }

    /// Get the pattern of channel 1 and channel 2.
    pub fn get_pattern(&self) -> Result<Vec<PatternValue>, Ds2000Error> {
        let command = Command::query(TYPE);
        let reply = self.scope.query_raw(&command)?;
        decode_pattern(&reply).map_err(|e| e.in_reply_to(&command.encode()))
    }

    /// Set the pattern of channel 1 and channel 2. Edges are not allowed here.
    pub fn set_pattern(&self, ch1: PatternValue, ch2: PatternValue) -> Result<(), Ds2000Error> {
        for value in [ch1, ch2] {
            if matches!(value, PatternValue::Rising | PatternValue::Falling) {
                return Err(Ds2000Error::InvalidArgument(format!(
                    "Pattern value {value} is not allowed in a duration trigger."
                )));
            }
        }
        self.scope
            .send(&Command::set(TYPE, pattern_argument(&[ch1, ch2])))
    }

    /// Get the duration condition.
    pub fn get_when(&self) -> Result<TimeCondition, Ds2000Error> {
        self.scope.get(&WHEN)
    }

    /// Set the duration condition.
    pub fn set_when(&self, when: TimeCondition) -> Result<(), Ds2000Error> {
        self.scope.set(&WHEN, when)
    }

    /// Get the upper duration limit.
    pub fn get_upper_time(&self) -> Result<Duration, Ds2000Error> {
        self.scope.get(&UPPER_TIME)
    }

    /// Set the upper duration limit, from 2 ns to 4 s.
    pub fn set_upper_time(&self, time: Duration) -> Result<(), Ds2000Error> {
        check_time(time, 2e-9, 4.0)?;
        self.scope.set(&UPPER_TIME, time)
    }

    /// Get the lower duration limit.
    pub fn get_lower_time(&self) -> Result<Duration, Ds2000Error> {
        self.scope.get(&LOWER_TIME)
    }

    /// Set the lower duration limit, from 2 ns to 3.99 s.
    pub fn set_lower_time(&self, time: Duration) -> Result<(), Ds2000Error> {
        check_time(time, 2e-9, 3.99)?;
        self.scope.set(&LOWER_TIME, time)
    }
}

mode_selection!(DurationTrigger);
