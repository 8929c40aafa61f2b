//! Runt trigger.

use std::time::Duration;

use measurements::Voltage;
use scpi_link::InstrumentInterface;

use super::{ChannelSource, ModeScope, Polarity, TriggerMode, check_time, mode_selection};
use crate::{
    client::ProtocolClient, error::Ds2000Error, mnemonic::mnemonic_enum, setting::Setting,
};

mnemonic_enum! {
    /// Width condition of the runt trigger.
    pub enum RuntCondition {
        /// Trigger on every runt pulse.
        None => "NONE",
        /// Runt wider than the lower limit.
        Greater => "GREATER" | "GRE",
        /// Runt narrower than the upper limit.
        Less => "LESS",
        /// Runt width between the limits.
        Between => "GLESS" | "GLES",
    }
}

const SOURCE: Setting<ChannelSource> = Setting::new(&["TRIGGER", "RUNT", "SOURCE"]);
const POLARITY: Setting<Polarity> = Setting::new(&["TRIGGER", "RUNT", "POLARITY"]);
const WHEN: Setting<RuntCondition> = Setting::new(&["TRIGGER", "RUNT", "WHEN"]);
const UPPER_WIDTH: Setting<Duration> = Setting::new(&["TRIGGER", "RUNT", "WUPPER"]);
const LOWER_WIDTH: Setting<Duration> = Setting::new(&["TRIGGER", "RUNT", "WLOWER"]);
const UPPER_LEVEL: Setting<Voltage> = Setting::new(&["TRIGGER", "RUNT", "ALEVEL"]);
const LOWER_LEVEL: Setting<Voltage> = Setting::new(&["TRIGGER", "RUNT", "BLEVEL"]);

/// Settings of the runt trigger, `:TRIGGER:RUNT`.
///
/// A runt pulse crosses one of the two thresholds but not the other.
#[derive(Debug)]
pub struct RuntTrigger<T: InstrumentInterface> {
    scope: ModeScope<T>,
}

impl<T: InstrumentInterface> RuntTrigger<T> {
    pub(crate) fn new(client: ProtocolClient<T>) -> Self {
        Self {
            scope: ModeScope::new(client, TriggerMode::Runt),
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

    /// Get the polarity of the runt pulse.
    pub fn get_polarity(&self) -> Result<Polarity, Ds2000Error> {
        self.scope.get(&POLARITY)
    }

    /// Set the polarity of the runt pulse.
    pub fn set_polarity(&self, polarity: Polarity) -> Result<(), Ds2000Error> {
        self.scope.set(&POLARITY, polarity)
    }

    /// Get the width condition.
    pub fn get_when(&self) -> Result<RuntCondition, Ds2000Error> {
        self.scope.get(&WHEN)
    }

    /// Set the width condition.
    pub fn set_when(&self, when: RuntCondition) -> Result<(), Ds2000Error> {
        self.scope.set(&WHEN, when)
    }

    /// Get the upper width limit.
    pub fn get_upper_width(&self) -> Result<Duration, Ds2000Error> {
        self.scope.get(&UPPER_WIDTH)
    }

    /// Set the upper width limit, from 2 ns to 4 s.
    pub fn set_upper_width(&self, width: Duration) -> Result<(), Ds2000Error> {
        check_time(width, 2e-9, 4.0)?;
        self.scope.set(&UPPER_WIDTH, width)
    }

    /// Get the lower width limit.
    pub fn get_lower_width(&self) -> Result<Duration, Ds2000Error> {
        self.scope.get(&LOWER_WIDTH)
    }

    /// Set the lower width limit, from 2 ns to 4 s.
    pub fn set_lower_width(&self, width: Duration) -> Result<(), Ds2000Error> {
        check_time(width, 2e-9, 4.0)?;
        self.scope.set(&LOWER_WIDTH, width)
    }

    /// Get the upper threshold.
    pub fn get_upper_level(&self) -> Result<Voltage, Ds2000Error> {
        self.scope.get(&UPPER_LEVEL)
    }

    /// Set the upper threshold.
    pub fn set_upper_level(&self, level: Voltage) -> Result<(), Ds2000Error> {
        self.scope.set(&UPPER_LEVEL, level)
    }

    /// Get the lower threshold.
    pub fn get_lower_level(&self) -> Result<Voltage, Ds2000Error> {
        self.scope.get(&LOWER_LEVEL)
    }

    /// Set the lower threshold.
    pub fn set_lower_level(&self, level: Voltage) -> Result<(), Ds2000Error> {
        self.scope.set(&LOWER_LEVEL, level)
    }
}

mode_selection!(RuntTrigger);
