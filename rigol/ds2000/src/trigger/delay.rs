//! Delay trigger.

use std::time::Duration;

use scpi_link::InstrumentInterface;

use super::{ChannelSource, ModeScope, Polarity, TriggerMode, check_time, mode_selection};
use crate::{
    client::ProtocolClient, error::Ds2000Error, mnemonic::mnemonic_enum, setting::Setting,
};

mnemonic_enum! {
    /// Delay condition between the edges of source A and source B.
    pub enum DelayCondition {
        /// Delay longer than the lower limit.
        Greater => "GREATER" | "GRE",
        /// Delay shorter than the upper limit.
        Less => "LESS",
        /// Delay between the limits.
        Between => "GLESS" | "GLES",
        /// Delay outside the limits.
        Outside => "GOUT",
    }
}

const SOURCE_A: Setting<ChannelSource> = Setting::new(&["TRIGGER", "DELAY", "SA"]);
const SOURCE_B: Setting<ChannelSource> = Setting::new(&["TRIGGER", "DELAY", "SB"]);
const SLOPE_A: Setting<Polarity> = Setting::new(&["TRIGGER", "DELAY", "SLOPA"]);
const SLOPE_B: Setting<Polarity> = Setting::new(&["TRIGGER", "DELAY", "SLOPB"]);
const TYPE: Setting<DelayCondition> = Setting::new(&["TRIGGER", "DELAY", "TYPE"]);
const UPPER_TIME: Setting<Duration> = Setting::new(&["TRIGGER", "DELAY", "TUPPER"]);
const LOWER_TIME: Setting<Duration> = Setting::new(&["TRIGGER", "DELAY", "TLOWER"]);

/// Settings of the delay trigger, `:TRIGGER:DELAY`.
///
/// Triggers when the time between an edge of source A and the following edge of source B
/// matches the delay condition.
#[derive(Debug)]
pub struct DelayTrigger<T: InstrumentInterface> {
    scope: ModeScope<T>,
}

impl<T: InstrumentInterface> DelayTrigger<T> {
    pub(crate) fn new(client: ProtocolClient<T>) -> Self {
        Self {
            scope: ModeScope::new(client, TriggerMode::Delay),
        }
    }

    /// Get source A.
    pub fn get_source_a(&self) -> Result<ChannelSource, Ds2000Error> {
        self.scope.get(&SOURCE_A)
    }

    /// Set source A.
    pub fn set_source_a(&self, source: ChannelSource) -> Result<(), Ds2000Error> {
        self.scope.set(&SOURCE_A, source)
    }

    /// Get source B.
    pub fn get_source_b(&self) -> Result<ChannelSource, Ds2000Error> {
        self.scope.get(&SOURCE_B)
    }

    /// Set source B.
    pub fn set_source_b(&self, source: ChannelSource) -> Result<(), Ds2000Error> {
        self.scope.set(&SOURCE_B, source)
    }

    /// Get the edge of source A.
    pub fn get_slope_a(&self) -> Result<Polarity, Ds2000Error> {
        self.scope.get(&SLOPE_A)
    }

    /// Set the edge of source A.
    pub fn set_slope_a(&self, slope: Polarity) -> Result<(), Ds2000Error> {
        self.scope.set(&SLOPE_A, slope)
    }

    /// Get the edge of source B.
    pub fn get_slope_b(&self) -> Result<Polarity, Ds2000Error> {
        self.scope.get(&SLOPE_B)
    }

    /// Set the edge of source B.
    pub fn set_slope_b(&self, slope: Polarity) -> Result<(), Ds2000Error> {
        self.scope.set(&SLOPE_B, slope)
    }

    /// Get the delay condition.
    pub fn get_condition(&self) -> Result<DelayCondition, Ds2000Error> {
        self.scope.get(&TYPE)
    }

    /// Set the delay condition.
    pub fn set_condition(&self, condition: DelayCondition) -> Result<(), Ds2000Error> {
        self.scope.set(&TYPE, condition)
    }

    /// Get the upper delay limit.
    pub fn get_upper_time(&self) -> Result<Duration, Ds2000Error> {
        self.scope.get(&UPPER_TIME)
    }

    /// Set the upper delay limit, from 2 ns to 4 s.
    pub fn set_upper_time(&self, time: Duration) -> Result<(), Ds2000Error> {
        check_time(time, 2e-9, 4.0)?;
        self.scope.set(&UPPER_TIME, time)
    }

    /// Get the lower delay limit.
    pub fn get_lower_time(&self) -> Result<Duration, Ds2000Error> {
        self.scope.get(&LOWER_TIME)
    }

    /// Set the lower delay limit, from 2 ns to 3.99 s.
    pub fn set_lower_time(&self, time: Duration) -> Result<(), Ds2000Error> {
        check_time(time, 2e-9, 3.99)?;
        self.scope.set(&LOWER_TIME, time)
    }
}

mode_selection!(DelayTrigger);
