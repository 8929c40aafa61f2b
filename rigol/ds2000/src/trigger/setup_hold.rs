//! Setup/hold trigger.

use std::time::Duration;

use scpi_link::InstrumentInterface;

use super::{ChannelSource, ModeScope, Polarity, TriggerMode, check_time, mode_selection};
use crate::{
    client::ProtocolClient, error::Ds2000Error, mnemonic::mnemonic_enum, setting::Setting,
};

mnemonic_enum! {
    /// Which timing violation triggers.
    pub enum SetupHoldType {
        /// Setup time violation.
        Setup => "SETUP" | "SET",
        /// Hold time violation.
        Hold => "HOLD" | "HOL",
        /// Setup or hold time violation.
        SetupHold => "SETHOLD" | "SETHOL",
    }
}

mnemonic_enum! {
    /// Data level that is checked.
    pub enum DataPattern {
        /// High level.
        High => "H",
        /// Low level.
        Low => "L",
    }
}

const DATA_SOURCE: Setting<ChannelSource> = Setting::new(&["TRIGGER", "SHOLD", "DSRC"]);
const CLOCK_SOURCE: Setting<ChannelSource> = Setting::new(&["TRIGGER", "SHOLD", "CSRC"]);
const SLOPE: Setting<Polarity> = Setting::new(&["TRIGGER", "SHOLD", "SLOPE"]);
const PATTERN: Setting<DataPattern> = Setting::new(&["TRIGGER", "SHOLD", "PATTERN"]);
const TYPE: Setting<SetupHoldType> = Setting::new(&["TRIGGER", "SHOLD", "TYPE"]);
const SETUP_TIME: Setting<Duration> = Setting::new(&["TRIGGER", "SHOLD", "STIME"]);
const HOLD_TIME: Setting<Duration> = Setting::new(&["TRIGGER", "SHOLD", "HTIME"]);

/// Settings of the setup/hold trigger, `:TRIGGER:SHOLD`.
#[derive(Debug)]
pub struct SetupHoldTrigger<T: InstrumentInterface> {
    scope: ModeScope<T>,
}

impl<T: InstrumentInterface> SetupHoldTrigger<T> {
    pub(crate) fn new(client: ProtocolClient<T>) -> Self {
        Self {
            scope: ModeScope::new(client, TriggerMode::SetupHold),
        }
    }

    /// Get the data source.
    pub fn get_data_source(&self) -> Result<ChannelSource, Ds2000Error> {
        self.scope.get(&DATA_SOURCE)
    }

    /// Set the data source.
    pub fn set_data_source(&self, source: ChannelSource) -> Result<(), Ds2000Error> {
        self.scope.set(&DATA_SOURCE, source)
    }

    /// Get the clock source.
    pub fn get_clock_source(&self) -> Result<ChannelSource, Ds2000Error> {
        self.scope.get(&CLOCK_SOURCE)
    }

    /// Set the clock source.
    pub fn set_clock_source(&self, source: ChannelSource) -> Result<(), Ds2000Error> {
        self.scope.set(&CLOCK_SOURCE, source)
    }

    /// Get the clock edge.
    pub fn get_slope(&self) -> Result<Polarity, Ds2000Error> {
        self.scope.get(&SLOPE)
    }

    /// Set the clock edge.
    pub fn set_slope(&self, slope: Polarity) -> Result<(), Ds2000Error> {
        self.scope.set(&SLOPE, slope)
    }

    /// Get the data level that is checked.
    pub fn get_pattern(&self) -> Result<DataPattern, Ds2000Error> {
        self.scope.get(&PATTERN)
    }

    /// Set the data level that is checked.
    pub fn set_pattern(&self, pattern: DataPattern) -> Result<(), Ds2000Error> {
        self.scope.set(&PATTERN, pattern)
    }

    /// Get the violation type.
    pub fn get_violation(&self) -> Result<SetupHoldType, Ds2000Error> {
        self.scope.get(&TYPE)
    }

    /// Set the violation type.
    pub fn set_violation(&self, violation: SetupHoldType) -> Result<(), Ds2000Error> {
        self.scope.set(&TYPE, violation)
    }

    /// Get the setup time.
    pub fn get_setup_time(&self) -> Result<Duration, Ds2000Error> {
        self.scope.get(&SETUP_TIME)
    }

    /// Set the setup time, from 2 ns to 1 s.
    pub fn set_setup_time(&self, time: Duration) -> Result<(), Ds2000Error> {
        check_time(time, 2e-9, 1.0)?;
        self.scope.set(&SETUP_TIME, time)
    }

    /// Get the hold time.
    pub fn get_hold_time(&self) -> Result<Duration, Ds2000Error> {
        self.scope.get(&HOLD_TIME)
    }

    /// Set the hold time, from 2 ns to 1 s.
    pub fn set_hold_time(&self, time: Duration) -> Result<(), Ds2000Error> {
        check_time(time, 2e-9, 1.0)?;
        self.scope.set(&HOLD_TIME, time)
    }
}

mode_selection!(SetupHoldTrigger);
