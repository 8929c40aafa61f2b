//! Slope trigger.

use std::time::Duration;

use measurements::Voltage;
use scpi_link::InstrumentInterface;

use super::{ChannelSource, ModeScope, TriggerMode, WidthCondition, check_time, mode_selection};
use crate::{
    client::ProtocolClient, error::Ds2000Error, mnemonic::mnemonic_enum, setting::Setting,
};

mnemonic_enum! {
    /// Which threshold levels are adjusted with the level settings.
    pub enum SlopeWindow {
        /// Upper threshold only.
        UpperLevel => "TA",
        /// Lower threshold only.
        LowerLevel => "TB",
        /// Both thresholds.
        Both => "TAB",
    }
}

const SOURCE: Setting<ChannelSource> = Setting::new(&["TRIGGER", "SLOPE", "SOURCE"]);
const WHEN: Setting<WidthCondition> = Setting::new(&["TRIGGER", "SLOPE", "WHEN"]);
const UPPER_TIME: Setting<Duration> = Setting::new(&["TRIGGER", "SLOPE", "TUPPER"]);
const LOWER_TIME: Setting<Duration> = Setting::new(&["TRIGGER", "SLOPE", "TLOWER"]);
const WINDOW: Setting<SlopeWindow> = Setting::new(&["TRIGGER", "SLOPE", "WINDOW"]);
const UPPER_LEVEL: Setting<Voltage> = Setting::new(&["TRIGGER", "SLOPE", "ALEVEL"]);
const LOWER_LEVEL: Setting<Voltage> = Setting::new(&["TRIGGER", "SLOPE", "BLEVEL"]);

const MIN_TIME: f64 = 10e-9;
const MAX_TIME: f64 = 1.0;

/// Settings of the slope trigger, `:TRIGGER:SLOPE`.
///
/// Triggers on rising or falling slopes whose transition time between the two thresholds
/// matches the condition.
#[derive(Debug)]
pub struct SlopeTrigger<T: InstrumentInterface> {
    scope: ModeScope<T>,
}

impl<T: InstrumentInterface> SlopeTrigger<T> {
    pub(crate) fn new(client: ProtocolClient<T>) -> Self {
        Self {
            scope: ModeScope::new(client, TriggerMode::Slope),
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

    /// Get the slope condition.
    pub fn get_when(&self) -> Result<WidthCondition, Ds2000Error> {
        self.scope.get(&WHEN)
    }

    /// Set the slope condition.
    pub fn set_when(&self, when: WidthCondition) -> Result<(), Ds2000Error> {
        self.scope.set(&WHEN, when)
    }

    /// Get the upper time limit.
    pub fn get_upper_time(&self) -> Result<Duration, Ds2000Error> {
        self.scope.get(&UPPER_TIME)
    }

    /// Set the upper time limit, from 10 ns to 1 s.
    pub fn set_upper_time(&self, time: Duration) -> Result<(), Ds2000Error> {
        check_time(time, MIN_TIME, MAX_TIME)?;
        self.scope.set(&UPPER_TIME, time)
    }

    /// Get the lower time limit.
    pub fn get_lower_time(&self) -> Result<Duration, Ds2000Error> {
        self.scope.get(&LOWER_TIME)
    }

    /// Set the lower time limit, from 10 ns to 1 s.
    pub fn set_lower_time(&self, time: Duration) -> Result<(), Ds2000Error> {
        check_time(time, MIN_TIME, MAX_TIME)?;
        self.scope.set(&LOWER_TIME, time)
    }

    /// Get which thresholds are adjusted.
    pub fn get_window(&self) -> Result<SlopeWindow, Ds2000Error> {
        self.scope.get(&WINDOW)
    }

    /// Set which thresholds are adjusted.
    pub fn set_window(&self, window: SlopeWindow) -> Result<(), Ds2000Error> {
        self.scope.set(&WINDOW, window)
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

mode_selection!(SlopeTrigger);
