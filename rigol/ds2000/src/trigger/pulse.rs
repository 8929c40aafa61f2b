//! Pulse width trigger.

use std::time::Duration;

use measurements::Voltage;
use scpi_link::InstrumentInterface;

use super::{ModeScope, PulseSource, TriggerMode, WidthCondition, check_time, mode_selection};
use crate::{client::ProtocolClient, error::Ds2000Error, setting::Setting};

const SOURCE: Setting<PulseSource> = Setting::new(&["TRIGGER", "PULSE", "SOURCE"]);
const WHEN: Setting<WidthCondition> = Setting::new(&["TRIGGER", "PULSE", "WHEN"]);
const UPPER_WIDTH: Setting<Duration> = Setting::new(&["TRIGGER", "PULSE", "UWIDTH"]);
const LOWER_WIDTH: Setting<Duration> = Setting::new(&["TRIGGER", "PULSE", "LWIDTH"]);
const LEVEL: Setting<Voltage> = Setting::new(&["TRIGGER", "PULSE", "LEVEL"]);

const MIN_WIDTH: f64 = 2e-9;
const MAX_WIDTH: f64 = 4.0;

/// Settings of the pulse width trigger, `:TRIGGER:PULSE`.
#[derive(Debug)]
pub struct PulseTrigger<T: InstrumentInterface> {
    scope: ModeScope<T>,
}

impl<T: InstrumentInterface> PulseTrigger<T> {
    pub(crate) fn new(client: ProtocolClient<T>) -> Self {
        Self {
            scope: ModeScope::new(client, TriggerMode::Pulse),
        }
    }

    /// Get the trigger source.
    pub fn get_source(&self) -> Result<PulseSource, Ds2000Error> {
        self.scope.get(&SOURCE)
    }

    /// Set the trigger source.
    pub fn set_source(&self, source: PulseSource) -> Result<(), Ds2000Error> {
        self.scope.set(&SOURCE, source)
    }

    /// Get the pulse width condition.
    pub fn get_when(&self) -> Result<WidthCondition, Ds2000Error> {
        self.scope.get(&WHEN)
    }

    /// Set the pulse width condition.
    pub fn set_when(&self, when: WidthCondition) -> Result<(), Ds2000Error> {
        self.scope.set(&WHEN, when)
    }

    /// Get the upper pulse width limit.
    pub fn get_upper_width(&self) -> Result<Duration, Ds2000Error> {
        self.scope.get(&UPPER_WIDTH)
    }

    /// Set the upper pulse width limit, from 2 ns to 4 s.
    pub fn set_upper_width(&self, width: Duration) -> Result<(), Ds2000Error> {
        check_time(width, MIN_WIDTH, MAX_WIDTH)?;
        self.scope.set(&UPPER_WIDTH, width)
    }

    /// Get the lower pulse width limit.
    pub fn get_lower_width(&self) -> Result<Duration, Ds2000Error> {
        self.scope.get(&LOWER_WIDTH)
    }

    /// Set the lower pulse width limit, from 2 ns to 4 s.
    pub fn set_lower_width(&self, width: Duration) -> Result<(), Ds2000Error> {
        check_time(width, MIN_WIDTH, MAX_WIDTH)?;
        self.scope.set(&LOWER_WIDTH, width)
    }

    /// Get the trigger level.
    pub fn get_level(&self) -> Result<Voltage, Ds2000Error> {
        self.scope.get(&LEVEL)
    }

    /// Set the trigger level.
    pub fn set_level(&self, level: Voltage) -> Result<(), Ds2000Error> {
        self.scope.set(&LEVEL, level)
    }
}

mode_selection!(PulseTrigger);
