//! Timeout trigger.

use std::time::Duration;

use scpi_link::InstrumentInterface;

use super::{ChannelSource, EdgeSlope, ModeScope, TriggerMode, check_time, mode_selection};
use crate::{client::ProtocolClient, error::Ds2000Error, setting::Setting};

const SOURCE: Setting<ChannelSource> = Setting::new(&["TRIGGER", "TIMEOUT", "SOURCE"]);
const SLOPE: Setting<EdgeSlope> = Setting::new(&["TRIGGER", "TIMEOUT", "SLOPE"]);
const TIME: Setting<Duration> = Setting::new(&["TRIGGER", "TIMEOUT", "TIME"]);

/// Settings of the timeout trigger, `:TRIGGER:TIMEOUT`.
#[derive(Debug)]
pub struct TimeoutTrigger<T: InstrumentInterface> {
    scope: ModeScope<T>,
}

impl<T: InstrumentInterface> TimeoutTrigger<T> {
    pub(crate) fn new(client: ProtocolClient<T>) -> Self {
        Self {
            scope: ModeScope::new(client, TriggerMode::Timeout),
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

    /// Get the edge that starts the timeout.
    pub fn get_slope(&self) -> Result<EdgeSlope, Ds2000Error> {
        self.scope.get(&SLOPE)
    }

    /// Set the edge that starts the timeout.
    pub fn set_slope(&self, slope: EdgeSlope) -> Result<(), Ds2000Error> {
        self.scope.set(&SLOPE, slope)
    }

    /// Get the timeout.
    pub fn get_time(&self) -> Result<Duration, Ds2000Error> {
        self.scope.get(&TIME)
    }

    /// Set the timeout, from 16 ns to 4 s.
    pub fn set_time(&self, time: Duration) -> Result<(), Ds2000Error> {
        check_time(time, 16e-9, 4.0)?;
        self.scope.set(&TIME, time)
    }
}

mode_selection!(TimeoutTrigger);
