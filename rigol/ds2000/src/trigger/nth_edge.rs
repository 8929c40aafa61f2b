//! Nth edge trigger.

use std::time::Duration;

use measurements::Voltage;
use scpi_link::InstrumentInterface;

use super::{ChannelSource, ModeScope, Polarity, TriggerMode, check_time, mode_selection};
use crate::{
    client::ProtocolClient,
    error::{Ds2000Error, check_int_range},
    setting::Setting,
};

const SOURCE: Setting<ChannelSource> = Setting::new(&["TRIGGER", "NEDGE", "SOURCE"]);
const SLOPE: Setting<Polarity> = Setting::new(&["TRIGGER", "NEDGE", "SLOPE"]);
const IDLE: Setting<Duration> = Setting::new(&["TRIGGER", "NEDGE", "IDLE"]);
const EDGE: Setting<u32> = Setting::new(&["TRIGGER", "NEDGE", "EDGE"]);
const LEVEL: Setting<Voltage> = Setting::new(&["TRIGGER", "NEDGE", "LEVEL"]);

/// Settings of the nth edge trigger, `:TRIGGER:NEDGE`.
///
/// Triggers on the n-th edge that follows an idle time.
#[derive(Debug)]
pub struct NthEdgeTrigger<T: InstrumentInterface> {
    scope: ModeScope<T>,
}

impl<T: InstrumentInterface> NthEdgeTrigger<T> {
    pub(crate) fn new(client: ProtocolClient<T>) -> Self {
        Self {
            scope: ModeScope::new(client, TriggerMode::NthEdge),
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

    /// Get the counted edge.
    pub fn get_slope(&self) -> Result<Polarity, Ds2000Error> {
        self.scope.get(&SLOPE)
    }

    /// Set the counted edge.
    pub fn set_slope(&self, slope: Polarity) -> Result<(), Ds2000Error> {
        self.scope.set(&SLOPE, slope)
    }

    /// Get the idle time before edges are counted.
    pub fn get_idle(&self) -> Result<Duration, Ds2000Error> {
        self.scope.get(&IDLE)
    }

    /// Set the idle time before edges are counted, from 16 ns to 4 s.
    pub fn set_idle(&self, idle: Duration) -> Result<(), Ds2000Error> {
        check_time(idle, 16e-9, 4.0)?;
        self.scope.set(&IDLE, idle)
    }

    /// Get the number of the edge that triggers.
    pub fn get_edge(&self) -> Result<u32, Ds2000Error> {
        self.scope.get(&EDGE)
    }

    /// Set the number of the edge that triggers, from 1 to 65535.
    pub fn set_edge(&self, edge: u32) -> Result<(), Ds2000Error> {
        check_int_range(i64::from(edge), 1, 65535)?;
        self.scope.set(&EDGE, edge)
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

mode_selection!(NthEdgeTrigger);
