//! Edge trigger.

use measurements::Voltage;
use scpi_link::InstrumentInterface;

use super::{EdgeSlope, EdgeSource, ModeScope, TriggerMode, mode_selection};
use crate::{client::ProtocolClient, error::Ds2000Error, setting::Setting};

const SOURCE: Setting<EdgeSource> = Setting::new(&["TRIGGER", "EDGE", "SOURCE"]);
const SLOPE: Setting<EdgeSlope> = Setting::new(&["TRIGGER", "EDGE", "SLOPE"]);
const LEVEL: Setting<Voltage> = Setting::new(&["TRIGGER", "EDGE", "LEVEL"]);

/// Settings of the edge trigger, `:TRIGGER:EDGE`.
///
/// Edge is the default trigger mode after a reset.
#[derive(Debug)]
pub struct EdgeTrigger<T: InstrumentInterface> {
    scope: ModeScope<T>,
}

impl<T: InstrumentInterface> EdgeTrigger<T> {
    pub(crate) fn new(client: ProtocolClient<T>) -> Self {
        Self {
            scope: ModeScope::new(client, TriggerMode::Edge),
        }
    }

    /// Get the trigger source.
    pub fn get_source(&self) -> Result<EdgeSource, Ds2000Error> {
        self.scope.get(&SOURCE)
    }

    /// Set the trigger source.
    pub fn set_source(&self, source: EdgeSource) -> Result<(), Ds2000Error> {
        self.scope.set(&SOURCE, source)
    }

    /// Get the edge the trigger reacts to.
    pub fn get_slope(&self) -> Result<EdgeSlope, Ds2000Error> {
        self.scope.get(&SLOPE)
    }

    /// Set the edge the trigger reacts to.
    pub fn set_slope(&self, slope: EdgeSlope) -> Result<(), Ds2000Error> {
        self.scope.set(&SLOPE, slope)
    }

    /// Get the trigger level.
    pub fn get_level(&self) -> Result<Voltage, Ds2000Error> {
        self.scope.get(&LEVEL)
    }

    /// Set the trigger level. The valid range depends on the vertical scale and offset of the
    /// source channel, out of range levels are reported by the instrument.
    pub fn set_level(&self, level: Voltage) -> Result<(), Ds2000Error> {
        self.scope.set(&LEVEL, level)
    }
}

mode_selection!(EdgeTrigger);
