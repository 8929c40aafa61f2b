//! Window trigger.

use std::time::Duration;

use scpi_link::InstrumentInterface;

use super::{ChannelSource, EdgeSlope, ModeScope, TriggerMode, check_time, mode_selection};
use crate::{
    client::ProtocolClient, error::Ds2000Error, mnemonic::mnemonic_enum, setting::Setting,
};

mnemonic_enum! {
    /// When the window trigger fires.
    pub enum WindowPosition {
        /// When the signal leaves the window.
        Exit => "EXIT",
        /// When the signal enters the window.
        Enter => "ENTER",
        /// When the signal stays in the window for the set time.
        Time => "TIME" | "TIM",
    }
}

const SOURCE: Setting<ChannelSource> = Setting::new(&["TRIGGER", "WINDOWS", "SOURCE"]);
const SLOPE: Setting<EdgeSlope> = Setting::new(&["TRIGGER", "WINDOWS", "SLOPE"]);
const POSITION: Setting<WindowPosition> = Setting::new(&["TRIGGER", "WINDOWS", "POSITION"]);
const TIME: Setting<Duration> = Setting::new(&["TRIGGER", "WINDOWS", "TIME"]);

/// Settings of the window trigger, `:TRIGGER:WINDOWS`.
#[derive(Debug)]
pub struct WindowTrigger<T: InstrumentInterface> {
    scope: ModeScope<T>,
}

impl<T: InstrumentInterface> WindowTrigger<T> {
    pub(crate) fn new(client: ProtocolClient<T>) -> Self {
        Self {
            scope: ModeScope::new(client, TriggerMode::Window),
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

    /// Get the window edge.
    pub fn get_slope(&self) -> Result<EdgeSlope, Ds2000Error> {
        self.scope.get(&SLOPE)
    }

    /// Set the window edge.
    pub fn set_slope(&self, slope: EdgeSlope) -> Result<(), Ds2000Error> {
        self.scope.set(&SLOPE, slope)
    }

    /// Get the trigger position.
    pub fn get_position(&self) -> Result<WindowPosition, Ds2000Error> {
        self.scope.get(&POSITION)
    }

    /// Set the trigger position.
    pub fn set_position(&self, position: WindowPosition) -> Result<(), Ds2000Error> {
        self.scope.set(&POSITION, position)
    }

    /// Get the window time.
    pub fn get_time(&self) -> Result<Duration, Ds2000Error> {
        self.scope.get(&TIME)
    }

    /// Set the window time, from 16 ns to 4 s. Only used with [`WindowPosition::Time`].
    pub fn set_time(&self, time: Duration) -> Result<(), Ds2000Error> {
        check_time(time, 16e-9, 4.0)?;
        self.scope.set(&TIME, time)
    }
}

mode_selection!(WindowTrigger);
