//! SPI trigger.

use std::time::Duration;

use measurements::Voltage;
use scpi_link::InstrumentInterface;

use super::{ChannelSource, ModeScope, Polarity, TriggerMode, check_time, mode_selection};
use crate::{
    client::ProtocolClient,
    error::{Ds2000Error, check_int_range},
    setting::Setting,
};

const SCL: Setting<ChannelSource> = Setting::new(&["TRIGGER", "SPI", "SCL"]);
const SDA: Setting<ChannelSource> = Setting::new(&["TRIGGER", "SPI", "SDA"]);
const SLOPE: Setting<Polarity> = Setting::new(&["TRIGGER", "SPI", "SLOPE"]);
const TIMEOUT: Setting<Duration> = Setting::new(&["TRIGGER", "SPI", "TIMEOUT"]);
const WIDTH: Setting<u32> = Setting::new(&["TRIGGER", "SPI", "WIDTH"]);
const DATA: Setting<i64> = Setting::new(&["TRIGGER", "SPI", "DATA"]);
const CLOCK_LEVEL: Setting<Voltage> = Setting::new(&["TRIGGER", "SPI", "CLEVEL"]);
const DATA_LEVEL: Setting<Voltage> = Setting::new(&["TRIGGER", "SPI", "DLEVEL"]);

/// Settings of the SPI trigger, `:TRIGGER:SPI`.
///
/// A frame starts after the clock was idle for the timeout.
#[derive(Debug)]
pub struct SpiTrigger<T: InstrumentInterface> {
    scope: ModeScope<T>,
}

impl<T: InstrumentInterface> SpiTrigger<T> {
    pub(crate) fn new(client: ProtocolClient<T>) -> Self {
        Self {
            scope: ModeScope::new(client, TriggerMode::Spi),
        }
    }

    /// Get the clock source.
    pub fn get_clock_source(&self) -> Result<ChannelSource, Ds2000Error> {
        self.scope.get(&SCL)
    }

    /// Set the clock source.
    pub fn set_clock_source(&self, source: ChannelSource) -> Result<(), Ds2000Error> {
        self.scope.set(&SCL, source)
    }

    /// Get the data source.
    pub fn get_data_source(&self) -> Result<ChannelSource, Ds2000Error> {
        self.scope.get(&SDA)
    }

    /// Set the data source.
    pub fn set_data_source(&self, source: ChannelSource) -> Result<(), Ds2000Error> {
        self.scope.set(&SDA, source)
    }

    /// Get the clock edge on which data is sampled.
    pub fn get_slope(&self) -> Result<Polarity, Ds2000Error> {
        self.scope.get(&SLOPE)
    }

    /// Set the clock edge on which data is sampled.
    pub fn set_slope(&self, slope: Polarity) -> Result<(), Ds2000Error> {
        self.scope.set(&SLOPE, slope)
    }

    /// Get the idle time of the clock before a frame starts.
    pub fn get_timeout(&self) -> Result<Duration, Ds2000Error> {
        self.scope.get(&TIMEOUT)
    }

    /// Set the idle time of the clock before a frame starts, from 100 ns to 1 s.
    pub fn set_timeout(&self, timeout: Duration) -> Result<(), Ds2000Error> {
        check_time(timeout, 100e-9, 1.0)?;
        self.scope.set(&TIMEOUT, timeout)
    }

    /// Get the number of data bits.
    pub fn get_width(&self) -> Result<u32, Ds2000Error> {
        self.scope.get(&WIDTH)
    }

    /// Set the number of data bits, from 4 to 32.
    pub fn set_width(&self, width: u32) -> Result<(), Ds2000Error> {
        check_int_range(i64::from(width), 4, 32)?;
        self.scope.set(&WIDTH, width)
    }

    /// Get the data value.
    pub fn get_data(&self) -> Result<i64, Ds2000Error> {
        self.scope.get(&DATA)
    }

    /// Set the data value.
    ///
    /// The value must fit into the configured number of data bits. This queries the width first
    /// and then sets the data, two round trips in total.
    pub fn set_data(&self, data: i64) -> Result<(), Ds2000Error> {
        self.scope
            .set_checked(&WIDTH, &DATA, data, |width: u32, data| {
                check_int_range(*data, 0, (1_i64 << width.min(32)) - 1)
            })
    }

    /// Get the clock threshold.
    pub fn get_clock_level(&self) -> Result<Voltage, Ds2000Error> {
        self.scope.get(&CLOCK_LEVEL)
    }

    /// Set the clock threshold.
    pub fn set_clock_level(&self, level: Voltage) -> Result<(), Ds2000Error> {
        self.scope.set(&CLOCK_LEVEL, level)
    }

    /// Get the data threshold.
    pub fn get_data_level(&self) -> Result<Voltage, Ds2000Error> {
        self.scope.get(&DATA_LEVEL)
    }

    /// Set the data threshold.
    pub fn set_data_level(&self, level: Voltage) -> Result<(), Ds2000Error> {
        self.scope.set(&DATA_LEVEL, level)
    }
}

mode_selection!(SpiTrigger);
