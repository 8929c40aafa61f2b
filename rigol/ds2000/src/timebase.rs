//! The timebase subsystem, `:TIMEBASE`.

use std::time::Duration;

use scpi_link::InstrumentInterface;

use crate::{
    client::ProtocolClient,
    error::{Ds2000Error, check_int_range},
    mnemonic::mnemonic_enum,
    setting::Setting,
};

mnemonic_enum! {
    /// Horizontal display mode.
    pub enum TimebaseMode {
        /// Y-T mode.
        Main => "MAIN",
        /// X-Y mode.
        Xy => "XY",
        /// Roll mode.
        Roll => "ROLL",
    }
}

mnemonic_enum! {
    /// Reference point that stays fixed when the horizontal scale is changed.
    pub enum HorizontalReference {
        /// Center of the screen.
        Center => "CENTER" | "CENT",
        /// Trigger position.
        TriggerPosition => "TPOSITION" | "TPOS",
        /// User defined position.
        User => "USER",
    }
}

const MAIN_SCALE: Setting<Duration> = Setting::new(&["TIMEBASE", "MAIN", "SCALE"]);
const MAIN_OFFSET: Setting<f64> = Setting::new(&["TIMEBASE", "MAIN", "OFFSET"]);
const MODE: Setting<TimebaseMode> = Setting::new(&["TIMEBASE", "MODE"]);
const DELAY_ENABLE: Setting<bool> = Setting::new(&["TIMEBASE", "DELAY", "ENABLE"]);
const DELAY_OFFSET: Setting<f64> = Setting::new(&["TIMEBASE", "DELAY", "OFFSET"]);
const DELAY_SCALE: Setting<Duration> = Setting::new(&["TIMEBASE", "DELAY", "SCALE"]);
const HREF_MODE: Setting<HorizontalReference> = Setting::new(&["TIMEBASE", "HREFERENCE", "MODE"]);
const HREF_POSITION: Setting<i64> = Setting::new(&["TIMEBASE", "HREFERENCE", "POSITION"]);
const VERNIER: Setting<bool> = Setting::new(&["TIMEBASE", "VERNIER"]);

/// The timebase subsystem of the DS2000.
///
/// Offsets are signed times in seconds relative to the trigger point and are therefore given as
/// `f64`. Scales are per division.
#[derive(Debug)]
pub struct Timebase<T: InstrumentInterface> {
    client: ProtocolClient<T>,
}

impl<T: InstrumentInterface> Timebase<T> {
    pub(crate) fn new(client: ProtocolClient<T>) -> Self {
        Self { client }
    }

    /// Get the main timebase scale per division.
    pub fn get_main_scale(&self) -> Result<Duration, Ds2000Error> {
        MAIN_SCALE.get(&self.client, &[])
    }

    /// Set the main timebase scale per division.
    pub fn set_main_scale(&self, scale: Duration) -> Result<(), Ds2000Error> {
        MAIN_SCALE.set(&self.client, &[], scale)
    }

    /// Get the main timebase offset in seconds.
    pub fn get_main_offset(&self) -> Result<f64, Ds2000Error> {
        MAIN_OFFSET.get(&self.client, &[])
    }

    /// Set the main timebase offset in seconds.
    pub fn set_main_offset(&self, offset: f64) -> Result<(), Ds2000Error> {
        MAIN_OFFSET.set(&self.client, &[], offset)
    }

    /// Get the horizontal display mode.
    pub fn get_mode(&self) -> Result<TimebaseMode, Ds2000Error> {
        MODE.get(&self.client, &[])
    }

    /// Set the horizontal display mode.
    pub fn set_mode(&self, mode: TimebaseMode) -> Result<(), Ds2000Error> {
        MODE.set(&self.client, &[], mode)
    }

    /// Whether the delayed sweep is enabled.
    pub fn get_delay_enabled(&self) -> Result<bool, Ds2000Error> {
        DELAY_ENABLE.get(&self.client, &[])
    }

    /// Enable or disable the delayed sweep.
    pub fn set_delay_enabled(&self, enabled: bool) -> Result<(), Ds2000Error> {
        DELAY_ENABLE.set(&self.client, &[], enabled)
    }

    /// Get the delayed timebase offset in seconds.
    pub fn get_delay_offset(&self) -> Result<f64, Ds2000Error> {
        DELAY_OFFSET.get(&self.client, &[])
    }

    /// Set the delayed timebase offset in seconds.
    pub fn set_delay_offset(&self, offset: f64) -> Result<(), Ds2000Error> {
        DELAY_OFFSET.set(&self.client, &[], offset)
    }

    /// Get the delayed timebase scale per division.
    pub fn get_delay_scale(&self) -> Result<Duration, Ds2000Error> {
        DELAY_SCALE.get(&self.client, &[])
    }

    /// Set the delayed timebase scale per division. It cannot be larger than the main scale,
    /// which is checked by the instrument.
    pub fn set_delay_scale(&self, scale: Duration) -> Result<(), Ds2000Error> {
        DELAY_SCALE.set(&self.client, &[], scale)
    }

    /// Get the horizontal reference mode.
    pub fn get_href_mode(&self) -> Result<HorizontalReference, Ds2000Error> {
        HREF_MODE.get(&self.client, &[])
    }

    /// Set the horizontal reference mode.
    pub fn set_href_mode(&self, mode: HorizontalReference) -> Result<(), Ds2000Error> {
        HREF_MODE.set(&self.client, &[], mode)
    }

    /// Get the user defined reference position in screen pixels from the center.
    pub fn get_href_position(&self) -> Result<i64, Ds2000Error> {
        HREF_POSITION.get(&self.client, &[])
    }

    /// Set the user defined reference position, from -350 to 350 pixels.
    pub fn set_href_position(&self, position: i64) -> Result<(), Ds2000Error> {
        check_int_range(position, -350, 350)?;
        HREF_POSITION.set(&self.client, &[], position)
    }

    /// Whether fine adjustment of the horizontal scale is enabled.
    pub fn get_vernier(&self) -> Result<bool, Ds2000Error> {
        VERNIER.get(&self.client, &[])
    }

    /// Enable or disable fine adjustment of the horizontal scale.
    pub fn set_vernier(&self, enabled: bool) -> Result<(), Ds2000Error> {
        VERNIER.set(&self.client, &[], enabled)
    }
}
