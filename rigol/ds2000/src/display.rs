//! The display subsystem, `:DISPLAY`.

use std::time::Duration;

use scpi_link::InstrumentInterface;

use crate::{
    client::ProtocolClient,
    codec,
    command::{Argument, Command},
    error::{Ds2000Error, check_int_range},
    mnemonic::mnemonic_enum,
    setting::{Setting, SettingValue},
};

mnemonic_enum! {
    /// How samples are drawn.
    pub enum DisplayType {
        /// Connect samples with lines.
        Vectors => "VECTORS" | "VECT",
        /// Draw samples as dots.
        Dots => "DOTS",
    }
}

mnemonic_enum! {
    /// Screen grid.
    pub enum Grid {
        /// Grid with subdivisions.
        Full => "FULL",
        /// Grid without subdivisions.
        Half => "HALF",
        /// No grid.
        None => "NONE",
    }
}

/// Persistence time of the waveform grading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Persistence {
    /// Minimum persistence.
    Minimum,
    /// A finite persistence time, one of [`Persistence::TIMES`] seconds.
    Time(Duration),
    /// Keep all samples until the screen is cleared.
    Infinite,
}

impl Persistence {
    /// The finite persistence times in seconds the instrument supports.
    pub const TIMES: [f64; 9] = [0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0];
}

impl SettingValue for Persistence {
    fn to_argument(&self) -> Argument {
        match self {
            Persistence::Minimum => Argument::Mnemonic("MIN"),
            Persistence::Time(time) => Argument::Number(time.as_secs_f64()),
            Persistence::Infinite => Argument::Mnemonic("INFINITE"),
        }
    }

    fn from_reply(raw: &[u8]) -> Result<Self, Ds2000Error> {
        let text = codec::decode_text(raw)?.to_ascii_uppercase();
        match text.as_str() {
            "MIN" | "MINIMUM" => Ok(Persistence::Minimum),
            "INF" | "INFINITE" => Ok(Persistence::Infinite),
            _ => Duration::from_reply(raw).map(Persistence::Time),
        }
    }
}

/// How long menus stay on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTime {
    /// Hide menus after the given number of seconds, one of [`MenuTime::SECONDS`].
    Seconds(u32),
    /// Keep menus on screen.
    Infinite,
}

impl MenuTime {
    /// The finite menu display times in seconds the instrument supports.
    pub const SECONDS: [u32; 5] = [1, 2, 5, 10, 20];
}

impl SettingValue for MenuTime {
    fn to_argument(&self) -> Argument {
        match self {
            MenuTime::Seconds(secs) => Argument::Integer(i64::from(*secs)),
            MenuTime::Infinite => Argument::Mnemonic("INFINITE"),
        }
    }

    fn from_reply(raw: &[u8]) -> Result<Self, Ds2000Error> {
        let text = codec::decode_text(raw)?.to_ascii_uppercase();
        match text.as_str() {
            "INF" | "INFINITE" => Ok(MenuTime::Infinite),
            _ => u32::from_reply(raw).map(MenuTime::Seconds),
        }
    }
}

const TYPE: Setting<DisplayType> = Setting::new(&["DISPLAY", "TYPE"]);
const GRID: Setting<Grid> = Setting::new(&["DISPLAY", "GRID"]);
const GRADING_TIME: Setting<Persistence> = Setting::new(&["DISPLAY", "GRADING", "TIME"]);
const MENU_TIME: Setting<MenuTime> = Setting::new(&["DISPLAY", "MPERSISTENCE"]);
const WAVE_BRIGHTNESS: Setting<u32> = Setting::new(&["DISPLAY", "WBRIGHTNESS"]);
const GRID_BRIGHTNESS: Setting<u32> = Setting::new(&["DISPLAY", "GBRIGHTNESS"]);

/// The display subsystem of the DS2000.
#[derive(Debug)]
pub struct Display<T: InstrumentInterface> {
    client: ProtocolClient<T>,
}

impl<T: InstrumentInterface> Display<T> {
    pub(crate) fn new(client: ProtocolClient<T>) -> Self {
        Self { client }
    }

    /// Clear all waveforms from the screen.
    pub fn clear(&self) -> Result<(), Ds2000Error> {
        self.client.set(&Command::event(["DISPLAY", "CLEAR"]))
    }

    /// Get the display type.
    pub fn get_type(&self) -> Result<DisplayType, Ds2000Error> {
        TYPE.get(&self.client, &[])
    }

    /// Set the display type.
    pub fn set_type(&self, display_type: DisplayType) -> Result<(), Ds2000Error> {
        TYPE.set(&self.client, &[], display_type)
    }

    /// Get the screen grid.
    pub fn get_grid(&self) -> Result<Grid, Ds2000Error> {
        GRID.get(&self.client, &[])
    }

    /// Set the screen grid.
    pub fn set_grid(&self, grid: Grid) -> Result<(), Ds2000Error> {
        GRID.set(&self.client, &[], grid)
    }

    /// Get the persistence time.
    pub fn get_persistence(&self) -> Result<Persistence, Ds2000Error> {
        GRADING_TIME.get(&self.client, &[])
    }

    /// Set the persistence time.
    pub fn set_persistence(&self, persistence: Persistence) -> Result<(), Ds2000Error> {
        if let Persistence::Time(time) = persistence {
            let secs = time.as_secs_f64();
            if !Persistence::TIMES.iter().any(|t| (t - secs).abs() < 1e-9) {
                return Err(Ds2000Error::InvalidArgument(format!(
                    "Persistence time of {secs} s is not supported."
                )));
            }
        }
        GRADING_TIME.set(&self.client, &[], persistence)
    }

    /// Get how long menus stay on screen.
    pub fn get_menu_time(&self) -> Result<MenuTime, Ds2000Error> {
        MENU_TIME.get(&self.client, &[])
    }

    /// Set how long menus stay on screen.
    pub fn set_menu_time(&self, time: MenuTime) -> Result<(), Ds2000Error> {
        if let MenuTime::Seconds(secs) = time {
            if !MenuTime::SECONDS.contains(&secs) {
                return Err(Ds2000Error::InvalidArgument(format!(
                    "Menu display time of {secs} s is not supported."
                )));
            }
        }
        MENU_TIME.set(&self.client, &[], time)
    }

    /// Get the waveform brightness in percent.
    pub fn get_waveform_brightness(&self) -> Result<u32, Ds2000Error> {
        WAVE_BRIGHTNESS.get(&self.client, &[])
    }

    /// Set the waveform brightness, from 1 to 100 percent.
    pub fn set_waveform_brightness(&self, brightness: u32) -> Result<(), Ds2000Error> {
        check_int_range(i64::from(brightness), 1, 100)?;
        WAVE_BRIGHTNESS.set(&self.client, &[], brightness)
    }

    /// Get the grid brightness in percent.
    pub fn get_grid_brightness(&self) -> Result<u32, Ds2000Error> {
        GRID_BRIGHTNESS.get(&self.client, &[])
    }

    /// Set the grid brightness, from 0 to 100 percent.
    pub fn set_grid_brightness(&self, brightness: u32) -> Result<(), Ds2000Error> {
        check_int_range(i64::from(brightness), 0, 100)?;
        GRID_BRIGHTNESS.set(&self.client, &[], brightness)
    }

    /// Take a screenshot and return the image file as sent by the instrument, a bitmap.
    ///
    /// The image is transferred as one binary block. Make sure that the timeout of the interface
    /// is long enough for about 1.2 MB.
    pub fn screenshot(&self) -> Result<Vec<u8>, Ds2000Error> {
        let image = self
            .client
            .query_block(&Command::query(["DISPLAY", "DATA"]))?;
        log::debug!("Screenshot with {} bytes received", image.len());
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::*;

    #[rstest]
    #[case(b"MIN", Persistence::Minimum)]
    #[case(b"INF", Persistence::Infinite)]
    #[case(b"INFINITE", Persistence::Infinite)]
    #[case(b"1.000000e-01", Persistence::Time(Duration::from_millis(100)))]
    fn test_persistence_from_reply(#[case] raw: &[u8], #[case] exp: Persistence) {
        match (Persistence::from_reply(raw).unwrap(), exp) {
            (Persistence::Time(got), Persistence::Time(exp)) => {
                assert!((got.as_secs_f64() - exp.as_secs_f64()).abs() < 1e-9)
            }
            (got, exp) => assert_eq!(got, exp),
        }
    }

    #[rstest]
    #[case(b"INF", MenuTime::Infinite)]
    #[case(b"INFINITE", MenuTime::Infinite)]
    #[case(b"20", MenuTime::Seconds(20))]
    fn test_menu_time_from_reply(#[case] raw: &[u8], #[case] exp: MenuTime) {
        assert_eq!(MenuTime::from_reply(raw).unwrap(), exp);
    }
}
