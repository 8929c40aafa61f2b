//! RS232 trigger.

use measurements::Voltage;
use scpi_link::InstrumentInterface;

use super::{ChannelSource, ModeScope, TriggerMode, mode_selection};
use crate::{
    client::ProtocolClient,
    error::{Ds2000Error, check_int_range},
    mnemonic::mnemonic_enum,
    setting::Setting,
};

mnemonic_enum! {
    /// Which RS232 condition triggers.
    pub enum Rs232When {
        /// Start of a frame.
        Start => "START" | "STAR",
        /// Frame error.
        Error => "ERROR" | "ERR",
        /// Parity error.
        ParityError => "PARITY" | "PAR",
        /// Data byte equal to the set data.
        Data => "DATA",
    }
}

mnemonic_enum! {
    /// RS232 parity.
    pub enum Parity {
        /// Even parity.
        Even => "EVEN",
        /// Odd parity.
        Odd => "ODD",
        /// No parity bit.
        None => "NONE",
    }
}

const SOURCE: Setting<ChannelSource> = Setting::new(&["TRIGGER", "RS232", "SOURCE"]);
const WHEN: Setting<Rs232When> = Setting::new(&["TRIGGER", "RS232", "WHEN"]);
const PARITY: Setting<Parity> = Setting::new(&["TRIGGER", "RS232", "PARITY"]);
const STOP_BITS: Setting<u32> = Setting::new(&["TRIGGER", "RS232", "STOP"]);
const DATA: Setting<u32> = Setting::new(&["TRIGGER", "RS232", "DATA"]);
const WIDTH: Setting<u32> = Setting::new(&["TRIGGER", "RS232", "WIDTH"]);
const BAUD: Setting<u32> = Setting::new(&["TRIGGER", "RS232", "BAUD"]);
const USER_BAUD: Setting<u32> = Setting::new(&["TRIGGER", "RS232", "BUSER"]);
const LEVEL: Setting<Voltage> = Setting::new(&["TRIGGER", "RS232", "LEVEL"]);

/// Baud rates that can be selected directly. Others are set as user baud rate.
pub const BAUD_RATES: [u32; 10] = [
    2400, 4800, 9600, 19200, 38400, 57600, 115200, 230400, 460800, 921600,
];

/// Settings of the RS232 trigger, `:TRIGGER:RS232`.
#[derive(Debug)]
pub struct Rs232Trigger<T: InstrumentInterface> {
    scope: ModeScope<T>,
}

impl<T: InstrumentInterface> Rs232Trigger<T> {
    pub(crate) fn new(client: ProtocolClient<T>) -> Self {
        Self {
            scope: ModeScope::new(client, TriggerMode::Rs232),
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

    /// Get the trigger condition.
    pub fn get_when(&self) -> Result<Rs232When, Ds2000Error> {
        self.scope.get(&WHEN)
    }

    /// Set the trigger condition.
    pub fn set_when(&self, when: Rs232When) -> Result<(), Ds2000Error> {
        self.scope.set(&WHEN, when)
    }

    /// Get the parity.
    pub fn get_parity(&self) -> Result<Parity, Ds2000Error> {
        self.scope.get(&PARITY)
    }

    /// Set the parity.
    pub fn set_parity(&self, parity: Parity) -> Result<(), Ds2000Error> {
        self.scope.set(&PARITY, parity)
    }

    /// Get the number of stop bits.
    pub fn get_stop_bits(&self) -> Result<u32, Ds2000Error> {
        self.scope.get(&STOP_BITS)
    }

    /// Set the number of stop bits, 1 or 2.
    pub fn set_stop_bits(&self, stop_bits: u32) -> Result<(), Ds2000Error> {
        check_int_range(i64::from(stop_bits), 1, 2)?;
        self.scope.set(&STOP_BITS, stop_bits)
    }

    /// Get the number of data bits.
    pub fn get_width(&self) -> Result<u32, Ds2000Error> {
        self.scope.get(&WIDTH)
    }

    /// Set the number of data bits, from 5 to 8.
    pub fn set_width(&self, width: u32) -> Result<(), Ds2000Error> {
        check_int_range(i64::from(width), 5, 8)?;
        self.scope.set(&WIDTH, width)
    }

    /// Get the data value used with [`Rs232When::Data`].
    pub fn get_data(&self) -> Result<u32, Ds2000Error> {
        self.scope.get(&DATA)
    }

    /// Set the data value used with [`Rs232When::Data`].
    ///
    /// The value must fit into the configured number of data bits. This queries the width first
    /// and then sets the data, two round trips in total.
    pub fn set_data(&self, data: u32) -> Result<(), Ds2000Error> {
        self.scope
            .set_checked(&WIDTH, &DATA, data, |width: u32, data| {
                check_int_range(i64::from(*data), 0, (1_i64 << width.min(8)) - 1)
            })
    }

    /// Get the baud rate.
    ///
    /// If a user baud rate is set, the instrument reports it with [`Self::get_user_baud`] instead.
    pub fn get_baud(&self) -> Result<u32, Ds2000Error> {
        self.scope.get(&BAUD)
    }

    /// Set one of the predefined baud rates in [`BAUD_RATES`].
    pub fn set_baud(&self, baud: u32) -> Result<(), Ds2000Error> {
        if !BAUD_RATES.contains(&baud) {
            return Err(Ds2000Error::InvalidArgument(format!(
                "Baud rate {baud} is not predefined. Use a user baud rate instead."
            )));
        }
        self.scope.set(&BAUD, baud)
    }

    /// Get the user baud rate.
    pub fn get_user_baud(&self) -> Result<u32, Ds2000Error> {
        self.scope.get(&USER_BAUD)
    }

    /// Set a user baud rate, from 1 to 900000.
    pub fn set_user_baud(&self, baud: u32) -> Result<(), Ds2000Error> {
        check_int_range(i64::from(baud), 1, 900_000)?;
        self.scope.set(&USER_BAUD, baud)
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

mode_selection!(Rs232Trigger);
