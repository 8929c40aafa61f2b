//! I2C trigger.

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
    /// Which I2C bus condition triggers.
    pub enum I2cWhen {
        /// Start condition.
        Start => "START" | "STAR",
        /// Repeated start condition.
        Restart => "RESTART" | "REST",
        /// Stop condition.
        Stop => "STOP",
        /// Missing acknowledge.
        Nack => "NACKNOWLEDGE" | "NACK",
        /// Matching address.
        Address => "ADDRESS" | "ADDR",
        /// Matching data.
        Data => "DATA",
        /// Matching address and data.
        AddressData => "ADATA" | "ADAT",
    }
}

mnemonic_enum! {
    /// Transfer direction.
    pub enum I2cDirection {
        /// Read transfers.
        Read => "READ",
        /// Write transfers.
        Write => "WRITE" | "WRIT",
        /// Read and write transfers.
        ReadWrite => "RWRITE" | "RWR",
    }
}

const SCL: Setting<ChannelSource> = Setting::new(&["TRIGGER", "IIC", "SCL"]);
const SDA: Setting<ChannelSource> = Setting::new(&["TRIGGER", "IIC", "SDA"]);
const WHEN: Setting<I2cWhen> = Setting::new(&["TRIGGER", "IIC", "WHEN"]);
const ADDRESS_WIDTH: Setting<u32> = Setting::new(&["TRIGGER", "IIC", "AWIDTH"]);
const ADDRESS: Setting<u32> = Setting::new(&["TRIGGER", "IIC", "ADDRESS"]);
const DIRECTION: Setting<I2cDirection> = Setting::new(&["TRIGGER", "IIC", "DIRECTION"]);
const DATA: Setting<i64> = Setting::new(&["TRIGGER", "IIC", "DATA"]);
const CLOCK_LEVEL: Setting<Voltage> = Setting::new(&["TRIGGER", "IIC", "CLEVEL"]);
const DATA_LEVEL: Setting<Voltage> = Setting::new(&["TRIGGER", "IIC", "DLEVEL"]);

/// Settings of the I2C trigger, `:TRIGGER:IIC`.
#[derive(Debug)]
pub struct I2cTrigger<T: InstrumentInterface> {
    scope: ModeScope<T>,
}

impl<T: InstrumentInterface> I2cTrigger<T> {
    pub(crate) fn new(client: ProtocolClient<T>) -> Self {
        Self {
            scope: ModeScope::new(client, TriggerMode::I2c),
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

    /// Get the trigger condition.
    pub fn get_when(&self) -> Result<I2cWhen, Ds2000Error> {
        self.scope.get(&WHEN)
    }

    /// Set the trigger condition.
    pub fn set_when(&self, when: I2cWhen) -> Result<(), Ds2000Error> {
        self.scope.set(&WHEN, when)
    }

    /// Get the address width in bits.
    pub fn get_address_width(&self) -> Result<u32, Ds2000Error> {
        self.scope.get(&ADDRESS_WIDTH)
    }

    /// Set the address width in bits: 7, 8 or 10.
    pub fn set_address_width(&self, bits: u32) -> Result<(), Ds2000Error> {
        if ![7, 8, 10].contains(&bits) {
            return Err(Ds2000Error::InvalidArgument(format!(
                "Address width must be 7, 8 or 10 bits, got {bits}."
            )));
        }
        self.scope.set(&ADDRESS_WIDTH, bits)
    }

    /// Get the address.
    pub fn get_address(&self) -> Result<u32, Ds2000Error> {
        self.scope.get(&ADDRESS)
    }

    /// Set the address.
    ///
    /// The address must fit into the configured address width. This queries the width first and
    /// then sets the address, two round trips in total.
    pub fn set_address(&self, address: u32) -> Result<(), Ds2000Error> {
        self.scope
            .set_checked(&ADDRESS_WIDTH, &ADDRESS, address, |width: u32, address| {
                check_int_range(i64::from(*address), 0, (1_i64 << width.min(10)) - 1)
            })
    }

    /// Get the transfer direction.
    pub fn get_direction(&self) -> Result<I2cDirection, Ds2000Error> {
        self.scope.get(&DIRECTION)
    }

    /// Set the transfer direction.
    pub fn set_direction(&self, direction: I2cDirection) -> Result<(), Ds2000Error> {
        self.scope.set(&DIRECTION, direction)
    }

    /// Get the data value.
    pub fn get_data(&self) -> Result<i64, Ds2000Error> {
        self.scope.get(&DATA)
    }

    /// Set the data value, up to five bytes.
    pub fn set_data(&self, data: i64) -> Result<(), Ds2000Error> {
        check_int_range(data, 0, (1_i64 << 40) - 1)?;
        self.scope.set(&DATA, data)
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

mode_selection!(I2cTrigger);
