//! USB trigger.

use measurements::Voltage;
use scpi_link::InstrumentInterface;

use super::{ChannelSource, ModeScope, TriggerMode, mode_selection};
use crate::{
    client::ProtocolClient, error::Ds2000Error, mnemonic::mnemonic_enum, setting::Setting,
};

mnemonic_enum! {
    /// Which USB bus condition triggers.
    pub enum UsbWhen {
        /// Start of packet.
        StartOfPacket => "SOP",
        /// End of packet.
        EndOfPacket => "EOP",
        /// Reset complete.
        ResetComplete => "RC",
        /// Entering suspend.
        Suspend => "SUSPEND" | "SUSP",
        /// Leaving suspend.
        ExitSuspend => "EXITSUSPEND" | "EXIT",
    }
}

mnemonic_enum! {
    /// USB signal speed.
    pub enum UsbSpeed {
        /// Low speed, 1.5 Mb/s.
        Low => "LOW",
        /// Full speed, 12 Mb/s.
        Full => "FULL",
    }
}

const DPLUS: Setting<ChannelSource> = Setting::new(&["TRIGGER", "USB", "DPLUS"]);
const DMINUS: Setting<ChannelSource> = Setting::new(&["TRIGGER", "USB", "DMINUS"]);
const SPEED: Setting<UsbSpeed> = Setting::new(&["TRIGGER", "USB", "SPEED"]);
const WHEN: Setting<UsbWhen> = Setting::new(&["TRIGGER", "USB", "WHEN"]);
const PLUS_LEVEL: Setting<Voltage> = Setting::new(&["TRIGGER", "USB", "PLEVEL"]);
const MINUS_LEVEL: Setting<Voltage> = Setting::new(&["TRIGGER", "USB", "MLEVEL"]);

/// Settings of the USB trigger, `:TRIGGER:USB`.
#[derive(Debug)]
pub struct UsbTrigger<T: InstrumentInterface> {
    scope: ModeScope<T>,
}

impl<T: InstrumentInterface> UsbTrigger<T> {
    pub(crate) fn new(client: ProtocolClient<T>) -> Self {
        Self {
            scope: ModeScope::new(client, TriggerMode::Usb),
        }
    }

    /// Get the source of the D+ line.
    pub fn get_dplus_source(&self) -> Result<ChannelSource, Ds2000Error> {
        self.scope.get(&DPLUS)
    }

    /// Set the source of the D+ line.
    pub fn set_dplus_source(&self, source: ChannelSource) -> Result<(), Ds2000Error> {
        self.scope.set(&DPLUS, source)
    }

    /// Get the source of the D- line.
    pub fn get_dminus_source(&self) -> Result<ChannelSource, Ds2000Error> {
        self.scope.get(&DMINUS)
    }

    /// Set the source of the D- line.
    pub fn set_dminus_source(&self, source: ChannelSource) -> Result<(), Ds2000Error> {
        self.scope.set(&DMINUS, source)
    }

    /// Get the signal speed.
    pub fn get_speed(&self) -> Result<UsbSpeed, Ds2000Error> {
        self.scope.get(&SPEED)
    }

    /// Set the signal speed.
    pub fn set_speed(&self, speed: UsbSpeed) -> Result<(), Ds2000Error> {
        self.scope.set(&SPEED, speed)
    }

    /// Get the trigger condition.
    pub fn get_when(&self) -> Result<UsbWhen, Ds2000Error> {
        self.scope.get(&WHEN)
    }

    /// Set the trigger condition.
    pub fn set_when(&self, when: UsbWhen) -> Result<(), Ds2000Error> {
        self.scope.set(&WHEN, when)
    }

    /// Get the threshold of the D+ line.
    pub fn get_dplus_level(&self) -> Result<Voltage, Ds2000Error> {
        self.scope.get(&PLUS_LEVEL)
    }

    /// Set the threshold of the D+ line.
    pub fn set_dplus_level(&self, level: Voltage) -> Result<(), Ds2000Error> {
        self.scope.set(&PLUS_LEVEL, level)
    }

    /// Get the threshold of the D- line.
    pub fn get_dminus_level(&self) -> Result<Voltage, Ds2000Error> {
        self.scope.get(&MINUS_LEVEL)
    }

    /// Set the threshold of the D- line.
    pub fn set_dminus_level(&self, level: Voltage) -> Result<(), Ds2000Error> {
        self.scope.set(&MINUS_LEVEL, level)
    }
}

mode_selection!(UsbTrigger);
