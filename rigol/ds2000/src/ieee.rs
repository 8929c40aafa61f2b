//! IEEE 488.2 common commands.

use std::fmt::Display;

use scpi_link::InstrumentInterface;

use crate::{
    client::ProtocolClient,
    codec,
    command::{Argument, Command},
    error::{Ds2000Error, check_int_range},
    trigger::TriggerMode,
};

/// Identification of the instrument as returned by `*IDN?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentInfo {
    /// Manufacturer, e.g., `RIGOL TECHNOLOGIES`.
    pub manufacturer: String,
    /// Model number, e.g., `DS2202`.
    pub model: String,
    /// Serial number.
    pub serial: String,
    /// Firmware version.
    pub firmware: String,
}

impl InstrumentInfo {
    /// Parse the four comma separated fields of an `*IDN?` reply.
    pub fn from_reply(raw: &[u8]) -> Result<Self, Ds2000Error> {
        let text = codec::decode_text(raw)?;
        let fields: Vec<&str> = text.split(',').map(str::trim).collect();
        match fields.as_slice() {
            [manufacturer, model, serial, firmware] => Ok(Self {
                manufacturer: manufacturer.to_string(),
                model: model.to_string(),
                serial: serial.to_string(),
                firmware: firmware.to_string(),
            }),
            _ => Err(Ds2000Error::MalformedReply {
                command: String::new(),
                reply: text.to_string(),
            }),
        }
    }
}

impl Display for InstrumentInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} (serial {}, firmware {})",
            self.manufacturer, self.model, self.serial, self.firmware
        )
    }
}

/// The IEEE 488.2 common commands of the DS2000.
#[derive(Debug)]
pub struct Ieee<T: InstrumentInterface> {
    client: ProtocolClient<T>,
}

impl<T: InstrumentInterface> Ieee<T> {
    pub(crate) fn new(client: ProtocolClient<T>) -> Self {
        Self { client }
    }

    /// Query the identification, `*IDN?`.
    pub fn idn(&self) -> Result<InstrumentInfo, Ds2000Error> {
        let cmd = Command::query(["*IDN"]);
        let reply = self.client.query(&cmd)?;
        InstrumentInfo::from_reply(&reply).map_err(|e| e.in_reply_to(&cmd.encode()))
    }

    /// Restore the default settings, `*RST`.
    ///
    /// After a reset the instrument is in edge trigger mode, which becomes the tracked mode.
    pub fn rst(&self) -> Result<(), Ds2000Error> {
        self.client
            .set_changing_trigger_mode(&Command::event(["*RST"]), Some(TriggerMode::Edge))
    }

    /// Clear all event registers and the error queue, `*CLS`.
    pub fn cls(&self) -> Result<(), Ds2000Error> {
        self.client.set(&Command::event(["*CLS"]))
    }

    /// Set the operation complete bit once all pending operations are done, `*OPC`.
    pub fn opc(&self) -> Result<(), Ds2000Error> {
        self.client.set(&Command::event(["*OPC"]))
    }

    /// Whether all pending operations are done, `*OPC?`.
    pub fn is_operation_complete(&self) -> Result<bool, Ds2000Error> {
        self.client.query_value(&Command::query(["*OPC"]))
    }

    /// Get the standard event status enable register, `*ESE?`.
    pub fn get_ese(&self) -> Result<u32, Ds2000Error> {
        self.client.query_value(&Command::query(["*ESE"]))
    }

    /// Set the standard event status enable register, `*ESE`.
    pub fn set_ese(&self, mask: u32) -> Result<(), Ds2000Error> {
        check_int_range(i64::from(mask), 0, 255)?;
        self.client
            .set(&Command::set(["*ESE"], Argument::Integer(i64::from(mask))))
    }

    /// Read and clear the standard event status register, `*ESR?`.
    pub fn esr(&self) -> Result<u32, Ds2000Error> {
        self.client.query_value(&Command::query(["*ESR"]))
    }

    /// Get the service request enable register, `*SRE?`.
    pub fn get_sre(&self) -> Result<u32, Ds2000Error> {
        self.client.query_value(&Command::query(["*SRE"]))
    }

    /// Set the service request enable register, `*SRE`.
    pub fn set_sre(&self, mask: u32) -> Result<(), Ds2000Error> {
        check_int_range(i64::from(mask), 0, 255)?;
        self.client
            .set(&Command::set(["*SRE"], Argument::Integer(i64::from(mask))))
    }

    /// Read the status byte, `*STB?`.
    pub fn stb(&self) -> Result<u32, Ds2000Error> {
        self.client.query_value(&Command::query(["*STB"]))
    }

    /// Run the self test and return its result, `*TST?`. Zero means passed.
    pub fn tst(&self) -> Result<i64, Ds2000Error> {
        self.client.query_value(&Command::query(["*TST"]))
    }

    /// Wait until all pending operations are done before executing further commands, `*WAI`.
    pub fn wai(&self) -> Result<(), Ds2000Error> {
        self.client.set(&Command::event(["*WAI"]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_from_reply() {
        let info =
            InstrumentInfo::from_reply(b"RIGOL TECHNOLOGIES,DS2202,DS2A0000000001,00.00.01\n")
                .unwrap();
        assert_eq!(info.manufacturer, "RIGOL TECHNOLOGIES");
        assert_eq!(info.model, "DS2202");
        assert_eq!(info.serial, "DS2A0000000001");
        assert_eq!(info.firmware, "00.00.01");
    }

    #[test]
    fn test_info_malformed() {
        assert!(matches!(
            InstrumentInfo::from_reply(b"RIGOL TECHNOLOGIES,DS2202"),
            Err(Ds2000Error::MalformedReply { .. })
        ));
    }
}
