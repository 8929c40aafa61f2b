//! The channel subsystem, `:CHANNEL<n>`.

use measurements::Voltage;
use scpi_link::InstrumentInterface;

use crate::{
    client::ProtocolClient,
    error::Ds2000Error,
    mnemonic::mnemonic_enum,
    setting::{OnOff, Setting},
};

mnemonic_enum! {
    /// Bandwidth limit of a channel.
    pub enum BandwidthLimit {
        /// Limit to 20 MHz.
        Mhz20 => "20M",
        /// Limit to 100 MHz. Only available on models with more than 100 MHz bandwidth.
        Mhz100 => "100M",
        /// Full bandwidth.
        Off => "OFF",
    }
}

mnemonic_enum! {
    /// Input coupling of a channel.
    pub enum Coupling {
        /// Block the DC component.
        Ac => "AC",
        /// Pass AC and DC components.
        Dc => "DC",
        /// Disconnect the signal.
        Gnd => "GND",
    }
}

mnemonic_enum! {
    /// Unit of the displayed amplitude.
    pub enum ChannelUnit {
        /// Volt.
        Voltage => "VOLTAGE" | "VOLT",
        /// Watt.
        Watt => "WATT",
        /// Ampere.
        Ampere => "AMPERE" | "AMP",
        /// No unit.
        Unknown => "UNKNOWN" | "UNKN",
    }
}

/// Probe attenuation ratios supported by the DS2000.
pub const PROBE_RATIOS: [f64; 16] = [
    0.01, 0.02, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0, 500.0, 1000.0,
];

const BANDWIDTH_LIMIT: Setting<BandwidthLimit> = Setting::new(&["BWLIMIT"]);
const COUPLING: Setting<Coupling> = Setting::new(&["COUPLING"]);
const DISPLAY: Setting<OnOff> = Setting::new(&["DISPLAY"]);
const INVERT: Setting<bool> = Setting::new(&["INVERT"]);
const OFFSET: Setting<Voltage> = Setting::new(&["OFFSET"]);
const SCALE: Setting<Voltage> = Setting::new(&["SCALE"]);
const PROBE: Setting<f64> = Setting::new(&["PROBE"]);
const UNITS: Setting<ChannelUnit> = Setting::new(&["UNITS"]);
const VERNIER: Setting<bool> = Setting::new(&["VERNIER"]);

/// Channel structure representing a single analog input of the DS2000.
///
/// **This structure can only be created through the [`crate::Ds2000`] struct.**
///
/// Channels are zero indexed, channel 0 is `CHANNEL1` on the front panel.
#[derive(Debug)]
pub struct Channel<T: InstrumentInterface> {
    idx: usize,
    node: String,
    client: ProtocolClient<T>,
}

impl<T: InstrumentInterface> Channel<T> {
    pub(crate) fn new(idx: usize, client: ProtocolClient<T>) -> Self {
        Channel {
            idx,
            node: format!("CHANNEL{}", idx + 1),
            client,
        }
    }

    /// Zero based index of the channel.
    pub fn idx(&self) -> usize {
        self.idx
    }

    fn scope(&self) -> [&str; 1] {
        [self.node.as_str()]
    }

    /// Get the bandwidth limit.
    pub fn get_bandwidth_limit(&self) -> Result<BandwidthLimit, Ds2000Error> {
        BANDWIDTH_LIMIT.get(&self.client, &self.scope())
    }

    /// Set the bandwidth limit.
    pub fn set_bandwidth_limit(&self, limit: BandwidthLimit) -> Result<(), Ds2000Error> {
        BANDWIDTH_LIMIT.set(&self.client, &self.scope(), limit)
    }

    /// Get the input coupling.
    pub fn get_coupling(&self) -> Result<Coupling, Ds2000Error> {
        COUPLING.get(&self.client, &self.scope())
    }

    /// Set the input coupling.
    pub fn set_coupling(&self, coupling: Coupling) -> Result<(), Ds2000Error> {
        COUPLING.set(&self.client, &self.scope(), coupling)
    }

    /// Whether the channel is displayed.
    pub fn get_display(&self) -> Result<bool, Ds2000Error> {
        DISPLAY.get(&self.client, &self.scope()).map(bool::from)
    }

    /// Show or hide the channel.
    pub fn set_display(&self, enabled: bool) -> Result<(), Ds2000Error> {
        DISPLAY.set(&self.client, &self.scope(), OnOff(enabled))
    }

    /// Whether the waveform is inverted.
    pub fn get_invert(&self) -> Result<bool, Ds2000Error> {
        INVERT.get(&self.client, &self.scope())
    }

    /// Invert the waveform or return to normal.
    pub fn set_invert(&self, inverted: bool) -> Result<(), Ds2000Error> {
        INVERT.set(&self.client, &self.scope(), inverted)
    }

    /// Get the vertical offset.
    pub fn get_offset(&self) -> Result<Voltage, Ds2000Error> {
        OFFSET.get(&self.client, &self.scope())
    }

    /// Set the vertical offset. The valid range depends on the scale and is checked by the
    /// instrument.
    pub fn set_offset(&self, offset: Voltage) -> Result<(), Ds2000Error> {
        OFFSET.set(&self.client, &self.scope(), offset)
    }

    /// Get the vertical scale per division.
    pub fn get_scale(&self) -> Result<Voltage, Ds2000Error> {
        SCALE.get(&self.client, &self.scope())
    }

    /// Set the vertical scale per division.
    ///
    /// With a 1x probe the range is 500 uV to 10 V, the limits scale with the probe ratio.
    pub fn set_scale(&self, scale: Voltage) -> Result<(), Ds2000Error> {
        if scale.as_volts() <= 0.0 {
            return Err(Ds2000Error::InvalidArgument(format!(
                "Vertical scale must be positive, got {} V.",
                scale.as_volts()
            )));
        }
        SCALE.set(&self.client, &self.scope(), scale)
    }

    /// Get the probe attenuation ratio.
    pub fn get_probe(&self) -> Result<f64, Ds2000Error> {
        PROBE.get(&self.client, &self.scope())
    }

    /// Set the probe attenuation ratio, one of [`PROBE_RATIOS`].
    pub fn set_probe(&self, ratio: f64) -> Result<(), Ds2000Error> {
        if !PROBE_RATIOS.iter().any(|r| (r - ratio).abs() <= r * 1e-9) {
            return Err(Ds2000Error::InvalidArgument(format!(
                "Probe ratio {ratio} is not supported."
            )));
        }
        PROBE.set(&self.client, &self.scope(), ratio)
    }

    /// Get the amplitude unit.
    pub fn get_units(&self) -> Result<ChannelUnit, Ds2000Error> {
        UNITS.get(&self.client, &self.scope())
    }

    /// Set the amplitude unit.
    pub fn set_units(&self, unit: ChannelUnit) -> Result<(), Ds2000Error> {
        UNITS.set(&self.client, &self.scope(), unit)
    }

    /// Whether fine adjustment of the vertical scale is enabled.
    pub fn get_vernier(&self) -> Result<bool, Ds2000Error> {
        VERNIER.get(&self.client, &self.scope())
    }

    /// Enable or disable fine adjustment of the vertical scale.
    pub fn set_vernier(&self, enabled: bool) -> Result<(), Ds2000Error> {
        VERNIER.set(&self.client, &self.scope(), enabled)
    }
}
