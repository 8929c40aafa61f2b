//! The acquire subsystem, `:ACQUIRE`.

use measurements::Frequency;
use scpi_link::InstrumentInterface;

use crate::{
    client::ProtocolClient,
    codec,
    command::Argument,
    error::Ds2000Error,
    mnemonic::mnemonic_enum,
    setting::{Setting, SettingValue},
};

mnemonic_enum! {
    /// Acquisition type.
    pub enum AcquisitionType {
        /// Sample at equal time intervals.
        Normal => "NORMAL" | "NORM",
        /// Average over several acquisitions.
        Averages => "AVERAGES" | "AVER",
        /// Keep maximum and minimum of each sample interval.
        Peak => "PEAK",
        /// Average neighboring samples.
        HighResolution => "HRESOLUTION" | "HRES",
    }
}

/// Memory depth, i.e., the number of points stored per trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryDepth {
    /// Chosen by the instrument from the sample rate.
    Auto,
    /// A fixed number of points.
    Points(u32),
}

impl MemoryDepth {
    /// Memory depths available with one channel enabled.
    pub const SINGLE_CHANNEL: [u32; 5] = [14_000, 140_000, 1_400_000, 14_000_000, 56_000_000];
    /// Memory depths available with both channels enabled.
    pub const DUAL_CHANNEL: [u32; 5] = [7_000, 70_000, 700_000, 7_000_000, 28_000_000];
}

impl SettingValue for MemoryDepth {
    fn to_argument(&self) -> Argument {
        match self {
            MemoryDepth::Auto => Argument::Mnemonic("AUTO"),
            MemoryDepth::Points(points) => Argument::Integer(i64::from(*points)),
        }
    }

    fn from_reply(raw: &[u8]) -> Result<Self, Ds2000Error> {
        if codec::decode_text(raw)?.eq_ignore_ascii_case("AUTO") {
            return Ok(MemoryDepth::Auto);
        }
        u32::from_reply(raw).map(MemoryDepth::Points)
    }
}

const TYPE: Setting<AcquisitionType> = Setting::new(&["ACQUIRE", "TYPE"]);
const AVERAGES: Setting<u32> = Setting::new(&["ACQUIRE", "AVERAGES"]);
const MEMORY_DEPTH: Setting<MemoryDepth> = Setting::new(&["ACQUIRE", "MDEPTH"]);
const SAMPLE_RATE: Setting<Frequency> = Setting::new(&["ACQUIRE", "SRATE"]);
const ANTI_ALIASING: Setting<bool> = Setting::new(&["ACQUIRE", "AALIAS"]);

/// The acquire subsystem of the DS2000.
#[derive(Debug)]
pub struct Acquire<T: InstrumentInterface> {
    client: ProtocolClient<T>,
}

impl<T: InstrumentInterface> Acquire<T> {
    pub(crate) fn new(client: ProtocolClient<T>) -> Self {
        Self { client }
    }

    /// Get the acquisition type.
    pub fn get_type(&self) -> Result<AcquisitionType, Ds2000Error> {
        TYPE.get(&self.client, &[])
    }

    /// Set the acquisition type.
    pub fn set_type(&self, acq_type: AcquisitionType) -> Result<(), Ds2000Error> {
        TYPE.set(&self.client, &[], acq_type)
    }

    /// Get the number of averages used with [`AcquisitionType::Averages`].
    pub fn get_averages(&self) -> Result<u32, Ds2000Error> {
        AVERAGES.get(&self.client, &[])
    }

    /// Set the number of averages. Must be a power of two from 2 to 8192.
    pub fn set_averages(&self, averages: u32) -> Result<(), Ds2000Error> {
        if !averages.is_power_of_two() || !(2..=8192).contains(&averages) {
            return Err(Ds2000Error::InvalidArgument(format!(
                "Number of averages must be a power of two between 2 and 8192, got {averages}."
            )));
        }
        AVERAGES.set(&self.client, &[], averages)
    }

    /// Get the memory depth.
    pub fn get_memory_depth(&self) -> Result<MemoryDepth, Ds2000Error> {
        MEMORY_DEPTH.get(&self.client, &[])
    }

    /// Set the memory depth.
    ///
    /// Fixed depths must be one of [`MemoryDepth::SINGLE_CHANNEL`] or
    /// [`MemoryDepth::DUAL_CHANNEL`]. Which of them is accepted depends on the number of enabled
    /// channels, which is checked by the instrument.
    pub fn set_memory_depth(&self, depth: MemoryDepth) -> Result<(), Ds2000Error> {
        if let MemoryDepth::Points(points) = depth {
            if !MemoryDepth::SINGLE_CHANNEL.contains(&points)
                && !MemoryDepth::DUAL_CHANNEL.contains(&points)
            {
                return Err(Ds2000Error::InvalidArgument(format!(
                    "Memory depth of {points} points is not supported."
                )));
            }
        }
        MEMORY_DEPTH.set(&self.client, &[], depth)
    }

    /// Get the current sample rate.
    pub fn get_sample_rate(&self) -> Result<Frequency, Ds2000Error> {
        SAMPLE_RATE.get(&self.client, &[])
    }

    /// Whether anti-aliasing is enabled.
    pub fn get_anti_aliasing(&self) -> Result<bool, Ds2000Error> {
        ANTI_ALIASING.get(&self.client, &[])
    }

    /// Enable or disable anti-aliasing.
    pub fn set_anti_aliasing(&self, enabled: bool) -> Result<(), Ds2000Error> {
        ANTI_ALIASING.set(&self.client, &[], enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::*;

    #[rstest]
    #[case(b"AUTO", MemoryDepth::Auto)]
    #[case(b"14000", MemoryDepth::Points(14_000))]
    #[case(b"1.400000e+07", MemoryDepth::Points(14_000_000))]
    fn test_memory_depth_from_reply(#[case] raw: &[u8], #[case] exp: MemoryDepth) {
        assert_eq!(MemoryDepth::from_reply(raw).unwrap(), exp);
    }

    #[test]
    fn test_memory_depth_argument() {
        assert_eq!(MemoryDepth::Auto.to_argument().encode(), "AUTO");
        assert_eq!(MemoryDepth::Points(7000).to_argument().encode(), "7000");
    }
}
