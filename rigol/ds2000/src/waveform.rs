//! The waveform subsystem, `:WAVEFORM`, and decoding of captured waveforms.
//!
//! A capture is read in three steps: select the source, fetch the preamble and fetch the data
//! block. The preamble carries the scaling factors that turn raw sample integers into time and
//! voltage. It is fetched anew for every read since channel and timebase settings may change
//! between captures.
//!
//! ```
//! use rigol_ds2000::{Ds2000, waveform::WaveformSource};
//! use scpi_link::LoopbackInterface;
//!
//! let mut data = b"#210".to_vec();
//! data.extend([128, 130, 128, 128, 128, 128, 128, 128, 128, 128]);
//! let lbk = LoopbackInterface::new(
//!     vec![
//!         ":WAVEFORM:SOURCE CHANNEL1", ":SYSTEM:ERROR:NEXT?",
//!         ":WAVEFORM:PREAMBLE?", ":SYSTEM:ERROR:NEXT?",
//!         ":WAVEFORM:DATA?", ":SYSTEM:ERROR:NEXT?",
//!     ],
//!     vec![
//!         b"0,\"No error\"".to_vec(),
//!         b"1,0,10,1,1.000000e-06,0,0,4.000000e-02,0,128".to_vec(),
//!         b"0,\"No error\"".to_vec(),
//!         data,
//!         b"0,\"No error\"".to_vec(),
//!     ],
//!     "\n",
//! );
//! let scope = Ds2000::new(lbk);
//! let samples: Vec<_> = scope.waveform().read_waveform(WaveformSource::Channel1).unwrap().collect();
//! assert_eq!(samples.len(), 10);
//! assert!((samples[1].voltage.as_volts() - 0.08).abs() < 1e-12);
//! ```

use scpi_link::InstrumentInterface;

use measurements::Voltage;

use crate::{
    acquire::{Acquire, MemoryDepth},
    client::ProtocolClient,
    codec,
    command::Command,
    error::{Ds2000Error, check_int_range},
    mnemonic::mnemonic_enum,
    setting::Setting,
};

mnemonic_enum! {
    /// Source of the waveform to read.
    pub enum WaveformSource {
        /// Analog channel 1.
        Channel1 => "CHANNEL1" | "CHAN1",
        /// Analog channel 2.
        Channel2 => "CHANNEL2" | "CHAN2",
        /// Math waveform.
        Math => "MATH",
    }
}

impl WaveformSource {
    /// The source of the analog channel with the given zero based index.
    pub fn channel(idx: usize) -> Result<Self, Ds2000Error> {
        match idx {
            0 => Ok(WaveformSource::Channel1),
            1 => Ok(WaveformSource::Channel2),
            _ => Err(Ds2000Error::ChannelIndexOutOfRange {
                idx,
                nof_channels: 2,
            }),
        }
    }
}

mnemonic_enum! {
    /// Which points are returned by a waveform read.
    pub enum WaveformMode {
        /// The points currently displayed on screen.
        Normal => "NORMAL" | "NORM",
        /// The maximum number of effective points in the current state.
        Maximum => "MAXIMUM" | "MAX",
        /// The points in the internal memory. Only available when the acquisition is stopped.
        Raw => "RAW",
    }
}

impl WaveformMode {
    /// Decode the acquisition type code of a preamble.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(WaveformMode::Normal),
            1 => Some(WaveformMode::Maximum),
            2 => Some(WaveformMode::Raw),
            _ => None,
        }
    }
}

mnemonic_enum! {
    /// Encoding of the samples in the data block.
    pub enum WaveformFormat {
        /// 16 bit little-endian unsigned integers.
        Word => "WORD",
        /// 8 bit unsigned integers.
        Byte => "BYTE",
        /// Comma separated voltages.
        Ascii => "ASCII" | "ASC",
    }
}

impl WaveformFormat {
    /// Decode the format code of a preamble.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(WaveformFormat::Word),
            1 => Some(WaveformFormat::Byte),
            2 => Some(WaveformFormat::Ascii),
            _ => None,
        }
    }

    fn bytes_per_sample(&self) -> Option<usize> {
        match self {
            WaveformFormat::Word => Some(2),
            WaveformFormat::Byte => Some(1),
            WaveformFormat::Ascii => None,
        }
    }
}

/// The scaling information of a capture, as returned by `:WAVEFORM:PREAMBLE?`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformPreamble {
    /// Encoding of the samples.
    pub format: WaveformFormat,
    /// Acquisition type of the read.
    pub mode: WaveformMode,
    /// Number of points in the data block.
    pub points: usize,
    /// Number of averages, 1 outside of average mode.
    pub count: u32,
    /// Time between two points in seconds.
    pub x_increment: f64,
    /// Time of the reference point relative to the trigger in seconds.
    pub x_origin: f64,
    /// Index of the reference point.
    pub x_reference: f64,
    /// Volts per raw sample unit.
    pub y_increment: f64,
    /// Vertical offset in volts.
    pub y_origin: f64,
    /// Raw sample value of the vertical reference position.
    pub y_reference: f64,
}

impl WaveformPreamble {
    /// Parse the 10 comma separated fields of a preamble reply.
    pub fn from_reply(raw: &[u8]) -> Result<Self, Ds2000Error> {
        let malformed = || Ds2000Error::MalformedReply {
            command: String::new(),
            reply: String::from_utf8_lossy(raw).to_string(),
        };

        let text = codec::decode_text(raw)?;
        let fields: Vec<&[u8]> = text.split(',').map(str::as_bytes).collect();
        if fields.len() != 10 {
            return Err(malformed());
        }

        let format = WaveformFormat::from_code(codec::decode_integer(fields[0])?)
            .ok_or_else(malformed)?;
        let mode =
            WaveformMode::from_code(codec::decode_integer(fields[1])?).ok_or_else(malformed)?;
        let points =
            usize::try_from(codec::decode_integer(fields[2])?).map_err(|_| malformed())?;
        let count = u32::try_from(codec::decode_integer(fields[3])?).map_err(|_| malformed())?;

        Ok(Self {
            format,
            mode,
            points,
            count,
            x_increment: codec::decode_scalar(fields[4])?,
            x_origin: codec::decode_scalar(fields[5])?,
            x_reference: codec::decode_scalar(fields[6])?,
            y_increment: codec::decode_scalar(fields[7])?,
            y_origin: codec::decode_scalar(fields[8])?,
            y_reference: codec::decode_scalar(fields[9])?,
        })
    }

    /// Time of the point with the given index in seconds.
    pub fn time_of(&self, idx: usize) -> f64 {
        self.x_origin + (idx as f64 - self.x_reference) * self.x_increment
    }

    /// Voltage of a raw sample.
    pub fn voltage_of(&self, raw: u16) -> Voltage {
        Voltage::from_volts((f64::from(raw) - self.y_reference) * self.y_increment + self.y_origin)
    }
}

/// State of a waveform read from the internal memory, as returned by `:WAVEFORM:STATUS?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    /// The read has finished. Contains the number of points read.
    Idle(u64),
    /// The read is still running. Contains the number of points read so far.
    Reading(u64),
}

impl ReadStatus {
    fn from_reply(raw: &[u8]) -> Result<Self, Ds2000Error> {
        let malformed = || Ds2000Error::MalformedReply {
            command: String::new(),
            reply: String::from_utf8_lossy(raw).to_string(),
        };
        let text = codec::decode_text(raw)?;
        let (state, points) = text.split_once(',').ok_or_else(malformed)?;
        let points = u64::try_from(codec::decode_integer(points.as_bytes())?)
            .map_err(|_| malformed())?;
        match codec::decode_enum(state.as_bytes(), &["IDLE", "READ"])? {
            "IDLE" => Ok(ReadStatus::Idle(points)),
            _ => Ok(ReadStatus::Reading(points)),
        }
    }
}

/// A single decoded point of a waveform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformPoint {
    /// Time relative to the trigger in seconds.
    pub time: f64,
    /// Measured voltage.
    pub voltage: Voltage,
}

#[derive(Debug)]
enum Samples {
    Word(Vec<u8>),
    Byte(Vec<u8>),
    Ascii(Vec<f64>),
}

/// The decoded points of one capture.
///
/// The points are computed lazily while iterating. The iterator yields exactly
/// [`WaveformPreamble::points`] items and cannot be restarted.
#[derive(Debug)]
pub struct WaveformSamples {
    preamble: WaveformPreamble,
    samples: Samples,
    next: usize,
}

impl WaveformSamples {
    /// Combine a preamble with the payload of the data block of the same capture.
    ///
    /// Fails with [`Ds2000Error::PointCountMismatch`] if the payload does not hold exactly the
    /// number of points the preamble announces.
    pub fn new(preamble: WaveformPreamble, payload: Vec<u8>) -> Result<Self, Ds2000Error> {
        let (samples, actual) = match preamble.format.bytes_per_sample() {
            Some(width) => {
                if payload.len() % width != 0 {
                    return Err(Ds2000Error::MalformedReply {
                        command: String::new(),
                        reply: format!(
                            "{} bytes of {} samples",
                            payload.len(),
                            preamble.format
                        ),
                    });
                }
                let actual = payload.len() / width;
                let samples = if width == 2 {
                    Samples::Word(payload)
                } else {
                    Samples::Byte(payload)
                };
                (samples, actual)
            }
            None => {
                let values = parse_ascii(&payload)?;
                let actual = values.len();
                (Samples::Ascii(values), actual)
            }
        };

        if actual != preamble.points {
            return Err(Ds2000Error::PointCountMismatch {
                expected: preamble.points,
                actual,
            });
        }

        Ok(Self {
            preamble,
            samples,
            next: 0,
        })
    }

    /// The preamble the samples are scaled with.
    pub fn preamble(&self) -> &WaveformPreamble {
        &self.preamble
    }
}

impl Iterator for WaveformSamples {
    type Item = WaveformPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next;
        if idx >= self.preamble.points {
            return None;
        }
        let voltage = match &self.samples {
            Samples::Word(bytes) => {
                self.preamble
                    .voltage_of(u16::from_le_bytes([bytes[2 * idx], bytes[2 * idx + 1]]))
            }
            Samples::Byte(bytes) => self.preamble.voltage_of(u16::from(bytes[idx])),
            Samples::Ascii(values) => Voltage::from_volts(values[idx]),
        };
        self.next += 1;
        Some(WaveformPoint {
            time: self.preamble.time_of(idx),
            voltage,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.preamble.points - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for WaveformSamples {}

fn parse_ascii(payload: &[u8]) -> Result<Vec<f64>, Ds2000Error> {
    let text = codec::decode_text(payload)?;
    text.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| codec::decode_scalar(value.as_bytes()))
        .collect()
}

const SOURCE: Setting<WaveformSource> = Setting::new(&["WAVEFORM", "SOURCE"]);
const MODE: Setting<WaveformMode> = Setting::new(&["WAVEFORM", "MODE"]);
const FORMAT: Setting<WaveformFormat> = Setting::new(&["WAVEFORM", "FORMAT"]);
const POINTS: Setting<u32> = Setting::new(&["WAVEFORM", "POINTS"]);
const START: Setting<u32> = Setting::new(&["WAVEFORM", "START"]);
const STOP: Setting<u32> = Setting::new(&["WAVEFORM", "STOP"]);

const MAX_POINTS: i64 = 56_000_000;

/// The waveform subsystem of the DS2000.
#[derive(Debug)]
pub struct Waveform<T: InstrumentInterface> {
    client: ProtocolClient<T>,
}

impl<T: InstrumentInterface> Waveform<T> {
    pub(crate) fn new(client: ProtocolClient<T>) -> Self {
        Self { client }
    }

    /// Get the source of waveform reads.
    pub fn get_source(&self) -> Result<WaveformSource, Ds2000Error> {
        SOURCE.get(&self.client, &[])
    }

    /// Set the source of waveform reads.
    pub fn set_source(&self, source: WaveformSource) -> Result<(), Ds2000Error> {
        SOURCE.set(&self.client, &[], source)
    }

    /// Get the read mode.
    pub fn get_mode(&self) -> Result<WaveformMode, Ds2000Error> {
        MODE.get(&self.client, &[])
    }

    /// Set the read mode.
    pub fn set_mode(&self, mode: WaveformMode) -> Result<(), Ds2000Error> {
        MODE.set(&self.client, &[], mode)
    }

    /// Get the sample format.
    pub fn get_format(&self) -> Result<WaveformFormat, Ds2000Error> {
        FORMAT.get(&self.client, &[])
    }

    /// Set the sample format.
    pub fn set_format(&self, format: WaveformFormat) -> Result<(), Ds2000Error> {
        FORMAT.set(&self.client, &[], format)
    }

    /// Get the number of points that a read returns.
    pub fn get_points(&self) -> Result<u32, Ds2000Error> {
        POINTS.get(&self.client, &[])
    }

    /// Set the number of points to read in [`WaveformMode::Raw`], from 1 to 56 000 000.
    pub fn set_points(&self, points: u32) -> Result<(), Ds2000Error> {
        check_int_range(i64::from(points), 1, MAX_POINTS)?;
        POINTS.set(&self.client, &[], points)
    }

    /// Get the index of the first point to read, starting at 1.
    pub fn get_start(&self) -> Result<u32, Ds2000Error> {
        START.get(&self.client, &[])
    }

    /// Set the index of the first point to read, starting at 1.
    pub fn set_start(&self, start: u32) -> Result<(), Ds2000Error> {
        check_int_range(i64::from(start), 1, MAX_POINTS)?;
        START.set(&self.client, &[], start)
    }

    /// Get the index of the last point to read.
    pub fn get_stop(&self) -> Result<u32, Ds2000Error> {
        STOP.get(&self.client, &[])
    }

    /// Set the index of the last point to read.
    pub fn set_stop(&self, stop: u32) -> Result<(), Ds2000Error> {
        check_int_range(i64::from(stop), 1, MAX_POINTS)?;
        STOP.set(&self.client, &[], stop)
    }

    /// Reset a read from the internal memory.
    pub fn reset(&self) -> Result<(), Ds2000Error> {
        self.client.set(&Command::event(["WAVEFORM", "RESET"]))
    }

    /// Start a read from the internal memory.
    pub fn begin(&self) -> Result<(), Ds2000Error> {
        self.client.set(&Command::event(["WAVEFORM", "BEGIN"]))
    }

    /// Stop a read from the internal memory.
    pub fn end(&self) -> Result<(), Ds2000Error> {
        self.client.set(&Command::event(["WAVEFORM", "END"]))
    }

    /// Get the state of a read from the internal memory.
    pub fn get_status(&self) -> Result<ReadStatus, Ds2000Error> {
        let cmd = Command::query(["WAVEFORM", "STATUS"]);
        let reply = self.client.query(&cmd)?;
        ReadStatus::from_reply(&reply).map_err(|e| e.in_reply_to(&cmd.encode()))
    }

    /// Get the preamble of the current source.
    pub fn get_preamble(&self) -> Result<WaveformPreamble, Ds2000Error> {
        let cmd = Command::query(["WAVEFORM", "PREAMBLE"]);
        let reply = self.client.query(&cmd)?;
        WaveformPreamble::from_reply(&reply).map_err(|e| e.in_reply_to(&cmd.encode()))
    }

    /// Get the payload of the data block of the current source, undecoded.
    pub fn get_data(&self) -> Result<Vec<u8>, Ds2000Error> {
        self.client
            .query_block(&Command::query(["WAVEFORM", "DATA"]))
    }

    /// Read and decode the waveform of the given source.
    ///
    /// This is three round trips: the source is selected, then the preamble and the data block
    /// are queried. Read mode, format and point range are taken as currently set.
    pub fn read_waveform(&self, source: WaveformSource) -> Result<WaveformSamples, Ds2000Error> {
        self.set_source(source)?;
        let preamble = self.get_preamble()?;
        let payload = self.get_data()?;
        log::debug!(
            "Read {} bytes of {source} in {} format, {} points announced",
            payload.len(),
            preamble.format,
            preamble.points
        );
        WaveformSamples::new(preamble, payload)
    }

    /// Read and decode the whole internal memory of the given source.
    ///
    /// The memory depth must be fixed, [`MemoryDepth::Auto`] is rejected with
    /// [`Ds2000Error::InvalidArgument`] after querying it. The acquisition is stopped and the read
    /// mode switched to [`WaveformMode::Raw`]. The point range is set to the full memory and the
    /// preamble is fetched. The instrument then hands out the data block by block: after
    /// `:WAVEFORM:BEGIN`, each `:WAVEFORM:STATUS?` is followed by one `:WAVEFORM:DATA?` until the
    /// status reports idle, at which point the read is closed with `:WAVEFORM:END`. The sample
    /// format is taken as currently set.
    pub fn read_memory_waveform(
        &self,
        source: WaveformSource,
    ) -> Result<WaveformSamples, Ds2000Error> {
        let depth = match Acquire::new(self.client.clone()).get_memory_depth()? {
            MemoryDepth::Points(points) => points,
            MemoryDepth::Auto => {
                return Err(Ds2000Error::InvalidArgument(
                    "Reading the internal memory requires a fixed memory depth.".to_string(),
                ));
            }
        };

        self.client.set(&Command::event(["STOP"]))?;
        self.set_source(source)?;
        self.set_mode(WaveformMode::Raw)?;
        self.reset()?;
        self.set_start(1)?;
        self.set_stop(depth)?;
        let preamble = self.get_preamble()?;

        self.begin()?;
        let mut payload = Vec::new();
        loop {
            let status = self.get_status()?;
            let chunk = self.get_data()?;
            log::debug!("Read chunk of {} bytes, status {status:?}", chunk.len());
            payload.extend_from_slice(&chunk);
            if let ReadStatus::Idle(_) = status {
                break;
            }
        }
        self.end()?;

        log::debug!(
            "Read {} bytes of {source} from memory, {} points announced",
            payload.len(),
            preamble.points
        );
        WaveformSamples::new(preamble, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::*;

    #[fixture]
    fn preamble() -> WaveformPreamble {
        WaveformPreamble {
            format: WaveformFormat::Byte,
            mode: WaveformMode::Normal,
            points: 3,
            count: 1,
            x_increment: 1e-6,
            x_origin: 0.0,
            x_reference: 0.0,
            y_increment: 0.04,
            y_origin: 0.0,
            y_reference: 128.0,
        }
    }

    #[test]
    fn test_preamble_from_reply() {
        let pre =
            WaveformPreamble::from_reply(b"0,2,1400,1,0.000000,-0.000007,0,0.040000,2.000000,127")
                .unwrap();
        assert_eq!(pre.format, WaveformFormat::Word);
        assert_eq!(pre.mode, WaveformMode::Raw);
        assert_eq!(pre.points, 1400);
        assert_eq!(pre.count, 1);
        assert_eq!(pre.x_origin, -0.000007);
        assert_eq!(pre.y_reference, 127.0);
    }

    #[rstest]
    #[case(b"0,0,1400,1,0,0,0,0.04,2")]
    #[case(b"7,0,1400,1,0,0,0,0.04,2,127")]
    #[case(b"0,0,many,1,0,0,0,0.04,2,127")]
    fn test_preamble_malformed(#[case] raw: &[u8]) {
        assert!(matches!(
            WaveformPreamble::from_reply(raw),
            Err(Ds2000Error::MalformedReply { .. })
        ));
    }

    #[rstest]
    fn test_samples_byte(preamble: WaveformPreamble) {
        let samples = WaveformSamples::new(preamble, vec![128, 130, 118]).unwrap();
        assert_eq!(samples.len(), 3);
        let points: Vec<_> = samples.collect();
        assert_eq!(points[0].time, 0.0);
        assert!((points[1].time - 1e-6).abs() < 1e-15);
        assert!((points[1].voltage.as_volts() - 0.08).abs() < 1e-12);
        assert!((points[2].voltage.as_volts() + 0.4).abs() < 1e-12);
    }

    #[rstest]
    fn test_samples_word(mut preamble: WaveformPreamble) {
        preamble.format = WaveformFormat::Word;
        preamble.points = 2;
        preamble.y_reference = 32768.0;
        let samples = WaveformSamples::new(preamble, vec![0x00, 0x80, 0x01, 0x80]).unwrap();
        let volts: Vec<f64> = samples.map(|p| p.voltage.as_volts()).collect();
        assert_eq!(volts[0], 0.0);
        assert!((volts[1] - 0.04).abs() < 1e-12);
    }

    #[rstest]
    fn test_samples_ascii(mut preamble: WaveformPreamble) {
        preamble.format = WaveformFormat::Ascii;
        let samples =
            WaveformSamples::new(preamble, b"1.2e-01,-3.000000e-01,0.5,".to_vec()).unwrap();
        let volts: Vec<f64> = samples.map(|p| p.voltage.as_volts()).collect();
        assert_eq!(volts, vec![0.12, -0.3, 0.5]);
    }

    #[rstest]
    fn test_samples_point_count_mismatch(preamble: WaveformPreamble) {
        let err = WaveformSamples::new(preamble, vec![128, 128]).unwrap_err();
        assert!(matches!(
            err,
            Ds2000Error::PointCountMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[rstest]
    fn test_samples_odd_word_payload(mut preamble: WaveformPreamble) {
        preamble.format = WaveformFormat::Word;
        assert!(WaveformSamples::new(preamble, vec![0; 5]).is_err());
    }

    #[rstest]
    fn test_samples_exhausted(preamble: WaveformPreamble) {
        let mut samples = WaveformSamples::new(preamble, vec![128; 3]).unwrap();
        assert_eq!(samples.by_ref().count(), 3);
        assert_eq!(samples.len(), 0);
        assert!(samples.next().is_none());
    }

    #[rstest]
    #[case(b"IDLE,1400", ReadStatus::Idle(1400))]
    #[case(b"READ,250000", ReadStatus::Reading(250_000))]
    fn test_read_status(#[case] raw: &[u8], #[case] exp: ReadStatus) {
        assert_eq!(ReadStatus::from_reply(raw).unwrap(), exp);
    }

    #[test]
    fn test_source_from_channel_index() {
        assert_eq!(WaveformSource::channel(1).unwrap(), WaveformSource::Channel2);
        assert!(matches!(
            WaveformSource::channel(2),
            Err(Ds2000Error::ChannelIndexOutOfRange { idx: 2, .. })
        ));
    }
}
