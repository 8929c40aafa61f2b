//! The trigger subsystem.
//!
//! The DS2000 has 16 trigger modes, each with its own set of parameters under
//! `:TRIGGER:<MODE>:...`. Only the parameters of the active mode can be changed. The session
//! therefore tracks which mode was selected last: the setters of every mode façade check the
//! tracked mode first and return [`Ds2000Error::WrongTriggerMode`] without sending anything if
//! it differs. Getters are always allowed.
//!
//! ```
//! use rigol_ds2000::{Ds2000, Ds2000Error, TriggerMode};
//! use scpi_link::LoopbackInterface;
//!
//! let lbk = LoopbackInterface::new(
//!     vec![":TRIGGER:MODE EDGE", ":SYSTEM:ERROR:NEXT?"],
//!     vec!["0,\"No error\""],
//!     "\n",
//! );
//! let scope = Ds2000::new(lbk);
//! let trigger = scope.trigger();
//! trigger.set_mode(TriggerMode::Edge).unwrap();
//!
//! let err = trigger.pulse().set_when(rigol_ds2000::trigger::WidthCondition::PositiveGreater);
//! assert!(matches!(err, Err(Ds2000Error::WrongTriggerMode { .. })));
//! ```

mod delay;
mod duration;
mod edge;
mod i2c;
mod nth_edge;
mod pattern;
mod pulse;
mod rs232;
mod runt;
mod setup_hold;
mod slope;
mod spi;
mod timeout;
mod usb;
mod video;
mod window;

pub use delay::{DelayCondition, DelayTrigger};
pub use duration::DurationTrigger;
pub use edge::EdgeTrigger;
pub use i2c::{I2cDirection, I2cTrigger, I2cWhen};
pub use nth_edge::NthEdgeTrigger;
pub use pattern::{PatternTrigger, PatternValue};
pub use pulse::PulseTrigger;
pub use rs232::{Parity, Rs232Trigger, Rs232When};
pub use runt::{RuntCondition, RuntTrigger};
pub use setup_hold::{DataPattern, SetupHoldTrigger, SetupHoldType};
pub use slope::{SlopeTrigger, SlopeWindow};
pub use spi::SpiTrigger;
pub use timeout::TimeoutTrigger;
pub use usb::{UsbSpeed, UsbTrigger, UsbWhen};
pub use video::{VideoMode, VideoStandard, VideoTrigger};
pub use window::{WindowPosition, WindowTrigger};

use std::time::Duration;

use scpi_link::InstrumentInterface;

use crate::{
    client::ProtocolClient,
    command::Command,
    error::{Ds2000Error, check_float_range},
    mnemonic::mnemonic_enum,
    setting::{Setting, SettingValue},
};

mnemonic_enum! {
    /// The trigger modes of the DS2000.
    pub enum TriggerMode {
        /// Trigger on an edge.
        Edge => "EDGE",
        /// Trigger on a pulse of a given width.
        Pulse => "PULSE" | "PULS",
        /// Trigger on a pulse that crosses one threshold but not the other.
        Runt => "RUNT",
        /// Trigger when the signal enters or leaves a voltage window.
        Window => "WIND",
        /// Trigger on the n-th edge after an idle time.
        NthEdge => "NEDG",
        /// Trigger on a rising or falling slope of a given duration.
        Slope => "SLOPE" | "SLOP",
        /// Trigger on a video signal.
        Video => "VIDEO" | "VID",
        /// Trigger on a pattern of channel states.
        Pattern => "PATTERN" | "PATT",
        /// Trigger on the time between edges of two channels.
        Delay => "DELAY" | "DEL",
        /// Trigger when no edge occurs within a given time.
        Timeout => "TIMEOUT" | "TIM",
        /// Trigger when a pattern lasts for a given duration.
        Duration => "DURATION" | "DURAT" | "DUR",
        /// Trigger on setup or hold time violations.
        SetupHold => "SHOLD" | "SHOL",
        /// Trigger on an RS232 frame.
        Rs232 => "RS232",
        /// Trigger on an I2C bus condition.
        I2c => "IIC",
        /// Trigger on SPI data.
        Spi => "SPI",
        /// Trigger on a USB bus condition.
        Usb => "USB",
    }
}

mnemonic_enum! {
    /// Trigger sweep.
    pub enum Sweep {
        /// Trigger automatically if no trigger condition is met.
        Auto => "AUTO",
        /// Only trigger on the trigger condition.
        Normal => "NORMAL" | "NORM",
        /// Trigger once and stop.
        Single => "SINGLE" | "SING",
    }
}

mnemonic_enum! {
    /// Trigger coupling.
    pub enum TriggerCoupling {
        /// AC coupling.
        Ac => "AC",
        /// DC coupling.
        Dc => "DC",
        /// Reject low frequencies.
        LfReject => "LFREJECT" | "LFR",
        /// Reject high frequencies.
        HfReject => "HFREJECT" | "HFR",
    }
}

mnemonic_enum! {
    /// Trigger status as shown on the instrument.
    pub enum TriggerStatus {
        /// Triggered.
        Triggered => "TD",
        /// Waiting for a trigger.
        Wait => "WAIT",
        /// Running.
        Run => "RUN",
        /// Triggering automatically.
        Auto => "AUTO",
        /// Stopped.
        Stop => "STOP",
    }
}

mnemonic_enum! {
    /// An analog input channel as trigger source.
    pub enum ChannelSource {
        /// Channel 1.
        Channel1 => "CHANNEL1" | "CHAN1",
        /// Channel 2.
        Channel2 => "CHANNEL2" | "CHAN2",
    }
}

mnemonic_enum! {
    /// An analog input channel or the external trigger input.
    pub enum PulseSource {
        /// Channel 1.
        Channel1 => "CHANNEL1" | "CHAN1",
        /// Channel 2.
        Channel2 => "CHANNEL2" | "CHAN2",
        /// External trigger input.
        External => "EXT",
    }
}

mnemonic_enum! {
    /// Source of the edge trigger.
    pub enum EdgeSource {
        /// Channel 1.
        Channel1 => "CHANNEL1" | "CHAN1",
        /// Channel 2.
        Channel2 => "CHANNEL2" | "CHAN2",
        /// External trigger input.
        External => "EXT",
        /// The AC line.
        AcLine => "ACLINE" | "ACL",
    }
}

mnemonic_enum! {
    /// Polarity of an edge or pulse.
    pub enum Polarity {
        /// Rising edge or positive pulse.
        Positive => "POSITIVE" | "POS",
        /// Falling edge or negative pulse.
        Negative => "NEGATIVE" | "NEG",
    }
}

mnemonic_enum! {
    /// Edge direction, including both directions.
    pub enum EdgeSlope {
        /// Rising edge.
        Rising => "POSITIVE" | "POS",
        /// Falling edge.
        Falling => "NEGATIVE" | "NEG",
        /// Rising or falling edge.
        Either => "RFALL" | "RFAL",
    }
}

mnemonic_enum! {
    /// Width condition of pulse and slope triggers.
    pub enum WidthCondition {
        /// Positive width greater than the lower limit.
        PositiveGreater => "PGREATER" | "PGR",
        /// Positive width less than the upper limit.
        PositiveLess => "PLESS" | "PLES",
        /// Negative width greater than the lower limit.
        NegativeGreater => "NGREATER" | "NGR",
        /// Negative width less than the upper limit.
        NegativeLess => "NLESS" | "NLES",
        /// Positive width between the limits.
        PositiveBetween => "PGLESS" | "PGL",
        /// Negative width between the limits.
        NegativeBetween => "NGLESS" | "NGL",
    }
}

mnemonic_enum! {
    /// Duration condition of the duration trigger.
    pub enum TimeCondition {
        /// Longer than the lower limit.
        Greater => "GREATER" | "GRE",
        /// Shorter than the upper limit.
        Less => "LESS",
        /// Between the limits.
        Between => "GLESS" | "GLES",
    }
}

const MODE: Setting<TriggerMode> = Setting::new(&["TRIGGER", "MODE"]);
const SWEEP: Setting<Sweep> = Setting::new(&["TRIGGER", "SWEEP"]);
const COUPLING: Setting<TriggerCoupling> = Setting::new(&["TRIGGER", "COUPLING"]);
const HOLDOFF: Setting<Duration> = Setting::new(&["TRIGGER", "HOLDOFF"]);
const NOISE_REJECT: Setting<bool> = Setting::new(&["TRIGGER", "NREJECT"]);
const STATUS: Setting<TriggerStatus> = Setting::new(&["TRIGGER", "STATUS"]);

/// Check that a time limit in seconds lies within `[min, max]`.
pub(crate) fn check_time(value: Duration, min: f64, max: f64) -> Result<(), Ds2000Error> {
    check_float_range(value.as_secs_f64(), min, max)
}

/// Settings access of one trigger mode.
///
/// Reads go straight to the instrument, writes are only sent if the mode is active.
#[derive(Debug)]
pub(crate) struct ModeScope<T: InstrumentInterface> {
    client: ProtocolClient<T>,
    mode: TriggerMode,
}

impl<T: InstrumentInterface> ModeScope<T> {
    pub(crate) fn new(client: ProtocolClient<T>, mode: TriggerMode) -> Self {
        Self { client, mode }
    }

    pub(crate) fn get<V: SettingValue>(&self, setting: &Setting<V>) -> Result<V, Ds2000Error> {
        setting.get(&self.client, &[])
    }

    pub(crate) fn set<V: SettingValue>(
        &self,
        setting: &Setting<V>,
        value: V,
    ) -> Result<(), Ds2000Error> {
        self.send(&setting.set_command(&[], &value))
    }

    /// Set `setting` after checking `value` against the current value of `dependency`.
    pub(crate) fn set_checked<D, V, F>(
        &self,
        dependency: &Setting<D>,
        setting: &Setting<V>,
        value: V,
        check: F,
    ) -> Result<(), Ds2000Error>
    where
        D: SettingValue,
        V: SettingValue,
        F: FnOnce(D, &V) -> Result<(), Ds2000Error>,
    {
        self.client
            .set_in_mode_with(self.mode, &dependency.query_command(&[]), |current| {
                check(current, &value)?;
                Ok(setting.set_command(&[], &value))
            })
    }

    pub(crate) fn query<V: SettingValue>(&self, command: &Command) -> Result<V, Ds2000Error> {
        self.client.query_value(command)
    }

    pub(crate) fn query_raw(&self, command: &Command) -> Result<Vec<u8>, Ds2000Error> {
        self.client.query(command)
    }

    pub(crate) fn send(&self, command: &Command) -> Result<(), Ds2000Error> {
        self.client.set_in_mode(self.mode, command)
    }

    pub(crate) fn select(&self) -> Result<(), Ds2000Error> {
        self.client
            .set_changing_trigger_mode(&MODE.set_command(&[], &self.mode), Some(self.mode))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.client.tracked_trigger_mode() == Some(self.mode)
    }
}

/// Implement `select` and `is_active` for a trigger mode façade that holds a `scope` field.
macro_rules! mode_selection {
    ($name:ident) => {
        impl<T: InstrumentInterface> $name<T> {
            /// Make this mode the active trigger mode.
            pub fn select(&self) -> Result<(), Ds2000Error> {
                self.scope.select()
            }

            /// Whether this mode is the tracked active trigger mode.
            pub fn is_active(&self) -> bool {
                self.scope.is_active()
            }
        }
    };
}

pub(crate) use mode_selection;

/// The trigger subsystem of the DS2000.
#[derive(Debug)]
pub struct Trigger<T: InstrumentInterface> {
    client: ProtocolClient<T>,
}

impl<T: InstrumentInterface> Trigger<T> {
    pub(crate) fn new(client: ProtocolClient<T>) -> Self {
        Self { client }
    }

    /// Query the active trigger mode. The tracked mode of the session is updated to it.
    pub fn get_mode(&self) -> Result<TriggerMode, Ds2000Error> {
        self.client.query_trigger_mode(&MODE.query_command(&[]))
    }

    /// Select the active trigger mode.
    pub fn set_mode(&self, mode: TriggerMode) -> Result<(), Ds2000Error> {
        self.client
            .set_changing_trigger_mode(&MODE.set_command(&[], &mode), Some(mode))
    }

    /// The trigger mode the session believes to be active, without talking to the instrument.
    pub fn active_mode(&self) -> Option<TriggerMode> {
        self.client.tracked_trigger_mode()
    }

    /// Get the trigger sweep.
    pub fn get_sweep(&self) -> Result<Sweep, Ds2000Error> {
        SWEEP.get(&self.client, &[])
    }

    /// Set the trigger sweep.
    pub fn set_sweep(&self, sweep: Sweep) -> Result<(), Ds2000Error> {
        SWEEP.set(&self.client, &[], sweep)
    }

    /// Get the trigger coupling.
    pub fn get_coupling(&self) -> Result<TriggerCoupling, Ds2000Error> {
        COUPLING.get(&self.client, &[])
    }

    /// Set the trigger coupling.
    pub fn set_coupling(&self, coupling: TriggerCoupling) -> Result<(), Ds2000Error> {
        COUPLING.set(&self.client, &[], coupling)
    }

    /// Get the trigger holdoff time.
    pub fn get_holdoff(&self) -> Result<Duration, Ds2000Error> {
        HOLDOFF.get(&self.client, &[])
    }

    /// Set the trigger holdoff time, from 100 ns to 10 s.
    pub fn set_holdoff(&self, holdoff: Duration) -> Result<(), Ds2000Error> {
        check_time(holdoff, 100e-9, 10.0)?;
        HOLDOFF.set(&self.client, &[], holdoff)
    }

    /// Whether noise rejection is enabled.
    pub fn get_noise_reject(&self) -> Result<bool, Ds2000Error> {
        NOISE_REJECT.get(&self.client, &[])
    }

    /// Enable or disable noise rejection.
    pub fn set_noise_reject(&self, enabled: bool) -> Result<(), Ds2000Error> {
        NOISE_REJECT.set(&self.client, &[], enabled)
    }

    /// Query the current trigger status.
    pub fn get_status(&self) -> Result<TriggerStatus, Ds2000Error> {
        STATUS.get(&self.client, &[])
    }

    /// Edge trigger settings.
    pub fn edge(&self) -> EdgeTrigger<T> {
        EdgeTrigger::new(self.client.clone())
    }

    /// Pulse trigger settings.
    pub fn pulse(&self) -> PulseTrigger<T> {
        PulseTrigger::new(self.client.clone())
    }

    /// Runt trigger settings.
    pub fn runt(&self) -> RuntTrigger<T> {
        RuntTrigger::new(self.client.clone())
    }

    /// Window trigger settings.
    pub fn window(&self) -> WindowTrigger<T> {
        WindowTrigger::new(self.client.clone())
    }

    /// Nth edge trigger settings.
    pub fn nth_edge(&self) -> NthEdgeTrigger<T> {
        NthEdgeTrigger::new(self.client.clone())
    }

    /// Slope trigger settings.
    pub fn slope(&self) -> SlopeTrigger<T> {
        SlopeTrigger::new(self.client.clone())
    }

    /// Video trigger settings.
    pub fn video(&self) -> VideoTrigger<T> {
        VideoTrigger::new(self.client.clone())
    }

    /// Pattern trigger settings.
    pub fn pattern(&self) -> PatternTrigger<T> {
        PatternTrigger::new(self.client.clone())
    }

    /// Delay trigger settings.
    pub fn delay(&self) -> DelayTrigger<T> {
        DelayTrigger::new(self.client.clone())
    }

    /// Timeout trigger settings.
    pub fn timeout(&self) -> TimeoutTrigger<T> {
        TimeoutTrigger::new(self.client.clone())
    }

    /// Duration trigger settings.
    pub fn duration(&self) -> DurationTrigger<T> {
        DurationTrigger::new(self.client.clone())
    }

    /// Setup/hold trigger settings.
    pub fn setup_hold(&self) -> SetupHoldTrigger<T> {
        SetupHoldTrigger::new(self.client.clone())
    }

    /// RS232 trigger settings.
    pub fn rs232(&self) -> Rs232Trigger<T> {
        Rs232Trigger::new(self.client.clone())
    }

    /// I2C trigger settings.
    pub fn i2c(&self) -> I2cTrigger<T> {
        I2cTrigger::new(self.client.clone())
    }

    /// SPI trigger settings.
    pub fn spi(&self) -> SpiTrigger<T> {
        SpiTrigger::new(self.client.clone())
    }

    /// USB trigger settings.
    pub fn usb(&self) -> UsbTrigger<T> {
        UsbTrigger::new(self.client.clone())
    }
}
