//! A rust driver for Rigol DS2000 series oscilloscopes.
//!
//! The DS2000 is controlled with SCPI commands over its raw socket on port 5555. This driver
//! turns typed calls into commands, decodes the replies and, after every command, reads the
//! instrument's error queue so that a rejected command is reported as an error right away
//! instead of being silently ignored.
//!
//! The instrument is organized in subsystems (acquire, channels, timebase, display, waveform,
//! trigger, IEEE common commands). [`Ds2000`] hands out one façade per subsystem. All façades of
//! a session share one connection, and every exchange holds its lock for the command, its reply
//! and the error queue check, so façades can be used from several threads.
//!
//! # Example
//!
//! ```no_run
//! use measurements::Voltage;
//! use rigol_ds2000::{Ds2000, TriggerMode, waveform::WaveformSource};
//! use scpi_link::TcpIpInterface;
//!
//! let interface = TcpIpInterface::try_new("192.168.1.20:5555").unwrap();
//! let scope = Ds2000::new(interface);
//! println!("{}", scope.get_info().unwrap());
//!
//! let ch1 = scope.get_channel(0).unwrap();
//! ch1.set_scale(Voltage::from_millivolts(500.0)).unwrap();
//!
//! let trigger = scope.trigger();
//! trigger.set_mode(TriggerMode::Edge).unwrap();
//! trigger.edge().set_level(Voltage::from_volts(0.2)).unwrap();
//!
//! scope.single().unwrap();
//! for point in scope.waveform().read_waveform(WaveformSource::Channel1).unwrap() {
//!     println!("{} s: {} V", point.time, point.voltage.as_volts());
//! }
//! ```
//!
//! # License
//!
//! Licensed under either of
//!
//! - Apache License, Version 2.0 ([LICENSE-APACHE](http://www.apache.org/licenses/LICENSE-2.0))
//! - MIT license ([LICENSE-MIT](http://opensource.org/licenses/MIT))
//!
//! at your option.

#![warn(missing_docs)]

pub mod acquire;
pub mod channel;
mod client;
pub mod codec;
mod command;
mod config;
pub mod display;
mod error;
pub mod ieee;
mod mnemonic;
mod reconcile;
mod setting;
pub mod timebase;
pub mod trigger;
pub mod waveform;

pub use client::{Connection, ProtocolClient};
pub use command::{Argument, BoolStyle, Command, Operation};
pub use config::ProtocolConfig;
pub use error::Ds2000Error;
pub use ieee::InstrumentInfo;
pub use reconcile::{ERROR_QUEUE_PATH, ErrorQueueEntry};
pub use setting::{OnOff, Setting, SettingValue};
pub use trigger::TriggerMode;

use scpi_link::InstrumentInterface;

use crate::{
    acquire::Acquire, channel::Channel, display::Display, ieee::Ieee, timebase::Timebase,
    trigger::Trigger, waveform::Waveform,
};

/// A rust driver for the DS2000.
///
/// See the top-level documentation for an example on how to use this driver.
#[derive(Debug)]
pub struct Ds2000<T: InstrumentInterface> {
    client: ProtocolClient<T>,
    num_channels: usize,
}

impl<T: InstrumentInterface> Clone for Ds2000<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            num_channels: self.num_channels,
        }
    }
}

impl<T: InstrumentInterface> Ds2000<T> {
    /// Create a new DS2000 session on the given interface with the default configuration.
    ///
    /// Nothing is sent to the instrument. The trigger mode is unknown until it is selected with
    /// [`Trigger::set_mode`], queried with [`Trigger::get_mode`] or reset with [`Ds2000::reset`].
    pub fn new(interface: T) -> Self {
        Self::with_config(interface, ProtocolConfig::default())
    }

    /// Create a new DS2000 session with a custom configuration.
    pub fn with_config(interface: T, config: ProtocolConfig) -> Self {
        Self {
            client: ProtocolClient::new(interface, config),
            num_channels: 2,
        }
    }

    /// The protocol client shared by all façades of this session.
    ///
    /// It can be used to send commands this driver does not cover, with the same error queue
    /// handling.
    pub fn client(&self) -> &ProtocolClient<T> {
        &self.client
    }

    /// The acquire subsystem.
    pub fn acquire(&self) -> Acquire<T> {
        Acquire::new(self.client.clone())
    }

    /// Get a channel with a given index.
    ///
    /// Please note that channels are zero indexed.
    pub fn get_channel(&self, idx: usize) -> Result<Channel<T>, Ds2000Error> {
        if idx >= self.num_channels {
            return Err(Ds2000Error::ChannelIndexOutOfRange {
                idx,
                nof_channels: self.num_channels,
            });
        }
        Ok(Channel::new(idx, self.client.clone()))
    }

    /// The timebase subsystem.
    pub fn timebase(&self) -> Timebase<T> {
        Timebase::new(self.client.clone())
    }

    /// The display subsystem.
    pub fn display(&self) -> Display<T> {
        Display::new(self.client.clone())
    }

    /// The waveform subsystem.
    pub fn waveform(&self) -> Waveform<T> {
        Waveform::new(self.client.clone())
    }

    /// The IEEE 488.2 common commands.
    pub fn ieee(&self) -> Ieee<T> {
        Ieee::new(self.client.clone())
    }

    /// The trigger subsystem.
    pub fn trigger(&self) -> Trigger<T> {
        Trigger::new(self.client.clone())
    }

    /// Query the name of the instrument.
    ///
    /// Returns the raw `*IDN?` reply, a comma-separated string of manufacturer, model, serial
    /// number and firmware version.
    pub fn get_name(&self) -> Result<String, Ds2000Error> {
        self.client.query_text(&Command::query(["*IDN"]))
    }

    /// Query the identification of the instrument.
    pub fn get_info(&self) -> Result<InstrumentInfo, Ds2000Error> {
        self.ieee().idn()
    }

    /// Reset the instrument to its default settings. The tracked trigger mode becomes edge.
    pub fn reset(&self) -> Result<(), Ds2000Error> {
        self.ieee().rst()
    }

    /// Start acquiring.
    pub fn run(&self) -> Result<(), Ds2000Error> {
        self.client.set(&Command::event(["RUN"]))
    }

    /// Stop acquiring.
    pub fn stop(&self) -> Result<(), Ds2000Error> {
        self.client.set(&Command::event(["STOP"]))
    }

    /// Acquire a single trigger and stop.
    pub fn single(&self) -> Result<(), Ds2000Error> {
        self.client.set(&Command::event(["SINGLE"]))
    }

    /// Generate a trigger signal, for normal and single sweep.
    pub fn force_trigger(&self) -> Result<(), Ds2000Error> {
        self.client.set(&Command::event(["TFORCE"]))
    }

    /// Adjust vertical scale, timebase and trigger for the connected signals.
    ///
    /// Autoscale may change the trigger mode, so the tracked mode is unknown afterwards.
    pub fn autoscale(&self) -> Result<(), Ds2000Error> {
        self.client
            .set_changing_trigger_mode(&Command::event(["AUTOSCALE"]), None)
    }

    /// Clear all waveforms on screen.
    pub fn clear(&self) -> Result<(), Ds2000Error> {
        self.client.set(&Command::event(["CLEAR"]))
    }

    /// Set the trigger level to the vertical midpoint of the signal.
    pub fn trigger_level_50(&self) -> Result<(), Ds2000Error> {
        self.client.set(&Command::event(["TLHALF"]))
    }

    /// Drain the error queue and return the entries found, oldest first.
    ///
    /// Entries may be left over from commands sent outside of this session, e.g., from the front
    /// panel.
    pub fn clear_error_queue(&self) -> Result<Vec<ErrorQueueEntry>, Ds2000Error> {
        let stale = self.client.drain_error_queue()?;
        for entry in &stale {
            log::warn!("Discarding stale error queue entry {entry}");
        }
        Ok(stale)
    }
}
