//! The protocol client that owns the connection to the instrument.

use std::sync::{Arc, Mutex, MutexGuard};

use scpi_link::InstrumentInterface;

use crate::{
    codec,
    command::Command,
    config::ProtocolConfig,
    error::Ds2000Error,
    reconcile::{self, ErrorQueueEntry},
    setting::SettingValue,
    trigger::TriggerMode,
};

/// Connection state shared by all handles of a session.
///
/// Besides the interface it holds the trigger mode that the host believes to be active.
#[derive(Debug)]
pub struct Connection<T: InstrumentInterface> {
    interface: T,
    config: ProtocolConfig,
    trigger_mode: Option<TriggerMode>,
}

impl<T: InstrumentInterface> Connection<T> {
    fn send_set(&mut self, command: &Command) -> Result<(), Ds2000Error> {
        let line = command.encode();
        log::debug!("Sending {line}");
        self.interface
            .send(&line)
            .map_err(|source| Ds2000Error::InstrumentUnreachable {
                command: line.clone(),
                source,
            })?;
        reconcile::confirm(&mut self.interface, &line, self.config.max_error_drain())
    }

    fn send_query(&mut self, command: &Command) -> Result<Vec<u8>, Ds2000Error> {
        let line = command.encode();
        log::debug!("Querying {line}");
        let reply = self
            .interface
            .request(&line)
            .map_err(|source| Ds2000Error::InstrumentUnreachable {
                command: line.clone(),
                source,
            })?;
        if reply.first() == Some(&b'#') {
            log::trace!("Reply to {line}: block of {} bytes", reply.len());
        } else {
            log::trace!("Reply to {line}: {:?}", String::from_utf8_lossy(&reply));
        }
        reconcile::confirm(&mut self.interface, &line, self.config.max_error_drain())?;
        Ok(reply)
    }

    fn require_trigger_mode(&self, required: TriggerMode) -> Result<(), Ds2000Error> {
        if self.trigger_mode != Some(required) {
            log::debug!(
                "Refusing {required} trigger setting, active mode is {:?}",
                self.trigger_mode
            );
            return Err(Ds2000Error::WrongTriggerMode {
                active: self.trigger_mode,
                required,
            });
        }
        Ok(())
    }
}

/// Send commands and read replies under one lock.
///
/// A `ProtocolClient` is a cheap handle to a shared [`Connection`]. Every public operation takes
/// the lock, sends its command, reads the reply if it is a query, drains the error queue and only
/// then releases the lock. Other handles of the same session block in the meantime, so replies can
/// never be mixed up.
#[derive(Debug)]
pub struct ProtocolClient<T: InstrumentInterface> {
    connection: Arc<Mutex<Connection<T>>>,
}

impl<T: InstrumentInterface> Clone for ProtocolClient<T> {
    fn clone(&self) -> Self {
        Self {
            connection: self.connection.clone(),
        }
    }
}

impl<T: InstrumentInterface> ProtocolClient<T> {
    /// Take ownership of the interface and configure its terminator.
    pub fn new(mut interface: T, config: ProtocolConfig) -> Self {
        interface.set_terminator(config.terminator());
        Self {
            connection: Arc::new(Mutex::new(Connection {
                interface,
                config,
                trigger_mode: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Connection<T>> {
        self.connection
            .lock()
            .expect("Mutex should not be poisoned")
    }

    /// The configuration the client was created with.
    pub fn config(&self) -> ProtocolConfig {
        self.lock().config.clone()
    }

    /// Send a command that does not produce a reply and confirm it via the error queue.
    pub fn set(&self, command: &Command) -> Result<(), Ds2000Error> {
        self.lock().send_set(command)
    }

    /// Send a query and return its raw reply, without terminator.
    pub fn query(&self, command: &Command) -> Result<Vec<u8>, Ds2000Error> {
        self.lock().send_query(command)
    }

    /// Send a query and decode its reply.
    pub fn query_value<V: SettingValue>(&self, command: &Command) -> Result<V, Ds2000Error> {
        let reply = self.query(command)?;
        V::from_reply(&reply).map_err(|e| e.in_reply_to(&command.encode()))
    }

    /// Send a query and return its reply as text.
    pub fn query_text(&self, command: &Command) -> Result<String, Ds2000Error> {
        let reply = self.query(command)?;
        codec::decode_text(&reply)
            .map(str::to_string)
            .map_err(|e| e.in_reply_to(&command.encode()))
    }

    /// Send a query whose reply is a definite length block and return the payload.
    pub fn query_block(&self, command: &Command) -> Result<Vec<u8>, Ds2000Error> {
        let reply = self.query(command)?;
        codec::decode_block(&reply).map(<[u8]>::to_vec)
    }

    /// Send a trigger setting that is only valid in the given trigger mode.
    ///
    /// If the tracked trigger mode differs, [`Ds2000Error::WrongTriggerMode`] is returned and
    /// nothing is sent.
    pub fn set_in_mode(&self, required: TriggerMode, command: &Command) -> Result<(), Ds2000Error> {
        let mut conn = self.lock();
        conn.require_trigger_mode(required)?;
        conn.send_set(command)
    }

    /// Send a trigger setting whose valid range depends on another setting of the same mode.
    ///
    /// The mode check, the query of `dependency` and the command built from its value all run
    /// under one lock. If the tracked mode differs, nothing is sent. If `build` fails, only the
    /// dependency query has been sent.
    pub(crate) fn set_in_mode_with<D, F>(
        &self,
        required: TriggerMode,
        dependency: &Command,
        build: F,
    ) -> Result<(), Ds2000Error>
    where
        D: SettingValue,
        F: FnOnce(D) -> Result<Command, Ds2000Error>,
    {
        let mut conn = self.lock();
        conn.require_trigger_mode(required)?;
        let reply = conn.send_query(dependency)?;
        let value = D::from_reply(&reply).map_err(|e| e.in_reply_to(&dependency.encode()))?;
        let command = build(value)?;
        conn.send_set(&command)
    }

    /// The trigger mode the host believes to be active, without talking to the instrument.
    pub fn tracked_trigger_mode(&self) -> Option<TriggerMode> {
        self.lock().trigger_mode
    }

    /// Run a command that changes the trigger mode and update the tracked mode accordingly.
    ///
    /// A `mode` of `None` means that the command changes the trigger mode in a way the host cannot
    /// predict. If the instrument rejects the command, the tracked mode stays as it was. If the
    /// outcome is unknown, the tracked mode is cleared.
    pub(crate) fn set_changing_trigger_mode(
        &self,
        command: &Command,
        mode: Option<TriggerMode>,
    ) -> Result<(), Ds2000Error> {
        let mut conn = self.lock();
        match conn.send_set(command) {
            Ok(()) => {
                conn.trigger_mode = mode;
                log::debug!("Trigger mode is now {mode:?}");
                Ok(())
            }
            Err(err @ Ds2000Error::Unconfirmed { .. }) => {
                conn.trigger_mode = None;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Query the active trigger mode and store it as the tracked mode.
    pub(crate) fn query_trigger_mode(
        &self,
        command: &Command,
    ) -> Result<TriggerMode, Ds2000Error> {
        let mut conn = self.lock();
        let reply = conn.send_query(command)?;
        let mode =
            TriggerMode::from_reply(&reply).map_err(|e| e.in_reply_to(&command.encode()))?;
        conn.trigger_mode = Some(mode);
        Ok(mode)
    }

    /// Read the error queue until it is empty and return the entries, oldest first.
    pub fn drain_error_queue(&self) -> Result<Vec<ErrorQueueEntry>, Ds2000Error> {
        let mut conn = self.lock();
        let max_drain = conn.config.max_error_drain();
        reconcile::drain(&mut conn.interface, max_drain)
    }
}
