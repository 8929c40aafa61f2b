//! Error queue reconciliation.
//!
//! The DS2000 does not answer SET commands and silently keeps going when it rejects one. The only
//! way to know whether a command was applied is to read `:SYSTEM:ERROR:NEXT?` until it reports
//! `0,"No error"`. This is done after every command, within the same locked exchange.

use std::fmt::Display;

use scpi_link::InstrumentInterface;

use crate::{codec, command::Command, error::Ds2000Error};

/// Path of the query that pops the oldest entry of the error queue.
pub const ERROR_QUEUE_PATH: [&str; 3] = ["SYSTEM", "ERROR", "NEXT"];

/// One entry of the instrument's error queue, e.g., `-113,"Undefined header"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorQueueEntry {
    /// Error code. Zero means that the queue is empty.
    pub code: i32,
    /// Error message, without quotes.
    pub message: String,
}

impl ErrorQueueEntry {
    /// The code of the "no error" sentinel.
    pub const NO_ERROR: i32 = 0;

    /// Whether this entry is the "no error" sentinel that ends a drain.
    pub fn is_no_error(&self) -> bool {
        self.code == Self::NO_ERROR
    }

    /// Parse a reply of the form `<code>,"<message>"`.
    ///
    /// ```
    /// use rigol_ds2000::ErrorQueueEntry;
    ///
    /// let entry = ErrorQueueEntry::from_reply(b"-113,\"Undefined header\"").unwrap();
    /// assert_eq!(entry.code, -113);
    /// assert_eq!(entry.message, "Undefined header");
    /// ```
    pub fn from_reply(raw: &[u8]) -> Result<Self, Ds2000Error> {
        let malformed = || Ds2000Error::MalformedReply {
            command: String::new(),
            reply: String::from_utf8_lossy(raw).to_string(),
        };
        let text = codec::decode_text(raw)?;
        let (code, message) = text.split_once(',').ok_or_else(malformed)?;
        let code = code.trim().parse::<i32>().map_err(|_| malformed())?;
        let message = message.trim();
        let message = message
            .strip_prefix('"')
            .and_then(|m| m.strip_suffix('"'))
            .unwrap_or(message);
        Ok(Self {
            code,
            message: message.to_string(),
        })
    }
}

impl Display for ErrorQueueEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},\"{}\"", self.code, self.message)
    }
}

/// Read the error queue until the sentinel is found and return all entries before it, oldest
/// first.
///
/// Link failures are returned as [`Ds2000Error::InstrumentUnreachable`]. If the sentinel is not
/// seen within `max_drain` reads, [`Ds2000Error::QueueOverflow`] is returned.
pub(crate) fn drain<T: InstrumentInterface + ?Sized>(
    interface: &mut T,
    max_drain: usize,
) -> Result<Vec<ErrorQueueEntry>, Ds2000Error> {
    let query = Command::query(ERROR_QUEUE_PATH).encode();
    let mut entries = Vec::new();
    for _ in 0..max_drain {
        let reply = interface
            .request(&query)
            .map_err(|source| Ds2000Error::InstrumentUnreachable {
                command: query.clone(),
                source,
            })?;
        let entry = ErrorQueueEntry::from_reply(&reply).map_err(|e| e.in_reply_to(&query))?;
        if entry.is_no_error() {
            return Ok(entries);
        }
        entries.push(entry);
    }
    log::error!("Error queue not empty after {max_drain} reads");
    Err(Ds2000Error::QueueOverflow { max_drain })
}

/// Confirm that `command` was accepted by draining the error queue.
///
/// If the queue holds entries, the newest one is reported as [`Ds2000Error::Instrument`] and the
/// older ones are attached as stale. A link failure during the drain means that the command was
/// sent but its outcome is unknown, which is reported as [`Ds2000Error::Unconfirmed`].
pub(crate) fn confirm<T: InstrumentInterface + ?Sized>(
    interface: &mut T,
    command: &str,
    max_drain: usize,
) -> Result<(), Ds2000Error> {
    let mut entries = drain(interface, max_drain).map_err(|err| match err {
        Ds2000Error::InstrumentUnreachable { source, .. } => Ds2000Error::Unconfirmed {
            command: command.to_string(),
            source,
        },
        other => other,
    })?;

    match entries.pop() {
        None => Ok(()),
        Some(newest) => {
            for entry in &entries {
                log::warn!("Stale error queue entry found after `{command}`: {entry}");
            }
            log::debug!("Instrument rejected `{command}`: {newest}");
            Err(Ds2000Error::Instrument {
                command: command.to_string(),
                code: newest.code,
                message: newest.message,
                stale: entries,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::*;
    use scpi_link::LoopbackInterface;

    const ERR_QUERY: &str = ":SYSTEM:ERROR:NEXT?";
    const NO_ERROR: &str = "0,\"No error\"";

    #[rstest]
    #[case(b"0,\"No error\"", 0, "No error")]
    #[case(b"-113,\"Undefined header\"", -113, "Undefined header")]
    #[case(b"-222,\"Data out of range\"\r", -222, "Data out of range")]
    #[case(b"-350, Queue overflow", -350, "Queue overflow")]
    fn test_entry_from_reply(#[case] raw: &[u8], #[case] code: i32, #[case] message: &str) {
        let entry = ErrorQueueEntry::from_reply(raw).unwrap();
        assert_eq!(entry.code, code);
        assert_eq!(entry.message, message);
    }

    #[rstest]
    #[case(b"No error")]
    #[case(b"x,\"No error\"")]
    fn test_entry_malformed(#[case] raw: &[u8]) {
        assert!(matches!(
            ErrorQueueEntry::from_reply(raw),
            Err(Ds2000Error::MalformedReply { .. })
        ));
    }

    #[test]
    fn test_confirm_empty_queue() {
        let mut lbk = LoopbackInterface::new(vec![ERR_QUERY], vec![NO_ERROR], "\n");
        confirm(&mut lbk, ":RUN", 16).unwrap();
    }

    #[test]
    fn test_confirm_newest_entry_with_stale() {
        let mut lbk = LoopbackInterface::new(
            vec![ERR_QUERY, ERR_QUERY, ERR_QUERY],
            vec!["-221,\"Settings conflict\"", "-113,\"Undefined header\"", NO_ERROR],
            "\n",
        );
        match confirm(&mut lbk, ":RUN", 16).unwrap_err() {
            Ds2000Error::Instrument {
                command,
                code,
                message,
                stale,
            } => {
                assert_eq!(command, ":RUN");
                assert_eq!(code, -113);
                assert_eq!(message, "Undefined header");
                assert_eq!(stale.len(), 1);
                assert_eq!(stale[0].code, -221);
            }
            other => panic!("Unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_drain_overflow() {
        let mut lbk = LoopbackInterface::new(
            vec![ERR_QUERY, ERR_QUERY],
            vec!["-350,\"Queue overflow\"", "-350,\"Queue overflow\""],
            "\n",
        );
        assert!(matches!(
            drain(&mut lbk, 2),
            Err(Ds2000Error::QueueOverflow { max_drain: 2 })
        ));
    }
}
