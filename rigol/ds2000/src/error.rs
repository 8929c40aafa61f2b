//! Error type of the driver.

use scpi_link::LinkError;
use thiserror::Error;

use crate::{reconcile::ErrorQueueEntry, trigger::TriggerMode};

/// The error enum of the DS2000 driver.
///
/// Every public operation either returns a fully typed result or one of these errors. None of
/// them is retried automatically: a SET whose outcome is not known is reported as
/// [`Ds2000Error::Unconfirmed`] so that the caller can decide what to do.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Ds2000Error {
    /// The reply does not match the expected grammar, e.g., a number was expected. This usually
    /// means that host and instrument are out of sync and the connection should be reset.
    #[error("Reply to `{command}` could not be parsed. Reply was: {reply:?}")]
    MalformedReply {
        /// The command whose reply was malformed.
        command: String,
        /// The reply, lossily converted to text.
        reply: String,
    },
    /// A binary block reply does not start with a valid `#<n><len>` header, or is shorter than
    /// its header announces.
    #[error("Malformed binary block header: {0}")]
    MalformedBlockHeader(String),
    /// The reply is well-formed but not one of the values the driver knows about.
    #[error("Unexpected value {value:?}, expected one of {allowed:?}")]
    UnexpectedValue {
        /// The value that was received.
        value: String,
        /// The values that would have been accepted.
        allowed: Vec<String>,
    },
    /// The instrument reported a fault in its error queue right after a command was sent.
    #[error("Instrument reported error {code}, \"{message}\" after `{command}`")]
    Instrument {
        /// The command after which the error was found.
        command: String,
        /// The error code as reported by the instrument.
        code: i32,
        /// The error message as reported by the instrument.
        message: String,
        /// Older entries that were in the queue before this one.
        stale: Vec<ErrorQueueEntry>,
    },
    /// A setter of a trigger mode was called while a different mode is selected. Nothing was sent
    /// to the instrument.
    #[error("Trigger mode {required} is required, but the active mode is {active:?}")]
    WrongTriggerMode {
        /// The mode that is currently selected, if known.
        active: Option<TriggerMode>,
        /// The mode the setter belongs to.
        required: TriggerMode,
    },
    /// The error queue did not report "no error" within the configured number of reads.
    #[error("Error queue was not empty after {max_drain} reads")]
    QueueOverflow {
        /// The maximum number of reads that was configured.
        max_drain: usize,
    },
    /// The link to the instrument failed before the command was confirmed to be sent.
    #[error("Instrument unreachable while sending `{command}`: {source}")]
    InstrumentUnreachable {
        /// The command that was being sent.
        command: String,
        /// The link error.
        #[source]
        source: LinkError,
    },
    /// The command was sent, but the link failed while confirming it via the error queue. The
    /// instrument may or may not have applied it.
    #[error("Command `{command}` was sent but could not be confirmed: {source}")]
    Unconfirmed {
        /// The command that was sent.
        command: String,
        /// The link error that occured during confirmation.
        #[source]
        source: LinkError,
    },
    /// The number of decoded samples differs from the number of points in the preamble.
    #[error("Preamble announces {expected} points, but the waveform block contains {actual}")]
    PointCountMismatch {
        /// The number of points the preamble announced.
        expected: usize,
        /// The number of points decoded from the block.
        actual: usize,
    },
    /// The channel index requested is out of range.
    #[error(
        "Channel with index {idx} is out of range. Number of channels available: {nof_channels}"
    )]
    ChannelIndexOutOfRange {
        /// Index of the channel that is out of range.
        idx: usize,
        /// Total number of channels.
        nof_channels: usize,
    },
    /// A given float value is out of the specified range.
    #[error("Float value {value} is out of range. Allowed range is [{min}, {max}]")]
    FloatValueOutOfRange {
        /// The value that is out of range.
        value: f64,
        /// The minimum value that is allowed.
        min: f64,
        /// The maximum value that is allowed.
        max: f64,
    },
    /// A given integer value is out of the specified range.
    #[error("Integer value {value} is out of range. Allowed range is [{min}, {max}]")]
    IntValueOutOfRange {
        /// The value that is out of range.
        value: i64,
        /// The minimum value that is allowed.
        min: i64,
        /// The maximum value that is allowed.
        max: i64,
    },
    /// An invalid argument was passed to a function. The message is intended for the user.
    #[error("{0}")]
    InvalidArgument(String),
}

impl Ds2000Error {
    /// Fill in the command of a [`Ds2000Error::MalformedReply`] that was raised while decoding.
    pub(crate) fn in_reply_to(self, cmd: &str) -> Self {
        match self {
            Ds2000Error::MalformedReply { command, reply } if command.is_empty() => {
                Ds2000Error::MalformedReply {
                    command: cmd.to_string(),
                    reply,
                }
            }
            other => other,
        }
    }
}

/// Check that a float value lies within `[min, max]`.
pub(crate) fn check_float_range(value: f64, min: f64, max: f64) -> Result<(), Ds2000Error> {
    if !(min..=max).contains(&value) {
        return Err(Ds2000Error::FloatValueOutOfRange { value, min, max });
    }
    Ok(())
}

/// Check that an integer value lies within `[min, max]`.
pub(crate) fn check_int_range(value: i64, min: i64, max: i64) -> Result<(), Ds2000Error> {
    if !(min..=max).contains(&value) {
        return Err(Ds2000Error::IntValueOutOfRange { value, min, max });
    }
    Ok(())
}
