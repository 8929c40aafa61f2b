//! SCPI command values.
//!
//! A [`Command`] is built fresh for every exchange and never changed afterwards. It is turned
//! into the text line that goes over the wire by [`Command::encode`].

use std::fmt::Display;

use crate::codec;

/// Whether a command changes a setting or asks for one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Change a setting or trigger an action. The instrument does not reply.
    Set,
    /// Ask the instrument for a value. The instrument sends exactly one reply.
    Query,
}

/// How a boolean argument is spelled on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolStyle {
    /// `ON` / `OFF`
    OnOff,
    /// `1` / `0`
    Numeric,
}

/// A typed command argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// A real number, sent in scientific notation.
    Number(f64),
    /// An integer, sent in decimal notation.
    Integer(i64),
    /// A fixed upper-case mnemonic, e.g., `AVERAGES`.
    Mnemonic(&'static str),
    /// A boolean in the given spelling.
    Bool(bool, BoolStyle),
    /// Several arguments separated by commas, e.g., `CHANNEL1,1.000000e+00`.
    List(Vec<Argument>),
}

impl Argument {
    /// Serialize the argument as it is sent to the instrument.
    pub fn encode(&self) -> String {
        match self {
            Argument::Number(value) => codec::encode_number(*value),
            Argument::Integer(value) => value.to_string(),
            Argument::Mnemonic(mnemonic) => mnemonic.to_string(),
            Argument::Bool(value, BoolStyle::OnOff) => if *value { "ON" } else { "OFF" }.to_string(),
            Argument::Bool(value, BoolStyle::Numeric) => if *value { "1" } else { "0" }.to_string(),
            Argument::List(items) => items
                .iter()
                .map(Argument::encode)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

/// An immutable SCPI command: mnemonic path, operation and optional argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    path: Vec<String>,
    operation: Operation,
    argument: Option<Argument>,
}

impl Command {
    /// A command that sets a value, e.g., `:ACQUIRE:TYPE AVERAGES`.
    pub fn set<I, S>(path: I, argument: Argument) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(path, Operation::Set, Some(argument))
    }

    /// A command without argument that triggers an action, e.g., `:RUN` or `*RST`.
    pub fn event<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(path, Operation::Set, None)
    }

    /// A query, e.g., `:ACQUIRE:TYPE?`.
    pub fn query<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(path, Operation::Query, None)
    }

    /// A query that takes an argument, e.g., `:TRIGGER:PATTERN:LEVEL? CHANNEL1`.
    pub fn query_with<I, S>(path: I, argument: Argument) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(path, Operation::Query, Some(argument))
    }

    fn build<I, S>(path: I, operation: Operation, argument: Option<Argument>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            operation,
            argument,
        }
    }

    /// The mnemonic tokens of the command.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The operation of the command.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The argument of the command, if any.
    pub fn argument(&self) -> Option<&Argument> {
        self.argument.as_ref()
    }

    /// Whether the instrument sends a reply to this command.
    pub fn is_query(&self) -> bool {
        self.operation == Operation::Query
    }

    /// The text line that is sent to the instrument, without terminator.
    pub fn encode(&self) -> String {
        codec::encode(&self.path, self.operation, self.argument.as_ref())
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode())
    }
}
