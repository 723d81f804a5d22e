/// Errors produced while building a log line or registering a process.
///
/// Logging calls never surface these; they fall back to a degraded rendering
/// instead. They are returned by the lower level building blocks.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The rendered message would not fit in the line budget.
    #[error("message exceeds the {limit} byte line budget")]
    Capacity {
        /// Configured budget in bytes.
        limit: usize,
    },
    /// Memory for the line could not be reserved.
    #[error("out of memory while formatting")]
    Alloc,
    /// A `Display` implementation reported an error.
    #[error("formatting failed")]
    Fmt,
    /// The pretty mode only knows a fixed set of process roles.
    #[error("unknown procname: {0}")]
    UnknownRole(String),
    /// Unsupported printf conversion.
    #[error("unsupported conversion '%{0}'")]
    Directive(char),
    /// The format string ended in the middle of a conversion.
    #[error("format string ends inside a conversion")]
    Truncated,
    /// More conversions than arguments.
    #[error("missing argument #{0}")]
    MissingArgument(usize),
    /// The argument does not match its conversion.
    #[error("argument #{index} does not match '%{directive}'")]
    ArgumentType {
        /// Zero-based argument index.
        index: usize,
        /// Conversion character.
        directive: char,
    },
}
