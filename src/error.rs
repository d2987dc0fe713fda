//! Errors raised while replaying or exporting a sequence.

use thiserror::Error;

use crate::op::Op;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The sink has no operation or property by this name.
    #[error("unsupported operation `{0}`")]
    UnsupportedOperation(Op),

    #[error("`{0}` is not implemented")]
    NotImplemented(Op),

    /// Decode met a code outside the opcode table.
    #[error("invalid opcode 0x{0:02x}")]
    InvalidOpcode(u8),

    /// The slot at `at` is not what the record layout calls for.
    #[error("malformed sequence at slot {at}")]
    Malformed { at: usize },

    #[error("argument {index} of `{op}` must be a number")]
    InvalidArgument { op: Op, index: usize },

    #[error("listing line {line}: {message}")]
    Listing { line: usize, message: String },
}
