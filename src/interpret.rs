//! Replaying a sequence against a drawing surface.

use crate::error::{Error, Result};
use crate::op::Op;
use crate::sequence::{Record, Sequence};
use crate::value::Value;

///A drawing surface that receives replayed operations.
///
///`call` gets every method record with its arguments exactly as recorded,
///`set` gets every property assignment. A sink that has no counterpart for
///an operation answers with [`Error::UnsupportedOperation`].
pub trait Sink {
    fn call(&mut self, op: Op, args: &[Value]) -> Result<()>;

    fn set(&mut self, op: Op, value: &Value) -> Result<()>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn call(&mut self, op: Op, args: &[Value]) -> Result<()> {
	(**self).call(op, args)
    }

    fn set(&mut self, op: Op, value: &Value) -> Result<()> {
	(**self).set(op, value)
    }
}

///Reads argument `index` of `op` as a number.
pub fn number(op: Op, args: &[Value], index: usize) -> Result<f64> {
    args.get(index)
	.and_then(Value::as_number)
	.ok_or(Error::InvalidArgument { op, index })
}

pub(crate) fn dispatch<S: Sink + ?Sized>(record: &Record, sink: &mut S) -> Result<()> {
    match record {
	Record::Call { op, args } => sink.call(*op, args),
	Record::Set { op, value } => sink.set(*op, value),
    }
}

///Decodes `sequence` from the start and forwards each record to `sink`.
pub fn interpret<S: Sink + ?Sized>(sequence: &Sequence, sink: &mut S) -> Result<()> {
    for record in sequence.records() {
	dispatch(&record?, sink)?;
    }

    Ok(())
}
