//! The flat record buffer and its decoder.
//!
//! A record is laid out as `[code, count, args…]`. Property records always
//! have a count of one. Nothing outside the buffer is needed to find record
//! boundaries.

use log::trace;

use crate::error::{Error, Result};
use crate::op::{Op, OpKind, PROPERTY_TAG};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Code(u8),
    Count(usize),
    Arg(Value),
}

///Append-only list of flattened records. The cursor is the length of the
///slot buffer and always equals the sum of `2 + count` over all records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequence {
    slots: Vec<Slot>,
}

impl Sequence {
    pub fn new() -> Self {
	Sequence::default()
    }

    ///Wraps raw slots without checking them; decoding reports any damage.
    pub fn from_slots(slots: Vec<Slot>) -> Self {
	Sequence { slots }
    }

    pub fn slots(&self) -> &[Slot] {
	&self.slots
    }

    pub fn cursor(&self) -> usize {
	self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
	self.slots.is_empty()
    }

    pub fn clear(&mut self) {
	self.slots.clear();
    }

    pub(crate) fn push_call(&mut self, op: Op, args: Vec<Value>) {
	self.slots.reserve(2 + args.len());
	self.slots.push(Slot::Code(op.code()));
	self.slots.push(Slot::Count(args.len()));
	self.slots.extend(args.into_iter().map(Slot::Arg));
    }

    pub(crate) fn push_set(&mut self, op: Op, value: Value) {
	self.slots.push(Slot::Code(op.code() | PROPERTY_TAG));
	self.slots.push(Slot::Count(1));
	self.slots.push(Slot::Arg(value));
    }

    ///Decodes from slot 0 up to the cursor. Every call starts over.
    pub fn records(&self) -> Records<'_> {
	Records {
	    slots: &self.slots,
	    pos: 0,
	}
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Call { op: Op, args: Vec<Value> },
    Set { op: Op, value: Value },
}

impl Record {
    pub fn op(&self) -> Op {
	match self {
	    Record::Call { op, .. } | Record::Set { op, .. } => *op,
	}
    }
}

///Decoder over a sequence. Stops after the first error.
pub struct Records<'a> {
    slots: &'a [Slot],
    pos: usize,
}

impl<'a> Records<'a> {
    fn malformed(&self) -> Error {
	Error::Malformed { at: self.pos }
    }

    fn read_code(&mut self) -> Result<u8> {
	match self.slots.get(self.pos) {
	    Some(Slot::Code(code)) => {
		self.pos += 1;
		Ok(*code)
	    },
	    _ => Err(self.malformed()),
	}
    }

    fn read_count(&mut self) -> Result<usize> {
	match self.slots.get(self.pos) {
	    Some(Slot::Count(count)) => {
		self.pos += 1;
		Ok(*count)
	    },
	    _ => Err(self.malformed()),
	}
    }

    fn read_arg(&mut self) -> Result<Value> {
	match self.slots.get(self.pos) {
	    Some(Slot::Arg(value)) => {
		self.pos += 1;
		Ok(value.clone())
	    },
	    _ => Err(self.malformed()),
	}
    }

    fn read_record(&mut self) -> Result<Record> {
	let code = self.read_code()?;
	let op = Op::from_code(code).ok_or(Error::InvalidOpcode(code))?;
	let count = self.read_count()?;

	match op.kind() {
	    OpKind::Method => {
		let remaining = self.slots.len() - self.pos;
		let mut args = Vec::with_capacity(count.min(remaining));
		for _ in 0..count {
		    args.push(self.read_arg()?);
		}
		Ok(Record::Call { op, args })
	    },
	    OpKind::Property => {
		if count != 1 {
		    return Err(Error::Malformed { at: self.pos - 1 });
		}
		let value = self.read_arg()?;
		Ok(Record::Set { op, value })
	    },
	}
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
	if self.pos >= self.slots.len() {
	    return None;
	}

	let start = self.pos;
	let record = self.read_record();
	match &record {
	    Ok(r) => trace!("decoded `{}` at slot {}", r.op(), start),
	    Err(_) => self.pos = self.slots.len(),
	}

	Some(record)
    }
}
