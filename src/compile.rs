//! Decode-once replay.

use std::fmt;

use log::debug;

use crate::error::Result;
use crate::interpret::Sink;
use crate::sequence::{Record, Sequence};

type Step = Box<dyn Fn(&mut dyn Sink) -> Result<()>>;

///A sequence decoded into bound invocations.
///
///Invoking a program drives a sink exactly like [`interpret`] would, without
///touching the slot buffer again. Decoding happens up front, so a corrupt
///sequence fails in [`Program::compile`] before any record reaches a sink,
///where [`interpret`] would have forwarded the records ahead of the fault.
///
///[`interpret`]: crate::interpret::interpret
pub struct Program {
    steps: Vec<Step>,
}

fn bind(record: Record) -> Step {
    match record {
	Record::Call { op, args } => Box::new(move |sink: &mut dyn Sink| sink.call(op, &args)),
	Record::Set { op, value } => Box::new(move |sink: &mut dyn Sink| sink.set(op, &value)),
    }
}

impl Program {
    pub fn compile(sequence: &Sequence) -> Result<Program> {
	let steps = sequence.records()
	    .map(|record| record.map(bind))
	    .collect::<Result<Vec<_>>>()?;

	debug!("compiled {} records from {} slots", steps.len(), sequence.cursor());

	Ok(Program { steps })
    }

    pub fn invoke<S: Sink + ?Sized>(&self, mut sink: &mut S) -> Result<()> {
	for step in &self.steps {
	    step(&mut sink)?;
	}

	Ok(())
    }

    pub fn len(&self) -> usize {
	self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
	self.steps.is_empty()
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	f.debug_struct("Program")
	    .field("steps", &self.steps.len())
	    .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::op::Op;
    use crate::sequence::Slot;
    use crate::value::Value;

    #[derive(Default)]
    struct Tally {
	calls: usize,
	sets: Vec<Value>,
    }

    impl Sink for Tally {
	fn call(&mut self, _op: Op, _args: &[Value]) -> Result<()> {
	    self.calls += 1;
	    Ok(())
	}

	fn set(&mut self, _op: Op, value: &Value) -> Result<()> {
	    self.sets.push(value.clone());
	    Ok(())
	}
    }

    #[test]
    fn program_is_reusable() {
	let seq = Sequence::from_slots(vec![
	    Slot::Code(Op::BeginPath.code()),
	    Slot::Count(0),
	    Slot::Code(Op::LineWidth.code()),
	    Slot::Count(1),
	    Slot::Arg(Value::from(0.1 + 0.2)),
	]);
	let program = Program::compile(&seq).unwrap();
	assert_eq!(program.len(), 2);

	let mut first = Tally::default();
	let mut second = Tally::default();
	program.invoke(&mut first).unwrap();
	program.invoke(&mut second).unwrap();

	assert_eq!(first.calls, 1);
	assert_eq!(first.sets, vec![Value::Number(0.1 + 0.2)]);
	assert_eq!(first.sets, second.sets);
    }

    #[test]
    fn corrupt_sequence_fails_to_compile() {
	let seq = Sequence::from_slots(vec![Slot::Code(0x55), Slot::Count(0)]);
	assert_eq!(Program::compile(&seq).unwrap_err(), Error::InvalidOpcode(0x55));
    }

    #[test]
    fn corrupt_tail_reaches_no_sink() {
	let seq = Sequence::from_slots(vec![
	    Slot::Code(Op::BeginPath.code()),
	    Slot::Count(0),
	    Slot::Code(0x55),
	]);

	let mut tally = Tally::default();
	assert_eq!(crate::interpret::interpret(&seq, &mut tally), Err(Error::InvalidOpcode(0x55)));
	assert_eq!(tally.calls, 1);

	assert_eq!(Program::compile(&seq).unwrap_err(), Error::InvalidOpcode(0x55));
    }

    #[test]
    fn invokes_trait_objects() {
	let seq = Sequence::from_slots(vec![
	    Slot::Code(Op::Stroke.code()),
	    Slot::Count(0),
	    Slot::Code(Op::Fill.code()),
	    Slot::Count(0),
	]);
	let program = Program::compile(&seq).unwrap();

	let mut tally = Tally::default();
	{
	    let sink: &mut dyn Sink = &mut tally;
	    program.invoke(sink).unwrap();
	}
	assert_eq!(tally.calls, 2);
    }
}
