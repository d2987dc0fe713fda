//! Line-oriented text form of a sequence.
//!
//! ```text
//! # comment
//! moveTo 5 5
//! lineWidth = 2
//! arc 0 0 10 0 3.141592653589793 false
//! fillStyle = "#ff0000"
//! ```
//!
//! Numbers are written in their shortest round-trip form, so assembling a
//! disassembled sequence reproduces it exactly.

use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag, take_while1},
    character::complete::{char, space0, space1},
    combinator::{all_consuming, map, opt, value},
    multi::many0,
    number::complete::double,
    sequence::{delimited, preceded, tuple},
    Finish, IResult,
};

use crate::error::{Error, Result};
use crate::op::Op;
use crate::recorder::Recorder;
use crate::sequence::{Record, Sequence};
use crate::value::Value;

fn write_value(out: &mut String, v: &Value) {
    match v {
	Value::Text(s) => {
	    out.push('"');
	    for c in s.chars() {
		match c {
		    '"' => out.push_str("\\\""),
		    '\\' => out.push_str("\\\\"),
		    '\n' => out.push_str("\\n"),
		    c => out.push(c),
		}
	    }
	    out.push('"');
	},
	v => out.push_str(&v.to_string()),
    }
}

///Writes one line per record.
pub fn disassemble(sequence: &Sequence) -> Result<String> {
    let mut out = String::new();

    for record in sequence.records() {
	match record? {
	    Record::Call { op, args } => {
		out.push_str(op.name());
		for arg in &args {
		    out.push(' ');
		    write_value(&mut out, arg);
		}
	    },
	    Record::Set { op, value } => {
		out.push_str(op.name());
		out.push_str(" = ");
		write_value(&mut out, &value);
	    },
	}
	out.push('\n');
    }

    Ok(out)
}

enum Statement<'a> {
    Call(&'a str, Vec<Value>),
    Set(&'a str, Value),
}

fn quoted(input: &str) -> IResult<&str, String> {
    let escape = alt((
	value("\\", tag("\\")),
	value("\"", tag("\"")),
	value("\n", tag("n")),
    ));

    delimited(
	char('"'),
	map(opt(escaped_transform(is_not("\\\""), '\\', escape)), Option::unwrap_or_default),
	char('"'),
    )(input)
}

fn argument(input: &str) -> IResult<&str, Value> {
    alt((
	value(Value::Bool(true), tag("true")),
	value(Value::Bool(false), tag("false")),
	map(quoted, Value::Text),
	map(double, Value::Number),
    ))(input)
}

fn name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric())(input)
}

fn statement(input: &str) -> IResult<&str, Statement<'_>> {
    let (input, ident) = name(input)?;

    alt((
	map(preceded(tuple((space0, char('='), space0)), argument), move |v| Statement::Set(ident, v)),
	map(many0(preceded(space1, argument)), move |args| Statement::Call(ident, args)),
    ))(input)
}

///Parses a listing into a fresh recorder, rebuilding shadow state and bounds
///along the way.
pub fn assemble(text: &str) -> Result<Recorder> {
    let mut rec = Recorder::new();

    for (n, line) in text.lines().enumerate() {
	let line = line.trim();
	if line.is_empty() || line.starts_with('#') {
	    continue;
	}

	let err = |message: String| Error::Listing { line: n + 1, message };

	let (_, stmt) = all_consuming(statement)(line)
	    .finish()
	    .map_err(|e| err(format!("cannot parse `{}` ({:?})", e.input, e.code)))?;

	match stmt {
	    Statement::Call(name, args) => match Op::from_name(name) {
		Some(op) if op.is_method() => rec.emit_call(op, args),
		Some(op) => return Err(err(format!("`{}` is a property, assign it with `=`", op))),
		None => return Err(err(format!("unknown method `{}`", name))),
	    },
	    Statement::Set(name, v) => match Op::from_name(name) {
		Some(op) if op.is_property() => rec.emit_set(op, v),
		Some(op) => return Err(err(format!("`{}` is a method, not a property", op))),
		None => return Err(err(format!("unknown property `{}`", name))),
	    },
	}
    }

    Ok(rec)
}
