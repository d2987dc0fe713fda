//! The recording side: a canvas-shaped API that appends records.

use std::collections::HashMap;

use log::{debug, warn};

use crate::bounds::{BoundingBox, Rect};
use crate::compile::Program;
use crate::error::Result;
use crate::export::{SvgExporter, SvgPath};
use crate::interpret::{interpret, Sink};
use crate::op::{Op, PropertyAccess};
use crate::sequence::Sequence;
use crate::value::Value;

///Records drawing calls into a [`Sequence`].
///
///Property writes are mirrored into a shadow table so reads never need a
///drawing surface. Method records also feed the bounding box. Recording never
///fails; replay and export report problems instead.
#[derive(Debug, Default)]
pub struct Recorder {
    sequence: Sequence,
    shadow: HashMap<Op, Value>,
    bounds: BoundingBox,
    compiled: Option<Program>,
}

impl Recorder {
    pub fn new() -> Self {
	Recorder::default()
    }

    pub fn sequence(&self) -> &Sequence {
	&self.sequence
    }

    pub fn reset(&mut self) {
	debug!("reset recorder holding {} slots", self.sequence.cursor());
	self.sequence.clear();
	self.shadow.clear();
	self.bounds.reset();
	self.compiled = None;
    }

    ///Appends `[code, count, args…]` for a method.
    pub fn emit_call(&mut self, op: Op, args: Vec<Value>) {
	if op.is_property() {
	    warn!("`{}` is a property, recording its first argument as an assignment", op);
	    if let Some(value) = args.into_iter().next() {
		self.emit_set(op, value);
	    }
	    return;
	}

	self.bounds.record(op, &args);
	self.sequence.push_call(op, args);
	self.compiled = None;
    }

    ///Appends `[code | 0x80, 1, value]` and remembers the value.
    pub fn emit_set(&mut self, op: Op, value: Value) {
	if op.is_method() {
	    warn!("`{}` is a method, recording the assignment as a call", op);
	    self.emit_call(op, vec![value]);
	    return;
	}

	self.sequence.push_set(op, value.clone());
	self.shadow.insert(op, value);
	self.compiled = None;
    }

    pub fn save(&mut self) {
	self.emit_call(Op::Save, vec![]);
    }

    pub fn restore(&mut self) {
	self.emit_call(Op::Restore, vec![]);
    }

    pub fn begin_path(&mut self) {
	self.emit_call(Op::BeginPath, vec![]);
    }

    pub fn close_path(&mut self) {
	self.emit_call(Op::ClosePath, vec![]);
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
	self.emit_call(Op::LineTo, vec![x.into(), y.into()]);
    }

    pub fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
	self.emit_call(Op::BezierCurveTo, vec![
	    cp1x.into(), cp1y.into(),
	    cp2x.into(), cp2y.into(),
	    x.into(), y.into(),
	]);
    }

    pub fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64, clockwise: bool) {
	self.emit_call(Op::Arc, vec![
	    x.into(), y.into(),
	    radius.into(),
	    start_angle.into(), end_angle.into(),
	    clockwise.into(),
	]);
    }

    ///Recorded like any other call, but the bounding box and SVG export
    ///cannot handle it.
    pub fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) {
	self.emit_call(Op::ArcTo, vec![x1.into(), y1.into(), x2.into(), y2.into(), radius.into()]);
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
	self.emit_call(Op::MoveTo, vec![x.into(), y.into()]);
    }

    pub fn stroke(&mut self) {
	self.emit_call(Op::Stroke, vec![]);
    }

    pub fn fill(&mut self) {
	self.emit_call(Op::Fill, vec![]);
    }

    pub fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
	self.emit_call(Op::StrokeRect, vec![x.into(), y.into(), width.into(), height.into()]);
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
	self.emit_call(Op::FillRect, vec![x.into(), y.into(), width.into(), height.into()]);
    }

    pub fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
	self.emit_call(Op::ClearRect, vec![x.into(), y.into(), width.into(), height.into()]);
    }

    pub fn bounding_rect(&self) -> Result<Rect> {
	self.bounds.rect()
    }

    ///Replays everything recorded so far into `sink`.
    pub fn draw<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<()> {
	interpret(&self.sequence, sink)
    }

    ///Compiles the sequence, or hands back the program compiled earlier.
    ///Any further recording or a reset drops the cached program.
    pub fn compile(&mut self) -> Result<&Program> {
	let program = match self.compiled.take() {
	    Some(program) => program,
	    None => Program::compile(&self.sequence)?,
	};

	Ok(self.compiled.insert(program))
    }

    pub fn is_compiled(&self) -> bool {
	self.compiled.is_some()
    }

    pub fn export_svg(&self, exporter: &SvgExporter) -> Result<SvgPath> {
	exporter.export(&self.sequence)
    }
}

impl PropertyAccess for Recorder {
    fn set_property(&mut self, op: Op, value: Value) {
	self.emit_set(op, value);
    }

    fn property(&self, op: Op) -> Option<&Value> {
	self.shadow.get(&op)
    }
}

///Replaying into a recorder copies the records.
impl Sink for Recorder {
    fn call(&mut self, op: Op, args: &[Value]) -> Result<()> {
	self.emit_call(op, args.to_vec());
	Ok(())
    }

    fn set(&mut self, op: Op, value: &Value) -> Result<()> {
	self.emit_set(op, value.clone());
	Ok(())
    }
}
