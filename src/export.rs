//! SVG path export.
//!
//! Only the path-building subset of the canvas API has an SVG counterpart:
//! `moveTo`, `lineTo`, `bezierCurveTo`, `arc`, `stroke`, `fill` and the
//! `lineWidth` property.

use std::f64::consts::PI;

use svg::node::element::Path;
use svg::Node;

use crate::error::{Error, Result};
use crate::interpret::number;
use crate::op::Op;
use crate::sequence::{Record, Sequence};
use crate::value::Value;

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

///Anything that takes SVG attributes by name.
pub trait SvgSink {
    fn set_attribute(&mut self, name: &str, value: String);
}

impl SvgSink for Path {
    fn set_attribute(&mut self, name: &str, value: String) {
	self.assign(name, value);
    }
}

///A `path` element reduced to its namespace tag and ordered attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgPath {
    namespace: String,
    attributes: Vec<(String, String)>,
}

impl Default for SvgPath {
    fn default() -> Self {
	SvgPath::with_namespace(SVG_NAMESPACE)
    }
}

impl SvgPath {
    pub fn new() -> Self {
	SvgPath::default()
    }

    pub fn with_namespace(namespace: &str) -> Self {
	SvgPath {
	    namespace: String::from(namespace),
	    attributes: Vec::new(),
	}
    }

    pub fn namespace(&self) -> &str {
	&self.namespace
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
	self.attributes.iter()
	    .find(|(n, _)| n == name)
	    .map(|(_, v)| v.as_str())
    }

    ///The `d` attribute, empty before export.
    pub fn data(&self) -> &str {
	self.attribute("d").unwrap_or("")
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
	self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn to_element(&self) -> Path {
	self.attributes.iter()
	    .fold(Path::new(), |path, (name, value)| path.set(name.clone(), value.clone()))
    }
}

impl SvgSink for SvgPath {
    fn set_attribute(&mut self, name: &str, value: String) {
	match self.attributes.iter_mut().find(|(n, _)| n == name) {
	    Some(slot) => slot.1 = value,
	    None => self.attributes.push((String::from(name), value)),
	}
    }
}

///`arc(x, y, radius, startAngle, endAngle, clockwise)` as recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasArc {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub clockwise: bool,
}

impl CanvasArc {
    pub fn from_args(args: &[Value]) -> Result<Self> {
	Ok(CanvasArc {
	    x: number(Op::Arc, args, 0)?,
	    y: number(Op::Arc, args, 1)?,
	    radius: number(Op::Arc, args, 2)?,
	    start_angle: number(Op::Arc, args, 3)?,
	    end_angle: number(Op::Arc, args, 4)?,
	    clockwise: args.get(5).map_or(false, Value::is_truthy),
	})
    }

    fn point(&self, angle: f64) -> (f64, f64) {
	(self.x + angle.cos() * self.radius, self.y + angle.sin() * self.radius)
    }

    ///Appends the path tokens for this arc. `first` is true when nothing has
    ///been drawn yet, so the arc opens with `M` instead of a connecting `L`.
    ///
    ///A full turn cannot be a single SVG arc (start and end coincide), so it
    ///is drawn as two half turns followed by a move to the real end point.
    pub fn to_path(&self, d: &mut Vec<String>, first: bool) {
	if self.start_angle == self.end_angle {
	    return;
	}

	let delta = (self.end_angle - self.start_angle).abs();
	let (end_x, end_y) = self.point(self.end_angle);

	if delta >= 2.0 * PI {
	    let half = CanvasArc { end_angle: self.start_angle + PI, ..*self };
	    half.to_path(d, first);
	    let half = CanvasArc {
		start_angle: self.start_angle + PI,
		end_angle: self.start_angle + 2.0 * PI,
		..*self
	    };
	    half.to_path(d, false);
	    push_tokens(d, "M", &[end_x, end_y]);
	    return;
	}

	let (start_x, start_y) = self.point(self.start_angle);
	push_tokens(d, if first { "M" } else { "L" }, &[start_x, start_y]);

	let rotation = delta * 180.0 / PI;
	let sweep = if self.clockwise { 0.0 } else { 1.0 };
	let large_arc = if (rotation >= 180.0) == self.clockwise { 0.0 } else { 1.0 };
	push_tokens(d, "A", &[self.radius, self.radius, rotation, large_arc, sweep, end_x, end_y]);
    }
}

fn push_tokens(d: &mut Vec<String>, command: &str, params: &[f64]) {
    d.push(String::from(command));
    d.extend(params.iter().map(|p| p.to_string()));
}

fn join(args: &[Value], separator: &str) -> String {
    args.iter()
	.map(Value::to_string)
	.collect::<Vec<_>>()
	.join(separator)
}

///Translates a sequence into one SVG path.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgExporter {
    color: String,
    namespace: String,
}

impl Default for SvgExporter {
    fn default() -> Self {
	SvgExporter {
	    color: String::from("black"),
	    namespace: String::from(SVG_NAMESPACE),
	}
    }
}

impl SvgExporter {
    pub fn new() -> Self {
	SvgExporter::default()
    }

    ///Color written by `stroke` and `fill`.
    pub fn color(mut self, color: impl Into<String>) -> Self {
	self.color = color.into();
	self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
	self.namespace = namespace.into();
	self
    }

    pub fn export(&self, sequence: &Sequence) -> Result<SvgPath> {
	let mut path = SvgPath::with_namespace(&self.namespace);
	self.export_into(sequence, &mut path)?;
	Ok(path)
    }

    ///Assigns attributes on `sink` as records are decoded and `d` last. On
    ///error the sink may hold some attributes already; discard it.
    pub fn export_into<S: SvgSink + ?Sized>(&self, sequence: &Sequence, sink: &mut S) -> Result<()> {
	let mut d: Vec<String> = Vec::new();

	for record in sequence.records() {
	    match record? {
		Record::Call { op, args } => match op {
		    Op::MoveTo => {
			d.push(String::from("M"));
			d.push(join(&args, ","));
		    },
		    Op::LineTo => {
			d.push(String::from("L"));
			d.push(join(&args, " "));
		    },
		    Op::BezierCurveTo => {
			d.push(String::from("C"));
			d.push(join(&args, " "));
		    },
		    Op::Arc => {
			let first = d.is_empty();
			CanvasArc::from_args(&args)?.to_path(&mut d, first);
		    },
		    Op::Stroke => sink.set_attribute("stroke", self.color.clone()),
		    Op::Fill => sink.set_attribute("fill", self.color.clone()),
		    Op::ArcTo | Op::Save | Op::Restore => return Err(Error::NotImplemented(op)),
		    _ => return Err(Error::UnsupportedOperation(op)),
		},
		Record::Set { op: Op::LineWidth, value } => sink.set_attribute("stroke-width", value.to_string()),
		Record::Set { op, .. } => return Err(Error::UnsupportedOperation(op)),
	    }
	}

	sink.set_attribute("d", d.join(" "));

	Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc(start_angle: f64, end_angle: f64, clockwise: bool) -> CanvasArc {
	CanvasArc { x: 0.0, y: 0.0, radius: 10.0, start_angle, end_angle, clockwise }
    }

    fn tokens(arc: CanvasArc, first: bool) -> Vec<String> {
	let mut d = Vec::new();
	arc.to_path(&mut d, first);
	d
    }

    ///Returns (large-arc, sweep) of every `A` segment.
    fn flags(d: &[String]) -> Vec<(String, String)> {
	d.iter()
	    .enumerate()
	    .filter(|(_, t)| *t == "A")
	    .map(|(i, _)| (d[i + 4].clone(), d[i + 5].clone()))
	    .collect()
    }

    #[test]
    fn zero_length_arc_draws_nothing() {
	assert!(tokens(arc(1.0, 1.0, false), true).is_empty());
    }

    #[test]
    fn first_arc_moves_later_arc_connects() {
	assert_eq!(tokens(arc(0.0, 1.0, false), true)[0], "M");
	assert_eq!(tokens(arc(0.0, 1.0, false), false)[0], "L");
    }

    #[test]
    fn arc_segment_layout() {
	let d = tokens(arc(0.0, PI / 2.0, false), true);
	assert_eq!(d.len(), 3 + 8);
	assert_eq!(&d[..3], &["M", "10", "0"]);
	assert_eq!(d[3], "A");
	assert_eq!(d[4], "10");
	assert_eq!(d[5], "10");
	assert_eq!(d[6], "90");
    }

    #[test]
    fn flag_derivation() {
	let pair = |large: &str, sweep: &str| vec![(String::from(large), String::from(sweep))];

	// the short way round in either direction never needs the large arc
	assert_eq!(flags(&tokens(arc(0.0, 1.0, false), true)), pair("0", "1"));
	assert_eq!(flags(&tokens(arc(0.0, 4.0, true), true)), pair("0", "0"));
	// going the long way round does
	assert_eq!(flags(&tokens(arc(0.0, 1.0, true), true)), pair("1", "0"));
	assert_eq!(flags(&tokens(arc(0.0, 4.0, false), true)), pair("1", "1"));
    }

    #[test]
    fn full_circle_splits_in_two() {
	for &clockwise in &[false, true] {
	    let d = tokens(arc(0.0, 2.0 * PI, clockwise), true);
	    assert_eq!(d.iter().filter(|t| *t == "A").count(), 2);
	    assert_eq!(d[0], "M");
	    assert_eq!(d[d.len() - 3], "M");
	}
    }

    #[test]
    fn more_than_a_full_turn_ends_at_the_real_end_angle() {
	let d = tokens(arc(0.0, 3.0 * PI, false), true);
	let n = d.len();
	let end_x: f64 = d[n - 2].parse().unwrap();
	assert!((end_x - (-10.0)).abs() < 1e-9);
    }

    #[test]
    fn svg_path_replaces_attributes() {
	let mut path = SvgPath::new();
	path.set_attribute("stroke-width", String::from("1"));
	path.set_attribute("stroke-width", String::from("3"));
	assert_eq!(path.attribute("stroke-width"), Some("3"));
	assert_eq!(path.attributes().count(), 1);
	assert_eq!(path.namespace(), SVG_NAMESPACE);
    }
}
