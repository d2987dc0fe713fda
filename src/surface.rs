//! Replay onto a cairo context with canvas semantics.

use std::str::FromStr;

use cairo::{Context, Operator};
use log::warn;
use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while_m_n},
    character::complete::char,
    combinator::{all_consuming, map, map_res, value},
    sequence::{preceded, tuple},
    Finish, IResult,
};

use crate::error::{Error, Result};
use crate::export::CanvasArc;
use crate::interpret::{number, Sink};
use crate::op::Op;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const TRANSPARENT: Rgba = Rgba { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    fn from_bytes(r: u8, g: u8, b: u8, a: u8) -> Self {
	let unit = |v: u8| (v as f64) / 255.0;
	Rgba { r: unit(r), g: unit(g), b: unit(b), a: unit(a) }
    }
}

#[derive(Debug)]
pub struct ParseColorError(String);

fn hex_pair(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()),
	    |s| u8::from_str_radix(s, 16))(input)
}

fn hex_single(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(1, 1, |c: char| c.is_ascii_hexdigit()),
	    |s| u8::from_str_radix(s, 16).map(|v| v * 17))(input)
}

fn color(input: &str) -> IResult<&str, Rgba> {
    alt((
	value(Rgba::TRANSPARENT, tag_no_case("transparent")),
	value(Rgba::TRANSPARENT, tag_no_case("none")),
	preceded(char('#'), alt((
	    map(tuple((hex_pair, hex_pair, hex_pair, hex_pair)), |(r, g, b, a)| Rgba::from_bytes(r, g, b, a)),
	    map(tuple((hex_pair, hex_pair, hex_pair)), |(r, g, b)| Rgba::from_bytes(r, g, b, 255)),
	    map(tuple((hex_single, hex_single, hex_single)), |(r, g, b)| Rgba::from_bytes(r, g, b, 255)),
	))),
    ))(input)
}

impl FromStr for Rgba {
    type Err = ParseColorError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
	all_consuming(color)(s.trim())
	    .finish()
	    .map(|(_, c)| c)
	    .map_err(|_| ParseColorError(String::from(s)))
    }
}

#[derive(Debug, Clone, Copy)]
enum Linecap {
    Butt,
    Round,
    Square,
}

impl From<Linecap> for cairo::LineCap {
    fn from(cap: Linecap) -> Self {
	match cap {
	    Linecap::Butt => cairo::LineCap::Butt,
	    Linecap::Round => cairo::LineCap::Round,
	    Linecap::Square => cairo::LineCap::Square,
	}
    }
}

impl FromStr for Linecap {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
	Ok(match s.to_lowercase().as_str() {
	    "butt" => Self::Butt,
	    "round" => Self::Round,
	    "square" => Self::Square,
	    _ => return Err(String::from(s)),
	})
    }
}

#[derive(Debug, Clone, Copy)]
enum Linejoin {
    Arcs,
    Bevel,
    Miter,
    Miterclip,
    Round,
}

impl From<Linejoin> for cairo::LineJoin {
    fn from(join: Linejoin) -> Self {
	match join {
	    Linejoin::Bevel => cairo::LineJoin::Bevel,
	    Linejoin::Miter => cairo::LineJoin::Miter,
	    Linejoin::Round => cairo::LineJoin::Round,
	    _ => {
		warn!("line join not supported by cairo: {:?}", join);
		cairo::LineJoin::Miter
	    }
	}
    }
}

impl FromStr for Linejoin {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
	Ok(match s.to_lowercase().as_str() {
	    "arcs" => Self::Arcs,
	    "bevel" => Self::Bevel,
	    "miter" => Self::Miter,
	    "miter-clip" => Self::Miterclip,
	    "round" => Self::Round,
	    _ => return Err(String::from(s)),
	})
    }
}

fn composite_operator(s: &str) -> Option<Operator> {
    Some(match s {
	"source-over" => Operator::Over,
	"source-in" => Operator::In,
	"source-out" => Operator::Out,
	"source-atop" => Operator::Atop,
	"destination-over" => Operator::DestOver,
	"destination-in" => Operator::DestIn,
	"destination-out" => Operator::DestOut,
	"destination-atop" => Operator::DestAtop,
	"copy" => Operator::Source,
	"lighter" => Operator::Add,
	"xor" => Operator::Xor,
	"multiply" => Operator::Multiply,
	"screen" => Operator::Screen,
	_ => return None,
    })
}

#[derive(Debug, Clone, Copy)]
struct Paint {
    stroke: Rgba,
    fill: Rgba,
    alpha: f64,
}

///Drives a cairo context the way a canvas 2D context would behave.
///
///Canvas keeps stroke and fill colors apart while cairo has a single source,
///so the colors live here and are applied right before painting. `stroke`
///and `fill` keep the current path; the rect operations do not touch it.
pub struct CairoSink<'a> {
    cr: &'a Context,
    paint: Paint,
    saved: Vec<Paint>,
}

impl<'a> CairoSink<'a> {
    pub fn new(cr: &'a Context) -> Self {
	CairoSink {
	    cr,
	    paint: Paint {
		stroke: Rgba::BLACK,
		fill: Rgba::BLACK,
		alpha: 1.0,
	    },
	    saved: Vec::new(),
	}
    }

    fn source(&self, color: Rgba) {
	self.cr.set_source_rgba(color.r, color.g, color.b, color.a * self.paint.alpha);
    }

    fn with_path_kept<F: FnOnce(&Context)>(&self, f: F) {
	let path = self.cr.copy_path();
	self.cr.new_path();
	f(self.cr);
	self.cr.new_path();
	self.cr.append_path(&path);
    }

    fn style(&self, op: Op, value: &Value) -> Result<Option<Rgba>> {
	let s = value.as_str().ok_or(Error::InvalidArgument { op, index: 0 })?;
	match s.parse::<Rgba>() {
	    Ok(color) => Ok(Some(color)),
	    Err(ParseColorError(s)) => {
		warn!("ignoring {} {:?}: only hex colors are understood", op, s);
		Ok(None)
	    }
	}
    }
}

impl<'a> Sink for CairoSink<'a> {
    fn call(&mut self, op: Op, args: &[Value]) -> Result<()> {
	let n = |i: usize| number(op, args, i);

	match op {
	    Op::Save => {
		self.saved.push(self.paint);
		self.cr.save();
	    },
	    Op::Restore => {
		if let Some(paint) = self.saved.pop() {
		    self.paint = paint;
		    self.cr.restore();
		}
	    },
	    Op::BeginPath => self.cr.new_path(),
	    Op::ClosePath => self.cr.close_path(),
	    Op::MoveTo => self.cr.move_to(n(0)?, n(1)?),
	    Op::LineTo => self.cr.line_to(n(0)?, n(1)?),
	    Op::BezierCurveTo => self.cr.curve_to(n(0)?, n(1)?, n(2)?, n(3)?, n(4)?, n(5)?),
	    Op::Arc => {
		let arc = CanvasArc::from_args(args)?;
		if arc.clockwise {
		    self.cr.arc_negative(arc.x, arc.y, arc.radius, arc.start_angle, arc.end_angle);
		} else {
		    self.cr.arc(arc.x, arc.y, arc.radius, arc.start_angle, arc.end_angle);
		}
	    },
	    Op::ArcTo => return Err(Error::NotImplemented(op)),
	    Op::Stroke => {
		self.source(self.paint.stroke);
		self.cr.stroke_preserve();
	    },
	    Op::Fill => {
		self.source(self.paint.fill);
		self.cr.fill_preserve();
	    },
	    Op::StrokeRect | Op::FillRect | Op::ClearRect => {
		let (x, y, w, h) = (n(0)?, n(1)?, n(2)?, n(3)?);
		match op {
		    Op::StrokeRect => self.source(self.paint.stroke),
		    Op::FillRect => self.source(self.paint.fill),
		    _ => (),
		}
		self.with_path_kept(|cr| {
		    cr.rectangle(x, y, w, h);
		    match op {
			Op::StrokeRect => cr.stroke(),
			Op::FillRect => cr.fill(),
			_ => {
			    cr.save();
			    cr.set_operator(Operator::Clear);
			    cr.fill();
			    cr.restore();
			}
		    }
		});
	    },
	    _ => return Err(Error::UnsupportedOperation(op)),
	}

	Ok(())
    }

    fn set(&mut self, op: Op, value: &Value) -> Result<()> {
	let n = || value.as_number().ok_or(Error::InvalidArgument { op, index: 0 });

	match op {
	    Op::LineWidth => self.cr.set_line_width(n()?),
	    Op::MiterLimit => self.cr.set_miter_limit(n()?),
	    Op::LineCap => match value.to_string().parse::<Linecap>() {
		Ok(cap) => self.cr.set_line_cap(cap.into()),
		Err(s) => warn!("ignoring lineCap {:?}", s),
	    },
	    Op::LineJoin => match value.to_string().parse::<Linejoin>() {
		Ok(join) => self.cr.set_line_join(join.into()),
		Err(s) => warn!("ignoring lineJoin {:?}", s),
	    },
	    Op::StrokeStyle => {
		if let Some(color) = self.style(op, value)? {
		    self.paint.stroke = color;
		}
	    },
	    Op::FillStyle => {
		if let Some(color) = self.style(op, value)? {
		    self.paint.fill = color;
		}
	    },
	    Op::GlobalAlpha => {
		let alpha = n()?;
		if (0.0..=1.0).contains(&alpha) {
		    self.paint.alpha = alpha;
		}
	    },
	    Op::GlobalCompositeOperation => match composite_operator(&value.to_string()) {
		Some(operator) => self.cr.set_operator(operator),
		None => warn!("ignoring globalCompositeOperation {}", value),
	    },
	    Op::ShadowColor | Op::ShadowOffsetX | Op::ShadowOffsetY | Op::ShadowBlur
		| Op::Font | Op::TextAlign | Op::TextBaseline => {
		warn!("cairo sink ignores `{}`", op);
	    },
	    _ => return Err(Error::UnsupportedOperation(op)),
	}

	Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::Recorder;
    use crate::op::PropertyAccess;
    use cairo::{Format, ImageSurface};

    #[test]
    fn parses_hex_colors() {
	assert_eq!("#ff0000".parse::<Rgba>().unwrap(), Rgba { r: 1.0, g: 0.0, b: 0.0, a: 1.0 });
	assert_eq!("#fff".parse::<Rgba>().unwrap(), Rgba { r: 1.0, g: 1.0, b: 1.0, a: 1.0 });
	assert_eq!("#00000000".parse::<Rgba>().unwrap(), Rgba::TRANSPARENT);
	assert_eq!("none".parse::<Rgba>().unwrap(), Rgba::TRANSPARENT);
	assert!("#abcd".parse::<Rgba>().is_err());
	assert!("red".parse::<Rgba>().is_err());
    }

    #[test]
    fn replays_onto_a_surface() {
	let surface = ImageSurface::create(Format::ARgb32, 32, 32).unwrap();
	let cr = Context::new(&surface);

	let mut rec = Recorder::new();
	rec.set_line_width(4.0);
	rec.set_fill_style("#00ff00");
	rec.move_to(2.0, 2.0);
	rec.line_to(30.0, 2.0);
	rec.arc(16.0, 16.0, 8.0, 0.0, 3.0, true);
	rec.fill_rect(0.0, 0.0, 4.0, 4.0);
	rec.stroke();

	let mut sink = CairoSink::new(&cr);
	rec.draw(&mut sink).unwrap();

	assert_eq!(cr.get_line_width(), 4.0);
	assert!(cr.has_current_point());
    }

    #[test]
    fn arc_to_is_not_implemented() {
	let surface = ImageSurface::create(Format::ARgb32, 8, 8).unwrap();
	let cr = Context::new(&surface);

	let mut rec = Recorder::new();
	rec.arc_to(0.0, 0.0, 4.0, 4.0, 2.0);

	let mut sink = CairoSink::new(&cr);
	assert_eq!(rec.draw(&mut sink), Err(Error::NotImplemented(Op::ArcTo)));
    }
}
