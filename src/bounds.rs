//! Running bounding box of recorded geometry.

use crate::error::{Error, Result};
use crate::op::Op;
use crate::value::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Rect = Rect { left: 0.0, top: 0.0, width: 0.0, height: 0.0 };

    #[inline]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
	Rect { left, top, width, height }
    }
}

///Min/max tracker fed with method records.
///
///The maxima start at zero rather than minus infinity, so the box always
///reaches the origin on its far side.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    unsupported: Option<Op>,
}

impl Default for BoundingBox {
    fn default() -> Self {
	BoundingBox {
	    min_x: f64::INFINITY,
	    min_y: f64::INFINITY,
	    max_x: 0.0,
	    max_y: 0.0,
	    unsupported: None,
	}
    }
}

impl BoundingBox {
    pub fn new() -> Self {
	BoundingBox::default()
    }

    pub fn reset(&mut self) {
	*self = BoundingBox::default();
    }

    #[inline]
    fn include(&mut self, x: f64, y: f64) {
	self.min_x = self.min_x.min(x);
	self.min_y = self.min_y.min(y);
	self.max_x = self.max_x.max(x);
	self.max_y = self.max_y.max(y);
    }

    ///Applies one method record. Records whose geometry arguments are not
    ///numbers leave the box alone.
    pub fn record(&mut self, op: Op, args: &[Value]) {
	let n = |i: usize| args.get(i).and_then(Value::as_number);

	match op {
	    Op::MoveTo | Op::LineTo => {
		if let (Some(x), Some(y)) = (n(0), n(1)) {
		    self.include(x, y);
		}
	    },
	    Op::FillRect | Op::StrokeRect | Op::ClearRect => {
		if let (Some(x), Some(y), Some(w), Some(h)) = (n(0), n(1), n(2), n(3)) {
		    self.include(x, y);
		    self.include(x + w, y + h);
		}
	    },
	    Op::BezierCurveTo => {
		for i in (0..6).step_by(2) {
		    if let (Some(x), Some(y)) = (n(i), n(i + 1)) {
			self.include(x, y);
		    }
		}
	    },
	    Op::Arc => {
		if let (Some(x), Some(y), Some(r)) = (n(0), n(1), n(2)) {
		    self.include(x - r, y - r);
		    self.include(x + r, y + r);
		}
	    },
	    Op::ArcTo => self.unsupported = Some(op),
	    _ => (),
	}
    }

    pub fn is_empty(&self) -> bool {
	self.min_x.is_infinite()
    }

    pub fn rect(&self) -> Result<Rect> {
	if let Some(op) = self.unsupported {
	    return Err(Error::NotImplemented(op));
	}

	if self.is_empty() {
	    return Ok(Rect::ZERO);
	}

	Ok(Rect::new(self.min_x, self.min_y, self.max_x - self.min_x, self.max_y - self.min_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(values: &[f64]) -> Vec<Value> {
	values.iter().map(|&v| Value::from(v)).collect()
    }

    #[test]
    fn fresh_box_is_zero() {
	assert_eq!(BoundingBox::new().rect(), Ok(Rect::ZERO));
    }

    #[test]
    fn fill_rect_spans_both_corners() {
	let mut b = BoundingBox::new();
	b.record(Op::FillRect, &nums(&[0.0, 0.0, 10.0, 20.0]));
	assert_eq!(b.rect(), Ok(Rect::new(0.0, 0.0, 10.0, 20.0)));
    }

    #[test]
    fn every_rect_op_uses_both_corners() {
	for &op in &[Op::FillRect, Op::StrokeRect, Op::ClearRect] {
	    let mut b = BoundingBox::new();
	    b.record(op, &nums(&[2.0, 3.0, 10.0, 20.0]));
	    assert_eq!(b.rect(), Ok(Rect::new(2.0, 3.0, 10.0, 20.0)), "{}", op);
	}
    }

    #[test]
    fn negative_rect_extent_grows_towards_the_origin() {
	let mut b = BoundingBox::new();
	b.record(Op::FillRect, &nums(&[10.0, 10.0, -5.0, -5.0]));
	assert_eq!(b.rect(), Ok(Rect::new(5.0, 5.0, 5.0, 5.0)));
    }

    #[test]
    fn points_expand_the_box() {
	let mut b = BoundingBox::new();
	b.record(Op::MoveTo, &nums(&[5.0, 5.0]));
	b.record(Op::LineTo, &nums(&[10.0, 5.0]));
	b.record(Op::LineTo, &nums(&[10.0, 10.0]));
	assert_eq!(b.rect(), Ok(Rect::new(5.0, 5.0, 5.0, 5.0)));
    }

    #[test]
    fn maxima_start_at_the_origin() {
	let mut b = BoundingBox::new();
	b.record(Op::MoveTo, &nums(&[-5.0, -8.0]));
	assert_eq!(b.rect(), Ok(Rect::new(-5.0, -8.0, 5.0, 8.0)));
    }

    #[test]
    fn bezier_uses_control_points() {
	let mut b = BoundingBox::new();
	b.record(Op::BezierCurveTo, &nums(&[10.0, 40.0, 30.0, 2.0, 20.0, 20.0]));
	assert_eq!(b.rect(), Ok(Rect::new(10.0, 2.0, 20.0, 38.0)));
    }

    #[test]
    fn arc_covers_the_whole_circle() {
	let mut b = BoundingBox::new();
	let mut args = nums(&[50.0, 50.0, 25.0, 0.0, 0.1]);
	args.push(Value::from(false));
	b.record(Op::Arc, &args);
	assert_eq!(b.rect(), Ok(Rect::new(25.0, 25.0, 50.0, 50.0)));
    }

    #[test]
    fn non_geometry_records_are_ignored() {
	let mut b = BoundingBox::new();
	b.record(Op::Stroke, &[]);
	b.record(Op::BeginPath, &[]);
	assert!(b.is_empty());
    }

    #[test]
    fn arc_to_is_not_implemented() {
	let mut b = BoundingBox::new();
	b.record(Op::MoveTo, &nums(&[1.0, 1.0]));
	b.record(Op::ArcTo, &nums(&[1.0, 1.0, 2.0, 2.0, 1.0]));
	assert_eq!(b.rect(), Err(Error::NotImplemented(Op::ArcTo)));

	b.reset();
	assert_eq!(b.rect(), Ok(Rect::ZERO));
    }
}
