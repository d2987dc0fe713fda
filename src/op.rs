//! The opcode table.
//!
//! Methods occupy `0x00..=0x7f`, properties `0x80..=0xff`. The table is
//! expanded at compile time by `op_table`, which also rejects duplicate codes
//! and codes on the wrong side of [`PROPERTY_TAG`].

use std::fmt;

use op_macro::op_table;

use crate::value::Value;

pub const PROPERTY_TAG: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Method,
    Property,
}

#[op_table(PropertyAccess)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Op {
    // state
    #[method] Save = 0x00,
    #[method] Restore = 0x01,

    // path
    #[method] BeginPath = 0x10,
    #[method] ClosePath = 0x11,

    // line
    #[method] LineTo = 0x20,
    #[method] BezierCurveTo = 0x21,
    #[method] Arc = 0x22,
    #[method] ArcTo = 0x23,

    // move
    #[method] MoveTo = 0x30,

    // draw
    #[method] Stroke = 0x70,
    #[method] Fill = 0x71,
    #[method] StrokeRect = 0x72,
    #[method] FillRect = 0x73,
    #[method] ClearRect = 0x7f,

    // line style
    #[property] LineWidth = 0x80,
    #[property] LineCap = 0x81,
    #[property] LineJoin = 0x82,
    #[property] MiterLimit = 0x83,

    // paint
    #[property] StrokeStyle = 0x90,
    #[property] FillStyle = 0x91,

    // global
    #[property] GlobalAlpha = 0xa0,
    #[property] GlobalCompositeOperation = 0xa1,

    // shadow
    #[property] ShadowColor = 0xb0,
    #[property] ShadowOffsetX = 0xb1,
    #[property] ShadowOffsetY = 0xb2,
    #[property] ShadowBlur = 0xb3,

    // text
    #[property] Font = 0xc0,
    #[property] TextAlign = 0xc1,
    #[property] TextBaseline = 0xc2,
}

impl Op {
    pub fn is_method(self) -> bool {
	self.kind() == OpKind::Method
    }

    pub fn is_property(self) -> bool {
	self.kind() == OpKind::Property
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_resolve_both_ways() {
	for &op in Op::ALL {
	    assert_eq!(Op::from_code(op.code()), Some(op));
	    assert_eq!(Op::from_name(op.name()), Some(op));
	}
    }

    #[test]
    fn kinds_follow_the_tag_bit() {
	for &op in Op::METHODS {
	    assert_eq!(op.kind(), OpKind::Method);
	    assert_eq!(op.code() & PROPERTY_TAG, 0);
	}
	for &op in Op::PROPERTIES {
	    assert_eq!(op.kind(), OpKind::Property);
	    assert_ne!(op.code() & PROPERTY_TAG, 0);
	}
	assert_eq!(Op::METHODS.len() + Op::PROPERTIES.len(), Op::ALL.len());
    }

    #[test]
    fn names_are_unique() {
	let names: HashSet<_> = Op::ALL.iter().map(|op| op.name()).collect();
	assert_eq!(names.len(), Op::ALL.len());
    }

    #[test]
    fn canvas_names() {
	assert_eq!(Op::BezierCurveTo.name(), "bezierCurveTo");
	assert_eq!(Op::LineWidth.name(), "lineWidth");
	assert_eq!(Op::ClearRect.code(), 0x7f);
	assert_eq!(Op::from_code(0x40), None);
	assert_eq!(Op::from_name("quadraticCurveTo"), None);
    }
}
