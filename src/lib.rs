//! A compact intermediate representation for 2D canvas drawing.
//!
//! A [`Recorder`] turns canvas calls into a flat [`Sequence`] of slots.
//! The sequence can be replayed into any [`Sink`], compiled once into a
//! [`Program`] for repeated replay, exported as an SVG path, or written out
//! as a text listing.

mod bounds;
mod compile;
mod error;
mod export;
mod interpret;
mod listing;
mod op;
mod recorder;
mod sequence;
#[cfg(feature = "cairo")]
mod surface;
mod value;

pub use bounds::{BoundingBox, Rect};
pub use compile::Program;
pub use error::{Error, Result};
pub use export::{CanvasArc, SvgExporter, SvgPath, SvgSink, SVG_NAMESPACE};
pub use interpret::{interpret, number, Sink};
pub use listing::{assemble, disassemble};
pub use op::{Op, OpKind, PropertyAccess, PROPERTY_TAG};
pub use recorder::Recorder;
pub use sequence::{Record, Records, Sequence, Slot};
#[cfg(feature = "cairo")]
pub use surface::{CairoSink, ParseColorError, Rgba};
pub use value::Value;
