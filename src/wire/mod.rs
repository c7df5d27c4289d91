//! MessagePack envelope primitives.
//!
//! Maps and arrays declare their length before any entry is written, and the
//! format carries no terminator. [`WireWriter`] tracks declared vs. written
//! counts for every open container; [`WireReader`] checks every declared
//! length against the bytes actually present before touching them.

mod reader;
mod writer;

pub use reader::{ValueKind, WireReader};
pub use writer::WireWriter;
