//! Small growable containers used as the building blocks for the rest of
//! the workspace: an opaque-handle dynamic sequence and a bounded FIFO ring
//! buffer. Both wrap a standard-library container internally but expose the
//! exact ADT surface the rest of the workspace is built against (stable-order
//! removal, explicit capacity doubling, fallible growth).

mod fifo;
mod sequence;

pub use fifo::Fifo;
pub use sequence::Sequence;
