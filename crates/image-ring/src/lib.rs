//! Image Record Ring
//!
//! Fixed-capacity circular store of compressed image records with a single
//! movable drain cursor. The capture producer overwrites the record at the
//! cursor; the link consumer drains that record chunk by chunk and advances
//! the cursor once every byte has been sent.

mod ring;

pub use ring::{ImageRing, ImageSlot};
