//=========================================================================
// Math Primitives
//=========================================================================

mod color;
mod rect;

pub use color::Color4f;
pub use rect::Rect;
