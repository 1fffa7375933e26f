mod make_box;
mod make_compound;
mod make_edge;
mod make_face;
mod make_wire;

pub use make_box::{BoxShapes, BoxSide, MakeBox};
pub use make_compound::MakeCompound;
pub use make_edge::{EdgeCache, MakeEdge};
pub use make_face::MakeFace;
pub use make_wire::MakeWire;
