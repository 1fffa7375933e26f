mod rebuild;
mod remove_edge;
mod split_face;

pub use remove_edge::RemoveEdge;
pub use split_face::SplitFace;
