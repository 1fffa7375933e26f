mod copy;
mod translate;

pub use copy::CopyShape;
pub use translate::Translate;
