mod edge_points;
mod nearest_point;

pub use edge_points::EdgePoints;
pub use nearest_point::NearestPoint;
