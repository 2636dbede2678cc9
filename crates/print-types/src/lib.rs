pub mod axis;
pub mod bounds;
pub mod ids;
pub mod mesh;

pub use axis::*;
pub use bounds::*;
pub use ids::*;
pub use mesh::*;
