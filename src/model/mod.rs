// MODEL: Scene data and camera
pub mod camera;
pub mod scene;
pub mod transform;

pub use camera::Camera2D;
pub use scene::Scene;
pub use transform::Transform2D;
