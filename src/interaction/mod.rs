mod camera;
mod explorer;

pub use camera::{OrbitCamera, Projected};
pub use explorer::{BubbleExplorer, SelectionChange, ViewLevel};
