mod bubbles;
mod relations;

pub use bubbles::{BubbleDatum, BubbleKind, BubbleView, build_bubbles};
pub use relations::{EntityKind, RelationGraph};
