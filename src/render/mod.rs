//! Content rendering: skeletons, category sections and cards

mod cards;
mod group;
mod renderer;
mod skeleton;
mod target;

pub use cards::{card, certificate_card, project_card, render_sections};
pub use group::{group_by_category, Section};
pub use renderer::{ContentRenderer, RenderConfig, RenderOutcome, Source};
pub use skeleton::{skeleton_count, skeleton_markup};
pub use target::{Generation, Page};
