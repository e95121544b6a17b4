// Document layout engine: greedy line breaking, vertical flow on a single page,
// and the fixed-order section renderer for profile pages.
// Pure and synchronous; painting goes through the `Painter` trait.

pub mod document;
pub mod flow;
pub mod font_metrics;
pub mod sections;
pub mod wrap;

pub use document::{PageGeometry, ProfileDocument};
pub use flow::{ImagePlacement, Painter, Rgb, Rule, TextRun};
pub use font_metrics::FontHandle;
pub use sections::{render_profile, RenderOutcome};
