// PDF rendering: remote image loading, the pdf-writer backend, and the
// GET /profile.pdf handler that ties them to the layout engine.

pub mod handlers;
pub mod image;
pub mod pdf;

pub use image::{HttpImageFetcher, ImageFetcher};
pub use pdf::build_profile_pdf;
