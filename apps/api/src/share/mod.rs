// Sharing: hosted profile images and short links to the rendered PDF.
// Both collaborators are optional and configured from the environment.

pub mod handlers;
pub mod imgbb;
pub mod shortener;

pub use imgbb::{ImageHost, ImageHostError, ImgBbClient};
pub use shortener::{BitlyClient, LinkShortener, ShortenError};
