pub mod cover_art;
pub mod layout;
pub mod presenter;
pub mod tile;

pub use cover_art::{CoverArt, CoverArtCache, CoverArtLoader, ResourceLoadError};
pub use presenter::{cover_art_refs, Presenter, RenderError, RenderedChart};
