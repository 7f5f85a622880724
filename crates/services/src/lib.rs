//! # services
//!
//! Display logic for forum posts: markup rendering, link and emoticon
//! filters, pagination of post listings and version formatting.

pub mod markup;
pub mod pagination;
pub mod post_renderer;
pub mod version;

pub use markup::{convert_text_to_html, render_markup, smiles, strip_tags, urlize, Smilies};
pub use pagination::{paginate, Page, PageLink, PageRequest, Paginator};
pub use post_renderer::PostRenderer;
pub use version::{get_version, version, VERSION_INFO};
