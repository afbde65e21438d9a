//! Static site generator for folio portfolios.
//!
//! Renders the work list and every detail page to HTML, alongside the
//! stylesheet, copied static files, a JSON dump of the list and a sitemap.

pub mod assets;
pub mod builder;
pub mod templates;

pub use assets::AssetPipeline;
pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use templates::{SiteContext, TemplateEngine};
