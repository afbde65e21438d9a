//! Work entry loading for folio.
//!
//! Reads markdown work entries from a [`WorkSource`], builds list summaries
//! ordered newest first, and loads detail pages with social metadata.

pub mod dates;
pub mod detail;
pub mod source;
pub mod work;

pub use dates::{compare_newest_first, end_timestamp, parse_date, sort_newest_first};
pub use detail::{absolute_url, load_work_page, social_meta, work_path, SocialMeta, WorkPage};
pub use source::{BundleSource, ContentError, DirSource, SourceFile, WorkSource, WORK_DIR};
pub use work::{
    entry_from_source, is_valid_slug, load_work_list, load_work_list_at, slug_from_path,
    title_from_slug, WorkEntry,
};
