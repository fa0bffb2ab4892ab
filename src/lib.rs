#![warn(clippy::all, clippy::nursery, clippy::pedantic)]

pub mod archive;
pub mod bookmarks;
pub mod chm_url;
pub mod config;
mod encoding;
pub mod fonts;
pub mod history;
pub mod logging;
pub mod page_cache;
pub mod results;
pub mod search;
pub mod sync;
pub mod topics;
pub mod version;
pub mod viewer;
