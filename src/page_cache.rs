//! On-disk copy of an open archive that the HTML pane renders from.
//!
//! The web view cannot resolve `#chm:` URLs itself, so each archive is
//! extracted once into a directory named after a hash of its path, and
//! topic URLs are mapped to `file://` locations inside it. The marker file
//! holds the archive's size and modification time; a rebuilt archive is
//! extracted again over the same directory.

use std::{
	fs, io,
	path::{Path, PathBuf},
	time::UNIX_EPOCH,
};

use anyhow::{Context, Result};
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use sha1::{Digest, Sha1};

use crate::{
	archive::ChmArchive,
	chm_url::{ChmUrl, normalize_topic},
};

const MARKER_FILE: &str = ".chmview-extracted";
const FILE_SCHEME: &str = "file://";

// Keep '/' so locations stay readable paths.
const PATH_SEGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'#').add(b'%').add(b'<').add(b'>').add(b'?');

#[derive(Clone, Debug)]
pub struct PageCache {
	root: PathBuf,
	fingerprint: String,
}

impl PageCache {
	pub fn for_archive(cache_root: &Path, archive_path: &str) -> Self {
		let mut hasher = Sha1::new();
		hasher.update(archive_path.as_bytes());
		let hash = format!("{:x}", hasher.finalize());
		Self { root: cache_root.join(format!("chmview_{hash}")), fingerprint: archive_fingerprint(Path::new(archive_path)) }
	}

	/// True when the directory holds an extraction of the archive as it is now.
	pub fn is_prepared(&self) -> bool {
		fs::read_to_string(self.root.join(MARKER_FILE)).is_ok_and(|marker| marker == self.fingerprint)
	}

	/// Extracts the archive unless an earlier run already did.
	///
	/// # Errors
	///
	/// Returns an error if the archive cannot be written to the cache directory.
	pub fn prepare(&self, archive: &mut ChmArchive) -> Result<()> {
		if self.is_prepared() {
			log::debug!("Reusing page cache {}", self.root.display());
			return Ok(());
		}
		self.clear()?;
		let written = archive.extract_to(&self.root)?;
		self.mark_prepared()?;
		log::debug!("Extracted {written} files to {}", self.root.display());
		Ok(())
	}

	fn clear(&self) -> Result<()> {
		match fs::remove_dir_all(&self.root) {
			Ok(()) => {
				log::debug!("Discarded stale page cache {}", self.root.display());
				Ok(())
			}
			Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(e).with_context(|| format!("Failed to clear page cache {}", self.root.display())),
		}
	}

	fn mark_prepared(&self) -> Result<()> {
		fs::write(self.root.join(MARKER_FILE), &self.fingerprint)
			.with_context(|| format!("Failed to finish page cache {}", self.root.display()))
	}

	pub fn location_for(&self, url: &ChmUrl) -> String {
		let mut path = self.root.to_string_lossy().replace('\\', "/");
		if !path.starts_with('/') {
			// Windows drive paths need the extra slash: file:///C:/...
			path.insert(0, '/');
		}
		let page = url.page();
		let mut location = format!("{FILE_SCHEME}{}", utf8_percent_encode(&path, PATH_SEGMENT));
		if !page.is_empty() {
			location.push('/');
			location.push_str(&utf8_percent_encode(page, PATH_SEGMENT).to_string());
		}
		if let Some(fragment) = url.fragment() {
			location.push('#');
			location.push_str(fragment);
		}
		location
	}

	/// Maps a rendered location back to its topic path; `None` outside the cache.
	pub fn topic_for(&self, location: &str) -> Option<String> {
		let rest = location.strip_prefix(FILE_SCHEME).or_else(|| location.strip_prefix("file:"))?;
		let decoded = percent_decode_str(rest).decode_utf8_lossy().replace('\\', "/");
		let decoded = decoded.trim_start_matches('/');
		let root = self.root.to_string_lossy().replace('\\', "/");
		let root = root.trim_start_matches('/').trim_end_matches('/');
		let relative = strip_prefix_ignore_case(decoded, root)?;
		let relative = relative.strip_prefix('/').unwrap_or(relative);
		if relative.is_empty() || relative.starts_with(MARKER_FILE) {
			return None;
		}
		Some(normalize_topic(relative))
	}
}

// Size and modification time; empty when the archive cannot be inspected.
fn archive_fingerprint(path: &Path) -> String {
	let Ok(metadata) = fs::metadata(path) else {
		return String::new();
	};
	let modified = metadata
		.modified()
		.ok()
		.and_then(|time| time.duration_since(UNIX_EPOCH).ok())
		.map_or(0, |since| since.as_nanos());
	format!("{}:{modified}", metadata.len())
}

// Windows file URLs may come back with a different drive-letter case.
fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
	let head = value.get(..prefix.len())?;
	let rest = &value[prefix.len()..];
	(head.eq_ignore_ascii_case(prefix) && (rest.is_empty() || rest.starts_with('/') || rest.starts_with('#')))
		.then_some(rest)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn cache() -> PageCache {
		PageCache { root: PathBuf::from("/tmp/chmview_abc"), fingerprint: String::new() }
	}

	fn scratch_dir(name: &str) -> PathBuf {
		let dir = std::env::temp_dir().join(format!("chmview-cache-test-{}-{name}", std::process::id()));
		let _ = fs::remove_dir_all(&dir);
		fs::create_dir_all(&dir).unwrap();
		dir
	}

	#[test]
	fn directory_name_is_stable_per_archive() {
		let a = PageCache::for_archive(Path::new("/tmp"), "/books/a.chm");
		let b = PageCache::for_archive(Path::new("/tmp"), "/books/a.chm");
		let c = PageCache::for_archive(Path::new("/tmp"), "/books/b.chm");
		assert_eq!(a.root, b.root);
		assert_ne!(a.root, c.root);
		assert!(a.root.file_name().unwrap().to_string_lossy().starts_with("chmview_"));
	}

	#[test]
	fn rebuilt_archive_invalidates_the_cache() {
		let dir = scratch_dir("rebuilt");
		let archive = dir.join("book.chm");
		fs::write(&archive, b"first build").unwrap();
		let archive_path = archive.to_string_lossy().to_string();
		let cache = PageCache::for_archive(&dir, &archive_path);
		assert!(!cache.is_prepared());
		fs::create_dir_all(&cache.root).unwrap();
		cache.mark_prepared().unwrap();
		assert!(PageCache::for_archive(&dir, &archive_path).is_prepared());

		fs::write(&archive, b"second, longer build").unwrap();
		let reopened = PageCache::for_archive(&dir, &archive_path);
		assert_eq!(reopened.root, cache.root);
		assert!(!reopened.is_prepared());
		fs::remove_dir_all(&dir).unwrap();
	}

	#[test]
	fn clear_removes_stale_files_and_tolerates_missing_directory() {
		let dir = scratch_dir("clear");
		let cache = PageCache::for_archive(&dir, &dir.join("gone.chm").to_string_lossy());
		cache.clear().unwrap();
		fs::create_dir_all(&cache.root).unwrap();
		fs::write(cache.root.join("old.htm"), b"old").unwrap();
		cache.clear().unwrap();
		assert!(!cache.root.exists());
		fs::remove_dir_all(&dir).unwrap();
	}

	#[test]
	fn location_encodes_spaces_and_keeps_fragment() {
		let url = ChmUrl::new("/books/a.chm", "My Docs/page one.htm#sec 2");
		assert_eq!(cache().location_for(&url), "file:///tmp/chmview_abc/My%20Docs/page%20one.htm#sec 2");
	}

	#[test]
	fn topic_for_reverses_location() {
		let cache = cache();
		let url = ChmUrl::new("/books/a.chm", "html/intro page.htm#top");
		let location = cache.location_for(&url);
		assert_eq!(cache.topic_for(&location).as_deref(), Some("html/intro page.htm#top"));
	}

	#[test]
	fn topic_for_rejects_foreign_locations() {
		let cache = cache();
		assert_eq!(cache.topic_for("https://example.com/a.htm"), None);
		assert_eq!(cache.topic_for("file:///tmp/other/a.htm"), None);
		assert_eq!(cache.topic_for("file:///tmp/chmview_abcdef/a.htm"), None);
		assert_eq!(cache.topic_for("file:///tmp/chmview_abc"), None);
	}
}
