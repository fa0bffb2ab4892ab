mod sitemap;
mod system;

use std::{
	fs,
	path::{Component, Path, PathBuf},
};

use anyhow::{Context, Result};
use libchm::{CHM_ENUMERATE_ALL, ChmHandle, unit_info_path};
pub use sitemap::parse_sitemap;
pub use system::{SystemInfo, parse_system};

use crate::{
	chm_url::normalize_topic,
	encoding::decode_page,
	topics::{Topic, TopicTree, flatten_keywords},
};

const SYSTEM_FILE: &str = "/#SYSTEM";
const HOME_PAGE_CANDIDATES: [&str; 4] = ["index.htm", "index.html", "default.htm", "default.html"];

/// An open CHM archive.
pub struct ChmArchive {
	path: String,
	handle: ChmHandle,
	entries: Vec<String>,
	title: String,
	home_page: String,
	contents_file: Option<String>,
	index_file: Option<String>,
}

impl ChmArchive {
	/// # Errors
	///
	/// Returns an error if the archive cannot be opened or enumerated.
	pub fn open(path: &Path) -> Result<Self> {
		let path_str = path.to_string_lossy().to_string();
		let mut handle =
			ChmHandle::open(&path_str).with_context(|| format!("Failed to open CHM file: {path_str}"))?;
		let mut entries = Vec::new();
		handle
			.enumerate(CHM_ENUMERATE_ALL, |ui| {
				entries.push(unit_info_path(ui));
				true
			})
			.with_context(|| format!("Failed to list the contents of {path_str}"))?;
		entries.sort();
		let system = handle.read_file(SYSTEM_FILE).map(|bytes| parse_system(&bytes)).unwrap_or_default();
		let title = system.title.clone().unwrap_or_else(|| file_stem_title(&path_str));
		let contents_file = system.contents_file.map(|f| format!("/{}", normalize_topic(&f))).or_else(|| {
			pick_sitemap(&entries, ".hhc", "index.hhc")
		});
		let index_file =
			system.index_file.map(|f| format!("/{}", normalize_topic(&f))).or_else(|| pick_sitemap(&entries, ".hhk", ""));
		let home_page = choose_home_page(system.default_topic.as_deref(), &entries);
		log::info!("Opened {path_str}: {} entries, home page {home_page}", entries.len());
		Ok(Self { path: path_str, handle, entries, title, home_page, contents_file, index_file })
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn title(&self) -> &str {
		&self.title
	}

	/// HTML pages, sorted, excluding the compiler's internal files.
	pub fn pages(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(String::as_str).filter(|entry| is_page(entry))
	}

	/// # Errors
	///
	/// Returns an error if the topic does not exist in the archive.
	pub fn read(&mut self, topic: &str) -> Result<Vec<u8>> {
		let path = format!("/{}", normalize_topic(topic).split('#').next().unwrap_or_default());
		self.handle.read_file(&path).with_context(|| format!("Failed to read {path} from {}", self.path))
	}

	/// # Errors
	///
	/// Returns an error if the contents file exists but cannot be read.
	pub fn topics(&mut self) -> Result<TopicTree> {
		let Some(contents_file) = self.contents_file.clone() else {
			return Ok(TopicTree::default());
		};
		let bytes = self.read(&contents_file)?;
		Ok(TopicTree::new(parse_sitemap(&decode_page(&bytes))))
	}

	/// # Errors
	///
	/// Returns an error if the index file exists but cannot be read.
	pub fn keyword_index(&mut self) -> Result<Vec<Topic>> {
		let Some(index_file) = self.index_file.clone() else {
			return Ok(Vec::new());
		};
		let bytes = self.read(&index_file)?;
		Ok(flatten_keywords(&parse_sitemap(&decode_page(&bytes))))
	}

	/// Writes every file entry under `dir`, keeping the archive layout.
	///
	/// # Errors
	///
	/// Returns an error if `dir` cannot be created or a file cannot be written.
	pub fn extract_to(&mut self, dir: &Path) -> Result<usize> {
		fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
		let entries: Vec<String> = self.entries.iter().filter(|e| is_extractable(e)).cloned().collect();
		let mut written = 0;
		for entry in entries {
			let Some(target) = extraction_target(dir, &entry) else {
				log::warn!("Skipping archive entry outside the cache: {entry}");
				continue;
			};
			let bytes = match self.handle.read_file(&entry) {
				Ok(bytes) => bytes,
				Err(e) => {
					log::debug!("Skipping unreadable entry {entry}: {e}");
					continue;
				}
			};
			if let Some(parent) = target.parent() {
				fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
			}
			fs::write(&target, bytes).with_context(|| format!("Failed to write {}", target.display()))?;
			written += 1;
		}
		Ok(written)
	}
}

/// Page access that the open book and full-text search need from an archive.
pub trait PageSource {
	fn path(&self) -> &str;

	fn title(&self) -> &str;

	/// Normalized topic path of the start page, empty for the archive root.
	fn home_page(&self) -> &str;

	/// HTML pages in archive order.
	fn page_names(&self) -> Vec<String>;

	/// # Errors
	///
	/// Returns an error if the page cannot be read.
	fn read_page(&mut self, topic: &str) -> Result<Vec<u8>>;
}

impl PageSource for ChmArchive {
	fn path(&self) -> &str {
		&self.path
	}

	fn title(&self) -> &str {
		&self.title
	}

	fn home_page(&self) -> &str {
		&self.home_page
	}

	fn page_names(&self) -> Vec<String> {
		self.pages().map(str::to_string).collect()
	}

	fn read_page(&mut self, topic: &str) -> Result<Vec<u8>> {
		self.read(topic)
	}
}

/// Pages held in memory, some of which can be made unreadable.
#[cfg(test)]
pub struct MemoryArchive {
	path: String,
	pages: Vec<(String, Option<String>)>,
}

#[cfg(test)]
impl MemoryArchive {
	pub fn new(path: &str) -> Self {
		Self { path: path.to_string(), pages: Vec::new() }
	}

	#[must_use]
	pub fn with_page(mut self, name: &str, html: &str) -> Self {
		self.pages.push((format!("/{name}"), Some(html.to_string())));
		self
	}

	#[must_use]
	pub fn with_unreadable_page(mut self, name: &str) -> Self {
		self.pages.push((format!("/{name}"), None));
		self
	}
}

#[cfg(test)]
impl PageSource for MemoryArchive {
	fn path(&self) -> &str {
		&self.path
	}

	fn title(&self) -> &str {
		"Memory"
	}

	fn home_page(&self) -> &str {
		self.pages.first().map_or("", |(name, _)| name.trim_start_matches('/'))
	}

	fn page_names(&self) -> Vec<String> {
		self.pages.iter().map(|(name, _)| name.clone()).collect()
	}

	fn read_page(&mut self, topic: &str) -> Result<Vec<u8>> {
		let wanted = format!("/{}", normalize_topic(topic));
		match self.pages.iter().find(|(name, _)| *name == wanted) {
			Some((_, Some(html))) => Ok(html.clone().into_bytes()),
			_ => anyhow::bail!("Failed to read {wanted} from {}", self.path),
		}
	}
}

fn file_stem_title(path: &str) -> String {
	Path::new(path).file_stem().and_then(|s| s.to_str()).unwrap_or("Untitled").to_string()
}

fn is_internal(entry: &str) -> bool {
	entry.contains("/#") || entry.contains("/$") || entry.starts_with("::")
}

fn is_page(entry: &str) -> bool {
	let lower = entry.to_ascii_lowercase();
	!is_internal(entry) && (lower.ends_with(".htm") || lower.ends_with(".html"))
}

fn is_extractable(entry: &str) -> bool {
	!is_internal(entry) && !entry.ends_with('/')
}

fn pick_sitemap(entries: &[String], extension: &str, preferred: &str) -> Option<String> {
	let mut candidates = entries.iter().filter(|e| !is_internal(e) && e.to_ascii_lowercase().ends_with(extension));
	let first = candidates.next()?;
	if preferred.is_empty() {
		return Some(first.clone());
	}
	let preferred_match = std::iter::once(first)
		.chain(candidates)
		.find(|e| e.to_ascii_lowercase().ends_with(preferred));
	Some(preferred_match.unwrap_or(first).clone())
}

fn choose_home_page(default_topic: Option<&str>, entries: &[String]) -> String {
	if let Some(topic) = default_topic.map(normalize_topic).filter(|t| !t.is_empty()) {
		return topic;
	}
	for candidate in HOME_PAGE_CANDIDATES {
		if let Some(entry) = entries.iter().find(|e| normalize_topic(e).eq_ignore_ascii_case(candidate)) {
			return normalize_topic(entry);
		}
	}
	entries.iter().find(|e| is_page(e)).map(|e| normalize_topic(e)).unwrap_or_default()
}

fn extraction_target(dir: &Path, entry: &str) -> Option<PathBuf> {
	let relative = Path::new(entry.trim_start_matches('/'));
	if relative.as_os_str().is_empty() || relative.components().any(|c| !matches!(c, Component::Normal(_))) {
		return None;
	}
	Some(dir.join(relative))
}
