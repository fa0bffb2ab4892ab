//! Application state behind the main window, kept free of widgets.

use std::{
	env,
	path::{Path, PathBuf},
};

use anyhow::Result;

use crate::{
	archive::{ChmArchive, PageSource},
	bookmarks::BookmarkList,
	chm_url::ChmUrl,
	config::{ConfigManager, WindowGeometry},
	fonts::FontSettings,
	history::History,
	page_cache::PageCache,
	search::{SearchHit, SearchOptions, search_archive},
	topics::{Topic, TopicTree},
};

/// An open archive together with everything derived from it.
pub struct BookSession {
	archive: Box<dyn PageSource>,
	cache: PageCache,
	topics: TopicTree,
	index: Vec<Topic>,
}

impl BookSession {
	/// # Errors
	///
	/// Returns an error if the archive cannot be opened or extracted.
	pub fn open(path: &Path, cache_root: &Path) -> Result<Self> {
		let mut archive = ChmArchive::open(path)?;
		let cache = PageCache::for_archive(cache_root, archive.path());
		cache.prepare(&mut archive)?;
		let topics = archive.topics().unwrap_or_else(|e| {
			log::warn!("Ignoring unreadable contents of {}: {e:#}", archive.path());
			TopicTree::default()
		});
		let index = archive.keyword_index().unwrap_or_else(|e| {
			log::warn!("Ignoring unreadable index of {}: {e:#}", archive.path());
			Vec::new()
		});
		log::info!("Loaded {} with {} topics and {} index entries", archive.title(), topics.len(), index.len());
		Ok(Self { archive: Box::new(archive), cache, topics, index })
	}

	pub fn path(&self) -> &str {
		self.archive.path()
	}

	pub fn title(&self) -> &str {
		self.archive.title()
	}

	pub const fn topics(&self) -> &TopicTree {
		&self.topics
	}

	pub fn index(&self) -> &[Topic] {
		&self.index
	}

	pub fn home_url(&self) -> ChmUrl {
		ChmUrl::new(self.archive.path(), self.archive.home_page())
	}
}

pub struct Viewer {
	config: ConfigManager,
	cache_root: PathBuf,
	book: Option<BookSession>,
	bookmarks: BookmarkList,
	fonts: FontSettings,
	open_dir: String,
	history: History,
}

impl Viewer {
	pub fn new(config: ConfigManager) -> Self {
		let fonts = config.font_settings();
		let open_dir = config.last_opened_dir();
		Self {
			config,
			cache_root: env::temp_dir(),
			book: None,
			bookmarks: BookmarkList::new(),
			fonts,
			open_dir,
			history: History::new(),
		}
	}

	pub const fn config(&self) -> &ConfigManager {
		&self.config
	}

	pub const fn book(&self) -> Option<&BookSession> {
		self.book.as_ref()
	}

	pub const fn has_book(&self) -> bool {
		self.book.is_some()
	}

	pub fn topics(&self) -> Option<&TopicTree> {
		self.book.as_ref().map(BookSession::topics)
	}

	pub const fn bookmarks(&self) -> &BookmarkList {
		&self.bookmarks
	}

	pub const fn fonts(&self) -> &FontSettings {
		&self.fonts
	}

	pub fn open_dir(&self) -> &str {
		&self.open_dir
	}

	pub fn set_open_dir(&mut self, dir: &str) {
		self.open_dir = dir.to_string();
	}

	/// Replaces the open book. The previous book stays open if `path` fails to load.
	///
	/// # Errors
	///
	/// Returns an error if the archive cannot be opened or extracted.
	pub fn open_book(&mut self, path: &Path) -> Result<String> {
		let book = BookSession::open(path, &self.cache_root)?;
		Ok(self.replace_book(book))
	}

	fn replace_book(&mut self, book: BookSession) -> String {
		self.save_bookmarks();
		self.history.clear();
		self.bookmarks = BookmarkList::load(self.config.store(), book.path());
		let title = book.title().to_string();
		self.book = Some(book);
		title
	}

	pub fn home_url(&self) -> Option<ChmUrl> {
		self.book.as_ref().map(BookSession::home_url)
	}

	/// URL of a topic in the open book, for tree, index, bookmark and search targets.
	pub fn topic_url(&self, topic: &str) -> Option<ChmUrl> {
		let book = self.book.as_ref()?;
		if topic.trim().is_empty() {
			return None;
		}
		Some(ChmUrl::new(book.path(), topic))
	}

	pub fn bookmark_url(&self, index: usize) -> Option<ChmUrl> {
		let bookmark = self.bookmarks.get(index)?;
		self.topic_url(&bookmark.url)
	}

	pub fn add_bookmark(&mut self, title: &str, url: &str) -> Option<usize> {
		if self.book.is_none() {
			return None;
		}
		self.bookmarks.add(title, url)
	}

	pub fn remove_bookmark(&mut self, index: usize) -> Option<usize> {
		self.bookmarks.remove(index)
	}

	pub fn save_bookmarks(&self) {
		if let Some(book) = &self.book {
			self.bookmarks.save(self.config.store(), book.path());
		}
	}

	/// Renderer location for `url`; the archive root resolves to the home page.
	pub fn location_for(&self, url: &ChmUrl) -> Option<String> {
		let book = self.book.as_ref()?;
		if url.is_root() {
			return Some(book.cache.location_for(&book.home_url()));
		}
		Some(book.cache.location_for(url))
	}

	pub fn url_for_location(&self, location: &str) -> Option<ChmUrl> {
		let book = self.book.as_ref()?;
		let topic = book.cache.topic_for(location)?;
		Some(ChmUrl::new(book.path(), &topic))
	}

	/// Pre-order position of the contents node for `url`.
	pub fn tree_position(&self, url: &ChmUrl) -> Option<usize> {
		self.topics()?.position_of(url.topic())
	}

	pub fn set_fonts(&mut self, fonts: FontSettings) {
		self.fonts = FontSettings { size: FontSettings::clamp_size(fonts.size), ..fonts };
	}

	pub fn record_visit(&mut self, url: &ChmUrl) {
		self.history.visit(&url.to_string());
	}

	pub fn can_go_back(&self) -> bool {
		self.history.can_go_back()
	}

	pub fn can_go_forward(&self) -> bool {
		self.history.can_go_forward()
	}

	pub fn go_back(&mut self) -> Option<ChmUrl> {
		self.history.back().and_then(ChmUrl::parse)
	}

	pub fn go_forward(&mut self) -> Option<ChmUrl> {
		self.history.forward().and_then(ChmUrl::parse)
	}

	/// Writes everything remembered between runs.
	pub fn persist(&self, geometry: Option<WindowGeometry>) {
		if let Some(geometry) = geometry {
			self.config.set_window_geometry(geometry);
		}
		self.config.set_last_opened_dir(&self.open_dir);
		self.config.set_font_settings(&self.fonts);
		self.save_bookmarks();
		self.config.flush();
	}

	/// # Errors
	///
	/// Returns an error if the search itself fails.
	pub fn search(&mut self, query: &str, options: SearchOptions) -> Result<Vec<SearchHit>> {
		let Some(book) = self.book.as_mut() else {
			return Ok(Vec::new());
		};
		search_archive(book.archive.as_mut(), query, options, &book.topics)
	}
}

#[cfg(test)]
mod tests {
	use std::rc::Rc;

	use super::*;
	use crate::{
		archive::MemoryArchive,
		config::{ConfigStore, MemoryStore},
	};

	fn viewer() -> (Rc<MemoryStore>, Viewer) {
		let store = Rc::new(MemoryStore::new());
		let viewer = Viewer::new(ConfigManager::with_store(Box::new(Rc::clone(&store))));
		(store, viewer)
	}

	fn book(path: &str) -> BookSession {
		let archive = MemoryArchive::new(path)
			.with_page("index.htm", "<html><head><title>Start</title></head><body>Welcome</body></html>")
			.with_page("guide.htm", "<html><body>The guide</body></html>");
		BookSession {
			archive: Box::new(archive),
			cache: PageCache::for_archive(Path::new("/tmp"), path),
			topics: TopicTree::new(vec![Topic::new("Guide", "guide.htm")]),
			index: Vec::new(),
		}
	}

	#[test]
	fn switching_books_saves_bookmarks_and_clears_history() {
		let (store, mut viewer) = viewer();
		store.write_long("/Bookmarks/|books|second.chm", "noEntries", 1);
		store.write_string("/Bookmarks/|books|second.chm", "bookmark_0_title", "Saved");
		store.write_string("/Bookmarks/|books|second.chm", "bookmark_0_url", "saved.htm");

		assert_eq!(viewer.replace_book(book("/books/first.chm")), "Memory");
		assert_eq!(viewer.add_bookmark("Guide", "guide.htm"), Some(0));
		viewer.record_visit(&ChmUrl::new("/books/first.chm", "index.htm"));
		viewer.record_visit(&ChmUrl::new("/books/first.chm", "guide.htm"));
		assert!(viewer.can_go_back());

		viewer.replace_book(book("/books/second.chm"));
		assert_eq!(store.read_long("/Bookmarks/|books|first.chm", "noEntries", 0), 1);
		assert_eq!(store.read_string("/Bookmarks/|books|first.chm", "bookmark_0_url", ""), "guide.htm");
		assert!(!viewer.can_go_back());
		assert_eq!(viewer.go_back(), None);
		assert_eq!(viewer.bookmarks().len(), 1);
		assert_eq!(viewer.bookmark_url(0), Some(ChmUrl::new("/books/second.chm", "saved.htm")));
	}

	#[test]
	fn open_book_answers_navigation_and_search() {
		let (_, mut viewer) = viewer();
		viewer.replace_book(book("/books/first.chm"));
		assert_eq!(viewer.home_url(), Some(ChmUrl::new("/books/first.chm", "index.htm")));
		assert_eq!(viewer.tree_position(&ChmUrl::new("/books/first.chm", "GUIDE.htm#top")), Some(0));
		assert_eq!(viewer.topic_url("  "), None);
		let hits = viewer.search("guide", SearchOptions::default()).unwrap();
		let urls: Vec<&str> = hits.iter().map(|hit| hit.url.as_str()).collect();
		assert_eq!(urls, vec!["guide.htm"]);
		assert_eq!(hits[0].title, "Guide");
	}

	#[test]
	fn without_a_book_nothing_navigates() {
		let (_, mut viewer) = viewer();
		assert!(viewer.home_url().is_none());
		assert!(viewer.topic_url("a.htm").is_none());
		assert!(viewer.bookmark_url(0).is_none());
		assert!(viewer.location_for(&ChmUrl::root("/tmp/a.chm")).is_none());
		assert_eq!(viewer.add_bookmark("A", "a.htm"), None);
		assert!(viewer.search("anything", SearchOptions::default()).unwrap().is_empty());
	}

	#[test]
	fn history_round_trips_chm_urls() {
		let (_, mut viewer) = viewer();
		let first = ChmUrl::new("/tmp/a.chm", "one.htm");
		let second = ChmUrl::new("/tmp/a.chm", "dir/two.htm#x");
		viewer.record_visit(&first);
		viewer.record_visit(&second);
		assert_eq!(viewer.go_back(), Some(first));
		assert_eq!(viewer.go_forward(), Some(second));
		assert_eq!(viewer.go_forward(), None);
	}

	#[test]
	fn fonts_are_clamped_and_persisted() {
		let (store, mut viewer) = viewer();
		viewer.set_fonts(FontSettings { normal_face: "Georgia".into(), fixed_face: String::new(), size: 500 });
		viewer.set_open_dir("/books");
		viewer.persist(Some(WindowGeometry { x: 1, y: 2, width: 300, height: 200 }));
		assert_eq!(store.read_long("/Fonts", "size", 0), i64::from(crate::fonts::MAX_FONT_SIZE));
		assert_eq!(store.read_string("/Fonts", "normalFontFace", ""), "Georgia");
		assert_eq!(store.read_string("/Paths", "lastOpenedDir", ""), "/books");
		assert_eq!(store.read_long("/Position", "height", 0), 200);
	}

	#[test]
	fn stored_settings_are_loaded_on_start() {
		let store = Rc::new(MemoryStore::new());
		store.write_string("/Paths", "lastOpenedDir", "/srv/help");
		store.write_long("/Fonts", "size", 18);
		let viewer = Viewer::new(ConfigManager::with_store(Box::new(Rc::clone(&store))));
		assert_eq!(viewer.open_dir(), "/srv/help");
		assert_eq!(viewer.fonts().size, 18);
	}

	#[test]
	fn opening_a_missing_file_fails_and_keeps_state() {
		let (_, mut viewer) = viewer();
		assert!(viewer.open_book(Path::new("/nonexistent/missing.chm")).is_err());
		assert!(!viewer.has_book());
	}
}
