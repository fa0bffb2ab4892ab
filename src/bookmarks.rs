use crate::config::ConfigStore;

pub const BOOKMARKS_GROUP: &str = "/Bookmarks";

const COUNT_KEY: &str = "noEntries";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bookmark {
	pub title: String,
	/// Topic path inside the archive, without a leading slash.
	pub url: String,
}

/// Bookmarks of one archive, in the order they were added.
#[derive(Clone, Debug, Default)]
pub struct BookmarkList {
	items: Vec<Bookmark>,
	deleted: bool,
}

impl BookmarkList {
	pub const fn new() -> Self {
		Self { items: Vec::new(), deleted: false }
	}

	/// Appends a bookmark and returns its index.
	pub fn add(&mut self, title: &str, url: &str) -> Option<usize> {
		if title.is_empty() || url.is_empty() {
			return None;
		}
		self.items.push(Bookmark { title: title.to_string(), url: url.to_string() });
		Some(self.items.len() - 1)
	}

	/// Removes the bookmark at `index`; returns the entry to select next, if any remain.
	pub fn remove(&mut self, index: usize) -> Option<usize> {
		if index < self.items.len() {
			self.items.remove(index);
			self.deleted = true;
		}
		(!self.items.is_empty()).then_some(0)
	}

	pub fn get(&self, index: usize) -> Option<&Bookmark> {
		self.items.get(index)
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Bookmark> {
		self.items.iter()
	}

	pub const fn has_deletions(&self) -> bool {
		self.deleted
	}

	pub fn load(store: &dyn ConfigStore, archive: &str) -> Self {
		let group = bookmark_group(archive);
		let count = store.read_long(&group, COUNT_KEY, 0).max(0);
		let mut list = Self::new();
		for i in 0..count {
			let title = store.read_string(&group, &title_key(i), "");
			let url = store.read_string(&group, &url_key(i), "");
			if list.add(&title, &url).is_none() {
				log::debug!("Ignoring incomplete bookmark {i} of {archive}");
			}
		}
		list
	}

	pub fn save(&self, store: &dyn ConfigStore, archive: &str) {
		if !self.deleted && self.items.is_empty() {
			return;
		}
		let group = bookmark_group(archive);
		if self.deleted {
			store.delete_group(&group);
		}
		if self.items.is_empty() {
			return;
		}
		store.write_long(&group, COUNT_KEY, i64::try_from(self.items.len()).unwrap_or(i64::MAX));
		for (i, bookmark) in (0_i64..).zip(&self.items) {
			store.write_string(&group, &title_key(i), &bookmark.title);
			store.write_string(&group, &url_key(i), &bookmark.url);
		}
	}
}

/// Config group for an archive's bookmarks; `/` in the path would nest groups.
pub fn bookmark_group(archive: &str) -> String {
	format!("{BOOKMARKS_GROUP}/{}", archive.replace('/', "|"))
}

fn title_key(index: i64) -> String {
	format!("bookmark_{index}_title")
}

fn url_key(index: i64) -> String {
	format!("bookmark_{index}_url")
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;
	use crate::config::MemoryStore;

	const ARCHIVE: &str = "/home/me/api.chm";

	#[rstest]
	#[case("/home/me/api.chm", "/Bookmarks/|home|me|api.chm")]
	#[case("C:\\help\\api.chm", "/Bookmarks/C:\\help\\api.chm")]
	fn test_bookmark_group(#[case] archive: &str, #[case] expected: &str) {
		assert_eq!(bookmark_group(archive), expected);
	}

	#[test]
	fn add_rejects_empty_title_or_url() {
		let mut list = BookmarkList::new();
		assert_eq!(list.add("", "a.htm"), None);
		assert_eq!(list.add("A", ""), None);
		assert_eq!(list.add("A", "a.htm"), Some(0));
		assert_eq!(list.add("B", "b.htm"), Some(1));
	}

	#[test]
	fn remove_selects_first_remaining_entry() {
		let mut list = BookmarkList::new();
		list.add("A", "a.htm");
		list.add("B", "b.htm");
		assert_eq!(list.remove(1), Some(0));
		assert_eq!(list.remove(0), None);
		assert!(list.is_empty());
		assert!(list.has_deletions());
	}

	#[test]
	fn save_then_load_keeps_order() {
		let store = MemoryStore::new();
		let mut list = BookmarkList::new();
		list.add("Intro", "html/intro.htm");
		list.add("API", "html/api.htm#top");
		list.save(&store, ARCHIVE);
		let group = bookmark_group(ARCHIVE);
		assert_eq!(store.read_long(&group, "noEntries", 0), 2);
		assert_eq!(store.read_string(&group, "bookmark_1_url", ""), "html/api.htm#top");
		let loaded = BookmarkList::load(&store, ARCHIVE);
		let titles: Vec<&str> = loaded.iter().map(|b| b.title.as_str()).collect();
		assert_eq!(titles, vec!["Intro", "API"]);
	}

	#[test]
	fn windows_archive_paths_keep_their_own_group() {
		let store = MemoryStore::new();
		let mut list = BookmarkList::new();
		list.add("Index", "index.htm");
		list.save(&store, "C:\\help\\api.chm");
		assert_eq!(store.read_string("/Bookmarks/C:\\help\\api.chm", "bookmark_0_title", ""), "Index");
		assert_eq!(BookmarkList::load(&store, "C:\\help\\api.chm").len(), 1);
		assert_eq!(BookmarkList::load(&store, "D:\\help\\api.chm").len(), 0);
	}

	#[test]
	fn missing_group_loads_empty() {
		let store = MemoryStore::new();
		assert!(BookmarkList::load(&store, ARCHIVE).is_empty());
	}

	#[test]
	fn untouched_empty_list_writes_nothing() {
		let store = MemoryStore::new();
		BookmarkList::new().save(&store, ARCHIVE);
		assert!(store.is_empty());
	}

	#[test]
	fn deleting_everything_removes_the_group() {
		let store = MemoryStore::new();
		let mut list = BookmarkList::new();
		list.add("A", "a.htm");
		list.save(&store, ARCHIVE);
		let mut list = BookmarkList::load(&store, ARCHIVE);
		list.remove(0);
		list.save(&store, ARCHIVE);
		assert!(store.is_empty());
	}

	#[test]
	fn deletion_rewrites_without_stale_keys() {
		let store = MemoryStore::new();
		let mut list = BookmarkList::new();
		list.add("A", "a.htm");
		list.add("B", "b.htm");
		list.save(&store, ARCHIVE);
		list.remove(0);
		list.save(&store, ARCHIVE);
		let group = bookmark_group(ARCHIVE);
		assert_eq!(store.read_long(&group, "noEntries", 0), 1);
		assert!(!store.has_entry(&group, "bookmark_1_title"));
		assert_eq!(store.read_string(&group, "bookmark_0_title", ""), "B");
	}
}
