use std::collections::HashMap;

use crate::chm_url::{normalize_topic, same_page};

/// One node of the contents tree, or one keyword of the index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Topic {
	pub title: String,
	/// Normalized topic path; empty for section headings that have no page.
	pub url: String,
	pub children: Vec<Self>,
}

impl Topic {
	pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
		Self { title: title.into(), url: url.into(), children: Vec::new() }
	}

	#[must_use]
	pub fn with_children(mut self, children: Vec<Self>) -> Self {
		self.children = children;
		self
	}
}

#[derive(Clone, Debug, Default)]
pub struct TopicTree {
	roots: Vec<Topic>,
}

impl TopicTree {
	pub const fn new(roots: Vec<Topic>) -> Self {
		Self { roots }
	}

	pub fn is_empty(&self) -> bool {
		self.roots.is_empty()
	}

	/// Total number of nodes at every depth.
	pub fn len(&self) -> usize {
		fn count(items: &[Topic]) -> usize {
			items.iter().map(|item| 1 + count(&item.children)).sum()
		}
		count(&self.roots)
	}

	/// Depth-first, pre-order. Positions in this list are the tree's stable node ids.
	pub fn flatten(&self) -> Vec<(usize, &Topic)> {
		fn walk<'a>(items: &'a [Topic], depth: usize, out: &mut Vec<(usize, &'a Topic)>) {
			for item in items {
				out.push((depth, item));
				walk(&item.children, depth + 1, out);
			}
		}
		let mut out = Vec::with_capacity(self.len());
		walk(&self.roots, 0, &mut out);
		out
	}

	pub fn get(&self, position: usize) -> Option<&Topic> {
		self.flatten().get(position).map(|(_, topic)| *topic)
	}

	pub fn position_of(&self, url: &str) -> Option<usize> {
		self.flatten().iter().position(|(_, topic)| !topic.url.is_empty() && same_page(&topic.url, url))
	}

	/// Titles of every page in the tree; the first node for a page wins, as in `position_of`.
	pub fn page_titles(&self) -> PageTitles<'_> {
		let mut titles = HashMap::new();
		for (_, topic) in self.flatten() {
			let key = page_key(&topic.url);
			if !key.is_empty() {
				titles.entry(key).or_insert(topic.title.as_str());
			}
		}
		PageTitles { titles }
	}
}

pub struct PageTitles<'a> {
	titles: HashMap<String, &'a str>,
}

impl<'a> PageTitles<'a> {
	pub fn get(&self, url: &str) -> Option<&'a str> {
		self.titles.get(&page_key(url)).copied()
	}
}

fn page_key(url: &str) -> String {
	let topic = normalize_topic(url);
	topic.split('#').next().unwrap_or_default().to_ascii_lowercase()
}

/// Flattens nested index keywords; sub-keywords are shown as `parent, child`.
pub fn flatten_keywords(items: &[Topic]) -> Vec<Topic> {
	fn walk(items: &[Topic], prefix: Option<&str>, out: &mut Vec<Topic>) {
		for item in items {
			let title = prefix.map_or_else(|| item.title.clone(), |prefix| format!("{prefix}, {}", item.title));
			if !item.url.is_empty() {
				out.push(Topic::new(title.clone(), item.url.clone()));
			}
			walk(&item.children, Some(&title), out);
		}
	}
	let mut out = Vec::new();
	walk(items, None, &mut out);
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_tree() -> TopicTree {
		TopicTree::new(vec![
			Topic::new("Getting started", "start.htm").with_children(vec![
				Topic::new("Install", "start/install.htm"),
				Topic::new("Configure", "start/configure.htm#env"),
			]),
			Topic::new("Reference", "").with_children(vec![Topic::new("API", "ref/api.htm")]),
		])
	}

	#[test]
	fn len_counts_every_node() {
		assert_eq!(sample_tree().len(), 5);
		assert_eq!(TopicTree::default().len(), 0);
	}

	#[test]
	fn flatten_is_preorder_with_depths() {
		let tree = sample_tree();
		let flat: Vec<(usize, &str)> = tree.flatten().into_iter().map(|(d, t)| (d, t.title.as_str())).collect();
		assert_eq!(
			flat,
			vec![(0, "Getting started"), (1, "Install"), (1, "Configure"), (0, "Reference"), (1, "API")]
		);
	}

	#[test]
	fn position_of_matches_pages_ignoring_fragment_and_case() {
		let tree = sample_tree();
		assert_eq!(tree.position_of("START/Configure.htm"), Some(2));
		assert_eq!(tree.position_of("/ref/api.htm#members"), Some(4));
		assert_eq!(tree.position_of("missing.htm"), None);
	}

	#[test]
	fn section_headings_without_pages_never_match() {
		assert_eq!(sample_tree().position_of(""), None);
	}

	#[test]
	fn page_titles_look_up_pages_ignoring_fragment_and_case() {
		let tree = TopicTree::new(vec![
			Topic::new("Install", "start/install.htm"),
			Topic::new("Install again", "START/Install.htm#later"),
			Topic::new("Reference", ""),
		]);
		let titles = tree.page_titles();
		assert_eq!(titles.get("/start/INSTALL.htm#top"), Some("Install"));
		assert_eq!(titles.get(""), None);
		assert_eq!(titles.get("missing.htm"), None);
	}

	#[test]
	fn flatten_keywords_prefixes_nested_entries() {
		let keywords = vec![
			Topic::new("colors", "colors.htm")
				.with_children(vec![Topic::new("background", "bg.htm"), Topic::new("text", "")]),
			Topic::new("fonts", "fonts.htm"),
		];
		let flat = flatten_keywords(&keywords);
		let titles: Vec<&str> = flat.iter().map(|t| t.title.as_str()).collect();
		assert_eq!(titles, vec!["colors", "colors, background", "fonts"]);
	}
}
