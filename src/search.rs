//! Full-text search over the pages of an open archive.

use anyhow::{Result, bail};
use ego_tree::NodeRef;
use scraper::{Html, Node, Selector};

use crate::{archive::PageSource, encoding::decode_page, topics::TopicTree};

const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "head", "noscript"];
const BLOCK_ELEMENTS: [&str; 16] =
	["p", "div", "br", "li", "tr", "td", "th", "h1", "h2", "h3", "h4", "h5", "h6", "pre", "table", "blockquote"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchOptions {
	pub whole_words: bool,
	pub titles_only: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHit {
	pub title: String,
	pub url: String,
}

/// Lowercased search terms; empty when there is nothing to search for.
pub fn query_terms(query: &str) -> Vec<String> {
	query.split_whitespace().map(str::to_lowercase).collect()
}

/// `haystack` must already be lowercase.
pub fn term_matches(haystack: &str, term: &str, whole_words: bool) -> bool {
	if term.is_empty() {
		return false;
	}
	if !whole_words {
		return haystack.contains(term);
	}
	haystack.match_indices(term).any(|(start, _)| {
		let before = haystack[..start].chars().next_back();
		let after = haystack[start + term.len()..].chars().next();
		!before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
	})
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageText {
	pub title: String,
	pub body: String,
}

impl PageText {
	pub fn from_html(html: &str) -> Self {
		let document = Html::parse_document(html);
		let title = Selector::parse("title")
			.ok()
			.and_then(|selector| document.select(&selector).next().map(|t| t.text().collect::<String>()))
			.map(|t| collapse_whitespace(&t))
			.unwrap_or_default();
		let mut body = String::new();
		collect_text(document.tree.root(), &mut body);
		Self { title, body: collapse_whitespace(&body) }
	}

	fn matches(&self, terms: &[String], options: SearchOptions) -> bool {
		let title = self.title.to_lowercase();
		let body = if options.titles_only { String::new() } else { self.body.to_lowercase() };
		terms.iter().all(|term| {
			term_matches(&title, term, options.whole_words) || term_matches(&body, term, options.whole_words)
		})
	}
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
	match node.value() {
		Node::Text(text) => out.push_str(&text.text),
		Node::Element(element) if SKIPPED_ELEMENTS.contains(&element.name()) => {}
		Node::Element(element) => {
			for child in node.children() {
				collect_text(child, out);
			}
			if BLOCK_ELEMENTS.contains(&element.name()) {
				out.push(' ');
			}
		}
		Node::Document | Node::Fragment => {
			for child in node.children() {
				collect_text(child, out);
			}
		}
		_ => {}
	}
}

fn collapse_whitespace(text: &str) -> String {
	text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Searches every page of `archive`. Hits keep the archive's page order.
///
/// # Errors
///
/// Unreadable pages are logged and skipped. Returns an error only when the
/// archive has pages and none of them could be read.
pub fn search_archive(
	archive: &mut dyn PageSource,
	query: &str,
	options: SearchOptions,
	topics: &TopicTree,
) -> Result<Vec<SearchHit>> {
	let terms = query_terms(query);
	if terms.is_empty() {
		return Ok(Vec::new());
	}
	let pages = archive.page_names();
	let titles = topics.page_titles();
	let mut hits = Vec::new();
	let mut unreadable = 0;
	for page in &pages {
		let bytes = match archive.read_page(page) {
			Ok(bytes) => bytes,
			Err(e) => {
				log::debug!("Search skipped {page}: {e:#}");
				unreadable += 1;
				continue;
			}
		};
		let text = PageText::from_html(&decode_page(&bytes));
		if !text.matches(&terms, options) {
			continue;
		}
		let url = page.trim_start_matches('/').to_string();
		hits.push(SearchHit { title: hit_title(&text.title, titles.get(&url), &url), url });
	}
	if !pages.is_empty() && unreadable == pages.len() {
		bail!("None of the {} pages of {} could be read", pages.len(), archive.path());
	}
	log::debug!("Search for {query:?} found {} pages", hits.len());
	Ok(hits)
}

fn hit_title(page_title: &str, tree_title: Option<&str>, url: &str) -> String {
	if !page_title.is_empty() {
		return page_title.to_string();
	}
	if let Some(title) = tree_title.filter(|t| !t.is_empty()) {
		return title.to_string();
	}
	url.rsplit('/').next().unwrap_or(url).to_string()
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;
	use crate::{archive::MemoryArchive, topics::Topic};

	const PAGE: &str = "<html><head><title>Config  Files</title><style>.x { color: red }</style></head>\
		<body><h1>Settings</h1><p>Edit the <b>config</b>uration file.</p><script>var hidden = 1;</script></body></html>";

	#[rstest]
	#[case("  Foo  BAR ", vec!["foo", "bar"])]
	#[case("   ", vec![])]
	fn test_query_terms(#[case] query: &str, #[case] expected: Vec<&str>) {
		assert_eq!(query_terms(query), expected);
	}

	#[rstest]
	#[case("the configuration file", "config", false, true)]
	#[case("the configuration file", "config", true, false)]
	#[case("edit config, then save", "config", true, true)]
	#[case("reconfig", "config", true, false)]
	#[case("config", "config", true, true)]
	#[case("anything", "", false, false)]
	fn test_term_matches(#[case] haystack: &str, #[case] term: &str, #[case] whole: bool, #[case] expected: bool) {
		assert_eq!(term_matches(haystack, term, whole), expected);
	}

	#[test]
	fn page_text_excludes_scripts_and_styles() {
		let text = PageText::from_html(PAGE);
		assert_eq!(text.title, "Config Files");
		assert!(text.body.contains("Settings"));
		assert!(text.body.contains("Settings Edit the configuration file."));
		assert!(!text.body.contains("hidden"));
		assert!(!text.body.contains("color"));
	}

	#[test]
	fn all_terms_must_match() {
		let text = PageText::from_html(PAGE);
		let options = SearchOptions::default();
		assert!(text.matches(&query_terms("settings edit"), options));
		assert!(!text.matches(&query_terms("settings missing"), options));
	}

	#[test]
	fn titles_only_ignores_body() {
		let text = PageText::from_html(PAGE);
		let options = SearchOptions { titles_only: true, ..SearchOptions::default() };
		assert!(text.matches(&query_terms("files"), options));
		assert!(!text.matches(&query_terms("settings"), options));
	}

	fn help_archive() -> MemoryArchive {
		MemoryArchive::new("/books/help.chm")
			.with_page("b/setup.htm", "<html><body>Run the setup wizard.</body></html>")
			.with_unreadable_page("broken.htm")
			.with_page("a/intro.htm", "<html><head><title>Introduction</title></head><body>Before setup, read this.</body></html>")
			.with_page("c/other.htm", "<html><body>Nothing relevant.</body></html>")
	}

	#[test]
	fn hits_follow_page_order_and_skip_unreadable_pages() {
		let topics = TopicTree::new(vec![Topic::new("Setup guide", "B/Setup.htm")]);
		let hits = search_archive(&mut help_archive(), "setup", SearchOptions::default(), &topics).unwrap();
		assert_eq!(
			hits,
			vec![
				SearchHit { title: "Setup guide".into(), url: "b/setup.htm".into() },
				SearchHit { title: "Introduction".into(), url: "a/intro.htm".into() },
			]
		);
	}

	#[test]
	fn titles_only_search_uses_page_titles() {
		let options = SearchOptions { titles_only: true, ..SearchOptions::default() };
		let hits = search_archive(&mut help_archive(), "introduction", options, &TopicTree::default()).unwrap();
		assert_eq!(hits.len(), 1);
		assert_eq!(hits[0].url, "a/intro.htm");
	}

	#[test]
	fn empty_query_reads_nothing() {
		let mut archive = MemoryArchive::new("/books/empty.chm").with_unreadable_page("x.htm");
		assert!(search_archive(&mut archive, "  ", SearchOptions::default(), &TopicTree::default()).unwrap().is_empty());
	}

	#[test]
	fn archive_with_no_readable_page_is_an_error() {
		let mut archive = MemoryArchive::new("/books/bad.chm").with_unreadable_page("x.htm").with_unreadable_page("y.htm");
		assert!(search_archive(&mut archive, "x", SearchOptions::default(), &TopicTree::default()).is_err());
		let mut empty = MemoryArchive::new("/books/none.chm");
		assert!(search_archive(&mut empty, "x", SearchOptions::default(), &TopicTree::default()).unwrap().is_empty());
	}

	#[test]
	fn hit_title_prefers_page_then_tree_then_file_name() {
		assert_eq!(hit_title("Page", Some("Tree"), "a/b.htm"), "Page");
		assert_eq!(hit_title("", Some("Tree"), "a/b.htm"), "Tree");
		assert_eq!(hit_title("", None, "a/b.htm"), "b.htm");
	}
}
