//! The in-process URL scheme used to address pages inside an open archive:
//! `file:<archive>#chm:/<topic-path>`.

use std::fmt;

const FILE_PREFIX: &str = "file:";
const CHM_MARKER: &str = "#chm:";
const ITS_PREFIXES: [&str; 3] = ["ms-its:", "mk:@msitstore:", "its:"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChmUrl {
	archive: String,
	topic: String,
}

impl ChmUrl {
	pub fn new(archive: impl Into<String>, topic: &str) -> Self {
		Self { archive: archive.into(), topic: normalize_topic(topic) }
	}

	/// The archive root, which the renderer resolves to the home page.
	pub fn root(archive: impl Into<String>) -> Self {
		Self { archive: archive.into(), topic: String::new() }
	}

	pub fn parse(url: &str) -> Option<Self> {
		let rest = url.strip_prefix(FILE_PREFIX)?;
		let marker = rest.find(CHM_MARKER)?;
		let archive = &rest[..marker];
		if archive.is_empty() {
			return None;
		}
		let topic = &rest[marker + CHM_MARKER.len()..];
		Some(Self::new(archive, topic))
	}

	pub fn archive(&self) -> &str {
		&self.archive
	}

	/// Topic path without the leading slash, fragment included.
	pub fn topic(&self) -> &str {
		&self.topic
	}

	/// Topic path without its fragment.
	pub fn page(&self) -> &str {
		self.topic.split_once('#').map_or(self.topic.as_str(), |(page, _)| page)
	}

	pub fn fragment(&self) -> Option<&str> {
		self.topic.split_once('#').map(|(_, fragment)| fragment).filter(|f| !f.is_empty())
	}

	pub fn is_root(&self) -> bool {
		self.page().is_empty()
	}
}

impl fmt::Display for ChmUrl {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{FILE_PREFIX}{}{CHM_MARKER}/{}", self.archive, self.topic)
	}
}

/// Resolves a link found in `base_topic` to a normalized topic path.
pub fn join(base_topic: &str, href: &str) -> String {
	let href = href.trim();
	if href.is_empty() {
		return normalize_topic(base_topic);
	}
	if let Some(fragment) = href.strip_prefix('#') {
		let page = base_topic.split_once('#').map_or(base_topic, |(page, _)| page);
		return normalize_topic(&format!("{page}#{fragment}"));
	}
	if href.starts_with('/') || href.starts_with('\\') || has_its_prefix(href) {
		return normalize_topic(href);
	}
	let base = base_topic.replace('\\', "/");
	let dir = base.rsplit_once('/').map_or("", |(dir, _)| dir);
	if dir.is_empty() { normalize_topic(href) } else { normalize_topic(&format!("{dir}/{href}")) }
}

/// Two topics name the same page when they match ignoring case and fragment.
pub fn same_page(a: &str, b: &str) -> bool {
	let a = normalize_topic(a);
	let b = normalize_topic(b);
	let a = a.split_once('#').map_or(a.as_str(), |(page, _)| page);
	let b = b.split_once('#').map_or(b.as_str(), |(page, _)| page);
	!a.is_empty() && a.eq_ignore_ascii_case(b)
}

pub fn normalize_topic(topic: &str) -> String {
	let topic = strip_its_prefix(topic.trim()).replace('\\', "/");
	let (path, fragment) = match topic.split_once('#') {
		Some((path, fragment)) => (path, Some(fragment)),
		None => (topic.as_str(), None),
	};
	let mut segments: Vec<&str> = Vec::new();
	for segment in path.split('/') {
		match segment {
			"" | "." => {}
			".." => {
				segments.pop();
			}
			other => segments.push(other),
		}
	}
	let mut normalized = segments.join("/");
	if let Some(fragment) = fragment {
		normalized.push('#');
		normalized.push_str(fragment);
	}
	normalized
}

fn has_its_prefix(topic: &str) -> bool {
	let lower = topic.to_ascii_lowercase();
	ITS_PREFIXES.iter().any(|prefix| lower.starts_with(prefix))
}

// `ms-its:other.chm::/page.htm` points into a merged archive; only the page part is usable.
fn strip_its_prefix(topic: &str) -> &str {
	if !has_its_prefix(topic) {
		return topic;
	}
	topic.split_once("::").map_or(topic, |(_, page)| page)
}
