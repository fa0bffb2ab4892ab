/// Rows behind a single-column results list: a title shown, a topic URL kept.
#[derive(Clone, Debug, Default)]
pub struct ResultList {
	items: Vec<(String, String)>,
}

impl ResultList {
	pub const fn new() -> Self {
		Self { items: Vec::new() }
	}

	pub fn reset(&mut self) {
		self.items.clear();
	}

	pub fn add_pair(&mut self, title: &str, url: &str) -> usize {
		self.items.push((title.to_string(), url.to_string()));
		self.items.len() - 1
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// URL of the row at a list-control index; `-1` is "no selection".
	pub fn url_at(&self, index: i64) -> Option<&str> {
		let index = usize::try_from(index).ok()?;
		self.items.get(index).map(|(_, url)| url.as_str())
	}

	/// First row whose title starts with `prefix`, ignoring case. An empty prefix matches the first row.
	pub fn find_best_match(&self, prefix: &str) -> Option<usize> {
		let prefix = prefix.to_lowercase();
		self.items.iter().position(|(title, _)| title.to_lowercase().starts_with(&prefix))
	}
}

/// Width of the only column: the client width, less a scrollbar when the rows overflow.
pub fn column_width(client_width: i32, count_per_page: i32, item_count: i32, autosize: i32, scrollbar: i32) -> i32 {
	let mut width = client_width - 1;
	if count_per_page >= 0 && item_count > count_per_page {
		width -= scrollbar;
	}
	width.max(autosize)
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	fn sample() -> ResultList {
		let mut list = ResultList::new();
		list.add_pair("Alpha", "a.htm");
		list.add_pair("beta", "b.htm");
		list.add_pair("Beta release", "br.htm");
		list
	}

	#[rstest]
	#[case("be", Some(1))]
	#[case("BETA R", Some(2))]
	#[case("alp", Some(0))]
	#[case("gamma", None)]
	#[case("", Some(0))]
	fn test_find_best_match(#[case] prefix: &str, #[case] expected: Option<usize>) {
		assert_eq!(sample().find_best_match(prefix), expected);
	}

	#[rstest]
	#[case(-1, None)]
	#[case(0, Some("a.htm"))]
	#[case(2, Some("br.htm"))]
	#[case(3, None)]
	fn test_url_at(#[case] index: i64, #[case] expected: Option<&str>) {
		assert_eq!(sample().url_at(index), expected);
	}

	#[test]
	fn reset_empties_the_list() {
		let mut list = sample();
		list.reset();
		assert!(list.is_empty());
		assert_eq!(list.url_at(0), None);
		assert_eq!(list.find_best_match(""), None);
	}

	#[rstest]
	#[case(300, 10, 5, 50, 16, 299)]
	#[case(300, 10, 20, 50, 16, 283)]
	#[case(300, -1, 20, 50, 16, 299)]
	#[case(40, 10, 20, 80, 16, 80)]
	fn test_column_width(
		#[case] client: i32,
		#[case] per_page: i32,
		#[case] count: i32,
		#[case] autosize: i32,
		#[case] scrollbar: i32,
		#[case] expected: i32,
	) {
		assert_eq!(column_width(client, per_page, count, autosize, scrollbar), expected);
	}
}
