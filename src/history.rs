pub const MAX_HISTORY: usize = 100;

/// Back/forward stack for the open book. Entries are rendered `ChmUrl` strings.
#[derive(Clone, Debug, Default)]
pub struct History {
	entries: Vec<String>,
	index: usize,
}

impl History {
	pub const fn new() -> Self {
		Self { entries: Vec::new(), index: 0 }
	}

	pub fn current(&self) -> Option<&str> {
		self.entries.get(self.index).map(String::as_str)
	}

	pub fn visit(&mut self, url: &str) {
		if self.current() == Some(url) {
			return;
		}
		if !self.entries.is_empty() {
			self.entries.truncate(self.index + 1);
		}
		self.entries.push(url.to_string());
		if self.entries.len() > MAX_HISTORY {
			let overflow = self.entries.len() - MAX_HISTORY;
			self.entries.drain(..overflow);
		}
		self.index = self.entries.len() - 1;
	}

	pub fn can_go_back(&self) -> bool {
		!self.entries.is_empty() && self.index > 0
	}

	pub fn can_go_forward(&self) -> bool {
		self.index + 1 < self.entries.len()
	}

	pub fn back(&mut self) -> Option<&str> {
		if !self.can_go_back() {
			return None;
		}
		self.index -= 1;
		self.current()
	}

	pub fn forward(&mut self) -> Option<&str> {
		if !self.can_go_forward() {
			return None;
		}
		self.index += 1;
		self.current()
	}

	pub fn clear(&mut self) {
		self.entries.clear();
		self.index = 0;
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
