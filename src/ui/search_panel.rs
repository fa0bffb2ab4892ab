use std::rc::Rc;

use chmview::search::{SearchHit, SearchOptions};
use wxdragon::{prelude::*, translations::translate as t};

use super::results_list::ResultsList;

const PADDING: i32 = 2;

/// The Search tab: query field, options, and the hit list.
#[derive(Clone)]
pub struct SearchPanel {
	panel: Panel,
	query: TextCtrl,
	whole_words: CheckBox,
	titles_only: CheckBox,
	search_button: Button,
	results: ResultsList,
}

impl SearchPanel {
	pub fn new(parent: &Notebook) -> Self {
		let panel = Panel::builder(parent).build();
		let query = TextCtrl::builder(&panel).with_style(TextCtrlStyle::ProcessEnter).build();
		let whole_words = CheckBox::builder(&panel).with_label(&t("&Whole words only")).build();
		let titles_only = CheckBox::builder(&panel).with_label(&t("Search &titles only")).build();
		let search_button = Button::builder(&panel).with_label(&t("&Search")).build();
		let results = ResultsList::new(&panel);

		let sizer = BoxSizer::builder(Orientation::Vertical).build();
		sizer.add(&query, 0, SizerFlag::Expand | SizerFlag::All, PADDING);
		sizer.add(&whole_words, 0, SizerFlag::Left | SizerFlag::Right | SizerFlag::Top, PADDING);
		sizer.add(&titles_only, 0, SizerFlag::Left | SizerFlag::Right | SizerFlag::Top, PADDING);
		sizer.add(&search_button, 0, SizerFlag::Expand | SizerFlag::All, PADDING);
		sizer.add(&results.control(), 1, SizerFlag::Expand | SizerFlag::All, PADDING);
		panel.set_sizer(sizer, true);
		Self { panel, query, whole_words, titles_only, search_button, results }
	}

	pub const fn panel(&self) -> Panel {
		self.panel
	}

	pub fn reset(&self) {
		self.query.set_value("");
		self.results.reset();
	}

	pub fn options(&self) -> SearchOptions {
		SearchOptions { whole_words: self.whole_words.is_checked(), titles_only: self.titles_only.is_checked() }
	}

	pub fn show_hits(&self, hits: &[SearchHit]) {
		self.results.reset();
		for hit in hits {
			self.results.add_pair(&hit.title, &hit.url);
		}
		self.results.update_ui();
	}

	/// `handler` receives the query and options when a search is requested.
	pub fn on_search(&self, handler: impl Fn(String, SearchOptions) + 'static) {
		let handler = Rc::new(handler);
		let panel = self.clone();
		let handler_for_button = Rc::clone(&handler);
		self.search_button.on_click(move |_| {
			handler_for_button(panel.query.get_value(), panel.options());
		});
		let panel = self.clone();
		self.query.bind_internal(EventType::TEXT_ENTER, move |event| {
			handler(panel.query.get_value(), panel.options());
			event.skip(false);
		});
	}

	pub fn on_open(&self, handler: impl Fn(String) + 'static) {
		self.results.on_activated(handler);
	}
}
