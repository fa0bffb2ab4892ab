use chmview::topics::Topic;
use wxdragon::prelude::*;

use super::results_list::ResultsList;

const PADDING: i32 = 2;

/// The Index tab: typing jumps to the closest keyword.
#[derive(Clone)]
pub struct IndexPanel {
	panel: Panel,
	text: TextCtrl,
	results: ResultsList,
}

impl IndexPanel {
	pub fn new(parent: &Notebook) -> Self {
		let panel = Panel::builder(parent).build();
		let text = TextCtrl::builder(&panel).with_style(TextCtrlStyle::ProcessEnter).build();
		let results = ResultsList::new(&panel);
		let sizer = BoxSizer::builder(Orientation::Vertical).build();
		sizer.add(&text, 0, SizerFlag::Expand | SizerFlag::All, PADDING);
		sizer.add(&results.control(), 1, SizerFlag::Expand | SizerFlag::All, PADDING);
		panel.set_sizer(sizer, true);

		let results_for_typing = results.clone();
		text.on_text_updated(move |_event| {
			results_for_typing.find_best_match(&text.get_value());
		});
		Self { panel, text, results }
	}

	pub const fn panel(&self) -> Panel {
		self.panel
	}

	pub fn fill(&self, keywords: &[Topic]) {
		self.text.set_value("");
		self.results.reset();
		for keyword in keywords {
			self.results.add_pair(&keyword.title, &keyword.url);
		}
		self.results.update_ui();
	}

	/// `handler` receives the topic URL of an activated keyword, or of the
	/// selected one when Enter is pressed in the text field.
	pub fn on_open(&self, handler: impl Fn(String) + 'static) {
		let handler = std::rc::Rc::new(handler);
		let handler_for_list = std::rc::Rc::clone(&handler);
		self.results.on_activated(move |url| handler_for_list(url));
		let results = self.results.clone();
		self.text.bind_internal(EventType::TEXT_ENTER, move |event| {
			if let Some(url) = results.load_selected() {
				handler(url);
			}
			event.skip(false);
		});
	}
}
