use std::{rc::Rc, sync::Mutex};

use chmview::results::{ResultList, column_width};
use wxdragon::prelude::*;

const LIST_AUTOSIZE: i32 = -1;
const SCROLLBAR_WIDTH: i32 = 16;

/// Single-column list of titles; each row remembers the topic it opens.
#[derive(Clone)]
pub struct ResultsList {
	list: ListCtrl,
	rows: Rc<Mutex<ResultList>>,
}

impl ResultsList {
	pub fn new(parent: &impl WxWidget) -> Self {
		let list = ListCtrl::builder(parent)
			.with_style(ListCtrlStyle::Report | ListCtrlStyle::NoHeader | ListCtrlStyle::SingleSel)
			.build();
		list.insert_column(0, "", ListColumnFormat::Left, LIST_AUTOSIZE);
		let results = Self { list, rows: Rc::new(Mutex::new(ResultList::new())) };
		let results_for_size = results.clone();
		list.on_size(move |event| {
			results_for_size.update_ui();
			event.skip(true);
		});
		results
	}

	pub const fn control(&self) -> ListCtrl {
		self.list
	}

	pub fn reset(&self) {
		self.list.delete_all_items();
		if let Ok(mut rows) = self.rows.try_lock() {
			rows.reset();
		}
		self.update_ui();
	}

	pub fn add_pair(&self, title: &str, url: &str) {
		let Ok(mut rows) = self.rows.try_lock() else {
			return;
		};
		let index = rows.add_pair(title, url);
		drop(rows);
		self.list.insert_item(i64::try_from(index).unwrap_or(i64::MAX), title, None);
	}

	/// Topic URL of the selected row.
	pub fn load_selected(&self) -> Option<String> {
		let index = self.list.get_first_selected_item();
		self.rows.try_lock().ok()?.url_at(i64::from(index)).map(str::to_string)
	}

	pub fn update_ui(&self) {
		self.list.set_column_width(0, LIST_AUTOSIZE);
		let autosize = self.list.get_column_width(0);
		let width = column_width(
			self.list.get_client_size().width,
			self.list.get_count_per_page(),
			self.list.get_item_count(),
			autosize,
			SCROLLBAR_WIDTH,
		);
		self.list.set_column_width(0, width);
	}

	/// Selects the first row starting with `prefix` and scrolls it into view.
	pub fn find_best_match(&self, prefix: &str) {
		let Some(index) = self.rows.try_lock().ok().and_then(|rows| rows.find_best_match(prefix)) else {
			return;
		};
		let index = i64::try_from(index).unwrap_or_default();
		self.list.set_item_state(
			index,
			ListItemState::Selected | ListItemState::Focused,
			ListItemState::Selected | ListItemState::Focused,
		);
		self.list.ensure_visible(index);
	}

	pub fn on_activated(&self, handler: impl Fn(String) + 'static) {
		let results = self.clone();
		self.list.on_item_activated(move |event| {
			let index = event.get_item_index();
			let url = results.rows.try_lock().ok().and_then(|rows| rows.url_at(i64::from(index)).map(str::to_string));
			if let Some(url) = url {
				handler(url);
			}
		});
	}
}
