use std::{
	cell::{Cell, RefCell},
	rc::Rc,
};

use chmview::{
	fonts::FontSettings,
	sync::{NavigationSync, SuspendGuard},
	version,
};
use wxdragon::{prelude::*, translations::translate as t};

/// The page view plus the bookkeeping needed around asynchronous loads.
#[derive(Clone)]
pub struct HtmlPane {
	view: WebView,
	sync: NavigationSync,
	// Held from a tree-driven load until that page has been shown.
	pending_suspend: Rc<RefCell<Option<SuspendGuard>>>,
	from_history: Rc<Cell<bool>>,
}

impl HtmlPane {
	pub fn new(parent: &impl WxWidget, sync: NavigationSync) -> Self {
		let view = WebView::builder(parent).with_url("about:blank").build();
		Self { view, sync, pending_suspend: Rc::new(RefCell::new(None)), from_history: Rc::new(Cell::new(false)) }
	}

	pub const fn view(&self) -> WebView {
		self.view
	}

	pub fn load(&self, location: &str) {
		log::debug!("Loading {location}");
		self.view.load_url(location);
	}

	/// Loads a page without moving the contents tree selection.
	pub fn load_unsynced(&self, location: &str) {
		*self.pending_suspend.borrow_mut() = Some(self.sync.suspend());
		self.load(location);
	}

	/// Loads a page reached through back/forward, which must not be recorded again.
	pub fn load_from_history(&self, location: &str) {
		self.from_history.set(true);
		self.load(location);
	}

	/// Takes the per-load flags: whether the load came from history, and the
	/// tree sync suspension to release once the page has been handled.
	pub fn finish_load(&self) -> (bool, Option<SuspendGuard>) {
		(self.from_history.replace(false), self.pending_suspend.borrow_mut().take())
	}

	pub fn current_location(&self) -> String {
		self.view.get_current_url()
	}

	pub fn apply_fonts(&self, fonts: &FontSettings) {
		if self.view.run_script(&fonts.apply_script()).is_none() {
			log::debug!("Font script did not run on {}", self.current_location());
		}
	}

	pub fn show_greeting(&self, fonts: &FontSettings) {
		self.view.set_page(&greeting_page(fonts), "");
	}

	pub fn print(&self) {
		self.view.print();
	}

	pub fn on_page_loaded(&self, handler: impl Fn() + 'static) {
		self.view.on_loaded(move |_event| handler());
	}
}

fn greeting_page(fonts: &FontSettings) -> String {
	let heading = t("Welcome to {}").replace("{}", &version::app_title());
	let body = t("Open a compiled HTML help file from the File menu to start reading.");
	format!(
		"<html><head><meta charset=\"utf-8\"><style>{}</style></head><body><h2>{}</h2><p>{}</p></body></html>",
		fonts.stylesheet(),
		escape_html(&heading),
		escape_html(&body)
	)
}

fn escape_html(text: &str) -> String {
	text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
