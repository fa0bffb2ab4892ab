use std::{
	path::Path,
	rc::Rc,
	sync::{Mutex, MutexGuard},
};

use chmview::{
	chm_url::ChmUrl,
	config::WindowGeometry,
	search::SearchOptions,
	sync::NavigationSync,
	version,
	viewer::Viewer,
};
use wxdragon::{prelude::*, translations::translate as t};

use super::{
	contents_panel::ContentsPanel, dialogs, font_dialog, html_pane::HtmlPane, index_panel::IndexPanel, menu_ids,
	search_panel::SearchPanel,
};

const CONTENTS_MARGIN: i32 = 170;
const DEFAULT_WIDTH: i32 = 700;
const DEFAULT_HEIGHT: i32 = 500;
const CONTENTS_PAGE: usize = 0;
const TOOL_ICON_SIZE: i32 = 24;
const CHM_WILDCARD: &str = "CHM files (*.chm)|*.chm;*.CHM|All files (*.*)|*.*";

/// Main application window
pub struct MainWindow {
	frame: Frame,
	state: WindowState,
}

/// Widget handles and shared state that every event handler needs.
#[derive(Clone)]
struct WindowState {
	frame: Frame,
	viewer: Rc<Mutex<Viewer>>,
	splitter: SplitterWindow,
	notebook: Notebook,
	contents: ContentsPanel,
	index: IndexPanel,
	search: SearchPanel,
	html: HtmlPane,
	sync: NavigationSync,
	contents_item: Rc<Option<MenuItem>>,
	toolbar: Option<ToolBar>,
}

impl MainWindow {
	pub fn new(viewer: Rc<Mutex<Viewer>>) -> Self {
		let geometry = viewer.try_lock().ok().and_then(|viewer| viewer.config().window_geometry());
		let mut builder = Frame::builder().with_title(&version::app_title());
		builder = match geometry {
			Some(geometry) => builder
				.with_position(Point::new(geometry.x, geometry.y))
				.with_size(Size::new(geometry.width, geometry.height)),
			None => builder.with_size(Size::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)),
		};
		let frame = builder.build();

		let (menu_bar, contents_item) = Self::create_menu_bar();
		frame.set_menu_bar(menu_bar);
		let toolbar = Self::create_toolbar(&frame);
		frame.create_status_bar(1, 0, -1, "statusbar");
		frame.set_status_text(&t("Ready."), 0);

		let splitter = SplitterWindow::builder(&frame).build();
		splitter.set_minimum_pane_size(CONTENTS_MARGIN);
		let notebook = Notebook::builder(&splitter).with_style(NotebookStyle::Top).build();
		notebook.show(false);

		let contents = ContentsPanel::new(&notebook);
		let index = IndexPanel::new(&notebook);
		let search = SearchPanel::new(&notebook);
		notebook.add_page(&contents.panel(), &t("Contents"), true, None);
		notebook.add_page(&index.panel(), &t("Index"), false, None);
		notebook.add_page(&search.panel(), &t("Search"), false, None);

		let sync = NavigationSync::new();
		let html = HtmlPane::new(&splitter, sync.clone());
		splitter.initialize(&html.view());

		let state = WindowState {
			frame,
			viewer,
			splitter,
			notebook,
			contents,
			index,
			search,
			html,
			sync,
			contents_item: Rc::new(contents_item),
			toolbar,
		};
		if let Some(viewer) = state.lock_viewer() {
			state.html.show_greeting(viewer.fonts());
		}
		Self::bind_menu_events(&state);
		Self::bind_panel_events(&state);
		Self::bind_close_event(&state);
		Self { frame, state }
	}

	pub fn show(&self) {
		self.frame.show(true);
		if self.state.lock_viewer().is_some_and(|viewer| viewer.config().window_geometry().is_none()) {
			self.frame.centre();
		}
	}

	pub const fn frame(&self) -> &Frame {
		&self.frame
	}

	pub fn open_file(&self, path: &Path) {
		self.state.load_archive(path);
	}

	fn create_menu_bar() -> (MenuBar, Option<MenuItem>) {
		let open_label = t("&Open...\tCtrl+O");
		let open_help = t("Open a CHM book.");
		let print_label = t("&Print page...\tCtrl+P");
		let print_help = t("Print the page currently displayed.");
		let fonts_label = t("&Fonts...");
		let fonts_help = t("Change fonts.");
		let contents_label = t("&Show contents tree");
		let contents_help = t("Show or hide the contents, index and search tabs.");
		let exit_label = t("E&xit");
		let exit_help = t("Quit the application.");
		let file_menu = Menu::builder()
			.append_item(menu_ids::OPEN, &open_label, &open_help)
			.append_item(menu_ids::PRINT, &print_label, &print_help)
			.append_item(menu_ids::FONTS, &fonts_label, &fonts_help)
			.append_separator()
			.build();
		let contents_item = file_menu.append(menu_ids::CONTENTS, &contents_label, &contents_help, ItemKind::Check);
		file_menu.append_separator();
		let _ = file_menu.append(menu_ids::EXIT, &exit_label, &exit_help, ItemKind::Normal);

		let home_label = t("&Home");
		let home_help = t("Go to the book's start page.");
		let forward_label = t("&Forward\tAlt+Right");
		let forward_help = t("Go forward in history. Per book.");
		let back_label = t("&Back\tAlt+Left");
		let back_help = t("Back to the last visited page. Per book.");
		let history_menu = Menu::builder()
			.append_item(menu_ids::HOME, &home_label, &home_help)
			.append_item(menu_ids::FORWARD, &forward_label, &forward_help)
			.append_item(menu_ids::BACK, &back_label, &back_help)
			.build();

		let about_label = t("&About...");
		let about_help = t("About the program.");
		let help_menu = Menu::builder().append_item(menu_ids::ABOUT, &about_label, &about_help).build();

		let menu_bar = MenuBar::builder()
			.append(file_menu, &t("&File"))
			.append(history_menu, &t("Hi&story"))
			.append(help_menu, &t("&Help"))
			.build();
		(menu_bar, contents_item)
	}

	fn create_toolbar(frame: &Frame) -> Option<ToolBar> {
		let toolbar = frame.create_tool_bar(Some(ToolBarStyle::Default | ToolBarStyle::Text), wxdragon::id::ID_ANY)?;
		let icon_size = Some(Size::new(TOOL_ICON_SIZE, TOOL_ICON_SIZE));
		let tools = [
			(menu_ids::OPEN, t("Open .."), t("Open a CHM book."), ArtId::FileOpen),
			(menu_ids::PRINT, t("Print .."), t("Print the page currently displayed."), ArtId::Print),
			(menu_ids::FONTS, t("Fonts .."), t("Change fonts."), ArtId::HelpSettings),
		];
		for (id, label, help, art) in tools {
			if let Some(bitmap) = ArtProvider::get_bitmap(art, ArtClient::Toolbar, icon_size) {
				toolbar.add_tool(id, &label, &bitmap, &help);
			}
		}
		if let Some(bitmap) = ArtProvider::get_bitmap(ArtId::HelpSidePanel, ArtClient::Toolbar, icon_size) {
			toolbar.add_check_tool(menu_ids::CONTENTS, &t("Contents"), &bitmap, &t("On or off?"));
		}
		toolbar.add_separator();
		let history_tools = [
			(menu_ids::HOME, t("Home"), t("Go to the book's start page."), ArtId::GoHome),
			(menu_ids::BACK, t("Back"), t("Back to the last visited page. Per book."), ArtId::GoBack),
			(menu_ids::FORWARD, t("Forward"), t("Go forward in history. Per book."), ArtId::GoForward),
		];
		for (id, label, help, art) in history_tools {
			if let Some(bitmap) = ArtProvider::get_bitmap(art, ArtClient::Toolbar, icon_size) {
				toolbar.add_tool(id, &label, &bitmap, &help);
			}
		}
		toolbar.realize();
		Some(toolbar)
	}

	/// Menu items and toolbar tools share ids, so one handler serves both.
	fn bind_menu_events(state: &WindowState) {
		let frame = state.frame;
		let state = state.clone();
		frame.on_menu(move |event| match event.get_id() {
			menu_ids::OPEN => state.handle_open(),
			menu_ids::PRINT => state.html.print(),
			menu_ids::FONTS => state.handle_fonts(),
			menu_ids::CONTENTS => state.toggle_contents(),
			menu_ids::HOME => state.go_home(),
			menu_ids::FORWARD => state.go_forward(),
			menu_ids::BACK => state.go_back(),
			menu_ids::ABOUT => dialogs::show_about_dialog(&state.frame),
			menu_ids::EXIT => state.frame.close(true),
			_ => {}
		});
	}

	fn bind_panel_events(state: &WindowState) {
		let state_for_tree = state.clone();
		state.contents.on_topic_selected(move |position| state_for_tree.handle_topic_selected(position));

		let state_for_add = state.clone();
		state.contents.on_add_bookmark(move || state_for_add.handle_add_bookmark());
		let state_for_remove = state.clone();
		state.contents.on_remove_bookmark(move || state_for_remove.handle_remove_bookmark());
		let state_for_bookmark = state.clone();
		state.contents.on_bookmark_selected(move |index| state_for_bookmark.handle_bookmark_selected(index));

		let state_for_index = state.clone();
		state.index.on_open(move |url| state_for_index.open_topic(&url));

		let state_for_search = state.clone();
		state.search.on_search(move |query, options| state_for_search.handle_search(&query, options));
		let state_for_hit = state.clone();
		state.search.on_open(move |url| state_for_hit.open_topic(&url));

		let state_for_page = state.clone();
		state.html.on_page_loaded(move || state_for_page.handle_page_shown());
	}

	fn bind_close_event(state: &WindowState) {
		let frame = state.frame;
		let state = state.clone();
		frame.on_close(move |event| {
			let position = state.frame.get_position();
			let size = state.frame.get_size();
			let geometry = WindowGeometry { x: position.x, y: position.y, width: size.width, height: size.height };
			match state.viewer.try_lock() {
				Ok(viewer) => viewer.persist(Some(geometry)),
				Err(_) => log::warn!("Settings were not saved: the viewer was busy"),
			}
			event.skip(true);
		});
	}
}

impl WindowState {
	fn lock_viewer(&self) -> Option<MutexGuard<'_, Viewer>> {
		self.viewer.try_lock().ok()
	}

	fn handle_open(&self) {
		let open_dir = self.lock_viewer().map(|viewer| viewer.open_dir().to_string()).unwrap_or_default();
		let dialog_title = t("Choose a file..");
		let dialog = FileDialog::builder(&self.frame)
			.with_message(&dialog_title)
			.with_default_dir(&open_dir)
			.with_wildcard(CHM_WILDCARD)
			.with_style(FileDialogStyle::Open | FileDialogStyle::FileMustExist)
			.build();
		if dialog.show_modal() != wxdragon::id::ID_OK {
			return;
		}
		let Some(path) = dialog.get_path() else {
			return;
		};
		let path = Path::new(&path);
		if let (Some(dir), Some(mut viewer)) = (path.parent(), self.lock_viewer()) {
			viewer.set_open_dir(&dir.to_string_lossy());
		}
		self.load_archive(path);
	}

	fn load_archive(&self, path: &Path) {
		let Some(mut viewer) = self.lock_viewer() else {
			return;
		};
		let title = match viewer.open_book(path) {
			Ok(title) => title,
			Err(e) => {
				drop(viewer);
				log::error!("Failed to open {}: {e:#}", path.display());
				let message = t("Could not open {}.").replace("{}", &path.display().to_string());
				dialogs::show_error_dialog(&self.frame, &format!("{message}\n\n{e:#}"));
				return;
			}
		};
		self.frame.set_title(&version::book_title(&title));
		if let Some(book) = viewer.book() {
			self.contents.fill(book.topics());
			self.index.fill(book.index());
		}
		self.contents.show_bookmarks(viewer.bookmarks());
		let home = viewer.home_url().and_then(|url| viewer.location_for(&url));
		drop(viewer);

		self.set_contents_visible(self.contents.has_nodes());
		self.notebook.set_selection(CONTENTS_PAGE);
		self.search.reset();
		if let Some(location) = home {
			self.html.load(&location);
		}
	}

	fn set_contents_visible(&self, visible: bool) {
		if visible && !self.splitter.is_split() {
			self.notebook.show(true);
			self.splitter.split_vertically(&self.notebook, &self.html.view(), CONTENTS_MARGIN);
		} else if !visible && self.splitter.is_split() {
			self.splitter.unsplit(Some(&self.notebook));
			self.notebook.show(false);
		}
		self.set_contents_checked(visible);
	}

	fn set_contents_checked(&self, checked: bool) {
		if let Some(item) = &*self.contents_item {
			item.check(checked);
		}
		if let Some(toolbar) = &self.toolbar {
			toolbar.toggle_tool(menu_ids::CONTENTS, checked);
		}
	}

	fn toggle_contents(&self) {
		if self.splitter.is_split() {
			self.set_contents_visible(false);
		} else if self.contents.has_nodes() {
			self.set_contents_visible(true);
		} else {
			self.set_contents_checked(false);
			dialogs::show_warning_dialog(&self.frame, &t("Couldn't extract the book contents tree."));
		}
	}

	fn navigate(&self, url: &ChmUrl) {
		let Some(location) = self.lock_viewer().and_then(|viewer| viewer.location_for(url)) else {
			return;
		};
		self.html.load(&location);
	}

	fn open_topic(&self, topic: &str) {
		let Some(url) = self.lock_viewer().and_then(|viewer| viewer.topic_url(topic)) else {
			return;
		};
		self.navigate(&url);
	}

	fn go_home(&self) {
		if let Some(url) = self.lock_viewer().and_then(|viewer| viewer.home_url()) {
			self.navigate(&url);
		}
	}

	fn go_back(&self) {
		let location = self.lock_viewer().and_then(|mut viewer| {
			let url = viewer.go_back()?;
			viewer.location_for(&url)
		});
		if let Some(location) = location {
			self.html.load_from_history(&location);
		}
	}

	fn go_forward(&self) {
		let location = self.lock_viewer().and_then(|mut viewer| {
			let url = viewer.go_forward()?;
			viewer.location_for(&url)
		});
		if let Some(location) = location {
			self.html.load_from_history(&location);
		}
	}

	fn handle_fonts(&self) {
		let Some(current) = self.lock_viewer().map(|viewer| viewer.fonts().clone()) else {
			return;
		};
		let Some(fonts) = font_dialog::show_font_dialog(&self.frame, &current) else {
			return;
		};
		let Some(mut viewer) = self.lock_viewer() else {
			return;
		};
		viewer.set_fonts(fonts);
		let fonts = viewer.fonts().clone();
		let has_page = viewer.url_for_location(&self.html.current_location()).is_some();
		drop(viewer);
		if has_page {
			self.html.apply_fonts(&fonts);
		} else {
			self.html.show_greeting(&fonts);
		}
	}

	fn handle_topic_selected(&self, position: usize) {
		if self.sync.is_caller() {
			return;
		}
		let location = self.lock_viewer().and_then(|viewer| {
			let topic = viewer.topics()?.get(position)?;
			let url = viewer.topic_url(&topic.url)?;
			viewer.location_for(&url)
		});
		if let Some(location) = location {
			self.html.load_unsynced(&location);
		}
	}

	fn handle_page_shown(&self) {
		let (from_history, suspended) = self.html.finish_load();
		let location = self.html.current_location();
		let Some(mut viewer) = self.lock_viewer() else {
			return;
		};
		let url = viewer.url_for_location(&location);
		if let Some(url) = &url {
			if !from_history {
				viewer.record_visit(url);
			}
			self.html.apply_fonts(viewer.fonts());
		}
		let status = url.as_ref().map_or_else(|| location.clone(), ChmUrl::to_string);
		self.frame.set_status_text(&status, 0);
		let position = if self.sync.is_sync() { url.as_ref().and_then(|url| viewer.tree_position(url)) } else { None };
		drop(viewer);
		if let Some(position) = position {
			let _calling = self.sync.calling();
			self.contents.select_position(position);
		}
		drop(suspended);
	}

	fn handle_add_bookmark(&self) {
		let Some(position) = self.contents.selected_position() else {
			return;
		};
		let Some(mut viewer) = self.lock_viewer() else {
			return;
		};
		let Some((title, url)) =
			viewer.topics().and_then(|topics| topics.get(position)).map(|topic| (topic.title.clone(), topic.url.clone()))
		else {
			return;
		};
		let Some(index) = viewer.add_bookmark(&title, &url) else {
			return;
		};
		drop(viewer);
		self.contents.append_bookmark(&title, index);
	}

	fn handle_remove_bookmark(&self) {
		let Some(index) = self.contents.selected_bookmark() else {
			return;
		};
		let Some(next) = self.lock_viewer().map(|mut viewer| viewer.remove_bookmark(index)) else {
			return;
		};
		self.contents.remove_bookmark(index, next);
	}

	fn handle_bookmark_selected(&self, index: usize) {
		let Some(url) = self.lock_viewer().and_then(|viewer| viewer.bookmark_url(index)) else {
			return;
		};
		self.navigate(&url);
	}

	fn handle_search(&self, query: &str, options: SearchOptions) {
		let Some(mut viewer) = self.lock_viewer() else {
			return;
		};
		let hits = match viewer.search(query, options) {
			Ok(hits) => hits,
			Err(e) => {
				log::warn!("Search for {query:?} failed: {e:#}");
				Vec::new()
			}
		};
		drop(viewer);
		self.search.show_hits(&hits);
		if hits.is_empty() {
			self.frame.set_status_text(&t("No results found."), 0);
		} else {
			self.frame.set_status_text(&t("{} results found.").replace("{}", &hits.len().to_string()), 0);
		}
	}
}
