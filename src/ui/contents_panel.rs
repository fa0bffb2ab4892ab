use std::{cell::RefCell, rc::Rc};

use chmview::{bookmarks::BookmarkList, sync::ReentrancyFlag, topics::TopicTree};
use wxdragon::{prelude::*, translations::translate as t};

const PADDING: i32 = 5;
const BUTTON_GAP: i32 = 2;

/// The Contents tab: the topic tree with the bookmarks box below it.
#[derive(Clone)]
pub struct ContentsPanel {
	panel: Panel,
	tree: TreeCtrl,
	bookmarks: ComboBox,
	add_button: Button,
	remove_button: Button,
	// Indexed by pre-order topic position.
	items: Rc<RefCell<Vec<TreeItemId>>>,
	bookmark_guard: ReentrancyFlag,
}

impl ContentsPanel {
	pub fn new(parent: &Notebook) -> Self {
		let panel = Panel::builder(parent).build();
		let tree = TreeCtrl::builder(&panel)
			.with_style(TreeCtrlStyle::Default | TreeCtrlStyle::HideRoot | TreeCtrlStyle::LinesAtRoot)
			.build();
		let bookmarks_box = StaticBoxSizerBuilder::new_with_label(Orientation::Vertical, &panel, &t("Bookmarks")).build();
		let bookmarks = ComboBox::builder(&panel).with_style(ComboBoxStyle::ReadOnly).build();
		let add_button = Button::builder(&panel).with_label(&t("Add")).build();
		let remove_button = Button::builder(&panel).with_label(&t("Remove")).build();
		add_button.set_tooltip(&t("Add displayed page to bookmarks."));
		remove_button.set_tooltip(&t("Remove selected bookmark."));

		let button_sizer = BoxSizer::builder(Orientation::Horizontal).build();
		button_sizer.add(&add_button, 1, SizerFlag::Expand | SizerFlag::Right, BUTTON_GAP);
		button_sizer.add(&remove_button, 1, SizerFlag::Expand | SizerFlag::Left, BUTTON_GAP);
		bookmarks_box.add(&bookmarks, 0, SizerFlag::Expand | SizerFlag::Bottom, PADDING);
		bookmarks_box.add_sizer(&button_sizer, 1, SizerFlag::Expand, 0);

		let sizer = BoxSizer::builder(Orientation::Vertical).build();
		sizer.add(&tree, 1, SizerFlag::Expand, 0);
		sizer.add_sizer(&bookmarks_box, 0, SizerFlag::Expand | SizerFlag::All, 0);
		panel.set_sizer(sizer, true);

		Self {
			panel,
			tree,
			bookmarks,
			add_button,
			remove_button,
			items: Rc::new(RefCell::new(Vec::new())),
			bookmark_guard: ReentrancyFlag::new(),
		}
	}

	pub const fn panel(&self) -> Panel {
		self.panel
	}

	pub fn fill(&self, topics: &TopicTree) {
		self.tree.delete_all_items();
		let mut items = self.items.borrow_mut();
		items.clear();
		let Some(root) = self.tree.add_root(&t("Topics"), None, None) else {
			log::warn!("Could not create the contents tree root");
			return;
		};
		let mut parents = vec![root];
		for (position, (depth, topic)) in topics.flatten().into_iter().enumerate() {
			parents.truncate(depth + 1);
			let Some(parent) = parents.last().cloned() else {
				break;
			};
			let Some(item) = self.tree.append_item_with_data(&parent, &topic.title, position, None, None) else {
				log::warn!("Could not add contents entry {}", topic.title);
				break;
			};
			items.push(item.clone());
			parents.push(item);
		}
		log::debug!("Filled contents tree with {} entries", items.len());
	}

	pub fn has_nodes(&self) -> bool {
		!self.items.borrow().is_empty()
	}

	/// Pre-order position of a tree item; `None` for the hidden root.
	pub fn position_of(&self, item: &TreeItemId) -> Option<usize> {
		self.tree.get_custom_data(item).and_then(|data| data.downcast_ref::<usize>().copied())
	}

	pub fn selected_position(&self) -> Option<usize> {
		let item = self.tree.get_selection()?;
		self.position_of(&item)
	}

	pub fn select_position(&self, position: usize) {
		let items = self.items.borrow();
		if let Some(item) = items.get(position) {
			self.tree.ensure_visible(item);
			self.tree.select_item(item);
		}
	}

	pub fn on_topic_selected(&self, handler: impl Fn(usize) + 'static) {
		let panel = self.clone();
		self.tree.on_selection_changed(move |event| {
			let Some(item) = event.get_item() else {
				return;
			};
			if let Some(position) = panel.position_of(&item) {
				handler(position);
			}
		});
	}

	pub fn show_bookmarks(&self, bookmarks: &BookmarkList) {
		let _guard = self.bookmark_guard.hold();
		self.bookmarks.clear();
		for bookmark in bookmarks.iter() {
			self.bookmarks.append(&bookmark.title);
		}
		self.bookmarks.set_value("");
	}

	pub fn append_bookmark(&self, title: &str, index: usize) {
		let _guard = self.bookmark_guard.hold();
		self.bookmarks.append(title);
		self.bookmarks.set_selection(u32::try_from(index).unwrap_or_default());
	}

	pub fn selected_bookmark(&self) -> Option<usize> {
		self.bookmarks.get_selection().and_then(|index| usize::try_from(index).ok())
	}

	/// Drops the entry at `removed`, then selects `next` or clears the box.
	pub fn remove_bookmark(&self, removed: usize, next: Option<usize>) {
		let _guard = self.bookmark_guard.hold();
		self.bookmarks.delete(u32::try_from(removed).unwrap_or_default());
		match next {
			Some(index) => self.bookmarks.set_selection(u32::try_from(index).unwrap_or_default()),
			None => self.bookmarks.set_value(""),
		}
	}

	pub fn on_add_bookmark(&self, handler: impl Fn() + 'static) {
		self.add_button.on_click(move |_| handler());
	}

	pub fn on_remove_bookmark(&self, handler: impl Fn() + 'static) {
		self.remove_button.on_click(move |_| handler());
	}

	/// Fires for user selections only, not for the panel's own updates.
	pub fn on_bookmark_selected(&self, handler: impl Fn(usize) + 'static) {
		let panel = self.clone();
		self.bookmarks.on_selection_changed(move |_event| {
			if panel.bookmark_guard.is_set() {
				return;
			}
			if let Some(index) = panel.selected_bookmark() {
				handler(index);
			}
		});
	}
}
