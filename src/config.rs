use std::{collections::BTreeMap, env};

use wxdragon::config::{Config, ConfigStyle};

use crate::{fonts::FontSettings, version};

pub const POSITION_GROUP: &str = "/Position";
pub const PATHS_GROUP: &str = "/Paths";
pub const FONTS_GROUP: &str = "/Fonts";

const X_ORIG_KEY: &str = "xOrig";
const Y_ORIG_KEY: &str = "yOrig";
const WIDTH_KEY: &str = "width";
const HEIGHT_KEY: &str = "height";
const LAST_OPENED_DIR_KEY: &str = "lastOpenedDir";
const NORMAL_FONT_KEY: &str = "normalFontFace";
const FIXED_FONT_KEY: &str = "fixedFontFace";
const FONT_SIZE_KEY: &str = "size";

/// Grouped key/value storage. Groups are absolute paths such as `/Fonts`.
pub trait ConfigStore {
	fn read_string(&self, group: &str, key: &str, default_value: &str) -> String;
	fn read_long(&self, group: &str, key: &str, default_value: i64) -> i64;
	fn write_string(&self, group: &str, key: &str, value: &str);
	fn write_long(&self, group: &str, key: &str, value: i64);
	fn has_entry(&self, group: &str, key: &str) -> bool;
	fn delete_group(&self, group: &str);
	fn flush(&self);
}

impl ConfigStore for Config {
	fn read_string(&self, group: &str, key: &str, default_value: &str) -> String {
		with_path(self, group, |config| config.read_string(key, default_value))
	}

	fn read_long(&self, group: &str, key: &str, default_value: i64) -> i64 {
		with_path(self, group, |config| config.read_long(key, default_value))
	}

	fn write_string(&self, group: &str, key: &str, value: &str) {
		with_path(self, group, |config| {
			config.write_string(key, value);
		});
	}

	fn write_long(&self, group: &str, key: &str, value: i64) {
		with_path(self, group, |config| {
			config.write_long(key, value);
		});
	}

	fn has_entry(&self, group: &str, key: &str) -> bool {
		with_path(self, group, |config| config.has_entry(key))
	}

	fn delete_group(&self, group: &str) {
		self.set_path("/");
		let _ = Config::delete_group(self, group.trim_start_matches('/'));
	}

	fn flush(&self) {
		Config::flush(self, false);
	}
}

fn with_path<T>(config: &Config, group: &str, f: impl FnOnce(&Config) -> T) -> T {
	config.set_path(group);
	let result = f(config);
	config.set_path("/");
	result
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowGeometry {
	pub x: i32,
	pub y: i32,
	pub width: i32,
	pub height: i32,
}

pub struct ConfigManager {
	store: Box<dyn ConfigStore>,
}

impl ConfigManager {
	/// Opens the per-user configuration store.
	pub fn open() -> Self {
		let name = version::app_name();
		let config = Config::new(
			name,
			Some(name),
			None,
			None,
			ConfigStyle::USE_LOCAL_FILE | ConfigStyle::USE_NO_ESCAPE_CHARACTERS,
		);
		Self::with_store(Box::new(config))
	}

	pub fn with_store(store: Box<dyn ConfigStore>) -> Self {
		Self { store }
	}

	pub fn store(&self) -> &dyn ConfigStore {
		self.store.as_ref()
	}

	pub fn flush(&self) {
		self.store.flush();
	}

	pub fn window_geometry(&self) -> Option<WindowGeometry> {
		let keys = [X_ORIG_KEY, Y_ORIG_KEY, WIDTH_KEY, HEIGHT_KEY];
		if !keys.iter().all(|key| self.store.has_entry(POSITION_GROUP, key)) {
			return None;
		}
		let read = |key| i32::try_from(self.store.read_long(POSITION_GROUP, key, 0)).unwrap_or(0);
		let geometry =
			WindowGeometry { x: read(X_ORIG_KEY), y: read(Y_ORIG_KEY), width: read(WIDTH_KEY), height: read(HEIGHT_KEY) };
		(geometry.width > 0 && geometry.height > 0).then_some(geometry)
	}

	pub fn set_window_geometry(&self, geometry: WindowGeometry) {
		self.store.write_long(POSITION_GROUP, X_ORIG_KEY, i64::from(geometry.x));
		self.store.write_long(POSITION_GROUP, Y_ORIG_KEY, i64::from(geometry.y));
		self.store.write_long(POSITION_GROUP, WIDTH_KEY, i64::from(geometry.width));
		self.store.write_long(POSITION_GROUP, HEIGHT_KEY, i64::from(geometry.height));
	}

	pub fn last_opened_dir(&self) -> String {
		let default_dir = home_dir();
		self.store.read_string(PATHS_GROUP, LAST_OPENED_DIR_KEY, &default_dir)
	}

	pub fn set_last_opened_dir(&self, dir: &str) {
		self.store.write_string(PATHS_GROUP, LAST_OPENED_DIR_KEY, dir);
	}

	pub fn font_settings(&self) -> FontSettings {
		let defaults = FontSettings::default();
		let size = self.store.read_long(FONTS_GROUP, FONT_SIZE_KEY, i64::from(defaults.size));
		FontSettings {
			normal_face: self.store.read_string(FONTS_GROUP, NORMAL_FONT_KEY, &defaults.normal_face),
			fixed_face: self.store.read_string(FONTS_GROUP, FIXED_FONT_KEY, &defaults.fixed_face),
			size: i32::try_from(size).map_or(defaults.size, FontSettings::clamp_size),
		}
	}

	pub fn set_font_settings(&self, fonts: &FontSettings) {
		self.store.write_string(FONTS_GROUP, NORMAL_FONT_KEY, &fonts.normal_face);
		self.store.write_string(FONTS_GROUP, FIXED_FONT_KEY, &fonts.fixed_face);
		self.store.write_long(FONTS_GROUP, FONT_SIZE_KEY, i64::from(fonts.size));
	}
}

impl Drop for ConfigManager {
	fn drop(&mut self) {
		self.store.flush();
	}
}

fn home_dir() -> String {
	env::var_os("HOME")
		.or_else(|| env::var_os("USERPROFILE"))
		.map(|dir| dir.to_string_lossy().to_string())
		.unwrap_or_default()
}

/// In-memory store used by tests.
#[derive(Default)]
pub struct MemoryStore {
	values: std::cell::RefCell<BTreeMap<(String, String), String>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.values.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.borrow().is_empty()
	}
}

impl ConfigStore for MemoryStore {
	fn read_string(&self, group: &str, key: &str, default_value: &str) -> String {
		self.values
			.borrow()
			.get(&(group.to_string(), key.to_string()))
			.cloned()
			.unwrap_or_else(|| default_value.to_string())
	}

	fn read_long(&self, group: &str, key: &str, default_value: i64) -> i64 {
		self.values
			.borrow()
			.get(&(group.to_string(), key.to_string()))
			.and_then(|value| value.parse().ok())
			.unwrap_or(default_value)
	}

	fn write_string(&self, group: &str, key: &str, value: &str) {
		self.values.borrow_mut().insert((group.to_string(), key.to_string()), value.to_string());
	}

	fn write_long(&self, group: &str, key: &str, value: i64) {
		self.write_string(group, key, &value.to_string());
	}

	fn has_entry(&self, group: &str, key: &str) -> bool {
		self.values.borrow().contains_key(&(group.to_string(), key.to_string()))
	}

	fn delete_group(&self, group: &str) {
		let nested = format!("{group}/");
		self.values.borrow_mut().retain(|(g, _), _| g != group && !g.starts_with(&nested));
	}

	fn flush(&self) {}
}

impl<T: ConfigStore + ?Sized> ConfigStore for std::rc::Rc<T> {
	fn read_string(&self, group: &str, key: &str, default_value: &str) -> String {
		(**self).read_string(group, key, default_value)
	}

	fn read_long(&self, group: &str, key: &str, default_value: i64) -> i64 {
		(**self).read_long(group, key, default_value)
	}

	fn write_string(&self, group: &str, key: &str, value: &str) {
		(**self).write_string(group, key, value);
	}

	fn write_long(&self, group: &str, key: &str, value: i64) {
		(**self).write_long(group, key, value);
	}

	fn has_entry(&self, group: &str, key: &str) -> bool {
		(**self).has_entry(group, key)
	}

	fn delete_group(&self, group: &str) {
		(**self).delete_group(group);
	}

	fn flush(&self) {
		(**self).flush();
	}
}

#[cfg(test)]
mod tests {
	use std::rc::Rc;

	use super::*;

	#[test]
	fn geometry_is_absent_until_all_keys_are_written() {
		let store = Rc::new(MemoryStore::new());
		let config = ConfigManager::with_store(Box::new(Rc::clone(&store)));
		assert_eq!(config.window_geometry(), None);
		store.write_long(POSITION_GROUP, X_ORIG_KEY, 10);
		assert_eq!(config.window_geometry(), None);
	}

	#[test]
	fn geometry_round_trips_through_position_keys() {
		let store = Rc::new(MemoryStore::new());
		let config = ConfigManager::with_store(Box::new(Rc::clone(&store)));
		let geometry = WindowGeometry { x: 20, y: 30, width: 640, height: 480 };
		config.set_window_geometry(geometry);
		assert_eq!(store.read_long("/Position", "width", 0), 640);
		assert_eq!(config.window_geometry(), Some(geometry));
	}

	#[test]
	fn last_opened_dir_is_stored_under_paths() {
		let store = Rc::new(MemoryStore::new());
		let config = ConfigManager::with_store(Box::new(Rc::clone(&store)));
		config.set_last_opened_dir("/home/me/books");
		assert_eq!(store.read_string("/Paths", "lastOpenedDir", ""), "/home/me/books");
		assert_eq!(config.last_opened_dir(), "/home/me/books");
	}

	#[test]
	fn fonts_use_defaults_then_stored_values() {
		let store = Rc::new(MemoryStore::new());
		let config = ConfigManager::with_store(Box::new(Rc::clone(&store)));
		assert_eq!(config.font_settings(), FontSettings::default());
		let fonts = FontSettings { normal_face: "Georgia".into(), fixed_face: "Courier New".into(), size: 16 };
		config.set_font_settings(&fonts);
		assert_eq!(store.read_string("/Fonts", "normalFontFace", ""), "Georgia");
		assert_eq!(config.font_settings(), fonts);
	}

	#[test]
	fn memory_store_delete_group_removes_nested_groups_only() {
		let store = MemoryStore::new();
		store.write_string("/Bookmarks/a", "k", "v");
		store.write_string("/Bookmarks/ab", "k", "v");
		store.write_string("/Bookmarks/a/deeper", "k", "v");
		store.delete_group("/Bookmarks/a");
		assert!(!store.has_entry("/Bookmarks/a", "k"));
		assert!(!store.has_entry("/Bookmarks/a/deeper", "k"));
		assert!(store.has_entry("/Bookmarks/ab", "k"));
	}
}
