use std::{
	env,
	path::{Path, PathBuf},
	rc::Rc,
	sync::Mutex,
};

use chmview::{config::ConfigManager, viewer::Viewer};
use wxdragon::prelude::*;

use super::MainWindow;

pub struct ChmViewApp {
	_viewer: Rc<Mutex<Viewer>>,
	_main_window: MainWindow,
}

impl ChmViewApp {
	pub fn new(_app: App) -> Self {
		let viewer = Rc::new(Mutex::new(Viewer::new(ConfigManager::open())));
		let main_window = MainWindow::new(Rc::clone(&viewer));
		wxdragon::app::set_top_window(main_window.frame());
		main_window.show();
		open_from_command_line(&main_window);
		Self { _viewer: viewer, _main_window: main_window }
	}
}

fn open_from_command_line(main_window: &MainWindow) {
	if let Some(path) = env::args().nth(1) {
		let normalized = normalize_cli_path(Path::new(&path));
		log::info!("Opening {} from the command line", normalized.display());
		main_window.open_file(&normalized);
	}
}

fn normalize_cli_path(path: &Path) -> PathBuf {
	if let Ok(normalized) = path.canonicalize() {
		return normalized;
	}
	if path.is_absolute() {
		return path.to_path_buf();
	}
	env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
}
