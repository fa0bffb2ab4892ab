#![warn(clippy::all, clippy::nursery, clippy::pedantic)]
#![allow(clippy::too_many_lines)]

mod ui;

use ui::ChmViewApp;

fn main() {
	chmview::logging::init();
	let _ = wxdragon::main(|app| {
		let _app = ChmViewApp::new(app);
	});
}
