const VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_NAME: &str = "chmview";

pub const fn app_name() -> &'static str {
	APP_NAME
}

/// Base window title, e.g. `chmview v. 0.3.0`.
pub fn app_title() -> String {
	format!("{APP_NAME} v. {VERSION}")
}

/// Window title while a book is open. An empty book title keeps the base title.
pub fn book_title(title: &str) -> String {
	let title = title.trim();
	if title.is_empty() { app_title() } else { format!("{}: {title}", app_title()) }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn book_title_appends_archive_title() {
		assert_eq!(book_title("Reference"), format!("chmview v. {VERSION}: Reference"));
	}

	#[test]
	fn blank_book_title_falls_back_to_app_title() {
		assert_eq!(book_title("   "), app_title());
	}
}
