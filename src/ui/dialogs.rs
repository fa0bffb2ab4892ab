use wxdragon::{prelude::*, translations::translate as t};

use chmview::version;

pub fn show_error_dialog(parent: &Frame, message: &str) {
	let title = t("Error");
	let dialog = MessageDialog::builder(parent, message, &title)
		.with_style(MessageDialogStyle::OK | MessageDialogStyle::IconError | MessageDialogStyle::Centre)
		.build();
	dialog.show_modal();
}

pub fn show_warning_dialog(parent: &Frame, message: &str) {
	let title = t("Warning");
	let dialog = MessageDialog::builder(parent, message, &title)
		.with_style(MessageDialogStyle::OK | MessageDialogStyle::IconWarning | MessageDialogStyle::Centre)
		.build();
	dialog.show_modal();
}

pub fn show_about_dialog(parent: &Frame) {
	let title = t("About {}").replace("{}", version::app_name());
	let message = format!(
		"{}\n\n{}",
		version::app_title(),
		t("A viewer for compiled HTML help (CHM) archives.\nArchive reading is provided by libchm.")
	);
	let dialog = MessageDialog::builder(parent, &message, &title)
		.with_style(MessageDialogStyle::OK | MessageDialogStyle::IconInformation | MessageDialogStyle::Centre)
		.build();
	dialog.show_modal();
}
