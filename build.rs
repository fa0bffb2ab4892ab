use std::env;

use embed_manifest::{
	embed_manifest,
	manifest::{ActiveCodePage, DpiAwareness, Setting, SupportedOS::*},
	new_manifest,
};

fn main() {
	let target = env::var("TARGET").unwrap_or_default();
	if !target.contains("windows") {
		return;
	}
	let manifest = new_manifest("Chmview")
		.supported_os(Windows7..=Windows10)
		.active_code_page(ActiveCodePage::Utf8)
		.dpi_awareness(DpiAwareness::PerMonitorV2)
		.long_path_aware(Setting::Enabled);
	if let Err(e) = embed_manifest(manifest) {
		println!("cargo:warning=Could not embed the Windows manifest: {e}");
	}
	println!("cargo:rerun-if-changed=build.rs");
}
