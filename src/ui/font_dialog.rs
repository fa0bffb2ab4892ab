use chmview::fonts::{FontSettings, MAX_FONT_SIZE, MIN_FONT_SIZE};
use wxdragon::{prelude::*, translations::translate as t};

const DIALOG_PADDING: i32 = 10;
const COMBO_WIDTH: i32 = 250;

/// Asks for the normal face, fixed face and base size. `None` when cancelled.
pub fn show_font_dialog(parent: &Frame, current: &FontSettings) -> Option<FontSettings> {
	let dialog = Dialog::builder(parent, &t("Change fonts")).build();
	let faces = FontSettings::candidate_faces(&[&current.normal_face, &current.fixed_face]);

	let normal_label = StaticText::builder(&dialog).with_label(&t("&Normal font:")).build();
	let normal_combo = ComboBox::builder(&dialog).with_size(Size::new(COMBO_WIDTH, -1)).build();
	let fixed_label = StaticText::builder(&dialog).with_label(&t("&Fixed font:")).build();
	let fixed_combo = ComboBox::builder(&dialog).with_size(Size::new(COMBO_WIDTH, -1)).build();
	for face in &faces {
		normal_combo.append(face);
		fixed_combo.append(face);
	}
	normal_combo.set_value(&current.normal_face);
	fixed_combo.set_value(&current.fixed_face);

	let size_label = StaticText::builder(&dialog).with_label(&t("Font &size:")).build();
	let size_spin = SpinCtrl::builder(&dialog)
		.with_range(MIN_FONT_SIZE, MAX_FONT_SIZE)
		.with_initial_value(current.size)
		.build();

	let ok_button = Button::builder(&dialog).with_id(wxdragon::id::ID_OK).with_label(&t("OK")).build();
	let cancel_button = Button::builder(&dialog).with_id(wxdragon::id::ID_CANCEL).with_label(&t("Cancel")).build();
	dialog.set_escape_id(wxdragon::id::ID_CANCEL);
	dialog.set_affirmative_id(wxdragon::id::ID_OK);

	let grid = FlexGridSizer::builder(3, 2).with_vgap(DIALOG_PADDING).with_hgap(DIALOG_PADDING).build();
	grid.add(&normal_label, 0, SizerFlag::AlignCenterVertical, 0);
	grid.add(&normal_combo, 1, SizerFlag::Expand, 0);
	grid.add(&fixed_label, 0, SizerFlag::AlignCenterVertical, 0);
	grid.add(&fixed_combo, 1, SizerFlag::Expand, 0);
	grid.add(&size_label, 0, SizerFlag::AlignCenterVertical, 0);
	grid.add(&size_spin, 0, SizerFlag::AlignLeft, 0);
	grid.add_growable_col(1, 1);

	let button_sizer = BoxSizer::builder(Orientation::Horizontal).build();
	button_sizer.add_stretch_spacer(1);
	button_sizer.add(&ok_button, 0, SizerFlag::Right, DIALOG_PADDING / 2);
	button_sizer.add(&cancel_button, 0, SizerFlag::All, 0);

	let main_sizer = BoxSizer::builder(Orientation::Vertical).build();
	main_sizer.add_sizer(&grid, 1, SizerFlag::Expand | SizerFlag::All, DIALOG_PADDING);
	main_sizer.add_sizer(
		&button_sizer,
		0,
		SizerFlag::Expand | SizerFlag::Left | SizerFlag::Right | SizerFlag::Bottom,
		DIALOG_PADDING,
	);
	dialog.set_sizer_and_fit(main_sizer, true);
	dialog.centre();
	normal_combo.set_focus();

	if dialog.show_modal() != wxdragon::id::ID_OK {
		return None;
	}
	Some(FontSettings {
		normal_face: normal_combo.get_value().trim().to_string(),
		fixed_face: fixed_combo.get_value().trim().to_string(),
		size: FontSettings::clamp_size(size_spin.get_value()),
	})
}
