pub const DEFAULT_FONT_SIZE: i32 = 14;
pub const MIN_FONT_SIZE: i32 = 6;
pub const MAX_FONT_SIZE: i32 = 48;
pub const SIZE_STEPS: usize = 7;
/// Smallest size a `<font size>` step renders at.
pub const MIN_STEP_SIZE: i32 = 2;

const STYLE_ELEMENT_ID: &str = "chmview-fonts";
const GENERIC_FACES: [&str; 3] = ["serif", "sans-serif", "monospace"];
const COMMON_FACES: [&str; 12] = [
	"Arial",
	"Cantarell",
	"Consolas",
	"Courier New",
	"DejaVu Sans",
	"DejaVu Sans Mono",
	"Georgia",
	"Liberation Mono",
	"Liberation Sans",
	"Segoe UI",
	"Tahoma",
	"Times New Roman",
];

/// Seven font sizes, two points apart, centred on `base`.
pub fn size_ladder(base: i32) -> [i32; SIZE_STEPS] {
	let mut sizes = [0; SIZE_STEPS];
	for (slot, step) in sizes.iter_mut().zip(-3..=3) {
		*slot = base + step * 2;
	}
	sizes
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontSettings {
	/// Face for proportional text; empty means the renderer default.
	pub normal_face: String,
	/// Face for `pre`, `code` and friends; empty means the renderer default.
	pub fixed_face: String,
	pub size: i32,
}

impl Default for FontSettings {
	fn default() -> Self {
		Self { normal_face: String::new(), fixed_face: String::new(), size: DEFAULT_FONT_SIZE }
	}
}

impl FontSettings {
	pub fn clamp_size(size: i32) -> i32 {
		size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
	}

	/// Pixel sizes for `<font size="1">` through `<font size="7">`.
	pub fn sizes(&self) -> [i32; SIZE_STEPS] {
		size_ladder(self.size).map(|size| size.max(MIN_STEP_SIZE))
	}

	pub fn stylesheet(&self) -> String {
		let mut css = format!("body {{ font-size: {}px;", self.size);
		if !self.normal_face.trim().is_empty() {
			css.push_str(&format!(" font-family: {};", css_family(&self.normal_face, "serif")));
		}
		css.push_str(" }");
		for (step, size) in (1..).zip(self.sizes()) {
			css.push_str(&format!(" font[size=\"{step}\"] {{ font-size: {size}px; }}"));
		}
		if !self.fixed_face.trim().is_empty() {
			css.push_str(&format!(
				" pre, code, tt, kbd, samp {{ font-family: {}; }}",
				css_family(&self.fixed_face, "monospace")
			));
		}
		css
	}

	/// Script that installs the stylesheet in the displayed page, replacing an earlier one.
	pub fn apply_script(&self) -> String {
		format!(
			"(function(){{var s=document.getElementById('{id}');if(!s){{s=document.createElement('style');s.id='{id}';(document.head||document.documentElement).appendChild(s);}}s.textContent={css};}})();",
			id = STYLE_ELEMENT_ID,
			css = js_string(&self.stylesheet())
		)
	}

	/// Faces offered by the font dialog.
	pub fn candidate_faces(current: &[&str]) -> Vec<String> {
		let mut faces: Vec<String> = GENERIC_FACES
			.iter()
			.chain(COMMON_FACES.iter())
			.chain(current.iter())
			.map(|face| face.trim().to_string())
			.filter(|face| !face.is_empty())
			.collect();
		faces.sort_by_key(|face| face.to_lowercase());
		faces.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
		faces
	}
}

fn css_family(face: &str, generic: &str) -> String {
	let face = face.trim();
	if GENERIC_FACES.iter().any(|g| g.eq_ignore_ascii_case(face)) {
		return face.to_ascii_lowercase();
	}
	let escaped = face.replace('\\', "\\\\").replace('"', "\\\"");
	format!("\"{escaped}\", {generic}")
}

fn js_string(value: &str) -> String {
	let mut out = String::with_capacity(value.len() + 2);
	out.push('\'');
	for c in value.chars() {
		match c {
			'\\' => out.push_str("\\\\"),
			'\'' => out.push_str("\\'"),
			'\n' => out.push_str("\\n"),
			'\r' => out.push_str("\\r"),
			'<' => out.push_str("\\x3c"),
			other => out.push(other),
		}
	}
	out.push('\'');
	out
}
