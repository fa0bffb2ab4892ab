use wxdragon::id::{ID_ABOUT, ID_EXIT};

/// Generates sequential menu ID constants starting from a base value.
macro_rules! menu_ids {
	($base:expr => $($name:ident),+ $(,)?) => {
		menu_ids!(@inner $base, $($name),+);
	};
	(@inner $n:expr, $name:ident) => {
		pub const $name: i32 = $n;
	};
	(@inner $n:expr, $name:ident, $($rest:ident),+) => {
		pub const $name: i32 = $n;
		menu_ids!(@inner $n + 1, $($rest),+);
	};
}

pub const EXIT: i32 = ID_EXIT;
pub const ABOUT: i32 = ID_ABOUT;

const BASE: i32 = 5000;

// File menu (BASE + 0..99)
menu_ids!(BASE => OPEN, PRINT, FONTS, CONTENTS);

// History menu (BASE + 100..199)
menu_ids!(BASE + 100 => HOME, FORWARD, BACK);
