use encoding_rs::{Encoding, WINDOWS_1252};

/// How far into a page to look for a `<meta charset>` declaration.
const META_SCAN_LIMIT: usize = 2048;

/// Decodes a page from a CHM archive.
///
/// A byte order mark wins, then a charset declared in the first couple of
/// kilobytes, then strict UTF-8. Anything else is treated as Windows-1252,
/// which is what most help compilers emitted.
#[must_use]
pub fn decode_page(input: &[u8]) -> String {
	if let Some((encoding, bom_len)) = Encoding::for_bom(input) {
		let (decoded, _) = encoding.decode_without_bom_handling(&input[bom_len..]);
		return decoded.into_owned();
	}
	if let Some(encoding) = declared_charset(input) {
		let (decoded, _, _) = encoding.decode(input);
		return decoded.into_owned();
	}
	if let Ok(text) = std::str::from_utf8(input) {
		return text.to_string();
	}
	let (decoded, _, _) = WINDOWS_1252.decode(input);
	decoded.into_owned()
}

fn declared_charset(input: &[u8]) -> Option<&'static Encoding> {
	let head = &input[..input.len().min(META_SCAN_LIMIT)];
	let head = String::from_utf8_lossy(head).to_ascii_lowercase();
	let start = head.find("charset=")? + "charset=".len();
	let label: String = head[start..]
		.trim_start_matches(['"', '\''])
		.chars()
		.take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
		.collect();
	let encoding = Encoding::for_label(label.as_bytes())?;
	// UTF-16 declarations inside an ASCII-compatible head are always wrong.
	(encoding.output_encoding() == encoding).then_some(encoding)
}
