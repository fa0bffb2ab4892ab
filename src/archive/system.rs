//! The `#SYSTEM` file: a version header followed by `(code, length, data)` records.

const HEADER_LEN: usize = 4;
const RECORD_HEADER_LEN: usize = 4;

const CODE_CONTENTS_FILE: u16 = 0;
const CODE_INDEX_FILE: u16 = 1;
const CODE_DEFAULT_TOPIC: u16 = 2;
const CODE_TITLE: u16 = 3;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SystemInfo {
	pub contents_file: Option<String>,
	pub index_file: Option<String>,
	pub default_topic: Option<String>,
	pub title: Option<String>,
}

pub fn parse_system(content: &[u8]) -> SystemInfo {
	let mut info = SystemInfo::default();
	let mut index = HEADER_LEN;
	while index + RECORD_HEADER_LEN <= content.len() {
		let code = u16::from_le_bytes([content[index], content[index + 1]]);
		let length = usize::from(u16::from_le_bytes([content[index + 2], content[index + 3]]));
		let data_start = index + RECORD_HEADER_LEN;
		let Some(data) = content.get(data_start..data_start + length) else {
			break;
		};
		let slot = match code {
			CODE_CONTENTS_FILE => Some(&mut info.contents_file),
			CODE_INDEX_FILE => Some(&mut info.index_file),
			CODE_DEFAULT_TOPIC => Some(&mut info.default_topic),
			CODE_TITLE => Some(&mut info.title),
			_ => None,
		};
		if let Some(slot) = slot {
			if slot.is_none() {
				*slot = record_text(data);
			}
		}
		index = data_start + length;
	}
	info
}

fn record_text(data: &[u8]) -> Option<String> {
	let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
	let text = crate::encoding::decode_page(&data[..end]);
	let text = text.trim();
	(!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(code: u16, text: &str) -> Vec<u8> {
		let mut data = text.as_bytes().to_vec();
		data.push(0);
		let mut out = code.to_le_bytes().to_vec();
		out.extend_from_slice(&u16::try_from(data.len()).unwrap().to_le_bytes());
		out.extend_from_slice(&data);
		out
	}

	fn system_file(records: &[Vec<u8>]) -> Vec<u8> {
		let mut out = 3u32.to_le_bytes().to_vec();
		for r in records {
			out.extend_from_slice(r);
		}
		out
	}

	#[test]
	fn reads_known_records() {
		let bytes = system_file(&[
			record(0, "toc.hhc"),
			record(1, "keywords.hhk"),
			record(2, "html/welcome.htm"),
			record(3, "Widget Toolkit Reference"),
			record(9, "compiler"),
		]);
		let info = parse_system(&bytes);
		assert_eq!(info.contents_file.as_deref(), Some("toc.hhc"));
		assert_eq!(info.index_file.as_deref(), Some("keywords.hhk"));
		assert_eq!(info.default_topic.as_deref(), Some("html/welcome.htm"));
		assert_eq!(info.title.as_deref(), Some("Widget Toolkit Reference"));
	}

	#[test]
	fn truncated_record_stops_parsing() {
		let mut bytes = system_file(&[record(3, "Title")]);
		bytes.extend_from_slice(&[2, 0, 50, 0, b'x']);
		let info = parse_system(&bytes);
		assert_eq!(info.title.as_deref(), Some("Title"));
		assert_eq!(info.default_topic, None);
	}

	#[test]
	fn blank_title_is_ignored() {
		let info = parse_system(&system_file(&[record(3, "   ")]));
		assert_eq!(info.title, None);
	}

	#[test]
	fn short_input_yields_nothing() {
		assert_eq!(parse_system(&[1, 0]), SystemInfo::default());
	}
}
