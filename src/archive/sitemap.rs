//! `.hhc` (contents) and `.hhk` (index) sitemap files.
//!
//! Both are loose HTML: nested `<ul>` lists whose `<li>` items carry an
//! `<object type="text/sitemap">` with `Name` and `Local` params.

use scraper::{ElementRef, Html, Selector, node::Node};

use crate::{chm_url::normalize_topic, topics::Topic};

pub fn parse_sitemap(content: &str) -> Vec<Topic> {
	let document = Html::parse_document(content);
	let Ok(body_selector) = Selector::parse("body") else {
		return Vec::new();
	};
	let Some(body) = document.select(&body_selector).next() else {
		return Vec::new();
	};
	let mut topics = Vec::new();
	collect_list(body, &mut topics);
	topics
}

fn collect_list(list: ElementRef, out: &mut Vec<Topic>) {
	let elements: Vec<ElementRef> = list.children().filter_map(ElementRef::wrap).collect();
	let mut skip_next_list = false;
	for (position, element) in elements.iter().enumerate() {
		match element.value().name() {
			"ul" | "ol" => {
				if std::mem::take(&mut skip_next_list) {
					continue;
				}
				collect_list(*element, out);
			}
			"li" => {
				skip_next_list = false;
				let Some(mut topic) = item_topic(*element) else {
					// A bare <li> can still wrap nested lists.
					collect_nested_lists(*element, out);
					continue;
				};
				collect_nested_lists(*element, &mut topic.children);
				// Some compilers close the <li> before the child list, leaving it as a sibling.
				if topic.children.is_empty() {
					if let Some(sibling) = elements.get(position + 1).filter(|e| is_list(e)) {
						collect_list(*sibling, &mut topic.children);
						skip_next_list = true;
					}
				}
				out.push(topic);
			}
			"object" => {
				if let Some(topic) = object_topic(*element) {
					out.push(topic);
				}
			}
			_ => collect_list(*element, out),
		}
	}
}

fn collect_nested_lists(item: ElementRef, out: &mut Vec<Topic>) {
	for child in item.children().filter_map(ElementRef::wrap) {
		if is_list(&child) {
			collect_list(child, out);
		}
	}
}

fn is_list(element: &ElementRef) -> bool {
	matches!(element.value().name(), "ul" | "ol")
}

fn item_topic(item: ElementRef) -> Option<Topic> {
	item.children().filter_map(ElementRef::wrap).find(|child| child.value().name() == "object").and_then(object_topic)
}

fn object_topic(object: ElementRef) -> Option<Topic> {
	let mut name: Option<String> = None;
	let mut local: Option<String> = None;
	for node in object.descendants() {
		let Node::Element(element) = node.value() else {
			continue;
		};
		if element.name() != "param" {
			continue;
		}
		let value = element.attr("value").unwrap_or("").trim();
		match element.attr("name").map(str::to_ascii_lowercase).as_deref() {
			Some("name") if name.is_none() && !value.is_empty() => name = Some(value.to_string()),
			Some("local") if local.is_none() && !value.is_empty() => local = Some(normalize_topic(value)),
			_ => {}
		}
	}
	Some(Topic::new(name?, local.unwrap_or_default()))
}
