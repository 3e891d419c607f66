//! Parsing of the HUB search feed.
//!
//! The feed is an Atom document where every `entry` carries typed children
//! such as `<str name="uuid">` and `<date name="beginposition">`.

use std::sync::OnceLock;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::bytes::Regex;

use super::error::{HubError, HubResult};
use super::types::ProductRecord;

/// Removes the first default namespace declaration.
///
/// Only the first one goes, so element names in the document root's default
/// namespace become unqualified.
pub fn strip_default_namespace(xml: &[u8]) -> Vec<u8> {
    namespace_pattern().replacen(xml, 1, &b""[..]).into_owned()
}

fn namespace_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#" xmlns="[^"]+""#).expect("namespace pattern is valid"))
}

#[derive(Debug, Default)]
struct PartialEntry {
    uuid: Option<String>,
    identifier: Option<String>,
    begin_position: Option<String>,
    end_position: Option<String>,
}

impl PartialEntry {
    fn append(&mut self, field: &str, text: &str) {
        let slot = match field {
            "uuid" => &mut self.uuid,
            "identifier" => &mut self.identifier,
            "beginposition" => &mut self.begin_position,
            "endposition" => &mut self.end_position,
            _ => return,
        };
        slot.get_or_insert_with(String::new).push_str(text);
    }

    fn into_record(self, index: usize) -> HubResult<ProductRecord> {
        let missing =
            |field: &str| HubError::MalformedFeed(format!("entry {} has no {}", index, field));
        Ok(ProductRecord {
            uuid: self.uuid.ok_or_else(|| missing("uuid"))?,
            identifier: self.identifier.ok_or_else(|| missing("identifier"))?,
            begin_position: self
                .begin_position
                .ok_or_else(|| missing("beginposition"))?,
            end_position: self.end_position.ok_or_else(|| missing("endposition"))?,
        })
    }
}

fn malformed(e: impl std::fmt::Display) -> HubError {
    HubError::MalformedFeed(e.to_string())
}

/// Value of the `name` attribute of a typed field element.
fn field_name(element: &BytesStart<'_>) -> HubResult<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(malformed)?;
        if attr.key.local_name().as_ref() == b"name" {
            let value = attr.unescape_value().map_err(malformed)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Parse every `entry` of a search feed into a record, in document order.
///
/// An entry missing any of `uuid`, `identifier`, `beginposition` or
/// `endposition` makes the whole feed malformed.
pub fn parse_feed(xml: &[u8]) -> HubResult<Vec<ProductRecord>> {
    let xml = strip_default_namespace(xml);
    let mut reader = Reader::from_reader(xml.as_slice());
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut records = Vec::new();
    let mut entry: Option<PartialEntry> = None;
    let mut field: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf).map_err(malformed)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"entry" => {
                    entry = Some(PartialEntry::default());
                    field = None;
                }
                b"str" | b"date" if entry.is_some() => field = field_name(&e)?,
                _ => {}
            },
            Event::Text(text) => {
                if let (Some(entry), Some(name)) = (entry.as_mut(), field.as_deref()) {
                    let text = text.unescape().map_err(malformed)?;
                    entry.append(name, &text);
                }
            }
            Event::CData(data) => {
                if let (Some(entry), Some(name)) = (entry.as_mut(), field.as_deref()) {
                    let data = data.into_inner();
                    entry.append(name, &String::from_utf8_lossy(&data));
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"str" | b"date" => field = None,
                b"entry" => {
                    if let Some(done) = entry.take() {
                        records.push(done.into_record(records.len())?);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(records)
}
