// src/feed/codec.rs
//! Event-level reading and writing of the RSS document.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::model::{Channel, FeedDocument, FeedItem, Guid, RawElement};

type XmlResult<T> = std::result::Result<T, String>;
type Out = Writer<Vec<u8>>;

fn xml_error(e: impl std::fmt::Display) -> String {
    e.to_string()
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn unexpected_eof(inside: &str) -> String {
    format!("unexpected end of document inside <{inside}>")
}

fn read_attributes(e: &BytesStart<'_>) -> XmlResult<Vec<(String, String)>> {
    let mut out = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(xml_error)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(xml_error)?.into_owned();
        out.push((key, value));
    }
    Ok(out)
}

/// Parse a whole document. Exactly one root element, which must be `<rss>`.
pub(crate) fn parse_document(xml: &str) -> XmlResult<FeedDocument> {
    let mut reader = Reader::from_str(xml);
    let config = reader.config_mut();
    config.trim_text(true);
    config.expand_empty_elements = true;

    let mut document = None;
    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) if document.is_some() => {
                return Err(format!(
                    "unexpected <{}> after the root element",
                    element_name(&e)
                ))
            }
            Event::Text(_) | Event::CData(_) if document.is_some() => {
                return Err("unexpected text after the root element".to_string())
            }
            Event::Start(e) => document = Some(read_rss(&mut reader, &e)?),
            Event::Text(_) | Event::CData(_) => {
                return Err("unexpected text before the root element".to_string())
            }
            Event::End(e) => {
                return Err(format!(
                    "unexpected </{}>",
                    String::from_utf8_lossy(e.name().as_ref())
                ))
            }
            Event::Eof => break,
            // declaration, comments, processing instructions, doctype
            _ => {}
        }
    }
    document.ok_or_else(|| "document has no root element".to_string())
}

fn read_rss(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> XmlResult<FeedDocument> {
    let root = element_name(start);
    if root != "rss" {
        return Err(format!("root element is <{root}>, expected <rss>"));
    }

    let mut doc = FeedDocument::default();
    for (key, value) in read_attributes(start)? {
        if key == "version" {
            doc.version = value;
        } else {
            doc.attributes.push((key, value));
        }
    }

    let mut channels = Vec::new();
    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) if e.name().as_ref() == b"channel" => {
                channels.push(read_channel(reader)?)
            }
            Event::Start(e) => doc.extra.push(capture(reader, e.into_owned())?),
            Event::End(_) => break,
            Event::Eof => return Err(unexpected_eof("rss")),
            _ => {}
        }
    }

    if channels.len() > 1 {
        return Err(format!("expected one <channel>, found {}", channels.len()));
    }
    doc.channel = channels.pop().unwrap_or_default();
    Ok(doc)
}

fn read_channel(reader: &mut Reader<&[u8]>) -> XmlResult<Channel> {
    let mut channel = Channel::default();
    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => match element_name(&e).as_str() {
                "item" => channel.items.push(read_item(reader)?),
                "title" if channel.title.is_none() => {
                    channel.title = Some(read_text(reader, "title")?)
                }
                "link" if channel.link.is_none() => channel.link = Some(read_text(reader, "link")?),
                "description" if channel.description.is_none() => {
                    channel.description = Some(read_text(reader, "description")?)
                }
                "language" if channel.language.is_none() => {
                    channel.language = Some(read_text(reader, "language")?)
                }
                "lastBuildDate" if channel.last_build_date.is_none() => {
                    channel.last_build_date = Some(read_text(reader, "lastBuildDate")?)
                }
                _ => channel.extra.push(capture(reader, e.into_owned())?),
            },
            Event::End(_) => return Ok(channel),
            Event::Eof => return Err(unexpected_eof("channel")),
            _ => {}
        }
    }
}

fn read_item(reader: &mut Reader<&[u8]>) -> XmlResult<FeedItem> {
    let mut item = FeedItem::default();
    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => match element_name(&e).as_str() {
                "category" => item.categories.push(read_text(reader, "category")?),
                "guid" if item.guid.is_none() => {
                    let is_perma_link = read_attributes(&e)?
                        .into_iter()
                        .find(|(k, _)| k == "isPermaLink")
                        .map(|(_, v)| v);
                    let value = read_text(reader, "guid")?;
                    item.guid = Some(Guid {
                        is_perma_link,
                        value,
                    });
                }
                "title" if item.title.is_none() => item.title = Some(read_text(reader, "title")?),
                "description" if item.description.is_none() => {
                    item.description = Some(read_text(reader, "description")?)
                }
                "link" if item.link.is_none() => item.link = Some(read_text(reader, "link")?),
                "pubDate" if item.pub_date.is_none() => {
                    item.pub_date = Some(read_text(reader, "pubDate")?)
                }
                _ => item.extra.push(capture(reader, e.into_owned())?),
            },
            Event::End(_) => return Ok(item),
            Event::Eof => return Err(unexpected_eof("item")),
            _ => {}
        }
    }
}

/// Text and CDATA up to the closing tag. Nested markup is skipped.
fn read_text(reader: &mut Reader<&[u8]>, inside: &str) -> XmlResult<String> {
    let mut text = String::new();
    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Text(e) => text.push_str(&e.unescape().map_err(xml_error)?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::Start(e) => {
                reader.read_to_end(e.name()).map_err(xml_error)?;
            }
            Event::End(_) => return Ok(text),
            Event::Eof => return Err(unexpected_eof(inside)),
            _ => {}
        }
    }
}

fn capture(reader: &mut Reader<&[u8]>, start: BytesStart<'static>) -> XmlResult<RawElement> {
    let name = element_name(&start);
    let mut events = vec![Event::Start(start)];
    let mut depth = 1usize;
    while depth > 0 {
        let event = reader.read_event().map_err(xml_error)?;
        match &event {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth -= 1,
            Event::Eof => return Err(unexpected_eof(&name)),
            _ => {}
        }
        events.push(event.into_owned());
    }
    Ok(RawElement(events))
}

fn emit(writer: &mut Out, event: Event<'_>) -> XmlResult<()> {
    writer.write_event(event).map_err(xml_error)
}

fn text_element(writer: &mut Out, name: &str, value: &str) -> XmlResult<()> {
    emit(writer, Event::Start(BytesStart::new(name)))?;
    emit(writer, Event::Text(BytesText::new(value)))?;
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn optional_element(writer: &mut Out, name: &str, value: &Option<String>) -> XmlResult<()> {
    match value {
        Some(v) => text_element(writer, name, v),
        None => Ok(()),
    }
}

/// Replays a kept element; childless ones are written self-closing.
fn write_raw(writer: &mut Out, raw: &RawElement) -> XmlResult<()> {
    let mut events = raw.0.iter().peekable();
    while let Some(event) = events.next() {
        let childless = matches!(events.peek(), Some(Event::End(_)));
        match event {
            Event::Start(start) if childless => {
                emit(writer, Event::Empty(start.clone()))?;
                events.next();
            }
            _ => emit(writer, event.clone())?,
        }
    }
    Ok(())
}

fn write_item(writer: &mut Out, item: &FeedItem) -> XmlResult<()> {
    emit(writer, Event::Start(BytesStart::new("item")))?;
    optional_element(writer, "title", &item.title)?;
    optional_element(writer, "description", &item.description)?;
    optional_element(writer, "link", &item.link)?;
    for category in &item.categories {
        text_element(writer, "category", category)?;
    }
    if let Some(guid) = &item.guid {
        let mut start = BytesStart::new("guid");
        if let Some(flag) = &guid.is_perma_link {
            start.push_attribute(("isPermaLink", flag.as_str()));
        }
        emit(writer, Event::Start(start))?;
        emit(writer, Event::Text(BytesText::new(&guid.value)))?;
        emit(writer, Event::End(BytesEnd::new("guid")))?;
    }
    optional_element(writer, "pubDate", &item.pub_date)?;
    for raw in &item.extra {
        write_raw(writer, raw)?;
    }
    emit(writer, Event::End(BytesEnd::new("item")))
}

fn write_channel(writer: &mut Out, channel: &Channel) -> XmlResult<()> {
    emit(writer, Event::Start(BytesStart::new("channel")))?;
    optional_element(writer, "title", &channel.title)?;
    optional_element(writer, "link", &channel.link)?;
    optional_element(writer, "description", &channel.description)?;
    optional_element(writer, "language", &channel.language)?;
    optional_element(writer, "lastBuildDate", &channel.last_build_date)?;
    for raw in &channel.extra {
        write_raw(writer, raw)?;
    }
    for item in &channel.items {
        write_item(writer, item)?;
    }
    emit(writer, Event::End(BytesEnd::new("channel")))
}

/// Two-space indented document, no declaration.
pub(crate) fn write_document(doc: &FeedDocument) -> XmlResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", doc.version.as_str()));
    for (key, value) in &doc.attributes {
        rss.push_attribute((key.as_str(), value.as_str()));
    }
    emit(&mut writer, Event::Start(rss))?;
    write_channel(&mut writer, &doc.channel)?;
    for raw in &doc.extra {
        write_raw(&mut writer, raw)?;
    }
    emit(&mut writer, Event::End(BytesEnd::new("rss")))?;

    String::from_utf8(writer.into_inner()).map_err(xml_error)
}
