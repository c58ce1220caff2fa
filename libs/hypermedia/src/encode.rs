//! Multi-format encoding of assembled envelopes.
//!
//! JSON serializes the envelope body structurally; mapping order is the
//! shaped order. XML is written as explicit events because the element
//! layout is derived per request from the shaped mappings. CSV is the hard
//! case: the column header is taken from the first record and later records
//! are written against it, with absent fields as empty cells — records in
//! one response are shaped against one `FieldSet`, so the fill is purely
//! defensive.
//!
//! Callers encode into a buffer and only build the HTTP response on success,
//! so a failed encode never leaves a partial body on the wire.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::envelope::{Body, Envelope, LinkedEntity};
use crate::error::Error;
use crate::links::Link;
use crate::media::WireFormat;
use crate::shape::{FieldValue, ShapedEntity};

/// Serialize an assembled envelope to the negotiated wire format.
///
/// # Errors
/// Encoding or write failures; nothing useful is in `out` on error.
pub fn encode<W: Write>(envelope: &Envelope, format: WireFormat, out: &mut W) -> Result<(), Error> {
    match format {
        WireFormat::Json => encode_json(envelope, out),
        WireFormat::Xml => encode_xml(envelope, out),
        WireFormat::Csv => encode_csv(envelope, out),
    }
}

fn encode_json<W: Write>(envelope: &Envelope, out: &mut W) -> Result<(), Error> {
    serde_json::to_writer(out, &envelope.body)?;
    Ok(())
}

fn encode_xml<W: Write>(envelope: &Envelope, out: &mut W) -> Result<(), Error> {
    let mut writer = Writer::new(out);
    match &envelope.body {
        Body::Item(entity) => write_entity(&mut writer, envelope.resource, entity, None)?,
        Body::LinkedItem(linked) => write_entity(
            &mut writer,
            envelope.resource,
            &linked.entity,
            Some(&linked.links),
        )?,
        Body::Collection(entities) => {
            if entities.is_empty() {
                writer.write_event(Event::Empty(BytesStart::new(envelope.collection)))?;
            } else {
                writer.write_event(Event::Start(BytesStart::new(envelope.collection)))?;
                for entity in entities {
                    write_entity(&mut writer, envelope.resource, entity, None)?;
                }
                writer.write_event(Event::End(BytesEnd::new(envelope.collection)))?;
            }
        }
        Body::LinkedCollection(env) => {
            writer.write_event(Event::Start(BytesStart::new(envelope.collection)))?;
            for LinkedEntity { entity, links } in &env.value {
                write_entity(&mut writer, envelope.resource, entity, Some(links))?;
            }
            write_links(&mut writer, &env.links)?;
            writer.write_event(Event::End(BytesEnd::new(envelope.collection)))?;
        }
    }
    Ok(())
}

fn write_entity<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    entity: &ShapedEntity,
    links: Option<&[Link]>,
) -> Result<(), Error> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    for (field, value) in entity.fields() {
        let text = value.render();
        if text.is_empty() {
            writer.write_event(Event::Empty(BytesStart::new(field.as_str())))?;
        } else {
            writer.write_event(Event::Start(BytesStart::new(field.as_str())))?;
            writer.write_event(Event::Text(BytesText::new(&text)))?;
            writer.write_event(Event::End(BytesEnd::new(field.as_str())))?;
        }
    }
    if let Some(links) = links {
        write_links(writer, links)?;
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_links<W: Write>(writer: &mut Writer<W>, links: &[Link]) -> Result<(), Error> {
    if links.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("links")))?;
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new("links")))?;
    for link in links {
        let mut element = BytesStart::new("link");
        element.push_attribute(("href", link.href.as_str()));
        element.push_attribute(("rel", link.rel.as_str()));
        element.push_attribute(("method", link.method.as_str()));
        writer.write_event(Event::Empty(element))?;
    }
    writer.write_event(Event::End(BytesEnd::new("links")))?;
    Ok(())
}

fn encode_csv<W: Write>(envelope: &Envelope, out: &mut W) -> Result<(), Error> {
    let rows: Vec<&ShapedEntity> = match &envelope.body {
        Body::Item(entity) => vec![entity],
        Body::Collection(entities) => entities.iter().collect(),
        // Links are not representable in tabular form; negotiation never
        // pairs hypermedia with CSV, so only the shaped rows are written.
        Body::LinkedItem(linked) => vec![&linked.entity],
        Body::LinkedCollection(env) => env.value.iter().map(|l| &l.entity).collect(),
    };

    let header: Vec<&str> = rows.first().map_or_else(
        || envelope.columns.iter().map(String::as_str).collect(),
        |first| first.fields().keys().map(String::as_str).collect(),
    );

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&header)?;
    for row in rows {
        let record = header
            .iter()
            .map(|column| row.get(column).map(FieldValue::render).unwrap_or_default());
        writer.write_record(record)?;
    }
    writer.flush()?;
    Ok(())
}
