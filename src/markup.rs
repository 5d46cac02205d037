//! Marker-reference extraction from document markup.
//!
//! Running header/footer fields are declared in document markup as
//! `<marker-reference/>` elements:
//!
//! ```xml
//! <marker-reference marker="chapter" direction="backward" scope="sequence"/>
//! ```
//!
//! This module pulls those descriptors out of a field fragment; resolving
//! them against a page layout is the scope engine's job.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::PaginationError;
use crate::marker::{MarkerRef, SearchDirection, SearchScope};

/// Parse all `<marker-reference/>` elements from a markup fragment, in
/// document order.
///
/// The `marker` attribute is required; `direction` defaults to forward,
/// `scope` to page and `offset` to 0. Other elements and unknown
/// attributes are ignored, so a whole field definition block can be fed
/// through unfiltered.
pub fn parse_marker_references(content: &[u8]) -> Result<Vec<MarkerRef>, PaginationError> {
    let mut reader = Reader::from_reader(content);
    reader.config_mut().trim_text(true);

    let mut out = Vec::with_capacity(4);
    let mut buf = Vec::with_capacity(64);

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.name().as_ref() == b"marker-reference" {
                    let mut name: Option<String> = None;
                    let mut direction = SearchDirection::Forward;
                    let mut scope = SearchScope::Page;
                    let mut offset = 0i32;
                    for attr in e.attributes().flatten() {
                        let value = reader
                            .decoder()
                            .decode(attr.value.as_ref())
                            .unwrap_or_default();
                        match attr.key.as_ref() {
                            b"marker" => name = Some(value.into_owned()),
                            b"direction" => {
                                direction =
                                    SearchDirection::from_markup(value.as_ref()).ok_or_else(
                                        || {
                                            PaginationError::Markup(format!(
                                                "unknown search direction: {}",
                                                value
                                            ))
                                        },
                                    )?;
                            }
                            b"scope" => {
                                scope = SearchScope::from_markup(value.as_ref()).ok_or_else(
                                    || {
                                        PaginationError::Markup(format!(
                                            "unknown search scope: {}",
                                            value
                                        ))
                                    },
                                )?;
                            }
                            b"offset" => {
                                offset = value.parse::<i32>().map_err(|_| {
                                    PaginationError::Markup(format!(
                                        "invalid marker offset: {}",
                                        value
                                    ))
                                })?;
                            }
                            _ => {}
                        }
                    }
                    let Some(name) = name else {
                        return Err(PaginationError::Markup(
                            "marker-reference is missing the marker attribute".into(),
                        ));
                    };
                    out.push(MarkerRef {
                        name,
                        direction,
                        scope,
                        offset,
                    });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PaginationError::Markup(format!(
                    "markup parse error: {:?}",
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}
