// Copyright 2023 Hugo Osvaldo Barrera
//
// SPDX-License-Identifier: EUPL-1.2

//! Streaming parser for `multistatus` replies to `PROPFIND` requests.
//!
//! The document is read exactly once with a [`NsReader`]. Each element in the `DAV:` namespace
//! is checked against [`Tag::children`] of its parent; any other element is skipped along with
//! everything it contains.

use log::{debug, warn};
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use crate::listing::Listing;
use crate::names::{Tag, DAV};
use crate::response::ResponseBuilder;

const NS_DAV: Namespace = Namespace(DAV.as_bytes());

/// An error parsing a reply.
///
/// Any of these aborts parsing, and no entries are returned.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid XML format")]
    Parser(#[from] quick_xml::Error),

    #[error("unknown tag '{0}'")]
    UnknownTag(String),

    #[error("incorrect tag order: {tag} inside {parent}")]
    IncorrectTagOrder { tag: Tag, parent: Tag },

    #[error("undeclared namespace prefix '{0}'")]
    UnknownPrefix(String),

    #[error("document ended before all elements were closed")]
    UnexpectedEof,

    #[error("missing field '{0}' in data")]
    MissingData(&'static str),

    #[error("content after the end of the multistatus element")]
    TrailingContent,

    #[error("text outside of the multistatus element")]
    TextOutsideRoot,
}

/// An element outside of the `DAV:` namespace, which is being skipped.
#[derive(Debug)]
struct ForeignElement {
    /// Qualified name of the element that started the skipped subtree.
    name: Vec<u8>,
    /// Number of nested elements currently open inside it.
    depth: usize,
}

/// Validates the order of tags and forwards events to a [`ResponseBuilder`].
#[derive(Debug)]
struct MultistatusParser {
    /// Open `DAV:` elements. The bottom is always [`Tag::None`].
    stack: Vec<Tag>,
    foreign: Option<ForeignElement>,
    builder: ResponseBuilder,
    listing: Option<Listing>,
}

impl MultistatusParser {
    fn new(current_path: Option<&str>) -> MultistatusParser {
        MultistatusParser {
            stack: vec![Tag::None],
            foreign: None,
            builder: ResponseBuilder::new(current_path),
            listing: None,
        }
    }

    fn top(&self) -> Tag {
        self.stack.last().copied().unwrap_or(Tag::None)
    }

    fn start(&mut self, resolved: &ResolveResult, local_name: &[u8], name: &[u8]) -> Result<(), Error> {
        if let Some(foreign) = self.foreign.as_mut() {
            foreign.depth += 1;
            return Ok(());
        }
        if self.listing.is_some() {
            return Err(Error::TrailingContent);
        }

        match resolved {
            ResolveResult::Bound(NS_DAV) => {}
            ResolveResult::Unknown(prefix) => {
                return Err(Error::UnknownPrefix(
                    String::from_utf8_lossy(prefix).into_owned(),
                ));
            }
            ResolveResult::Bound(_) | ResolveResult::Unbound => {
                debug!("skipping element: {}", String::from_utf8_lossy(name));
                self.foreign = Some(ForeignElement {
                    name: name.to_vec(),
                    depth: 0,
                });
                return Ok(());
            }
        }

        let tag = Tag::from_local_name(local_name)
            .ok_or_else(|| Error::UnknownTag(String::from_utf8_lossy(local_name).into_owned()))?;
        let parent = self.top();
        if !parent.children().contains(tag) {
            return Err(Error::IncorrectTagOrder { tag, parent });
        }

        self.builder.start(tag);
        self.stack.push(tag);
        Ok(())
    }

    /// The reader checks that end tags match their start tags, so an end tag here always closes
    /// the innermost open element.
    fn end(&mut self, name: &[u8]) {
        if let Some(foreign) = self.foreign.as_mut() {
            if foreign.depth > 0 {
                foreign.depth -= 1;
            } else if foreign.name == name {
                self.foreign = None;
            }
            return;
        }

        if self.stack.len() > 1 {
            let tag = self.top();
            if let Some(listing) = self.builder.end(tag) {
                self.listing = Some(listing);
            }
            self.stack.pop();
        }
    }

    fn text(&mut self, text: &str) -> Result<(), Error> {
        if self.foreign.is_some() {
            return Ok(());
        }
        match self.top() {
            Tag::None if self.listing.is_some() => Err(Error::TrailingContent),
            Tag::None => Err(Error::TextOutsideRoot),
            tag => {
                self.builder.text(tag, text);
                Ok(())
            }
        }
    }

    fn finish(self) -> Result<Listing, Error> {
        if self.foreign.is_some() || self.stack.len() > 1 {
            return Err(Error::UnexpectedEof);
        }
        self.listing.ok_or(Error::MissingData("multistatus"))
    }
}

/// Parses the body of a reply to a `PROPFIND` request.
///
/// `current_path` is the path of the directory which was listed, e.g. `/dav/`. If it is not
/// known, the shortest `href` in the reply is assumed to be the listed directory; prefer passing
/// the path explicitly where possible.
///
/// Problems with single properties or responses do not abort parsing; they are reported in
/// [`Listing::errors`] instead.
///
/// # Errors
///
/// If the reply is not well-formed XML, contains an unknown `DAV:` element, or `DAV:` elements
/// nested in an unexpected order.
pub fn parse_propfind_reply(raw: &[u8], current_path: Option<&str>) -> Result<Listing, Error> {
    let mut reader = NsReader::from_reader(raw);
    reader.trim_text(true);
    let mut parser = MultistatusParser::new(current_path);

    loop {
        match reader.read_resolved_event()? {
            (resolved, Event::Start(element)) => {
                parser.start(&resolved, element.local_name().as_ref(), element.name().as_ref())?;
            }
            (resolved, Event::Empty(element)) => {
                parser.start(&resolved, element.local_name().as_ref(), element.name().as_ref())?;
                parser.end(element.name().as_ref());
            }
            (_, Event::End(element)) => {
                parser.end(element.name().as_ref());
            }
            (_, Event::Text(text)) => {
                parser.text(&text.unescape()?)?;
            }
            // Property values never use CDATA; escaped markup inside it must not be read as text.
            (_, Event::CData(_)) => {}
            (_, Event::Eof) => break,
            (_, event) => {
                debug!("ignored event: {:?}", event);
            }
        }
    }

    let listing = parser.finish()?;
    if let Some(message) = listing.error_message() {
        warn!(
            "{} problem(s) while parsing reply, last one: {message}",
            listing.errors.len()
        );
    }
    debug!("reply text:\n{}", String::from_utf8_lossy(raw));

    Ok(listing)
}
