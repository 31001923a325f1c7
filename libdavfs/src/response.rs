// Copyright 2023 Hugo Osvaldo Barrera
//
// SPDX-License-Identifier: EUPL-1.2

//! Building [`FilesystemEntry`] values out of `DAV:response` nodes.
//!
//! A single response may contain several `propstat` blocks, each one pairing some properties
//! with a status line. The status line may come before or after the properties it applies to, so
//! properties are stamped with [`PropertyStatus::Unknown`] until their block is closed.

use log::warn;

use crate::entry::{EntryKind, FilesystemEntry, PropertyStatus};
use crate::listing::{Listing, SoftError};
use crate::names::Tag;
use crate::time::{self, Format};
use crate::xmlutils::{classify_statusline, extract_name, unquote_href};

/// A property value paired with the status the server returned for it.
#[derive(Debug, Default)]
struct Property<T> {
    status: PropertyStatus,
    value: T,
}

impl<T> Property<T> {
    /// Replaces an unknown status with that of the enclosing `propstat` block.
    fn inherit(&mut self, block_status: PropertyStatus) {
        if self.status == PropertyStatus::Unknown {
            self.status = block_status;
        }
    }

    fn is_ok(&self) -> bool {
        self.status == PropertyStatus::Ok
    }
}

impl Property<Option<i64>> {
    /// Returns the value only if the server returned it successfully.
    fn trusted(&self) -> Option<i64> {
        self.value.filter(|_| self.is_ok())
    }
}

/// Working state for the `DAV:response` currently being read.
#[derive(Debug, Default)]
struct ResponseCandidate {
    /// Decoded path from the `href` node.
    path: Option<String>,
    /// Set if the `href` could not be decoded. That error has already been recorded.
    href_rejected: bool,
    kind: Property<EntryKind>,
    creation: Property<Option<i64>>,
    modification: Property<Option<i64>>,
}

impl ResponseCandidate {
    fn end_propstat(&mut self, block_status: PropertyStatus) {
        self.kind.inherit(block_status);
        self.creation.inherit(block_status);
        self.modification.inherit(block_status);
    }

    /// Turns this candidate into an entry, paired with its path.
    fn build(self) -> Result<(String, FilesystemEntry), SoftError> {
        if !self.kind.is_ok() {
            return Err(SoftError::UnresolvedResourceType {
                href: self.path.unwrap_or_default(),
                status: self.kind.status,
            });
        }
        let path = self.path.ok_or(SoftError::MissingHref)?;
        let entry = FilesystemEntry {
            name: extract_name(&path).to_string(),
            kind: self.kind.value,
            creation_time: self.creation.trusted(),
            modification_time: self.modification.trusted(),
        };

        Ok((path, entry))
    }
}

/// Receives the events of a `multistatus` document and accumulates entries.
///
/// The caller is responsible for validating the order of tags; this type only tracks the state
/// needed to build entries.
#[derive(Debug)]
pub(crate) struct ResponseBuilder {
    current_path: Option<String>,
    candidate: ResponseCandidate,
    /// Status of the `propstat` block currently open.
    propstat_status: PropertyStatus,
    entries: Vec<(String, FilesystemEntry)>,
    /// Shortest href seen so far.
    implied_path: Option<String>,
    errors: Vec<SoftError>,
}

impl ResponseBuilder {
    pub(crate) fn new(current_path: Option<&str>) -> ResponseBuilder {
        ResponseBuilder {
            current_path: current_path.map(str::to_string),
            candidate: ResponseCandidate::default(),
            propstat_status: PropertyStatus::None,
            entries: Vec::new(),
            implied_path: None,
            errors: Vec::new(),
        }
    }

    fn set_error(&mut self, error: SoftError) {
        warn!("{error}");
        self.errors.push(error);
    }

    pub(crate) fn start(&mut self, tag: Tag) {
        match tag {
            Tag::Response => self.candidate = ResponseCandidate::default(),
            Tag::PropStat => self.propstat_status = PropertyStatus::Unknown,
            Tag::ResourceType => self.candidate.kind.status = self.propstat_status,
            Tag::CreationDate => self.candidate.creation.status = self.propstat_status,
            Tag::GetLastModified => self.candidate.modification.status = self.propstat_status,
            Tag::Collection => self.candidate.kind.value = EntryKind::Directory,
            Tag::None | Tag::Multistatus | Tag::Prop | Tag::Href | Tag::Status => {}
        }
    }

    /// Handles the end of an element.
    ///
    /// Returns the finished listing once the `multistatus` element is closed.
    pub(crate) fn end(&mut self, tag: Tag) -> Option<Listing> {
        match tag {
            Tag::PropStat => {
                self.candidate.end_propstat(self.propstat_status);
                self.propstat_status = PropertyStatus::None;
            }
            Tag::Response => {
                let candidate = std::mem::take(&mut self.candidate);
                if candidate.href_rejected {
                    return None;
                }
                match candidate.build() {
                    Ok(entry) => self.entries.push(entry),
                    Err(err) => self.set_error(err),
                }
            }
            Tag::Multistatus => {
                let directory_path = self.current_path.take().or(self.implied_path.take());
                return Some(Listing::assemble(
                    std::mem::take(&mut self.entries),
                    directory_path,
                    std::mem::take(&mut self.errors),
                ));
            }
            _ => {}
        }

        None
    }

    pub(crate) fn text(&mut self, tag: Tag, text: &str) {
        match tag {
            Tag::Href => self.href(text),
            Tag::Status => self.propstat_status = classify_statusline(text),
            Tag::CreationDate => match time::parse(text, Format::Rfc3339) {
                Ok(t) => self.candidate.creation.value = Some(t),
                Err(source) => self.set_error(SoftError::Timestamp {
                    property: tag,
                    source,
                }),
            },
            Tag::GetLastModified => match time::parse(text, Format::Rfc2616) {
                Ok(t) => self.candidate.modification.value = Some(t),
                Err(source) => self.set_error(SoftError::Timestamp {
                    property: tag,
                    source,
                }),
            },
            _ => {}
        }
    }

    fn href(&mut self, text: &str) {
        let path = match unquote_href(text) {
            Ok(path) => path.into_owned(),
            Err(err) => {
                self.candidate.href_rejected = true;
                self.set_error(SoftError::from(err));
                return;
            }
        };
        if self
            .implied_path
            .as_ref()
            .map_or(true, |implied| implied.len() > path.len())
        {
            self.implied_path = Some(path.clone());
        }
        self.candidate.path = Some(path);
    }
}
