// Copyright 2023 Hugo Osvaldo Barrera
//
// SPDX-License-Identifier: EUPL-1.2

//! Names of the dav elements understood when listing a directory.
//!
//! Only a small subset of the `DAV:` vocabulary is relevant to a `PROPFIND` listing. Each name
//! maps to a [`Tag`], and [`Tag::children`] describes which tags may appear directly beneath it.
//! Together they describe the expected shape of a `multistatus` reply without a schema
//! validator.

use std::fmt;

/// Namespace for properties defined in the WebDav specifications.
pub const DAV: &str = "DAV:";

/// An element of the `DAV:` namespace that may appear in a `PROPFIND` reply.
///
/// [`Tag::None`] is a synthetic root which sits above the document element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    None,
    Multistatus,
    Response,
    PropStat,
    Prop,
    Href,
    ResourceType,
    CreationDate,
    GetLastModified,
    Collection,
    Status,
}

/// A set of [`Tag`]s, stored as a bitmask.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TagSet(u16);

impl TagSet {
    pub const EMPTY: TagSet = TagSet(0);

    const fn of(tags: &[Tag]) -> TagSet {
        let mut bits = 0;
        let mut i = 0;
        while i < tags.len() {
            bits |= tags[i].bit();
            i += 1;
        }
        TagSet(bits)
    }

    #[must_use]
    pub const fn contains(self, tag: Tag) -> bool {
        self.0 & tag.bit() != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(Tag::ALL.iter().filter(|t| self.contains(**t)))
            .finish()
    }
}

/// Allowed children for each tag, indexed by `Tag as usize`.
const GRAMMAR: [TagSet; Tag::ALL.len()] = [
    // None
    TagSet::of(&[Tag::Multistatus]),
    // Multistatus
    TagSet::of(&[Tag::Response]),
    // Response
    TagSet::of(&[Tag::Href, Tag::PropStat]),
    // PropStat
    TagSet::of(&[Tag::Prop, Tag::Status]),
    // Prop
    TagSet::of(&[Tag::ResourceType, Tag::CreationDate, Tag::GetLastModified]),
    // Href
    TagSet::EMPTY,
    // ResourceType
    TagSet::of(&[Tag::Collection]),
    // CreationDate
    TagSet::EMPTY,
    // GetLastModified
    TagSet::EMPTY,
    // Collection
    TagSet::EMPTY,
    // Status
    TagSet::EMPTY,
];

impl Tag {
    pub const ALL: [Tag; 11] = [
        Tag::None,
        Tag::Multistatus,
        Tag::Response,
        Tag::PropStat,
        Tag::Prop,
        Tag::Href,
        Tag::ResourceType,
        Tag::CreationDate,
        Tag::GetLastModified,
        Tag::Collection,
        Tag::Status,
    ];

    const fn bit(self) -> u16 {
        1 << self as u16
    }

    /// Resolves the local name of a `DAV:` element.
    ///
    /// Names are case-sensitive. Returns `None` for names outside of the known vocabulary.
    #[must_use]
    pub fn from_local_name(name: &[u8]) -> Option<Tag> {
        let tag = match name {
            b"multistatus" => Tag::Multistatus,
            b"response" => Tag::Response,
            b"propstat" => Tag::PropStat,
            b"prop" => Tag::Prop,
            b"href" => Tag::Href,
            b"resourcetype" => Tag::ResourceType,
            b"creationdate" => Tag::CreationDate,
            b"getlastmodified" => Tag::GetLastModified,
            b"collection" => Tag::Collection,
            b"status" => Tag::Status,
            _ => return None,
        };
        Some(tag)
    }

    /// The local name of this element, as it appears on the wire.
    #[must_use]
    pub const fn local_name(self) -> &'static str {
        match self {
            Tag::None => "",
            Tag::Multistatus => "multistatus",
            Tag::Response => "response",
            Tag::PropStat => "propstat",
            Tag::Prop => "prop",
            Tag::Href => "href",
            Tag::ResourceType => "resourcetype",
            Tag::CreationDate => "creationdate",
            Tag::GetLastModified => "getlastmodified",
            Tag::Collection => "collection",
            Tag::Status => "status",
        }
    }

    /// Tags which may appear directly beneath this one.
    #[must_use]
    pub const fn children(self) -> TagSet {
        GRAMMAR[self as usize]
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::None => f.write_str("(document root)"),
            tag => write!(f, "{DAV}{}", tag.local_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Tag, TagSet};

    #[test]
    fn test_local_names_roundtrip() {
        for tag in Tag::ALL.into_iter().skip(1) {
            assert_eq!(Tag::from_local_name(tag.local_name().as_bytes()), Some(tag));
        }
        assert_eq!(Tag::from_local_name(b""), None);
        assert_eq!(Tag::from_local_name(b"getetag"), None);
        assert_eq!(Tag::from_local_name(b"Response"), None);
    }

    #[test]
    fn test_grammar() {
        assert!(Tag::None.children().contains(Tag::Multistatus));
        assert!(!Tag::None.children().contains(Tag::Response));

        assert!(Tag::Multistatus.children().contains(Tag::Response));
        assert!(!Tag::Multistatus.children().contains(Tag::Href));

        let response = Tag::Response.children();
        assert!(response.contains(Tag::Href));
        assert!(response.contains(Tag::PropStat));
        assert!(!response.contains(Tag::Status));

        // `prop` and `status` are siblings in any order.
        let propstat = Tag::PropStat.children();
        assert!(propstat.contains(Tag::Prop));
        assert!(propstat.contains(Tag::Status));

        let prop = Tag::Prop.children();
        assert!(prop.contains(Tag::ResourceType));
        assert!(prop.contains(Tag::CreationDate));
        assert!(prop.contains(Tag::GetLastModified));
        assert!(!prop.contains(Tag::Collection));

        assert_eq!(
            Tag::ResourceType.children(),
            TagSet::of(&[Tag::Collection])
        );
        for leaf in [
            Tag::Href,
            Tag::CreationDate,
            Tag::GetLastModified,
            Tag::Collection,
            Tag::Status,
        ] {
            assert!(leaf.children().is_empty(), "{leaf} should be a leaf");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Tag::PropStat.to_string(), "DAV:propstat");
        assert_eq!(Tag::None.to_string(), "(document root)");
    }
}
