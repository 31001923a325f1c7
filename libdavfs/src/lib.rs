// Copyright 2023 Hugo Osvaldo Barrera
//
// SPDX-License-Identifier: EUPL-1.2

//! This library decodes WebDav directory listings.
//!
//! A client lists a directory by sending a `PROPFIND` request with `Depth: 1`, asking for the
//! `resourcetype`, `creationdate` and `getlastmodified` properties. The server replies with a
//! `multistatus` document containing one `response` for the directory itself and one for each
//! of its children. [`parse_propfind_reply`] turns the body of that reply into a [`Listing`].
//!
//! Sending the request is out of scope for this crate.
//!
//! ```
//! let raw = br#"
//! <d:multistatus xmlns:d="DAV:">
//!   <d:response>
//!     <d:href>/dav/</d:href>
//!     <d:propstat>
//!       <d:prop><d:resourcetype><d:collection/></d:resourcetype></d:prop>
//!       <d:status>HTTP/1.1 200 OK</d:status>
//!     </d:propstat>
//!   </d:response>
//!   <d:response>
//!     <d:href>/dav/notes.txt</d:href>
//!     <d:propstat>
//!       <d:prop>
//!         <d:resourcetype/>
//!         <d:getlastmodified>Sun, 06 Nov 1994 08:49:37 GMT</d:getlastmodified>
//!       </d:prop>
//!       <d:status>HTTP/1.1 200 OK</d:status>
//!     </d:propstat>
//!   </d:response>
//! </d:multistatus>"#;
//!
//! let listing = libdavfs::parse_propfind_reply(raw, Some("/dav/")).unwrap();
//! assert_eq!(listing.current_directory.unwrap().name, "dav");
//! assert_eq!(listing.children[0].name, "notes.txt");
//! assert_eq!(listing.children[0].modification_time, Some(784_111_777));
//! ```

pub mod entry;
pub mod listing;
pub mod names;
mod response;
pub mod time;
pub mod xml;
pub mod xmlutils;

pub use entry::{EntryKind, FilesystemEntry, PropertyStatus};
pub use listing::{Listing, SoftError};
pub use xml::{parse_propfind_reply, Error};
