//! Offset pagination primitives shared by collection endpoints.
//!
//! Collection handlers accept `page`, `size` and repeatable `sort` query
//! parameters. [`PageRequest`] parses and validates them, [`PageMetadata`]
//! summarises the resulting slice, and [`PageLinks`] renders the
//! `first`/`prev`/`self`/`next`/`last` navigation references that hypermedia
//! responses embed.
//!
//! ```
//! use pagination::{Direction, PageMetadata, PageRequest};
//!
//! let request = PageRequest::from_query("page=1&size=10&sort=name,DESC")?;
//! assert_eq!(request.offset(), 10);
//! assert_eq!(request.sort()[0].direction(), Direction::Desc);
//!
//! let metadata = PageMetadata::new(&request, 30);
//! assert_eq!(metadata.total_pages, 3);
//! # Ok::<(), pagination::PaginationError>(())
//! ```

mod links;
mod metadata;
mod request;

pub use links::{PageLink, PageLinks};
pub use metadata::PageMetadata;
pub use request::{
    DEFAULT_PAGE_SIZE, Direction, MAX_PAGE_SIZE, PageRequest, PaginationError, SortOrder,
};
