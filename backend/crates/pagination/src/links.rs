//! Navigation links between pages of a collection.

use url::Url;

use crate::metadata::PageMetadata;
use crate::request::PageRequest;

/// A relation name paired with the page it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    /// Link relation (`first`, `prev`, `self`, `next` or `last`).
    pub rel: &'static str,
    /// Absolute reference to the page.
    pub href: Url,
}

/// Ordered set of page navigation links.
///
/// `self` is always present. `first` and `last` appear once the collection
/// spans more than one page, `prev` and `next` only when such a page exists.
/// Every link repeats the request's `size` and `sort` parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLinks {
    links: Vec<PageLink>,
}

impl PageLinks {
    /// Build the links for the page addressed by `request`.
    ///
    /// Any query already present on `base` is replaced.
    #[must_use]
    pub fn build(base: &Url, request: &PageRequest, metadata: &PageMetadata) -> Self {
        let navigable = metadata.total_pages > 1;
        let mut links = Vec::with_capacity(5);

        if navigable {
            links.push(page_link("first", base, request, 0));
        }
        if metadata.has_previous() {
            links.push(page_link("prev", base, request, request.page().saturating_sub(1)));
        }
        links.push(page_link("self", base, request, request.page()));
        if metadata.has_next() {
            links.push(page_link("next", base, request, request.page().saturating_add(1)));
        }
        if navigable {
            links.push(page_link("last", base, request, metadata.last_page()));
        }

        Self { links }
    }

    /// Look up a link by relation name.
    #[must_use]
    pub fn get(&self, rel: &str) -> Option<&Url> {
        self.links
            .iter()
            .find(|link| link.rel == rel)
            .map(|link| &link.href)
    }

    /// Iterate over links in `first`, `prev`, `self`, `next`, `last` order.
    pub fn iter(&self) -> impl Iterator<Item = &PageLink> {
        self.links.iter()
    }
}

impl IntoIterator for PageLinks {
    type Item = PageLink;
    type IntoIter = std::vec::IntoIter<PageLink>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.into_iter()
    }
}

fn page_link(rel: &'static str, base: &Url, request: &PageRequest, page: u32) -> PageLink {
    let mut href = base.clone();
    href.set_query(None);
    {
        let mut pairs = href.query_pairs_mut();
        for (key, value) in request.with_page(page).query_pairs() {
            pairs.append_pair(key, value.as_str());
        }
    }
    PageLink { rel, href }
}
