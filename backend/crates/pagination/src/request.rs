//! Page request parsing from query strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Page size used when the client does not supply `size`.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound applied to client supplied page sizes.
pub const MAX_PAGE_SIZE: u32 = 2000;

const PAGE_PARAM: &str = "page";
const SIZE_PARAM: &str = "size";
const SORT_PARAM: &str = "sort";

/// Errors raised while interpreting pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// `page` was not a non-negative integer.
    #[error("page must be a non-negative integer, got `{value}`")]
    InvalidPage {
        /// Raw parameter value.
        value: String,
    },
    /// `size` was not a positive integer.
    #[error("size must be a positive integer, got `{value}`")]
    InvalidSize {
        /// Raw parameter value.
        value: String,
    },
    /// `sort` did not follow `property[,ASC|DESC]`.
    #[error("sort must look like `property[,ASC|DESC]`, got `{value}`")]
    InvalidSort {
        /// Raw parameter value.
        value: String,
    },
}

/// Ordering direction for a sort property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl Direction {
    /// Canonical upper-case spelling used in query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = PaginationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(PaginationError::InvalidSort {
                value: value.to_owned(),
            })
        }
    }
}

/// A single `property,direction` sort instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortOrder {
    property: String,
    direction: Direction,
}

impl SortOrder {
    /// Build a sort instruction for `property`.
    pub fn new(property: impl Into<String>, direction: Direction) -> Self {
        Self {
            property: property.into(),
            direction,
        }
    }

    /// Property name as supplied by the client.
    #[must_use]
    pub fn property(&self) -> &str {
        self.property.as_str()
    }

    /// Requested direction.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Parse one `sort` parameter value.
    ///
    /// `name,DESC` sorts by a single property. `name,location,DESC` applies
    /// the trailing direction to every listed property. A value without a
    /// recognised direction sorts ascending.
    ///
    /// # Errors
    /// Returns [`PaginationError::InvalidSort`] when a property is blank.
    pub fn parse_all(raw: &str) -> Result<Vec<Self>, PaginationError> {
        let invalid = || PaginationError::InvalidSort {
            value: raw.to_owned(),
        };
        let mut parts: Vec<&str> = raw.split(',').map(str::trim).collect();
        let direction = match parts.last().map(|last| last.parse::<Direction>()) {
            Some(Ok(direction)) if parts.len() > 1 => {
                parts.pop();
                direction
            }
            _ => Direction::Asc,
        };

        if parts.is_empty() || parts.iter().any(|part| part.is_empty()) {
            return Err(invalid());
        }

        Ok(parts
            .into_iter()
            .map(|property| Self::new(property, direction))
            .collect())
    }

    fn query_value(&self) -> String {
        format!("{},{}", self.property, self.direction)
    }
}

/// Validated `page`/`size`/`sort` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
    sort: Vec<SortOrder>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Vec::new(),
        }
    }
}

impl PageRequest {
    /// Build a request for the zero-based `page` of `size` elements.
    ///
    /// Sizes above [`MAX_PAGE_SIZE`] are clamped.
    ///
    /// # Errors
    /// Returns [`PaginationError::InvalidSize`] when `size` is zero.
    pub fn new(page: u32, size: u32) -> Result<Self, PaginationError> {
        if size == 0 {
            return Err(PaginationError::InvalidSize {
                value: size.to_string(),
            });
        }
        Ok(Self {
            page,
            size: size.min(MAX_PAGE_SIZE),
            sort: Vec::new(),
        })
    }

    /// Replace the sort instructions.
    #[must_use]
    pub fn with_sort(mut self, sort: Vec<SortOrder>) -> Self {
        self.sort = sort;
        self
    }

    /// Parse `page`, `size` and repeated `sort` parameters from a raw query
    /// string. Unrelated parameters are ignored.
    ///
    /// # Errors
    /// Returns a [`PaginationError`] naming the first malformed parameter.
    pub fn from_query(query: &str) -> Result<Self, PaginationError> {
        let mut page = 0;
        let mut size = DEFAULT_PAGE_SIZE;
        let mut sort = Vec::new();

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                PAGE_PARAM => {
                    page = value
                        .trim()
                        .parse::<u32>()
                        .map_err(|_| PaginationError::InvalidPage {
                            value: value.clone().into_owned(),
                        })?;
                }
                SIZE_PARAM => {
                    size = value
                        .trim()
                        .parse::<u32>()
                        .map_err(|_| PaginationError::InvalidSize {
                            value: value.clone().into_owned(),
                        })?;
                }
                SORT_PARAM if !value.trim().is_empty() => {
                    sort.extend(SortOrder::parse_all(value.as_ref())?);
                }
                _ => {}
            }
        }

        Ok(Self::new(page, size)?.with_sort(sort))
    }

    /// Zero-based page index.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of elements per page.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Sort instructions in priority order.
    #[must_use]
    pub fn sort(&self) -> &[SortOrder] {
        self.sort.as_slice()
    }

    /// Number of elements preceding the requested page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64) * (self.size as u64)
    }

    /// Copy of this request pointing at another page.
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            size: self.size,
            sort: self.sort.clone(),
        }
    }

    /// Encode the request back into query pairs, preserving sort order.
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            (PAGE_PARAM, self.page.to_string()),
            (SIZE_PARAM, self.size.to_string()),
        ];
        pairs.extend(
            self.sort
                .iter()
                .map(|order| (SORT_PARAM, order.query_value())),
        );
        pairs
    }
}

#[cfg(test)]
mod tests {
    //! Query parsing behaviour.

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn empty_query_uses_defaults() {
        let request = PageRequest::from_query("").expect("defaults parse");
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.size(), DEFAULT_PAGE_SIZE);
        assert_eq!(request.offset(), 0);
    }

    #[rstest]
    fn parses_page_size_and_sort() {
        let request =
            PageRequest::from_query("page=1&size=10&sort=name,DESC").expect("query parses");
        assert_eq!(request.page(), 1);
        assert_eq!(request.size(), 10);
        assert_eq!(request.offset(), 10);
        assert_eq!(request.sort(), &[SortOrder::new("name", Direction::Desc)]);
    }

    #[rstest]
    fn repeated_sort_parameters_keep_priority() {
        let request = PageRequest::from_query("sort=basePrice,desc&sort=id")
            .expect("repeated sort parses");
        assert_eq!(
            request.sort(),
            &[
                SortOrder::new("basePrice", Direction::Desc),
                SortOrder::new("id", Direction::Asc),
            ]
        );
    }

    #[rstest]
    fn trailing_direction_applies_to_every_property() {
        let orders = SortOrder::parse_all("name,location,DESC").expect("sort parses");
        assert_eq!(
            orders,
            vec![
                SortOrder::new("name", Direction::Desc),
                SortOrder::new("location", Direction::Desc),
            ]
        );
    }

    #[rstest]
    fn encoded_comma_is_accepted() {
        let request = PageRequest::from_query("sort=name%2CDESC").expect("encoded sort parses");
        assert_eq!(request.sort(), &[SortOrder::new("name", Direction::Desc)]);
    }

    #[rstest]
    fn oversized_pages_are_clamped() {
        let request = PageRequest::from_query("size=50000").expect("size parses");
        assert_eq!(request.size(), MAX_PAGE_SIZE);
    }

    #[rstest]
    #[case("page=-1", PaginationError::InvalidPage { value: "-1".to_owned() })]
    #[case("page=first", PaginationError::InvalidPage { value: "first".to_owned() })]
    #[case("size=0", PaginationError::InvalidSize { value: "0".to_owned() })]
    #[case("size=ten", PaginationError::InvalidSize { value: "ten".to_owned() })]
    #[case("sort=,DESC", PaginationError::InvalidSort { value: ",DESC".to_owned() })]
    fn malformed_parameters_are_rejected(#[case] query: &str, #[case] expected: PaginationError) {
        let error = PageRequest::from_query(query).expect_err("query should be rejected");
        assert_eq!(error, expected);
    }

    #[rstest]
    fn unrelated_parameters_are_ignored() {
        let request = PageRequest::from_query("q=spring&page=2").expect("query parses");
        assert_eq!(request.page(), 2);
    }

    #[rstest]
    fn query_pairs_round_trip_the_request() {
        let request = PageRequest::new(3, 5)
            .expect("valid request")
            .with_sort(vec![SortOrder::new("name", Direction::Desc)]);
        assert_eq!(
            request.query_pairs(),
            vec![
                ("page", "3".to_owned()),
                ("size", "5".to_owned()),
                ("sort", "name,DESC".to_owned()),
            ]
        );
    }
}
