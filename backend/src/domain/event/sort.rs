//! Paging and ordering of event listings.

use std::str::FromStr;

use pagination::{Direction, PageRequest, SortOrder};

use super::Event;
use crate::domain::Error;

/// Event properties clients may sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSortField {
    Id,
    Name,
    BeginEnrollmentDateTime,
    CloseEnrollmentDateTime,
    BeginEventDateTime,
    EndEventDateTime,
    BasePrice,
    MaxPrice,
    LimitOfEnrollment,
    EventStatus,
}

impl EventSortField {
    /// Property name as it appears in payloads and `sort` parameters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::BeginEnrollmentDateTime => "beginEnrollmentDateTime",
            Self::CloseEnrollmentDateTime => "closeEnrollmentDateTime",
            Self::BeginEventDateTime => "beginEventDateTime",
            Self::EndEventDateTime => "endEventDateTime",
            Self::BasePrice => "basePrice",
            Self::MaxPrice => "maxPrice",
            Self::LimitOfEnrollment => "limitOfEnrollment",
            Self::EventStatus => "eventStatus",
        }
    }
}

impl FromStr for EventSortField {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let field = match value {
            "id" => Self::Id,
            "name" => Self::Name,
            "beginEnrollmentDateTime" => Self::BeginEnrollmentDateTime,
            "closeEnrollmentDateTime" => Self::CloseEnrollmentDateTime,
            "beginEventDateTime" => Self::BeginEventDateTime,
            "endEventDateTime" => Self::EndEventDateTime,
            "basePrice" => Self::BasePrice,
            "maxPrice" => Self::MaxPrice,
            "limitOfEnrollment" => Self::LimitOfEnrollment,
            "eventStatus" => Self::EventStatus,
            other => {
                return Err(Error::invalid_request(format!(
                    "cannot sort events by `{other}`"
                )));
            }
        };
        Ok(field)
    }
}

/// One resolved ordering instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSort {
    pub field: EventSortField,
    pub direction: Direction,
}

/// Offset/limit query handed to repositories.
///
/// The ordering always ends on `id` so pages are stable even when the
/// requested properties tie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPageQuery {
    pub offset: u64,
    pub limit: u32,
    pub sort: Vec<EventSort>,
}

impl EventPageQuery {
    /// Resolve a client page request against the sortable event properties.
    ///
    /// # Errors
    /// Returns an `invalid_request` error naming the first unknown property.
    pub fn from_request(request: &PageRequest) -> Result<Self, Error> {
        let mut sort = request
            .sort()
            .iter()
            .map(resolve)
            .collect::<Result<Vec<_>, _>>()?;
        if !sort.iter().any(|order| order.field == EventSortField::Id) {
            sort.push(EventSort {
                field: EventSortField::Id,
                direction: Direction::Asc,
            });
        }
        Ok(Self {
            offset: request.offset(),
            limit: request.size(),
            sort,
        })
    }
}

fn resolve(order: &SortOrder) -> Result<EventSort, Error> {
    Ok(EventSort {
        field: order.property().parse()?,
        direction: order.direction(),
    })
}

/// One page of events plus the size of the whole collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventPage {
    pub events: Vec<Event>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn default_request_sorts_by_id() {
        let query = EventPageQuery::from_request(&PageRequest::default()).expect("resolves");
        assert_eq!(query.offset, 0);
        assert_eq!(query.limit, 20);
        assert_eq!(
            query.sort,
            vec![EventSort {
                field: EventSortField::Id,
                direction: Direction::Asc,
            }]
        );
    }

    #[rstest]
    fn requested_order_is_kept_ahead_of_the_tie_breaker() {
        let request = PageRequest::from_query("page=1&size=10&sort=name,DESC").expect("parses");
        let query = EventPageQuery::from_request(&request).expect("resolves");
        assert_eq!(query.offset, 10);
        assert_eq!(
            query.sort,
            vec![
                EventSort {
                    field: EventSortField::Name,
                    direction: Direction::Desc,
                },
                EventSort {
                    field: EventSortField::Id,
                    direction: Direction::Asc,
                },
            ]
        );
    }

    #[rstest]
    fn explicit_id_order_is_not_duplicated() {
        let request = PageRequest::from_query("sort=id,DESC").expect("parses");
        let query = EventPageQuery::from_request(&request).expect("resolves");
        assert_eq!(query.sort.len(), 1);
    }

    #[rstest]
    #[case("location")]
    #[case("free")]
    #[case("NAME")]
    fn unknown_properties_are_rejected(#[case] property: &str) {
        let request = PageRequest::default().with_sort(vec![SortOrder::new(property, Direction::Asc)]);
        let err = EventPageQuery::from_request(&request).expect_err("property is not sortable");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn every_field_parses_from_its_name() {
        for field in [
            EventSortField::Id,
            EventSortField::Name,
            EventSortField::BeginEnrollmentDateTime,
            EventSortField::CloseEnrollmentDateTime,
            EventSortField::BeginEventDateTime,
            EventSortField::EndEventDateTime,
            EventSortField::BasePrice,
            EventSortField::MaxPrice,
            EventSortField::LimitOfEnrollment,
            EventSortField::EventStatus,
        ] {
            assert_eq!(field.as_str().parse::<EventSortField>(), Ok(field));
        }
    }
}
