//! Public tour pages.

use std::collections::HashMap;

use serde::Serialize;

use super::{FALLBACK_MESSAGE, FanIn, Page, Settled};
use crate::action::{resource_id, with_filters};
use crate::extract::Session;
use crate::model::{Division, Meta, Review, Tour, TourType};
use crate::service::{ApiCall, CacheTag};

/// Query parameters the catalogue forwards to the tour listing.
const CATALOGUE_FILTERS: &[&str] = &[
    "page",
    "limit",
    "sort",
    "searchTerm",
    "division",
    "tourType",
    "location",
    "minPrice",
    "maxPrice",
];

/// Tour listing with the filter options next to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalogue {
    pub tours: Vec<Tour>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    pub tour_types: Vec<TourType>,
    pub divisions: Vec<Division>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourDetail {
    pub tour: Tour,
    pub reviews: Vec<Review>,
}

pub async fn catalogue(session: &mut Session, query: &HashMap<String, String>) -> Page<Catalogue> {
    let tours_call =
        with_filters(ApiCall::get("tour"), query, CATALOGUE_FILTERS).cached(&[CacheTag::Tours]);
    let types_call = ApiCall::get("tour/tour-types").cached(&[CacheTag::TourTypes]);
    let divisions_call = ApiCall::get("division").cached(&[CacheTag::Divisions]);

    for attempt in 0..=1 {
        let (tours, tour_types, divisions) = tokio::join!(
            session.fetch::<Vec<Tour>>(&tours_call),
            session.fetch::<Vec<TourType>>(&types_call),
            session.fetch::<Vec<Division>>(&divisions_call),
        );

        let meta = tours.as_ref().ok().and_then(|success| success.meta);
        let mut fan_in = FanIn::new();
        let tours = fan_in.required("tours", tours);
        let tour_types = fan_in.optional("tour_types", tour_types);
        let divisions = fan_in.optional("divisions", divisions);

        match fan_in.settle(session, attempt).await {
            Settled::Retry => continue,
            Settled::Halt(halt) => return halt.into(),
            Settled::Ready => {}
        }

        let Some(tours) = tours else {
            break;
        };
        return Page::Ready(Catalogue {
            tours,
            meta,
            tour_types,
            divisions,
        });
    }

    Page::unavailable(FALLBACK_MESSAGE)
}

/// One tour, looked up by slug or id, with its reviews if available.
pub async fn tour_detail(session: &mut Session, slug: &str) -> Page<TourDetail> {
    let Ok(slug) = resource_id(slug, "tour") else {
        return Page::redirect("/tours");
    };

    let tour_call = ApiCall::get(format!("tour/{slug}")).cached(&[CacheTag::Tours]);
    let reviews_call = ApiCall::get(format!("review/tour/{slug}")).cached(&[CacheTag::Reviews]);

    for attempt in 0..=1 {
        let (tour, reviews) = tokio::join!(
            session.fetch::<Tour>(&tour_call),
            session.fetch::<Vec<Review>>(&reviews_call),
        );

        let mut fan_in = FanIn::new();
        let tour = fan_in.required("tour", tour);
        let reviews = fan_in.optional("reviews", reviews);

        match fan_in.settle(session, attempt).await {
            Settled::Retry => continue,
            Settled::Halt(halt) => return halt.into(),
            Settled::Ready => {}
        }

        let Some(tour) = tour else {
            break;
        };
        return Page::Ready(TourDetail { tour, reviews });
    }

    Page::unavailable(FALLBACK_MESSAGE)
}
