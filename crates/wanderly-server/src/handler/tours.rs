//! Tour, tour type and division handlers.

use std::collections::HashMap;

use axum::Router;
use axum::routing::{get, patch, post};
use serde_json::Value;

use crate::action::{ActionResult, reviews, tours};
use crate::extract::{FormInput, Path, Query, Session};
use crate::model::{Division, Review, Tour, TourType};
use crate::service::ServiceState;

#[tracing::instrument(skip_all)]
async fn list_tours(
    mut session: Session,
    Query(query): Query<HashMap<String, String>>,
) -> (Session, ActionResult<Vec<Tour>>) {
    let result = tours::list_tours(&mut session, &query).await;
    (session, result)
}

#[tracing::instrument(skip_all)]
async fn get_tour(
    mut session: Session,
    Path(tour_id): Path<String>,
) -> (Session, ActionResult<Tour>) {
    let result = tours::get_tour(&mut session, &tour_id).await;
    (session, result)
}

#[tracing::instrument(skip_all)]
async fn create_tour(
    mut session: Session,
    FormInput(values): FormInput,
) -> (Session, ActionResult<Tour>) {
    let result = tours::create_tour(&mut session, &values).await;
    (session, result)
}

#[tracing::instrument(skip_all)]
async fn update_tour(
    mut session: Session,
    Path(tour_id): Path<String>,
    FormInput(values): FormInput,
) -> (Session, ActionResult<Tour>) {
    let result = tours::update_tour(&mut session, &tour_id, &values).await;
    (session, result)
}

#[tracing::instrument(skip_all)]
async fn delete_tour(
    mut session: Session,
    Path(tour_id): Path<String>,
) -> (Session, ActionResult<Value>) {
    let result = tours::delete_tour(&mut session, &tour_id).await;
    (session, result)
}

#[tracing::instrument(skip_all)]
async fn tour_reviews(
    mut session: Session,
    Path(tour_id): Path<String>,
) -> (Session, ActionResult<Vec<Review>>) {
    let result = reviews::tour_reviews(&mut session, &tour_id).await;
    (session, result)
}

#[tracing::instrument(skip_all)]
async fn list_tour_types(mut session: Session) -> (Session, ActionResult<Vec<TourType>>) {
    let result = tours::list_tour_types(&mut session).await;
    (session, result)
}

#[tracing::instrument(skip_all)]
async fn create_tour_type(
    mut session: Session,
    FormInput(values): FormInput,
) -> (Session, ActionResult<TourType>) {
    let result = tours::create_tour_type(&mut session, &values).await;
    (session, result)
}

#[tracing::instrument(skip_all)]
async fn list_divisions(mut session: Session) -> (Session, ActionResult<Vec<Division>>) {
    let result = tours::list_divisions(&mut session).await;
    (session, result)
}

#[tracing::instrument(skip_all)]
async fn create_division(
    mut session: Session,
    FormInput(values): FormInput,
) -> (Session, ActionResult<Division>) {
    let result = tours::create_division(&mut session, &values).await;
    (session, result)
}

/// Returns a [`Router`] with the read-only routes.
pub fn public_routes() -> Router<ServiceState> {
    Router::new()
        .route("/actions/tours", get(list_tours))
        .route("/actions/tours/{tour_id}", get(get_tour))
        .route("/actions/tours/{tour_id}/reviews", get(tour_reviews))
        .route("/actions/tour-types", get(list_tour_types))
        .route("/actions/divisions", get(list_divisions))
}

/// Returns a [`Router`] with the routes that need a session.
pub fn private_routes() -> Router<ServiceState> {
    Router::new()
        .route("/actions/tours", post(create_tour))
        .route("/actions/tours/{tour_id}", patch(update_tour).delete(delete_tour))
        .route("/actions/tour-types", post(create_tour_type))
        .route("/actions/divisions", post(create_division))
}
