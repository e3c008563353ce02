//! Catalog routes.
//!
//! ```text
//! POST /cars/add      body: Car        → 201 Car
//! GET  /cars          ?q&location&category&minPrice&maxPrice&sort → [Car]
//! GET  /cars/{id}                      → Car | 404
//! ```

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use carhire_core::validation::{validate_car, validate_search_query};
use carhire_core::{filter_cars, Car, CatalogSort, Money, SearchCriteria};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cars", get(list_cars))
        .route("/cars/add", post(add_car))
        .route("/cars/{id}", get(get_car))
}

/// Search parameters. Prices are whole currency units per day; a missing
/// bound leaves that side of the range open.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    #[serde(default)]
    pub sort: CatalogSort,
}

impl CatalogQuery {
    fn criteria(&self) -> ApiResult<SearchCriteria> {
        let query = validate_search_query(&self.q)?;
        let min = match self.min_price {
            Some(units) => price_bound("minPrice", units)?,
            None => Money::zero(),
        };
        let max = match self.max_price {
            Some(units) => price_bound("maxPrice", units)?,
            None => Money::from_cents(i64::MAX),
        };
        if min > max {
            return Err(ApiError::BadRequest(
                "minPrice must not exceed maxPrice".to_string(),
            ));
        }

        Ok(SearchCriteria::default()
            .with_query(query)
            .with_location(self.location.trim())
            .with_category(self.category.clone())
            .with_price_range(min, max))
    }
}

fn price_bound(param: &str, units: i64) -> ApiResult<Money> {
    Money::checked_from_major(units)
        .ok_or_else(|| ApiError::BadRequest(format!("{} is out of range", param)))
}

async fn add_car(
    State(state): State<AppState>,
    body: Result<Json<Car>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Car>)> {
    let Json(car) = body?;
    validate_car(&car)?;

    state.db.cars().insert(&car).await?;
    info!(car_id = %car.id, owner_id = %car.owner_id, "Car listed");

    Ok((StatusCode::CREATED, Json(car)))
}

async fn list_cars(
    State(state): State<AppState>,
    params: Result<Query<CatalogQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Car>>> {
    let Query(params) = params?;
    let criteria = params.criteria()?;

    let all = state.db.cars().list().await?;
    let mut cars = filter_cars(&all, &criteria);
    params.sort.apply(&mut cars);

    debug!(total = all.len(), matched = cars.len(), "Catalog listed");
    Ok(Json(cars))
}

async fn get_car(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Car>> {
    state
        .db
        .cars()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Car not found: {}", id)))
}
