use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mapsync::details::{DetailsFallback, DetailsQuery, Error as DetailsError, PlaceDetails};
use tracing::{error, warn};

use super::ApiError;
use crate::AppState;

pub async fn details(
    State(state): State<Arc<AppState>>,
    Json(query): Json<DetailsQuery>,
) -> Result<Response, ApiError> {
    query
        .validate()
        .map_err(|err| ApiError::new(StatusCode::BAD_REQUEST, err.to_string()))?;
    if !state.client.has_api_key() {
        error!("Details requested without an API key");
        return Err(ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "2GIS API key is not configured",
        ));
    }

    let response = state.client.geosearch(&query).await.map_err(|err| {
        error!("Failed to search catalog: {err}");
        ApiError::from(err)
    })?;

    match PlaceDetails::from_geosearch(response, &query) {
        Ok(place) => Ok(Json(place).into_response()),
        Err(DetailsError::NotFound(title)) => {
            warn!("Catalog has nothing for {title:?}");
            Ok(Json(DetailsFallback::for_query(&query)).into_response())
        }
        Err(err) => Err(ApiError::new(StatusCode::BAD_REQUEST, err.to_string())),
    }
}
