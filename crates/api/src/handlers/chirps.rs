//! Handlers for the `/chirps` resource.
//!
//! Reads are public. Creating a chirp requires an access token; deleting one
//! additionally requires that the caller owns it.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chirpy_core::error::CoreError;
use chirpy_core::types::DbId;
use chirpy_db::models::chirp::{Chirp, CreateChirp};
use serde::Deserialize;

use crate::auth::guard::require_owner;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Maximum chirp length, in characters.
pub const MAX_CHIRP_LENGTH: usize = 140;

/// Request body for `POST /api/chirps`.
#[derive(Debug, Deserialize)]
pub struct CreateChirpRequest {
    pub body: String,
}

/// Query parameters for `GET /api/chirps`.
///
/// Both are taken as raw strings so bad values produce a JSON 400 from
/// [`AppError`] rather than the extractor's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ListChirpsParams {
    pub author_id: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortOrder {
    Asc,
    Desc,
}

fn parse_sort(raw: Option<&str>) -> AppResult<SortOrder> {
    match raw {
        None | Some("") | Some("asc") => Ok(SortOrder::Asc),
        Some("desc") => Ok(SortOrder::Desc),
        Some(other) => Err(AppError::BadRequest(format!(
            "Invalid sort order '{other}', expected 'asc' or 'desc'"
        ))),
    }
}

fn parse_chirp_id(raw: &str) -> AppResult<DbId> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Invalid chirp ID".into()))
}

fn validate_body(body: &str) -> AppResult<()> {
    let length = body.chars().count();
    if length == 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Chirp must not be empty".into(),
        )));
    }
    if length > MAX_CHIRP_LENGTH {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Chirp is too long (max {MAX_CHIRP_LENGTH} characters)"
        ))));
    }
    Ok(())
}

/// POST /api/chirps
pub async fn create_chirp(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateChirpRequest>,
) -> AppResult<(StatusCode, Json<Chirp>)> {
    validate_body(&input.body)?;

    let chirp = state
        .chirps
        .create_chirp(&CreateChirp {
            body: input.body,
            user_id: auth.user_id,
        })
        .await?;

    tracing::info!(chirp_id = %chirp.id, user_id = %auth.user_id, "Chirp created");
    Ok((StatusCode::CREATED, Json(chirp)))
}

/// GET /api/chirps
///
/// List chirps by creation time, optionally for one author.
pub async fn list_chirps(
    State(state): State<AppState>,
    Query(params): Query<ListChirpsParams>,
) -> AppResult<Json<Vec<Chirp>>> {
    let author = match params.author_id.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<DbId>()
                .map_err(|_| AppError::BadRequest("Invalid author ID".into()))?,
        ),
    };
    let order = parse_sort(params.sort.as_deref())?;

    let mut chirps = state.chirps.list_chirps(author).await?;
    if order == SortOrder::Desc {
        chirps.reverse();
    }

    Ok(Json(chirps))
}

/// GET /api/chirps/{chirpID}
pub async fn get_chirp(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Chirp>> {
    let chirp_id = parse_chirp_id(&raw_id)?;

    let chirp = state
        .chirps
        .find_chirp(chirp_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Chirp",
            id: chirp_id,
        }))?;

    Ok(Json(chirp))
}

/// DELETE /api/chirps/{chirpID}
///
/// The id is checked before the caller is authenticated, and the chirp must
/// exist before ownership is judged.
pub async fn delete_chirp(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> AppResult<StatusCode> {
    let chirp_id = parse_chirp_id(&raw_id)?;
    let auth = AuthUser::from_headers(&headers, &state.config)?;

    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Chirp",
            id: chirp_id,
        })
    };

    let owner = state
        .chirps
        .find_chirp_owner(chirp_id)
        .await?
        .ok_or_else(not_found)?;

    require_owner(auth.user_id, owner, "delete the chirp")?;

    if !state.chirps.delete_chirp(chirp_id).await? {
        return Err(not_found());
    }

    tracing::info!(%chirp_id, user_id = %auth.user_id, "Chirp deleted");
    Ok(StatusCode::NO_CONTENT)
}
