//! Read-only views over the startup profile snapshot.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::profile::{Experience, GlobalData, Language, ProfileData};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExperienceQuery {
    pub tag: Option<String>,
}

/// One language's profile plus what the client needs to lay it out.
#[derive(Debug, Serialize)]
pub struct LocalizedProfile {
    pub language: Language,
    pub direction: &'static str,
    #[serde(flatten)]
    pub profile: ProfileData,
}

fn profile_for<'a>(
    state: &'a AppState,
    code: &str,
) -> Result<(Language, &'a ProfileData), AppError> {
    let language: Language = code.parse()?;
    let profile = state
        .profile
        .profile(language)
        .ok_or_else(|| AppError::NotFound(format!("No profile content for '{language}'")))?;
    Ok((language, profile))
}

/// GET /api/v1/profile
pub async fn handle_get_profile(State(state): State<AppState>) -> Json<GlobalData> {
    Json((*state.profile).clone())
}

/// GET /api/v1/profile/:lang
pub async fn handle_get_localized(
    State(state): State<AppState>,
    Path(lang): Path<String>,
) -> Result<Json<LocalizedProfile>, AppError> {
    let (language, profile) = profile_for(&state, &lang)?;
    Ok(Json(LocalizedProfile {
        language,
        direction: if language.is_rtl() { "rtl" } else { "ltr" },
        profile: profile.clone(),
    }))
}

/// GET /api/v1/profile/:lang/experience?tag=...
///
/// All experience entries, or only those carrying `tag` when given.
pub async fn handle_get_experience(
    State(state): State<AppState>,
    Path(lang): Path<String>,
    Query(query): Query<ExperienceQuery>,
) -> Result<Json<Vec<Experience>>, AppError> {
    let (_, profile) = profile_for(&state, &lang)?;
    let entries = match query.tag.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        Some(tag) => profile.experience_tagged(tag).cloned().collect(),
        None => profile.experience.clone(),
    };
    Ok(Json(entries))
}

/// GET /api/v1/profile/:lang/experience/tags
pub async fn handle_get_experience_tags(
    State(state): State<AppState>,
    Path(lang): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let (_, profile) = profile_for(&state, &lang)?;
    Ok(Json(
        profile
            .experience_tags()
            .into_iter()
            .map(str::to_string)
            .collect(),
    ))
}
