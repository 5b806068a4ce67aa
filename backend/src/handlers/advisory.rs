//! HTTP handlers for farming advisories and advisory hub articles

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use shared::{Advisory, AdvisoryArticle, AdvisorySeverity, ArticleCategory};

use crate::error::AppResult;
use crate::AppState;

/// Query parameters for listing advisories
#[derive(Debug, Deserialize)]
pub struct ListAdvisoriesQuery {
    pub severity: Option<AdvisorySeverity>,
}

/// List advisories, newest first
pub async fn list_advisories(
    State(state): State<AppState>,
    Query(query): Query<ListAdvisoriesQuery>,
) -> Json<Vec<Advisory>> {
    Json(state.advisories.list(query.severity))
}

/// Get an advisory by ID
pub async fn get_advisory(
    State(state): State<AppState>,
    Path(advisory_id): Path<String>,
) -> AppResult<Json<Advisory>> {
    Ok(Json(state.advisories.get(&advisory_id)?))
}

/// Query parameters for listing advisory hub articles
#[derive(Debug, Deserialize)]
pub struct ListArticlesQuery {
    pub category: Option<ArticleCategory>,
    pub search: Option<String>,
}

/// List advisory hub articles
pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<ListArticlesQuery>,
) -> Json<Vec<AdvisoryArticle>> {
    Json(state.articles.list(query.category, query.search.as_deref()))
}

pub async fn list_article_categories(State(state): State<AppState>) -> Json<Vec<ArticleCategory>> {
    Json(state.articles.categories())
}
