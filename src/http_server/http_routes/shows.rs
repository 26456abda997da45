use std::sync::Arc;

use axum::{
    Form,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::format::{DateFormat, display_start_time, format_datetime};
use crate::http_server::error::AppResult;
use crate::http_server::forms::{self, FormFields, ShowForm};
use crate::http_server::pages::Page;
use crate::http_server::state::AppState;
use crate::services::show::{ShowListing, ShowQueryService, ShowService};

#[derive(Debug, Default, Deserialize)]
pub struct ShowsQuery {
    #[serde(default)]
    pub format: DateFormat,
}

#[derive(Debug, Serialize)]
pub struct ShowView {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub start_time: String,
    pub start_time_formatted: String,
}

impl ShowView {
    fn new(listing: ShowListing, format: DateFormat) -> Self {
        Self {
            start_time: display_start_time(&listing.start_time),
            start_time_formatted: format_datetime(&listing.start_time, format),
            venue_id: listing.venue_id,
            venue_name: listing.venue_name,
            artist_id: listing.artist_id,
            artist_name: listing.artist_name,
        }
    }
}

pub async fn list_shows(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<ShowsQuery>,
) -> AppResult<Page<Vec<ShowView>>> {
    let shows = ShowQueryService::new(app_state.db.clone(), app_state.clock.clone())
        .list_all()
        .await?;
    Ok(Page::new(
        "pages/shows.html",
        shows
            .into_iter()
            .map(|listing| ShowView::new(listing, query.format))
            .collect(),
    ))
}

pub async fn create_show_form(State(app_state): State<Arc<AppState>>) -> Page<ShowForm> {
    Page::new(
        "forms/new_show.html",
        ShowForm {
            start_time: display_start_time(&app_state.clock.now()),
            ..Default::default()
        },
    )
}

pub async fn create_show_submission(
    State(app_state): State<Arc<AppState>>,
    Form(fields): Form<FormFields>,
) -> Page<()> {
    let input = forms::show_input(&fields);
    if let Err(e) = ShowService::new(app_state.db.clone()).create(input).await {
        tracing::error!("Failed to create show: {}", e);
    }

    Page::home().with_message("Show was successfully listed!")
}
