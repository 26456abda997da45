use std::sync::Arc;

use axum::{
    Form,
    extract::State,
    response::Redirect,
};
use serde::Serialize;

use crate::format::display_start_time;
use crate::http_server::error::AppResult;
use crate::http_server::extract::Path;
use crate::http_server::forms::{self, FormFields, SearchForm, VenueForm};
use crate::http_server::pages::Page;
use crate::http_server::state::AppState;
use crate::services::search::SearchResults;
use crate::services::show::ArtistShow;
use crate::services::venue::{VenueArea, VenueDetail, VenueQueryService, VenueService};

const WEBSITE_PLACEHOLDER: &str = "https://www.dummyWebsite.com";

#[derive(Debug, Serialize)]
pub struct SearchPage {
    pub results: SearchResults,
    pub search_term: String,
}

#[derive(Debug, Serialize)]
pub struct ArtistShowView {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: String,
}

impl From<ArtistShow> for ArtistShowView {
    fn from(show: ArtistShow) -> Self {
        Self {
            start_time: display_start_time(&show.start_time),
            artist_id: show.artist_id,
            artist_name: show.artist_name,
            artist_image_link: show.artist_image_link,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VenueDetailView {
    pub id: i64,
    pub name: String,
    pub genres: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub website: &'static str,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<ArtistShowView>,
    pub upcoming_shows: Vec<ArtistShowView>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl From<VenueDetail> for VenueDetailView {
    fn from(VenueDetail { venue, shows }: VenueDetail) -> Self {
        let past_shows: Vec<ArtistShowView> = shows.past.into_iter().map(Into::into).collect();
        let upcoming_shows: Vec<ArtistShowView> =
            shows.upcoming.into_iter().map(Into::into).collect();

        Self {
            id: venue.id,
            name: venue.name,
            genres: venue.genres,
            address: venue.address,
            city: venue.city,
            state: venue.state,
            phone: venue.phone,
            website: WEBSITE_PLACEHOLDER,
            facebook_link: venue.facebook_link,
            image_link: venue.image_link,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}

pub async fn list_venues(State(app_state): State<Arc<AppState>>) -> AppResult<Page<Vec<VenueArea>>> {
    let areas = VenueQueryService::new(app_state.db.clone(), app_state.clock.clone())
        .list_by_area()
        .await?;
    Ok(Page::new("pages/venues.html", areas))
}

pub async fn search_venues(
    State(app_state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> AppResult<Page<SearchPage>> {
    let results = VenueQueryService::new(app_state.db.clone(), app_state.clock.clone())
        .search(&form.search_term)
        .await?;
    Ok(Page::new(
        "pages/search_venues.html",
        SearchPage {
            results,
            search_term: form.search_term,
        },
    ))
}

pub async fn show_venue(
    State(app_state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
) -> AppResult<Page<VenueDetailView>> {
    let detail = VenueQueryService::new(app_state.db.clone(), app_state.clock.clone())
        .detail(venue_id)
        .await?;
    Ok(Page::new("pages/show_venue.html", detail.into()))
}

pub async fn create_venue_form() -> Page<VenueForm> {
    Page::new("forms/new_venue.html", VenueForm::default())
}

pub async fn create_venue_submission(
    State(app_state): State<Arc<AppState>>,
    Form(fields): Form<FormFields>,
) -> Page<()> {
    let input = forms::venue_input(&fields);
    let name = input.name.clone();

    if let Err(e) = VenueService::new(app_state.db.clone()).create(input).await {
        tracing::error!("Failed to create venue '{}': {}", name, e);
    }

    // The listing message is shown whether or not the insert went through
    Page::home().with_message(format!("Venue {} was successfully listed!", name))
}

pub async fn delete_venue(
    State(app_state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
) -> Page<()> {
    if let Err(e) = VenueService::new(app_state.db.clone()).delete(venue_id).await {
        tracing::error!("Failed to delete venue {}: {}", venue_id, e);
    }
    Page::home()
}

pub async fn edit_venue_form(
    State(app_state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
) -> AppResult<Page<VenueForm>> {
    let venue = VenueQueryService::new(app_state.db.clone(), app_state.clock.clone())
        .find(venue_id)
        .await?;
    Ok(Page::new("forms/edit_venue.html", venue.into()))
}

pub async fn edit_venue_submission(
    State(app_state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
    Form(fields): Form<FormFields>,
) -> Redirect {
    let input = forms::venue_input(&fields);
    if let Err(e) = VenueService::new(app_state.db.clone())
        .update(venue_id, input)
        .await
    {
        tracing::error!("Failed to update venue {}: {}", venue_id, e);
    }
    Redirect::to(&format!("/venues/{}", venue_id))
}
