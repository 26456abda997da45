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
use crate::http_server::forms::{self, ArtistForm, FormFields, SearchForm};
use crate::http_server::http_routes::venues::SearchPage;
use crate::http_server::pages::Page;
use crate::http_server::state::AppState;
use crate::services::artist::{ArtistDetail, ArtistQueryService, ArtistService, ArtistSummary};
use crate::services::show::VenueShow;

#[derive(Debug, Serialize)]
pub struct VenueShowView {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: String,
    pub start_time: String,
}

impl From<VenueShow> for VenueShowView {
    fn from(show: VenueShow) -> Self {
        Self {
            start_time: display_start_time(&show.start_time),
            venue_id: show.venue_id,
            venue_name: show.venue_name,
            venue_image_link: show.venue_image_link,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArtistDetailView {
    pub id: i64,
    pub name: String,
    pub genres: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<VenueShowView>,
    pub upcoming_shows: Vec<VenueShowView>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl From<ArtistDetail> for ArtistDetailView {
    fn from(ArtistDetail { artist, shows }: ArtistDetail) -> Self {
        let past_shows: Vec<VenueShowView> = shows.past.into_iter().map(Into::into).collect();
        let upcoming_shows: Vec<VenueShowView> =
            shows.upcoming.into_iter().map(Into::into).collect();

        Self {
            id: artist.id,
            name: artist.name,
            genres: artist.genres,
            city: artist.city,
            state: artist.state,
            phone: artist.phone,
            facebook_link: artist.facebook_link,
            image_link: artist.image_link,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}

pub async fn list_artists(
    State(app_state): State<Arc<AppState>>,
) -> AppResult<Page<Vec<ArtistSummary>>> {
    let artists = ArtistQueryService::new(app_state.db.clone(), app_state.clock.clone())
        .list()
        .await?;
    Ok(Page::new("pages/artists.html", artists))
}

pub async fn search_artists(
    State(app_state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> AppResult<Page<SearchPage>> {
    let results = ArtistQueryService::new(app_state.db.clone(), app_state.clock.clone())
        .search(&form.search_term)
        .await?;
    Ok(Page::new(
        "pages/search_artists.html",
        SearchPage {
            results,
            search_term: form.search_term,
        },
    ))
}

pub async fn show_artist(
    State(app_state): State<Arc<AppState>>,
    Path(artist_id): Path<i64>,
) -> AppResult<Page<ArtistDetailView>> {
    let detail = ArtistQueryService::new(app_state.db.clone(), app_state.clock.clone())
        .detail(artist_id)
        .await?;
    Ok(Page::new("pages/show_artist.html", detail.into()))
}

pub async fn create_artist_form() -> Page<ArtistForm> {
    Page::new("forms/new_artist.html", ArtistForm::default())
}

pub async fn create_artist_submission(
    State(app_state): State<Arc<AppState>>,
    Form(fields): Form<FormFields>,
) -> Page<()> {
    let input = forms::artist_input(&fields);
    let name = input.name.clone();

    if let Err(e) = ArtistService::new(app_state.db.clone()).create(input).await {
        tracing::error!("Failed to create artist '{}': {}", name, e);
    }

    Page::home().with_message(format!("Artist {} was successfully listed!", name))
}

pub async fn edit_artist_form(
    State(app_state): State<Arc<AppState>>,
    Path(artist_id): Path<i64>,
) -> AppResult<Page<ArtistForm>> {
    let artist = ArtistQueryService::new(app_state.db.clone(), app_state.clock.clone())
        .find(artist_id)
        .await?;
    Ok(Page::new("forms/edit_artist.html", artist.into()))
}

pub async fn edit_artist_submission(
    State(app_state): State<Arc<AppState>>,
    Path(artist_id): Path<i64>,
    Form(fields): Form<FormFields>,
) -> Redirect {
    let input = forms::artist_input(&fields);
    if let Err(e) = ArtistService::new(app_state.db.clone())
        .update(artist_id, input)
        .await
    {
        tracing::error!("Failed to update artist {}: {}", artist_id, e);
    }
    Redirect::to(&format!("/artists/{}", artist_id))
}
