use serde::{Deserialize, Serialize};

use crate::entities::{artist, venue};
use crate::services::artist::ArtistInput;
use crate::services::show::ShowInput;
use crate::services::venue::VenueInput;

/// Submitted form fields in request order. Multi-select fields repeat their key.
pub type FormFields = Vec<(String, String)>;

fn field(fields: &[(String, String)], key: &str) -> Option<String> {
    fields
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.clone())
}

/// All values of a repeated field, comma joined.
fn joined_field(fields: &[(String, String)], key: &str) -> Option<String> {
    let values: Vec<&str> = fields
        .iter()
        .filter(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values.join(","))
    }
}

pub fn venue_input(fields: &[(String, String)]) -> VenueInput {
    VenueInput {
        name: field(fields, "name").unwrap_or_default(),
        city: field(fields, "city"),
        state: field(fields, "state"),
        address: field(fields, "address"),
        phone: field(fields, "phone"),
        genres: joined_field(fields, "genres"),
        facebook_link: field(fields, "facebook_link"),
    }
}

pub fn artist_input(fields: &[(String, String)]) -> ArtistInput {
    ArtistInput {
        name: field(fields, "name").unwrap_or_default(),
        city: field(fields, "city"),
        state: field(fields, "state"),
        phone: field(fields, "phone"),
        genres: joined_field(fields, "genres"),
        facebook_link: field(fields, "facebook_link"),
    }
}

pub fn show_input(fields: &[(String, String)]) -> ShowInput {
    ShowInput {
        artist_id: field(fields, "artist_id"),
        venue_id: field(fields, "venue_id"),
        start_time: field(fields, "start_time"),
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

/// Venue form contents. Empty when creating, prefilled when editing.
#[derive(Debug, Default, Serialize)]
pub struct VenueForm {
    pub id: Option<i64>,
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
}

impl From<venue::Model> for VenueForm {
    fn from(venue: venue::Model) -> Self {
        Self {
            id: Some(venue.id),
            genres: split_genres(venue.genres.as_deref()),
            name: venue.name,
            city: venue.city,
            state: venue.state,
            address: venue.address,
            phone: venue.phone,
            facebook_link: venue.facebook_link,
            image_link: venue.image_link,
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct ArtistForm {
    pub id: Option<i64>,
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
}

impl From<artist::Model> for ArtistForm {
    fn from(artist: artist::Model) -> Self {
        Self {
            id: Some(artist.id),
            genres: split_genres(artist.genres.as_deref()),
            name: artist.name,
            city: artist.city,
            state: artist.state,
            phone: artist.phone,
            facebook_link: artist.facebook_link,
            image_link: artist.image_link,
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct ShowForm {
    pub artist_id: String,
    pub venue_id: String,
    pub start_time: String,
}

fn split_genres(genres: Option<&str>) -> Vec<String> {
    genres
        .map(|genres| {
            genres
                .split(',')
                .filter(|genre| !genre.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
