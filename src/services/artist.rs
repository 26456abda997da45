use std::sync::Arc;

use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};
use serde::Serialize;

use crate::database::Database;
use crate::entities::artist;
use crate::ports::clock::Clock;
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::search::{SearchHit, SearchResults, name_matches};
use crate::services::show::{Booking, PartitionedShows, ShowQueryService, VenueShow};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistSummary {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistDetail {
    pub artist: artist::Model,
    pub shows: PartitionedShows<VenueShow>,
}

/// Submitted artist fields. Absent fields are `None` and overwrite stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistInput {
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub genres: Option<String>,
    pub facebook_link: Option<String>,
}

impl ArtistInput {
    fn apply(self, model: &mut artist::ActiveModel) {
        model.name = Set(self.name);
        model.city = Set(self.city);
        model.state = Set(self.state);
        model.phone = Set(self.phone);
        model.genres = Set(self.genres);
        model.facebook_link = Set(self.facebook_link);
    }
}

pub struct ArtistQueryService {
    db: Arc<Database>,
    shows: ShowQueryService,
}

impl ArtistQueryService {
    pub fn new(db: Arc<Database>, clock: Arc<dyn Clock>) -> Self {
        Self {
            shows: ShowQueryService::new(db.clone(), clock),
            db,
        }
    }

    pub async fn list(&self) -> ServiceResult<Vec<ArtistSummary>> {
        let artists = artist::Entity::find().all(&self.db.conn).await?;
        Ok(artists
            .into_iter()
            .map(|artist| ArtistSummary {
                id: artist.id,
                name: artist.name,
            })
            .collect())
    }

    /// Case-insensitive partial match on the artist name.
    pub async fn search(&self, search_term: &str) -> ServiceResult<SearchResults> {
        let matches: Vec<artist::Model> = artist::Entity::find()
            .all(&self.db.conn)
            .await?
            .into_iter()
            .filter(|artist| name_matches(&artist.name, search_term))
            .collect();

        let mut data = Vec::with_capacity(matches.len());
        for artist in matches {
            data.push(SearchHit {
                num_upcoming_shows: self
                    .shows
                    .count_upcoming(Booking::Artist(artist.id))
                    .await?,
                id: artist.id,
                name: artist.name,
            });
        }

        Ok(SearchResults::new(data))
    }

    pub async fn find(&self, artist_id: i64) -> ServiceResult<artist::Model> {
        artist::Entity::find_by_id(artist_id)
            .one(&self.db.conn)
            .await?
            .ok_or_else(|| ServiceError::not_found("artist", artist_id))
    }

    pub async fn detail(&self, artist_id: i64) -> ServiceResult<ArtistDetail> {
        let artist = self.find(artist_id).await?;
        let shows = self.shows.shows_for_artist(artist_id).await?;
        Ok(ArtistDetail { artist, shows })
    }
}

pub struct ArtistService {
    db: Arc<Database>,
}

impl ArtistService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: ArtistInput) -> ServiceResult<artist::Model> {
        let mut model = <artist::ActiveModel as Default>::default();
        input.apply(&mut model);

        let artist = self
            .db
            .conn
            .transaction::<_, artist::Model, ServiceError>(|txn| {
                Box::pin(async move { Ok(model.insert(txn).await?) })
            })
            .await?;

        tracing::info!("Artist created: '{}' (ID: {})", artist.name, artist.id);
        Ok(artist)
    }

    /// Overwrite every editable field of the artist.
    pub async fn update(
        &self,
        artist_id: i64,
        input: ArtistInput,
    ) -> ServiceResult<artist::Model> {
        let artist = self
            .db
            .conn
            .transaction::<_, artist::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    let artist = artist::Entity::find_by_id(artist_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| ServiceError::not_found("artist", artist_id))?;

                    let mut model: artist::ActiveModel = artist.into();
                    input.apply(&mut model);
                    Ok(model.update(txn).await?)
                })
            })
            .await?;

        tracing::info!("Artist updated: '{}' (ID: {})", artist.name, artist.id);
        Ok(artist)
    }
}
