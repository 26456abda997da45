use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbErr, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QuerySelect, RelationTrait, Set, TransactionTrait,
};

use crate::database::Database;
use crate::entities::{artist, show, venue};
use crate::format::{display_start_time, parse_start_time};
use crate::ports::clock::Clock;
use crate::services::error::{ServiceError, ServiceResult};

const ARTIST_IMAGE_PLACEHOLDER: &str = "https://images.unsplash.com/photo-1549213783-8284d0336c4f?ixlib=rb-1.2.1&ixid=eyJhcHBfaWQiOjEyMDd9&auto=format&fit=crop&w=300&q=80";
const VENUE_IMAGE_PLACEHOLDER: &str = "https://images.unsplash.com/photo-1543900694-133f37abaaa5?ixlib=rb-1.2.1&ixid=eyJhcHBfaWQiOjEyMDd9&auto=format&fit=crop&w=400&q=60";

/// Which side of "now" a show falls on.
///
/// Both windows are open, so a show starting exactly at `now` belongs to neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowWindow {
    Past,
    Upcoming,
}

impl ShowWindow {
    fn condition(self, now: DateTime<Utc>) -> Condition {
        let now = now.timestamp();
        match self {
            ShowWindow::Past => Condition::all().add(show::Column::StartTime.lt(now)),
            ShowWindow::Upcoming => Condition::all().add(show::Column::StartTime.gt(now)),
        }
    }
}

/// The entity a set of shows is looked up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Booking {
    Venue(i64),
    Artist(i64),
}

impl Booking {
    fn condition(self) -> Condition {
        match self {
            Booking::Venue(id) => Condition::all().add(venue::Column::Id.eq(id)),
            Booking::Artist(id) => Condition::all().add(artist::Column::Id.eq(id)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowListing {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub start_time: DateTime<Utc>,
}

/// A show seen from a venue's page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistShow {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: DateTime<Utc>,
}

/// A show seen from an artist's page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueShow {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: String,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionedShows<T> {
    pub past: Vec<T>,
    pub upcoming: Vec<T>,
}

#[derive(Debug, FromQueryResult)]
struct ShowListingRow {
    venue_id: i64,
    venue_name: String,
    artist_id: i64,
    artist_name: String,
    start_time: i64,
}

#[derive(Debug, FromQueryResult)]
struct ArtistShowRow {
    artist_id: i64,
    artist_name: String,
    artist_image_link: Option<String>,
    start_time: i64,
}

#[derive(Debug, FromQueryResult)]
struct VenueShowRow {
    venue_id: i64,
    venue_name: String,
    venue_image_link: Option<String>,
    start_time: i64,
}

fn to_datetime(timestamp: i64) -> ServiceResult<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp, 0).ok_or_else(|| {
        ServiceError::Database(DbErr::Custom(format!(
            "Stored start_time {timestamp} is out of range"
        )))
    })
}

/// Show joined to both its venue and its artist.
fn joined_shows() -> sea_orm::Select<show::Entity> {
    show::Entity::find()
        .join(JoinType::InnerJoin, show::Relation::Artist.def())
        .join(JoinType::InnerJoin, show::Relation::Venue.def())
}

/// Read side for shows. Every call reads the clock once.
pub struct ShowQueryService {
    db: Arc<Database>,
    clock: Arc<dyn Clock>,
}

impl ShowQueryService {
    pub fn new(db: Arc<Database>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Every show with its venue and artist names, in store order.
    pub async fn list_all(&self) -> ServiceResult<Vec<ShowListing>> {
        let rows = joined_shows()
            .select_only()
            .column(show::Column::VenueId)
            .column_as(venue::Column::Name, "venue_name")
            .column(show::Column::ArtistId)
            .column_as(artist::Column::Name, "artist_name")
            .column(show::Column::StartTime)
            .into_model::<ShowListingRow>()
            .all(&self.db.conn)
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(ShowListing {
                    venue_id: row.venue_id,
                    venue_name: row.venue_name,
                    artist_id: row.artist_id,
                    artist_name: row.artist_name,
                    start_time: to_datetime(row.start_time)?,
                })
            })
            .collect()
    }

    /// Count of shows for `booking` starting strictly after now.
    pub async fn count_upcoming(&self, booking: Booking) -> ServiceResult<u64> {
        let now = self.clock.now();
        let count = joined_shows()
            .filter(booking.condition())
            .filter(ShowWindow::Upcoming.condition(now))
            .count(&self.db.conn)
            .await?;
        Ok(count)
    }

    pub async fn shows_at_venue(
        &self,
        venue_id: i64,
    ) -> ServiceResult<PartitionedShows<ArtistShow>> {
        let now = self.clock.now();
        Ok(PartitionedShows {
            past: self.artist_shows(venue_id, ShowWindow::Past, now).await?,
            upcoming: self
                .artist_shows(venue_id, ShowWindow::Upcoming, now)
                .await?,
        })
    }

    pub async fn shows_for_artist(
        &self,
        artist_id: i64,
    ) -> ServiceResult<PartitionedShows<VenueShow>> {
        let now = self.clock.now();
        Ok(PartitionedShows {
            past: self.venue_shows(artist_id, ShowWindow::Past, now).await?,
            upcoming: self
                .venue_shows(artist_id, ShowWindow::Upcoming, now)
                .await?,
        })
    }

    async fn artist_shows(
        &self,
        venue_id: i64,
        window: ShowWindow,
        now: DateTime<Utc>,
    ) -> ServiceResult<Vec<ArtistShow>> {
        let rows = joined_shows()
            .select_only()
            .column_as(artist::Column::Id, "artist_id")
            .column_as(artist::Column::Name, "artist_name")
            .column_as(artist::Column::ImageLink, "artist_image_link")
            .column(show::Column::StartTime)
            .filter(Booking::Venue(venue_id).condition())
            .filter(window.condition(now))
            .into_model::<ArtistShowRow>()
            .all(&self.db.conn)
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(ArtistShow {
                    artist_id: row.artist_id,
                    artist_name: row.artist_name,
                    artist_image_link: row
                        .artist_image_link
                        .unwrap_or_else(|| ARTIST_IMAGE_PLACEHOLDER.to_string()),
                    start_time: to_datetime(row.start_time)?,
                })
            })
            .collect()
    }

    async fn venue_shows(
        &self,
        artist_id: i64,
        window: ShowWindow,
        now: DateTime<Utc>,
    ) -> ServiceResult<Vec<VenueShow>> {
        let rows = joined_shows()
            .select_only()
            .column_as(venue::Column::Id, "venue_id")
            .column_as(venue::Column::Name, "venue_name")
            .column_as(venue::Column::ImageLink, "venue_image_link")
            .column(show::Column::StartTime)
            .filter(Booking::Artist(artist_id).condition())
            .filter(window.condition(now))
            .into_model::<VenueShowRow>()
            .all(&self.db.conn)
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(VenueShow {
                    venue_id: row.venue_id,
                    venue_name: row.venue_name,
                    venue_image_link: row
                        .venue_image_link
                        .unwrap_or_else(|| VENUE_IMAGE_PLACEHOLDER.to_string()),
                    start_time: to_datetime(row.start_time)?,
                })
            })
            .collect()
    }
}

/// Raw show form values; nothing is checked before the store sees them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowInput {
    pub artist_id: Option<String>,
    pub venue_id: Option<String>,
    pub start_time: Option<String>,
}

impl ShowInput {
    fn into_active_model(self) -> ServiceResult<show::ActiveModel> {
        let artist_id = parse_id("artist_id", self.artist_id.as_deref())?;
        let venue_id = parse_id("venue_id", self.venue_id.as_deref())?;
        let raw_start_time = self.start_time.unwrap_or_default();
        let start_time = parse_start_time(&raw_start_time).ok_or_else(|| {
            ServiceError::InvalidInput(format!("start_time `{raw_start_time}` is not a timestamp"))
        })?;

        Ok(show::ActiveModel {
            venue_id: Set(venue_id),
            artist_id: Set(artist_id),
            start_time: Set(start_time.timestamp()),
        })
    }
}

fn parse_id(field: &str, raw: Option<&str>) -> ServiceResult<i64> {
    let raw = raw.unwrap_or_default().trim();
    raw.parse()
        .map_err(|_| ServiceError::InvalidInput(format!("{field} `{raw}` is not an id")))
}

/// Write side for shows. Shows are create-only.
pub struct ShowService {
    db: Arc<Database>,
}

impl ShowService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert a booking. Unknown venue or artist ids are left for the store to reject.
    pub async fn create(&self, input: ShowInput) -> ServiceResult<show::Model> {
        let model = input.into_active_model()?;

        let show = self
            .db
            .conn
            .transaction::<_, show::Model, ServiceError>(|txn| {
                Box::pin(async move { Ok(model.insert(txn).await?) })
            })
            .await?;

        tracing::info!(
            "Show created: artist {} at venue {} ({})",
            show.artist_id,
            show.venue_id,
            show.starts_at()
                .as_ref()
                .map(display_start_time)
                .unwrap_or_default()
        );
        Ok(show)
    }
}
