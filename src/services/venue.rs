use std::sync::Arc;

use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, Set, TransactionTrait};
use serde::Serialize;

use crate::database::Database;
use crate::entities::venue;
use crate::ports::clock::Clock;
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::search::{SearchHit, SearchResults, name_matches};
use crate::services::show::{ArtistShow, Booking, PartitionedShows, ShowQueryService};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: u64,
}

/// A city/state heading on the venue listing.
///
/// Each area holds exactly one venue: venues sharing a city are not merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueArea {
    pub city: Option<String>,
    pub state: Option<String>,
    pub venues: Vec<VenueSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueDetail {
    pub venue: venue::Model,
    pub shows: PartitionedShows<ArtistShow>,
}

/// Submitted venue fields. Absent fields are `None` and overwrite stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueInput {
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub genres: Option<String>,
    pub facebook_link: Option<String>,
}

impl VenueInput {
    fn apply(self, model: &mut venue::ActiveModel) {
        model.name = Set(self.name);
        model.city = Set(self.city);
        model.state = Set(self.state);
        model.address = Set(self.address);
        model.phone = Set(self.phone);
        model.genres = Set(self.genres);
        model.facebook_link = Set(self.facebook_link);
    }
}

pub struct VenueQueryService {
    db: Arc<Database>,
    shows: ShowQueryService,
}

impl VenueQueryService {
    pub fn new(db: Arc<Database>, clock: Arc<dyn Clock>) -> Self {
        Self {
            shows: ShowQueryService::new(db.clone(), clock),
            db,
        }
    }

    /// All venues, one area per venue, each with its upcoming show count.
    pub async fn list_by_area(&self) -> ServiceResult<Vec<VenueArea>> {
        let venues = venue::Entity::find().all(&self.db.conn).await?;

        let mut areas = Vec::with_capacity(venues.len());
        for venue in venues {
            let num_upcoming_shows = self.shows.count_upcoming(Booking::Venue(venue.id)).await?;
            areas.push(VenueArea {
                city: venue.city,
                state: venue.state,
                venues: vec![VenueSummary {
                    id: venue.id,
                    name: venue.name,
                    num_upcoming_shows,
                }],
            });
        }

        Ok(areas)
    }

    /// Case-insensitive partial match on the venue name.
    pub async fn search(&self, search_term: &str) -> ServiceResult<SearchResults> {
        let matches: Vec<venue::Model> = venue::Entity::find()
            .all(&self.db.conn)
            .await?
            .into_iter()
            .filter(|venue| name_matches(&venue.name, search_term))
            .collect();

        let mut data = Vec::with_capacity(matches.len());
        for venue in matches {
            data.push(SearchHit {
                num_upcoming_shows: self.shows.count_upcoming(Booking::Venue(venue.id)).await?,
                id: venue.id,
                name: venue.name,
            });
        }

        Ok(SearchResults::new(data))
    }

    pub async fn find(&self, venue_id: i64) -> ServiceResult<venue::Model> {
        venue::Entity::find_by_id(venue_id)
            .one(&self.db.conn)
            .await?
            .ok_or_else(|| ServiceError::not_found("venue", venue_id))
    }

    pub async fn detail(&self, venue_id: i64) -> ServiceResult<VenueDetail> {
        let venue = self.find(venue_id).await?;
        let shows = self.shows.shows_at_venue(venue_id).await?;
        Ok(VenueDetail { venue, shows })
    }
}

pub struct VenueService {
    db: Arc<Database>,
}

impl VenueService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: VenueInput) -> ServiceResult<venue::Model> {
        let mut model = <venue::ActiveModel as Default>::default();
        input.apply(&mut model);

        let venue = self
            .db
            .conn
            .transaction::<_, venue::Model, ServiceError>(|txn| {
                Box::pin(async move { Ok(model.insert(txn).await?) })
            })
            .await?;

        tracing::info!("Venue created: '{}' (ID: {})", venue.name, venue.id);
        Ok(venue)
    }

    /// Overwrite every editable field of the venue.
    pub async fn update(&self, venue_id: i64, input: VenueInput) -> ServiceResult<venue::Model> {
        let venue = self
            .db
            .conn
            .transaction::<_, venue::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    let venue = venue::Entity::find_by_id(venue_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| ServiceError::not_found("venue", venue_id))?;

                    let mut model: venue::ActiveModel = venue.into();
                    input.apply(&mut model);
                    Ok(model.update(txn).await?)
                })
            })
            .await?;

        tracing::info!("Venue updated: '{}' (ID: {})", venue.name, venue.id);
        Ok(venue)
    }

    /// Delete the venue; the store cascades the delete to its shows.
    pub async fn delete(&self, venue_id: i64) -> ServiceResult<()> {
        self.db
            .conn
            .transaction::<_, (), ServiceError>(|txn| {
                Box::pin(async move {
                    let venue = venue::Entity::find_by_id(venue_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| ServiceError::not_found("venue", venue_id))?;
                    venue.delete(txn).await?;
                    Ok(())
                })
            })
            .await?;

        tracing::info!("Venue deleted (ID: {})", venue_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::show;
    use crate::test_utils::{at, fixed_clock, insert_artist, insert_show, insert_venue, test_db};
    use chrono::Duration;
    use sea_orm::{ColumnTrait, PaginatorTrait, QueryFilter};

    fn query_service(db: Arc<Database>) -> VenueQueryService {
        VenueQueryService::new(db, fixed_clock(at("2024-06-01T20:00:00Z")))
    }

    fn names(results: &SearchResults) -> Vec<&str> {
        let mut names: Vec<&str> = results.data.iter().map(|hit| hit.name.as_str()).collect();
        names.sort();
        names
    }

    async fn seed(db: &Database) -> (venue::Model, venue::Model, venue::Model) {
        (
            insert_venue(db, "The Musical Hop", "San Francisco").await,
            insert_venue(db, "The Dueling Pianos Bar", "New York").await,
            insert_venue(db, "Park Square Live Music & Coffee", "San Francisco").await,
        )
    }

    #[tokio::test]
    async fn test_list_by_area_one_area_per_venue() {
        let db = test_db().await;
        let now = at("2024-06-01T20:00:00Z");
        let (hop, pianos, park) = seed(&db).await;
        let artist = insert_artist(&db, "Guns N Petals").await;
        insert_show(&db, hop.id, artist.id, now + Duration::days(1)).await;
        insert_show(&db, hop.id, artist.id, now + Duration::days(2)).await;
        insert_show(&db, hop.id, artist.id, now - Duration::days(2)).await;
        insert_show(&db, park.id, artist.id, now).await;

        let mut areas = query_service(db).list_by_area().await.unwrap();
        areas.sort_by_key(|area| area.venues[0].id);

        assert_eq!(areas.len(), 3);
        assert!(areas.iter().all(|area| area.venues.len() == 1));

        let counts: Vec<(i64, u64)> = areas
            .iter()
            .map(|area| (area.venues[0].id, area.venues[0].num_upcoming_shows))
            .collect();
        assert_eq!(counts, vec![(hop.id, 2), (pianos.id, 0), (park.id, 0)]);
        assert_eq!(areas[0].city.as_deref(), Some("San Francisco"));
        assert_eq!(areas[1].city.as_deref(), Some("New York"));
        // Same city, still separate areas
        assert_eq!(areas[0].city, areas[2].city);
    }

    #[tokio::test]
    async fn test_list_by_area_empty() {
        let db = test_db().await;
        assert!(query_service(db).list_by_area().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let db = test_db().await;
        seed(&db).await;
        let service = query_service(db);

        let results = service.search("hop").await.unwrap();
        assert_eq!(results.count, 1);
        assert_eq!(names(&results), vec!["The Musical Hop"]);

        let results = service.search("Music").await.unwrap();
        assert_eq!(results.count, 2);
        assert_eq!(
            names(&results),
            vec!["Park Square Live Music & Coffee", "The Musical Hop"]
        );

        let results = service.search("zzz").await.unwrap();
        assert_eq!(results.count, 0);
        assert!(results.data.is_empty());
    }

    #[tokio::test]
    async fn test_search_folds_non_ascii_case() {
        let db = test_db().await;
        seed(&db).await;
        insert_venue(&db, "CAFÉ ÖLAND", "Stockholm").await;

        let results = query_service(db).search("café öland").await.unwrap();
        assert_eq!(results.count, 1);
        assert_eq!(names(&results), vec!["CAFÉ ÖLAND"]);
    }

    #[tokio::test]
    async fn test_search_empty_term_matches_everything() {
        let db = test_db().await;
        seed(&db).await;

        let results = query_service(db).search("").await.unwrap();
        assert_eq!(results.count, 3);
    }

    #[tokio::test]
    async fn test_search_counts_upcoming_shows() {
        let db = test_db().await;
        let now = at("2024-06-01T20:00:00Z");
        let (hop, _, park) = seed(&db).await;
        let artist = insert_artist(&db, "The Wild Sax Band").await;
        insert_show(&db, hop.id, artist.id, now + Duration::days(7)).await;
        insert_show(&db, park.id, artist.id, now - Duration::days(7)).await;

        let results = query_service(db).search("music").await.unwrap();
        let hop_hit = results.data.iter().find(|hit| hit.id == hop.id).unwrap();
        let park_hit = results.data.iter().find(|hit| hit.id == park.id).unwrap();
        assert_eq!(hop_hit.num_upcoming_shows, 1);
        assert_eq!(park_hit.num_upcoming_shows, 0);
    }

    #[tokio::test]
    async fn test_search_is_repeatable() {
        let db = test_db().await;
        let now = at("2024-06-01T20:00:00Z");
        let (hop, _, _) = seed(&db).await;
        let artist = insert_artist(&db, "Guns N Petals").await;
        insert_show(&db, hop.id, artist.id, now + Duration::days(7)).await;
        let service = query_service(db);

        let first = service.search("Music").await.unwrap();
        let second = service.search("Music").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_detail_partitions_shows() {
        let db = test_db().await;
        let now = at("2024-06-01T20:00:00Z");
        let (hop, _, _) = seed(&db).await;
        let artist = insert_artist(&db, "Guns N Petals").await;
        insert_show(&db, hop.id, artist.id, now - Duration::days(1)).await;
        insert_show(&db, hop.id, artist.id, now + Duration::days(1)).await;
        insert_show(&db, hop.id, artist.id, now + Duration::days(2)).await;

        let detail = query_service(db).detail(hop.id).await.unwrap();
        assert_eq!(detail.venue.name, "The Musical Hop");
        assert_eq!(detail.shows.past.len(), 1);
        assert_eq!(detail.shows.upcoming.len(), 2);
    }

    #[tokio::test]
    async fn test_detail_not_found() {
        let db = test_db().await;
        let err = query_service(db).detail(42).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::NotFound {
                entity: "venue",
                id: 42
            }
        ));
    }

    #[tokio::test]
    async fn test_create_venue() {
        let db = test_db().await;
        let service = VenueService::new(db.clone());

        let venue = service
            .create(VenueInput {
                name: "The Musical Hop".into(),
                city: Some("San Francisco".into()),
                state: Some("CA".into()),
                address: Some("1015 Folsom Street".into()),
                phone: Some("123-123-1234".into()),
                genres: Some("Jazz,Reggae,Swing".into()),
                facebook_link: Some("https://www.facebook.com/TheMusicalHop".into()),
            })
            .await
            .unwrap();

        let stored = query_service(db).find(venue.id).await.unwrap();
        assert_eq!(stored, venue);
        assert_eq!(stored.genres.as_deref(), Some("Jazz,Reggae,Swing"));
        assert_eq!(stored.image_link, None);
    }

    #[tokio::test]
    async fn test_update_overwrites_every_field() {
        let db = test_db().await;
        let (hop, _, _) = seed(&db).await;
        let service = VenueService::new(db.clone());

        service
            .update(
                hop.id,
                VenueInput {
                    name: "The Musical Hop II".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let stored = query_service(db).find(hop.id).await.unwrap();
        assert_eq!(stored.name, "The Musical Hop II");
        assert_eq!(stored.city, None);
        assert_eq!(stored.state, None);
        assert_eq!(stored.address, None);
        assert_eq!(stored.phone, None);
        assert_eq!(stored.genres, None);
        assert_eq!(stored.facebook_link, None);
    }

    #[tokio::test]
    async fn test_update_missing_venue() {
        let db = test_db().await;
        let err = VenueService::new(db)
            .update(7, VenueInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_venue_cascades_to_shows() {
        let db = test_db().await;
        let now = at("2024-06-01T20:00:00Z");
        let (hop, pianos, _) = seed(&db).await;
        let artist = insert_artist(&db, "Guns N Petals").await;
        insert_show(&db, hop.id, artist.id, now + Duration::days(1)).await;
        insert_show(&db, hop.id, artist.id, now - Duration::days(1)).await;
        insert_show(&db, pianos.id, artist.id, now + Duration::days(1)).await;

        VenueService::new(db.clone()).delete(hop.id).await.unwrap();

        let orphaned = show::Entity::find()
            .filter(show::Column::VenueId.eq(hop.id))
            .count(&db.conn)
            .await
            .unwrap();
        assert_eq!(orphaned, 0);
        assert_eq!(show::Entity::find().count(&db.conn).await.unwrap(), 1);
        assert!(matches!(
            query_service(db).find(hop.id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_venue() {
        let db = test_db().await;
        let err = VenueService::new(db).delete(3).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }
}
