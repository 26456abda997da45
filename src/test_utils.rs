use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database as SeaDatabase, Set};

use crate::database::Database;
use crate::entities;
use crate::ports::clock::{Clock, MockClock};

pub async fn test_db() -> Arc<Database> {
    // A single connection, otherwise every pooled connection sees its own empty database
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let conn = SeaDatabase::connect(opt).await.unwrap();

    Arc::new(Database::from_connection(conn).await.unwrap())
}

/// A clock frozen at `now`.
pub fn fixed_clock(now: DateTime<Utc>) -> Arc<dyn Clock> {
    let mut clock = MockClock::new();
    clock.expect_now().return_const(now);
    Arc::new(clock)
}

pub fn at(timestamp: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(timestamp)
        .unwrap()
        .with_timezone(&Utc)
}

pub async fn insert_venue(db: &Database, name: &str, city: &str) -> entities::venue::Model {
    let venue = entities::venue::ActiveModel {
        name: Set(name.into()),
        city: Set(Some(city.into())),
        state: Set(Some("CA".into())),
        address: Set(Some("1015 Folsom Street".into())),
        phone: Set(Some("123-123-1234".into())),
        genres: Set(Some("Jazz,Folk".into())),
        ..Default::default()
    };
    venue.insert(&db.conn).await.unwrap()
}

pub async fn insert_artist(db: &Database, name: &str) -> entities::artist::Model {
    let artist = entities::artist::ActiveModel {
        name: Set(name.into()),
        city: Set(Some("San Francisco".into())),
        state: Set(Some("CA".into())),
        phone: Set(Some("326-123-5000".into())),
        genres: Set(Some("Rock n Roll".into())),
        ..Default::default()
    };
    artist.insert(&db.conn).await.unwrap()
}

pub async fn insert_show(
    db: &Database,
    venue_id: i64,
    artist_id: i64,
    start_time: DateTime<Utc>,
) -> entities::show::Model {
    let show = entities::show::ActiveModel {
        venue_id: Set(venue_id),
        artist_id: Set(artist_id),
        start_time: Set(start_time.timestamp()),
    };
    show.insert(&db.conn).await.unwrap()
}
