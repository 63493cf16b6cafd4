//! Repository for the `events` table, including the archive query engine.

use sqlx::PgPool;
use spinner_core::archive::{clamp_count, ArchiveOrder};
use spinner_core::coords::{decode_coord, encode_coord};
use spinner_core::geo::{haversine_distance_m, BoundingBox};
use spinner_core::types::{DbId, Timestamp};

use crate::models::event::{ArchiveQuery, Event, EventWithNames, NewEvent};

/// Column list for `events` queries.
const EVENT_COLUMNS: &str = "id, municipality_id, event_type_id, lat, lon, \
     create_time, report_time, description, title, on_going";

/// Escape LIKE metacharacters so a user-supplied search string matches
/// literally instead of acting as a pattern.
fn escape_like(pattern: &str) -> String {
    pattern
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Encoded bounding-box bounds for the SQL prefilter, or all-NULL when the
/// query has no geo filter. Bounds are widened by one encoding unit so the
/// floor-encoding of a point on the box edge cannot fall outside it.
struct EncodedBox {
    lat_min: Option<i32>,
    lat_max: Option<i32>,
    lon_west: Option<i32>,
    lon_east: Option<i32>,
    wraps: Option<bool>,
}

impl EncodedBox {
    fn from_query(query: &ArchiveQuery) -> Self {
        match query.geo {
            Some(geo) => {
                let bbox = BoundingBox::around(geo.lat, geo.lon, geo.radius_m);
                Self {
                    lat_min: Some(encode_coord(bbox.lat_min) - 1),
                    lat_max: Some(encode_coord(bbox.lat_max) + 1),
                    lon_west: Some(encode_coord(bbox.lon_west) - 1),
                    lon_east: Some(encode_coord(bbox.lon_east) + 1),
                    wraps: Some(bbox.wraps),
                }
            }
            None => Self {
                lat_min: None,
                lat_max: None,
                lon_west: None,
                lon_east: None,
                wraps: None,
            },
        }
    }
}

/// Provides read/write operations for incident events.
pub struct EventRepo;

impl EventRepo {
    /// Highest locally stored event ID, or `None` when the table is empty.
    pub async fn max_id(pool: &PgPool) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT MAX(id) FROM events")
            .fetch_one(pool)
            .await
    }

    /// Number of stored events.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(pool)
            .await
    }

    /// Insert a batch of events in one transaction.
    ///
    /// All-or-nothing: any failure rolls back the entire batch. Returns the
    /// number of inserted rows.
    pub async fn insert_batch(pool: &PgPool, events: &[NewEvent]) -> Result<u64, sqlx::Error> {
        if events.is_empty() {
            return Ok(0);
        }

        let mut tx = pool.begin().await?;
        for event in events {
            sqlx::query(
                "INSERT INTO events \
                    (id, municipality_id, event_type_id, lat, lon, \
                     create_time, report_time, description, title, on_going) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            )
            .bind(event.id)
            .bind(event.municipality_id)
            .bind(event.event_type_id)
            .bind(event.lat)
            .bind(event.lon)
            .bind(event.create_time)
            .bind(event.report_time)
            .bind(&event.description)
            .bind(&event.title)
            .bind(event.on_going)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(events.len() as u64)
    }

    /// IDs of all events still marked ongoing.
    pub async fn ongoing_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM events WHERE on_going")
            .fetch_all(pool)
            .await
    }

    /// Store a late-arriving description and mark the event closed.
    ///
    /// Returns `false` when the event no longer exists.
    pub async fn set_description_and_close(
        pool: &PgPool,
        id: DbId,
        description: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE events SET description = $2, on_going = FALSE WHERE id = $1",
        )
        .bind(id)
        .bind(description)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Force-close ongoing events created before `cutoff`. Returns the
    /// number of rows flipped.
    pub async fn close_ongoing_older_than(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE events SET on_going = FALSE WHERE on_going AND create_time < $1",
        )
        .bind(cutoff)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Fetch one event with its reference names resolved.
    pub async fn get_with_names(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<EventWithNames>, sqlx::Error> {
        sqlx::query_as::<_, EventWithNames>(
            "SELECT e.id, e.municipality_id, m.name AS municipality_name, \
                    e.event_type_id, t.name AS event_type_name, \
                    e.lat, e.lon, e.create_time, e.report_time, \
                    e.description, e.title, e.on_going \
             FROM events e \
             JOIN municipalities m ON m.id = e.municipality_id \
             JOIN event_types t ON t.id = e.event_type_id \
             WHERE e.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Run an archive query.
    ///
    /// Non-geo filters and the bounding-box prefilter run in SQL; when a
    /// geo filter is present the candidates are narrowed to exact haversine
    /// containment in process, and distance ordering (with the `count` cap
    /// applied after sorting) happens there as well. Without a geo filter
    /// the ordering and the cap are pushed down to the store.
    pub async fn archive(pool: &PgPool, query: &ArchiveQuery) -> Result<Vec<Event>, sqlx::Error> {
        // Distance ordering is only meaningful with a geo filter; fall
        // back to newest-first otherwise.
        let order_by = match (query.order_by, query.geo) {
            (ArchiveOrder::Distance, None) => ArchiveOrder::DateDesc,
            (order, _) => order,
        };

        let chrono_direction = match order_by {
            ArchiveOrder::DateAsc => "ASC",
            _ => "DESC",
        };

        let count = clamp_count(query.count);
        let push_down_limit = query.geo.is_none();

        let limit_clause = if push_down_limit { " LIMIT $13" } else { "" };
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events e \
             WHERE ($1::TEXT IS NULL \
                    OR e.description ILIKE '%' || $1 || '%' ESCAPE '\\' \
                    OR e.title ILIKE '%' || $1 || '%' ESCAPE '\\') \
               AND ($2::BIGINT[] IS NULL OR e.municipality_id = ANY($2)) \
               AND ($3::BIGINT[] IS NULL OR e.event_type_id = ANY($3)) \
               AND ($4::BOOLEAN IS NULL OR e.on_going = $4) \
               AND ($5::TIMESTAMPTZ IS NULL OR e.create_time >= $5) \
               AND ($6::TIMESTAMPTZ IS NULL OR e.create_time < $6) \
               AND ($7::BOOLEAN OR e.description IS NOT NULL) \
               AND ($8::INTEGER IS NULL OR e.lat BETWEEN $8 AND $9) \
               AND ($10::INTEGER IS NULL OR \
                    (CASE WHEN $12::BOOLEAN THEN e.lon >= $10 OR e.lon <= $11 \
                          ELSE e.lon BETWEEN $10 AND $11 END)) \
             ORDER BY e.create_time {chrono_direction}{limit_clause}"
        );

        let encoded = EncodedBox::from_query(query);
        let search = query.search.as_deref().map(escape_like);

        let mut db_query = sqlx::query_as::<_, Event>(&sql)
            .bind(search)
            .bind(&query.municipality_ids)
            .bind(&query.event_type_ids)
            .bind(query.on_going)
            .bind(query.from)
            .bind(query.to)
            .bind(query.include_without_description)
            .bind(encoded.lat_min)
            .bind(encoded.lat_max)
            .bind(encoded.lon_west)
            .bind(encoded.lon_east)
            .bind(encoded.wraps);
        if push_down_limit {
            db_query = db_query.bind(count);
        }

        let rows = db_query.fetch_all(pool).await?;

        let Some(geo) = query.geo else {
            return Ok(rows);
        };

        // Exact circle containment over the box candidates.
        let mut with_distance: Vec<(Event, f64)> = rows
            .into_iter()
            .filter_map(|event| {
                let distance = haversine_distance_m(
                    geo.lat,
                    geo.lon,
                    decode_coord(event.lat),
                    decode_coord(event.lon),
                );
                (distance <= geo.radius_m).then_some((event, distance))
            })
            .collect();

        if order_by == ArchiveOrder::Distance {
            with_distance.sort_by(|a, b| a.1.total_cmp(&b.1));
        }
        with_distance.truncate(count as usize);

        Ok(with_distance.into_iter().map(|(event, _)| event).collect())
    }
}
