//! Integration tests for the reconciliation engine against a local stub
//! of the upstream feed.
//!
//! The stub serves the RSS index, the per-ID detail endpoint, and the
//! bulletin snapshot over a real listener, so these tests exercise the
//! whole tick path: fetch, map, insert, store.

use std::collections::HashMap;
use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::PgPool;

use spinner_db::models::event::NewEvent;
use spinner_db::models::event_type::EventType;
use spinner_db::models::municipality::Municipality;
use spinner_db::repositories::{EventRepo, LargeEventRepo};
use spinner_feed::{FeedClient, FeedConfig};
use spinner_scraper::reconcile::ScraperConfig;
use spinner_scraper::{MapError, PushClient, ReferenceCache, ScrapeError, Scraper};

const LJUBLJANA_MID: i64 = 11027602;

struct StubFeed {
    index_ids: Vec<i64>,
    events: HashMap<i64, Value>,
    large_events: Vec<Value>,
}

async fn rss_index(State(stub): State<Arc<StubFeed>>) -> String {
    let items: String = stub
        .index_ids
        .iter()
        .map(|id| format!("<item><link>https://stub/lokacija/{id}</link></item>"))
        .collect();
    format!("<rss><channel><link>https://stub</link>{items}</channel></rss>")
}

async fn event_detail(State(stub): State<Arc<StubFeed>>, Path(id): Path<i64>) -> Json<Value> {
    // Absent IDs serialize as a null `value`, like upstream.
    Json(json!({ "value": stub.events.get(&id) }))
}

async fn large_events(State(stub): State<Arc<StubFeed>>) -> Json<Value> {
    Json(json!({ "value": stub.large_events }))
}

/// Serve the stub on an ephemeral local port, returning its base URL.
async fn serve(stub: StubFeed) -> String {
    let app = Router::new()
        .route("/ODRSS/true", get(rss_index))
        .route("/lokacija/{id}", get(event_detail))
        .route("/vecjiObseg.json", get(large_events))
        .with_state(Arc::new(stub));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// One upstream detail record in the municipality given by name.
fn detail(municipality: &str) -> Value {
    json!({
        "ikona": 0,
        "intervencijaVrstaNaziv": "Požar",
        "obcinaNaziv": municipality,
        "nastanekCas": "2024-03-01T08:00:00",
        "prijavaCas": "2024-03-01T08:05:00",
        "wgsLat": 46.0569,
        "wgsLon": 14.5058,
        "besedilo": "opis",
        "dogodekNaziv": "Požar"
    })
}

/// Seed the reference tables and build a scraper against the stub base
/// URL. Returns the scraper plus the seeded reference IDs.
async fn build_scraper(pool: &PgPool, base: &str) -> (Scraper, i64, i64) {
    let municipality_id: i64 =
        sqlx::query_scalar("INSERT INTO municipalities (name, mid) VALUES ($1, $2) RETURNING id")
            .bind("Ljubljana")
            .bind(LJUBLJANA_MID)
            .fetch_one(pool)
            .await
            .expect("seed municipality");
    let event_type_id: i64 =
        sqlx::query_scalar("INSERT INTO event_types (name) VALUES ($1) RETURNING id")
            .bind("Požar")
            .fetch_one(pool)
            .await
            .expect("seed event type");

    let cache = Arc::new(ReferenceCache::new(
        vec![Municipality {
            id: municipality_id,
            name: "Ljubljana".into(),
            mid: LJUBLJANA_MID,
        }],
        vec![EventType {
            id: event_type_id,
            name: "Požar".into(),
        }],
    ));

    let feed = FeedClient::new(FeedConfig {
        api_base: base.to_string(),
        assets_base: base.to_string(),
    });
    // The push sink is never contacted: no subscriptions are registered.
    let push = PushClient::new(format!("{base}/push-unused"), String::new());

    let scraper = Scraper::new(pool.clone(), feed, cache, push, ScraperConfig::default());
    (scraper, municipality_id, event_type_id)
}

async fn seed_event(pool: &PgPool, id: i64, municipality_id: i64, event_type_id: i64) {
    EventRepo::insert_batch(
        pool,
        &[NewEvent {
            id,
            municipality_id,
            event_type_id,
            lat: 46056,
            lon: 14505,
            create_time: Utc::now(),
            report_time: Utc::now(),
            description: Some("seed".into()),
            title: None,
            on_going: false,
        }],
    )
    .await
    .expect("seed event");
}

#[sqlx::test(migrations = "../../migrations")]
async fn scrape_latest_catches_up_then_noops(pool: PgPool) {
    let base = serve(StubFeed {
        index_ids: vec![1, 2, 3],
        events: HashMap::from([(2, detail("Ljubljana")), (3, detail("Ljubljana"))]),
        large_events: vec![],
    })
    .await;
    let (scraper, municipality_id, event_type_id) = build_scraper(&pool, &base).await;
    seed_event(&pool, 1, municipality_id, event_type_id).await;

    let inserted = scraper.scrape_latest().await.unwrap();
    assert_eq!(inserted, 2);
    assert_eq!(EventRepo::max_id(&pool).await.unwrap(), Some(3));
    assert_eq!(EventRepo::count(&pool).await.unwrap(), 3);

    // Upstream unchanged, so the second run must insert nothing.
    let inserted = scraper.scrape_latest().await.unwrap();
    assert_eq!(inserted, 0);
    assert_eq!(EventRepo::count(&pool).await.unwrap(), 3);
}

#[sqlx::test(migrations = "../../migrations")]
async fn absent_upstream_ids_are_skipped(pool: PgPool) {
    // IDs 6 and 7 fall inside the gap but have no upstream record.
    let base = serve(StubFeed {
        index_ids: vec![5, 8],
        events: HashMap::from([(5, detail("Ljubljana")), (8, detail("Ljubljana"))]),
        large_events: vec![],
    })
    .await;
    let (scraper, municipality_id, event_type_id) = build_scraper(&pool, &base).await;
    seed_event(&pool, 4, municipality_id, event_type_id).await;

    let inserted = scraper.scrape_latest().await.unwrap();
    assert_eq!(inserted, 2);
    assert_eq!(EventRepo::max_id(&pool).await.unwrap(), Some(8));
    assert_eq!(EventRepo::count(&pool).await.unwrap(), 3);
}

#[sqlx::test(migrations = "../../migrations")]
async fn unresolved_reference_aborts_batch_before_insert(pool: PgPool) {
    let base = serve(StubFeed {
        index_ids: vec![],
        events: HashMap::from([(10, detail("Ljubljana")), (11, detail("Atlantida"))]),
        large_events: vec![],
    })
    .await;
    let (scraper, _, _) = build_scraper(&pool, &base).await;

    let result = scraper.scrape_range(10, 11).await;
    assert_matches!(
        result,
        Err(ScrapeError::Map(MapError::UnresolvedReference {
            kind: "municipality",
            ..
        }))
    );

    // The resolvable ID 10 must not have been inserted either.
    assert_eq!(EventRepo::count(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn empty_bulletin_group_is_skipped_not_fatal(pool: PgPool) {
    let base = serve(StubFeed {
        index_ids: vec![],
        events: HashMap::new(),
        large_events: vec![
            json!({
                "obcinaMID": LJUBLJANA_MID,
                "obcinaNaziv": "Ljubljana",
                "besediloList": [
                    {"besedilo": "Obvestilo o poplavah.", "datum": "2024-03-01T08:00:00"}
                ]
            }),
            json!({
                "obcinaMID": LJUBLJANA_MID,
                "obcinaNaziv": "Ljubljana",
                "besediloList": []
            }),
        ],
    })
    .await;
    let (scraper, _, _) = build_scraper(&pool, &base).await;

    let inserted = scraper.scrape_large_events().await.unwrap();
    assert_eq!(inserted, 1);

    let stored = LargeEventRepo::list_recent(&pool, 10).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].description, "Obvestilo o poplavah.");
}
