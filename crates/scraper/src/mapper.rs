//! Translation of raw upstream records into domain records.
//!
//! Mapping is pure: raw record in, [`NewEvent`]/[`NewLargeEvent`] out,
//! resolving categorical free-text fields against a [`ReferenceCache`]
//! snapshot. An unresolvable reference is fatal to the batch: the
//! reference tables are expected to be a superset of all upstream values,
//! so a miss means the reference data is stale and needs an out-of-band
//! refresh, not a silent drop.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use spinner_core::coords::encode_coord;
use spinner_core::types::{DbId, Timestamp};
use spinner_db::models::event::NewEvent;
use spinner_db::models::event_type::EventType;
use spinner_db::models::large_event::NewLargeEvent;
use spinner_db::models::municipality::Municipality;
use spinner_feed::types::{RawEvent, RawLargeEvent};

/// Upstream icon code signalling an active incident.
const ONGOING_ICON: i64 = 0;

/// Errors produced while mapping a raw record.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// A categorical field has no match in the reference snapshot.
    #[error("Unresolved {kind}: {value}")]
    UnresolvedReference { kind: &'static str, value: String },

    /// An upstream timestamp could not be parsed.
    #[error("Invalid timestamp '{value}'")]
    InvalidTimestamp { value: String },

    /// A bulletin group arrived with no entries.
    #[error("Empty bulletin group for municipality MID {mid}")]
    EmptyBulletinGroup { mid: DbId },
}

/// Read-only snapshot of the reference tables, loaded once at startup and
/// shared by reference. Restart the process to pick up reference changes.
#[derive(Debug)]
pub struct ReferenceCache {
    municipality_by_name: HashMap<String, DbId>,
    municipality_by_mid: HashMap<DbId, DbId>,
    event_type_by_name: HashMap<String, DbId>,
}

impl ReferenceCache {
    pub fn new(municipalities: Vec<Municipality>, event_types: Vec<EventType>) -> Self {
        let municipality_by_name = municipalities
            .iter()
            .map(|m| (m.name.clone(), m.id))
            .collect();
        let municipality_by_mid = municipalities.iter().map(|m| (m.mid, m.id)).collect();
        let event_type_by_name = event_types.into_iter().map(|t| (t.name, t.id)).collect();
        Self {
            municipality_by_name,
            municipality_by_mid,
            event_type_by_name,
        }
    }

    /// Resolve a municipality by exact name (used for incident events).
    pub fn municipality_by_name(&self, name: &str) -> Result<DbId, MapError> {
        self.municipality_by_name
            .get(name)
            .copied()
            .ok_or_else(|| MapError::UnresolvedReference {
                kind: "municipality",
                value: name.to_string(),
            })
    }

    /// Resolve a municipality by upstream MID (used for bulletins, whose
    /// names drift).
    pub fn municipality_by_mid(&self, mid: DbId) -> Result<DbId, MapError> {
        self.municipality_by_mid
            .get(&mid)
            .copied()
            .ok_or_else(|| MapError::UnresolvedReference {
                kind: "municipality MID",
                value: mid.to_string(),
            })
    }

    /// Resolve an event type by exact name.
    pub fn event_type_by_name(&self, name: &str) -> Result<DbId, MapError> {
        self.event_type_by_name
            .get(name)
            .copied()
            .ok_or_else(|| MapError::UnresolvedReference {
                kind: "event type",
                value: name.to_string(),
            })
    }
}

/// Map one raw incident record to an insertable event.
pub fn map_event(raw: &RawEvent, cache: &ReferenceCache) -> Result<NewEvent, MapError> {
    let municipality_id = cache.municipality_by_name(&raw.municipality_name)?;
    let event_type_id = cache.event_type_by_name(&raw.event_type_name)?;

    Ok(NewEvent {
        id: raw.id,
        municipality_id,
        event_type_id,
        lat: encode_coord(raw.lat),
        lon: encode_coord(raw.lon),
        create_time: parse_timestamp(&raw.create_time)?,
        report_time: parse_timestamp(&raw.report_time)?,
        description: normalize_text(raw.description.as_deref()),
        title: normalize_text(raw.title.as_deref()),
        on_going: raw.icon == ONGOING_ICON,
    })
}

/// Map one raw bulletin group to an insertable large event.
///
/// The description joins every bulletin text with blank lines; the create
/// time is the first bulletin entry's date.
pub fn map_large_event(
    raw: &RawLargeEvent,
    cache: &ReferenceCache,
) -> Result<NewLargeEvent, MapError> {
    let municipality_id = cache.municipality_by_mid(raw.municipality_mid)?;

    let first = raw.bulletins.first().ok_or(MapError::EmptyBulletinGroup {
        mid: raw.municipality_mid,
    })?;

    let description = raw
        .bulletins
        .iter()
        .map(|b| b.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok(NewLargeEvent {
        municipality_id,
        create_time: parse_timestamp(&first.date)?,
        description,
    })
}

/// Trim whitespace; empty-after-trim becomes absent.
pub fn normalize_text(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
}

/// Parse an upstream timestamp: RFC 3339 first, then the bare local-time
/// form `%Y-%m-%dT%H:%M:%S` (optionally fractional) treated as UTC.
pub fn parse_timestamp(value: &str) -> Result<Timestamp, MapError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| MapError::InvalidTimestamp {
            value: value.to_string(),
        })
}
