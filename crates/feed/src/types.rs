//! Raw upstream record types.
//!
//! Field names mirror the upstream Slovenian JSON via serde renames; the
//! mapper in `spinner-scraper` translates these into domain records.

use serde::{Deserialize, Serialize};

/// One incident record as served by the detail and live endpoints.
///
/// The detail endpoint omits the ID from the body (it is part of the URL);
/// [`crate::FeedClient::fetch_event`] fills it in.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawEvent {
    #[serde(default)]
    pub id: i64,
    /// Status/icon code; `0` signals an active (ongoing) incident.
    #[serde(rename = "ikona")]
    pub icon: i64,
    #[serde(rename = "intervencijaVrstaNaziv")]
    pub event_type_name: String,
    #[serde(rename = "obcinaNaziv")]
    pub municipality_name: String,
    /// Creation timestamp, e.g. `2023-01-15T12:34:56`.
    #[serde(rename = "nastanekCas")]
    pub create_time: String,
    /// Report timestamp, same format as `create_time`.
    #[serde(rename = "prijavaCas")]
    pub report_time: String,
    #[serde(rename = "wgsLat")]
    pub lat: f64,
    #[serde(rename = "wgsLon")]
    pub lon: f64,
    #[serde(rename = "besedilo", default)]
    pub description: Option<String>,
    #[serde(rename = "dogodekNaziv", default)]
    pub title: Option<String>,
}

/// One bulletin entry within a large-scale event group.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawBulletin {
    #[serde(rename = "besedilo")]
    pub text: String,
    #[serde(rename = "datum")]
    pub date: String,
}

/// A large-scale event group: one municipality with its bulletin texts.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawLargeEvent {
    #[serde(rename = "obcinaMID")]
    pub municipality_mid: i64,
    #[serde(rename = "obcinaNaziv")]
    pub municipality_name: String,
    #[serde(rename = "besediloList")]
    pub bulletins: Vec<RawBulletin>,
}

/// Upstream `{ value: ... }` envelope for the detail endpoint. A null or
/// missing `value` means the ID was skipped upstream.
#[derive(Debug, Deserialize)]
pub(crate) struct EventEnvelope {
    #[serde(default)]
    pub value: Option<RawEvent>,
}

/// Envelope for the list-shaped snapshot endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_event_deserializes_upstream_field_names() {
        let json = r#"{
            "barva": 1,
            "ikona": 0,
            "intervencijaVrstaNaziv": "Požari v naravi",
            "obcinaNaziv": "Ljubljana",
            "nastanekCas": "2023-01-15T12:34:56",
            "prijavaCas": "2023-01-15T12:40:00",
            "wgsLat": 46.0569,
            "wgsLon": 14.5058,
            "dogodekNaziv": "Požar"
        }"#;
        let event: RawEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.icon, 0);
        assert_eq!(event.event_type_name, "Požari v naravi");
        assert_eq!(event.municipality_name, "Ljubljana");
        assert_eq!(event.lat, 46.0569);
        assert_eq!(event.description, None);
        assert_eq!(event.title.as_deref(), Some("Požar"));
    }

    #[test]
    fn envelope_with_null_value_is_absent() {
        let envelope: EventEnvelope =
            serde_json::from_str(r#"{"statusCode": 0, "value": null}"#).unwrap();
        assert!(envelope.value.is_none());
        let envelope: EventEnvelope = serde_json::from_str(r#"{"statusCode": 0}"#).unwrap();
        assert!(envelope.value.is_none());
    }

    #[test]
    fn large_event_deserializes_bulletin_list() {
        let json = r#"{
            "obcinaMID": 11027602,
            "obcinaNaziv": "Kočevje",
            "besediloList": [
                {"besedilo": "Obvestilo o poplavah.", "datum": "2023-08-04T08:00:00"}
            ]
        }"#;
        let large: RawLargeEvent = serde_json::from_str(json).unwrap();
        assert_eq!(large.municipality_mid, 11027602);
        assert_eq!(large.bulletins.len(), 1);
        assert_eq!(large.bulletins[0].text, "Obvestilo o poplavah.");
    }
}
