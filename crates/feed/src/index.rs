//! RSS index parsing.
//!
//! The index feed is an RSS document whose item links end in the numeric
//! event ID (`.../lokacija/12345`). Only the trailing segment matters, so
//! the IDs are pulled out with a regex over the item `<link>` elements
//! rather than a full XML parse.

use std::sync::OnceLock;

use regex::Regex;

fn link_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<link>\s*[^<]*/(\d+)\s*</link>").expect("link regex must compile")
    })
}

/// Extract event IDs from the RSS index document, in document order.
///
/// Links without a numeric trailing segment (e.g. the channel-level link)
/// are skipped.
pub fn parse_index_ids(body: &str) -> Vec<i64> {
    link_id_regex()
        .captures_iter(body)
        .filter_map(|captures| captures[1].parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0">
  <channel>
    <title>SPIN dogodki</title>
    <link>https://spin3.sos112.si</link>
    <item>
      <title>Dogodek 101</title>
      <link>https://spin3.sos112.si/javno/pregled/lokacija/101</link>
    </item>
    <item>
      <title>Dogodek 105</title>
      <link> https://spin3.sos112.si/javno/pregled/lokacija/105 </link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn extracts_trailing_numeric_ids_in_order() {
        assert_eq!(parse_index_ids(SAMPLE), vec![101, 105]);
    }

    #[test]
    fn skips_non_numeric_channel_link() {
        // The channel link has no numeric tail and must not appear.
        assert!(!parse_index_ids(SAMPLE).contains(&0));
        assert_eq!(parse_index_ids(SAMPLE).len(), 2);
    }

    #[test]
    fn empty_document_yields_no_ids() {
        assert!(parse_index_ids("<rss></rss>").is_empty());
        assert!(parse_index_ids("").is_empty());
    }
}
