//! Unit tests for the currency module.


/// Rate document shaped like the upstream daily publication.
const SAMPLE_DOCUMENT: &str = include_str!("../../../tests/fixtures/daily_json.json");
