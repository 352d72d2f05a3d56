//! End-to-end extraction tests over the public API

use millwright_domain::{Document, Scalar};
use millwright_extractor::{ExtractionOutcome, Extractor, ExtractorConfig};
use millwright_llm::MockProvider;
use std::time::Duration;

fn fast_config() -> ExtractorConfig {
    let mut config = ExtractorConfig::default();
    config.router.backoff = Duration::from_millis(1);
    config
}

/// Canonical batch scenario: filter keeps the boiler and generator lines,
/// drops the emission line, and the mocked model response flows through
/// normalization into one validated record.
#[tokio::test]
async fn boiler_scenario_end_to_end() {
    let primary = MockProvider::new(
        r#"{"assets":[{"asset_type":"boiler","capacity_value":"500","capacity_unit":"kW","count_of_units":"1"}]}"#,
    );
    let extractor = Extractor::new(primary, MockProvider::default(), fast_config());

    let doc = Document::new(
        "site_42_1",
        "Boiler capacity 500 kW installed in hall 3\nEmission limit 10 mg/Nm3\nGenerator 200 kVA backup",
    );

    let extraction = extractor.extract_document(&doc).await;

    assert_eq!(extraction.assets.len(), 1);
    let record = &extraction.assets[0];
    assert_eq!(record.asset_type, "boiler");
    assert_eq!(record.capacity_value, Some(Scalar::Text("500".to_string())));
    assert_eq!(record.capacity_unit.as_deref(), Some("kW"));
    assert_eq!(record.count_of_units, Some(Scalar::Text("1".to_string())));
    assert_eq!(extraction.outcome, ExtractionOutcome::Extracted { dropped: 0 });
}

/// Primary down three times, fallback carries the document.
#[tokio::test]
async fn fallback_carries_extraction_when_primary_is_down() {
    let primary = MockProvider::always_failing("rate limited");
    let fallback = MockProvider::new(r#"[{"asset_type":"transformer","capacity_value":630,"capacity_unit":"kVA"}]"#);
    let extractor = Extractor::new(primary.clone(), fallback.clone(), fast_config());

    let doc = Document::new("site_42_2", "Distribution transformer 630 kVA");
    let extraction = extractor.extract_document(&doc).await;

    assert_eq!(primary.call_count(), 3);
    assert_eq!(fallback.call_count(), 1);
    assert_eq!(extraction.assets.len(), 1);
    assert_eq!(extraction.assets[0].asset_type, "transformer");
}

/// Malformed model output degrades to zero assets without failing.
#[tokio::test]
async fn malformed_response_degrades_to_empty() {
    let primary = MockProvider::new("I'm sorry, I couldn't find any structured data.");
    let extractor = Extractor::new(primary, MockProvider::default(), fast_config());

    let doc = Document::new("site_42_3", "Steam boiler 2 MW");
    let extraction = extractor.extract_document(&doc).await;

    assert!(extraction.assets.is_empty());
    // The response arrived, so this is an Extracted outcome, not Failed
    assert!(matches!(extraction.outcome, ExtractionOutcome::Extracted { .. }));
}

/// Invalid candidates are removed while valid ones survive.
#[tokio::test]
async fn partial_validity_keeps_good_records() {
    let primary = MockProvider::new(
        r#"{"assets":[
            {"asset_type":"chiller","capacity_value":"350","capacity_unit":"kW"},
            {"capacity_value":"9000"},
            {"asset_type":""}
        ]}"#,
    );
    let extractor = Extractor::new(primary, MockProvider::default(), fast_config());

    let doc = Document::new("site_42_4", "Cooling unit: chiller 350 kW");
    let extraction = extractor.extract_document(&doc).await;

    assert_eq!(extraction.assets.len(), 1);
    assert_eq!(extraction.assets[0].asset_type, "chiller");
    assert_eq!(extraction.outcome, ExtractionOutcome::Extracted { dropped: 2 });
}
