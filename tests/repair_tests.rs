//! Integration tests for the repair pipeline
//!
//! The archive is exercised over HTTP with wiremock; the embedder and the
//! generator use the shared deterministic stubs.

mod common;

use common::{StubEmbedder, StubGenerator};
use linkmend::config::Config;
use linkmend::crawler::LinkManager;
use linkmend::repair::{GeneratedSuggestion, RepairEngine, SuggestionSource, WaybackClient};
use linkmend::similarity::{IndexEntry, SimilarityIndex};
use linkmend::state::{KnownGoodRegistry, LinkContext, LinkStatus};
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn broken(url: &str, anchor: &str) -> LinkStatus {
    let context = LinkContext {
        text: anchor.to_string(),
        page_url: "https://site.test/".to_string(),
        ..Default::default()
    };
    LinkStatus::checked(url.to_string(), 404, Some(context))
}

async fn indexed(entries: &[(&str, &str)]) -> SimilarityIndex {
    let mut index = SimilarityIndex::new(Arc::new(StubEmbedder), 0.8);
    index
        .build(
            entries
                .iter()
                .map(|(text, page_url)| IndexEntry {
                    text: text.to_string(),
                    metadata: LinkContext {
                        text: text.to_string(),
                        page_url: page_url.to_string(),
                        ..Default::default()
                    },
                })
                .collect(),
        )
        .await
        .expect("index build");
    index
}

fn registry_of(urls: &[&str]) -> KnownGoodRegistry {
    let mut registry = KnownGoodRegistry::new();
    for url in urls {
        registry.record(&LinkStatus::checked(url.to_string(), 200, None));
    }
    registry
}

#[tokio::test]
async fn test_wayback_snapshot_becomes_archive_suggestion() {
    let archive = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wayback/available"))
        .and(query_param("url", "https://site.test/gone"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "url": "https://site.test/gone",
                "archived_snapshots": {
                    "closest": {
                        "status": "200",
                        "available": true,
                        "url": "http://web.archive.org/web/2019/https://site.test/gone",
                        "timestamp": "20190101000000"
                    }
                }
            })),
        )
        .expect(1)
        .mount(&archive)
        .await;

    let wayback = WaybackClient::new(format!("{}/wayback/available", archive.uri()))
        .expect("wayback client");
    let engine = RepairEngine::new(Some(Arc::new(wayback)), None, 5);

    let suggestions = engine
        .repair(
            &broken("https://site.test/gone", ""),
            &indexed(&[]).await,
            &KnownGoodRegistry::new(),
        )
        .await;

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].source, SuggestionSource::Archive);
    assert_eq!(suggestions[0].confidence, 0.9);
    assert_eq!(
        suggestions[0].suggested_url,
        "http://web.archive.org/web/2019/https://site.test/gone"
    );
}

#[tokio::test]
async fn test_missing_snapshot_yields_no_archive_suggestion() {
    let archive = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wayback/available"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "archived_snapshots": {} })),
        )
        .expect(1)
        .mount(&archive)
        .await;

    let wayback = WaybackClient::new(format!("{}/wayback/available", archive.uri()))
        .expect("wayback client");
    let engine = RepairEngine::new(Some(Arc::new(wayback)), None, 5);

    let suggestions = engine
        .repair(
            &broken("https://site.test/gone", ""),
            &indexed(&[]).await,
            &KnownGoodRegistry::new(),
        )
        .await;

    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn test_archive_failure_does_not_block_other_sources() {
    let archive = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&archive)
        .await;

    let wayback = WaybackClient::new(format!("{}/wayback/available", archive.uri()))
        .expect("wayback client");
    let engine = RepairEngine::new(
        Some(Arc::new(wayback)),
        Some(Arc::new(StubGenerator {
            suggestions: vec![GeneratedSuggestion {
                url: "https://site.test/guess".to_string(),
                confidence: 0.5,
                reason: "similar slug".to_string(),
            }],
            fail: false,
        })),
        5,
    );

    let suggestions = engine
        .repair(
            &broken("https://site.test/gone", ""),
            &indexed(&[]).await,
            &KnownGoodRegistry::new(),
        )
        .await;

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].source, SuggestionSource::Generated);
}

#[tokio::test]
async fn test_sources_are_merged_and_ranked() {
    let archive = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wayback/available"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "archived_snapshots": {
                    "closest": { "url": "http://web.archive.org/web/2020/gone" }
                }
            })),
        )
        .mount(&archive)
        .await;

    let wayback = WaybackClient::new(format!("{}/wayback/available", archive.uri()))
        .expect("wayback client");
    let engine = RepairEngine::new(
        Some(Arc::new(wayback)),
        Some(Arc::new(StubGenerator {
            suggestions: vec![GeneratedSuggestion {
                url: "https://site.test/guess".to_string(),
                confidence: 0.5,
                reason: "similar slug".to_string(),
            }],
            fail: false,
        })),
        5,
    );

    let index = indexed(&[("broken anchor", "https://site.test/live")]).await;
    let registry = registry_of(&["https://site.test/live"]);

    let suggestions = engine
        .repair(
            &broken("https://site.test/gone", "broken anchor"),
            &index,
            &registry,
        )
        .await;

    // exact similarity match (1.0), archive (0.9), generated (0.5)
    assert_eq!(suggestions.len(), 3);
    assert_eq!(suggestions[0].source, SuggestionSource::Similarity);
    assert_eq!(suggestions[0].suggested_url, "https://site.test/live");
    assert_eq!(suggestions[1].source, SuggestionSource::Archive);
    assert_eq!(suggestions[2].source, SuggestionSource::Generated);
}

#[tokio::test]
async fn test_manager_caps_suggestions() {
    let generated: Vec<GeneratedSuggestion> = (0..7)
        .map(|i| GeneratedSuggestion {
            url: format!("https://site.test/guess-{}", i),
            confidence: 0.1 + 0.1 * i as f32,
            reason: "pattern".to_string(),
        })
        .collect();

    let manager = LinkManager::new(
        Config::default(),
        Arc::new(StubEmbedder),
        None,
        Some(Arc::new(StubGenerator {
            suggestions: generated,
            fail: false,
        })),
    )
    .expect("manager");

    let suggestions = manager
        .repair_link(&broken("https://site.test/gone", ""))
        .await;

    // Seven candidates, capped at max-suggestions with the best kept
    assert_eq!(suggestions.len(), 5);
    assert_eq!(suggestions[0].suggested_url, "https://site.test/guess-6");
    for pair in suggestions.windows(2) {
        assert!(pair[0].confidence >= pair[1].confidence);
    }
}
