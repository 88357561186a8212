//! Tests de la chaîne de sources

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parcelles_dash::loader::{FileSource, LoadError, Loader, Source};
use parcelles_dash::report::{AttemptOutcome, LoadStatus};
use parcelles_dash::Config;

const COLLECTION: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"properties": {"fid": 7, "code_cultu": "BTA", "surf_parc": 2.5}, "geometry": null},
    {"properties": {"fid": 8, "code_cultu": "AVH", "surf_parc": 0.5}, "geometry": null}
  ]
}"#;

enum Behavior {
    Body(&'static str),
    Status(u16),
    Hang,
}

struct MockSource {
    label: String,
    behavior: Behavior,
    calls: Arc<AtomicUsize>,
}

impl MockSource {
    fn boxed(label: &str, behavior: Behavior) -> (Box<dyn Source>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = MockSource {
            label: label.to_string(),
            behavior,
            calls: calls.clone(),
        };
        (Box::new(source), calls)
    }
}

#[async_trait]
impl Source for MockSource {
    fn label(&self) -> &str {
        &self.label
    }

    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::Body(body) => Ok(body.as_bytes().to_vec()),
            Behavior::Status(status) => Err(LoadError::Status {
                label: self.label.clone(),
                status,
            }),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(COLLECTION.as_bytes().to_vec())
            }
        }
    }
}

#[tokio::test]
async fn test_second_fallback_wins_and_stops_the_chain() {
    let (primary, primary_calls) = MockSource::boxed("primary", Behavior::Status(500));
    let (fb1, fb1_calls) = MockSource::boxed("fb1", Behavior::Status(404));
    let (fb2, fb2_calls) = MockSource::boxed("fb2", Behavior::Body(COLLECTION));
    let (fb3, fb3_calls) = MockSource::boxed("fb3", Behavior::Body(COLLECTION));

    let loader = Loader::new(vec![primary, fb1, fb2, fb3], Duration::from_secs(5));
    let dataset = loader.load().await.unwrap();

    assert_eq!(dataset.source, "fb2");
    assert_eq!(dataset.parcels.len(), 2);
    assert_eq!(dataset.report.status, LoadStatus::Fallback);
    assert_eq!(dataset.report.failed_attempts(), 2);

    assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fb1_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fb2_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fb3_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_primary_success_skips_fallbacks() {
    let (primary, _) = MockSource::boxed("primary", Behavior::Body(COLLECTION));
    let (fb1, fb1_calls) = MockSource::boxed("fb1", Behavior::Body(COLLECTION));

    let loader = Loader::new(vec![primary, fb1], Duration::from_secs(5));
    let dataset = loader.load().await.unwrap();

    assert_eq!(dataset.report.status, LoadStatus::Primary);
    assert_eq!(fb1_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_timeout_advances_to_next_source() {
    let (primary, _) = MockSource::boxed("slow", Behavior::Hang);
    let (fb1, _) = MockSource::boxed("fb1", Behavior::Body(COLLECTION));

    let loader = Loader::new(vec![primary, fb1], Duration::from_millis(50));
    let dataset = loader.load().await.unwrap();

    assert_eq!(dataset.source, "fb1");
    let first = &dataset.report.attempts[0];
    assert_eq!(first.outcome, AttemptOutcome::Failed);
    assert!(first.message.as_deref().unwrap().contains("no response"));
}

#[tokio::test]
async fn test_malformed_body_counts_as_failure() {
    let (primary, _) = MockSource::boxed("empty", Behavior::Body(r#"{"features": []}"#));
    let (fb1, _) = MockSource::boxed("garbage", Behavior::Body("<html>404</html>"));
    let (fb2, _) = MockSource::boxed("good", Behavior::Body(COLLECTION));

    let loader = Loader::new(vec![primary, fb1, fb2], Duration::from_secs(5));
    let dataset = loader.load().await.unwrap();

    assert_eq!(dataset.source, "good");
    assert_eq!(dataset.report.failed_attempts(), 2);
}

#[tokio::test]
async fn test_all_sources_failed_lists_attempts() {
    let (primary, _) = MockSource::boxed("a", Behavior::Status(500));
    let (fb1, _) = MockSource::boxed("b", Behavior::Status(503));

    let loader = Loader::new(vec![primary, fb1], Duration::from_secs(5));
    match loader.load().await {
        Err(LoadError::AllSourcesFailed { attempts }) => {
            assert_eq!(attempts.len(), 2);
            assert_eq!(attempts[0].source, "a");
            assert_eq!(attempts[1].message.as_deref(), Some("b: HTTP 503"));
        }
        other => panic!("expected AllSourcesFailed, got {:?}", other.map(|d| d.source)),
    }
}

#[tokio::test]
async fn test_file_source() {
    let path = std::env::temp_dir().join("parcelles-dash-loader-test.geojson");
    std::fs::write(&path, COLLECTION).unwrap();

    let loader = Loader::new(vec![Box::new(FileSource::new(&path))], Duration::from_secs(5));
    let dataset = loader.load().await.unwrap();
    assert_eq!(dataset.parcels[0].id, 7);
    assert_eq!(dataset.source, path.display().to_string());

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_loader_from_config_with_local_paths() {
    let config = Config {
        primary_source: "/nonexistent/primary.geojson".to_string(),
        fallback_sources: vec!["file:///nonexistent/fallback.geojson".to_string()],
        timeout_secs: 2,
        ..Config::default()
    };

    let loader = Loader::from_config(&config).unwrap();
    assert_eq!(
        loader.labels(),
        vec!["/nonexistent/primary.geojson", "/nonexistent/fallback.geojson"]
    );
    assert_eq!(loader.timeout(), Duration::from_secs(2));

    let err = loader.load().await.unwrap_err();
    assert!(matches!(err, LoadError::AllSourcesFailed { ref attempts } if attempts.len() == 2));
}
