//! End-to-end ingestion pipeline tests against the in-memory store.
//!
//! Fixture listing pages are written to a temp directory in the
//! upstream site's card markup.

use std::path::PathBuf;
use std::sync::Arc;

use sevadir_ingestion::pipeline::{run_ingestion, IngestionJob};
use sevadir_ingestion::repository::IngestionRepository;
use sevadir_store::{DirectoryStore, MemoryStore};

/// One well-formed organization card in the site's markup.
fn card(name: &str, city: &str) -> String {
    format!(
        concat!(
            r#"<div class="lay-1 donor-menories-bg">"#,
            "<span>{name}</span>",
            "<span>12 MG Road</span>",
            "<span>{city}</span>",
            "<span>Maharashtra</span>",
            " Pincode - 411001 Phone: 020-2612 / Mobile: 98765 43210 ",
            // "info@asha.org" obfuscated under key 0x5a
            r#"<a class="__cf_email__" data-cfemail="5a33343c351a3b29323b7435283d">[email protected]</a>"#,
            "</div>"
        ),
        name = name,
        city = city,
    )
}

fn page(cards: &[String]) -> String {
    format!("<html><body>{}</body></html>", cards.join("\n"))
}

fn write_page(dir: &tempfile::TempDir, file: &str, content: &str) -> PathBuf {
    let path = dir.path().join(file);
    std::fs::write(&path, content).unwrap();
    path
}

fn setup() -> (Arc<MemoryStore>, Arc<IngestionRepository>) {
    let store = Arc::new(MemoryStore::new());
    let repo = Arc::new(IngestionRepository::new(store.clone()));
    (store, repo)
}

#[tokio::test]
async fn test_full_run_inserts_scored_records() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_page(
        &dir,
        "page1.html",
        &page(&[card("Asha Trust", "Pune"), card("Seva Sadan", "Mumbai")]),
    );

    let (store, repo) = setup();
    let job = IngestionJob {
        documents: vec![doc],
    };
    let summary = run_ingestion(job, repo, None).await.unwrap();

    assert_eq!(summary.parsed, 2);
    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.skipped_duplicate, 0);
    assert_eq!(summary.malformed, 0);
    assert_eq!(summary.files_missing, 0);

    let org = store
        .find_by_key("Asha Trust", Some("Pune"), Some("Maharashtra"))
        .await
        .unwrap()
        .expect("scraped organization should be stored");
    assert_eq!(org.email.as_deref(), Some("info@asha.org"));
    assert_eq!(
        org.phone.as_deref(),
        Some("020-2612 | Mobile: 98765 43210")
    );
    assert_eq!(org.address.as_deref(), Some("12 MG Road - 411001"));
    assert_eq!(org.country, "India");
    assert_eq!(org.district, None);
    assert!(!org.verified);
    assert!(org.active);
    assert_eq!(org.source, "ngo-directory-scrape");
    // name 5 + email 10 + phone 5 + address 10 + city/state 10
    assert_eq!(org.transparency_score, 40);
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let doc1 = write_page(&dir, "page1.html", &page(&[card("Asha Trust", "Pune")]));
    let doc2 = write_page(&dir, "page2.html", &page(&[card("Seva Sadan", "Mumbai")]));

    let (store, repo) = setup();
    let job = IngestionJob {
        documents: vec![doc1, doc2],
    };

    let first = run_ingestion(job.clone(), repo.clone(), None).await.unwrap();
    assert_eq!(first.inserted, 2);
    assert_eq!(first.skipped_duplicate, 0);

    let second = run_ingestion(job, repo, None).await.unwrap();
    assert_eq!(second.parsed, 2);
    assert_eq!(second.inserted, 0);
    assert_eq!(second.skipped_duplicate, 2);
    assert_eq!(store.count().await, 2);
}

#[tokio::test]
async fn test_duplicate_across_pages_within_one_run() {
    // The upstream site's pagination can repeat an organization on two
    // pages; only the first occurrence is inserted.
    let dir = tempfile::tempdir().unwrap();
    let doc1 = write_page(&dir, "page1.html", &page(&[card("Asha Trust", "Pune")]));
    let doc2 = write_page(&dir, "page2.html", &page(&[card("Asha Trust", "Pune")]));

    let (store, repo) = setup();
    let job = IngestionJob {
        documents: vec![doc1, doc2],
    };
    let summary = run_ingestion(job, repo, None).await.unwrap();

    assert_eq!(summary.parsed, 2);
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.skipped_duplicate, 1);
    assert_eq!(store.count().await, 1);
}

#[tokio::test]
async fn test_malformed_card_is_counted_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let malformed = r#"<div class="lay-1 donor-menories-bg"><span>Only</span><span>Two</span></div>"#;
    let doc = write_page(
        &dir,
        "page1.html",
        &page(&[card("Asha Trust", "Pune"), malformed.to_string()]),
    );

    let (_store, repo) = setup();
    let job = IngestionJob {
        documents: vec![doc],
    };
    let summary = run_ingestion(job, repo, None).await.unwrap();

    assert_eq!(summary.parsed, 1);
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.malformed, 1);
}

#[tokio::test]
async fn test_missing_document_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_page(&dir, "page1.html", &page(&[card("Asha Trust", "Pune")]));
    let missing = dir.path().join("no-such-page.html");

    let (_store, repo) = setup();
    let job = IngestionJob {
        documents: vec![missing, doc],
    };
    let summary = run_ingestion(job, repo, None).await.unwrap();

    assert_eq!(summary.files_missing, 1);
    assert_eq!(summary.parsed, 1);
    assert_eq!(summary.inserted, 1);
}

#[tokio::test]
async fn test_legacy_encoded_page_is_decoded() {
    let dir = tempfile::tempdir().unwrap();
    // Name contains 0xE9 ("é" in windows-1252, invalid as UTF-8).
    let html = page(&[card("Soci\u{e9}t\u{e9} Seva", "Pune")]);
    let bytes: Vec<u8> = html
        .chars()
        .map(|c| if c == '\u{e9}' { 0xE9u8 } else { c as u8 })
        .collect();
    let path = dir.path().join("page1.html");
    std::fs::write(&path, bytes).unwrap();

    let (store, repo) = setup();
    let job = IngestionJob {
        documents: vec![path],
    };
    let summary = run_ingestion(job, repo, None).await.unwrap();

    assert_eq!(summary.inserted, 1);
    let org = store
        .find_by_key("Soci\u{e9}t\u{e9} Seva", Some("Pune"), Some("Maharashtra"))
        .await
        .unwrap();
    assert!(org.is_some(), "windows-1252 name should round-trip");
}

#[tokio::test]
async fn test_progress_events_are_emitted() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_page(&dir, "page1.html", &page(&[card("Asha Trust", "Pune")]));

    let (_store, repo) = setup();
    let (tx, mut rx) = tokio::sync::broadcast::channel(64);
    let job = IngestionJob {
        documents: vec![doc],
    };
    run_ingestion(job, repo, Some(tx)).await.unwrap();

    let mut stages = Vec::new();
    while let Ok(event) = rx.try_recv() {
        stages.push(event.stage);
    }
    assert!(stages.contains(&"load".to_string()));
    assert!(stages.contains(&"document_done".to_string()));
    assert_eq!(stages.last().map(String::as_str), Some("complete"));
}
