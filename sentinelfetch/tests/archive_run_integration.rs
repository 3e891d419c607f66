//! End-to-end runs against a mock HUB over real HTTP.

use std::fs;
use std::path::Path;

use chrono::{TimeZone, Utc};
use httpmock::prelude::*;
use tempfile::TempDir;

use sentinelfetch::archive::ArchiveResolver;
use sentinelfetch::hub::{Credentials, HubSettings, ReqwestTransport};
use sentinelfetch::query::{FixedClock, QueryParameters, SearchFilters, SearchRequest};
use sentinelfetch::report::{MemoryReporter, RunEvent};
use sentinelfetch::run::{ArchiveRun, RunError};

const S1_ID: &str = "S1A_IW_GRDH_1SDV_20181001T055140_20181001T055205_023931_029CE0_5A2B";
const LANDSAT_ID: &str = "LC08_L1TP_204024_20181001_20181001_01_RT";

/// "user:pass"
const BASIC_AUTH: &str = "Basic dXNlcjpwYXNz";

fn entry(uuid: &str, identifier: &str) -> String {
    format!(
        r#"<entry>
    <title>{identifier}</title>
    <date name="beginposition">2018-10-01T05:51:40.000Z</date>
    <date name="endposition">2018-10-01T05:52:05.000Z</date>
    <str name="identifier">{identifier}</str>
    <str name="uuid">{uuid}</str>
  </entry>"#
    )
}

fn feed(entries: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/" xmlns="http://www.w3.org/2005/Atom">
  <title>Sentinels Data Hub search results</title>
  {}
</feed>"#,
        entries.join("\n  ")
    )
}

fn params(server: &MockServer, max_rows: usize) -> QueryParameters {
    let request = SearchRequest {
        footprint: Some("50.0,-10.0:51.0,-9.0".to_string()),
        date_from: Some("20181001".to_string()),
        date_to: Some("20181001".to_string()),
        filters: SearchFilters {
            platform_name: Some("Sentinel-1".to_string()),
            ..Default::default()
        },
    };
    let hub = HubSettings::new(server.base_url(), Credentials::new("user", "pass"));
    let clock = FixedClock(Utc.with_ymd_and_hms(2018, 10, 2, 12, 0, 0).unwrap());
    QueryParameters::build(&request, hub, max_rows, &clock).unwrap()
}

fn archive_run(server: &MockServer, max_rows: usize, root: &Path, scratch: &Path) -> ArchiveRun {
    ArchiveRun::new(
        Box::new(ReqwestTransport::new().unwrap()),
        params(server, max_rows),
        ArchiveResolver::new(root, true),
    )
    .with_scratch_parent(scratch)
}

fn mock_search(server: &MockServer, entries: &[String]) {
    let body = feed(entries);
    server.mock(|when, then| {
        when.method(GET)
            .path("/search")
            .query_param("start", "0")
            .header("authorization", BASIC_AUTH);
        then.status(200)
            .header("content-type", "application/xml")
            .body(body);
    });
}

fn mock_product(server: &MockServer, uuid: &str, filename: &str, body: &'static str) {
    let path = format!("/odata/v1/Products('{}')/$value", uuid);
    let disposition = format!("inline;filename=\"{}\"", filename);
    let range = format!("bytes 0-{}/{}", body.len() - 1, body.len());
    server.mock(|when, then| {
        when.method(GET)
            .path(path.as_str())
            .header("authorization", BASIC_AUTH);
        then.status(200)
            .header("Content-Disposition", disposition.as_str())
            .header("Content-Range", range.as_str())
            .body(body);
    });
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path).unwrap().next().is_none()
}

#[test]
fn test_two_record_run_archives_known_mission_only() {
    let server = MockServer::start();
    mock_search(
        &server,
        &[entry("uuid-s1", S1_ID), entry("uuid-lc", LANDSAT_ID)],
    );
    let filename = format!("{}.zip", S1_ID);
    mock_product(&server, "uuid-s1", &filename, "sentinel-1 product bytes");

    let archive = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let reporter = MemoryReporter::new();

    let summary = archive_run(&server, 99, archive.path(), scratch.path())
        .execute(&reporter)
        .unwrap();

    assert_eq!(summary.archived(), 1);
    assert_eq!(summary.skipped(), 1);
    assert_eq!(summary.failed(), 0);

    let day_dir = archive.path().join("2018").join("10").join("01");
    let files: Vec<_> = fs::read_dir(&day_dir).unwrap().collect();
    assert_eq!(files.len(), 1);
    assert_eq!(
        fs::read_to_string(day_dir.join(&filename)).unwrap(),
        "sentinel-1 product bytes"
    );

    let warnings = reporter.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(matches!(
        &warnings[0],
        RunEvent::RecordSkipped { identifier, .. } if identifier == LANDSAT_ID
    ));
    assert!(is_empty_dir(scratch.path()));
    assert!(matches!(
        reporter.events().last(),
        Some(RunEvent::Finished {
            archived: 1,
            skipped: 1,
            failed: 0
        })
    ));
}

#[test]
fn test_rerun_replaces_existing_product() {
    let server = MockServer::start();
    mock_search(&server, &[entry("uuid-s1", S1_ID)]);
    let filename = format!("{}.zip", S1_ID);
    mock_product(&server, "uuid-s1", &filename, "fresh bytes");

    let archive = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let day_dir = archive.path().join("2018/10/01");
    fs::create_dir_all(&day_dir).unwrap();
    fs::write(day_dir.join(&filename), "stale bytes from an earlier run").unwrap();

    for _ in 0..2 {
        let reporter = MemoryReporter::new();
        let summary = archive_run(&server, 99, archive.path(), scratch.path())
            .execute(&reporter)
            .unwrap();
        assert_eq!(summary.archived(), 1);
        assert!(matches!(
            reporter.warnings().as_slice(),
            [RunEvent::StaleFileReplaced { path, .. }] if *path == day_dir.join(&filename)
        ));
    }

    let files: Vec<_> = fs::read_dir(&day_dir).unwrap().collect();
    assert_eq!(files.len(), 1);
    assert_eq!(
        fs::read_to_string(day_dir.join(&filename)).unwrap(),
        "fresh bytes"
    );
}

#[test]
fn test_row_limit_aborts_without_downloads() {
    let server = MockServer::start();
    mock_search(
        &server,
        &[entry("uuid-1", S1_ID), entry("uuid-2", S1_ID)],
    );

    let archive = TempDir::new().unwrap();
    let root = archive.path().join("archive");
    let scratch = TempDir::new().unwrap();
    let reporter = MemoryReporter::new();

    let err = archive_run(&server, 2, &root, scratch.path())
        .execute(&reporter)
        .unwrap_err();

    assert!(matches!(
        err,
        RunError::QueryTooLarge {
            count: 2,
            max_rows: 2
        }
    ));
    assert!(!root.exists());
    assert!(is_empty_dir(scratch.path()));
    assert!(reporter
        .errors()
        .iter()
        .any(|e| matches!(e, RunEvent::QueryTooLarge { .. })));
}

#[test]
fn test_search_request_carries_query_and_rows() {
    let server = MockServer::start();
    let search = server.mock(|when, then| {
        when.method(GET)
            .path("/search")
            .query_param("rows", "99")
            .query_param_exists("q")
            .header("authorization", BASIC_AUTH);
        then.status(200).body(feed(&[]));
    });

    let archive = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let reporter = MemoryReporter::new();

    let summary = archive_run(&server, 99, archive.path(), scratch.path())
        .execute(&reporter)
        .unwrap();

    search.assert();
    assert!(summary.outcomes().is_empty());
    assert!(reporter
        .events()
        .contains(&RunEvent::QueryResults { count: 0 }));
}

#[test]
fn test_rejected_search_yields_empty_run() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(401);
    });

    let archive = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let reporter = MemoryReporter::new();

    let summary = archive_run(&server, 99, archive.path(), scratch.path())
        .execute(&reporter)
        .unwrap();

    assert!(summary.outcomes().is_empty());
    assert!(reporter.events().iter().any(|e| matches!(
        e,
        RunEvent::QueryResponse { status: 401, .. }
    )));
    assert!(matches!(
        reporter.events().last(),
        Some(RunEvent::Finished { archived: 0, .. })
    ));
}

#[test]
fn test_product_without_headers_is_skipped() {
    let server = MockServer::start();
    mock_search(&server, &[entry("uuid-s1", S1_ID)]);
    server.mock(|when, then| {
        when.method(GET).path("/odata/v1/Products('uuid-s1')/$value");
        then.status(200).body("bytes without metadata");
    });

    let archive = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();

    let summary = archive_run(&server, 99, archive.path(), scratch.path())
        .execute(&MemoryReporter::new())
        .unwrap();

    assert_eq!(summary.skipped(), 1);
    assert!(is_empty_dir(archive.path()));
}
