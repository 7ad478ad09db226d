//! Integration tests: load a URL list, dispatch against a local page server,
//! check the corpus directory and the run summary.

mod common;

use common::page_server::{self, PageServerOptions};
use std::collections::HashSet;
use std::io::Cursor;
use std::time::{Duration, Instant};
use tempfile::tempdir;
use wcrawl_core::corpus::CorpusDir;
use wcrawl_core::dispatcher::Dispatcher;
use wcrawl_core::error::FetchFailure;
use wcrawl_core::fetch::{FetchOptions, FetchOutcome};
use wcrawl_core::scan::{self, Vocabulary};
use wcrawl_core::url_list::{self, UrlList};

fn list_from(lines: &[String]) -> UrlList {
    let src: String = lines.iter().map(|l| format!("{}\n", l)).collect();
    url_list::load_from_reader(Cursor::new(src), 100).unwrap()
}

fn dispatcher(root: &std::path::Path, timeout: Duration, max: usize) -> Dispatcher {
    let opts = FetchOptions {
        timeout,
        connect_timeout: Duration::from_secs(2),
        user_agent: Some("wcrawl-tests".into()),
    };
    Dispatcher::new(CorpusDir::new(root), opts, max)
}

#[test]
fn mixed_list_fetches_valid_urls_into_numbered_pages() {
    let base = page_server::start();
    let dir = tempdir().unwrap();
    let source = dir.path().join("urls.txt");
    std::fs::write(
        &source,
        format!("{base}a\nnot-a-url\n{base}b\n"),
    )
    .unwrap();

    let list = url_list::load(&source, 100).unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list.entries()[0].raw(), format!("{base}a"));
    assert_eq!(list.entries()[1].raw(), format!("{base}b"));
    assert_eq!(list.diagnostics().len(), 1);

    let corpus_root = dir.path().join("corpus");
    let summary = dispatcher(&corpus_root, Duration::from_secs(10), 4)
        .run(list)
        .unwrap();
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 0);

    let page1 = std::fs::read_to_string(corpus_root.join("page1.html")).unwrap();
    let page2 = std::fs::read_to_string(corpus_root.join("page2.html")).unwrap();
    assert_eq!(page1, page_server::page_body("/a"));
    assert_eq!(page2, page_server::page_body("/b"));
    assert_eq!(
        summary.bytes_written,
        (page1.len() + page2.len()) as u64
    );
}

#[test]
fn every_entry_reports_once_with_unique_index() {
    let base = page_server::start();
    let dir = tempdir().unwrap();
    let urls: Vec<String> = (1..=12).map(|i| format!("{base}p{i}")).collect();

    let mut indices = Vec::new();
    let summary = dispatcher(dir.path(), Duration::from_secs(10), 3)
        .run_observed(list_from(&urls), |r| indices.push(r.index()))
        .unwrap();

    assert_eq!(summary.total(), 12);
    assert_eq!(indices.len(), 12);
    let unique: HashSet<usize> = indices.into_iter().collect();
    assert_eq!(unique, (1..=12).collect::<HashSet<usize>>());
    for i in 1..=12 {
        assert!(dir.path().join(format!("page{i}.html")).is_file());
    }
}

#[test]
fn transport_failure_is_isolated_to_its_entry() {
    let base = page_server::start();
    let dir = tempdir().unwrap();
    let urls = vec![
        format!("{base}one"),
        format!("{base}two"),
        page_server::refused_url(),
        format!("{base}four"),
        format!("{base}five"),
    ];

    let summary = dispatcher(dir.path(), Duration::from_secs(10), 5)
        .run(list_from(&urls))
        .unwrap();

    assert_eq!(summary.succeeded, 4);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures[0].index, 3);
    assert!(matches!(
        summary.failures[0].reason,
        FetchFailure::Transport { .. }
    ));
    for i in [1, 2, 4, 5] {
        let meta = std::fs::metadata(dir.path().join(format!("page{i}.html"))).unwrap();
        assert!(meta.len() > 0, "page{i}.html should be non-empty");
    }
    // The failed entry's file was opened before the transfer and stays in place.
    assert!(dir.path().join("page3.html").is_file());
}

#[test]
fn refetching_into_another_directory_gives_identical_pages() {
    let base = page_server::start();
    let urls: Vec<String> = ["x", "y", "z"].iter().map(|p| format!("{base}{p}")).collect();
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();

    for dir in [&first, &second] {
        let summary = dispatcher(dir.path(), Duration::from_secs(10), 2)
            .run(list_from(&urls))
            .unwrap();
        assert!(summary.all_succeeded());
    }

    let a = wcrawl_core::checksum::corpus_digests(&CorpusDir::new(first.path())).unwrap();
    let b = wcrawl_core::checksum::corpus_digests(&CorpusDir::new(second.path())).unwrap();
    assert_eq!(a.len(), 3);
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.index, y.index);
        assert_eq!(x.sha256, y.sha256);
    }
    for i in 1..=3 {
        let name = format!("page{i}.html");
        assert_eq!(
            std::fs::read(first.path().join(&name)).unwrap(),
            std::fs::read(second.path().join(&name)).unwrap()
        );
    }
}

#[test]
fn stalled_endpoints_time_out_concurrently() {
    let base = page_server::start_with_options(PageServerOptions {
        stall: Duration::from_secs(10),
    });
    let dir = tempdir().unwrap();
    let urls = vec![
        format!("{base}stall-1"),
        format!("{base}fast-1"),
        format!("{base}stall-2"),
        format!("{base}stall-3"),
        format!("{base}fast-2"),
    ];
    let timeout = Duration::from_secs(1);

    let started = Instant::now();
    let summary = dispatcher(dir.path(), timeout, 8)
        .run(list_from(&urls))
        .unwrap();
    let wall = started.elapsed();

    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 3);
    let timed_out: Vec<usize> = summary
        .failures
        .iter()
        .filter(|f| matches!(f.reason, FetchFailure::Timeout { .. }))
        .map(|f| f.index)
        .collect();
    assert_eq!(timed_out, vec![1, 3, 4]);
    for f in &summary.failures {
        if let FetchFailure::Timeout { after_ms } = f.reason {
            assert!((900..2500).contains(&after_ms), "after_ms = {after_ms}");
        }
    }
    // Three stalls run side by side: about one timeout, not three.
    assert!(wall < Duration::from_millis(2500), "run took {:?}", wall);
}

#[test]
fn error_status_pages_are_saved_as_success() {
    let base = page_server::start();
    let dir = tempdir().unwrap();
    let mut status = None;
    let summary = dispatcher(dir.path(), Duration::from_secs(10), 1)
        .run_observed(list_from(&[format!("{base}missing")]), |r| {
            status = Some(r.outcome().clone());
        })
        .unwrap();

    assert_eq!(summary.succeeded, 1);
    match status {
        Some(FetchOutcome::Success {
            http_status,
            bytes_written,
        }) => {
            assert_eq!(http_status, 404);
            assert!(bytes_written > 0);
        }
        other => panic!("expected success, got {:?}", other),
    }
    let body = std::fs::read_to_string(dir.path().join("page1.html")).unwrap();
    assert!(body.contains("Not found"));
}

#[test]
fn file_open_failure_does_not_stop_other_workers() {
    let base = page_server::start();
    let dir = tempdir().unwrap();
    std::fs::create_dir(dir.path().join("page2.html")).unwrap();
    let urls: Vec<String> = ["a", "b", "c"].iter().map(|p| format!("{base}{p}")).collect();

    let summary = dispatcher(dir.path(), Duration::from_secs(10), 3)
        .run(list_from(&urls))
        .unwrap();

    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].index, 2);
    assert!(matches!(
        summary.failures[0].reason,
        FetchFailure::FileOpen { .. }
    ));
}

#[cfg(unix)]
#[test]
fn disk_write_failure_is_isolated_to_its_entry() {
    let base = page_server::start();
    let dir = tempdir().unwrap();
    std::os::unix::fs::symlink("/dev/full", dir.path().join("page1.html")).unwrap();
    let urls: Vec<String> = ["full", "fine"].iter().map(|p| format!("{base}{p}")).collect();

    let summary = dispatcher(dir.path(), Duration::from_secs(10), 2)
        .run(list_from(&urls))
        .unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures[0].index, 1);
    match &summary.failures[0].reason {
        FetchFailure::Write { detail } => assert!(!detail.is_empty()),
        other => panic!("expected Write, got {:?}", other),
    }
    let page2 = std::fs::read_to_string(dir.path().join("page2.html")).unwrap();
    assert_eq!(page2, page_server::page_body("/fine"));
}

#[test]
fn fetched_corpus_feeds_the_word_scanner() {
    let base = page_server::start();
    let dir = tempdir().unwrap();
    let urls: Vec<String> = ["one", "two"].iter().map(|p| format!("{base}{p}")).collect();
    dispatcher(dir.path(), Duration::from_secs(10), 2)
        .run(list_from(&urls))
        .unwrap();

    let vocab = Vocabulary::new(["Linux", "Science", "Code", "Libcurl", "Kernel"]);
    let report = scan::scan_dir(dir.path(), &vocab, &[]).unwrap();
    assert_eq!(report.files_scanned, 2);
    assert_eq!(report.counts.get("Linux"), Some(2));
    assert_eq!(report.counts.get("Kernel"), Some(2));
    assert_eq!(report.counts.get("Code"), Some(2));
    assert_eq!(report.counts.get("Libcurl"), Some(2));
    assert_eq!(report.counts.get("Science"), Some(0));
}
