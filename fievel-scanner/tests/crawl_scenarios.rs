// End-to-end crawl behaviour against an in-memory web

use fievel_scanner::error::Result;
use fievel_scanner::fetch::exchange;
use fievel_scanner::{Address, Crawler, DepthRecord, Fetcher, ProgressCallback, ScanError};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::duplex;

// ============================================================================
// Test web
// ============================================================================

/// Pages keyed by `host + path`. Unknown keys are refused, `silent` keys accept the request
/// but never answer, and `explosive` keys panic the worker.
#[derive(Default)]
struct TestWeb {
    pages: HashMap<String, String>,
    silent: HashSet<String>,
    explosive: HashSet<String>,
    requests: Mutex<Vec<String>>,
}

impl TestWeb {
    fn page(mut self, key: &str, links: &[&str]) -> Self {
        let body: String = links
            .iter()
            .map(|link| format!(r#"<a href="{link}">{link}</a>"#))
            .collect();
        self.pages
            .insert(key.to_string(), format!("HTTP/1.1 200 OK\r\n\r\n<html><body>{body}</body></html>"));
        self
    }

    fn silent(mut self, key: &str) -> Self {
        self.silent.insert(key.to_string());
        self
    }

    fn explosive(mut self, key: &str) -> Self {
        self.explosive.insert(key.to_string());
        self
    }
}

impl Fetcher for TestWeb {
    async fn fetch(&self, address: &Address) -> Result<String> {
        let key = address.key();
        self.requests.lock().unwrap().push(key.clone());

        if self.explosive.contains(&key) {
            panic!("worker blew up on {key}");
        }
        if self.silent.contains(&key) {
            let (client, _server) = duplex(1024);
            return exchange(client, address, Duration::from_secs(5)).await;
        }
        self.pages
            .get(&key)
            .cloned()
            .ok_or_else(|| ScanError::FetchFailed {
                address: key,
                reason: "connection refused".to_string(),
            })
    }
}

fn record(depth: usize, addresses: &[&str]) -> DepthRecord {
    DepthRecord::new(depth, addresses.iter().map(|a| a.to_string()).collect())
}

fn sorted(record: &DepthRecord) -> Vec<String> {
    let mut addresses = record.addresses.clone();
    addresses.sort();
    addresses
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_seed_only_at_depth_zero() {
    let web = Arc::new(TestWeb::default().page(
        "example.com/",
        &["https://one.example/", "https://two.example/", "/about"],
    ));

    let report = Crawler::with_fetcher(web.clone())
        .with_max_depth(0)
        .with_workers(1)
        .crawl("https://example.com")
        .await;

    assert_eq!(report, vec![record(0, &["example.com/"])]);
    assert_eq!(*web.requests.lock().unwrap(), vec!["example.com/"]);
}

#[tokio::test]
async fn test_relative_links_never_discovered() {
    let web = Arc::new(TestWeb::default().page(
        "example.com/",
        &["https://one.example/", "https://two.example/", "/about"],
    ));

    let report = Crawler::with_fetcher(web)
        .with_max_depth(1)
        .with_workers(1)
        .crawl("https://example.com")
        .await;

    assert_eq!(report.len(), 2);
    assert_eq!(sorted(&report[1]), vec!["one.example/", "two.example/"]);
    assert!(report.iter().all(|r| !r.contains("example.com/about")));
}

#[tokio::test]
async fn test_three_addresses_split_across_two_workers() {
    let web = Arc::new(TestWeb::default().page(
        "seed.example/",
        &["https://a.example/", "https://b.example/", "https://c.example/"],
    ));

    let dispatched: Arc<Mutex<Vec<(usize, String)>>> = Arc::new(Mutex::new(Vec::new()));
    let dispatched_clone = dispatched.clone();
    let callback: ProgressCallback = Arc::new(move |worker_id, url| {
        dispatched_clone.lock().unwrap().push((worker_id, url));
    });

    let report = Crawler::with_fetcher(web)
        .with_max_depth(1)
        .with_workers(2)
        .with_progress_callback(callback)
        .crawl("https://seed.example/")
        .await;

    assert_eq!(report.len(), 2);
    assert_eq!(report[1].len(), 3);

    let dispatched = dispatched.lock().unwrap();
    let mut per_worker: HashMap<usize, usize> = HashMap::new();
    for (worker_id, url) in dispatched.iter() {
        if url != "https://seed.example/" {
            *per_worker.entry(*worker_id).or_default() += 1;
        }
    }
    assert_eq!(per_worker.get(&0), Some(&1));
    assert_eq!(per_worker.get(&1), Some(&2));
}

#[tokio::test]
async fn test_single_address_uses_one_worker() {
    let web = Arc::new(TestWeb::default().page("seed.example/", &[]));

    let workers_seen: Arc<Mutex<HashSet<usize>>> = Arc::new(Mutex::new(HashSet::new()));
    let workers_clone = workers_seen.clone();
    let callback: ProgressCallback = Arc::new(move |worker_id, _url| {
        workers_clone.lock().unwrap().insert(worker_id);
    });

    Crawler::with_fetcher(web)
        .with_workers(8)
        .with_progress_callback(callback)
        .crawl("https://seed.example/")
        .await;

    assert_eq!(*workers_seen.lock().unwrap(), HashSet::from([0]));
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_fetch_is_visited_without_discoveries() {
    let web = Arc::new(
        TestWeb::default()
            .page("seed.example/", &["https://hang.example/", "https://ok.example/"])
            .page("ok.example/", &["https://deeper.example/"])
            .silent("hang.example/"),
    );

    let report = Crawler::with_fetcher(web)
        .with_max_depth(2)
        .with_workers(2)
        .with_verbose(true)
        .crawl("https://seed.example/")
        .await;

    assert_eq!(report.len(), 3);
    assert_eq!(sorted(&report[1]), vec!["hang.example/", "ok.example/"]);
    assert_eq!(report[2], record(2, &["deeper.example/"]));
}

// ============================================================================
// Invariants
// ============================================================================

#[tokio::test]
async fn test_depth_bound_respected() {
    let web = Arc::new(
        TestWeb::default()
            .page("d0.example/", &["https://d1.example/"])
            .page("d1.example/", &["https://d2.example/"])
            .page("d2.example/", &["https://d3.example/"])
            .page("d3.example/", &["https://d4.example/"]),
    );

    for max_depth in 0..=3 {
        let report = Crawler::with_fetcher(web.clone())
            .with_max_depth(max_depth)
            .crawl("https://d0.example/")
            .await;

        let depths: Vec<usize> = report.iter().map(|r| r.depth).collect();
        assert_eq!(depths, (0..=max_depth).collect::<Vec<_>>());
        assert!(report.iter().all(|r| r.depth <= max_depth));
    }
}

#[tokio::test]
async fn test_empty_frontier_stops_early() {
    let web = Arc::new(TestWeb::default().page("lonely.example/", &["/only-relative"]));

    let report = Crawler::with_fetcher(web)
        .with_max_depth(5)
        .crawl("https://lonely.example/")
        .await;

    assert_eq!(report, vec![record(0, &["lonely.example/"])]);
}

#[tokio::test]
async fn test_known_addresses_not_rediscovered() {
    let web = Arc::new(
        TestWeb::default()
            .page("root.example/", &["https://a.example/"])
            .page("a.example/", &["https://root.example/", "https://root.example/?again=1"]),
    );

    let report = Crawler::with_fetcher(web.clone())
        .with_max_depth(3)
        .crawl("https://root.example/")
        .await;

    assert_eq!(report, vec![record(0, &["root.example/"]), record(1, &["a.example/"])]);
    let requests = web.requests.lock().unwrap();
    assert_eq!(requests.iter().filter(|r| *r == "root.example/").count(), 1);
}

#[tokio::test]
async fn test_same_round_addresses_can_be_revisited_next_depth() {
    // b.example is on the depth-1 frontier while a.example links to it, so the index does not
    // know it yet and it is fetched again at depth 2.
    let web = Arc::new(
        TestWeb::default()
            .page("root.example/", &["https://a.example/", "https://b.example/"])
            .page("a.example/", &["https://b.example/"])
            .page("b.example/", &[]),
    );

    let report = Crawler::with_fetcher(web)
        .with_max_depth(3)
        .with_workers(2)
        .crawl("https://root.example/")
        .await;

    assert_eq!(report.len(), 3);
    assert_eq!(sorted(&report[1]), vec!["a.example/", "b.example/"]);
    assert_eq!(report[2], record(2, &["b.example/"]));
}

#[tokio::test]
async fn test_duplicate_discoveries_merged() {
    let web = Arc::new(
        TestWeb::default()
            .page("root.example/", &["https://a.example/", "https://b.example/"])
            .page("a.example/", &["https://shared.example/"])
            .page("b.example/", &["https://shared.example/"]),
    );

    let report = Crawler::with_fetcher(web.clone())
        .with_max_depth(2)
        .with_workers(2)
        .crawl("https://root.example/")
        .await;

    assert_eq!(report[2], record(2, &["shared.example/"]));
    let requests = web.requests.lock().unwrap();
    assert_eq!(requests.iter().filter(|r| *r == "shared.example/").count(), 1);
}

#[tokio::test]
async fn test_malformed_seed_is_a_no_op() {
    let web = Arc::new(TestWeb::default());

    let report = Crawler::with_fetcher(web.clone()).crawl("not a url").await;

    assert_eq!(report, vec![DepthRecord::empty(0)]);
    assert!(web.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_links_never_recorded() {
    let web = Arc::new(TestWeb::default().page(
        "root.example/",
        &["javascript:void(0)", "page.html", "https://fine.example/"],
    ));

    let report = Crawler::with_fetcher(web)
        .with_max_depth(1)
        .crawl("https://root.example/")
        .await;

    assert_eq!(report[1], record(1, &["fine.example/"]));
}

#[tokio::test]
async fn test_crashed_worker_does_not_stop_the_crawl() {
    let web = Arc::new(
        TestWeb::default()
            .page("root.example/", &["https://boom.example/", "https://ok.example/"])
            .page("ok.example/", &["https://next.example/"])
            .explosive("boom.example/"),
    );

    let report = Crawler::with_fetcher(web)
        .with_max_depth(2)
        .with_workers(2)
        .crawl("https://root.example/")
        .await;

    assert_eq!(report.len(), 3);
    assert_eq!(report[1], record(1, &["ok.example/"]));
    assert_eq!(report[2], record(2, &["next.example/"]));
}
