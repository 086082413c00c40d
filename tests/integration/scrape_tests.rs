//! Integration tests for the scrape pipeline
//!
//! These tests use wiremock to serve a search page, intermediate pages and
//! report pages, and run the full pipeline against a temporary database.

use inspection_scraper::config::Config;
use inspection_scraper::output::{format_report, NO_VIOLATIONS};
use inspection_scraper::pipeline::{run_scrape, Coordinator};
use inspection_scraper::storage::{open_storage, Storage};
use inspection_scraper::InspectError;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHECKED: &str = "../../../webadmin/dhd_135/paper/images/box_checked_10x10.gif";
const UNCHECKED: &str = "../../../webadmin/dhd_135/paper/images/box_unchecked_10x10.gif";
const REPORT_PATH: &str = "/_templates/135/Food%20Inspection/_report_full.cfm";

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer, dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.source.base_url = format!("{}/napa/", server.uri());
    config.fetcher.timeout_secs = 5;
    config.output.database_path = dir
        .path()
        .join("inspections.db")
        .to_string_lossy()
        .to_string();
    config
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

fn search_page(permits: &[u32]) -> String {
    let links: String = permits
        .iter()
        .map(|p| {
            format!(
                r#"<tr><td><a href="estab.cfm?permitID={p}&inspectionID={p}00">Facility {p}</a></td></tr>"#
            )
        })
        .collect();
    format!(
        r#"<html><body><a href="search.cfm?start=21">Next</a><table>{links}</table></body></html>"#
    )
}

fn intermediate_page(inspection_id: u32) -> String {
    format!(
        r#"<html><body>
            <a href="../search.cfm">Back</a>
            <a href="../_templates/135/Food Inspection/_report_full.cfm?domainID=135&inspectionID={inspection_id}&dsn=dhd_135">Full report</a>
        </body></html>"#
    )
}

fn report_page(values: [&str; 10], rows: &[(&str, &str)]) -> String {
    let cells: String = values
        .iter()
        .map(|v| format!(r#"<td><span class="blackline">{v}</span></td>"#))
        .collect();
    let rows: String = rows
        .iter()
        .map(|(text, image)| {
            format!(r#"<tr><td>{text}</td><td></td><td><img src="{image}"></td></tr>"#)
        })
        .collect();
    format!(
        r#"<html><body>
            <div class="topSection"><table><tr>{cells}</tr></table></div>
            <table class="insideTable">{rows}</table>
        </body></html>"#
    )
}

async fn mount_target(server: &MockServer, permit: u32, report: String) {
    let inspection_id = permit * 100;

    Mock::given(method("GET"))
        .and(path("/napa/estab.cfm"))
        .and(query_param("permitID", permit.to_string()))
        .respond_with(html(intermediate_page(inspection_id)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(REPORT_PATH))
        .and(query_param("inspectionID", inspection_id.to_string()))
        .respond_with(html(report))
        .mount(server)
        .await;
}

async fn mount_search(server: &MockServer, permits: &[u32]) {
    Mock::given(method("GET"))
        .and(path("/napa/search.cfm"))
        .and(query_param("dtRng", "YES"))
        .respond_with(html(search_page(permits)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_scrape_stores_reports() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_search(&server, &[1, 2]).await;
    mount_target(
        &server,
        1,
        report_page(
            [
                "Joe's Diner",
                "1023",
                "01/02/2015",
                "",
                "123 Main St<br>Napa, CA 94558",
                "",
                "",
                "",
                "",
                "Routine",
            ],
            &[
                ("6. Adequate handwashing facilities", CHECKED),
                ("7. Proper hot and cold holding temperatures", UNCHECKED),
            ],
        ),
    )
    .await;
    mount_target(
        &server,
        2,
        report_page(
            [
                "Sunrise Cafe",
                "2048",
                "03/04/2016",
                "",
                "9 Vine Way<br>Yountville, CA 94599",
                "",
                "",
                "",
                "",
                "Follow-up",
            ],
            &[("14. Food contact surfaces: clean", UNCHECKED)],
        ),
    )
    .await;

    let config = create_test_config(&server, &dir);
    let db_path = config.output.database_path.clone();

    let summary = run_scrape(config).await.unwrap();
    assert_eq!(summary.targets, 2);
    assert_eq!(summary.reports_stored, 2);
    assert_eq!(summary.violations_inserted, 1);
    assert_eq!(summary.failures, 0);

    let storage = open_storage(std::path::Path::new(&db_path)).unwrap();
    let facilities = storage.list_facilities().unwrap();
    let violations = storage.list_violations().unwrap();

    assert_eq!(facilities.len(), 2);
    let joe = facilities.iter().find(|f| f.id == 1023).unwrap();
    assert_eq!(joe.name, "Joe's Diner");
    assert_eq!(joe.city, "Napa");
    assert_eq!(joe.zipcode, "94558");

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].facility_id, 1023);
    assert_eq!(violations[0].violation_number, 6);
    assert_eq!(violations[0].inspection_type, "Routine");

    let text = format_report("mock", &facilities, &violations);
    assert!(text.contains("VIOLATION: 6. Adequate handwashing facilities DATE: 01/02/2015"));
    assert!(text.contains(NO_VIOLATIONS));
}

#[tokio::test]
async fn test_failed_target_does_not_stop_run() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_search(&server, &[1, 2, 3]).await;

    // Permit 1 has no intermediate page mounted and gets a 404

    // Permit 2 has a report without a top section
    mount_target(
        &server,
        2,
        "<html><body><p>Report unavailable</p></body></html>".to_string(),
    )
    .await;

    mount_target(
        &server,
        3,
        report_page(
            [
                "Joe's Diner",
                "1023",
                "01/02/2015",
                "",
                "123 Main St<br>Napa, CA 94558",
                "",
                "",
                "",
                "",
                "Routine",
            ],
            &[("6. Adequate handwashing facilities", CHECKED)],
        ),
    )
    .await;

    let config = create_test_config(&server, &dir);
    let summary = run_scrape(config).await.unwrap();

    assert_eq!(summary.targets, 3);
    assert_eq!(summary.reports_stored, 1);
    assert_eq!(summary.failures, 2);
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_search(&server, &[1]).await;
    mount_target(
        &server,
        1,
        report_page(
            [
                "Joe's Diner",
                "1023",
                "01/02/2015",
                "",
                "123 Main St<br>Napa, CA 94558",
                "",
                "",
                "",
                "",
                "Routine",
            ],
            &[("6. Adequate handwashing facilities", CHECKED)],
        ),
    )
    .await;

    let config = create_test_config(&server, &dir);

    let first = run_scrape(config.clone()).await.unwrap();
    assert_eq!(first.violations_inserted, 1);

    let mut coordinator = Coordinator::new(config).unwrap();
    let second = coordinator.run().await.unwrap();
    assert_eq!(second.reports_stored, 1);
    assert_eq!(second.violations_inserted, 0);

    assert_eq!(coordinator.storage().list_facilities().unwrap().len(), 1);
    assert_eq!(coordinator.storage().list_violations().unwrap().len(), 1);
}

#[tokio::test]
async fn test_search_page_failure_is_an_error() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/napa/search.cfm"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = create_test_config(&server, &dir);
    let result = run_scrape(config).await;
    assert!(matches!(result, Err(InspectError::Retrieval { .. })));
}
