//! Integration tests for BibTeX retrieval with fallback.
//!
//! dblp and doi.org are both served by one mock server under different path
//! prefixes.

use bibtex_dblp::{BibFormat, DblpClient, Endpoints};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::log_capture::capture_logs;
use support::socket_guard::start_mock_server_or_skip;

const DOI: &str = "10.1007/11880561_13";
const DBLP_DOI_PATH: &str = "/dblp/doi/bib0/10.1007/11880561_13";
const DOI_ORG_PATH: &str = "/doiorg/10.1007/11880561_13";

const SPIRE_BIBTEX: &str = "@inproceedings{DBLP:conf/spire/BastMW06,
  author    = {Holger Bast and Christian Worm Mortensen and Ingmar Weber},
  title     = {Output-Sensitive Autocompletion Search},
  booktitle = {{SPIRE}},
  year      = {2006}
}
";

fn client_for(server: &MockServer) -> DblpClient {
    let endpoints = Endpoints::new(
        format!("{}/dblp", server.uri()),
        format!("{}/doiorg", server.uri()),
    );
    DblpClient::with_endpoints(endpoints).unwrap()
}

#[tokio::test]
async fn test_fetch_dblp_key_uses_record_export() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/dblp/rec/bib1/conf/spire/BastMW06.bib"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SPIRE_BIBTEX))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bibtex = client
        .fetch_bibtex("DBLP:conf/spire/BastMW06", BibFormat::Standard, true)
        .await;

    assert_eq!(bibtex.as_deref(), Some(SPIRE_BIBTEX));
}

#[tokio::test]
async fn test_fetch_doi_falls_back_after_404_with_one_warning() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path(DBLP_DOI_PATH))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DOI_ORG_PATH))
        .and(header("accept", "application/x-bibtex; charset=utf-8"))
        .respond_with(ResponseTemplate::new(200).set_body_string("@article{doi_org_entry}"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (logs, _guard) = capture_logs();
    let bibtex = client
        .fetch_bibtex(&format!("doi:{DOI}"), BibFormat::Condensed, false)
        .await;

    assert_eq!(bibtex.as_deref(), Some("@article{doi_org_entry}"));
    assert_eq!(
        logs.count("WARN", "Could not retrieve entry"),
        1,
        "logs were:\n{}",
        logs.contents()
    );
}

#[tokio::test]
async fn test_fetch_prefer_doi_org_stops_at_first_success() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path(DOI_ORG_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("@article{from_doi_org}"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DBLP_DOI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("@article{from_dblp}"))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    // No prefix: a single slash marks a DOI.
    let bibtex = client.fetch_bibtex(DOI, BibFormat::Condensed, true).await;

    assert_eq!(bibtex.as_deref(), Some("@article{from_doi_org}"));
}

#[tokio::test]
async fn test_fetch_all_candidates_fail_returns_none() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path(DBLP_DOI_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DOI_ORG_PATH))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (logs, _guard) = capture_logs();
    let bibtex = client.fetch_bibtex(DOI, BibFormat::Condensed, false).await;

    assert!(bibtex.is_none());
    assert_eq!(logs.count("WARN", "Could not retrieve entry"), 2);
}

#[tokio::test]
async fn test_fetch_dblp_key_has_no_fallback() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/dblp/rec/bib0/journals/jsyml/Gentzen38.bib"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bibtex = client
        .fetch_bibtex("journals/jsyml/Gentzen38", BibFormat::Condensed, true)
        .await;

    assert!(bibtex.is_none());
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_fetch_unknown_key_makes_no_request() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let client = client_for(&server);

    let bibtex = client.fetch_bibtex("12345", BibFormat::Condensed, false).await;

    assert!(bibtex.is_none());
    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_fetch_author_uses_person_export() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/dblp/pers/tb1/m/Mehlhorn:Kurt.bib"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SPIRE_BIBTEX))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bibtex = client
        .fetch_author_bibtex("Mehlhorn:Kurt", BibFormat::Standard)
        .await;

    assert_eq!(bibtex.as_deref(), Some(SPIRE_BIBTEX));
}

#[tokio::test]
async fn test_fetch_unknown_author_returns_none_with_warning() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/dblp/pers/tb0/i/Iamanonexistinglastname:Bogusfirstname.bib"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (logs, _guard) = capture_logs();
    let bibtex = client
        .fetch_author_bibtex("Iamanonexistinglastname:Bogusfirstname", BibFormat::Condensed)
        .await;

    assert!(bibtex.is_none());
    assert_eq!(logs.count("WARN", "Could not retrieve author"), 1);
}
