//! End-to-end tests against a local mock server.
//!
//! These exercise the full path: query translation, URL building, auth
//! header construction, payload date normalization, and response/status
//! mapping.

use chrono::NaiveDate;
use mockito::Matcher;
use serde_json::json;

use insightly_api::{objects, ErrorKind, Filter, InsightlyClient, Payload, QueryOptions};

fn client_for(server: &mockito::Server) -> InsightlyClient {
    InsightlyClient::new("test-key")
        .unwrap()
        .with_base_url(server.url())
        .unwrap()
}

#[test]
fn list_with_filter_order_and_top() {
    let mut server = mockito::Server::new();

    let mock = server
        .mock("GET", "/Organisations")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded(
                "$filter".into(),
                "ORGANISATION_NAME eq 'Acme' and DATE_CREATED_UTC gt DateTime'2023-05-01 10:00:00'"
                    .into(),
            ),
            Matcher::UrlEncoded("$orderby".into(), "DATE_CREATED_UTC desc".into()),
            Matcher::UrlEncoded("$top".into(), "5".into()),
        ]))
        .match_header("authorization", "Basic dGVzdC1rZXk6")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"ORGANISATION_ID": 1, "ORGANISATION_NAME": "Acme"},
                {"ORGANISATION_ID": 2, "ORGANISATION_NAME": "Acme"},
            ])
            .to_string(),
        )
        .create();

    let after = NaiveDate::from_ymd_opt(2023, 5, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    let records = client_for(&server)
        .list(
            objects::ORGANISATIONS,
            &QueryOptions::new()
                .filter(
                    Filter::new()
                        .parse("ORGANISATION_NAME", "Acme")
                        .unwrap()
                        .parse("DATE_CREATED_UTC__gt", after)
                        .unwrap(),
                )
                .order_by("-DATE_CREATED_UTC")
                .top(5),
        )
        .unwrap();

    mock.assert();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("ORGANISATION_ID"), Some(&json!(1)));
}

#[test]
fn list_without_options_sends_no_query() {
    let mut server = mockito::Server::new();

    let mock = server
        .mock("GET", "/Contacts")
        .match_query(Matcher::Missing)
        .with_status(200)
        .with_body("[]")
        .create();

    let records = client_for(&server)
        .list(objects::CONTACTS, &QueryOptions::new())
        .unwrap();

    mock.assert();
    assert!(records.is_empty());
}

#[test]
fn list_nested_under_parent_resource() {
    let mut server = mockito::Server::new();

    let mock = server
        .mock("GET", "/Organisations/42/Notes")
        .with_status(200)
        .with_body(json!([{"NOTE_ID": 7}]).to_string())
        .create();

    let records = client_for(&server)
        .list_nested(
            &[(objects::ORGANISATIONS, 42)],
            objects::NOTES,
            &QueryOptions::new(),
        )
        .unwrap();

    mock.assert();
    assert_eq!(records[0].get("NOTE_ID"), Some(&json!(7)));
}

#[test]
fn get_by_id() {
    let mut server = mockito::Server::new();

    let mock = server
        .mock("GET", "/Organisations/123")
        .with_status(200)
        .with_body(
            json!({
                "ORGANISATION_ID": 123,
                "ORGANISATION_NAME": "Acme",
                "CUSTOMFIELDS": [
                    {"CUSTOM_FIELD_ID": "ORGANISATION_FIELD_1", "FIELD_VALUE": "blue"},
                ],
            })
            .to_string(),
        )
        .create();

    let record = client_for(&server).get(objects::ORGANISATIONS, 123).unwrap();

    mock.assert();
    assert_eq!(record.get("ORGANISATION_NAME"), Some(&json!("Acme")));
    assert_eq!(
        record.custom_field("ORGANISATION_FIELD_1").unwrap(),
        &json!("blue")
    );
    assert!(matches!(
        record.custom_field("ORGANISATION_FIELD_2").unwrap_err().kind,
        ErrorKind::FieldNotFound(_)
    ));
}

#[test]
fn create_normalizes_payload_dates() {
    let mut server = mockito::Server::new();

    let mock = server
        .mock("POST", "/Tasks")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "Title": "Follow up",
            "DUE_DATE": "2023-01-01 00:00:00",
            "DETAILS": {"REMIND_AT": "2023-01-01 09:30:00"},
        })))
        .with_status(200)
        .with_body(json!({"TASK_ID": 9, "Title": "Follow up"}).to_string())
        .create();

    let due = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let remind = due.and_hms_opt(9, 30, 0).unwrap();
    let payload = Payload::object()
        .with("Title", "Follow up")
        .with("DUE_DATE", due)
        .with("DETAILS", Payload::object().with("REMIND_AT", remind));

    let record = client_for(&server).create(objects::TASKS, &payload).unwrap();

    mock.assert();
    assert_eq!(record.get("TASK_ID"), Some(&json!(9)));
}

#[test]
fn update_puts_to_id_path() {
    let mut server = mockito::Server::new();

    let mock = server
        .mock("PUT", "/Organisations/123")
        .match_body(Matcher::Json(json!({"ORGANISATION_NAME": "Acme Ltd"})))
        .with_status(200)
        .with_body(json!({"ORGANISATION_ID": 123, "ORGANISATION_NAME": "Acme Ltd"}).to_string())
        .create();

    let record = client_for(&server)
        .update(
            objects::ORGANISATIONS,
            123,
            &Payload::object().with("ORGANISATION_NAME", "Acme Ltd"),
        )
        .unwrap();

    mock.assert();
    assert_eq!(record.get("ORGANISATION_NAME"), Some(&json!("Acme Ltd")));
}

#[test]
fn delete_by_id() {
    let mut server = mockito::Server::new();

    let mock = server
        .mock("DELETE", "/Organisations/123")
        .with_status(202)
        .create();

    client_for(&server)
        .delete(objects::ORGANISATIONS, 123)
        .unwrap();

    mock.assert();
}

#[test]
fn status_401_maps_to_unauthorized() {
    let mut server = mockito::Server::new();

    server
        .mock("GET", "/Organisations/1")
        .with_status(401)
        .with_body("invalid api key")
        .create();

    let err = client_for(&server)
        .get(objects::ORGANISATIONS, 1)
        .unwrap_err();

    assert!(err.is_auth_error());
    assert_eq!(err.status(), Some(401));
    assert!(matches!(err.kind, ErrorKind::Unauthorized(_)));
}

#[test]
fn status_403_maps_to_forbidden() {
    let mut server = mockito::Server::new();

    server
        .mock("GET", "/Organisations/1")
        .with_status(403)
        .with_body("plan limit reached")
        .create();

    let err = client_for(&server)
        .get(objects::ORGANISATIONS, 1)
        .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::Forbidden(_)));
    assert_eq!(err.status(), Some(403));
}

#[test]
fn other_statuses_map_to_request_failed() {
    let mut server = mockito::Server::new();

    server
        .mock("GET", "/Organisations/1")
        .with_status(500)
        .with_body("boom")
        .create();

    let err = client_for(&server)
        .get(objects::ORGANISATIONS, 1)
        .unwrap_err();

    match err.kind {
        ErrorKind::RequestFailed { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
}

#[test]
fn invalid_operator_fails_before_any_request() {
    // No server involved: the operator is rejected while building the filter,
    // so a list call never gets as far as the transport.
    let err = Filter::new()
        .parse("ORGANISATION_NAME__bogus", "Acme")
        .unwrap_err();

    match err.kind {
        ErrorKind::InvalidOperator(ref op) => assert_eq!(op, "bogus"),
        other => panic!("expected InvalidOperator, got {other:?}"),
    }
    assert!(err.is_validation_error());
}
