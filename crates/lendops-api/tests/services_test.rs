#![allow(clippy::unwrap_used)]
// Integration tests for the domain services using wiremock.

use std::sync::Arc;

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{
    body_json, body_string_contains, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lendops_api::{
    AlertFilter, AlertResolution, ApiClient, Branch, CaseFilter, DateRange, Error, Extra,
    FileUpload, LoanFilter, LoanStatus, MemoryTokenStore, NewRepayment, PageRequest, TokenStore,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient, Arc<MemoryTokenStore>) {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryTokenStore::new());
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        Url::parse(&format!("{}/gateway", server.uri())).unwrap(),
        store.clone(),
    );
    (server, client, store)
}

fn loan_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "customerId": "C-1",
        "principal": 5000,
        "status": status
    })
}

fn page_json(content: serde_json::Value, total: u64) -> serde_json::Value {
    json!({
        "content": content,
        "totalElements": total,
        "totalPages": 1,
        "size": 20,
        "number": 0,
        "first": true,
        "last": true
    })
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_stores_access_token() {
    let (server, client, store) = setup().await;

    Mock::given(method("POST"))
        .and(path("/gateway/auth/api/v1/auth/login"))
        .and(body_json(json!({ "username": "ops", "password": "s3cret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "jwt-abc",
            "refreshToken": "r-1",
            "expiresIn": 3600
        })))
        .mount(&server)
        .await;

    let password = SecretString::from("s3cret".to_owned());
    let session = client.login("ops", &password).await.unwrap();

    assert_eq!(session.expires_in, Some(3600));
    assert_eq!(store.load().unwrap().expose_secret(), "jwt-abc");
}

#[tokio::test]
async fn test_login_failure_surfaces_message_and_keeps_store_empty() {
    let (server, client, store) = setup().await;

    Mock::given(method("POST"))
        .and(path("/gateway/auth/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid username or password" })),
        )
        .mount(&server)
        .await;

    let password = SecretString::from("nope".to_owned());
    let err = client.login("ops", &password).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Invalid username or password");
    assert!(store.load().is_none());
}

#[tokio::test]
async fn test_logout_clears_token_even_when_call_fails() {
    let (server, client, store) = setup().await;
    store.save(SecretString::from("jwt".to_owned())).unwrap();

    Mock::given(method("POST"))
        .and(path("/gateway/auth/api/v1/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client.logout().await;

    assert!(matches!(result, Err(Error::Status { status: 500, .. })));
    assert!(store.load().is_none());
}

#[tokio::test]
async fn test_logout_accepts_no_content() {
    let (server, client, store) = setup().await;
    store.save(SecretString::from("jwt".to_owned())).unwrap();

    Mock::given(method("POST"))
        .and(path("/gateway/auth/api/v1/auth/logout"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.logout().await.unwrap();
    assert!(store.load().is_none());
}

#[tokio::test]
async fn test_refresh_session_replaces_stored_token() {
    let (server, client, store) = setup().await;
    store.save(SecretString::from("expired".to_owned())).unwrap();

    Mock::given(method("POST"))
        .and(path("/gateway/auth/api/v1/auth/refresh"))
        .and(body_json(json!({ "refreshToken": "r-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "jwt-new"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let refresh = SecretString::from("r-1".to_owned());
    client.refresh_session(&refresh).await.unwrap();

    assert_eq!(store.load().unwrap().expose_secret(), "jwt-new");
}

// ── Loans ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_loans_sends_pagination_and_filters() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/gateway/loans/api/v1/loans"))
        .and(query_param("page", "2"))
        .and(query_param("size", "50"))
        .and(query_param("status", "IN_ARREARS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            json!([loan_json("L-1", "IN_ARREARS")]),
            101,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let filter = LoanFilter {
        status: Some(LoanStatus::InArrears),
        ..LoanFilter::default()
    };
    let page = client
        .list_loans(PageRequest::new(2, 50), &filter)
        .await
        .unwrap();

    assert_eq!(page.total_elements, 101);
    assert_eq!(page.content[0].status, LoanStatus::InArrears);
}

#[tokio::test]
async fn test_get_loan_not_found_uses_upstream_message() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/gateway/loans/api/v1/loans/L-404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Loan L-404 not found" })))
        .mount(&server)
        .await;

    let err = client.get_loan("L-404").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Loan L-404 not found");
}

#[tokio::test]
async fn test_get_loan_empty_body_uses_fallback() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/gateway/loans/api/v1/loans/L-1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = client.get_loan("L-1").await.unwrap_err();

    assert!(matches!(err, Error::MissingData { status: 200, .. }));
    assert_eq!(err.to_string(), "Failed to fetch loan");
}

#[tokio::test]
async fn test_record_repayment_posts_body() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path("/gateway/loans/api/v1/loans/L-1/repayments"))
        .and(body_json(json!({
            "amount": "250.00",
            "paymentDate": "2024-05-01",
            "reference": "MP-991"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "R-1",
            "loanId": "L-1",
            "amount": 250,
            "paymentDate": "2024-05-01"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let repayment = NewRepayment {
        amount: Decimal::new(25000, 2),
        payment_date: chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        reference: Some("MP-991".into()),
        channel: None,
    };
    let recorded = client.record_repayment("L-1", &repayment).await.unwrap();

    assert_eq!(recorded.id.as_deref(), Some("R-1"));
    assert_eq!(recorded.amount, Decimal::new(250, 0));
}

// ── Customers & products: array or page ────────────────────────────

#[tokio::test]
async fn test_list_customers_accepts_raw_array() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/gateway/loans/api/v1/customers"))
        .and(query_param("search", "wanjiru"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "C-1", "firstName": "Grace", "lastName": "Wanjiru" }
        ])))
        .mount(&server)
        .await;

    let page = client
        .list_customers(PageRequest::default(), Some("wanjiru"))
        .await
        .unwrap();

    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].full_name(), "Grace Wanjiru");
}

#[tokio::test]
async fn test_list_products_array_and_page_agree() {
    let (server, client, _) = setup().await;
    let products = json!([
        { "id": "P-1", "name": "Boda Loan", "active": true },
        { "id": "P-2", "name": "Salary Advance" }
    ]);

    Mock::given(method("GET"))
        .and(path("/gateway/products/api/v1/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&products))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gateway/products/api/v1/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(products.clone(), 2)))
        .mount(&server)
        .await;

    let from_array = client.list_products().await.unwrap();
    let from_page = client.list_products().await.unwrap();

    assert_eq!(from_array, from_page);
    assert_eq!(from_array.len(), 2);
    assert!(from_array[0].active);
    assert!(!from_array[1].active);
}

#[tokio::test]
async fn test_set_product_active_patches_status() {
    let (server, client, _) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/gateway/products/api/v1/products/P-1/status"))
        .and(body_json(json!({ "active": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "P-1",
            "name": "Boda Boda Loan",
            "active": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let product = client.set_product_active("P-1", false).await.unwrap();
    assert!(!product.active);
}

// ── Lenient listings ────────────────────────────────────────────────

#[tokio::test]
async fn test_collection_cases_fall_back_to_empty_page() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/gateway/collections/api/v1/collections/cases"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "db down" })))
        .mount(&server)
        .await;

    let page = client
        .list_collection_cases(PageRequest::default(), &CaseFilter::default())
        .await
        .unwrap();

    assert!(page.is_empty());
    assert_eq!(page.total_elements, 0);
}

#[tokio::test]
async fn test_dashboard_falls_back_to_default_on_transport_failure() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap(),
        Arc::new(MemoryTokenStore::new()),
    );

    let summary = client.dashboard_summary().await.unwrap();
    assert_eq!(summary, lendops_api::DashboardSummary::default());
}

#[tokio::test]
async fn test_strict_report_fails_on_transport_failure() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap(),
        Arc::new(MemoryTokenStore::new()),
    );

    let err = client.portfolio_at_risk(None).await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_disbursement_report_sends_range() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/gateway/reporting/api/v1/reports/disbursements"))
        .and(query_param("from", "2024-01-01"))
        .and(query_param("to", "2024-01-31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "date": "2024-01-02", "count": 14, "amount": 70000 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let range = DateRange {
        from: chrono::NaiveDate::from_ymd_opt(2024, 1, 1),
        to: chrono::NaiveDate::from_ymd_opt(2024, 1, 31),
    };
    let rows = client.disbursement_report(range).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].count, 14);
}

#[tokio::test]
async fn test_collection_actions_fall_back_to_empty() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/gateway/collections/api/v1/collections/cases/CC-1/actions"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    assert!(client.list_collection_actions("CC-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_assign_collection_case_sends_agent_id() {
    let (server, client, _) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/gateway/collections/api/v1/collections/cases/CC-1/assign"))
        .and(body_json(json!({ "agentId": "AG-7" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "CC-1",
            "loanId": "L-1",
            "amountOverdue": "1200.50",
            "daysPastDue": 45,
            "assignedAgentId": "AG-7"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let case = client.assign_collection_case("CC-1", "AG-7").await.unwrap();
    assert_eq!(case.assigned_agent_id.as_deref(), Some("AG-7"));
    assert_eq!(case.amount_overdue, Decimal::new(120_050, 2));
}

#[tokio::test]
async fn test_notification_listings_fall_back_to_empty() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/gateway/notifications/api/v1/notifications/configs"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "boom" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gateway/notifications/api/v1/notifications/templates"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    assert!(client.list_notification_configs().await.unwrap().is_empty());
    assert!(client.list_notification_templates().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_notification_configs_parse_when_available() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/gateway/notifications/api/v1/notifications/configs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "eventType": "LOAN_DISBURSED", "channels": ["SMS"], "enabled": true }
        ])))
        .mount(&server)
        .await;

    let configs = client.list_notification_configs().await.unwrap();
    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0].event_type, "LOAN_DISBURSED");
    assert_eq!(configs[0].channels, vec!["SMS".to_owned()]);
    assert!(configs[0].enabled);
}

// ── Accounting ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_reverse_journal_entry() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path("/gateway/accounting/api/v1/accounting/journal-entries/JE-9/reverse"))
        .and(body_json(json!({ "reason": "duplicate posting" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "JE-10",
            "entryDate": "2024-06-30",
            "status": "POSTED",
            "lines": [
                { "accountCode": "1100", "credit": 100 },
                { "accountCode": "2100", "debit": 100 }
            ]
        })))
        .mount(&server)
        .await;

    let entry = client
        .reverse_journal_entry("JE-9", "duplicate posting")
        .await
        .unwrap();

    assert_eq!(entry.id, "JE-10");
    assert_eq!(entry.total_debit(), Decimal::new(100, 0));
}

#[tokio::test]
async fn test_trial_balance_sends_as_of() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/gateway/accounting/api/v1/accounting/trial-balance"))
        .and(query_param("asOf", "2026-06-30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "asOf": "2026-06-30",
            "lines": [
                { "accountCode": "1000", "debit": "500.00", "credit": "0" },
                { "accountCode": "2000", "debit": "0", "credit": "500.00" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let date = chrono::NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
    let tb = client.trial_balance(Some(date)).await.unwrap();
    assert_eq!(tb.lines.len(), 2);
    assert!(tb.is_balanced());
}

#[tokio::test]
async fn test_trial_balance_omits_as_of_when_unset() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/gateway/accounting/api/v1/accounting/trial-balance"))
        .and(query_param_is_missing("asOf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "lines": [] })))
        .expect(1)
        .mount(&server)
        .await;

    client.trial_balance(None).await.unwrap();
}

#[tokio::test]
async fn test_top_up_float_account_posts_amount_and_reference() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path(
            "/gateway/accounting/api/v1/accounting/float-accounts/FA-1/top-ups",
        ))
        .and(body_json(json!({ "amount": "250.00", "reference": "MPESA-991" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "FA-1",
            "name": "M-Pesa Paybill",
            "balance": "10250.00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let account = client
        .top_up_float_account("FA-1", Decimal::new(25_000, 2), "MPESA-991")
        .await
        .unwrap();
    assert_eq!(account.balance, Decimal::new(1_025_000, 2));
}

// ── Media ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_upload_sends_multipart_fields() {
    let (server, client, store) = setup().await;
    store.save(SecretString::from("jwt".to_owned())).unwrap();

    Mock::given(method("POST"))
        .and(path("/gateway/media/api/v1/media/upload"))
        .and(body_string_contains("name=\"referenceId\""))
        .and(body_string_contains("LN-42"))
        .and(body_string_contains("name=\"category\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "M-1",
            "fileName": "id-front.jpg",
            "referenceId": "LN-42"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let upload = FileUpload {
        file_name: "id-front.jpg".into(),
        content_type: Some("image/jpeg".into()),
        bytes: b"not-really-a-jpeg".to_vec(),
        category: "KYC".into(),
        reference_id: "LN-42".into(),
    };
    let file = client.upload_file(upload).await.unwrap();
    assert_eq!(file.id, "M-1");

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"), "got {content_type}");
    assert_eq!(requests[0].headers.get("authorization").unwrap(), "Bearer jwt");
}

#[tokio::test]
async fn test_delete_media_accepts_no_content() {
    let (server, client, _) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/gateway/media/api/v1/media/M-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_media("M-1").await.unwrap();
}

#[tokio::test]
async fn test_list_media_is_empty_on_error() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/gateway/media/api/v1/media/references/LN-1"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    assert!(client.list_media("LN-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_guesses_content_type_from_file_name() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path("/gateway/media/api/v1/media/upload"))
        .and(body_string_contains("application/pdf"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "M-2",
            "fileName": "agreement.pdf"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let upload = FileUpload {
        file_name: "agreement.pdf".into(),
        content_type: None,
        bytes: b"%PDF-1.7".to_vec(),
        category: "LOAN_AGREEMENT".into(),
        reference_id: "LN-42".into(),
    };
    assert_eq!(client.upload_file(upload).await.unwrap().id, "M-2");
}

#[tokio::test]
async fn test_dot_segment_ids_are_refused_before_sending() {
    let (server, client, _) = setup().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    for id in ["..", ".", ""] {
        let err = client.delete_media(id).await.unwrap_err();
        assert!(matches!(err, Error::InvalidPathSegment(_)), "{id:?}: {err}");
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Notifications ───────────────────────────────────────────────────

#[tokio::test]
async fn test_send_test_notification_failure_message() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path("/gateway/notifications/api/v1/notifications/test"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let err = client
        .send_test_notification("SMS", "+254700000000")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Request failed with status 400");
}

// ── Reporting ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_portfolio_at_risk_sends_as_of() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/gateway/reporting/api/v1/reports/portfolio-at-risk"))
        .and(query_param("asOf", "2026-09-30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalOutstanding": "80000.00",
            "buckets": [
                { "label": "PAR30", "daysFrom": 30, "daysTo": 59, "outstanding": "4000.00", "loanCount": 3 },
                { "label": "PAR90", "daysFrom": 90, "outstanding": "1000.00", "loanCount": 1 }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let date = chrono::NaiveDate::from_ymd_opt(2026, 9, 30).unwrap();
    let par = client.portfolio_at_risk(Some(date)).await.unwrap();
    assert_eq!(par.buckets.len(), 2);
    assert_eq!(par.buckets[1].days_to, None);
    assert_eq!(par.total_outstanding, Decimal::new(8_000_000, 2));
}

// ── Compliance ──────────────────────────────────────────────────────

fn alert_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "alertType": "LARGE_CASH_REPAYMENT",
        "severity": "HIGH",
        "status": status,
        "customerId": "C-1"
    })
}

#[tokio::test]
async fn test_list_compliance_alerts_sends_filters() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/gateway/compliance/api/v1/compliance/alerts"))
        .and(query_param("page", "0"))
        .and(query_param("size", "20"))
        .and(query_param("severity", "HIGH"))
        .and(query_param("status", "OPEN"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_json(json!([alert_json("A-1", "OPEN")]), 1)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let filter = AlertFilter {
        severity: Some("HIGH".into()),
        status: Some("OPEN".into()),
    };
    let page = client
        .list_compliance_alerts(PageRequest::default(), &filter)
        .await
        .unwrap();
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].alert_type, "LARGE_CASH_REPAYMENT");
}

#[tokio::test]
async fn test_list_compliance_alerts_is_strict() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/gateway/compliance/api/v1/compliance/alerts"))
        .and(query_param_is_missing("severity"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = client
        .list_compliance_alerts(PageRequest::default(), &AlertFilter::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch compliance alerts");
}

#[tokio::test]
async fn test_get_compliance_alert() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/gateway/compliance/api/v1/compliance/alerts/A-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alert_json("A-1", "OPEN")))
        .mount(&server)
        .await;

    let alert = client.get_compliance_alert("A-1").await.unwrap();
    assert_eq!(alert.severity, "HIGH");
    assert_eq!(alert.customer_id.as_deref(), Some("C-1"));
}

#[tokio::test]
async fn test_resolve_compliance_alert_patches_resolution() {
    let (server, client, _) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/gateway/compliance/api/v1/compliance/alerts/A-1/resolve"))
        .and(body_json(json!({
            "resolution": "FALSE_POSITIVE",
            "notes": "Salary deposit confirmed with employer"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(alert_json("A-1", "RESOLVED")))
        .expect(1)
        .mount(&server)
        .await;

    let resolution = AlertResolution {
        resolution: "FALSE_POSITIVE".into(),
        notes: Some("Salary deposit confirmed with employer".into()),
    };
    let alert = client
        .resolve_compliance_alert("A-1", &resolution)
        .await
        .unwrap();
    assert_eq!(alert.status, "RESOLVED");
}

#[tokio::test]
async fn test_resolution_without_notes_omits_the_field() {
    let (server, client, _) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/gateway/compliance/api/v1/compliance/alerts/A-2/resolve"))
        .and(body_json(json!({ "resolution": "ESCALATED" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(alert_json("A-2", "ESCALATED")))
        .expect(1)
        .mount(&server)
        .await;

    let resolution = AlertResolution {
        resolution: "ESCALATED".into(),
        notes: None,
    };
    client
        .resolve_compliance_alert("A-2", &resolution)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_customer_risk_profile() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path(
            "/gateway/compliance/api/v1/compliance/customers/C-1/risk-profile",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "customerId": "C-1",
            "riskScore": 72.5,
            "riskLevel": "HIGH",
            "factors": ["PEP", "CASH_INTENSIVE"]
        })))
        .mount(&server)
        .await;

    let profile = client.customer_risk_profile("C-1").await.unwrap();
    assert_eq!(profile.risk_level.as_deref(), Some("HIGH"));
    assert_eq!(profile.factors.len(), 2);
    assert_eq!(profile.risk_score, Some(Decimal::new(725, 1)));
}

#[tokio::test]
async fn test_screen_customer_posts_customer_id() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path("/gateway/compliance/api/v1/compliance/screenings"))
        .and(body_json(json!({ "customerId": "C-9" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "customerId": "C-9",
            "matched": true,
            "listsChecked": ["UN", "OFAC"],
            "matches": [{ "list": "OFAC", "name": "J. Doe" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.screen_customer("C-9").await.unwrap();
    assert!(result.matched);
    assert_eq!(result.lists_checked, vec!["UN".to_owned(), "OFAC".to_owned()]);
    assert_eq!(result.matches.len(), 1);
}

// ── Organization ────────────────────────────────────────────────────

#[tokio::test]
async fn test_organization_settings_round_trip_through_put() {
    let (server, client, _) = setup().await;

    let settings = json!({
        "name": "Umoja Microfinance",
        "baseCurrency": "KES",
        "timezone": "Africa/Nairobi",
        "financialYearStart": "07-01"
    });
    Mock::given(method("GET"))
        .and(path("/gateway/organization/api/v1/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(settings.clone()))
        .mount(&server)
        .await;

    let mut current = client.organization_settings().await.unwrap();
    assert_eq!(current.base_currency.as_deref(), Some("KES"));

    current.contact_email = Some("ops@umoja.example".into());
    Mock::given(method("PUT"))
        .and(path("/gateway/organization/api/v1/settings"))
        .and(body_json(json!({
            "name": "Umoja Microfinance",
            "baseCurrency": "KES",
            "timezone": "Africa/Nairobi",
            "financialYearStart": "07-01",
            "contactEmail": "ops@umoja.example"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Umoja Microfinance",
            "contactEmail": "ops@umoja.example"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let updated = client.update_organization_settings(&current).await.unwrap();
    assert_eq!(updated.contact_email.as_deref(), Some("ops@umoja.example"));
}

#[tokio::test]
async fn test_list_branches_is_strict() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/gateway/organization/api/v1/settings/branches"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.list_branches().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_create_branch_sends_no_id() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path("/gateway/organization/api/v1/settings/branches"))
        .and(body_json(json!({
            "code": "NKR",
            "name": "Nakuru",
            "region": "Rift Valley",
            "active": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "B-3",
            "code": "NKR",
            "name": "Nakuru"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let branch = Branch {
        id: None,
        code: "NKR".into(),
        name: "Nakuru".into(),
        region: Some("Rift Valley".into()),
        manager_id: None,
        active: true,
        extra: Extra::new(),
    };
    let created = client.create_branch(&branch).await.unwrap();
    assert_eq!(created.id.as_deref(), Some("B-3"));
    assert!(created.active);
}
