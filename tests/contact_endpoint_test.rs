use async_trait::async_trait;
use portfolio_backend::adapters::mailer::LogMailer;
use portfolio_backend::adapters::server::{routes, MAX_BODY_BYTES};
use portfolio_backend::core::{EmailMessage, Mailer};
use portfolio_backend::{ContactService, Result, SiteError};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct CountingMailer {
    calls: AtomicUsize,
    fail: bool,
}

impl CountingMailer {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail,
        })
    }
}

#[async_trait]
impl Mailer for CountingMailer {
    async fn send(&self, _message: &EmailMessage) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SiteError::DeliveryError {
                provider: "counting".to_string(),
                message: "provider unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn provider(&self) -> &'static str {
        "counting"
    }
}

fn service_with(mailer: Arc<dyn Mailer>) -> Arc<ContactService> {
    Arc::new(ContactService::new(
        mailer,
        "owner@example.com".to_string(),
        "noreply@example.com".to_string(),
    ))
}

async fn post_contact(service: Arc<ContactService>, body: Value) -> (u16, Value) {
    let res = warp::test::request()
        .method("POST")
        .path("/api/contact")
        .json(&body)
        .reply(&routes(service))
        .await;
    let json: Value = serde_json::from_slice(res.body()).unwrap();
    (res.status().as_u16(), json)
}

#[tokio::test]
async fn test_complete_submission_returns_success() {
    let mailer = CountingMailer::new(false);
    let (status, body) = post_contact(
        service_with(mailer.clone()),
        json!({"firstName": "A", "lastName": "B", "email": "a@b.com", "message": "hi"}),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Message sent successfully!");
    assert_eq!(mailer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_message_returns_400() {
    let mailer = CountingMailer::new(false);
    let (status, body) = post_contact(
        service_with(mailer.clone()),
        json!({"firstName": "A", "lastName": "B", "email": "a@b.com"}),
    )
    .await;

    assert_eq!(status, 400);
    assert!(!body["error"].as_str().unwrap().is_empty());
    assert_eq!(mailer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_each_required_field_is_checked() {
    let complete = json!({"firstName": "A", "lastName": "B", "email": "a@b.com", "message": "hi"});
    for field in ["firstName", "lastName", "email", "message"] {
        let mut body = complete.clone();
        body[field] = json!("");
        let (status, _) = post_contact(service_with(CountingMailer::new(false)), body).await;
        assert_eq!(status, 400, "empty {} should be rejected", field);
    }
}

#[tokio::test]
async fn test_phone_is_optional_either_way() {
    let (status, _) = post_contact(
        service_with(CountingMailer::new(false)),
        json!({"firstName": "A", "lastName": "B", "email": "a@b.com", "message": "hi"}),
    )
    .await;
    assert_eq!(status, 200);

    let (status, _) = post_contact(
        service_with(CountingMailer::new(false)),
        json!({"firstName": "A", "lastName": "B", "email": "a@b.com", "phone": "+1 555 0100", "message": "hi"}),
    )
    .await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_mailer_failure_returns_500() {
    let mailer = CountingMailer::new(true);
    let (status, body) = post_contact(
        service_with(mailer.clone()),
        json!({"firstName": "A", "lastName": "B", "email": "a@b.com", "message": "hi"}),
    )
    .await;

    assert_eq!(status, 500);
    assert_eq!(body["error"], "Failed to send message. Please try again.");
    // 不在伺服器端重試
    assert_eq!(mailer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_malformed_json_returns_500() {
    let res = warp::test::request()
        .method("POST")
        .path("/api/contact")
        .header("content-type", "application/json")
        .body("{\"firstName\": ")
        .reply(&routes(service_with(CountingMailer::new(false))))
        .await;

    assert_eq!(res.status().as_u16(), 500);
}

#[tokio::test]
async fn test_requests_are_independent() {
    let mailer = CountingMailer::new(false);
    let service = service_with(mailer.clone());
    let body = json!({"firstName": "A", "lastName": "B", "email": "a@b.com", "message": "hi"});

    for _ in 0..3 {
        let (status, _) = post_contact(service.clone(), body.clone()).await;
        assert_eq!(status, 200);
    }
    assert_eq!(mailer.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_get_on_contact_is_rejected() {
    let res = warp::test::request()
        .method("GET")
        .path("/api/contact")
        .reply(&routes(service_with(CountingMailer::new(false))))
        .await;

    assert_eq!(res.status().as_u16(), 405);
}

#[tokio::test]
async fn test_experience_and_health_endpoints() {
    let service = service_with(Arc::new(LogMailer::new(Duration::ZERO)));

    let res = warp::test::request()
        .method("GET")
        .path("/api/experience")
        .reply(&routes(service.clone()))
        .await;
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = serde_json::from_slice(res.body()).unwrap();
    let years = body["years"].as_u64().unwrap();
    assert_eq!(body["total"].as_f64().unwrap(), years as f64 + 0.5);
    assert_eq!(body["text"], format!("{}+ Years", years));

    let res = warp::test::request()
        .method("GET")
        .path("/health")
        .reply(&routes(service))
        .await;
    assert_eq!(res.status().as_u16(), 200);
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let res = warp::test::request()
        .method("GET")
        .path("/api/nothing")
        .reply(&routes(service_with(CountingMailer::new(false))))
        .await;

    assert_eq!(res.status().as_u16(), 404);
}

#[tokio::test]
async fn test_oversized_body_returns_413_json() {
    let mailer = CountingMailer::new(false);
    let padding = "x".repeat(MAX_BODY_BYTES as usize + 1);
    let body = json!({"firstName": "A", "lastName": "B", "email": "a@b.com", "message": padding});

    let res = warp::test::request()
        .method("POST")
        .path("/api/contact")
        .json(&body)
        .reply(&routes(service_with(mailer.clone())))
        .await;

    assert_eq!(res.status().as_u16(), 413);
    let json: Value = serde_json::from_slice(res.body()).unwrap();
    assert!(json["error"].is_string());
    assert_eq!(mailer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_body_at_the_limit_is_accepted() {
    let mailer = CountingMailer::new(false);
    let envelope = json!({"firstName": "A", "lastName": "B", "email": "a@b.com", "message": ""});
    let room = MAX_BODY_BYTES as usize - serde_json::to_vec(&envelope).unwrap().len();
    let body = json!({"firstName": "A", "lastName": "B", "email": "a@b.com", "message": "x".repeat(room)});
    assert_eq!(serde_json::to_vec(&body).unwrap().len() as u64, MAX_BODY_BYTES);

    let (status, _) = post_contact(service_with(mailer.clone()), body).await;
    assert_eq!(status, 200);
    assert_eq!(mailer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_post_without_content_length_returns_411_json() {
    let mailer = CountingMailer::new(false);
    let res = warp::test::request()
        .method("POST")
        .path("/api/contact")
        .reply(&routes(service_with(mailer.clone())))
        .await;

    assert_eq!(res.status().as_u16(), 411);
    let json: Value = serde_json::from_slice(res.body()).unwrap();
    assert!(json["error"].is_string());
    assert_eq!(mailer.calls.load(Ordering::SeqCst), 0);
}
