use wiremock::{matchers::any, Mock, ResponseTemplate};

use crate::helper::{get_client, spawn_app, spawn_app_with, InMemoryStore};

#[tokio::test]
async fn rate_returns_the_usd_rate() {
    let app = spawn_app().await;
    app.mount_rate(41.5).await;

    let response = get_client()
        .get(format!("{}/rate", app.addr))
        .send()
        .await
        .expect("Request should succeed");

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"rate": 41.5}));
}

#[tokio::test]
async fn rate_is_zero_when_usd_is_missing() {
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{"rate": 44.9, "cc": "EUR"}])),
        )
        .mount(&app.rate_server)
        .await;

    let response = app.get_rate().await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["rate"], 0.0);
}

#[tokio::test]
async fn rate_returns_a_400_for_a_malformed_upstream_response() {
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&app.rate_server)
        .await;

    let response = app.get_rate().await;

    assert_eq!(400, response.status().as_u16());
    assert_eq!(
        response.text().await.unwrap(),
        "Failed to fetch the exchange rate"
    );
}

#[tokio::test]
async fn rate_returns_a_400_when_the_upstream_is_unreachable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let closed_port = listener.local_addr().unwrap().port();
    drop(listener);

    let app = spawn_app_with(InMemoryStore::default(), |config| {
        config.rate_api.base_url = format!("http://127.0.0.1:{}", closed_port);
    })
    .await;

    let response = app.get_rate().await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn rate_does_not_notify_subscribers() {
    let app = spawn_app().await;
    app.mount_rate(41.5).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app.get_rate().await;

    assert_eq!(200, response.status().as_u16());
}
