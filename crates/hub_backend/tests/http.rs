use std::time::Duration;

use hub_backend::{ApiClient, ApiError, ClientSettings, HttpApiClient, ScrapeKind};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpApiClient {
    let settings = ClientSettings {
        base_url: format!("{}/", server.uri()),
        ..ClientSettings::default()
    };
    HttpApiClient::new(settings).expect("client")
}

#[tokio::test]
async fn status_read_decodes_active_job() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/scraping_status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "active": true,
            "progress": 37.5,
            "message": "Scraping page 3"
        })))
        .mount(&server)
        .await;

    let status = client_for(&server).job_status().await.expect("status");
    assert!(status.active);
    assert_eq!(status.progress_percent(), Some(38));
    assert_eq!(status.message.as_deref(), Some("Scraping page 3"));
}

#[tokio::test]
async fn custom_start_posts_the_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/scrape_custom"))
        .and(body_json(
            serde_json::json!({ "url": "https://example.com/catalog" }),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "message": "Custom URL scraping started"
        })))
        .mount(&server)
        .await;

    let ack = client_for(&server)
        .start_job(ScrapeKind::Custom, Some("https://example.com/catalog"))
        .await
        .expect("ack");
    assert!(ack.success);
}

#[tokio::test]
async fn best_sellers_start_hits_its_own_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/scrape_best_sellers"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "success": true })),
        )
        .mount(&server)
        .await;

    let ack = client_for(&server)
        .start_job(ScrapeKind::BestSellers, None)
        .await
        .expect("ack");
    assert!(ack.success);
}

#[tokio::test]
async fn record_page_decodes_sparse_products() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "products": [
                {
                    "title": "Ceramic Heater",
                    "price": "$49.99",
                    "description": "A heater.",
                    "url": "https://example.com/p/1",
                    "local_images": ["data/products/heater/1.jpg"]
                },
                { "title": "Untitled" }
            ],
            "selected_index": 1,
            "total_count": 2
        })))
        .mount(&server)
        .await;

    let page = client_for(&server).list_records().await.expect("page");
    assert_eq!(page.products.len(), 2);
    assert_eq!(page.selected_index, Some(1));
    assert_eq!(page.products[0].local_images.len(), 1);
    assert_eq!(page.products[1].price, "");
}

#[tokio::test]
async fn select_and_delete_post_the_index() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/select_product"))
        .and(body_json(serde_json::json!({ "product_index": 2 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({ "success": true, "selected_index": 2 }),
        ))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/delete_product"))
        .and(body_json(serde_json::json!({ "product_index": 2 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({ "success": true, "remaining_products": 4 }),
        ))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let select = client.select_record(2).await.expect("select");
    assert_eq!(select.selected_index, Some(2));

    let delete = client.delete_record(2).await.expect("delete");
    assert_eq!(delete.remaining_products, Some(4));
}

#[tokio::test]
async fn http_error_status_is_mapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/scraping_status"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server).job_status().await.unwrap_err();
    assert_eq!(err, ApiError::HttpStatus(500));
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/scraping_status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(serde_json::json!({ "active": false })),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings {
        base_url: format!("{}/", server.uri()),
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::default()
    };
    let client = HttpApiClient::new(settings).expect("client");
    let err = client.job_status().await.unwrap_err();
    assert_eq!(err, ApiError::Timeout);
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/scraping_status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).job_status().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn invalid_base_url_is_rejected_up_front() {
    let settings = ClientSettings {
        base_url: "not a url".to_string(),
        ..ClientSettings::default()
    };
    let err = HttpApiClient::new(settings).unwrap_err();
    assert!(matches!(err, ApiError::InvalidBase(_)));
}
