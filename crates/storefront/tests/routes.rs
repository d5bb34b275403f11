//! Route tests against the full router, session layer included.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use suplefit_core::{Price, Product, ProductId, Variant, VariantId};
use suplefit_storefront::catalog::Catalog;
use suplefit_storefront::config::StorefrontConfig;
use suplefit_storefront::routes;
use suplefit_storefront::state::AppState;

fn test_catalog() -> Catalog {
    let creatine = Product {
        id: ProductId::new("creatine"),
        name: "Creatina Monohidrato".to_owned(),
        price: Price::from_amount(100),
        original_price: Some(Price::from_amount(120)),
        image: "/img/creatine.webp".to_owned(),
        stock: Some(5),
        in_stock: true,
        base_size: None,
        variants: vec![],
        flavors: vec![],
    };
    let whey = Product {
        id: ProductId::new("whey"),
        name: "Proteina Whey".to_owned(),
        price: Price::from_amount(100),
        original_price: None,
        image: "/img/whey.webp".to_owned(),
        stock: None,
        in_stock: true,
        base_size: None,
        variants: vec![
            Variant {
                id: VariantId::new("A"),
                size: "1kg".to_owned(),
                price: Some(Price::from_amount(100)),
                original_price: None,
                image: None,
                stock: Some(3),
            },
            Variant {
                id: VariantId::new("B"),
                size: "2kg".to_owned(),
                price: Some(Price::from_amount(180)),
                original_price: None,
                image: None,
                stock: Some(0),
            },
        ],
        flavors: vec!["Vainilla".to_owned(), "Chocolate".to_owned()],
    };
    Catalog::from_products(vec![creatine, whey])
}

fn test_app() -> Router {
    let config = StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        catalog_path: "unused.json".into(),
    };
    routes::app(AppState::new(config, test_catalog()))
}

/// One shopper: replays the session cookie across requests.
struct Shopper {
    app: Router,
    cookie: Option<String>,
}

impl Shopper {
    fn new() -> Self {
        Self::on(test_app())
    }

    fn on(app: Router) -> Self {
        Self { app, cookie: None }
    }

    async fn request(&mut self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let raw = set_cookie.to_str().unwrap();
            self.cookie = Some(raw.split(';').next().unwrap().to_owned());
        }

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    async fn get(&mut self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    async fn post(&mut self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }
}

#[tokio::test]
async fn health_check() {
    let (status, body) = Shopper::new().get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_owned()));
}

#[tokio::test]
async fn product_listing_includes_size_options() {
    let (status, body) = Shopper::new().get("/products").await;
    assert_eq!(status, StatusCode::OK);
    let products = body.as_array().unwrap();
    assert_eq!(products.len(), 2);

    let whey = products
        .iter()
        .find(|p| p["id"] == "whey")
        .unwrap();
    assert_eq!(whey["requires_flavor"], true);
    let sizes = whey["sizes"].as_array().unwrap();
    assert_eq!(sizes.len(), 2);
    assert_eq!(sizes[0]["id"], "A");
    assert_eq!(sizes[1]["label"], "2kg");
}

#[tokio::test]
async fn unknown_product_is_404() {
    let (status, _) = Shopper::new().get("/products/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn add_twice_merges_and_totals_follow() {
    let mut shopper = Shopper::new();
    let add = json!({"product_id": "creatine"});

    let (status, _) = shopper.post("/cart/add", add.clone()).await;
    assert_eq!(status, StatusCode::OK);
    let (status, cart) = shopper.post("/cart/add", add).await;
    assert_eq!(status, StatusCode::OK);

    let items = cart["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(cart["totals"]["total_price"]["amount"], "200");
    assert_eq!(cart["totals"]["total_items"], 2);
    assert_eq!(cart["totals"]["total_discount"]["amount"], "40");

    // Same session sees the same cart on read
    let (_, cart) = shopper.get("/cart").await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    let (_, count) = shopper.get("/cart/count").await;
    assert_eq!(count["count"], 2);

    // Remove empties it
    let key = cart["items"][0]["key"].as_str().unwrap().to_owned();
    let (status, cart) = shopper.post("/cart/remove", json!({"key": key})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cart["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn flavor_required_when_product_has_several() {
    let mut shopper = Shopper::new();
    let (status, _) = shopper
        .post("/cart/add", json!({"product_id": "whey", "variant_id": "A"}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, cart) = shopper
        .post(
            "/cart/add",
            json!({"product_id": "whey", "variant_id": "A", "flavor": "Vainilla"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"][0]["key"], "whey::A::Vainilla");
    assert_eq!(cart["items"][0]["flavor"], "Vainilla");
}

#[tokio::test]
async fn sold_out_variant_is_blocked() {
    let mut shopper = Shopper::new();
    let (status, _) = shopper
        .post(
            "/cart/add",
            json!({"product_id": "whey", "variant_id": "B", "flavor": "Chocolate"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn update_clamps_to_stock_and_floor() {
    let mut shopper = Shopper::new();
    let (_, cart) = shopper
        .post(
            "/cart/add",
            json!({"product_id": "whey", "variant_id": "A", "flavor": "Vainilla"}),
        )
        .await;
    let key = cart["items"][0]["key"].as_str().unwrap().to_owned();

    // Variant A has stock 3; requests above it clamp down
    let (status, cart) = shopper
        .post("/cart/update", json!({"key": key, "quantity": 50}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"][0]["quantity"], 3);

    // And the floor of 1 holds below
    let (_, cart) = shopper
        .post("/cart/update", json!({"key": key, "quantity": 0}))
        .await;
    assert_eq!(cart["items"][0]["quantity"], 1);
}

#[tokio::test]
async fn add_without_product_id_is_400() {
    // The engine tolerates malformed additions; the HTTP boundary is where
    // they are validated away.
    let mut shopper = Shopper::new();
    let (status, _) = shopper.post("/cart/add", json!({"product_id": "  "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_with_malformed_key_is_400() {
    let mut shopper = Shopper::new();
    let (status, _) = shopper
        .post("/cart/update", json!({"key": "not-a-key", "quantity": 1}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn remove_absent_key_is_a_noop() {
    let mut shopper = Shopper::new();
    shopper
        .post("/cart/add", json!({"product_id": "creatine"}))
        .await;
    let (status, cart) = shopper
        .post("/cart/remove", json!({"key": "ghost::::"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn clear_is_idempotent() {
    let mut shopper = Shopper::new();
    shopper
        .post("/cart/add", json!({"product_id": "creatine"}))
        .await;
    for _ in 0..2 {
        let (status, cart) = shopper.post("/cart/clear", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert!(cart["items"].as_array().unwrap().is_empty());
        assert_eq!(cart["totals"]["total_price"]["amount"], "0");
    }
}

#[tokio::test]
async fn checkout_snapshot_does_not_clear() {
    let mut shopper = Shopper::new();

    let (status, _) = shopper.get("/checkout").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    shopper
        .post("/cart/add", json!({"product_id": "creatine"}))
        .await;
    let (status, snapshot) = shopper.get("/checkout").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["items"].as_array().unwrap().len(), 1);
    assert_eq!(snapshot["totals"]["total_items"], 1);

    // Checkout hands off a copy; only an explicit clear empties the cart
    let (_, cart) = shopper.get("/cart").await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn sessions_do_not_share_carts() {
    let app = test_app();
    let mut first = Shopper::on(app.clone());
    first
        .post("/cart/add", json!({"product_id": "creatine"}))
        .await;
    let (_, cart) = first.get("/cart").await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);

    // A second shopper on the same server sees an empty cart
    let mut second = Shopper::on(app);
    let (_, cart) = second.get("/cart").await;
    assert!(cart["items"].as_array().unwrap().is_empty());
}
