//! Integration tests for the session cart.
//!
//! Each `TestClient` behaves like one browser tab: it carries the session
//! cookie from response to request.

use axum::http::StatusCode;
use serde_json::Value;
use showroom_core::RepeatAdd;
use showroom_integration_tests::{TestClient, test_app};
use showroom_storefront::routes::cart::CartView;

fn client() -> TestClient {
    TestClient::new(test_app(RepeatAdd::OneUnit))
}

async fn add(client: &mut TestClient, id: &str, name: &str, price: &str) -> Value {
    let resp = client
        .post_form(
            "/cart/add",
            &[
                ("product_id", id),
                ("product_name", name),
                ("product_price", price),
            ],
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text());
    assert_eq!(resp.header("hx-trigger"), Some("cart-updated"));
    resp.json()
}

fn lines(cart: &CartView) -> Vec<(&str, u32)> {
    cart.items
        .iter()
        .map(|i| (i.id.as_str(), i.quantity))
        .collect()
}

// =============================================================================
// Baseline
// =============================================================================

#[tokio::test]
async fn test_new_session_has_empty_cart() {
    let mut client = client();

    let cart: CartView = client.get("/cart").await.json();
    assert!(cart.items.is_empty());
    assert_eq!(cart.item_count, 0);
    assert_eq!(cart.subtotal, "$0.00");

    let badge: Value = client.get("/cart/count").await.json();
    assert_eq!(badge["count"], 0);
    assert_eq!(badge["visible"], false);
}

// =============================================================================
// Add
// =============================================================================

#[tokio::test]
async fn test_repeat_add_increments_single_entry() {
    let mut client = client();

    add(&mut client, "p1", "Chair", "49.99").await;
    let badge = add(&mut client, "p1", "Chair", "49.99").await;
    assert_eq!(badge["count"], 2);
    assert_eq!(badge["visible"], true);

    let cart: CartView = client.get("/cart").await.json();
    assert_eq!(lines(&cart), vec![("p1", 2)]);
    assert_eq!(cart.subtotal, "$99.98");
}

#[tokio::test]
async fn test_insertion_order_preserved() {
    let mut client = client();

    add(&mut client, "a", "A", "1").await;
    add(&mut client, "b", "B", "2").await;
    add(&mut client, "a", "A", "1").await;

    let cart: CartView = client.get("/cart").await.json();
    assert_eq!(lines(&cart), vec![("a", 2), ("b", 1)]);
}

#[tokio::test]
async fn test_count_sums_quantities() {
    let mut client = client();

    for _ in 0..3 {
        add(&mut client, "x", "X", "5").await;
    }
    add(&mut client, "y", "Y", "5").await;

    let badge: Value = client.get("/cart/count").await.json();
    assert_eq!(badge["count"], 4);
}

#[tokio::test]
async fn test_one_unit_policy_ignores_submitted_quantity() {
    let mut client = client();
    let fields = [
        ("product_id", "p1"),
        ("product_name", "Chair"),
        ("product_price", "10"),
        ("quantity", "3"),
    ];

    client.post_form("/cart/add", &fields).await;
    client.post_form("/cart/add", &fields).await;

    let cart: CartView = client.get("/cart").await.json();
    assert_eq!(lines(&cart), vec![("p1", 4)]);
}

#[tokio::test]
async fn test_candidate_quantity_policy() {
    let mut client = TestClient::new(test_app(RepeatAdd::CandidateQuantity));
    let fields = [
        ("product_id", "p1"),
        ("product_name", "Chair"),
        ("product_price", "10"),
        ("quantity", "3"),
    ];

    client.post_form("/cart/add", &fields).await;
    client.post_form("/cart/add", &fields).await;

    let cart: CartView = client.get("/cart").await.json();
    assert_eq!(lines(&cart), vec![("p1", 6)]);
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_invalid_input_rejected_and_cart_untouched() {
    let mut client = client();
    add(&mut client, "p1", "Chair", "49.99").await;

    let cases: [&[(&str, &str)]; 12] = [
        &[("product_id", ""), ("product_name", "Chair"), ("product_price", "1")],
        &[("product_id", "p2"), ("product_name", " "), ("product_price", "1")],
        &[("product_id", "p2"), ("product_name", "Lamp"), ("product_price", "-1")],
        &[("product_id", "p2"), ("product_name", "Lamp"), ("product_price", "cheap")],
        &[("product_id", "p2"), ("product_name", "Lamp"), ("product_price", "1.005")],
        &[("product_id", "p2"), ("product_name", "Lamp"), ("product_price", "79228162514264337593543950335")],
        &[("product_id", "p2"), ("product_price", "1")],
        &[("product_id", "p2"), ("product_name", "Lamp")],
        &[],
        &[("product_id", "p2"), ("product_name", "Lamp"), ("product_price", "1"), ("quantity", "0")],
        &[("product_id", "p2"), ("product_name", "Lamp"), ("product_price", "1"), ("quantity", "-1")],
        &[("product_id", "p2"), ("product_name", "Lamp"), ("product_price", "1"), ("quantity", "abc")],
    ];
    for fields in cases {
        let resp = client.post_form("/cart/add", fields).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{fields:?}");
        assert!(resp.header("hx-trigger").is_none(), "{fields:?}");
    }

    let cart: CartView = client.get("/cart").await.json();
    assert_eq!(lines(&cart), vec![("p1", 1)]);
}

#[tokio::test]
async fn test_large_price_survives_reload() {
    let mut client = client();
    add(&mut client, "keep", "Keep", "10").await;
    add(&mut client, "p1", "Sideboard", "999999999.99").await;

    let cart: CartView = client.get("/cart").await.json();
    assert_eq!(lines(&cart), vec![("keep", 1), ("p1", 1)]);
    assert_eq!(cart.items.get(1).unwrap().price, "$999999999.99");
    assert_eq!(cart.subtotal, "$1000000009.99");
}

#[tokio::test]
async fn test_remove_without_product_id_is_bad_request() {
    let mut client = client();
    let resp = client.post_form("/cart/remove", &[]).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Session scope
// =============================================================================

#[tokio::test]
async fn test_sessions_are_isolated() {
    let mut first = client();
    add(&mut first, "p1", "Chair", "49.99").await;

    let mut second = first.fresh_session();
    let badge: Value = second.get("/cart/count").await.json();
    assert_eq!(badge["count"], 0);

    let badge: Value = first.get("/cart/count").await.json();
    assert_eq!(badge["count"], 1);
}

// =============================================================================
// Remove / clear
// =============================================================================

#[tokio::test]
async fn test_remove_item() {
    let mut client = client();
    add(&mut client, "a", "A", "1").await;
    add(&mut client, "b", "B", "2").await;

    let resp = client.post_form("/cart/remove", &[("product_id", "a")]).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.header("hx-trigger"), Some("cart-updated"));
    let cart: CartView = resp.json();
    assert_eq!(lines(&cart), vec![("b", 1)]);

    let resp = client.post_form("/cart/remove", &[("product_id", "zzz")]).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.header("hx-trigger").is_none());
}

#[tokio::test]
async fn test_clear() {
    let mut client = client();
    add(&mut client, "a", "A", "1").await;

    let badge: Value = client.post_form("/cart/clear", &[]).await.json();
    assert_eq!(badge["count"], 0);
    assert_eq!(badge["visible"], false);

    let cart: CartView = client.get("/cart").await.json();
    assert!(cart.items.is_empty());
}

// =============================================================================
// Catalog add
// =============================================================================

#[tokio::test]
async fn test_add_catalog_product() {
    let mut client = client();

    let resp = client.post_form("/products/chair-rattan/add", &[]).await;
    assert_eq!(resp.status, StatusCode::OK);
    client.post_form("/products/chair-rattan/add", &[]).await;

    let cart: CartView = client.get("/cart").await.json();
    assert_eq!(lines(&cart), vec![("chair-rattan", 2)]);
    let line = cart.items.first().unwrap();
    assert_eq!(line.name, "Rattan Dining Chair");
    assert_eq!(line.price, "$49.99");
    assert_eq!(line.line_price, "$99.98");
}

#[tokio::test]
async fn test_add_unknown_catalog_product() {
    let mut client = client();
    let resp = client.post_form("/products/nope/add", &[]).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}
