use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn new_user_has_an_empty_cart() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("shopper", "pw123456").await;

    let res = app.get_with_token(routes::CART, &token).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!({"cartData": []}));
}

#[tokio::test]
async fn saving_twice_replaces_the_single_cart_row() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("shopper", "pw123456").await;

    let first = app
        .post_with_token(
            routes::CART,
            &json!({"cartData": [{"id": 1, "quantity": 1}]}),
            &token,
        )
        .await;
    assert_eq!(first.status, 200, "Save failed: {}", first.text);
    assert_eq!(first.body["message"], "Cart saved successfully");

    let replacement = json!([{"id": 2, "quantity": 4}, {"id": 3, "quantity": 1}]);
    let second = app
        .post_with_token(routes::CART, &json!({"cartData": replacement}), &token)
        .await;
    assert_eq!(second.status, 200, "Save failed: {}", second.text);
    assert_eq!(second.body["cart"]["id"], first.body["cart"]["id"]);
    assert_eq!(second.body["cart"]["cartData"], replacement);

    let res = app.get_with_token(routes::CART, &token).await;
    assert_eq!(res.body["cartData"], replacement);

    let rows = app.count_rows("SELECT COUNT(*) FROM user_carts").await;
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn carts_are_kept_per_user() {
    let app = TestApp::spawn().await;
    let alice = app.create_authenticated_user("alice", "pw123456").await;
    let bob = app.create_authenticated_user("bob", "pw123456").await;

    app.post_with_token(routes::CART, &json!({"cartData": [{"id": 1}]}), &alice)
        .await;

    let res = app.get_with_token(routes::CART, &bob).await;

    assert_eq!(res.body["cartData"], json!([]));
}

#[tokio::test]
async fn cart_data_must_be_an_array() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("shopper", "pw123456").await;

    let missing = app.post_with_token(routes::CART, &json!({}), &token).await;
    assert_eq!(missing.status, 400);
    assert_eq!(missing.body["error"], "cartData is required");

    let object = app
        .post_with_token(routes::CART, &json!({"cartData": {"id": 1}}), &token)
        .await;
    assert_eq!(object.status, 400);
    assert_eq!(object.body["error"], "cartData must be an array");
}

#[tokio::test]
async fn cart_requires_a_valid_token() {
    let app = TestApp::spawn().await;

    let missing = app.get_without_token(routes::CART).await;
    assert_eq!(missing.status, 401);

    let invalid = app.get_with_token(routes::CART, "garbage").await;
    assert_eq!(invalid.status, 403);
}
