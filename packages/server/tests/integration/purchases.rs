use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn purchase_is_recorded_and_listed_newest_first() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("buyer", "pw123456").await;

    let first = app
        .post_with_token(
            routes::PURCHASES,
            &json!({"items": [{"id": 1, "quantity": 1}], "total": "299.99"}),
            &token,
        )
        .await;
    assert_eq!(first.status, 201, "Purchase failed: {}", first.text);
    assert_eq!(first.body["message"], "Purchase successful");
    assert_eq!(first.body["purchase"]["total"], "299.99");

    let second = app
        .post_with_token(
            routes::PURCHASES,
            &json!({"items": [{"id": 2, "quantity": 3}], "total": 59.97}),
            &token,
        )
        .await;
    assert_eq!(second.status, 201, "Purchase failed: {}", second.text);

    let res = app.get_with_token(routes::PURCHASES, &token).await;

    assert_eq!(res.status, 200);
    let purchases = res.body.as_array().unwrap();
    assert_eq!(purchases.len(), 2);
    assert_eq!(purchases[0]["id"], second.body["purchase"]["id"]);
    assert_eq!(purchases[0]["items"], json!([{"id": 2, "quantity": 3}]));
    assert_eq!(purchases[1]["id"], first.body["purchase"]["id"]);
    assert_eq!(purchases[0]["userId"], first.body["purchase"]["userId"]);
}

#[tokio::test]
async fn purchases_are_scoped_to_the_caller() {
    let app = TestApp::spawn().await;
    let alice = app.create_authenticated_user("alice", "pw123456").await;
    let bob = app.create_authenticated_user("bob", "pw123456").await;

    app.post_with_token(
        routes::PURCHASES,
        &json!({"items": [{"id": 1, "quantity": 1}], "total": "10.00"}),
        &alice,
    )
    .await;

    let res = app.get_with_token(routes::PURCHASES, &bob).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!([]));
}

#[tokio::test]
async fn invalid_purchases_are_rejected() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("buyer", "pw123456").await;

    let missing = app
        .post_with_token(routes::PURCHASES, &json!({"items": []}), &token)
        .await;
    assert_eq!(missing.status, 400);
    assert_eq!(missing.body["error"], "Items and total are required");

    let not_array = app
        .post_with_token(
            routes::PURCHASES,
            &json!({"items": {"id": 1}, "total": "1.00"}),
            &token,
        )
        .await;
    assert_eq!(not_array.status, 400);
    assert_eq!(not_array.body["error"], "Items must be an array");

    let zero = app
        .post_with_token(
            routes::PURCHASES,
            &json!({"items": [{"id": 1}], "total": "0"}),
            &token,
        )
        .await;
    assert_eq!(zero.status, 400);
    assert_eq!(zero.body["error"], "Total must be a positive amount");
}

#[tokio::test]
async fn purchases_require_a_token() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::PURCHASES,
            &json!({"items": [{"id": 1}], "total": "1.00"}),
        )
        .await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_MISSING");
}
