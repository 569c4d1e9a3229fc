use serde_json::{Value, json};

use crate::common::{TestApp, VAULT_API_KEY, routes};

fn retrieve_body(user_id: i32, amount: f64) -> Value {
    json!({
        "userId": user_id,
        "transactionContext": {"amount": amount, "itemCount": 2}
    })
}

mod authentication {
    use super::*;

    #[tokio::test]
    async fn missing_api_key_is_unauthorized() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::VAULT_RETRIEVE, &retrieve_body(211, 50.0))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["error"], "API key required");
    }

    #[tokio::test]
    async fn wrong_api_key_is_unauthorized() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_api_key(routes::VAULT_RETRIEVE, &retrieve_body(211, 50.0), "nope")
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["error"], "Invalid API key");
    }

    #[tokio::test]
    async fn unconfigured_vault_rejects_every_key() {
        let app = TestApp::spawn_with(|config| config.vault.api_key = None).await;

        let res = app
            .post_with_api_key(
                routes::VAULT_RETRIEVE,
                &retrieve_body(211, 50.0),
                VAULT_API_KEY,
            )
            .await;

        assert_eq!(res.status, 401);
    }
}

mod retrieve {
    use super::*;

    #[tokio::test]
    async fn returns_the_encrypted_default_card() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_api_key(
                routes::VAULT_RETRIEVE,
                &retrieve_body(211, 149.99),
                VAULT_API_KEY,
            )
            .await;

        assert_eq!(res.status, 200, "Retrieve failed: {}", res.text);
        assert_eq!(res.body["success"], true);
        assert_eq!(res.body["decryptionRequired"], true);
        let card = &res.body["paymentMethod"];
        assert_eq!(card["id"], "pm_1234567890");
        assert_eq!(card["cardType"], "visa");
        assert_eq!(card["last4"], "9012");
        assert_eq!(card["expiryHint"], "**12/27");
        assert_eq!(card["keyId"], "key_vault_2024_09_10");
        assert!(card.get("cardNumber").is_none());
        assert_eq!(res.body["vaultMetadata"]["encryptionStatus"], "active");
    }

    #[tokio::test]
    async fn other_users_vault_is_forbidden() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_api_key(
                routes::VAULT_RETRIEVE,
                &retrieve_body(212, 50.0),
                VAULT_API_KEY,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["error"], "Access denied");
    }

    #[tokio::test]
    async fn user_without_cards_is_not_found() {
        let app = TestApp::spawn_with(|config| config.vault.user_id = 7).await;

        let res = app
            .post_with_api_key(routes::VAULT_RETRIEVE, &retrieve_body(7, 50.0), VAULT_API_KEY)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["error"], "No payment methods found");
    }

    #[tokio::test]
    async fn high_value_transactions_need_verification() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_api_key(
                routes::VAULT_RETRIEVE,
                &retrieve_body(211, 1000.01),
                VAULT_API_KEY,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["error"], "Transaction requires additional verification");
    }

    #[tokio::test]
    async fn invalid_transaction_context_is_rejected() {
        let app = TestApp::spawn().await;

        let missing = app
            .post_with_api_key(routes::VAULT_RETRIEVE, &json!({"userId": 211}), VAULT_API_KEY)
            .await;
        assert_eq!(missing.status, 400);
        assert_eq!(missing.body["error"], "userId and transactionContext are required");

        let negative = app
            .post_with_api_key(
                routes::VAULT_RETRIEVE,
                &retrieve_body(211, -1.0),
                VAULT_API_KEY,
            )
            .await;
        assert_eq!(negative.status, 400);
        assert_eq!(negative.body["error"], "Invalid transaction amount");
    }
}

mod store_and_decrypt {
    use super::*;

    #[tokio::test]
    async fn storing_a_card_returns_a_new_payment_method_id() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_api_key(
                routes::VAULT_STORE,
                &json!({
                    "cardNumber": "4111111111111111",
                    "expiryMonth": 4,
                    "expiryYear": 2029,
                    "cvv": "999",
                    "cardholderName": "Ada Lovelace"
                }),
                VAULT_API_KEY,
            )
            .await;

        assert_eq!(res.status, 200, "Store failed: {}", res.text);
        let id = res.body["paymentMethodId"].as_str().unwrap();
        assert!(id.starts_with("pm_"));
        assert_eq!(id.len(), 13);
    }

    #[tokio::test]
    async fn incomplete_or_malformed_cards_are_rejected() {
        let app = TestApp::spawn().await;

        let incomplete = app
            .post_with_api_key(
                routes::VAULT_STORE,
                &json!({"cardNumber": "4111111111111111"}),
                VAULT_API_KEY,
            )
            .await;
        assert_eq!(incomplete.status, 400);
        assert_eq!(incomplete.body["error"], "Incomplete payment details");

        let short = app
            .post_with_api_key(
                routes::VAULT_STORE,
                &json!({
                    "cardNumber": "4111",
                    "expiryMonth": 4,
                    "expiryYear": 2029,
                    "cvv": "999",
                    "cardholderName": "Ada Lovelace"
                }),
                VAULT_API_KEY,
            )
            .await;
        assert_eq!(short.status, 400);
        assert_eq!(short.body["error"], "Invalid card number format");
    }

    #[tokio::test]
    async fn retrieved_blob_decrypts_to_the_card() {
        let app = TestApp::spawn().await;
        let retrieved = app
            .post_with_api_key(
                routes::VAULT_RETRIEVE,
                &retrieve_body(211, 20.0),
                VAULT_API_KEY,
            )
            .await;
        let card = &retrieved.body["paymentMethod"];

        let res = app
            .post_with_api_key(
                routes::VAULT_DECRYPT,
                &json!({
                    "encryptedData": card["encryptedData"],
                    "keyId": card["keyId"],
                    "algorithm": card["algorithm"]
                }),
                VAULT_API_KEY,
            )
            .await;

        assert_eq!(res.status, 200, "Decrypt failed: {}", res.text);
        assert_eq!(res.body["decryptedPayment"]["cardNumber"], "4532123456789012");
        assert_eq!(res.body["decryptedPayment"]["cardHolderName"], "John Doe");
        assert_eq!(res.body["metadata"]["keyId"], "key_vault_2024_09_10");
    }

    #[tokio::test]
    async fn unknown_key_cannot_decrypt() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_api_key(
                routes::VAULT_DECRYPT,
                &json!({
                    "encryptedData": "enc_whatever",
                    "keyId": "key_other",
                    "algorithm": "AES-256-GCM"
                }),
                VAULT_API_KEY,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["error"], "Invalid decryption parameters");
    }
}
