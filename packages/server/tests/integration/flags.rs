use serde_json::json;

use crate::common::{TestApp, routes};

mod reading {
    use super::*;

    #[tokio::test]
    async fn seeded_flags_are_listed_as_a_map() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::FLAGS).await;

        assert_eq!(res.status, 200);
        let flags = res.body.as_object().unwrap();
        assert_eq!(flags.len(), 8);
        assert_eq!(flags["STORE_CHECKOUT_ENABLED"], true);
        assert_eq!(flags["BACKEND_V2"], true);
        assert_eq!(flags["DARK_MODE"], false);
    }

    #[tokio::test]
    async fn descriptions_and_details_cover_every_flag() {
        let app = TestApp::spawn().await;

        let descriptions = app.get_without_token(routes::FLAG_DESCRIPTIONS).await;
        let details = app.get_without_token(routes::FLAG_DETAILS).await;

        assert_eq!(descriptions.status, 200);
        assert_eq!(details.status, 200);
        let descriptions = descriptions.body.as_array().unwrap();
        let details = details.body.as_array().unwrap();
        assert_eq!(descriptions.len(), details.len());
        assert!(descriptions.iter().all(|d| d["description"].is_string()));
        assert!(
            details
                .iter()
                .all(|d| d["last_updated_by"] == "admin-menu@hoopshop.app")
        );
    }
}

mod creation {
    use super::*;

    #[tokio::test]
    async fn creates_a_flag_defaulting_to_false() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::FLAGS,
                &json!({"name": "NEW_HEADER", "description": "Redesigned header"}),
            )
            .await;

        assert_eq!(res.status, 201, "Create failed: {}", res.text);
        assert_eq!(res.body["name"], "NEW_HEADER");
        assert_eq!(res.body["value"], false);

        let flags = app.get_without_token(routes::FLAGS).await;
        assert_eq!(flags.body["NEW_HEADER"], false);
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::FLAGS, &json!({"name": "DARK_MODE", "value": true}))
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["error"], "Flag 'DARK_MODE' already exists");
    }

    #[tokio::test]
    async fn loosely_typed_fields_are_rejected() {
        let app = TestApp::spawn().await;

        let no_name = app
            .post_without_token(routes::FLAGS, &json!({"value": true}))
            .await;
        assert_eq!(no_name.status, 400);
        assert_eq!(no_name.body["error"], "Flag name is required and must be a string");

        let string_value = app
            .post_without_token(routes::FLAGS, &json!({"name": "X", "value": "yes"}))
            .await;
        assert_eq!(string_value.status, 400);
        assert_eq!(string_value.body["error"], "Value must be a boolean");

        let numeric_description = app
            .post_without_token(routes::FLAGS, &json!({"name": "X", "description": 5}))
            .await;
        assert_eq!(numeric_description.status, 400);
        assert_eq!(numeric_description.body["error"], "Description must be a string");
    }

    #[tokio::test]
    async fn overlong_name_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::FLAGS, &json!({"name": "F".repeat(256)}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["error"], "Flag name must be at most 255 characters");

        let flags = app.get_without_token(routes::FLAGS).await;
        assert_eq!(flags.body.as_object().unwrap().len(), 8);
    }
}

mod updating {
    use super::*;

    #[tokio::test]
    async fn changed_default_is_persisted_with_the_actor() {
        let app = TestApp::spawn().await;

        let res = app
            .patch_without_token(
                &routes::flag_default("DARK_MODE"),
                &json!({"value": true, "userId": "alice@example.com", "userType": "email"}),
            )
            .await;

        assert_eq!(res.status, 200, "Update failed: {}", res.text);
        assert_eq!(res.body, json!({"success": true}));

        let flags = app.get_without_token(routes::FLAGS).await;
        assert_eq!(flags.body["DARK_MODE"], true);

        let details = app.get_without_token(routes::FLAG_DETAILS).await;
        let dark_mode = details
            .body
            .as_array()
            .unwrap()
            .iter()
            .find(|f| f["name"] == "DARK_MODE")
            .unwrap();
        assert_eq!(dark_mode["last_updated_by"], "alice@example.com");
    }

    #[tokio::test]
    async fn setting_the_current_value_is_a_no_op() {
        let app = TestApp::spawn().await;

        let res = app
            .patch_without_token(&routes::flag_default("BACKEND_V2"), &json!({"value": true}))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!({"message": "Flag value unchanged"}));
    }

    #[tokio::test]
    async fn failed_notification_does_not_undo_the_update() {
        // A webhook without a signing secret can never be delivered.
        let app = TestApp::spawn_with(|config| {
            config.flags.webhook_url = Some("http://127.0.0.1:9/hook".into());
            config.flags.webhook_secret = None;
        })
        .await;

        let res = app
            .patch_without_token(&routes::flag_default("SITE_RELAUNCH"), &json!({"value": true}))
            .await;

        assert_eq!(res.status, 200);
        let flags = app.get_without_token(routes::FLAGS).await;
        assert_eq!(flags.body["SITE_RELAUNCH"], true);
    }

    #[tokio::test]
    async fn unknown_flag_and_non_boolean_values_are_rejected() {
        let app = TestApp::spawn().await;

        let unknown = app
            .patch_without_token(&routes::flag_default("NOPE"), &json!({"value": true}))
            .await;
        assert_eq!(unknown.status, 404);
        assert_eq!(unknown.body["error"], "Flag 'NOPE' not found");

        let not_bool = app
            .patch_without_token(&routes::flag_default("DARK_MODE"), &json!({"value": "on"}))
            .await;
        assert_eq!(not_bool.status, 400);
    }

    #[tokio::test]
    async fn overlong_actor_leaves_the_flag_untouched() {
        let app = TestApp::spawn().await;

        let res = app
            .patch_without_token(
                &routes::flag_default("DARK_MODE"),
                &json!({"value": true, "userId": "a".repeat(256)}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["error"], "userId must be at most 255 characters");

        let flags = app.get_without_token(routes::FLAGS).await;
        assert_eq!(flags.body["DARK_MODE"], false);
    }
}

mod deletion {
    use super::*;

    #[tokio::test]
    async fn deleted_flag_disappears() {
        let app = TestApp::spawn().await;

        let res = app.delete_without_token(&routes::flag("DARK_MODE")).await;
        assert_eq!(res.status, 204);

        let flags = app.get_without_token(routes::FLAGS).await;
        assert!(flags.body.get("DARK_MODE").is_none());

        let again = app.delete_without_token(&routes::flag("DARK_MODE")).await;
        assert_eq!(again.status, 404);
    }
}

mod notifications {
    use super::*;

    #[tokio::test]
    async fn complete_notification_is_accepted() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::FLAG_NOTIFY,
                &json!({
                    "flagName": "DARK_MODE",
                    "action": "updated",
                    "userId": "alice@example.com",
                    "userType": "email"
                }),
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["message"], "Notification sent successfully");
    }

    #[tokio::test]
    async fn missing_fields_are_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::FLAG_NOTIFY,
                &json!({"flagName": "DARK_MODE", "action": "updated"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(
            res.body["error"],
            "Missing required fields for override notification"
        );
    }

    #[tokio::test]
    async fn undeliverable_notification_is_a_server_error() {
        let app = TestApp::spawn_with(|config| {
            config.flags.webhook_url = Some("http://127.0.0.1:9/hook".into());
        })
        .await;

        let res = app
            .post_without_token(
                routes::FLAG_NOTIFY,
                &json!({
                    "flagName": "DARK_MODE",
                    "action": "removed",
                    "userId": "alice@example.com",
                    "userType": "email"
                }),
            )
            .await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body["code"], "INTERNAL_ERROR");
    }
}
