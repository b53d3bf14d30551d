use blog_guard::menu::MenuLinkRequest;
use blog_guard::models::{EventId, EventType, LocalAccount};
use uuid::Uuid;

// --- Tests ---

#[test]
fn test_local_account_never_serializes_hash() {
    let account = LocalAccount::new(
        Uuid::new_v4(),
        "alice".to_string(),
        "JAvlGPq9JyTdtvBO6x2llnRI1+gxwIyPqCKAn3THIKk=".to_string(),
    );

    let json_output = serde_json::to_string(&account).unwrap();

    // CRITICAL: the stored hash must not leak through JSON.
    assert!(!json_output.contains("password_hash"));
    assert!(!json_output.contains("JAvlGPq9"));
    assert!(json_output.contains(r#""username":"alice""#));
    assert!(json_output.contains(r#""last_login_ip":null"#));
}

#[test]
fn test_new_account_has_no_login_history() {
    let account = LocalAccount::new(Uuid::new_v4(), "bob".to_string(), "h".to_string());
    assert!(account.last_login_ip.is_none());
    assert!(account.last_login_at_utc.is_none());
}

#[test]
fn test_audit_vocabulary_is_stable() {
    assert_eq!(serde_json::to_string(&EventType::Settings).unwrap(), r#""settings""#);
    assert_eq!(
        serde_json::to_string(&EventId::SettingsAccountCreated).unwrap(),
        r#""settings_account_created""#
    );
    assert_eq!(EventId::SettingsAccountCreated.code(), 1001);
    assert_eq!(
        EventId::SettingsAccountCreated.to_string(),
        "settings_account_created(1001)"
    );
    assert_eq!(EventType::Content.to_string(), "content");
}

#[test]
fn test_menu_link_request_deserializes_with_defaults() {
    let request: MenuLinkRequest =
        serde_json::from_str(r#"{"title":"Home","url":"/","icon":"","display_order":0,"is_open_in_new_tab":false}"#)
            .unwrap();
    assert_eq!(request.url, "/");
    assert_eq!(request.title, "Home");
}
