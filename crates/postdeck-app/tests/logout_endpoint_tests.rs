//! Integration tests for the logout endpoint contract.

use postdeck_app::logout;

#[test]
fn logout_endpoint_tests_rejects_wrong_methods_without_set_cookie() {
    for method in ["GET", "PUT", "DELETE", "OPTIONS"] {
        let response = logout(method);
        assert_eq!(response.status, 405);
        assert!(response.set_cookie.is_empty());
        assert_eq!(
            response.body_json().expect("body should encode"),
            r#"{"error":"Method not allowed"}"#
        );
    }
}

#[test]
fn logout_endpoint_tests_expires_both_cookies_and_is_idempotent() {
    let first = logout("POST");
    assert_eq!(first.status, 200);
    assert_eq!(
        first.body_json().expect("body should encode"),
        r#"{"success":true}"#
    );
    assert_eq!(first.set_cookie.len(), 2);
    assert!(first.set_cookie.iter().all(|c| c.contains("Max-Age=0")));
    assert!(first.set_cookie.iter().all(|c| c.contains("SameSite=Strict")));

    // Logging out again with no live session is still a success.
    assert_eq!(logout("POST"), first);
}
