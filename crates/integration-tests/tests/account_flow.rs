//! Full account lifecycle: register, log out, log back in offline, then
//! restore the session across a simulated restart.

#![allow(clippy::unwrap_used)]

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use bazaar_core::AccountType;
use bazaar_integration_tests::{TestContext, customer_body, customer_login, register_form};

#[tokio::test]
async fn register_logout_login_roundtrip() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts/register/customer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(customer_body("jwt-reg")))
        .mount(&ctx.server)
        .await;

    let outcome = ctx
        .service
        .register(&register_form(AccountType::Customer))
        .await
        .unwrap();
    assert_eq!(outcome.user.token, "jwt-reg");
    assert_eq!(outcome.redirect, "/shop");
    assert!(ctx.service.session().is_logged_in());

    let target = ctx.service.logout().unwrap();
    assert_eq!(target, "/");
    assert!(!ctx.service.session().is_logged_in());

    // No login mock is mounted. The mirrored registration snapshot carries
    // the re-login without touching the wire.
    let requests_before = ctx.server.received_requests().await.unwrap().len();
    let outcome = ctx
        .service
        .login(&customer_login("abc123"), None)
        .await
        .unwrap();
    assert!(ctx.service.session().is_logged_in());
    assert_eq!(outcome.user.email.as_str(), "amira@example.com");
    assert_eq!(
        ctx.server.received_requests().await.unwrap().len(),
        requests_before
    );
}

#[tokio::test]
async fn session_restores_across_restart() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts/login/customer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(customer_body("jwt-live")))
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/account"))
        .and(header("authorization", "Bearer jwt-live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(customer_body("jwt-fresh")))
        .mount(&ctx.server)
        .await;

    ctx.service
        .login(&customer_login("abc123"), None)
        .await
        .unwrap();

    // A new service with a fresh session store, same data directory.
    let restarted = ctx.restart();
    assert!(!restarted.session().is_logged_in());

    let user = restarted.load_current_user().await.unwrap();
    assert_eq!(user.token, "jwt-fresh");
    assert!(restarted.session().is_logged_in());
}

#[tokio::test]
async fn rejected_token_leaves_restarted_session_absent() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts/login/customer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(customer_body("jwt-revoked")))
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/account"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&ctx.server)
        .await;

    ctx.service
        .login(&customer_login("abc123"), None)
        .await
        .unwrap();

    let restarted = ctx.restart();
    assert!(restarted.load_current_user().await.is_none());
    assert!(!restarted.session().is_logged_in());
}

#[tokio::test]
async fn login_redirect_honors_return_url() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts/login/customer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(customer_body("jwt-1")))
        .mount(&ctx.server)
        .await;

    let outcome = ctx
        .service
        .login(&customer_login("abc123"), Some("/checkout/payment"))
        .await
        .unwrap();
    assert_eq!(outcome.redirect, "/checkout/payment");
}
