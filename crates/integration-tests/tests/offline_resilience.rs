//! Behavior against an unreachable or failing backend. The client is meant
//! to keep working: registration falls back to a local snapshot, probes fall
//! back to the mirror, and session restore fails open to logged-out.

#![allow(clippy::unwrap_used)]

use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use bazaar_core::{AccountType, Email, PhoneNumber};
use bazaar_integration_tests::{TestContext, customer_login, register_form};

/// Mount 500s for every account endpoint the scenarios touch.
async fn backend_down(ctx: &TestContext) {
    for route in [
        "/account",
        "/accounts/login/customer",
        "/accounts/register/customer",
        "/accounts/emailexists",
        "/accounts/phonenumberexists",
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(500))
            .mount(&ctx.server)
            .await;
        Mock::given(method("POST"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(500))
            .mount(&ctx.server)
            .await;
    }
}

#[tokio::test]
async fn registration_survives_a_dead_backend() {
    let ctx = TestContext::start().await;
    backend_down(&ctx).await;

    let outcome = ctx
        .service
        .register(&register_form(AccountType::Customer))
        .await
        .unwrap();
    assert_eq!(outcome.redirect, "/shop");
    assert!(ctx.service.session().is_logged_in());
    assert_eq!(
        ctx.service.mirrored_account_type(),
        Some(AccountType::Customer)
    );
}

#[tokio::test]
async fn offline_login_works_after_offline_registration() {
    let ctx = TestContext::start().await;
    backend_down(&ctx).await;

    ctx.service
        .register(&register_form(AccountType::Customer))
        .await
        .unwrap();
    ctx.service.logout().unwrap();

    ctx.service
        .login(&customer_login("abc123"), None)
        .await
        .unwrap();
    assert!(ctx.service.session().is_logged_in());

    // Wrong password still fails, even offline.
    let err = ctx.service.login(&customer_login("wrong99"), None).await;
    assert!(err.is_err());
}

#[tokio::test]
async fn existence_probes_fall_back_to_the_mirror() {
    let ctx = TestContext::start().await;
    backend_down(&ctx).await;

    let email = Email::parse("amira@example.com").unwrap();
    let phone = PhoneNumber::parse("01234567890").unwrap();
    assert!(!ctx.service.email_taken(&email).await);
    assert!(!ctx.service.phone_taken(&phone).await);

    ctx.service
        .register(&register_form(AccountType::Customer))
        .await
        .unwrap();

    assert!(ctx.service.email_taken(&email).await);
    assert!(ctx.service.phone_taken(&phone).await);
    assert!(
        !ctx.service
            .email_taken(&Email::parse("someone@else.com").unwrap())
            .await
    );
}

#[tokio::test]
async fn session_restore_fails_open_when_backend_is_down() {
    let ctx = TestContext::start().await;
    backend_down(&ctx).await;

    ctx.service
        .register(&register_form(AccountType::Customer))
        .await
        .unwrap();

    // The offline registration left no token behind, and the backend cannot
    // mint one, so a restarted client simply starts logged out.
    let restarted = ctx.restart();
    assert!(restarted.load_current_user().await.is_none());
    assert!(!restarted.session().is_logged_in());
}
