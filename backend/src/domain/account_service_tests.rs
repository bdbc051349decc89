//! Tests for the account service and admin invariant.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockAuthTokenRepository, MockUserRepository, StoredUser};
use crate::domain::test_fixtures::{fixture_clock, fixture_timestamp};
use crate::domain::{ErrorCode, UserId, Username};

type Service = AccountServiceImpl<MockUserRepository, MockAuthTokenRepository>;

fn make_service(users: MockUserRepository, tokens: MockAuthTokenRepository) -> Service {
    AccountServiceImpl::new(Arc::new(users), Arc::new(tokens), fixture_clock())
}

fn credentials(username: &str, password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts(username, password).expect("valid credentials")
}

fn user(id: i32, name: &str, is_admin: bool) -> User {
    User {
        id: UserId::new(id),
        username: Username::new(name).expect("valid username"),
        is_admin,
    }
}

#[tokio::test]
async fn first_registration_is_promoted_to_admin() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_username().return_once(|_| Ok(None));
    users
        .expect_insert()
        .withf(|new_user: &NewUser| {
            new_user.username.as_ref() == "ada"
                && !new_user.is_admin
                && new_user.password_hash.verify("pw")
        })
        .times(1)
        .return_once(|_| Ok(user(1, "ada", false)));
    users.expect_has_admin().return_once(|| Ok(false));
    users
        .expect_promote_earliest_user()
        .times(1)
        .return_once(|| Ok(Some(user(1, "ada", true))));

    let created = make_service(users, MockAuthTokenRepository::new())
        .register(&credentials(" Ada ", "pw"))
        .await
        .expect("registered");

    assert!(created.is_admin);
}

#[tokio::test]
async fn later_registrations_are_regular_users() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_username().return_once(|_| Ok(None));
    users
        .expect_insert()
        .return_once(|_| Ok(user(2, "bob", false)));
    users.expect_has_admin().return_once(|| Ok(true));
    users.expect_promote_earliest_user().times(0);

    let created = make_service(users, MockAuthTokenRepository::new())
        .register(&credentials("bob", "pw"))
        .await
        .expect("registered");

    assert!(!created.is_admin);
}

#[tokio::test]
async fn taken_username_is_a_conflict() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_username().return_once(|_| {
        Ok(Some(StoredUser {
            user: user(1, "ada", true),
            password_hash: PasswordHash::generate("pw"),
        }))
    });
    users.expect_insert().times(0);

    let err = make_service(users, MockAuthTokenRepository::new())
        .register(&credentials("ADA", "other"))
        .await
        .expect_err("conflict");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn login_issues_and_stores_a_token() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_username().return_once(|_| {
        Ok(Some(StoredUser {
            user: user(3, "cook", false),
            password_hash: PasswordHash::generate("secret"),
        }))
    });
    let mut tokens = MockAuthTokenRepository::new();
    tokens
        .expect_insert()
        .withf(|_, user_id, issued_at| {
            *user_id == UserId::new(3) && *issued_at == fixture_timestamp()
        })
        .times(1)
        .return_once(|_, _, _| Ok(()));

    let session = make_service(users, tokens)
        .login(&credentials("cook", "secret"))
        .await
        .expect("logged in");

    assert_eq!(session.user.id, UserId::new(3));
    assert!(!session.token.as_str().is_empty());
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_username().return_once(|_| {
        Ok(Some(StoredUser {
            user: user(3, "cook", false),
            password_hash: PasswordHash::generate("secret"),
        }))
    });
    let mut tokens = MockAuthTokenRepository::new();
    tokens.expect_insert().times(0);

    let err = make_service(users, tokens)
        .login(&credentials("cook", "guess"))
        .await
        .expect_err("unauthorized");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn unknown_token_is_unauthorized() {
    let mut tokens = MockAuthTokenRepository::new();
    tokens
        .expect_resolve()
        .withf(|_, seen_at| *seen_at == fixture_timestamp())
        .return_once(|_, _| Ok(None));

    let token = AuthToken::parse("stale").expect("token");
    let err = make_service(MockUserRepository::new(), tokens)
        .authenticate(&token)
        .await
        .expect_err("unauthorized");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn admin_invariant_is_idempotent() {
    let mut users = MockUserRepository::new();
    users.expect_has_admin().times(2).returning(|| Ok(true));
    users.expect_promote_earliest_user().times(0);

    assert_eq!(ensure_admin_invariant(&users).await.expect("checked"), None);
    assert_eq!(ensure_admin_invariant(&users).await.expect("checked"), None);
}

#[tokio::test]
async fn admin_invariant_tolerates_an_empty_user_table() {
    let mut users = MockUserRepository::new();
    users.expect_has_admin().return_once(|| Ok(false));
    users
        .expect_promote_earliest_user()
        .return_once(|| Ok(None));

    assert_eq!(ensure_admin_invariant(&users).await.expect("checked"), None);
}
