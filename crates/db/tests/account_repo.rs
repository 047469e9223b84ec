//! Integration tests for the PostgreSQL account repository.
//!
//! These need a live database (`DATABASE_URL`) and are ignored by default:
//! `cargo test -p restaurant-db -- --ignored`.

use assert_matches::assert_matches;
use restaurant_core::roles::{AccountStatus, Role};
use restaurant_db::models::account::{CreateAccount, UpdateAccount};
use restaurant_db::repositories::AccountRepo;
use restaurant_db::{StatusFilter, StoreError};
use sqlx::PgPool;

fn new_account(email: &str) -> CreateAccount {
    CreateAccount {
        name: "Repo Test".to_string(),
        email: email.to_string(),
        password_hash: "digest".to_string(),
        role: Role::User,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn create_defaults_to_active(pool: PgPool) {
    let account = AccountRepo::create(&pool, &new_account("repo@test.com"))
        .await
        .unwrap();
    assert_eq!(account.status, AccountStatus::Active);
    assert_eq!(account.role, Role::User);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_email_maps_to_store_error(pool: PgPool) {
    AccountRepo::create(&pool, &new_account("same@test.com"))
        .await
        .unwrap();
    let err = AccountRepo::create(&pool, &new_account("same@test.com"))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::DuplicateEmail(_));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn deactivate_hides_account_from_active_lookups(pool: PgPool) {
    let account = AccountRepo::create(&pool, &new_account("soft@test.com"))
        .await
        .unwrap();
    AccountRepo::deactivate(&pool, account.id).await.unwrap();

    let active = AccountRepo::find_by_email(&pool, "soft@test.com", StatusFilter::ActiveOnly)
        .await
        .unwrap();
    assert!(active.is_none());

    let any = AccountRepo::find_by_id(&pool, account.id, StatusFilter::IncludeInactive)
        .await
        .unwrap()
        .expect("soft-deleted row must still exist");
    assert_eq!(any.status, AccountStatus::Inactive);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn update_profile_only_touches_given_fields(pool: PgPool) {
    let account = AccountRepo::create(&pool, &new_account("profile@test.com"))
        .await
        .unwrap();
    let input = UpdateAccount {
        name: Some("Renamed".to_string()),
        email: None,
    };
    let updated = AccountRepo::update_profile(&pool, account.id, &input)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.email, "profile@test.com");
}
