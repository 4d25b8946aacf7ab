//! Integration tests for role profiles against a real database.
//!
//! Require `DATABASE_URL`; run with `cargo test -- --ignored`.

use sqlx::PgPool;
use unievent_core::roles::Role;
use unievent_db::models::user::CreateUser;
use unievent_db::repositories::{ProfileRepo, UserRepo};

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn profile_is_repaired_lazily(pool: PgPool) {
    let created = UserRepo::create(
        &pool,
        &CreateUser {
            name: "No Profile".to_string(),
            email: "np@example.com".to_string(),
            password_hash: "x".to_string(),
            role: "lecturer".to_string(),
        },
    )
    .await
    .unwrap();

    assert!(ProfileRepo::find(&pool, created.id, Role::Lecturer)
        .await
        .unwrap()
        .is_none());
    let profile = ProfileRepo::ensure(&pool, created.id, Role::Lecturer)
        .await
        .unwrap();
    assert_eq!(profile.role(), Role::Lecturer);

    let again = ProfileRepo::ensure(&pool, created.id, Role::Lecturer)
        .await
        .unwrap();
    assert_eq!(again.role(), Role::Lecturer);
}
