//! Repository-level tests against a real database.
//!
//! `#[sqlx::test]` provisions a fresh database per test from `DATABASE_URL`.

use sqlx::PgPool;
use vitrine_core::pagination::PageRequest;
use vitrine_db::models::admin::{Admin, CreateAdmin};
use vitrine_db::models::slider::{CreateSlider, UpdateSlider};
use vitrine_db::repositories::{AdminRepo, GalleryRepo, SliderRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn admin(pool: &PgPool, username: &str) -> Admin {
    AdminRepo::create(
        pool,
        &CreateAdmin {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "$argon2id$placeholder".to_string(),
        },
    )
    .await
    .unwrap()
}

fn new_slider(name: &str, sort_order: i32) -> CreateSlider {
    CreateSlider {
        name: name.to_string(),
        image: format!("/uploads/sliders/{name}.jpg"),
        image_path: format!("uploads/sliders/{name}.jpg"),
        sort_order,
        is_active: true,
    }
}

// ---------------------------------------------------------------------------
// Admins
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_username_violates_unique_constraint(pool: PgPool) {
    admin(&pool, "admin").await;

    let err = AdminRepo::create(
        &pool,
        &CreateAdmin {
            username: "admin".into(),
            email: "other@example.com".into(),
            password_hash: "x".into(),
        },
    )
    .await
    .unwrap_err();

    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("uq_admins_username"));
}

#[sqlx::test(migrations = "./migrations")]
async fn exists_matches_username_or_email(pool: PgPool) {
    admin(&pool, "admin").await;

    assert!(AdminRepo::exists_by_username_or_email(&pool, "admin", "x@example.com")
        .await
        .unwrap());
    assert!(AdminRepo::exists_by_username_or_email(&pool, "x", "admin@example.com")
        .await
        .unwrap());
    assert!(!AdminRepo::exists_by_username_or_email(&pool, "x", "x@example.com")
        .await
        .unwrap());
}

// ---------------------------------------------------------------------------
// Sliders
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn active_sliders_are_ordered(pool: PgPool) {
    SliderRepo::create(&pool, &new_slider("second", 2)).await.unwrap();
    let first = SliderRepo::create(&pool, &new_slider("first", 1)).await.unwrap();
    let hidden = SliderRepo::create(&pool, &new_slider("hidden", 0)).await.unwrap();
    SliderRepo::toggle_active(&pool, hidden.id).await.unwrap();

    let listed = SliderRepo::list_active(&pool).await.unwrap();
    let names: Vec<_> = listed.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["first", "second"]);
    assert_eq!(listed[0].id, first.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn partial_update_keeps_other_columns(pool: PgPool) {
    let slider = SliderRepo::create(&pool, &new_slider("spring", 1)).await.unwrap();

    let updated = SliderRepo::update(
        &pool,
        slider.id,
        &UpdateSlider {
            name: Some("Spring Sale".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.name, "Spring Sale");
    assert_eq!(updated.image, slider.image);
    assert_eq!(updated.image_path, slider.image_path);
    assert_eq!(updated.sort_order, 1);
    assert!(updated.updated_at >= slider.updated_at);
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_returns_row_once(pool: PgPool) {
    let slider = SliderRepo::create(&pool, &new_slider("gone", 1)).await.unwrap();

    let deleted = SliderRepo::delete(&pool, slider.id).await.unwrap();
    assert_eq!(deleted.map(|s| s.image_path), Some(slider.image_path));
    assert!(SliderRepo::delete(&pool, slider.id).await.unwrap().is_none());
    assert!(SliderRepo::update(&pool, slider.id, &UpdateSlider::default())
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Gallery
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn media_type_must_be_photo_or_video(pool: PgPool) {
    let owner = admin(&pool, "curator").await;

    let result = sqlx::query(
        "INSERT INTO gallery_items
            (media_type, name, file_name, file_path, file_url, file_size, mime_type, uploaded_by)
         VALUES ('audio', 'a', 'a', 'a', 'a', 1, 'audio/mpeg', $1)",
    )
    .bind(owner.id)
    .execute(&pool)
    .await;

    assert!(result.is_err());
}

#[sqlx::test(migrations = "./migrations")]
async fn empty_gallery_lists_nothing(pool: PgPool) {
    let (items, total) = GalleryRepo::list(&pool, None, None, &PageRequest::new(None, None))
        .await
        .unwrap();
    assert!(items.is_empty());
    assert_eq!(total, 0);
}
