//! User store behaviour against SQLite.

mod support;

use common::AppError;
use domain::{Mbti, TravelPreferenceInput, TravelTheme, TravelType, UpdateProfile, UserRole};
use support::{new_user, seed_user, services, setup_db};

#[tokio::test]
async fn test_new_account_starts_as_non_user() {
    let db = setup_db().await;
    let services = services(&db);

    let user = seed_user(&services, "a@withaeng.com").await;

    assert_eq!(user.role, UserRole::NonUser);
    let found = services.users.find_by_email("a@withaeng.com").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let db = setup_db().await;
    let services = services(&db);
    seed_user(&services, "a@withaeng.com").await;

    let result = services.users.create_user(new_user("a@withaeng.com")).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let direct = services.user_store.create(new_user("a@withaeng.com")).await;
    assert!(matches!(direct, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_update_profile_keeps_unset_fields() {
    let db = setup_db().await;
    let services = services(&db);
    let user = seed_user(&services, "a@withaeng.com").await;

    let updated = services
        .users
        .update_profile(
            user.id,
            UpdateProfile {
                introduction: Some("Backpacking through Asia".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.nickname, user.nickname);
    assert_eq!(updated.introduction.as_deref(), Some("Backpacking through Asia"));
}

#[tokio::test]
async fn test_travel_preference_created_then_replaced() {
    let db = setup_db().await;
    let services = services(&db);
    let user = seed_user(&services, "a@withaeng.com").await;

    let detail = services.users.get_user_detail(user.id).await.unwrap();
    assert!(detail.travel_preference.is_none());

    let created = services
        .users
        .update_travel_preference(
            user.id,
            TravelPreferenceInput {
                mbti: vec![Mbti::Enfp, Mbti::Enfp],
                prefer_travel_type: Some(TravelType::Planned),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(created.mbti, vec![Mbti::Enfp]);

    let replaced = services
        .users
        .update_travel_preference(
            user.id,
            TravelPreferenceInput {
                prefer_travel_themes: vec![TravelTheme::Food, TravelTheme::Nature],
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(replaced.mbti.is_empty());
    assert_eq!(replaced.prefer_travel_type, None);

    let detail = services.users.get_user_detail(user.id).await.unwrap();
    let stored = detail.travel_preference.unwrap();
    assert_eq!(stored.prefer_travel_themes, replaced.prefer_travel_themes);
}

#[tokio::test]
async fn test_grant_role_and_delete_by_email() {
    let db = setup_db().await;
    let services = services(&db);
    let user = seed_user(&services, "a@withaeng.com").await;

    let granted = services.users.grant_user_role(user.id).await.unwrap();
    assert_eq!(granted.role, UserRole::User);

    services.users.delete_by_email("a@withaeng.com").await.unwrap();
    assert!(matches!(
        services.users.get_user(user.id).await,
        Err(AppError::NotFound)
    ));
}
