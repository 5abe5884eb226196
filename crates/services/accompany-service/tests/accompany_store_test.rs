mod support;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use accompany_service_lib::repository::entities::accompany_history;
use common::{AppError, PaginationParams};
use domain::{AccompanyFilter, AccompanySort, AccompanyStatus};
use support::{date, draft, seed_user, services, setup_db};

async fn history_actions(db: &sea_orm::DatabaseConnection, id: uuid::Uuid) -> Vec<String> {
    accompany_history::Entity::find()
        .filter(accompany_history::Column::AccompanyId.eq(id))
        .order_by_asc(accompany_history::Column::CreatedAt)
        .all(db)
        .await
        .unwrap()
        .into_iter()
        .map(|h| h.action)
        .collect()
}

#[tokio::test]
async fn test_create_stores_post_tags_and_history() {
    let db = setup_db().await;
    let services = services(&db);
    let author = seed_user(&db, "author@withaeng.com").await;

    let mut input = draft("Seville week", date(5, 1), date(5, 8));
    input.tags = vec![" tapas ".to_string(), "tapas".to_string(), "flamenco".to_string()];
    let created = services.posts.create(author, input).await.unwrap();

    assert_eq!(created.status, AccompanyStatus::Recruiting);
    assert_eq!(created.tags, vec!["tapas".to_string(), "flamenco".to_string()]);

    let loaded = services.post_store.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(loaded.tags, created.tags);
    assert_eq!(loaded.destination.city.as_deref(), Some("Seville"));
    assert_eq!(history_actions(&db, created.id).await, vec!["CREATE".to_string()]);
}

#[tokio::test]
async fn test_update_replaces_tags_and_appends_history() {
    let db = setup_db().await;
    let services = services(&db);
    let author = seed_user(&db, "author@withaeng.com").await;
    let created = services
        .posts
        .create(author, draft("Seville week", date(5, 1), date(5, 8)))
        .await
        .unwrap();

    let mut changed = draft("Seville and Cordoba", date(5, 1), date(5, 10));
    changed.tags = vec!["mezquita".to_string()];
    let updated = services.posts.update(created.id, author, changed).await.unwrap();

    assert_eq!(updated.title, "Seville and Cordoba");
    let loaded = services.post_store.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(loaded.tags, vec!["mezquita".to_string()]);
    assert_eq!(loaded.end_trip_date, date(5, 10));
    assert_eq!(history_actions(&db, created.id).await.len(), 2);
}

#[tokio::test]
async fn test_update_by_other_user_is_denied() {
    let db = setup_db().await;
    let services = services(&db);
    let author = seed_user(&db, "author@withaeng.com").await;
    let stranger = seed_user(&db, "stranger@withaeng.com").await;
    let created = services
        .posts
        .create(author, draft("Seville week", date(5, 1), date(5, 8)))
        .await
        .unwrap();

    let result = services
        .posts
        .update(created.id, stranger, draft("Mine now", date(5, 1), date(5, 8)))
        .await;

    assert!(matches!(result, Err(AppError::AccessDenied)));
    assert_eq!(history_actions(&db, created.id).await.len(), 1);
}

#[tokio::test]
async fn test_close_then_delete_hides_post() {
    let db = setup_db().await;
    let services = services(&db);
    let author = seed_user(&db, "author@withaeng.com").await;
    let created = services
        .posts
        .create(author, draft("Seville week", date(5, 1), date(5, 8)))
        .await
        .unwrap();

    let closed = services.posts.close(created.id, author).await.unwrap();
    assert_eq!(closed.status, AccompanyStatus::Closed);

    services.posts.delete(created.id, author).await.unwrap();

    assert!(matches!(services.posts.detail(created.id).await, Err(AppError::NotFound)));
    let page = services
        .posts
        .list(AccompanyFilter::default(), PaginationParams::default())
        .await
        .unwrap();
    assert_eq!(page.meta.total, 0);
    assert_eq!(
        history_actions(&db, created.id).await,
        vec!["CREATE".to_string(), "UPDATE".to_string(), "DELETE".to_string()]
    );
}

#[tokio::test]
async fn test_detail_increments_view_count() {
    let db = setup_db().await;
    let services = services(&db);
    let author = seed_user(&db, "author@withaeng.com").await;
    let created = services
        .posts
        .create(author, draft("Seville week", date(5, 1), date(5, 8)))
        .await
        .unwrap();

    services.posts.detail(created.id).await.unwrap();
    let second = services.posts.detail(created.id).await.unwrap();

    assert_eq!(second.view_count, 2);
}

#[tokio::test]
async fn test_list_filters_by_overlapping_trip_window() {
    let db = setup_db().await;
    let services = services(&db);
    let author = seed_user(&db, "author@withaeng.com").await;
    services
        .posts
        .create(author, draft("May trip", date(5, 1), date(5, 8)))
        .await
        .unwrap();
    let june = services
        .posts
        .create(author, draft("June trip", date(6, 10), date(6, 20)))
        .await
        .unwrap();
    let straddling = services
        .posts
        .create(author, draft("Late May to June", date(5, 28), date(6, 3)))
        .await
        .unwrap();

    let filter = AccompanyFilter {
        from: Some(date(6, 1)),
        to: Some(date(6, 30)),
        sort: AccompanySort::Recent,
    };
    let page = services
        .posts
        .list(filter, PaginationParams::default())
        .await
        .unwrap();

    let mut ids: Vec<_> = page.items.iter().map(|p| p.id).collect();
    ids.sort();
    let mut expected = vec![june.id, straddling.id];
    expected.sort();
    assert_eq!(ids, expected);
    assert_eq!(page.meta.total, 2);
}

#[tokio::test]
async fn test_list_sorts_by_views_and_paginates() {
    let db = setup_db().await;
    let services = services(&db);
    let author = seed_user(&db, "author@withaeng.com").await;

    let mut ids = Vec::new();
    for views in 0..3 {
        let post = services
            .posts
            .create(author, draft(&format!("Trip {}", views), date(7, 1), date(7, 5)))
            .await
            .unwrap();
        for _ in 0..views {
            services.posts.detail(post.id).await.unwrap();
        }
        ids.push(post.id);
    }

    let filter = AccompanyFilter {
        sort: AccompanySort::Views,
        ..Default::default()
    };
    let first = services
        .posts
        .list(filter.clone(), PaginationParams::new(1, 2))
        .await
        .unwrap();
    let second = services
        .posts
        .list(filter, PaginationParams::new(2, 2))
        .await
        .unwrap();

    assert_eq!(first.items[0].id, ids[2]);
    assert_eq!(first.items[1].id, ids[1]);
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].id, ids[0]);
    assert_eq!(first.meta.total_pages, 2);
}

#[tokio::test]
async fn test_like_is_idempotent_per_user() {
    let db = setup_db().await;
    let services = services(&db);
    let author = seed_user(&db, "author@withaeng.com").await;
    let fan = seed_user(&db, "fan@withaeng.com").await;
    let created = services
        .posts
        .create(author, draft("Seville week", date(5, 1), date(5, 8)))
        .await
        .unwrap();

    assert!(services.post_store.add_like(created.id, fan).await.unwrap());
    assert!(!services.post_store.add_like(created.id, fan).await.unwrap());
    services.posts.like(created.id, author).await.unwrap();

    let liked = services.post_store.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(liked.like_count, 2);

    services.posts.unlike(created.id, fan).await.unwrap();
    services.posts.unlike(created.id, fan).await.unwrap();

    let unliked = services.post_store.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(unliked.like_count, 1);
}
