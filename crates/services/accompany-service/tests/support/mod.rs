#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use accompany_service_lib::{
    AccompanyManager, AccompanyRepository, AccompanyService, AccompanyStore, ReplyManager,
    ReplyService, ReplyStore,
};
use domain::{AccompanyDraft, Continent, Destination, Gender, NewUser};
use migration::Migrator;
use user_service_lib::{UserRepository, UserStore};

pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub struct Services {
    pub posts: Arc<dyn AccompanyService>,
    pub replies: Arc<dyn ReplyService>,
    pub post_store: Arc<dyn AccompanyRepository>,
}

pub fn services(db: &DatabaseConnection) -> Services {
    let post_store: Arc<dyn AccompanyRepository> = Arc::new(AccompanyStore::new(db.clone()));
    let reply_store = Arc::new(ReplyStore::new(db.clone()));

    Services {
        posts: Arc::new(AccompanyManager::new(post_store.clone())),
        replies: Arc::new(ReplyManager::new(reply_store, post_store.clone())),
        post_store,
    }
}

/// Insert an account so posts and replies have a valid author
pub async fn seed_user(db: &DatabaseConnection, email: &str) -> Uuid {
    UserStore::new(db.clone())
        .create(NewUser {
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            nickname: "traveler".to_string(),
            birth: NaiveDate::from_ymd_opt(1992, 3, 14).unwrap(),
            gender: Gender::Male,
        })
        .await
        .unwrap()
        .id
}

pub fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).unwrap()
}

pub fn draft(title: &str, start: NaiveDate, end: NaiveDate) -> AccompanyDraft {
    AccompanyDraft {
        title: title.to_string(),
        content: "Looking for travel mates".to_string(),
        destination: Destination {
            continent: Continent::Europe,
            country: Some("Spain".to_string()),
            city: Some("Seville".to_string()),
        },
        start_trip_date: start,
        end_trip_date: end,
        banner_image_url: None,
        headcount: 2,
        tags: vec!["tapas".to_string(), "flamenco".to_string()],
    }
}
