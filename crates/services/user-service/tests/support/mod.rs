#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use domain::{Gender, NewUser, User};
use migration::Migrator;
use user_service_lib::{
    UserManager, UserRepository, UserService, UserStore, VerificationManager, VerificationStore,
};

/// Fresh in-memory database with every migration applied
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub struct Services {
    pub users: Arc<dyn UserService>,
    pub verifications: VerificationManager,
    pub user_store: Arc<dyn UserRepository>,
}

pub fn services(db: &DatabaseConnection) -> Services {
    let user_store: Arc<dyn UserRepository> = Arc::new(UserStore::new(db.clone()));
    let verification_store = Arc::new(VerificationStore::new(db.clone()));

    Services {
        users: Arc::new(UserManager::new(user_store.clone())),
        verifications: VerificationManager::new(user_store.clone(), verification_store),
        user_store,
    }
}

pub fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password_hash: "$argon2id$stub".to_string(),
        nickname: "traveler".to_string(),
        birth: NaiveDate::from_ymd_opt(1994, 7, 12).unwrap(),
        gender: Gender::Female,
    }
}

pub async fn seed_user(services: &Services, email: &str) -> User {
    services.users.create_user(new_user(email)).await.unwrap()
}
