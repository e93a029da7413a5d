//! `PgStore` against a live PostgreSQL. Run with `cargo test -- --ignored` and
//! `DATABASE_URL` set. Every test works inside a transaction that is never
//! committed, so the database is left as it was.

use crate::{
	db,
	error::AppError,
	models::{NewAccount, NewParticipant, NewStorage},
	repo::{PgStore, Store},
};
use diesel::{
	r2d2::{ConnectionManager, Pool, TestCustomizer},
	PgConnection,
};
use dotenv::dotenv;

fn test_store() -> PgStore {
	dotenv().ok();
	let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
	let pool = Pool::builder()
		.max_size(1)
		.connection_customizer(Box::new(TestCustomizer))
		.build(ConnectionManager::<PgConnection>::new(database_url))
		.expect("failed to create test pool");
	db::init(&pool).expect("failed to run migrations");
	PgStore::new(pool)
}

fn new_account(username: &str) -> NewAccount {
	NewAccount {
		username: username.to_string(),
		password_hash: "not-a-real-hash".to_string(),
		participant: NewParticipant::seeded(username),
		storage: NewStorage::seeded(username),
	}
}

#[test]
#[ignore = "requires DATABASE_URL"]
fn register_account_links_seeded_rows() {
	let store = test_store();
	let account = store.register_account(&new_account("pg_alice")).unwrap();

	assert_eq!(account.user.participant_id, Some(account.participant.id));
	assert_eq!(account.user.storage_id, Some(account.storage.id));
	assert_eq!(store.find_user_by_username("pg_alice").unwrap(), Some(account.user.clone()));
	assert_eq!(store.get_storage(account.storage.id).unwrap(), account.storage);

	let again = store.register_account(&new_account("pg_alice"));
	assert!(matches!(again, Err(AppError::DuplicateKey { entity: "user", .. })));
}

#[test]
#[ignore = "requires DATABASE_URL"]
fn register_account_rolls_back_on_participant_collision() {
	let store = test_store();
	store.create_participant(&NewParticipant::seeded("pg_bob")).unwrap();
	let participants = store.list_participants().unwrap().len();
	let storages = store.list_storages().unwrap().len();

	let result = store.register_account(&new_account("pg_bob"));
	assert!(matches!(result, Err(AppError::DuplicateKey { entity: "participant", .. })));

	assert_eq!(store.find_user_by_username("pg_bob").unwrap(), None);
	assert_eq!(store.list_participants().unwrap().len(), participants);
	assert_eq!(store.list_storages().unwrap().len(), storages);
}

#[test]
#[ignore = "requires DATABASE_URL"]
fn register_account_rolls_back_on_storage_collision() {
	let store = test_store();
	store.create_storage(&NewStorage::seeded("pg_carol")).unwrap();

	let result = store.register_account(&new_account("pg_carol"));
	assert!(matches!(result, Err(AppError::DuplicateKey { entity: "storage", .. })));

	assert_eq!(store.find_user_by_username("pg_carol").unwrap(), None);
	assert!(store.list_participants().unwrap().iter().all(|p| p.name != "pg_carol"));
}

#[test]
#[ignore = "requires DATABASE_URL"]
fn unique_violation_on_update_is_duplicate_key() {
	let store = test_store();
	store.create_storage(&NewStorage::seeded("pg_first")).unwrap();
	let second = store.create_storage(&NewStorage::seeded("pg_second")).unwrap();

	let mut renamed = second.clone();
	renamed.owner_name = "pg_first".to_string();
	let result = store.update_storage(&renamed);
	assert!(matches!(result, Err(AppError::DuplicateKey { entity: "storage", .. })));
	assert_eq!(store.get_storage(second.id).unwrap(), second);

	store.create_participant(&NewParticipant::seeded("pg_p1")).unwrap();
	let p2 = store.create_participant(&NewParticipant::seeded("pg_p2")).unwrap();
	let mut renamed = p2.clone();
	renamed.name = "pg_p1".to_string();
	let result = store.update_participant(&renamed);
	assert!(matches!(result, Err(AppError::DuplicateKey { entity: "participant", .. })));

	let created = store.create_participant(&NewParticipant::seeded("pg_p1"));
	assert!(matches!(created, Err(AppError::DuplicateKey { entity: "participant", .. })));
}

#[test]
#[ignore = "requires DATABASE_URL"]
fn update_of_missing_row_is_not_found() {
	let store = test_store();
	let ghost = NewStorage::seeded("pg_ghost").into_storage(i32::MAX);
	assert!(matches!(store.update_storage(&ghost), Err(AppError::NotFound { .. })));
	assert!(matches!(store.get_participant(i32::MAX), Err(AppError::NotFound { .. })));
}

#[test]
#[ignore = "requires DATABASE_URL"]
fn deletes_clear_user_references() {
	let store = test_store();
	let account = store.register_account(&new_account("pg_dave")).unwrap();

	store.delete_participant(account.participant.id).unwrap();
	let user = store.get_user(account.user.id).unwrap();
	assert_eq!(user.participant_id, None);
	assert_eq!(user.storage_id, Some(account.storage.id));

	store.delete_storage(account.storage.id).unwrap();
	let user = store.get_user(account.user.id).unwrap();
	assert_eq!(user.storage_id, None);

	assert!(matches!(
		store.delete_participant(account.participant.id),
		Err(AppError::NotFound { .. })
	));
	assert!(matches!(store.delete_storage(account.storage.id), Err(AppError::NotFound { .. })));
}

#[test]
#[ignore = "requires DATABASE_URL"]
fn set_admin_flips_the_stored_flag() {
	let store = test_store();
	let account = store.register_account(&new_account("pg_erin")).unwrap();

	assert!(store.set_admin("pg_erin", true).unwrap().is_admin);
	assert!(store.get_user(account.user.id).unwrap().is_admin);
	assert!(!store.set_admin("pg_erin", false).unwrap().is_admin);

	assert!(matches!(store.set_admin("pg_nobody", true), Err(AppError::NotFound { .. })));
}
