use crate::{
	admin,
	error::AppError,
	repo::{MockStore, Store},
	rules::CapacityRule,
	tests::{
		fixtures::TestFixtures,
		test_utils::{admin_ctx, stored_user, user_ctx, MemoryStore},
	},
};
use bigdecimal::BigDecimal;

#[test]
fn non_admin_is_forbidden_before_the_store_is_touched() {
	// Only the caller lookup is expected: any other store call would panic.
	let mut store = MockStore::new();
	store
		.expect_get_user()
		.times(10)
		.returning(|id| Ok(stored_user(id, "test_user", false)));
	let rule = CapacityRule::default();
	let ctx = user_ctx();
	let bad_participant = TestFixtures::participant("", "not a number");
	let bad_storage = TestFixtures::storage("A", 1, 1000);

	let results = [
		admin::list_participants(&store, &ctx).map(|_| ()),
		admin::get_participant(&store, &ctx, 1).map(|_| ()),
		admin::add_participant(&store, &ctx, &bad_participant).map(|_| ()),
		admin::edit_participant(&store, &ctx, 1, &bad_participant).map(|_| ()),
		admin::delete_participant(&store, &ctx, 1),
		admin::list_storages(&store, &ctx).map(|_| ()),
		admin::get_storage(&store, &ctx, 1).map(|_| ()),
		admin::add_storage(&store, &rule, &ctx, &bad_storage).map(|_| ()),
		admin::edit_storage(&store, &rule, &ctx, 1, &bad_storage).map(|_| ()),
		admin::delete_storage(&store, &ctx, 1),
	];
	for result in results {
		assert!(matches!(result, Err(AppError::Forbidden)));
	}
}

#[test]
fn revoked_admin_is_forbidden_at_once() {
	let store = MemoryStore::with_admin();
	let ctx = admin_ctx();
	assert!(admin::list_participants(&store, &ctx).is_ok());

	store.set_admin("admin", false).unwrap();
	assert!(matches!(admin::list_participants(&store, &ctx), Err(AppError::Forbidden)));
	assert!(matches!(
		admin::add_participant(&store, &ctx, &TestFixtures::participant("X", "1")),
		Err(AppError::Forbidden)
	));
	assert_eq!(store.participant_count(), 0);
}

#[test]
fn deleted_caller_is_forbidden() {
	let mut store = MockStore::new();
	store.expect_get_user().returning(|id| Err(AppError::not_found("user", id)));
	assert!(matches!(admin::list_storages(&store, &admin_ctx()), Err(AppError::Forbidden)));
}

#[test]
fn rejected_storage_never_reaches_the_store() {
	let mut store = MockStore::new();
	store.expect_get_user().returning(|id| Ok(stored_user(id, "admin", true)));
	store.expect_create_storage().never();
	let result = admin::add_storage(
		&store,
		&CapacityRule::default(),
		&admin_ctx(),
		&TestFixtures::storage("A", 2, 101),
	);
	assert!(matches!(result, Err(AppError::CapacityExceeded { .. })));
}

#[test]
fn storage_edit_over_capacity_keeps_stored_values() {
	let store = MemoryStore::with_admin();
	let rule = CapacityRule::default();
	let ctx = admin_ctx();

	let storage = admin::add_storage(&store, &rule, &ctx, &TestFixtures::storage("A", 2, 100)).unwrap();
	assert_eq!(storage.slot_count, 2);
	assert_eq!(storage.current_capacity, 100);

	let result = admin::edit_storage(&store, &rule, &ctx, storage.id, &TestFixtures::storage("B", 2, 101));
	assert!(matches!(result, Err(AppError::CapacityExceeded { .. })));

	let stored = store.get_storage(storage.id).unwrap();
	assert_eq!(stored, storage);
}

#[test]
fn storage_within_capacity_is_stored_exactly() {
	let store = MemoryStore::with_admin();
	let rule = CapacityRule::default();
	let ctx = admin_ctx();

	for (owner, slots, capacity) in [("s1", 1, 0), ("s2", 1, 50), ("s3", 3, 149), ("s4", 10, 500)] {
		let created =
			admin::add_storage(&store, &rule, &ctx, &TestFixtures::storage(owner, slots, capacity))
				.unwrap();
		assert_eq!(created.owner_name, owner);
		assert_eq!(created.slot_count, slots);
		assert_eq!(created.current_capacity, capacity);
	}

	let first = store.list_storages().unwrap()[0].clone();
	let edited =
		admin::edit_storage(&store, &rule, &ctx, first.id, &TestFixtures::storage("s1", 4, 200))
			.unwrap();
	assert_eq!(edited.id, first.id);
	assert_eq!(edited.slot_count, 4);
	assert_eq!(edited.current_capacity, 200);
	assert_eq!(store.get_storage(first.id).unwrap(), edited);
}

#[test]
fn storage_over_capacity_is_not_created() {
	let store = MemoryStore::with_admin();
	let result = admin::add_storage(
		&store,
		&CapacityRule::default(),
		&admin_ctx(),
		&TestFixtures::storage("A", 1, 51),
	);
	assert!(matches!(result, Err(AppError::CapacityExceeded { .. })));
	assert_eq!(store.storage_count(), 0);
}

#[test]
fn duplicate_participant_name_is_rejected() {
	let store = MemoryStore::with_admin();
	let ctx = admin_ctx();

	admin::add_participant(&store, &ctx, &TestFixtures::participant("X", "1")).unwrap();
	let second = admin::add_participant(&store, &ctx, &TestFixtures::participant("X", "2"));

	assert!(matches!(second, Err(AppError::DuplicateKey { entity: "participant", .. })));
	assert_eq!(store.participant_count(), 1);
	assert_eq!(store.list_participants().unwrap()[0].fcd, BigDecimal::from(1));
}

#[test]
fn participant_edit_replaces_every_balance() {
	let store = MemoryStore::with_admin();
	let ctx = admin_ctx();
	let created =
		admin::add_participant(&store, &ctx, &TestFixtures::participant("X", "10")).unwrap();

	let mut form = TestFixtures::participant("Y", "0");
	form.fcd = "5".to_string();
	form.yen = "-3.25".to_string();
	let edited = admin::edit_participant(&store, &ctx, created.id, &form).unwrap();

	assert_eq!(edited.id, created.id);
	assert_eq!(edited.name, "Y");
	assert_eq!(edited.fcd, BigDecimal::from(5));
	assert_eq!(edited.usd, BigDecimal::from(0));
	assert_eq!(edited.yen, "-3.25".parse::<BigDecimal>().unwrap());
	assert_eq!(store.get_participant(created.id).unwrap(), edited);
}

#[test]
fn participant_edit_with_bad_input_changes_nothing() {
	let store = MemoryStore::with_admin();
	let ctx = admin_ctx();
	let created =
		admin::add_participant(&store, &ctx, &TestFixtures::participant("X", "10")).unwrap();
	admin::add_participant(&store, &ctx, &TestFixtures::participant("Z", "10")).unwrap();

	let mut form = TestFixtures::participant("X", "20");
	form.rub = "2*3".to_string();
	assert!(admin::edit_participant(&store, &ctx, created.id, &form).is_err());

	let renamed = admin::edit_participant(&store, &ctx, created.id, &TestFixtures::participant("Z", "20"));
	assert!(matches!(renamed, Err(AppError::DuplicateKey { .. })));

	assert_eq!(store.get_participant(created.id).unwrap(), created);
}

#[test]
fn missing_ids_are_not_found() {
	let store = MemoryStore::with_admin();
	let rule = CapacityRule::default();
	let ctx = admin_ctx();

	assert!(matches!(admin::get_participant(&store, &ctx, 42), Err(AppError::NotFound { .. })));
	assert!(matches!(
		admin::edit_participant(&store, &ctx, 42, &TestFixtures::participant("X", "1")),
		Err(AppError::NotFound { .. })
	));
	assert!(matches!(admin::delete_participant(&store, &ctx, 42), Err(AppError::NotFound { .. })));
	assert!(matches!(
		admin::edit_storage(&store, &rule, &ctx, 42, &TestFixtures::storage("A", 1, 1)),
		Err(AppError::NotFound { .. })
	));
	assert!(matches!(admin::delete_storage(&store, &ctx, 42), Err(AppError::NotFound { .. })));
}

#[test]
fn delete_clears_user_references() {
	let store = MemoryStore::with_admin();
	let settings = crate::tests::test_utils::test_settings();
	let account = crate::accounts::register(
		&store,
		&settings,
		&TestFixtures::registration("erin"),
	)
	.unwrap();

	admin::delete_storage(&store, &admin_ctx(), account.storage.id).unwrap();
	let user = store.get_user(account.user.id).unwrap();
	assert_eq!(user.storage_id, None);
	assert_eq!(user.participant_id, Some(account.participant.id));
	assert_eq!(store.storage_count(), 0);
}
