use crate::{
	db::DbPool,
	error::AppError,
	models::{
		Account, NewAccount, NewParticipant, NewStorage, NewUser, Participant, Storage, User,
	},
	schema::{participants, storages, users},
};
use diesel::{
	prelude::*,
	r2d2::{ConnectionManager, PooledConnection},
	result::{DatabaseErrorKind, Error as DieselError},
};

/// Entity store for users, participants and storages.
///
/// Every write is atomic. Unique fields (username, participant name, storage
/// owner) surface as [`AppError::DuplicateKey`], missing ids as
/// [`AppError::NotFound`].
#[cfg_attr(test, mockall::automock)]
pub trait Store: Send + Sync {
	fn get_user(&self, id: i32) -> Result<User, AppError>;
	fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
	/// Creates the user together with its seeded participant and storage, or nothing at all.
	fn register_account(&self, account: &NewAccount) -> Result<Account, AppError>;
	fn set_admin(&self, username: &str, is_admin: bool) -> Result<User, AppError>;

	fn list_participants(&self) -> Result<Vec<Participant>, AppError>;
	fn get_participant(&self, id: i32) -> Result<Participant, AppError>;
	fn create_participant(&self, participant: &NewParticipant) -> Result<Participant, AppError>;
	fn update_participant(&self, participant: &Participant) -> Result<Participant, AppError>;
	/// Removes the participant and clears any user reference to it.
	fn delete_participant(&self, id: i32) -> Result<(), AppError>;

	fn list_storages(&self) -> Result<Vec<Storage>, AppError>;
	fn get_storage(&self, id: i32) -> Result<Storage, AppError>;
	fn create_storage(&self, storage: &NewStorage) -> Result<Storage, AppError>;
	fn update_storage(&self, storage: &Storage) -> Result<Storage, AppError>;
	/// Removes the storage and clears any user reference to it.
	fn delete_storage(&self, id: i32) -> Result<(), AppError>;
}

type PgPooledConnection = PooledConnection<ConnectionManager<PgConnection>>;

pub struct PgStore {
	pool: DbPool,
}

impl PgStore {
	pub fn new(pool: DbPool) -> Self {
		Self { pool }
	}

	fn conn(&self) -> Result<PgPooledConnection, AppError> {
		self.pool.get().map_err(|e| {
			log::error!("Database connection error: {:?}", e);
			AppError::Pool(e)
		})
	}
}

fn map_write_error(e: DieselError, entity: &'static str, key: &str) -> AppError {
	match e {
		DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) =>
			AppError::duplicate(entity, key),
		DieselError::NotFound => AppError::not_found(entity, key),
		other => AppError::Database(other),
	}
}

fn map_read_error(e: DieselError, entity: &'static str, id: i32) -> AppError {
	match e {
		DieselError::NotFound => AppError::not_found(entity, id),
		other => AppError::Database(other),
	}
}

impl Store for PgStore {
	fn get_user(&self, id: i32) -> Result<User, AppError> {
		let mut conn = self.conn()?;
		users::table
			.find(id)
			.select(User::as_select())
			.first(&mut conn)
			.map_err(|e| map_read_error(e, "user", id))
	}

	fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
		let mut conn = self.conn()?;
		let user = users::table
			.filter(users::username.eq(username))
			.select(User::as_select())
			.first(&mut conn)
			.optional()?;
		Ok(user)
	}

	fn register_account(&self, account: &NewAccount) -> Result<Account, AppError> {
		let mut conn = self.conn()?;
		conn.transaction::<_, AppError, _>(|conn| {
			let taken = users::table
				.filter(users::username.eq(&account.username))
				.select(users::id)
				.first::<i32>(conn)
				.optional()?;
			if taken.is_some() {
				return Err(AppError::duplicate("user", account.username.as_str()));
			}

			let user = diesel::insert_into(users::table)
				.values(&NewUser {
					username: &account.username,
					password_hash: &account.password_hash,
					is_admin: false,
				})
				.returning(User::as_returning())
				.get_result(conn)
				.map_err(|e| map_write_error(e, "user", &account.username))?;

			let participant = diesel::insert_into(participants::table)
				.values(&account.participant)
				.returning(Participant::as_returning())
				.get_result(conn)
				.map_err(|e| map_write_error(e, "participant", &account.participant.name))?;

			let storage = diesel::insert_into(storages::table)
				.values(&account.storage)
				.returning(Storage::as_returning())
				.get_result(conn)
				.map_err(|e| map_write_error(e, "storage", &account.storage.owner_name))?;

			let user = diesel::update(users::table.find(user.id))
				.set((
					users::participant_id.eq(Some(participant.id)),
					users::storage_id.eq(Some(storage.id)),
				))
				.returning(User::as_returning())
				.get_result(conn)?;

			Ok(Account { user, participant, storage })
		})
	}

	fn set_admin(&self, username: &str, is_admin: bool) -> Result<User, AppError> {
		let mut conn = self.conn()?;
		diesel::update(users::table.filter(users::username.eq(username)))
			.set(users::is_admin.eq(is_admin))
			.returning(User::as_returning())
			.get_result(&mut conn)
			.map_err(|e| map_write_error(e, "user", username))
	}

	fn list_participants(&self) -> Result<Vec<Participant>, AppError> {
		let mut conn = self.conn()?;
		let rows = participants::table
			.order(participants::id.asc())
			.select(Participant::as_select())
			.load(&mut conn)?;
		Ok(rows)
	}

	fn get_participant(&self, id: i32) -> Result<Participant, AppError> {
		let mut conn = self.conn()?;
		participants::table
			.find(id)
			.select(Participant::as_select())
			.first(&mut conn)
			.map_err(|e| map_read_error(e, "participant", id))
	}

	fn create_participant(&self, participant: &NewParticipant) -> Result<Participant, AppError> {
		let mut conn = self.conn()?;
		conn.transaction::<_, AppError, _>(|conn| {
			diesel::insert_into(participants::table)
				.values(participant)
				.returning(Participant::as_returning())
				.get_result(conn)
				.map_err(|e| map_write_error(e, "participant", &participant.name))
		})
	}

	fn update_participant(&self, participant: &Participant) -> Result<Participant, AppError> {
		let mut conn = self.conn()?;
		conn.transaction::<_, AppError, _>(|conn| {
			diesel::update(participants::table.find(participant.id))
				.set(participant)
				.returning(Participant::as_returning())
				.get_result(conn)
				.map_err(|e| match e {
					DieselError::NotFound => AppError::not_found("participant", participant.id),
					other => map_write_error(other, "participant", &participant.name),
				})
		})
	}

	fn delete_participant(&self, id: i32) -> Result<(), AppError> {
		let mut conn = self.conn()?;
		conn.transaction::<_, AppError, _>(|conn| {
			diesel::update(users::table.filter(users::participant_id.eq(Some(id))))
				.set(users::participant_id.eq(None::<i32>))
				.execute(conn)?;
			let deleted = diesel::delete(participants::table.find(id)).execute(conn)?;
			if deleted == 0 {
				return Err(AppError::not_found("participant", id));
			}
			Ok(())
		})
	}

	fn list_storages(&self) -> Result<Vec<Storage>, AppError> {
		let mut conn = self.conn()?;
		let rows = storages::table
			.order(storages::id.asc())
			.select(Storage::as_select())
			.load(&mut conn)?;
		Ok(rows)
	}

	fn get_storage(&self, id: i32) -> Result<Storage, AppError> {
		let mut conn = self.conn()?;
		storages::table
			.find(id)
			.select(Storage::as_select())
			.first(&mut conn)
			.map_err(|e| map_read_error(e, "storage", id))
	}

	fn create_storage(&self, storage: &NewStorage) -> Result<Storage, AppError> {
		let mut conn = self.conn()?;
		conn.transaction::<_, AppError, _>(|conn| {
			diesel::insert_into(storages::table)
				.values(storage)
				.returning(Storage::as_returning())
				.get_result(conn)
				.map_err(|e| map_write_error(e, "storage", &storage.owner_name))
		})
	}

	fn update_storage(&self, storage: &Storage) -> Result<Storage, AppError> {
		let mut conn = self.conn()?;
		conn.transaction::<_, AppError, _>(|conn| {
			diesel::update(storages::table.find(storage.id))
				.set(storage)
				.returning(Storage::as_returning())
				.get_result(conn)
				.map_err(|e| match e {
					DieselError::NotFound => AppError::not_found("storage", storage.id),
					other => map_write_error(other, "storage", &storage.owner_name),
				})
		})
	}

	fn delete_storage(&self, id: i32) -> Result<(), AppError> {
		let mut conn = self.conn()?;
		conn.transaction::<_, AppError, _>(|conn| {
			diesel::update(users::table.filter(users::storage_id.eq(Some(id))))
				.set(users::storage_id.eq(None::<i32>))
				.execute(conn)?;
			let deleted = diesel::delete(storages::table.find(id)).execute(conn)?;
			if deleted == 0 {
				return Err(AppError::not_found("storage", id));
			}
			Ok(())
		})
	}
}
