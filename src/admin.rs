//! Participant and storage management. Every operation checks the stored admin
//! flag of the caller before doing anything else.

use crate::{
	error::AppError,
	midware::session::AuthContext,
	models::{Participant, ParticipantForm, Storage, StorageForm, User},
	repo::Store,
	rules::CapacityRule,
};

/// Loads the caller and fails with `Forbidden` unless it is currently an admin.
/// A user deleted since login is treated the same way.
pub fn ensure_admin(store: &dyn Store, ctx: &AuthContext) -> Result<User, AppError> {
	let user = match store.get_user(ctx.user_id) {
		Ok(user) => user,
		Err(AppError::NotFound { .. }) => {
			log::warn!("Session of unknown user {} attempted an admin operation", ctx.user_id);
			return Err(AppError::Forbidden);
		},
		Err(e) => return Err(e),
	};
	if !user.is_admin {
		log::warn!("User {} attempted an admin operation", ctx.user_id);
		return Err(AppError::Forbidden);
	}
	Ok(user)
}

pub fn list_participants(store: &dyn Store, ctx: &AuthContext) -> Result<Vec<Participant>, AppError> {
	ensure_admin(store, ctx)?;
	store.list_participants()
}

pub fn get_participant(store: &dyn Store, ctx: &AuthContext, id: i32) -> Result<Participant, AppError> {
	ensure_admin(store, ctx)?;
	store.get_participant(id)
}

pub fn add_participant(
	store: &dyn Store,
	ctx: &AuthContext,
	form: &ParticipantForm,
) -> Result<Participant, AppError> {
	ensure_admin(store, ctx)?;
	let new_participant = form.parse()?;
	let participant = store.create_participant(&new_participant)?;
	log::info!("Participant {} ({}) added by {}", participant.id, participant.name, ctx.username);
	Ok(participant)
}

/// Replaces the name and all five balances of an existing participant.
pub fn edit_participant(
	store: &dyn Store,
	ctx: &AuthContext,
	id: i32,
	form: &ParticipantForm,
) -> Result<Participant, AppError> {
	ensure_admin(store, ctx)?;
	let existing = store.get_participant(id)?;
	let updated = form.parse()?.into_participant(existing.id);
	let participant = store.update_participant(&updated)?;
	log::info!("Participant {} edited by {}", participant.id, ctx.username);
	Ok(participant)
}

pub fn delete_participant(store: &dyn Store, ctx: &AuthContext, id: i32) -> Result<(), AppError> {
	ensure_admin(store, ctx)?;
	store.delete_participant(id)?;
	log::info!("Participant {} deleted by {}", id, ctx.username);
	Ok(())
}

pub fn list_storages(store: &dyn Store, ctx: &AuthContext) -> Result<Vec<Storage>, AppError> {
	ensure_admin(store, ctx)?;
	store.list_storages()
}

pub fn get_storage(store: &dyn Store, ctx: &AuthContext, id: i32) -> Result<Storage, AppError> {
	ensure_admin(store, ctx)?;
	store.get_storage(id)
}

pub fn add_storage(
	store: &dyn Store,
	rule: &CapacityRule,
	ctx: &AuthContext,
	form: &StorageForm,
) -> Result<Storage, AppError> {
	ensure_admin(store, ctx)?;
	let new_storage = form.parse()?;
	rule.check(&new_storage)?;
	let storage = store.create_storage(&new_storage)?;
	log::info!("Storage {} ({}) added by {}", storage.id, storage.owner_name, ctx.username);
	Ok(storage)
}

/// The stored row is left untouched when the new values break the capacity rule.
pub fn edit_storage(
	store: &dyn Store,
	rule: &CapacityRule,
	ctx: &AuthContext,
	id: i32,
	form: &StorageForm,
) -> Result<Storage, AppError> {
	ensure_admin(store, ctx)?;
	let existing = store.get_storage(id)?;
	let proposed = form.parse()?;
	rule.check(&proposed)?;
	let storage = store.update_storage(&proposed.into_storage(existing.id))?;
	log::info!("Storage {} edited by {}", storage.id, ctx.username);
	Ok(storage)
}

pub fn delete_storage(store: &dyn Store, ctx: &AuthContext, id: i32) -> Result<(), AppError> {
	ensure_admin(store, ctx)?;
	store.delete_storage(id)?;
	log::info!("Storage {} deleted by {}", id, ctx.username);
	Ok(())
}
