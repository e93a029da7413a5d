use crate::{
	config::AppSettings,
	error::AppError,
	midware::session::AuthContext,
	models::{
		Account, Dashboard, LoginForm, NewAccount, NewParticipant, NewStorage, RegisterForm, User,
	},
	repo::Store,
};
use bcrypt::{hash, verify};
use std::sync::OnceLock;
use validator::Validate;

const DUMMY_PASSWORD: &str = "stockbook-dummy-password";
static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// Hash checked on the unknown-username path, so both login failures cost one bcrypt verify.
/// Computed once with the cost of the first caller.
pub(crate) fn dummy_hash(cost: u32) -> &'static str {
	DUMMY_HASH.get_or_init(|| hash(DUMMY_PASSWORD, cost).unwrap_or_default())
}

/// Creates the user plus its seeded participant and storage as one unit.
pub fn register(
	store: &dyn Store,
	settings: &AppSettings,
	form: &RegisterForm,
) -> Result<Account, AppError> {
	let form = form.normalized();
	form.validate()?;

	if store.find_user_by_username(&form.username)?.is_some() {
		log::warn!("Registration rejected, username {} is taken", form.username);
		return Err(AppError::duplicate("user", form.username.as_str()));
	}

	let storage = NewStorage::seeded(&form.username);
	settings.capacity.check(&storage)?;

	let password_hash = hash(form.password.as_bytes(), settings.hash_cost)?;
	let account = NewAccount {
		username: form.username.clone(),
		password_hash,
		participant: NewParticipant::seeded(&form.username),
		storage,
	};

	let account = store.register_account(&account)?;
	log::info!(
		"Registered user {} (participant {}, storage {})",
		account.user.id,
		account.participant.id,
		account.storage.id
	);
	Ok(account)
}

/// Checks the credentials. Unknown usernames and wrong passwords fail alike.
pub fn login(store: &dyn Store, settings: &AppSettings, form: &LoginForm) -> Result<User, AppError> {
	form.validate().map_err(|_| AppError::InvalidCredentials)?;

	let user = match store.find_user_by_username(form.username.trim())? {
		Some(user) => user,
		None => {
			let _ = verify(form.password.as_bytes(), dummy_hash(settings.hash_cost));
			log::warn!("Login failed for unknown user");
			return Err(AppError::InvalidCredentials);
		},
	};

	if !verify(form.password.as_bytes(), &user.password_hash)? {
		log::warn!("Login failed for user {}", user.id);
		return Err(AppError::InvalidCredentials);
	}

	log::info!("Login successful for user {}", user.id);
	Ok(user)
}

pub fn dashboard(store: &dyn Store, ctx: &AuthContext) -> Result<Dashboard, AppError> {
	let user = store.get_user(ctx.user_id)?;
	let participant = user.participant_id.map(|id| store.get_participant(id)).transpose()?;
	let storage = user.storage_id.map(|id| store.get_storage(id)).transpose()?;
	Ok(Dashboard { user, participant, storage })
}
