use crate::{
	accounts, admin,
	config::AppSettings,
	constants::{ADMIN_LANDING, MESSAGE_LOGGED_IN, MESSAGE_LOGGED_OUT, MESSAGE_REGISTERED, USER_LANDING},
	error::AppError,
	midware::session::{login_redirect, safe_next, AuthContext, SessionKeys},
	models::{
		ApiResponse, FormView, LoginForm, LoginResp, NextTarget, ParticipantForm, RegisterForm,
		StorageForm,
	},
	repo::Store,
};
use actix_web::{web, HttpResponse};

pub struct AuthHandler {}

impl AuthHandler {
	pub async fn register_form_handler() -> HttpResponse {
		HttpResponse::Ok().json(ApiResponse::success(FormView::new(
			"Register",
			"/register",
			&["username", "password", "confirm_password"],
		)))
	}

	pub async fn register_handler(
		store: web::Data<dyn Store>,
		settings: web::Data<AppSettings>,
		form: web::Form<RegisterForm>,
	) -> Result<HttpResponse, AppError> {
		let form = form.into_inner();
		let settings = *settings.get_ref();
		log::info!("Attempting registration for username: {}", form.username);

		let account =
			web::block(move || accounts::register(store.get_ref(), &settings, &form)).await??;

		Ok(HttpResponse::Created().json(ApiResponse::success(account).with_message(MESSAGE_REGISTERED)))
	}

	pub async fn login_form_handler(query: web::Query<NextTarget>) -> HttpResponse {
		let action = match safe_next(query.next.as_deref()) {
			Some(next) => login_redirect(&next),
			None => "/login".to_string(),
		};
		HttpResponse::Ok().json(ApiResponse::success(FormView::new(
			"Login",
			&action,
			&["username", "password"],
		)))
	}

	pub async fn login_handler(
		store: web::Data<dyn Store>,
		settings: web::Data<AppSettings>,
		keys: web::Data<SessionKeys>,
		query: web::Query<NextTarget>,
		form: web::Form<LoginForm>,
	) -> Result<HttpResponse, AppError> {
		let form = form.into_inner();
		let settings = *settings.get_ref();
		let user =
			web::block(move || accounts::login(store.get_ref(), &settings, &form)).await??;

		let token = keys.create_session(&user)?;
		let next = safe_next(query.next.as_deref()).unwrap_or_else(|| {
			let landing = if user.is_admin { ADMIN_LANDING } else { USER_LANDING };
			landing.to_string()
		});

		Ok(HttpResponse::Ok().cookie(keys.session_cookie(token)).json(
			ApiResponse::success(LoginResp {
				uid: user.id,
				username: user.username,
				is_admin: user.is_admin,
				next,
			})
			.with_message(MESSAGE_LOGGED_IN),
		))
	}

	pub async fn logout_handler(ctx: AuthContext) -> HttpResponse {
		log::info!("User {} logged out", ctx.user_id);
		HttpResponse::Ok()
			.cookie(SessionKeys::removal_cookie())
			.json(ApiResponse::<()>::message(MESSAGE_LOGGED_OUT))
	}

	pub async fn dashboard_handler(
		store: web::Data<dyn Store>,
		ctx: AuthContext,
	) -> Result<HttpResponse, AppError> {
		let dashboard = web::block(move || accounts::dashboard(store.get_ref(), &ctx)).await??;
		Ok(HttpResponse::Ok().json(ApiResponse::success(dashboard)))
	}
}

pub struct ParticipantHandler {}

impl ParticipantHandler {
	pub async fn list_handler(
		store: web::Data<dyn Store>,
		ctx: AuthContext,
	) -> Result<HttpResponse, AppError> {
		let participants =
			web::block(move || admin::list_participants(store.get_ref(), &ctx)).await??;
		Ok(HttpResponse::Ok().json(ApiResponse::success(participants)))
	}

	pub async fn add_form_handler(
		store: web::Data<dyn Store>,
		ctx: AuthContext,
	) -> Result<HttpResponse, AppError> {
		web::block(move || admin::ensure_admin(store.get_ref(), &ctx)).await??;
		Ok(HttpResponse::Ok().json(ApiResponse::success(FormView::new(
			"Add Participant",
			"/participants/add",
			&["name", "fcd", "usd", "sar", "rub", "yen"],
		))))
	}

	pub async fn add_handler(
		store: web::Data<dyn Store>,
		ctx: AuthContext,
		form: web::Form<ParticipantForm>,
	) -> Result<HttpResponse, AppError> {
		let form = form.into_inner();
		let participant =
			web::block(move || admin::add_participant(store.get_ref(), &ctx, &form)).await??;
		Ok(HttpResponse::Created().json(
			ApiResponse::success(participant)
				.with_message("You have successfully added a new participant."),
		))
	}

	pub async fn edit_form_handler(
		store: web::Data<dyn Store>,
		ctx: AuthContext,
		path: web::Path<i32>,
	) -> Result<HttpResponse, AppError> {
		let id = path.into_inner();
		let participant =
			web::block(move || admin::get_participant(store.get_ref(), &ctx, id)).await??;
		Ok(HttpResponse::Ok().json(ApiResponse::success(participant)))
	}

	pub async fn edit_handler(
		store: web::Data<dyn Store>,
		ctx: AuthContext,
		path: web::Path<i32>,
		form: web::Form<ParticipantForm>,
	) -> Result<HttpResponse, AppError> {
		let id = path.into_inner();
		let form = form.into_inner();
		let participant =
			web::block(move || admin::edit_participant(store.get_ref(), &ctx, id, &form)).await??;
		Ok(HttpResponse::Ok().json(
			ApiResponse::success(participant)
				.with_message("You have successfully edited the participant."),
		))
	}

	pub async fn delete_handler(
		store: web::Data<dyn Store>,
		ctx: AuthContext,
		path: web::Path<i32>,
	) -> Result<HttpResponse, AppError> {
		let id = path.into_inner();
		web::block(move || admin::delete_participant(store.get_ref(), &ctx, id)).await??;
		Ok(HttpResponse::Ok()
			.json(ApiResponse::<()>::message("You have successfully deleted the participant.")))
	}
}

pub struct StorageHandler {}

impl StorageHandler {
	pub async fn list_handler(
		store: web::Data<dyn Store>,
		ctx: AuthContext,
	) -> Result<HttpResponse, AppError> {
		let storages = web::block(move || admin::list_storages(store.get_ref(), &ctx)).await??;
		Ok(HttpResponse::Ok().json(ApiResponse::success(storages)))
	}

	pub async fn add_form_handler(
		store: web::Data<dyn Store>,
		ctx: AuthContext,
	) -> Result<HttpResponse, AppError> {
		web::block(move || admin::ensure_admin(store.get_ref(), &ctx)).await??;
		Ok(HttpResponse::Ok().json(ApiResponse::success(FormView::new(
			"Add Storage",
			"/storages/add",
			&["owner_name", "slot_count", "current_capacity"],
		))))
	}

	pub async fn add_handler(
		store: web::Data<dyn Store>,
		settings: web::Data<AppSettings>,
		ctx: AuthContext,
		form: web::Form<StorageForm>,
	) -> Result<HttpResponse, AppError> {
		let form = form.into_inner();
		let rule = settings.capacity;
		let storage =
			web::block(move || admin::add_storage(store.get_ref(), &rule, &ctx, &form)).await??;
		Ok(HttpResponse::Created().json(
			ApiResponse::success(storage).with_message("You have successfully added a new storage."),
		))
	}

	pub async fn edit_form_handler(
		store: web::Data<dyn Store>,
		ctx: AuthContext,
		path: web::Path<i32>,
	) -> Result<HttpResponse, AppError> {
		let id = path.into_inner();
		let storage = web::block(move || admin::get_storage(store.get_ref(), &ctx, id)).await??;
		Ok(HttpResponse::Ok().json(ApiResponse::success(storage)))
	}

	pub async fn edit_handler(
		store: web::Data<dyn Store>,
		settings: web::Data<AppSettings>,
		ctx: AuthContext,
		path: web::Path<i32>,
		form: web::Form<StorageForm>,
	) -> Result<HttpResponse, AppError> {
		let id = path.into_inner();
		let form = form.into_inner();
		let rule = settings.capacity;
		let storage =
			web::block(move || admin::edit_storage(store.get_ref(), &rule, &ctx, id, &form))
				.await??;
		Ok(HttpResponse::Ok().json(
			ApiResponse::success(storage).with_message("You have successfully edited the storage."),
		))
	}

	pub async fn delete_handler(
		store: web::Data<dyn Store>,
		ctx: AuthContext,
		path: web::Path<i32>,
	) -> Result<HttpResponse, AppError> {
		let id = path.into_inner();
		web::block(move || admin::delete_storage(store.get_ref(), &ctx, id)).await??;
		Ok(HttpResponse::Ok()
			.json(ApiResponse::<()>::message("You have successfully deleted the storage.")))
	}
}
