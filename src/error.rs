use crate::{constants::MESSAGE_INTERNAL, models::ApiResponse};
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
	#[error("{entity} `{key}` already exists")]
	DuplicateKey { entity: &'static str, key: String },

	#[error("{entity} {key} not found")]
	NotFound { entity: &'static str, key: String },

	#[error("admin privileges required")]
	Forbidden,

	#[error("login required")]
	Unauthenticated,

	#[error(
		"capacity {current_capacity} exceeds the limit of {limit} ({slot_count} slots of {per_slot})"
	)]
	CapacityExceeded { current_capacity: i32, slot_count: i32, per_slot: i32, limit: i64 },

	#[error("Invalid username or password.")]
	InvalidCredentials,

	#[error("invalid {field}: {reason}")]
	InvalidInput { field: &'static str, reason: String },

	#[error("{0}")]
	Validation(#[from] validator::ValidationErrors),

	#[error("database error: {0}")]
	Database(#[from] diesel::result::Error),

	#[error("connection pool error: {0}")]
	Pool(#[from] r2d2::Error),

	#[error("password hashing failed: {0}")]
	Hashing(#[from] bcrypt::BcryptError),

	#[error("session token error: {0}")]
	Session(#[from] jsonwebtoken::errors::Error),

	#[error("blocking task failed: {0}")]
	Blocking(#[from] actix_web::error::BlockingError),
}

impl AppError {
	pub fn not_found(entity: &'static str, key: impl std::fmt::Display) -> Self {
		AppError::NotFound { entity, key: key.to_string() }
	}

	pub fn duplicate(entity: &'static str, key: impl Into<String>) -> Self {
		AppError::DuplicateKey { entity, key: key.into() }
	}

	pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
		AppError::InvalidInput { field, reason: reason.into() }
	}

	fn is_internal(&self) -> bool {
		matches!(
			self,
			AppError::Database(_) |
				AppError::Pool(_) |
				AppError::Hashing(_) |
				AppError::Session(_) |
				AppError::Blocking(_)
		)
	}
}

impl ResponseError for AppError {
	fn status_code(&self) -> StatusCode {
		match self {
			AppError::DuplicateKey { .. } => StatusCode::CONFLICT,
			AppError::NotFound { .. } => StatusCode::NOT_FOUND,
			AppError::Forbidden => StatusCode::FORBIDDEN,
			AppError::Unauthenticated | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
			AppError::CapacityExceeded { .. } => StatusCode::UNPROCESSABLE_ENTITY,
			AppError::InvalidInput { .. } | AppError::Validation(_) => StatusCode::BAD_REQUEST,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn error_response(&self) -> HttpResponse {
		let message = if self.is_internal() {
			log::error!("Request failed: {}", self);
			MESSAGE_INTERNAL.to_string()
		} else {
			log::warn!("Request rejected: {}", self);
			self.to_string()
		};
		HttpResponse::build(self.status_code()).json(ApiResponse::<()>::error(message))
	}
}
