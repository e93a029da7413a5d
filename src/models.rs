use crate::{
	constants::{SEED_CAPACITY, SEED_FCD_BALANCE, SEED_SLOT_COUNT},
	error::AppError,
	rules::{parse_amount, parse_count},
	schema::*,
};
use bigdecimal::BigDecimal;
use diesel::{pg::Pg, prelude::*};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(Pg))]
pub struct User {
	pub id: i32,
	pub username: String,
	#[serde(skip_serializing, default)]
	pub password_hash: String,
	pub is_admin: bool,
	pub participant_id: Option<i32>,
	pub storage_id: Option<i32>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
	pub username: &'a str,
	pub password_hash: &'a str,
	pub is_admin: bool,
}

#[derive(
	Queryable, Selectable, Identifiable, AsChangeset, Serialize, Deserialize, Debug, Clone, PartialEq,
)]
#[diesel(table_name = participants)]
#[diesel(check_for_backend(Pg))]
pub struct Participant {
	pub id: i32,
	pub name: String,
	pub fcd: BigDecimal,
	pub usd: BigDecimal,
	pub sar: BigDecimal,
	pub rub: BigDecimal,
	pub yen: BigDecimal,
}

/// Column values of a participant as submitted by a form or seeded on registration.
#[derive(Insertable, Validate, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = participants)]
pub struct NewParticipant {
	#[validate(length(min = 1, max = 60))]
	pub name: String,
	pub fcd: BigDecimal,
	pub usd: BigDecimal,
	pub sar: BigDecimal,
	pub rub: BigDecimal,
	pub yen: BigDecimal,
}

impl NewParticipant {
	/// Balances a freshly registered participant starts with.
	pub fn seeded(name: &str) -> Self {
		Self {
			name: name.to_string(),
			fcd: BigDecimal::from(SEED_FCD_BALANCE),
			usd: BigDecimal::from(0),
			sar: BigDecimal::from(0),
			rub: BigDecimal::from(0),
			yen: BigDecimal::from(0),
		}
	}

	pub fn into_participant(self, id: i32) -> Participant {
		Participant {
			id,
			name: self.name,
			fcd: self.fcd,
			usd: self.usd,
			sar: self.sar,
			rub: self.rub,
			yen: self.yen,
		}
	}
}

#[derive(
	Queryable, Selectable, Identifiable, AsChangeset, Serialize, Deserialize, Debug, Clone, PartialEq,
)]
#[diesel(table_name = storages)]
#[diesel(check_for_backend(Pg))]
pub struct Storage {
	pub id: i32,
	pub owner_name: String,
	pub slot_count: i32,
	pub current_capacity: i32,
}

#[derive(Insertable, Validate, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = storages)]
pub struct NewStorage {
	#[validate(length(min = 1, max = 60))]
	pub owner_name: String,
	#[validate(range(min = 1))]
	pub slot_count: i32,
	#[validate(range(min = 0))]
	pub current_capacity: i32,
}

impl NewStorage {
	pub fn seeded(owner_name: &str) -> Self {
		Self {
			owner_name: owner_name.to_string(),
			slot_count: SEED_SLOT_COUNT,
			current_capacity: SEED_CAPACITY,
		}
	}

	pub fn into_storage(self, id: i32) -> Storage {
		Storage {
			id,
			owner_name: self.owner_name,
			slot_count: self.slot_count,
			current_capacity: self.current_capacity,
		}
	}
}

/// Everything registration writes in one transaction.
#[derive(Debug, Clone)]
pub struct NewAccount {
	pub username: String,
	pub password_hash: String,
	pub participant: NewParticipant,
	pub storage: NewStorage,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Account {
	pub user: User,
	pub participant: Participant,
	pub storage: Storage,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Dashboard {
	pub user: User,
	pub participant: Option<Participant>,
	pub storage: Option<Storage>,
}

#[derive(Serialize, Deserialize, Validate, Debug, Clone)]
pub struct RegisterForm {
	#[validate(length(min = 1, max = 60))]
	pub username: String,
	#[validate(length(min = 8))]
	pub password: String,
	#[validate(must_match(other = "password"))]
	pub confirm_password: String,
}

impl RegisterForm {
	/// Copy with the username trimmed, so a blank name fails the length check.
	pub fn normalized(&self) -> Self {
		Self { username: self.username.trim().to_string(), ..self.clone() }
	}
}

#[derive(Serialize, Deserialize, Validate, Debug, Clone)]
pub struct LoginForm {
	#[validate(length(min = 1))]
	pub username: String,
	#[validate(length(min = 1))]
	pub password: String,
}

/// Raw participant form. Balances arrive as text and are parsed strictly.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ParticipantForm {
	pub name: String,
	pub fcd: String,
	pub usd: String,
	pub sar: String,
	pub rub: String,
	pub yen: String,
}

impl ParticipantForm {
	pub fn parse(&self) -> Result<NewParticipant, AppError> {
		let participant = NewParticipant {
			name: self.name.trim().to_string(),
			fcd: parse_amount("fcd", &self.fcd)?,
			usd: parse_amount("usd", &self.usd)?,
			sar: parse_amount("sar", &self.sar)?,
			rub: parse_amount("rub", &self.rub)?,
			yen: parse_amount("yen", &self.yen)?,
		};
		participant.validate()?;
		Ok(participant)
	}
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct StorageForm {
	pub owner_name: String,
	pub slot_count: String,
	pub current_capacity: String,
}

impl StorageForm {
	pub fn parse(&self) -> Result<NewStorage, AppError> {
		let storage = NewStorage {
			owner_name: self.owner_name.trim().to_string(),
			slot_count: parse_count("slot_count", &self.slot_count)?,
			current_capacity: parse_count("current_capacity", &self.current_capacity)?,
		};
		storage.validate()?;
		Ok(storage)
	}
}

#[derive(Deserialize, Debug, Default)]
pub struct NextTarget {
	pub next: Option<String>,
}

/// Field layout of a form, returned by the GET side of form routes.
#[derive(Serialize, Deserialize, Debug)]
pub struct FormView {
	pub title: String,
	pub action: String,
	pub fields: Vec<String>,
}

impl FormView {
	pub fn new(title: &str, action: &str, fields: &[&str]) -> Self {
		Self {
			title: title.to_string(),
			action: action.to_string(),
			fields: fields.iter().map(|f| f.to_string()).collect(),
		}
	}
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResp {
	pub uid: i32,
	pub username: String,
	pub is_admin: bool,
	pub next: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiResponse<T> {
	pub status: String,
	pub data: Option<T>,
	pub message: Option<String>,
	pub error: Option<String>,
}

impl<T> ApiResponse<T> {
	pub fn success(data: T) -> Self {
		Self { status: "success".to_string(), data: Some(data), message: None, error: None }
	}

	pub fn error(error: impl Into<String>) -> Self {
		Self { status: "error".to_string(), data: None, message: None, error: Some(error.into()) }
	}

	pub fn message(message: impl Into<String>) -> Self {
		Self { status: "success".to_string(), data: None, message: Some(message.into()), error: None }
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}
}
