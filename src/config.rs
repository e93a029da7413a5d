use crate::{
	constants::{DEFAULT_MAX_CAPACITY_PER_SLOT, ONE_WEEK},
	midware::session::SessionKeys,
	rules::CapacityRule,
};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "stockbook", version, about = "Participant balances and storage inventory")]
pub struct Cli {
	#[command(flatten)]
	pub config: Config,

	#[command(subcommand)]
	pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
	/// Run the HTTP server (default)
	Serve,
	/// Give an existing user the admin flag
	GrantAdmin { username: String },
	/// Remove the admin flag from a user
	RevokeAdmin { username: String },
}

#[derive(clap::Args, Debug, Clone)]
pub struct Config {
	/// Address the HTTP server listens on
	#[arg(long, env = "SOCKET_URL", default_value = "127.0.0.1:8080")]
	pub bind: String,

	/// Origins allowed to call the API with credentials
	#[arg(long = "cors-origin", env = "CORS_ORIGINS", value_delimiter = ',')]
	pub cors_origins: Vec<String>,

	#[arg(long, env = "DATABASE_URL")]
	pub database_url: String,

	/// Secret used to sign session cookies
	#[arg(long, env = "SESSION_SECRET", hide_env_values = true)]
	pub session_secret: String,

	#[arg(long, env = "SESSION_TTL_SECS", default_value_t = ONE_WEEK)]
	pub session_ttl_secs: u64,

	#[arg(
		long,
		env = "MAX_CAPACITY_PER_SLOT",
		default_value_t = DEFAULT_MAX_CAPACITY_PER_SLOT,
		value_parser = clap::value_parser!(i32).range(1..)
	)]
	pub max_capacity_per_slot: i32,

	#[arg(
		long,
		env = "BCRYPT_COST",
		default_value_t = bcrypt::DEFAULT_COST,
		value_parser = clap::value_parser!(u32).range(4..=31)
	)]
	pub bcrypt_cost: u32,
}

impl Config {
	pub fn settings(&self) -> AppSettings {
		AppSettings {
			capacity: CapacityRule::new(self.max_capacity_per_slot),
			hash_cost: self.bcrypt_cost,
		}
	}

	pub fn session_keys(&self) -> SessionKeys {
		SessionKeys::new(&self.session_secret, self.session_ttl_secs)
	}
}

/// Runtime rules shared by all handlers.
#[derive(Debug, Clone, Copy)]
pub struct AppSettings {
	pub capacity: CapacityRule,
	pub hash_cost: u32,
}
