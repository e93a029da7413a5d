use anyhow::{anyhow, Context};
use diesel::{
	prelude::*,
	r2d2::{self, ConnectionManager},
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub fn get_db_pool(database_url: &str) -> anyhow::Result<DbPool> {
	let manager = ConnectionManager::<PgConnection>::new(database_url);
	r2d2::Pool::builder().build(manager).context("failed to create database pool")
}

/// Applies any migrations the database has not seen yet.
pub fn init(pool: &DbPool) -> anyhow::Result<()> {
	let mut conn = pool.get().context("can not get a database connection")?;
	let applied = conn
		.run_pending_migrations(MIGRATIONS)
		.map_err(|e| anyhow!("failed to run migrations: {}", e))?;
	for version in applied {
		log::info!("Applied migration {}", version);
	}
	Ok(())
}
