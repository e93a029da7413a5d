mod accounts;
mod admin;
mod admin_routes;
mod auth_routes;
mod config;
mod constants;
mod db;
mod error;
mod handler;
mod midware;
mod models;
mod repo;
mod rules;
mod schema;
#[cfg(test)]
mod tests;
use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpServer};
use clap::Parser;
use config::{Cli, Command, Config};
use dotenv::dotenv;
use env_logger::Env;
use midware::session::RequireSession;
use repo::{PgStore, Store};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
	dotenv().ok();
	env_logger::init_from_env(Env::default().default_filter_or("info"));
	let cli = Cli::parse();

	let pool = db::get_db_pool(&cli.config.database_url)?;
	db::init(&pool)?;
	let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));

	match cli.command.unwrap_or(Command::Serve) {
		Command::Serve => serve(&cli.config, store).await?,
		Command::GrantAdmin { username } => {
			let user = store.set_admin(&username, true)?;
			log::info!("User {} ({}) is now an admin", user.id, user.username);
		},
		Command::RevokeAdmin { username } => {
			let user = store.set_admin(&username, false)?;
			log::info!("User {} ({}) is no longer an admin", user.id, user.username);
		},
	}
	Ok(())
}

async fn serve(config: &Config, store: Arc<dyn Store>) -> std::io::Result<()> {
	let settings = config.settings();
	let keys = config.session_keys();
	let origins = config.cors_origins.clone();
	log::info!(
		"Listening on: {} (max capacity per slot: {})..",
		config.bind,
		settings.capacity.max_per_slot()
	);

	HttpServer::new(move || {
		let cors = origins.iter().fold(
			Cors::default()
				.allowed_methods(vec!["GET", "POST"])
				.allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
				.supports_credentials()
				.max_age(3600),
			|cors, origin| cors.allowed_origin(origin),
		);

		App::new()
			.app_data(web::Data::from(store.clone()))
			.app_data(web::Data::new(settings))
			.app_data(web::Data::new(keys.clone()))
			.wrap(RequireSession::new(keys.clone()))
			.wrap(cors)
			.wrap(actix_web::middleware::Logger::default())
			.configure(auth_routes::init)
			.configure(admin_routes::init)
	})
	.bind(&config.bind)?
	.run()
	.await
}
