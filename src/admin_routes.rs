use crate::{
	handler::{ParticipantHandler, StorageHandler},
	midware::admin::RequireAdmin,
};
use actix_web::web;

pub fn init(cfg: &mut web::ServiceConfig) {
	cfg.service(
		web::scope("/participants")
			.wrap(RequireAdmin)
			.route("", web::get().to(ParticipantHandler::list_handler))
			.route("", web::post().to(ParticipantHandler::list_handler))
			.route("/add", web::get().to(ParticipantHandler::add_form_handler))
			.route("/add", web::post().to(ParticipantHandler::add_handler))
			.route("/edit/{id}", web::get().to(ParticipantHandler::edit_form_handler))
			.route("/edit/{id}", web::post().to(ParticipantHandler::edit_handler))
			.route("/delete/{id}", web::get().to(ParticipantHandler::delete_handler))
			.route("/delete/{id}", web::post().to(ParticipantHandler::delete_handler)),
	)
	.service(
		web::scope("/storages")
			.wrap(RequireAdmin)
			.route("", web::get().to(StorageHandler::list_handler))
			.route("/add", web::get().to(StorageHandler::add_form_handler))
			.route("/add", web::post().to(StorageHandler::add_handler))
			.route("/edit/{id}", web::get().to(StorageHandler::edit_form_handler))
			.route("/edit/{id}", web::post().to(StorageHandler::edit_handler))
			.route("/delete/{id}", web::get().to(StorageHandler::delete_handler))
			.route("/delete/{id}", web::post().to(StorageHandler::delete_handler)),
	);
}
