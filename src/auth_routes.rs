use crate::handler::AuthHandler;
use actix_web::web;

pub fn init(cfg: &mut web::ServiceConfig) {
	cfg
		// account routes
		.route("/register", web::get().to(AuthHandler::register_form_handler))
		.route("/register", web::post().to(AuthHandler::register_handler))
		.route("/login", web::get().to(AuthHandler::login_form_handler))
		.route("/login", web::post().to(AuthHandler::login_handler))
		.route("/logout", web::get().to(AuthHandler::logout_handler))
		.route("/dashboard", web::get().to(AuthHandler::dashboard_handler));
}
