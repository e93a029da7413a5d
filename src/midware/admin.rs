use crate::{
	admin::ensure_admin,
	error::AppError,
	midware::session::{AuthContext, Claims},
	repo::Store,
};
use actix_service::forward_ready;
use actix_web::{
	body::EitherBody,
	dev::{Service, ServiceRequest, ServiceResponse, Transform},
	web, Error as AxError, HttpMessage, ResponseError,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use std::rc::Rc;

/// Rejects non-admin callers with 403 before any path or body extraction runs.
///
/// Must sit inside `RequireSession`, which puts the session claims into the request.
pub struct RequireAdmin;

impl<S, B> Transform<S, ServiceRequest> for RequireAdmin
where
	S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = AxError> + 'static,
	S::Future: 'static,
	B: 'static,
{
	type Response = ServiceResponse<EitherBody<B>>;
	type Error = AxError;
	type InitError = ();
	type Transform = RequireAdminMiddleware<S>;
	type Future = Ready<Result<Self::Transform, Self::InitError>>;

	fn new_transform(&self, service: S) -> Self::Future {
		ok(RequireAdminMiddleware { service: Rc::new(service) })
	}
}

pub struct RequireAdminMiddleware<S> {
	service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireAdminMiddleware<S>
where
	S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = AxError> + 'static,
	S::Future: 'static,
	B: 'static,
{
	type Response = ServiceResponse<EitherBody<B>>;
	type Error = AxError;
	type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

	forward_ready!(service);

	fn call(&self, req: ServiceRequest) -> Self::Future {
		let service = Rc::clone(&self.service);
		let store = req.app_data::<web::Data<dyn Store>>().cloned();
		let ctx = req
			.extensions()
			.get::<Claims>()
			.ok_or(AppError::Unauthenticated)
			.and_then(AuthContext::from_claims);

		Box::pin(async move {
			let checked = match (store, ctx) {
				(Some(store), Ok(ctx)) =>
					match web::block(move || ensure_admin(store.get_ref(), &ctx)).await {
						Ok(result) => result.map(|_| ()),
						Err(e) => Err(AppError::from(e)),
					},
				(None, _) => {
					log::error!("No store registered for admin routes");
					Err(AppError::Forbidden)
				},
				(_, Err(e)) => Err(e),
			};

			match checked {
				Ok(()) => service.call(req).await.map(ServiceResponse::map_into_left_body),
				Err(e) => {
					let (request, _pl) = req.into_parts();
					let response = e.error_response().map_into_right_body();
					Ok(ServiceResponse::new(request, response))
				},
			}
		})
	}
}
