use crate::{
	constants::{LOGIN_PATH, PUBLIC_ROUTES, SESSION_COOKIE},
	error::AppError,
	models::User,
};
use actix_service::forward_ready;
use actix_web::{
	body::EitherBody,
	cookie::{time::Duration, Cookie, SameSite},
	dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
	http::{header, Method},
	Error as AxError, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use chrono::Utc;
use futures::future::{ok, ready, LocalBoxFuture, Ready};
use jsonwebtoken::{decode, encode, errors::Error, DecodingKey, EncodingKey, Header, Validation};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
	pub iat: usize,
	pub exp: usize,
	pub sub: String,
	pub name: String,
}

/// Signs and verifies the session cookie.
#[derive(Clone)]
pub struct SessionKeys {
	secret: String,
	ttl_secs: u64,
}

impl SessionKeys {
	pub fn new(secret: &str, ttl_secs: u64) -> Self {
		Self { secret: secret.to_string(), ttl_secs }
	}

	pub fn create_session(&self, user: &User) -> Result<String, Error> {
		let now = Utc::now().timestamp() as usize;
		let claims = Claims {
			iat: now,
			exp: now + self.ttl_secs as usize,
			sub: user.id.to_string(),
			name: user.username.clone(),
		};
		debug!("Creating session for user {}", claims.sub);
		encode(&Header::default(), &claims, &EncodingKey::from_secret(self.secret.as_ref()))
	}

	pub fn verify_session(&self, token: &str) -> Result<Claims, Error> {
		decode::<Claims>(
			token,
			&DecodingKey::from_secret(self.secret.as_ref()),
			&Validation::default(),
		)
		.map(|data| data.claims)
	}

	pub fn session_cookie(&self, token: String) -> Cookie<'static> {
		Cookie::build(SESSION_COOKIE, token)
			.path("/")
			.http_only(true)
			.same_site(SameSite::Lax)
			.max_age(Duration::seconds(self.ttl_secs as i64))
			.finish()
	}

	pub fn removal_cookie() -> Cookie<'static> {
		let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
		cookie.make_removal();
		cookie
	}
}

/// Authenticated identity handed to every protected operation.
///
/// Privileges are not part of the session. Admin checks load the stored user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
	pub user_id: i32,
	pub username: String,
}

impl AuthContext {
	pub fn from_claims(claims: &Claims) -> Result<Self, AppError> {
		let user_id = claims.sub.parse::<i32>().map_err(|_| AppError::Unauthenticated)?;
		Ok(Self { user_id, username: claims.name.clone() })
	}
}

impl FromRequest for AuthContext {
	type Error = AppError;
	type Future = Ready<Result<Self, Self::Error>>;

	fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
		let ctx = req
			.extensions()
			.get::<Claims>()
			.ok_or(AppError::Unauthenticated)
			.and_then(AuthContext::from_claims);
		ready(ctx)
	}
}

/// `/login?next=<target>`, with the target percent-encoded.
pub fn login_redirect(target: &str) -> String {
	let query = form_urlencoded::Serializer::new(String::new()).append_pair("next", target).finish();
	format!("{}?{}", LOGIN_PATH, query)
}

/// Only local absolute paths are followed after login.
pub fn safe_next(next: Option<&str>) -> Option<String> {
	next.filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
		.map(str::to_string)
}

pub struct RequireSession {
	keys: SessionKeys,
}

impl RequireSession {
	pub fn new(keys: SessionKeys) -> Self {
		Self { keys }
	}
}

impl<S, B> Transform<S, ServiceRequest> for RequireSession
where
	S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = AxError>,
	S::Future: 'static,
	B: 'static,
{
	type Response = ServiceResponse<EitherBody<B>>;
	type Error = AxError;
	type InitError = ();
	type Transform = RequireSessionMiddleware<S>;
	type Future = Ready<Result<Self::Transform, Self::InitError>>;

	fn new_transform(&self, service: S) -> Self::Future {
		ok(RequireSessionMiddleware { keys: self.keys.clone(), service })
	}
}

pub struct RequireSessionMiddleware<S> {
	keys: SessionKeys,
	service: S,
}

impl<S, B> Service<ServiceRequest> for RequireSessionMiddleware<S>
where
	S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = AxError>,
	S::Future: 'static,
	B: 'static,
{
	type Response = ServiceResponse<EitherBody<B>>;
	type Error = AxError;
	type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

	forward_ready!(service);

	fn call(&self, req: ServiceRequest) -> Self::Future {
		let public = Method::OPTIONS == *req.method() || PUBLIC_ROUTES.contains(&req.path());

		if !public {
			let claims = req.cookie(SESSION_COOKIE).and_then(|cookie| {
				match self.keys.verify_session(cookie.value()) {
					Ok(claims) => Some(claims),
					Err(e) => {
						warn!("Rejected session cookie: {:?}", e);
						None
					},
				}
			});

			match claims {
				Some(claims) => {
					req.extensions_mut().insert(claims);
				},
				None => {
					let target = match req.query_string() {
						"" => req.path().to_string(),
						query => format!("{}?{}", req.path(), query),
					};
					debug!("No session for {}, redirecting to login", target);
					let (request, _pl) = req.into_parts();
					let response = HttpResponse::Found()
						.insert_header((header::LOCATION, login_redirect(&target)))
						.finish()
						.map_into_right_body();

					return Box::pin(async { Ok(ServiceResponse::new(request, response)) });
				},
			}
		}

		let res = self.service.call(req);

		Box::pin(async move { res.await.map(ServiceResponse::map_into_left_body) })
	}
}
