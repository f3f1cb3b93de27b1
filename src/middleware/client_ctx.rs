use crate::constants::USER_ID_SESSION_KEY;
use actix_session::{Session, SessionExt};
use actix_web::dev::{self, Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web::Data, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

/// Client data stored for a single request cycle.
/// Distinct from ClientCtx because it is defined through request data.
#[derive(Clone, Debug, Default)]
pub struct ClientCtxInner {
    /// Authenticated user id written into the session by the auth service.
    /// None is a guest.
    pub user_id: Option<i32>,
    /// CSRF token for form protection
    pub csrf_token: String,
}

impl ClientCtxInner {
    pub fn from_session(session: &Session) -> Self {
        use crate::middleware::csrf::get_or_create_csrf_token;

        let user_id = match session.get::<i32>(USER_ID_SESSION_KEY) {
            Ok(id) => id,
            Err(err) => {
                log::warn!("Discarding malformed user id in session: {}", err);
                None
            }
        };

        let csrf_token = get_or_create_csrf_token(session).unwrap_or_else(|_| String::new());

        ClientCtxInner {
            user_id,
            csrf_token,
        }
    }
}

/// Client context passed to routes.
/// Wraps ClientCtxInner, which is set at the beginning of the request.
#[derive(Clone, Debug)]
pub struct ClientCtx(Data<ClientCtxInner>);

impl Default for ClientCtx {
    fn default() -> Self {
        Self(Data::new(ClientCtxInner::default()))
    }
}

impl ClientCtx {
    /// Returns either the user's id or None.
    pub fn get_id(&self) -> Option<i32> {
        self.0.user_id
    }

    pub fn get_csrf_token(&self) -> &str {
        &self.0.csrf_token
    }

    /// Require user to be logged in. Returns user_id or ErrorUnauthorized.
    pub fn require_login(&self) -> Result<i32, actix_web::Error> {
        self.get_id()
            .ok_or_else(|| actix_web::error::ErrorUnauthorized("Login required"))
    }
}

/// Provides the `client: ClientCtx` parameter of route functions.
impl FromRequest for ClientCtx {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // Populated by the middleware; routes mounted without it read the session directly.
        if let Some(inner) = req.extensions().get::<Data<ClientCtxInner>>() {
            return ready(Ok(Self(inner.clone())));
        }

        let inner = Data::new(ClientCtxInner::from_session(&req.get_session()));
        req.extensions_mut().insert(inner.clone());
        ready(Ok(Self(inner)))
    }
}

impl<S: 'static, B> Transform<S, ServiceRequest> for ClientCtx
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ClientCtxMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ClientCtxMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Client context middleware
pub struct ClientCtxMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ClientCtxMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let inner = ClientCtxInner::from_session(&req.get_session());
        req.extensions_mut().insert(Data::new(inner));

        Box::pin(self.service.call(req))
    }
}
