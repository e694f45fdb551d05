use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::session::{SessionManager, SESSION_COOKIE};

/// Resolves the session cookie and stores the logged-in `UserId` in the request
/// extensions.
///
/// The middleware never rejects a request itself: public pages must stay
/// reachable, and pages and API routes answer a missing session differently.
/// Handlers opt in through the [`AuthenticatedUser`](super::extractors::AuthenticatedUser)
/// extractor.
pub struct SessionMiddleware;

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_owned());
            let sessions = req.app_data::<web::Data<SessionManager>>().cloned();

            if let (Some(token), Some(sessions)) = (token, sessions) {
                match sessions.resolve(&token).await? {
                    Some(user_id) => {
                        req.extensions_mut().insert(user_id);
                    }
                    None => log::debug!("request carried an unknown session token"),
                }
            }

            service.call(req).await
        })
    }
}
