use crate::{
    application::Application,
    error::Error,
    request::Request,
    results::{self, SimpleResult},
};
use std::{fmt, sync::Arc};

pub trait Action<B>: Send + Sync {
    fn call(&self, application: &Application, request: &dyn Request<Body = B>)
        -> Result<SimpleResult, Error>;
}

impl<B, F> Action<B> for F
where
    F: Fn(&Application, &dyn Request<Body = B>) -> Result<SimpleResult, Error> + Send + Sync,
{
    fn call(
        &self,
        application: &Application,
        request: &dyn Request<Body = B>,
    ) -> Result<SimpleResult, Error> {
        self(application, request)
    }
}

pub struct Route<B> {
    pub name: String,
    pub method: String,
    pub path: String,
    action: Arc<dyn Action<B>>,
}

impl<B> Route<B> {
    pub fn action(&self) -> Arc<dyn Action<B>> {
        self.action.clone()
    }
}

impl<B> fmt::Debug for Route<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("method", &self.method)
            .field("path", &self.path)
            .finish()
    }
}

#[derive(Debug)]
pub struct Router<B> {
    routes: Vec<Route<B>>,
}

impl<B: 'static> Router<B> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn add<S1, S2, S3, A>(&mut self, name: S1, method: S2, path: S3, action: A) -> &mut Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
        A: Action<B> + 'static,
    {
        self.routes.push(Route {
            name: name.into(),
            method: method.into(),
            path: path.into(),
            action: Arc::new(action),
        });
        self
    }

    pub fn by_name(&self, name: &str) -> Result<Arc<dyn Action<B>>, Error> {
        self.routes
            .iter()
            .find(|route| route.name == name)
            .map(Route::action)
            .ok_or_else(|| Error::UnknownAction(name.into()))
    }

    pub fn route(&self, method: &str, path: &str) -> Option<&Route<B>> {
        self.routes
            .iter()
            .find(|route| route.method.eq_ignore_ascii_case(method) && route.path == path)
    }

    /// Calls the action routed for the request, or answers `404 Not Found`.
    pub fn dispatch(
        &self,
        application: &Application,
        request: &dyn Request<Body = B>,
    ) -> Result<SimpleResult, Error> {
        match self.route(request.method(), request.path()) {
            Some(route) => route.action.call(application, request),
            None => results::not_found(),
        }
    }
}

impl<B: 'static> Default for Router<B> {
    fn default() -> Self {
        Self::new()
    }
}
