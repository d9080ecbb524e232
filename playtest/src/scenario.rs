use crate::{
    application::Application, controller::Router, data::ExtractedResult, error::Error,
    fake_request::FakeRequest, request::RequestHeader,
};
use tracing::debug;

/// Calls the action registered as `action` with `request`, bypassing routing.
pub fn call_action<B: 'static>(
    application: &Application,
    router: &Router<B>,
    action: &str,
    request: &FakeRequest<B>,
) -> Result<ExtractedResult, Error> {
    debug!("{} {} -> {}", request.method(), request.uri(), action);

    let action = router.by_name(action)?;
    let result = action.call(application, request)?;

    Ok(ExtractedResult::from(result))
}

pub fn route<B: 'static>(
    application: &Application,
    router: &Router<B>,
    request: &FakeRequest<B>,
) -> Result<ExtractedResult, Error> {
    debug!("{} {}", request.method(), request.uri());

    Ok(ExtractedResult::from(router.dispatch(application, request)?))
}
