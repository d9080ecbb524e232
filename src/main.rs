mod error;
mod server_request;

use crate::{error::Error, server_request::ServerRequest};
use hyper::{
    service::{make_service_fn, service_fn},
    Body, Response, Server, StatusCode,
};
use login_app::{routes, FormBody};
use playtest::{Application, PlaytestConfiguration, RequestHeader, Router};
use std::{convert::Infallible, env, net::SocketAddr, sync::Arc};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIGURATION: &str = "login-app/conf/application.toml";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = serve().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn serve() -> Result<(), Error> {
    let configuration_path = env::args()
        .nth(1)
        .unwrap_or_else(|| String::from(DEFAULT_CONFIGURATION));
    let configuration = PlaytestConfiguration::load(&configuration_path)?;

    let application = Arc::new(Application::new(configuration)?);
    let router = Arc::new(routes::router());
    let service_application = application.clone();

    let _running = application.start()?;

    let addr = SocketAddr::from(([127, 0, 0, 1], 9000));
    let server = Server::bind(&addr).serve(make_service_fn(move |_| {
        let application = service_application.clone();
        let router = router.clone();

        async move {
            Ok::<_, Infallible>(service_fn(move |request| {
                handle_request(application.clone(), router.clone(), request)
            }))
        }
    }));
    info!("listening on http://{}", addr);

    server
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    info!("shutting down");

    Ok(())
}

async fn handle_request(
    application: Arc<Application>,
    router: Arc<Router<FormBody>>,
    request: hyper::Request<Body>,
) -> Result<Response<Body>, Infallible> {
    let result = match ServerRequest::read(request).await {
        Ok(request) => {
            debug!("{} {}", request.method(), request.uri());
            router
                .dispatch(&application, &request)
                .map_err(Error::from)
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(response) => Ok(response.map(Body::from)),
        Err(error) => {
            error!("An error occured: {}", error);
            let mut response = Response::new(Body::from(error.to_string()));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            Ok(response)
        }
    }
}
