use crate::{controllers, FormBody};
use playtest::Router;

pub fn router() -> Router<FormBody> {
    let mut router = Router::new();
    router
        .add("Application.index", "GET", "/", controllers::index)
        .add("Application.login", "GET", "/login", controllers::login)
        .add("Application.authenticate", "POST", "/login", controllers::authenticate)
        .add("Application.logout", "GET", "/logout", controllers::logout);
    router
}
