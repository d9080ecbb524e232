use crate::{
    forms::LoginForm,
    models::User,
    session::{Flash, Session},
    views, FormBody,
};
use playtest::{
    results::{self, SimpleResult},
    Application, Error, Request,
};
use tracing::info;

pub fn index(app: &Application, request: &dyn Request<Body = FormBody>) -> Result<SimpleResult, Error> {
    let secret = app.configuration().application_secret();
    let session = Session::from_request(request, secret);

    let user = match session.get("email") {
        Some(email) => User::find_by_email(app, email)?,
        None => None,
    };

    match user {
        Some(user) => results::ok_html(views::index(&user)),
        None => results::redirect("/login"),
    }
}

pub fn login(_: &Application, request: &dyn Request<Body = FormBody>) -> Result<SimpleResult, Error> {
    let flash = Flash::from_request(request);
    let result = results::ok_html(views::login(&[], &flash, ""))?;

    if flash.is_empty() {
        Ok(result)
    } else {
        results::with_cookie(result, &Flash::discard())
    }
}

pub fn authenticate(
    app: &Application,
    request: &dyn Request<Body = FormBody>,
) -> Result<SimpleResult, Error> {
    let form = match LoginForm::bind(request.body()) {
        Ok(form) => form,
        Err(errors) => {
            let email = request
                .body()
                .get("email")
                .and_then(|values| values.first())
                .map(String::as_str)
                .unwrap_or("");
            return results::bad_request_html(views::login(&errors, &Flash::new(), email));
        }
    };

    match User::authenticate(app, &form.email, &form.password)? {
        Some(user) => {
            info!("{} signed in", user.email);
            let session = Session::new().with("email", user.email);
            let cookie = session.to_cookie(app.configuration().application_secret())?;
            results::with_cookie(results::redirect("/")?, &cookie)
        }
        None => {
            info!("rejected credentials for {}", form.email);
            let errors = [String::from("Invalid email or password")];
            results::bad_request_html(views::login(&errors, &Flash::new(), &form.email))
        }
    }
}

pub fn logout(_: &Application, request: &dyn Request<Body = FormBody>) -> Result<SimpleResult, Error> {
    if request.cookies().get(crate::session::SESSION_COOKIE).is_some() {
        info!("signed out");
    }

    let flash = Flash::new().with("success", "You've been logged out");
    let result = results::with_cookie(results::redirect("/login")?, &Session::discard())?;

    results::with_cookie(result, &flash.to_cookie())
}
