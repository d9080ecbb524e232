#[cfg(test)]
mod tests {
    use login_app::{models::User, routes, session::Session, FormBody};
    use playtest::{
        call_action, on_schema_mismatch_with, playtest_scenario, route, run_scenario, running,
        Application, Cookie, Error, FakeRequest, PlaytestConfiguration, RequestHeader,
    };
    use std::{collections::HashMap, path::Path};

    const SECRET: &str = "scenario-secret";

    fn login_app_path() -> &'static Path {
        Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../login-app"))
    }

    fn configure_login_app(config: &mut PlaytestConfiguration) {
        config.set_application_path(login_app_path());
        config.set_data_source("default", "memory:login_flow_scenarios");
        config.set_application_secret(SECRET);
    }

    fn configure_without_database(config: &mut PlaytestConfiguration) {
        configure_login_app(config);
        config.set_database_plugin_enabled(false);
    }

    fn credentials(email: &str, password: &str) -> FormBody {
        let mut body = FormBody::new();
        body.insert(String::from("email"), vec![String::from(email)]);
        body.insert(String::from("password"), vec![String::from(password)]);
        body
    }

    fn mumoshu(app: &Application) -> Result<(), Error> {
        User::create(app, &User::new("mumoshu@sample.com", "Yusuke", "secret"))
    }

    #[playtest_scenario(configure_login_app)]
    fn login_page_renders(app: &Application) -> Result<(), Error> {
        let request = FakeRequest::new("GET", "/login");
        let result = call_action(app, &routes::router(), "Application.login", &request)?;

        let mut expected_headers = HashMap::new();
        expected_headers.insert(
            String::from("Content-Type"),
            String::from("text/html; charset=utf-8"),
        );

        assert_eq!(result.status, 200);
        assert_eq!(result.headers, expected_headers);
        assert!(result.body.contains("/login"));
        Ok(())
    }

    #[playtest_scenario(configure_login_app)]
    fn authenticate_without_credentials_is_bad_request(app: &Application) -> Result<(), Error> {
        let request = FakeRequest::new("POST", "/login");
        let result = call_action(app, &routes::router(), "Application.authenticate", &request)?;

        assert_eq!(result.status, 400);
        assert!(result.body.contains("Email is required"));
        Ok(())
    }

    #[playtest_scenario(configure_login_app)]
    fn authenticate_with_valid_credentials_redirects(app: &Application) -> Result<(), Error> {
        mumoshu(app)?;

        let request = FakeRequest::with_parts(
            "POST",
            "/login",
            credentials("mumoshu@sample.com", "secret"),
        );
        let result = call_action(app, &routes::router(), "Application.authenticate", &request)?;

        assert_eq!(result.status, 302);
        assert_eq!(result.header("Location"), Some("/"));
        assert!(result
            .set_cookie("PLAY_SESSION")
            .unwrap_or_default()
            .starts_with("PLAY_SESSION="));
        Ok(())
    }

    #[playtest_scenario(configure_login_app)]
    fn logout_redirects(app: &Application) -> Result<(), Error> {
        let request = FakeRequest::new("GET", "/logout");
        let result = call_action(app, &routes::router(), "Application.logout", &request)?;

        assert_eq!(result.status, 302);
        assert_eq!(result.header("Location"), Some("/login"));
        assert_eq!(
            result.set_cookie("PLAY_SESSION"),
            Some("PLAY_SESSION=; Max-Age=0; Path=/; HttpOnly")
        );
        assert!(result
            .set_cookie("PLAY_FLASH")
            .unwrap_or_default()
            .starts_with("PLAY_FLASH=success="));
        Ok(())
    }

    #[playtest_scenario(configure_login_app)]
    fn wrong_password_is_bad_request(app: &Application) -> Result<(), Error> {
        mumoshu(app)?;

        let request =
            FakeRequest::with_parts("POST", "/login", credentials("mumoshu@sample.com", "nope"));
        let result = call_action(app, &routes::router(), "Application.authenticate", &request)?;

        assert_eq!(result.status, 400);
        assert!(result.body.contains("Invalid email or password"));
        assert!(result.body.contains("value=\"mumoshu@sample.com\""));
        Ok(())
    }

    #[playtest_scenario(configure_login_app)]
    fn index_requires_a_signed_session(app: &Application) -> Result<(), Error> {
        mumoshu(app)?;
        let router = routes::router();

        let anonymous = route(app, &router, &FakeRequest::new("GET", "/"))?;
        assert_eq!(anonymous.status, 302);
        assert_eq!(anonymous.header("Location"), Some("/login"));

        let session = Session::new().with("email", "mumoshu@sample.com");
        let signed_in = FakeRequest::new("GET", "/").with_cookie(session.to_cookie(SECRET)?);
        let welcome = route(app, &router, &signed_in)?;
        assert_eq!(welcome.status, 200);
        assert!(welcome.body.contains("Welcome Yusuke"));

        let forged = FakeRequest::new("GET", "/")
            .with_cookie(Cookie::new("PLAY_SESSION", "00-email=mumoshu%40sample.com"));
        assert_eq!(route(app, &router, &forged)?.status, 302);
        Ok(())
    }

    #[playtest_scenario(configure_login_app)]
    fn logout_flashes_a_goodbye(app: &Application) {
        let router = routes::router();
        let logout = route(app, &router, &FakeRequest::new("GET", "/logout")).unwrap();
        let flash = logout
            .set_cookie("PLAY_FLASH")
            .and_then(|header| header.split(';').next())
            .and_then(|pair| pair.splitn(2, '=').nth(1))
            .map(String::from)
            .unwrap_or_default();

        let login = FakeRequest::new("GET", "/login").with_cookie(Cookie::new("PLAY_FLASH", flash));
        let page = route(app, &router, &login).unwrap();

        assert_eq!(page.status, 200);
        assert!(page.body.contains("You&#x27;ve been logged out"));
        assert!(page
            .set_cookie("PLAY_FLASH")
            .unwrap_or_default()
            .starts_with("PLAY_FLASH=; Max-Age=0"));
    }

    #[playtest_scenario(configure_login_app)]
    fn unknown_routes_are_not_found(app: &Application) -> Result<(), Error> {
        let result = route(app, &routes::router(), &FakeRequest::new("DELETE", "/login"))?;

        assert_eq!(result.status, 404);
        assert!(matches!(
            call_action(app, &routes::router(), "Application.missing", &FakeRequest::new("GET", "/")),
            Err(Error::UnknownAction(_))
        ));
        Ok(())
    }

    #[test]
    fn missing_header_fails_the_scenario_without_bootstrap() {
        let mut configuration = PlaytestConfiguration::new();
        configure_login_app(&mut configuration);
        configuration.set_data_source("default", "memory:login_flow_missing_header");
        configuration.set_auto_apply(true);
        let application = Application::new(configuration).unwrap();
        let mut bootstraps = 0;

        let result: Result<(), Error> = on_schema_mismatch_with(
            &application,
            |_| {
                bootstraps += 1;
                Ok(())
            },
            |app| {
                running(app, |_| {
                    let request = FakeRequest::<FormBody>::new("GET", "/login");
                    request.headers().get_all("Accept")?;
                    Ok(())
                })
            },
        );

        assert!(matches!(result, Err(Error::HeaderNotFound(key)) if key == "Accept"));
        assert_eq!(bootstraps, 0);
    }

    #[test]
    fn unmigrated_database_is_bootstrapped_once() {
        let mut configuration = PlaytestConfiguration::new();
        configure_login_app(&mut configuration);
        configuration.set_data_source("default", "memory:login_flow_bootstrap_once");
        let application = Application::new(configuration).unwrap();
        let mut bootstraps = 0;
        let mut attempts = 0;

        let users = on_schema_mismatch_with(
            &application,
            |app| {
                bootstraps += 1;
                playtest::apply_all_evolution_scripts(app)
            },
            |app| {
                attempts += 1;
                running(app, |app| User::find_all(app))
            },
        )
        .unwrap();

        assert!(users.is_empty());
        assert_eq!(bootstraps, 1);
        assert_eq!(attempts, 2);
    }

    #[test]
    fn migrated_file_database_needs_no_bootstrap() {
        let dir = tempfile::tempdir().unwrap();
        let database = dir.path().join("login.db");
        let configure = |configuration: &mut PlaytestConfiguration| {
            configure_login_app(configuration);
            configuration.set_data_source("default", database.to_str().unwrap());
        };

        let mut first = PlaytestConfiguration::new();
        configure(&mut first);
        run_scenario(first, |app| mumoshu(app)).unwrap();

        let mut second = PlaytestConfiguration::new();
        configure(&mut second);
        let application = Application::new(second).unwrap();
        let mut bootstraps = 0;
        let users = on_schema_mismatch_with(
            &application,
            |_| {
                bootstraps += 1;
                Ok(())
            },
            |app| running(app, |app| User::find_all(app)),
        )
        .unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(bootstraps, 0);
    }

    #[test]
    fn missing_database_plugin_is_a_configuration_error() {
        let mut configuration = PlaytestConfiguration::new();
        configure_without_database(&mut configuration);

        let result = run_scenario(configuration, |app| {
            let request = FakeRequest::with_parts(
                "POST",
                "/login",
                credentials("mumoshu@sample.com", "secret"),
            );
            call_action(app, &routes::router(), "Application.authenticate", &request)
        });

        assert!(matches!(result, Err(Error::DatabasePluginNotRegistered)));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("database plugin isn't registered"));
    }

    #[test]
    fn failed_assertion_still_releases_the_session() {
        let mut configuration = PlaytestConfiguration::new();
        configure_login_app(&mut configuration);

        let outcome = std::panic::catch_unwind(move || {
            run_scenario(configuration, |_| -> Result<(), Error> {
                assert_eq!(1, 2, "deliberately failing scenario");
                Ok(())
            })
        });
        assert!(outcome.is_err());

        let mut configuration = PlaytestConfiguration::new();
        configure_login_app(&mut configuration);
        assert!(run_scenario(configuration, |app| User::find_all(app)).is_ok());
    }

    #[test]
    fn request_uri_is_derived_for_diagnostics() {
        let request = FakeRequest::<FormBody>::new("GET", "/login")
            .with_param("redirect", "/projects?id=1")
            .with_param("remember", true);

        assert_eq!(
            request.uri(),
            "http://localhost/login?redirect=%2Fprojects%3Fid%3D1&remember=true"
        );
    }
}
