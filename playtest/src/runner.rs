use crate::{
    application::{running, Application},
    error::Error,
    evolutions,
    test_session::TestSession,
    PlaytestConfiguration,
};
use tracing::warn;

#[derive(Debug)]
pub enum Outcome<T> {
    Success(T),
    SchemaMismatch(Error),
    Failure(Error),
}

impl<T> From<Result<T, Error>> for Outcome<T> {
    fn from(result: Result<T, Error>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(e) if e.is_schema_mismatch() => Outcome::SchemaMismatch(e),
            Err(e) => Outcome::Failure(e),
        }
    }
}

/// Runs `scenario`; if it reports a database needing evolutions, applies all
/// evolution scripts and runs it once more. The second result is final.
pub fn on_schema_mismatch<T, F>(application: &Application, scenario: F) -> Result<T, Error>
where
    F: FnMut(&Application) -> Result<T, Error>,
{
    on_schema_mismatch_with(application, evolutions::apply_all_evolution_scripts, scenario)
}

pub fn on_schema_mismatch_with<T, B, F>(
    application: &Application,
    mut bootstrap: B,
    mut scenario: F,
) -> Result<T, Error>
where
    B: FnMut(&Application) -> Result<(), Error>,
    F: FnMut(&Application) -> Result<T, Error>,
{
    match Outcome::from(scenario(application)) {
        Outcome::Success(value) => Ok(value),
        Outcome::Failure(e) => Err(e),
        Outcome::SchemaMismatch(e) => {
            warn!("{}", e);
            warn!("applying evolutions and retrying once");
            bootstrap(application)?;
            scenario(application)
        }
    }
}

pub fn run_scenario<T, F>(configuration: PlaytestConfiguration, mut scenario: F) -> Result<T, Error>
where
    F: FnMut(&Application) -> Result<T, Error>,
{
    let _session = TestSession::enter();
    let application = Application::new(configuration)?;

    on_schema_mismatch(&application, |application| {
        running(application, |application| scenario(application))
    })
}
