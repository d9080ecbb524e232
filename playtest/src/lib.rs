mod application;
mod controller;
mod data;
mod database;
mod error;
pub mod evolutions;
mod fake_request;
mod playtest_configuration;
mod request;
pub mod results;
mod runner;
mod scenario;
mod test_session;
pub mod uri;
pub mod util;

pub use application::{running, Application, RunningApplication};
pub use controller::{Action, Route, Router};
pub use data::ExtractedResult;
pub use database::{DatabasePlugin, SqliteDatabasePlugin};
pub use error::Error;
pub use evolutions::apply_all_evolution_scripts;
pub use fake_request::FakeRequest;
pub use playtest_codegen::playtest_scenario;
pub use playtest_configuration::PlaytestConfiguration;
pub use request::{parse_cookie_header, Cookie, Cookies, Headers, Request, RequestHeader};
pub use results::SimpleResult;
pub use runner::{on_schema_mismatch, on_schema_mismatch_with, run_scenario, Outcome};
pub use scenario::{call_action, route};
pub use test_session::{TestSession, TestSessionGuard};
