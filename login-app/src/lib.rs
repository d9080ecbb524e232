pub mod controllers;
pub mod forms;
pub mod models;
pub mod routes;
pub mod session;
pub mod views;

use std::collections::BTreeMap;

pub type FormBody = BTreeMap<String, Vec<String>>;
