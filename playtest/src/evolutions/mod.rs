pub mod error;

use crate::{application::Application, error::Error};
use lazy_static::lazy_static;
use regex::Regex;
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

lazy_static! {
    static ref SECTION_REGEX: Regex =
        Regex::new(r"(?mi)^#.*!(?P<section>ups|downs)\b.*$").unwrap();
}

const CREATE_EVOLUTIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS play_evolutions (
    id INTEGER NOT NULL PRIMARY KEY,
    hash TEXT NOT NULL,
    applied_at TEXT NOT NULL,
    apply_script TEXT,
    revert_script TEXT,
    state TEXT,
    last_problem TEXT
);";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evolution {
    pub revision: i64,
    pub sql_up: String,
    pub sql_down: String,
    pub hash: String,
}

impl Evolution {
    pub fn new<S1: Into<String>, S2: Into<String>>(revision: i64, sql_up: S1, sql_down: S2) -> Self {
        let sql_up = sql_up.into();
        let sql_down = sql_down.into();
        let mut hasher = Sha256::new();
        hasher.update(sql_down.as_bytes());
        hasher.update(sql_up.as_bytes());

        Self {
            revision,
            hash: hex::encode(hasher.finalize()),
            sql_up,
            sql_down,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Script {
    Up(Evolution),
    Down(Evolution),
}

impl Script {
    pub fn evolution(&self) -> &Evolution {
        match self {
            Script::Up(evolution) | Script::Down(evolution) => evolution,
        }
    }

    pub fn sql(&self) -> &str {
        match self {
            Script::Up(evolution) => &evolution.sql_up,
            Script::Down(evolution) => &evolution.sql_down,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Script::Up(_) => "Ups",
            Script::Down(_) => "Downs",
        }
    }
}

/// Splits an evolution file into its `!Ups` and `!Downs` sections. Text
/// before the first section marker is ignored.
pub fn parse_evolution<P: AsRef<Path>>(
    path: P,
    revision: i64,
    contents: &str,
) -> Result<Evolution, error::Error> {
    let markers = SECTION_REGEX.captures_iter(contents).collect::<Vec<_>>();
    let mut ups: Option<String> = None;
    let mut downs: Option<String> = None;

    for (index, captures) in markers.iter().enumerate() {
        let marker = captures.get(0).map(|m| m.end()).unwrap_or(0);
        let end = markers
            .get(index + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or_else(|| contents.len());
        let text = contents[marker..end].trim().to_string();
        let section = captures["section"].to_lowercase();

        let slot = if section == "ups" { &mut ups } else { &mut downs };
        if slot.is_some() {
            return Err(error::Error::DuplicateSection(
                path.as_ref().to_path_buf(),
                section,
            ));
        }
        *slot = Some(text);
    }

    let ups = ups.ok_or_else(|| error::Error::MissingUpsSection(path.as_ref().to_path_buf()))?;

    Ok(Evolution::new(revision, ups, downs.unwrap_or_default()))
}

fn evolution_file(evolutions_path: &Path, data_source: &str, revision: i64) -> PathBuf {
    evolutions_path
        .join(data_source)
        .join(format!("{}.sql", revision))
}

/// Reads `<evolutions_path>/<data_source>/1.sql`, `2.sql`, ... up to the first
/// missing revision, oldest first.
pub fn application_evolutions(
    evolutions_path: &Path,
    data_source: &str,
) -> Result<Vec<Evolution>, error::Error> {
    let mut evolutions = Vec::new();
    let mut revision = 1;

    loop {
        let path = evolution_file(evolutions_path, data_source, revision);
        if !path.is_file() {
            break;
        }
        let contents = fs::read_to_string(&path)?;
        evolutions.push(parse_evolution(&path, revision, &contents)?);
        revision += 1;
    }

    Ok(evolutions)
}

fn check_evolutions_state(connection: &Connection, data_source: &str) -> Result<(), Error> {
    let stuck: Option<(i64, Option<String>)> = connection
        .query_row(
            "SELECT id, last_problem FROM play_evolutions \
             WHERE state LIKE 'applying_%' ORDER BY id LIMIT 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    match stuck {
        Some((revision, problem)) => Err(Error::InconsistentDatabase {
            data_source: data_source.into(),
            revision,
            problem: problem.unwrap_or_default(),
        }),
        None => Ok(()),
    }
}

/// Evolutions recorded in the database, newest first.
pub fn database_evolutions(app: &Application, data_source: &str) -> Result<Vec<Evolution>, Error> {
    let connection = app.database()?.connection(data_source)?;
    connection.execute_batch(CREATE_EVOLUTIONS_TABLE)?;
    check_evolutions_state(&connection, data_source)?;

    let mut statement = connection.prepare(
        "SELECT id, hash, apply_script, revert_script FROM play_evolutions ORDER BY id DESC",
    )?;
    let rows = statement.query_map([], |row| {
        Ok(Evolution {
            revision: row.get(0)?,
            hash: row.get(1)?,
            sql_up: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            sql_down: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        })
    })?;

    let mut evolutions = Vec::new();
    for row in rows {
        evolutions.push(row?);
    }

    Ok(evolutions)
}

/// The scripts that bring a database holding `database` up to `application`.
///
/// Revisions the application no longer knows, and every revision above the
/// lowest point where the hashes diverge, are reverted newest first before the
/// application's revisions are applied oldest first.
pub fn compute_script(mut database: Vec<Evolution>, mut application: Vec<Evolution>) -> Vec<Script> {
    database.sort_by(|a, b| b.revision.cmp(&a.revision));
    application.sort_by(|a, b| b.revision.cmp(&a.revision));

    let application_head = application.first().map(|e| e.revision).unwrap_or(0);
    let database_head = database.first().map(|e| e.revision).unwrap_or(0);

    let downs_count = database
        .iter()
        .take_while(|e| e.revision > application_head)
        .count();
    let ups_count = application
        .iter()
        .take_while(|e| e.revision > database_head)
        .count();
    let (downs, database_rest) = database.split_at(downs_count);
    let (ups, application_rest) = application.split_at(ups_count);

    let pairs = database_rest
        .iter()
        .zip(application_rest.iter())
        .collect::<Vec<_>>();
    let common = pairs
        .iter()
        .rev()
        .take_while(|(down, up)| down.hash == up.hash)
        .count();
    let conflicting = &pairs[..pairs.len() - common];

    let mut script = downs.iter().cloned().map(Script::Down).collect::<Vec<_>>();
    script.extend(conflicting.iter().map(|(down, _)| Script::Down((*down).clone())));

    let mut up_scripts = ups
        .iter()
        .chain(conflicting.iter().map(|(_, up)| *up))
        .cloned()
        .map(Script::Up)
        .collect::<Vec<_>>();
    up_scripts.reverse();
    script.extend(up_scripts);

    script
}

/// The pending script for `data_source`; empty when the schema is current.
pub fn evolution_script(app: &Application, data_source: &str) -> Result<Vec<Script>, Error> {
    let application = application_evolutions(&app.configuration().evolutions_path(), data_source)?;
    let database = database_evolutions(app, data_source)?;

    Ok(compute_script(database, application))
}

pub fn to_human_readable_script(scripts: &[Script]) -> String {
    scripts
        .iter()
        .map(|script| {
            let evolution = script.evolution();
            let hash = evolution.hash.get(..7).unwrap_or(&evolution.hash);
            format!(
                "# --- Rev:{},{} - {}\n{}\n\n",
                evolution.revision,
                script.label(),
                hash,
                script.sql()
            )
        })
        .collect()
}

pub fn apply_script(app: &Application, data_source: &str, scripts: &[Script]) -> Result<(), Error> {
    let connection = app.database()?.connection(data_source)?;
    connection.execute_batch(CREATE_EVOLUTIONS_TABLE)?;
    check_evolutions_state(&connection, data_source)?;

    for script in scripts {
        let evolution = script.evolution();
        debug!(
            "applying {} of revision {} to '{}'",
            script.label(),
            evolution.revision,
            data_source
        );

        match script {
            Script::Up(_) => connection.execute(
                "INSERT INTO play_evolutions \
                 (id, hash, applied_at, apply_script, revert_script, state, last_problem) \
                 VALUES (?1, ?2, CURRENT_TIMESTAMP, ?3, ?4, 'applying_up', '')",
                params![
                    evolution.revision,
                    evolution.hash,
                    evolution.sql_up,
                    evolution.sql_down
                ],
            )?,
            Script::Down(_) => connection.execute(
                "UPDATE play_evolutions SET state = 'applying_down' WHERE id = ?1",
                params![evolution.revision],
            )?,
        };

        if let Err(e) = connection.execute_batch(script.sql()) {
            let problem = e.to_string();
            connection.execute(
                "UPDATE play_evolutions SET last_problem = ?1 WHERE id = ?2",
                params![problem, evolution.revision],
            )?;
            return Err(Error::EvolutionFailed {
                data_source: data_source.into(),
                revision: evolution.revision,
                problem,
            });
        }

        match script {
            Script::Up(_) => connection.execute(
                "UPDATE play_evolutions SET state = 'applied' WHERE id = ?1",
                params![evolution.revision],
            )?,
            Script::Down(_) => connection.execute(
                "DELETE FROM play_evolutions WHERE id = ?1",
                params![evolution.revision],
            )?,
        };
    }

    Ok(())
}

/// Marks a revision left half-applied as done so evolutions can run again.
pub fn resolve(app: &Application, data_source: &str, revision: i64) -> Result<(), Error> {
    let connection = app.database()?.connection(data_source)?;
    connection.execute(
        "UPDATE play_evolutions SET state = 'applied' WHERE state = 'applying_up' AND id = ?1",
        params![revision],
    )?;
    connection.execute(
        "DELETE FROM play_evolutions WHERE state = 'applying_down' AND id = ?1",
        params![revision],
    )?;
    info!("resolved revision {} of '{}'", revision, data_source);

    Ok(())
}

/// Brings the default data source up to date with the application's
/// evolution scripts. Requires the database plugin.
pub fn apply_all_evolution_scripts(app: &Application) -> Result<(), Error> {
    let database = app.database()?;
    let data_source = database.default_data_source().to_string();
    let script = evolution_script(app, &data_source)?;

    info!(
        "applying {} evolution script(s) to '{}'",
        script.len(),
        data_source
    );

    apply_script(app, &data_source, &script)
}

/// Verifies every data source on application start, applying pending scripts
/// when the configuration allows it.
pub(crate) fn check_evolutions(app: &Application) -> Result<(), Error> {
    let configuration = app.configuration();

    for data_source in app.database()?.data_source_names() {
        let script = evolution_script(app, &data_source)?;
        if script.is_empty() {
            continue;
        }

        let has_downs = script.iter().any(|s| matches!(s, Script::Down(_)));
        if configuration.auto_apply() && (!has_downs || configuration.auto_apply_downs()) {
            apply_script(app, &data_source, &script)?;
        } else {
            return Err(Error::InvalidDatabaseRevision {
                script: to_human_readable_script(&script),
                data_source,
            });
        }
    }

    Ok(())
}
