use crate::error::{DatabaseError, DatabaseErrorExt};
use fxhash::FxHashMap;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

const BOOTSTRAP_SQL: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    version BIGINT NOT NULL,
    name VARCHAR(255) NOT NULL,
    checksum CHAR(64) NOT NULL,
    applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY (version)
) ENGINE = InnoDB DEFAULT CHARSET = utf8mb4";

/// One unit of schema work inside a [`Migration`].
#[derive(Debug)]
pub enum Step {
    /// Semicolon separated DDL statements.
    Script(&'static str),
    /// `ALTER TABLE .. ADD COLUMN` that is skipped when the column already exists.
    AddColumnIfMissing { table: &'static str, column: &'static str, definition: &'static str },
}

#[derive(Debug)]
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub steps: &'static [Step],
}

impl Migration {
    /// Hex-encoded SHA-256 over the migration's steps.
    #[must_use]
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        for step in self.steps {
            match step {
                Step::Script(sql) => {
                    hasher.update(b"script\0");
                    hasher.update(sql.as_bytes());
                },
                Step::AddColumnIfMissing { table, column, definition } => {
                    hasher.update(b"add_column\0");
                    hasher.update(format!("{table}.{column} {definition}").as_bytes());
                },
            }
            hasher.update(b"\0");
        }
        hex::encode(hasher.finalize())
    }
}

static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_tables",
        steps: &[Step::Script(include_str!("../migrations/0001_create_tables.sql"))],
    },
    Migration {
        version: 2,
        name: "add_user_contact_fields",
        steps: &[
            Step::AddColumnIfMissing {
                table: "users",
                column: "phone_number",
                definition: "VARCHAR(15) NULL UNIQUE",
            },
            Step::AddColumnIfMissing {
                table: "users",
                column: "date_of_birth",
                definition: "TIMESTAMP NULL",
            },
        ],
    },
];

/// Migrations compiled into the binary, ordered by version.
#[must_use]
pub fn builtin_migrations() -> &'static [Migration] {
    MIGRATIONS
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    pub version: i64,
    pub name: &'static str,
}

#[derive(Debug, Default)]
pub struct MigrationReport {
    pub applied: Vec<AppliedMigration>,
    pub skipped: Vec<AppliedMigration>,
}

#[derive(Debug)]
pub struct MigrationRunner<'a> {
    db: &'a DatabaseConnection,
    migrations: &'static [Migration],
}

impl<'a> MigrationRunner<'a> {
    #[must_use]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db, migrations: builtin_migrations() }
    }

    #[instrument(skip_all)]
    pub async fn run(&self) -> Result<MigrationReport, DatabaseError> {
        self.db
            .execute_unprepared(BOOTSTRAP_SQL)
            .await
            .context("Creating schema_migrations table")?;

        let applied = self.applied_checksums().await?;
        let mut report = MigrationReport::default();

        for migration in self.migrations {
            let record = AppliedMigration { version: migration.version, name: migration.name };
            let checksum = migration.checksum();

            if let Some(existing) = applied.get(&migration.version) {
                ensure_checksum_match(migration, existing, &checksum)?;
                debug!(version = migration.version, name = migration.name, "Migration already applied");
                report.skipped.push(record);
                continue;
            }

            self.apply(migration, &checksum).await?;
            info!(version = migration.version, name = migration.name, "Applied migration");
            report.applied.push(record);
        }

        Ok(report)
    }

    async fn applied_checksums(&self) -> Result<FxHashMap<i64, String>, DatabaseError> {
        let rows = self
            .db
            .query_all(Statement::from_string(
                DatabaseBackend::MySql,
                "SELECT version, checksum FROM schema_migrations",
            ))
            .await
            .context("Loading applied migrations")?;

        rows.into_iter()
            .map(|row| {
                let version = row.try_get::<i64>("", "version")?;
                let checksum = row.try_get::<String>("", "checksum")?;
                Ok((version, checksum))
            })
            .collect::<Result<_, sea_orm::DbErr>>()
            .context("Parsing applied migrations")
    }

    async fn apply(&self, migration: &Migration, checksum: &str) -> Result<(), DatabaseError> {
        let at = format!("migration {} ({})", migration.version, migration.name);

        for step in migration.steps {
            match step {
                Step::Script(sql) => {
                    for statement in split_statements(sql) {
                        self.db
                            .execute_unprepared(statement)
                            .await
                            .context(format!("SQL execution failed at {at}"))?;
                    }
                },
                Step::AddColumnIfMissing { table, column, definition } => {
                    if self.column_exists(table, column).await? {
                        debug!(table, column, "Column already present, skipping");
                        continue;
                    }
                    self.db
                        .execute_unprepared(&format!(
                            "ALTER TABLE {table} ADD COLUMN {column} {definition}"
                        ))
                        .await
                        .context(format!("Adding {table}.{column} at {at}"))?;
                },
            }
        }

        self.db
            .execute(Statement::from_sql_and_values(
                DatabaseBackend::MySql,
                "INSERT INTO schema_migrations (version, name, checksum) VALUES (?, ?, ?)",
                [migration.version.into(), migration.name.into(), checksum.into()],
            ))
            .await
            .context(format!("Recording {at}"))?;

        Ok(())
    }

    async fn column_exists(&self, table: &str, column: &str) -> Result<bool, DatabaseError> {
        let row = self
            .db
            .query_one(Statement::from_sql_and_values(
                DatabaseBackend::MySql,
                "SELECT COUNT(*) AS cnt FROM information_schema.columns \
                 WHERE table_schema = DATABASE() AND table_name = ? AND column_name = ?",
                [table.into(), column.into()],
            ))
            .await
            .context("Inspecting information_schema")?;

        let count = match row {
            Some(row) => row.try_get::<i64>("", "cnt").context("Reading column count")?,
            None => 0,
        };
        Ok(count > 0)
    }
}

fn ensure_checksum_match(
    migration: &Migration,
    existing: &str,
    expected: &str,
) -> Result<(), DatabaseError> {
    if existing != expected {
        return Err(DatabaseError::Migration {
            message: format!(
                "Checksum mismatch for version {} ({}): recorded {existing}, embedded {expected}",
                migration.version, migration.name
            )
            .into(),
            context: Some("Migration already applied with different content".into()),
        });
    }
    Ok(())
}

/// Splits a DDL script into statements. Scripts must not contain `;` inside literals.
fn split_statements(script: &str) -> impl Iterator<Item = &str> {
    script.split(';').map(str::trim).filter(|statement| !statement.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;

    fn exec_ok() -> MockExecResult {
        MockExecResult { last_insert_id: 0, rows_affected: 0 }
    }

    fn applied_row(migration: &Migration, checksum: String) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("version", Value::from(migration.version)), ("checksum", Value::from(checksum))])
    }

    fn count_row(count: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("cnt", Value::from(count))])
    }

    #[test]
    fn test_versions_are_strictly_increasing() {
        let versions: Vec<i64> = builtin_migrations().iter().map(|m| m.version).collect();
        assert!(versions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_checksums_are_stable_and_distinct() {
        let [first, second] = builtin_migrations() else { panic!("expected two migrations") };
        assert_eq!(first.checksum(), first.checksum());
        assert_eq!(first.checksum().len(), 64);
        assert_ne!(first.checksum(), second.checksum());
    }

    #[test]
    fn test_initial_script_splits_into_four_tables() {
        let [first, _] = builtin_migrations() else { panic!("expected two migrations") };
        let [Step::Script(sql)] = first.steps else { panic!("expected a single script") };
        let statements: Vec<&str> = split_statements(sql).collect();
        assert_eq!(statements.len(), 4);
        assert!(statements.iter().all(|s| s.starts_with("CREATE TABLE IF NOT EXISTS")));
    }

    #[tokio::test]
    async fn test_fresh_database_applies_everything() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_exec_results((0..8).map(|_| exec_ok()))
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .append_query_results([vec![count_row(1)]])
            .append_query_results([vec![count_row(1)]])
            .into_connection();

        let report = MigrationRunner::new(&db).run().await.unwrap();
        let versions: Vec<i64> = report.applied.iter().map(|m| m.version).collect();
        assert_eq!(versions, vec![1, 2]);
        assert!(report.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_recorded_migrations_are_skipped() {
        let rows: Vec<_> =
            builtin_migrations().iter().map(|m| applied_row(m, m.checksum())).collect();
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_exec_results([exec_ok()])
            .append_query_results([rows])
            .into_connection();

        let report = MigrationRunner::new(&db).run().await.unwrap();
        assert!(report.applied.is_empty());
        assert_eq!(report.skipped.len(), 2);
    }

    #[tokio::test]
    async fn test_checksum_drift_is_fatal() {
        let first = &builtin_migrations()[0];
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_exec_results([exec_ok()])
            .append_query_results([vec![applied_row(first, "0".repeat(64))]])
            .into_connection();

        let err = MigrationRunner::new(&db).run().await.unwrap_err();
        assert!(matches!(err, DatabaseError::Migration { .. }));
        assert!(err.to_string().contains("Checksum mismatch for version 1"));
    }
}
