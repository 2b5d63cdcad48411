mod support;

use support::{doc, MemoryDriver, MemorySource};

use larder::{
    async_trait, err,
    migrate::{self, Migration},
    schema::{ColumnDef, TableDef},
    Backup, Pool, Result,
};

use larder::doc::Type;

use std::sync::{Arc, Mutex};

/// Records the order its `apply` body ran in; optionally fails instead.
struct RecordingMigration {
    id: &'static str,
    log: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingMigration {
    fn ok(id: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Box<dyn Migration> {
        Box::new(Self {
            id,
            log: log.clone(),
            fail: false,
        })
    }

    fn failing(id: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Box<dyn Migration> {
        Box::new(Self {
            id,
            log: log.clone(),
            fail: true,
        })
    }
}

#[async_trait]
impl Migration for RecordingMigration {
    fn id(&self) -> &str {
        self.id
    }

    async fn apply(&self, _pool: &Pool) -> Result<()> {
        if self.fail {
            return Err(err!("migration body exploded"));
        }
        self.log.lock().unwrap().push(self.id.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn applies_every_migration_once_in_declared_order() {
    let pool = Pool::new(MemoryDriver::new()).await.unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));

    let migrations = vec![
        RecordingMigration::ok("0001_create_index", &log),
        RecordingMigration::ok("0002_backfill", &log),
        RecordingMigration::ok("0003_drop_column", &log),
    ];

    let report = migrate::run(&pool, &migrations).await.unwrap();
    assert_eq!(
        report.applied,
        ["0001_create_index", "0002_backfill", "0003_drop_column"]
    );
    assert_eq!(
        *log.lock().unwrap(),
        ["0001_create_index", "0002_backfill", "0003_drop_column"]
    );

    // a second run records nothing and executes no bodies
    let report = migrate::run(&pool, &migrations).await.unwrap();
    assert!(report.applied.is_empty());
    assert_eq!(log.lock().unwrap().len(), 3);

    let records = migrate::applied_records(&pool).await.unwrap();
    let ids: Vec<_> = records.iter().map(|record| record.id.as_str()).collect();
    assert_eq!(ids, ["0001_create_index", "0002_backfill", "0003_drop_column"]);
    assert!(records.iter().all(|record| record.applied_at > 0));
}

#[tokio::test]
async fn failure_aborts_the_rest_and_preserves_the_recorded_prefix() {
    let pool = Pool::new(MemoryDriver::new()).await.unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));

    let broken = vec![
        RecordingMigration::ok("0001_first", &log),
        RecordingMigration::failing("0002_second", &log),
        RecordingMigration::ok("0003_third", &log),
    ];

    let err = migrate::run(&pool, &broken).await.unwrap_err();
    assert!(err.is_migration());
    assert_eq!(*log.lock().unwrap(), ["0001_first"]);

    let records = migrate::applied_records(&pool).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "0001_first");

    // once fixed, only the unrecorded migrations run
    let fixed = vec![
        RecordingMigration::ok("0001_first", &log),
        RecordingMigration::ok("0002_second", &log),
        RecordingMigration::ok("0003_third", &log),
    ];
    let report = migrate::run(&pool, &fixed).await.unwrap();
    assert_eq!(report.applied, ["0002_second", "0003_third"]);
    assert_eq!(
        *log.lock().unwrap(),
        ["0001_first", "0002_second", "0003_third"]
    );
}

/// A migration whose body issues raw SQL through the pool.
struct SqlMigration;

#[async_trait]
impl Migration for SqlMigration {
    fn id(&self) -> &str {
        "0001_unban_everyone"
    }

    async fn apply(&self, pool: &Pool) -> Result<()> {
        pool.execute("UPDATE \"users\" SET \"banned\" = false", Vec::new())
            .await?;
        Ok(())
    }
}

#[tokio::test]
async fn migration_bodies_execute_against_the_destination() {
    let driver = MemoryDriver::new();
    let state = driver.state();
    let pool = Pool::new(driver).await.unwrap();

    let migrations: Vec<Box<dyn Migration>> = vec![Box::new(SqlMigration)];
    migrate::run(&pool, &migrations).await.unwrap();

    assert_eq!(
        state.lock().unwrap().sql,
        ["UPDATE \"users\" SET \"banned\" = false"]
    );
}

#[tokio::test]
async fn run_applies_migrations_after_all_tables() {
    let driver = MemoryDriver::new();
    let state = driver.state();
    let pool = Pool::new(driver).await.unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut builder = Backup::builder();
    builder
        .table(
            TableDef::new("users")
                .column(ColumnDef::new("user_id", Type::String).source("id").unique()),
        )
        .migration(RecordingMigrationOwned {
            id: "0001_create_index",
            log: log.clone(),
        });
    let backup = builder.build().unwrap();

    let mut source =
        MemorySource::new().with_collection("users", vec![doc(&[("id", "u1")])]);
    let report = backup.run(&mut source, &pool).await.unwrap();

    assert_eq!(report.migrations.applied, ["0001_create_index"]);

    let state = state.lock().unwrap();
    // tracking table is only touched once the backup completed
    assert_eq!(state.created, ["users", "_larder_migrations"]);
}

/// `Builder::migration` takes the migration by value.
struct RecordingMigrationOwned {
    id: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Migration for RecordingMigrationOwned {
    fn id(&self) -> &str {
        self.id
    }

    async fn apply(&self, _pool: &Pool) -> Result<()> {
        self.log.lock().unwrap().push(self.id.to_string());
        Ok(())
    }
}
