use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{AnimalDetails, AnimalKind, AnimalRecord, DogDetails, MonkeyDetails};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::{debug, info};

use crate::backend::domain::errors::{RescueError, RescueResult, ValidationError};
use crate::backend::storage::connection::DbConnection;
use crate::backend::storage::schema::{table_schema, TableSchema, DATE_FORMAT};
use crate::backend::storage::traits::AnimalStorage;

/// SQLite repository for one kind of animal
#[derive(Clone)]
pub struct AnimalRepository {
    db: DbConnection,
    kind: AnimalKind,
}

impl AnimalRepository {
    pub fn new(db: DbConnection, kind: AnimalKind) -> Self {
        Self { db, kind }
    }

    fn schema(&self) -> &'static TableSchema {
        table_schema(self.kind)
    }

    fn check_kind(&self, record: &AnimalRecord) -> RescueResult<()> {
        if record.kind() != self.kind {
            return Err(ValidationError::KindMismatch {
                expected: self.kind,
                actual: record.kind(),
            }
            .into());
        }
        Ok(())
    }

    async fn fetch_where(&self, filter: &str, reserved: Option<bool>) -> RescueResult<Vec<AnimalRecord>> {
        let sql = format!("{} {} ORDER BY id ASC", self.schema().select, filter);
        let mut query = sqlx::query(&sql);
        if let Some(reserved) = reserved {
            query = query.bind(reserved);
        }

        let rows = query.fetch_all(self.db.pool()).await?;
        let records = rows
            .iter()
            .map(|row| map_row(self.kind, row))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Fetched {} {}", records.len(), self.kind.plural());
        Ok(records)
    }

    async fn fetch_one(&self, filter: &str, query_value: FilterValue<'_>) -> RescueResult<Option<AnimalRecord>> {
        let sql = format!("{} {}", self.schema().select, filter);
        let query = sqlx::query(&sql);
        let query = match query_value {
            FilterValue::Id(id) => query.bind(id),
            FilterValue::Name(name) => query.bind(name),
        };

        let row = query.fetch_optional(self.db.pool()).await?;
        match row {
            Some(r) => Ok(Some(map_row(self.kind, &r)?)),
            None => Ok(None),
        }
    }
}

enum FilterValue<'a> {
    Id(i64),
    Name(&'a str),
}

#[async_trait]
impl AnimalStorage for AnimalRepository {
    async fn ensure_schema(&self) -> RescueResult<()> {
        let schema = self.schema();

        sqlx::query(schema.create_table)
            .execute(self.db.pool())
            .await?;

        sqlx::query(schema.create_reserved_index)
            .execute(self.db.pool())
            .await?;

        debug!("Ensured table {}", schema.table);
        Ok(())
    }

    async fn insert(&self, record: &AnimalRecord) -> RescueResult<AnimalRecord> {
        self.check_kind(record)?;

        let query = sqlx::query(self.schema().insert)
            .bind(&record.name)
            .bind(record.gender.as_str())
            .bind(i64::from(record.age))
            .bind(record.weight)
            .bind(record.acquisition_date.format(DATE_FORMAT).to_string())
            .bind(&record.acquisition_country)
            .bind(record.training_status.as_str())
            .bind(record.reserved)
            .bind(&record.in_service_country);

        let query = match &record.details {
            AnimalDetails::Dog(dog) => query.bind(&dog.breed),
            AnimalDetails::Monkey(monkey) => query
                .bind(&monkey.species)
                .bind(monkey.tail_length)
                .bind(monkey.height)
                .bind(monkey.body_length),
        };

        match query.execute(self.db.pool()).await {
            Ok(done) => {
                let id = done.last_insert_rowid();
                debug!("Inserted {} '{}' as row {}", self.kind, record.name, id);
                Ok(record.clone().with_id(id))
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                info!("Rejected duplicate {} name '{}'", self.kind, record.name);
                Err(RescueError::DuplicateName {
                    kind: self.kind,
                    name: record.name.clone(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, record: &AnimalRecord) -> RescueResult<()> {
        self.check_kind(record)?;

        let query = sqlx::query(self.schema().update)
            .bind(i64::from(record.age))
            .bind(record.weight)
            .bind(record.acquisition_date.format(DATE_FORMAT).to_string())
            .bind(&record.acquisition_country)
            .bind(record.training_status.as_str())
            .bind(&record.in_service_country);

        let query = match &record.details {
            AnimalDetails::Dog(dog) => query.bind(&dog.breed),
            AnimalDetails::Monkey(monkey) => query
                .bind(&monkey.species)
                .bind(monkey.tail_length)
                .bind(monkey.height)
                .bind(monkey.body_length),
        };

        let result = query.bind(&record.name).execute(self.db.pool()).await?;
        if result.rows_affected() == 0 {
            return Err(RescueError::not_found_name(self.kind, &record.name));
        }

        debug!("Updated {} '{}'", self.kind, record.name);
        Ok(())
    }

    async fn fetch_all(&self) -> RescueResult<Vec<AnimalRecord>> {
        self.fetch_where("", None).await
    }

    async fn fetch_by_name(&self, name: &str) -> RescueResult<Option<AnimalRecord>> {
        self.fetch_one("WHERE name = ?", FilterValue::Name(name)).await
    }

    async fn fetch_by_id(&self, id: i64) -> RescueResult<Option<AnimalRecord>> {
        self.fetch_one("WHERE id = ?", FilterValue::Id(id)).await
    }

    async fn fetch_available(&self) -> RescueResult<Vec<AnimalRecord>> {
        self.fetch_where("WHERE reserved = ?", Some(false)).await
    }

    async fn fetch_unavailable(&self) -> RescueResult<Vec<AnimalRecord>> {
        self.fetch_where("WHERE reserved = ?", Some(true)).await
    }

    async fn set_reserved(&self, id: i64, reserved: bool) -> RescueResult<()> {
        let result = sqlx::query(self.schema().set_reserved)
            .bind(reserved)
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(RescueError::not_found_id(self.kind, id));
        }

        debug!("Set reserved={} on {} {}", reserved, self.kind, id);
        Ok(())
    }
}

fn column_error<E>(column: &str, source: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    }
}

fn map_row(kind: AnimalKind, row: &SqliteRow) -> Result<AnimalRecord, sqlx::Error> {
    let details = match kind {
        AnimalKind::Dog => AnimalDetails::Dog(DogDetails {
            breed: row.try_get("breed")?,
        }),
        AnimalKind::Monkey => AnimalDetails::Monkey(MonkeyDetails {
            species: row.try_get("species")?,
            tail_length: row.try_get("tail_length")?,
            height: row.try_get("height")?,
            body_length: row.try_get("body_length")?,
        }),
    };

    let age: i64 = row.try_get("age")?;
    let gender: String = row.try_get("gender")?;
    let training_status: String = row.try_get("training_status")?;
    let acquisition_date: String = row.try_get("acquisition_date")?;

    Ok(AnimalRecord {
        id: Some(row.try_get("id")?),
        name: row.try_get("name")?,
        gender: gender.parse().map_err(|e| column_error("gender", e))?,
        age: u32::try_from(age).map_err(|e| column_error("age", e))?,
        weight: row.try_get("weight")?,
        acquisition_date: NaiveDate::parse_from_str(&acquisition_date, DATE_FORMAT)
            .map_err(|e| column_error("acquisition_date", e))?,
        acquisition_country: row.try_get("acquisition_country")?,
        training_status: training_status
            .parse()
            .map_err(|e| column_error("training_status", e))?,
        reserved: row.try_get("reserved")?,
        in_service_country: row.try_get("in_service_country")?,
        details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Gender, TrainingStatus};
    use std::collections::HashSet;
    use tempfile::TempDir;

    async fn setup_test(kind: AnimalKind) -> AnimalRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let repo = AnimalRepository::new(db, kind);
        repo.ensure_schema().await.expect("Failed to create schema");
        repo
    }

    fn dog(name: &str) -> AnimalRecord {
        AnimalRecord {
            id: None,
            name: name.to_string(),
            gender: Gender::Male,
            age: 3,
            weight: 25.5,
            acquisition_date: NaiveDate::from_ymd_opt(2022, 5, 1).unwrap(),
            acquisition_country: "USA".to_string(),
            training_status: TrainingStatus::Trained,
            reserved: false,
            in_service_country: "USA".to_string(),
            details: AnimalDetails::Dog(DogDetails {
                breed: "Lab".to_string(),
            }),
        }
    }

    fn monkey(name: &str) -> AnimalRecord {
        AnimalRecord {
            id: None,
            name: name.to_string(),
            gender: Gender::Female,
            age: 5,
            weight: 8.25,
            acquisition_date: NaiveDate::from_ymd_opt(2020, 11, 30).unwrap(),
            acquisition_country: "Peru".to_string(),
            training_status: TrainingStatus::Untrained,
            reserved: false,
            in_service_country: "Canada".to_string(),
            details: AnimalDetails::Monkey(MonkeyDetails {
                species: "Squirrel monkey".to_string(),
                tail_length: 38.5,
                height: 30.0,
                body_length: 32.75,
            }),
        }
    }

    fn ids(records: &[AnimalRecord]) -> HashSet<i64> {
        records.iter().filter_map(|r| r.id).collect()
    }

    #[tokio::test]
    async fn test_insert_and_fetch_by_name() {
        let repo = setup_test(AnimalKind::Dog).await;
        let rex = dog("Rex");

        let stored = repo.insert(&rex).await.expect("Failed to insert dog");
        assert!(stored.id.is_some());

        let fetched = repo
            .fetch_by_name("Rex")
            .await
            .expect("Failed to fetch dog")
            .expect("Dog should exist");

        assert_eq!(fetched, stored);
        assert_eq!(AnimalRecord { id: None, ..fetched }, rex);
    }

    #[tokio::test]
    async fn test_monkey_round_trips_every_column() {
        let repo = setup_test(AnimalKind::Monkey).await;
        let bingo = monkey("Bingo");

        let stored = repo.insert(&bingo).await.expect("Failed to insert monkey");
        let fetched = repo
            .fetch_by_id(stored.id.unwrap())
            .await
            .expect("Failed to fetch monkey")
            .expect("Monkey should exist");

        assert_eq!(AnimalRecord { id: None, ..fetched }, bingo);
    }

    #[tokio::test]
    async fn test_fetch_missing_record_is_none() {
        let repo = setup_test(AnimalKind::Dog).await;

        assert!(repo.fetch_by_name("Ghost").await.unwrap().is_none());
        assert!(repo.fetch_by_id(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let repo = setup_test(AnimalKind::Dog).await;
        repo.insert(&dog("Rex")).await.expect("Failed to insert dog");

        let mut second = dog("Rex");
        second.age = 9;
        let err = repo.insert(&second).await.unwrap_err();
        assert!(matches!(
            err,
            RescueError::DuplicateName { kind: AnimalKind::Dog, ref name } if name == "Rex"
        ));

        let all = repo.fetch_all().await.expect("Failed to fetch dogs");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].age, 3, "First row must not be overwritten");
    }

    #[tokio::test]
    async fn test_same_name_allowed_across_kinds() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let dogs = AnimalRepository::new(db.clone(), AnimalKind::Dog);
        let monkeys = AnimalRepository::new(db, AnimalKind::Monkey);
        dogs.ensure_schema().await.unwrap();
        monkeys.ensure_schema().await.unwrap();

        dogs.insert(&dog("Max")).await.expect("Failed to insert dog");
        monkeys.insert(&monkey("Max")).await.expect("Failed to insert monkey");

        assert_eq!(dogs.fetch_all().await.unwrap().len(), 1);
        assert_eq!(monkeys.fetch_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_rejects_other_kind() {
        let repo = setup_test(AnimalKind::Dog).await;

        let err = repo.insert(&monkey("Bingo")).await.unwrap_err();
        assert!(matches!(
            err,
            RescueError::Validation(ValidationError::KindMismatch {
                expected: AnimalKind::Dog,
                actual: AnimalKind::Monkey,
            })
        ));
        assert!(repo.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_all_in_insertion_order() {
        let repo = setup_test(AnimalKind::Dog).await;
        for name in ["Zeus", "Apollo", "Max"] {
            repo.insert(&dog(name)).await.expect("Failed to insert dog");
        }

        let names: Vec<String> = repo
            .fetch_all()
            .await
            .expect("Failed to fetch dogs")
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["Zeus", "Apollo", "Max"]);
    }

    #[tokio::test]
    async fn test_update_overwrites_mutable_fields_but_not_reserved() {
        let repo = setup_test(AnimalKind::Monkey).await;
        let stored = repo.insert(&monkey("Bingo")).await.unwrap();
        repo.set_reserved(stored.id.unwrap(), true).await.unwrap();

        let mut changed = stored.clone();
        changed.age = 6;
        changed.weight = 9.0;
        changed.training_status = TrainingStatus::Trained;
        changed.in_service_country = "Mexico".to_string();
        changed.reserved = false;
        if let AnimalDetails::Monkey(details) = &mut changed.details {
            details.height = 31.5;
        }
        repo.update(&changed).await.expect("Failed to update monkey");

        let fetched = repo.fetch_by_name("Bingo").await.unwrap().unwrap();
        assert_eq!(fetched.age, 6);
        assert_eq!(fetched.weight, 9.0);
        assert_eq!(fetched.training_status, TrainingStatus::Trained);
        assert_eq!(fetched.in_service_country, "Mexico");
        assert!(fetched.reserved, "Update must not touch the reservation flag");
        match fetched.details {
            AnimalDetails::Monkey(details) => assert_eq!(details.height, 31.5),
            other => panic!("Unexpected details: {:?}", other),
        }
        assert_eq!(fetched.id, stored.id);
    }

    #[tokio::test]
    async fn test_update_missing_name_is_not_found() {
        let repo = setup_test(AnimalKind::Dog).await;
        repo.insert(&dog("Rex")).await.unwrap();

        let err = repo.update(&dog("Ghost")).await.unwrap_err();
        assert!(matches!(err, RescueError::NotFound { kind: AnimalKind::Dog, .. }));

        let rex = repo.fetch_by_name("Rex").await.unwrap().unwrap();
        assert_eq!(AnimalRecord { id: None, ..rex }, dog("Rex"));
    }

    #[tokio::test]
    async fn test_available_and_unavailable_partition_all() {
        let repo = setup_test(AnimalKind::Dog).await;
        let mut stored = Vec::new();
        for name in ["Rex", "Fido", "Bella", "Duke"] {
            stored.push(repo.insert(&dog(name)).await.unwrap());
        }
        repo.set_reserved(stored[1].id.unwrap(), true).await.unwrap();
        repo.set_reserved(stored[3].id.unwrap(), true).await.unwrap();

        let all = ids(&repo.fetch_all().await.unwrap());
        let available = repo.fetch_available().await.unwrap();
        let unavailable = repo.fetch_unavailable().await.unwrap();

        assert!(available.iter().all(|r| !r.reserved));
        assert!(unavailable.iter().all(|r| r.reserved));

        let available = ids(&available);
        let unavailable = ids(&unavailable);
        assert!(available.is_disjoint(&unavailable));
        assert_eq!(&available | &unavailable, all);
        assert_eq!(unavailable.len(), 2);
    }

    #[tokio::test]
    async fn test_insert_keeps_reserved_flag_from_input() {
        let repo = setup_test(AnimalKind::Dog).await;
        let mut reserved = dog("Rex");
        reserved.reserved = true;
        repo.insert(&reserved).await.unwrap();

        assert!(repo.fetch_available().await.unwrap().is_empty());
        assert_eq!(repo.fetch_unavailable().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_set_reserved_unknown_id_is_not_found() {
        let repo = setup_test(AnimalKind::Monkey).await;

        let err = repo.set_reserved(7, true).await.unwrap_err();
        assert!(matches!(
            err,
            RescueError::NotFound { kind: AnimalKind::Monkey, .. }
        ));
    }

    #[tokio::test]
    async fn test_set_reserved_same_value_succeeds() {
        let repo = setup_test(AnimalKind::Dog).await;
        let id = repo.insert(&dog("Rex")).await.unwrap().id.unwrap();

        repo.set_reserved(id, true).await.unwrap();
        repo.set_reserved(id, true).await.expect("Re-reserving should be permitted");

        assert!(repo.fetch_by_id(id).await.unwrap().unwrap().reserved);
    }

    #[tokio::test]
    async fn test_schema_is_idempotent_and_survives_reopen() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("rescue.db");

        {
            let db = DbConnection::open(&path).await.unwrap();
            let repo = AnimalRepository::new(db, AnimalKind::Dog);
            repo.ensure_schema().await.unwrap();
            repo.ensure_schema().await.expect("Second schema call should be a no-op");
            repo.insert(&dog("Rex")).await.unwrap();
        }

        let db = DbConnection::open(&path).await.unwrap();
        let repo = AnimalRepository::new(db, AnimalKind::Dog);
        repo.ensure_schema().await.unwrap();

        let all = repo.fetch_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Rex");
    }

    #[tokio::test]
    async fn test_store_failure_maps_to_persistence_error() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let repo = AnimalRepository::new(db.clone(), AnimalKind::Dog);
        repo.ensure_schema().await.expect("Failed to create schema");
        sqlx::query("DROP TABLE dogs")
            .execute(db.pool())
            .await
            .expect("Failed to drop table");

        let err = repo.fetch_all().await.unwrap_err();
        assert!(matches!(err, RescueError::Persistence(_)));

        let err = repo.insert(&dog("Rex")).await.unwrap_err();
        assert!(matches!(err, RescueError::Persistence(_)));

        let err = repo.set_reserved(1, true).await.unwrap_err();
        assert!(matches!(err, RescueError::Persistence(_)));
    }
}
