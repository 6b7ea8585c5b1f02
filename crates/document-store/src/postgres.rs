use std::time::Duration;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::{Arguments, PgPool, Postgres};

use crate::store::{Document, DocumentStore, validate_document};
use crate::{Condition, Filter, Page, PageRequest, Result, Sort, SortDirection, StoreError};

/// PostgreSQL-backed document store.
///
/// Every collection lives in the single `documents` table as JSONB bodies
/// tagged with their collection name.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

/// A positional query parameter.
#[derive(Debug, Clone)]
enum Bind {
    Text(String),
    Json(Value),
    Int(i64),
}

/// A compiled `WHERE` clause with its parameters, `$1` first.
#[derive(Debug, Clone)]
struct Predicate {
    sql: String,
    binds: Vec<Bind>,
}

impl Predicate {
    fn compile(collection: &str, filter: &Filter) -> Self {
        let mut predicate = Self {
            sql: "collection = $1".to_string(),
            binds: vec![Bind::Text(collection.to_string())],
        };

        for condition in filter.conditions() {
            match condition {
                Condition::Eq { field, value } => {
                    let key = predicate.push(Bind::Text(field.clone()));
                    let value = predicate.push(Bind::Json(value.clone()));
                    predicate
                        .sql
                        .push_str(&format!(" AND body -> {key} = {value}"));
                }
                Condition::ContainsIgnoreCase { field, needle } => {
                    if needle.is_empty() {
                        continue;
                    }
                    let key = predicate.push(Bind::Text(field.clone()));
                    let pattern =
                        predicate.push(Bind::Text(format!("%{}%", escape_like(needle))));
                    predicate
                        .sql
                        .push_str(&format!(" AND body ->> {key} ILIKE {pattern}"));
                }
            }
        }

        predicate
    }

    /// Appends a parameter and returns its placeholder.
    fn push(&mut self, bind: Bind) -> String {
        self.binds.push(bind);
        format!("${}", self.binds.len())
    }

    fn arguments(&self) -> Result<PgArguments> {
        let mut args = PgArguments::default();
        for bind in &self.binds {
            let added = match bind {
                Bind::Text(s) => args.add(s.clone()),
                Bind::Json(v) => args.add(v.clone()),
                Bind::Int(i) => args.add(*i),
            };
            added.map_err(|e| StoreError::Backend(format!("failed to bind parameter: {e}")))?;
        }
        Ok(args)
    }
}

/// Escapes `LIKE` wildcards so the needle matches literally.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

const UPSERT_ATTEMPTS: u32 = 3;

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl PostgresDocumentStore {
    /// Creates a new PostgreSQL document store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a new pool to the given database URL.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        tracing::info!("running document store migrations");
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>> {
        let predicate = Predicate::compile(collection, filter);
        let sql = format!(
            "SELECT body FROM documents WHERE {} ORDER BY id ASC LIMIT 1",
            predicate.sql
        );

        let body = sqlx::query_scalar_with::<Postgres, Value, _>(&sql, predicate.arguments()?)
            .fetch_optional(&self.pool)
            .await?;
        Ok(body)
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&Sort>,
        page: PageRequest,
    ) -> Result<Page<Document>> {
        let predicate = Predicate::compile(collection, filter);

        let count_sql = format!("SELECT COUNT(*) FROM documents WHERE {}", predicate.sql);
        let total = sqlx::query_scalar_with::<Postgres, i64, _>(&count_sql, predicate.arguments()?)
            .fetch_one(&self.pool)
            .await?;

        let mut windowed = predicate.clone();
        let order_by = match sort {
            Some(sort) => {
                let key = windowed.push(Bind::Text(sort.field.clone()));
                let direction = match sort.direction {
                    SortDirection::Ascending => "ASC",
                    SortDirection::Descending => "DESC",
                };
                // Byte-wise collation, so ordering does not depend on the server locale.
                format!("(body ->> {key}) COLLATE \"C\" {direction}, id ASC")
            }
            None => "id ASC".to_string(),
        };
        let limit = windowed.push(Bind::Int(to_i64(page.size)));
        let offset = windowed.push(Bind::Int(to_i64(page.offset())));
        let sql = format!(
            "SELECT body FROM documents WHERE {} ORDER BY {order_by} LIMIT {limit} OFFSET {offset}",
            windowed.sql
        );

        let items: Vec<Value> = sqlx::query_scalar_with::<Postgres, Value, _>(&sql, windowed.arguments()?)
            .fetch(&self.pool)
            .try_collect()
            .await?;

        Ok(Page::new(items, u64::try_from(total).unwrap_or(0)))
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<()> {
        validate_document(&document)?;

        sqlx::query("INSERT INTO documents (collection, body) VALUES ($1, $2)")
            .bind(collection)
            .bind(document)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<()> {
        if documents.is_empty() {
            return Ok(());
        }
        for document in &documents {
            validate_document(document)?;
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO documents (collection, body)
            SELECT $1, value FROM jsonb_array_elements($2)
            "#,
        )
        .bind(collection)
        .bind(Value::Array(documents))
        .execute(&self.pool)
        .await?;

        tracing::debug!(
            collection,
            rows = inserted.rows_affected(),
            "inserted documents"
        );
        Ok(())
    }

    async fn upsert_one(
        &self,
        collection: &str,
        filter: &Filter,
        document: Document,
    ) -> Result<()> {
        validate_document(&document)?;

        let mut predicate = Predicate::compile(collection, filter);
        let body = predicate.push(Bind::Json(document.clone()));
        let update_sql = format!(
            r#"
            UPDATE documents SET body = {body}, updated_at = NOW()
            WHERE id = (SELECT id FROM documents WHERE {} ORDER BY id ASC LIMIT 1)
            "#,
            predicate.sql
        );

        // Two concurrent upserts can both miss on UPDATE; the unique index
        // rejects the second INSERT, and the retried UPDATE then finds the row.
        let mut attempt = 1;
        loop {
            match self
                .update_or_insert(collection, &update_sql, &predicate, &document)
                .await
            {
                Err(StoreError::Database(sqlx::Error::Database(e)))
                    if e.is_unique_violation() && attempt < UPSERT_ATTEMPTS =>
                {
                    tracing::debug!(collection, attempt, "upsert lost insert race, retrying");
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }
}

impl PostgresDocumentStore {
    async fn update_or_insert(
        &self,
        collection: &str,
        update_sql: &str,
        predicate: &Predicate,
        document: &Document,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_with::<Postgres, _>(update_sql, predicate.arguments()?)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            sqlx::query("INSERT INTO documents (collection, body) VALUES ($1, $2)")
                .bind(collection)
                .bind(document.clone())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn predicate_numbers_placeholders_in_order() {
        let filter = Filter::by("tag", "t1").contains_ignore_case("name", "fest");
        let predicate = Predicate::compile("event", &filter);

        assert_eq!(
            predicate.sql,
            "collection = $1 AND body -> $2 = $3 AND body ->> $4 ILIKE $5"
        );
        assert_eq!(predicate.binds.len(), 5);
        assert!(matches!(&predicate.binds[2], Bind::Json(v) if v == &json!("t1")));
        assert!(matches!(&predicate.binds[4], Bind::Text(p) if p == "%fest%"));
    }

    #[test]
    fn empty_search_adds_no_condition() {
        let filter = Filter::new().contains_ignore_case("name", "");
        let predicate = Predicate::compile("event", &filter);
        assert_eq!(predicate.sql, "collection = $1");
    }
}
