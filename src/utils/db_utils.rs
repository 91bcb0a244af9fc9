use chrono::NaiveDate;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteRow;

/// SQL bindable value for dynamically assembled WHERE clauses.
#[derive(Debug, Clone)]
pub enum SqlValue {
    Text(String),
    I64(i64),
    Date(NaiveDate),
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::I64(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

/// Joins accumulated conditions into a WHERE clause, empty when unfiltered.
pub fn where_clause(conditions: &[&str]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    }
}

/// Runs a dynamically built query, binding filter values in accumulation
/// order.
pub async fn fetch_all_as<O>(
    pool: &SqlitePool,
    sql: &str,
    values: &[SqlValue],
) -> Result<Vec<O>, sqlx::Error>
where
    O: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin,
{
    let mut query = sqlx::query_as::<_, O>(sql);
    for value in values {
        query = match value {
            SqlValue::Text(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
        };
    }
    query.fetch_all(pool).await
}
