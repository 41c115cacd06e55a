//! SQL helpers shared by the Pg repositories.

use crate::domain::{check_sort, Entity};
use crate::infrastructure::database::PgTx;
use crate::shared::error::StoreError;
use crate::shared::pagination::{Direction, Sort};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Build an `ORDER BY` clause from whitelisted sort properties.
///
/// `columns` maps each sortable property to its SQL expression and must
/// contain `id`, which is always appended as the final tie-breaker.
pub(crate) fn order_by<E: Entity>(
    sort: &[Sort],
    columns: &[(&str, &str)],
) -> Result<String, StoreError> {
    check_sort::<E>(sort)?;

    let column = |property: &str| {
        columns
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, c)| *c)
            .ok_or_else(|| StoreError::InvalidSort(property.to_string()))
    };

    let mut terms = Vec::with_capacity(sort.len() + 1);
    for s in sort {
        let expr = column(&s.property)?;
        terms.push(match s.direction {
            Direction::Asc => format!("{expr} ASC NULLS FIRST"),
            Direction::Desc => format!("{expr} DESC NULLS LAST"),
        });
    }
    terms.push(format!("{} ASC", column("id")?));

    Ok(format!("ORDER BY {}", terms.join(", ")))
}

/// Keep the shared id sequence ahead of an explicitly written id.
pub(crate) async fn advance_sequence(tx: &mut PgTx, id: i64) -> Result<(), StoreError> {
    sqlx::query(
        "SELECT setval('sequence_generator', GREATEST($1, (SELECT last_value FROM sequence_generator)))",
    )
    .bind(id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Count the rows of a table.
pub(crate) async fn count(tx: &mut PgTx, table: &'static str) -> Result<u64, StoreError> {
    let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(&mut **tx)
        .await?;
    Ok(total.max(0) as u64)
}

/// Turn constraint violations on writes into conflicts.
pub(crate) fn write_error(err: sqlx::Error) -> StoreError {
    if let Some(db) = err.as_database_error() {
        match db.code().as_deref() {
            Some(UNIQUE_VIOLATION) | Some(FOREIGN_KEY_VIOLATION) => {
                return StoreError::Conflict(db.message().to_string());
            }
            _ => {}
        }
    }
    StoreError::Database(err)
}
