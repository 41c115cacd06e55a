//! Unit of Work for PostgreSQL repositories.
//!
//! Each Pg repository is its own [`UnitOfWork`](crate::domain::UnitOfWork):
//! the transaction handle is a plain SQLx transaction, which rolls back
//! when dropped without commit.

use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::TxMode;
use crate::shared::error::StoreError;

/// Transaction handle shared by all Pg repositories.
pub type PgTx = Transaction<'static, Postgres>;

/// Begin a transaction, marking it read-only when asked.
pub async fn begin_transaction(pool: &PgPool, mode: TxMode) -> Result<PgTx, StoreError> {
    let mut tx = pool.begin().await?;
    if mode == TxMode::ReadOnly {
        sqlx::query("SET TRANSACTION READ ONLY")
            .execute(&mut *tx)
            .await?;
    }
    Ok(tx)
}

/// Implement `UnitOfWork` for a repository holding a `pool: PgPool` field.
macro_rules! pg_unit_of_work {
    ($repo:ty) => {
        #[async_trait::async_trait]
        impl $crate::domain::UnitOfWork for $repo {
            type Tx = $crate::infrastructure::database::PgTx;

            async fn begin(
                &self,
                mode: $crate::domain::TxMode,
            ) -> Result<Self::Tx, $crate::shared::error::StoreError> {
                $crate::infrastructure::database::begin_transaction(&self.pool, mode).await
            }

            async fn commit(&self, tx: Self::Tx) -> Result<(), $crate::shared::error::StoreError> {
                tx.commit().await?;
                Ok(())
            }

            async fn rollback(
                &self,
                tx: Self::Tx,
            ) -> Result<(), $crate::shared::error::StoreError> {
                tx.rollback().await?;
                Ok(())
            }
        }
    };
}

pub(crate) use pg_unit_of_work;
