//! Account number sequence migration.
//!
//! Moves the account-number counter into the database. The sequence starts
//! after any number already stored and only ever moves forward, so deleting
//! an account never frees its number for reuse.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(ACCOUNT_NUMBER_SEQ_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP SEQUENCE IF EXISTS account_number_seq;")
            .await?;
        Ok(())
    }
}

const ACCOUNT_NUMBER_SEQ_SQL: &str = r"
CREATE SEQUENCE IF NOT EXISTS account_number_seq
    AS BIGINT
    START WITH 11111111
    MINVALUE 11111111
    NO CYCLE
    OWNED BY accounts.number;

SELECT setval(
    'account_number_seq',
    GREATEST(COALESCE((SELECT MAX(number) FROM accounts), 0) + 1, 11111111),
    false
);
";
