//! Account repository for database operations.

use async_trait::async_trait;
use bankline_core::account::{Account, AccountStore, NewAccount, StoreError};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set, SqlErr, Statement,
};
use tracing::debug;

use crate::entities::accounts;

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts an account row.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including unique violations on `number`.
    pub async fn insert(&self, account: &NewAccount) -> Result<accounts::Model, DbErr> {
        accounts::ActiveModel {
            first_name: Set(account.first_name.clone()),
            last_name: Set(account.last_name.clone()),
            number: Set(account.number),
            encrypted_password: Set(account.encrypted_password.clone()),
            balance: Set(account.balance),
            created_at: Set(account.created_at.naive_utc()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    /// Finds an account by row id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds an account by account number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_number(&self, number: i64) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::Number.eq(number))
            .one(&self.db)
            .await
    }

    /// Lists all accounts ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_all(&self) -> Result<Vec<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .order_by_asc(accounts::Column::Id)
            .all(&self.db)
            .await
    }

    /// Deletes an account by id, returning the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete_by_id(&self, id: i32) -> Result<u64, DbErr> {
        let result = accounts::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }

    /// Draws the next value of `account_number_seq`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the sequence is exhausted.
    pub async fn next_account_number(&self) -> Result<i64, DbErr> {
        let row = self
            .db
            .query_one(Statement::from_string(
                DbBackend::Postgres,
                "SELECT nextval('account_number_seq') AS number",
            ))
            .await?
            .ok_or_else(|| DbErr::Custom("nextval returned no row".to_string()))?;
        row.try_get("", "number")
    }
}

fn to_account(model: accounts::Model) -> Account {
    Account {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        number: model.number,
        encrypted_password: model.encrypted_password,
        balance: model.balance,
        created_at: model.created_at.and_utc(),
    }
}

#[allow(clippy::needless_pass_by_value)]
fn store_error(e: DbErr) -> StoreError {
    StoreError::Database(e.to_string())
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        match self.insert(&account).await {
            Ok(model) => {
                debug!(account_id = model.id, number = model.number, "Account persisted");
                Ok(to_account(model))
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(StoreError::DuplicateNumber(account.number))
            }
            Err(e) => Err(store_error(e)),
        }
    }

    async fn get(&self, id: i32) -> Result<Option<Account>, StoreError> {
        self.find_by_id(id)
            .await
            .map(|m| m.map(to_account))
            .map_err(store_error)
    }

    async fn get_by_number(&self, number: i64) -> Result<Option<Account>, StoreError> {
        self.find_by_number(number)
            .await
            .map(|m| m.map(to_account))
            .map_err(store_error)
    }

    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        self.find_all()
            .await
            .map(|rows| rows.into_iter().map(to_account).collect())
            .map_err(store_error)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        self.delete_by_id(id)
            .await
            .map(|rows| rows > 0)
            .map_err(store_error)
    }

    async fn next_number(&self) -> Result<i64, StoreError> {
        self.next_account_number().await.map_err(store_error)
    }
}
