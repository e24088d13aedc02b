//! Demo data for `--seed`.

use std::sync::Arc;

use bankline_api::AppState;
use bankline_core::account::{Account, open_account};
use tracing::info;

/// Demo accounts as (first name, last name, password).
const DEMO_ACCOUNTS: [(&str, &str, &str); 3] = [
    ("John", "Doe", "password"),
    ("Jane", "Doe", "password"),
    ("Alice", "Bob", "password"),
];

/// Creates the demo accounts. Stops at the first failure.
pub async fn seed_accounts(state: &AppState) -> anyhow::Result<Vec<Account>> {
    let mut seeded = Vec::with_capacity(DEMO_ACCOUNTS.len());

    for (first_name, last_name, password) in DEMO_ACCOUNTS {
        let account = open_account(
            state.accounts.as_ref(),
            Arc::clone(&state.password_service),
            first_name,
            last_name,
            password.to_string(),
        )
        .await?;
        info!(
            account_id = account.id,
            number = account.number,
            "Seeded account {first_name} {last_name}"
        );
        seeded.push(account);
    }

    Ok(seeded)
}
