//! Account balance checker
//!
//! Fetches `{base}/deposits/{account}` through an injected [`Fetcher`] and
//! reports whether credits exceed debits.

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::fetch::Fetcher;

/// Default deposits service
pub const DEFAULT_ACCOUNTS_URL: &str = "https://www.example.com";

/// URL of the deposits record for `account`
pub fn deposits_url(base_url: &str, account: &str) -> String {
    format!("{}/deposits/{}", base_url.trim_end_matches('/'), account)
}

/// `true` when `amountCredits > amountDebits`
///
/// Transport and status failures are errors. A record missing either amount
/// (or holding a non-number) is not in credit.
pub async fn check_balance(fetcher: &dyn Fetcher, base_url: &str, account: &str) -> Result<bool> {
    let url = deposits_url(base_url, account);
    let record = fetcher.get_json(&url).await?;
    let in_credit = is_in_credit(&record);
    debug!(account, in_credit, "balance checked");
    Ok(in_credit)
}

fn is_in_credit(record: &Value) -> bool {
    let credits = record.get("amountCredits").and_then(Value::as_f64);
    let debits = record.get("amountDebits").and_then(Value::as_f64);
    match (credits, debits) {
        (Some(c), Some(d)) => c > d,
        _ => false,
    }
}
