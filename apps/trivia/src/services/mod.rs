pub mod auth;
pub mod gallery;
pub mod levels;
pub mod matches;
pub mod questions;
pub mod shop;

use std::future::Future;

use tracing::debug;

use crate::errors::domain::DomainError;

/// Re-run a read-modify-write closure while it loses compare-and-set races.
///
/// Every other outcome (success or any other error) is returned as-is. After
/// `limit` lost races the last optimistic-lock conflict is surfaced.
pub(crate) async fn with_cas_retry<T, F, Fut>(
    operation: &'static str,
    limit: u32,
    mut attempt: F,
) -> Result<T, DomainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    let mut attempt_no = 0u32;
    loop {
        attempt_no += 1;
        match attempt().await {
            Err(e) if e.is_optimistic_lock() && attempt_no < limit => {
                debug!(operation, attempt = attempt_no, "Lost write race, re-reading");
            }
            other => return other,
        }
    }
}
