use std::future::Future;
use std::time::Duration;

use crate::user::errors::UserError;

/// Run a user store call under a deadline.
///
/// On expiry the call future is dropped, which aborts the in-flight query,
/// and `UserError::Cancelled` is returned.
pub async fn with_deadline<T, F>(
    limit: Duration,
    operation: &'static str,
    call: F,
) -> Result<T, UserError>
where
    F: Future<Output = Result<T, UserError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                operation,
                timeout_ms = limit.as_millis() as u64,
                "User store call exceeded its deadline"
            );
            Err(UserError::Cancelled(format!(
                "{} did not complete within {}ms",
                operation,
                limit.as_millis()
            )))
        }
    }
}
