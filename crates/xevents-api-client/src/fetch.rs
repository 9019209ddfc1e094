use futures::{stream, StreamExt as _};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

use crate::ApiClient;

/// Issues a GET for each endpoint with at most `concurrency` in flight at once
///
/// Every endpoint gets an entry in the result. Endpoints that failed for any
/// reason (including responding with anything but `200 OK`) map to `None` and
/// do not affect the others.
#[tracing::instrument(skip(client))]
pub async fn fetch_all(
    client: &ApiClient,
    endpoints: &[&str],
    concurrency: usize,
) -> HashMap<String, Option<Value>> {
    stream::iter(endpoints)
        .map(|&endpoint| async move {
            let outcome = match client.get_exact_ok(endpoint).await {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(endpoint, ?e, "fetch failed");
                    None
                }
            };
            (endpoint.to_string(), outcome)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await
}
