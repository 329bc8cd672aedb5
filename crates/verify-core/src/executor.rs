//! Query execution against the remote service.
//!
//! The pipeline only sees three seams: how a batch becomes a query
//! ([`QueryBuilder`]), how a query is sent ([`QueryTransport`]), and how a
//! response becomes reported balances ([`ResponseParser`]).

use crate::error::{QueryError, VerifyError};
use crate::types::{Batch, QueryDescriptor, RawResponse, ReportedPair};
use std::sync::Arc;
use tracing::debug;

/// Builds the remote query for one batch. Must be deterministic.
pub trait QueryBuilder: Send + Sync {
    fn build_query(&self, batch: &Batch) -> QueryDescriptor;
}

/// Sends one query to the remote service.
///
/// Timeouts are the transport's responsibility and surface as
/// [`QueryError::Transport`].
#[async_trait::async_trait]
pub trait QueryTransport: Send + Sync {
    async fn submit_query(&self, query: &QueryDescriptor) -> Result<RawResponse, QueryError>;
}

/// Parses a raw response into reported balances.
pub trait ResponseParser: Send + Sync {
    fn parse(&self, response: RawResponse) -> Result<Vec<ReportedPair>, QueryError>;
}

/// Sends a query exactly once and parses its response. No retries, no caching.
#[derive(Clone)]
pub struct QueryExecutor {
    transport: Arc<dyn QueryTransport>,
    parser: Arc<dyn ResponseParser>,
}

impl QueryExecutor {
    pub fn new(transport: Arc<dyn QueryTransport>, parser: Arc<dyn ResponseParser>) -> Self {
        Self { transport, parser }
    }

    pub async fn execute(&self, query: &QueryDescriptor) -> Result<Vec<ReportedPair>, VerifyError> {
        let batch = query.batch_id;
        let response = self
            .transport
            .submit_query(query)
            .await
            .map_err(|source| VerifyError::BatchQueryFailed { batch, source })?;
        let pairs = self
            .parser
            .parse(response)
            .map_err(|source| VerifyError::BatchQueryFailed { batch, source })?;
        debug!("Batch {} returned {} balances", batch, pairs.len());
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingTransport {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl QueryTransport for CountingTransport {
        async fn submit_query(&self, query: &QueryDescriptor) -> Result<RawResponse, QueryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(QueryError::transport("connection refused"));
            }
            Ok(RawResponse::new(json!({ "payload": query.payload })))
        }
    }

    struct PayloadParser;

    impl ResponseParser for PayloadParser {
        fn parse(&self, response: RawResponse) -> Result<Vec<ReportedPair>, QueryError> {
            let payload = response
                .body
                .get("payload")
                .and_then(|p| p.as_str())
                .ok_or_else(|| QueryError::malformed("no payload"))?;
            Ok(payload
                .split(',')
                .map(|key| ReportedPair::new(key, 1))
                .collect())
        }
    }

    struct RejectingParser;

    impl ResponseParser for RejectingParser {
        fn parse(&self, _response: RawResponse) -> Result<Vec<ReportedPair>, QueryError> {
            Err(QueryError::malformed("unexpected shape"))
        }
    }

    fn query() -> QueryDescriptor {
        QueryDescriptor {
            batch_id: 4,
            payload: "a,b".to_string(),
        }
    }

    #[tokio::test]
    async fn test_execute_success_calls_once() {
        let transport = Arc::new(CountingTransport {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let executor = QueryExecutor::new(transport.clone(), Arc::new(PayloadParser));
        let pairs = executor.execute(&query()).await.unwrap();
        assert_eq!(pairs, vec![ReportedPair::new("a", 1), ReportedPair::new("b", 1)]);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_identifies_batch() {
        let transport = Arc::new(CountingTransport {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let executor = QueryExecutor::new(transport.clone(), Arc::new(PayloadParser));
        let err = executor.execute(&query()).await.unwrap_err();
        match err {
            VerifyError::BatchQueryFailed { batch, source } => {
                assert_eq!(batch, 4);
                assert!(matches!(source, QueryError::Transport { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        // no retry
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_malformed_response_fails_batch() {
        let transport = Arc::new(CountingTransport {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let executor = QueryExecutor::new(transport, Arc::new(RejectingParser));
        let err = executor.execute(&query()).await.unwrap_err();
        assert!(matches!(
            err,
            VerifyError::BatchQueryFailed {
                batch: 4,
                source: QueryError::MalformedResponse(_)
            }
        ));
    }
}
