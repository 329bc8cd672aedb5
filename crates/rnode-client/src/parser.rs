//! Parsing of exploratory-deploy responses.
//!
//! The balance term sends a list of `(address, balance)` tuples to its
//! return channel. RNode encodes it as:
//!
//! ```json
//! { "expr": [ { "ExprList": { "data": [
//!     { "ExprTuple": { "data": [
//!         { "ExprString": { "data": "1111..." } },
//!         { "ExprInt": { "data": 100 } } ] } } ] } } ],
//!   "block": { "blockNumber": 908300, ... } }
//! ```

use rev_verify_core::{QueryError, RawResponse, ReportedPair, ResponseParser};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ExploreDeployResponse {
    expr: Vec<RhoExpr>,
    #[serde(default)]
    block: Option<BlockInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockInfo {
    block_number: Option<i64>,
    block_hash: Option<String>,
}

#[derive(Debug, Deserialize)]
enum RhoExpr {
    ExprList { data: Vec<RhoExpr> },
    ExprTuple { data: Vec<RhoExpr> },
    ExprString { data: String },
    ExprInt { data: i64 },
}

/// Parses `ExprList` of `(ExprString, ExprInt)` tuples into balances.
#[derive(Debug, Default, Clone)]
pub struct ExploreDeployParser;

impl ExploreDeployParser {
    fn balance_pair(item: RhoExpr) -> Result<ReportedPair, QueryError> {
        let data = match item {
            RhoExpr::ExprTuple { data } => data,
            other => {
                return Err(QueryError::malformed(format!(
                    "expected a balance tuple, got {other:?}"
                )))
            }
        };
        match <[RhoExpr; 2]>::try_from(data) {
            Ok([RhoExpr::ExprString { data: key }, RhoExpr::ExprInt { data: balance }]) => {
                let reported = u64::try_from(balance).map_err(|_| {
                    QueryError::malformed(format!("negative balance {balance} for {key}"))
                })?;
                Ok(ReportedPair { key, reported })
            }
            Ok(other) => Err(QueryError::malformed(format!(
                "expected (address, balance), got {other:?}"
            ))),
            Err(data) => Err(QueryError::malformed(format!(
                "expected a 2-tuple, got {} elements",
                data.len()
            ))),
        }
    }
}

impl ResponseParser for ExploreDeployParser {
    fn parse(&self, response: RawResponse) -> Result<Vec<ReportedPair>, QueryError> {
        let response: ExploreDeployResponse = serde_json::from_value(response.body)
            .map_err(|e| QueryError::malformed(format!("unexpected response shape: {e}")))?;

        if let Some(block) = &response.block {
            tracing::debug!(
                "Exploratory deploy evaluated on block {:?} ({:?})",
                block.block_number,
                block.block_hash
            );
        }

        let mut pairs = Vec::new();
        for expr in response.expr {
            let data = match expr {
                RhoExpr::ExprList { data } => data,
                other => {
                    return Err(QueryError::malformed(format!(
                        "expected a list of balances, got {other:?}"
                    )))
                }
            };
            for item in data {
                pairs.push(Self::balance_pair(item)?);
            }
        }
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tuple(addr: &str, balance: i64) -> serde_json::Value {
        json!({ "ExprTuple": { "data": [
            { "ExprString": { "data": addr } },
            { "ExprInt": { "data": balance } }
        ] } })
    }

    fn parse(body: serde_json::Value) -> Result<Vec<ReportedPair>, QueryError> {
        ExploreDeployParser.parse(RawResponse::new(body))
    }

    #[test]
    fn test_parse_balances() {
        let body = json!({
            "expr": [ { "ExprList": { "data": [ tuple("1111a", 10), tuple("1111b", 0) ] } } ],
            "block": { "blockNumber": 908300, "blockHash": "abc" }
        });
        let pairs = parse(body).unwrap();
        assert_eq!(
            pairs,
            vec![ReportedPair::new("1111a", 10), ReportedPair::new("1111b", 0)]
        );
    }

    #[test]
    fn test_parse_multiple_lists_flattened() {
        let body = json!({ "expr": [
            { "ExprList": { "data": [ tuple("1111a", 1) ] } },
            { "ExprList": { "data": [ tuple("1111b", 2) ] } }
        ] });
        assert_eq!(parse(body).unwrap().len(), 2);
    }

    #[test]
    fn test_empty_expr_yields_no_pairs() {
        assert!(parse(json!({ "expr": [] })).unwrap().is_empty());
    }

    #[test]
    fn test_missing_expr_is_malformed() {
        let err = parse(json!({ "block": {} })).unwrap_err();
        assert!(matches!(err, QueryError::MalformedResponse(_)));
    }

    #[test]
    fn test_wrong_tuple_shape_is_malformed() {
        let body = json!({ "expr": [ { "ExprList": { "data": [
            { "ExprTuple": { "data": [ { "ExprString": { "data": "1111a" } } ] } }
        ] } } ] });
        assert!(matches!(
            parse(body).unwrap_err(),
            QueryError::MalformedResponse(_)
        ));
    }

    #[test]
    fn test_negative_balance_is_malformed() {
        let body = json!({ "expr": [ { "ExprList": { "data": [ tuple("1111a", -5) ] } } ] });
        let err = parse(body).unwrap_err();
        assert!(err.to_string().contains("negative balance"));
    }

    #[test]
    fn test_non_list_expr_is_malformed() {
        let body = json!({ "expr": [ { "ExprBool": { "data": true } } ] });
        assert!(parse(body).is_err());
    }
}
