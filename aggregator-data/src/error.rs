use thiserror::Error;

/// All errors generated while fetching market data.
///
/// The variants only matter for logging: every one of them collapses to the
/// same per-exchange "no data" outcome at the [`MarketClient`](crate::client::MarketClient)
/// boundary, and none propagates to the polling loops.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status: {0}")]
    Status(reqwest::StatusCode),

    #[error("exchange rejected request: retCode {code}: {message}")]
    Api { code: i64, message: String },

    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empty result set for {0}")]
    Empty(&'static str),
}

impl DataError {
    /// Short classification tag used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            DataError::Transport(_) => "transport",
            DataError::Status(_) => "status",
            DataError::Api { .. } => "api",
            DataError::Json(_) => "json",
            DataError::Empty(_) => "empty",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_error_kind() {
        struct TestCase {
            input: DataError,
            expected: &'static str,
        }

        let tests = vec![
            TestCase {
                // TC0: API envelope rejection
                input: DataError::Api {
                    code: 10001,
                    message: "params error".to_string(),
                },
                expected: "api",
            },
            TestCase {
                // TC1: empty result set
                input: DataError::Empty("tickers"),
                expected: "empty",
            },
            TestCase {
                // TC2: non-success HTTP status
                input: DataError::Status(reqwest::StatusCode::TOO_MANY_REQUESTS),
                expected: "status",
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            assert_eq!(test.input.kind(), test.expected, "TC{} failed", index);
        }
    }
}
