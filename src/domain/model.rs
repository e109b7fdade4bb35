use crate::utils::error::{LoadError, Result};
use crate::utils::validation::validate_range;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const ACCOUNT_LENGTH: usize = 8;
pub const MIN_AMOUNT: f64 = 50.0;
pub const MAX_AMOUNT: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    OnHold,
}

/// Payload posted to the transactions API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    from_account: String,
    to_account: String,
    amount: f64,
    status: TransactionStatus,
}

impl TransactionRequest {
    /// Builds an on-hold request, rejecting account names that are not
    /// eight lowercase ASCII letters and amounts outside [50, 500].
    pub fn new(
        from_account: impl Into<String>,
        to_account: impl Into<String>,
        amount: f64,
    ) -> Result<Self> {
        let from_account = from_account.into();
        let to_account = to_account.into();
        validate_account("fromAccount", &from_account)?;
        validate_account("toAccount", &to_account)?;

        if !amount.is_finite() {
            return Err(LoadError::InvalidRequestError {
                field: "amount".to_string(),
                reason: format!("{} is not a finite number", amount),
            });
        }
        let amount = round_cents(amount);
        validate_range("amount", amount, MIN_AMOUNT, MAX_AMOUNT).map_err(|e| {
            LoadError::InvalidRequestError {
                field: "amount".to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            from_account,
            to_account,
            amount,
            status: TransactionStatus::OnHold,
        })
    }

    /// Assembles a request from values the generator already keeps in range.
    pub(crate) fn from_generated(
        from_account: String,
        to_account: String,
        amount: f64,
        status: TransactionStatus,
    ) -> Self {
        Self {
            from_account,
            to_account,
            amount,
            status,
        }
    }

    pub fn from_account(&self) -> &str {
        &self.from_account
    }

    pub fn to_account(&self) -> &str {
        &self.to_account
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }
}

fn validate_account(field: &str, value: &str) -> Result<()> {
    if value.len() != ACCOUNT_LENGTH || !value.bytes().all(|b| b.is_ascii_lowercase()) {
        return Err(LoadError::InvalidRequestError {
            field: field.to_string(),
            reason: format!(
                "expected {} lowercase letters, got '{}'",
                ACCOUNT_LENGTH, value
            ),
        });
    }
    Ok(())
}

pub(crate) fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Raw view of one HTTP exchange, as seen by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub retry_after: Option<String>,
    pub body: String,
}

/// Classification of a single call.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    Success { body: serde_json::Value },
    RateLimited { retry_after_secs: Option<u64> },
    Failure { status: u16, body: String },
}

impl CallOutcome {
    pub fn from_reply(reply: HttpReply) -> Self {
        match reply.status {
            201 => {
                let body = serde_json::from_str(&reply.body)
                    .unwrap_or(serde_json::Value::String(reply.body));
                CallOutcome::Success { body }
            }
            429 => CallOutcome::RateLimited {
                retry_after_secs: reply.retry_after.as_deref().and_then(parse_retry_after),
            },
            status => CallOutcome::Failure {
                status,
                body: reply.body,
            },
        }
    }

    /// Seconds to wait before the next call, if the server asked for a wait
    /// that can actually be honored.
    pub fn cooldown_secs(&self) -> Option<u64> {
        match self {
            CallOutcome::RateLimited {
                retry_after_secs: Some(secs),
            } if *secs > 0 => Some(*secs),
            _ => None,
        }
    }
}

/// Parses the delay-seconds form of `Retry-After`. HTTP-date values are not
/// supported and yield `None`.
pub fn parse_retry_after(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

impl fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallOutcome::Success { body } => write!(f, "Transaction successful: {}", body),
            CallOutcome::RateLimited {
                retry_after_secs: Some(secs),
            } => write!(f, "Rate limit exceeded. Retry-After: {} seconds", secs),
            CallOutcome::RateLimited {
                retry_after_secs: None,
            } => write!(f, "Rate limit exceeded. Retry-After: none"),
            CallOutcome::Failure { status, body } => write!(f, "Error: {} - {}", status, body),
        }
    }
}

/// Totals for one driver run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub calls: u64,
    pub successes: u64,
    pub failures: u64,
    pub rate_limited: u64,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &CallOutcome) {
        self.calls += 1;
        match outcome {
            CallOutcome::Success { .. } => self.successes += 1,
            CallOutcome::RateLimited { .. } => self.rate_limited += 1,
            CallOutcome::Failure { .. } => self.failures += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(status: u16, retry_after: Option<&str>, body: &str) -> HttpReply {
        HttpReply {
            status,
            retry_after: retry_after.map(str::to_string),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_request_serializes_with_camel_case_fields() {
        let request = TransactionRequest::new("abcdefgh", "zyxwvuts", 123.45).unwrap();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "fromAccount": "abcdefgh",
                "toAccount": "zyxwvuts",
                "amount": 123.45,
                "status": "ON_HOLD"
            })
        );
    }

    #[test]
    fn test_request_rejects_bad_accounts() {
        assert!(TransactionRequest::new("abc", "zyxwvuts", 100.0).is_err());
        assert!(TransactionRequest::new("ABCDEFGH", "zyxwvuts", 100.0).is_err());
        assert!(TransactionRequest::new("abcdefgh", "zyxwvut1", 100.0).is_err());
    }

    #[test]
    fn test_request_amount_bounds() {
        assert!(TransactionRequest::new("abcdefgh", "zyxwvuts", 50.0).is_ok());
        assert!(TransactionRequest::new("abcdefgh", "zyxwvuts", 500.0).is_ok());
        assert!(TransactionRequest::new("abcdefgh", "zyxwvuts", 49.99).is_err());
        assert!(TransactionRequest::new("abcdefgh", "zyxwvuts", 500.01).is_err());
        assert!(TransactionRequest::new("abcdefgh", "zyxwvuts", f64::NAN).is_err());

        let rounded = TransactionRequest::new("abcdefgh", "zyxwvuts", 99.999).unwrap();
        assert_eq!(rounded.amount(), 100.0);
    }

    #[test]
    fn test_classify_created() {
        let outcome = CallOutcome::from_reply(reply(201, None, r#"{"id":1}"#));
        assert_eq!(
            outcome,
            CallOutcome::Success {
                body: serde_json::json!({"id": 1})
            }
        );
        assert!(outcome.to_string().contains(r#"{"id":1}"#));
    }

    #[test]
    fn test_classify_created_with_non_json_body() {
        let outcome = CallOutcome::from_reply(reply(201, None, "created"));
        assert_eq!(
            outcome,
            CallOutcome::Success {
                body: serde_json::Value::String("created".to_string())
            }
        );
    }

    #[test]
    fn test_classify_rate_limited() {
        let outcome = CallOutcome::from_reply(reply(429, Some("5"), ""));
        assert_eq!(
            outcome,
            CallOutcome::RateLimited {
                retry_after_secs: Some(5)
            }
        );
        assert_eq!(outcome.cooldown_secs(), Some(5));

        let missing = CallOutcome::from_reply(reply(429, None, ""));
        assert_eq!(missing, CallOutcome::RateLimited { retry_after_secs: None });
        assert_eq!(missing.cooldown_secs(), None);
    }

    #[test]
    fn test_retry_after_parsing() {
        assert_eq!(parse_retry_after(" 12 "), Some(12));
        assert_eq!(parse_retry_after("soon"), None);
        assert_eq!(parse_retry_after("-3"), None);
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);

        let zero = CallOutcome::from_reply(reply(429, Some("0"), ""));
        assert_eq!(zero.cooldown_secs(), None);
    }

    #[test]
    fn test_classify_other_statuses_as_failure() {
        let outcome = CallOutcome::from_reply(reply(500, None, "boom"));
        assert_eq!(
            outcome,
            CallOutcome::Failure {
                status: 500,
                body: "boom".to_string()
            }
        );
        assert_eq!(outcome.to_string(), "Error: 500 - boom");

        let ok_but_not_created = CallOutcome::from_reply(reply(200, None, "{}"));
        assert!(matches!(ok_but_not_created, CallOutcome::Failure { status: 200, .. }));
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = RunSummary::default();
        summary.record(&CallOutcome::Success {
            body: serde_json::Value::Null,
        });
        summary.record(&CallOutcome::RateLimited {
            retry_after_secs: None,
        });
        summary.record(&CallOutcome::Failure {
            status: 503,
            body: String::new(),
        });
        assert_eq!(
            summary,
            RunSummary {
                calls: 3,
                successes: 1,
                failures: 1,
                rate_limited: 1
            }
        );
    }
}
