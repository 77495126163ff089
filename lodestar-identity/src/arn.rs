//! ARN - Amazon Resource Name parsing
//!
//! Format: `arn:partition:service:region:account-id:resource`. The resource
//! section is everything after the fifth colon and may itself contain `:` or
//! `/`. Region and account are empty for global resources.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

const ARN_PREFIX: &str = "arn:";
const ARN_SECTIONS: usize = 6;

static ACCOUNT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{12}$").expect("account ID pattern is valid"));

/// ARN parse error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArnError {
    #[error("missing \"arn:\" prefix")]
    InvalidPrefix,

    #[error("expected 6 colon-separated sections, got {0}")]
    NotEnoughSections(usize),

    #[error("the {0} section is empty")]
    EmptySection(&'static str),

    #[error("the account ID {0:?} is not a 12-digit number")]
    InvalidAccountId(String),

    #[error("a region is required for a regional resource")]
    MissingRegion,
}

/// A parsed ARN
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Arn {
    pub partition: String,
    pub service: String,
    pub region: String,
    pub account_id: String,
    pub resource: String,
}

impl Arn {
    /// Quick check without full validation
    pub fn is_arn(s: &str) -> bool {
        s.starts_with(ARN_PREFIX) && s.split(':').count() >= ARN_SECTIONS
    }

    /// Trailing identifier of the resource section
    ///
    /// `bucket/key/name` -> `name`, `function:my-fn` -> `my-fn`
    pub fn resource_id(&self) -> &str {
        self.resource
            .rsplit(['/', ':'])
            .next()
            .unwrap_or(&self.resource)
    }

    pub fn is_global(&self) -> bool {
        self.region.is_empty()
    }
}

impl FromStr for Arn {
    type Err = ArnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.starts_with(ARN_PREFIX) {
            return Err(ArnError::InvalidPrefix);
        }

        let sections: Vec<&str> = s.splitn(ARN_SECTIONS, ':').collect();
        if sections.len() != ARN_SECTIONS {
            return Err(ArnError::NotEnoughSections(sections.len()));
        }

        let (partition, service, region, account_id, resource) = (
            sections[1],
            sections[2],
            sections[3],
            sections[4],
            sections[5],
        );

        if partition.is_empty() {
            return Err(ArnError::EmptySection("partition"));
        }
        if service.is_empty() {
            return Err(ArnError::EmptySection("service"));
        }
        if resource.is_empty() {
            return Err(ArnError::EmptySection("resource"));
        }
        if !account_id.is_empty() && !ACCOUNT_ID.is_match(account_id) {
            return Err(ArnError::InvalidAccountId(account_id.to_string()));
        }

        Ok(Self {
            partition: partition.to_string(),
            service: service.to_string(),
            region: region.to_string(),
            account_id: account_id.to_string(),
            resource: resource.to_string(),
        })
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account_id, self.resource
        )
    }
}
