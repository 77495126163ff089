//! AWS client context
//!
//! Resolves the account ID, partition and region of the credentials the
//! provider runs with. The region comes from the provider configuration or
//! the standard AWS environment; account and partition come from STS.

use aws_config::Region;
use aws_sdk_sts::Client as StsClient;
use lodestar_core::provider::ClientContext;
use lodestar_identity::Arn;

use crate::config::ProviderConfig;
use crate::error::{ConfigError, ConfigResult};

/// Client context backed by the AWS SDK
#[derive(Debug, Clone)]
pub struct AwsClientContext {
    account_id: String,
    partition: String,
    region: String,
}

impl AwsClientContext {
    /// Load the shared SDK configuration and ask STS who we are
    pub async fn load(config: &ProviderConfig) -> ConfigResult<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let region = sdk_config
            .region()
            .map(|r| r.as_ref().to_string())
            .ok_or(ConfigError::MissingRegion)?;

        let identity = StsClient::new(&sdk_config)
            .get_caller_identity()
            .send()
            .await
            .map_err(ConfigError::aws)?;

        let account_id = identity
            .account()
            .ok_or_else(|| ConfigError::Aws("GetCallerIdentity returned no account".to_string()))?
            .to_string();
        let partition = identity
            .arn()
            .and_then(partition_from_arn)
            .unwrap_or_else(|| "aws".to_string());

        log::debug!(
            "resolved client context: account {}, partition {}, region {}",
            account_id,
            partition,
            region
        );

        Ok(Self {
            account_id,
            partition,
            region,
        })
    }
}

impl ClientContext for AwsClientContext {
    fn account_id(&self) -> &str {
        &self.account_id
    }

    fn region(&self) -> &str {
        &self.region
    }

    fn partition(&self) -> &str {
        &self.partition
    }
}

/// Partition of a caller identity ARN (`arn:aws-cn:iam::...` -> `aws-cn`)
fn partition_from_arn(arn: &str) -> Option<String> {
    arn.parse::<Arn>().ok().map(|arn| arn.partition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_from_arn() {
        assert_eq!(
            partition_from_arn("arn:aws:sts::123456789012:assumed-role/admin/session").as_deref(),
            Some("aws")
        );
        assert_eq!(
            partition_from_arn("arn:aws-us-gov:iam::123456789012:user/ops").as_deref(),
            Some("aws-us-gov")
        );
        assert_eq!(partition_from_arn("not-an-arn"), None);
    }
}
