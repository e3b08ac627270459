//! Bucket ARN helpers.

use crate::ModelError;

const S3_ARN_PREFIX: &str = "arn:aws:s3:::";

/// ARN of the bucket itself.
#[must_use]
pub fn bucket_arn(bucket: &str) -> String {
    format!("{S3_ARN_PREFIX}{bucket}")
}

/// The two resources a bucket statement covers: the bucket and every object in it.
#[must_use]
pub fn bucket_arn_pair(bucket: &str) -> [String; 2] {
    [bucket_arn(bucket), format!("{S3_ARN_PREFIX}{bucket}/*")]
}

/// Extract the bucket name from a bucket or bucket-objects ARN.
///
/// # Errors
/// Returns [`ModelError::InvalidArn`] if `arn` is not an S3 bucket ARN.
pub fn bucket_from_arn(arn: &str) -> Result<&str, ModelError> {
    let rest = arn
        .strip_prefix(S3_ARN_PREFIX)
        .ok_or_else(|| ModelError::InvalidArn(arn.to_owned()))?;
    let bucket = rest.strip_suffix("/*").unwrap_or(rest);
    if bucket.is_empty() || bucket.contains('/') {
        return Err(ModelError::InvalidArn(arn.to_owned()));
    }
    Ok(bucket)
}
