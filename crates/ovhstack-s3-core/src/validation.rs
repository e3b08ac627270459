//! Name validation.
//!
//! Bucket names follow the
//! [Amazon S3 naming rules](https://docs.aws.amazon.com/AmazonS3/latest/userguide/bucketnamingrules.html),
//! which the OVH S3 endpoint also enforces.

use std::net::Ipv4Addr;

use crate::error::NamingError;

/// Minimum bucket name length.
const MIN_BUCKET_NAME_LEN: usize = 3;

/// Maximum bucket name length.
const MAX_BUCKET_NAME_LEN: usize = 63;

/// Validate a bucket name.
///
/// Rules:
/// - 3-63 characters long
/// - Only lowercase letters, numbers, hyphens, and dots
/// - Must start and end with a letter or number
/// - No consecutive dots (`..`)
/// - Not formatted as an IPv4 address
/// - Must not start with `xn--` or `sthree-`, nor end with `-s3alias`
///
/// # Examples
///
/// ```
/// use ovhstack_s3_core::validation::validate_bucket_name;
///
/// assert!(validate_bucket_name("dossierfacile-raw-file-prod").is_ok());
/// assert!(validate_bucket_name("AB").is_err());
/// ```
pub fn validate_bucket_name(name: &str) -> Result<(), NamingError> {
    let invalid = |reason: &str| {
        Err(NamingError::InvalidBucketName {
            name: name.to_owned(),
            reason: reason.to_owned(),
        })
    };

    if !(MIN_BUCKET_NAME_LEN..=MAX_BUCKET_NAME_LEN).contains(&name.len()) {
        return invalid(&format!(
            "Bucket name must be between {MIN_BUCKET_NAME_LEN} and {MAX_BUCKET_NAME_LEN} characters long"
        ));
    }

    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'.')
    {
        return invalid(
            "Bucket name must only contain lowercase letters, numbers, hyphens, and dots",
        );
    }

    let alnum = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    let bytes = name.as_bytes();
    if !alnum(bytes[0]) || !alnum(bytes[bytes.len() - 1]) {
        return invalid("Bucket name must start and end with a letter or number");
    }

    if name.contains("..") {
        return invalid("Bucket name must not contain consecutive dots");
    }

    if name.parse::<Ipv4Addr>().is_ok() {
        return invalid("Bucket name must not be formatted as an IP address");
    }

    if name.starts_with("xn--") || name.starts_with("sthree-") || name.ends_with("-s3alias") {
        return invalid("Bucket name uses a reserved prefix or suffix");
    }

    Ok(())
}

/// Validate a name segment: non-empty lowercase kebab-case
/// (`raw-file`, `api-tenant`), no leading, trailing, or doubled hyphen.
pub fn validate_segment(kind: &'static str, value: &str) -> Result<(), NamingError> {
    let well_formed = value.split('-').all(|part| {
        !part.is_empty()
            && part
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    });
    if well_formed {
        Ok(())
    } else {
        Err(NamingError::InvalidSegment {
            kind,
            value: value.to_owned(),
        })
    }
}
