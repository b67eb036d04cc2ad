use anyhow::Result;
use aws_sdk_s3::primitives::ByteStream;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::io::Write;

/// Serializes a value to JSON and uploads it to an S3 bucket with `application/json` content type.
pub async fn write_json_to_s3(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    value: &impl Serialize,
) -> anyhow::Result<()> {
    let body = serde_json::to_vec(value)?;

    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(body.into())
        .content_type("application/json")
        .send()
        .await?;

    Ok(())
}

/// Gzip-compresses `bytes` with the default level.
pub fn gzip_bytes(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

/// Uploads a CSV report, gzip-compressed when `gzip` is set (the key then
/// gets a `.gz` suffix). Returns the key written.
pub async fn upload_report(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    csv: Vec<u8>,
    gzip: bool,
) -> Result<String> {
    let (body, key) = if gzip {
        (gzip_bytes(&csv)?, format!("{key}.gz"))
    } else {
        (csv, key.to_string())
    };

    let mut request = client
        .put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(body))
        .content_type("text/csv");
    if gzip {
        request = request.content_encoding("gzip");
    }
    request.send().await?;

    Ok(key)
}
