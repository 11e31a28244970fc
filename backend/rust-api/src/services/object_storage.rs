use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Client;
use sha2::{Digest, Sha256};
use url::Url;

use crate::config::ObjectStorageSettings;
use crate::metrics::track_storage_operation;
use crate::services::stores::ObjectStore;

type HmacSha256 = Hmac<Sha256>;

const AWS_URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// SHA-256 of an empty body, used for signed GET requests.
const EMPTY_PAYLOAD_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// S3-compatible object storage client using path-style addressing and SigV4.
#[derive(Clone, Debug)]
pub struct ObjectStorageClient {
    http: Client,
    bucket: String,
    region: String,
    endpoint: Url,
    access_key: String,
    secret_key: String,
    public_base: String,
}

struct SignedRequest {
    url: Url,
    authorization: String,
    amz_date: String,
    payload_hash: String,
}

impl ObjectStorageClient {
    pub fn new(settings: ObjectStorageSettings) -> Result<Self> {
        let endpoint = settings
            .endpoint
            .unwrap_or_else(|| format!("https://s3.{}.amazonaws.com", settings.region));

        let endpoint = Url::parse(&endpoint).context("Invalid object storage endpoint URL")?;
        if endpoint.host_str().is_none() {
            bail!("Object storage endpoint must include a host");
        }

        if endpoint.scheme() != "https" && endpoint.scheme() != "http" {
            bail!(
                "Invalid endpoint scheme: {}. Must be http or https.",
                endpoint.scheme()
            );
        }

        if settings.require_https && endpoint.scheme() != "https" {
            bail!(
                "Object storage endpoint must use HTTPS when require_https is set. Got: {}",
                endpoint.scheme()
            );
        }

        let public_base = settings
            .public_base_url
            .unwrap_or_else(|| {
                format!(
                    "{}/{}",
                    endpoint.as_str().trim_end_matches('/'),
                    settings.bucket
                )
            })
            .trim_end_matches('/')
            .to_string();

        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build object storage HTTP client")?;

        Ok(Self {
            http,
            bucket: settings.bucket,
            region: settings.region,
            access_key: settings.access_key,
            secret_key: settings.secret_key,
            endpoint,
            public_base,
        })
    }

    pub async fn upload_bytes(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let payload_hash = hex::encode(Sha256::digest(&bytes));
        let signed = self.sign("PUT", key, payload_hash)?;

        self.http
            .put(signed.url)
            .header("Authorization", signed.authorization)
            .header("x-amz-date", signed.amz_date)
            .header("x-amz-content-sha256", signed.payload_hash)
            .header("content-type", content_type)
            .body(bytes)
            .send()
            .await
            .with_context(|| format!("Failed to upload object {}", key))?
            .error_for_status()
            .context("Object storage upload returned error status")?;

        Ok(())
    }

    pub async fn download_bytes(&self, key: &str) -> Result<Vec<u8>> {
        let signed = self.sign("GET", key, EMPTY_PAYLOAD_SHA256.to_string())?;

        let response = self
            .http
            .get(signed.url)
            .header("Authorization", signed.authorization)
            .header("x-amz-date", signed.amz_date)
            .header("x-amz-content-sha256", signed.payload_hash)
            .send()
            .await
            .with_context(|| format!("Failed to download object {}", key))?
            .error_for_status()
            .with_context(|| format!("Object storage returned error status for {}", key))?;

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read body of object {}", key))?;

        Ok(bytes.to_vec())
    }

    fn sign(&self, method: &str, key: &str, payload_hash: String) -> Result<SignedRequest> {
        let object_key = key.trim_matches('/');
        let canonical_uri = self.canonical_uri(object_key);

        let now = Utc::now();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date_stamp = now.format("%Y%m%d").to_string();
        let scope = format!("{}/{}/s3/aws4_request", date_stamp, self.region);

        let host = self.host_header()?;
        let canonical_headers = format!(
            "host:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n",
            host, payload_hash, amz_date
        );
        let signed_headers = "host;x-amz-content-sha256;x-amz-date";

        let canonical_request = format!(
            "{}\n{}\n\n{}\n{}\n{}",
            method, canonical_uri, canonical_headers, signed_headers, payload_hash
        );

        let hashed_canonical_request = hex::encode(Sha256::digest(canonical_request.as_bytes()));
        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{}\n{}\n{}",
            amz_date, scope, hashed_canonical_request
        );

        let signing_key = derive_signing_key(&self.secret_key, &date_stamp, &self.region, "s3")?;
        let signature = hex::encode(hmac_sign(&signing_key, string_to_sign.as_bytes())?);

        let authorization = format!(
            "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
            self.access_key, scope, signed_headers, signature
        );

        let mut url = self.endpoint.clone();
        url.set_path(&canonical_uri);

        Ok(SignedRequest {
            url,
            authorization,
            amz_date,
            payload_hash,
        })
    }

    fn host_header(&self) -> Result<String> {
        let host = self
            .endpoint
            .host_str()
            .ok_or_else(|| anyhow!("Object storage endpoint missing host"))?
            .to_lowercase();

        Ok(match self.endpoint.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host,
        })
    }

    fn canonical_uri(&self, key: &str) -> String {
        let encoded_key = key
            .split('/')
            .map(|segment| utf8_percent_encode(segment, AWS_URI_ENCODE_SET).to_string())
            .collect::<Vec<_>>()
            .join("/");

        format!("/{}/{}", self.bucket, encoded_key)
    }
}

#[async_trait]
impl ObjectStore for ObjectStorageClient {
    async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        track_storage_operation("get", self.download_bytes(key)).await
    }

    async fn put_object(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        track_storage_operation("put", self.upload_bytes(key, bytes, content_type)).await
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base, key.trim_start_matches('/'))
    }

    fn key_from_url(&self, url: &str) -> String {
        url.strip_prefix(&self.public_base)
            .unwrap_or(url)
            .trim_start_matches('/')
            .to_string()
    }
}

fn derive_signing_key(secret: &str, date: &str, region: &str, service: &str) -> Result<Vec<u8>> {
    let mut key = format!("AWS4{}", secret).into_bytes();
    key = hmac_sign(&key, date)?;
    key = hmac_sign(&key, region)?;
    key = hmac_sign(&key, service)?;
    hmac_sign(&key, b"aws4_request")
}

fn hmac_sign(key: &[u8], message: impl AsRef<[u8]>) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| anyhow!("Invalid HMAC key"))?;
    mac.update(message.as_ref());
    Ok(mac.finalize().into_bytes().to_vec())
}
