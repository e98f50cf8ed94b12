//! Webhook signature verification.
//!
//! Paddle signs every webhook ("alert") it delivers. The signature travels
//! inside the payload itself, in the `p_signature` field, and is computed
//! as:
//!
//! ```text
//! p_signature = base64(RSA-PKCS1v15-SHA1(serialize(sort(fields - p_signature)), vendor_key))
//! ```
//!
//! where `serialize` is PHP's native `serialize()` (see [`crate::serialize`]).
//!
//! Verification is a three stage pipeline:
//!
//! 1. [`WebhookPayload::signed_parts`] strips the signature and sorts the
//!    remaining fields,
//! 2. [`canonicalize`] produces the signed bytes,
//! 3. [`RsaPublicKey::verify_sha1`] checks the signature.
//!
//! [`WebhookVerifier::verify_webhook_data`] runs the whole pipeline and
//! fails closed: any error is reported as `false`.

use ring::signature::{RSA_PKCS1_2048_8192_SHA1_FOR_LEGACY_USE_ONLY, UnparsedPublicKey};
use serde::Deserialize;

use crate::serialize::{PhpMap, PhpValue, UnsupportedValueError, serialize_sorted};

/// Payload field carrying the base64 encoded signature.
pub const SIGNATURE_FIELD: &str = "p_signature";

/// Errors produced by signature operations.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("payload has no `{SIGNATURE_FIELD}` field")]
    MissingSignature,
    #[error("invalid payload format")]
    InvalidFormat,
    #[error("invalid base64 encoding")]
    InvalidBase64,
    #[error("invalid public key: {0}")]
    InvalidKey(&'static str),
    #[error(transparent)]
    Unsupported(#[from] UnsupportedValueError),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid signature")]
    SignatureMismatch,
}

impl From<ring::error::Unspecified> for SignatureError {
    fn from(_: ring::error::Unspecified) -> Self {
        Self::SignatureMismatch
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// A decoded webhook payload, signature field included.
///
/// Paddle delivers alerts as `application/x-www-form-urlencoded` bodies, so
/// in practice every value is a string; JSON bodies with richer values are
/// accepted as well. The payload also implements [`Deserialize`], which
/// lets web framework extractors (`Form<WebhookPayload>`,
/// `Json<WebhookPayload>`) build it directly.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct WebhookPayload {
    fields: PhpMap,
}

impl WebhookPayload {
    pub fn new(fields: PhpMap) -> Self {
        Self { fields }
    }

    /// Parse an `application/x-www-form-urlencoded` body.
    ///
    /// Repeated keys keep the last value, like PHP's `$_POST`.
    pub fn from_form(body: &str) -> Self {
        url::form_urlencoded::parse(body.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// Parse a JSON object body.
    pub fn from_json_str(body: &str) -> Result<Self, SignatureError> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        Self::try_from(value)
    }

    pub fn fields(&self) -> &PhpMap {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&PhpValue> {
        self.fields.get(key)
    }

    /// Value of a string field, e.g. `alert_name`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.fields.get(key)? {
            PhpValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The raw (still base64 encoded) signature, if present.
    pub fn signature(&self) -> Option<&str> {
        self.get_str(SIGNATURE_FIELD)
    }

    /// Split the payload into its signature and the key-sorted fields that
    /// were signed.
    pub fn signed_parts(&self) -> Result<(&str, PhpMap), SignatureError> {
        let signature = match self.fields.get(SIGNATURE_FIELD) {
            Some(PhpValue::String(s)) => s.as_str(),
            Some(_) => return Err(SignatureError::InvalidFormat),
            None => return Err(SignatureError::MissingSignature),
        };
        Ok((signature, self.unsigned_fields()))
    }

    /// Every field except the signature, sorted by key.
    ///
    /// Unlike [`signed_parts`](Self::signed_parts) this does not require a
    /// signature to be present.
    pub fn unsigned_fields(&self) -> PhpMap {
        let mut fields = self.fields.clone();
        fields.remove(SIGNATURE_FIELD);
        fields.sort_keys();
        fields
    }
}

impl TryFrom<serde_json::Value> for WebhookPayload {
    type Error = SignatureError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Object(map) => Ok(Self::new(PhpMap::try_from(map)?)),
            _ => Err(SignatureError::InvalidFormat),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for WebhookPayload
where
    K: Into<String>,
    V: Into<PhpValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Canonical bytes that Paddle signs for the given (signature-free) fields.
pub fn canonicalize(fields: PhpMap) -> Vec<u8> {
    serialize_sorted(fields)
}

/// Decode a `p_signature` value.
///
/// Paddle emits padded standard base64; unpadded input is tolerated.
pub fn decode_signature(value: &str) -> Result<Box<[u8]>, SignatureError> {
    let value = value.trim();
    fast32::base64::RFC4648
        .decode_str(value)
        .or_else(|_| fast32::base64::RFC4648_NOPAD.decode_str(value))
        .map(Vec::into_boxed_slice)
        .map_err(|_| SignatureError::InvalidBase64)
}

// ---------------------------------------------------------------------------
// Public key
// ---------------------------------------------------------------------------

/// An RSA public key, held as a DER encoded PKCS#1 `RSAPublicKey`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    der: Box<[u8]>,
}

const PEM_SPKI_LABEL: &str = "PUBLIC KEY";
const PEM_PKCS1_LABEL: &str = "RSA PUBLIC KEY";

/// DER encoding of OID 1.2.840.113549.1.1.1 (rsaEncryption).
const RSA_ENCRYPTION_OID: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01];

const TAG_SEQUENCE: u8 = 0x30;
const TAG_BIT_STRING: u8 = 0x03;
const TAG_OID: u8 = 0x06;

impl RsaPublicKey {
    /// Parse a PEM encoded key.
    ///
    /// Both `-----BEGIN PUBLIC KEY-----` (SubjectPublicKeyInfo, the format
    /// shown in the Paddle dashboard) and `-----BEGIN RSA PUBLIC KEY-----`
    /// (PKCS#1) are accepted.
    pub fn from_pem(pem: &str) -> Result<Self, SignatureError> {
        let (label, der) = decode_pem(pem)?;
        match label {
            PEM_SPKI_LABEL => Self::from_spki_der(&der),
            PEM_PKCS1_LABEL => Self::from_pkcs1_der(&der),
            _ => Err(SignatureError::InvalidKey("unexpected pem label")),
        }
    }

    /// Parse a DER encoded SubjectPublicKeyInfo holding an RSA key.
    pub fn from_spki_der(der: &[u8]) -> Result<Self, SignatureError> {
        let (spki, rest) = read_tlv(der, TAG_SEQUENCE)?;
        if !rest.is_empty() {
            return Err(SignatureError::InvalidKey("trailing data"));
        }
        let (algorithm, rest) = read_tlv(spki, TAG_SEQUENCE)?;
        let (oid, _params) = read_tlv(algorithm, TAG_OID)?;
        if oid != RSA_ENCRYPTION_OID {
            return Err(SignatureError::InvalidKey("not an rsa key"));
        }
        let (bits, rest) = read_tlv(rest, TAG_BIT_STRING)?;
        if !rest.is_empty() {
            return Err(SignatureError::InvalidKey("trailing data"));
        }
        match bits.split_first() {
            Some((0, key)) => Self::from_pkcs1_der(key),
            _ => Err(SignatureError::InvalidKey("malformed bit string")),
        }
    }

    /// Wrap a DER encoded PKCS#1 `RSAPublicKey`.
    pub fn from_pkcs1_der(der: &[u8]) -> Result<Self, SignatureError> {
        let (_, rest) = read_tlv(der, TAG_SEQUENCE)?;
        if !rest.is_empty() {
            return Err(SignatureError::InvalidKey("trailing data"));
        }
        Ok(Self { der: der.into() })
    }

    /// Verify an RSASSA-PKCS1-v1_5 signature with a SHA-1 digest.
    pub fn verify_sha1(&self, message: &[u8], signature: &[u8]) -> Result<(), SignatureError> {
        UnparsedPublicKey::new(&RSA_PKCS1_2048_8192_SHA1_FOR_LEGACY_USE_ONLY, &self.der)
            .verify(message, signature)?;
        Ok(())
    }
}

/// Extract the label and decoded body of the first PEM block.
fn decode_pem(pem: &str) -> Result<(&str, Vec<u8>), SignatureError> {
    let mut lines = pem.lines().map(str::trim).skip_while(|l| l.is_empty());
    let label = lines
        .next()
        .and_then(|l| l.strip_prefix("-----BEGIN "))
        .and_then(|l| l.strip_suffix("-----"))
        .ok_or(SignatureError::InvalidKey("missing pem header"))?;

    let end = format!("-----END {label}-----");
    let mut body = String::new();
    let mut terminated = false;
    for line in lines {
        if line == end {
            terminated = true;
            break;
        }
        body.push_str(line);
    }
    if !terminated {
        return Err(SignatureError::InvalidKey("missing pem footer"));
    }

    let der = fast32::base64::RFC4648
        .decode_str(&body)
        .map_err(|_| SignatureError::InvalidKey("invalid pem base64"))?;
    Ok((label, der))
}

/// Read one DER element with the expected tag, returning its contents and
/// the bytes following it.
fn read_tlv(input: &[u8], tag: u8) -> Result<(&[u8], &[u8]), SignatureError> {
    const MALFORMED: SignatureError = SignatureError::InvalidKey("malformed der");

    let (&actual, input) = input.split_first().ok_or(MALFORMED)?;
    if actual != tag {
        return Err(MALFORMED);
    }
    let (&first, mut input) = input.split_first().ok_or(MALFORMED)?;
    let len = if first < 0x80 {
        usize::from(first)
    } else {
        let count = usize::from(first & 0x7f);
        if count == 0 || count > 4 || input.len() < count {
            return Err(MALFORMED);
        }
        let (len_bytes, rest) = input.split_at(count);
        input = rest;
        len_bytes
            .iter()
            .fold(0usize, |acc, b| (acc << 8) | usize::from(*b))
    };
    if input.len() < len {
        return Err(MALFORMED);
    }
    Ok(input.split_at(len))
}

// ---------------------------------------------------------------------------
// Verifier
// ---------------------------------------------------------------------------

/// Verifies webhook payloads against the vendor public key.
///
/// The key is kept in its PEM form and parsed on each call, so a malformed
/// key surfaces as a rejected webhook rather than a construction error.
#[derive(Debug, Clone)]
pub struct WebhookVerifier {
    public_key_pem: String,
}

impl WebhookVerifier {
    pub fn new(public_key_pem: impl Into<String>) -> Self {
        Self {
            public_key_pem: public_key_pem.into(),
        }
    }

    /// Run the verification pipeline, reporting why a payload is rejected.
    pub fn verify(&self, payload: &WebhookPayload) -> Result<(), SignatureError> {
        let (signature, fields) = payload.signed_parts()?;
        let signature = decode_signature(signature)?;
        let key = RsaPublicKey::from_pem(&self.public_key_pem)?;
        key.verify_sha1(&canonicalize(fields), &signature)
    }

    /// `true` only if the payload carries a valid vendor signature.
    ///
    /// Never fails: malformed input of any kind yields `false`.
    pub fn verify_webhook_data(&self, payload: &WebhookPayload) -> bool {
        match self.verify(payload) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "webhook signature rejected");
                false
            }
        }
    }

    /// Like [`verify_webhook_data`](Self::verify_webhook_data), starting
    /// from an undecoded JSON value.
    pub fn verify_json(&self, payload: serde_json::Value) -> bool {
        match WebhookPayload::try_from(payload) {
            Ok(payload) => self.verify_webhook_data(&payload),
            Err(e) => {
                tracing::debug!(error = %e, "webhook payload rejected");
                false
            }
        }
    }

    /// Like [`verify_webhook_data`](Self::verify_webhook_data), starting
    /// from a raw form-encoded body.
    pub fn verify_form(&self, body: &str) -> bool {
        self.verify_webhook_data(&WebhookPayload::from_form(body))
    }
}
