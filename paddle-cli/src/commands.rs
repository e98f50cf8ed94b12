//! Subcommand implementations.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use paddle_sdk::objects::pay_link::PayLinkRequest;
use paddle_sdk::signature::canonicalize;
use paddle_sdk::{ClientConfig, PaddleClient, WebhookPayload};
use serde::Serialize;

use crate::Command;

pub async fn run(command: Command, config: ClientConfig) -> anyhow::Result<ExitCode> {
    let client = PaddleClient::from_config(config.clone());
    match command {
        Command::Verify { payload, form } => verify(&config, &payload, form),
        Command::Canonicalize { payload, form } => {
            std::io::stdout().write_all(&canonical_bytes(&payload, form)?)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Products => print_json(&client.get_products().await?),
        Command::Coupons { product_id } => {
            print_json(&client.get_product_coupons(product_id).await?)
        }
        Command::Plans { plan } => print_json(&client.get_product_plans(plan).await?),
        Command::Transactions { entity, id } => {
            print_json(&client.get_transactions(entity, &id).await?)
        }
        Command::CancelSubscription { subscription_id } => {
            print_json(&client.cancel_subscription(subscription_id).await?)
        }
        Command::PayLink {
            product_id,
            title,
            prices,
            webhook_url,
            custom_message,
        } => {
            let request = PayLinkRequest {
                product_id,
                title,
                prices,
                webhook_url,
                custom_message,
                ..Default::default()
            };
            print_json(&client.generate_pay_link(&request).await?)
        }
    }
}

fn verify(config: &ClientConfig, path: &Path, form: bool) -> anyhow::Result<ExitCode> {
    let verifier = config
        .webhook_verifier()
        .context("no webhook public key configured (set webhook.public_key_file or --public-key)")?;
    let payload = read_payload(path, form)?;

    match verifier.verify(&payload) {
        Ok(()) => {
            println!("verified");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::info!(alert_name = payload.get_str("alert_name"), "payload rejected");
            println!("rejected: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Bytes the payload's signature is computed over. The payload does not
/// need to carry a signature.
fn canonical_bytes(path: &Path, form: bool) -> anyhow::Result<Vec<u8>> {
    let payload = read_payload(path, form)?;
    Ok(canonicalize(payload.unsigned_fields()))
}

fn read_payload(path: &Path, form: bool) -> anyhow::Result<WebhookPayload> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read payload {}", path.display()))?;
    if form {
        Ok(WebhookPayload::from_form(body.trim_end()))
    } else {
        WebhookPayload::from_json_str(&body)
            .with_context(|| format!("invalid payload {}", path.display()))
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const VENDOR_KEY: &str = include_str!("../../paddle-sdk/tests/fixtures/vendor_public.pem");
    const OTHER_KEY: &str = include_str!("../../paddle-sdk/tests/fixtures/other_public.pem");
    const MINIMAL_SIG: &str = include_str!("../../paddle-sdk/tests/fixtures/minimal.sig.b64");
    const MINIMAL_CANONICAL: &str =
        include_str!("../../paddle-sdk/tests/fixtures/minimal.canonical");

    fn write_payload(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn signed_json() -> String {
        serde_json::json!({
            "alert_name": "subscription_created",
            "p_signature": MINIMAL_SIG.trim(),
            "alert_id": "1",
        })
        .to_string()
    }

    #[test]
    fn test_canonical_bytes() {
        let dir = TempDir::new().unwrap();

        let signed = write_payload(&dir, "signed.json", &signed_json());
        assert_eq!(canonical_bytes(&signed, false).unwrap(), MINIMAL_CANONICAL.as_bytes());

        let form = write_payload(
            &dir,
            "unsigned.form",
            "alert_name=subscription_created&alert_id=1\n",
        );
        assert_eq!(canonical_bytes(&form, true).unwrap(), MINIMAL_CANONICAL.as_bytes());
    }

    #[test]
    fn test_verify_exit_codes() {
        let dir = TempDir::new().unwrap();
        let payload = write_payload(&dir, "payload.json", &signed_json());

        let config = ClientConfig::new("1", "a").with_public_key(VENDOR_KEY);
        assert_eq!(verify(&config, &payload, false).unwrap(), ExitCode::SUCCESS);

        let config = ClientConfig::new("1", "a").with_public_key(OTHER_KEY);
        assert_eq!(verify(&config, &payload, false).unwrap(), ExitCode::FAILURE);

        let tampered = signed_json().replace("\"1\"", "\"2\"");
        let tampered = write_payload(&dir, "tampered.json", &tampered);
        let config = ClientConfig::new("1", "a").with_public_key(VENDOR_KEY);
        assert_eq!(verify(&config, &tampered, false).unwrap(), ExitCode::FAILURE);
    }

    #[test]
    fn test_verify_requires_public_key() {
        let dir = TempDir::new().unwrap();
        let payload = write_payload(&dir, "payload.json", &signed_json());
        assert!(verify(&ClientConfig::new("1", "a"), &payload, false).is_err());
        assert!(canonical_bytes(&dir.path().join("missing.json"), false).is_err());
    }
}
