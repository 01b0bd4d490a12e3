use crate::error::MemoraError;
use actix_web::HttpRequest;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use memora_infra::{Context, SigningKeys};
use serde::{Deserialize, Serialize};

pub const SIGNATURE_HEADER: &str = "memora-signature";

#[derive(Debug, Serialize, Deserialize)]
pub struct SignatureClaims {
    /// Expiration time (as UTC timestamp)
    pub exp: usize,
    /// Issued at (as UTC timestamp)
    pub iat: usize,
}

/// Verifies the callback signature of a webhook request. MUST be called
/// before any side effect of the webhook runs.
///
/// The signature header carries an HS256 token minted by the delayed
/// queue. Both the current and the next signing key are accepted, so the
/// key pair can rotate without dropping in-flight callbacks.
pub fn verify_webhook_signature(req: &HttpRequest, ctx: &Context) -> Result<(), MemoraError> {
    let token = match req.headers().get(SIGNATURE_HEADER) {
        Some(token) => match token.to_str() {
            Ok(token) => token.trim(),
            Err(_) => {
                return Err(MemoraError::Unauthorized(
                    "Malformed webhook signature header provided".into(),
                ))
            }
        },
        None => {
            return Err(MemoraError::Unauthorized(format!(
                "Unable to find webhook signature in the {} header",
                SIGNATURE_HEADER
            )))
        }
    };

    let SigningKeys { current, next } = &ctx.config.signing_keys;
    decode_signature(token, current)
        .or_else(|_| decode_signature(token, next))
        .map(|_| ())
        .map_err(|_| MemoraError::Unauthorized("Invalid webhook signature provided".into()))
}

fn decode_signature(token: &str, key: &str) -> anyhow::Result<SignatureClaims> {
    let decoding_key = DecodingKey::from_secret(key.as_bytes());
    let claims =
        decode::<SignatureClaims>(token, &decoding_key, &Validation::new(Algorithm::HS256))?
            .claims;
    Ok(claims)
}

#[cfg(test)]
mod test {
    use super::*;
    use actix_web::test::TestRequest;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn sign(key: &str) -> String {
        let now = Utc::now().timestamp() as usize;
        let claims = SignatureClaims {
            exp: now + 60,
            iat: now,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(key.as_bytes()),
        )
        .unwrap()
    }

    fn request_with_signature(token: &str) -> HttpRequest {
        TestRequest::default()
            .insert_header((SIGNATURE_HEADER, token))
            .to_http_request()
    }

    #[actix_web::test]
    async fn accepts_signature_from_the_current_key() {
        let ctx = Context::create_inmemory();
        let token = sign(&ctx.config.signing_keys.current);
        assert!(verify_webhook_signature(&request_with_signature(&token), &ctx).is_ok());
    }

    #[actix_web::test]
    async fn accepts_signature_from_the_rotated_next_key() {
        let ctx = Context::create_inmemory();
        let token = sign(&ctx.config.signing_keys.next);
        assert!(verify_webhook_signature(&request_with_signature(&token), &ctx).is_ok());
    }

    #[actix_web::test]
    async fn rejects_signature_from_an_unknown_key() {
        let ctx = Context::create_inmemory();
        let token = sign("some-other-key");
        assert!(verify_webhook_signature(&request_with_signature(&token), &ctx).is_err());
    }

    #[actix_web::test]
    async fn rejects_garbage_and_missing_signatures() {
        let ctx = Context::create_inmemory();
        assert!(verify_webhook_signature(&request_with_signature("garbage"), &ctx).is_err());

        let req = TestRequest::default().to_http_request();
        assert!(verify_webhook_signature(&req, &ctx).is_err());
    }

    #[actix_web::test]
    async fn rejects_expired_signatures() {
        let ctx = Context::create_inmemory();
        let now = Utc::now().timestamp() as usize;
        let claims = SignatureClaims {
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(ctx.config.signing_keys.current.as_bytes()),
        )
        .unwrap();
        assert!(verify_webhook_signature(&request_with_signature(&token), &ctx).is_err());
    }
}
