use std::sync::Arc;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use crate::application_service::contributor_service::TokenIssuer;
use crate::domain::{AntiForgeryToken, Identity, TokenScope};

type HmacSha256 = Hmac<Sha256>;

/// Bytes of the MAC kept in a token.
const TAG_LEN: usize = 16;

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Stateless anti-forgery tokens.
///
/// A token is `hex(HMAC-SHA256(key, "{tick}|{scope}|{identity}"))[..16 bytes]`
/// where `tick` advances every half lifetime. Tokens of the current and the
/// previous tick verify, so a token lives between one half and one full
/// lifetime.
#[derive(Clone)]
pub struct HmacTokenIssuer {
    key: Vec<u8>,
    half_life_secs: i64,
    clock: Clock,
}

impl HmacTokenIssuer {
    pub fn new(secret: &[u8], lifetime_secs: u64) -> Self {
        let half_life_secs = i64::try_from(lifetime_secs / 2).unwrap_or(i64::MAX).max(1);
        Self {
            key: secret.to_vec(),
            half_life_secs,
            clock: Arc::new(Utc::now),
        }
    }

    /// Issuer with a fresh 32-byte key from the OS RNG.
    pub fn with_random_key(lifetime_secs: u64) -> Self {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        Self::new(&key, lifetime_secs)
    }

    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    fn current_tick(&self) -> i64 {
        (self.clock)().timestamp().div_euclid(self.half_life_secs)
    }

    fn mac(&self, tick: i64, scope: &TokenScope, session: &Identity) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .expect("HMAC key initialization should never fail");
        mac.update(format!("{}|{}|{}", tick, scope.as_str(), session.id).as_bytes());
        mac
    }
}

impl TokenIssuer for HmacTokenIssuer {
    fn issue_token(&self, scope: &TokenScope, session: &Identity) -> AntiForgeryToken {
        let tag = self
            .mac(self.current_tick(), scope, session)
            .finalize()
            .into_bytes();
        AntiForgeryToken::new(hex::encode(&tag[..TAG_LEN]))
    }

    fn verify_token(
        &self,
        token: &AntiForgeryToken,
        scope: &TokenScope,
        session: &Identity,
    ) -> bool {
        let Ok(tag) = hex::decode(token.as_str()) else {
            return false;
        };
        if tag.len() != TAG_LEN {
            return false;
        }

        let tick = self.current_tick();
        [tick, tick - 1].into_iter().any(|t| {
            self.mac(t, scope, session)
                .verify_truncated_left(&tag)
                .is_ok()
        })
    }
}
