//! Factory + holder for what the access middleware needs: the token codec and the user lookup.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{TokenCodec, UserLookup, token::TokenError};

#[derive(Clone)]
pub struct AuthGate {
    tokens: Arc<TokenCodec>,
    users: Arc<dyn UserLookup>,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl AuthGate {
    pub fn new(tokens: Arc<TokenCodec>, users: Arc<dyn UserLookup>) -> Self {
        Self { tokens, users }
    }

    pub fn from_config(config: &Config, users: Arc<dyn UserLookup>) -> Result<Self, TokenError> {
        let tokens = TokenCodec::new(
            config.jwt_secret.as_bytes(),
            config.jwt_expiration_seconds,
        )?;
        Ok(Self::new(Arc::new(tokens), users))
    }

    pub fn tokens(&self) -> &TokenCodec {
        self.tokens.as_ref()
    }

    pub fn users(&self) -> &dyn UserLookup {
        self.users.as_ref()
    }
}
