//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The private cookie session carries three entries: the hosted-backend
//! access token, the serialised [`Player`] and the active [`Attempt`].
//! Persistence is best effort. Write failures and unreadable values are logged
//! and otherwise ignored, so a corrupt player entry simply reads as signed out.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::domain::{AccessToken, Attempt, AuthenticatedUser, Error, Player};

pub(crate) const AUTH_TOKEN_KEY: &str = "auth_token";
pub(crate) const PLAYER_KEY: &str = "coderush_user";
pub(crate) const ATTEMPT_KEY: &str = "coderush_attempt";

const LOGIN_REQUIRED: &str = "login required";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    fn write<T: Serialize>(&self, key: &'static str, value: &T) {
        if let Err(error) = self.0.insert(key, value) {
            warn!(key, error = %error, "failed to persist session entry");
        }
    }

    fn read<T: DeserializeOwned>(&self, key: &'static str) -> Option<T> {
        match self.0.get::<T>(key) {
            Ok(value) => value,
            Err(error) => {
                warn!(key, error = %error, "discarding unreadable session entry");
                self.0.remove(key);
                None
            }
        }
    }

    /// Store a freshly authenticated player and return their progress record.
    ///
    /// Any attempt left over from a previous player is dropped.
    pub fn sign_in(&self, user: &AuthenticatedUser) -> Player {
        let player = Player::new(user.id.clone(), user.username.as_ref());
        self.write(AUTH_TOKEN_KEY, &user.access_token.expose());
        self.write(PLAYER_KEY, &player);
        self.0.remove(ATTEMPT_KEY);
        player
    }

    /// Drop every entry and expire the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// The signed-in player, if any.
    pub fn player(&self) -> Option<Player> {
        self.read(PLAYER_KEY)
    }

    /// Require a signed-in player or return `401 Unauthorized`.
    pub fn require_player(&self) -> Result<Player, Error> {
        self.player()
            .ok_or_else(|| Error::unauthorized(LOGIN_REQUIRED))
    }

    /// Hosted-backend access token for the signed-in player.
    pub fn access_token(&self) -> Option<AccessToken> {
        self.read::<String>(AUTH_TOKEN_KEY).map(AccessToken::new)
    }

    /// Require both a player and their access token.
    pub fn require_credentials(&self) -> Result<(Player, AccessToken), Error> {
        let player = self.require_player()?;
        let token = self
            .access_token()
            .ok_or_else(|| Error::unauthorized(LOGIN_REQUIRED))?;
        Ok((player, token))
    }

    /// Replace the stored player.
    pub fn save_player(&self, player: &Player) {
        self.write(PLAYER_KEY, player);
    }

    /// The active attempt, if any.
    pub fn attempt(&self) -> Option<Attempt> {
        self.read(ATTEMPT_KEY)
    }

    /// Replace the active attempt.
    pub fn save_attempt(&self, attempt: &Attempt) {
        self.write(ATTEMPT_KEY, attempt);
    }

    /// Forget the active attempt.
    pub fn clear_attempt(&self) {
        self.0.remove(ATTEMPT_KEY);
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
