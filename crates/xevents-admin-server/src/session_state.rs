use actix_session::{Session, SessionExt, SessionGetError, SessionInsertError};
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use xevents_shared::{flash::FlashMessage, session::SessionUser};

pub struct TypedSession(Session);

impl TypedSession {
    const USER_KEY: &'static str = "user";
    const FLASH_KEY: &'static str = "_flash";

    pub fn from_http_request(req: &HttpRequest) -> Self {
        Self(req.get_session())
    }

    pub fn renew(&self) {
        self.0.renew();
    }

    pub fn insert_user(&self, user: &SessionUser) -> Result<(), SessionInsertError> {
        self.0.insert(Self::USER_KEY, user)
    }

    pub fn get_user(&self) -> Result<Option<SessionUser>, SessionGetError> {
        self.0.get(Self::USER_KEY)
    }

    /// Adds to the messages to be shown on the next rendered page
    pub fn push_flash(&self, flash: FlashMessage) -> anyhow::Result<()> {
        let mut pending = self.pending_flashes()?;
        pending.push(flash);
        self.0.insert(Self::FLASH_KEY, pending)?;
        Ok(())
    }

    /// Removes and returns all queued messages in the order they were queued
    pub fn take_flashes(&self) -> Result<Vec<FlashMessage>, SessionGetError> {
        let result = self.pending_flashes()?;
        self.0.remove(Self::FLASH_KEY);
        Ok(result)
    }

    fn pending_flashes(&self) -> Result<Vec<FlashMessage>, SessionGetError> {
        Ok(self
            .0
            .get::<Vec<FlashMessage>>(Self::FLASH_KEY)?
            .unwrap_or_default())
    }

    pub fn log_out(self) {
        self.0.purge()
    }
}

impl FromRequest for TypedSession {
    type Error = <Session as FromRequest>::Error;
    type Future = Ready<Result<TypedSession, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(TypedSession::from_http_request(req)))
    }
}
