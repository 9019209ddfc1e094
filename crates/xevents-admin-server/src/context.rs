//! What a handler decides and how that decision becomes a response
//!
//! Handlers never touch the flash queue directly. They return an [`Outcome`]
//! and [`PanelContext::respond`] queues the flash for redirects or drains the
//! queue into the page being rendered.

use crate::session_state::TypedSession;
use actix_web::{
    dev::Payload, http::header::LOCATION, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use serde_json::{Map, Value};
use std::future::{ready, Ready};
use xevents_shared::{errors::e500, flash::FlashMessage, session::SessionUser};

/// The template context of a rendered page
#[derive(Debug, serde::Serialize)]
pub struct Page {
    pub template: &'static str,
    pub user: Option<SessionUser>,
    pub messages: Vec<FlashMessage>,
    pub context: Map<String, Value>,
}

impl Page {
    pub fn new(template: &'static str) -> Self {
        Self {
            template,
            user: None,
            messages: Vec::new(),
            context: Map::new(),
        }
    }

    pub fn with<T: serde::Serialize + ?Sized>(
        mut self,
        key: &str,
        value: &T,
    ) -> serde_json::Result<Self> {
        self.context
            .insert(key.to_string(), serde_json::to_value(value)?);
        Ok(self)
    }
}

#[must_use]
#[derive(Debug)]
pub enum Outcome {
    Redirect {
        to: String,
        flash: Option<FlashMessage>,
    },
    Render {
        page: Page,
        flash: Option<FlashMessage>,
    },
}

impl Outcome {
    pub fn redirect(to: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            flash: None,
        }
    }

    pub fn redirect_with(to: impl Into<String>, flash: FlashMessage) -> Self {
        Self::Redirect {
            to: to.into(),
            flash: Some(flash),
        }
    }

    pub fn render(page: Page) -> Self {
        Self::Render { page, flash: None }
    }

    pub fn render_with(page: Page, flash: FlashMessage) -> Self {
        Self::Render {
            page,
            flash: Some(flash),
        }
    }
}

/// The session and the user the session gate let through (if any)
pub struct PanelContext {
    session: TypedSession,
    user: Option<SessionUser>,
}

impl PanelContext {
    pub fn session(&self) -> &TypedSession {
        &self.session
    }

    pub fn into_session(self) -> TypedSession {
        self.session
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// Turns the handler's decision into the response sent to the browser
    #[tracing::instrument(skip(self))]
    pub fn respond(&self, outcome: Outcome) -> actix_web::Result<HttpResponse> {
        match outcome {
            Outcome::Redirect { to, flash } => {
                if let Some(flash) = flash {
                    self.session.push_flash(flash).map_err(e500)?;
                }
                Ok(HttpResponse::SeeOther()
                    .insert_header((LOCATION, to))
                    .finish())
            }
            Outcome::Render { mut page, flash } => {
                if let Some(flash) = flash {
                    self.session.push_flash(flash).map_err(e500)?;
                }
                page.messages = self.session.take_flashes().map_err(e500)?;
                page.user = self.user.clone();
                Ok(HttpResponse::Ok().json(page))
            }
        }
    }
}

impl FromRequest for PanelContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<PanelContext, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<SessionUser>().cloned();
        ready(Ok(PanelContext {
            session: TypedSession::from_http_request(req),
            user,
        }))
    }
}
