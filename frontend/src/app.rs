//! Root component: owns the session lifecycle.
//!
//! On first render the stored token is resolved into a session state —
//! without any network call when no token exists — and the tree then
//! switches between the login screen and the authenticated lookup
//! workspace. Every forced logout in the app funnels back here.

use gloo_console::warn;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::components::login::LoginScreen;
use crate::components::lookup::LookupScreen;
use crate::components::toast::show_toast;
use crate::session::{self, Session, SessionResolution};

enum SessionState {
    Checking,
    Unauthenticated,
    Authenticated(Session),
}

pub enum Msg {
    Resolved(SessionResolution),
    LoggedIn(Session),
    Logout { silent: bool },
}

pub struct App {
    state: SessionState,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        App {
            state: SessionState::Checking,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Resolved(SessionResolution::Authenticated(active)) => {
                session::persist(&active);
                self.state = SessionState::Authenticated(active);
                true
            }
            Msg::Resolved(SessionResolution::LoggedOut) => {
                session::clear();
                self.state = SessionState::Unauthenticated;
                true
            }
            Msg::LoggedIn(active) => {
                session::persist(&active);
                self.state = SessionState::Authenticated(active);
                true
            }
            Msg::Logout { silent } => {
                session::clear();
                self.state = SessionState::Unauthenticated;
                if !silent {
                    show_toast("Sessão encerrada.");
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        match &self.state {
            // Nothing is shown while the stored token is being validated.
            SessionState::Checking => Html::default(),
            SessionState::Unauthenticated => html! {
                <LoginScreen on_login={ctx.link().callback(Msg::LoggedIn)} />
            },
            SessionState::Authenticated(active) => html! {
                <LookupScreen
                    session={active.clone()}
                    on_logout={ctx.link().callback(|silent| Msg::Logout { silent })}
                />
            },
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if !first_render {
            return;
        }
        match session::stored_token() {
            // No token: immediately logged out, no network involved.
            None => ctx
                .link()
                .send_message(Msg::Resolved(SessionResolution::LoggedOut)),
            Some(token) => {
                let link = ctx.link().clone();
                spawn_local(async move {
                    let outcome = ApiClient::new(Some(token.clone())).validate().await;
                    if let Err(err) = &outcome {
                        if !err.is_auth() {
                            warn!("Falha ao validar token (mantendo sessão local):", err.to_string());
                        }
                    }
                    let resolution = session::resolve_validation(
                        token,
                        outcome,
                        session::stored_role(),
                        session::stored_client_slug(),
                    );
                    link.send_message(Msg::Resolved(resolution));
                });
            }
        }
    }
}
