use common::model::auth::LoginResponse;
use web_sys::HtmlInputElement;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api::{ApiClient, ApiError};
use crate::components::toast::show_toast;
use crate::session::Session;

#[derive(Properties, PartialEq)]
pub struct LoginProps {
    /// Fired with the new session after a successful login.
    pub on_login: Callback<Session>,
}

pub enum Msg {
    SetEmail(String),
    SetPassword(String),
    Submit,
    Finished(Result<LoginResponse, ApiError>),
}

/// Email/password form shown while the session is unauthenticated.
///
/// Login failures surface as one generic toast; the backend's reason is
/// never echoed to the user.
pub struct LoginScreen {
    email: String,
    password: String,
    submitting: bool,
    email_ref: NodeRef,
}

impl Component for LoginScreen {
    type Message = Msg;
    type Properties = LoginProps;

    fn create(_ctx: &Context<Self>) -> Self {
        LoginScreen {
            email: String::new(),
            password: String::new(),
            submitting: false,
            email_ref: NodeRef::default(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SetEmail(value) => {
                self.email = value;
                true
            }
            Msg::SetPassword(value) => {
                self.password = value;
                true
            }
            Msg::Submit => {
                if self.submitting || self.email.trim().is_empty() || self.password.is_empty() {
                    return false;
                }
                self.submitting = true;
                let email = self.email.trim().to_string();
                let password = self.password.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = ApiClient::new(None).login(&email, &password).await;
                    link.send_message(Msg::Finished(result));
                });
                true
            }
            Msg::Finished(Ok(response)) => {
                self.submitting = false;
                self.email.clear();
                self.password.clear();
                ctx.props().on_login.emit(Session::from_login(response));
                true
            }
            Msg::Finished(Err(_)) => {
                self.submitting = false;
                show_toast("Falha no login");
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let on_email = link.callback(|e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::SetEmail(input.value())
        });
        let on_password = link.callback(|e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::SetPassword(input.value())
        });
        let on_keydown = link.batch_callback(|e: KeyboardEvent| {
            (e.key() == "Enter").then_some(Msg::Submit)
        });

        html! {
            <div class="login-screen">
                <div class="login-card">
                    <h3>{ "Entrar" }</h3>
                    <input
                        ref={self.email_ref.clone()}
                        placeholder="Email"
                        value={self.email.clone()}
                        oninput={on_email}
                        onkeydown={on_keydown.clone()}
                    />
                    <input
                        placeholder="Senha"
                        type="password"
                        value={self.password.clone()}
                        oninput={on_password}
                        onkeydown={on_keydown}
                    />
                    <button
                        disabled={self.submitting}
                        onclick={link.callback(|_| Msg::Submit)}
                    >
                        <i class="material-icons">{ "login" }</i>
                        { " Entrar" }
                    </button>
                </div>
            </div>
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, first_render: bool) {
        if first_render {
            if let Some(input) = self.email_ref.cast::<HtmlInputElement>() {
                input.focus().ok();
            }
        }
    }
}
