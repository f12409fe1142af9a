//! Update function for the lookup screen.
//!
//! Elm-style: receives the current state, the context, and a `Msg`,
//! mutates the state, and returns whether the view should re-render.
//!
//! Every backend call goes through a fresh `ApiClient` built from the
//! session token in the props. A 401/403 on any call emits the forced
//! logout callback; nothing else in this module touches the session.

use chrono::Local;
use gloo_console::error;
use wasm_bindgen_futures::JsFuture;
use yew::platform::spawn_local;
use yew::prelude::*;

use common::model::base::BaseName;
use common::model::product::FoundProduct;
use common::requests::NewUserRequest;

use crate::api::{ApiClient, ApiError};
use crate::components::toast::show_toast;
use crate::filters;
use crate::history::HistoryKind;
use crate::session;

use super::messages::{Msg, NewUserField};
use super::state::{LookupScreen, NewUserForm, SearchOutcome};

fn api(ctx: &Context<LookupScreen>) -> ApiClient {
    ApiClient::new(Some(ctx.props().session.token.clone()))
}

/// Forces the silent logout path on 401/403. Returns `true` when the
/// error was consumed here and the caller should stop.
fn handle_auth_error(ctx: &Context<LookupScreen>, err: &ApiError) -> bool {
    if err.is_auth() {
        ctx.props().on_logout.emit(true);
        true
    } else {
        false
    }
}

/// Clears both collections and kicks off the first page and the totals
/// probe of each, all tagged with the fresh generation so responses of
/// the previous base (or session) are dropped on arrival.
fn reload_history(component: &mut LookupScreen, ctx: &Context<LookupScreen>) {
    let generation = component.history.reset_all();
    let base = component.base;

    for kind in [HistoryKind::Found, HistoryKind::NotFound] {
        let client = api(ctx);
        let link = ctx.link().clone();
        spawn_local(async move {
            let result = match kind {
                HistoryKind::Found => client.found_total(base).await,
                HistoryKind::NotFound => client.not_found_total(base).await,
            };
            link.send_message(Msg::TotalLoaded(kind, generation, result));
        });
    }

    begin_fetch(component, ctx, HistoryKind::Found);
    begin_fetch(component, ctx, HistoryKind::NotFound);
}

/// Asks the controller for a ticket and, if granted, issues exactly one
/// page fetch for `kind`.
fn begin_fetch(component: &mut LookupScreen, ctx: &Context<LookupScreen>, kind: HistoryKind) {
    let Some(ticket) = component.history.begin_load(kind) else {
        return;
    };
    let client = api(ctx);
    let base = component.base;
    let link = ctx.link().clone();
    match kind {
        HistoryKind::Found => spawn_local(async move {
            let result = client.found_page(base, ticket.cursor).await;
            link.send_message(Msg::FoundPage(ticket, result));
        }),
        HistoryKind::NotFound => spawn_local(async move {
            let result = client.not_found_page(base, ticket.cursor).await;
            link.send_message(Msg::NotFoundPage(ticket, result));
        }),
    }
}

/// Timestamp for a hit registered just now, in the same naive ISO shape
/// the backend uses for persisted rows.
fn client_datahora() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

pub fn update(component: &mut LookupScreen, ctx: &Context<LookupScreen>, msg: Msg) -> bool {
    match msg {
        // ---------- search ----------
        Msg::SetSearchCode(value) => {
            component.search_code = value;
            true
        }
        Msg::Search => {
            let code = component.search_code.trim().to_string();
            if code.is_empty() || component.searching {
                return false;
            }
            component.searching = true;
            component.search_result = None;
            component.search_code.clear();

            let client = api(ctx);
            let base = component.base;
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = client.search_product(base, &code).await;
                link.send_message(Msg::SearchFinished(result));
            });
            true
        }
        Msg::SearchFinished(result) => {
            component.searching = false;
            match result {
                Ok(hit) => {
                    let message = match hit.base_hit.as_deref() {
                        Some(actual) if actual != component.base.as_str() => {
                            format!(
                                "Produto encontrado na base {}",
                                BaseName::parse(actual).label()
                            )
                        }
                        _ => "Produto encontrado".to_string(),
                    };
                    // The backend registered the hit; id 0 marks a row
                    // that only exists locally until the next refresh.
                    component.search_result = Some(SearchOutcome::Found {
                        product: FoundProduct {
                            id: 0,
                            client_id: 0,
                            base: component.base.as_str().to_string(),
                            codauxiliar: hit.codauxiliar,
                            codprod: hit.codprod,
                            descricao: Some(hit.descricao),
                            datahora: client_datahora(),
                        },
                        message,
                    });
                }
                Err(err) if err.is_auth() => {
                    ctx.props().on_logout.emit(true);
                    return false;
                }
                Err(ApiError::Conflict(detail)) => {
                    component.search_result = Some(SearchOutcome::Duplicate { message: detail });
                }
                Err(ApiError::NotFound(detail)) => {
                    component.search_result = Some(SearchOutcome::Miss { message: detail });
                }
                Err(err) => {
                    error!("Falha na consulta:", err.to_string());
                    component.search_result = Some(SearchOutcome::Miss {
                        message: "Produto não encontrado ou erro no servidor".to_string(),
                    });
                }
            }
            // Every search attempt lands in one of the history lists.
            reload_history(component, ctx);
            if let Some(input) = component.search_input_ref.cast::<web_sys::HtmlInputElement>() {
                input.focus().ok();
            }
            true
        }

        // ---------- base + history ----------
        Msg::SetBase(base) => {
            if base == component.base {
                return false;
            }
            component.base = base;
            session::persist_base(base);
            component.search_result = None;
            reload_history(component, ctx);
            true
        }
        Msg::RefreshHistory => {
            reload_history(component, ctx);
            true
        }
        Msg::LoadMore(kind) => {
            begin_fetch(component, ctx, kind);
            true
        }
        Msg::FoundPage(ticket, Ok(page)) => {
            component.history.apply_found_page(ticket, page);
            true
        }
        Msg::FoundPage(ticket, Err(err)) => {
            component.history.fail_load(HistoryKind::Found, ticket);
            if !handle_auth_error(ctx, &err) {
                error!("Erro ao carregar encontrados:", err.to_string());
            }
            true
        }
        Msg::NotFoundPage(ticket, Ok(page)) => {
            component.history.apply_not_found_page(ticket, page);
            true
        }
        Msg::NotFoundPage(ticket, Err(err)) => {
            component.history.fail_load(HistoryKind::NotFound, ticket);
            if !handle_auth_error(ctx, &err) {
                error!("Erro ao carregar não encontrados:", err.to_string());
            }
            true
        }
        Msg::TotalLoaded(kind, generation, Ok(total)) => {
            component.history.apply_total(kind, generation, total);
            true
        }
        Msg::TotalLoaded(_, _, Err(err)) => {
            // A failed probe keeps the previous total on screen.
            if !handle_auth_error(ctx, &err) {
                error!("Erro ao carregar totais:", err.to_string());
            }
            false
        }
        Msg::ToggleHistory => {
            component.show_history = !component.show_history;
            true
        }

        // ---------- per-row actions ----------
        Msg::Delete(kind, id) => {
            let client = api(ctx);
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = match kind {
                    HistoryKind::Found => client.delete_found(id).await,
                    HistoryKind::NotFound => client.delete_not_found(id).await,
                };
                link.send_message(Msg::Deleted(kind, id, result));
            });
            false
        }
        Msg::Deleted(kind, id, Ok(())) => {
            component.history.delete(kind, id);
            true
        }
        Msg::Deleted(_, _, Err(err)) => {
            if !handle_auth_error(ctx, &err) {
                error!("Erro ao excluir registro:", err.to_string());
                show_toast("Erro ao excluir registro.");
            }
            false
        }
        Msg::StartEdit(id) => {
            component.editing_id = Some(id);
            component.edit_draft = component
                .history
                .not_found
                .items
                .iter()
                .find(|item| item.id == id)
                .and_then(|item| item.descricao.clone())
                .unwrap_or_default();
            true
        }
        Msg::SetEditDraft(value) => {
            component.edit_draft = value;
            false
        }
        Msg::CancelEdit => {
            component.editing_id = None;
            true
        }
        Msg::SaveDescription(id) => {
            // Blur and Enter both submit; only the first one wins.
            if component.editing_id != Some(id) {
                return false;
            }
            component.editing_id = None;
            let descricao = component.edit_draft.trim().to_string();
            let unchanged = component
                .history
                .not_found
                .items
                .iter()
                .find(|item| item.id == id)
                .is_some_and(|item| item.descricao.as_deref().unwrap_or("") == descricao);
            if unchanged {
                return true;
            }
            let client = api(ctx);
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = client.update_description(id, &descricao).await;
                link.send_message(Msg::DescriptionSaved(id, descricao, result));
            });
            true
        }
        Msg::DescriptionSaved(id, descricao, Ok(())) => {
            component.history.update_description(id, &descricao);
            true
        }
        Msg::DescriptionSaved(_, _, Err(err)) => {
            if !handle_auth_error(ctx, &err) {
                error!("Erro ao salvar descrição:", err.to_string());
                show_toast("Erro ao salvar descrição.");
            }
            false
        }
        Msg::Copy(id, code) => {
            let link = ctx.link().clone();
            spawn_local(async move {
                if let Some(window) = web_sys::window() {
                    let promise = window.navigator().clipboard().write_text(&code);
                    if JsFuture::from(promise).await.is_ok() {
                        link.send_message(Msg::Copied(id));
                    }
                }
            });
            false
        }
        Msg::Copied(id) => {
            component.copied_id = Some(id);
            let link = ctx.link().clone();
            spawn_local(async move {
                gloo_timers::future::TimeoutFuture::new(1500).await;
                link.send_message(Msg::ClearCopied(id));
            });
            true
        }
        Msg::ClearCopied(id) => {
            if component.copied_id == Some(id) {
                component.copied_id = None;
                return true;
            }
            false
        }

        // ---------- filters + export ----------
        Msg::SetFilters(options) => {
            component.filters = options;
            true
        }
        Msg::Export => {
            let found = filters::apply(&component.history.found.items, &component.filters);
            let not_found = filters::apply(&component.history.not_found.items, &component.filters);
            // Server totals only make sense for an unfiltered export.
            let unfiltered = component.filters.search_term.trim().is_empty()
                && component.filters.date_from.is_empty()
                && component.filters.date_to.is_empty();
            let totals = unfiltered.then(|| {
                (
                    component.history.found.total,
                    component.history.not_found.total,
                )
            });
            match crate::export::build_workbook(&found, &not_found, totals) {
                Ok(bytes) => {
                    crate::export::trigger_download(&bytes, &crate::export::export_file_name());
                }
                Err(err) => {
                    error!("Falha ao gerar a planilha:", err.to_string());
                    show_toast("Falha ao gerar a planilha.");
                }
            }
            false
        }

        // ---------- admin ----------
        Msg::ShowNewUser(show) => {
            component.show_new_user = show;
            if !show {
                component.new_user = NewUserForm::default();
            }
            true
        }
        Msg::SetNewUserField(field, value) => {
            match field {
                NewUserField::Email => component.new_user.email = value,
                NewUserField::Password => component.new_user.password = value,
                NewUserField::Role => {
                    component.new_user.role = common::model::auth::Role::parse(&value)
                }
                NewUserField::ClientSlug => component.new_user.client_slug = value,
            }
            true
        }
        Msg::SubmitNewUser => {
            let form = &component.new_user;
            if form.submitting || form.email.trim().is_empty() || form.password.is_empty() {
                return false;
            }
            let Some(role) = form.role else {
                show_toast("Selecione um perfil.");
                return false;
            };
            let client_slug = (ctx.props().session.is_superadmin()
                && !form.client_slug.trim().is_empty())
            .then(|| form.client_slug.trim().to_string());
            let request = NewUserRequest {
                email: form.email.trim().to_string(),
                password: form.password.clone(),
                role,
                client_slug,
            };
            component.new_user.submitting = true;

            let client = api(ctx);
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = client.create_user(&request).await;
                link.send_message(Msg::NewUserSaved(result));
            });
            true
        }
        Msg::NewUserSaved(Ok(())) => {
            component.new_user = NewUserForm::default();
            component.show_new_user = false;
            show_toast("Usuário criado com sucesso!");
            true
        }
        Msg::NewUserSaved(Err(err)) => {
            component.new_user.submitting = false;
            if !handle_auth_error(ctx, &err) {
                error!("Falha ao criar usuário:", err.to_string());
                show_toast("Falha ao criar usuário.");
            }
            true
        }
    }
}
