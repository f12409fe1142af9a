//! View rendering for the lookup screen.
//!
//! Layout, top to bottom: header (title, base toggle, admin/logout
//! actions), the search bar and its result card, a summary strip, the
//! filter/export panel, and the two history lists. Each list lives in a
//! scroll container whose scroll position drives incremental loading,
//! with a "load more" button as fallback.
//!
//! All user-facing text is in Portuguese, matching the backend's
//! messages.

use num_format::{Locale, ToFormattedString};
use web_sys::{Element, Event, HtmlInputElement, HtmlSelectElement, InputEvent, KeyboardEvent};
use yew::html::Scope;
use yew::prelude::*;

use common::model::auth::Role;
use common::model::base::BaseName;
use common::model::product::{FoundProduct, NotFoundProduct};

use crate::components::collapsible::CollapsibleSection;
use crate::filters::{self, format_datahora, FilterOptions, SortBy, SortOrder};
use crate::history::{HistoryKind, PageState};

use super::helpers::{near_bottom, success_rate};
use super::messages::{Msg, NewUserField};
use super::state::{LookupScreen, SearchOutcome};

pub fn view(component: &LookupScreen, ctx: &Context<LookupScreen>) -> Html {
    let link = ctx.link();
    html! {
        <div class="lookup-screen">
            { build_header(component, ctx) }
            { build_search_bar(component, link) }
            {
                if let Some(outcome) = &component.search_result {
                    build_search_result(outcome)
                } else {
                    html! {}
                }
            }
            { build_summary(component, link) }
            { build_filter_panel(component, link) }
            {
                if component.show_history {
                    html! {
                        <>
                            { build_found_section(component, link) }
                            { build_not_found_section(component, link) }
                        </>
                    }
                } else {
                    html! {}
                }
            }
            {
                if component.show_new_user {
                    build_new_user_dialog(component, ctx)
                } else {
                    html! {}
                }
            }
        </div>
    }
}

fn build_header(component: &LookupScreen, ctx: &Context<LookupScreen>) -> Html {
    let link = ctx.link();
    let on_logout = ctx.props().on_logout.clone();
    html! {
        <header class="lookup-header">
            <h2>{ "Sistema de Consulta de Códigos de Barras" }</h2>
            <div class="header-actions">
                <div class="base-toggle">
                    { base_button(component, link, BaseName::Homecenter) }
                    { base_button(component, link, BaseName::Mercado) }
                </div>
                {
                    if ctx.props().session.is_superadmin() {
                        html! {
                            <button class="icon-btn" title="Novo usuário"
                                onclick={link.callback(|_| Msg::ShowNewUser(true))}>
                                <i class="material-icons">{ "person_add" }</i>
                            </button>
                        }
                    } else {
                        html! {}
                    }
                }
                <button class="icon-btn" title="Sair"
                    onclick={Callback::from(move |_| on_logout.emit(false))}>
                    <i class="material-icons">{ "logout" }</i>
                </button>
            </div>
        </header>
    }
}

fn base_button(component: &LookupScreen, link: &Scope<LookupScreen>, base: BaseName) -> Html {
    let active = if component.base == base { "active" } else { "" };
    html! {
        <button
            class={classes!("base-btn", active)}
            onclick={link.callback(move |_| Msg::SetBase(base))}
        >
            { base.label() }
        </button>
    }
}

fn build_search_bar(component: &LookupScreen, link: &Scope<LookupScreen>) -> Html {
    let on_input = link.callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::SetSearchCode(input.value())
    });
    let on_keydown =
        link.batch_callback(|e: KeyboardEvent| (e.key() == "Enter").then_some(Msg::Search));
    html! {
        <div class="search-bar">
            <input
                ref={component.search_input_ref.clone()}
                placeholder="Digite ou escaneie o código de barras"
                value={component.search_code.clone()}
                oninput={on_input}
                onkeydown={on_keydown}
            />
            <button
                disabled={component.searching}
                onclick={link.callback(|_| Msg::Search)}
            >
                <i class="material-icons">{ "search" }</i>
                { if component.searching { " Consultando..." } else { " Consultar" } }
            </button>
        </div>
    }
}

fn build_search_result(outcome: &SearchOutcome) -> Html {
    match outcome {
        SearchOutcome::Found { product, message } => html! {
            <div class="search-result found">
                <i class="material-icons">{ "check_circle" }</i>
                <div class="search-result-body">
                    <strong>{ message }</strong>
                    <span>{ product.descricao.as_deref().unwrap_or("Sem descrição") }</span>
                    <span class="search-result-codes">
                        { format!("Cód. auxiliar {} • Cód. produto {}", product.codauxiliar, product.codprod) }
                    </span>
                </div>
            </div>
        },
        SearchOutcome::Duplicate { message } => html! {
            <div class="search-result duplicate">
                <i class="material-icons">{ "warning" }</i>
                <div class="search-result-body">
                    <strong>{ message }</strong>
                </div>
            </div>
        },
        SearchOutcome::Miss { message } => html! {
            <div class="search-result miss">
                <i class="material-icons">{ "cancel" }</i>
                <div class="search-result-body">
                    <strong>{ message }</strong>
                </div>
            </div>
        },
    }
}

fn build_summary(component: &LookupScreen, link: &Scope<LookupScreen>) -> Html {
    let found_total = component.history.found.total;
    let not_found_total = component.history.not_found.total;
    let rate = success_rate(found_total, not_found_total)
        .map(|pct| format!("{:.1}%", pct))
        .unwrap_or_else(|| "–".to_string());
    html! {
        <div class="summary-strip">
            <span class="summary-item found">
                { format!("Encontrados: {}", found_total.to_formatted_string(&Locale::pt)) }
            </span>
            <span class="summary-item not-found">
                { format!("Não encontrados: {}", not_found_total.to_formatted_string(&Locale::pt)) }
            </span>
            <span class="summary-item rate">{ format!("Taxa de acerto: {}", rate) }</span>
            <button class="icon-btn" title="Atualizar histórico"
                onclick={link.callback(|_| Msg::RefreshHistory)}>
                <i class="material-icons">{ "refresh" }</i>
            </button>
            <button class="icon-btn" title="Mostrar/ocultar histórico"
                onclick={link.callback(|_| Msg::ToggleHistory)}>
                <i class="material-icons">
                    { if component.show_history { "visibility_off" } else { "visibility" } }
                </i>
            </button>
        </div>
    }
}

fn build_filter_panel(component: &LookupScreen, link: &Scope<LookupScreen>) -> Html {
    html! {
        <CollapsibleSection title="Filtros e exportação" icon="filter_list">
            <div class="filter-row">
                <input
                    placeholder="Filtrar por código ou descrição"
                    value={component.filters.search_term.clone()}
                    oninput={patch_filters(link, &component.filters, |f, value| f.search_term = value)}
                />
                <label>
                    { "De " }
                    <input type="date"
                        value={component.filters.date_from.clone()}
                        oninput={patch_filters(link, &component.filters, |f, value| f.date_from = value)}
                    />
                </label>
                <label>
                    { "Até " }
                    <input type="date"
                        value={component.filters.date_to.clone()}
                        oninput={patch_filters(link, &component.filters, |f, value| f.date_to = value)}
                    />
                </label>
            </div>
            <div class="filter-row">
                <select
                    value={sort_by_value(component.filters.sort_by)}
                    onchange={on_sort_by(link, &component.filters)}
                >
                    <option value="date" selected={component.filters.sort_by == SortBy::Date}>{ "Data" }</option>
                    <option value="code" selected={component.filters.sort_by == SortBy::Code}>{ "Código" }</option>
                    <option value="description" selected={component.filters.sort_by == SortBy::Description}>{ "Descrição" }</option>
                </select>
                <select
                    value={sort_order_value(component.filters.sort_order)}
                    onchange={on_sort_order(link, &component.filters)}
                >
                    <option value="desc" selected={component.filters.sort_order == SortOrder::Desc}>{ "Decrescente" }</option>
                    <option value="asc" selected={component.filters.sort_order == SortOrder::Asc}>{ "Crescente" }</option>
                </select>
                <button onclick={link.callback(|_| Msg::SetFilters(FilterOptions::default()))}>
                    <i class="material-icons">{ "filter_alt_off" }</i>
                    { " Limpar" }
                </button>
                <button onclick={link.callback(|_| Msg::Export)}>
                    <i class="material-icons">{ "file_download" }</i>
                    { " Exportar Excel" }
                </button>
            </div>
        </CollapsibleSection>
    }
}

fn sort_by_value(sort_by: SortBy) -> &'static str {
    match sort_by {
        SortBy::Date => "date",
        SortBy::Code => "code",
        SortBy::Description => "description",
    }
}

fn sort_order_value(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => "asc",
        SortOrder::Desc => "desc",
    }
}

/// Builds an `oninput` callback that clones the current criteria, lets
/// `set` patch one field with the input's value, and submits the result.
fn patch_filters(
    link: &Scope<LookupScreen>,
    current: &FilterOptions,
    set: impl Fn(&mut FilterOptions, String) + 'static,
) -> Callback<InputEvent> {
    let current = current.clone();
    link.callback(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let mut next = current.clone();
        set(&mut next, input.value());
        Msg::SetFilters(next)
    })
}

fn on_sort_by(link: &Scope<LookupScreen>, current: &FilterOptions) -> Callback<Event> {
    let current = current.clone();
    link.callback(move |e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        let mut next = current.clone();
        next.sort_by = match select.value().as_str() {
            "code" => SortBy::Code,
            "description" => SortBy::Description,
            _ => SortBy::Date,
        };
        Msg::SetFilters(next)
    })
}

fn on_sort_order(link: &Scope<LookupScreen>, current: &FilterOptions) -> Callback<Event> {
    let current = current.clone();
    link.callback(move |e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        let mut next = current.clone();
        next.sort_order = if select.value() == "asc" {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        };
        Msg::SetFilters(next)
    })
}

/// Scroll handler for a history container: requests the next page when
/// the viewport enters the proximity band.
fn on_scroll(link: &Scope<LookupScreen>, kind: HistoryKind) -> Callback<Event> {
    link.batch_callback(move |e: Event| {
        let target: Element = e.target_dyn_into()?;
        near_bottom(
            target.scroll_top(),
            target.client_height(),
            target.scroll_height(),
        )
        .then_some(Msg::LoadMore(kind))
    })
}

fn build_list_footer<T>(
    link: &Scope<LookupScreen>,
    kind: HistoryKind,
    state: &PageState<T>,
) -> Html {
    html! {
        <>
            if state.loading {
                <div class="list-loading">{ "Carregando..." }</div>
            }
            if state.has_more && !state.loading {
                <button class="load-more" onclick={link.callback(move |_| Msg::LoadMore(kind))}>
                    { "Carregar mais" }
                </button>
            }
        </>
    }
}

fn copy_button(link: &Scope<LookupScreen>, copied_id: Option<i64>, id: i64, code: &str) -> Html {
    let code = code.to_string();
    let icon = if copied_id == Some(id) { "check" } else { "content_copy" };
    html! {
        <button class="icon-btn small" title="Copiar código"
            onclick={link.callback(move |_| Msg::Copy(id, code.clone()))}>
            <i class="material-icons">{ icon }</i>
        </button>
    }
}

fn delete_button(link: &Scope<LookupScreen>, kind: HistoryKind, id: i64) -> Html {
    html! {
        <button class="icon-btn small danger" title="Excluir"
            onclick={link.callback(move |_| Msg::Delete(kind, id))}>
            <i class="material-icons">{ "delete" }</i>
        </button>
    }
}

fn build_found_section(component: &LookupScreen, link: &Scope<LookupScreen>) -> Html {
    let state = &component.history.found;
    let items = filters::apply(&state.items, &component.filters);
    let badge = format!("{} / {}", state.items.len(), state.total);
    html! {
        <CollapsibleSection
            title="Produtos Encontrados"
            icon="check_circle"
            badge={badge}
            default_expanded=true
        >
            <div class="history-list" onscroll={on_scroll(link, HistoryKind::Found)}>
                {
                    if items.is_empty() && !state.loading {
                        html! { <div class="list-empty">{ "Nada encontrado ainda." }</div> }
                    } else {
                        items.iter().map(|item| found_row(component, link, item)).collect::<Html>()
                    }
                }
                { build_list_footer(link, HistoryKind::Found, state) }
            </div>
        </CollapsibleSection>
    }
}

fn found_row(component: &LookupScreen, link: &Scope<LookupScreen>, item: &FoundProduct) -> Html {
    html! {
        <div class="history-row" key={item.id}>
            <div class="row-main">
                <span class="row-code">{ &item.codauxiliar }</span>
                { copy_button(link, component.copied_id, item.id, &item.codauxiliar) }
                <span class="row-chip">{ &item.codprod }</span>
                <span class="row-desc">
                    { item.descricao.as_deref().unwrap_or("Sem descrição") }
                </span>
            </div>
            <div class="row-side">
                <span class="row-date">{ format_datahora(&item.datahora) }</span>
                { delete_button(link, HistoryKind::Found, item.id) }
            </div>
        </div>
    }
}

fn build_not_found_section(component: &LookupScreen, link: &Scope<LookupScreen>) -> Html {
    let state = &component.history.not_found;
    let items = filters::apply(&state.items, &component.filters);
    let badge = format!("{} / {}", state.items.len(), state.total);
    html! {
        <CollapsibleSection
            title="Produtos Não Encontrados"
            icon="cancel"
            badge={badge}
            default_expanded=true
        >
            <div class="history-list" onscroll={on_scroll(link, HistoryKind::NotFound)}>
                {
                    if items.is_empty() && !state.loading {
                        html! { <div class="list-empty">{ "Nenhum item registrado." }</div> }
                    } else {
                        items.iter().map(|item| not_found_row(component, link, item)).collect::<Html>()
                    }
                }
                { build_list_footer(link, HistoryKind::NotFound, state) }
            </div>
        </CollapsibleSection>
    }
}

fn not_found_row(
    component: &LookupScreen,
    link: &Scope<LookupScreen>,
    item: &NotFoundProduct,
) -> Html {
    let id = item.id;
    let description = if component.editing_id == Some(id) {
        let on_input = link.callback(|e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::SetEditDraft(input.value())
        });
        let on_keydown = link.batch_callback(move |e: KeyboardEvent| match e.key().as_str() {
            "Enter" => Some(Msg::SaveDescription(id)),
            "Escape" => Some(Msg::CancelEdit),
            _ => None,
        });
        html! {
            <input
                ref={component.edit_input_ref.clone()}
                class="edit-desc"
                value={component.edit_draft.clone()}
                oninput={on_input}
                onkeydown={on_keydown}
                onblur={link.callback(move |_| Msg::SaveDescription(id))}
            />
        }
    } else {
        html! {
            <span class="row-desc editable" title="Clique para editar"
                onclick={link.callback(move |_| Msg::StartEdit(id))}>
                { item.descricao.as_deref().unwrap_or("Sem descrição") }
            </span>
        }
    };
    html! {
        <div class="history-row" key={id}>
            <div class="row-main">
                <span class="row-code">{ &item.codauxiliar }</span>
                { copy_button(link, component.copied_id, id, &item.codauxiliar) }
                { description }
            </div>
            <div class="row-side">
                <span class="row-date">{ format_datahora(&item.datahora) }</span>
                { delete_button(link, HistoryKind::NotFound, id) }
            </div>
        </div>
    }
}

fn build_new_user_dialog(component: &LookupScreen, ctx: &Context<LookupScreen>) -> Html {
    let link = ctx.link();
    let form = &component.new_user;
    let field_input = |field: NewUserField| {
        link.callback(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::SetNewUserField(field, input.value())
        })
    };
    let on_role = link.callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        Msg::SetNewUserField(NewUserField::Role, select.value())
    });
    html! {
        <div class="dialog-overlay">
            <div class="dialog">
                <h3>{ "Novo usuário" }</h3>
                <input
                    placeholder="Email"
                    value={form.email.clone()}
                    oninput={field_input(NewUserField::Email)}
                />
                <input
                    placeholder="Senha"
                    type="password"
                    value={form.password.clone()}
                    oninput={field_input(NewUserField::Password)}
                />
                <select onchange={on_role}>
                    <option value="" selected={form.role.is_none()} disabled=true>{ "Perfil" }</option>
                    <option value="user" selected={form.role == Some(Role::User)}>{ "Usuário" }</option>
                    <option value="admin" selected={form.role == Some(Role::Admin)}>{ "Administrador" }</option>
                    <option value="superadmin" selected={form.role == Some(Role::Superadmin)}>{ "Superadmin" }</option>
                </select>
                {
                    if ctx.props().session.is_superadmin() {
                        html! {
                            <input
                                placeholder="Cliente (slug, opcional)"
                                value={form.client_slug.clone()}
                                oninput={field_input(NewUserField::ClientSlug)}
                            />
                        }
                    } else {
                        html! {}
                    }
                }
                <div class="dialog-actions">
                    <button onclick={link.callback(|_| Msg::ShowNewUser(false))}>
                        { "Cancelar" }
                    </button>
                    <button
                        disabled={form.submitting}
                        onclick={link.callback(|_| Msg::SubmitNewUser)}
                    >
                        { "Criar" }
                    </button>
                </div>
            </div>
        </div>
    }
}
