use common::model::base::BaseName;
use common::model::page::CursorPage;
use common::model::product::{FoundProduct, NotFoundProduct, ProductHit};

use crate::api::ApiError;
use crate::filters::FilterOptions;
use crate::history::{HistoryKind, LoadTicket};

/// Field selector for the new-user dialog inputs.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum NewUserField {
    Email,
    Password,
    Role,
    ClientSlug,
}

pub enum Msg {
    // search
    SetSearchCode(String),
    Search,
    SearchFinished(Result<ProductHit, ApiError>),

    // base + history
    SetBase(BaseName),
    RefreshHistory,
    LoadMore(HistoryKind),
    FoundPage(LoadTicket, Result<CursorPage<FoundProduct>, ApiError>),
    NotFoundPage(LoadTicket, Result<CursorPage<NotFoundProduct>, ApiError>),
    TotalLoaded(HistoryKind, u64, Result<u64, ApiError>),
    ToggleHistory,

    // per-row actions
    Delete(HistoryKind, i64),
    Deleted(HistoryKind, i64, Result<(), ApiError>),
    StartEdit(i64),
    SetEditDraft(String),
    CancelEdit,
    SaveDescription(i64),
    DescriptionSaved(i64, String, Result<(), ApiError>),
    Copy(i64, String),
    Copied(i64),
    ClearCopied(i64),

    // filters + export
    SetFilters(FilterOptions),
    Export,

    // admin
    ShowNewUser(bool),
    SetNewUserField(NewUserField, String),
    SubmitNewUser,
    NewUserSaved(Result<(), ApiError>),
}
