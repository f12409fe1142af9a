//! Component state for the authenticated lookup screen.
//!
//! Holds the active base selection, the search box and its last outcome,
//! the history pagination controller, the filter criteria, and the small
//! pieces of per-row UI state (copy feedback, inline description edit,
//! the new-user dialog).
//!
//! Fields are `pub` because they are accessed by the `view` and `update`
//! modules.

use yew::prelude::*;

use common::model::auth::Role;
use common::model::base::BaseName;
use common::model::product::FoundProduct;

use crate::filters::FilterOptions;
use crate::history::HistoryState;
use crate::session;

/// Outcome of the last product search, rendered as a result card under
/// the search bar.
#[derive(Clone, PartialEq)]
pub enum SearchOutcome {
    /// The backend answered with a product row.
    Found {
        product: FoundProduct,
        message: String,
    },
    /// 409: the code was already registered for this tenant.
    Duplicate { message: String },
    /// 404 or any other failure worth showing inline.
    Miss { message: String },
}

/// Draft of the privileged new-user dialog.
#[derive(Clone, Default, PartialEq)]
pub struct NewUserForm {
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
    pub client_slug: String,
    pub submitting: bool,
}

/// Main state container for the `LookupScreen`.
pub struct LookupScreen {
    /// Active dataset; restored from storage on mount and persisted on
    /// every switch.
    pub base: BaseName,

    /// Raw content of the search input.
    pub search_code: String,

    /// A search request is in flight (disables the button).
    pub searching: bool,

    /// Last search outcome, cleared by the next search and by a base
    /// switch.
    pub search_result: Option<SearchOutcome>,

    /// Cursor-paginated history of both collections.
    pub history: HistoryState,

    /// Client-side filter/sort criteria applied to the materialized
    /// history.
    pub filters: FilterOptions,

    /// Whether the two history lists are shown at all.
    pub show_history: bool,

    /// Row whose code was just copied (shows a checkmark for a moment).
    pub copied_id: Option<i64>,

    /// Not-found row currently in inline description edit, if any, and
    /// the controlled draft of its description.
    pub editing_id: Option<i64>,
    pub edit_draft: String,

    /// Whether the new-user dialog is open.
    pub show_new_user: bool,
    pub new_user: NewUserForm,

    pub search_input_ref: NodeRef,
    pub edit_input_ref: NodeRef,

    /// Guard to avoid running first-render initialization more than once.
    pub loaded: bool,
}

impl LookupScreen {
    pub fn new() -> Self {
        LookupScreen {
            base: session::stored_base(),
            search_code: String::new(),
            searching: false,
            search_result: None,
            history: HistoryState::new(),
            filters: FilterOptions::default(),
            show_history: true,
            copied_id: None,
            editing_id: None,
            edit_draft: String::new(),
            show_new_user: false,
            new_user: NewUserForm::default(),
            search_input_ref: NodeRef::default(),
            edit_input_ref: NodeRef::default(),
            loaded: false,
        }
    }
}
