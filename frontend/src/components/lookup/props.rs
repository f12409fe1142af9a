use yew::prelude::*;

use crate::session::Session;

/// Properties for the `LookupScreen`.
#[derive(Properties, PartialEq, Clone)]
pub struct LookupProps {
    /// The authenticated identity. The token is threaded into every
    /// request; the role decides whether the new-user button is shown.
    pub session: Session,

    /// Fired when the session must end. The flag is `true` for a forced
    /// (silent) logout after a 401/403, `false` when the user clicked
    /// the logout button.
    pub on_logout: Callback<bool>,
}
