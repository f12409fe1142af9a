//! Lookup screen: root module wiring the Yew `Component` implementation
//! with submodules for state, update logic, view rendering, and helpers.
//!
//! On first render the history of the persisted base is loaded and the
//! search input grabs focus; whenever an inline description edit starts,
//! its input grabs focus instead.

use web_sys::HtmlInputElement;
use yew::prelude::*;

mod helpers;
mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::LookupProps;
pub use state::LookupScreen;

impl Component for LookupScreen {
    type Message = Msg;
    type Properties = LookupProps;

    fn create(_ctx: &Context<Self>) -> Self {
        LookupScreen::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && !self.loaded {
            self.loaded = true;
            ctx.link().send_message(Msg::RefreshHistory);
            if let Some(input) = self.search_input_ref.cast::<HtmlInputElement>() {
                input.focus().ok();
            }
            return;
        }
        if self.editing_id.is_some() {
            if let Some(input) = self.edit_input_ref.cast::<HtmlInputElement>() {
                input.focus().ok();
            }
        }
    }
}
