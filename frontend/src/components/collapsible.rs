use yew::{html, Children, Component, Context, Html, Properties};

#[derive(Properties, PartialEq)]
pub struct CollapsibleProps {
    pub title: String,
    /// Material icon name shown next to the title.
    #[prop_or_default]
    pub icon: String,
    /// Optional pill rendered after the title, e.g. "50 / 734".
    #[prop_or_default]
    pub badge: Option<String>,
    #[prop_or_default]
    pub default_expanded: bool,
    pub children: Children,
}

pub enum Msg {
    Toggle,
}

pub struct CollapsibleSection {
    expanded: bool,
}

impl Component for CollapsibleSection {
    type Message = Msg;
    type Properties = CollapsibleProps;

    fn create(ctx: &Context<Self>) -> Self {
        CollapsibleSection {
            expanded: ctx.props().default_expanded,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Toggle => {
                self.expanded = !self.expanded;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let chevron = if self.expanded { "expand_less" } else { "expand_more" };
        html! {
            <div class="collapsible">
                <button class="collapsible-header" onclick={ctx.link().callback(|_| Msg::Toggle)}>
                    <span class="collapsible-title">
                        if !props.icon.is_empty() {
                            <i class="material-icons">{ &props.icon }</i>
                        }
                        <span>{ &props.title }</span>
                        if let Some(badge) = &props.badge {
                            <span class="collapsible-badge">{ badge }</span>
                        }
                    </span>
                    <i class="material-icons">{ chevron }</i>
                </button>
                if self.expanded {
                    <div class="collapsible-body">
                        { for props.children.iter() }
                    </div>
                }
            </div>
        }
    }
}
