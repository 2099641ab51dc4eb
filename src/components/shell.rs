use crate::components::Player;
use crate::config::AppConfig;
use dioxus::prelude::*;

/// The outer page: overlay menu, the browsing iframe and the player bar.
#[component]
pub fn Shell() -> Element {
    let config = use_hook(AppConfig::from_document);

    #[cfg(target_arch = "wasm32")]
    {
        use crate::components::dom::{mount, ShellBinding};
        use std::cell::RefCell;
        use std::rc::Rc;

        let mounted = use_hook(|| Rc::new(RefCell::new(None::<ShellBinding>)));
        let config = config.clone();
        use_effect(move || {
            if mounted.borrow().is_some() {
                return;
            }
            match mount(config.clone()) {
                Ok(binding) => {
                    tracing::info!("Player attached");
                    *mounted.borrow_mut() = Some(binding);
                }
                Err(err) => tracing::error!("Could not attach all player elements: {err}"),
            }
        });
    }

    let ids = config.elements.clone();
    rsx! {
        div { class: "shell",
            div {
                id: ids.overlay_menu.clone(),
                class: "large-menu",
                style: "display: none;",
            }
            iframe {
                id: ids.frame.clone(),
                class: "content-frame",
                src: config.home_location.clone(),
            }
            Player { ids: ids.clone(), play_icon: config.play_icon.clone() }
        }
    }
}
