use crate::components::{PlaylistFrame, Shell};
use dioxus::prelude::*;

#[derive(Clone, Debug, PartialEq, Routable)]
#[rustfmt::skip]
pub enum Route {
    #[route("/")]
    Shell {},
    #[route("/frame/playlist/:playlist_id/:name")]
    PlaylistFrame { playlist_id: String, name: String },
}

#[component]
pub fn App() -> Element {
    rsx! {
        document::Meta { name: "theme-color", content: "#1f1b2e" }
        Router::<Route> {}
    }
}
