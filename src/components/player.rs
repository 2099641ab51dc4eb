use crate::config::ElementIds;
use dioxus::prelude::*;

/// Transport controls, track details and the snake. Event handling is
/// attached by the DOM binding, so the markup only carries ids.
#[component]
pub fn Player(ids: ElementIds, play_icon: String) -> Element {
    rsx! {
        div { class: "player",
            div { id: ids.snake.clone(), class: "player-snake",
                div {
                    id: ids.snake_slider.clone(),
                    class: "player-snake-slider",
                    style: "width: 0%;",
                }
            }
            div { id: ids.slider_circle.clone(), class: "slide-circle" }
            div { class: "player-body",
                div { class: "player-controls",
                    button {
                        id: ids.skip_backwards.clone(),
                        r#type: "button",
                        class: "skip-button",
                        title: "Previous track",
                        "⏮"
                    }
                    img {
                        id: ids.toggle.clone(),
                        class: "toggle-button",
                        src: play_icon,
                        alt: "Play or pause",
                    }
                    button {
                        id: ids.skip_forwards.clone(),
                        r#type: "button",
                        class: "skip-button",
                        title: "Next track",
                        "⏭"
                    }
                }
                div { id: ids.track_data.clone(), class: "track-data" }
            }
        }
    }
}
