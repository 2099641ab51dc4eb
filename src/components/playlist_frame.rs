use crate::api::{HttpBackend, Track};
use crate::config::AppConfig;
use crate::navigator::{page_first_seq, InnerNavigator};
use dioxus::prelude::*;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
type Port = crate::navigator::TopWindowPort;
#[cfg(not(target_arch = "wasm32"))]
type Port = crate::navigator::LoggingPort;

fn new_port() -> Port {
    #[cfg(target_arch = "wasm32")]
    {
        crate::navigator::TopWindowPort::new(None)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        crate::navigator::LoggingPort
    }
}

/// A playlist page shown inside the shell's iframe.
#[component]
pub fn PlaylistFrame(playlist_id: String, name: String) -> Element {
    let config = use_hook(AppConfig::from_document);
    let navigator = use_hook(|| Rc::new(InnerNavigator::with_first_seq(new_port(), page_first_seq())));

    {
        let navigator = navigator.clone();
        let name = name.clone();
        use_hook(move || {
            if let Err(err) = navigator.set_page_name(name) {
                tracing::warn!("Could not announce page name: {err}");
            }
        });
    }

    let tracks = use_resource({
        let config = config.clone();
        let playlist_id = playlist_id.clone();
        move || {
            let config = config.clone();
            let playlist_id = playlist_id.clone();
            async move {
                let backend = HttpBackend::from_config(&config)?;
                crate::api::Backend::playlist_tracks(&backend, &playlist_id).await
            }
        }
    });

    let on_back = {
        let navigator = navigator.clone();
        move |_: MouseEvent| {
            if let Err(err) = navigator.send_iframe_backwards() {
                tracing::warn!("Back request failed: {err}");
            }
        }
    };

    let body = match &*tracks.read() {
        None => rsx! { p { class: "frame-status", "Loading tracks..." } },
        Some(Err(err)) => {
            tracing::error!("Playlist {playlist_id} failed to load: {err}");
            rsx! { p { class: "frame-status error", "Could not load this playlist." } }
        }
        Some(Ok(list)) if list.is_empty() => {
            rsx! { p { class: "frame-status", "This playlist is empty." } }
        }
        Some(Ok(list)) => {
            let ids: Vec<String> = list.iter().map(|track| track.id.clone()).collect();
            rsx! {
                button {
                    class: "play-all",
                    r#type: "button",
                    onclick: {
                        let navigator = navigator.clone();
                        let config = config.clone();
                        let playlist_id = playlist_id.clone();
                        let name = name.clone();
                        move |_: MouseEvent| {
                            let navigator = navigator.clone();
                            let config = config.clone();
                            let playlist_id = playlist_id.clone();
                            let name = name.clone();
                            // Refetch so "Play all" queues the playlist as it is now.
                            spawn(async move {
                                let queued = match HttpBackend::from_config(&config) {
                                    Ok(backend) => {
                                        navigator.play_playlist(&backend, &playlist_id, &name, 0).await
                                    }
                                    Err(err) => Err(err),
                                };
                                match queued {
                                    Ok(playlist) => tracing::debug!(
                                        "Queued {} tracks from {}",
                                        playlist.track_ids.len(),
                                        playlist.name
                                    ),
                                    Err(err) => tracing::warn!("Could not play playlist {name}: {err}"),
                                }
                            });
                        }
                    },
                    "Play all"
                }
                ol { class: "track-list",
                    for (index, track) in list.iter().enumerate() {
                        TrackRow {
                            key: "{track.id}",
                            track: track.clone(),
                            on_play: {
                                let navigator = navigator.clone();
                                let ids = ids.clone();
                                let name = name.clone();
                                move |_: MouseEvent| queue_from(&navigator, ids.clone(), &name, index)
                            },
                            on_play_single: {
                                let navigator = navigator.clone();
                                let id = track.id.clone();
                                move |_: MouseEvent| {
                                    if let Err(err) = navigator.play_individual_track(id.clone()) {
                                        tracing::warn!("Could not queue track {id}: {err}");
                                    }
                                }
                            },
                        }
                    }
                }
            }
        }
    };

    rsx! {
        div { class: "playlist-frame",
            div { class: "frame-header",
                button { class: "frame-back", r#type: "button", onclick: on_back, "Back" }
                h1 { "{name}" }
            }
            {body}
        }
    }
}

fn queue_from(navigator: &InnerNavigator<Port>, ids: Vec<String>, name: &str, position: usize) {
    if let Err(err) = navigator.set_queue(ids, name, position) {
        tracing::warn!("Could not queue playlist {name}: {err}");
    }
}

#[component]
fn TrackRow(track: Track, on_play: EventHandler<MouseEvent>, on_play_single: EventHandler<MouseEvent>) -> Element {
    let title = if track.title.is_empty() {
        format!("Track {}", track.id)
    } else {
        track.title.clone()
    };
    rsx! {
        li { class: "track-row",
            button {
                class: "track-title",
                r#type: "button",
                onclick: move |evt| on_play.call(evt),
                "{title}"
            }
            button {
                class: "track-single",
                r#type: "button",
                title: "Play only this track",
                onclick: move |evt| on_play_single.call(evt),
                "▶"
            }
        }
    }
}
