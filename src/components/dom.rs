//! Browser binding for the outer shell.
//!
//! Attaches the controller to the host page: looks up the attachment
//! points, creates the audio element and registers every event
//! subscription. All handlers run on the UI thread and borrow the
//! controller only for the duration of a synchronous call.

use crate::api::{AudioPayload, HttpBackend};
use crate::config::{AppConfig, ElementIds};
use crate::error::{PlayerError, Result};
use crate::playback::{
    load_track, AudioOutput, BarGeometry, LoadTicket, OuterController, PlayerUi, ToggleIcon,
};
use gloo_timers::callback::Interval;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, error, warn};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, Blob, BlobPropertyBag, Document, Event, EventTarget, HtmlAudioElement, HtmlElement,
    HtmlIFrameElement, HtmlImageElement, KeyboardEvent, MessageEvent, MouseEvent, Url,
};

pub type ShellController = OuterController<DomPlayerUi, DomAudio>;
pub type SharedController = Rc<RefCell<ShellController>>;

const LOADING_CLASS: &str = "spin";
const KNOB_HALF_WIDTH: f64 = 5.0;

#[derive(Clone)]
struct ShellElements {
    skip_forwards: HtmlElement,
    skip_backwards: HtmlElement,
    toggle: HtmlImageElement,
    track_data: HtmlElement,
    snake: HtmlElement,
    snake_slider: HtmlElement,
    slider_circle: HtmlElement,
    frame: HtmlIFrameElement,
    overlay_menu: Option<HtmlElement>,
}

impl ShellElements {
    fn attach(document: &Document, ids: &ElementIds) -> Result<Self> {
        let overlay_menu = lookup::<HtmlElement>(document, &ids.overlay_menu).ok();
        if overlay_menu.is_none() {
            warn!("#{} not found; navigation will not collapse it", ids.overlay_menu);
        }
        Ok(Self {
            skip_forwards: lookup(document, &ids.skip_forwards)?,
            skip_backwards: lookup(document, &ids.skip_backwards)?,
            toggle: lookup(document, &ids.toggle)?,
            track_data: lookup(document, &ids.track_data)?,
            snake: lookup(document, &ids.snake)?,
            snake_slider: lookup(document, &ids.snake_slider)?,
            slider_circle: lookup(document, &ids.slider_circle)?,
            frame: lookup(document, &ids.frame)?,
            overlay_menu,
        })
    }

    fn bar(&self) -> BarGeometry {
        let rect = self.snake.get_bounding_client_rect();
        BarGeometry::new(rect.left(), rect.width())
    }
}

fn lookup<T: JsCast>(document: &Document, id: &str) -> Result<T> {
    document
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<T>().ok())
        .ok_or_else(|| PlayerError::missing_element(id))
}

fn dom_error(context: &str, err: JsValue) -> PlayerError {
    PlayerError::Dom(format!("{context}: {err:?}"))
}

/// Find the shell's audio element, creating it on first use.
fn get_or_create_audio_element(document: &Document, id: &str) -> Result<HtmlAudioElement> {
    if let Some(existing) = document.get_element_by_id(id) {
        return existing
            .dyn_into::<HtmlAudioElement>()
            .map_err(|_| PlayerError::missing_element(id));
    }

    let audio: HtmlAudioElement = document
        .create_element("audio")
        .map_err(|e| dom_error("create <audio>", e))?
        .dyn_into()
        .map_err(|_| PlayerError::Dom("created element is not <audio>".to_string()))?;
    audio.set_id(id);
    let body = document
        .body()
        .ok_or_else(|| PlayerError::missing_element("body"))?;
    body.append_child(&audio)
        .map_err(|e| dom_error("append <audio>", e))?;
    Ok(audio)
}

// ===== UI binding =====

pub struct DomPlayerUi {
    document: Document,
    elements: ShellElements,
    play_icon: String,
    pause_icon: String,
    refresh: Option<Interval>,
    tick: Rc<dyn Fn()>,
}

impl DomPlayerUi {
    fn new(document: Document, elements: ShellElements, config: &AppConfig, tick: Rc<dyn Fn()>) -> Self {
        Self {
            document,
            elements,
            play_icon: config.play_icon.clone(),
            pause_icon: config.pause_icon.clone(),
            refresh: None,
            tick,
        }
    }

    fn set_style(element: &HtmlElement, property: &str, value: &str) {
        if let Err(err) = element.style().set_property(property, value) {
            warn!("Could not set {property}: {err:?}");
        }
    }

    fn append_text(&self, parent: &HtmlElement, tag: &str, text: &str) {
        match self.document.create_element(tag) {
            Ok(node) => {
                node.set_text_content(Some(text));
                if let Err(err) = parent.append_child(&node) {
                    warn!("Could not append <{tag}>: {err:?}");
                }
            }
            Err(err) => warn!("Could not create <{tag}>: {err:?}"),
        }
    }
}

impl PlayerUi for DomPlayerUi {
    fn set_document_title(&mut self, title: &str) {
        self.document.set_title(title);
    }

    fn show_track_details(&mut self, title: &str, playlist_name: &str) {
        let container = self.elements.track_data.clone();
        container.set_inner_html("");
        self.append_text(&container, "strong", title);
        match self.document.create_element("br") {
            Ok(br) => {
                if let Err(err) = container.append_child(&br) {
                    warn!("Could not append <br>: {err:?}");
                }
            }
            Err(err) => warn!("Could not create <br>: {err:?}"),
        }
        self.append_text(&container, "i", playlist_name);
    }

    fn set_toggle_icon(&mut self, icon: ToggleIcon) {
        let src = match icon {
            ToggleIcon::Play => &self.play_icon,
            ToggleIcon::Pause => &self.pause_icon,
        };
        self.elements.toggle.set_src(src);
    }

    fn set_loading(&mut self, loading: bool) {
        let classes = self.elements.toggle.class_list();
        let result = if loading {
            classes.add_1(LOADING_CLASS)
        } else {
            classes.remove_1(LOADING_CLASS)
        };
        if let Err(err) = result {
            warn!("Could not toggle loading class: {err:?}");
        }
    }

    fn set_snake_progress(&mut self, fraction: f64) {
        let fraction = fraction.clamp(0.0, 1.0);
        Self::set_style(
            &self.elements.snake_slider,
            "width",
            &format!("{}%", fraction * 100.0),
        );

        let bar = self.elements.snake.get_bounding_client_rect();
        let left = bar.left() + bar.width() * fraction - KNOB_HALF_WIDTH;
        Self::set_style(&self.elements.slider_circle, "left", &format!("{left}px"));
        Self::set_style(
            &self.elements.slider_circle,
            "top",
            &format!("{}px", bar.top() - 2.5),
        );
    }

    fn set_knob_active(&mut self, active: bool) {
        if active {
            Self::set_style(&self.elements.slider_circle, "opacity", "1");
        } else if let Err(err) = self.elements.slider_circle.style().remove_property("opacity") {
            warn!("Could not reset knob opacity: {err:?}");
        }
    }

    fn navigate_frame(&mut self, location: &str) {
        self.elements.frame.set_src(location);
    }

    fn hide_overlay_menu(&mut self) {
        if let Some(menu) = &self.elements.overlay_menu {
            Self::set_style(menu, "display", "none");
        }
    }

    fn start_snake_refresh(&mut self, interval_ms: u32) {
        let tick = self.tick.clone();
        self.refresh = Some(Interval::new(interval_ms, move || tick()));
    }

    fn stop_snake_refresh(&mut self) {
        // Dropping the interval cancels it.
        self.refresh = None;
    }
}

// ===== Audio binding =====

pub struct DomAudio {
    element: HtmlAudioElement,
    object_url: Option<String>,
}

impl DomAudio {
    fn new(element: HtmlAudioElement) -> Self {
        Self {
            element,
            object_url: None,
        }
    }
}

impl AudioOutput for DomAudio {
    fn bind(&mut self, payload: &AudioPayload) -> Result<()> {
        let bytes = js_sys::Uint8Array::from(payload.bytes.as_slice());
        let parts = js_sys::Array::of1(&bytes);
        let options = BlobPropertyBag::new();
        options.set_type(&payload.mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|e| PlayerError::Audio(format!("blob: {e:?}")))?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|e| PlayerError::Audio(format!("object url: {e:?}")))?;

        if let Some(previous) = self.object_url.replace(url.clone()) {
            if let Err(err) = Url::revoke_object_url(&previous) {
                warn!("Could not revoke {previous}: {err:?}");
            }
        }
        self.element.set_src(&url);
        Ok(())
    }

    fn play(&mut self) {
        match self.element.play() {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                if let Err(err) = wasm_bindgen_futures::JsFuture::from(promise).await {
                    warn!("Playback did not start: {err:?}");
                }
            }),
            Err(err) => warn!("play() threw: {err:?}"),
        }
    }

    fn pause(&mut self) {
        if let Err(err) = self.element.pause() {
            warn!("pause() threw: {err:?}");
        }
    }

    fn seek(&mut self, seconds: f64) {
        self.element.set_current_time(seconds);
    }

    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn duration(&self) -> f64 {
        self.element.duration()
    }

    fn is_paused(&self) -> bool {
        self.element.paused()
    }
}

// ===== Subscriptions =====

/// An event listener that is removed again when dropped.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|e| dom_error(event, e))?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// A mounted shell. Dropping it detaches every listener.
pub struct ShellBinding {
    controller: SharedController,
    _listeners: Vec<Listener>,
}

impl ShellBinding {
    pub fn controller(&self) -> &SharedController {
        &self.controller
    }
}

fn with_controller<R>(
    controller: &SharedController,
    f: impl FnOnce(&mut ShellController) -> R,
) -> Option<R> {
    match controller.try_borrow_mut() {
        Ok(mut controller) => Some(f(&mut controller)),
        Err(_) => {
            warn!("Controller busy; event dropped");
            None
        }
    }
}

fn is_dragging(controller: &SharedController) -> bool {
    controller
        .try_borrow()
        .map(|c| c.is_dragging())
        .unwrap_or(false)
}

fn spawn_load(controller: SharedController, backend: Rc<HttpBackend>, ticket: Option<LoadTicket>) {
    let Some(ticket) = ticket else {
        return;
    };
    wasm_bindgen_futures::spawn_local(async move {
        let result = load_track(backend.as_ref(), &ticket).await;
        if let Some(Err(err)) = with_controller(&controller, |c| c.finish_load(ticket, result)) {
            error!("Track load failed: {err}");
        }
    });
}

fn is_editable_target(event: &Event) -> bool {
    let mut current = event
        .target()
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok());
    while let Some(element) = current {
        let tag = element.tag_name().to_ascii_lowercase();
        if tag == "input" || tag == "textarea" || tag == "select" {
            return true;
        }
        if element
            .get_attribute("contenteditable")
            .map(|v| v.to_ascii_lowercase() != "false")
            .unwrap_or(false)
        {
            return true;
        }
        current = element.parent_element();
    }
    false
}

/// Attach the shell to the current document.
pub fn mount(config: AppConfig) -> Result<ShellBinding> {
    let win = window().ok_or_else(|| PlayerError::missing_element("window"))?;
    let document = win
        .document()
        .ok_or_else(|| PlayerError::missing_element("document"))?;
    let elements = ShellElements::attach(&document, &config.elements)?;
    let audio = get_or_create_audio_element(&document, &config.elements.audio)?;
    let backend = Rc::new(HttpBackend::from_config(&config)?);
    let page_origin = win.location().origin().unwrap_or_default();

    let controller: SharedController = Rc::new_cyclic(|weak: &Weak<RefCell<ShellController>>| {
        let weak = weak.clone();
        let tick: Rc<dyn Fn()> = Rc::new(move || {
            if let Some(controller) = weak.upgrade() {
                if let Ok(mut controller) = controller.try_borrow_mut() {
                    controller.refresh_snake();
                }
            }
        });
        let ui = DomPlayerUi::new(document.clone(), elements.clone(), &config, tick);
        RefCell::new(OuterController::new(config.clone(), ui, DomAudio::new(audio.clone())))
    });
    controller.borrow_mut().start();

    let mut listeners = Vec::new();

    // Commands from the inner frame.
    {
        let controller = controller.clone();
        let backend = backend.clone();
        let allow_foreign = config.allow_foreign_origins;
        listeners.push(Listener::attach(win.as_ref(), "message", move |event| {
            let Ok(event) = event.dyn_into::<MessageEvent>() else {
                return;
            };
            if !allow_foreign && event.origin() != page_origin {
                warn!("Ignoring frame message from {}", event.origin());
                return;
            }
            let Some(raw) = event.data().as_string() else {
                warn!("Ignoring non-string frame message");
                return;
            };
            match with_controller(&controller, |c| c.receive(&raw)) {
                Some(Ok(ticket)) => spawn_load(controller.clone(), backend.clone(), ticket),
                Some(Err(err)) => warn!("{err}"),
                None => {}
            }
        })?);
    }

    // Audio element events.
    {
        let target: &EventTarget = audio.as_ref();
        let on_play = controller.clone();
        listeners.push(Listener::attach(target, "play", move |_| {
            with_controller(&on_play, |c| c.on_play());
        })?);
        let on_pause = controller.clone();
        listeners.push(Listener::attach(target, "pause", move |_| {
            with_controller(&on_pause, |c| c.on_pause());
        })?);
        let on_ended = controller.clone();
        let backend = backend.clone();
        listeners.push(Listener::attach(target, "ended", move |_| {
            let ticket = with_controller(&on_ended, |c| c.on_ended()).flatten();
            spawn_load(on_ended.clone(), backend.clone(), ticket);
        })?);
    }

    // Transport buttons.
    {
        let on_toggle = controller.clone();
        listeners.push(Listener::attach(elements.toggle.as_ref(), "click", move |_| {
            with_controller(&on_toggle, |c| c.toggle());
        })?);
        let on_forward = controller.clone();
        let forward_backend = backend.clone();
        listeners.push(Listener::attach(
            elements.skip_forwards.as_ref(),
            "click",
            move |_| {
                let ticket = with_controller(&on_forward, |c| c.skip_forward()).flatten();
                spawn_load(on_forward.clone(), forward_backend.clone(), ticket);
            },
        )?);
        let on_backward = controller.clone();
        let backward_backend = backend.clone();
        listeners.push(Listener::attach(
            elements.skip_backwards.as_ref(),
            "click",
            move |_| {
                let ticket = with_controller(&on_backward, |c| c.skip_backward()).flatten();
                spawn_load(on_backward.clone(), backward_backend.clone(), ticket);
            },
        )?);
    }

    // Snake drag. Move/up are document-wide so the drag survives leaving the bar.
    {
        let on_press = controller.clone();
        listeners.push(Listener::attach(elements.snake.as_ref(), "mousedown", move |event| {
            event.prevent_default();
            with_controller(&on_press, |c| c.snake_press());
        })?);

        let on_move = controller.clone();
        let move_elements = elements.clone();
        listeners.push(Listener::attach(document.as_ref(), "mousemove", move |event| {
            let Ok(event) = event.dyn_into::<MouseEvent>() else {
                return;
            };
            if !is_dragging(&on_move) {
                return;
            }
            event.prevent_default();
            let bar = move_elements.bar();
            with_controller(&on_move, |c| c.snake_move(f64::from(event.client_x()), bar));
        })?);

        let on_release = controller.clone();
        let release_elements = elements.clone();
        listeners.push(Listener::attach(document.as_ref(), "mouseup", move |event| {
            let Ok(event) = event.dyn_into::<MouseEvent>() else {
                return;
            };
            if !is_dragging(&on_release) {
                return;
            }
            let bar = release_elements.bar();
            with_controller(&on_release, |c| c.snake_release(f64::from(event.client_x()), bar));
        })?);
    }

    // Space toggles playback outside text inputs.
    {
        let on_key = controller.clone();
        listeners.push(Listener::attach(document.as_ref(), "keydown", move |event| {
            if is_editable_target(&event) {
                return;
            }
            let Ok(key_event) = event.dyn_into::<KeyboardEvent>() else {
                return;
            };
            if key_event.key() != " " || key_event.ctrl_key() || key_event.meta_key() || key_event.alt_key() {
                return;
            }
            key_event.prevent_default();
            with_controller(&on_key, |c| c.toggle());
        })?);
    }

    debug!("Shell mounted with {} listeners", listeners.len());
    Ok(ShellBinding {
        controller,
        _listeners: listeners,
    })
}
