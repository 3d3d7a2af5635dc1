// samplepad/src/main.rs

use std::time::Instant;

use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait};
use rodio::OutputStream;
use samplepad::{
    board::{
        config::Config,
        dispatcher::{FocusKey, NoteDispatcher},
        input::GlobalKeyListener,
        layout::PadLayout,
        sampler::SampleBank,
    },
    graphics::{PadStates, State, MAX_PADS},
};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, Event, KeyEvent, MouseButton, Touch, TouchPhase, WindowEvent},
    event_loop::{EventLoop, EventLoopBuilder, EventLoopProxy},
    keyboard::{Key, NamedKey},
    window::{Window, WindowBuilder},
};

const SETTINGS_PATH: &str = "resources/config/settings.yaml";

/// Events injected into the winit loop from outside the window.
#[derive(Debug, Clone, Copy)]
enum BoardEvent {
    GlobalKey(char),
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    info!("Loading configuration from '{}'", SETTINGS_PATH);
    let config = Config::load(SETTINGS_PATH)?;
    let layout = PadLayout::from_config(&config.board);

    // Set up audio output: discover the device through cpal, then hand it to
    // rodio for sink-based playback.
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(anyhow::Error::msg("No output device available"))?;
    info!(
        "Audio output device: {}",
        device.name().unwrap_or_else(|_| "Unknown".to_string())
    );
    let (_stream, stream_handle) =
        OutputStream::try_from_device(&device).context("Failed to open audio output stream")?;

    // An empty board means no dispatcher and no input listeners at all; the
    // window still opens.
    let dispatcher = if layout.is_empty() {
        warn!("no pads configured; input is disabled");
        None
    } else {
        let bank = SampleBank::load(
            &config.audio,
            layout.iter().map(|pad| pad.note.as_str()),
            stream_handle,
        );
        info!(pads = layout.len(), samples = bank.len(), "board ready");
        Some(NoteDispatcher::new(
            layout,
            bank,
            config.visual.flash_duration(),
        ))
    };

    // Create the window and event loop
    let event_loop = EventLoopBuilder::<BoardEvent>::with_user_event()
        .build()
        .context("Failed to create event loop")?;
    let window = WindowBuilder::new()
        .with_title("samplepad")
        .build(&event_loop)?;

    // Document-wide key capture only runs when some pad has a key binding.
    let listener = match &dispatcher {
        Some(dispatcher) if dispatcher.layout().iter().any(|pad| pad.key.is_some()) => {
            Some(spawn_global_keys(event_loop.create_proxy()))
        }
        _ => None,
    };

    debug!("Starting event loop");
    run_event_loop(event_loop, &window, dispatcher, listener).await?;

    Ok(())
}

fn spawn_global_keys(proxy: EventLoopProxy<BoardEvent>) -> GlobalKeyListener {
    GlobalKeyListener::subscribe(move |key| {
        // A send failure means the loop is gone and the listener is about to
        // be torn down with it.
        if proxy.send_event(BoardEvent::GlobalKey(key)).is_err() {
            debug!("dropping key event: event loop closed");
        }
    })
}

async fn run_event_loop(
    event_loop: EventLoop<BoardEvent>,
    window: &Window,
    mut dispatcher: Option<NoteDispatcher<SampleBank>>,
    mut listener: Option<GlobalKeyListener>,
) -> Result<()> {
    let empty_layout = PadLayout::default();
    let layout = dispatcher
        .as_ref()
        .map(|dispatcher| dispatcher.layout())
        .unwrap_or(&empty_layout);
    let mut state = State::new(window, layout)
        .await
        .context("Failed to initialize state")?;

    let mut cursor: Option<PhysicalPosition<f64>> = None;

    let _ = event_loop.run(move |event, event_loop_window_target| match event {
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => {
            debug!("The close button was pressed; stopping");
            if let Some(listener) = listener.as_mut() {
                listener.unsubscribe();
            }
            event_loop_window_target.exit();
        }

        Event::UserEvent(BoardEvent::GlobalKey(key)) => {
            if let Some(dispatcher) = dispatcher.as_mut() {
                dispatcher.global_key(key, Instant::now());
            }
            window.request_redraw();
        }

        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event: key_event,
                    is_synthetic,
                    ..
                },
            ..
        } => {
            // Focus-based activation only; note keys arrive through the
            // global listener. Auto-repeat never re-triggers.
            if is_synthetic || key_event.repeat || key_event.state != ElementState::Pressed {
                return;
            }
            if let (Some(dispatcher), Some(key)) = (dispatcher.as_mut(), focus_key_of(&key_event))
            {
                if dispatcher.focus_key(key, Instant::now()) {
                    window.request_redraw();
                }
            }
        }

        Event::WindowEvent {
            event: WindowEvent::CursorMoved { position, .. },
            ..
        } => {
            cursor = Some(position);
        }

        Event::WindowEvent {
            event:
                WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    button: MouseButton::Left,
                    ..
                },
            ..
        } => {
            if let (Some(dispatcher), Some(position)) = (dispatcher.as_mut(), cursor) {
                if let Some((x, y)) = normalize(position, window) {
                    dispatcher.pointer_down(x, y, Instant::now());
                    window.request_redraw();
                }
            }
        }

        Event::WindowEvent {
            event:
                WindowEvent::Touch(Touch {
                    phase: TouchPhase::Started,
                    location,
                    ..
                }),
            ..
        } => {
            if let Some(dispatcher) = dispatcher.as_mut() {
                if let Some((x, y)) = normalize(location, window) {
                    dispatcher.pointer_down(x, y, Instant::now());
                    window.request_redraw();
                }
            }
        }

        Event::WindowEvent {
            event: WindowEvent::RedrawRequested,
            ..
        } => {
            let now = Instant::now();
            let pad_states = match dispatcher.as_mut() {
                Some(dispatcher) => {
                    dispatcher.frame(now);
                    capture_pad_states(dispatcher, now)
                }
                None => PadStates::new(),
            };

            if let Err(e) = futures::executor::block_on(state.render(window, &pad_states)) {
                error!("Render error: {}", e);
            }

            window.request_redraw();
        }

        _ => {}
    });
    Ok(())
}

/// Window coordinates to normalized board coordinates.
fn normalize(position: PhysicalPosition<f64>, window: &Window) -> Option<(f32, f32)> {
    let size = window.inner_size();
    if size.width == 0 || size.height == 0 {
        return None;
    }
    Some((
        (position.x / size.width as f64) as f32,
        (position.y / size.height as f64) as f32,
    ))
}

fn focus_key_of(event: &KeyEvent) -> Option<FocusKey> {
    match &event.logical_key {
        Key::Named(NamedKey::Enter) | Key::Named(NamedKey::Space) => Some(FocusKey::Activate),
        Key::Named(NamedKey::Tab) | Key::Named(NamedKey::ArrowRight) => Some(FocusKey::Next),
        Key::Named(NamedKey::ArrowLeft) => Some(FocusKey::Prev),
        _ => None,
    }
}

fn capture_pad_states(dispatcher: &NoteDispatcher<SampleBank>, now: Instant) -> PadStates {
    let mut pad_states = PadStates::new();
    for pad in dispatcher.layout().iter().take(MAX_PADS) {
        let slot = &mut pad_states.states[pad.index];
        if let Some(progress) = dispatcher.flashes().progress(pad.index, now) {
            slot[0] = 1.0 - progress;
        }
        if dispatcher.focus() == Some(pad.index) {
            slot[1] = 1.0;
        }
    }
    pad_states
}
