use std::sync::Arc;

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

mod app;
mod config;
mod input;
mod timer;

use app::{window_title, App};
use config::Config;
use input::{action_for_key, Key};

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::KeyG => Some(Key::G),
        KeyCode::KeyC => Some(Key::C),
        KeyCode::KeyQ => Some(Key::Q),
        KeyCode::Escape => Some(Key::Escape),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Handler — winit ApplicationHandler
// ---------------------------------------------------------------------------

struct Handler {
    config: Config,
    window: Option<Arc<Window>>,
    app: Option<App>,
}

impl ApplicationHandler for Handler {
    /// Called once on desktop when the event loop starts.
    /// Creates the window then initialises the wgpu surface.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let edge = self.config.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(window_title(self.config.display_mode))
            .with_inner_size(winit::dpi::LogicalSize::new(edge, edge));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };
        log::info!("Window created ({edge}×{edge})");

        match App::new(Arc::clone(&window), &self.config) {
            Ok(app) => {
                self.window = Some(window);
                self.app = Some(app);
            }
            Err(e) => {
                log::error!("GPU initialisation failed: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(app) = &mut self.app else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested — exiting");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(key) = map_key(code) {
                    if app.handle_action(action_for_key(key)) {
                        log::info!("{key:?} pressed — exiting");
                        event_loop.exit();
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                app.on_cursor_moved(position.x as f32, position.y as f32);
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => app.set_pointer_pressed(state == ElementState::Pressed),

            WindowEvent::Resized(new_size) => app.resize(new_size.width, new_size.height),

            WindowEvent::RedrawRequested => match app.render() {
                Ok(()) => {}
                // Surface lost / outdated: reconfigure and try again next frame.
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    if let Some(window) = &self.window {
                        let size = window.inner_size();
                        app.resize(size.width, size.height);
                    }
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("GPU out of memory — exiting");
                    event_loop.exit();
                }
                Err(e) => log::warn!("render error: {e:?}"),
            },

            _ => {}
        }
    }

    /// Drive continuous redraws (game-loop style).
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    let config = Config::parse();
    log::debug!("{config:?}");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("failed to create event loop: {e}");
            std::process::exit(1);
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut handler = Handler {
        config,
        window: None,
        app: None,
    };
    if let Err(e) = event_loop.run_app(&mut handler) {
        log::error!("event loop error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use input::InputAction;

    #[test]
    fn mapped_keys_produce_actions() {
        assert_eq!(map_key(KeyCode::KeyG).map(action_for_key), Some(InputAction::ToggleDisplayMode));
        assert_eq!(map_key(KeyCode::KeyC).map(action_for_key), Some(InputAction::ClearField));
        assert_eq!(map_key(KeyCode::Escape).map(action_for_key), Some(InputAction::Quit));
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        assert_eq!(map_key(KeyCode::KeyZ), None);
        assert_eq!(map_key(KeyCode::Space), None);
    }
}
