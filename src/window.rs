use std::time::Duration;
use anyhow::{anyhow, Result};
use log::{debug, info};
use sdl3::event::{Event, WindowEvent};
use sdl3::keyboard::Keycode;
use sdl3::mouse::{MouseButton, MouseWheelDirection};
use sdl3::pixels::PixelFormat;
use sdl3::surface::Surface;
use crate::config::ViewerConfig;
use crate::render::SoftwareGraphics;
use crate::viewer::camera::{Buttons, Point, WHEEL_DELTA_PER_NOTCH};
use crate::viewer::Viewer;

const IDLE_WAIT: Duration = Duration::from_millis(10);

/// Input the host forwards to the viewer, already stripped of SDL specifics.
#[derive(Debug, Clone, Copy, PartialEq)]
enum HostEvent {
    PointerDown(Point),
    PointerMove(Point, Buttons),
    /// Wheel travel in notches, positive away from the user.
    Wheel(f64),
    Exposed,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Redraw,
    Exit,
}

/// Wheel travel away from the user, whatever the platform's scroll direction.
fn wheel_notches(y: f32, flipped: bool) -> f64 {
    if flipped { -(y as f64) } else { y as f64 }
}

fn translate_event(event: &Event) -> Option<HostEvent> {
    match event {
        Event::Quit { .. } | Event::KeyDown { keycode: Some(Keycode::Escape), .. } => Some(HostEvent::Quit),
        Event::MouseButtonDown { mouse_btn: MouseButton::Left, x, y, .. }
        | Event::MouseButtonDown { mouse_btn: MouseButton::Right, x, y, .. } => {
            Some(HostEvent::PointerDown(Point::new(*x as f64, *y as f64)))
        }
        Event::MouseMotion { x, y, mousestate, .. } => {
            let buttons = Buttons { primary: mousestate.left(), secondary: mousestate.right() };
            Some(HostEvent::PointerMove(Point::new(*x as f64, *y as f64), buttons))
        }
        Event::MouseWheel { y, direction, .. } => {
            Some(HostEvent::Wheel(wheel_notches(*y, matches!(direction, MouseWheelDirection::Flipped))))
        }
        Event::Window { win_event: WindowEvent::Exposed, .. } => Some(HostEvent::Exposed),
        _ => None
    }
}

fn apply_event(viewer: &mut Viewer, event: HostEvent) -> Flow {
    match event {
        HostEvent::PointerDown(pos) => viewer.on_pointer_down(pos),
        HostEvent::PointerMove(pos, buttons) => viewer.on_pointer_move(pos, buttons),
        HostEvent::Wheel(notches) => viewer.on_wheel(notches * WHEEL_DELTA_PER_NOTCH),
        HostEvent::Exposed => return Flow::Redraw,
        HostEvent::Quit => return Flow::Exit,
    }
    Flow::Continue
}

/// Keeps the framebuffer matching the window, calling `on_resize` when it changes.
/// Returns whether a resize happened.
fn sync_size(viewer: &mut Viewer, gfx: &mut SoftwareGraphics, size: (u32, u32)) -> bool {
    if gfx.size() == size {
        return false;
    }
    debug!("Resizing framebuffer to {}x{}", size.0, size.1);
    gfx.resize(size.0, size.1);
    viewer.on_resize(gfx, size.0, size.1);
    true
}

/// Opens the window and runs the event loop until the user quits.
pub fn run(config: &ViewerConfig, mut viewer: Viewer) -> Result<()> {
    let sdl_context = sdl3::init().map_err(|e| anyhow!("Failed to initialize SDL: {}", e))?;
    let video_subsystem = sdl_context.video().map_err(|e| anyhow!("Failed to initialize video: {}", e))?;
    let window = video_subsystem
        .window(&config.title, config.width, config.height)
        .resizable()
        .build()
        .map_err(|e| anyhow!("Failed to create window: {}", e))?;
    let mut event_pump = sdl_context.event_pump().map_err(|e| anyhow!("Failed to create event pump: {}", e))?;

    let mut gfx = SoftwareGraphics::new(0, 0);
    viewer.on_init(&mut gfx);
    info!("Viewer window opened at {}x{}", config.width, config.height);

    let mut needs_redraw = true;
    loop {
        for event in event_pump.poll_iter() {
            let flow = match translate_event(&event) {
                Some(host_event) => apply_event(&mut viewer, host_event),
                None => Flow::Continue,
            };
            match flow {
                Flow::Exit => {
                    info!("Viewer window closed");
                    return Ok(());
                }
                Flow::Redraw => needs_redraw = true,
                Flow::Continue => {}
            }
        }

        needs_redraw |= sync_size(&mut viewer, &mut gfx, window.size());
        needs_redraw |= viewer.take_redraw_request();
        if !needs_redraw {
            std::thread::sleep(IDLE_WAIT);
            continue;
        }
        needs_redraw = false;

        viewer.on_render(&mut gfx);

        let (width, height) = gfx.size();
        if width == 0 || height == 0 {
            continue;
        }
        let mut window_surface = window.surface(&event_pump).map_err(|e| anyhow!("Failed to get window surface: {}", e))?;
        Surface::from_data(gfx.color_bytes_mut(), width, height, width * 4, PixelFormat::ABGR8888.into())
            .map_err(|e| anyhow!("Failed to wrap framebuffer: {}", e))?
            .blit(None, &mut window_surface, None)
            .map_err(|e| anyhow!("Failed to blit framebuffer: {}", e))?;
        window_surface.finish().map_err(|e| anyhow!("Failed to present frame: {}", e))?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;

    #[test]
    fn wheel_notch_should_zoom_one_unit() {
        let mut viewer = Viewer::new(Scene::empty(), -5.0);

        let flow = apply_event(&mut viewer, HostEvent::Wheel(1.0));

        assert_eq!(flow, Flow::Continue);
        assert_eq!(viewer.camera().zoom, -4.0);
        assert!(viewer.take_redraw_request());
    }

    #[test]
    fn flipped_wheel_should_zoom_the_other_way() {
        // Arrange
        let mut viewer = Viewer::new(Scene::empty(), -5.0);

        // Act
        apply_event(&mut viewer, HostEvent::Wheel(wheel_notches(1.0, true)));

        // Assert
        assert_eq!(wheel_notches(1.0, false), 1.0);
        assert_eq!(viewer.camera().zoom, -6.0);
    }

    #[test]
    fn drag_should_reach_viewer() {
        // Arrange
        let mut viewer = Viewer::new(Scene::empty(), -5.0);

        // Act
        apply_event(&mut viewer, HostEvent::PointerDown(Point::new(100.0, 100.0)));
        apply_event(&mut viewer, HostEvent::PointerMove(Point::new(110.0, 95.0), Buttons::PRIMARY));

        // Assert
        assert_eq!(viewer.camera().x_rotation, -40.0);
        assert_eq!(viewer.camera().y_rotation, 80.0);
    }

    #[test]
    fn quit_and_expose_should_control_loop() {
        let mut viewer = Viewer::new(Scene::empty(), -5.0);

        assert_eq!(apply_event(&mut viewer, HostEvent::Quit), Flow::Exit);
        assert_eq!(apply_event(&mut viewer, HostEvent::Exposed), Flow::Redraw);
    }

    #[test]
    fn sync_size_should_resize_only_on_change() {
        // Arrange
        let mut viewer = Viewer::new(Scene::empty(), -5.0);
        let mut gfx = SoftwareGraphics::new(0, 0);

        // Act
        let first = sync_size(&mut viewer, &mut gfx, (64, 48));
        let second = sync_size(&mut viewer, &mut gfx, (64, 48));

        // Assert
        assert!(first);
        assert!(!second);
        assert_eq!(gfx.size(), (64, 48));
        assert_eq!(gfx.color_buffer().dimensions(), (64, 48));
    }
}
