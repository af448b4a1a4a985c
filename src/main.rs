mod headless;
mod physics;
mod renderer;

use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use inkflow::config::{self, Config};
use inkflow::{FrameSnapshot, SimState, Stroke};
use physics::{Command, PhysicsChannels};

struct Defaults;

impl Defaults {
    const HEADLESS_STEPS: u64 = 1000;
    const HEADLESS_SEED: u32 = 42;
    /// Dye colors cycled per drag.
    const STROKE_COLORS: [[f64; 3]; 5] = [
        [1.0, 0.25, 0.1],
        [0.1, 0.55, 1.0],
        [1.0, 0.85, 0.15],
        [0.2, 1.0, 0.45],
        [0.75, 0.2, 1.0],
    ];
}

/// Convert RGBA &[u8] buffer to 0RGB &[u32] buffer for minifb.
fn rgba_to_argb(rgba: &[u8], out: &mut [u32]) {
    for (i, pixel) in rgba.chunks_exact(4).enumerate() {
        out[i] = (pixel[0] as u32) << 16 | (pixel[1] as u32) << 8 | pixel[2] as u32;
    }
}

fn is_headless(args: &[String]) -> bool {
    args.iter().any(|a| a == "--headless")
}

/// Parse `--steps <N>` from CLI args.
fn parse_steps(args: &[String]) -> Option<u64> {
    args.windows(2)
        .find(|w| w[0] == "--steps")
        .and_then(|w| w[1].parse().ok())
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();
    let cfg = config::load();

    let result: Result<(), Box<dyn Error>> = if is_headless(&args) {
        let steps = parse_steps(&args).unwrap_or(Defaults::HEADLESS_STEPS);
        headless::run_headless(&cfg, steps, Defaults::HEADLESS_SEED)
            .map(|r| {
                log::info!(
                    "finished {} steps: KE={:.6e} div={:.3e} max|u|={:.4} dye={:?}",
                    r.steps,
                    r.kinetic_energy,
                    r.divergence,
                    r.max_speed,
                    r.total_dye
                )
            })
            .map_err(Into::into)
    } else {
        run_gui(&cfg)
    };

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn format_title(fps: u32, viz: renderer::VizMode, mode: inkflow::InjectionMode) -> String {
    format!("inkflow | {fps} fps | view: {} | inject: {}", viz.label(), mode.label())
}

fn run_gui(cfg: &Config) -> Result<(), Box<dyn Error>> {
    let params = cfg.solver.to_params()?;
    let sim = SimState::new(cfg.grid.dim, cfg.grid.scale, cfg.grid.channels)?;
    let n = sim.dim();

    let mut render_cfg = renderer::RenderConfig::fit(cfg.display.width, cfg.display.height, n);
    let mut w = render_cfg.frame_width;
    let mut h = render_cfg.frame_height;

    let mut window = Window::new(
        "inkflow",
        w,
        h,
        WindowOptions {
            resize: true,
            ..WindowOptions::default()
        },
    )?;
    window.set_target_fps(cfg.display.target_fps);

    // Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let mut mode = params.injection_mode;
    let (channels, physics_thread) =
        physics::spawn_physics_thread(sim, params, cfg.display.steps_per_frame.max(1), running.clone());
    let PhysicsChannels { cmd_tx, snap_rx, snap_return_tx } = channels;

    let mut viz_mode = renderer::VizMode::Dye;
    let mut framebuf = vec![0u32; w * h];
    let mut rgba_buf: Vec<u8> = Vec::new();
    let mut frame_count = 0u32;
    let mut display_fps = 0u32;
    let mut last_fps_time = Instant::now();
    let mut last_snap: Option<FrameSnapshot> = None;
    let mut needs_redraw = false;
    let mut last_mouse: Option<(f64, f64)> = None;
    let mut color_index = 0usize;

    while window.is_open() && running.load(Ordering::SeqCst) {
        // --- Keyboard handling ---
        if window.is_key_pressed(Key::Escape, KeyRepeat::No) {
            break;
        }
        if window.is_key_pressed(Key::C, KeyRepeat::No) {
            let _ = cmd_tx.send(Command::Clear);
        }
        if window.is_key_pressed(Key::V, KeyRepeat::No) {
            viz_mode = viz_mode.next();
            window.set_title(&format_title(display_fps, viz_mode, mode));
            needs_redraw = true;
        }
        if window.is_key_pressed(Key::M, KeyRepeat::No) {
            mode = mode.toggle();
            let _ = cmd_tx.send(Command::SetMode(mode));
            window.set_title(&format_title(display_fps, viz_mode, mode));
        }

        // --- Mouse drag -> strokes ---
        let pos = window.get_mouse_pos(MouseMode::Clamp).map(|(mx, my)| render_cfg.to_normalized(mx, my));
        match (window.get_mouse_down(MouseButton::Left), pos) {
            (true, Some(p)) => {
                let from = match last_mouse {
                    Some(prev) => prev,
                    None => {
                        color_index = (color_index + 1) % Defaults::STROKE_COLORS.len();
                        p
                    }
                };
                let stroke = Stroke::new(from.0, from.1, p.0, p.1).with_color(Defaults::STROKE_COLORS[color_index]);
                let _ = cmd_tx.send(Command::Stroke(stroke));
                last_mouse = Some(p);
            }
            _ => last_mouse = None,
        }

        // --- Check for window resize ---
        let (new_w, new_h) = window.get_size();
        if new_w != w || new_h != h {
            render_cfg = renderer::RenderConfig::fit(new_w, new_h, n);
            w = render_cfg.frame_width;
            h = render_cfg.frame_height;
            framebuf = vec![0u32; w * h];
            needs_redraw = true;
        }

        // --- Non-blocking: grab latest snapshot if available ---
        let mut snap = None;
        while let Ok(s) = snap_rx.try_recv() {
            snap = Some(s);
        }

        if let Some(s) = snap {
            renderer::render_into(&mut rgba_buf, &s, &render_cfg, viz_mode);
            rgba_to_argb(&rgba_buf, &mut framebuf);
            // Return old snapshot buffer to physics thread for reuse
            if let Some(old) = last_snap.take() {
                let _ = snap_return_tx.send(old);
            }
            last_snap = Some(s);
            needs_redraw = false;
        } else if needs_redraw {
            if let Some(ref s) = last_snap {
                renderer::render_into(&mut rgba_buf, s, &render_cfg, viz_mode);
                rgba_to_argb(&rgba_buf, &mut framebuf);
            }
            needs_redraw = false;
        }

        window.update_with_buffer(&framebuf, w, h)?;

        frame_count += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            display_fps = frame_count;
            frame_count = 0;
            last_fps_time = now;
            window.set_title(&format_title(display_fps, viz_mode, mode));
        }
    }

    // Shutdown
    running.store(false, Ordering::SeqCst);
    drop(snap_rx);
    let _ = physics_thread.join();
    Ok(())
}
