use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

use inkflow::export::{snapshot_into, FrameSnapshot};
use inkflow::{fluid_step, inject, InjectionMode, SimState, SolverParams, Stroke};

/// Requests from the render thread, applied between steps.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Stroke(Stroke),
    Clear,
    SetMode(InjectionMode),
}

/// Apply one command to the grid the physics thread owns.
pub fn apply_command(sim: &mut SimState, params: &mut SolverParams, cmd: Command) {
    match cmd {
        Command::Stroke(stroke) => inject(sim, params, &stroke),
        Command::Clear => sim.clear(),
        Command::SetMode(mode) => {
            log::debug!("injection mode -> {}", mode.label());
            params.injection_mode = mode;
        }
    }
}

/// Channels connecting the main (render) thread to the physics thread.
pub struct PhysicsChannels {
    pub cmd_tx: mpsc::Sender<Command>,
    pub snap_rx: mpsc::Receiver<FrameSnapshot>,
    pub snap_return_tx: mpsc::Sender<FrameSnapshot>,
}

/// Spawn the physics thread, which takes exclusive ownership of `sim`.
///
/// Each frame drains pending commands, runs `steps_per_frame` ticks and
/// publishes a snapshot. The snapshot channel holds one frame, so physics
/// never runs ahead of the renderer.
pub fn spawn_physics_thread(
    sim: SimState,
    params: SolverParams,
    steps_per_frame: usize,
    running: Arc<AtomicBool>,
) -> (PhysicsChannels, std::thread::JoinHandle<()>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    let (snap_tx, snap_rx) = mpsc::sync_channel::<FrameSnapshot>(1);
    let (snap_return_tx, snap_return_rx) = mpsc::channel::<FrameSnapshot>();

    let handle = std::thread::spawn(move || {
        let mut sim = sim;
        let mut params = params;
        let n = sim.dim();
        let mut snap_buf = FrameSnapshot::new_empty(n);

        while running.load(Ordering::SeqCst) {
            while let Ok(cmd) = cmd_rx.try_recv() {
                apply_command(&mut sim, &mut params, cmd);
            }
            for _ in 0..steps_per_frame {
                fluid_step(&mut sim, &params);
            }
            snapshot_into(&sim, &mut snap_buf);
            if snap_tx.send(snap_buf).is_err() {
                break;
            }
            snap_buf = snap_return_rx
                .try_recv()
                .ok()
                .filter(|b| b.dim == n)
                .unwrap_or_else(|| FrameSnapshot::new_empty(n));
        }
        log::debug!("physics thread stopped after {} steps", sim.steps);
    });

    let channels = PhysicsChannels { cmd_tx, snap_rx, snap_return_tx };
    (channels, handle)
}
