/******************************************************************************
 *                                                                            *
 * Deferred Task Scheduling                                                   *
 * Work that must wait for the host (next frame, short timers) is queued as   *
 * plain ScheduledTask values. When a task comes due the host hands it back   *
 * to SnowPlugin::process_scheduled_task, which re-validates world state      *
 * before acting. Tasks fire once and cannot be cancelled.                    *
 *                                                                            *
 ******************************************************************************/

use std::time::Duration;

use crate::host::{EntityHandle, PlayerSlot, SteamId};

/// When a scheduled task should run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduleAt {
    /// Start of the next simulation frame.
    NextFrame,
    /// After a fixed delay of game time.
    After(Duration),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScheduledTask {
    /// Create the snow effect for whoever is in `slot`, provided it is still
    /// the same player.
    CreateSnow { slot: PlayerSlot, steam_id: SteamId },
    /// Parent a freshly spawned particle to the pawn and start it.
    AttachSnow {
        slot: PlayerSlot,
        entity: EntityHandle,
        pawn: EntityHandle,
    },
}

/// Timer facility the plugin submits deferred work to.
pub trait Scheduler {
    fn schedule(&mut self, at: ScheduleAt, task: ScheduledTask);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Due {
    Frame(u64),
    Time(Duration),
}

#[derive(Clone, Debug)]
struct PendingTask {
    id: u64,
    due: Due,
    task: ScheduledTask,
}

/// Virtual-clock scheduler.
///
/// A host adapter calls [`TaskQueue::tick`] once per simulation frame and
/// feeds the returned tasks to the plugin. Tests drive it the same way, which
/// keeps time fully deterministic.
#[derive(Debug, Default)]
pub struct TaskQueue {
    now: Duration,
    frame: u64,
    next_id: u64,
    pending: Vec<PendingTask>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since the queue was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Tasks still waiting, in submission order.
    pub fn pending_tasks(&self) -> impl Iterator<Item = &ScheduledTask> + '_ {
        self.pending.iter().map(|pending| &pending.task)
    }

    /// Advances one frame of `dt` game time and drains everything now due.
    ///
    /// Next-frame tasks submitted before this call are always due. Timers are
    /// due once their deadline has passed. Due tasks come back ordered by
    /// deadline, then submission order. Anything scheduled while the caller
    /// processes the result waits for the following tick.
    pub fn tick(&mut self, dt: Duration) -> Vec<ScheduledTask> {
        self.frame += 1;
        self.now += dt;

        let (frame, now) = (self.frame, self.now);
        let (mut due, waiting): (Vec<PendingTask>, Vec<PendingTask>) =
            std::mem::take(&mut self.pending)
                .into_iter()
                .partition(|pending| match pending.due {
                    Due::Frame(at) => at <= frame,
                    Due::Time(at) => at <= now,
                });
        self.pending = waiting;

        due.sort_by_key(|pending| {
            let deadline = match pending.due {
                Due::Frame(_) => Duration::ZERO,
                Due::Time(at) => at,
            };
            (deadline, pending.id)
        });
        due.into_iter().map(|pending| pending.task).collect()
    }

    /// Advances a single frame without moving game time.
    pub fn advance_frame(&mut self) -> Vec<ScheduledTask> {
        self.tick(Duration::ZERO)
    }
}

impl Scheduler for TaskQueue {
    fn schedule(&mut self, at: ScheduleAt, task: ScheduledTask) {
        let due = match at {
            ScheduleAt::NextFrame => Due::Frame(self.frame + 1),
            ScheduleAt::After(delay) => Due::Time(self.now + delay),
        };
        let id = self.next_id;
        self.next_id += 1;
        log::debug!("[Schedule] Queued task #{} ({:?}): {:?}", id, due, task);
        self.pending.push(PendingTask { id, due, task });
    }
}
