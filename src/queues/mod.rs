/*!
 * Queue Manager Collections
 * Four ordered, capacity-bounded process queues
 *
 * The queues own the process entities outright: a process lives in exactly
 * one queue at a time, and moving it is a remove-then-insert of the owned
 * value. Capacity is enforced on every move insertion; reserved placements
 * (emergency and penalty spawns) bypass the check.
 */

pub mod layout;

use crate::core::types::{Pid, BLOCKED_CAPACITY, READY_CAPACITY};
use crate::process::{Process, ProcessState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four active queue kinds. `Terminated` is not a queue: terminated
/// processes leave the collections entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    New,
    Ready,
    Running,
    Blocked,
}

impl QueueKind {
    pub const ALL: [QueueKind; 4] = [
        QueueKind::New,
        QueueKind::Ready,
        QueueKind::Running,
        QueueKind::Blocked,
    ];

    /// The lifecycle state a process takes on when it enters this queue
    pub fn state(self) -> ProcessState {
        match self {
            QueueKind::New => ProcessState::New,
            QueueKind::Ready => ProcessState::Ready,
            QueueKind::Running => ProcessState::Running,
            QueueKind::Blocked => ProcessState::Blocked,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QueueKind::New => "New Processes",
            QueueKind::Ready => "Ready Queue",
            QueueKind::Running => "Running Queue",
            QueueKind::Blocked => "Blocked Queue",
        }
    }
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An ordered, capacity-bounded collection of processes. Insertion order is
/// significant: slot layout is derived from it.
#[derive(Debug)]
pub struct BoundedQueue {
    kind: QueueKind,
    capacity: usize,
    items: Vec<Process>,
}

impl BoundedQueue {
    pub fn new(kind: QueueKind, capacity: usize) -> Self {
        Self {
            kind,
            capacity,
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn kind(&self) -> QueueKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Insert respecting capacity. Returns false (and gives the process
    /// back through the Err) when the queue is full.
    pub fn push(&mut self, process: Process) -> Result<(), Process> {
        if self.is_full() {
            return Err(process);
        }
        self.items.push(process);
        Ok(())
    }

    /// Insert bypassing the capacity bound. Used only for reserved
    /// placements: emergency arrivals and escalation penalty spawns.
    pub fn push_reserved(&mut self, process: Process) {
        self.items.push(process);
    }

    pub fn remove(&mut self, pid: Pid) -> Option<Process> {
        let idx = self.items.iter().position(|p| p.pid() == pid)?;
        Some(self.items.remove(idx))
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.items.iter().any(|p| p.pid() == pid)
    }

    pub fn get(&self, pid: Pid) -> Option<&Process> {
        self.items.iter().find(|p| p.pid() == pid)
    }

    pub fn get_mut(&mut self, pid: Pid) -> Option<&mut Process> {
        self.items.iter_mut().find(|p| p.pid() == pid)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Process> {
        self.items.iter_mut()
    }
}

/// The full set of queues, owned exclusively by the queue manager
#[derive(Debug)]
pub struct QueueSet {
    new: BoundedQueue,
    ready: BoundedQueue,
    running: BoundedQueue,
    blocked: BoundedQueue,
}

impl QueueSet {
    pub fn new(new_capacity: usize, running_capacity: usize) -> Self {
        Self {
            new: BoundedQueue::new(QueueKind::New, new_capacity),
            ready: BoundedQueue::new(QueueKind::Ready, READY_CAPACITY),
            running: BoundedQueue::new(QueueKind::Running, running_capacity),
            blocked: BoundedQueue::new(QueueKind::Blocked, BLOCKED_CAPACITY),
        }
    }

    pub fn queue(&self, kind: QueueKind) -> &BoundedQueue {
        match kind {
            QueueKind::New => &self.new,
            QueueKind::Ready => &self.ready,
            QueueKind::Running => &self.running,
            QueueKind::Blocked => &self.blocked,
        }
    }

    pub fn queue_mut(&mut self, kind: QueueKind) -> &mut BoundedQueue {
        match kind {
            QueueKind::New => &mut self.new,
            QueueKind::Ready => &mut self.ready,
            QueueKind::Running => &mut self.running,
            QueueKind::Blocked => &mut self.blocked,
        }
    }

    /// Total number of admitted processes across all queues
    pub fn total_len(&self) -> usize {
        QueueKind::ALL.iter().map(|&k| self.queue(k).len()).sum()
    }

    /// Locate a process by pid
    pub fn find(&self, pid: Pid) -> Option<(QueueKind, &Process)> {
        QueueKind::ALL
            .iter()
            .find_map(|&k| self.queue(k).get(pid).map(|p| (k, p)))
    }

    pub fn find_mut(&mut self, pid: Pid) -> Option<(QueueKind, &mut Process)> {
        let kind = self.location(pid)?;
        self.queue_mut(kind).get_mut(pid).map(|p| (kind, p))
    }

    pub fn location(&self, pid: Pid) -> Option<QueueKind> {
        QueueKind::ALL
            .iter()
            .copied()
            .find(|&k| self.queue(k).contains(pid))
    }

    /// Remove a process from whichever queue currently holds it
    pub fn take(&mut self, pid: Pid) -> Option<(QueueKind, Process)> {
        let kind = self.location(pid)?;
        self.queue_mut(kind).remove(pid).map(|p| (kind, p))
    }

    pub fn iter_all(&self) -> impl Iterator<Item = &Process> {
        QueueKind::ALL
            .iter()
            .flat_map(move |&k| self.queue(k).iter())
    }

    /// Whether any admitted process carries the critical tag
    pub fn any_critical(&self) -> bool {
        self.iter_all().any(|p| p.is_critical())
    }
}
