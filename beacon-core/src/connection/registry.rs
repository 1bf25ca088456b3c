//! Connection Registry
//!
//! The registry stores every registration of one signal in a slot arena and
//! threads the live ones into intrusive doubly linked lists, one list per
//! priority bucket.
//!
//! # Layout
//!
//! - `slots`: growable arena. Links between slots are arena indices, so a slot
//!   can be unlinked in O(1) from its own `prev`/`next` without scanning.
//! - `buckets`: priority -> list head/tail, kept sorted by `BTreeMap`. A plain
//!   signal only ever uses bucket 0. Empty buckets are pruned.
//! - `free`: list of disconnected slots, threaded through the same
//!   `prev`/`next` fields. Disconnected slots keep their listener so they can
//!   be reconnected; a new registration reuses the most recently freed slot
//!   and bumps its generation, which invalidates old keys.
//!
//! Waiter slots are the exception: nobody holds a handle to them, so when
//! `unlink_all` takes them off the live lists their listener is handed back
//! to the caller and dropped, which releases the blocked waiter.
//!
//! Dispatch order is ascending priority, then registration order within a
//! bucket. Reconnected slots go to the tail of their bucket.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::ConnectionKey;
use crate::dispatch::ListenerFn;

/// Head/tail of one intrusive list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Bucket {
    /// First slot in dispatch order.
    head: Option<usize>,
    /// Last slot; appends go here.
    tail: Option<usize>,
    /// Number of slots threaded through this list.
    len: usize,
}

impl Bucket {
    fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// One registration record.
pub(crate) struct Slot<A> {
    /// Bumped on every reuse so stale keys stop resolving.
    generation: u64,
    /// Bucket the slot is linked into while active.
    priority: i32,
    /// Unlink on claim, before the listener runs.
    once: bool,
    /// Registered by `wait`; no handle exists for it.
    waiter: bool,
    /// Linked into its bucket and dispatchable.
    active: bool,
    /// `None` once a waiter slot has been released.
    listener: Option<Arc<ListenerFn<A>>>,
    /// Arguments prepended to every dispatch.
    bound: Arc<[A]>,
    /// Neighbor in the bucket, or in the free list while inactive.
    prev: Option<usize>,
    /// Neighbor in the bucket, or in the free list while inactive.
    next: Option<usize>,
}

/// Everything needed to create a slot.
pub(crate) struct Registration<A> {
    pub priority: i32,
    pub once: bool,
    pub waiter: bool,
    pub listener: Arc<ListenerFn<A>>,
    pub bound: Arc<[A]>,
}

/// A live connection as seen by a snapshot.
pub(crate) struct Entry<A> {
    pub key: ConnectionKey,
    pub once: bool,
    pub listener: Arc<ListenerFn<A>>,
    pub bound: Arc<[A]>,
}

/// Outcome of [`Registry::relink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Relink {
    /// The slot was unlinked and is live again.
    Relinked,
    /// The slot was still linked; nothing changed.
    AlreadyLinked,
    /// The key no longer resolves to a slot.
    Stale,
}

/// Slot arena plus priority buckets for one signal.
pub(crate) struct Registry<A> {
    /// Every slot ever allocated, linked or not.
    slots: Vec<Slot<A>>,
    /// One live list per priority, ascending.
    buckets: BTreeMap<i32, Bucket>,
    /// Unlinked slots, most recently freed at the head.
    free: Bucket,
    /// Number of linked slots across all buckets.
    active: usize,
    /// Set by `destroy`; never cleared.
    destroyed: bool,
}

impl<A> Registry<A> {
    /// Create an empty registry with room for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            buckets: BTreeMap::new(),
            free: Bucket::default(),
            active: 0,
            destroyed: false,
        }
    }

    /// Store a registration and link it at the tail of its bucket.
    ///
    /// Returns the new key and, when a freed slot was reused, the slot it
    /// displaced. The caller drops that outside any lock.
    pub fn insert(&mut self, registration: Registration<A>) -> (ConnectionKey, Option<Slot<A>>) {
        let (index, generation, displaced) = match self.free.head {
            Some(index) => {
                detach(&mut self.slots, &mut self.free, index);
                let generation = self.slots[index].generation + 1;
                let old = std::mem::replace(&mut self.slots[index], Slot::new(generation, registration));
                (index, generation, Some(old))
            }
            None => {
                self.slots.push(Slot::new(0, registration));
                (self.slots.len() - 1, 0, None)
            }
        };

        self.attach(index);
        (ConnectionKey::new(index, generation), displaced)
    }

    /// Whether `key` names a currently linked slot.
    pub fn is_active(&self, key: ConnectionKey) -> bool {
        self.slot(key).is_some_and(|slot| slot.active)
    }

    /// Unlink a live slot and push it onto the free list.
    ///
    /// Returns `false` if the slot was already unlinked or the key is stale.
    pub fn unlink(&mut self, key: ConnectionKey) -> bool {
        if !self.is_active(key) {
            return false;
        }
        self.detach_active(key.index());
        true
    }

    /// Link a previously unlinked slot back at the tail of its bucket.
    pub fn relink(&mut self, key: ConnectionKey) -> Relink {
        match self.slot(key) {
            None => Relink::Stale,
            Some(slot) if slot.active => Relink::AlreadyLinked,
            Some(slot) if slot.listener.is_none() => Relink::Stale,
            Some(_) => {
                detach(&mut self.slots, &mut self.free, key.index());
                self.attach(key.index());
                Relink::Relinked
            }
        }
    }

    /// Check that `key` may be dispatched right now.
    ///
    /// One-shot slots are unlinked as part of the claim, so a given
    /// registration is claimed at most once until it is reconnected.
    pub fn claim(&mut self, key: ConnectionKey) -> bool {
        let once = match self.slot(key) {
            Some(slot) if slot.active => slot.once,
            _ => return false,
        };
        if once {
            self.detach_active(key.index());
        }
        true
    }

    /// Unlink every live slot.
    ///
    /// Returns how many were unlinked, plus the listeners of waiter slots.
    /// The caller drops those outside any lock to release the waiters.
    pub fn unlink_all(&mut self) -> (usize, Vec<Arc<ListenerFn<A>>>) {
        let linked: Vec<usize> = self.linked().collect();
        let mut released = Vec::new();
        for &index in &linked {
            self.detach_active(index);
            let slot = &mut self.slots[index];
            if slot.waiter {
                released.extend(slot.listener.take());
            }
        }
        (linked.len(), released)
    }

    /// Remove every slot, handing them back so the caller can drop the
    /// listeners outside any lock.
    pub fn clear(&mut self) -> Vec<Slot<A>> {
        self.buckets.clear();
        self.free = Bucket::default();
        self.active = 0;
        std::mem::take(&mut self.slots)
    }

    /// The live connections in dispatch order.
    pub fn snapshot(&self) -> Vec<Entry<A>> {
        self.linked()
            .filter_map(|index| {
                let slot = &self.slots[index];
                Some(Entry {
                    key: ConnectionKey::new(index, slot.generation),
                    once: slot.once,
                    listener: Arc::clone(slot.listener.as_ref()?),
                    bound: Arc::clone(&slot.bound),
                })
            })
            .collect()
    }

    /// Number of linked slots.
    pub fn len(&self) -> usize {
        self.active
    }

    /// Priorities that currently have at least one linked slot, ascending.
    pub fn priorities(&self) -> Vec<i32> {
        self.buckets.keys().copied().collect()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn mark_destroyed(&mut self) {
        self.destroyed = true;
    }

    fn slot(&self, key: ConnectionKey) -> Option<&Slot<A>> {
        self.slots
            .get(key.index())
            .filter(|slot| slot.generation == key.generation())
    }

    /// Indices of linked slots in dispatch order.
    fn linked(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.values().flat_map(move |bucket| {
            std::iter::successors(bucket.head, move |&index| self.slots[index].next)
        })
    }

    fn attach(&mut self, index: usize) {
        let priority = self.slots[index].priority;
        let bucket = self.buckets.entry(priority).or_default();
        link_back(&mut self.slots, bucket, index);
        self.slots[index].active = true;
        self.active += 1;
    }

    fn detach_active(&mut self, index: usize) {
        let priority = self.slots[index].priority;
        if let Some(bucket) = self.buckets.get_mut(&priority) {
            detach(&mut self.slots, bucket, index);
            if bucket.is_empty() {
                self.buckets.remove(&priority);
            }
        }
        self.slots[index].active = false;
        self.active -= 1;
        link_front(&mut self.slots, &mut self.free, index);
    }
}

impl<A> Slot<A> {
    fn new(generation: u64, registration: Registration<A>) -> Self {
        Self {
            generation,
            priority: registration.priority,
            once: registration.once,
            waiter: registration.waiter,
            active: false,
            listener: Some(registration.listener),
            bound: registration.bound,
            prev: None,
            next: None,
        }
    }
}

fn link_back<A>(slots: &mut [Slot<A>], bucket: &mut Bucket, index: usize) {
    slots[index].prev = bucket.tail;
    slots[index].next = None;
    match bucket.tail {
        Some(tail) => slots[tail].next = Some(index),
        None => bucket.head = Some(index),
    }
    bucket.tail = Some(index);
    bucket.len += 1;
}

fn link_front<A>(slots: &mut [Slot<A>], bucket: &mut Bucket, index: usize) {
    slots[index].prev = None;
    slots[index].next = bucket.head;
    match bucket.head {
        Some(head) => slots[head].prev = Some(index),
        None => bucket.tail = Some(index),
    }
    bucket.head = Some(index);
    bucket.len += 1;
}

fn detach<A>(slots: &mut [Slot<A>], bucket: &mut Bucket, index: usize) {
    let prev = slots[index].prev.take();
    let next = slots[index].next.take();
    match prev {
        Some(prev) => slots[prev].next = next,
        None => bucket.head = next,
    }
    match next {
        Some(next) => slots[next].prev = prev,
        None => bucket.tail = prev,
    }
    bucket.len -= 1;
}
