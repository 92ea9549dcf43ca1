//! Runtime introspection types.
//!
//! [`RuntimeStats`] is the seam between the collector and whatever can report
//! runtime counters. The crate ships a process backed implementation in
//! [`runtime::ProcessStats`](crate::runtime::ProcessStats); hosts embedding a
//! managed runtime can provide their own.

/// Number of slots in the pause duration ring buffer.
pub const PAUSE_RING_SIZE: usize = 256;

/// Source of runtime counters.
pub trait RuntimeStats: Send + Sync + 'static {
    /// Current number of active concurrency units.
    fn concurrency_units(&self) -> u64;

    /// Cumulative number of foreign function calls since process start.
    fn foreign_calls(&self) -> u64;

    /// Takes one consistent snapshot of allocator and collector counters.
    fn mem_stats(&self) -> MemStats;
}

/// Circular buffer of recent collection pause durations, in nanoseconds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PauseRing {
    slots: [u64; PAUSE_RING_SIZE],
}

impl Default for PauseRing {
    fn default() -> Self {
        Self {
            slots: [0; PAUSE_RING_SIZE],
        }
    }
}

impl PauseRing {
    /// Returns the slot that was written last after `num_gc` collections.
    pub fn latest_index(num_gc: u32) -> usize {
        (num_gc as usize % PAUSE_RING_SIZE + PAUSE_RING_SIZE - 1) % PAUSE_RING_SIZE
    }

    /// Returns the most recent pause duration after `num_gc` collections.
    pub fn latest(&self, num_gc: u32) -> u64 {
        self.slots[Self::latest_index(num_gc)]
    }

    /// Returns the pause duration stored in `index`, wrapping around.
    pub fn get(&self, index: usize) -> u64 {
        self.slots[index % PAUSE_RING_SIZE]
    }

    /// Stores a pause duration in `index`, wrapping around.
    pub fn set(&mut self, index: usize, pause_ns: u64) {
        self.slots[index % PAUSE_RING_SIZE] = pause_ns;
    }

    /// Records the pause of collection number `num_gc` (1-based).
    ///
    /// After this call [`latest`](Self::latest) with the same `num_gc`
    /// returns `pause_ns`.
    pub fn record(&mut self, num_gc: u32, pause_ns: u64) {
        self.slots[Self::latest_index(num_gc)] = pause_ns;
    }
}

/// Snapshot of allocator and collector counters.
///
/// All sizes are in bytes, all times in nanoseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemStats {
    /// Bytes of allocated objects.
    pub alloc: u64,
    /// Cumulative bytes allocated, never decreases.
    pub total_alloc: u64,
    /// Total bytes obtained from the operating system.
    pub sys: u64,
    /// Number of pointer lookups performed by the runtime.
    pub lookups: u64,
    /// Cumulative count of allocated objects.
    pub mallocs: u64,
    /// Cumulative count of freed objects.
    pub frees: u64,

    /// Bytes of allocated heap objects.
    pub heap_alloc: u64,
    /// Heap bytes obtained from the operating system.
    pub heap_sys: u64,
    /// Heap bytes obtained but not in use.
    pub heap_idle: u64,
    /// Heap bytes in use.
    pub heap_inuse: u64,
    /// Heap bytes returned to the operating system.
    pub heap_released: u64,
    /// Number of live heap objects.
    pub heap_objects: u64,

    /// Stack bytes in use.
    pub stack_inuse: u64,
    /// Stack bytes obtained from the operating system.
    pub stack_sys: u64,
    /// Bytes of allocator span metadata in use.
    pub mspan_inuse: u64,
    /// Bytes of allocator span metadata obtained from the operating system.
    pub mspan_sys: u64,
    /// Bytes of per-thread allocator caches in use.
    pub mcache_inuse: u64,
    /// Bytes of per-thread allocator caches obtained from the operating system.
    pub mcache_sys: u64,

    /// Bytes obtained from the operating system not covered above.
    pub other_sys: u64,

    /// Bytes reserved for collector metadata.
    pub gc_sys: u64,
    /// Heap size that triggers the next collection.
    pub next_gc: u64,
    /// End of the last collection, nanoseconds since the Unix epoch.
    pub last_gc: u64,
    /// Cumulative collection pause time in nanoseconds.
    pub pause_total_ns: u64,
    /// Recent collection pauses in nanoseconds.
    pub pause_ns: PauseRing,
    /// Number of completed collections.
    pub num_gc: u32,
}

impl MemStats {
    /// Duration of the most recent collection pause.
    pub fn last_pause_ns(&self) -> u64 {
        self.pause_ns.latest(self.num_gc)
    }
}
