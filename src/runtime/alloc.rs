//! Allocation counting global allocator.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

static REGISTERED: OnceLock<&'static AllocCounters> = OnceLock::new();

/// Counters of one [`CountingAllocator`].
#[derive(Debug, Default)]
pub struct AllocCounters {
    allocated: AtomicU64,
    total_allocated: AtomicU64,
    mallocs: AtomicU64,
    frees: AtomicU64,
}

impl AllocCounters {
    const fn new() -> Self {
        Self {
            allocated: AtomicU64::new(0),
            total_allocated: AtomicU64::new(0),
            mallocs: AtomicU64::new(0),
            frees: AtomicU64::new(0),
        }
    }

    fn record_alloc(&self, size: usize) {
        self.allocated.fetch_add(size as u64, Ordering::Relaxed);
        self.total_allocated.fetch_add(size as u64, Ordering::Relaxed);
        self.mallocs.fetch_add(1, Ordering::Relaxed);
    }

    fn record_free(&self, size: usize) {
        self.allocated.fetch_sub(size as u64, Ordering::Relaxed);
        self.frees.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads the counters.
    pub fn snapshot(&self) -> AllocSnapshot {
        AllocSnapshot {
            allocated: self.allocated.load(Ordering::Relaxed),
            total_allocated: self.total_allocated.load(Ordering::Relaxed),
            mallocs: self.mallocs.load(Ordering::Relaxed),
            frees: self.frees.load(Ordering::Relaxed),
        }
    }
}

/// A [`GlobalAlloc`] wrapper that counts allocations.
///
/// Every instance keeps its own counters. Only the instance passed to
/// [`register`](Self::register) feeds the allocator gauges of
/// [`ProcessStats`](super::ProcessStats), which is normally the global
/// allocator:
///
/// ```rust
/// use runstats::runtime::CountingAllocator;
///
/// #[global_allocator]
/// static GLOBAL: CountingAllocator = CountingAllocator::system();
///
/// fn main() {
///     GLOBAL.register();
/// }
/// ```
#[derive(Debug, Default)]
pub struct CountingAllocator<A = System> {
    inner: A,
    counters: AllocCounters,
}

impl CountingAllocator<System> {
    /// Wraps the system allocator.
    pub const fn system() -> Self {
        Self::new(System)
    }
}

impl<A> CountingAllocator<A> {
    /// Wraps the given allocator.
    pub const fn new(inner: A) -> Self {
        Self {
            inner,
            counters: AllocCounters::new(),
        }
    }

    /// The counters of this allocator.
    pub fn counters(&self) -> &AllocCounters {
        &self.counters
    }

    /// Makes this allocator the source of the process allocator statistics.
    ///
    /// Returns `false` if another allocator was registered before.
    pub fn register(&'static self) -> bool {
        REGISTERED.set(&self.counters).is_ok()
    }
}

unsafe impl<A: GlobalAlloc> GlobalAlloc for CountingAllocator<A> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = self.inner.alloc(layout);
        if !ptr.is_null() {
            self.counters.record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = self.inner.alloc_zeroed(layout);
        if !ptr.is_null() {
            self.counters.record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        self.inner.dealloc(ptr, layout);
        self.counters.record_free(layout.size());
    }

    // a reallocation counts as one free and one fresh allocation
    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = self.inner.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            self.counters.record_free(layout.size());
            self.counters.record_alloc(new_size);
        }
        new_ptr
    }
}

/// Counters maintained by [`CountingAllocator`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocSnapshot {
    /// Bytes currently allocated.
    pub allocated: u64,
    /// Cumulative bytes allocated.
    pub total_allocated: u64,
    /// Cumulative number of allocations.
    pub mallocs: u64,
    /// Cumulative number of deallocations.
    pub frees: u64,
}

impl AllocSnapshot {
    /// Number of allocations that have not been freed yet.
    pub fn live_objects(&self) -> u64 {
        self.mallocs.saturating_sub(self.frees)
    }
}

/// Reads the counters of the registered allocator.
///
/// Returns `None` unless a [`CountingAllocator`] was registered.
pub fn snapshot() -> Option<AllocSnapshot> {
    REGISTERED.get().map(|counters| counters.snapshot())
}
