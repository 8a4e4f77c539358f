//! Heap tracking for measured call windows.
//!
//! [`TallyAllocator`] wraps another allocator and maintains process-wide
//! counters of live and peak heap bytes. Installing it with
//! `#[global_allocator]` gives [`TrackingSession`] real readings; without it
//! the counters never move and every window reports `0.0` KB.


use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::{Mutex, MutexGuard};

static LIVE_BYTES: AtomicUsize = AtomicUsize::new(0);
static PEAK_BYTES: AtomicUsize = AtomicUsize::new(0);
static COUNTING: AtomicBool = AtomicBool::new(false);

// Top-level tracking windows take this lock so the shared peak watermark
// belongs to exactly one measurement at a time.
static WINDOW: Mutex<()> = Mutex::new(());

thread_local! {
    static WINDOW_DEPTH: Cell<u32> = const { Cell::new(0) };
}

const BYTES_PER_KB: f64 = 1024.0;

/// Counting wrapper around a [`GlobalAlloc`] implementation.
///
/// ```ignore
/// #[global_allocator]
/// static GLOBAL: callmeter::track::TallyAllocator = callmeter::track::TallyAllocator::system();
/// ```
#[derive(Debug, Default)]
pub struct TallyAllocator<A = System> {
    inner: A,
}

impl TallyAllocator<System> {
    /// A tally allocator over the system allocator.
    #[must_use]
    pub const fn system() -> Self {
        Self { inner: System }
    }
}

impl<A> TallyAllocator<A> {
    /// Wraps an arbitrary inner allocator.
    #[must_use]
    pub const fn new(inner: A) -> Self {
        Self { inner }
    }
}

fn on_alloc(size: usize) {
    if !COUNTING.load(Ordering::Relaxed) {
        COUNTING.store(true, Ordering::Relaxed);
    }
    let live = LIVE_BYTES
        .fetch_add(size, Ordering::Relaxed)
        .saturating_add(size);
    PEAK_BYTES.fetch_max(live, Ordering::Relaxed);
}

fn on_dealloc(size: usize) {
    // Pairs with a counted allocation as long as the allocator was installed
    // at process start, which #[global_allocator] guarantees.
    LIVE_BYTES.fetch_sub(size, Ordering::Relaxed);
}

// Safety: every method forwards to the inner allocator unchanged and only
// adds counter bookkeeping, so the inner allocator's guarantees carry over.
unsafe impl<A: GlobalAlloc> GlobalAlloc for TallyAllocator<A> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        // Safety: forwarded verbatim; the caller upholds the layout contract.
        let ptr = unsafe { self.inner.alloc(layout) };
        if !ptr.is_null() {
            on_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        // Safety: forwarded verbatim; the caller upholds the layout contract.
        let ptr = unsafe { self.inner.alloc_zeroed(layout) };
        if !ptr.is_null() {
            on_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        // Safety: the caller guarantees `ptr` was allocated here with `layout`.
        unsafe { self.inner.dealloc(ptr, layout) };
        on_dealloc(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        // Safety: the caller guarantees `ptr`, `layout` and `new_size` satisfy
        // the realloc contract of the inner allocator.
        let new_ptr = unsafe { self.inner.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            on_dealloc(layout.size());
            on_alloc(new_size);
        }
        new_ptr
    }
}

/// One measured window over the shared heap counters.
///
/// The first session on a thread takes the process-wide window lock and
/// resets the peak watermark to the current live level; sessions opened while
/// an outer one is active on the same thread stay passive and read the outer
/// watermark. Dropping the session releases the window, including during
/// unwinding.
///
/// Readings are process-global: allocations made by other threads while the
/// window is open count toward its peak.
#[derive(Debug)]
pub struct TrackingSession {
    baseline: usize,
    window: Option<MutexGuard<'static, ()>>,
}

impl TrackingSession {
    /// Opens a tracking window, blocking while another thread holds one.
    #[must_use]
    pub fn begin() -> Self {
        let depth = WINDOW_DEPTH.with(|cell| cell.get());
        let window = if depth == 0 {
            Some(WINDOW.lock())
        } else {
            None
        };
        let baseline = LIVE_BYTES.load(Ordering::Relaxed);
        if window.is_some() {
            PEAK_BYTES.store(baseline, Ordering::Relaxed);
        }
        WINDOW_DEPTH.with(|cell| cell.set(depth.saturating_add(1)));
        Self { baseline, window }
    }

    /// Peak heap growth observed since the window opened, in KB.
    #[must_use]
    pub fn peak_kb(&self) -> f64 {
        let peak = PEAK_BYTES.load(Ordering::Relaxed);
        bytes_to_kb(peak.saturating_sub(self.baseline))
    }

    /// Whether this session holds the window lock (false for nested ones).
    #[must_use]
    pub const fn is_exclusive(&self) -> bool {
        self.window.is_some()
    }
}

impl Drop for TrackingSession {
    fn drop(&mut self) {
        WINDOW_DEPTH.with(|cell| cell.set(cell.get().saturating_sub(1)));
    }
}

/// Whether a [`TallyAllocator`] has counted at least one allocation, i.e.
/// whether peak readings carry real data.
#[must_use]
pub fn tracking_active() -> bool {
    COUNTING.load(Ordering::Relaxed)
}

/// Currently live tracked heap bytes.
#[must_use]
pub fn live_bytes() -> usize {
    LIVE_BYTES.load(Ordering::Relaxed)
}

const fn bytes_to_kb(bytes: usize) -> f64 {
    (bytes as f64) / BYTES_PER_KB
}
