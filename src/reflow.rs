//! Slide reflow fixes for rendered presentations.
//!
//! The presentation renderer fills the slide container incrementally and
//! leaves two artifacts behind: non-breaking spaces where ordinary spaces
//! belong, and adjacent text blocks glued together without a space. A fix
//! pass repairs both. Passes are driven by mutation notifications:
//!
//! ```text
//! mutation ─┐
//! mutation ─┼─► one pending pass ─► next frame: fix pass
//! mutation ─┘
//!                         settle delay elapsed ─► final fix pass
//! ```
//!
//! [`fix_pass`], [`FixScheduler`] and [`observe`] model this over a
//! fragment list; [`reflow_script`] is the same logic as it runs inside a
//! PPTX viewer page.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{debug, trace};

/// Delay before the final unconditional pass.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(2000);

/// One rendering opportunity (~60 fps).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// A piece of rendered slide text, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// A text block emitted by the renderer.
    Block(String),
    /// A separator inserted by a fix pass.
    Space,
}

impl Fragment {
    pub fn block(text: &str) -> Self {
        Fragment::Block(text.to_string())
    }
}

/// What one pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixReport {
    pub nbsp_replaced: usize,
    pub spaces_inserted: usize,
}

impl FixReport {
    pub fn changed(&self) -> bool {
        self.nbsp_replaced > 0 || self.spaces_inserted > 0
    }
}

/// Run one fix pass. Idempotent: a second pass over its output changes
/// nothing.
pub fn fix_pass(fragments: &mut Vec<Fragment>) -> FixReport {
    let mut report = FixReport::default();

    for fragment in fragments.iter_mut() {
        if let Fragment::Block(text) = fragment {
            let count = text.matches('\u{00A0}').count();
            if count > 0 {
                *text = text.replace('\u{00A0}', " ");
                report.nbsp_replaced += count;
            }
        }
    }

    let mut i = 0;
    while i < fragments.len() {
        let Fragment::Block(current) = &fragments[i] else {
            i += 1;
            continue;
        };
        // Only directly adjacent blocks; an existing separator means done.
        if let Some(Fragment::Block(next)) = fragments.get(i + 1) {
            if needs_separator(current, next) {
                fragments.insert(i + 1, Fragment::Space);
                report.spaces_inserted += 1;
                i += 1;
            }
        }
        i += 1;
    }

    report
}

/// Neither adjoining character is whitespace. Empty blocks have no
/// adjoining character and never get a separator.
fn needs_separator(current: &str, next: &str) -> bool {
    match (current.chars().next_back(), next.chars().next()) {
        (Some(last), Some(first)) => !last.is_whitespace() && !first.is_whitespace(),
        _ => false,
    }
}

/// Concatenated text, as a reader would see it.
pub fn visible_text(fragments: &[Fragment]) -> String {
    fragments
        .iter()
        .map(|f| match f {
            Fragment::Block(text) => text.as_str(),
            Fragment::Space => " ",
        })
        .collect()
}

/// Coalesces mutation notifications: at most one pass pending at a time.
#[derive(Debug, Default)]
pub struct FixScheduler {
    pending: bool,
}

impl FixScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mutation. Returns `true` if this scheduled a new pass,
    /// `false` if one was already pending.
    pub fn notify(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending pass at a rendering opportunity.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

/// Slide text shared between the renderer and the observer.
pub type SharedSlides = Arc<Mutex<Vec<Fragment>>>;

/// Timing for [`observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflowConfig {
    pub frame_interval: Duration,
    pub settle_delay: Duration,
}

impl Default for ReflowConfig {
    fn default() -> Self {
        Self {
            frame_interval: FRAME_INTERVAL,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

/// Counters from one [`observe`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReflowStats {
    pub notifications: usize,
    /// Passes triggered by notifications.
    pub scheduled_passes: usize,
    pub final_pass_ran: bool,
    pub nbsp_replaced: usize,
    pub spaces_inserted: usize,
}

impl ReflowStats {
    fn record(&mut self, report: FixReport) {
        self.nbsp_replaced += report.nbsp_replaced;
        self.spaces_inserted += report.spaces_inserted;
    }
}

/// Observe `slides` until the mutation channel closes and the settle pass
/// has run.
///
/// Every notification marks a pass pending; pending passes run on the next
/// frame tick. Notifications already queued when a frame comes up are
/// drained first, so a burst collapses into one pass.
pub async fn observe(
    slides: SharedSlides,
    mut mutations: mpsc::UnboundedReceiver<()>,
    config: ReflowConfig,
) -> ReflowStats {
    let mut scheduler = FixScheduler::new();
    let mut stats = ReflowStats::default();
    let mut frames = interval(config.frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let settle = sleep(config.settle_delay);
    tokio::pin!(settle);

    let mut closed = false;
    let mut settled = false;

    loop {
        if closed && settled && !scheduler.is_pending() {
            break;
        }

        tokio::select! {
            biased;

            msg = mutations.recv(), if !closed => match msg {
                Some(()) => {
                    stats.notifications += 1;
                    if !scheduler.notify() {
                        trace!("Pass already pending, coalesced");
                    }
                }
                None => closed = true,
            },

            _ = frames.tick(), if scheduler.is_pending() => {
                if scheduler.take() {
                    stats.scheduled_passes += 1;
                    stats.record(run_pass(&slides));
                }
            },

            () = &mut settle, if !settled => {
                settled = true;
                stats.final_pass_ran = true;
                stats.record(run_pass(&slides));
                debug!("Settle pass done");
            },
        }
    }

    stats
}

fn run_pass(slides: &SharedSlides) -> FixReport {
    match slides.lock() {
        Ok(mut fragments) => fix_pass(&mut fragments),
        Err(_) => FixReport::default(),
    }
}

const REFLOW_JS: &str = r"(function () {
    const SETTLE_DELAY_MS = __SETTLE_DELAY_MS__;
    const viewer = document.getElementById('viewer');

    function fixNbsp(root) {
        const walker = document.createTreeWalker(root, NodeFilter.SHOW_TEXT);
        let node;
        while ((node = walker.nextNode())) {
            if (node.textContent.indexOf('\u00A0') !== -1) {
                node.textContent = node.textContent.replace(/\u00A0/g, ' ');
            }
        }
    }

    function fixMissingSpaces(root) {
        const blocks = root.querySelectorAll('span.text-block');
        for (let i = 0; i < blocks.length - 1; i++) {
            const current = blocks[i];
            const next = blocks[i + 1];
            if (current.parentNode !== next.parentNode || current.nextSibling !== next) {
                continue;
            }
            const last = current.textContent.slice(-1);
            const first = next.textContent.charAt(0);
            if (last && first && !/\s/.test(last) && !/\s/.test(first)) {
                current.parentNode.insertBefore(document.createTextNode(' '), next);
            }
        }
    }

    function fixPass() {
        fixNbsp(viewer);
        fixMissingSpaces(viewer);
    }

    let fixScheduled = false;
    function scheduleFixes() {
        if (fixScheduled) return;
        fixScheduled = true;
        requestAnimationFrame(() => {
            fixPass();
            fixScheduled = false;
        });
    }

    new MutationObserver(scheduleFixes).observe(viewer, {
        childList: true,
        subtree: true,
        characterData: true,
    });

    setTimeout(fixPass, SETTLE_DELAY_MS);
})();";

/// Page-side post-processor attached to PPTX viewers. Expects the slide
/// container to be `#viewer`.
pub fn reflow_script(settle_delay: Duration) -> String {
    REFLOW_JS.replace("__SETTLE_DELAY_MS__", &settle_delay.as_millis().to_string())
}
