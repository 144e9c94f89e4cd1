use crate::entry::{Entry, Side};
use crate::realized::Realized;
use crate::MARGIN_ERROR_QUANTITY;
use tracing::{debug, info, warn};

/// Outcome of a FIFO run: the matched lots plus whatever volume was left on either side.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct FifoMatch {
    pub realized: Vec<Realized>,
    /// Open inventory: the partially sold buy (with its remaining volume and fee share)
    /// followed by every buy that was never touched.
    pub unmatched_buys: Vec<Entry>,
    /// Sell volume that found no inventory to close against.
    pub unmatched_sells: Vec<Entry>,
}

impl FifoMatch {
    pub fn unmatched_buy_volume(&self) -> f64 {
        self.unmatched_buys.iter().map(|e| e.volume).sum()
    }

    pub fn unmatched_sell_volume(&self) -> f64 {
        self.unmatched_sells.iter().map(|e| e.volume).sum()
    }
}

/// Matches sells against buys in FIFO order and returns the realized lots.
///
/// Both slices must already be ordered by time; only the slice order is used. Volume left
/// unmatched on either side is dropped, use [`match_fifo`] to get it back.
pub fn calculate_fifo(buy_entries: &[Entry], sell_entries: &[Entry]) -> Vec<Realized> {
    match_fifo(buy_entries, sell_entries).realized
}

/// Two-pointer FIFO merge over the buy and sell slices.
///
/// Each step closes `min(buy remaining, sell remaining)` units, emits one `Realized` and
/// moves past whichever entry ran out (both when they run out together). Entries without
/// a positive volume are skipped.
pub fn match_fifo(buy_entries: &[Entry], sell_entries: &[Entry]) -> FifoMatch {
    let mut buys = Lot::start(buy_entries, Side::Buy);
    let mut sells = Lot::start(sell_entries, Side::Sell);
    let mut realized = Vec::new();

    while let (Some(buy), Some(sell)) = (buys.current(), sells.current()) {
        let matched = buys.remaining.min(sells.remaining);
        debug!(
            buy_index = buys.index,
            sell_index = sells.index,
            volume = matched,
            "matched lot"
        );
        realized.push(Realized::match_close(buy, sell, matched));
        buys.take(matched);
        sells.take(matched);
    }

    let outcome = FifoMatch {
        realized,
        unmatched_buys: buys.into_unmatched(),
        unmatched_sells: sells.into_unmatched(),
    };
    info!(
        lots = outcome.realized.len(),
        unmatched_buys = outcome.unmatched_buys.len(),
        unmatched_sells = outcome.unmatched_sells.len(),
        "fifo matching finished"
    );
    outcome
}

/// Cursor over one side: the entry being drawn down and how much of it is left.
struct Lot<'a> {
    entries: &'a [Entry],
    side: Side,
    index: usize,
    remaining: f64,
}

impl<'a> Lot<'a> {
    fn start(entries: &'a [Entry], side: Side) -> Self {
        let mut lot = Lot {
            entries,
            side,
            index: 0,
            remaining: 0.0,
        };
        lot.load();
        lot
    }

    fn current(&self) -> Option<&'a Entry> {
        self.entries.get(self.index)
    }

    // moves forward to the first usable entry at or after `index`
    fn load(&mut self) {
        while let Some(entry) = self.entries.get(self.index) {
            if !entry.is_degenerate() {
                self.remaining = entry.volume;
                return;
            }
            warn!(
                side = %self.side,
                index = self.index,
                volume = entry.volume,
                "skipping entry without positive volume"
            );
            self.index += 1;
        }
        self.remaining = 0.0;
    }

    // exhausted once only float dust relative to the entry's own volume is left
    fn take(&mut self, volume: f64) {
        self.remaining -= volume;
        let dust = self
            .current()
            .map_or(0.0, |entry| entry.volume * MARGIN_ERROR_QUANTITY);
        if self.remaining <= dust {
            self.index += 1;
            self.load();
        }
    }

    fn into_unmatched(self) -> Vec<Entry> {
        let entry = match self.current() {
            Some(entry) => entry,
            None => return vec![],
        };
        let mut unmatched = Vec::with_capacity(self.entries.len() - self.index);
        if self.remaining < entry.volume {
            unmatched.push(entry.prorated(self.remaining));
        } else {
            unmatched.push(*entry);
        }
        unmatched.extend(
            self.entries[self.index + 1..]
                .iter()
                .filter(|e| !e.is_degenerate())
                .copied(),
        );
        unmatched
    }
}
