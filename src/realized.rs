use crate::entry::{Entry, TIME_FORMAT};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Holds one matched lot: a slice of a buy entry closed by a slice of a sell entry.
///
/// Prices are copied from the entries as they are. Fees are the entries' fees prorated to
/// the matched volume.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct Realized {
    buy_date: DateTime<Utc>,
    sell_date: DateTime<Utc>,
    volume: f64,
    buy_price: f64,
    buy_fee: f64,
    sell_price: f64,
    sell_fee: f64,
}

impl Realized {
    pub fn new(
        buy_date: DateTime<Utc>,
        sell_date: DateTime<Utc>,
        volume: f64,
        buy_price: f64,
        buy_fee: f64,
        sell_price: f64,
        sell_fee: f64,
    ) -> Self {
        Realized {
            buy_date,
            sell_date,
            volume,
            buy_price,
            buy_fee,
            sell_price,
            sell_fee,
        }
    }

    /// Lot of `volume` units taken from both entries; callers guarantee both volumes are
    /// positive.
    pub fn match_close(buy: &Entry, sell: &Entry, volume: f64) -> Realized {
        Realized::new(
            buy.time,
            sell.time,
            volume,
            buy.price,
            buy.prorated_fee(volume),
            sell.price,
            sell.prorated_fee(volume),
        )
    }

    /// Gross gain or loss, fees excluded.
    pub fn profit(&self) -> f64 {
        self.volume * (self.sell_price - self.buy_price)
    }

    pub fn net_profit(&self) -> f64 {
        self.profit() - self.buy_fee - self.sell_fee
    }

    // getters
    pub fn buy_date(&self) -> DateTime<Utc> {
        self.buy_date
    }
    pub fn sell_date(&self) -> DateTime<Utc> {
        self.sell_date
    }
    pub fn volume(&self) -> f64 {
        self.volume
    }
    pub fn buy_price(&self) -> f64 {
        self.buy_price
    }
    pub fn buy_fee(&self) -> f64 {
        self.buy_fee
    }
    pub fn sell_price(&self) -> f64 {
        self.sell_price
    }
    pub fn sell_fee(&self) -> f64 {
        self.sell_fee
    }
}

impl fmt::Display for Realized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "buy_date: {}, sell_date: {}, volume: {}, buy_price: {}, buy_fee: {}, sell_price: {}, sell_fee: {}",
            self.buy_date.format(TIME_FORMAT),
            self.sell_date.format(TIME_FORMAT),
            self.volume,
            self.buy_price,
            self.buy_fee,
            self.sell_price,
            self.sell_fee
        )
    }
}

/// Total profit is the sum of `volume * (sell_price - buy_price)` over the slice.
pub fn total_profit(r: &[Realized]) -> f64 {
    r.iter().map(|r| r.profit()).sum()
}

/// Same as `total_profit` with both prorated fees taken off each lot.
pub fn total_net_profit(r: &[Realized]) -> f64 {
    r.iter().map(|r| r.net_profit()).sum()
}
