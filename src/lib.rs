//! FifoGains library matches sell trades against earlier buy trades, oldest buy first,
//! and reports each matched lot with its fees prorated to the matched volume.
//!
//! - `Entry` - one buy or sell leg: time, volume, unit price and the fee for the whole volume
//! - `Realized` - one matched lot between a buy and a sell
//! - `EntryFormat` - column layout used to read entries from a delimited file
//! - `calculate_fifo` / `match_fifo` - the FIFO matcher, the latter also returns unmatched volume
//!
//! Both sequences handed to the matcher must already be ordered by time.
//!
//! Example
//! ```
//! use fifogains::entry::Entry;
//! use fifogains::fifo::calculate_fifo;
//! use fifogains::realized::total_profit;
//!
//! let buys: Vec<Entry> = vec!["2020-01-01,10.0,2.0,0.1".parse().unwrap()];
//! let sells: Vec<Entry> = vec![
//!     "2020-02-01,5.0,1.0,0.05".parse().unwrap(),
//!     "2020-03-01,5.0,1.5,0.08".parse().unwrap(),
//! ];
//!
//! let realized = calculate_fifo(&buys, &sells);
//!
//! assert_eq!(realized.len(), 2);
//! assert_eq!(realized[0].buy_fee(), 0.05);
//! assert_eq!(realized[1].sell_fee(), 0.08);
//! assert_eq!(total_profit(&realized), -7.5);
//! ```

const MARGIN_ERROR_QUANTITY: f64 = 0.0000000001;

/// `Entry`, `Side` and timestamp handling
pub mod entry;
/// crate error type
pub mod error;
/// FIFO matcher
pub mod fifo;
/// reading and writing entries in delimited files
pub mod file_entries;
/// `EntryFormat` column layout
pub mod format;
/// `Realized` lots and profit totals
pub mod realized;
/// plain text and JSON output
pub mod report;

pub use entry::{Entry, Side};
pub use error::{Error, ParseErrorKind};
pub use fifo::{calculate_fifo, match_fifo, FifoMatch};
pub use file_entries::{read_file_entries, write_file_entries, FileEntries};
pub use format::EntryFormat;
pub use realized::{total_net_profit, total_profit, Realized};
