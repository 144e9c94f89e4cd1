//! Text and JSON renderings of matched lots.
//!
//! Both end with a blank line followed by the total profit,
//! `sum(volume * (sell_price - buy_price))`.

use crate::realized::{total_profit, Realized};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
struct Transactions<'a> {
    transactions: &'a [Realized],
}

/// One `Realized` per line.
pub fn write_plain<W: Write>(mut w: W, realized: &[Realized]) -> io::Result<()> {
    for r in realized {
        writeln!(w, "{}", r)?;
    }
    writeln!(w)?;
    writeln!(w, "{}", total_profit(realized))
}

/// `{"transactions": [...]}` with dates in RFC 3339.
pub fn write_json<W: Write>(mut w: W, realized: &[Realized]) -> io::Result<()> {
    serde_json::to_writer_pretty(
        &mut w,
        &Transactions {
            transactions: realized,
        },
    )?;
    writeln!(w)?;
    writeln!(w)?;
    writeln!(w, "{}", total_profit(realized))
}
