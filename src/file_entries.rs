use crate::entry::{parse_number, parse_time, Entry, Side, TIME_FORMAT};
use crate::error::{Error, ParseErrorKind};
use crate::format::EntryFormat;
use csv::StringRecord;
use std::io;
use tracing::{debug, info};

/// Buy and sell entries read from one file, each in file row order.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct FileEntries {
    pub buy_entries: Vec<Entry>,
    pub sell_entries: Vec<Entry>,
}

impl FileEntries {
    pub fn push(&mut self, side: Side, entry: Entry) {
        match side {
            Side::Buy => self.buy_entries.push(entry),
            Side::Sell => self.sell_entries.push(entry),
        }
    }

    /// Stable sort of both sides by time. Files exported newest first need this before
    /// matching.
    pub fn sort_by_time(&mut self) {
        self.buy_entries.sort_by_key(|e| e.time);
        self.sell_entries.sort_by_key(|e| e.time);
    }

    pub fn is_time_ordered(&self) -> bool {
        let ordered = |entries: &[Entry]| entries.windows(2).all(|w| w[0].time <= w[1].time);
        ordered(self.buy_entries.as_slice()) && ordered(self.sell_entries.as_slice())
    }
}

/// Reads delimited rows into buy and sell entries.
///
/// Rows whose buy/sell column is missing or is neither `buy` nor `sell` (any case) are
/// skipped, which also drops header and summary lines. Any other malformed row stops the
/// read with its line number and content.
pub fn read_file_entries<R: io::Read>(
    reader: R,
    format: &EntryFormat,
) -> Result<FileEntries, Error> {
    format.validate()?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(format.separator_byte()?)
        .from_reader(reader);

    let mut file_entries = FileEntries::default();
    let mut record = StringRecord::new();
    let mut skipped = 0usize;
    while rdr.read_record(&mut record)? {
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map_or(0, |p| p.line());
        match parse_row(&record, format) {
            Ok(Some((side, entry))) => file_entries.push(side, entry),
            Ok(None) => {
                skipped += 1;
                debug!(line, "skipping row without buy/sell marker");
            }
            Err(kind) => {
                return Err(Error::Parse {
                    line,
                    raw: raw_row(&record, format.separator),
                    kind,
                })
            }
        }
    }

    info!(
        buys = file_entries.buy_entries.len(),
        sells = file_entries.sell_entries.len(),
        skipped,
        "entries read"
    );
    Ok(file_entries)
}

/// Writes every buy then every sell as one row each, using the same layout the reader
/// expects. Columns not used by the layout are left empty.
pub fn write_file_entries<W: io::Write>(
    writer: W,
    file_entries: &FileEntries,
    format: &EntryFormat,
) -> Result<(), Error> {
    format.validate()?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .delimiter(format.separator_byte()?)
        .from_writer(writer);

    let mut row = vec![String::new(); format.width()];
    let sides = [
        (Side::Buy, &file_entries.buy_entries),
        (Side::Sell, &file_entries.sell_entries),
    ];
    for (side, entries) in sides {
        for entry in entries.iter() {
            row[format.time_column_index] = entry.time.format(TIME_FORMAT).to_string();
            row[format.buy_or_sell_column_index] = side.to_string();
            row[format.volume_column_index] = entry.volume.to_string();
            row[format.price_column_index] = entry.price.to_string();
            row[format.fee_column_index] = entry.fee.to_string();
            wtr.write_record(&row)?;
        }
    }
    wtr.flush()?;
    Ok(())
}

fn parse_row(
    record: &StringRecord,
    format: &EntryFormat,
) -> Result<Option<(Side, Entry)>, ParseErrorKind> {
    // rows too short to carry a marker are skipped like unknown markers
    let side = match record.get(format.buy_or_sell_column_index).map(str::parse::<Side>) {
        Some(Ok(side)) => side,
        _ => return Ok(None),
    };

    let time = field(record, format.time_column_index, "time")?;
    let time = parse_time(time).ok_or_else(|| ParseErrorKind::InvalidTime(time.to_owned()))?;
    let volume = parse_number(field(record, format.volume_column_index, "volume")?, "volume")?;
    if volume < 0.0 {
        return Err(ParseErrorKind::NegativeVolume(volume));
    }
    let price = parse_number(field(record, format.price_column_index, "price")?, "price")?;
    let fee = parse_number(field(record, format.fee_column_index, "fee")?, "fee")?;

    Ok(Some((side, Entry::new(time, volume, price, fee))))
}

fn field<'r>(
    record: &'r StringRecord,
    index: usize,
    column: &'static str,
) -> Result<&'r str, ParseErrorKind> {
    record
        .get(index)
        .ok_or(ParseErrorKind::MissingColumn { column, index })
}

fn raw_row(record: &StringRecord, separator: char) -> String {
    record
        .iter()
        .collect::<Vec<_>>()
        .join(&separator.to_string())
}
