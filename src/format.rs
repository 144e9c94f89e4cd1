use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Column layout of a delimited trade file. Indices are zero-based and independent of
/// each other; a row only has to be wide enough to reach the largest one.
///
/// `Default` is the exchange export layout read by the command line tool:
/// `..., time(3), side(4), _, price(6), _, fee(8), volume(9)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFormat {
    pub time_column_index: usize,
    pub volume_column_index: usize,
    pub price_column_index: usize,
    pub fee_column_index: usize,
    pub buy_or_sell_column_index: usize,
    pub separator: char,
}

impl Default for EntryFormat {
    fn default() -> Self {
        EntryFormat {
            time_column_index: 3,
            volume_column_index: 9,
            price_column_index: 6,
            fee_column_index: 8,
            buy_or_sell_column_index: 4,
            separator: ',',
        }
    }
}

impl EntryFormat {
    pub fn new(
        time_column_index: usize,
        volume_column_index: usize,
        price_column_index: usize,
        fee_column_index: usize,
        buy_or_sell_column_index: usize,
        separator: char,
    ) -> Self {
        EntryFormat {
            time_column_index,
            volume_column_index,
            price_column_index,
            fee_column_index,
            buy_or_sell_column_index,
            separator,
        }
    }

    /// Separator must fit in one byte and no two fields may share a column.
    pub fn validate(&self) -> Result<(), Error> {
        self.separator_byte()?;
        let columns = self.columns();
        for (i, (name, index)) in columns.iter().enumerate() {
            if let Some((other, _)) = columns[i + 1..].iter().find(|(_, o)| o == index) {
                return Err(Error::Configuration(format!(
                    "{} and {} both use column {}",
                    name, other, index
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn separator_byte(&self) -> Result<u8, Error> {
        if self.separator.is_ascii() {
            Ok(self.separator as u8)
        } else {
            Err(Error::Configuration(format!(
                "separator '{}' is not a single-byte character",
                self.separator
            )))
        }
    }

    /// Number of fields needed to hold every configured column.
    pub fn width(&self) -> usize {
        self.columns()
            .iter()
            .map(|(_, index)| index + 1)
            .max()
            .unwrap_or(0)
    }

    fn columns(&self) -> [(&'static str, usize); 5] {
        [
            ("time", self.time_column_index),
            ("volume", self.volume_column_index),
            ("price", self.price_column_index),
            ("fee", self.fee_column_index),
            ("buy_or_sell", self.buy_or_sell_column_index),
        ]
    }
}
