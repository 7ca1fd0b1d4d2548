use super::SizePair;
use crate::error::ParseError;
use lazy_static::lazy_static;
use regex::Regex;

// "------------------- ----- ------------ ------------  ------------"
// "2005-09-26 15:50:11 ....A      5203223      4146400  name..."
lazy_static! {
    static ref SEPARATOR_ROW: Regex = Regex::new(r"-+(\s+-+)+").unwrap();
}

const ORIGINAL_SIZE_FIELD: usize = 3;
const COMPRESSED_SIZE_FIELD: usize = 4;

/// Reads original and compressed sizes from a 7-Zip style listing.
///
/// The first row after the first dash separator is the data row; its 4th
/// and 5th whitespace-delimited fields are the sizes in bytes. A zero
/// original size needs no compressed field.
pub fn parse_listing(output: &str) -> Result<SizePair, ParseError> {
    let mut lines = output.lines();

    if !lines.by_ref().any(|line| SEPARATOR_ROW.is_match(line)) {
        return Err(ParseError::MissingSeparator);
    }

    let row = lines.next().ok_or(ParseError::MissingDataRow)?;
    let fields: Vec<&str> = row.split_whitespace().collect();

    let original = size_field(&fields, ORIGINAL_SIZE_FIELD, row)?;
    // 7-Zip leaves the compressed column blank for empty files.
    if original == 0 {
        return Ok(SizePair {
            original: 0,
            compressed: 0,
        });
    }

    Ok(SizePair {
        original,
        compressed: size_field(&fields, COMPRESSED_SIZE_FIELD, row)?,
    })
}

fn size_field(fields: &[&str], index: usize, row: &str) -> Result<u64, ParseError> {
    let value = fields.get(index).ok_or_else(|| ParseError::MissingField {
        index: index + 1,
        row: row.to_string(),
    })?;
    value.parse().map_err(|_| ParseError::InvalidNumber {
        index: index + 1,
        value: value.to_string(),
    })
}
