use std::str::FromStr;

use lane_defence_core::{CellCoord, TowerKind};
use thiserror::Error;

/// Delimiter separating the row, column and optional kind.
const FIELD_DELIMITER: char = ',';

/// Tower placement requested on the command line as `row,column[,kind]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PlacementArg {
    /// Cell the tower should occupy.
    pub(crate) cell: CellCoord,
    /// Kind to place; the current selection is used when omitted.
    pub(crate) kind: Option<TowerKind>,
}

impl FromStr for PlacementArg {
    type Err = PlacementArgError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(PlacementArgError::Empty);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER).map(str::trim);
        let row = parse_index(parts.next(), "row")?;
        let column = parse_index(parts.next(), "column")?;
        let kind = parts.next().map(parse_kind).transpose()?;
        if let Some(extra) = parts.next() {
            return Err(PlacementArgError::TrailingField(extra.to_owned()));
        }

        Ok(Self {
            cell: CellCoord::new(row, column),
            kind,
        })
    }
}

fn parse_index(field: Option<&str>, name: &'static str) -> Result<u32, PlacementArgError> {
    let field = field.ok_or(PlacementArgError::MissingField(name))?;
    field
        .parse()
        .map_err(|_| PlacementArgError::InvalidIndex {
            field: name,
            value: field.to_owned(),
        })
}

fn parse_kind(value: &str) -> Result<TowerKind, PlacementArgError> {
    match value.to_ascii_lowercase().as_str() {
        "basic" => Ok(TowerKind::Basic),
        "heavy" => Ok(TowerKind::Heavy),
        "seeker" => Ok(TowerKind::Seeker),
        _ => Err(PlacementArgError::UnknownKind(value.to_owned())),
    }
}

/// Errors that can occur while parsing a placement argument.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum PlacementArgError {
    /// The argument was empty.
    #[error("placement is empty")]
    Empty,
    /// A required field was missing.
    #[error("placement is missing its {0}")]
    MissingField(&'static str),
    /// A row or column was not a non-negative integer.
    #[error("placement {field} `{value}` is not a non-negative integer")]
    InvalidIndex {
        /// Field that failed to parse.
        field: &'static str,
        /// Offending text.
        value: String,
    },
    /// The tower kind was not recognised.
    #[error("unknown tower kind `{0}`; expected basic, heavy or seeker")]
    UnknownKind(String),
    /// More than three fields were supplied.
    #[error("unexpected trailing field `{0}`")]
    TrailingField(String),
}
