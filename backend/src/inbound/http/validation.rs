//! Validation helpers turning raw request fields into domain values.
//!
//! Every failure becomes `invalid_request` with structured details:
//! `{ field, index?, value?, code }`.

use std::collections::HashSet;

use serde_json::{Value, json};

use crate::domain::{
    Coordinate, Error, MarkerId, MarkerValidationError, RangeMeters, TransportMode,
};

/// Validation error codes reported in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    EmptyList,
    InvalidCoordinate,
    NonPositiveRange,
    RangeTooLarge,
    UnknownTransport,
    EmptyMarkerId,
    DuplicateMarkerId,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::EmptyList => "empty_list",
            Self::InvalidCoordinate => "invalid_coordinate",
            Self::NonPositiveRange => "non_positive_range",
            Self::RangeTooLarge => "range_too_large",
            Self::UnknownTransport => "unknown_transport",
            Self::EmptyMarkerId => "empty_marker_id",
            Self::DuplicateMarkerId => "duplicate_marker_id",
        }
    }
}

/// Newtype for request field paths such as `range` or `markers.location`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

struct ValidationError {
    field: FieldName,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn with_code(self, code: ValidationCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field.as_str(),
            "code": code.as_str(),
        }))
    }

    fn with_index(self, code: ValidationCode, index: usize, value: impl Into<Value>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field.as_str(),
            "index": index,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

fn empty_list_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} must contain at least one entry"))
        .with_code(ValidationCode::EmptyList)
}

pub(crate) fn parse_coordinate(
    [lon, lat]: [f64; 2],
    field: FieldName,
    index: usize,
) -> Result<Coordinate, Error> {
    Coordinate::wgs84(lon, lat).map_err(|err| {
        ValidationError::new(field, format!("{}: {err}", field.as_str())).with_index(
            ValidationCode::InvalidCoordinate,
            index,
            json!([lon, lat]),
        )
    })
}

pub(crate) fn parse_locations(
    values: Vec<[f64; 2]>,
    field: FieldName,
) -> Result<Vec<Coordinate>, Error> {
    if values.is_empty() {
        return Err(empty_list_error(field));
    }
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| parse_coordinate(value, field, index))
        .collect()
}

pub(crate) fn parse_range(
    value: f64,
    field: FieldName,
    index: usize,
) -> Result<RangeMeters, Error> {
    RangeMeters::new(value).map_err(|err| {
        let code = match err {
            MarkerValidationError::RangeTooLarge { .. } => ValidationCode::RangeTooLarge,
            _ => ValidationCode::NonPositiveRange,
        };
        ValidationError::new(field, format!("{}: {err}", field.as_str()))
            .with_index(code, index, value)
    })
}

pub(crate) fn parse_ranges(values: Vec<f64>, field: FieldName) -> Result<Vec<RangeMeters>, Error> {
    if values.is_empty() {
        return Err(empty_list_error(field));
    }
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| parse_range(value, field, index))
        .collect()
}

pub(crate) fn parse_transport(
    value: &str,
    field: FieldName,
    index: usize,
) -> Result<TransportMode, Error> {
    value.parse().map_err(|err| {
        ValidationError::new(field, format!("{err}")).with_index(
            ValidationCode::UnknownTransport,
            index,
            value,
        )
    })
}

pub(crate) fn parse_marker_id(
    value: String,
    field: FieldName,
    index: usize,
) -> Result<MarkerId, Error> {
    MarkerId::new(value.clone()).map_err(|err| {
        ValidationError::new(field, err.to_string()).with_index(
            ValidationCode::EmptyMarkerId,
            index,
            value,
        )
    })
}

/// Reject the first identifier that repeats an earlier one.
pub(crate) fn ensure_unique_ids<'a>(
    ids: impl IntoIterator<Item = &'a MarkerId>,
    field: FieldName,
) -> Result<(), Error> {
    let mut seen = HashSet::new();
    for (index, id) in ids.into_iter().enumerate() {
        if !seen.insert(id) {
            return Err(ValidationError::new(field, format!("duplicate marker id: {id}"))
                .with_index(ValidationCode::DuplicateMarkerId, index, id.as_str()));
        }
    }
    Ok(())
}
