//! Request validation helpers shared by the handlers.
//!
//! Every failure becomes an `invalid_request` [`Error`] whose details name
//! the offending field and a machine-readable code.

use std::fmt;
use std::str::FromStr;

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, web};
use serde_json::json;
use tracing::debug;

use crate::domain::{
    CommentTextError, Error, ProjectNameError, TagNameError, TodoTitleError,
};

/// Payload field name used in error details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// `invalid_request` error pointing at `field`.
pub(crate) fn field_error(field: FieldName, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code,
    }))
}

pub(crate) fn missing_field(field: FieldName) -> Error {
    field_error(field, "missing_field", format!("{field} is required"))
}

/// Value supplied for a required field.
pub(crate) fn required<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field(field))
}

/// Parse a comma separated identifier list such as `1,2,3`.
///
/// Blank segments are skipped; anything else that is not an integer is
/// reported with its position.
pub(crate) fn parse_id_list<T: FromStr>(raw: &str, field: FieldName) -> Result<Vec<T>, Error> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .enumerate()
        .map(|(index, segment)| {
            segment.parse().map_err(|_| {
                Error::invalid_request(format!("{field} must be a comma separated list of ids"))
                    .with_details(json!({
                        "field": field.as_str(),
                        "index": index,
                        "value": segment,
                        "code": "invalid_id",
                    }))
            })
        })
        .collect()
}

fn length_code(too_long: bool) -> &'static str {
    if too_long { "too_long" } else { "blank" }
}

pub(crate) fn project_name_error(error: &ProjectNameError) -> Error {
    let too_long = matches!(error, ProjectNameError::TooLong { .. });
    field_error(FieldName::new("name"), length_code(too_long), error.to_string())
}

pub(crate) fn tag_name_error(error: &TagNameError) -> Error {
    let too_long = matches!(error, TagNameError::TooLong { .. });
    field_error(FieldName::new("name"), length_code(too_long), error.to_string())
}

pub(crate) fn todo_title_error(error: &TodoTitleError) -> Error {
    let too_long = matches!(error, TodoTitleError::TooLong { .. });
    field_error(FieldName::new("title"), length_code(too_long), error.to_string())
}

pub(crate) fn comment_text_error(error: &CommentTextError) -> Error {
    field_error(FieldName::new("text"), "blank", error.to_string())
}

/// JSON extractor configuration reporting body errors in the domain shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error)
}

fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = %req.path(), error = %err, "rejected request body");
    let error = match &err {
        JsonPayloadError::Deserialize(inner) => {
            Error::invalid_request("request body does not match the expected shape").with_details(
                json!({
                    "code": "invalid_body",
                    "reason": inner.to_string(),
                }),
            )
        }
        JsonPayloadError::ContentType => {
            Error::invalid_request("request body must be application/json")
                .with_details(json!({"code": "invalid_content_type"}))
        }
        _ => Error::invalid_request("request body could not be read")
            .with_details(json!({"code": "invalid_body"})),
    };
    error.into()
}

/// Query string extractor settings mapping parse failures to `invalid_request`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error)
}

fn query_error(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = %req.path(), error = %err, "rejected query string");
    Error::invalid_request("query string does not match the expected shape")
        .with_details(json!({
            "code": "invalid_query",
            "reason": err.to_string(),
        }))
        .into()
}
