//! Row layout: the ordered field-to-series mapping
//!
//! hstress rows have a fixed positional layout: the timestamp, four
//! connection-outcome counts, two HTTP-outcome counts, then one count per
//! latency bucket. The bucket tail varies with configuration, so the full
//! mapping is resolved once from the bucket schema before parsing begins and
//! passed into the series builder as an immutable parameter.

use crate::bucket::BucketSchema;

/// The connection-outcome field names, in row order.
pub const CONNECTION_FIELDS: [&str; 4] =
    ["conn_success", "conn_error", "conn_timeout", "conn_close"];

/// The HTTP-outcome field names, in row order.
pub const HTTP_FIELDS: [&str; 2] = ["http_success", "http_error"];

/// The name of the timestamp series.
pub const TIME_FIELD: &str = "time";

/// The stacking group a field belongs to.
///
/// Each group keeps an independent running cumulative total, reset at the
/// start of every row. `Time` is not stacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// The Unix timestamp column.
    Time,
    /// A connection-outcome count.
    Connection,
    /// An HTTP-outcome count.
    Http,
    /// A latency-bucket count.
    Bucket,
}

/// One positional field of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Series name this field feeds.
    pub name: String,
    /// Stacking group membership.
    pub kind: FieldKind,
}

/// The complete ordered field list for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLayout {
    fields: Vec<Field>,
}

impl RowLayout {
    /// Build the layout from the fixed prefix fields plus the bucket schema.
    #[must_use]
    pub fn new(schema: &BucketSchema) -> Self {
        let mut fields = Vec::with_capacity(1 + CONNECTION_FIELDS.len() + HTTP_FIELDS.len() + schema.len());
        fields.push(Field {
            name: TIME_FIELD.to_string(),
            kind: FieldKind::Time,
        });
        for name in CONNECTION_FIELDS {
            fields.push(Field {
                name: name.to_string(),
                kind: FieldKind::Connection,
            });
        }
        for name in HTTP_FIELDS {
            fields.push(Field {
                name: name.to_string(),
                kind: FieldKind::Http,
            });
        }
        for name in schema.names() {
            fields.push(Field {
                name: name.clone(),
                kind: FieldKind::Bucket,
            });
        }
        Self { fields }
    }

    /// The ordered fields. The first is always the timestamp.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of values a row must supply.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}
