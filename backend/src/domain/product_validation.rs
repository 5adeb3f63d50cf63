//! Validation and sanitisation of product payloads.
//!
//! Validation runs against the raw input and reports every violation at
//! once; nothing is sanitised unless the whole payload is valid. Length
//! limits count characters of the trimmed value, before escaping.

use serde::Deserialize;
use serde_json::Value;

use super::{Field, NewProduct, ProductChanges};

/// Maximum length of `name` and `supplier_name`.
pub const NAME_MAX_CHARS: usize = 255;
/// Maximum length of `unit`.
pub const UNIT_MAX_CHARS: usize = 50;

/// Whether a payload creates a product or patches an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Create,
    Update,
}

/// Raw stock value as supplied by a client.
///
/// Clients send integers, floats, or numeric strings; anything else is kept
/// so validation can reject it with a field-level message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StockValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(Value),
}

impl StockValue {
    /// Coerce to a stock count, or `None` if not a non-negative integer that
    /// fits the column.
    pub fn to_stock(&self) -> Option<i32> {
        match self {
            Self::Integer(value) => i32::try_from(*value).ok().filter(|v| *v >= 0),
            Self::Float(value) => float_to_stock(*value),
            Self::Text(text) => {
                let trimmed = text.trim();
                if let Ok(value) = trimmed.parse::<i64>() {
                    return Self::Integer(value).to_stock();
                }
                trimmed.parse::<f64>().ok().and_then(float_to_stock)
            }
            Self::Other(_) => None,
        }
    }
}

fn float_to_stock(value: f64) -> Option<i32> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if value < 0.0 || value > f64::from(i32::MAX) {
        return None;
    }
    // Integral and within range, so the cast is exact.
    Some(value as i32)
}

/// Raw text value as supplied by a client.
///
/// Non-string JSON is kept so validation can name the offending field
/// rather than rejecting the whole body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    Text(String),
    Other(Value),
}

impl TextValue {
    /// The string value, or `None` for non-string JSON.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Other(_) => None,
        }
    }
}

impl From<&str> for TextValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

/// A product payload as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductInput {
    #[serde(default)]
    pub name: Field<TextValue>,
    #[serde(default)]
    pub picture: Field<TextValue>,
    #[serde(default)]
    pub supplier_name: Field<TextValue>,
    #[serde(default)]
    pub unit: Field<TextValue>,
    #[serde(default)]
    pub stock: Field<StockValue>,
    #[serde(default)]
    pub specification: Field<TextValue>,
}

/// Every rule a payload broke.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: {}", errors.join("; "))]
pub struct ProductValidationError {
    pub errors: Vec<String>,
}

impl ProductInput {
    /// Collect human-readable violations; an empty list means valid.
    pub fn validate(&self, mode: ValidationMode) -> Vec<String> {
        let mut errors = Vec::new();
        let create = mode == ValidationMode::Create;

        match &self.name {
            Field::Absent if !create => {}
            Field::Present(TextValue::Other(_)) => errors.push(not_text("name")),
            Field::Present(TextValue::Text(name)) if !name.trim().is_empty() => {
                if exceeds(name, NAME_MAX_CHARS) {
                    errors.push(format!("name must be at most {NAME_MAX_CHARS} characters"));
                }
            }
            _ => errors.push("name is required".to_owned()),
        }

        match &self.stock {
            Field::Absent if !create => {}
            Field::Absent | Field::Null => errors.push("stock is required".to_owned()),
            Field::Present(stock) => {
                if stock.to_stock().is_none() {
                    errors.push("stock must be a non-negative integer".to_owned());
                }
            }
        }

        check_optional_text(
            &self.supplier_name,
            "supplier_name",
            Some(NAME_MAX_CHARS),
            &mut errors,
        );
        check_optional_text(&self.unit, "unit", Some(UNIT_MAX_CHARS), &mut errors);
        check_optional_text(&self.picture, "picture", None, &mut errors);
        check_optional_text(&self.specification, "specification", None, &mut errors);

        errors
    }

    /// Validate for creation and produce the sanitised insert.
    pub fn into_new_product(self) -> Result<NewProduct, ProductValidationError> {
        self.check(ValidationMode::Create)?;
        let changes = self.sanitise();
        Ok(NewProduct {
            name: changes.name.unwrap_or_default(),
            picture: into_option(changes.picture),
            supplier_name: into_option(changes.supplier_name),
            unit: into_option(changes.unit),
            stock: changes.stock.unwrap_or_default(),
            specification: into_option(changes.specification),
        })
    }

    /// Validate as a partial update and produce the sanitised changes.
    ///
    /// The result may be empty; callers decide how to treat that.
    pub fn into_changes(self) -> Result<ProductChanges, ProductValidationError> {
        self.check(ValidationMode::Update)?;
        Ok(self.sanitise())
    }

    fn check(&self, mode: ValidationMode) -> Result<(), ProductValidationError> {
        let errors = self.validate(mode);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProductValidationError { errors })
        }
    }

    fn sanitise(self) -> ProductChanges {
        ProductChanges {
            name: self.name.as_present().and_then(TextValue::as_text).map(clean),
            picture: clean_optional(self.picture),
            supplier_name: clean_optional(self.supplier_name),
            unit: clean_optional(self.unit),
            stock: self.stock.as_present().and_then(StockValue::to_stock),
            specification: clean_optional(self.specification),
        }
    }
}

fn not_text(label: &str) -> String {
    format!("{label} must be text")
}

fn check_optional_text(
    field: &Field<TextValue>,
    label: &str,
    max_chars: Option<usize>,
    errors: &mut Vec<String>,
) {
    match field.as_present() {
        Some(TextValue::Other(_)) => errors.push(not_text(label)),
        Some(TextValue::Text(value)) => {
            if let Some(max) = max_chars.filter(|max| exceeds(value, *max)) {
                errors.push(format!("{label} must be at most {max} characters"));
            }
        }
        None => {}
    }
}

fn exceeds(value: &str, max: usize) -> bool {
    value.trim().chars().count() > max
}

fn clean(value: &str) -> String {
    escape_html(value.trim())
}

fn clean_optional(field: Field<TextValue>) -> Field<String> {
    match field {
        Field::Absent => Field::Absent,
        Field::Present(TextValue::Text(value)) if !value.trim().is_empty() => {
            Field::Present(clean(&value))
        }
        Field::Null | Field::Present(_) => Field::Null,
    }
}

fn into_option(field: Field<String>) -> Option<String> {
    match field {
        Field::Present(value) => Some(value),
        Field::Absent | Field::Null => None,
    }
}

/// Replace characters with meaning in HTML or script contexts by entities.
///
/// # Examples
/// ```
/// use product_service::domain::escape_html;
///
/// assert_eq!(escape_html("<b>&</b>"), "&lt;b&gt;&amp;&lt;&#x2F;b&gt;");
/// ```
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn input(value: Value) -> ProductInput {
        serde_json::from_value(value).expect("payload deserialises")
    }

    #[test]
    fn create_requires_name_and_stock() {
        let errors = input(json!({})).validate(ValidationMode::Create);
        assert_eq!(errors, vec!["name is required", "stock is required"]);
    }

    #[test]
    fn update_accepts_empty_payload() {
        assert!(input(json!({})).validate(ValidationMode::Update).is_empty());
    }

    #[rstest]
    #[case(json!({ "name": null }))]
    #[case(json!({ "name": "   " }))]
    fn update_rejects_cleared_name(#[case] payload: Value) {
        let errors = input(payload).validate(ValidationMode::Update);
        assert_eq!(errors, vec!["name is required"]);
    }

    #[test]
    fn update_rejects_null_stock() {
        let errors = input(json!({ "stock": null })).validate(ValidationMode::Update);
        assert_eq!(errors, vec!["stock is required"]);
    }

    #[rstest]
    #[case(json!(-1))]
    #[case(json!(2.5))]
    #[case(json!("abc"))]
    #[case(json!(true))]
    #[case(json!(3_000_000_000_i64))]
    fn rejects_bad_stock(#[case] stock: Value) {
        let errors = input(json!({ "name": "Widget", "stock": stock }))
            .validate(ValidationMode::Create);
        assert_eq!(errors, vec!["stock must be a non-negative integer"]);
    }

    #[rstest]
    #[case(json!(0), 0)]
    #[case(json!(5), 5)]
    #[case(json!(7.0), 7)]
    #[case(json!(" 12 "), 12)]
    #[case(json!("4.0"), 4)]
    fn coerces_numeric_stock(#[case] stock: Value, #[case] expected: i32) {
        let product = input(json!({ "name": "Widget", "stock": stock }))
            .into_new_product()
            .expect("valid payload");
        assert_eq!(product.stock, expected);
    }

    #[test]
    fn length_limits_count_trimmed_characters() {
        let name = "é".repeat(NAME_MAX_CHARS);
        let padded = format!("  {name}  ");
        let errors = input(json!({
            "name": padded,
            "stock": 1,
            "supplier_name": "s".repeat(NAME_MAX_CHARS + 1),
            "unit": "u".repeat(UNIT_MAX_CHARS + 1),
        }))
        .validate(ValidationMode::Create);
        assert_eq!(
            errors,
            vec![
                "supplier_name must be at most 255 characters",
                "unit must be at most 50 characters",
            ]
        );
    }

    #[test]
    fn over_long_name_is_reported() {
        let errors = input(json!({ "name": "n".repeat(NAME_MAX_CHARS + 1), "stock": 1 }))
            .validate(ValidationMode::Create);
        assert_eq!(errors, vec!["name must be at most 255 characters"]);
    }

    #[test]
    fn sanitises_new_product() {
        let product = input(json!({
            "name": "  <Widget>  ",
            "picture": " https://cdn.example/w.png ",
            "supplier_name": "   ",
            "unit": null,
            "stock": "5",
            "specification": "Tom's \"best\"",
        }))
        .into_new_product()
        .expect("valid payload");

        assert_eq!(product.name, "&lt;Widget&gt;");
        assert_eq!(
            product.picture.as_deref(),
            Some("https:&#x2F;&#x2F;cdn.example&#x2F;w.png")
        );
        assert_eq!(product.supplier_name, None);
        assert_eq!(product.unit, None);
        assert_eq!(product.stock, 5);
        assert_eq!(
            product.specification.as_deref(),
            Some("Tom&#x27;s &quot;best&quot;")
        );
    }

    #[test]
    fn changes_keep_absent_fields_out() {
        let changes = input(json!({ "stock": 3, "unit": "" }))
            .into_changes()
            .expect("valid patch");
        assert_eq!(changes.stock, Some(3));
        assert_eq!(changes.unit, Field::Null);
        assert!(changes.name.is_none());
        assert!(changes.picture.is_absent());
        assert!(changes.specification.is_absent());
    }

    #[test]
    fn invalid_payload_yields_every_error() {
        let err = input(json!({ "name": "", "stock": -4 }))
            .into_new_product()
            .expect_err("invalid payload");
        assert_eq!(err.errors.len(), 2);
    }

    #[rstest]
    #[case(json!({ "name": 5, "stock": 1 }), vec!["name must be text"])]
    #[case(
        json!({ "name": ["Widget"], "stock": -1, "unit": { "kg": true } }),
        vec![
            "name must be text",
            "stock must be a non-negative integer",
            "unit must be text",
        ]
    )]
    #[case(
        json!({ "name": "Widget", "stock": 1, "picture": false, "specification": 12 }),
        vec!["picture must be text", "specification must be text"]
    )]
    fn non_string_text_fields_are_listed(#[case] payload: Value, #[case] expected: Vec<&str>) {
        let errors = input(payload).validate(ValidationMode::Create);
        assert_eq!(errors, expected);
    }

    #[test]
    fn update_reports_non_string_supplier() {
        let errors = input(json!({ "supplier_name": 42 })).validate(ValidationMode::Update);
        assert_eq!(errors, vec!["supplier_name must be text"]);
    }

    #[test]
    fn escape_covers_backslash_and_backtick() {
        assert_eq!(escape_html(r"a\`b"), "a&#x5C;&#96;b");
    }
}
