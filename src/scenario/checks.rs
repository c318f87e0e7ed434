use serde_json::Value;

/// Response view handed to checks: the status code plus the parsed JSON
/// body. An unparseable body is carried as `None`, which makes every
/// body-shape check fail instead of raising.
#[derive(Debug)]
pub struct CheckedResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl CheckedResponse {
    #[must_use]
    pub fn parse(status: u16, raw_body: &[u8]) -> Self {
        Self {
            status,
            body: serde_json::from_slice(raw_body).ok(),
        }
    }

    fn field(&self, pointer: &str) -> Option<&Value> {
        self.body.as_ref().and_then(|body| body.pointer(pointer))
    }
}

/// A named predicate over a response. Every declared check runs on every
/// outcome and is recorded individually; checks never short-circuit each
/// other.
pub trait Check: Send + Sync {
    fn name(&self) -> &str;
    fn evaluate(&self, response: &CheckedResponse) -> bool;
}

/// Passes when the status code matches exactly.
pub struct StatusIs {
    name: String,
    expected: u16,
}

impl StatusIs {
    #[must_use]
    pub fn new(expected: u16) -> Self {
        Self {
            name: format!("status is {}", expected),
            expected,
        }
    }
}

impl Check for StatusIs {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, response: &CheckedResponse) -> bool {
        response.status == self.expected
    }
}

/// Passes when the field at the JSON pointer is boolean `true`.
pub struct FlagIsTrue {
    name: String,
    pointer: String,
}

impl FlagIsTrue {
    #[must_use]
    pub fn new(name: &str, pointer: &str) -> Self {
        Self {
            name: name.to_owned(),
            pointer: pointer.to_owned(),
        }
    }
}

impl Check for FlagIsTrue {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, response: &CheckedResponse) -> bool {
        response
            .field(&self.pointer)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// Passes when the field at the JSON pointer is an array.
pub struct FieldIsArray {
    name: String,
    pointer: String,
}

impl FieldIsArray {
    #[must_use]
    pub fn new(name: &str, pointer: &str) -> Self {
        Self {
            name: name.to_owned(),
            pointer: pointer.to_owned(),
        }
    }
}

impl Check for FieldIsArray {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, response: &CheckedResponse) -> bool {
        response.field(&self.pointer).is_some_and(Value::is_array)
    }
}

/// Passes when the field at the JSON pointer is present and not null.
pub struct FieldPresent {
    name: String,
    pointer: String,
}

impl FieldPresent {
    #[must_use]
    pub fn new(name: &str, pointer: &str) -> Self {
        Self {
            name: name.to_owned(),
            pointer: pointer.to_owned(),
        }
    }
}

impl Check for FieldPresent {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, response: &CheckedResponse) -> bool {
        response
            .field(&self.pointer)
            .is_some_and(|value| !value.is_null())
    }
}

/// Passes when the field at the JSON pointer is an integer greater than
/// zero.
pub struct CountPositive {
    name: String,
    pointer: String,
}

impl CountPositive {
    #[must_use]
    pub fn new(name: &str, pointer: &str) -> Self {
        Self {
            name: name.to_owned(),
            pointer: pointer.to_owned(),
        }
    }
}

impl Check for CountPositive {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, response: &CheckedResponse) -> bool {
        response
            .field(&self.pointer)
            .and_then(Value::as_i64)
            .is_some_and(|count| count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(raw: &str) -> CheckedResponse {
        CheckedResponse::parse(200, raw.as_bytes())
    }

    #[test]
    fn status_check_matches_exact_code() {
        let check = StatusIs::new(201);
        assert!(check.evaluate(&CheckedResponse::parse(201, b"{}")));
        assert!(!check.evaluate(&CheckedResponse::parse(200, b"{}")));
        assert_eq!(check.name(), "status is 201");
    }

    #[test]
    fn flag_check_requires_true() {
        let check = FlagIsTrue::new("has success", "/success");
        assert!(check.evaluate(&response(r#"{"success": true}"#)));
        assert!(!check.evaluate(&response(r#"{"success": false}"#)));
        assert!(!check.evaluate(&response(r#"{"success": "yes"}"#)));
        assert!(!check.evaluate(&response(r#"{}"#)));
    }

    #[test]
    fn array_check_requires_array_type() {
        let check = FieldIsArray::new("has foods array", "/foods");
        assert!(check.evaluate(&response(r#"{"foods": []}"#)));
        assert!(check.evaluate(&response(r#"{"foods": [1, 2]}"#)));
        assert!(!check.evaluate(&response(r#"{"foods": {}}"#)));
        assert!(!check.evaluate(&response(r#"{"foods": null}"#)));
    }

    #[test]
    fn nested_pointer_reaches_template_days() {
        let check = FieldIsArray::new("has days array", "/template/days");
        assert!(check.evaluate(&response(r#"{"template": {"days": []}}"#)));
        assert!(!check.evaluate(&response(r#"{"template": null}"#)));
    }

    #[test]
    fn present_check_rejects_null_and_missing() {
        let check = FieldPresent::new("has template", "/template");
        assert!(check.evaluate(&response(r#"{"template": {}}"#)));
        assert!(!check.evaluate(&response(r#"{"template": null}"#)));
        assert!(!check.evaluate(&response(r#"{}"#)));
    }

    #[test]
    fn count_check_requires_positive_integer() {
        let check = CountPositive::new("items inserted", "/inserted_count");
        assert!(check.evaluate(&response(r#"{"inserted_count": 50}"#)));
        assert!(!check.evaluate(&response(r#"{"inserted_count": 0}"#)));
        assert!(!check.evaluate(&response(r#"{"inserted_count": "50"}"#)));
    }

    #[test]
    fn malformed_body_fails_checks_without_raising() {
        let broken = CheckedResponse::parse(200, b"not json at all");
        assert!(broken.body.is_none());
        assert!(!FlagIsTrue::new("has success", "/success").evaluate(&broken));
        assert!(!FieldIsArray::new("has categories", "/categories").evaluate(&broken));
        // Status-only checks still see the code.
        assert!(StatusIs::new(200).evaluate(&broken));
    }
}
