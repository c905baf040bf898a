use regex::Regex;
use tracing::debug;

/// A field value extracted from an input record for constraint checking.
/// Absent values are distinguished from empty ones so presence and shape
/// rules compose independently.
#[derive(Debug)]
pub(crate) enum FieldValue {
    Text(Option<String>),
    Integer(Option<i64>),
}

/// One declarative constraint applied to a field value.
///
/// Shape rules (`Length`, `Range`, `Pattern`) are skipped for absent values;
/// only `Required` asserts presence. `Pattern` is also skipped for empty
/// text. Re-evaluation of an accepted record therefore always passes.
#[derive(Debug)]
pub(crate) enum Rule {
    Required,
    Length { min: usize, max: usize },
    Range { min: i64, max: i64 },
    Pattern(Regex),
}

impl Rule {
    pub(crate) fn pattern(pattern: &str) -> Self {
        Rule::Pattern(Regex::new(pattern).expect("constraint pattern compiles"))
    }

    fn holds(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Rule::Required, FieldValue::Text(text)) => {
                text.as_deref().is_some_and(|text| !text.is_empty())
            }
            (Rule::Required, FieldValue::Integer(number)) => number.is_some(),
            (Rule::Length { min, max }, FieldValue::Text(text)) => match text {
                Some(text) => {
                    let count = text.chars().count();
                    count >= *min && count <= *max
                }
                None => true,
            },
            (Rule::Range { min, max }, FieldValue::Integer(number)) => {
                number.is_none_or(|number| number >= *min && number <= *max)
            }
            (Rule::Pattern(regex), FieldValue::Text(text)) => match text.as_deref() {
                Some(text) if !text.is_empty() => regex.is_match(text),
                _ => true,
            },
            // Shape rules for the other value kind never constrain anything.
            (Rule::Length { .. }, FieldValue::Integer(_))
            | (Rule::Range { .. }, FieldValue::Text(_))
            | (Rule::Pattern(_), FieldValue::Integer(_)) => true,
        }
    }
}

struct FieldConstraint<T> {
    name: &'static str,
    access: fn(&T) -> FieldValue,
    rules: Vec<Rule>,
}

/// Constraint set declared once per record shape and reused for every
/// instance of that shape. Evaluation is pure: pass/fail with no partial
/// outcome and no side effects on the record.
pub(crate) struct ConstraintSet<T> {
    fields: Vec<FieldConstraint<T>>,
}

impl<T> ConstraintSet<T> {
    pub(crate) fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub(crate) fn field(
        mut self,
        name: &'static str,
        access: fn(&T) -> FieldValue,
        rules: Vec<Rule>,
    ) -> Self {
        self.fields.push(FieldConstraint { name, access, rules });
        self
    }

    /// Whole-record verdict; an invalid record is rejected outright.
    pub(crate) fn is_valid(&self, record: &T) -> bool {
        for field in &self.fields {
            let value = (field.access)(record);
            if field.rules.iter().any(|rule| !rule.holds(&value)) {
                debug!(field = field.name, "constraint violated");
                return false;
            }
        }
        true
    }
}
