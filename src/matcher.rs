use std::cmp::Ordering;

use crate::ast::{CompareOp, KeyRef, Operand, Query};
use crate::cursor::{Cursor, Field, Number};

/// Evaluate a query against a tokenized line.
///
/// Total and side-effect-free: a pure recursive walk of the predicate
/// tree. A predicate whose field does not exist on the line is false.
/// `And`/`Or` short-circuit via Rust's own `&&`/`||`.
pub fn matches(query: &Query, cursor: &Cursor) -> bool {
    match query {
        Query::Not(child) => !matches(child, cursor),
        Query::And(left, right) => matches(left, cursor) && matches(right, cursor),
        Query::Or(left, right) => matches(left, cursor) || matches(right, cursor),
        Query::Compare { key, op, operand } => match resolve(key, cursor) {
            Some(field) => apply(*op, compare(field, operand, cursor)),
            None => false,
        },
        Query::Match { key, pattern } => match resolve(key, cursor) {
            Some(field) => pattern.is_match(cursor.value_bytes(field)),
            None => false,
        },
        Query::In { key, set } => match resolve(key, cursor) {
            Some(field) => set
                .iter()
                .any(|operand| compare(field, operand, cursor) == Ordering::Equal),
            None => false,
        },
    }
}

fn resolve<'a>(key: &KeyRef, cursor: &'a Cursor) -> Option<&'a Field> {
    match key {
        KeyRef::Name(name) => cursor.find(name.as_bytes()),
        KeyRef::Position(position) => cursor.get(*position),
    }
}

/// Order a field's value against an operand. Numeric on both sides
/// compares numerically (exact for integer/integer, f64 otherwise); a
/// String on either side degrades to byte ordering of the raw value text.
fn compare(field: &Field, operand: &Operand, cursor: &Cursor) -> Ordering {
    if let (Some(number), Some(rhs)) = (field.number, operand.as_number()) {
        if let (Number::Int(a), Operand::Int(b)) = (number, operand) {
            return a.cmp(b);
        }
        return number.as_f64().partial_cmp(&rhs).unwrap_or(Ordering::Equal);
    }

    cursor.value_bytes(field).cmp(operand.to_text().as_bytes())
}

fn apply(op: CompareOp, ordering: Ordering) -> bool {
    match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Ne => ordering != Ordering::Equal,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Le => ordering != Ordering::Greater,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Ge => ordering != Ordering::Less,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use crate::tokenizer::Tokenizer;

    fn query(source: &str) -> Query {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize().unwrap();
        Parser::new(tokens).parse().unwrap()
    }

    fn eval(source: &str, line: &[u8]) -> bool {
        let q = query(source);
        let mut cursor = Cursor::new();
        Tokenizer::new().tokenize(line, 1, &mut cursor).unwrap();
        matches(&q, &cursor)
    }

    #[test]
    fn test_string_equality() {
        assert!(eval("level=error", b"level=error msg=boom\n"));
        assert!(!eval("level=error", b"level=info msg=ok\n"));
    }

    #[test]
    fn test_missing_field_is_false() {
        assert!(!eval("level=error", b"msg=ok\n"));
        assert!(!eval("5=x", b"a b c\n"));
    }

    #[test]
    fn test_missing_field_negated() {
        assert!(eval("-level=error", b"msg=ok\n"));
    }

    #[test]
    fn test_integer_comparison() {
        assert!(eval("retries>=3", b"retries=3\n"));
        assert!(eval("retries>=3", b"retries=10\n"));
        assert!(!eval("retries>=3", b"retries=2\n"));
    }

    #[test]
    fn test_integer_comparison_is_numeric_not_lexicographic() {
        // "10" < "9" as bytes, but 10 > 9 as numbers
        assert!(eval("n>9", b"n=10\n"));
    }

    #[test]
    fn test_mixed_numeric_subtypes_coerce_to_float() {
        assert!(eval("x=2.0", b"x=2\n"));
        assert!(eval("x<2.5", b"x=2\n"));
        assert!(eval("x>1", b"x=1.5\n"));
    }

    #[test]
    fn test_string_field_compares_by_bytes() {
        // The field is String-typed, so the integer operand degrades to text
        assert!(eval("v=abc", b"v=abc\n"));
        assert!(eval("v<b", b"v=abc\n"));
        assert!(!eval("v<a", b"v=abc\n"));
    }

    #[test]
    fn test_numeric_field_string_operand_compares_by_bytes() {
        assert!(eval(r#"n="42""#, b"n=42\n"));
        assert!(!eval(r#"n="042""#, b"n=42\n"));
    }

    #[test]
    fn test_positional_reference() {
        assert!(eval("0=error", b"error at line 5\n"));
        assert!(eval("1=at", b"error at line 5\n"));
        assert!(eval("3>=5", b"error at line 5\n"));
    }

    #[test]
    fn test_positional_counts_key_value_fields() {
        // Position is order of appearance, keyed or not
        assert!(eval("1=2", b"a=1 b=2\n"));
    }

    #[test]
    fn test_regex_substring_semantics() {
        assert!(eval(r#"msg~"timeout""#, b"msg=\"connection timeout\"\n"));
        assert!(eval(r#"msg~"^conn""#, b"msg=\"connection timeout\"\n"));
        assert!(!eval(r#"msg~"^timeout""#, b"msg=\"connection timeout\"\n"));
    }

    #[test]
    fn test_regex_on_missing_field() {
        assert!(!eval(r#"msg~"x""#, b"level=error\n"));
    }

    #[test]
    fn test_in_membership() {
        assert!(eval("level in (warn, error)", b"level=error\n"));
        assert!(!eval("level in (warn, error)", b"level=info\n"));
    }

    #[test]
    fn test_in_numeric_membership() {
        assert!(eval("code in (404, 500)", b"code=404\n"));
        assert!(eval("code in (404, 500.0)", b"code=500\n"));
        assert!(!eval("code in (404, 500)", b"code=200\n"));
    }

    #[test]
    fn test_and_or_not() {
        let line = b"level=error retries=3\n";
        assert!(eval("level=error && retries>=3", line));
        assert!(!eval("level=error && retries>3", line));
        assert!(eval("level=info || retries>=3", line));
        assert!(!eval("level=info || retries>3", line));
        assert!(eval("-(level=info)", line));
    }

    #[test]
    fn test_short_circuit_and() {
        // The right side references a field position far past the table;
        // a false left side must decide without touching it.
        assert!(!eval("level=info && 999999=x", b"level=error\n"));
    }

    #[test]
    fn test_short_circuit_or() {
        assert!(eval("level=error || 999999=x", b"level=error\n"));
    }

    #[test]
    fn test_empty_line_all_predicates_false() {
        let mut cursor = Cursor::new();
        Tokenizer::new().tokenize(b"\n", 1, &mut cursor).unwrap();

        assert!(!matches(&query("level=error"), &cursor));
        assert!(!matches(&query("0=x"), &cursor));
        assert!(!matches(&query(r#"a~"b""#), &cursor));
        assert!(!matches(&query("a in (1)"), &cursor));
        // but a negated predicate is true
        assert!(matches(&query("-level=error"), &cursor));
    }

    #[test]
    fn test_log_filter_examples() {
        assert!(eval(
            r#"level=error && msg~"timeout""#,
            b"level=error msg=\"connection timeout\" retries=3\n"
        ));
        assert!(!eval("retries>=3", b"level=info msg=ok retries=2\n"));
    }
}
