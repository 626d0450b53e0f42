use pulldown_cmark::{html, Parser};
use thiserror::Error;

// Checked unsigned arithmetic for the demo surface. Overflow and division by
// zero are distinct conditions, not one generic failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputeError {
    #[error("integer overflow in {0}")]
    Overflow(&'static str),
    #[error("division by zero")]
    DivisionByZero,
}

pub fn add(a: u64, b: u64) -> Result<u64, ComputeError> {
    a.checked_add(b).ok_or(ComputeError::Overflow("add"))
}

pub fn sub(a: u64, b: u64) -> Result<u64, ComputeError> {
    a.checked_sub(b).ok_or(ComputeError::Overflow("sub"))
}

pub fn div(a: u64, b: u64) -> Result<u64, ComputeError> {
    if b == 0 {
        return Err(ComputeError::DivisionByZero);
    }
    Ok(a / b)
}

pub fn equal(a: u64, b: u64) -> bool {
    a == b
}

pub fn parse_markdown(text: &str) -> String {
    let parser = Parser::new(text);
    let mut output = String::new();
    html::push_html(&mut output, parser);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_arithmetic() {
        assert_eq!(add(2, 3), Ok(5));
        assert_eq!(sub(10, 4), Ok(6));
        assert_eq!(div(20, 5), Ok(4));
        assert!(equal(5, 5));
        assert!(!equal(5, 6));
    }

    #[test]
    fn test_overflow_and_zero_division_are_distinct() {
        let overflow = add(u64::MAX, 1).unwrap_err();
        let zero_div = div(10, 0).unwrap_err();

        assert_eq!(overflow, ComputeError::Overflow("add"));
        assert_eq!(zero_div, ComputeError::DivisionByZero);
        assert_ne!(overflow.to_string(), zero_div.to_string());
    }

    #[test]
    fn test_sub_underflow_fails() {
        assert_eq!(sub(4, 10), Err(ComputeError::Overflow("sub")));
    }

    #[test]
    fn test_markdown_renders_to_html() {
        let html = parse_markdown("# Hello\nThis is **Markdown**.");
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<strong>Markdown</strong>"));
    }
}
