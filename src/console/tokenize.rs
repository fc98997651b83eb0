//! Shell-like splitting of a command line into tokens.
//!
//! Whitespace separates tokens. Single quotes keep their content literally;
//! double quotes allow `\"` and `\\` escapes. Quotes may start mid-token, so
//! `name="New York"` is the single token `name=New York`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("No closing quotation")]
    UnclosedQuote,

    #[error("No escaped character")]
    TrailingEscape,
}

pub fn tokenize(line: &str) -> Result<Vec<String>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(TokenizeError::UnclosedQuote),
                    }
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\')) => current.push(c),
                            Some(c) => {
                                current.push('\\');
                                current.push(c);
                            }
                            None => return Err(TokenizeError::UnclosedQuote),
                        },
                        Some(c) => current.push(c),
                        None => return Err(TokenizeError::UnclosedQuote),
                    }
                }
            }
            '\\' => {
                in_token = true;
                match chars.next() {
                    Some(c) => current.push(c),
                    None => return Err(TokenizeError::TrailingEscape),
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }

    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_whitespace() {
        assert_eq!(
            tokenize("  show  User\t1234 ").unwrap(),
            vec!["show", "User", "1234"]
        );
    }

    #[test]
    fn test_empty_line_has_no_tokens() {
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn test_double_quotes_group_words() {
        assert_eq!(
            tokenize(r#"update User 1 first_name "John Smith""#).unwrap(),
            vec!["update", "User", "1", "first_name", "John Smith"]
        );
    }

    #[test]
    fn test_single_quotes_are_literal() {
        assert_eq!(tokenize(r#"'a \"b'"#).unwrap(), vec![r#"a \"b"#]);
    }

    #[test]
    fn test_escaped_quote_inside_double_quotes() {
        assert_eq!(tokenize(r#""say \"hi\"""#).unwrap(), vec![r#"say "hi""#]);
    }

    #[test]
    fn test_quotes_join_adjacent_text() {
        assert_eq!(tokenize(r#"name="New York""#).unwrap(), vec!["name=New York"]);
    }

    #[test]
    fn test_empty_quotes_are_a_token() {
        assert_eq!(tokenize(r#"a "" b"#).unwrap(), vec!["a", "", "b"]);
    }

    #[test]
    fn test_unclosed_quote() {
        assert_eq!(tokenize(r#"update "John"#), Err(TokenizeError::UnclosedQuote));
    }

    #[test]
    fn test_trailing_escape() {
        assert_eq!(tokenize("abc\\"), Err(TokenizeError::TrailingEscape));
    }
}
