use crate::foundation::error::{GrafelError, GrafelResult};

/// 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pos {
    pub(crate) line: usize,
    pub(crate) column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Int(u64),
    Float(f64),
    Str(String),
    /// `#` followed by an alphanumeric run; validated as a color by the parser.
    Hex(String),

    /// The `x` between the two components of a vector such as `100x-20`.
    Cross,
    Colon,
    Equals,
    Minus,
    Plus,
    LParen,
    RParen,
    Comma,

    Newline,
    Eof,
}

impl TokenKind {
    pub(crate) fn describe(&self) -> String {
        match self {
            TokenKind::Ident(s) => format!("'{s}'"),
            TokenKind::Int(n) => format!("number {n}"),
            TokenKind::Float(v) => format!("number {v}"),
            TokenKind::Str(s) => format!("string \"{s}\""),
            TokenKind::Hex(s) => format!("'{s}'"),
            TokenKind::Cross => "'x'".to_owned(),
            TokenKind::Colon => "':'".to_owned(),
            TokenKind::Equals => "'='".to_owned(),
            TokenKind::Minus => "'-'".to_owned(),
            TokenKind::Plus => "'+'".to_owned(),
            TokenKind::LParen => "'('".to_owned(),
            TokenKind::RParen => "')'".to_owned(),
            TokenKind::Comma => "','".to_owned(),
            TokenKind::Newline => "end of line".to_owned(),
            TokenKind::Eof => "end of script".to_owned(),
        }
    }
}

pub(crate) fn lex(input: &str) -> GrafelResult<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut out = Vec::new();
    let mut i = 0usize;
    let mut line = 1usize;
    let mut line_start = 0usize;

    while i < chars.len() {
        let c = chars[i];
        let pos = Pos {
            line,
            column: i - line_start + 1,
        };
        let err = |msg: String| GrafelError::parse(pos.line, pos.column, msg);

        if c == '\n' {
            out.push(Token {
                kind: TokenKind::Newline,
                pos,
            });
            i += 1;
            line += 1;
            line_start = i;
            continue;
        }
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // `//` comment to end of line
        if c == '/' && chars.get(i + 1) == Some(&'/') {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
            continue;
        }

        // Number: [0-9]+(.[0-9]+)? or .[0-9]+
        let starts_fraction = c == '.' && chars.get(i + 1).is_some_and(char::is_ascii_digit);
        if c.is_ascii_digit() || starts_fraction {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            let mut fractional = false;
            if i < chars.len()
                && chars[i] == '.'
                && chars.get(i + 1).is_some_and(char::is_ascii_digit)
            {
                fractional = true;
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }
            let s: String = chars[start..i].iter().collect();
            let kind = if fractional {
                TokenKind::Float(s.parse().map_err(|_| err(format!("invalid number '{s}'")))?)
            } else {
                TokenKind::Int(s.parse().map_err(|_| err(format!("number '{s}' is too large")))?)
            };
            out.push(Token { kind, pos });

            // `100x100`, `100x-20`
            if matches!(chars.get(i), Some('x' | 'X'))
                && chars
                    .get(i + 1)
                    .is_some_and(|n| n.is_ascii_digit() || *n == '-')
            {
                out.push(Token {
                    kind: TokenKind::Cross,
                    pos: Pos {
                        line,
                        column: i - line_start + 1,
                    },
                });
                i += 1;
            }
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            out.push(Token {
                kind: TokenKind::Ident(chars[start..i].iter().collect()),
                pos,
            });
            continue;
        }

        if c == '#' {
            let start = i;
            i += 1;
            while i < chars.len() && chars[i].is_ascii_alphanumeric() {
                i += 1;
            }
            out.push(Token {
                kind: TokenKind::Hex(chars[start..i].iter().collect()),
                pos,
            });
            continue;
        }

        if c == '"' || c == '\'' {
            let quote = c;
            let mut s = String::new();
            i += 1;
            loop {
                match chars.get(i) {
                    None | Some('\n') => return Err(err("unterminated string".to_owned())),
                    Some('\\') => {
                        match chars.get(i + 1) {
                            Some('n') => s.push('\n'),
                            Some(&e) if e == '\\' || e == quote => s.push(e),
                            _ => return Err(err("invalid escape in string".to_owned())),
                        }
                        i += 2;
                    }
                    Some(&ch) if ch == quote => {
                        i += 1;
                        break;
                    }
                    Some(&ch) => {
                        s.push(ch);
                        i += 1;
                    }
                }
            }
            out.push(Token {
                kind: TokenKind::Str(s),
                pos,
            });
            continue;
        }

        let kind = match c {
            ':' => TokenKind::Colon,
            '=' => TokenKind::Equals,
            '-' => TokenKind::Minus,
            '+' => TokenKind::Plus,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            _ => return Err(err(format!("unexpected character '{c}'"))),
        };
        i += 1;
        out.push(Token { kind, pos });
    }

    out.push(Token {
        kind: TokenKind::Eof,
        pos: Pos {
            line,
            column: chars.len() - line_start + 1,
        },
    });

    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/script/lexer.rs"]
mod tests;
