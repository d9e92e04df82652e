use crate::action::registry::ActionArg;
use crate::foundation::color::Color;
use crate::foundation::core::{Interval, Vector};
use crate::foundation::error::{GrafelError, GrafelResult};
use crate::script::lexer::{Pos, Token, TokenKind, lex};
use crate::script::model::{ActionLine, Attr, CastLine, Role, Script};

/// Parse a whole script: a `Cast:` section followed by an `Actions:` section. Every cast line and
/// action line sits on its own line.
pub(crate) fn parse_script(src: &str) -> GrafelResult<Script> {
    let tokens = lex(src)?;
    let mut p = Parser { tokens, pos: 0 };

    let mut script = Script::default();
    p.skip_newlines();
    p.section("Cast")?;
    loop {
        p.skip_newlines();
        if p.at_section("Actions") {
            break;
        }
        if p.peek().kind == TokenKind::Eof {
            return Err(p.error_here("missing 'Actions:' section"));
        }
        script.cast.push(p.cast_line()?);
    }

    p.section("Actions")?;
    loop {
        p.skip_newlines();
        if p.peek().kind == TokenKind::Eof {
            break;
        }
        script.actions.push(p.action_line()?);
    }
    Ok(script)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_at(&self, ahead: usize) -> &TokenKind {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + ahead).min(last)].kind
    }

    fn bump(&mut self) -> Token {
        let t = self.peek().clone();
        if t.kind != TokenKind::Eof {
            self.pos += 1;
        }
        t
    }

    fn error_at(pos: Pos, message: impl Into<String>) -> GrafelError {
        GrafelError::parse(pos.line, pos.column, message)
    }

    fn error_here(&self, message: impl Into<String>) -> GrafelError {
        Self::error_at(self.peek().pos, message)
    }

    fn unexpected(&self, expected: &str) -> GrafelError {
        self.error_here(format!(
            "expected {expected}, found {}",
            self.peek().kind.describe()
        ))
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> GrafelResult<()> {
        if self.peek().kind == kind {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn skip_newlines(&mut self) {
        while self.consume(TokenKind::Newline) {}
    }

    fn at_section(&self, name: &str) -> bool {
        matches!(&self.peek().kind, TokenKind::Ident(s) if s == name)
            && *self.peek_at(1) == TokenKind::Colon
    }

    /// `Name:`; a line may follow on the same row.
    fn section(&mut self, name: &str) -> GrafelResult<()> {
        if !self.at_section(name) {
            return Err(self.unexpected(&format!("'{name}:'")));
        }
        self.bump();
        self.bump();
        Ok(())
    }

    fn end_of_line(&mut self) -> GrafelResult<()> {
        match self.peek().kind {
            TokenKind::Newline => {
                self.bump();
                Ok(())
            }
            TokenKind::Eof => Ok(()),
            _ => Err(self.unexpected("end of line")),
        }
    }

    fn at_line_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Newline | TokenKind::Eof)
    }

    fn ident(&mut self, expected: &str) -> GrafelResult<(String, Pos)> {
        match &self.peek().kind {
            TokenKind::Ident(s) => {
                let s = s.clone();
                let pos = self.bump().pos;
                Ok((s, pos))
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn uint(&mut self) -> GrafelResult<u64> {
        match self.peek().kind {
            TokenKind::Int(n) => {
                self.bump();
                Ok(n)
            }
            _ => Err(self.unexpected("an integer")),
        }
    }

    fn signed(&mut self) -> GrafelResult<f64> {
        let negative = self.consume(TokenKind::Minus);
        let n = self.uint()? as f64;
        Ok(if negative { -n } else { n })
    }

    fn number(&mut self) -> GrafelResult<f64> {
        match self.peek().kind {
            TokenKind::Int(n) => {
                self.bump();
                Ok(n as f64)
            }
            TokenKind::Float(v) => {
                self.bump();
                Ok(v)
            }
            _ => Err(self.unexpected("a number")),
        }
    }

    /// `WxH`, components may be negative.
    fn vector(&mut self) -> GrafelResult<Vector> {
        let x = self.signed()?;
        self.expect(TokenKind::Cross, "'x' between vector components")?;
        let y = self.signed()?;
        Ok(Vector::new(x, y))
    }

    /// Color name or `#rrggbb`.
    fn color(&mut self) -> GrafelResult<Color> {
        let token = self.peek().clone();
        let text = match &token.kind {
            TokenKind::Ident(s) | TokenKind::Hex(s) => s.clone(),
            _ => return Err(self.unexpected("a color name or #rrggbb code")),
        };
        self.bump();
        Color::parse(&text)
            .map_err(|_| Self::error_at(token.pos, format!("unknown color '{text}'")))
    }

    fn string(&mut self) -> GrafelResult<String> {
        match &self.peek().kind {
            TokenKind::Str(s) => {
                let s = s.clone();
                self.bump();
                Ok(s)
            }
            _ => Err(self.unexpected("a quoted string")),
        }
    }

    fn cast_line(&mut self) -> GrafelResult<CastLine> {
        let (name, _) = self.ident("an actor name")?;
        self.expect(TokenKind::Equals, "'='")?;
        let (role_name, role_pos) = self.ident("a role")?;
        let role = Role::from_name(&role_name).ok_or_else(|| {
            let roles: Vec<_> = Role::ALL.iter().map(|r| r.name()).collect();
            Self::error_at(
                role_pos,
                format!("unknown role '{role_name}' (expected one of {})", roles.join(", ")),
            )
        })?;

        let mut attrs = Vec::new();
        while !self.at_line_end() {
            attrs.push(self.attr()?);
        }
        self.end_of_line()?;
        Ok(CastLine { name, role, attrs })
    }

    fn attr(&mut self) -> GrafelResult<Attr> {
        let (keyword, pos) = self.ident("an attribute")?;
        let attr = match keyword.as_str() {
            "size" => Attr::Size(self.vector()?),
            "pos" => Attr::Pos(self.vector()?),
            "num" => {
                let n = self.uint()?;
                if !(1..=6).contains(&n) {
                    return Err(Self::error_at(
                        pos,
                        format!("num must be between 1 and 6, got {n}"),
                    ));
                }
                Attr::Num(n as u8)
            }
            "side" => Attr::Side(self.number()?),
            "fontsize" => Attr::FontSize(self.number()?),
            "radius" => Attr::Radius(self.number()?),
            "width" => Attr::Width(self.number()?),
            "height" => Attr::Height(self.number()?),
            "text" => Attr::Text(self.string()?),
            "filename" => Attr::Filename(self.string()?),
            "alpha" => {
                let a = self.number()?;
                if !(0.0..=1.0).contains(&a) {
                    return Err(Self::error_at(
                        pos,
                        format!("alpha must be in [0, 1], got {a}"),
                    ));
                }
                Attr::Alpha(a)
            }
            "points" => {
                self.expect(TokenKind::LParen, "'('")?;
                let mut points = vec![self.vector()?];
                while self.consume(TokenKind::Comma) {
                    points.push(self.vector()?);
                }
                self.expect(TokenKind::RParen, "')'")?;
                Attr::Points(points)
            }
            "color" => Attr::Color(self.color()?),
            _ => return Err(Self::error_at(pos, format!("unknown attribute '{keyword}'"))),
        };
        Ok(attr)
    }

    /// `a-b`, `a+n` or `n`.
    fn interval(&mut self) -> GrafelResult<Interval> {
        let lower = self.uint()?;
        if self.consume(TokenKind::Minus) {
            Interval::new(lower, self.uint()?)
        } else if self.consume(TokenKind::Plus) {
            Interval::starting_at(lower, self.uint()?)
        } else {
            Ok(Interval::single(lower))
        }
    }

    fn action_line(&mut self) -> GrafelResult<ActionLine> {
        let interval = self.interval()?;
        let (actor, _) = self.ident("an actor name")?;
        let (action, _) = self.ident("an action name")?;

        let mut args = Vec::new();
        while !self.at_line_end() {
            let arg = match self.peek().kind {
                TokenKind::Ident(_) | TokenKind::Hex(_) => ActionArg::Color(self.color()?),
                TokenKind::Int(_) | TokenKind::Minus => ActionArg::Vector(self.vector()?),
                _ => return Err(self.unexpected("a vector or color argument")),
            };
            args.push(arg);
        }
        self.end_of_line()?;
        Ok(ActionLine {
            interval,
            actor,
            action,
            args,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/parser.rs"]
mod tests;
