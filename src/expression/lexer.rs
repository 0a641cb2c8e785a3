use crate::expression::error::ExprError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    True,
    False,

    // word operators
    And,
    Or,
    Not,

    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,

    Plus,
    Minus,
    Star,
    Slash,
    SlashSlash,
    Percent,

    Bang,

    EqEq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    AndAnd,
    OrOr,

    Eof,
}

pub(crate) fn lex(input: &str) -> Result<Vec<Token>, ExprError> {
    let mut cursor = Cursor { src: input, pos: 0 };
    let mut out = Vec::new();
    while let Some(c) = cursor.skip_whitespace() {
        let start = cursor.pos;
        let leading_dot = c == '.' && cursor.peek_at(1).is_some_and(|d| d.is_ascii_digit());
        let kind = if c.is_ascii_digit() || leading_dot {
            cursor.number()?
        } else if c == '\'' || c == '"' {
            cursor.string(c)?
        } else if c.is_ascii_alphabetic() || c == '_' {
            keyword(cursor.ident())
        } else {
            cursor.operator(c)?
        };
        out.push(Token {
            kind,
            span: Span {
                start,
                end: cursor.pos,
            },
        });
    }
    out.push(Token {
        kind: TokenKind::Eof,
        span: Span {
            start: input.len(),
            end: input.len(),
        },
    });
    Ok(out)
}

fn keyword(word: &str) -> TokenKind {
    match word {
        "true" | "True" => TokenKind::True,
        "false" | "False" => TokenKind::False,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        _ => TokenKind::Ident(word.to_owned()),
    }
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(ahead)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_at(0)?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let (src, start) = (self.src, self.pos);
        while self.peek_at(0).is_some_and(&pred) {
            self.bump();
        }
        &src[start..self.pos]
    }

    fn skip_whitespace(&mut self) -> Option<char> {
        self.eat_while(char::is_whitespace);
        self.peek_at(0)
    }

    fn ident(&mut self) -> &'a str {
        self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    /// `12`, `1.5`, `.5`, `2e3`; anything with a fraction or exponent is a float.
    fn number(&mut self) -> Result<TokenKind, ExprError> {
        let start = self.pos;
        self.eat_while(|c| c.is_ascii_digit());
        let mut is_float = false;
        if self.peek_at(0) == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.bump();
            self.eat_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek_at(0), Some('e' | 'E')) {
            let e_pos = self.pos;
            is_float = true;
            self.bump();
            if matches!(self.peek_at(0), Some('+' | '-')) {
                self.bump();
            }
            if self.eat_while(|c| c.is_ascii_digit()).is_empty() {
                return Err(ExprError::at(
                    e_pos,
                    "invalid number exponent (expected digits)",
                ));
            }
        }

        let text = &self.src[start..self.pos];
        if is_float {
            text.parse()
                .map(TokenKind::Float)
                .map_err(|_| ExprError::at(start, "invalid number"))
        } else {
            text.parse()
                .map(TokenKind::Int)
                .map_err(|_| ExprError::at(start, "integer literal out of range"))
        }
    }

    /// Quoted string; `\n` and `\t` are translated, any other escaped
    /// character stands for itself.
    fn string(&mut self, quote: char) -> Result<TokenKind, ExprError> {
        let start = self.pos;
        self.bump();
        let mut s = String::new();
        loop {
            match self.bump() {
                None => return Err(ExprError::at(start, "unterminated string literal")),
                Some(c) if c == quote => return Ok(TokenKind::Str(s)),
                Some('\\') => match self.bump() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some(other) => s.push(other),
                    None => return Err(ExprError::at(start, "unterminated string literal")),
                },
                Some(c) => s.push(c),
            }
        }
    }

    fn operator(&mut self, c: char) -> Result<TokenKind, ExprError> {
        let two = match (c, self.peek_at(1)) {
            ('&', Some('&')) => Some(TokenKind::AndAnd),
            ('|', Some('|')) => Some(TokenKind::OrOr),
            ('=', Some('=')) => Some(TokenKind::EqEq),
            ('!', Some('=')) => Some(TokenKind::Ne),
            ('<', Some('=')) => Some(TokenKind::Le),
            ('>', Some('=')) => Some(TokenKind::Ge),
            ('/', Some('/')) => Some(TokenKind::SlashSlash),
            _ => None,
        };
        if let Some(kind) = two {
            self.bump();
            self.bump();
            return Ok(kind);
        }

        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '!' => TokenKind::Bang,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            _ => {
                return Err(ExprError::at(
                    self.pos,
                    format!("unexpected character '{c}'"),
                ));
            }
        };
        self.bump();
        Ok(kind)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/lexer.rs"]
mod tests;
