//! The livecode control surface's configuration mini-language.
//!
//! A program is a sequence of function-call-shaped statements:
//!
//! ```text
//! right_hand({ url: "https://...", start: 5, end: 15 });
//! left_hand({ url: "https://..." });
//! foot_mode(0, "scrub", { target: "right", x: "timestamp", y: "volume" });
//! foot_mode(1, "grade", { right: { x: "hue", y: "saturation" },
//!                         left:  { x: "brightness", y: "contrast" } });
//! ```
//!
//! Statements are independent: a malformed statement is skipped (with its
//! location reported) and parsing resumes at the next `;`. Re-parsing a new
//! program replaces all prior declarations and modes wholesale.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::hand::{Hand, Target};

/// Which media plays on which hand, over what time range.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoDeclaration {
    pub hand: Hand,
    pub url: String,
    pub start: f32,
    /// Absent means the whole clip loops.
    pub end: Option<f32>,
}

/// Parameter names bound to the pointer axes. An absent axis is a no-op.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AxisBinding {
    pub x: Option<String>,
    pub y: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Binding {
    /// One axis pair applied to a fixed hand set.
    Simple { target: Target, axes: AxisBinding },
    /// Independent axis pairs per hand; a hand without a pair is unaffected.
    PerHand {
        right: Option<AxisBinding>,
        left: Option<AxisBinding>,
    },
}

impl Binding {
    /// Axis pair in effect for one hand, if the binding addresses it.
    pub fn axes_for(&self, hand: Hand) -> Option<&AxisBinding> {
        match self {
            Binding::Simple { target, axes } => target.hands().contains(&hand).then_some(axes),
            Binding::PerHand { right, left } => match hand {
                Hand::Right => right.as_ref(),
                Hand::Left => left.as_ref(),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModeDefinition {
    /// Slot index as written in the source; kept verbatim through compaction.
    pub index: u32,
    pub name: String,
    pub binding: Binding,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("unexpected character '{ch}'")]
    UnexpectedChar { ch: char },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("expected {expected}, found {found}")]
    Unexpected { expected: &'static str, found: String },
    #[error("unknown statement '{name}'")]
    UnknownStatement { name: String },
    #[error("field '{field}' must be {expected}")]
    FieldType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("video statement has no url")]
    MissingUrl,
    #[error("end offset must be greater than start offset")]
    InvalidRange,
    #[error("mode index must be a non-negative integer")]
    InvalidIndex,
    #[error("mode statement has no target and no per-hand binding")]
    MissingBinding,
}

/// A statement that failed to parse, with its source location.
#[derive(Clone, Debug, PartialEq)]
pub struct Skipped {
    pub line: usize,
    pub column: usize,
    pub error: ParseError,
}

/// Result of one parse pass over a program text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    /// At most one declaration per hand; a later statement for the same hand
    /// supersedes an earlier one.
    pub videos: Vec<VideoDeclaration>,
    /// Compacted: ordered by index, one definition per index (last wins).
    pub modes: Vec<ModeDefinition>,
    pub skipped: Vec<Skipped>,
}

impl Program {
    pub fn video_for(&self, hand: Hand) -> Option<&VideoDeclaration> {
        self.videos.iter().find(|v| v.hand == hand)
    }
}

/// Parse a full program. Never fails as a whole; bad statements land in
/// `skipped` and everything else still applies.
pub fn parse(source: &str) -> Program {
    let mut parser = Parser::new(source);
    let mut right: Option<VideoDeclaration> = None;
    let mut left: Option<VideoDeclaration> = None;
    let mut modes: BTreeMap<u32, ModeDefinition> = BTreeMap::new();
    let mut skipped = Vec::new();

    loop {
        match parser.statement() {
            Ok(None) => break,
            Ok(Some(Stmt::Video(decl))) => match decl.hand {
                Hand::Right => right = Some(decl),
                Hand::Left => left = Some(decl),
            },
            Ok(Some(Stmt::Mode(mode))) => {
                modes.insert(mode.index, mode);
            }
            Err(err) => {
                let (line, column) = line_col(source, err.at);
                skipped.push(Skipped {
                    line,
                    column,
                    error: err.error,
                });
                if !parser.recover_from(err.at) {
                    break;
                }
            }
        }
    }

    Program {
        videos: right.into_iter().chain(left).collect(),
        modes: modes.into_values().collect(),
        skipped,
    }
}

fn line_col(source: &str, at: usize) -> (usize, usize) {
    let before = &source[..at.min(source.len())];
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(i) => at - i,
        None => at + 1,
    };
    (line, column)
}

// ---------------- Lexer ----------------

#[derive(Clone, Debug, PartialEq)]
enum Tok {
    Ident(String),
    Number(f32),
    Str(String),
    LParen,
    RParen,
    LBrace,
    RBrace,
    Colon,
    Comma,
    Semi,
}

impl Tok {
    fn describe(&self) -> String {
        match self {
            Tok::Ident(name) => format!("'{name}'"),
            Tok::Number(n) => format!("number {n}"),
            Tok::Str(_) => "a string".to_string(),
            Tok::LParen => "'('".to_string(),
            Tok::RParen => "')'".to_string(),
            Tok::LBrace => "'{'".to_string(),
            Tok::RBrace => "'}'".to_string(),
            Tok::Colon => "':'".to_string(),
            Tok::Comma => "','".to_string(),
            Tok::Semi => "';'".to_string(),
        }
    }
}

struct StmtError {
    at: usize,
    error: ParseError,
}

enum Stmt {
    Video(VideoDeclaration),
    Mode(ModeDefinition),
}

#[derive(Clone, Debug, PartialEq)]
enum Value {
    Num(f32),
    Str(String),
    Obj(Vec<Field>),
}

#[derive(Clone, Debug, PartialEq)]
struct Field {
    name: String,
    value: Value,
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    lookahead: Option<(usize, Tok)>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            lookahead: None,
        }
    }

    fn skip_trivia(&mut self) {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() {
            let b = bytes[self.pos];
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else if b == b'/' && bytes.get(self.pos + 1) == Some(&b'/') {
                while self.pos < bytes.len() && bytes[self.pos] != b'\n' {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    fn lex(&mut self) -> Result<Option<(usize, Tok)>, StmtError> {
        self.skip_trivia();
        let at = self.pos;
        let Some(ch) = self.src[self.pos..].chars().next() else {
            return Ok(None);
        };
        let tok = match ch {
            '(' => Tok::LParen,
            ')' => Tok::RParen,
            '{' => Tok::LBrace,
            '}' => Tok::RBrace,
            ':' => Tok::Colon,
            ',' => Tok::Comma,
            ';' => Tok::Semi,
            '"' | '\'' => {
                self.pos += 1;
                let start = self.pos;
                let Some(len) = self.src[self.pos..].find(ch) else {
                    return Err(StmtError {
                        at,
                        error: ParseError::UnterminatedString,
                    });
                };
                self.pos = start + len + ch.len_utf8();
                return Ok(Some((at, Tok::Str(self.src[start..start + len].to_string()))));
            }
            c if c.is_ascii_digit() => {
                let rest = &self.src[self.pos..];
                let mut len = rest
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(rest.len());
                if rest[len..].starts_with('.')
                    && rest[len + 1..].starts_with(|c: char| c.is_ascii_digit())
                {
                    len += 1
                        + rest[len + 1..]
                            .find(|c: char| !c.is_ascii_digit())
                            .unwrap_or(rest.len() - len - 1);
                }
                self.pos += len;
                let n = rest[..len].parse::<f32>().map_err(|_| StmtError {
                    at,
                    error: ParseError::Unexpected {
                        expected: "a number",
                        found: rest[..len].to_string(),
                    },
                })?;
                return Ok(Some((at, Tok::Number(n))));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let rest = &self.src[self.pos..];
                let len = rest
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(rest.len());
                self.pos += len;
                return Ok(Some((at, Tok::Ident(rest[..len].to_string()))));
            }
            other => {
                return Err(StmtError {
                    at,
                    error: ParseError::UnexpectedChar { ch: other },
                })
            }
        };
        self.pos += ch.len_utf8();
        Ok(Some((at, tok)))
    }

    fn next(&mut self) -> Result<Option<(usize, Tok)>, StmtError> {
        if let Some(tok) = self.lookahead.take() {
            return Ok(Some(tok));
        }
        self.lex()
    }

    fn peek(&mut self) -> Result<Option<&(usize, Tok)>, StmtError> {
        if self.lookahead.is_none() {
            self.lookahead = self.lex()?;
        }
        Ok(self.lookahead.as_ref())
    }

    fn expect(&mut self, want: Tok, expected: &'static str) -> Result<usize, StmtError> {
        match self.next()? {
            Some((at, tok)) if tok == want => Ok(at),
            Some((at, tok)) => Err(self.unexpected(at, expected, &tok)),
            None => Err(self.eof(expected)),
        }
    }

    fn unexpected(&self, at: usize, expected: &'static str, found: &Tok) -> StmtError {
        StmtError {
            at,
            error: ParseError::Unexpected {
                expected,
                found: found.describe(),
            },
        }
    }

    fn eof(&self, expected: &'static str) -> StmtError {
        StmtError {
            at: self.src.len(),
            error: ParseError::Unexpected {
                expected,
                found: "end of input".to_string(),
            },
        }
    }

    /// Skip past the next `;` (string contents ignored) so the following
    /// statement can still parse. Returns false when the source is exhausted.
    fn recover_from(&mut self, at: usize) -> bool {
        self.lookahead = None;
        let bytes = self.src.as_bytes();
        let mut i = at.min(bytes.len());
        while i < bytes.len() {
            match bytes[i] {
                b';' => {
                    self.pos = i + 1;
                    return true;
                }
                q @ (b'"' | b'\'') => {
                    i += 1;
                    while i < bytes.len() && bytes[i] != q {
                        i += 1;
                    }
                }
                _ => {}
            }
            i += 1;
        }
        self.pos = bytes.len();
        false
    }

    // ---------------- Grammar ----------------

    fn statement(&mut self) -> Result<Option<Stmt>, StmtError> {
        let Some((at, tok)) = self.next()? else {
            return Ok(None);
        };
        let name = match tok {
            Tok::Ident(name) => name,
            other => return Err(self.unexpected(at, "a statement name", &other)),
        };
        match name.as_str() {
            "right_hand" => Ok(Some(Stmt::Video(self.video_statement(Hand::Right)?))),
            "left_hand" => Ok(Some(Stmt::Video(self.video_statement(Hand::Left)?))),
            "foot_mode" => Ok(Some(Stmt::Mode(self.mode_statement()?))),
            _ => Err(StmtError {
                at,
                error: ParseError::UnknownStatement { name },
            }),
        }
    }

    fn video_statement(&mut self, hand: Hand) -> Result<VideoDeclaration, StmtError> {
        self.expect(Tok::LParen, "'('")?;
        let (obj_at, fields) = self.object()?;
        self.expect(Tok::RParen, "')'")?;
        self.expect(Tok::Semi, "';'")?;

        let url = match find_field(&fields, "url") {
            Some(Value::Str(url)) => url.clone(),
            Some(_) => {
                return Err(StmtError {
                    at: obj_at,
                    error: ParseError::FieldType {
                        field: "url",
                        expected: "a string",
                    },
                })
            }
            None => {
                return Err(StmtError {
                    at: obj_at,
                    error: ParseError::MissingUrl,
                })
            }
        };
        let start = number_field(&fields, "start", obj_at)?.unwrap_or(0.0);
        let end = number_field(&fields, "end", obj_at)?;
        if let Some(end) = end {
            if end <= start {
                return Err(StmtError {
                    at: obj_at,
                    error: ParseError::InvalidRange,
                });
            }
        }
        Ok(VideoDeclaration {
            hand,
            url,
            start,
            end,
        })
    }

    fn mode_statement(&mut self) -> Result<ModeDefinition, StmtError> {
        self.expect(Tok::LParen, "'('")?;
        let (num_at, n) = match self.next()? {
            Some((at, Tok::Number(n))) => (at, n),
            Some((at, tok)) => return Err(self.unexpected(at, "a mode index", &tok)),
            None => return Err(self.eof("a mode index")),
        };
        if n < 0.0 || n.fract() != 0.0 {
            return Err(StmtError {
                at: num_at,
                error: ParseError::InvalidIndex,
            });
        }
        self.expect(Tok::Comma, "','")?;
        let name = match self.next()? {
            Some((_, Tok::Str(name))) => name,
            Some((at, tok)) => return Err(self.unexpected(at, "a mode name", &tok)),
            None => return Err(self.eof("a mode name")),
        };
        self.expect(Tok::Comma, "','")?;
        let (obj_at, fields) = self.object()?;
        self.expect(Tok::RParen, "')'")?;
        self.expect(Tok::Semi, "';'")?;

        let binding = binding_from_fields(&fields).ok_or(StmtError {
            at: obj_at,
            error: ParseError::MissingBinding,
        })?;
        Ok(ModeDefinition {
            index: n as u32,
            name,
            binding,
        })
    }

    fn object(&mut self) -> Result<(usize, Vec<Field>), StmtError> {
        let at = self.expect(Tok::LBrace, "'{'")?;
        let mut fields = Vec::new();
        loop {
            match self.next()? {
                Some((_, Tok::RBrace)) => break,
                Some((_, Tok::Ident(name))) => {
                    self.expect(Tok::Colon, "':'")?;
                    let value = self.value()?;
                    fields.push(Field { name, value });
                    match self.next()? {
                        Some((_, Tok::Comma)) => {}
                        Some((_, Tok::RBrace)) => break,
                        Some((at, tok)) => return Err(self.unexpected(at, "',' or '}'", &tok)),
                        None => return Err(self.eof("',' or '}'")),
                    }
                }
                Some((at, tok)) => return Err(self.unexpected(at, "a field name or '}'", &tok)),
                None => return Err(self.eof("a field name or '}'")),
            }
        }
        Ok((at, fields))
    }

    fn value(&mut self) -> Result<Value, StmtError> {
        if let Some((_, Tok::LBrace)) = self.peek()? {
            let (_, fields) = self.object()?;
            return Ok(Value::Obj(fields));
        }
        match self.next()? {
            Some((_, Tok::Number(n))) => Ok(Value::Num(n)),
            Some((_, Tok::Str(s))) => Ok(Value::Str(s)),
            Some((at, tok)) => Err(self.unexpected(at, "a value", &tok)),
            None => Err(self.eof("a value")),
        }
    }
}

// ---------------- Field extraction ----------------

fn find_field<'f>(fields: &'f [Field], name: &str) -> Option<&'f Value> {
    fields.iter().find(|f| f.name == name).map(|f| &f.value)
}

fn number_field(
    fields: &[Field],
    name: &'static str,
    at: usize,
) -> Result<Option<f32>, StmtError> {
    match find_field(fields, name) {
        Some(Value::Num(n)) => Ok(Some(*n)),
        Some(_) => Err(StmtError {
            at,
            error: ParseError::FieldType {
                field: name,
                expected: "a number",
            },
        }),
        None => Ok(None),
    }
}

fn string_field(fields: &[Field], name: &str) -> Option<String> {
    match find_field(fields, name) {
        Some(Value::Str(s)) => Some(s.clone()),
        _ => None,
    }
}

fn axis_pair(fields: &[Field]) -> AxisBinding {
    AxisBinding {
        x: string_field(fields, "x"),
        y: string_field(fields, "y"),
    }
}

fn binding_from_fields(fields: &[Field]) -> Option<Binding> {
    let sub = |name| match find_field(fields, name) {
        Some(Value::Obj(inner)) => Some(axis_pair(inner)),
        _ => None,
    };
    let right = sub("right");
    let left = sub("left");
    if right.is_some() || left.is_some() {
        // Per-hand sub-objects take precedence over a coexisting target/x/y.
        return Some(Binding::PerHand { right, left });
    }
    let target = Target::from_keyword(&string_field(fields, "target")?)?;
    Some(Binding::Simple {
        target,
        axes: axis_pair(fields),
    })
}
