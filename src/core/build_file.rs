//! BUILD file syntax.
//!
//! Manifests are written in a small subset of Starlark: a sequence of call
//! statements whose arguments are strings, integers, identifiers, lists and
//! nested calls, with `#` line comments in between. That is enough for the
//! files we generate and for the `deps = [...]` edits a dependency resolver
//! makes to them.
//!
//! [`BuildFile::parse`] and [`BuildFile::render`] round-trip: rendering a
//! parsed file and parsing it again yields the same tree. Comments inside
//! calls and lists are kept with the argument or item they sit above, or
//! beside when they share its line.

use std::fmt::Write as _;

use thiserror::Error;

/// Maximum line width before calls and lists are broken across lines.
const MAX_WIDTH: usize = 79;

const INDENT: usize = 4;

/// Error while parsing a BUILD file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}, column {column}: {message}")]
pub struct ManifestError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// A parsed BUILD file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildFile {
    pub statements: Vec<Statement>,
}

/// A top-level statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// A `#` comment, without the leading `#`.
    Comment(String),
    Call(Call),
}

/// A function call such as `java_library(name = "a")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub function: String,
    pub args: Vec<Argument>,
    /// Own-line comments after the last argument.
    pub trailing_comments: Vec<String>,
}

/// A positional (`name == None`) or keyword argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    /// Own-line comments above the argument.
    pub comments: Vec<String>,
    pub name: Option<String>,
    pub value: Expr,
    /// Comment sharing the argument's last line.
    pub line_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Str(String),
    Int(i64),
    Ident(String),
    List(List),
    Call(Call),
}

/// A list literal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct List {
    pub items: Vec<ListItem>,
    /// Own-line comments after the last item.
    pub trailing_comments: Vec<String>,
}

/// One list element with its comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub comments: Vec<String>,
    pub value: Expr,
    pub line_comment: Option<String>,
}

impl Call {
    pub fn new(function: impl Into<String>) -> Self {
        Call {
            function: function.into(),
            args: Vec::new(),
            trailing_comments: Vec::new(),
        }
    }

    /// Add a keyword argument.
    pub fn kwarg(mut self, name: impl Into<String>, value: Expr) -> Self {
        self.args.push(Argument::new(Some(name.into()), value));
        self
    }

    /// Add a positional argument.
    pub fn positional(mut self, value: Expr) -> Self {
        self.args.push(Argument::new(None, value));
        self
    }

    /// Look up a keyword argument.
    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.args
            .iter()
            .find(|a| a.name.as_deref() == Some(name))
            .map(|a| &a.value)
    }

    fn has_comments(&self) -> bool {
        !self.trailing_comments.is_empty()
            || self
                .args
                .iter()
                .any(|a| !a.comments.is_empty() || a.line_comment.is_some())
    }
}

impl Argument {
    pub fn new(name: Option<String>, value: Expr) -> Self {
        Argument {
            comments: Vec::new(),
            name,
            value,
            line_comment: None,
        }
    }
}

impl List {
    fn has_comments(&self) -> bool {
        !self.trailing_comments.is_empty()
            || self
                .items
                .iter()
                .any(|i| !i.comments.is_empty() || i.line_comment.is_some())
    }
}

impl From<Expr> for ListItem {
    fn from(value: Expr) -> Self {
        ListItem {
            comments: Vec::new(),
            value,
            line_comment: None,
        }
    }
}

impl Expr {
    pub fn str(s: impl Into<String>) -> Self {
        Expr::Str(s.into())
    }

    /// A list of string literals.
    pub fn str_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Expr::List(List {
            items: items
                .into_iter()
                .map(|s| ListItem::from(Expr::Str(s.into())))
                .collect(),
            trailing_comments: Vec::new(),
        })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expr::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The string items of a list, skipping anything that isn't a string.
    pub fn string_items(&self) -> Vec<String> {
        match self {
            Expr::List(list) => list
                .items
                .iter()
                .filter_map(|i| i.value.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl BuildFile {
    /// Parse BUILD file source.
    pub fn parse(src: &str) -> Result<Self, ManifestError> {
        let tokens = Lexer::new(src).tokenize()?;
        Parser { tokens, pos: 0 }.parse_file()
    }

    /// Iterate over the top-level calls.
    pub fn calls(&self) -> impl Iterator<Item = &Call> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Call(c) => Some(c),
            Statement::Comment(_) => None,
        })
    }

    pub fn calls_mut(&mut self) -> impl Iterator<Item = &mut Call> {
        self.statements.iter_mut().filter_map(|s| match s {
            Statement::Call(c) => Some(c),
            Statement::Comment(_) => None,
        })
    }

    /// Render to source text, one statement per line, ending in a newline.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for stmt in &self.statements {
            match stmt {
                Statement::Comment(text) => {
                    let _ = writeln!(out, "#{}", text);
                }
                Statement::Call(call) => {
                    let _ = writeln!(out, "{}", render_call(call, 0, 0));
                }
            }
        }
        out
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn fits(col: usize, text: &str) -> bool {
    !text.contains('\n') && col + text.len() <= MAX_WIDTH
}

fn push_comments(out: &mut String, comments: &[String], indent: usize) {
    for text in comments {
        let _ = writeln!(out, "{}#{}", " ".repeat(indent), text);
    }
}

/// One line-broken element: its comments, then `body,` and any same-line
/// comment.
fn push_element(
    out: &mut String,
    comments: &[String],
    body: &str,
    line_comment: Option<&String>,
    indent: usize,
) {
    push_comments(out, comments, indent);
    let _ = write!(out, "{}{},", " ".repeat(indent), body);
    if let Some(text) = line_comment {
        let _ = write!(out, " #{}", text);
    }
    out.push('\n');
}

/// Render an expression that starts at column `col` on a line indented by
/// `indent`.
fn render_expr(expr: &Expr, indent: usize, col: usize) -> String {
    match expr {
        Expr::Str(s) => quote(s),
        Expr::Int(i) => i.to_string(),
        Expr::Ident(name) => name.clone(),
        Expr::Call(call) => render_call(call, indent, col),
        Expr::List(list) => {
            if !list.has_comments() {
                let inline = format!(
                    "[{}]",
                    list.items
                        .iter()
                        .map(|i| render_expr(&i.value, indent, col))
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                if fits(col, &inline) {
                    return inline;
                }
            }

            let inner = indent + INDENT;
            let mut out = String::from("[\n");
            for item in &list.items {
                push_element(
                    &mut out,
                    &item.comments,
                    &render_expr(&item.value, inner, inner),
                    item.line_comment.as_ref(),
                    inner,
                );
            }
            push_comments(&mut out, &list.trailing_comments, inner);
            out.push_str(&" ".repeat(indent));
            out.push(']');
            out
        }
    }
}

fn render_arg(arg: &Argument, indent: usize, col: usize) -> String {
    match &arg.name {
        Some(name) => {
            let prefix = format!("{} = ", name);
            let value = render_expr(&arg.value, indent, col + prefix.len());
            format!("{}{}", prefix, value)
        }
        None => render_expr(&arg.value, indent, col),
    }
}

fn render_call(call: &Call, indent: usize, col: usize) -> String {
    let open = format!("{}(", call.function);
    if !call.has_comments() {
        let mut parts = Vec::with_capacity(call.args.len());
        let mut inline_col = col + open.len();
        for arg in &call.args {
            let part = render_arg(arg, indent, inline_col);
            inline_col += part.len() + 2;
            parts.push(part);
        }
        let inline = format!("{}{})", open, parts.join(", "));
        if fits(col, &inline) {
            return inline;
        }
    }

    let inner = indent + INDENT;
    let mut out = format!("{}\n", open);
    for arg in &call.args {
        push_element(
            &mut out,
            &arg.comments,
            &render_arg(arg, inner, inner),
            arg.line_comment.as_ref(),
            inner,
        );
    }
    push_comments(&mut out, &call.trailing_comments, inner);
    out.push_str(&" ".repeat(indent));
    out.push(')');
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Str(String),
    Int(i64),
    Comment(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Eq,
    Semi,
    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("identifier `{}`", name),
            Token::Str(_) => "string".to_string(),
            Token::Int(_) => "integer".to_string(),
            Token::Comment(_) => "comment".to_string(),
            Token::LParen => "`(`".to_string(),
            Token::RParen => "`)`".to_string(),
            Token::LBracket => "`[`".to_string(),
            Token::RBracket => "`]`".to_string(),
            Token::Comma => "`,`".to_string(),
            Token::Eq => "`=`".to_string(),
            Token::Semi => "`;`".to_string(),
            Token::Eof => "end of file".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Pos {
    line: usize,
    column: usize,
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Lexer {
            chars: src.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, pos: Pos, message: impl Into<String>) -> ManifestError {
        ManifestError {
            line: pos.line,
            column: pos.column,
            message: message.into(),
        }
    }

    fn tokenize(mut self) -> Result<Vec<(Token, Pos)>, ManifestError> {
        let mut tokens = Vec::new();

        loop {
            let pos = Pos {
                line: self.line,
                column: self.column,
            };
            let Some(&c) = self.chars.peek() else {
                tokens.push((Token::Eof, pos));
                return Ok(tokens);
            };

            let token = match c {
                c if c.is_whitespace() => {
                    self.bump();
                    continue;
                }
                '#' => {
                    self.bump();
                    let mut text = String::new();
                    while let Some(&c) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        text.push(c);
                        self.bump();
                    }
                    Token::Comment(text)
                }
                '"' | '\'' => self.string(pos)?,
                '(' | ')' | '[' | ']' | ',' | '=' | ';' => {
                    self.bump();
                    match c {
                        '(' => Token::LParen,
                        ')' => Token::RParen,
                        '[' => Token::LBracket,
                        ']' => Token::RBracket,
                        ',' => Token::Comma,
                        '=' => Token::Eq,
                        _ => Token::Semi,
                    }
                }
                c if c.is_ascii_digit() || c == '-' => {
                    let mut text = String::new();
                    text.push(c);
                    self.bump();
                    while let Some(&c) = self.chars.peek() {
                        if !c.is_ascii_digit() {
                            break;
                        }
                        text.push(c);
                        self.bump();
                    }
                    let value = text
                        .parse()
                        .map_err(|_| self.error(pos, format!("invalid integer `{}`", text)))?;
                    Token::Int(value)
                }
                c if c.is_alphabetic() || c == '_' => {
                    let mut text = String::new();
                    while let Some(&c) = self.chars.peek() {
                        if !(c.is_alphanumeric() || c == '_' || c == '.') {
                            break;
                        }
                        text.push(c);
                        self.bump();
                    }
                    Token::Ident(text)
                }
                other => return Err(self.error(pos, format!("unexpected character `{}`", other))),
            };

            tokens.push((token, pos));
        }
    }

    fn string(&mut self, pos: Pos) -> Result<Token, ManifestError> {
        let quote = self.bump().unwrap_or('"');
        let mut value = String::new();

        loop {
            match self.bump() {
                None | Some('\n') => return Err(self.error(pos, "unterminated string")),
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(c @ ('\\' | '"' | '\'')) => value.push(c),
                    Some(c) => {
                        value.push('\\');
                        value.push(c);
                    }
                    None => return Err(self.error(pos, "unterminated string")),
                },
                Some(c) if c == quote => return Ok(Token::Str(value)),
                Some(c) => value.push(c),
            }
        }
    }
}

struct Parser {
    tokens: Vec<(Token, Pos)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    fn position(&self) -> Pos {
        self.tokens[self.pos].1
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].0.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>) -> ManifestError {
        let pos = self.position();
        ManifestError {
            line: pos.line,
            column: pos.column,
            message: message.into(),
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), ManifestError> {
        if *self.peek() == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!(
                "expected {}, found {}",
                expected.describe(),
                self.peek().describe()
            )))
        }
    }

    /// Consume the comments at the cursor. The first one goes to
    /// `previous` when it shares a line with the token before it and
    /// `previous` has no comment yet; the rest are queued in `pending` for
    /// whatever comes next.
    fn collect_comments(
        &mut self,
        mut previous: Option<&mut Option<String>>,
        pending: &mut Vec<String>,
    ) {
        while let Token::Comment(text) = self.peek().clone() {
            let same_line =
                self.pos > 0 && self.tokens[self.pos - 1].1.line == self.position().line;
            match previous.take() {
                Some(slot) if same_line && slot.is_none() => *slot = Some(text),
                _ => pending.push(text),
            }
            self.advance();
        }
    }

    fn parse_file(mut self) -> Result<BuildFile, ManifestError> {
        let mut statements = Vec::new();

        loop {
            match self.peek().clone() {
                Token::Eof => return Ok(BuildFile { statements }),
                Token::Comment(text) => {
                    self.advance();
                    statements.push(Statement::Comment(text));
                }
                Token::Semi => {
                    self.advance();
                }
                Token::Ident(name) => {
                    self.advance();
                    statements.push(Statement::Call(self.parse_call(name)?));
                }
                other => {
                    return Err(self.error(format!(
                        "expected a call statement, found {}",
                        other.describe()
                    )))
                }
            }
        }
    }

    /// Parse the argument list of a call whose name was already consumed.
    fn parse_call(&mut self, function: String) -> Result<Call, ManifestError> {
        self.expect(Token::LParen)?;
        let mut call = Call::new(function);
        let mut pending = Vec::new();

        loop {
            let last = call.args.last_mut().map(|a| &mut a.line_comment);
            self.collect_comments(last, &mut pending);
            if *self.peek() == Token::RParen {
                self.advance();
                call.trailing_comments = pending;
                return Ok(call);
            }

            let mut arg = self.parse_argument(&mut pending)?;
            arg.comments = std::mem::take(&mut pending);
            call.args.push(arg);

            let last = call.args.last_mut().map(|a| &mut a.line_comment);
            self.collect_comments(last, &mut pending);
            match self.peek() {
                Token::Comma => {
                    self.advance();
                }
                Token::RParen => {}
                other => {
                    return Err(self.error(format!(
                        "expected `,` or `)`, found {}",
                        other.describe()
                    )))
                }
            }
        }
    }

    /// Comments between `name =` and the value join `pending`.
    fn parse_argument(
        &mut self,
        pending: &mut Vec<String>,
    ) -> Result<Argument, ManifestError> {
        if let Token::Ident(name) = self.peek().clone() {
            if matches!(self.tokens.get(self.pos + 1), Some((Token::Eq, _))) {
                self.advance();
                self.advance();
                self.collect_comments(None, pending);
                let value = self.parse_expr()?;
                return Ok(Argument::new(Some(name), value));
            }
        }

        let value = self.parse_expr()?;
        Ok(Argument::new(None, value))
    }

    fn parse_list(&mut self) -> Result<List, ManifestError> {
        let mut list = List::default();
        let mut pending = Vec::new();

        loop {
            let last = list.items.last_mut().map(|i| &mut i.line_comment);
            self.collect_comments(last, &mut pending);
            if *self.peek() == Token::RBracket {
                self.advance();
                list.trailing_comments = pending;
                return Ok(list);
            }

            let mut item = ListItem::from(self.parse_expr()?);
            item.comments = std::mem::take(&mut pending);
            list.items.push(item);

            let last = list.items.last_mut().map(|i| &mut i.line_comment);
            self.collect_comments(last, &mut pending);
            match self.peek() {
                Token::Comma => {
                    self.advance();
                }
                Token::RBracket => {}
                other => {
                    return Err(self.error(format!(
                        "expected `,` or `]`, found {}",
                        other.describe()
                    )))
                }
            }
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, ManifestError> {
        let start = self.position();
        match self.advance() {
            Token::Str(s) => Ok(Expr::Str(s)),
            Token::Int(i) => Ok(Expr::Int(i)),
            Token::Ident(name) => {
                if *self.peek() == Token::LParen {
                    Ok(Expr::Call(self.parse_call(name)?))
                } else {
                    Ok(Expr::Ident(name))
                }
            }
            Token::LBracket => Ok(Expr::List(self.parse_list()?)),
            other => Err(ManifestError {
                line: start.line,
                column: start.column,
                message: format!("expected an expression, found {}", other.describe()),
            }),
        }
    }
}
