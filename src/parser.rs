// ABOUTME: The reader: nom combinators over a pure AST, then heap allocation

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit1, multispace1, one_of},
    combinator::{opt, recognize, value},
    multi::many0,
    IResult, Parser,
};

use crate::error::SchemeError;
use crate::heap::Heap;
use crate::value::{Value, ValueRef};

/// A parsed datum before heap allocation. Kept separate from `Value` so the nom
/// combinators stay pure `&str -> &str` functions with no `&mut Heap` threaded
/// through their closures; [`into_value`] allocates the tree afterward.
#[derive(Debug, Clone, PartialEq)]
enum ParsedExpr {
    Int(i64),
    Float(f64),
    Str(String),
    Symbol(String),
    Bool(bool),
    List(Vec<ParsedExpr>),
}

fn ws_and_comments(input: &str) -> IResult<&str, ()> {
    many0(alt((value((), multispace1), line_comment))).map(|_| ()).parse(input)
}

fn line_comment(input: &str) -> IResult<&str, ()> {
    let (input, _) = char(';')(input)?;
    let (input, _) = take_while(|c| c != '\n')(input)?;
    Ok((input, ()))
}

/// Integers: `-?[0-9]+`, no decimal point.
fn parse_int(input: &str) -> IResult<&str, ParsedExpr> {
    recognize((opt(char('-')), digit1))
        .map(|s: &str| ParsedExpr::Int(s.parse().expect("digit1 guarantees a valid integer")))
        .parse(input)
}

/// Floats: `-?[0-9]*\.[0-9]+`.
fn parse_float(input: &str) -> IResult<&str, ParsedExpr> {
    recognize((opt(char('-')), take_while(|c: char| c.is_ascii_digit()), char('.'), digit1))
        .map(|s: &str| ParsedExpr::Float(s.parse().expect("grammar guarantees a valid float")))
        .parse(input)
}

fn parse_bool(input: &str) -> IResult<&str, ParsedExpr> {
    alt((
        value(ParsedExpr::Bool(true), tag("#t")),
        value(ParsedExpr::Bool(false), tag("#f")),
    ))
    .parse(input)
}

/// Strings: double-quoted, no escape sequences, per spec.
fn parse_string(input: &str) -> IResult<&str, ParsedExpr> {
    let (input, _) = char('"')(input)?;
    let (input, content) = take_while(|c| c != '"')(input)?;
    let (input, _) = char('"')(input)?;
    Ok((input, ParsedExpr::Str(content.to_string())))
}

const SYMBOL_PUNCTUATION: &str = "+-*/%<>=!?";

fn parse_symbol(input: &str) -> IResult<&str, ParsedExpr> {
    let symbol_char = |c: char| c.is_alphanumeric() || SYMBOL_PUNCTUATION.contains(c);
    let (input, first) = one_of("abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ+-*/%<>=!?")(input)?;
    let (input, rest) = take_while1::<_, _, nom::error::Error<_>>(symbol_char)(input).unwrap_or((input, ""));
    let mut symbol = String::new();
    symbol.push(first);
    symbol.push_str(rest);
    Ok((input, ParsedExpr::Symbol(symbol)))
}

/// `'x` reads as `(quote x)`.
fn parse_quote(input: &str) -> IResult<&str, ParsedExpr> {
    let (input, _) = char('\'')(input)?;
    let (input, expr) = parse_expr(input)?;
    Ok((input, ParsedExpr::List(vec![ParsedExpr::Symbol("quote".to_string()), expr])))
}

/// `()` reads as the empty list; `(a b c)` as a proper list of its elements.
fn parse_list(input: &str) -> IResult<&str, ParsedExpr> {
    let (input, _) = char('(')(input)?;
    let (input, _) = ws_and_comments(input)?;
    let mut items = Vec::new();
    let mut remaining = input;
    loop {
        if let Ok((rest, _)) = char::<_, nom::error::Error<_>>(')')(remaining) {
            return Ok((rest, ParsedExpr::List(items)));
        }
        let (rest, expr) = parse_expr(remaining)?;
        items.push(expr);
        let (rest, _) = ws_and_comments(rest)?;
        remaining = rest;
    }
}

fn parse_expr(input: &str) -> IResult<&str, ParsedExpr> {
    let (input, _) = ws_and_comments(input)?;
    alt((parse_quote, parse_list, parse_float, parse_int, parse_bool, parse_string, parse_symbol)).parse(input)
}

fn into_value(heap: &mut Heap, parsed: &ParsedExpr) -> ValueRef {
    match parsed {
        ParsedExpr::Int(n) => heap.alloc(Value::Int(*n)),
        ParsedExpr::Float(f) => heap.alloc(Value::Float(*f)),
        ParsedExpr::Str(s) => heap.alloc(Value::Str(s.clone())),
        ParsedExpr::Symbol(s) => heap.alloc(Value::Symbol(s.clone())),
        ParsedExpr::Bool(true) => heap.t,
        ParsedExpr::Bool(false) => heap.f,
        ParsedExpr::List(items) => {
            let mut result = heap.nil;
            for item in items.iter().rev() {
                let v = into_value(heap, item);
                result = heap.alloc(Value::Cons(v, result));
            }
            result
        }
    }
}

/// Reads one fully-parsed datum at a time from a fixed source string. Each
/// `read` call advances an internal byte cursor, so repeated calls walk
/// through a whole file's worth of top-level forms.
pub struct Reader {
    buf: String,
    pos: usize,
}

impl Reader {
    pub fn new(src: &str) -> Self {
        Reader { buf: src.to_string(), pos: 0 }
    }

    /// Returns the next top-level datum, or `heap.eof` once the input (after
    /// skipping trailing whitespace/comments) is exhausted. A bare token typed
    /// without enclosing parentheses is wrapped as a one-element list, per the
    /// reader's top-level contract; `exit!` is read back as `Eof` directly.
    pub fn read(&mut self, heap: &mut Heap) -> Result<ValueRef, SchemeError> {
        let input = &self.buf[self.pos..];
        let (after_ws, _) = ws_and_comments(input).map_err(|e| reader_error(e))?;
        if after_ws.is_empty() {
            self.pos = self.buf.len();
            return Ok(heap.eof);
        }
        let consumed_before = input.len() - after_ws.len();

        let is_list = after_ws.starts_with('(') || after_ws.starts_with('\'');
        let (rest, parsed) = parse_expr(after_ws).map_err(|e| reader_error(e))?;
        self.pos += consumed_before + (after_ws.len() - rest.len());

        if parsed == ParsedExpr::Symbol("exit!".to_string()) {
            return Ok(heap.eof);
        }

        let wrapped = if is_list { parsed } else { ParsedExpr::List(vec![parsed]) };
        Ok(into_value(heap, &wrapped))
    }
}

fn reader_error(e: nom::Err<nom::error::Error<&str>>) -> SchemeError {
    SchemeError::Reader { message: e.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::Heap;

    fn read_one(src: &str) -> (Heap, ValueRef) {
        let mut heap = Heap::new();
        let mut reader = Reader::new(src);
        let v = reader.read(&mut heap).unwrap();
        (heap, v)
    }

    #[test]
    fn reads_an_integer_literally() {
        let (heap, v) = read_one("42");
        match heap.get(v) {
            Value::Cons(car, cdr) => {
                assert!(matches!(heap.get(*car), Value::Int(42)));
                assert!(matches!(heap.get(*cdr), Value::Nil));
            }
            _ => panic!("expected the bare token wrapped as a one-element list"),
        }
    }

    #[test]
    fn reads_a_float() {
        let mut heap = Heap::new();
        let mut reader = Reader::new("(+ 1.5 2.5)");
        let v = reader.read(&mut heap).unwrap();
        match heap.get(v) {
            Value::Cons(_, cdr) => match heap.get(*cdr) {
                Value::Cons(car, _) => assert!(matches!(heap.get(*car), Value::Float(f) if (*f - 1.5).abs() < 1e-9)),
                _ => panic!("expected a cons cell"),
            },
            _ => panic!("expected a cons cell"),
        }
    }

    #[test]
    fn reads_a_proper_list_without_wrapping() {
        let (heap, v) = read_one("(1 2 3)");
        match heap.get(v) {
            Value::Cons(car, _) => assert!(matches!(heap.get(*car), Value::Int(1))),
            _ => panic!("expected a cons cell"),
        }
    }

    #[test]
    fn reads_a_quoted_expression_as_a_quote_form() {
        let (heap, v) = read_one("'(1 2)");
        match heap.get(v) {
            Value::Cons(car, _) => assert!(matches!(heap.get(*car), Value::Symbol(s) if s == "quote")),
            _ => panic!("expected a cons cell"),
        }
    }

    #[test]
    fn reads_a_string_without_escape_processing() {
        let mut heap = Heap::new();
        let mut reader = Reader::new("\"hello\"");
        let v = reader.read(&mut heap).unwrap();
        match heap.get(v) {
            Value::Cons(car, _) => assert!(matches!(heap.get(*car), Value::Str(s) if s == "hello")),
            _ => panic!("expected a cons cell"),
        }
    }

    #[test]
    fn end_of_input_reads_as_eof() {
        let mut heap = Heap::new();
        let mut reader = Reader::new("   ");
        let v = reader.read(&mut heap).unwrap();
        assert_eq!(v, heap.eof);
    }

    #[test]
    fn exit_bang_reads_as_eof() {
        let mut heap = Heap::new();
        let mut reader = Reader::new("exit!");
        let v = reader.read(&mut heap).unwrap();
        assert_eq!(v, heap.eof);
    }

    #[test]
    fn reads_multiple_top_level_forms_in_sequence() {
        let mut heap = Heap::new();
        let mut reader = Reader::new("(+ 1 2) (+ 3 4)");
        let first = reader.read(&mut heap).unwrap();
        let second = reader.read(&mut heap).unwrap();
        assert_ne!(first, second);
        let third = reader.read(&mut heap).unwrap();
        assert_eq!(third, heap.eof);
    }
}
