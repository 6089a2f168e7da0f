//! Literal-only reader and writer for sysconfigdata modules.
//!
//! A sysconfigdata module is a Python source file whose only statement is
//! `build_time_vars = { ... }`, a flat dict of string/int/bool literals.
//! Rather than executing the module to obtain the mapping, this parser
//! accepts exactly that literal shape and nothing else; any other construct
//! is an error. The writer emits the same shape deterministically so the
//! localized module can be re-imported by the target interpreter.

use crate::vars::{BuildVars, VarValue};

/// The module-level name the mapping is bound to.
pub const MODULE_VAR: &str = "build_time_vars";

/// Parse the `build_time_vars` assignment out of module source text.
///
/// Accepted value literals are single- or double-quoted strings (with the
/// escapes Python's repr produces, and implicit adjacent-string
/// concatenation from pprint line wrapping), integers, `True` and `False`.
pub fn parse_module(source: &str) -> Result<BuildVars, String> {
    let mut cursor = Cursor::new(source);

    cursor.skip_trivia();
    let ident = cursor.read_identifier()?;
    if ident != MODULE_VAR {
        return Err(format!("expected `{} = ...`, found `{}`", MODULE_VAR, ident));
    }
    cursor.skip_trivia();
    cursor.expect('=')?;
    cursor.skip_trivia();
    cursor.expect('{')?;

    let mut vars = BuildVars::new();
    loop {
        cursor.skip_trivia();
        if cursor.eat('}') {
            break;
        }
        let key = cursor.read_string()?;
        cursor.skip_trivia();
        cursor.expect(':')?;
        cursor.skip_trivia();
        let value = cursor.read_value()?;
        vars.insert(key, value);
        cursor.skip_trivia();
        if cursor.eat(',') {
            continue;
        }
        cursor.expect('}')?;
        break;
    }

    cursor.skip_trivia();
    if let Some(c) = cursor.peek() {
        return Err(format!(
            "unexpected content after the {} dict: {:?}",
            MODULE_VAR, c
        ));
    }
    Ok(vars)
}

/// Render a localized sysconfigdata module.
///
/// Output is a provenance header naming the file the data came from,
/// followed by the `build_time_vars` assignment with one entry per line.
/// Byte-deterministic for a given input, so re-running a conversion
/// rewrites an identical file.
pub fn write_module(source_name: &str, vars: &BuildVars) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Generated from {}\n", source_name));
    out.push_str(MODULE_VAR);
    out.push_str(" = {\n");
    for (key, value) in vars.iter() {
        out.push_str("    ");
        out.push_str(&quote(key));
        out.push_str(": ");
        out.push_str(&render_value(value));
        out.push_str(",\n");
    }
    out.push_str("}\n");
    out
}

fn render_value(value: &VarValue) -> String {
    match value {
        VarValue::Bool(true) => "True".to_string(),
        VarValue::Bool(false) => "False".to_string(),
        VarValue::Int(i) => i.to_string(),
        VarValue::Str(s) => quote(s),
    }
}

/// Python repr-style single-quoted string literal.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), String> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(format!(
                "expected {:?} at offset {}, found {:?}",
                expected,
                self.pos - 1,
                c
            )),
            None => Err(format!("expected {:?}, found end of input", expected)),
        }
    }

    /// Skip whitespace and `#` comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.pos += 1;
                }
                Some('#') => {
                    while let Some(c) = self.peek() {
                        self.pos += 1;
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn read_identifier(&mut self) -> Result<String, String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(match self.peek() {
                Some(c) => format!("expected an identifier, found {:?}", c),
                None => "expected an identifier, found end of input".to_string(),
            });
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn read_value(&mut self) -> Result<VarValue, String> {
        match self.peek() {
            Some('\'') | Some('"') => Ok(VarValue::Str(self.read_string()?)),
            Some(c) if c.is_ascii_digit() || c == '-' => self.read_int(),
            Some(c) if c.is_alphabetic() => {
                let ident = self.read_identifier()?;
                match ident.as_str() {
                    "True" => Ok(VarValue::Bool(true)),
                    "False" => Ok(VarValue::Bool(false)),
                    other => Err(format!("unsupported value `{}`; only literals are allowed", other)),
                }
            }
            Some(c) => Err(format!("unexpected character {:?} at offset {}", c, self.pos)),
            None => Err("unexpected end of input in value".to_string()),
        }
    }

    fn read_int(&mut self) -> Result<VarValue, String> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<i64>()
            .map(VarValue::Int)
            .map_err(|_| format!("invalid integer literal `{}`", text))
    }

    /// Read one string literal, folding in adjacent literals the way Python
    /// concatenates them (pprint wraps long strings across lines this way).
    fn read_string(&mut self) -> Result<String, String> {
        let mut out = self.read_single_string()?;
        loop {
            let before = self.pos;
            self.skip_trivia();
            match self.peek() {
                Some('\'') | Some('"') => out.push_str(&self.read_single_string()?),
                _ => {
                    self.pos = before;
                    return Ok(out);
                }
            }
        }
    }

    fn read_single_string(&mut self) -> Result<String, String> {
        let quote = match self.bump() {
            Some(c @ ('\'' | '"')) => c,
            Some(c) => return Err(format!("expected a string literal, found {:?}", c)),
            None => return Err("expected a string literal, found end of input".to_string()),
        };
        let mut out = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(out),
                Some('\\') => out.push(self.read_escape()?),
                Some('\n') | None => return Err("unterminated string literal".to_string()),
                Some(c) => out.push(c),
            }
        }
    }

    fn read_escape(&mut self) -> Result<char, String> {
        match self.bump() {
            Some('\\') => Ok('\\'),
            Some('\'') => Ok('\''),
            Some('"') => Ok('"'),
            Some('n') => Ok('\n'),
            Some('t') => Ok('\t'),
            Some('r') => Ok('\r'),
            Some('0') => Ok('\0'),
            Some('x') => {
                let hi = self.bump().ok_or("truncated \\x escape")?;
                let lo = self.bump().ok_or("truncated \\x escape")?;
                let code = u32::from_str_radix(&format!("{}{}", hi, lo), 16)
                    .map_err(|_| format!("invalid \\x escape `\\x{}{}`", hi, lo))?;
                char::from_u32(code).ok_or_else(|| format!("invalid \\x escape value {}", code))
            }
            Some(c) => Err(format!("unsupported escape `\\{}`", c)),
            None => Err("truncated escape at end of input".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_module() {
        let source = "# Generated from /build/python/lib/python3.11/_sysconfigdata.py\n\
                      build_time_vars = {\n\
                          'prefix': '/build/python',\n\
                          'VERSION_MAJOR': 3,\n\
                          'WITH_PYMALLOC': True,\n\
                          'Py_DEBUG': False,\n\
                      }\n";
        let vars = parse_module(source).unwrap();
        assert_eq!(vars.get_str("prefix"), Some("/build/python"));
        assert_eq!(vars.get("VERSION_MAJOR"), Some(&VarValue::Int(3)));
        assert_eq!(vars.get("WITH_PYMALLOC"), Some(&VarValue::Bool(true)));
        assert_eq!(vars.get("Py_DEBUG"), Some(&VarValue::Bool(false)));
    }

    #[test]
    fn test_parse_adjacent_string_concatenation() {
        let source = "build_time_vars = {'CFLAGS': '-I/build/include '\n\
                      '-O2 -Wall'}\n";
        let vars = parse_module(source).unwrap();
        assert_eq!(vars.get_str("CFLAGS"), Some("-I/build/include -O2 -Wall"));
    }

    #[test]
    fn test_parse_escapes() {
        let source = r#"build_time_vars = {'A': 'it\'s', "B": "tab\there", 'C': '\x41'}"#;
        let vars = parse_module(source).unwrap();
        assert_eq!(vars.get_str("A"), Some("it's"));
        assert_eq!(vars.get_str("B"), Some("tab\there"));
        assert_eq!(vars.get_str("C"), Some("A"));
    }

    #[test]
    fn test_parse_negative_int_and_trailing_comma() {
        let source = "build_time_vars = {'N': -12,}";
        let vars = parse_module(source).unwrap();
        assert_eq!(vars.get("N"), Some(&VarValue::Int(-12)));
    }

    #[test]
    fn test_rejects_non_literal_values() {
        let source = "build_time_vars = {'prefix': os.environ['HOME']}";
        assert!(parse_module(source).is_err());
    }

    #[test]
    fn test_rejects_wrong_binding_name() {
        let source = "other_vars = {'prefix': '/build'}";
        let err = parse_module(source).unwrap_err();
        assert!(err.contains("build_time_vars"));
    }

    #[test]
    fn test_rejects_trailing_statements() {
        let source = "build_time_vars = {'prefix': '/build'}\nimport os\n";
        assert!(parse_module(source).is_err());
    }

    #[test]
    fn test_write_then_parse_round_trip() {
        let mut vars = BuildVars::new();
        vars.insert("prefix", "/opt/target");
        vars.insert("CFLAGS", "-I/opt/target/include -O2");
        vars.insert("ABIFLAGS", "");
        vars.insert("VERSION_MAJOR", 3i64);
        vars.insert("WITH_PYMALLOC", true);
        vars.insert("QUOTED", "it's a 'path'");

        let rendered = write_module("/build/python/_sysconfigdata.py", &vars);
        assert!(rendered.starts_with("# Generated from /build/python/_sysconfigdata.py\n"));
        let parsed = parse_module(&rendered).unwrap();
        assert_eq!(parsed, vars);
    }

    #[test]
    fn test_write_is_deterministic() {
        let mut vars = BuildVars::new();
        vars.insert("prefix", "/opt/target");
        vars.insert("VERSION", 311i64);
        let a = write_module("source.py", &vars);
        let b = write_module("source.py", &vars);
        assert_eq!(a, b);
    }
}
