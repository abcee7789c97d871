#![allow(clippy::module_inception)]

use std::{fs, path::PathBuf, rc::Rc};

use inkwell::{context::Context, module::Module};
use log::debug;

use crate::{
    ast::ast::Ast,
    compiler::compiler::compile,
    errors::errors::{Error, ErrorTip},
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::type_checker::type_check,
};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

const NULL_FILE: &str = "<null>";

#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from(NULL_FILE)))
    }

    /// Whether this is the placeholder for "no known position".
    pub fn is_null(&self) -> bool {
        self.1.as_str() == NULL_FILE
    }
}

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Options for the lowering, filled by the caller (the CLI, or a test).
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Name of the produced IR module
    pub module_name: String,
    /// Target triple recorded in the module, if any
    pub target_triple: Option<String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            module_name: String::from("main"),
            target_triple: None,
        }
    }
}

/// Runs the whole pipeline over one source file: tokenize, parse, type check
/// and lower.
///
/// # Returns
///
/// The typed tree and the verified LLVM module built from it, or the first
/// error.
pub fn compile_source<'ctx>(
    context: &'ctx Context,
    source: &str,
    file_name: &str,
    options: &CompileOptions,
) -> Result<(Ast, Module<'ctx>), Error> {
    let tokens = tokenize(source.to_string(), Some(file_name.to_string()))?;
    debug!("tokenized {} tokens", tokens.len());

    let mut ast = parse(tokens, Rc::new(file_name.to_string()))?;
    type_check(&mut ast)?;
    let module = compile(&ast, context, options)?;

    Ok((ast, module))
}

/// Finds the line containing a byte offset in `content`.
///
/// Returns the 1-based line number, the line itself (with its newline) and
/// the offset of `position` within the line.
pub fn get_line_at_offset(content: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;
    let mut start = 0;

    for (index, line) in content.split_inclusive('\n').enumerate() {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((index + 1, line.to_string(), pos - start));
        }

        start = end;
    }

    None
}

pub fn get_line_at_position(file: PathBuf, position: u32) -> Option<(usize, String, usize)> {
    let content = fs::read_to_string(&file).ok()?;
    get_line_at_offset(&content, position)
}

#[cfg(test)]
mod tests {
    use inkwell::context::Context;

    use crate::{compile_source, CompileOptions, Position};

    #[test]
    fn test_get_line_at_position() {
        let (line_number, line, line_pos) =
            super::get_line_at_position(std::path::PathBuf::from("tests/test_file.txt"), 10).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) =
            super::get_line_at_position(std::path::PathBuf::from("tests/test_file.txt"), 34).unwrap();
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }\n");
        assert_eq!(line_pos, 8);

        assert!(super::get_line_at_position(std::path::PathBuf::from("tests/test_file.txt"), 4000).is_none());
    }

    #[test]
    fn test_null_position() {
        assert!(Position::null().is_null());
        assert!(!Position(0, std::rc::Rc::new(String::from("main.lang"))).is_null());
    }

    #[test]
    fn test_compile_source() {
        let context = Context::create();
        let (_, module) =
            compile_source(&context, "main() { print(1); }", "main.lang", &CompileOptions::default()).unwrap();
        assert!(module.get_function("main").is_some());
        assert!(module.get_function("printf").is_some());
        assert!(module.get_global("fstr").is_some());

        let error = compile_source(&context, "main() { print(x); }", "main.lang", &CompileOptions::default())
            .unwrap_err();
        assert_eq!(error.get_error_name(), "LookupFailure");
        assert_eq!(error.get_position().0, 15);
        assert_eq!(error.get_position().1.as_str(), "main.lang");
    }
}

/// Prints an error with the offending source line and a caret under the
/// error position. Errors without a position print their message only.
pub fn display_error(error: &Error, file: PathBuf) {
    /*
        error: message
        -> final.lang
           |
        20 | let a = #;
           | --------^
    */

    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {}", error.get_error_name());
    } else {
        eprintln!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    eprintln!("{}", error.get_impl());
    eprintln!("-> {}", file.as_os_str().to_string_lossy());

    let position = error.get_position();
    if position.is_null() {
        return;
    }
    let Some((line, line_text, line_pos)) = get_line_at_position(file, position.0) else {
        return;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    eprintln!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    eprintln!("{} | {}", line_string, line_text_removed.trim());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    eprintln!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
