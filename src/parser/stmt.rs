use crate::{
    ast::ast::NodeId,
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::parser::Parser;

pub fn parse_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let kind = parser.current_token_kind();
    if let Some(handler) = parser.get_stmt_lookup().get(&kind).copied() {
        return handler(parser);
    }

    let expr = parse_expr(parser, BindingPower::Default)?;

    parser.expect(TokenKind::Semicolon)?;

    Ok(expr)
}

/// Statements up to (and including) the closing `}`.
pub fn parse_block_body(parser: &mut Parser) -> Result<Vec<NodeId>, Error> {
    parser.expect_detailed(TokenKind::OpenCurly, "expected `{` to open a block")?;

    let mut statements = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected_detailed("expected `}` to close the block"));
        }
        statements.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(statements)
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span.start.clone();

    let name = parser
        .expect_detailed(
            TokenKind::Identifier,
            "expected identifier during variable declaration",
        )?
        .value;

    parser.expect_detailed(TokenKind::Assignment, "expected `=` after the variable name")?;
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    let span = parser.span_from(start);
    parser.ast.create_var_decl(name, value, Some(span))
}

pub fn parse_print_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span.start.clone();

    parser.expect_detailed(TokenKind::OpenParen, "expected `(` after print")?;
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect_detailed(TokenKind::CloseParen, "print takes a single expression")?;
    parser.expect(TokenKind::Semicolon)?;

    let span = parser.span_from(start);
    parser.ast.create_print(value, Some(span))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().span.start.clone();

    let predicate = parse_expr(parser, BindingPower::Default)?;
    let body = parse_block_body(parser)?;

    let span = parser.span_from(start);
    parser.ast.create_if(predicate, &body, Some(span))
}

/// `name(type param, ...) { statements }`
pub fn parse_function_decl(parser: &mut Parser) -> Result<NodeId, Error> {
    let name_token = parser.expect_detailed(
        TokenKind::Identifier,
        "expected a function declaration",
    )?;
    let start = name_token.span.start.clone();

    parser.expect_detailed(TokenKind::OpenParen, "expected `(` after the function name")?;

    let mut parameters = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        let type_token = parser.expect_detailed(TokenKind::Identifier, "expected a parameter type")?;
        let param_token = parser.expect_detailed(TokenKind::Identifier, "expected a parameter name")?;

        let span = parser.span_from(type_token.span.start.clone());
        parameters.push(parser.ast.create_parameter(
            type_token.value,
            param_token.value,
            Some(span),
        )?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != TokenKind::CloseParen {
            return Err(parser.unexpected_detailed("expected `,` or `)` in parameter list"));
        }
    }
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_block_body(parser)?;

    let span = parser.span_from(start);
    parser
        .ast
        .create_function(name_token.value, &parameters, &body, Some(span))
}
