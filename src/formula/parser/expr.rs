//! Expression parsing (recursive descent over tokens).

use super::token::{Token, TokenKind};
use crate::formula::ast::{AstKind, AstNode, Operator};

/// Nesting limit; deeper input is reported as a parse failure.
const MAX_DEPTH: usize = 256;

/// Recursive descent parser over a preprocessed token list.
///
/// Grammar (lowest to highest precedence):
///
/// add_sub := mul_div (("+" | "-") mul_div)*
/// mul_div := primary (("*" | "/") primary)*
/// primary := MIXED
///          | NUMBER [FRAC group group]     // folded into a mixed number
///          | "(" add_sub [")"]
///          | "{" add_sub ["}"]
///          | "-" primary
///          | FRAC group group
/// group   := "{" add_sub ["}"] | primary
pub(crate) struct ExprParser<'t> {
    tokens: &'t [Token],
    pos: usize,
    depth: usize,
}

impl<'t> ExprParser<'t> {
    pub(crate) fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    #[inline]
    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    #[inline]
    fn peek_at(&self, offset: usize) -> Option<&'t Token> {
        self.tokens.get(self.pos + offset)
    }

    fn next(&mut self) -> Option<&'t Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek().is_some_and(|t| t.is(kind)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Whether every token has been consumed.
    #[inline]
    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    #[inline]
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    fn peek_operator(&self) -> Option<Operator> {
        self.peek()
            .filter(|t| t.is(TokenKind::Op))
            .and_then(|t| Operator::from_glyph(&t.text))
    }

    pub(crate) fn parse_add_sub(&mut self) -> Option<AstNode> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return None;
        }

        let mut node = self.parse_mul_div()?;
        while let Some(op @ (Operator::Plus | Operator::Minus)) = self.peek_operator() {
            self.next();
            let rhs = self.parse_mul_div()?;
            node = AstNode::binary(op, node, rhs);
        }

        self.depth -= 1;
        Some(node)
    }

    fn parse_mul_div(&mut self) -> Option<AstNode> {
        let mut node = self.parse_primary()?;
        while let Some(op @ (Operator::Multiply | Operator::Divide)) = self.peek_operator() {
            self.next();
            let rhs = self.parse_primary()?;
            node = AstNode::binary(op, node, rhs);
        }
        Some(node)
    }

    fn parse_primary(&mut self) -> Option<AstNode> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return None;
        }

        let tok = self.peek()?;
        let node = match tok.kind {
            TokenKind::Mixed => {
                self.next();
                let mut parts = tok.text.splitn(3, '_');
                let whole = parts.next()?;
                let numerator = parts.next()?;
                let denominator = parts.next()?;
                Some(AstNode::mixed(whole, numerator, denominator))
            },
            TokenKind::Number => {
                self.next();
                let whole = tok.text.as_str();
                if self.peek().is_some_and(|t| t.is(TokenKind::Frac)) {
                    Some(self.fold_mixed(whole).unwrap_or_else(|| AstNode::integer(whole)))
                } else {
                    Some(AstNode::integer(whole))
                }
            },
            TokenKind::LParen => {
                self.next();
                let inner = self.parse_add_sub()?;
                // A missing closing parenthesis is tolerated.
                self.eat(TokenKind::RParen);
                Some(inner)
            },
            TokenKind::LBrace => {
                self.next();
                let inner = self.parse_add_sub()?;
                self.eat(TokenKind::RBrace);
                Some(inner)
            },
            TokenKind::Op if Operator::from_glyph(&tok.text) == Some(Operator::Minus) => {
                self.next();
                let arg = self.parse_primary()?;
                Some(negate(arg))
            },
            TokenKind::Frac => {
                self.next();
                let numerator = self.parse_group()?;
                let denominator = self.parse_group()?;
                Some(AstNode::fraction(numerator, denominator))
            },
            _ => None,
        };

        self.depth -= 1;
        node
    }

    fn parse_group(&mut self) -> Option<AstNode> {
        if self.eat(TokenKind::LBrace) {
            let inner = self.parse_add_sub()?;
            self.eat(TokenKind::RBrace);
            Some(inner)
        } else {
            self.parse_primary()
        }
    }

    /// Try to read `\frac{a}{b}` with bare integer parts after `whole`.
    ///
    /// On anything else the position is restored so the caller returns the
    /// integer alone.
    fn fold_mixed(&mut self, whole: &str) -> Option<AstNode> {
        let checkpoint = self.pos;
        let folded = self.bare_fraction_parts().map(|(numerator, denominator)| {
            AstNode::mixed(whole, numerator, denominator)
        });
        if folded.is_none() {
            self.pos = checkpoint;
        }
        folded
    }

    fn bare_fraction_parts(&mut self) -> Option<(String, String)> {
        if !self.eat(TokenKind::Frac) {
            return None;
        }
        let numerator = self.bare_integer_group()?;
        let denominator = self.bare_integer_group()?;
        Some((numerator, denominator))
    }

    fn bare_integer_group(&mut self) -> Option<String> {
        let braced = self.peek().is_some_and(|t| t.is(TokenKind::LBrace));
        let (tok, close) = if braced {
            (self.peek_at(1)?, self.peek_at(2))
        } else {
            (self.peek()?, None)
        };
        if !tok.is(TokenKind::Number) || tok.text.contains('.') {
            return None;
        }
        if braced {
            if !close.is_some_and(|t| t.is(TokenKind::RBrace)) {
                return None;
            }
            self.pos += 3;
        } else {
            self.pos += 1;
        }
        Some(tok.text.clone())
    }
}

/// Apply unary minus, folding the sign into a non-negative integer literal.
fn negate(arg: AstNode) -> AstNode {
    match arg.kind {
        AstKind::Integer(value) if !value.starts_with('-') => {
            AstNode::integer(format!("-{value}"))
        },
        kind => AstNode::unary(Operator::Minus, AstNode { kind, path: None }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::parser::token::{preprocess_mixed_numbers, tokenize};

    fn parse_all(input: &str) -> Option<(AstNode, bool)> {
        let tokens = preprocess_mixed_numbers(tokenize(input));
        let mut parser = ExprParser::new(&tokens);
        let node = parser.parse_add_sub()?;
        Some((node, parser.at_end()))
    }

    fn shape(input: &str) -> String {
        parse_all(input).map(|(n, _)| n.to_string()).unwrap_or_default()
    }

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(shape("2+3*4"), "(+ 2 (* 3 4))");
        assert_eq!(shape("8-3-2"), "(- (- 8 3) 2)");
        assert_eq!(shape("8/4/2"), "(/ (/ 8 4) 2)");
        assert_eq!(shape("(2+3)*4"), "(* (+ 2 3) 4)");
    }

    #[test]
    fn test_operator_normalization() {
        assert_eq!(shape("6\u{00F7}3\u{22C5}2"), "(* (/ 6 3) 2)");
        assert_eq!(shape("6:3\u{2212}1"), "(- (/ 6 3) 1)");
    }

    #[test]
    fn test_unary_minus_folding() {
        assert_eq!(shape("-5"), "-5");
        assert_eq!(shape("2*-5"), "(* 2 -5)");
        assert_eq!(shape("-(2+3)"), "(- (+ 2 3))");
        assert_eq!(shape("--5"), "(- -5)");
    }

    #[test]
    fn test_fractions_and_mixed() {
        assert_eq!(shape("\\frac{1}{2}+3"), "(+ (frac 1 2) 3)");
        assert_eq!(shape("\\frac{1+2}{3}"), "(frac (+ 1 2) 3)");
        assert_eq!(shape("2\\frac{1}{3}"), "(mixed 2 1 3)");
        assert_eq!(shape("1 2/3"), "(mixed 1 2 3)");
    }

    #[test]
    fn test_missing_rparen_tolerated() {
        let (node, at_end) = parse_all("(2+3").expect("parses");
        assert_eq!(node.to_string(), "(+ 2 3)");
        assert!(at_end);
    }

    #[test]
    fn test_number_before_non_integer_fraction() {
        // The fraction cannot fold into a mixed number and stays unconsumed.
        let (node, at_end) = parse_all("2\\frac{x+1}{3}").expect("integer parses");
        assert_eq!(node.to_string(), "2");
        assert!(!at_end);
    }

    #[test]
    fn test_failures() {
        assert!(parse_all("").is_none());
        assert!(parse_all("+").is_none());
        assert!(parse_all("2+").is_none());
        assert!(parse_all("()").is_none());
    }

    #[test]
    fn test_depth_limit() {
        let input = "(".repeat(MAX_DEPTH + 10) + "1";
        assert!(parse_all(&input).is_none());
    }
}
