//! LaTeX tokenizer for arithmetic expressions.
//!
//! The tokenizer never fails: characters it does not understand are skipped,
//! so malformed input degrades to a shorter (possibly empty) token list.

use smallvec::SmallVec;

/// Token categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Number,
    Op,
    Frac,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Space,
    /// Synthetic `whole_num_den` token fused by [`preprocess_mixed_numbers`].
    Mixed,
}

/// A single token with the source text it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    #[inline]
    pub fn is_op(&self, text: &str) -> bool {
        self.kind == TokenKind::Op && self.text == text
    }
}

/// What a recognized backslash command turns into.
#[derive(Debug, Clone, Copy)]
enum Command {
    Frac,
    Op(&'static str),
    /// `\left` / `\right`: dropped, the delimiter after it is tokenized normally
    Delimiter,
}

static COMMANDS: phf::Map<&'static str, Command> = phf::phf_map! {
    "frac" => Command::Frac,
    "dfrac" => Command::Frac,
    "tfrac" => Command::Frac,
    "cdot" => Command::Op("*"),
    "times" => Command::Op("*"),
    "div" => Command::Op("/"),
    "left" => Command::Delimiter,
    "right" => Command::Delimiter,
};

/// Operator glyphs recognized outside of commands.
#[inline]
pub fn is_operator_char(ch: char) -> bool {
    matches!(
        ch,
        '+' | '-' | '\u{2212}' | '*' | '\u{00D7}' | '\u{00B7}' | '\u{22C5}' | '\u{2217}' | '/'
            | ':' | '\u{00F7}'
    )
}

/// Scan `input` left to right into tokens.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '0'..='9' => {
                let mut buf = String::new();
                buf.push(ch);
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        buf.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::new(TokenKind::Number, buf));
            },
            '\\' => {
                let mut name: SmallVec<[u8; 16]> = SmallVec::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphabetic() {
                        name.push(c as u8);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if name.is_empty() {
                    // Control symbol such as `\,` or `\{`: drop the symbol too.
                    chars.next();
                    continue;
                }
                // Command names are ASCII letters, so this cannot fail.
                let name = std::str::from_utf8(&name).unwrap_or_default();
                match COMMANDS.get(name) {
                    Some(Command::Frac) => tokens.push(Token::new(TokenKind::Frac, "\\frac")),
                    Some(Command::Op(op)) => tokens.push(Token::new(TokenKind::Op, *op)),
                    Some(Command::Delimiter) | None => {},
                }
            },
            '(' | '[' => tokens.push(Token::new(TokenKind::LParen, ch.to_string())),
            ')' | ']' => tokens.push(Token::new(TokenKind::RParen, ch.to_string())),
            '{' => tokens.push(Token::new(TokenKind::LBrace, "{")),
            '}' => tokens.push(Token::new(TokenKind::RBrace, "}")),
            c if is_operator_char(c) => tokens.push(Token::new(TokenKind::Op, c.to_string())),
            c if c.is_whitespace() => {
                while chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
                tokens.push(Token::new(TokenKind::Space, " "));
            },
            _ => {},
        }
    }

    tokens
}

/// Fuse `NUMBER SPACE NUMBER OP("/") NUMBER` into a single MIXED token and
/// drop every other SPACE token.
pub fn preprocess_mixed_numbers(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        if let [whole, space, num, slash, den, ..] = &tokens[i..]
            && whole.is(TokenKind::Number)
            && space.is(TokenKind::Space)
            && num.is(TokenKind::Number)
            && slash.is_op("/")
            && den.is(TokenKind::Number)
        {
            let text = format!("{}_{}_{}", whole.text, num.text, den.text);
            out.push(Token::new(TokenKind::Mixed, text));
            i += 5;
            continue;
        }

        if !tokens[i].is(TokenKind::Space) {
            out.push(tokens[i].clone());
        }
        i += 1;
    }

    out
}
