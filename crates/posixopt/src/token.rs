//! Lexical pass: raw argument strings to [`Token`]s.
//!
//! The tokenizer knows nothing about which options exist. It only applies
//! the POSIX/GNU surface rules:
//! - `--` ends option parsing; everything after it is an operand
//! - `--name` and `--name=value` are long options
//! - `-a` is a short option; `-avalue` is `a` with an attached value
//! - `-123` (and `-o123`) cluster into one short option per character,
//!   because an all-digit tail is read as a cluster rather than a value
//! - everything else, including a bare `-`, is an operand

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    ShortOption,
    LongOption,
    Terminator,
    Operand,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached: Option<String>,
}

impl Token {
    pub fn short(name: char) -> Self {
        Self {
            kind: TokenKind::ShortOption,
            value: name.to_string(),
            attached: None,
        }
    }

    pub fn short_with_value(name: char, attached: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::ShortOption,
            value: name.to_string(),
            attached: Some(attached.into()),
        }
    }

    pub fn long(name: impl Into<String>, attached: Option<String>) -> Self {
        Self {
            kind: TokenKind::LongOption,
            value: name.into(),
            attached,
        }
    }

    pub fn terminator() -> Self {
        Self {
            kind: TokenKind::Terminator,
            value: "--".to_string(),
            attached: None,
        }
    }

    pub fn operand(value: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Operand,
            value: value.into(),
            attached: None,
        }
    }
}

/// Output of [`tokenize`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    /// Whether a `--` terminator was seen.
    pub terminated: bool,
}

/// Tokenize `args` without keeping any state between calls.
pub fn tokenize<I, S>(args: I) -> Tokenized
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = Tokenized::default();

    for arg in args {
        let arg = arg.as_ref();

        if out.terminated {
            out.tokens.push(Token::operand(arg));
            continue;
        }

        if arg == "--" {
            out.terminated = true;
            out.tokens.push(Token::terminator());
            continue;
        }

        if let Some(long) = arg.strip_prefix("--") {
            let token = match long.split_once('=') {
                Some((name, value)) => Token::long(name, Some(value.to_string())),
                None => Token::long(long, None),
            };
            out.tokens.push(token);
            continue;
        }

        match arg.strip_prefix('-') {
            Some(short) if !short.is_empty() => push_short(&mut out.tokens, short),
            _ => out.tokens.push(Token::operand(arg)),
        }
    }

    out
}

fn push_short(tokens: &mut Vec<Token>, short: &str) {
    let mut chars = short.chars();
    let Some(first) = chars.next() else {
        return;
    };
    let tail = chars.as_str();

    if tail.is_empty() {
        tokens.push(Token::short(first));
    } else if tail.chars().all(|c| c.is_ascii_digit()) {
        tokens.extend(short.chars().map(Token::short));
    } else {
        tokens.push(Token::short_with_value(first, tail));
    }
}

/// Stateful wrapper around [`tokenize`] that remembers whether the last
/// call saw a terminator.
///
/// `tokenize` takes `&mut self`, so a single instance cannot be shared
/// between concurrent parses.
#[derive(Debug, Default)]
pub struct Tokenizer {
    terminated: bool,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokenize<I, S>(&mut self, args: I) -> Vec<Token>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.terminated = false;
        let Tokenized { tokens, terminated } = tokenize(args);
        self.terminated = terminated;
        tokens
    }

    /// Whether the most recent [`Tokenizer::tokenize`] call saw `--`.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        let mut tokenizer = Tokenizer::new();
        assert!(!tokenizer.is_terminated());
        assert!(tokenizer.tokenize(Vec::<String>::new()).is_empty());
        assert!(!tokenizer.is_terminated());
    }

    #[test]
    fn terminated_flag_resets_per_call() {
        let mut tokenizer = Tokenizer::new();
        tokenizer.tokenize(["a", "--", "b"]);
        assert!(tokenizer.is_terminated());
        tokenizer.tokenize(["a", "b"]);
        assert!(!tokenizer.is_terminated());
    }

    #[test]
    fn long_option_splits_on_first_equals() {
        let out = tokenize(["--output=file.txt"]).tokens;
        assert_eq!(out, vec![Token::long("output", Some("file.txt".to_string()))]);

        let out = tokenize(["--define=a=b", "--verbose"]).tokens;
        assert_eq!(out[0], Token::long("define", Some("a=b".to_string())));
        assert_eq!(out[1], Token::long("verbose", None));

        let out = tokenize(["--empty="]).tokens;
        assert_eq!(out[0], Token::long("empty", Some(String::new())));
    }

    #[test]
    fn short_option_forms() {
        assert_eq!(tokenize(["-a"]).tokens, vec![Token::short('a')]);
        assert_eq!(
            tokenize(["-abc"]).tokens,
            vec![Token::short_with_value('a', "bc")]
        );
        assert_eq!(
            tokenize(["-a=value"]).tokens,
            vec![Token::short_with_value('a', "=value")]
        );
    }

    #[test]
    fn all_digit_tail_clusters() {
        assert_eq!(
            tokenize(["-123"]).tokens,
            vec![Token::short('1'), Token::short('2'), Token::short('3')]
        );
        assert_eq!(
            tokenize(["-o123"]).tokens,
            vec![
                Token::short('o'),
                Token::short('1'),
                Token::short('2'),
                Token::short('3'),
            ]
        );
        assert_eq!(
            tokenize(["-o12x"]).tokens,
            vec![Token::short_with_value('o', "12x")]
        );
    }

    #[test]
    fn bare_dash_and_words_are_operands() {
        let out = tokenize(["-", "file", ""]).tokens;
        assert_eq!(
            kinds(&out),
            vec![TokenKind::Operand, TokenKind::Operand, TokenKind::Operand]
        );
        assert_eq!(out[0].value, "-");
    }

    #[test]
    fn non_ascii_short_option() {
        assert_eq!(
            tokenize(["-éx"]).tokens,
            vec![Token::short_with_value('é', "x")]
        );
    }

    #[test]
    fn second_terminator_is_an_operand() {
        let out = tokenize(["--", "--", "-v"]).tokens;
        assert_eq!(
            out,
            vec![Token::terminator(), Token::operand("--"), Token::operand("-v")]
        );
    }

    proptest! {
        #[test]
        fn everything_after_terminator_is_verbatim(rest in proptest::collection::vec(".*", 0..8)) {
            let mut args = vec!["--".to_string()];
            args.extend(rest.iter().cloned());
            let out = tokenize(&args);
            prop_assert!(out.terminated);
            prop_assert_eq!(out.tokens.len(), rest.len() + 1);
            prop_assert_eq!(out.tokens[0].kind, TokenKind::Terminator);
            for (token, original) in out.tokens[1..].iter().zip(&rest) {
                prop_assert_eq!(token.kind, TokenKind::Operand);
                prop_assert_eq!(&token.value, original);
                prop_assert!(token.attached.is_none());
            }
        }
    }
}
