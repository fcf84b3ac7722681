//! Expression syntax parser
//!
//! Splits step text into literal text and `{{ ... }}` actions, then builds a
//! node tree. Supported actions:
//!
//! - `{{ .Inputs.path }}` and other operands, written to the output
//! - `{{ if cond }}` / `{{ else if cond }}` / `{{ else }}` / `{{ end }}`
//! - function calls `eq`, `ne`, `not`, `and`, `or`, with parenthesised
//!   sub-expressions
//! - `{{-` and `-}}` to trim surrounding whitespace

use crate::error::{TemplateError, TemplateResult};
use crate::value::InputValue;

/// Namespace every variable reference starts with
pub const INPUTS_NAMESPACE: &str = "Inputs";

/// Built-in functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    /// True when the first argument equals any of the others
    Eq,
    /// True when the two arguments differ
    Ne,
    /// Negation of truthiness
    Not,
    /// First falsy argument, or the last one
    And,
    /// First truthy argument, or the last one
    Or,
}

impl Function {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "eq" => Some(Function::Eq),
            "ne" => Some(Function::Ne),
            "not" => Some(Function::Not),
            "and" => Some(Function::And),
            "or" => Some(Function::Or),
            _ => None,
        }
    }

    /// Function name as written in templates
    pub fn name(&self) -> &'static str {
        match self {
            Function::Eq => "eq",
            Function::Ne => "ne",
            Function::Not => "not",
            Function::And => "and",
            Function::Or => "or",
        }
    }

    fn check_arity(&self, count: usize) -> Result<(), String> {
        let ok = match self {
            Function::Eq => count >= 2,
            Function::Ne => count == 2,
            Function::Not => count == 1,
            Function::And | Function::Or => count >= 1,
        };
        if ok {
            Ok(())
        } else {
            Err(format!(
                "wrong number of arguments for {}: got {}",
                self.name(),
                count
            ))
        }
    }
}

/// Expression inside an action
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// `.Inputs.a.b`, stored without the namespace
    Path(Vec<String>),
    /// String, number or boolean literal
    Literal(InputValue),
    /// Function call
    Call {
        /// Function to apply
        function: Function,
        /// Arguments in order
        args: Vec<Expression>,
    },
}

/// One `if` or `else if` arm
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    /// Condition guarding the arm
    pub condition: Expression,
    /// Body rendered when the condition holds
    pub body: Vec<TemplateNode>,
}

/// Parsed template element
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    /// Literal text
    Text(String),
    /// Expression written to the output
    Output(Expression),
    /// Conditional block
    Conditional {
        /// `if` arm followed by any `else if` arms
        branches: Vec<Branch>,
        /// `else` body (empty when absent)
        otherwise: Vec<TemplateNode>,
    },
}

/// Parsed template
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTemplate {
    /// Top-level nodes
    pub nodes: Vec<TemplateNode>,
}

/// Template parser
pub struct TemplateParser;

impl TemplateParser {
    /// Parse template text into a node tree
    ///
    /// # Arguments
    /// * `content` - Template text
    ///
    /// # Returns
    /// Parsed template, or a syntax error carrying the line number
    pub fn parse(content: &str) -> TemplateResult<ParsedTemplate> {
        let segments = scan(content)?;
        let mut parser = Parser {
            segments,
            position: 0,
        };
        parser.parse()
    }
}

/// Raw piece of template text
#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Action { body: String, line: usize },
}

/// Split content into text and action segments, applying trim markers
fn scan(content: &str) -> TemplateResult<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut rest = content;
    let mut line = 1;
    let mut trim_next = false;

    while let Some(start) = rest.find("{{") {
        let mut text = &rest[..start];
        if trim_next {
            text = text.trim_start();
        }
        let after_open = &rest[start + 2..];
        let action_line = line + rest[..start].matches('\n').count();

        let end = after_open.find("}}").ok_or_else(|| TemplateError::Syntax {
            line: action_line,
            message: "unclosed action".to_string(),
        })?;
        let mut body = &after_open[..end];

        if let Some(stripped) = body.strip_prefix('-') {
            if stripped.starts_with(char::is_whitespace) {
                text = text.trim_end();
                body = stripped;
            }
        }
        trim_next = false;
        if let Some(stripped) = body.strip_suffix('-') {
            if stripped.ends_with(char::is_whitespace) {
                trim_next = true;
                body = stripped;
            }
        }

        if !text.is_empty() {
            segments.push(Segment::Text(text.to_string()));
        }
        segments.push(Segment::Action {
            body: body.trim().to_string(),
            line: action_line,
        });

        line = action_line + after_open[..end].matches('\n').count();
        rest = &after_open[end + 2..];
    }

    let tail = if trim_next { rest.trim_start() } else { rest };
    if !tail.is_empty() {
        segments.push(Segment::Text(tail.to_string()));
    }

    Ok(segments)
}

/// Why a nested node list stopped
enum Terminator {
    Else { line: usize },
    ElseIf { condition: Expression },
    End,
}

/// Internal parser state machine
struct Parser {
    segments: Vec<Segment>,
    position: usize,
}

impl Parser {
    fn parse(&mut self) -> TemplateResult<ParsedTemplate> {
        let (nodes, terminator) = self.parse_nodes()?;
        match terminator {
            None => Ok(ParsedTemplate { nodes }),
            Some((_, line)) => Err(TemplateError::Syntax {
                line,
                message: "unexpected {{ end }} or {{ else }} outside of an if block".to_string(),
            }),
        }
    }

    /// Parse nodes until the end of input or a block keyword
    fn parse_nodes(&mut self) -> TemplateResult<(Vec<TemplateNode>, Option<(Terminator, usize)>)> {
        let mut nodes = Vec::new();

        while self.position < self.segments.len() {
            let segment = self.segments[self.position].clone();
            self.position += 1;

            match segment {
                Segment::Text(text) => nodes.push(TemplateNode::Text(text)),
                Segment::Action { body, line } => {
                    if body.is_empty() {
                        return Err(TemplateError::Syntax {
                            line,
                            message: "missing value for command".to_string(),
                        });
                    }

                    let (keyword, argument) = split_keyword(&body);
                    match keyword {
                        "end" if argument.is_empty() => {
                            return Ok((nodes, Some((Terminator::End, line))));
                        }
                        "else" if argument.is_empty() => {
                            return Ok((nodes, Some((Terminator::Else { line }, line))));
                        }
                        "else" => {
                            let (inner, condition) = split_keyword(argument);
                            if inner != "if" || condition.is_empty() {
                                return Err(TemplateError::Syntax {
                                    line,
                                    message: format!("unexpected '{}' after else", argument),
                                });
                            }
                            let condition = parse_expression(condition, line)?;
                            return Ok((nodes, Some((Terminator::ElseIf { condition }, line))));
                        }
                        "if" => {
                            if argument.is_empty() {
                                return Err(TemplateError::Syntax {
                                    line,
                                    message: "missing condition in if".to_string(),
                                });
                            }
                            let condition = parse_expression(argument, line)?;
                            nodes.push(self.parse_conditional(condition, line)?);
                        }
                        "end" => {
                            return Err(TemplateError::Syntax {
                                line,
                                message: "unexpected argument to end".to_string(),
                            });
                        }
                        _ => nodes.push(TemplateNode::Output(parse_expression(&body, line)?)),
                    }
                }
            }
        }

        Ok((nodes, None))
    }

    fn parse_conditional(
        &mut self,
        condition: Expression,
        line: usize,
    ) -> TemplateResult<TemplateNode> {
        let mut branches = Vec::new();
        let mut current = condition;

        loop {
            let (body, terminator) = self.parse_nodes()?;
            branches.push(Branch {
                condition: current,
                body,
            });

            match terminator {
                Some((Terminator::End, _)) => {
                    return Ok(TemplateNode::Conditional {
                        branches,
                        otherwise: Vec::new(),
                    });
                }
                Some((Terminator::ElseIf { condition }, _)) => current = condition,
                Some((Terminator::Else { line: else_line }, _)) => {
                    let (otherwise, terminator) = self.parse_nodes()?;
                    return match terminator {
                        Some((Terminator::End, _)) => {
                            Ok(TemplateNode::Conditional { branches, otherwise })
                        }
                        Some((_, line)) => Err(TemplateError::Syntax {
                            line,
                            message: "else after final else".to_string(),
                        }),
                        None => Err(TemplateError::Syntax {
                            line: else_line,
                            message: "unclosed if block: missing {{ end }}".to_string(),
                        }),
                    };
                }
                None => {
                    return Err(TemplateError::Syntax {
                        line,
                        message: "unclosed if block: missing {{ end }}".to_string(),
                    });
                }
            }
        }
    }
}

/// Split `keyword rest` on the first whitespace
fn split_keyword(body: &str) -> (&str, &str) {
    match body.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (body, ""),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LeftParen,
    RightParen,
    Str(String),
    Word(String),
}

fn tokenize(text: &str, line: usize) -> TemplateResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LeftParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RightParen);
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('n') => value.push('\n'),
                            Some('t') => value.push('\t'),
                            Some(escaped @ ('"' | '\\')) => value.push(escaped),
                            Some(other) => {
                                return Err(TemplateError::Syntax {
                                    line,
                                    message: format!("unknown escape sequence: \\{}", other),
                                });
                            }
                            None => {
                                return Err(TemplateError::Syntax {
                                    line,
                                    message: "unterminated quoted string".to_string(),
                                });
                            }
                        },
                        Some(other) => value.push(other),
                        None => {
                            return Err(TemplateError::Syntax {
                                line,
                                message: "unterminated quoted string".to_string(),
                            });
                        }
                    }
                }
                tokens.push(Token::Str(value));
            }
            '`' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some('`') => break,
                        Some(other) => value.push(other),
                        None => {
                            return Err(TemplateError::Syntax {
                                line,
                                message: "unterminated raw string".to_string(),
                            });
                        }
                    }
                }
                tokens.push(Token::Str(value));
            }
            '\'' => {
                return Err(TemplateError::Syntax {
                    line,
                    message: "single-quoted strings are not supported; use double quotes"
                        .to_string(),
                });
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '(' | ')' | '"' | '`') {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                tokens.push(Token::Word(word));
            }
        }
    }

    Ok(tokens)
}

/// Parse the body of an action into an expression
pub(crate) fn parse_expression(text: &str, line: usize) -> TemplateResult<Expression> {
    let tokens = tokenize(text, line)?;
    let mut parser = ExpressionParser {
        tokens,
        position: 0,
        line,
    };
    let expression = parser.parse_command()?;
    if let Some(token) = parser.peek() {
        return Err(parser.error(format!("unexpected {:?} in expression", token)));
    }
    Ok(expression)
}

struct ExpressionParser {
    tokens: Vec<Token>,
    position: usize,
    line: usize,
}

impl ExpressionParser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn error(&self, message: String) -> TemplateError {
        TemplateError::Syntax {
            line: self.line,
            message,
        }
    }

    /// A function call with its arguments, or a single operand
    fn parse_command(&mut self) -> TemplateResult<Expression> {
        if let Some(Token::Word(word)) = self.peek() {
            if let Some(function) = Function::from_name(word) {
                self.position += 1;
                let mut args = Vec::new();
                while !matches!(self.peek(), None | Some(Token::RightParen)) {
                    args.push(self.parse_operand()?);
                }
                function.check_arity(args.len()).map_err(|m| self.error(m))?;
                return Ok(Expression::Call { function, args });
            }
        }

        let operand = self.parse_operand()?;
        if !matches!(self.peek(), None | Some(Token::RightParen)) {
            return Err(self.error("can't give argument to non-function".to_string()));
        }
        Ok(operand)
    }

    fn parse_operand(&mut self) -> TemplateResult<Expression> {
        match self.next() {
            Some(Token::LeftParen) => {
                let inner = self.parse_command()?;
                match self.next() {
                    Some(Token::RightParen) => Ok(inner),
                    _ => Err(self.error("unclosed left paren".to_string())),
                }
            }
            Some(Token::RightParen) => Err(self.error("unexpected right paren".to_string())),
            Some(Token::Str(value)) => Ok(Expression::Literal(InputValue::String(value))),
            Some(Token::Word(word)) => self.parse_word(&word),
            None => Err(self.error("missing operand".to_string())),
        }
    }

    fn parse_word(&self, word: &str) -> TemplateResult<Expression> {
        match word {
            "true" => return Ok(Expression::Literal(InputValue::Bool(true))),
            "false" => return Ok(Expression::Literal(InputValue::Bool(false))),
            _ => {}
        }

        if let Some(path) = word.strip_prefix('.') {
            let mut segments = path.split('.');
            let namespace = segments.next().unwrap_or_default();
            if namespace != INPUTS_NAMESPACE {
                return Err(self.error(format!(
                    "unknown field '.{}': variables are read from .{}",
                    namespace, INPUTS_NAMESPACE
                )));
            }
            let segments: Vec<String> = segments.map(str::to_string).collect();
            if segments.iter().any(String::is_empty) {
                return Err(self.error(format!("malformed path: {}", word)));
            }
            return Ok(Expression::Path(segments));
        }

        if let Ok(integer) = word.parse::<i64>() {
            return Ok(Expression::Literal(InputValue::Integer(integer)));
        }
        if word.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '+') {
            if let Ok(float) = word.parse::<f64>() {
                return Ok(Expression::Literal(InputValue::Float(float)));
            }
        }

        if Function::from_name(word).is_some() {
            return Err(self.error(format!(
                "function {} must be wrapped in parentheses when used as an argument",
                word
            )));
        }

        Err(self.error(format!("function \"{}\" not defined", word)))
    }
}
