//! Recursive descent parser for PHP fragments
//!
//! Statements are parsed by recursive descent, expressions by precedence
//! climbing over rowan checkpoints. Parsing is total: every input produces a
//! tree, and malformed input is recorded in `errors` and wrapped in `ERROR`
//! nodes.

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder};
use text_size::{TextRange, TextSize};

use super::lexer::{Lexer, Token};
use super::syntax_kind::{SyntaxKind, SyntaxNode};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse PHP source (with or without an open tag) into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens, TextSize::of(input));
    parser.parse_source_file();
    parser.finish()
}

/// Binding power of the right operand of unary `!`.
const BANG_BP: u8 = 36;
/// Binding power of the right operand of the other prefix operators.
const PREFIX_BP: u8 = 39;
/// Binding power of the right operand of assignments and `print`.
const ASSIGN_RHS_BP: u8 = 7;

/// (left, right) binding powers and node kind of an infix operator.
fn infix_binding_power(kind: SyntaxKind) -> Option<(u8, u8, SyntaxKind)> {
    use SyntaxKind::*;
    let (left, right) = match kind {
        OR_KW => (1, 2),
        XOR_KW => (3, 4),
        AND_KW => (5, 6),
        QUESTION => (10, 11),
        QUESTION_QUESTION => (13, 12),
        PIPE_PIPE => (14, 15),
        AMP_AMP => (16, 17),
        PIPE => (18, 19),
        CARET => (20, 21),
        AMP => (22, 23),
        EQ_EQ | BANG_EQ | EQ_EQ_EQ | BANG_EQ_EQ | SPACESHIP => (24, 25),
        LT | GT | LT_EQ | GT_EQ => (26, 27),
        DOT => (28, 29),
        SHL | SHR => (30, 31),
        PLUS | MINUS => (32, 33),
        STAR | SLASH | PERCENT => (34, 35),
        INSTANCEOF_KW => (37, 38),
        STAR_STAR => (41, 40),
        // Assignments bind to the nearest operand on the left: `!$a = f()`
        k if k.is_assignment_op() => return Some((100, ASSIGN_RHS_BP, ASSIGN_EXPR)),
        _ => return None,
    };
    let node = match kind {
        QUESTION => TERNARY_EXPR,
        _ => BINARY_EXPR,
    };
    Some((left, right, node))
}

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    end: TextSize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>], end: TextSize) -> Self {
        Self {
            tokens,
            pos: 0,
            end,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection (trivia is skipped transparently)
    // =========================================================================

    fn nth_token(&self, n: usize) -> Option<&Token<'a>> {
        self.tokens[self.pos..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
    }

    fn current_kind(&self) -> SyntaxKind {
        self.nth(0)
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_token(n).map(|t| t.kind).unwrap_or(SyntaxKind::ERROR)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.nth_token(0).is_some_and(|t| t.kind == kind)
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        self.nth_token(0).is_some_and(|t| kinds.contains(&t.kind))
    }

    fn at_eof(&self) -> bool {
        self.nth_token(0).is_none()
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn skip_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos).filter(|t| t.kind.is_trivia()) {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn bump(&mut self) {
        self.skip_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {:?}", kind));
            false
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: impl Into<String>) {
        let range = self
            .nth_token(0)
            .map(|t| TextRange::at(t.offset, TextSize::of(t.text)))
            .unwrap_or_else(|| TextRange::empty(self.end));
        self.errors.push(SyntaxError::new(message, range));
    }

    fn error_recover(&mut self, message: impl Into<String>, recovery: &[SyntaxKind]) {
        self.error(message);
        self.start_node(SyntaxKind::ERROR);
        // Always consume at least one token to make progress
        if !self.at_eof() {
            self.bump();
        }
        while !self.at_eof() && !self.at_any(recovery) {
            self.bump();
        }
        self.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.skip_trivia();
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.skip_trivia();
        self.builder.checkpoint()
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_source_file(&mut self) {
        self.builder.start_node(SyntaxKind::SOURCE_FILE.into());
        while !self.at_eof() {
            self.statement();
        }
        self.skip_trivia();
        self.finish_node();
    }

    fn statement(&mut self) {
        use SyntaxKind::*;
        match self.current_kind() {
            OPEN_TAG | CLOSE_TAG | SEMICOLON => self.bump(),
            L_BRACE => self.block(),
            ECHO_KW => self.echo_stmt(),
            RETURN_KW => self.return_stmt(),
            IF_KW => self.if_stmt(),
            FOREACH_KW => self.foreach_stmt(),
            FOR_KW => self.for_stmt(),
            WHILE_KW => self.while_stmt(),
            SWITCH_KW => self.switch_stmt(),
            BREAK_KW | CONTINUE_KW => self.break_stmt(),
            USE_KW => self.use_stmt(),
            GLOBAL_KW => self.global_stmt(),
            FUNCTION_KW if self.nth(1) == NAME => self.function_decl(),
            _ => self.expr_stmt(),
        }
    }

    /// `;`, `?>`, or nothing before `}` and the end of input.
    fn terminator(&mut self) {
        if self.eat(SyntaxKind::SEMICOLON) || self.at_eof() {
            return;
        }
        if self.at_any(&[SyntaxKind::CLOSE_TAG, SyntaxKind::R_BRACE]) {
            return;
        }
        self.error("expected ';'");
    }

    fn expr_stmt(&mut self) {
        self.start_node(SyntaxKind::EXPR_STMT);
        if self.expr() {
            self.terminator();
        } else {
            self.error_recover(
                "expected statement",
                &[SyntaxKind::SEMICOLON, SyntaxKind::R_BRACE, SyntaxKind::CLOSE_TAG],
            );
            self.eat(SyntaxKind::SEMICOLON);
        }
        self.finish_node();
    }

    fn block(&mut self) {
        self.start_node(SyntaxKind::BLOCK);
        self.expect(SyntaxKind::L_BRACE);
        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            self.statement();
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    fn echo_stmt(&mut self) {
        self.start_node(SyntaxKind::ECHO_STMT);
        self.bump();
        self.expr_list();
        self.terminator();
        self.finish_node();
    }

    fn return_stmt(&mut self) {
        self.start_node(SyntaxKind::RETURN_STMT);
        self.bump();
        if !self.at_any(&[SyntaxKind::SEMICOLON, SyntaxKind::CLOSE_TAG]) {
            self.expr();
        }
        self.terminator();
        self.finish_node();
    }

    /// `(expr)` of a control statement.
    fn condition(&mut self) {
        self.expect(SyntaxKind::L_PAREN);
        if !self.expr() {
            self.error("expected condition");
        }
        self.expect(SyntaxKind::R_PAREN);
    }

    /// Statement body, or nothing at the end of input.
    fn body(&mut self) {
        if self.at_eof() {
            self.error("expected statement");
        } else {
            self.statement();
        }
    }

    fn if_stmt(&mut self) {
        self.start_node(SyntaxKind::IF_STMT);
        self.bump();
        self.condition();
        self.body();
        loop {
            match self.current_kind() {
                SyntaxKind::ELSEIF_KW => {
                    self.start_node(SyntaxKind::ELSE_CLAUSE);
                    self.bump();
                    self.condition();
                    self.body();
                    self.finish_node();
                }
                SyntaxKind::ELSE_KW => {
                    self.start_node(SyntaxKind::ELSE_CLAUSE);
                    self.bump();
                    self.body();
                    self.finish_node();
                    break;
                }
                _ => break,
            }
        }
        self.finish_node();
    }

    fn foreach_stmt(&mut self) {
        self.start_node(SyntaxKind::FOREACH_STMT);
        self.bump();
        self.expect(SyntaxKind::L_PAREN);
        if !self.expr() {
            self.error("expected iterable");
        }
        if self.expect(SyntaxKind::AS_KW) {
            self.eat(SyntaxKind::AMP);
            if !self.expr() {
                self.error("expected loop variable");
            }
            if self.eat(SyntaxKind::FAT_ARROW) {
                self.eat(SyntaxKind::AMP);
                if !self.expr() {
                    self.error("expected loop variable");
                }
            }
        }
        self.expect(SyntaxKind::R_PAREN);
        self.body();
        self.finish_node();
    }

    fn for_stmt(&mut self) {
        self.start_node(SyntaxKind::FOR_STMT);
        self.bump();
        self.expect(SyntaxKind::L_PAREN);
        for separator in [SyntaxKind::SEMICOLON, SyntaxKind::SEMICOLON, SyntaxKind::R_PAREN] {
            if !self.at(separator) {
                self.expr_list();
            }
            self.expect(separator);
        }
        self.body();
        self.finish_node();
    }

    fn while_stmt(&mut self) {
        self.start_node(SyntaxKind::WHILE_STMT);
        self.bump();
        self.condition();
        self.body();
        self.finish_node();
    }

    fn switch_stmt(&mut self) {
        use SyntaxKind::*;
        self.start_node(SWITCH_STMT);
        self.bump();
        self.condition();
        if self.expect(L_BRACE) {
            while !self.at_eof() && !self.at(R_BRACE) {
                if self.at_any(&[CASE_KW, DEFAULT_KW]) {
                    self.case_clause();
                } else {
                    self.error_recover("expected 'case' or 'default'", &[CASE_KW, DEFAULT_KW, R_BRACE]);
                }
            }
            self.expect(R_BRACE);
        }
        self.finish_node();
    }

    fn case_clause(&mut self) {
        use SyntaxKind::*;
        self.start_node(CASE_CLAUSE);
        if self.eat(CASE_KW) {
            if !self.expr() {
                self.error("expected case value");
            }
        } else {
            self.eat(DEFAULT_KW);
        }
        if !self.eat(COLON) && !self.eat(SEMICOLON) {
            self.error("expected ':'");
        }
        while !self.at_eof() && !self.at_any(&[CASE_KW, DEFAULT_KW, R_BRACE]) {
            self.statement();
        }
        self.finish_node();
    }

    fn break_stmt(&mut self) {
        self.start_node(SyntaxKind::BREAK_STMT);
        self.bump();
        self.eat(SyntaxKind::INT_NUMBER);
        self.terminator();
        self.finish_node();
    }

    /// `use Foo\Bar as Baz, Qux;` and `use function foo;`
    fn use_stmt(&mut self) {
        self.start_node(SyntaxKind::USE_STMT);
        self.bump();
        if self.at(SyntaxKind::FUNCTION_KW) || (self.at(SyntaxKind::NAME) && self.nth(1) == SyntaxKind::NAME) {
            self.bump();
        }
        loop {
            if !self.eat(SyntaxKind::NAME) {
                self.error("expected name");
                break;
            }
            if self.eat(SyntaxKind::AS_KW) {
                self.expect(SyntaxKind::NAME);
            }
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.terminator();
        self.finish_node();
    }

    fn global_stmt(&mut self) {
        self.start_node(SyntaxKind::GLOBAL_STMT);
        self.bump();
        loop {
            if self.at(SyntaxKind::VARIABLE) {
                self.start_node(SyntaxKind::VAR_REF);
                self.bump();
                self.finish_node();
            } else {
                self.error("expected variable");
                break;
            }
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.terminator();
        self.finish_node();
    }

    fn function_decl(&mut self) {
        self.start_node(SyntaxKind::FUNCTION_DECL);
        self.bump();
        self.bump(); // name
        self.param_list();
        self.return_type();
        if self.at(SyntaxKind::L_BRACE) {
            self.block();
        } else {
            self.error("expected function body");
        }
        self.finish_node();
    }

    // =========================================================================
    // Functions
    // =========================================================================

    fn param_list(&mut self) {
        use SyntaxKind::*;
        self.start_node(PARAM_LIST);
        if self.expect(L_PAREN) {
            while !self.at_eof() && !self.at(R_PAREN) {
                self.param();
                if !self.eat(COMMA) {
                    break;
                }
            }
            self.expect(R_PAREN);
        }
        self.finish_node();
    }

    fn param(&mut self) {
        use SyntaxKind::*;
        self.start_node(PARAM);
        if !self.at_any(&[VARIABLE, AMP, ELLIPSIS]) {
            self.type_hint();
        }
        self.eat(AMP);
        self.eat(ELLIPSIS);
        if !self.eat(VARIABLE) {
            self.error("expected parameter");
            if !self.at_any(&[COMMA, R_PAREN]) && !self.at_eof() {
                self.bump();
            }
        }
        if self.eat(EQ) && !self.expr() {
            self.error("expected default value");
        }
        self.finish_node();
    }

    fn return_type(&mut self) {
        if self.eat(SyntaxKind::COLON) {
            self.type_hint();
        }
    }

    /// `?Foo`, `int|string`, `array`, `static`
    fn type_hint(&mut self) {
        self.start_node(SyntaxKind::TYPE);
        self.eat(SyntaxKind::QUESTION);
        loop {
            if self.current_kind().is_name_like() {
                self.bump();
            } else {
                self.error("expected type");
                break;
            }
            if !self.eat(SyntaxKind::PIPE) {
                break;
            }
        }
        self.finish_node();
    }

    /// `function (...) use (...) { ... }`, optionally `static`.
    fn closure(&mut self, checkpoint: Checkpoint) {
        use SyntaxKind::*;
        self.start_node_at(checkpoint, CLOSURE_EXPR);
        self.eat(STATIC_KW);
        self.expect(FUNCTION_KW);
        self.eat(AMP);
        self.param_list();
        if self.at(USE_KW) {
            self.start_node(CLOSURE_USE);
            self.bump();
            if self.expect(L_PAREN) {
                while self.at_any(&[VARIABLE, AMP]) {
                    self.eat(AMP);
                    self.start_node(VAR_REF);
                    self.expect(VARIABLE);
                    self.finish_node();
                    if !self.eat(COMMA) {
                        break;
                    }
                }
                self.expect(R_PAREN);
            }
            self.finish_node();
        }
        self.return_type();
        if self.at(L_BRACE) {
            self.block();
        } else {
            self.error("expected closure body");
        }
        self.finish_node();
    }

    /// `fn (...) => expr`, optionally `static`.
    fn arrow_fn(&mut self, checkpoint: Checkpoint) {
        use SyntaxKind::*;
        self.start_node_at(checkpoint, ARROW_FN);
        self.eat(STATIC_KW);
        self.expect(FN_KW);
        self.eat(AMP);
        self.param_list();
        self.return_type();
        if self.expect(FAT_ARROW) && !self.expr_bp(ASSIGN_RHS_BP) {
            self.error("expected expression");
        }
        self.finish_node();
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn expr(&mut self) -> bool {
        self.expr_bp(0)
    }

    /// Comma-separated expressions.
    fn expr_list(&mut self) {
        loop {
            if !self.expr() {
                self.error("expected expression");
                break;
            }
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
    }

    /// Parse an expression whose operators bind at least as tight as `min_bp`.
    ///
    /// Returns `false` without consuming anything when no expression starts here.
    fn expr_bp(&mut self, min_bp: u8) -> bool {
        let checkpoint = self.checkpoint();
        if !self.lhs(checkpoint) {
            return false;
        }

        loop {
            let kind = self.current_kind();
            if self.postfix(checkpoint, kind) {
                continue;
            }

            let Some((left_bp, right_bp, node)) = infix_binding_power(kind) else {
                break;
            };
            if left_bp < min_bp {
                break;
            }

            self.start_node_at(checkpoint, node);
            self.bump();
            match kind {
                SyntaxKind::QUESTION => self.ternary_rest(right_bp),
                SyntaxKind::INSTANCEOF_KW => {
                    if !self.class_reference() && !self.expr_bp(right_bp) {
                        self.error("expected class name");
                    }
                }
                _ => {
                    if !self.expr_bp(right_bp) {
                        self.error("expected expression");
                    }
                }
            }
            self.finish_node();
        }
        true
    }

    /// Everything after `?` in `a ? b : c` and `a ?: c`.
    fn ternary_rest(&mut self, right_bp: u8) {
        if !self.at(SyntaxKind::COLON) && !self.expr_bp(ASSIGN_RHS_BP) {
            self.error("expected expression");
        }
        if self.expect(SyntaxKind::COLON) && !self.expr_bp(right_bp) {
            self.error("expected expression");
        }
    }

    /// Member access, static access, calls, indexing and `++`/`--`.
    fn postfix(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) -> bool {
        use SyntaxKind::*;
        match kind {
            ARROW | NULLSAFE_ARROW => {
                self.start_node_at(checkpoint, MEMBER_EXPR);
                self.bump();
                self.member_name(false);
                self.finish_node();
            }
            COLON_COLON => {
                self.start_node_at(checkpoint, SCOPED_EXPR);
                self.bump();
                self.member_name(true);
                self.finish_node();
            }
            L_PAREN => {
                self.start_node_at(checkpoint, CALL_EXPR);
                self.arg_list();
                self.finish_node();
            }
            L_BRACKET => {
                self.start_node_at(checkpoint, INDEX_EXPR);
                self.bump();
                if !self.at(R_BRACKET) {
                    self.expr();
                }
                self.expect(R_BRACKET);
                self.finish_node();
            }
            PLUS_PLUS | MINUS_MINUS => {
                self.start_node_at(checkpoint, POSTFIX_EXPR);
                self.bump();
                self.finish_node();
            }
            _ => return false,
        }
        true
    }

    /// The member after `->` or `::`. A missing name is an error, not a failure:
    /// the access node is kept with no member.
    fn member_name(&mut self, scoped: bool) {
        use SyntaxKind::*;
        let kind = self.current_kind();
        if kind.is_name_like() {
            self.bump();
        } else if kind == VARIABLE {
            self.bump();
        } else if kind == L_BRACE && !scoped {
            self.bump();
            self.expr();
            self.expect(R_BRACE);
        } else {
            self.error("expected member name");
        }
    }

    fn arg_list(&mut self) {
        use SyntaxKind::*;
        self.start_node(ARG_LIST);
        self.expect(L_PAREN);
        while !self.at_eof() && !self.at(R_PAREN) {
            self.start_node(ARG);
            // Named arguments: `name: value`
            if self.current_kind().is_name_like() && self.nth(1) == COLON {
                self.bump();
                self.bump();
            }
            self.eat(ELLIPSIS);
            let parsed = self.expr();
            self.finish_node();
            if !parsed {
                if self.at(ELLIPSIS) {
                    // first-class callable syntax `strlen(...)`
                    self.bump();
                } else if !self.at_any(&[COMMA, R_PAREN]) {
                    self.error_recover("expected argument", &[COMMA, R_PAREN, SEMICOLON]);
                }
            }
            if !self.eat(COMMA) {
                break;
            }
        }
        self.expect(R_PAREN);
        self.finish_node();
    }

    /// Class name after `new` or `instanceof`.
    fn class_reference(&mut self) -> bool {
        use SyntaxKind::*;
        if self.at_any(&[NAME, STATIC_KW]) {
            self.start_node(NAME_REF);
            self.bump();
            self.finish_node();
            true
        } else if self.at(VARIABLE) {
            self.start_node(VAR_REF);
            self.bump();
            self.finish_node();
            true
        } else {
            false
        }
    }

    fn lhs(&mut self, checkpoint: Checkpoint) -> bool {
        use SyntaxKind::*;
        match self.current_kind() {
            VARIABLE => {
                self.start_node(VAR_REF);
                self.bump();
                self.finish_node();
            }
            DOLLAR => {
                // `$$name`, `${expr}`
                self.start_node(VAR_REF);
                self.bump();
                if self.eat(L_BRACE) {
                    self.expr();
                    self.expect(R_BRACE);
                } else if !self.expr_bp(PREFIX_BP) {
                    self.error("expected variable");
                }
                self.finish_node();
            }
            NAME => {
                self.start_node(NAME_REF);
                self.bump();
                self.finish_node();
            }
            STATIC_KW if self.nth(1) == FUNCTION_KW => self.closure(checkpoint),
            STATIC_KW if self.nth(1) == FN_KW => self.arrow_fn(checkpoint),
            STATIC_KW => {
                self.start_node(NAME_REF);
                self.bump();
                self.finish_node();
            }
            FUNCTION_KW => self.closure(checkpoint),
            FN_KW => self.arrow_fn(checkpoint),
            INT_NUMBER | FLOAT_NUMBER | STRING | TRUE_KW | FALSE_KW | NULL_KW => {
                self.start_node(LITERAL);
                self.bump();
                self.finish_node();
            }
            L_BRACKET => self.array(R_BRACKET),
            ARRAY_KW if self.nth(1) == L_PAREN => self.array(R_PAREN),
            L_PAREN => {
                self.start_node(PAREN_EXPR);
                self.bump();
                if !self.expr() {
                    self.error("expected expression");
                }
                self.expect(R_PAREN);
                self.finish_node();
            }
            CAST => {
                self.start_node(CAST_EXPR);
                self.bump();
                if !self.expr_bp(PREFIX_BP) {
                    self.error("expected expression");
                }
                self.finish_node();
            }
            BANG => self.prefix(BANG_BP),
            MINUS | PLUS | TILDE | AT | PLUS_PLUS | MINUS_MINUS | AMP => self.prefix(PREFIX_BP),
            PRINT_KW => self.prefix(ASSIGN_RHS_BP),
            THROW_KW => self.prefix(0),
            NEW_KW => {
                self.start_node(NEW_EXPR);
                self.bump();
                if !self.class_reference() {
                    self.error("expected class name");
                }
                if self.at(L_PAREN) {
                    self.arg_list();
                }
                self.finish_node();
            }
            CLONE_KW => self.prefix_node(CLONE_EXPR, PREFIX_BP),
            MATCH_KW if self.nth(1) == L_PAREN => self.match_expr(),
            _ => return false,
        }
        true
    }

    fn prefix(&mut self, bp: u8) {
        self.prefix_node(SyntaxKind::UNARY_EXPR, bp);
    }

    fn prefix_node(&mut self, kind: SyntaxKind, bp: u8) {
        self.start_node(kind);
        self.bump();
        if !self.expr_bp(bp) {
            self.error("expected expression");
        }
        self.finish_node();
    }

    /// `match ($subject) { $a, $b => $x, default => $y }`
    fn match_expr(&mut self) {
        use SyntaxKind::*;
        self.start_node(MATCH_EXPR);
        self.bump();
        self.condition();
        if self.expect(L_BRACE) {
            while !self.at_eof() && !self.at(R_BRACE) {
                self.start_node(MATCH_ARM);
                if !self.eat(DEFAULT_KW) {
                    loop {
                        if !self.expr() {
                            self.error("expected match condition");
                            break;
                        }
                        if !self.eat(COMMA) || self.at(FAT_ARROW) {
                            break;
                        }
                    }
                }
                if self.expect(FAT_ARROW) && !self.expr() {
                    self.error("expected expression");
                }
                self.finish_node();
                if !self.eat(COMMA) {
                    break;
                }
            }
            self.expect(R_BRACE);
        }
        self.finish_node();
    }

    /// `[...]` or `array(...)`.
    fn array(&mut self, close: SyntaxKind) {
        use SyntaxKind::*;
        self.start_node(ARRAY_EXPR);
        self.eat(ARRAY_KW);
        self.bump();
        while !self.at_eof() && !self.at(close) {
            self.start_node(ARRAY_ELEMENT);
            self.eat(ELLIPSIS);
            self.eat(AMP);
            let parsed = self.expr();
            if parsed && self.eat(FAT_ARROW) {
                self.eat(AMP);
                if !self.expr() {
                    self.error("expected value");
                }
            }
            self.finish_node();
            if !parsed && !self.at_any(&[COMMA, close]) {
                self.error_recover("expected array element", &[COMMA, close, SEMICOLON]);
            }
            if !self.eat(COMMA) {
                break;
            }
        }
        self.expect(close);
        self.finish_node();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(input: &str) -> String {
        format!("{:#?}", parse(input).syntax())
    }

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        parse(input).syntax().descendants().map(|n| n.kind()).collect()
    }

    #[test]
    fn test_lossless() {
        let input = "<?php\nif ($a) { echo $b->c( 1, 'x' ); } // done\n$d = fn($x) => $x * 2;";
        let parse = parse(input);
        assert_eq!(parse.syntax().to_string(), input);
        assert!(parse.ok(), "{:?}", parse.errors);
    }

    #[test]
    fn test_assignment_binds_right() {
        let parse = parse("$a = $b ?? 'x';");
        assert!(parse.ok());
        let root = parse.syntax();
        let stmt = root.first_child().expect("statement");
        let assign = stmt.first_child().expect("assignment");
        assert_eq!(assign.kind(), SyntaxKind::ASSIGN_EXPR);
        let rhs = assign.children().nth(1).expect("rhs");
        assert_eq!(rhs.kind(), SyntaxKind::BINARY_EXPR);
    }

    #[test]
    fn test_precedence() {
        let parse = parse("1 + 2 * 3;");
        let root = parse.syntax();
        let binary = root.first_child().and_then(|s| s.first_child()).expect("binary");
        assert_eq!(binary.kind(), SyntaxKind::BINARY_EXPR);
        let children: Vec<_> = binary.children().map(|n| n.kind()).collect();
        assert_eq!(children, vec![SyntaxKind::LITERAL, SyntaxKind::BINARY_EXPR]);
    }

    #[test]
    fn test_method_chain() {
        let k = kinds("$user->posts()->first();");
        let calls = k.iter().filter(|k| **k == SyntaxKind::CALL_EXPR).count();
        let members = k.iter().filter(|k| **k == SyntaxKind::MEMBER_EXPR).count();
        assert_eq!((calls, members), (2, 2));
    }

    #[test]
    fn test_static_call() {
        let k = kinds("User::where('a', 1)->get();");
        assert!(k.contains(&SyntaxKind::SCOPED_EXPR));
        assert!(k.contains(&SyntaxKind::NAME_REF));
    }

    #[test]
    fn test_missing_member_is_recorded() {
        let parse = parse("echo $obj->;");
        assert!(!parse.ok());
        let k: Vec<_> = parse.syntax().descendants().map(|n| n.kind()).collect();
        assert!(k.contains(&SyntaxKind::MEMBER_EXPR));
        assert_eq!(parse.syntax().to_string(), "echo $obj->;");
    }

    #[test]
    fn test_control_wrappers_parse() {
        for input in [
            "if     ($a > 1){}",
            "foreach($users as $key => $user){}",
            "for    ($i = 0; $i < 10; $i++){}",
            "while  ($x){}",
            "switch ($x){}",
            "array  ('nav', ['a' => 1]);",
            "{ $a = 1; \n}",
            "echo $a;",
            "return $a;",
        ] {
            let parse = parse(input);
            assert!(parse.ok(), "{input}: {:?}", parse.errors);
        }
    }

    #[test]
    fn test_switch_cases() {
        let parse = parse("switch ($a) { case 1: echo 1; break; default: echo 2; }");
        assert!(parse.ok(), "{:?}", parse.errors);
        let cases = parse
            .syntax()
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::CASE_CLAUSE)
            .count();
        assert_eq!(cases, 2);
    }

    #[test]
    fn test_closures_and_types() {
        let input = "$f = static function (?int $a, string ...$rest) use (&$b): array { return [$a]; };";
        let parse = parse(input);
        assert!(parse.ok(), "{:?}", parse.errors);
        assert!(tree(input).contains("CLOSURE_USE"));
    }

    #[test]
    fn test_match_expression() {
        let input = "$label = match ($status) { 'a', 'b', => route('x'), default => $user->name };";
        let parse = parse(input);
        assert!(parse.ok(), "{:?}", parse.errors);
        let k = kinds(input);
        assert!(k.contains(&SyntaxKind::MATCH_EXPR));
        let arms = k.iter().filter(|k| **k == SyntaxKind::MATCH_ARM).count();
        assert_eq!(arms, 2);
        assert!(k.contains(&SyntaxKind::MEMBER_EXPR));
    }

    #[test]
    fn test_match_as_member_name() {
        let parse = parse("Str::match('/a/', $s) . $re->match($s);");
        assert!(parse.ok(), "{:?}", parse.errors);
        assert!(!kinds("Str::match('/a/', $s);").contains(&SyntaxKind::MATCH_EXPR));
    }

    #[test]
    fn test_garbage_still_produces_tree() {
        for input in ["}}}", "$a = ;", "foo(,", "new", "$a->{", "if (", "[1, 2", "fn(", "match ($a) { 1 =>", "match ($a) { ; }"] {
            let parse = parse(input);
            assert_eq!(parse.syntax().to_string(), input);
        }
    }
}
