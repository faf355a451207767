//! Recursive descent parser for module headers.
//!
//! The `HeaderParser` struct provides primitive operations (advance, expect,
//! eat) and list recovery. Top-level methods find `module` declarations, parse
//! their parameter and ANSI port lists, and skip each body to `endmodule`.

use crate::ast::*;
use crate::suggest::suggest_direction;
use crate::token::{SvToken, Token};
use tbgen_common::{Ident, Interner};
use tbgen_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Label, SuggestedFix};
use tbgen_source::{FileId, Span};

/// A recursive descent parser over the tokens of one file.
pub struct HeaderParser<'src> {
    tokens: Vec<Token>,
    pos: usize,
    source: &'src str,
    file: FileId,
    interner: &'src Interner,
    sink: &'src DiagnosticSink,
}

impl<'src> HeaderParser<'src> {
    /// Creates a parser. `tokens` must have been lexed from `source`.
    pub fn new(
        tokens: Vec<Token>,
        source: &'src str,
        file: FileId,
        interner: &'src Interner,
        sink: &'src DiagnosticSink,
    ) -> Self {
        Self {
            tokens,
            pos: 0,
            source,
            file,
            interner,
            sink,
        }
    }

    // ========================================================================
    // Primitive operations
    // ========================================================================

    fn current(&self) -> SvToken {
        self.peek_kind(0)
    }

    fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .or(self.tokens.last())
            .map_or(Span::point(self.file, 0), |t| t.span)
    }

    fn current_text(&self) -> &'src str {
        self.text(self.current_span())
    }

    fn text(&self, span: Span) -> &'src str {
        self.source
            .get(span.range())
            .unwrap_or("")
    }

    fn at(&self, kind: SvToken) -> bool {
        self.current() == kind
    }

    fn at_eof(&self) -> bool {
        self.at(SvToken::Eof)
    }

    fn at_ident(&self) -> bool {
        is_ident(self.current())
    }

    fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            self.current_span()
        }
    }

    fn advance(&mut self) {
        if !self.at_eof() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SvToken) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes `kind` or reports `expected {what}`.
    fn expect(&mut self, kind: SvToken, what: &str) -> bool {
        let found = self.eat(kind);
        if !found {
            self.expected(what);
        }
        found
    }

    fn expect_ident(&mut self, what: &str) -> Ident {
        if self.at_ident() {
            let ident = self.interner.get_or_intern(self.current_text());
            self.advance();
            ident
        } else {
            self.expected(what);
            self.interner.get_or_intern("<missing>")
        }
    }

    fn peek_kind(&self, offset: usize) -> SvToken {
        self.tokens
            .get(self.pos + offset)
            .map_or(SvToken::Eof, |t| t.kind)
    }

    // ========================================================================
    // Error handling and recovery
    // ========================================================================

    fn emit(&self, diag: Diagnostic) {
        self.sink.emit(diag);
    }

    fn found(&self) -> String {
        if self.at_eof() {
            "end of file".to_string()
        } else {
            format!("`{}`", self.current_text())
        }
    }

    /// Emits an "expected X, found Y" error at the current token.
    fn expected(&self, what: &str) {
        self.emit(Diagnostic::error(
            DiagnosticCode::SYNTAX,
            format!("expected {what}, found {}", self.found()),
            self.current_span(),
        ));
    }

    /// Skips to the next `,` or `)` at bracket depth 0 without consuming it.
    ///
    /// Also stops at `;`, `endmodule`, `module` and end of file so a broken
    /// list cannot swallow the rest of the file.
    fn recover_in_list(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.current() {
                SvToken::Eof
                | SvToken::Semicolon
                | SvToken::Endmodule
                | SvToken::Module
                | SvToken::Macromodule => return,
                SvToken::Comma if depth == 0 => return,
                SvToken::RightParen if depth == 0 => return,
                kind if kind.opens_group() => depth += 1,
                kind if kind.closes_group() => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }
    }

    /// Collects tokens up to a depth-0 token matching `stop`.
    ///
    /// With `spaced`, whitespace runs (between tokens or inside one, as in
    /// `8 'hFF`) become one space; otherwise all whitespace is dropped. String
    /// literals are copied as written. A `:` closing a depth-0 `?` never stops.
    fn collect_text(&mut self, stop: impl Fn(SvToken) -> bool, spaced: bool) -> Option<ValueText> {
        let mut depth = 0usize;
        let mut open_conditionals = 0usize;
        let mut text = String::new();
        let mut first: Option<Span> = None;
        let mut last_end = 0;
        loop {
            let kind = self.current();
            if kind == SvToken::Eof || kind == SvToken::Semicolon {
                break;
            }
            let closes_conditional = kind == SvToken::Colon && open_conditionals > 0;
            if depth == 0 && stop(kind) && !closes_conditional {
                break;
            }
            if kind.opens_group() {
                depth += 1;
            } else if kind.closes_group() {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            let span = self.current_span();
            let token_text = self.text(span);
            if depth == 0 && kind == SvToken::Operator && token_text == "?" {
                open_conditionals += 1;
            } else if depth == 0 && closes_conditional {
                open_conditionals -= 1;
            }
            if first.is_some() && spaced && span.start > last_end {
                text.push(' ');
            }
            if kind == SvToken::StringLiteral {
                text.push_str(token_text);
            } else {
                push_normalized(&mut text, token_text, spaced);
            }
            first.get_or_insert(span);
            last_end = span.end;
            self.advance();
        }
        first.map(|start| ValueText {
            text,
            span: start.merge(self.prev_span()),
        })
    }

    // ========================================================================
    // Top-level parsing
    // ========================================================================

    /// Parses every module header in the file.
    pub fn parse_header_file(&mut self) -> HeaderFile {
        let mut modules = Vec::new();
        while !self.at_eof() {
            if self.at(SvToken::Module) || self.at(SvToken::Macromodule) {
                modules.push(self.parse_module());
            } else {
                self.advance();
            }
        }
        if modules.is_empty() {
            self.emit(
                Diagnostic::error(
                    DiagnosticCode::NO_MODULE,
                    "no module declaration found",
                    Span::point(self.file, 0),
                )
                .with_help("a DUT file must declare its top-level module with `module <name> (...);`"),
            );
        }
        HeaderFile {
            modules,
            span: Span::new(self.file, 0, self.source.len() as u32),
        }
    }

    fn parse_module(&mut self) -> ModuleHeader {
        let start = self.current_span();
        self.advance();

        // Lifetime qualifier: `module automatic m`.
        if self.at(SvToken::Identifier)
            && matches!(self.current_text(), "static" | "automatic")
            && is_ident(self.peek_kind(1))
        {
            self.advance();
        }

        let name_span = self.current_span();
        let name = self.expect_ident("module name");

        let params = if self.eat(SvToken::Hash) {
            if self.expect(SvToken::LeftParen, "`(` after `#`") {
                self.parse_parameter_port_list()
            } else {
                Vec::new()
            }
        } else {
            Vec::new()
        };

        let (port_style, ports) = if self.at(SvToken::LeftParen) {
            self.parse_port_list()
        } else {
            (PortStyle::Absent, Vec::new())
        };

        self.expect(SvToken::Semicolon, "`;` after the module header");
        let end_label = self.skip_body();

        ModuleHeader {
            name,
            name_span,
            params,
            port_style,
            ports,
            end_label,
            span: start.merge(self.prev_span()),
        }
    }

    /// Skips the module body through `endmodule` and its optional label.
    fn skip_body(&mut self) -> Option<Ident> {
        loop {
            match self.current() {
                SvToken::Endmodule => break,
                SvToken::Module | SvToken::Macromodule | SvToken::Eof => {
                    self.expected("`endmodule`");
                    return None;
                }
                _ => self.advance(),
            }
        }
        self.advance();
        if self.eat(SvToken::Colon) {
            Some(self.expect_ident("module name after `endmodule :`"))
        } else {
            None
        }
    }

    // ========================================================================
    // Parameter port list
    // ========================================================================

    /// Parses the entries after `#(` through the closing `)`.
    fn parse_parameter_port_list(&mut self) -> Vec<ParameterDecl> {
        let mut params = Vec::new();
        if self.eat(SvToken::RightParen) {
            return params;
        }
        let mut local = false;
        loop {
            if self.eat(SvToken::Parameter) {
                local = false;
            } else if self.eat(SvToken::Localparam) {
                local = true;
            }
            match self.parse_parameter(local) {
                Some(param) => params.push(param),
                None => self.recover_in_list(),
            }
            if self.eat(SvToken::Comma) {
                continue;
            }
            if self.eat(SvToken::RightParen) {
                break;
            }
            self.expected("`,` or `)` in parameter list");
            self.recover_in_list();
            if self.eat(SvToken::Comma) {
                continue;
            }
            self.eat(SvToken::RightParen);
            break;
        }
        params
    }

    fn parse_parameter(&mut self, local: bool) -> Option<ParameterDecl> {
        let start = self.current_span();

        let data_type = if self.at(SvToken::Type) || self.current().is_data_type() {
            let text = self.current_text().to_string();
            self.advance();
            Some(text)
        } else if self.at_ident() && is_ident(self.peek_kind(1)) {
            // User type: `my_pkg::width_t W = 4` lexes the `::` separately.
            let text = self.current_text().to_string();
            self.advance();
            Some(text)
        } else {
            None
        };

        let signed = if self.eat(SvToken::Signed) {
            true
        } else {
            self.eat(SvToken::Unsigned);
            false
        };
        let dims = self.parse_packed_dimensions()?;

        if !self.at_ident() {
            self.expected("parameter name");
            return None;
        }
        let name_span = self.current_span();
        let name = self.expect_ident("parameter name");

        let value = if self.eat(SvToken::Equals) {
            let value = self.collect_text(|k| matches!(k, SvToken::Comma), true);
            if value.is_none() {
                self.expected("parameter value");
                return None;
            }
            value
        } else {
            None
        };

        Some(ParameterDecl {
            local,
            data_type,
            signed,
            dims,
            name,
            name_span,
            value,
            span: start.merge(self.prev_span()),
        })
    }

    // ========================================================================
    // Port list
    // ========================================================================

    /// Parses `( ... )` after the module name or parameter list.
    fn parse_port_list(&mut self) -> (PortStyle, Vec<PortDecl>) {
        self.advance();
        if self.eat(SvToken::RightParen) {
            return (PortStyle::Empty, Vec::new());
        }
        let mut ports = Vec::new();
        loop {
            self.parse_port_declaration(&mut ports);
            if self.eat(SvToken::Comma) {
                continue;
            }
            if self.eat(SvToken::RightParen) {
                break;
            }
            self.expected("`,` or `)` in port list");
            self.recover_in_list();
            if self.eat(SvToken::Comma) {
                continue;
            }
            self.eat(SvToken::RightParen);
            break;
        }
        (PortStyle::Ansi, ports)
    }

    /// Parses `direction type [dims]* name {, name}` and pushes one port per
    /// name. On error, recovers to the next `,` or `)` and pushes nothing more.
    fn parse_port_declaration(&mut self, ports: &mut Vec<PortDecl>) {
        let start = self.current_span();
        let Some(direction) = self.parse_direction() else {
            self.recover_in_list();
            return;
        };
        let Some(port_type) = self.parse_port_type() else {
            self.recover_in_list();
            return;
        };
        let signed = if self.eat(SvToken::Signed) {
            true
        } else {
            self.eat(SvToken::Unsigned);
            false
        };
        let Some(dims) = self.parse_packed_dimensions() else {
            self.recover_in_list();
            return;
        };

        loop {
            if !self.at_ident() {
                self.expected("port name");
                self.recover_in_list();
                return;
            }
            let name_span = self.current_span();
            let name = self.expect_ident("port name");

            if self.at(SvToken::LeftBracket) {
                self.report_unpacked(name_span);
                self.recover_in_list();
                return;
            }
            if self.eat(SvToken::Equals) {
                // Port default values do not affect the interface.
                self.collect_text(|k| matches!(k, SvToken::Comma), true);
            }

            ports.push(PortDecl {
                direction,
                direction_span: start,
                port_type,
                signed,
                dims: dims.clone(),
                name,
                name_span,
                span: start.merge(name_span),
            });

            if self.at_continuation_name() {
                self.advance();
            } else {
                return;
            }
        }
    }

    /// True at `, name` where `name` continues the current declaration
    /// (`input logic a, b`) rather than starting a new one.
    fn at_continuation_name(&self) -> bool {
        if !self.at(SvToken::Comma) || !is_ident(self.peek_kind(1)) {
            return false;
        }
        match self.peek_kind(2) {
            SvToken::Comma | SvToken::RightParen | SvToken::Equals => true,
            // `b[3]` continues the list, `outputt [1:0] q` is a misspelling.
            SvToken::LeftBracket => {
                let span = self.tokens[self.pos + 1].span;
                suggest_direction(self.text(span)).is_none()
            }
            _ => false,
        }
    }

    fn parse_direction(&mut self) -> Option<Direction> {
        let span = self.current_span();
        let direction = match self.current() {
            SvToken::Input => Some(Direction::Input),
            SvToken::Output => Some(Direction::Output),
            SvToken::Inout => Some(Direction::Inout),
            _ => None,
        };
        if direction.is_some() {
            self.advance();
            return direction;
        }

        let text = self.current_text();
        match self.current() {
            SvToken::Identifier | SvToken::EscapedIdentifier => match self.peek_kind(1) {
                SvToken::Comma | SvToken::RightParen => {
                    self.emit(
                        Diagnostic::error(
                            DiagnosticCode::MISSING_DIRECTION,
                            format!("port `{text}` has no direction"),
                            span,
                        )
                        .with_label(Label::primary(span, "declared without direction or type"))
                        .with_note("non-ANSI port lists are not supported")
                        .with_help(format!("declare the port in the header: `input logic {text}`")),
                    );
                    None
                }
                SvToken::Dot => {
                    self.emit(
                        Diagnostic::error(
                            DiagnosticCode::UNSUPPORTED_PORT_TYPE,
                            format!("interface port `{text}` is not supported"),
                            span,
                        )
                        .with_label(Label::primary(span, "interface"))
                        .with_help("use `logic`, `wire` or `tri` ports at the DUT boundary"),
                    );
                    None
                }
                _ => self.report_unknown_direction(text, span),
            },
            kind if kind.is_type_keyword()
                || matches!(kind, SvToken::LeftBracket | SvToken::Signed | SvToken::Unsigned) =>
            {
                self.emit(
                    Diagnostic::error(
                        DiagnosticCode::MISSING_DIRECTION,
                        "port declaration has no direction",
                        span,
                    )
                    .with_label(Label::primary(span, "expected a direction before this"))
                    .with_help("start the declaration with `input`, `output` or `inout`"),
                );
                None
            }
            _ => {
                self.expected("port direction");
                None
            }
        }
    }

    /// Reports an identifier in direction position. Returns the suggested
    /// direction, if any, after consuming the identifier.
    fn report_unknown_direction(&mut self, text: &str, span: Span) -> Option<Direction> {
        let suggestion = suggest_direction(text);
        let mut diag = Diagnostic::error(
            DiagnosticCode::UNKNOWN_DIRECTION,
            format!("unknown port direction `{text}`"),
            span,
        )
        .with_label(Label::primary(span, "not a port direction"))
        .with_note("a port direction must be `input`, `output` or `inout`");
        if let Some(dir) = suggestion {
            diag = diag.with_help(format!("did you mean `{dir}`?")).with_fix(
                SuggestedFix::single(
                    format!("replace `{text}` with `{dir}`"),
                    span,
                    dir.as_str(),
                ),
            );
            self.advance();
        }
        self.emit(diag);
        suggestion
    }

    fn parse_port_type(&mut self) -> Option<PortType> {
        let span = self.current_span();
        let text = self.current_text();
        let kind = self.current();
        match kind {
            SvToken::Logic => {
                self.advance();
                Some(PortType::Logic)
            }
            SvToken::Wire | SvToken::Tri => {
                self.advance();
                if self.current().is_data_type() {
                    let data_span = self.current_span();
                    let data_type = self.current_text();
                    self.emit(
                        Diagnostic::error(
                            DiagnosticCode::NET_KIND_WITH_DATA_TYPE,
                            format!("net kind `{text}` combined with data type `{data_type}`"),
                            span.merge(data_span),
                        )
                        .with_label(Label::primary(span.merge(data_span), "net kind and data type"))
                        .with_note("`input logic` and `input wire logic` declare the same port")
                        .with_fix(SuggestedFix::single(
                            format!("remove `{text}`"),
                            Span::new(self.file, span.start, data_span.start),
                            "",
                        )),
                    );
                    return None;
                }
                Some(if kind == SvToken::Wire {
                    PortType::Wire
                } else {
                    PortType::Tri
                })
            }
            kind if kind.is_type_keyword() => {
                let mut diag = Diagnostic::error(
                    DiagnosticCode::UNSUPPORTED_PORT_TYPE,
                    format!("unsupported port type `{text}`"),
                    span,
                )
                .with_label(Label::primary(span, "unsupported type"))
                .with_help("use `logic`, `wire` or `tri`");
                if kind == SvToken::Reg {
                    diag = diag.with_fix(SuggestedFix::single(
                        "replace `reg` with `logic`",
                        span,
                        "logic",
                    ));
                }
                self.emit(diag);
                None
            }
            SvToken::Identifier | SvToken::EscapedIdentifier
                if matches!(
                    self.peek_kind(1),
                    SvToken::Identifier
                        | SvToken::EscapedIdentifier
                        | SvToken::LeftBracket
                        | SvToken::Dot
                        | SvToken::Operator
                ) =>
            {
                self.emit(
                    Diagnostic::error(
                        DiagnosticCode::UNSUPPORTED_PORT_TYPE,
                        format!("user-defined port type `{text}` is not supported"),
                        span,
                    )
                    .with_label(Label::primary(span, "user-defined type"))
                    .with_help("use `logic`, `wire` or `tri` at the DUT boundary"),
                );
                None
            }
            SvToken::Identifier
            | SvToken::EscapedIdentifier
            | SvToken::LeftBracket
            | SvToken::Signed
            | SvToken::Unsigned => {
                self.emit(
                    Diagnostic::error(
                        DiagnosticCode::MISSING_PORT_TYPE,
                        "port declaration has no type",
                        span,
                    )
                    .with_label(Label::primary(span, "expected `logic`, `wire` or `tri` before this"))
                    .with_fix(SuggestedFix::single(
                        "insert `logic`",
                        Span::point(self.file, span.start),
                        "logic ",
                    )),
                );
                None
            }
            _ => {
                self.expected("port type");
                None
            }
        }
    }

    /// Parses zero or more `[msb:lsb]`. Returns `None` after reporting an error.
    fn parse_packed_dimensions(&mut self) -> Option<Vec<Dimension>> {
        let mut dims = Vec::new();
        while self.at(SvToken::LeftBracket) {
            let start = self.current_span();
            self.advance();
            let msb = self.parse_bound()?;
            if !self.at(SvToken::Colon) {
                self.emit(
                    Diagnostic::error(
                        DiagnosticCode::SYNTAX,
                        format!("expected `:` in packed dimension, found {}", self.found()),
                        self.current_span(),
                    )
                    .with_help("write the range as `[msb:lsb]`, e.g. `[WIDTH-1:0]`"),
                );
                return None;
            }
            self.advance();
            let lsb = self.parse_bound()?;
            if !self.expect(SvToken::RightBracket, "`]`") {
                return None;
            }
            dims.push(Dimension {
                msb,
                lsb,
                span: start.merge(self.prev_span()),
            });
        }
        Some(dims)
    }

    fn parse_bound(&mut self) -> Option<String> {
        let stop = |k: SvToken| matches!(k, SvToken::Colon | SvToken::Comma);
        match self.collect_text(stop, false) {
            Some(value) => Some(value.text),
            None => {
                self.expected("dimension bound");
                None
            }
        }
    }

    fn report_unpacked(&self, name_span: Span) {
        let span = self.current_span();
        let name = self.text(name_span);
        self.emit(
            Diagnostic::error(
                DiagnosticCode::UNPACKED_PORT,
                format!("unpacked dimensions on port `{name}` are not supported"),
                span,
            )
            .with_label(Label::primary(span, "unpacked dimension"))
            .with_label(Label::secondary(name_span, "port declared here"))
            .with_help("move the range before the name to make it packed"),
        );
    }
}

/// Appends `token`, collapsing its whitespace runs to one space when
/// `spaced` and dropping them otherwise.
fn push_normalized(text: &mut String, token: &str, spaced: bool) {
    let mut words = token.split_whitespace();
    if let Some(word) = words.next() {
        text.push_str(word);
    }
    for word in words {
        if spaced {
            text.push(' ');
        }
        text.push_str(word);
    }
}

fn is_ident(kind: SvToken) -> bool {
    matches!(kind, SvToken::Identifier | SvToken::EscapedIdentifier)
}
