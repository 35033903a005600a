//! Two-pass assembler: lex once, size and resolve labels in pass one,
//! emit and patch fixups in pass two.

mod error;
mod lexer;
mod opcodes;

pub use error::{AssembleError, Diagnostic, DiagnosticKind};

use lexer::{Lexer, Token};
use log::{debug, warn};
use opcodes::{lookup_mnemonic, OperandShape};
use std::collections::HashMap;

/// An operand resolved syntactically but not yet numerically: either a
/// register index or something that still needs constant/label lookup.
#[derive(Debug, Clone)]
enum ImmExpr {
    Number(i32),
    Label(String),
}

#[derive(Debug, Clone)]
enum DbItem {
    Value(ImmExpr),
    Str(Vec<u8>),
}

#[derive(Debug, Clone)]
struct InstrStmt {
    opcode: u8,
    shape: OperandShape,
    reg_d: u8,
    reg_s: u8,
    imm: Option<ImmExpr>,
}

#[derive(Debug, Clone)]
enum Directive {
    Org(u16),
    /// `.equ` only records a constant; it never advances the address or
    /// emits a byte, so pass one drops it instead of queuing a line.
    Equ,
    Db(Vec<DbItem>),
    Dw(Vec<ImmExpr>),
    Ds(u16),
}

#[derive(Debug, Clone)]
enum Statement {
    Instr(InstrStmt),
    Directive(Directive),
}

struct Line {
    addr: u16,
    line_no: usize,
    stmt: Statement,
}

struct Fixup {
    offset: usize,
    label: String,
    line_no: usize,
}

/// Transient per-assembly state: source is consumed into `lines` during
/// pass one, `labels`/`constants` accumulate as they're declared, and
/// `fixups` records every forward-looking 16-bit reference for pass two
/// to patch once the whole binary exists.
pub struct Assembler {
    labels: HashMap<String, u16>,
    constants: HashMap<String, i32>,
    lines: Vec<Line>,
    diagnostics: Vec<Diagnostic>,
}

impl Assembler {
    pub fn new() -> Self {
        Assembler {
            labels: HashMap::new(),
            constants: HashMap::new(),
            lines: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn assemble(source: &str) -> Result<Vec<u8>, AssembleError> {
        let mut assembler = Assembler::new();
        assembler.first_pass(source);
        if !assembler.diagnostics.is_empty() {
            return Err(AssembleError::new(assembler.diagnostics));
        }
        match assembler.second_pass() {
            Ok(bytes) => Ok(bytes),
            Err(diag) => {
                assembler.diagnostics.push(diag);
                Err(AssembleError::new(assembler.diagnostics))
            }
        }
    }

    fn push_diag(&mut self, diag: Diagnostic) {
        debug!("diagnostic: {diag:?}");
        self.diagnostics.push(diag);
    }

    fn first_pass(&mut self, source: &str) {
        let mut lexer = Lexer::new(source);
        let mut current_address: u16 = 0;

        loop {
            let first = match lexer.next_token() {
                Ok(tok) => tok,
                Err(diag) => {
                    self.push_diag(diag);
                    return;
                }
            };
            let (token, line_no, col) = first;

            match token {
                Token::Eof => break,
                Token::Newline => continue,
                Token::Punct('.') => {
                    match self.parse_directive(&mut lexer, line_no, col) {
                        Ok((directive, size)) => match directive {
                            Directive::Org(addr) => current_address = addr,
                            Directive::Equ => {}
                            other => {
                                self.lines.push(Line {
                                    addr: current_address,
                                    line_no,
                                    stmt: Statement::Directive(other),
                                });
                                current_address = current_address.wrapping_add(size);
                            }
                        },
                        Err(diag) => {
                            self.push_diag(diag);
                            self.skip_to_newline(&mut lexer);
                        }
                    }
                }
                Token::Ident(name) => {
                    // Look ahead one token to distinguish `label:` from a
                    // mnemonic statement.
                    let next = match lexer.next_token() {
                        Ok(tok) => tok,
                        Err(diag) => {
                            self.push_diag(diag);
                            return;
                        }
                    };
                    if matches!(next.0, Token::Punct(':')) {
                        if let Err(diag) = self.declare_label(&name, current_address, line_no, col) {
                            self.push_diag(diag);
                        }
                        continue;
                    }
                    lexer.push_back(next);

                    match self.parse_instruction(&mut lexer, &name, line_no, col) {
                        Ok(stmt) => {
                            let size = stmt.shape_size();
                            self.lines.push(Line {
                                addr: current_address,
                                line_no,
                                stmt: Statement::Instr(stmt),
                            });
                            current_address = current_address.wrapping_add(size);
                        }
                        Err(diag) => {
                            self.push_diag(diag);
                            self.skip_to_newline(&mut lexer);
                        }
                    }
                }
                _ => {
                    self.push_diag(Diagnostic::new(
                        line_no,
                        col,
                        DiagnosticKind::UnexpectedToken,
                        "expected a label, directive, or instruction",
                    ));
                    self.skip_to_newline(&mut lexer);
                }
            }
        }
    }

    fn skip_to_newline(&mut self, lexer: &mut Lexer) {
        loop {
            match lexer.next_token() {
                Ok((Token::Newline | Token::Eof, ..)) => break,
                Ok(_) => continue,
                Err(_) => break,
            }
        }
    }

    fn declare_label(
        &mut self,
        name: &str,
        addr: u16,
        line_no: usize,
        col: usize,
    ) -> Result<(), Diagnostic> {
        if self.labels.contains_key(name) {
            return Err(Diagnostic::new(
                line_no,
                col,
                DiagnosticKind::DuplicateLabel,
                format!("duplicate label '{name}'"),
            ));
        }
        self.labels.insert(name.to_string(), addr);
        Ok(())
    }

    fn parse_directive(
        &mut self,
        lexer: &mut Lexer,
        line_no: usize,
        col: usize,
    ) -> Result<(Directive, u16), Diagnostic> {
        let (tok, _, _) = lexer.next_token()?;
        let Token::Ident(name) = tok else {
            return Err(Diagnostic::new(
                line_no,
                col,
                DiagnosticKind::InvalidDirective,
                "expected a directive name after '.'",
            ));
        };

        match name.to_ascii_lowercase().as_str() {
            "org" => {
                let value = self.parse_number_operand(lexer, line_no, col)?;
                Ok((Directive::Org(value as u16), 0))
            }
            "equ" => {
                let (tok, l, c) = lexer.next_token()?;
                let Token::Ident(const_name) = tok else {
                    return Err(Diagnostic::new(l, c, DiagnosticKind::InvalidDirective, "expected a constant name"));
                };
                self.expect_punct(lexer, ',')?;
                let value = self.parse_number_operand(lexer, line_no, col)?;
                self.constants.insert(const_name, value);
                Ok((Directive::Equ, 0))
            }
            "db" => {
                let items = self.parse_db_items(lexer, line_no)?;
                let size: u16 = items
                    .iter()
                    .map(|item| match item {
                        DbItem::Value(_) => 1u16,
                        DbItem::Str(bytes) => bytes.len() as u16,
                    })
                    .sum();
                Ok((Directive::Db(items), size))
            }
            "dw" => {
                let items = self.parse_dw_items(lexer, line_no)?;
                let size = (items.len() as u16) * 2;
                Ok((Directive::Dw(items), size))
            }
            "ds" => {
                let count = self.parse_number_operand(lexer, line_no, col)?;
                Ok((Directive::Ds(count as u16), count as u16))
            }
            other => Err(Diagnostic::new(
                line_no,
                col,
                DiagnosticKind::InvalidDirective,
                format!("unknown directive '.{other}'"),
            )),
        }
    }

    fn parse_number_operand(
        &mut self,
        lexer: &mut Lexer,
        line_no: usize,
        col: usize,
    ) -> Result<i32, Diagnostic> {
        let negative = self.consume_optional_minus(lexer)?;
        let (tok, l, c) = lexer.next_token()?;
        let value = match tok {
            Token::Number(n) => n,
            Token::Ident(name) => self.constants.get(&name).copied().ok_or_else(|| {
                Diagnostic::new(
                    l,
                    c,
                    DiagnosticKind::UndefinedLabel,
                    format!("'{name}' is not a known constant"),
                )
            })?,
            _ => {
                return Err(Diagnostic::new(line_no, col, DiagnosticKind::InvalidOperand, "expected a number"));
            }
        };
        Ok(if negative { -value } else { value })
    }

    fn consume_optional_minus(&mut self, lexer: &mut Lexer) -> Result<bool, Diagnostic> {
        let tok = lexer.next_token()?;
        if matches!(tok.0, Token::Punct('-')) {
            Ok(true)
        } else {
            lexer.push_back(tok);
            Ok(false)
        }
    }

    fn expect_punct(&mut self, lexer: &mut Lexer, expected: char) -> Result<(), Diagnostic> {
        let (tok, line, col) = lexer.next_token()?;
        if tok == Token::Punct(expected) {
            Ok(())
        } else {
            Err(Diagnostic::new(
                line,
                col,
                DiagnosticKind::UnexpectedToken,
                format!("expected '{expected}'"),
            ))
        }
    }

    fn parse_db_items(&mut self, lexer: &mut Lexer, line_no: usize) -> Result<Vec<DbItem>, Diagnostic> {
        let mut items = Vec::new();
        loop {
            let negative = self.consume_optional_minus(lexer)?;
            let (tok, l, c) = lexer.next_token()?;
            match tok {
                Token::Number(n) => items.push(DbItem::Value(ImmExpr::Number(if negative { -n } else { n }))),
                Token::Char(ch) => {
                    let value = ch as i32;
                    items.push(DbItem::Value(ImmExpr::Number(if negative { -value } else { value })));
                }
                Token::Ident(name) => items.push(DbItem::Value(ImmExpr::Label(name))),
                Token::Str(s) => items.push(DbItem::Str(s.into_bytes())),
                _ => {
                    return Err(Diagnostic::new(l, c, DiagnosticKind::InvalidOperand, "expected a .db value"));
                }
            }
            let sep = lexer.next_token()?;
            match sep.0 {
                Token::Punct(',') => continue,
                Token::Newline | Token::Eof => {
                    lexer.push_back(sep);
                    break;
                }
                _ => {
                    return Err(Diagnostic::new(line_no, sep.2, DiagnosticKind::UnexpectedToken, "expected ',' or end of line"));
                }
            }
        }
        Ok(items)
    }

    fn parse_dw_items(&mut self, lexer: &mut Lexer, line_no: usize) -> Result<Vec<ImmExpr>, Diagnostic> {
        let mut items = Vec::new();
        loop {
            let negative = self.consume_optional_minus(lexer)?;
            let (tok, l, c) = lexer.next_token()?;
            match tok {
                Token::Number(n) => items.push(ImmExpr::Number(if negative { -n } else { n })),
                Token::Char(ch) => {
                    let value = ch as i32;
                    items.push(ImmExpr::Number(if negative { -value } else { value }));
                }
                Token::Ident(name) => items.push(ImmExpr::Label(name)),
                _ => {
                    return Err(Diagnostic::new(l, c, DiagnosticKind::InvalidOperand, "expected a .dw value"));
                }
            }
            let sep = lexer.next_token()?;
            match sep.0 {
                Token::Punct(',') => continue,
                Token::Newline | Token::Eof => {
                    lexer.push_back(sep);
                    break;
                }
                _ => {
                    return Err(Diagnostic::new(line_no, sep.2, DiagnosticKind::UnexpectedToken, "expected ',' or end of line"));
                }
            }
        }
        Ok(items)
    }

    fn parse_instruction(
        &mut self,
        lexer: &mut Lexer,
        mnemonic: &str,
        line_no: usize,
        col: usize,
    ) -> Result<InstrStmt, Diagnostic> {
        let spec = lookup_mnemonic(mnemonic).ok_or_else(|| {
            Diagnostic::new(
                line_no,
                col,
                DiagnosticKind::InvalidMnemonic,
                format!("unknown mnemonic '{mnemonic}'"),
            )
        })?;

        let (reg_d, reg_s, imm) = match spec.shape {
            OperandShape::None => (0, 0, None),
            OperandShape::Rs => {
                let rs = self.parse_register_operand(lexer, line_no, col)?;
                (0, rs, None)
            }
            OperandShape::Rd => {
                let rd = self.parse_register_operand(lexer, line_no, col)?;
                (rd, 0, None)
            }
            OperandShape::RdRs => {
                let rd = self.parse_register_operand(lexer, line_no, col)?;
                self.expect_punct(lexer, ',')?;
                let rs = self.parse_register_operand(lexer, line_no, col)?;
                (rd, rs, None)
            }
            OperandShape::RdImm16 | OperandShape::RdImm8 => {
                let rd = self.parse_register_operand(lexer, line_no, col)?;
                self.expect_punct(lexer, ',')?;
                let imm = self.parse_imm_expr(lexer, line_no, col)?;
                (rd, 0, Some(imm))
            }
            OperandShape::ShiftImm => {
                let rd = self.parse_register_operand(lexer, line_no, col)?;
                self.expect_punct(lexer, ',')?;
                let imm = self.parse_imm_expr(lexer, line_no, col)?;
                let distance = match &imm {
                    ImmExpr::Number(n) => *n,
                    ImmExpr::Label(name) => {
                        return Err(Diagnostic::new(
                            line_no,
                            col,
                            DiagnosticKind::InvalidOperand,
                            format!("shift distance cannot reference label '{name}'"),
                        ));
                    }
                };
                if !(0..=7).contains(&distance) {
                    return Err(Diagnostic::new(
                        line_no,
                        col,
                        DiagnosticKind::NumberOutOfRange,
                        format!("shift distance {distance} out of range 0..7"),
                    ));
                }
                (rd, distance as u8, None)
            }
            OperandShape::Addr16 => {
                let imm = self.parse_imm_expr(lexer, line_no, col)?;
                (0, 0, Some(imm))
            }
        };

        self.expect_end_of_statement(lexer, line_no)?;

        Ok(InstrStmt {
            opcode: spec.opcode,
            shape: spec.shape,
            reg_d,
            reg_s,
            imm,
        })
    }

    fn expect_end_of_statement(&mut self, lexer: &mut Lexer, line_no: usize) -> Result<(), Diagnostic> {
        let (tok, l, c) = lexer.next_token()?;
        match tok {
            Token::Newline | Token::Eof => Ok(()),
            _ => Err(Diagnostic::new(
                l,
                c,
                DiagnosticKind::UnexpectedToken,
                "unexpected trailing operand",
            )).inspect_err(|_| warn!("line {line_no}: trailing tokens after instruction")),
        }
    }

    /// Registers are `R0`..`R7`, case-insensitive. Square brackets around
    /// a register operand are accepted but carry no separate encoding —
    /// `LOAD R0, [R1]` and a hypothetical bracket-less form encode
    /// identically.
    fn parse_register_operand(&mut self, lexer: &mut Lexer, line_no: usize, col: usize) -> Result<u8, Diagnostic> {
        let opened = {
            let tok = lexer.next_token()?;
            if matches!(tok.0, Token::Punct('[')) {
                true
            } else {
                lexer.push_back(tok);
                false
            }
        };

        let (tok, l, c) = lexer.next_token()?;
        let reg = match tok {
            Token::Ident(name) => parse_register_name(&name).ok_or_else(|| {
                Diagnostic::new(l, c, DiagnosticKind::InvalidRegister, format!("'{name}' is not a register R0..R7"))
            })?,
            _ => {
                return Err(Diagnostic::new(line_no, col, DiagnosticKind::InvalidRegister, "expected a register operand"));
            }
        };

        if opened {
            self.expect_punct(lexer, ']')?;
        }
        Ok(reg)
    }

    fn parse_imm_expr(&mut self, lexer: &mut Lexer, line_no: usize, col: usize) -> Result<ImmExpr, Diagnostic> {
        let negative = self.consume_optional_minus(lexer)?;
        let (tok, l, c) = lexer.next_token()?;
        let expr = match tok {
            Token::Number(n) => ImmExpr::Number(if negative { -n } else { n }),
            Token::Char(ch) => ImmExpr::Number(if negative { -(ch as i32) } else { ch as i32 }),
            Token::Ident(name) => {
                if negative {
                    return Err(Diagnostic::new(l, c, DiagnosticKind::InvalidOperand, "unary '-' on a label is not supported"));
                }
                ImmExpr::Label(name)
            }
            _ => {
                return Err(Diagnostic::new(line_no, col, DiagnosticKind::InvalidOperand, "expected a number, character, or label"));
            }
        };
        Ok(expr)
    }

    fn second_pass(&mut self) -> Result<Vec<u8>, Diagnostic> {
        let end = self
            .lines
            .iter()
            .map(|line| line.addr.wrapping_add(line.stmt.size()))
            .max()
            .unwrap_or(0);

        let mut output = vec![0u8; end as usize];
        let mut fixups = Vec::new();

        // Snapshot borrows up front: `emit_line` needs `&self.labels`/
        // `&self.constants` while also pushing into `output`/`fixups`,
        // and `self.lines` is being iterated at the same time.
        let lines = std::mem::take(&mut self.lines);
        for line in &lines {
            self.emit_line(line, &mut output, &mut fixups)?;
        }
        self.lines = lines;

        for fixup in fixups {
            let addr = self.labels.get(&fixup.label).copied().ok_or_else(|| {
                Diagnostic::new(
                    fixup.line_no,
                    1,
                    DiagnosticKind::UndefinedLabel,
                    format!("undefined label '{}'", fixup.label),
                )
            })?;
            output[fixup.offset] = (addr & 0xFF) as u8;
            output[fixup.offset + 1] = (addr >> 8) as u8;
        }

        Ok(output)
    }

    fn emit_line(&self, line: &Line, output: &mut [u8], fixups: &mut Vec<Fixup>) -> Result<(), Diagnostic> {
        let base = line.addr as usize;
        match &line.stmt {
            Statement::Directive(Directive::Org(_) | Directive::Equ) => Ok(()),
            Statement::Directive(Directive::Ds(count)) => {
                for i in 0..*count as usize {
                    output[base + i] = 0;
                }
                Ok(())
            }
            Statement::Directive(Directive::Db(items)) => {
                let mut offset = base;
                for item in items {
                    match item {
                        DbItem::Value(expr) => {
                            let value = self.resolve_byte_value(expr, line.line_no, fixups, offset)?;
                            if let Some(value) = value {
                                output[offset] = value;
                            }
                            offset += 1;
                        }
                        DbItem::Str(bytes) => {
                            for &b in bytes {
                                output[offset] = b;
                                offset += 1;
                            }
                        }
                    }
                }
                Ok(())
            }
            Statement::Directive(Directive::Dw(items)) => {
                let mut offset = base;
                for expr in items {
                    self.resolve_word_into(expr, line.line_no, output, offset, fixups)?;
                    offset += 2;
                }
                Ok(())
            }
            Statement::Instr(instr) => self.emit_instr(instr, line.line_no, output, base, fixups),
        }
    }

    /// Resolves a `.db` byte value immediately (no fixups at byte
    /// granularity — see DESIGN.md). Returns `None` only if resolution
    /// failed and a diagnostic should already be considered fatal; in
    /// practice this always resolves or returns `Err`.
    fn resolve_byte_value(
        &self,
        expr: &ImmExpr,
        line_no: usize,
        _fixups: &mut [Fixup],
        _offset: usize,
    ) -> Result<Option<u8>, Diagnostic> {
        let value = self.resolve_immediate(expr, line_no)?;
        if !(-128..=255).contains(&value) {
            return Err(Diagnostic::new(
                line_no,
                1,
                DiagnosticKind::NumberOutOfRange,
                format!(".db value {value} does not fit in a byte"),
            ));
        }
        Ok(Some(value as u8))
    }

    fn resolve_word_into(
        &self,
        expr: &ImmExpr,
        line_no: usize,
        output: &mut [u8],
        offset: usize,
        fixups: &mut Vec<Fixup>,
    ) -> Result<(), Diagnostic> {
        match expr {
            ImmExpr::Number(n) => {
                let value = *n as u16;
                output[offset] = (value & 0xFF) as u8;
                output[offset + 1] = (value >> 8) as u8;
                Ok(())
            }
            ImmExpr::Label(name) => {
                if let Some(name) = self.constants_only_label(name) {
                    let value = name as u16;
                    output[offset] = (value & 0xFF) as u8;
                    output[offset + 1] = (value >> 8) as u8;
                } else {
                    fixups.push(Fixup { offset, label: name.clone(), line_no });
                }
                Ok(())
            }
        }
    }

    fn constants_only_label(&self, name: &str) -> Option<i32> {
        self.constants.get(name).copied()
    }

    fn resolve_immediate(&self, expr: &ImmExpr, line_no: usize) -> Result<i32, Diagnostic> {
        match expr {
            ImmExpr::Number(n) => Ok(*n),
            ImmExpr::Label(name) => {
                if let Some(v) = self.constants.get(name) {
                    return Ok(*v);
                }
                if let Some(addr) = self.labels.get(name) {
                    return Ok(*addr as i32);
                }
                Err(Diagnostic::new(
                    line_no,
                    1,
                    DiagnosticKind::UndefinedLabel,
                    format!("undefined identifier '{name}'"),
                ))
            }
        }
    }

    fn emit_instr(
        &self,
        instr: &InstrStmt,
        line_no: usize,
        output: &mut [u8],
        base: usize,
        fixups: &mut Vec<Fixup>,
    ) -> Result<(), Diagnostic> {
        output[base] = instr.opcode;
        match instr.shape {
            OperandShape::None => {}
            OperandShape::Rs | OperandShape::Rd | OperandShape::RdRs | OperandShape::ShiftImm => {
                output[base + 1] = (instr.reg_d << 5) | (instr.reg_s << 2);
            }
            OperandShape::RdImm16 => {
                output[base + 1] = (instr.reg_d << 5) | (instr.reg_s << 2);
                self.emit_imm16(instr.imm.as_ref().unwrap(), line_no, output, base + 2, fixups)?;
            }
            OperandShape::RdImm8 => {
                output[base + 1] = (instr.reg_d << 5) | (instr.reg_s << 2);
                let value = self.resolve_immediate(instr.imm.as_ref().unwrap(), line_no)?;
                if !(-128..=255).contains(&value) {
                    return Err(Diagnostic::new(
                        line_no,
                        1,
                        DiagnosticKind::NumberOutOfRange,
                        format!("immediate {value} does not fit in a sign-extended byte"),
                    ));
                }
                output[base + 2] = value as u8;
            }
            OperandShape::Addr16 => {
                self.emit_imm16(instr.imm.as_ref().unwrap(), line_no, output, base + 1, fixups)?;
            }
        }
        Ok(())
    }

    fn emit_imm16(
        &self,
        expr: &ImmExpr,
        line_no: usize,
        output: &mut [u8],
        offset: usize,
        fixups: &mut Vec<Fixup>,
    ) -> Result<(), Diagnostic> {
        match expr {
            ImmExpr::Number(n) => {
                let value = *n as u16;
                output[offset] = (value & 0xFF) as u8;
                output[offset + 1] = (value >> 8) as u8;
                Ok(())
            }
            ImmExpr::Label(name) => {
                if let Some(value) = self.constants.get(name) {
                    let value = *value as u16;
                    output[offset] = (value & 0xFF) as u8;
                    output[offset + 1] = (value >> 8) as u8;
                } else {
                    // Always route label addresses through the fixup
                    // list, forward or backward, and resolve uniformly
                    // once the whole binary has been emitted.
                    fixups.push(Fixup { offset, label: name.clone(), line_no });
                }
                Ok(())
            }
        }
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Statement {
    fn size(&self) -> u16 {
        match self {
            Statement::Instr(instr) => instr.shape_size(),
            Statement::Directive(Directive::Org(_) | Directive::Equ) => 0,
            Statement::Directive(Directive::Ds(n)) => *n,
            Statement::Directive(Directive::Db(items)) => items
                .iter()
                .map(|item| match item {
                    DbItem::Value(_) => 1u16,
                    DbItem::Str(bytes) => bytes.len() as u16,
                })
                .sum(),
            Statement::Directive(Directive::Dw(items)) => items.len() as u16 * 2,
        }
    }
}

impl InstrStmt {
    fn shape_size(&self) -> u16 {
        match self.shape {
            OperandShape::None => 1,
            OperandShape::Rs | OperandShape::Rd | OperandShape::RdRs | OperandShape::ShiftImm => 2,
            OperandShape::RdImm8 => 3,
            OperandShape::Addr16 => 3,
            OperandShape::RdImm16 => 4,
        }
    }
}

fn parse_register_name(name: &str) -> Option<u8> {
    let mut chars = name.chars();
    let r = chars.next()?;
    if !matches!(r, 'r' | 'R') {
        return None;
    }
    let digit = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let value = digit.to_digit(10)?;
    if value <= 7 {
        Some(value as u8)
    } else {
        None
    }
}
