use crate::{
    ast::{
        BinaryOperator, BranchForm, CaseExpression, ConditionKind, ExitKind, ExprKind, ExprNode,
        LoopCondition, LoopKind, Parameter, UnaryOperator,
    },
    codegen::Generator,
    frontend::types,
};

const INDENT: &str = "    ";
const PLACEHOLDER: &str = "/*@declare:";

/// Maps a type name to its C++ spelling. Names without a mapping are
/// emitted unchanged so that user aliases can be provided by a `using`.
///
/// ```
/// use transbasic::codegen::cpp::cpp_type;
///
/// assert_eq!(cpp_type("integer"), "int32_t");
/// assert_eq!(cpp_type("Double"), "double");
/// assert_eq!(cpp_type("money"), "money");
/// ```
#[must_use]
pub fn cpp_type(datatype: &str) -> String {
    let mapped = match datatype.to_ascii_lowercase().as_str() {
        "boolean" => "bool",
        "char" => "char",
        "sbyte" => "int8_t",
        "byte" => "uint8_t",
        "short" => "int16_t",
        "ushort" => "uint16_t",
        "integer" => "int32_t",
        "uinteger" => "uint32_t",
        "long" => "int64_t",
        "ulong" => "uint64_t",
        "single" => "float",
        "double" => "double",
        "string" => "std::string",
        _ => return datatype.to_string(),
    };
    mapped.to_string()
}

const fn cpp_operator(op: BinaryOperator) -> &'static str {
    match op {
        BinaryOperator::Add => "+",
        BinaryOperator::Sub => "-",
        BinaryOperator::Mul => "*",
        BinaryOperator::Div => "/",
        BinaryOperator::Mod => "%",
        BinaryOperator::Equal => "==",
        BinaryOperator::NotEqual => "!=",
        BinaryOperator::Less => "<",
        BinaryOperator::Greater => ">",
        BinaryOperator::LessEqual => "<=",
        BinaryOperator::GreaterEqual => ">=",
        BinaryOperator::And => "&&",
        BinaryOperator::Or => "||",
    }
}

fn is_floating(datatype: &str) -> bool {
    datatype.eq_ignore_ascii_case(types::SINGLE) || datatype.eq_ignore_ascii_case(types::DOUBLE)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

/// Renders an expression tree as a C++ expression.
///
/// ```
/// use transbasic::{
///     ast::BinaryOperator,
///     codegen::cpp::render,
///     frontend::{config::Resolution, expression, lexer::Position, types::TypeRegistry},
/// };
///
/// let types = TypeRegistry::with_builtins();
/// let node = expression::binary(BinaryOperator::Mul,
///                               expression::integer(3),
///                               expression::float(1.5),
///                               Resolution::Arithmetic,
///                               &types,
///                               Position::default()).unwrap();
/// assert_eq!(render(&node), "(static_cast<float>(3) * 1.5f)");
/// ```
#[must_use]
pub fn render(node: &ExprNode) -> String {
    let inner = match &node.kind {
        ExprKind::Integer(v) => {
            if node.datatype.eq_ignore_ascii_case(types::LONG) {
                format!("{v}LL")
            } else {
                v.to_string()
            }
        },
        ExprKind::Float(v) => {
            if node.datatype.eq_ignore_ascii_case(types::SINGLE) {
                format!("{:?}f", v.into_inner())
            } else {
                format!("{:?}", v.into_inner())
            }
        },
        ExprKind::Str(s) => format!("std::string(\"{}\")", escape(s)),
        ExprKind::Boolean(b) => b.to_string(),
        ExprKind::Identifier(name) => name.clone(),
        ExprKind::Unary { op: UnaryOperator::Negate,
                          operand, } => format!("(-{})", render(operand)),
        ExprKind::Unary { op: UnaryOperator::Not,
                          operand, } => format!("(!{})", render(operand)),
        ExprKind::Binary { op: BinaryOperator::Mod,
                           left,
                           right, }
            if is_floating(&node.datatype) =>
        {
            format!("std::fmod({}, {})", render(left), render(right))
        },
        ExprKind::Binary { op, left, right } => {
            format!("({} {} {})", render(left), cpp_operator(*op), render(right))
        },
        ExprKind::Call { name, arguments } => format!("{name}({})", render_list(arguments)),
    };
    match &node.cast {
        Some(target) => format!("static_cast<{}>({inner})", cpp_type(target)),
        None => inner,
    }
}

fn render_list(nodes: &[ExprNode]) -> String {
    nodes.iter().map(render).collect::<Vec<_>>().join(", ")
}

fn render_case(subject: &str, item: &CaseExpression) -> String {
    match item {
        CaseExpression::Value(value) => format!("{subject} == {}", render(value)),
        CaseExpression::Range { low, high } => {
            format!("({subject} >= {} && {subject} <= {})", render(low), render(high))
        },
        CaseExpression::Is { comparator, value } => {
            format!("{subject} {} {}", cpp_operator(*comparator), render(value))
        },
    }
}

fn render_loop_condition(condition: &LoopCondition) -> String {
    match condition.kind {
        ConditionKind::While => render(&condition.expression),
        ConditionKind::Until => format!("!{}", render(&condition.expression)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Construct {
    Plain,
    Loop(LoopKind),
    Select,
    Routine,
}

#[derive(Debug)]
struct Declared {
    name:        String,
    placeholder: Option<usize>,
}

#[derive(Debug)]
struct Block {
    construct:     Construct,
    label:         usize,
    header_start:  usize,
    body_start:    usize,
    single_line:   bool,
    exit_used:     bool,
    continue_used: bool,
    names:         Vec<Declared>,
}

impl Block {
    const fn new(construct: Construct, label: usize, body_start: usize) -> Self {
        Self { construct,
               label,
               header_start: body_start,
               body_start,
               single_line: false,
               exit_used: false,
               continue_used: false,
               names: Vec::new() }
    }
}

#[derive(Debug)]
struct Header {
    text:        String,
    construct:   Construct,
    names:       Vec<String>,
    single_line: bool,
}

impl Header {
    const fn new(text: String, construct: Construct, names: Vec<String>) -> Self {
        Self { text,
               construct,
               names,
               single_line: false }
    }
}

#[derive(Debug, Default)]
struct Unit {
    text:  String,
    depth: usize,
}

#[derive(Debug)]
struct Placeholder {
    name:     String,
    datatype: Option<String>,
}

#[derive(Debug)]
struct DoLoop {
    pre_tested: bool,
    exit_label: Option<usize>,
}

#[derive(Debug)]
struct SelectState {
    subject:    String,
    first_case: bool,
}

/// Renders the event stream as one C++17 translation unit.
///
/// ```
/// use transbasic::{codegen::cpp::CppGenerator, translate};
///
/// let mut cpp = CppGenerator::new();
/// translate("inline", "DIM n AS integer = 2\nPRINT n * 2\n", &mut cpp).unwrap();
/// let out = cpp.output();
/// assert!(out.contains("int32_t n{};"));
/// assert!(out.contains("    n = 2;"));
/// assert!(out.contains("std::cout << (n * 2) << '\\n';"));
/// ```
#[derive(Debug)]
pub struct CppGenerator {
    globals:      String,
    routines:     String,
    units:        Vec<Unit>,
    blocks:       Vec<Block>,
    header:       Option<Header>,
    statement:    String,
    placeholders: Vec<Placeholder>,
    assigning:    Option<usize>,
    returns:      Vec<bool>,
    loops:        Vec<DoLoop>,
    selects:      Vec<SelectState>,
    next_label:   usize,
    output:       String,
}

impl Default for CppGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CppGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self { globals:      String::new(),
               routines:     String::new(),
               units:        vec![Unit { text:  String::new(),
                                         depth: 1, }],
               blocks:       vec![Block::new(Construct::Plain, 0, 0)],
               header:       None,
               statement:    String::new(),
               placeholders: Vec::new(),
               assigning:    None,
               returns:      Vec::new(),
               loops:        Vec::new(),
               selects:      Vec::new(),
               next_label:   1,
               output:       String::new(), }
    }

    /// The finished translation unit; empty until the module footer event.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    #[must_use]
    pub fn into_output(self) -> String {
        self.output
    }

    fn unit(&mut self) -> &mut Unit {
        let last = self.units.len() - 1;
        &mut self.units[last]
    }

    fn line(&mut self, text: &str) {
        let unit = self.unit();
        for _ in 0..unit.depth {
            unit.text.push_str(INDENT);
        }
        unit.text.push_str(text);
        unit.text.push('\n');
    }

    fn indent(&mut self) {
        self.unit().depth += 1;
    }

    fn dedent(&mut self) {
        let unit = self.unit();
        unit.depth = unit.depth.saturating_sub(1);
    }

    fn label(&mut self) -> usize {
        let label = self.next_label;
        self.next_label += 1;
        label
    }

    fn set_header(&mut self, text: String, construct: Construct, names: Vec<String>) {
        self.header = Some(Header::new(text, construct, names));
    }

    /// Index of the block a declaration belongs to: the innermost block that
    /// is not a single-line `IF` branch.
    fn owning_block(&self) -> usize {
        self.blocks.iter().rposition(|block| !block.single_line).unwrap_or(0)
    }

    fn declare(&mut self, owner: usize, name: &str, placeholder: Option<usize>) {
        if let Some(block) = self.blocks.get_mut(owner) {
            block.names.push(Declared { name: name.to_string(),
                                        placeholder });
        }
    }

    /// Writes `text` as a line just above the outermost single-line `IF`
    /// nested in block `owner`.
    fn insert_above_branch(&mut self, owner: usize, text: &str) {
        let Some(offset) = self.blocks.get(owner + 1).map(|block| block.header_start) else {
            self.line(text);
            return;
        };
        let open = self.blocks.len() - 1 - owner;
        let unit = self.unit();
        let depth = unit.depth.saturating_sub(open);
        let line = format!("{}{text}\n", INDENT.repeat(depth));
        unit.text.insert_str(offset, &line);
        for block in self.blocks.iter_mut().skip(owner + 1) {
            block.header_start += line.len();
            block.body_start += line.len();
        }
    }

    fn find_declared(&self, name: &str) -> Option<&Declared> {
        self.blocks
            .iter()
            .rev()
            .find_map(|block| block.names.iter().rev().find(|d| d.name == name))
    }

    fn open_block(&mut self, header_start: usize, header: Header) {
        let label = self.label();
        self.indent();
        let body_start = self.unit().text.len();
        let mut block = Block::new(header.construct, label, body_start);
        block.header_start = header_start;
        block.single_line = header.single_line;
        block.names = header.names
                            .into_iter()
                            .map(|name| Declared { name,
                                                   placeholder: None })
                            .collect();
        self.blocks.push(block);
    }

    fn close_block(&mut self) {
        if self.blocks.len() == 1 {
            return;
        }
        let Some(block) = self.blocks.pop() else {
            return;
        };
        if block.continue_used {
            // The label needs its own scope so the jump never enters the
            // scope of a local declared later in the body.
            let unit = self.unit();
            let opening = format!("{}{{\n", INDENT.repeat(unit.depth));
            unit.text.insert_str(block.body_start, &opening);
            self.line("}");
            self.line(&format!("continue_{}:;", block.label));
        }
        self.dedent();
        self.line("}");
        if !block.exit_used {
            return;
        }
        if block.construct == Construct::Loop(LoopKind::Do) {
            if let Some(pending) = self.loops.last_mut() {
                pending.exit_label = Some(block.label);
            }
        } else {
            self.line(&format!("exit_{}:;", block.label));
        }
    }

    fn append_to_last_line(&mut self, text: &str) {
        let unit = self.unit();
        if unit.text.ends_with('\n') {
            unit.text.pop();
        }
        unit.text.push_str(text);
        unit.text.push('\n');
    }

    /// Jump for `EXIT` of a loop or select: `break` when the target is the
    /// innermost loop, otherwise a `goto` past the construct.
    fn exit_construct(&mut self, target: Construct) -> String {
        let mut crossed_loop = false;
        for block in self.blocks.iter_mut().rev() {
            if block.construct == Construct::Routine {
                break;
            }
            if block.construct == target {
                if matches!(target, Construct::Loop(_)) && !crossed_loop {
                    return "break".to_string();
                }
                block.exit_used = true;
                return format!("goto exit_{}", block.label);
            }
            crossed_loop |= matches!(block.construct, Construct::Loop(_));
        }
        "break".to_string()
    }

    fn finish(&mut self) {
        let mut out = String::from("#include <cmath>\n#include <cstdint>\n#include <iostream>\n#include <string>\n");
        if !self.globals.is_empty() {
            out.push('\n');
            out.push_str(&self.globals);
        }
        if !self.routines.is_empty() {
            out.push('\n');
            out.push_str(&self.routines);
        }
        out.push_str("\nint main() {\n");
        out.push_str(INDENT);
        out.push_str("std::cout << std::boolalpha;\n");
        if let Some(main) = self.units.first() {
            out.push_str(&main.text);
        }
        out.push_str(INDENT);
        out.push_str("return 0;\n}\n");
        self.output = self.resolve_placeholders(&out);
    }

    fn resolve_placeholders(&self, text: &str) -> String {
        let mut resolved = String::with_capacity(text.len());
        for line in text.lines() {
            let trimmed = line.trim_start();
            if let Some(rest) = trimmed.strip_prefix(PLACEHOLDER) {
                let id = rest.trim_end_matches("*/").parse::<usize>().ok();
                let placeholder = id.and_then(|id| self.placeholders.get(id));
                if let Some(Placeholder { name,
                                          datatype: Some(datatype), }) = placeholder
                {
                    resolved.push_str(&line[..line.len() - trimmed.len()]);
                    resolved.push_str(&format!("{datatype} {name}{{}};\n"));
                }
                continue;
            }
            resolved.push_str(line);
            resolved.push('\n');
        }
        resolved
    }
}

impl Generator for CppGenerator {
    fn module_footer(&mut self) {
        self.finish();
    }

    /// File-level names become globals. A name declared in a single-line
    /// `IF` branch is declared above the `IF` and only assigned inside it.
    fn declaration(&mut self, variable: &Parameter, initializer: Option<&ExprNode>) {
        let name = &variable.identifier;
        let owner = self.owning_block();
        let global = self.units.len() == 1 && owner == 0;
        let hoisted = owner + 1 < self.blocks.len();

        let placeholder = if variable.datatype.is_empty() {
            self.placeholders.push(Placeholder { name:     name.clone(),
                                                 datatype: None, });
            Some(self.placeholders.len() - 1)
        } else {
            None
        };
        let datatype = cpp_type(&variable.datatype);
        let text = match placeholder {
            Some(id) => format!("{PLACEHOLDER}{id}*/"),
            None => format!("{datatype} {name}{{}};"),
        };

        if global {
            self.globals.push_str(&text);
            self.globals.push('\n');
        } else if hoisted {
            self.insert_above_branch(owner, &text);
        } else if placeholder.is_some() {
            self.line(&text);
        } else {
            self.statement = match initializer {
                Some(value) => format!("{datatype} {name} = {}", render(value)),
                None => format!("{datatype} {name}{{}}"),
            };
        }
        if (global || hoisted)
           && let Some(value) = initializer
        {
            self.statement = format!("{name} = {}", render(value));
        }
        self.declare(owner, name, placeholder);
    }

    fn assignment(&mut self, target: &str) {
        let placeholder = self.find_declared(target).and_then(|d| d.placeholder);
        self.assigning = placeholder.filter(|id| {
                                        self.placeholders
                                            .get(*id)
                                            .is_some_and(|p| p.datatype.is_none())
                                    });
        self.statement = format!("{target} = ");
    }

    fn expression(&mut self, node: &ExprNode) {
        if let Some(id) = self.assigning.take()
           && let Some(placeholder) = self.placeholders.get_mut(id)
        {
            placeholder.datatype = Some(cpp_type(node.effective_type()));
        }
        self.statement.push_str(&render(node));
    }

    fn end_of_statement(&mut self) {
        if self.statement.is_empty() {
            return;
        }
        let statement = std::mem::take(&mut self.statement);
        self.line(&format!("{statement};"));
    }

    fn begin_code_block(&mut self) {
        let header = self.header
                         .take()
                         .unwrap_or_else(|| Header::new(String::new(), Construct::Plain, Vec::new()));
        let header_start = self.unit().text.len();
        if header.text.is_empty() {
            self.line("{");
        } else {
            self.line(&format!("{} {{", header.text));
        }
        self.open_block(header_start, header);
    }

    fn end_code_block(&mut self) {
        self.close_block();
    }

    fn if_begin(&mut self, condition: &ExprNode, form: BranchForm) {
        let mut header = Header::new(format!("if ({})", render(condition)),
                                     Construct::Plain,
                                     Vec::new());
        header.single_line = form == BranchForm::SingleLine;
        self.header = Some(header);
    }

    fn else_if(&mut self, condition: &ExprNode) {
        if let Some(block) = self.blocks.last_mut() {
            block.names.clear();
        }
        self.dedent();
        self.line(&format!("}} else if ({}) {{", render(condition)));
        self.indent();
    }

    fn else_branch(&mut self) {
        if let Some(block) = self.blocks.last_mut() {
            block.names.clear();
        }
        self.dedent();
        self.line("} else {");
        self.indent();
    }

    fn select(&mut self, subject: &ExprNode) {
        let header_start = self.unit().text.len();
        self.line("{");
        self.open_block(header_start, Header::new(String::new(), Construct::Select, Vec::new()));
        let temporary = format!("select_{}", self.blocks.last().map_or(0, |b| b.label));
        self.line(&format!("const auto {temporary} = {};", render(subject)));
        self.selects.push(SelectState { subject:    temporary,
                                        first_case: true, });
    }

    fn case(&mut self, items: &[CaseExpression]) {
        let Some(state) = self.selects.last_mut() else {
            return;
        };
        let condition = items.iter()
                             .map(|item| render_case(&state.subject, item))
                             .collect::<Vec<_>>()
                             .join(" || ");
        let keyword = if state.first_case { "if" } else { "else if" };
        state.first_case = false;
        self.set_header(format!("{keyword} ({condition})"), Construct::Plain, Vec::new());
    }

    fn case_else(&mut self) {
        let first = self.selects.last().is_none_or(|s| s.first_case);
        let text = if first { String::new() } else { "else".to_string() };
        self.set_header(text, Construct::Plain, Vec::new());
    }

    fn end_select(&mut self) {
        self.selects.pop();
        self.close_block();
    }

    fn for_loop(&mut self,
                counter: &Parameter,
                declares_counter: bool,
                start: &ExprNode,
                end: &ExprNode,
                step: Option<&ExprNode>) {
        let name = &counter.identifier;
        let (start, end) = (render(start), render(end));
        let init = if declares_counter {
            format!("{} {name} = {start}", cpp_type(&counter.datatype))
        } else {
            format!("{name} = {start}")
        };
        let (test, advance) = match step {
            None => (format!("{name} <= {end}"), format!("++{name}")),
            Some(step) => {
                let step = render(step);
                (format!("({step}) >= 0 ? {name} <= {end} : {name} >= {end}"),
                 format!("{name} += {step}"))
            },
        };
        if !declares_counter
           && let Some(id) = self.find_declared(name).and_then(|d| d.placeholder)
           && let Some(placeholder) = self.placeholders.get_mut(id)
           && placeholder.datatype.is_none()
        {
            placeholder.datatype = Some(cpp_type(&counter.datatype));
        }
        let names = if declares_counter { vec![name.clone()] } else { Vec::new() };
        self.set_header(format!("for ({init}; {test}; {advance})"),
                        Construct::Loop(LoopKind::For),
                        names);
    }

    fn while_loop(&mut self, condition: &ExprNode) {
        self.set_header(format!("while ({})", render(condition)),
                        Construct::Loop(LoopKind::While),
                        Vec::new());
    }

    fn do_loop(&mut self, condition: Option<&LoopCondition>) {
        let text = match condition {
            Some(condition) => format!("while ({})", render_loop_condition(condition)),
            None => "do".to_string(),
        };
        self.loops.push(DoLoop { pre_tested: condition.is_some(),
                                 exit_label: None, });
        self.set_header(text, Construct::Loop(LoopKind::Do), Vec::new());
    }

    fn loop_end(&mut self, condition: Option<&LoopCondition>) {
        let Some(state) = self.loops.pop() else {
            return;
        };
        if !state.pre_tested {
            let test = condition.map_or_else(|| "true".to_string(), render_loop_condition);
            self.append_to_last_line(&format!(" while ({test});"));
        }
        if let Some(label) = state.exit_label {
            self.line(&format!("exit_{label}:;"));
        }
    }

    fn function(&mut self, signature: &Parameter, parameters: &[Parameter]) {
        let returns = if signature.datatype.is_empty() {
            "void".to_string()
        } else {
            cpp_type(&signature.datatype)
        };
        let list = parameters.iter()
                             .map(|p| format!("{} {}", cpp_type(&p.datatype), p.identifier))
                             .collect::<Vec<_>>()
                             .join(", ");
        tracing::debug!(routine = %signature.identifier, "hoisting routine");
        self.units.push(Unit::default());
        self.returns.push(!signature.datatype.is_empty());
        self.set_header(format!("{returns} {}({list})", signature.identifier),
                        Construct::Routine,
                        parameters.iter().map(|p| p.identifier.clone()).collect());
    }

    fn end_function(&mut self) {
        self.returns.pop();
        if self.units.len() > 1
           && let Some(unit) = self.units.pop()
        {
            if !self.routines.is_empty() {
                self.routines.push('\n');
            }
            self.routines.push_str(&unit.text);
        }
    }

    fn call(&mut self, name: &str, arguments: &[ExprNode]) {
        self.statement = format!("{name}({})", render_list(arguments));
    }

    fn return_value(&mut self, value: Option<&ExprNode>) {
        self.statement = match value {
            Some(value) => format!("return {}", render(value)),
            None => "return".to_string(),
        };
    }

    fn print(&mut self, items: &[ExprNode]) {
        let mut statement = String::from("std::cout");
        for item in items {
            statement.push_str(" << ");
            statement.push_str(&render(item));
        }
        statement.push_str(" << '\\n'");
        self.statement = statement;
    }

    fn exit(&mut self, kind: ExitKind) {
        self.statement = match kind {
            ExitKind::Loop(kind) => self.exit_construct(Construct::Loop(kind)),
            ExitKind::Select => self.exit_construct(Construct::Select),
            ExitKind::Function | ExitKind::Sub => {
                if self.returns.last().copied().unwrap_or(false) {
                    "return {}".to_string()
                } else {
                    "return".to_string()
                }
            },
        };
    }

    fn continue_loop(&mut self, kind: LoopKind) {
        let target = Construct::Loop(kind);
        let mut statement = "continue".to_string();
        let mut crossed_loop = false;
        for block in self.blocks.iter_mut().rev() {
            if block.construct == Construct::Routine {
                break;
            }
            if block.construct == target {
                if crossed_loop {
                    block.continue_used = true;
                    statement = format!("goto continue_{}", block.label);
                }
                break;
            }
            crossed_loop |= matches!(block.construct, Construct::Loop(_));
        }
        self.statement = statement;
    }
}
