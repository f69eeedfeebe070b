use std::fmt;

use crate::{
    ast::{
        BranchForm, CaseExpression, ConditionKind, ExitKind, ExprNode, LoopCondition, LoopKind,
        Parameter, ParameterList,
    },
    codegen::Generator,
};

/// One recorded generator hook call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ModuleHeader,
    ModuleFooter,
    Declaration {
        variable:    Parameter,
        initializer: Option<ExprNode>,
    },
    Assignment(String),
    Expression(ExprNode),
    EndOfStatement,
    BeginBlock,
    EndBlock,
    If(ExprNode, BranchForm),
    ElseIf(ExprNode),
    Else,
    Select(ExprNode),
    Case(Vec<CaseExpression>),
    CaseElse,
    EndSelect,
    For {
        counter:          Parameter,
        declares_counter: bool,
        start:            ExprNode,
        end:              ExprNode,
        step:             Option<ExprNode>,
    },
    While(ExprNode),
    Do(Option<LoopCondition>),
    Loop(Option<LoopCondition>),
    Function {
        signature:  Parameter,
        parameters: ParameterList,
    },
    EndFunction,
    Call {
        name:      String,
        arguments: Vec<ExprNode>,
    },
    Return(Option<ExprNode>),
    Print(Vec<ExprNode>),
    Exit(ExitKind),
    Continue(LoopKind),
}

impl Event {
    /// Short name of the hook that produced the event.
    ///
    /// ```
    /// use transbasic::codegen::events::Event;
    ///
    /// assert_eq!(Event::BeginBlock.name(), "begin_block");
    /// assert_eq!(Event::CaseElse.name(), "case_else");
    /// ```
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ModuleHeader => "module_header",
            Self::ModuleFooter => "module_footer",
            Self::Declaration { .. } => "declaration",
            Self::Assignment(_) => "assignment",
            Self::Expression(_) => "expression",
            Self::EndOfStatement => "end_of_statement",
            Self::BeginBlock => "begin_block",
            Self::EndBlock => "end_block",
            Self::If(..) => "if",
            Self::ElseIf(_) => "else_if",
            Self::Else => "else",
            Self::Select(_) => "select",
            Self::Case(_) => "case",
            Self::CaseElse => "case_else",
            Self::EndSelect => "end_select",
            Self::For { .. } => "for",
            Self::While(_) => "while",
            Self::Do(_) => "do",
            Self::Loop(_) => "loop",
            Self::Function { .. } => "function",
            Self::EndFunction => "end_function",
            Self::Call { .. } => "call",
            Self::Return(_) => "return",
            Self::Print(_) => "print",
            Self::Exit(_) => "exit",
            Self::Continue(_) => "continue",
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_condition(f: &mut fmt::Formatter<'_>, condition: Option<&LoopCondition>) -> fmt::Result {
    match condition {
        Some(LoopCondition { kind: ConditionKind::While,
                             expression, }) => write!(f, " while {expression}"),
        Some(LoopCondition { kind: ConditionKind::Until,
                             expression, }) => write!(f, " until {expression}"),
        None => Ok(()),
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        match self {
            Self::Declaration { variable,
                                initializer, } => {
                write!(f, " {}: {}", variable.identifier, variable.datatype)?;
                if let Some(value) = initializer {
                    write!(f, " = {value}")?;
                }
                Ok(())
            },
            Self::Assignment(target) => write!(f, " {target}"),
            Self::If(condition, BranchForm::Block) => write!(f, " {condition}"),
            Self::If(condition, BranchForm::SingleLine) => {
                write!(f, " {condition} (single line)")
            },
            Self::Expression(node) | Self::ElseIf(node) | Self::While(node) => {
                write!(f, " {node}")
            },
            Self::Select(subject) => write!(f, " {subject}"),
            Self::Case(items) => {
                f.write_str(" ")?;
                write_list(f, items)
            },
            Self::For { counter,
                        declares_counter,
                        start,
                        end,
                        step, } => {
                write!(f, " {}: {}", counter.identifier, counter.datatype)?;
                if *declares_counter {
                    f.write_str(" (new)")?;
                }
                write!(f, " = {start} to {end}")?;
                if let Some(step) = step {
                    write!(f, " step {step}")?;
                }
                Ok(())
            },
            Self::Do(condition) | Self::Loop(condition) => write_condition(f, condition.as_ref()),
            Self::Function { signature,
                             parameters, } => {
                write!(f, " {}(", signature.identifier)?;
                for (i, p) in parameters.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", p.identifier, p.datatype)?;
                }
                f.write_str(")")?;
                if !signature.datatype.is_empty() {
                    write!(f, ": {}", signature.datatype)?;
                }
                Ok(())
            },
            Self::Call { name, arguments } => {
                write!(f, " {name}(")?;
                write_list(f, arguments)?;
                f.write_str(")")
            },
            Self::Return(Some(value)) => write!(f, " {value}"),
            Self::Print(items) => {
                if !items.is_empty() {
                    f.write_str(" ")?;
                }
                write_list(f, items)
            },
            Self::Exit(kind) => write!(f, " {kind}"),
            Self::Continue(kind) => write!(f, " {}", ExitKind::Loop(*kind)),
            Self::ModuleHeader
            | Self::ModuleFooter
            | Self::EndOfStatement
            | Self::BeginBlock
            | Self::EndBlock
            | Self::Else
            | Self::CaseElse
            | Self::EndSelect
            | Self::EndFunction
            | Self::Return(None) => Ok(()),
        }
    }
}

/// A [`Generator`] that keeps every event.
///
/// ```
/// use transbasic::{codegen::events::EventLog, translate};
///
/// let mut log = EventLog::new();
/// translate("inline", "DIM x AS integer = 1\n", &mut log).unwrap();
/// assert_eq!(log.names(),
///            ["module_header", "declaration", "end_of_statement", "module_footer"]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events in the order they were received.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Hook names in the order they were received.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.events.iter().map(Event::name).collect()
    }

    /// Number of events produced by the hook called `name`.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.events.iter().filter(|e| e.name() == name).count()
    }

    fn push(&mut self, event: Event) {
        tracing::trace!(event = event.name(), "emitted");
        self.events.push(event);
    }
}

impl fmt::Display for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "{event}")?;
        }
        Ok(())
    }
}

impl Generator for EventLog {
    fn module_header(&mut self) {
        self.push(Event::ModuleHeader);
    }

    fn module_footer(&mut self) {
        self.push(Event::ModuleFooter);
    }

    fn declaration(&mut self, variable: &Parameter, initializer: Option<&ExprNode>) {
        self.push(Event::Declaration { variable:    variable.clone(),
                                       initializer: initializer.cloned(), });
    }

    fn assignment(&mut self, target: &str) {
        self.push(Event::Assignment(target.to_string()));
    }

    fn expression(&mut self, node: &ExprNode) {
        self.push(Event::Expression(node.clone()));
    }

    fn end_of_statement(&mut self) {
        self.push(Event::EndOfStatement);
    }

    fn begin_code_block(&mut self) {
        self.push(Event::BeginBlock);
    }

    fn end_code_block(&mut self) {
        self.push(Event::EndBlock);
    }

    fn if_begin(&mut self, condition: &ExprNode, form: BranchForm) {
        self.push(Event::If(condition.clone(), form));
    }

    fn else_if(&mut self, condition: &ExprNode) {
        self.push(Event::ElseIf(condition.clone()));
    }

    fn else_branch(&mut self) {
        self.push(Event::Else);
    }

    fn select(&mut self, subject: &ExprNode) {
        self.push(Event::Select(subject.clone()));
    }

    fn case(&mut self, items: &[CaseExpression]) {
        self.push(Event::Case(items.to_vec()));
    }

    fn case_else(&mut self) {
        self.push(Event::CaseElse);
    }

    fn end_select(&mut self) {
        self.push(Event::EndSelect);
    }

    fn for_loop(&mut self,
                counter: &Parameter,
                declares_counter: bool,
                start: &ExprNode,
                end: &ExprNode,
                step: Option<&ExprNode>) {
        self.push(Event::For { counter: counter.clone(),
                               declares_counter,
                               start: start.clone(),
                               end: end.clone(),
                               step: step.cloned() });
    }

    fn while_loop(&mut self, condition: &ExprNode) {
        self.push(Event::While(condition.clone()));
    }

    fn do_loop(&mut self, condition: Option<&LoopCondition>) {
        self.push(Event::Do(condition.cloned()));
    }

    fn loop_end(&mut self, condition: Option<&LoopCondition>) {
        self.push(Event::Loop(condition.cloned()));
    }

    fn function(&mut self, signature: &Parameter, parameters: &[Parameter]) {
        self.push(Event::Function { signature:  signature.clone(),
                                    parameters: parameters.to_vec(), });
    }

    fn end_function(&mut self) {
        self.push(Event::EndFunction);
    }

    fn call(&mut self, name: &str, arguments: &[ExprNode]) {
        self.push(Event::Call { name:      name.to_string(),
                                arguments: arguments.to_vec(), });
    }

    fn return_value(&mut self, value: Option<&ExprNode>) {
        self.push(Event::Return(value.cloned()));
    }

    fn print(&mut self, items: &[ExprNode]) {
        self.push(Event::Print(items.to_vec()));
    }

    fn exit(&mut self, kind: ExitKind) {
        self.push(Event::Exit(kind));
    }

    fn continue_loop(&mut self, kind: LoopKind) {
        self.push(Event::Continue(kind));
    }
}
